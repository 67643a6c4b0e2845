//! Researcher prompts.

pub const SYSTEM_PROMPT: &str = "\
You are a research assistant that synthesizes information from multiple sources.

Your job is to:
1. Analyze search results from web searches
2. Identify key information relevant to the research task
3. Note which sources are from academic papers (ArXiv) vs encyclopedic content (Wikipedia) vs general web
4. Create a concise summary of findings for each research task

Be objective and factual. Cite sources when making claims. Highlight any conflicting information across sources.";

/// User prompt for summarizing one task's merged sources.
pub fn user_prompt(query: &str, task_reasoning: &str, sources_digest: &str) -> String {
    format!(
        "Synthesize the following research findings:\n\n\
         **Search Query**: {query}\n\n\
         **Purpose**: {task_reasoning}\n\n\
         **Sources Found**:\n{sources_digest}\n\n\
         Provide a concise summary of the key findings relevant to the research purpose.\n\
         Note any academic papers, Wikipedia articles, or particularly authoritative sources.\n\
         Highlight any conflicting information if present."
    )
}
