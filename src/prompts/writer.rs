//! Writer prompts.

pub const SYSTEM_PROMPT: &str = "\
You are an expert research writer. Your job is to synthesize research findings into a well-structured, comprehensive markdown report.

Your reports should:
1. Have a clear, descriptive title
2. Include an executive summary/introduction
3. Be organized with logical sections and headings
4. Present information clearly and accurately
5. Cite sources appropriately with links
6. Include a references/sources section at the end
7. Be written in an accessible but professional tone

Use proper markdown formatting:
- # for main title
- ## for major sections
- ### for subsections
- **bold** for emphasis
- > for important quotes or callouts
- - or 1. for lists
- [text](url) for source links";

/// User prompt for the initial draft.
pub fn user_prompt(question: &str, findings_digest: &str) -> String {
    format!(
        "Write a comprehensive research report based on the following:\n\n\
         **Original Question**: {question}\n\n\
         **Research Findings**:\n{findings_digest}\n\n\
         Create a well-structured markdown report that:\n\
         1. Directly answers the original question\n\
         2. Synthesizes information from all sources\n\
         3. Is organized logically with clear sections\n\
         4. Cites sources with links where available\n\
         5. Includes a references section at the end\n\n\
         The report should be thorough but readable, suitable for someone wanting to understand this topic in depth."
    )
}

/// User prompt for revising a draft using the editor's brief.
pub fn revision_prompt(question: &str, current_draft: &str, editor_feedback: &str) -> String {
    format!(
        "Revise the following research report based on editor feedback:\n\n\
         **Original Question**: {question}\n\n\
         **Current Draft**:\n{current_draft}\n\n\
         **Editor Feedback**:\n{editor_feedback}\n\n\
         Please revise the report to address all the feedback while maintaining the overall structure and accuracy.\n\
         Focus on:\n\
         1. Fixing any issues identified\n\
         2. Incorporating suggestions for improvement\n\
         3. Maintaining or improving clarity and readability\n\
         4. Ensuring all sources are still properly cited"
    )
}
