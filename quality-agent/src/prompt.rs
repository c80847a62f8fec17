/// Builds the user message: question, optional context, template reminder.
pub fn compose_prompt(question: &str, context: Option<&str>) -> String {
    let mut out = format!("Question: {question}");
    if let Some(ctx) = context.filter(|c| !c.is_empty()) {
        out.push_str("\nContext: ");
        out.push_str(ctx);
    }
    out.push_str("\n\nUse the EXACT template with **bold headers**.");
    out
}
