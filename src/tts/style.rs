use crate::config::StyleTemplates;

/// Resolve a style token to style text.
///
/// A token naming a known template yields that template's `style`; any other
/// token is used verbatim as a free-form instruction.
pub fn resolve(token: Option<&str>, templates: &StyleTemplates) -> String {
    match token {
        None | Some("") => String::new(),
        Some(token) => templates
            .get(token)
            .map(|t| t.style.clone())
            .unwrap_or_else(|| token.to_string()),
    }
}

/// Prefix text with a style instruction, if there is one.
pub fn apply(style: &str, text: &str) -> String {
    if style.is_empty() {
        text.to_string()
    } else {
        format!("{}: {}", style, text)
    }
}
