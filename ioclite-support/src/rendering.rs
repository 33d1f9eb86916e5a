//! Text rendering for resolution errors.
//!
//! Formats construction chains, trims fully qualified type names
//! and ranks registered types that look like a failed request.

/// Renders a construction chain as a single line.
///
/// # Examples
/// ```
/// use ioclite_support::rendering::render_chain;
///
/// let chain = vec!["InvoiceService", "SqlRepository", "InvoiceService"];
/// let rendered = render_chain(&chain);
/// assert_eq!(rendered, "InvoiceService → SqlRepository → InvoiceService");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    chain
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Drops module paths from every segment of a type name.
///
/// ```
/// use ioclite_support::rendering::shorten_type_name;
///
/// let short = shorten_type_name("billing::repo::SqlRepository<billing::model::Employee>");
/// assert_eq!(short, "SqlRepository<Employee>");
///
/// let short = shorten_type_name("dyn billing::log::Logger");
/// assert_eq!(short, "dyn Logger");
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut chars = full_name.chars().peekable();
    let mut current_segment = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                current_segment.clear();
            }
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' => {
                result.push_str(&current_segment);
                result.push(ch);
                current_segment.clear();
            }
            _ => current_segment.push(ch),
        }
    }

    result.push_str(&current_segment);
    result
}

/// Ranks `available` type names by how much they resemble `requested`.
///
/// Substring matches on the full name score highest, then substring
/// matches on the shortened name, then a shared prefix of at least
/// three characters. At most `max_suggestions` names are returned,
/// best first.
pub fn suggest_similar(requested: &str, available: &[&str], max_suggestions: usize) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    let requested_short = shorten_type_name(requested).to_lowercase();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter(|&&name| name != requested)
        .filter_map(|&name| {
            let name_lower = name.to_lowercase();
            let name_short = shorten_type_name(name).to_lowercase();

            if name_lower.contains(&requested_lower) || requested_lower.contains(&name_lower) {
                return Some((name, 100));
            }

            if name_short.contains(&requested_short) || requested_short.contains(&name_short) {
                return Some((name, 80));
            }

            let common = name_short
                .chars()
                .zip(requested_short.chars())
                .take_while(|(a, b)| a == b)
                .count();

            (common >= 3).then_some((name, common * 10))
        })
        .collect();

    // stable: equal scores keep the caller's order
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_cycle_chain() {
        let chain = vec!["A", "B", "A"];
        assert_eq!(render_chain(&chain), "A → B → A");
    }

    #[test]
    fn render_single_element_chain() {
        assert_eq!(render_chain(&["A"]), "A");
    }

    #[test]
    fn render_empty_chain() {
        let chain: Vec<&str> = vec![];
        assert_eq!(render_chain(&chain), "");
    }

    #[test]
    fn shorten_simple_path() {
        assert_eq!(shorten_type_name("app::services::InvoiceService"), "InvoiceService");
    }

    #[test]
    fn shorten_nested_generics() {
        assert_eq!(
            shorten_type_name("alloc::sync::Arc<dyn app::Repository<app::model::Invoice>>"),
            "Arc<dyn Repository<Invoice>>"
        );
    }

    #[test]
    fn shorten_no_path() {
        assert_eq!(shorten_type_name("u32"), "u32");
    }

    #[test]
    fn suggest_close_spelling() {
        let available = vec![
            "app::SqlRepository",
            "app::SqlServerLogger",
            "app::InvoiceService",
        ];

        let suggestions = suggest_similar("app::SqlRepositry", &available, 3);
        assert!(!suggestions.is_empty());
        assert_eq!(suggestions[0], "app::SqlRepository");
    }

    #[test]
    fn suggest_skips_exact_request() {
        let available = vec!["app::Logger"];
        assert!(suggest_similar("app::Logger", &available, 3).is_empty());
    }

    #[test]
    fn suggest_no_match() {
        let available = vec!["app::Database"];
        assert!(suggest_similar("XyzAbcDef", &available, 3).is_empty());
    }
}
