//! Search-term planning from raw product names.

/// Short connective words that carry no search signal.
const STOP_WORDS: &[&str] =
    &["de", "da", "do", "das", "dos", "e", "ou", "com", "para", "em", "um", "uma"];

/// Longest significant-token prefix used for the first candidate.
const MAX_SIGNIFICANT: usize = 4;

/// Derives the ordered list of search terms to try for a product name.
///
/// The first candidate keeps only significant tokens (longer than two
/// characters, not a stop word), truncated to four. Short names (five tokens
/// or fewer) also get the full name appended, since trimming can lose
/// meaning there. Returns an empty list only for empty/whitespace input.
pub fn plan_terms(product_name: &str) -> Vec<String> {
    let name = product_name.trim();
    if name.is_empty() {
        return Vec::new();
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    let significant: Vec<&str> = words
        .iter()
        .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(&w.to_lowercase().as_str()))
        .copied()
        .collect();

    let mut terms = Vec::new();

    if !significant.is_empty() {
        terms.push(significant[..significant.len().min(MAX_SIGNIFICANT)].join(" "));
    }

    if words.len() <= 5 {
        terms.push(name.to_string());
    }

    // Names made entirely of stop words still get one attempt.
    if terms.is_empty() {
        terms.push(name.to_string());
    }

    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_terms_filters_stop_words() {
        let terms = plan_terms("Máquina de Café Expresso");
        assert_eq!(terms[0], "Máquina Café Expresso");
    }

    #[test]
    fn test_plan_terms_truncates_to_four_tokens() {
        let terms = plan_terms("Frigorífico Combinado Samsung RB34T602ESA Inox 340L No Frost");
        assert_eq!(terms[0], "Frigorífico Combinado Samsung RB34T602ESA");
    }

    #[test]
    fn test_plan_terms_short_name_keeps_original_last() {
        let terms = plan_terms("Varinha Mágica Bosch");
        assert_eq!(terms.last().unwrap(), "Varinha Mágica Bosch");
        assert_eq!(terms.len(), 2);
    }

    #[test]
    fn test_plan_terms_long_name_drops_original() {
        let terms = plan_terms("Frigorífico Combinado Samsung RB34T602ESA Inox 340L");
        assert_eq!(terms.len(), 1);
    }

    #[test]
    fn test_plan_terms_all_stop_words_falls_back_to_name() {
        assert_eq!(plan_terms("de da do"), vec!["de da do".to_string()]);
        // Longer than five tokens, still a single fallback candidate.
        assert_eq!(
            plan_terms("de da do das dos e ou"),
            vec!["de da do das dos e ou".to_string()]
        );
    }

    #[test]
    fn test_plan_terms_short_tokens_ignored() {
        let terms = plan_terms("TV LG 55");
        // Every token is two characters or fewer; only the full name remains.
        assert_eq!(terms, vec!["TV LG 55".to_string()]);
    }

    #[test]
    fn test_plan_terms_empty_input() {
        assert!(plan_terms("").is_empty());
        assert!(plan_terms("   ").is_empty());
    }

    #[test]
    fn test_plan_terms_order_specific_first() {
        let terms = plan_terms("Auscultadores Sony com Cancelamento Ruído");
        assert_eq!(terms[0], "Auscultadores Sony Cancelamento Ruído");
        assert_eq!(terms[1], "Auscultadores Sony com Cancelamento Ruído");
    }
}
