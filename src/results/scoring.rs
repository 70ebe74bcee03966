use std::collections::HashMap;

/// Fixed exam-blueprint weights for the closed-book mastery score. Domains
/// outside this table do not contribute.
pub const DOMAIN_WEIGHTS: [(&str, f64); 5] = [
    ("cbc_scoping", 0.40),
    ("housing", 0.20),
    ("federal_regs", 0.1333),
    ("casp_statutes", 0.1333),
    ("identifying_standards", 0.1333),
];

pub fn percent(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (correct as f64 / total as f64) * 100.0
}

fn domain_weight(domain: &str) -> f64 {
    DOMAIN_WEIGHTS
        .iter()
        .find(|(name, _)| *name == domain)
        .map(|(_, w)| *w)
        .unwrap_or(0.0)
}

/// Psychometric mastery score: the per-domain percent correct, weighted by
/// the blueprint table and normalized by the weight actually answered.
/// Returns 0 when no answered question carries a weighted domain.
pub fn closed_book_mastery<'a>(graded: impl IntoIterator<Item = (Option<&'a str>, bool)>) -> f64 {
    let mut domain_total: HashMap<&str, usize> = HashMap::new();
    let mut domain_correct: HashMap<&str, usize> = HashMap::new();

    for (domain, correct) in graded {
        let Some(domain) = domain else { continue };
        *domain_total.entry(domain).or_default() += 1;
        if correct {
            *domain_correct.entry(domain).or_default() += 1;
        }
    }

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for (domain, total) in &domain_total {
        let weight = domain_weight(domain);
        if weight <= 0.0 {
            continue;
        }
        let correct = domain_correct.get(domain).copied().unwrap_or(0);
        weighted_sum += percent(correct, *total) * weight;
        total_weight += weight;
    }

    if total_weight <= 0.0 {
        return 0.0;
    }
    weighted_sum / total_weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_of_empty_submission_is_zero() {
        assert_eq!(percent(0, 0), 0.0);
    }

    #[test]
    fn percent_is_simple_ratio() {
        assert_eq!(percent(3, 4), 75.0);
        assert_eq!(percent(4, 4), 100.0);
    }

    #[test]
    fn mastery_without_domains_is_zero() {
        assert_eq!(closed_book_mastery([(None, true), (None, false)]), 0.0);
    }

    #[test]
    fn mastery_ignores_unweighted_domains() {
        assert_eq!(closed_book_mastery([(Some("made_up_domain"), true)]), 0.0);
    }

    #[test]
    fn single_domain_mastery_equals_domain_percent() {
        let score = closed_book_mastery([
            (Some("housing"), true),
            (Some("housing"), true),
            (Some("housing"), false),
            (Some("housing"), false),
        ]);
        assert!((score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn mastery_weights_domains_unevenly() {
        // cbc_scoping all correct (weight 0.40), housing all wrong (0.20):
        // (100 * 0.4 + 0 * 0.2) / 0.6
        let score = closed_book_mastery([
            (Some("cbc_scoping"), true),
            (Some("cbc_scoping"), true),
            (Some("housing"), false),
        ]);
        assert!((score - 100.0 * 0.4 / 0.6).abs() < 1e-9);
    }

    #[test]
    fn mastery_normalizes_over_answered_weight_only() {
        // Only one weighted domain answered, perfectly: full marks even
        // though other blueprint domains went unanswered.
        let score = closed_book_mastery([(Some("federal_regs"), true)]);
        assert!((score - 100.0).abs() < 1e-9);
    }
}
