//! Node key generation
//!
//! Keys are derived from labels and made unique within a version by a
//! numeric suffix: `planner`, `planner-2`, `planner-3`, ...

/// Key used when a label produces an empty slug
pub const DEFAULT_KEY: &str = "node";

/// Lowercases a label and keeps only ASCII letters, digits and dashes.
///
/// Spaces and underscores become dashes. Each `--` pair is folded once, so runs
/// of three or four dashes leave two.
pub fn slugify(input: &str) -> String {
    let slug: String = input
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            'a'..='z' | '0'..='9' => Some(c),
            ' ' | '_' | '-' => Some('-'),
            _ => None,
        })
        .collect();

    slug.trim_matches('-').replace("--", "-")
}

/// Candidate keys for a label, in the order they should be tried
pub fn candidate_keys(label: &str) -> impl Iterator<Item = String> {
    let mut base = slugify(label);
    if base.is_empty() {
        base = DEFAULT_KEY.to_string();
    }

    std::iter::once(base.clone()).chain((2u32..).map(move |n| format!("{}-{}", base, n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("LLM Core"), "llm-core");
        assert_eq!(slugify("  Knowledge_Base  "), "knowledge-base");
        assert_eq!(slugify("a - b"), "a--b");
        assert_eq!(slugify("a -- b"), "a--b");
        assert_eq!(slugify("a--b"), "a-b");
        assert_eq!(slugify("--edge--"), "edge");
        assert_eq!(slugify("Résumé #1"), "rsum-1");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_candidate_keys() {
        let keys: Vec<_> = candidate_keys("Planner").take(3).collect();
        assert_eq!(keys, vec!["planner", "planner-2", "planner-3"]);
    }

    #[test]
    fn test_candidate_keys_for_empty_slug() {
        let keys: Vec<_> = candidate_keys("???").take(2).collect();
        assert_eq!(keys, vec!["node", "node-2"]);
    }
}
