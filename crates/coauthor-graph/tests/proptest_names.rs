//! Property-based tests for name normalization and identity.

use proptest::prelude::*;

use coauthor_graph::graph::AuthorRegistry;
use coauthor_graph::models::normalize;

/// A capitalized name token, optionally hyphenated.
fn arb_token() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,8}(-[A-Z][a-z]{1,8})?"
}

/// First name, up to two middle names, last name.
fn arb_parts() -> impl Strategy<Value = (String, Vec<String>, String)> {
    (arb_token(), proptest::collection::vec(arb_token(), 0..3), arb_token())
}

fn canonical(first: &str, middle: &[String], last: &str) -> String {
    let mut parts = vec![first.to_string()];
    parts.extend(middle.iter().cloned());
    parts.push(last.to_string());
    parts.join(" ")
}

proptest! {
    /// "Last, First Middle" and "First Middle Last" share one canonical form.
    #[test]
    fn both_orders_normalize_alike((first, middle, last) in arb_parts()) {
        let expected = canonical(&first, &middle, &last);
        let given_first = normalize(&expected).unwrap();

        let rest = canonical(&first, &middle, "");
        let last_first = normalize(&format!("{last}, {}", rest.trim_end())).unwrap();

        prop_assert_eq!(&given_first, &expected);
        prop_assert_eq!(&last_first, &expected);
    }

    /// Extra whitespace never changes the canonical form.
    #[test]
    fn whitespace_is_collapsed((first, middle, last) in arb_parts(), pad in " {1,4}") {
        let expected = canonical(&first, &middle, &last);
        let padded = format!("{pad}{}{pad}", expected.replace(' ', &pad));
        prop_assert_eq!(normalize(&padded).unwrap(), expected);
    }

    /// Normalizing a canonical name is a no-op.
    #[test]
    fn normalize_is_idempotent(raw in "[A-Za-z ,.'-]{0,40}") {
        if let Ok(once) = normalize(&raw) {
            prop_assert_eq!(normalize(&once).unwrap(), once);
        }
    }

    /// Variants sharing a canonical form resolve to one author.
    #[test]
    fn registry_never_duplicates_canonical_key((first, middle, last) in arb_parts()) {
        let forward = canonical(&first, &middle, &last);
        let rest = canonical(&first, &middle, "");
        let reversed = format!("{last},  {}", rest.trim_end());

        let mut registry = AuthorRegistry::new();
        let a = registry.get_or_create(&forward).unwrap();
        let b = registry.get_or_create(&reversed).unwrap();

        prop_assert_eq!(a, b);
        prop_assert_eq!(registry.len(), 1);
    }
}
