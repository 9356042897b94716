//! Constraint classifier
//!
//! Maps the raw tokens of a `{...}` block onto a [`ConstraintSet`]. Unknown
//! tokens are kept in `other`, never rejected.

use crate::core::chumsky_utils::split_items;
use crate::model::ConstraintSet;

/// Spellings that map onto a canonical flag
const SYNONYMS: [(&str, &str); 12] = [
    ("sealed", "final"),
    ("const", "final"),
    ("readonly", "final"),
    ("notnull", "required"),
    ("nonnull", "required"),
    ("key", "pk"),
    ("id", "identity"),
    ("computed", "generated"),
    ("counter", "identity"),
    ("serial", "identity"),
    ("autoincrement", "identity"),
    ("auto_increment", "identity"),
];

/// Split the body of a constraint block into tokens
///
/// Returns `None` if the body contains stray braces.
pub fn tokenize(block: &str) -> Option<Vec<String>> {
    split_items(block, ",{}")
}

/// Classify constraint tokens into a normalized set
pub fn classify<S: AsRef<str>>(tokens: &[S]) -> ConstraintSet {
    let mut set = ConstraintSet::new();
    for token in tokens {
        apply_token(&mut set, token.as_ref().trim());
    }
    set
}

fn canonical(token: &str) -> &str {
    SYNONYMS
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, flag)| *flag)
        .unwrap_or(token)
}

fn apply_token(set: &mut ConstraintSet, raw: &str) {
    if raw.is_empty() {
        return;
    }
    let lower = raw.to_lowercase();

    if let Some((key, payload)) = raw.split_once(':') {
        let payload = payload.trim();
        let applied = match key.trim().to_lowercase().as_str() {
            "fk" if !payload.is_empty() => {
                set.fk = true;
                set.fk_target = Some(payload.to_string());
                true
            }
            "length" => payload
                .parse::<u32>()
                .map(|length| set.length = Some(length))
                .is_ok(),
            "size" => parse_size(payload)
                .map(|size| set.size = Some(size))
                .is_some(),
            "format" if !payload.is_empty() => {
                set.format = Some(payload.to_string());
                true
            }
            _ => false,
        };
        if !applied {
            set.other.insert(raw.to_string());
        }
        return;
    }

    match canonical(&lower) {
        "static" => set.is_static = true,
        "abstract" => set.is_abstract = true,
        "virtual" => set.is_virtual = true,
        "final" => set.is_final = true,
        "required" => set.required = true,
        "unique" => set.unique = true,
        "pk" => set.pk = true,
        "identity" => set.identity = true,
        "generated" => set.generated = true,
        "lob" => set.lob = true,
        "fk" => set.fk = true,
        _ => {
            set.other.insert(raw.to_string());
        }
    }
}

/// `p:s` or a lone `p` with scale 0
fn parse_size(payload: &str) -> Option<(u32, u32)> {
    match payload.split_once(':') {
        Some((precision, scale)) => Some((
            precision.trim().parse().ok()?,
            scale.trim().parse().ok()?,
        )),
        None => Some((payload.parse().ok()?, 0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_flags() {
        let set = classify(&[
            "static", "abstract", "virtual", "final", "required", "unique", "pk", "identity",
            "generated", "lob",
        ]);
        assert!(set.is_static && set.is_abstract && set.is_virtual && set.is_final);
        assert!(set.required && set.unique && set.pk && set.identity);
        assert!(set.generated && set.lob);
        assert!(set.other.is_empty());
    }

    #[test]
    fn test_synonyms() {
        let set = classify(&["sealed"]);
        assert!(set.is_final);
        assert!(classify(&["const"]).is_final);
        assert!(classify(&["readonly"]).is_final);
        assert!(classify(&["notnull"]).required);
        assert!(classify(&["NonNull"]).required);
        assert!(classify(&["key"]).pk);
        assert!(!classify(&["key"]).identity);
        assert!(classify(&["id"]).identity);
        assert!(!classify(&["id"]).pk);
        assert!(classify(&["computed"]).generated);
        assert!(classify(&["counter"]).identity);
        assert!(classify(&["serial"]).identity);
        assert!(classify(&["auto_increment"]).identity);
    }

    #[test]
    fn test_foreign_key() {
        let set = classify(&["fk:Order"]);
        assert!(set.fk);
        assert_eq!(set.fk_target.as_deref(), Some("Order"));

        let bare = classify(&["fk"]);
        assert!(bare.fk);
        assert_eq!(bare.fk_target, None);
    }

    #[test]
    fn test_structured_payloads() {
        let set = classify(&["length:80", "size:10:2", "format:yyyy-MM-dd"]);
        assert_eq!(set.length, Some(80));
        assert_eq!(set.size, Some((10, 2)));
        assert_eq!(set.format.as_deref(), Some("yyyy-MM-dd"));
        assert_eq!(classify(&["size:12"]).size, Some((12, 0)));
    }

    #[test]
    fn test_unknown_tokens_are_kept() {
        let set = classify(&["transient", "length:abc", "size:a:b", "fk:"]);
        assert_eq!(set.length, None);
        assert_eq!(set.size, None);
        assert!(!set.fk);
        let other: Vec<&str> = set.other.iter().map(String::as_str).collect();
        assert_eq!(other, vec!["fk:", "length:abc", "size:a:b", "transient"]);
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("pk, fk:Order ,, unique").unwrap(),
            vec!["pk", "fk:Order", "unique"]
        );
        assert!(tokenize("pk } x").is_none());
    }
}
