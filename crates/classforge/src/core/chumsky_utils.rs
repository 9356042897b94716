//! Shared chumsky combinators for the signature micro-grammar

use chumsky::prelude::*;

/// Parse a comma-separated list of trimmed items.
///
/// `forbidden` lists the characters that may not appear inside an item and must
/// contain `,`. Empty items are kept so callers can decide how to treat them.
pub fn comma_separated<'src>(
    forbidden: &'static str,
) -> impl Parser<'src, &'src str, Vec<String>> + Clone {
    let item = none_of(forbidden)
        .repeated()
        .to_slice()
        .map(|s: &str| s.trim().to_string());

    item.separated_by(just(','))
        .collect::<Vec<String>>()
        .then_ignore(end())
}

/// Split `input` into non-empty comma-separated items.
///
/// Returns `None` when an item contains one of the `forbidden` characters.
pub fn split_items(input: &str, forbidden: &'static str) -> Option<Vec<String>> {
    comma_separated(forbidden)
        .parse(input)
        .into_result()
        .ok()
        .map(|items| items.into_iter().filter(|s| !s.is_empty()).collect())
}
