//! Cache keys derived from a domain and the set of card names.

use crate::cards::Card;

/// Joins the domain and the sorted card names. Also marks a stored key as a
/// cache entry: no other persisted key contains it.
pub const FINGERPRINT_SEPARATOR: char = '|';

/// Order-independent: any permutation of `cards` yields the same key.
pub fn fingerprint(domain: &str, cards: &[Card]) -> String {
    let names: Vec<&str> = cards.iter().map(|card| card.name.as_str()).collect();
    fingerprint_names(domain, &names)
}

pub fn fingerprint_names(domain: &str, names: &[&str]) -> String {
    let mut sorted = names.to_vec();
    sorted.sort_unstable();

    let separator = FINGERPRINT_SEPARATOR.to_string();
    let mut key = String::from(domain);
    key.push(FINGERPRINT_SEPARATOR);
    key.push_str(&sorted.join(&separator));
    key
}

pub fn is_fingerprint_key(key: &str) -> bool {
    key.contains(FINGERPRINT_SEPARATOR)
}

/// Splits a fingerprint back into its domain and card names.
pub fn split_fingerprint(key: &str) -> Option<(&str, Vec<&str>)> {
    let (domain, names) = key.split_once(FINGERPRINT_SEPARATOR)?;
    let names = if names.is_empty() {
        Vec::new()
    } else {
        names.split(FINGERPRINT_SEPARATOR).collect()
    };
    Some((domain, names))
}
