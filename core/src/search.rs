//! Query normalisation and name filtering.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::types::Friend;

/// Remove every whitespace character from `query`, not only the edges.
pub fn normalize_query(query: &str) -> String {
    query.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Friends whose name contains the normalised `query`, in input order.
///
/// An empty (or all-whitespace) query returns `friends` unchanged. Matching
/// ignores case, diacritics and full-width forms (see `fold`).
pub fn search(query: &str, friends: &[Friend]) -> Vec<Friend> {
    let keyword = normalize_query(query);
    if keyword.is_empty() {
        return friends.to_vec();
    }

    let keyword = fold(&keyword);
    friends
        .iter()
        .filter(|friend| fold(&friend.name).contains(&keyword))
        .cloned()
        .collect()
}

/// NFKD decomposition without combining marks, lowercased.
///
/// `Café` folds to `cafe` and full-width `ＡＭＹ` to `amy`.
fn fold(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
