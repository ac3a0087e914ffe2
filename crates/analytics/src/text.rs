//! Review text cleaning and tokenization.
//!
//! Cleaning is deliberately narrow: lowercase, then every character that is
//! not an ASCII letter or digit, one of a fixed set of accented Latin
//! letters, or whitespace is replaced by a space. Tokens are the remaining
//! whitespace-separated runs.
//!
//! ```
//! use analytics::{clean_text, tokenize};
//!
//! let cleaned = clean_text("  Très BON, l'équipe!! ");
//! assert_eq!(cleaned, "très bon  l équipe");
//! assert_eq!(tokenize(&cleaned), vec!["très", "bon", "l", "équipe"]);
//! ```

/// Accented Latin letters that survive cleaning.
pub const ACCENTED_LETTERS: &str = "àâçéèêëîïôûùüÿñæœ";

/// Lowercase `text`, blank out unsupported characters, and trim the edges.
///
/// Each dropped character becomes exactly one space, so interior runs of
/// spaces are possible; [`tokenize`] treats them as one delimiter.
pub fn clean_text(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|ch| if is_kept(ch) { ch } else { ' ' })
        .collect();
    cleaned.trim().to_string()
}

fn is_kept(ch: char) -> bool {
    ch.is_ascii_lowercase()
        || ch.is_ascii_digit()
        || ch.is_whitespace()
        || ACCENTED_LETTERS.contains(ch)
}

/// Split cleaned text on whitespace runs.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}
