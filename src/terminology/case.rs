/*!
 * Surface casing of replacements.
 *
 * The casing of the matched text decides how the target term is rendered.
 * This is a heuristic: idioms with irregular internal capitals are rendered
 * in their stored form, not reproduced letter by letter.
 */

use serde::Serialize;

/// Casing style of a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStyle {
    /// Every cased letter is uppercase
    AllUpper,
    /// Starts with an uppercase letter; later tokens may be capitalised or
    /// lowercase, and no token has a capital after its first letter
    Title,
    /// Every cased letter is lowercase
    Lower,
    /// Anything else, including text without cased letters
    Mixed,
}

fn is_cased(c: char) -> bool {
    c.is_uppercase() || c.is_lowercase()
}

impl CaseStyle {
    /// Classify the casing of `text`. A single capital letter counts as
    /// `AllUpper`.
    pub fn classify(text: &str) -> Self {
        let mut letters = text.chars().filter(|c| is_cased(*c)).peekable();
        if letters.peek().is_none() {
            return Self::Mixed;
        }

        let (mut upper, mut lower) = (0usize, 0usize);
        for c in letters {
            if c.is_uppercase() {
                upper += 1;
            } else {
                lower += 1;
            }
        }

        if lower == 0 {
            Self::AllUpper
        } else if upper == 0 {
            Self::Lower
        } else if is_title(text) {
            Self::Title
        } else {
            Self::Mixed
        }
    }
}

// Title and sentence case: the first letter is uppercase and no token has a
// capital after its first letter. "Chief of Staff" and "Critical incident"
// both qualify.
fn is_title(text: &str) -> bool {
    let starts_upper = text
        .chars()
        .find(|c| is_cased(*c))
        .is_some_and(char::is_uppercase);

    starts_upper
        && text.split_whitespace().all(|token| {
            token
                .chars()
                .filter(|c| is_cased(*c))
                .skip(1)
                .all(char::is_lowercase)
        })
}

/// Render `target_term` in the casing style of `matched_text`.
pub fn adapt(target_term: &str, matched_text: &str) -> String {
    match CaseStyle::classify(matched_text) {
        CaseStyle::AllUpper => target_term.to_uppercase(),
        CaseStyle::Title => title_case(target_term),
        CaseStyle::Lower | CaseStyle::Mixed => target_term.to_string(),
    }
}

/// Uppercase the first letter of every whitespace-separated token and
/// lowercase the others.
pub fn title_case(term: &str) -> String {
    let mut rendered = String::with_capacity(term.len());
    let mut seen_letter = false;
    for c in term.chars() {
        if c.is_whitespace() {
            seen_letter = false;
            rendered.push(c);
        } else if !is_cased(c) {
            rendered.push(c);
        } else if seen_letter {
            rendered.extend(c.to_lowercase());
        } else {
            rendered.extend(c.to_uppercase());
            seen_letter = true;
        }
    }
    rendered
}
