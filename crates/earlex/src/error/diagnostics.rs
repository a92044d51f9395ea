//! # Diagnostic Utilities
//!
//! Helpers for turning errors into readable reports:
//! - "Did you mean?" suggestions for misspelled names
//! - Source snippets with a caret under the offending column

use std::fmt::Write;

/// Suggest the closest candidate to `actual`, if any is similar enough
///
/// # Example
///
/// ```rust
/// use earlex::error::diagnostics::did_you_mean;
///
/// let known = ["identifier", "number", "operator"];
/// assert_eq!(did_you_mean("identifer", known), Some("identifier"));
/// assert_eq!(did_you_mean("zzz", known), None);
/// ```
pub fn did_you_mean<'a, I>(actual: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let actual_lower = actual.to_lowercase();
    let mut best_match: Option<(&'a str, f64)> = None;
    let threshold = 0.6;

    for candidate in candidates {
        let similarity = string_similarity(&actual_lower, &candidate.to_lowercase());
        if similarity < threshold {
            continue;
        }
        match best_match {
            Some((_, best)) if similarity <= best => {}
            _ => best_match = Some((candidate, similarity)),
        }
    }

    best_match.map(|(suggestion, _)| suggestion)
}

/// Extract line `line` (1-based) of `source`, without its terminator
#[must_use]
pub fn source_line(source: &str, line: u32) -> Option<&str> {
    let index = usize::try_from(line).ok()?.checked_sub(1)?;
    source
        .split('\n')
        .nth(index)
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
}

/// Format `message` followed by the source line and a caret under `column`
///
/// Falls back to the bare message when the position is outside `source`.
#[must_use]
pub fn render_with_snippet(message: &str, source: &str, line: u32, column: u32) -> String {
    let mut result = String::from(message);
    let Some(text) = source_line(source, line) else {
        return result;
    };

    let gutter = line.to_string();
    let pad = " ".repeat(gutter.len());
    let offset: String = text
        .chars()
        .take(column.saturating_sub(1) as usize)
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();

    // writing into a String cannot fail
    let _ = write!(result, "\n{pad} |\n{gutter} | {text}\n{pad} | {offset}^");
    result
}

/// Similarity in `[0, 1]` derived from the Levenshtein distance
fn string_similarity(s1: &str, s2: &str) -> f64 {
    if s1 == s2 {
        return 1.0;
    }
    if s1.is_empty() || s2.is_empty() {
        return 0.0;
    }

    let distance = levenshtein_distance(s1, s2);
    let max_len = s1.chars().count().max(s2.chars().count());
    1.0 - (distance as f64 / max_len as f64)
}

fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s2_chars: Vec<char> = s2.chars().collect();
    let mut previous: Vec<usize> = (0..=s2_chars.len()).collect();
    let mut current = vec![0; s2_chars.len() + 1];

    for (i, c1) in s1.chars().enumerate() {
        current[0] = i + 1;
        for (j, &c2) in s2_chars.iter().enumerate() {
            let cost = usize::from(c1 != c2);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[s2_chars.len()]
}
