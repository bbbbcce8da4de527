use std::sync::LazyLock;

use regex::Regex;

use crate::core::AnswerError;

static ANSWER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#### (-?[0-9.,]+)").expect("answer pattern is valid"));

/// Extracts the terminal `#### <number>` answer, with thousands separators removed.
pub fn extract_answer(text: &str) -> Option<String> {
    let captures = ANSWER_RE.captures(text)?;
    Some(captures[1].trim().replace(',', ""))
}

/// Compares the answers of a candidate and a reference solution as strings.
///
/// `6` and `6.0` are different answers. A reference without an answer
/// marker is a corpus bug and is reported as an error.
pub fn is_correct(candidate: &str, reference: &str) -> Result<bool, AnswerError> {
    let expected = extract_answer(reference).ok_or_else(|| AnswerError::MissingReferenceAnswer {
        excerpt: excerpt(reference),
    })?;
    Ok(extract_answer(candidate).as_deref() == Some(expected.as_str()))
}

/// Cuts `text` right after the first complete answer marker.
pub fn truncate_at_first_answer(text: &str) -> Option<&str> {
    ANSWER_RE.find(text).map(|m| &text[..m.end()])
}

fn excerpt(text: &str) -> String {
    const MAX_CHARS: usize = 80;
    let tail: Vec<char> = text.chars().rev().take(MAX_CHARS).collect();
    tail.into_iter().rev().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
