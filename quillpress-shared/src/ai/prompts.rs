/// Prompt text and reply parsing for the writing assistant

use crate::models::tag::{Tag, MAX_TAG_LENGTH};

/// Most tags returned by a suggestion
pub const MAX_SUGGESTED_TAGS: usize = 5;

pub const IMPROVE: &str = "You are an editor for a technical blog. Improve the clarity, grammar \
and flow of the article the user sends. Keep the author's meaning and voice. The input may \
contain HTML: keep the same tags and structure. Reply with the improved article only, without \
commentary.";

pub const SUMMARY: &str = "Summarize the article the user sends in two or three plain-text \
sentences suitable for an article preview. Ignore any HTML markup. Reply with the summary only.";

pub const SUGGEST_TITLE: &str = "Suggest one concise, engaging title for the article the user \
sends. Reply with the title only, on a single line, without quotes.";

pub const SUGGEST_TAGS: &str = "Suggest up to 5 short topic tags for the article the user sends. \
Reply with the tags only, as a single comma-separated line.";

/// Cleans a suggested title: first non-blank line, wrapping quotes removed
pub fn parse_title(reply: &str) -> String {
    let line = reply
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default();

    let line = line
        .strip_prefix("Title:")
        .or_else(|| line.strip_prefix("title:"))
        .unwrap_or(line)
        .trim();

    line.trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”' | '*'))
        .trim()
        .to_string()
}

/// Turns a tag reply into normalized tag names
///
/// Accepts comma- or newline-separated lists, strips list markers (`-`,
/// `*`, `1.`) and `#`, normalizes like stored tags, drops duplicates and
/// anything too long to store, and keeps at most [`MAX_SUGGESTED_TAGS`].
pub fn parse_tags(reply: &str) -> Vec<String> {
    let pieces = reply
        .split(|c: char| c == ',' || c == '\n')
        .map(strip_list_marker)
        .map(|piece| piece.trim_matches(|c: char| matches!(c, '#' | '"' | '\'' | '.' | '*')).to_string());

    Tag::normalize_names(pieces)
        .into_iter()
        .filter(|name| name.chars().count() <= MAX_TAG_LENGTH)
        .take(MAX_SUGGESTED_TAGS)
        .collect()
}

fn strip_list_marker(piece: &str) -> &str {
    let piece = piece.trim();

    if let Some(rest) = piece.strip_prefix("- ").or_else(|| piece.strip_prefix("* ")) {
        return rest;
    }

    // "1. rust" / "2) axum"
    let digits = piece.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &piece[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest;
        }
    }

    piece
}
