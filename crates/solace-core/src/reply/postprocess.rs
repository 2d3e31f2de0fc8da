//! Reply post-processing applied to every outgoing reply.
//!
//! Models lean hard on dashes and bullets; the personas this engine
//! voices should not. Dash and bullet characters become spaces, runs of
//! horizontal whitespace collapse, and spaces hugging a newline are
//! dropped so paragraph breaks survive intact.

use std::sync::LazyLock;

use regex::Regex;

static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

static NEWLINE_PAD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" ?\n ?").unwrap());

/// Scrub dash/bullet characters and normalize whitespace.
pub fn postprocess_reply(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let mut cleaned = text.to_string();
    for ch in ['-', '\u{2013}', '\u{2014}', '\u{2022}'] {
        cleaned = cleaned.replace(ch, " ");
    }
    let cleaned = SPACE_RUN_RE.replace_all(&cleaned, " ");
    let cleaned = NEWLINE_PAD_RE.replace_all(&cleaned, "\n");
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_dashes_and_bullets() {
        let out = postprocess_reply("well - I kept it\u{2014}always \u{2022} every day");
        assert_eq!(out, "well I kept it always every day");
    }

    #[test]
    fn test_collapses_spaces_and_tabs() {
        let out = postprocess_reply("you  know\tI   do");
        assert_eq!(out, "you know I do");
    }

    #[test]
    fn test_keeps_newlines_without_padding() {
        let out = postprocess_reply("first line \n  second line");
        assert_eq!(out, "first line\nsecond line");
    }

    #[test]
    fn test_en_dash_becomes_space() {
        let out = postprocess_reply("1998\u{2013}2004");
        assert_eq!(out, "1998 2004");
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert_eq!(postprocess_reply("   \n  "), "");
        assert_eq!(postprocess_reply(""), "");
    }

    #[test]
    fn test_bullet_list_flattens_cleanly() {
        let out = postprocess_reply("\u{2022} one\n\u{2022} two");
        assert_eq!(out, "one\ntwo");
    }
}
