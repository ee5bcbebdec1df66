//! Private planning-block extraction.
//!
//! The generator may prefix a reply with one `[THINK]…[/THINK]` block of
//! planning text that is never shown in the chat transcript. This stage
//! pulls the first such block out of the stream; anything downstream only
//! ever sees the remainder.

use crate::scanner::{self, TagKind};

/// Extract the first `[THINK]…[/THINK]` block.
///
/// Returns the trimmed inner text and the stream with the whole block
/// removed. When no complete pair exists — including the truncated case of
/// an opener with no closer — the thinking text is empty and the stream
/// passes through unchanged.
pub fn extract(text: &str) -> (String, String) {
    let tags = scanner::scan(text);

    let open = tags.iter().find(|t| t.kind == TagKind::ThinkOpen);
    let Some(open) = open else {
        return (String::new(), text.to_owned());
    };

    let close = tags
        .iter()
        .find(|t| t.kind == TagKind::ThinkClose && t.span.start >= open.span.end);
    let Some(close) = close else {
        return (String::new(), text.to_owned());
    };

    let thinking = text[open.span.end..close.span.start].trim().to_owned();
    let mut rest = String::with_capacity(text.len());
    rest.push_str(&text[..open.span.start]);
    rest.push_str(&text[close.span.end..]);
    (thinking, rest)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn extracts_and_trims_first_block() {
        let (thinking, rest) = extract("[THINK] plan the reply [/THINK][MSG1]hi[/MSG1]");
        assert_eq!(thinking, "plan the reply");
        assert_eq!(rest, "[MSG1]hi[/MSG1]");
    }

    #[test]
    fn absent_block_yields_empty_thinking() {
        let (thinking, rest) = extract("[MSG1]hi[/MSG1]");
        assert_eq!(thinking, "");
        assert_eq!(rest, "[MSG1]hi[/MSG1]");
    }

    #[test]
    fn unterminated_opener_passes_through() {
        let text = "[THINK]cut off mid-plan";
        let (thinking, rest) = extract(text);
        assert_eq!(thinking, "");
        assert_eq!(rest, text);
    }

    #[test]
    fn only_first_pair_is_extracted() {
        let (thinking, rest) = extract("[THINK]a[/THINK]x[THINK]b[/THINK]");
        assert_eq!(thinking, "a");
        assert_eq!(rest, "x[THINK]b[/THINK]");
    }

    #[test]
    fn stray_closer_before_opener_is_ignored() {
        let text = "[/THINK]hello[THINK]late";
        let (thinking, rest) = extract(text);
        assert_eq!(thinking, "");
        assert_eq!(rest, text);
    }
}
