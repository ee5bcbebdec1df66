//! Inline control-directive stripping.
//!
//! Directives instruct a side effect (song change, favorite add,
//! invitation accept/reject) and carry no displayable content. This stage
//! deletes them — together with any payload text they own — and then
//! normalizes the whitespace their removal leaves behind. Legacy `[REPLYn]`
//! boundary markers are zero-width noise and go the same way.
//!
//! The stage is idempotent: its output contains no directive tags, so a
//! second run only re-applies the (stable) whitespace normalization.

use crate::scanner::{self, Tag, TagKind, SONG_TERMINATORS};

/// Remove every inline directive and legacy reply marker from `text`.
pub fn strip(text: &str) -> String {
    let tags = scanner::scan(text);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for tag in tags.iter().filter(|t| is_stripped(t)) {
        out.push_str(&text[cursor..tag.span.start]);
        cursor = tag.span.end;
    }
    out.push_str(&text[cursor..]);

    normalize_whitespace(&out)
}

fn is_stripped(tag: &Tag) -> bool {
    matches!(
        tag.kind,
        TagKind::AcceptInvite
            | TagKind::RejectInvite
            | TagKind::InviteListen { .. }
            | TagKind::ChangeSong { .. }
            | TagKind::AddFavorite { .. }
            | TagKind::ReplyOpen(_)
            | TagKind::ReplyClose(_)
    )
}

fn is_terminal_punct(c: char) -> bool {
    SONG_TERMINATORS.contains(&c)
}

/// Tidy whitespace around terminal punctuation.
///
/// A whitespace run immediately before `, ， 。 .` collapses to nothing; a
/// run immediately after one collapses to a single space; the whole text is
/// trimmed. Runs not adjacent to terminal punctuation are left alone, so
/// message layout (blank lines, indentation) inside blocks survives.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut iter = text.char_indices().peekable();

    while let Some((start, c)) = iter.next() {
        if !c.is_whitespace() {
            out.push(c);
            continue;
        }

        // Swallow the whole whitespace run.
        let mut end = start + c.len_utf8();
        while let Some(&(j, d)) = iter.peek() {
            if !d.is_whitespace() {
                break;
            }
            end = j + d.len_utf8();
            iter.next();
        }

        let next = text[end..].chars().next();
        if next.is_some_and(is_terminal_punct) {
            // Dropped entirely.
        } else if out.chars().next_back().is_some_and(is_terminal_punct) {
            out.push(' ');
        } else {
            out.push_str(&text[start..end]);
        }
    }

    out.trim().to_owned()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn song_directive_with_fullwidth_terminator_vanishes() {
        assert_eq!(strip("[CHANGE_SONG]稻香，这首歌很舒服"), "这首歌很舒服");
    }

    #[test]
    fn ascii_terminator_stays_behind() {
        assert_eq!(strip("[CHANGE_SONG]稻香,继续聊天"), ",继续聊天");
    }

    #[test]
    fn multiple_directives_in_one_reply() {
        assert_eq!(
            strip("我想为你[CHANGE_SONG]稻香，换个舒缓的，然后[ADD_FAVORITE_SONG]平凡之路，这是我最爱"),
            "我想为你换个舒缓的，然后这是我最爱"
        );
    }

    #[test]
    fn invite_markers_are_zero_width() {
        assert_eq!(strip("好呀[ACCEPT_LISTEN_INVITATION]一起听"), "好呀一起听");
        assert_eq!(strip("[REJECT_LISTEN_INVITATION]下次吧"), "下次吧");
    }

    #[test]
    fn invite_listen_takes_its_reason_text() {
        assert_eq!(strip("[INVITE_LISTEN]这首歌很适合现在[MSG1]来[/MSG1]"), "[MSG1]来[/MSG1]");
        assert_eq!(strip("[INVITE_LISTEN]一起听歌吧"), "");
    }

    #[test]
    fn legacy_reply_markers_are_noise() {
        assert_eq!(strip("[REPLY1]你好[/REPLY1]"), "你好");
    }

    #[test]
    fn message_and_wait_tags_are_untouched() {
        let text = "[MSG1]hi[/MSG1]\n[WAIT:1]\n[MSG2]there[/MSG2]";
        assert_eq!(strip(text), text);
    }

    #[test]
    fn unrecognized_brackets_pass_through() {
        assert_eq!(strip("keep [NOT_A_TAG] this"), "keep [NOT_A_TAG] this");
    }

    #[test]
    fn whitespace_before_terminal_punct_collapses() {
        assert_eq!(normalize_whitespace("好的 ，走吧"), "好的，走吧");
        assert_eq!(normalize_whitespace("ok  .next"), "ok.next");
    }

    #[test]
    fn whitespace_after_terminal_punct_becomes_one_space() {
        assert_eq!(normalize_whitespace("ok,   next"), "ok, next");
        assert_eq!(normalize_whitespace("好。\n\n然后"), "好。 然后");
    }

    #[test]
    fn interior_whitespace_away_from_punct_survives() {
        assert_eq!(normalize_whitespace("line one\n\nline two"), "line one\n\nline two");
    }

    #[test]
    fn normalization_is_idempotent() {
        for text in ["好的 ，走吧", "ok,   next", "a , ,b", "  padded  "] {
            let once = normalize_whitespace(text);
            assert_eq!(normalize_whitespace(&once), once, "input: {text:?}");
        }
    }

    #[test]
    fn strip_is_idempotent() {
        for text in [
            "[CHANGE_SONG]稻香，这首歌很舒服",
            "[CHANGE_SONG]稻香,继续聊天",
            "我想为你[CHANGE_SONG]稻香，换个舒缓的，然后[ADD_FAVORITE_SONG]平凡之路，这是我最爱",
            "[INVITE_LISTEN]一起听歌吧",
            "plain text with [MSG1]blocks[/MSG1]",
        ] {
            let once = strip(text);
            assert_eq!(strip(&once), once, "input: {text:?}");
        }
    }
}
