//! Bracket-tag scanner for raw reply text.
//!
//! Two explicit forward scans, one per bracket alphabet: [`scan`] yields
//! the square-bracket tags every content stage works from, and
//! [`scan_annotations`] yields the `【…】` spans that only the annotation
//! filter consumes. Each pass produces a flat, ordered, non-overlapping
//! list of [`Tag`] tokens, so no stage deals with duplicate or
//! overlapping matches — and annotation text can never hide a message
//! block or directive from the square-tag layers.
//!
//! The surface grammar is exact and case-sensitive; it is the contract
//! between the generation backend and this parser. Bracketed text that
//! matches none of the recognized forms is ordinary content, as is any
//! construct left unterminated by a cut-off reply stream.

use std::ops::Range;

/// One recognized bracket construct in the scanned text.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub kind: TagKind,
    /// Byte span of the whole construct, including any payload text it
    /// owns (song name, invite reason, annotation body).
    pub span: Range<usize>,
}

/// Closed taxonomy of recognized tags.
#[derive(Debug, Clone, PartialEq)]
pub enum TagKind {
    /// `[THINK]`
    ThinkOpen,
    /// `[/THINK]`
    ThinkClose,
    /// `[MSGn]` — the ordinal is advisory only.
    MsgOpen(u64),
    /// `[/MSGn]`
    MsgClose(u64),
    /// `[WAIT]` (no payload) or `[WAIT:seconds]`.
    Wait(Option<f64>),
    /// `[REPLYn]` — legacy boundary marker, stripped as noise.
    ReplyOpen(u64),
    /// `[/REPLYn]`
    ReplyClose(u64),
    /// `[ACCEPT_LISTEN_INVITATION]`
    AcceptInvite,
    /// `[REJECT_LISTEN_INVITATION]`
    RejectInvite,
    /// `[INVITE_LISTEN]` plus free reason text up to the next bracket.
    InviteListen {
        /// Byte span of the reason text.
        reason: Range<usize>,
    },
    /// `[CHANGE_SONG]` plus a song-name payload.
    ChangeSong {
        /// Byte span of the song name (terminator excluded).
        song: Range<usize>,
        /// The punctuation character that ended the payload, if any.
        terminator: Option<char>,
    },
    /// `[ADD_FAVORITE_SONG]` plus a song-name payload.
    AddFavorite {
        song: Range<usize>,
        terminator: Option<char>,
    },
    /// `【name】body…` — emitted by [`scan_annotations`] only, and only
    /// when the opening `【` has a matching `】`; a truncated annotation
    /// is ordinary content.
    Annotation {
        /// Byte span of the tag name between the brackets.
        name: Range<usize>,
        /// Byte span of the trailing body (up to the next `【` or end).
        body: Range<usize>,
    },
}

impl TagKind {
    /// True for the block-level kinds whose presence makes a reply
    /// parseable at all (`THINK`, `MSG`, legacy `REPLY`).
    pub fn is_block_marker(&self) -> bool {
        matches!(
            self,
            TagKind::ThinkOpen
                | TagKind::ThinkClose
                | TagKind::MsgOpen(_)
                | TagKind::MsgClose(_)
                | TagKind::ReplyOpen(_)
                | TagKind::ReplyClose(_)
        )
    }
}

/// Characters that terminate a song-name payload.
///
/// Fullwidth terminators are consumed with the directive; ASCII ones end
/// the payload but stay in the text (see the directive stripper).
pub(crate) const SONG_TERMINATORS: [char; 4] = [',', '，', '。', '.'];

fn is_fullwidth_terminator(c: char) -> bool {
    matches!(c, '，' | '。')
}

/// Scan `text` for square-bracket tags in source order.
///
/// This is the token stream the thinking extractor, directive stripper,
/// segmenter, and absent-result check all work from. `【…】` text has no
/// effect here, so a system annotation can never mask a message block or
/// directive from those stages.
pub fn scan(text: &str) -> Vec<Tag> {
    let mut tags = Vec::new();
    let mut i = 0;

    while let Some(off) = text[i..].find('[') {
        let at = i + off;
        match match_square_tag(text, at) {
            Some(tag) => {
                i = tag.span.end.max(at + 1);
                tags.push(tag);
            }
            // Not a recognized tag; step past the bracket.
            None => i = at + 1,
        }
    }

    tags
}

/// Scan `text` for `【name】body` annotations in source order.
///
/// Only the annotation filter consumes these. An annotation owns its
/// whole body up to the next `【` or end of stream; an opening `【` with
/// no matching `】` is ordinary content.
pub fn scan_annotations(text: &str) -> Vec<Tag> {
    let open_len = '【'.len_utf8();
    let mut tags = Vec::new();
    let mut i = 0;

    while let Some(off) = text[i..].find('【') {
        let at = i + off;
        match match_annotation(text, at) {
            Some(tag) => {
                i = tag.span.end.max(at + open_len);
                tags.push(tag);
            }
            None => i = at + open_len,
        }
    }

    tags
}

/// Try to match a square-bracket tag starting at `at` (which is `[`).
fn match_square_tag(text: &str, at: usize) -> Option<Tag> {
    let rest = &text[at..];

    // Fixed zero-width literals first.
    for (literal, kind) in [
        ("[THINK]", TagKind::ThinkOpen),
        ("[/THINK]", TagKind::ThinkClose),
        ("[ACCEPT_LISTEN_INVITATION]", TagKind::AcceptInvite),
        ("[REJECT_LISTEN_INVITATION]", TagKind::RejectInvite),
        ("[WAIT]", TagKind::Wait(None)),
    ] {
        if rest.starts_with(literal) {
            return Some(Tag {
                kind,
                span: at..at + literal.len(),
            });
        }
    }

    if rest.starts_with("[INVITE_LISTEN]") {
        let payload_start = at + "[INVITE_LISTEN]".len();
        let payload_end = next_bracket(text, payload_start);
        return Some(Tag {
            kind: TagKind::InviteListen {
                reason: payload_start..payload_end,
            },
            span: at..payload_end,
        });
    }

    for (literal, is_change) in [("[CHANGE_SONG]", true), ("[ADD_FAVORITE_SONG]", false)] {
        if rest.starts_with(literal) {
            return Some(match_song_directive(text, at, at + literal.len(), is_change));
        }
    }

    if rest.starts_with("[WAIT:") {
        let payload_start = at + "[WAIT:".len();
        let close = text[payload_start..].find(']')? + payload_start;
        let seconds = parse_seconds(&text[payload_start..close])?;
        return Some(Tag {
            kind: TagKind::Wait(Some(seconds)),
            span: at..close + 1,
        });
    }

    // Numbered forms: [MSGn] [/MSGn] [REPLYn] [/REPLYn].
    for (prefix, make) in [
        ("[MSG", TagKind::MsgOpen as fn(u64) -> TagKind),
        ("[/MSG", TagKind::MsgClose),
        ("[REPLY", TagKind::ReplyOpen),
        ("[/REPLY", TagKind::ReplyClose),
    ] {
        if rest.starts_with(prefix) {
            if let Some((ordinal, end)) = parse_ordinal_close(text, at + prefix.len()) {
                return Some(Tag {
                    kind: make(ordinal),
                    span: at..end,
                });
            }
        }
    }

    None
}

/// Match the digit run and closing `]` of a numbered tag.
///
/// Returns the ordinal and the byte offset just past the `]`. The
/// ordinal is advisory and nothing consumes its value, so any digit run
/// keeps the tag grammatically valid: a run too long for `u64` saturates
/// rather than demoting the tag to plain text.
fn parse_ordinal_close(text: &str, digits_start: usize) -> Option<(u64, usize)> {
    let rest = &text[digits_start..];
    let digits_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if digits_len == 0 {
        return None;
    }
    if !rest[digits_len..].starts_with(']') {
        return None;
    }
    let ordinal = rest[..digits_len].parse().unwrap_or(u64::MAX);
    Some((ordinal, digits_start + digits_len + 1))
}

/// Match the song-name payload of `[CHANGE_SONG]` / `[ADD_FAVORITE_SONG]`.
fn match_song_directive(text: &str, at: usize, payload_start: usize, is_change: bool) -> Tag {
    let mut payload_end = text.len();
    let mut terminator = None;
    let mut span_end = text.len();

    for (i, c) in text[payload_start..].char_indices() {
        let pos = payload_start + i;
        if SONG_TERMINATORS.contains(&c) {
            payload_end = pos;
            terminator = Some(c);
            // A fullwidth terminator is swallowed with the directive; an
            // ASCII one stays behind in the text.
            span_end = if is_fullwidth_terminator(c) {
                pos + c.len_utf8()
            } else {
                pos
            };
            break;
        }
        if c == '[' || c == '【' {
            payload_end = pos;
            span_end = pos;
            break;
        }
    }

    let song = payload_start..payload_end;
    let kind = if is_change {
        TagKind::ChangeSong { song, terminator }
    } else {
        TagKind::AddFavorite { song, terminator }
    };
    Tag {
        kind,
        span: at..span_end,
    }
}

/// Try to match a `【name】body` annotation starting at `at` (which is `【`).
///
/// The closing `】` must appear before the next `【`; otherwise the opener
/// is treated as ordinary content so a truncated annotation survives.
fn match_annotation(text: &str, at: usize) -> Option<Tag> {
    let open_len = '【'.len_utf8();
    let name_start = at + open_len;

    let hard_end = text[name_start..]
        .find('【')
        .map_or(text.len(), |o| name_start + o);

    let close = text[name_start..hard_end].find('】')? + name_start;
    let body_start = close + '】'.len_utf8();

    Some(Tag {
        kind: TagKind::Annotation {
            name: name_start..close,
            body: body_start..hard_end,
        },
        span: at..hard_end,
    })
}

/// Byte offset of the next `[` or `【` at or after `from`, or end of text.
fn next_bracket(text: &str, from: usize) -> usize {
    text[from..].find(['[', '【']).map_or(text.len(), |o| from + o)
}

/// Validate and parse the decimal seconds payload of `[WAIT:…]`.
///
/// Accepts digits with at most one `.`; rejects signs, exponents, and
/// anything else `f64::from_str` would otherwise tolerate.
fn parse_seconds(s: &str) -> Option<f64> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if s.chars().filter(|&c| c == '.').count() > 1 {
        return None;
    }
    s.parse().ok()
}
