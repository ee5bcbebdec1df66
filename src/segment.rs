//! Message segmentation and wait attachment.
//!
//! Splits the cleaned stream into ordered display fragments. Two phases:
//! closed `[MSGn]…[/MSGm]` blocks in textual order, then recovery of at
//! most one trailing unclosed block when the stream was cut off mid-tag.
//! Each fragment then picks up a reveal delay from a `[WAIT]` directive
//! found within a bounded lookahead window after its closing point.

use crate::config::ParserConfig;
use crate::scanner::{self, Tag, TagKind};
use serde::{Deserialize, Serialize};

/// One unit of chat content scheduled for sequential display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageFragment {
    /// Trimmed, non-empty display text.
    pub content: String,
    /// Delay in milliseconds before this fragment is revealed, counted
    /// from the end of the previous fragment's reveal.
    pub delay_ms: u64,
    /// False only for a trailing fragment recovered from a truncated
    /// block, and only in the last position.
    pub closed: bool,
}

/// Split `text` into ordered fragments with attached wait delays.
///
/// Returns an empty vector when `text` contains no `[MSGn]` opener at all;
/// the orchestrator turns that into an absent result.
pub fn segment(text: &str, config: &ParserConfig) -> Vec<MessageFragment> {
    let tags = scanner::scan(text);

    let mut fragments = Vec::new();
    // Source offset of each fragment's closing point, parallel to
    // `fragments`; the trailing fragment closes at end of stream.
    let mut closing_points = Vec::new();

    // Phase 1: closed blocks. An opener pairs with the next close tag in
    // textual order; ordinals are advisory and not required to match.
    let mut last_closed_end = 0;
    let mut idx = 0;
    while let Some(open_idx) = find_tag(&tags, idx, |k| matches!(k, TagKind::MsgOpen(_))) {
        let open = &tags[open_idx];
        let Some(close_idx) =
            find_tag(&tags, open_idx + 1, |k| matches!(k, TagKind::MsgClose(_)))
        else {
            break;
        };
        let close = &tags[close_idx];

        let content = text[open.span.end..close.span.start].trim();
        if !content.is_empty() {
            fragments.push(MessageFragment {
                content: content.to_owned(),
                delay_ms: 0,
                closed: true,
            });
            closing_points.push(close.span.end);
        }
        last_closed_end = close.span.end;
        idx = close_idx + 1;
    }

    // Phase 2: tail recovery. Anything after the last closed block that
    // starts with another opener is a block the stream cut off; its
    // content runs to end of stream since no close tag remains.
    if let Some(open_idx) = find_tag(&tags, 0, |k| matches!(k, TagKind::MsgOpen(_)))
        .filter(|_| last_closed_end < text.len())
    {
        let trailing_open = tags[open_idx..]
            .iter()
            .find(|t| matches!(t.kind, TagKind::MsgOpen(_)) && t.span.start >= last_closed_end);
        if let Some(open) = trailing_open {
            let content = text[open.span.end..].trim();
            if !content.is_empty() && !is_bare_wait(content) {
                fragments.push(MessageFragment {
                    content: content.to_owned(),
                    delay_ms: 0,
                    closed: false,
                });
                closing_points.push(text.len());
            }
        }
    }

    // Phase 3: wait attachment. Stray think markers that survived
    // extraction are zero-width noise and are looked past; any other tag
    // ends the window search, so a wait inside the next block never
    // leaks backwards.
    for (fragment, &point) in fragments.iter_mut().zip(&closing_points) {
        let next = tags
            .iter()
            .filter(|t| t.span.start >= point)
            .find(|t| !matches!(t.kind, TagKind::ThinkOpen | TagKind::ThinkClose));
        let Some(next) = next else {
            continue;
        };
        let TagKind::Wait(seconds) = &next.kind else {
            continue;
        };
        if next.span.start - point > config.wait_lookahead_bytes {
            continue;
        }
        fragment.delay_ms = match *seconds {
            Some(s) => (s * 1000.0).round() as u64,
            None => config.default_wait_ms,
        };
    }

    fragments
}

/// Index of the first tag at or after `from` whose kind matches.
fn find_tag(tags: &[Tag], from: usize, pred: impl Fn(&TagKind) -> bool) -> Option<usize> {
    tags[from..].iter().position(|t| pred(&t.kind)).map(|p| from + p)
}

/// True when `content` is nothing but a single wait directive.
fn is_bare_wait(content: &str) -> bool {
    let tags = scanner::scan(content);
    matches!(
        tags.as_slice(),
        [Tag {
            kind: TagKind::Wait(_),
            span,
        }] if *span == (0..content.len())
    )
}
