//! Pipeline orchestration.
//!
//! Composes the stages into one deterministic pass:
//! thinking extraction → directive stripping → annotation filtering →
//! segmentation. Pure and total: no I/O, no shared state, never panics,
//! safe to call concurrently on independent inputs.

use crate::config::ParserConfig;
use crate::scanner;
use crate::segment::{self, MessageFragment};
use crate::{annotations, directives, thinking};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The parsed form of one raw reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Trimmed private planning text, empty when the reply carried none.
    /// Routed to a diagnostic surface, never to the chat transcript.
    pub thinking: String,
    /// Display fragments in source order.
    pub fragments: Vec<MessageFragment>,
}

/// Parse one raw reply into thinking text and ordered display fragments.
///
/// Returns `None` when the raw text contains no `THINK`, `REPLY`, or `MSG`
/// tag at all; the caller then falls back to treating the whole text as a
/// single fragment.
pub fn parse_reply(raw: &str, config: &ParserConfig) -> Option<ParseResult> {
    let raw_tags = scanner::scan(raw);
    if !raw_tags.iter().any(|t| t.kind.is_block_marker()) {
        debug!("no block-level tags in reply, caller fallback applies");
        return None;
    }

    let (thinking, rest) = thinking::extract(raw);
    let stripped = directives::strip(&rest);
    let filtered = annotations::filter(&stripped);
    let fragments = segment::segment(&filtered, config);

    debug!(
        tag_count = raw_tags.len(),
        fragment_count = fragments.len(),
        has_thinking = !thinking.is_empty(),
        "reply parsed"
    );

    Some(ParseResult {
        thinking,
        fragments,
    })
}

/// [`parse_reply`] with the default configuration.
pub fn parse_reply_default(raw: &str) -> Option<ParseResult> {
    parse_reply(raw, &ParserConfig::default())
}
