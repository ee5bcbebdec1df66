//! Cadenza: bracket-tag reply parsing for paced chat display.
//!
//! Turns one raw AI-generated reply into an ordered sequence of display
//! fragments with per-fragment reveal delays, ready for a chat UI to show
//! progressively:
//!
//! Raw reply → thinking extraction → directive stripping →
//! annotation filtering → segmentation → [`ParseResult`]
//!
//! # Architecture
//!
//! Each stage is a pure function over text, built on one shared leaf:
//! - **Scanner**: one forward pass producing a flat, ordered tag list
//! - **Thinking extractor**: pulls the private `[THINK]…[/THINK]` block
//! - **Directive stripper**: deletes inline control directives and their
//!   payloads (song change, favorite, listen invitations, legacy markers)
//! - **Annotation filter**: drops fully-closed `【…】` internal notes
//! - **Segmenter**: splits `[MSGn]` blocks into fragments, recovers a
//!   truncated trailing block, and attaches `[WAIT]` delays
//!
//! The upstream generation stream can be cut off mid-tag; every stage
//! degrades to "preserve as text" or "drop as empty" rather than failing,
//! so the tail of a truncated reply still reaches the user.

pub mod annotations;
pub mod config;
pub mod directives;
pub mod error;
pub mod pipeline;
pub mod scanner;
pub mod segment;
pub mod thinking;

pub use config::ParserConfig;
pub use error::{ParseError, Result};
pub use pipeline::{parse_reply, parse_reply_default, ParseResult};
pub use segment::MessageFragment;
