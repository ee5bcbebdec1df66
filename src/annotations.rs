//! System-annotation filtering.
//!
//! The generator sometimes leaks bracketed internal notes of the form
//! `【tag】free text…` into a reply. Notes whose tag name matches the
//! allow-list of internal terms are deleted wholesale; any other `【…】`
//! text is user content and stays byte-for-byte.
//!
//! An opening `【` with no matching `】` is never touched. A truncated
//! annotation at the tail of a cut-off reply is itself the signal that
//! generation stopped mid-stream, and the surrounding content still has to
//! reach the user.

use crate::scanner::{self, TagKind};

/// Tag-name terms identifying internal/system annotations.
///
/// inner-voice, thought-chain, thinking, system, directive, hint, buffer,
/// internal, debug, log.
const INTERNAL_TERMS: [&str; 10] = [
    "心声", "思维链", "思考", "系统", "指令", "提示", "缓冲", "内部", "调试", "日志",
];

fn is_internal(name: &str) -> bool {
    INTERNAL_TERMS.iter().any(|term| name.contains(term))
}

/// Delete every fully-closed annotation with an allow-listed tag name.
///
/// Idempotent: removed spans are gone and kept spans are unchanged, so a
/// second pass makes the same decisions on what remains.
pub fn filter(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for tag in scanner::scan_annotations(text) {
        let TagKind::Annotation { name, .. } = &tag.kind else {
            continue;
        };
        if is_internal(&text[name.clone()]) {
            out.push_str(&text[cursor..tag.span.start]);
            cursor = tag.span.end;
        }
    }

    out.push_str(&text[cursor..]);
    out
}
