//! Per-viewer message filtering.
//!
//! A message is hidden only when it is a private message and the viewer is
//! neither its sender nor its recipient. The status clause is redundant
//! (status is never private) but kept for a faithful reading of the rule.

use crate::message::{Message, MessageKind};

/// Whether `viewer` may see `message`.
pub fn is_visible_to(message: &Message, viewer: &str) -> bool {
    message.to.as_str() == viewer
        || message.kind != MessageKind::PrivateMessage
        || message.kind == MessageKind::Status
        || message.from.as_str() == viewer
}

/// Filter `messages` for `viewer`, preserving insertion order.
///
/// `limit` truncates the filtered sequence to its first `limit` entries;
/// `None` means no truncation.
pub fn visible_messages(
    viewer: &str,
    messages: Vec<Message>,
    limit: Option<usize>,
) -> Vec<Message> {
    let filtered = messages
        .into_iter()
        .filter(|message| is_visible_to(message, viewer));
    match limit {
        Some(limit) => filtered.take(limit).collect(),
        None => filtered.collect(),
    }
}
