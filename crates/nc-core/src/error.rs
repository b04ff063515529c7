use crate::id::{CommentId, NodeId};

/// Failures surfaced to callers of the comment API.
///
/// Lookup failures are programming errors on the caller's side: reactions to
/// host events never produce them, they skip absent comments and nodes.
#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error("comment not found: {0}")]
    UnknownComment(CommentId),
    #[error("node not found: {0}")]
    UnknownNode(NodeId),
    #[error("invalid comment json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("msgpack encode failed: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("msgpack decode failed: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}
