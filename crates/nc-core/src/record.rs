//! Persisted comment format.
//!
//! Each comment is stored as `{ text, position: [x, y], type, links }`.
//! Identity is not persisted: importing a record always mints a new id.

use crate::error::CommentError;
use crate::id::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentType {
    Inline,
    Frame,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub text: String,
    pub position: [f64; 2],
    #[serde(rename = "type")]
    pub kind: CommentType,
    #[serde(default)]
    pub links: Vec<NodeId>,
}

pub fn records_to_json(records: &[CommentRecord]) -> Result<String, CommentError> {
    Ok(serde_json::to_string(records)?)
}

pub fn records_from_json(json: &str) -> Result<Vec<CommentRecord>, CommentError> {
    Ok(serde_json::from_str(json)?)
}

/// Compact MessagePack encoding (field names kept, so it stays self-describing).
pub fn records_to_msgpack(records: &[CommentRecord]) -> Result<Vec<u8>, CommentError> {
    Ok(rmp_serde::to_vec_named(records)?)
}

pub fn records_from_msgpack(bytes: &[u8]) -> Result<Vec<CommentRecord>, CommentError> {
    Ok(rmp_serde::from_slice(bytes)?)
}
