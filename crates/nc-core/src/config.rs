//! Tunables for comment geometry and sync behaviour.

use crate::error::CommentError;
use crate::geometry::{Margin, Size};
use serde::{Deserialize, Serialize};

/// Configuration consumed by the comment model and the plugin.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentConfig {
    /// Padding around the nodes a frame encloses. Default: top 50, others 20.
    /// The taller top edge leaves room for the frame's title text.
    pub frame_margin: Margin,

    /// Size of a frame that links no nodes. Default: **100×100**.
    pub frame_default_size: Size,

    /// Inline comments never render narrower than this. Default: **80**.
    pub inline_min_width: f64,

    /// Hold off frame resizes while a linked node is held by the pointer,
    /// re-fitting only when it is dropped. Without this a frame follows the
    /// held node and the node can never be dragged out. Default: **true**.
    pub defer_frame_resize_while_picked: bool,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            frame_margin: Margin::new(50.0, 20.0, 20.0, 20.0),
            frame_default_size: Size::new(100.0, 100.0),
            inline_min_width: 80.0,
            defer_frame_resize_while_picked: true,
        }
    }
}

impl CommentConfig {
    /// Parse a config from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, CommentError> {
        Ok(serde_json::from_str(json)?)
    }
}
