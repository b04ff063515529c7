pub mod comment;
pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod id;
pub mod record;

pub use comment::{Comment, CommentKind, FrameComment, InlineComment, Links};
pub use config::CommentConfig;
pub use error::CommentError;
pub use geometry::{BoundingBox, Margin, Point, Rect, Size, bounding_box, contains, intersects};
pub use graph::{GraphNode, NodeGraph};
pub use id::{CommentId, NodeId};
pub use record::{CommentRecord, CommentType};
