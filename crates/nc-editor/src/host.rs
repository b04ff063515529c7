//! The slice of the host graph editor the comment plugin consumes.
//!
//! The plugin never talks to a DOM or a renderer directly. It reads node
//! geometry and asks for node moves through [`NodeHost`], and it manages the
//! visual elements of comments through [`RenderSurface`].

use nc_core::{Comment, CommentId, NodeId, Point, Rect, Size};

/// Position and declared size of a node view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeView {
    pub position: Point,
    pub size: Size,
}

impl NodeView {
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

pub trait NodeHost {
    /// Ids of all rendered node views, in view iteration order.
    fn node_ids(&self) -> Vec<NodeId>;

    fn node_view(&self, id: NodeId) -> Option<NodeView>;

    /// Move a node to `to`. Returns the previous position, or `None` when the
    /// node does not exist.
    ///
    /// The plugin dispatches the resulting `NodeTranslated` event itself; an
    /// implementation must not feed it back through `handle_event`.
    fn translate_node(&mut self, id: NodeId, to: Point) -> Option<Point>;

    /// Current canvas zoom factor (1.0 = unscaled).
    fn zoom(&self) -> f64 {
        1.0
    }
}

/// Where a comment's visual element goes in the stacking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// On top of everything.
    Front,
    /// Behind everything, nodes included.
    Back,
    /// Directly above the given node's element.
    After(NodeId),
}

pub trait RenderSurface {
    fn attach(&mut self, comment: &Comment);

    fn detach(&mut self, id: CommentId);

    fn reorder(&mut self, id: CommentId, placement: Placement);

    /// Re-render a comment after its text, position, size or selection changed.
    fn render(&mut self, comment: &Comment, scale: f64);

    /// Rendered extents of a comment's text. The default is a fixed-advance
    /// estimate for surfaces without text metrics.
    fn measure_text(&self, text: &str) -> Size {
        const ADVANCE: f64 = 8.0;
        const LINE_HEIGHT: f64 = 18.0;
        let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let lines = text.lines().count().max(1);
        Size::new(longest as f64 * ADVANCE, lines as f64 * LINE_HEIGHT)
    }

    /// Ask the user for new text. `None` means cancelled, which is also the
    /// default for surfaces that cannot prompt.
    fn prompt(&mut self, _title: &str, _initial: &str) -> Option<String> {
        None
    }
}

/// Everything the plugin needs from its host.
pub trait Host: NodeHost + RenderSurface {}

impl<T: NodeHost + RenderSurface + ?Sized> Host for T {}
