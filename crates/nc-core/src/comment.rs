//! Comment entities: free-floating inline notes and node-enclosing frames.
//!
//! A [`Comment`] carries the state shared by both kinds (identity, text,
//! position, links, selection, drag snapshot) and a [`CommentKind`] tag with
//! the per-kind geometry. Comments never hold a reference to the host editor;
//! anything that needs node geometry receives it as an argument.
//!
//! Only the comment stores which nodes it links to. Nodes have no back-pointer,
//! so "which comments follow node N" is a scan filtered by [`Comment::linked_to`].

use crate::config::CommentConfig;
use crate::geometry::{self, Point, Rect, Size, bounding_box};
use crate::id::{CommentId, NodeId};
use crate::record::{CommentRecord, CommentType};
use smallvec::SmallVec;

/// Node ids a comment is attached to, in link order.
pub type Links = SmallVec<[NodeId; 4]>;

/// A point-anchored note. Links to zero or one node.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineComment {
    /// Rendered size, measured from the text after every update.
    pub size: Size,
}

/// A rectangle enclosing its linked nodes.
///
/// Width and height are derived: after every re-link they equal the margin
/// expanded bounding box of the linked nodes, or the configured default size
/// when nothing is linked.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameComment {
    pub width: f64,
    pub height: f64,
}

impl FrameComment {
    pub fn rect(&self, origin: Point) -> Rect {
        Rect::from_origin_size(origin, Size::new(self.width, self.height))
    }

    /// Apply the size derived from `members` and return the translation that
    /// moves a frame at `origin` onto the bounding-box origin.
    ///
    /// An empty member list resets the size and returns a zero translation.
    pub fn fit<I>(&mut self, origin: Point, members: I, config: &CommentConfig) -> (f64, f64)
    where
        I: IntoIterator<Item = Rect>,
    {
        match bounding_box(members, config.frame_margin) {
            Some(bbox) => {
                self.width = bbox.width;
                self.height = bbox.height;
                (bbox.left() - origin.x, bbox.top() - origin.y)
            }
            None => {
                self.width = config.frame_default_size.width;
                self.height = config.frame_default_size.height;
                (0.0, 0.0)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommentKind {
    Inline(InlineComment),
    Frame(FrameComment),
}

#[derive(Debug, Clone)]
pub struct Comment {
    id: CommentId,
    pub text: String,
    pub position: Point,
    links: Links,
    selected: bool,
    /// Pointer position at the previous drag step; `Some` while dragging.
    drag_pointer: Option<Point>,
    pub kind: CommentKind,
}

impl Comment {
    fn new(text: impl Into<String>, position: Point, kind: CommentKind) -> Self {
        Self {
            id: CommentId::next(),
            text: text.into(),
            position,
            links: Links::new(),
            selected: false,
            drag_pointer: None,
            kind,
        }
    }

    pub fn inline(text: impl Into<String>, position: Point) -> Self {
        Self::new(
            text,
            position,
            CommentKind::Inline(InlineComment {
                size: Size::default(),
            }),
        )
    }

    pub fn frame(text: impl Into<String>, config: &CommentConfig) -> Self {
        Self::new(
            text,
            Point::default(),
            CommentKind::Frame(FrameComment {
                width: config.frame_default_size.width,
                height: config.frame_default_size.height,
            }),
        )
    }

    pub fn id(&self) -> CommentId {
        self.id
    }

    pub fn is_inline(&self) -> bool {
        matches!(self.kind, CommentKind::Inline(_))
    }

    pub fn is_frame(&self) -> bool {
        matches!(self.kind, CommentKind::Frame(_))
    }

    // ─── Links ───────────────────────────────────────────────────────────

    pub fn links(&self) -> &[NodeId] {
        &self.links
    }

    pub fn linked_to(&self, node: NodeId) -> bool {
        self.links.contains(&node)
    }

    /// Replace the link set in one step. Duplicates are dropped; an inline
    /// comment keeps only the first id.
    pub fn link_to<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = NodeId>,
    {
        let mut links = Links::new();
        for id in ids {
            if !links.contains(&id) {
                links.push(id);
            }
        }
        if self.is_inline() && links.len() > 1 {
            log::warn!(
                "inline {} can link one node, ignoring {} extra",
                self.id,
                links.len() - 1
            );
            links.truncate(1);
        }
        self.links = links;
    }

    // ─── Position ────────────────────────────────────────────────────────

    /// Shift the comment's position. Callers are responsible for announcing
    /// the move and re-rendering.
    pub fn apply_translation(&mut self, dx: f64, dy: f64) {
        self.position = self.position.translated(dx, dy);
    }

    /// Canvas rectangle currently covered by the comment.
    pub fn rect(&self) -> Rect {
        match &self.kind {
            CommentKind::Inline(inline) => Rect::from_origin_size(self.position, inline.size),
            CommentKind::Frame(frame) => frame.rect(self.position),
        }
    }

    /// Strict containment of `node` inside this frame. Always false for inline
    /// comments.
    pub fn contains(&self, node: &Rect) -> bool {
        self.is_frame() && geometry::contains(&self.rect(), node)
    }

    /// Overlap between this frame and `node`. Always false for inline comments.
    pub fn intersects(&self, node: &Rect) -> bool {
        self.is_frame() && geometry::intersects(&self.rect(), node)
    }

    /// Record the measured text extents of an inline comment, floored at the
    /// configured minimum width. No-op for frames.
    pub fn set_measured_size(&mut self, measured: Size, config: &CommentConfig) {
        if let CommentKind::Inline(inline) = &mut self.kind {
            inline.size = Size::new(measured.width.max(config.inline_min_width), measured.height);
        }
    }

    /// Render scale for the current zoom. A selected inline comment stays
    /// readable when the canvas is zoomed out.
    pub fn display_scale(&self, zoom: f64) -> f64 {
        if self.selected && self.is_inline() && zoom > 0.0 {
            (1.0 / zoom).max(1.0)
        } else {
            1.0
        }
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select(&mut self) {
        self.selected = true;
    }

    pub fn unselect(&mut self) {
        self.selected = false;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    // ─── Drag lifecycle ──────────────────────────────────────────────────

    pub fn on_pick_start(&mut self, pointer: Point) {
        self.drag_pointer = Some(pointer);
    }

    /// Delta since the previous pointer sample, or `None` outside a drag.
    pub fn on_pointer_move(&mut self, pointer: Point) -> Option<(f64, f64)> {
        let previous = self.drag_pointer.replace(pointer)?;
        Some((pointer.x - previous.x, pointer.y - previous.y))
    }

    /// End the drag. Returns whether a drag was in progress.
    pub fn on_drop(&mut self) -> bool {
        self.drag_pointer.take().is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_pointer.is_some()
    }

    /// Release the comment. Consuming `self` makes a second release impossible.
    pub fn destroy(mut self) {
        if self.drag_pointer.take().is_some() {
            log::debug!("{} destroyed mid-drag", self.id);
        }
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn to_record(&self) -> CommentRecord {
        CommentRecord {
            text: self.text.clone(),
            position: [self.position.x, self.position.y],
            kind: match self.kind {
                CommentKind::Inline(_) => CommentType::Inline,
                CommentKind::Frame(_) => CommentType::Frame,
            },
            links: self.links.to_vec(),
        }
    }
}
