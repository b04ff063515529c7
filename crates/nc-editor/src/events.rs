//! Typed event bus between the host editor, the plugin and extensions.
//!
//! - [`HostEvent`]: what the host editor reports (node moved, dropped, removed…).
//! - [`CommentEvent`]: what the plugin announces after changing comments.
//! - [`CommentListener`]: extensions observing comment events. A listener can
//!   veto a [`CommentEvent::LinkTranslate`] and can queue follow-up
//!   [`PluginCommand`]s that the plugin runs once the notification completes.

use nc_core::{CommentId, Links, NodeId, Point};
use std::cell::RefCell;
use std::rc::Rc;

/// Events consumed from the host editor.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The pointer grabbed a node.
    NodePicked { id: NodeId },
    NodeTranslated {
        id: NodeId,
        position: Point,
        previous: Point,
    },
    /// A node drag ended (the node was dropped).
    NodeDragged { id: NodeId },
    NodeRemoved { id: NodeId },
    /// A node's element was re-stacked.
    Reordered { node: NodeId },
}

/// Notifications produced by the plugin.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentEvent {
    Created { id: CommentId },
    Removed { id: CommentId },
    Selected { id: CommentId },
    Unselected { id: CommentId },
    /// A comment moved. `sources` lists the nodes whose own movement caused it.
    Translated {
        id: CommentId,
        dx: f64,
        dy: f64,
        sources: Links,
    },
    /// A frame is about to drag `link` along with it. Cancellable.
    LinkTranslate { id: CommentId, link: NodeId },
    /// A text edit is about to be requested.
    Edit { id: CommentId },
}

/// A listener's verdict on an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Stop the event here. Only meaningful for `LinkTranslate`, where the
    /// propagation into that node is skipped.
    Veto,
}

/// Follow-up work a listener asks the plugin to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginCommand {
    TranslateComment { id: CommentId, dx: f64, dy: f64 },
    TranslateNode { id: NodeId, dx: f64, dy: f64 },
    Unselect(CommentId),
}

pub trait CommentListener {
    fn on_event(&mut self, event: &CommentEvent, commands: &mut Vec<PluginCommand>) -> Flow;
}

impl<F> CommentListener for F
where
    F: FnMut(&CommentEvent) -> Flow,
{
    fn on_event(&mut self, event: &CommentEvent, _commands: &mut Vec<PluginCommand>) -> Flow {
        self(event)
    }
}

/// Records every event into a shared log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<CommentEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CommentEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Number of recorded `Translated` events for `id`.
    pub fn translations_of(&self, id: CommentId) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, CommentEvent::Translated { id: t, .. } if *t == id))
            .count()
    }
}

impl CommentListener for EventLog {
    fn on_event(&mut self, event: &CommentEvent, _commands: &mut Vec<PluginCommand>) -> Flow {
        self.events.borrow_mut().push(event.clone());
        Flow::Continue
    }
}
