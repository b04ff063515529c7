//! Shared selection of nodes and comments.
//!
//! The host owns a [`Selector`] for its node selection; [`SelectionSync`]
//! plugs the same selector into the comment plugin so that:
//!
//! - selecting a comment clears the previous selection unless the host is
//!   accumulating (e.g. Ctrl held);
//! - dragging the picked comment drags every other selected entity along;
//! - a frame does not drag a selected node on its own, since the selection
//!   move already does.

use crate::events::{CommentEvent, CommentListener, Flow, PluginCommand};
use nc_core::{CommentId, NodeId};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Node(NodeId),
    Comment(CommentId),
}

#[derive(Debug, Default)]
pub struct Selector {
    selected: Vec<Entity>,
    /// The entity the user grabbed last; its moves drive the others.
    picked: Option<Entity>,
    accumulating: bool,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle for the host and a [`SelectionSync`].
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn set_accumulating(&mut self, accumulating: bool) {
        self.accumulating = accumulating;
    }

    pub fn is_accumulating(&self) -> bool {
        self.accumulating
    }

    pub fn selected(&self) -> &[Entity] {
        &self.selected
    }

    pub fn is_selected(&self, entity: Entity) -> bool {
        self.selected.contains(&entity)
    }

    pub fn picked(&self) -> Option<Entity> {
        self.picked
    }

    /// Select a node from the host side and make it the picked entity.
    /// Without accumulation the other selected nodes are dropped; comments
    /// are unselected through the plugin.
    pub fn select_node(&mut self, id: NodeId) {
        if !self.accumulating {
            self.selected.retain(|e| matches!(e, Entity::Comment(_)));
        }
        self.add(Entity::Node(id));
        self.picked = Some(Entity::Node(id));
    }

    pub fn unselect_node(&mut self, id: NodeId) {
        self.remove(Entity::Node(id));
    }

    fn add(&mut self, entity: Entity) {
        if !self.selected.contains(&entity) {
            self.selected.push(entity);
        }
    }

    fn remove(&mut self, entity: Entity) {
        self.selected.retain(|e| *e != entity);
        if self.picked == Some(entity) {
            self.picked = None;
        }
    }
}

/// Listener keeping a [`Selector`] in step with comment selection.
#[derive(Debug, Clone)]
pub struct SelectionSync {
    selector: Rc<RefCell<Selector>>,
}

impl SelectionSync {
    pub fn new(selector: Rc<RefCell<Selector>>) -> Self {
        Self { selector }
    }
}

impl CommentListener for SelectionSync {
    fn on_event(&mut self, event: &CommentEvent, commands: &mut Vec<PluginCommand>) -> Flow {
        let mut selector = self.selector.borrow_mut();
        match event {
            CommentEvent::Selected { id } => {
                let entity = Entity::Comment(*id);
                if !selector.accumulating {
                    for other in &selector.selected {
                        if let Entity::Comment(other) = other
                            && other != id
                        {
                            commands.push(PluginCommand::Unselect(*other));
                        }
                    }
                    selector.selected.retain(|e| *e == entity);
                }
                selector.add(entity);
                selector.picked = Some(entity);
            }
            CommentEvent::Unselected { id } | CommentEvent::Removed { id } => {
                selector.remove(Entity::Comment(*id));
            }
            CommentEvent::LinkTranslate { link, .. } => {
                if selector.is_selected(Entity::Node(*link)) {
                    return Flow::Veto;
                }
            }
            CommentEvent::Translated { id, dx, dy, .. } => {
                let moved = Entity::Comment(*id);
                if selector.picked == Some(moved) {
                    for other in selector.selected.iter().filter(|e| **e != moved) {
                        commands.push(match *other {
                            Entity::Node(id) => PluginCommand::TranslateNode {
                                id,
                                dx: *dx,
                                dy: *dy,
                            },
                            Entity::Comment(id) => PluginCommand::TranslateComment {
                                id,
                                dx: *dx,
                                dy: *dy,
                            },
                        });
                    }
                }
            }
            CommentEvent::Created { .. } | CommentEvent::Edit { .. } => {}
        }
        Flow::Continue
    }
}
