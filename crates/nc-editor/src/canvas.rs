//! In-memory host: a [`NodeGraph`] plus a flat element stack.
//!
//! Used by tests and headless embedders. Comment elements are kept in the
//! same stack as node elements so stacking rules can be observed.

use crate::host::{NodeHost, NodeView, Placement, RenderSurface};
use nc_core::{Comment, CommentId, GraphNode, NodeGraph, NodeId, Point, Rect};
use std::collections::{HashMap, VecDeque};

/// One element in the stacking order, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Node(NodeId),
    Comment(CommentId),
}

/// Last rendered state of a comment.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedComment {
    pub text: String,
    pub rect: Rect,
    pub selected: bool,
    pub scale: f64,
}

#[derive(Debug)]
pub struct MemoryCanvas {
    pub graph: NodeGraph,
    layers: Vec<Layer>,
    rendered: HashMap<CommentId, RenderedComment>,
    zoom: f64,
    prompt_answers: VecDeque<Option<String>>,
}

impl Default for MemoryCanvas {
    fn default() -> Self {
        Self {
            graph: NodeGraph::new(),
            layers: Vec::new(),
            rendered: HashMap::new(),
            zoom: 1.0,
            prompt_answers: VecDeque::new(),
        }
    }
}

impl MemoryCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node on top of the stack. Re-adding an id replaces the node in
    /// place and keeps its layer.
    pub fn add_node(&mut self, node: GraphNode) {
        let id = node.id;
        if self.graph.add_node(node) {
            self.layers.push(Layer::Node(id));
        }
    }

    /// Remove a node and its layer. The caller reports the removal to the
    /// plugin.
    pub fn remove_node(&mut self, id: NodeId) -> Option<GraphNode> {
        self.layers.retain(|layer| *layer != Layer::Node(id));
        self.graph.remove_node(id)
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_index(&self, layer: Layer) -> Option<usize> {
        self.layers.iter().position(|l| *l == layer)
    }

    pub fn rendered(&self, id: CommentId) -> Option<&RenderedComment> {
        self.rendered.get(&id)
    }

    /// Queue the answer for the next `prompt` call. `None` cancels.
    pub fn answer_prompt(&mut self, answer: Option<String>) {
        self.prompt_answers.push_back(answer);
    }
}

impl NodeHost for MemoryCanvas {
    fn node_ids(&self) -> Vec<NodeId> {
        self.graph.node_ids().to_vec()
    }

    fn node_view(&self, id: NodeId) -> Option<NodeView> {
        self.graph.get(id).map(|node| NodeView {
            position: node.position,
            size: node.size,
        })
    }

    fn translate_node(&mut self, id: NodeId, to: Point) -> Option<Point> {
        self.graph.move_to(id, to)
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }
}

impl RenderSurface for MemoryCanvas {
    fn attach(&mut self, comment: &Comment) {
        self.layers.push(Layer::Comment(comment.id()));
    }

    fn detach(&mut self, id: CommentId) {
        self.layers.retain(|layer| *layer != Layer::Comment(id));
        self.rendered.remove(&id);
    }

    fn reorder(&mut self, id: CommentId, placement: Placement) {
        let layer = Layer::Comment(id);
        let Some(current) = self.layer_index(layer) else {
            log::warn!("reorder of detached {id}");
            return;
        };
        self.layers.remove(current);

        let at = match placement {
            Placement::Front => self.layers.len(),
            Placement::Back => 0,
            Placement::After(node) => self
                .layer_index(Layer::Node(node))
                .map_or(self.layers.len(), |i| i + 1),
        };
        self.layers.insert(at, layer);
    }

    fn render(&mut self, comment: &Comment, scale: f64) {
        self.rendered.insert(
            comment.id(),
            RenderedComment {
                text: comment.text.clone(),
                rect: comment.rect(),
                selected: comment.is_selected(),
                scale,
            },
        );
    }

    fn prompt(&mut self, _title: &str, _initial: &str) -> Option<String> {
        self.prompt_answers.pop_front().flatten()
    }
}
