//! In-memory node graph standing in for the host editor's node model.
//!
//! Nodes carry a canvas position and a declared size. View order (the order node views are iterated in when
//! looking for an overlapping node) is insertion order and is kept
//! separately, since `StableDiGraph` reuses vacated indices.

use crate::geometry::{Point, Rect, Size};
use crate::id::NodeId;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use std::collections::HashMap;

/// A node as seen by comments: where it is and how large it declares itself.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: NodeId,
    pub label: String,
    pub position: Point,
    pub size: Size,
}

impl GraphNode {
    pub fn new(id: NodeId, label: impl Into<String>, position: Point, size: Size) -> Self {
        Self {
            id,
            label: label.into(),
            position,
            size,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeGraph {
    graph: StableDiGraph<GraphNode, ()>,

    /// Index from NodeId → NodeIndex for fast lookup.
    id_index: HashMap<NodeId, NodeIndex>,

    /// Node ids in view order.
    order: Vec<NodeId>,
}

impl NodeGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. An existing node with the same id is replaced in place and
    /// keeps its view order. Returns whether the id was new.
    pub fn add_node(&mut self, node: GraphNode) -> bool {
        if let Some(&idx) = self.id_index.get(&node.id) {
            self.graph[idx] = node;
            return false;
        }
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        self.order.push(id);
        true
    }

    /// Remove a node.
    pub fn remove_node(&mut self, id: NodeId) -> Option<GraphNode> {
        let idx = self.id_index.remove(&id)?;
        self.order.retain(|n| *n != id);
        self.graph.remove_node(idx)
    }

    pub fn get(&self, id: NodeId) -> Option<&GraphNode> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// Node ids in view order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Move a node to an absolute position. Returns the previous position.
    pub fn move_to(&mut self, id: NodeId, to: Point) -> Option<Point> {
        let node = self.get_mut(id)?;
        let previous = node.position;
        node.position = to;
        Some(previous)
    }
}
