// Search node arena.
//
// Both searches (`pathfinding.rs`, `piece_search.rs`) allocate one
// `SearchNode` per push into a `NodeArena` and refer to nodes by `NodeId`.
// Parent links are arena handles, not references, so the arena is a plain
// `Vec` that owns every node for the lifetime of one search call and can be
// dumped for debugging.

use crate::types::{Coord, Pipe, State};
use serde::{Deserialize, Serialize};

/// Handle to a node in a `NodeArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Handle for the node stored at `index`. Panics past `u32::MAX` nodes.
    fn for_index(index: usize) -> NodeId {
        match u32::try_from(index) {
            Ok(i) => NodeId(i),
            Err(_) => panic!("search node arena exceeded {} nodes", u32::MAX),
        }
    }
}

/// One search node. Immutable once pushed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchNode {
    pub state: State,
    pub parent: Option<NodeId>,
    /// Accumulated cost from the start.
    pub g_cost: f64,
    /// Heuristic estimate to the goal.
    pub h_cost: f64,
    /// The piece whose placement produced this node, if any.
    pub action: Option<Pipe>,
}

impl SearchNode {
    pub fn f_cost(&self) -> f64 {
        self.g_cost + self.h_cost
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId::for_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk from `id` back to the root, `id` first.
    pub fn ancestry(&self, id: NodeId) -> Ancestry<'_> {
        Ancestry {
            arena: self,
            next: Some(id),
        }
    }

    /// Node locations from the root to `id`.
    pub fn locations_to(&self, id: NodeId) -> Vec<Coord> {
        let mut path: Vec<Coord> = self.ancestry(id).map(|n| n.state.location).collect();
        path.reverse();
        path
    }

    /// Actions from the root to `id`, skipping nodes without one.
    pub fn actions_to(&self, id: NodeId) -> Vec<Pipe> {
        let mut pipes: Vec<Pipe> = self.ancestry(id).filter_map(|n| n.action).collect();
        pipes.reverse();
        pipes
    }
}

/// Iterator over a node and its parents.
pub struct Ancestry<'a> {
    arena: &'a NodeArena,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestry<'a> {
    type Item = &'a SearchNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.arena.get(id);
        self.next = node.parent;
        Some(node)
    }
}
