// A* pathfinding over the 6-connected cell lattice.
//
// Finds a shortest run of face-adjacent `Empty` cells between two
// coordinates. Every step costs 1; the heuristic is Euclidean distance to
// the goal, which never overestimates a lattice walk. Any non-`Empty` cell
// (obstacle or committed pipe) is impassable, which is how earlier routes in
// a batch block later ones.
//
// Nodes live in a `NodeArena` (see `node.rs`); the open set is a
// `BinaryHeap` with reversed ordering for a min-heap, the same shape as a
// scheduled-event queue. The closed set is a `Vec<bool>` indexed by the
// grid's flat cell index. No `HashMap`.
//
// Nodes are pushed for every open, non-closed neighbor without comparing
// against a best-known g, so a cell can sit in the heap several times; the
// closed check on pop discards the stale copies.
//
// See also: `grid.rs` for passability, `segment.rs` which turns the result
// into pipes, `piece_search.rs` for the piece-level alternative that shares
// `OpenSet` and `SearchControl`.
//
// **Critical constraint: determinism.** Equal-priority nodes pop in a fixed
// order: lowest f, then lowest g, then earliest insertion. Neighbors are
// generated in `Direction::ALL` order. Floats compare with `total_cmp`.

use crate::grid::PipeGrid;
use crate::node::{NodeArena, NodeId, SearchNode};
use crate::types::{Coord, Direction, State};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{self, AtomicBool};

/// Why a search stopped before reaching a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchAbort {
    #[error("search cancelled")]
    Cancelled,
    #[error("search exceeded {limit} node expansions")]
    BudgetExhausted { limit: u64 },
}

/// External limits checked once per node expansion. The default imposes
/// none, and limits that never trigger do not change the result.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchControl<'a> {
    pub max_expansions: Option<u64>,
    pub cancel: Option<&'a AtomicBool>,
}

impl SearchControl<'_> {
    /// Called before the `expansions + 1`-th expansion.
    pub(crate) fn check(&self, expansions: u64) -> Result<(), SearchAbort> {
        if self
            .cancel
            .is_some_and(|flag| flag.load(atomic::Ordering::Relaxed))
        {
            return Err(SearchAbort::Cancelled);
        }
        match self.max_expansions {
            Some(limit) if expansions >= limit => Err(SearchAbort::BudgetExhausted { limit }),
            _ => Ok(()),
        }
    }
}

/// Entry in the open set (min-heap via reversed ordering).
struct OpenEntry {
    f_score: f64,
    g_score: f64,
    sequence: u64,
    node: NodeId,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: smallest (f, g, sequence) is "greatest".
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.g_score.total_cmp(&self.g_score))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Priority queue of arena nodes with deterministic tie-breaking.
#[derive(Default)]
pub(crate) struct OpenSet {
    heap: BinaryHeap<OpenEntry>,
    /// Monotonic insertion counter, the last tie-breaker.
    next_sequence: u64,
}

impl OpenSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue `node` from the arena under its own f and g.
    pub(crate) fn push(&mut self, arena: &NodeArena, node: NodeId) {
        let n = arena.get(node);
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(OpenEntry {
            f_score: n.f_cost(),
            g_score: n.g_cost,
            sequence,
            node,
        });
    }

    pub(crate) fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|e| e.node)
    }
}

/// Find a shortest path of adjacent `Empty` cells from `start` to `goal`.
///
/// Returns `None` if the goal cannot be reached or either endpoint lies
/// outside the grid or is not `Empty`. `start == goal` yields `[start]`.
pub fn find_path(grid: &PipeGrid, start: Coord, goal: Coord) -> Option<Vec<Coord>> {
    // An unlimited control never aborts.
    find_path_with(grid, start, goal, &SearchControl::default())
        .ok()
        .flatten()
}

/// Like `find_path`, but honors a cancel flag and an expansion budget.
pub fn find_path_with(
    grid: &PipeGrid,
    start: Coord,
    goal: Coord,
    control: &SearchControl<'_>,
) -> Result<Option<Vec<Coord>>, SearchAbort> {
    if !grid.is_inside(start) || !grid.is_inside(goal) {
        return Ok(None);
    }
    // A run cannot begin on an obstacle or on earlier pipework.
    if !grid.cell(start).is_passable() {
        return Ok(None);
    }
    if start == goal {
        return Ok(Some(vec![start]));
    }

    let mut arena = NodeArena::new();
    let mut closed = vec![false; grid.cell_count()];
    let mut open = OpenSet::new();
    let mut expansions: u64 = 0;

    // The root's heading is a placeholder; lattice nodes record the step
    // that reached them, and nothing reached the root.
    let root = arena.push(SearchNode {
        state: State::new(start, Direction::PosX),
        parent: None,
        g_cost: 0.0,
        h_cost: start.distance(goal),
        action: None,
    });
    open.push(&arena, root);

    while let Some(current) = open.pop() {
        let (location, g) = {
            let node = arena.get(current);
            (node.state.location, node.g_cost)
        };

        if location == goal {
            tracing::trace!(expansions, nodes = arena.len(), "lattice search reached goal");
            return Ok(Some(arena.locations_to(current)));
        }

        let Some(ci) = grid.index_of(location) else {
            continue;
        };
        if closed[ci] {
            continue;
        }
        control.check(expansions)?;
        expansions += 1;
        closed[ci] = true;

        for dir in Direction::ALL {
            let next = location + dir.unit();
            let Some(ni) = grid.index_of(next) else {
                continue;
            };
            if closed[ni] || !grid.cell(next).is_passable() {
                continue;
            }
            let child = arena.push(SearchNode {
                state: State::new(next, dir),
                parent: Some(current),
                g_cost: g + 1.0,
                h_cost: next.distance(goal),
                action: None,
            });
            open.push(&arena, child);
        }
    }

    tracing::trace!(%start, %goal, expansions, "lattice search exhausted");
    Ok(None)
}
