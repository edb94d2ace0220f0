// A* over pipe pieces instead of cells.
//
// A state is a cursor cell (the next cell to fill) plus the heading the run
// holds when it enters that cell. From `(c, d)` the successors are:
// - `Straight2` covering `c` and `c + d`, next state `(c + 2d, d)`;
// - `Straight1` covering `c`, next state `(c + d, d)`;
// - `Bend1` covering `c` and turning into each of the four perpendiculars
//   `e`, next state `(c + e, e)`.
//
// A piece is legal when every cell it covers is inside the grid and
// `Empty`, none of those cells is already covered by the node's ancestors
// (the grid is not written during the search), and the goal is covered only
// as the final cell of a straight piece. A node is terminal when its piece
// is straight and ends on the goal, so a found run has the same shape
// guarantees as a segmented lattice path: contiguous, non-overlapping, and
// finishing straight into the goal.
//
// Costs come from `PieceCostModel`. The heuristic is the cheapest per-cell
// cost times the straight-line distance from the last covered cell to the
// goal (from the start cell, plus one, for the root), which never
// overestimates.
//
// The closed set is keyed by (cursor, heading) while legality also depends
// on the ancestors, so in tightly packed grids the search can miss a run
// that exists. It is an opt-in strategy (`SearchStrategy::PieceState`).
//
// See also: `pathfinding.rs` for `OpenSet` and `SearchControl`,
// `config.rs` for the cost model.
//
// **Critical constraint: determinism.** Successors are generated in a fixed
// order (Straight2, Straight1, then bends in `perpendiculars()` order) and
// share the lattice search's (f, g, insertion) tie-break.

use crate::config::PieceCostModel;
use crate::grid::PipeGrid;
use crate::node::{NodeArena, NodeId, SearchNode};
use crate::pathfinding::{OpenSet, SearchAbort, SearchControl};
use crate::types::{Coord, Direction, Pipe, PipeGeometry, Problem, State};
use smallvec::SmallVec;

/// Find a minimum-cost run of pieces for `problem`.
///
/// Returns the pieces in placement order, or `None` if no legal run was
/// found. The grid is only read.
pub fn find_pieces(
    grid: &PipeGrid,
    problem: &Problem,
    costs: &PieceCostModel,
) -> Option<Vec<Pipe>> {
    find_pieces_with(grid, problem, costs, &SearchControl::default())
        .ok()
        .flatten()
}

/// Like `find_pieces`, but honors a cancel flag and an expansion budget.
pub fn find_pieces_with(
    grid: &PipeGrid,
    problem: &Problem,
    costs: &PieceCostModel,
    control: &SearchControl<'_>,
) -> Result<Option<Vec<Pipe>>, SearchAbort> {
    let goal = problem.end;
    if !grid.is_inside(problem.start) || !grid.is_inside(goal) {
        return Ok(None);
    }

    let per_cell = costs.min_cost_per_cell();
    let mut arena = NodeArena::new();
    let mut closed = vec![false; grid.cell_count() * Direction::ALL.len()];
    let mut open = OpenSet::new();
    let mut expansions: u64 = 0;

    let root = arena.push(SearchNode {
        state: State::new(problem.start, problem.start_direction),
        parent: None,
        g_cost: 0.0,
        h_cost: per_cell * (problem.start.distance(goal) + 1.0),
        action: None,
    });
    open.push(&arena, root);

    while let Some(current) = open.pop() {
        let node = arena.get(current);
        let state = node.state;
        let g = node.g_cost;

        if node.action.is_some_and(|pipe| ends_on(&pipe, goal)) {
            let pipes = arena.actions_to(current);
            tracing::trace!(expansions, pieces = pipes.len(), "piece search reached goal");
            return Ok(Some(pipes));
        }

        let Some(slot) = state_slot(grid, state) else {
            continue;
        };
        if closed[slot] {
            continue;
        }
        control.check(expansions)?;
        expansions += 1;
        closed[slot] = true;

        let covered = covered_by_ancestry(&arena, current);
        for pipe in candidates(state, problem) {
            if !is_legal(grid, &pipe, goal, &covered) {
                continue;
            }
            let exit = pipe.exit_direction();
            let next = State::new(pipe.last_cell() + exit.unit(), exit);
            if state_slot(grid, next).is_some_and(|s| closed[s]) {
                continue;
            }
            let child = arena.push(SearchNode {
                state: next,
                parent: Some(current),
                g_cost: g + costs.cost(pipe.geometry),
                h_cost: per_cell * pipe.last_cell().distance(goal),
                action: Some(pipe),
            });
            open.push(&arena, child);
        }
    }

    tracing::trace!(start = %problem.start, goal = %goal, expansions, "piece search exhausted");
    Ok(None)
}

/// Closed-set slot for a state; `None` when the cursor is off the grid.
fn state_slot(grid: &PipeGrid, state: State) -> Option<usize> {
    let heading = match state.direction {
        Direction::PosX => 0,
        Direction::NegX => 1,
        Direction::PosY => 2,
        Direction::NegY => 3,
        Direction::PosZ => 4,
        Direction::NegZ => 5,
    };
    grid.index_of(state.location)
        .map(|i| i * Direction::ALL.len() + heading)
}

/// True if the piece is a straight whose final cell is the goal.
fn ends_on(pipe: &Pipe, goal: Coord) -> bool {
    match pipe.geometry {
        PipeGeometry::Straight1 | PipeGeometry::Straight2 => pipe.last_cell() == goal,
        PipeGeometry::Bend1 { .. } => false,
    }
}

fn candidates(state: State, problem: &Problem) -> SmallVec<[Pipe; 6]> {
    let State {
        location,
        direction,
    } = state;
    let mut out = SmallVec::new();
    out.push(Pipe::straight2(location, direction, problem.category));
    out.push(Pipe::straight1(location, direction, problem.category));
    for bend in direction.perpendiculars() {
        out.push(Pipe::bend1(location, direction, bend, problem.category));
    }
    out
}

fn covered_by_ancestry(arena: &NodeArena, id: NodeId) -> Vec<Coord> {
    arena
        .ancestry(id)
        .filter_map(|n| n.action)
        .flat_map(|pipe| pipe.occupied_cells())
        .collect()
}

fn is_legal(grid: &PipeGrid, pipe: &Pipe, goal: Coord, covered: &[Coord]) -> bool {
    if !grid.can_place(pipe) {
        return false;
    }
    let cells = pipe.occupied_cells();
    if cells.iter().any(|c| covered.contains(c)) {
        return false;
    }
    // The goal may only be the final cell of a straight piece.
    !cells.contains(&goal) || ends_on(pipe, goal)
}
