// Path-to-pipe segmentation.
//
// Turns a lattice path into manufacturable pieces with one greedy
// left-to-right pass, committing each piece to the grid as soon as it is
// emitted. A synthetic cell one step behind the start (against the
// requested approach direction) is prepended so the first real cell has an
// incoming heading like every other cell.
//
// At cursor `j` (a real cell), with `d_in` the step into `path[j]`:
// 1. `path[j+1]` and `path[j+2]` both continue along `d_in` → `Straight2`
//    covering `path[j]` and `path[j+1]`; advance 2.
// 2. The step out of `path[j]` differs from `d_in` → `Bend1` at `path[j]`,
//    bending into the outgoing heading; advance 1.
// 3. Otherwise → `Straight1` along `d_in`; advance 1.
//
// The last real cell is always a `Straight1`: rule 1 needs two cells after
// the anchor, so a `Straight2` never ends on it.
//
// See also: `pathfinding.rs` which guarantees unit steps, `planner.rs`
// which calls this once per routed problem.

use crate::grid::PipeGrid;
use crate::types::{Coord, Direction, Pipe, PipeCategory};

/// Segment `path` into pipes and place each one on `grid` as it is emitted.
///
/// `path` must be non-empty with face-adjacent consecutive cells; a
/// non-unit step panics. Returns the pieces in path order.
pub fn commit_path(
    grid: &mut PipeGrid,
    path: &[Coord],
    start_direction: Direction,
    category: PipeCategory,
) -> Vec<Pipe> {
    let Some(&first) = path.first() else {
        return Vec::new();
    };

    let mut cells = Vec::with_capacity(path.len() + 1);
    cells.push(first - start_direction.unit());
    cells.extend_from_slice(path);

    let mut pipes = Vec::new();
    let mut j = 1;
    while j < cells.len() {
        let current = cells[j];
        let incoming = Direction::between(cells[j - 1], current);
        let outgoing = cells.get(j + 1).map(|&next| Direction::between(current, next));
        let after = cells
            .get(j + 2)
            .map(|&next2| Direction::between(cells[j + 1], next2));

        let (pipe, advance) = match (outgoing, after) {
            (Some(out), Some(then)) if out == incoming && then == incoming => {
                (Pipe::straight2(current, incoming, category), 2)
            }
            (Some(out), _) if out != incoming => {
                (Pipe::bend1(current, incoming, out, category), 1)
            }
            _ => (Pipe::straight1(current, incoming, category), 1),
        };

        grid.place(&pipe);
        pipes.push(pipe);
        j += advance;
    }
    pipes
}
