// conduit_route: pipe routing through a voxel grid.
//
// This crate contains all routing logic: the occupancy grid, the lattice A*
// search, the path-to-piece segmentation, an alternative piece-level search,
// and the batch planner that ties them together. It performs no I/O and
// installs no logging subscriber; it only emits `tracing` events.
//
// Module overview:
// - `types.rs`:        Coord, Direction, CellType, Pipe/PipeGeometry/PipeCategory, Problem, State.
// - `grid.rs`:         Dense 3D occupancy grid (`PipeGrid`): bounds, cell states, pipe placement.
// - `node.rs`:         Search node arena with integer parent handles.
// - `pathfinding.rs`:  A* over the 6-connected lattice; shared open set and search limits.
// - `segment.rs`:      Greedy decomposition of a lattice path into pieces, committed as emitted.
// - `piece_search.rs`: A* over (cell, heading) states with weighted piece costs.
// - `planner.rs`:      `PipePlanner`, sequential, fail-fast batch routing.
// - `config.rs`:       `PlannerConfig` (strategy, expansion budget, piece costs).
// - `error.rs`:        `PlanError`, `DirectionError`.
//
// The companion crate `conduit_protocol` turns JSON requests into calls on
// this crate and results back into JSON.
//
// **Critical constraint: determinism.** Routing is a pure function of
// `(grid, problems, config)`. No randomness, no `HashMap` iteration, no
// threads. Search ties break on (f, g, insertion order).

pub mod config;
pub mod error;
pub mod grid;
pub mod node;
pub mod pathfinding;
pub mod piece_search;
pub mod planner;
pub mod segment;
pub mod types;

pub use config::{PieceCostModel, PlannerConfig, SearchStrategy};
pub use error::{DirectionError, Endpoint, PlanError};
pub use grid::PipeGrid;
pub use pathfinding::{SearchAbort, SearchControl, find_path, find_path_with};
pub use planner::{PipePlanner, RouteResult, plan_batch};
pub use types::{
    CellType, Coord, Direction, GeometryKind, Pipe, PipeCategory, PipeGeometry, Problem, State,
};
