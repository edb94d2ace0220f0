// Batch route planner.
//
// `PipePlanner::plan_batch()` routes an ordered list of problems against one
// grid, strictly in input order. Each routed problem's pieces are committed
// to the grid before the next problem is searched, so earlier routes are
// obstacles for later ones. Input order is the priority order.
//
// Fail-fast: the first problem that cannot be routed gets `None`, and so
// does every problem after it, without being searched. Pieces committed for
// earlier problems stay on the grid.
//
// The batch is validated before anything is searched or written: an empty
// batch or an endpoint outside the grid rejects the whole call.
//
// A search aborted from outside (cancel flag, expansion budget) ends the
// batch with an error naming the problem; again, earlier commits stay.
//
// See also: `pathfinding.rs` + `segment.rs` for the default lattice
// strategy, `piece_search.rs` for the piece-state strategy, `config.rs`.
//
// **Critical constraint: determinism.** Given the same grid, problems and
// config, the same pieces come out in the same order. The planner holds no
// state between batches; the grid is the only thing that changes.

use crate::config::{PlannerConfig, SearchStrategy};
use crate::error::{Endpoint, PlanError};
use crate::grid::PipeGrid;
use crate::pathfinding::{self, SearchAbort, SearchControl};
use crate::piece_search;
use crate::segment;
use crate::types::{Pipe, Problem};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Result slot for one problem: the committed pieces, or `None` when no
/// feasible route exists (or an earlier problem already failed).
pub type RouteResult = Option<Vec<Pipe>>;

/// Sequential batch planner. Cheap to clone; holds only configuration and
/// an optional cancel flag.
#[derive(Clone, Debug, Default)]
pub struct PipePlanner {
    config: PlannerConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl PipePlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Abort planning once `flag` is set. Checked at every node expansion.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Route every problem in order, committing pieces into `grid`.
    ///
    /// Returns one slot per problem, in input order.
    pub fn plan_batch(
        &self,
        grid: &mut PipeGrid,
        problems: &[Problem],
    ) -> Result<Vec<RouteResult>, PlanError> {
        validate(grid, problems)?;

        let control = SearchControl {
            max_expansions: self.config.max_expansions,
            cancel: self.cancel.as_deref(),
        };

        let mut results: Vec<RouteResult> = Vec::with_capacity(problems.len());
        for (index, problem) in problems.iter().enumerate() {
            let routed = self
                .route_one(grid, problem, &control)
                .map_err(|abort| match abort {
                    SearchAbort::Cancelled => PlanError::Cancelled { index },
                    SearchAbort::BudgetExhausted { limit } => {
                        PlanError::ExpansionBudgetExhausted { index, limit }
                    }
                })?;

            match routed {
                Some(pipes) => {
                    tracing::debug!(
                        index,
                        start = %problem.start,
                        end = %problem.end,
                        pieces = pipes.len(),
                        "routed problem"
                    );
                    results.push(Some(pipes));
                }
                None => {
                    let abandoned = problems.len() - index - 1;
                    tracing::warn!(
                        index,
                        start = %problem.start,
                        end = %problem.end,
                        abandoned,
                        "no feasible path; abandoning remaining problems"
                    );
                    results.resize(problems.len(), None);
                    break;
                }
            }
        }

        let routed = results.iter().filter(|r| r.is_some()).count();
        tracing::info!(
            problems = problems.len(),
            routed,
            strategy = ?self.config.strategy,
            "batch planned"
        );
        Ok(results)
    }

    /// Search one problem and commit its pieces. `Ok(None)` leaves the grid
    /// untouched.
    fn route_one(
        &self,
        grid: &mut PipeGrid,
        problem: &Problem,
        control: &SearchControl<'_>,
    ) -> Result<Option<Vec<Pipe>>, SearchAbort> {
        match self.config.strategy {
            SearchStrategy::Lattice => {
                let path = pathfinding::find_path_with(grid, problem.start, problem.end, control)?;
                Ok(path.map(|cells| {
                    segment::commit_path(grid, &cells, problem.start_direction, problem.category)
                }))
            }
            SearchStrategy::PieceState => {
                let pieces = piece_search::find_pieces_with(
                    grid,
                    problem,
                    &self.config.piece_costs,
                    control,
                )?;
                if let Some(pipes) = &pieces {
                    for pipe in pipes {
                        grid.place(pipe);
                    }
                }
                Ok(pieces)
            }
        }
    }
}

/// Route a batch with the default configuration.
pub fn plan_batch(
    grid: &mut PipeGrid,
    problems: &[Problem],
) -> Result<Vec<RouteResult>, PlanError> {
    PipePlanner::default().plan_batch(grid, problems)
}

/// Reject requests the searches cannot meaningfully run.
fn validate(grid: &PipeGrid, problems: &[Problem]) -> Result<(), PlanError> {
    if problems.is_empty() {
        return Err(PlanError::EmptyBatch);
    }
    for (index, problem) in problems.iter().enumerate() {
        for (endpoint, coord) in [(Endpoint::Start, problem.start), (Endpoint::End, problem.end)] {
            if !grid.is_inside(coord) {
                return Err(PlanError::EndpointOutOfBounds {
                    index,
                    endpoint,
                    coord,
                });
            }
        }
    }
    Ok(())
}
