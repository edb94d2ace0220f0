// Request handling: contracts in, contracts out.
//
// `handle_request()` is the whole boundary. It rejects malformed jobs
// (empty batch, zero-sized grid, obstacle boxes that miss the grid
// entirely, endpoints off the grid) before any search runs, then builds a
// fresh grid, seeds the obstacles, runs the batch planner and flattens the
// result slots into DTOs. Each request gets its own grid; nothing carries
// over between calls.
//
// Obstacle boxes that only partly overlap the grid are clipped, not
// rejected.

use std::io::Read;
use std::path::Path;

use conduit_route::{CellType, Coord, PipeGrid, PipePlanner, PlanError, PlannerConfig, Problem};

use crate::contracts::{ObstacleRegion, PlanRequest, PlanResponse};

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("obstacle region {index} ({min} to {max}) lies entirely outside the grid")]
    ObstacleOutsideGrid { index: usize, min: Coord, max: Coord },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Validate `request`, plan it on a fresh grid, and report every slot.
pub fn handle_request(
    request: &PlanRequest,
    config: &PlannerConfig,
) -> Result<PlanResponse, RequestError> {
    handle_request_with(&PipePlanner::new(config.clone()), request)
}

/// Like `handle_request`, but with a caller-built planner (e.g. one that
/// carries a cancel flag).
pub fn handle_request_with(
    planner: &PipePlanner,
    request: &PlanRequest,
) -> Result<PlanResponse, RequestError> {
    if request.problems.is_empty() {
        return Err(PlanError::EmptyBatch.into());
    }

    let [sx, sy, sz] = request.size;
    let mut grid = PipeGrid::new(sx, sy, sz)?;
    seed_obstacles(&mut grid, &request.obstacles)?;

    let problems: Vec<Problem> = request.problems.iter().copied().map(Problem::from).collect();
    tracing::debug!(
        size = ?request.size,
        obstacles = request.obstacles.len(),
        problems = problems.len(),
        "handling plan request"
    );

    let results = planner.plan_batch(&mut grid, &problems)?;
    Ok(PlanResponse::from_results(&results))
}

/// Parse a request from JSON text and handle it.
pub fn handle_json(json: &str, config: &PlannerConfig) -> Result<PlanResponse, RequestError> {
    let request: PlanRequest = serde_json::from_str(json)?;
    handle_request(&request, config)
}

/// Read a request from any reader (a file, stdin).
pub fn read_request(mut reader: impl Read) -> Result<PlanRequest, RequestError> {
    let mut json = String::new();
    reader.read_to_string(&mut json)?;
    Ok(serde_json::from_str(&json)?)
}

/// Load a planner config file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<PlannerConfig, RequestError> {
    let json = std::fs::read_to_string(path)?;
    Ok(PlannerConfig::from_json(&json)?)
}

/// Write every region as obstacle cells, clipped to the grid.
fn seed_obstacles(grid: &mut PipeGrid, regions: &[ObstacleRegion]) -> Result<(), RequestError> {
    for (index, region) in regions.iter().enumerate() {
        let written = grid.fill_box(region.min, region.max, CellType::Obstacle);
        if written == 0 {
            return Err(RequestError::ObstacleOutsideGrid {
                index,
                min: region.min,
                max: region.max,
            });
        }
    }
    Ok(())
}
