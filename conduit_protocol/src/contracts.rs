// Request and response contracts for batch pipe planning.
//
// A request describes the whole job: grid extent, obstacle boxes to seed,
// and the ordered problem list. The response carries one result per problem
// in the same order. Results hold plain data only (coordinates, enum tags,
// an optional bend heading), so consumers never see the router's internal
// `PipeGeometry` payloads.
//
// All types derive `Serialize`/`Deserialize`; field names are the JSON keys.
// Unknown keys are rejected so typos in hand-written requests fail loudly.

use conduit_route::{Coord, Direction, GeometryKind, Pipe, PipeCategory, Problem, RouteResult};
use serde::{Deserialize, Serialize};

/// Error text carried by a failed result slot.
pub const NO_FEASIBLE_PATH: &str = "No feasible path.";

/// A batch planning job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanRequest {
    /// Grid extent along x, y, z.
    pub size: [u32; 3],
    #[serde(default)]
    pub obstacles: Vec<ObstacleRegion>,
    pub problems: Vec<ProblemDto>,
}

/// Inclusive box of obstacle cells. A single cell has `min == max`; corners
/// may be given in either order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObstacleRegion {
    pub min: Coord,
    pub max: Coord,
}

impl ObstacleRegion {
    pub fn cell(coord: Coord) -> Self {
        Self {
            min: coord,
            max: coord,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProblemDto {
    pub start: Coord,
    pub start_direction: Direction,
    pub end: Coord,
    pub category: PipeCategory,
}

impl From<ProblemDto> for Problem {
    fn from(dto: ProblemDto) -> Problem {
        Problem::new(dto.start, dto.start_direction, dto.end, dto.category)
    }
}

impl From<Problem> for ProblemDto {
    fn from(problem: Problem) -> ProblemDto {
        ProblemDto {
            start: problem.start,
            start_direction: problem.start_direction,
            end: problem.end,
            category: problem.category,
        }
    }
}

/// Results for a batch, index-aligned with the request's problems.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub results: Vec<RouteResultDto>,
}

impl PlanResponse {
    pub fn from_results(results: &[RouteResult]) -> Self {
        Self {
            results: results.iter().map(RouteResultDto::from_result).collect(),
        }
    }

    pub fn routed_count(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteResultDto {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipes: Option<Vec<PipeDto>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RouteResultDto {
    pub fn from_result(result: &RouteResult) -> Self {
        match result {
            Some(pipes) => Self {
                success: true,
                pipes: Some(pipes.iter().map(PipeDto::from).collect()),
                error: None,
            },
            None => Self {
                success: false,
                pipes: None,
                error: Some(NO_FEASIBLE_PATH.to_string()),
            },
        }
    }
}

/// One placed piece, flattened for the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipeDto {
    pub location: Coord,
    pub direction: Direction,
    pub geometry: GeometryKind,
    pub category: PipeCategory,
    /// Second-leg heading; present only for `Bend1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bend_direction: Option<Direction>,
}

impl From<&Pipe> for PipeDto {
    fn from(pipe: &Pipe) -> PipeDto {
        PipeDto {
            location: pipe.location,
            direction: pipe.direction,
            geometry: pipe.geometry.kind(),
            category: pipe.category,
            bend_direction: pipe.bend_direction(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_parses_without_obstacles() {
        let json = r#"{
            "size": [1, 4, 1],
            "problems": [{
                "start": {"x": 0, "y": 0, "z": 0},
                "start_direction": "PosX",
                "end": {"x": 0, "y": 3, "z": 0},
                "category": "Hot"
            }]
        }"#;
        let request: PlanRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.size, [1, 4, 1]);
        assert!(request.obstacles.is_empty());
        assert_eq!(
            Problem::from(request.problems[0]),
            Problem::new(
                Coord::new(0, 0, 0),
                Direction::PosX,
                Coord::new(0, 3, 0),
                PipeCategory::Hot
            )
        );
    }

    #[test]
    fn request_rejects_unknown_keys() {
        let json = r#"{"size": [1, 1, 1], "problems": [], "grid": null}"#;
        assert!(serde_json::from_str::<PlanRequest>(json).is_err());
    }

    #[test]
    fn failed_slot_has_error_and_no_pipes() {
        let dto = RouteResultDto::from_result(&None);
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"success": false, "error": "No feasible path."})
        );
    }

    #[test]
    fn bend_carries_its_second_leg() {
        let bend = Pipe::bend1(
            Coord::new(1, 2, 3),
            Direction::PosX,
            Direction::NegZ,
            PipeCategory::Cold,
        );
        let value = serde_json::to_value(PipeDto::from(&bend)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "location": {"x": 1, "y": 2, "z": 3},
                "direction": "PosX",
                "geometry": "Bend1",
                "category": "Cold",
                "bend_direction": "NegZ"
            })
        );
    }

    #[test]
    fn straight_omits_bend_direction() {
        let straight = Pipe::straight2(Coord::ZERO, Direction::PosY, PipeCategory::Hot);
        let dto = PipeDto::from(&straight);
        assert_eq!(dto.geometry, GeometryKind::Straight2);
        let json = serde_json::to_string(&dto).unwrap();
        assert!(!json.contains("bend_direction"));
    }

    #[test]
    fn response_counts_routed_slots() {
        let pipe = Pipe::straight1(Coord::ZERO, Direction::PosX, PipeCategory::Hot);
        let response = PlanResponse::from_results(&[Some(vec![pipe]), None, None]);
        assert_eq!(response.results.len(), 3);
        assert_eq!(response.routed_count(), 1);
        assert_eq!(response.results[0].pipes.as_ref().map(Vec::len), Some(1));
        assert_eq!(response.results[2].error.as_deref(), Some(NO_FEASIBLE_PATH));
    }
}
