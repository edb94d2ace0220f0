// Data-driven planner configuration.
//
// All tunable routing parameters live in `PlannerConfig`, loadable from
// JSON. Every field carries a serde default, so a config file only needs
// the keys it changes; `{}` is the default config.
//
// The piece cost model (`PieceCostModel`) only matters for the
// `SearchStrategy::PieceState` search: each piece costs
// `length_weight * length + (1 - length_weight) * price`. The lattice
// strategy costs every step 1 and ignores it.
//
// See also: `planner.rs` which reads the strategy and budget,
// `piece_search.rs` which reads the cost model.
//
// **Critical constraint: determinism.** Config values feed straight into
// search ordering. Identical configs and inputs give identical routes.

use crate::types::{Direction, PipeGeometry};
use serde::{Deserialize, Serialize};

/// Which search produces each problem's pieces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStrategy {
    /// Shortest lattice path, then greedy segmentation into pieces.
    #[default]
    Lattice,
    /// Search directly over (cell, heading) states with weighted piece costs.
    PieceState,
}

/// Physical length and unit price of one piece kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieceSpec {
    pub length: f64,
    pub price: f64,
}

/// Weighted cost of each piece kind for the piece-state search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieceCostModel {
    /// Weight on physical length; price gets `1 - length_weight`. 0.0–1.0.
    pub length_weight: f64,
    pub straight1: PieceSpec,
    pub straight2: PieceSpec,
    pub bend1: PieceSpec,
}

impl Default for PieceCostModel {
    fn default() -> Self {
        Self {
            length_weight: 0.5,
            straight1: PieceSpec {
                length: 1.0,
                price: 4.0,
            },
            straight2: PieceSpec {
                length: 2.0,
                price: 6.0,
            },
            bend1: PieceSpec {
                length: 1.0,
                price: 5.0,
            },
        }
    }
}

impl PieceCostModel {
    /// Price-only weighting: minimize what the pieces cost.
    pub fn cheapest() -> Self {
        Self {
            length_weight: 0.0,
            ..Self::default()
        }
    }

    /// Length-only weighting: minimize pipe run length.
    pub fn shortest() -> Self {
        Self {
            length_weight: 1.0,
            ..Self::default()
        }
    }

    fn spec(&self, geometry: PipeGeometry) -> PieceSpec {
        match geometry {
            PipeGeometry::Straight1 => self.straight1,
            PipeGeometry::Straight2 => self.straight2,
            PipeGeometry::Bend1 { .. } => self.bend1,
        }
    }

    /// Weighted cost of placing one piece of this geometry.
    pub fn cost(&self, geometry: PipeGeometry) -> f64 {
        let spec = self.spec(geometry);
        self.length_weight * spec.length + (1.0 - self.length_weight) * spec.price
    }

    /// Lowest weighted cost per covered cell over all piece kinds. Multiplied
    /// by a cell-count lower bound this gives an admissible heuristic.
    pub fn min_cost_per_cell(&self) -> f64 {
        [
            PipeGeometry::Straight1,
            PipeGeometry::Straight2,
            PipeGeometry::Bend1 {
                bend: Direction::PosY,
            },
        ]
        .into_iter()
        .map(|g| self.cost(g) / f64::from(g.cell_span()))
        .fold(f64::INFINITY, f64::min)
        .max(0.0)
    }
}

/// Top-level planner configuration. Loaded from JSON, never mutated during
/// a batch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Search used for every problem in a batch.
    pub strategy: SearchStrategy,

    /// Per-problem cap on node expansions. `None` searches exhaustively.
    pub max_expansions: Option<u64>,

    /// Piece costs for `SearchStrategy::PieceState`.
    pub piece_costs: PieceCostModel,
}

impl PlannerConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_costs() {
        let model = PieceCostModel::default();
        assert_eq!(model.cost(PipeGeometry::Straight1), 2.5);
        assert_eq!(model.cost(PipeGeometry::Straight2), 4.0);
        assert_eq!(
            model.cost(PipeGeometry::Bend1 {
                bend: Direction::NegZ
            }),
            3.0
        );
        // Straight2 is the cheapest per cell: 4.0 / 2.
        assert_eq!(model.min_cost_per_cell(), 2.0);
    }

    #[test]
    fn presets_change_weighting() {
        assert_eq!(PieceCostModel::shortest().cost(PipeGeometry::Straight2), 2.0);
        assert_eq!(PieceCostModel::cheapest().cost(PipeGeometry::Straight2), 6.0);
        assert_eq!(PieceCostModel::shortest().min_cost_per_cell(), 1.0);
    }

    #[test]
    fn empty_json_is_default() {
        let config = PlannerConfig::from_json("{}").unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.strategy, SearchStrategy::Lattice);
        assert_eq!(config.max_expansions, None);
    }

    #[test]
    fn config_loads_from_json_string() {
        let json = r#"{
            "strategy": "PieceState",
            "max_expansions": 5000,
            "piece_costs": {
                "length_weight": 0.25,
                "bend1": { "length": 1.0, "price": 9.0 }
            }
        }"#;
        let config = PlannerConfig::from_json(json).unwrap();
        assert_eq!(config.strategy, SearchStrategy::PieceState);
        assert_eq!(config.max_expansions, Some(5000));
        assert_eq!(config.piece_costs.length_weight, 0.25);
        assert_eq!(config.piece_costs.bend1.price, 9.0);
        // Unlisted pieces keep their defaults.
        assert_eq!(config.piece_costs.straight2.price, 6.0);
    }

    #[test]
    fn config_roundtrips_through_json() {
        let config = PlannerConfig {
            strategy: SearchStrategy::PieceState,
            max_expansions: Some(12),
            piece_costs: PieceCostModel::cheapest(),
        };
        let restored = PlannerConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn rejects_unknown_strategy() {
        assert!(PlannerConfig::from_json(r#"{"strategy": "Teleport"}"#).is_err());
    }
}
