// Error types for the router.
//
// `PlanError` covers the two recoverable failure families: requests rejected
// before any search runs (bad dimensions, empty batch, endpoints off the
// grid) and searches aborted from outside (cancel flag, expansion budget).
// An unroutable problem is not an error; it is a `None` result slot.
//
// Broken internal invariants (a non-unit step, an out-of-bounds cell read)
// panic at the point of detection instead of surfacing here.

use crate::types::Coord;
use std::fmt;

/// Which end of a routing request a validation error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => f.write_str("start"),
            Endpoint::End => f.write_str("end"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("invalid grid dimensions {0}x{1}x{2}")]
    InvalidDimensions(u32, u32, u32),

    #[error("problem batch is empty")]
    EmptyBatch,

    #[error("problem {index}: {endpoint} {coord} lies outside the grid")]
    EndpointOutOfBounds {
        index: usize,
        endpoint: Endpoint,
        coord: Coord,
    },

    #[error("planning cancelled while routing problem {index}")]
    Cancelled { index: usize },

    #[error("problem {index} exceeded the search budget of {limit} node expansions")]
    ExpansionBudgetExhausted { index: usize, limit: u64 },
}

impl PlanError {
    /// True for errors raised by request validation, before any grid mutation.
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            PlanError::InvalidDimensions(..)
                | PlanError::EmptyBatch
                | PlanError::EndpointOutOfBounds { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DirectionError {
    #[error("{0} is not an axis-aligned unit vector")]
    NotAxisUnit(Coord),
}
