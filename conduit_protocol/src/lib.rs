// conduit_protocol: JSON boundary for the conduit pipe router.
//
// This crate turns batch planning requests into calls on `conduit_route` and
// the results back into plain serializable data. It is what the
// `conduit-plan` binary (and any future service front end) sits on; the
// router crate itself stays free of I/O and subscriber setup.
//
// Module overview:
// - `contracts.rs`: `PlanRequest`, `ObstacleRegion`, `ProblemDto`,
//                   `PlanResponse`, `RouteResultDto`, `PipeDto`.
// - `handler.rs`:   `handle_request()`: validate, seed a fresh grid, plan,
//                   flatten. `RequestError`.
// - `logging.rs`:   `tracing-subscriber` setup for the binary.
//
// Design decisions:
// - **JSON serialization.** Same serde_json stack as the router's config.
// - **Fresh grid per request.** Requests are independent; no grid state is
//   cached between calls.
// - **Unroutable is data.** A failed slot is `success: false` with
//   `"No feasible path."`, never a `RequestError`.

pub mod contracts;
pub mod handler;
pub mod logging;

pub use contracts::{
    NO_FEASIBLE_PATH, ObstacleRegion, PipeDto, PlanRequest, PlanResponse, ProblemDto,
    RouteResultDto,
};
pub use handler::{
    RequestError, handle_json, handle_request, handle_request_with, load_config, read_request,
};
