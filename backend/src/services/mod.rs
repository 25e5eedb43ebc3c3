//! Service layer.
//!
//! Sits between the HTTP handlers and the catalog, astronomy engine and
//! observation store. Services validate input and orchestrate calls; they do
//! not log errors, the HTTP boundary does.

pub mod error;
pub mod observations;
pub mod position;

pub use error::{ServiceError, ServiceResult};
pub use observations::{get_observation, list_observations, record_observation, NewObservation};
pub use position::{PositionReport, PositionRequest, PositionService, PositionSource};
