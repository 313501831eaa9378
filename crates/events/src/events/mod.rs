//! Domain-driven event types
//!
//! Each functional domain owns its event enum; `AppEvent` is the wire
//! wrapper carried over the event channel.

mod general;
mod step;

pub use general::GeneralEvent;
pub use step::StepEvent;

use serde::{Deserialize, Serialize};

/// Top-level application event wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain")]
pub enum AppEvent {
    /// Build step lifecycle events
    Step(StepEvent),
    /// General warnings, errors and operation notifications
    General(GeneralEvent),
}
