pub mod anchor;
pub mod body;
pub mod c_api;
pub mod config;
pub mod controls;
pub mod error;
pub mod integrator;
pub mod merger;
pub mod simulation;
pub mod snapshot;
pub mod universe;
pub mod utils;

pub use anchor::AnchorToggle;
pub use body::{Body, BodyKind, Motion, Pulse, Trail};
pub use config::SimulationConfig;
pub use error::{Error, Result};
pub use simulation::{ClickOutcome, FrameReport, Simulation};
pub use snapshot::Snapshot;
pub use universe::{ObjectId, Universe};
pub use ultraviolet::Vec2;
