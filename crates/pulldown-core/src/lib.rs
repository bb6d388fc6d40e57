pub mod config;
pub mod controller;
pub mod error;
pub mod gesture;
pub mod recovery;
pub mod refresh;
pub mod visual;

pub use config::{AppConfig, EasingType, PullConfig};
pub use controller::{PullController, PullPhase, PullState};
pub use error::{Error, Result};
pub use gesture::{ScrollProbe, TouchEvent, TouchPhase, TouchPoint};
pub use recovery::Recovery;
pub use refresh::{refresh_fn, RefreshCompletion, RefreshHandler, RefreshOutcome, RefreshTicket};
pub use visual::{BannerPose, RecordingTarget, VisualCommand, VisualTarget};
