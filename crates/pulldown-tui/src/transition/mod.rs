//! Timed pose transitions for the terminal backend
//!
//! # Layers
//!
//! ## Atoms
//! - `easing` - Pure easing curves mapping [0, 1] onto [0, 1]
//! - `timing` - Progress and interpolation helpers
//! - `config` - Frame timing derived from the UI configuration
//!
//! ## Molecule
//! - `animation` - `PoseAnimator`, tweening a `BannerPose` frame by frame
//!
//! # Usage
//!
//! ```ignore
//! use pulldown_tui::transition::PoseAnimator;
//!
//! let mut animator = PoseAnimator::new(EasingType::Cubic);
//! animator.animate_to(BannerPose::REST, Duration::from_millis(350));
//!
//! // In the main loop, once per frame
//! let frame = animator.update();
//! if frame.finished {
//!     controller.on_transition_end();
//! }
//! ```

// Atoms
pub mod config;
pub mod easing;
pub mod timing;

// Molecule
pub mod animation;

pub use animation::{PoseAnimator, PoseFrame};
pub use config::UiConfigExt;
pub use easing::{EasingType, EasingTypeExt};
