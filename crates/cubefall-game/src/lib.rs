//! Round flow, configuration and events for the cube puzzle.
#![forbid(unsafe_code)]

pub mod config;
pub mod countdown;
pub mod event;
pub mod game;
pub mod round;

pub use config::{ConfigError, FallModeConfig, GameConfig};
pub use countdown::{countdown_digits, countdown_label, display_seconds};
pub use event::{EventEnvelope, EventQueue, GameEvent, ShapeSource};
pub use game::{FallingShape, Game};
pub use round::{RoundController, RoundState};
