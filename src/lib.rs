//! Snake Arcade - the classic Snake game with timed bonus food
//!
//! This library provides:
//! - Core game logic and tick gating (game module)
//! - Session state machine around rounds (session module)
//! - High score persistence (highscore module)
//! - Audio cue sinks (audio module)
//! - TUI rendering and input (render, input modules)
//! - Execution modes (human, headless)

pub mod audio;
pub mod error;
pub mod game;
pub mod highscore;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod session;

pub use error::{HighScoreError, ResourceError};
pub use session::{Phase, Session};
