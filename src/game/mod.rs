//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Time is passed in by the caller, so every step is deterministic for a given seed.

pub mod clock;
pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use clock::TickGate;
pub use config::{BonusExpiry, GameConfig};
pub use direction::{Direction, DirectionController};
pub use engine::{GameEngine, SoundCue, StepInfo, StepResult};
pub use state::{BonusFood, CollisionType, GameState, Position, Snake};
