//! Retro Space - a single-player arcade shooter.
//!
//! Core modules:
//! - `entities`: pure game data (bodies, player, enemies, bullets, particles)
//! - `collision`: axis-aligned bounding boxes and hit resolution
//! - `spawner`: enemy spawning, explosion bursts, starfield
//! - `compute`: the state machine and per-tick update
//! - `render`: the per-frame draw list handed to a display
//! - `input`, `config`, `error`: input snapshot, settings, error types

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod input;
pub mod render;
pub mod spawner;

pub use config::GameConfig;
pub use error::{ConfigError, EntityError};
