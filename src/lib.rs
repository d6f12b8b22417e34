//! KONIVRER rules engine
//!
//! Card play, the Azoth resource ledger, combat, Life Cards with Burst,
//! and the turn/phase machine, with a notification channel for UIs and an
//! async driver for pluggable AI players.

pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod zones;

pub use error::{EngineError, Result};
