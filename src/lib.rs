// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Reckon: a numbers-game solver driven by genetic programming.
//!
//! Given a goal and a pool of integers, the solver searches for an
//! arithmetic expression over `+ - * /` that uses each pool entry at most
//! once and evaluates to the goal.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI (solve, batch) / TOML config  │
//! ├─────────────────────────────────────┤
//! │   Population engine (gp::evolution) │
//! ├─────────────────────────────────────┤
//! │   Chromosome + ExprTree (gp)        │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod gp;

pub use error::{ConfigError, EvolutionError, StructuralError};
