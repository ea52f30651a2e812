//! Ladder battle subsystem: deterministic resolver, tuning table, wire
//! types and the HTTP surface.

pub mod endpoints;
pub mod resolve;
pub mod rng;
pub mod tuning;
pub mod types;

pub use resolve::resolve_battle;
pub use tuning::Tuning;
