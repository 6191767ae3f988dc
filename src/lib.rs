//! Stellar Regency - deterministic per-turn simulation kernel
//!
//! Each turn advances the clock, runs the character phases in a fixed order
//! and settles the economy: ship and infrastructure upkeep, trade and
//! smuggling income, and loan servicing. Every phase is fault isolated so a
//! failure in one never prevents the rest of the turn from running.

pub mod core;
pub mod economy;
pub mod galaxy;
pub mod turn;
pub mod world;
