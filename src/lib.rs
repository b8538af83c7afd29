//! Stellar General - strategic planning for computer factions in a space 4X
//!
//! Each turn a faction's [`ai::General`] reads the shared [`galaxy::Galaxy`]
//! snapshot, revises a fleet plan for every star system and issues shipyard
//! and troop orders for the host game to carry out.

pub mod ai;
pub mod colony;
pub mod config;
pub mod constants;
pub mod diplomacy;
pub mod empire;
pub mod galaxy;
pub mod map;
pub mod orders;
pub mod scenario;
pub mod ships;
pub mod turn_system;

pub use ai::GeneralPlugin;

#[cfg(test)]
pub mod test_utils;
