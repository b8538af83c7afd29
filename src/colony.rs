//! Colonies, their shipyards and planetary defenses.

use serde::{Deserialize, Serialize};

use crate::empire::EmpireId;
use crate::ships::DesignId;

/// Planetary defense as seen by attackers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Defense {
    /// Damage per combat round against unshielded targets.
    pub firepower: f32,
    pub shield_level: f32,
    pub bases: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shipyard {
    pub design: Option<DesignId>,
    pub building: bool,
    pub desired_ships: u32,
    /// BC already invested into the current design.
    pub queued_bc: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Colony {
    pub owner: EmpireId,
    pub population: f32,
    pub factories: f32,
    /// Net BC produced per turn.
    pub production: f32,
    /// Fraction of the colony's potential production currently realised (0..1).
    pub production_capacity: f32,
    pub total_income: f32,
    pub cleanup_cost: f32,
    pub rebels: f32,
    pub in_rebellion: bool,
    pub defense: Defense,
    pub shipyard: Shipyard,
    pub can_transport: bool,
    /// Largest transport this colony may launch this turn.
    pub max_transports_allowed: u32,
}

impl Colony {
    pub fn new(owner: EmpireId, population: f32, factories: f32) -> Self {
        Self {
            owner,
            population,
            factories,
            production: population + factories / 2.0,
            production_capacity: 1.0,
            total_income: population + factories / 2.0,
            cleanup_cost: 0.0,
            rebels: 0.0,
            in_rebellion: false,
            defense: Defense::default(),
            shipyard: Shipyard::default(),
            can_transport: true,
            max_transports_allowed: (population / 2.0).floor() as u32,
        }
    }

    /// Turns this colony needs to finish a ship of the given cost.
    pub fn turns_to_build(&self, design_cost: f32) -> f32 {
        if self.production <= 0.0 {
            return f32::MAX;
        }
        let remaining = (design_cost - self.shipyard.queued_bc).max(0.0);
        (remaining / self.production).ceil()
    }

    /// Production available for new ships after cleanup, scaled by planet output.
    pub fn ship_budget(&self, production_adj: f32) -> f32 {
        (self.total_income - self.cleanup_cost) * production_adj
    }
}
