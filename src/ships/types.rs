use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::empire::EmpireId;
use crate::map::{Location, SystemId};

/// Slot of a design inside its owner's [`ShipLab`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DesignId(pub u16);

bitflags! {
    /// What a ship design is good for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct DesignRoles: u8 {
        const COLONY = 1 << 0;
        const FIGHTER = 1 << 1;
        const BOMBER = 1 << 2;
        const DESTROYER = 1 << 3;
        const ARMED = 1 << 4;
        /// Fast armed hull able to chase off enemy scouts.
        const REPELLER = 1 << 5;
    }
}

/// Roles a design oracle is asked to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DesignRole {
    Colonizer,
    Repeller,
    Fighter,
    Bomber,
    Destroyer,
}

impl DesignRole {
    pub fn flags(self) -> DesignRoles {
        match self {
            DesignRole::Colonizer => DesignRoles::COLONY,
            DesignRole::Repeller => DesignRoles::REPELLER,
            DesignRole::Fighter => DesignRoles::FIGHTER,
            DesignRole::Bomber => DesignRoles::BOMBER,
            DesignRole::Destroyer => DesignRoles::DESTROYER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipDesign {
    pub id: DesignId,
    pub name: String,
    pub cost: f32,
    pub warp: u32,
    pub hull_points: f32,
    /// Ship-combat damage per round.
    pub firepower: f32,
    /// Planetary bombardment damage per round, before shields.
    pub bomb_damage: f32,
    pub total_space: f32,
    pub available_space: f32,
    pub range: f32,
    /// Hull size class, 0 (small) to 3 (huge).
    pub size: u8,
    pub roles: DesignRoles,
    /// Environment level of the colony module, for colonizers.
    pub colony_environment_level: Option<u8>,
    pub active: bool,
}

impl ShipDesign {
    pub fn new(id: DesignId, name: impl Into<String>, cost: f32, roles: DesignRoles) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            warp: 1,
            hull_points: 10.0,
            firepower: 0.0,
            bomb_damage: 0.0,
            total_space: 100.0,
            available_space: 0.0,
            range: 4.0,
            size: 1,
            roles,
            colony_environment_level: None,
            active: true,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.roles.contains(DesignRoles::ARMED)
    }

    pub fn has_colony_special(&self) -> bool {
        self.roles.contains(DesignRoles::COLONY)
    }

    pub fn fills(&self, role: DesignRole) -> bool {
        self.roles.contains(role.flags())
    }

    /// Share of the hull occupied by actual equipment.
    pub fn space_used(&self) -> f32 {
        if self.total_space <= 0.0 {
            return 0.0;
        }
        1.0 - self.available_space / self.total_space
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipLab {
    pub designs: Vec<ShipDesign>,
    /// Scouts are still being built; repellers only matter while they are.
    pub need_scouts: bool,
}

impl ShipLab {
    pub fn design(&self, id: DesignId) -> Option<&ShipDesign> {
        self.designs.iter().find(|design| design.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FleetId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipStack {
    pub design: DesignId,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipFleet {
    pub id: FleetId,
    pub owner: EmpireId,
    pub location: Location,
    pub orbiting: Option<SystemId>,
    pub destination: Option<SystemId>,
    /// The viewer can tell when this fleet arrives.
    pub eta_known: bool,
    pub stacks: Vec<ShipStack>,
}

impl ShipFleet {
    pub fn in_transit(&self) -> bool {
        self.orbiting.is_none() && self.destination.is_some()
    }

    pub fn ship_count(&self) -> u32 {
        self.stacks.iter().map(|stack| stack.count).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransportId(pub u32);

/// Troop transport in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transport {
    pub id: TransportId,
    pub owner: EmpireId,
    pub location: Location,
    pub destination: SystemId,
    pub size: u32,
    pub eta_known: bool,
}
