//! Testing utilities for the strategic generals
//!
//! [`GalaxyFixture`] assembles small hand-made galaxies: place colonies and
//! fleets, set treaties, then `build()` to get a [`Galaxy`] whose intel has
//! been refreshed from the ground truth.

use crate::ai::{StandardOracles, TurnContext};
use crate::colony::Colony;
use crate::diplomacy::{EmpireView, Stance};
use crate::empire::{Empire, EmpireId};
use crate::galaxy::Galaxy;
use crate::map::{Location, Planet, PlanetType, StarSystem, SystemId};
use crate::ships::{
    DesignId, DesignRoles, FleetId, ShipDesign, ShipFleet, ShipStack, Transport, TransportId,
};

pub static ORACLES: StandardOracles = StandardOracles;

/// Context over a galaxy using the standard oracles.
pub fn context(galaxy: &Galaxy) -> TurnContext<'_> {
    TurnContext::new(galaxy, &ORACLES)
}

pub struct GalaxyFixture {
    galaxy: Galaxy,
}

impl GalaxyFixture {
    /// Galaxy with `empires` factions, no systems and no contacts.
    pub fn new(empires: u16) -> Self {
        let empires = (0..empires)
            .map(|id| Empire::new(EmpireId(id), format!("Empire {id}")))
            .collect();
        Self {
            galaxy: Galaxy {
                turn: 1,
                empires,
                ..Default::default()
            },
        }
    }

    pub fn from_galaxy(galaxy: Galaxy) -> Self {
        Self { galaxy }
    }

    fn push_system(&mut self, location: Location, planet: Planet) -> SystemId {
        let id = SystemId(self.galaxy.systems.len() as u32);
        self.galaxy.systems.push(StarSystem::new(
            id,
            format!("System {}", id.0),
            location,
            planet,
        ));
        id
    }

    /// Terran colony whose planet is exactly full.
    pub fn add_colony(
        &mut self,
        owner: EmpireId,
        location: Location,
        population: f32,
        factories: f32,
    ) -> SystemId {
        let id = self.push_system(location, Planet::new(PlanetType::Terran, population));
        self.system_mut(id).colony = Some(Colony::new(owner, population, factories));
        id
    }

    /// Uncolonized size-50 terran world.
    pub fn add_empty(&mut self, location: Location) -> SystemId {
        self.push_system(location, Planet::new(PlanetType::Terran, 50.0))
    }

    pub fn system_mut(&mut self, id: SystemId) -> &mut StarSystem {
        &mut self.galaxy.systems[id.index()]
    }

    pub fn colony_mut(&mut self, id: SystemId) -> &mut Colony {
        self.galaxy.systems[id.index()]
            .colony
            .as_mut()
            .expect("system has no colony")
    }

    pub fn set_production(&mut self, id: SystemId, production: f32) {
        let colony = self.colony_mut(id);
        colony.production = production;
        colony.total_income = production;
    }

    pub fn empire_mut(&mut self, id: EmpireId) -> &mut Empire {
        &mut self.galaxy.empires[id.index()]
    }

    pub fn add_design(
        &mut self,
        owner: EmpireId,
        name: &str,
        cost: f32,
        roles: DesignRoles,
    ) -> DesignId {
        let lab = &mut self.empire_mut(owner).lab;
        let id = DesignId(lab.designs.len() as u16);
        lab.designs.push(ShipDesign::new(id, name, cost, roles));
        id
    }

    pub fn design_mut(&mut self, owner: EmpireId, id: DesignId) -> &mut ShipDesign {
        let lab = &mut self.empire_mut(owner).lab;
        lab.designs
            .iter_mut()
            .find(|design| design.id == id)
            .expect("unknown design")
    }

    fn find_or_add(
        &mut self,
        owner: EmpireId,
        name: &str,
        cost: f32,
        roles: DesignRoles,
        configure: impl FnOnce(&mut ShipDesign),
    ) -> DesignId {
        if let Some(design) = self
            .empire_mut(owner)
            .lab
            .designs
            .iter()
            .find(|design| design.name == name)
        {
            return design.id;
        }
        let id = self.add_design(owner, name, cost, roles);
        configure(self.design_mut(owner, id));
        id
    }

    /// 20 BC warp-2 fighter with 3 firepower.
    pub fn fighter(&mut self, owner: EmpireId) -> DesignId {
        self.find_or_add(
            owner,
            "Fighter",
            20.0,
            DesignRoles::FIGHTER | DesignRoles::ARMED,
            |design| {
                design.warp = 2;
                design.firepower = 3.0;
                design.available_space = 20.0;
            },
        )
    }

    /// 50 BC warp-1 bomber with 10 bomb damage.
    pub fn bomber(&mut self, owner: EmpireId) -> DesignId {
        self.find_or_add(
            owner,
            "Bomber",
            50.0,
            DesignRoles::BOMBER | DesignRoles::ARMED,
            |design| {
                design.bomb_damage = 10.0;
                design.hull_points = 20.0;
            },
        )
    }

    /// 40 BC warp-2 destroyer with 5 firepower.
    pub fn destroyer(&mut self, owner: EmpireId) -> DesignId {
        self.find_or_add(
            owner,
            "Destroyer",
            40.0,
            DesignRoles::DESTROYER | DesignRoles::ARMED,
            |design| {
                design.warp = 2;
                design.firepower = 5.0;
                design.hull_points = 30.0;
            },
        )
    }

    /// 10 BC warp-3 scout hunter.
    pub fn repeller(&mut self, owner: EmpireId) -> DesignId {
        self.find_or_add(
            owner,
            "Repeller",
            10.0,
            DesignRoles::REPELLER | DesignRoles::ARMED,
            |design| {
                design.warp = 3;
                design.firepower = 1.0;
            },
        )
    }

    /// 100 BC colony ship with range 6.
    pub fn colonizer(&mut self, owner: EmpireId) -> DesignId {
        self.find_or_add(owner, "Colony Ship", 100.0, DesignRoles::COLONY, |design| {
            design.range = 6.0;
        })
    }

    /// Gives a faction the full set of standard designs.
    pub fn standard_designs(&mut self, owner: EmpireId) {
        self.fighter(owner);
        self.bomber(owner);
        self.destroyer(owner);
        self.colonizer(owner);
    }

    pub fn add_fleet(
        &mut self,
        owner: EmpireId,
        orbiting: SystemId,
        stacks: &[(DesignId, u32)],
    ) -> FleetId {
        let location = self.galaxy.systems[orbiting.index()].location;
        self.push_fleet(owner, location, Some(orbiting), None, stacks)
    }

    pub fn add_fleet_in_transit(
        &mut self,
        owner: EmpireId,
        location: Location,
        destination: SystemId,
        stacks: &[(DesignId, u32)],
    ) -> FleetId {
        self.push_fleet(owner, location, None, Some(destination), stacks)
    }

    fn push_fleet(
        &mut self,
        owner: EmpireId,
        location: Location,
        orbiting: Option<SystemId>,
        destination: Option<SystemId>,
        stacks: &[(DesignId, u32)],
    ) -> FleetId {
        let id = FleetId(self.galaxy.fleets.len() as u32);
        self.galaxy.fleets.push(ShipFleet {
            id,
            owner,
            location,
            orbiting,
            destination,
            eta_known: true,
            stacks: stacks
                .iter()
                .map(|(design, count)| ShipStack {
                    design: *design,
                    count: *count,
                })
                .collect(),
        });
        id
    }

    pub fn add_transport(
        &mut self,
        owner: EmpireId,
        location: Location,
        destination: SystemId,
        size: u32,
    ) -> TransportId {
        let id = TransportId(self.galaxy.transports.len() as u32);
        self.galaxy.transports.push(Transport {
            id,
            owner,
            location,
            destination,
            size,
            eta_known: true,
        });
        id
    }

    /// Every faction knows every other faction, without treaties.
    pub fn contact_all(&mut self) {
        let ids: Vec<EmpireId> = self.galaxy.empires.iter().map(|empire| empire.id).collect();
        for empire in &mut self.galaxy.empires {
            for other in &ids {
                if *other != empire.id {
                    empire
                        .contacts
                        .entry(*other)
                        .or_insert_with(|| EmpireView::new(*other));
                }
            }
        }
    }

    /// Sets the treaty in both directions, creating contact if needed.
    pub fn set_stance(&mut self, a: EmpireId, b: EmpireId, stance: Stance) {
        self.empire_mut(a)
            .contacts
            .entry(b)
            .or_insert_with(|| EmpireView::new(b))
            .stance = stance;
        self.empire_mut(b)
            .contacts
            .entry(a)
            .or_insert_with(|| EmpireView::new(a))
            .stance = stance;
    }

    pub fn view_mut(&mut self, viewer: EmpireId, other: EmpireId) -> &mut EmpireView {
        self.empire_mut(viewer)
            .contacts
            .entry(other)
            .or_insert_with(|| EmpireView::new(other))
    }

    pub fn build(mut self) -> Galaxy {
        self.galaxy.refresh_intel();
        self.galaxy
    }
}
