#![allow(dead_code)]

use stellar_general::ai::{StandardOracles, TurnContext};
use stellar_general::colony::Colony;
use stellar_general::diplomacy::{EmpireView, Stance};
use stellar_general::empire::{Empire, EmpireId};
use stellar_general::galaxy::Galaxy;
use stellar_general::map::{Location, Planet, PlanetType, StarSystem, SystemId};
use stellar_general::scenario::standard_lab;
use stellar_general::ships::{DesignId, FleetId, ShipFleet, ShipStack};

pub static ORACLES: StandardOracles = StandardOracles;

pub fn context(galaxy: &Galaxy) -> TurnContext<'_> {
    TurnContext::new(galaxy, &ORACLES)
}

/// Hand-placed galaxy where every faction owns the standard designs.
pub struct GalaxyBuilder {
    galaxy: Galaxy,
}

impl GalaxyBuilder {
    pub fn new(empires: u16) -> Self {
        let empires = (0..empires)
            .map(|id| {
                let mut empire = Empire::new(EmpireId(id), format!("Empire {id}"));
                empire.lab = standard_lab();
                empire
            })
            .collect();
        Self {
            galaxy: Galaxy {
                turn: 10,
                empires,
                ..Default::default()
            },
        }
    }

    fn push_system(&mut self, location: Location, size: f32) -> SystemId {
        let id = SystemId(self.galaxy.systems.len() as u32);
        self.galaxy.systems.push(StarSystem::new(
            id,
            format!("System {}", id.0),
            location,
            Planet::new(PlanetType::Terran, size),
        ));
        id
    }

    pub fn colony(&mut self, owner: EmpireId, location: Location, population: f32, factories: f32) -> SystemId {
        let id = self.push_system(location, population);
        self.galaxy.systems[id.index()].colony = Some(Colony::new(owner, population, factories));
        id
    }

    pub fn empty(&mut self, location: Location) -> SystemId {
        self.push_system(location, 50.0)
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

    pub fn empire_mut(&mut self, id: EmpireId) -> &mut Empire {
        &mut self.galaxy.empires[id.index()]
    }

    pub fn fleet(&mut self, owner: EmpireId, orbiting: SystemId, stacks: &[(DesignId, u32)]) -> FleetId {
        let location = self.galaxy.systems[orbiting.index()].location;
        self.push_fleet(owner, location, Some(orbiting), None, stacks)
    }

    pub fn fleet_in_transit(
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

    /// Sets the treaty in both directions, creating contact if needed.
    pub fn stance(&mut self, a: EmpireId, b: EmpireId, stance: Stance) {
        for (from, to) in [(a, b), (b, a)] {
            self.empire_mut(from)
                .contacts
                .entry(to)
                .or_insert_with(|| EmpireView::new(to))
                .stance = stance;
        }
    }

    pub fn build(mut self) -> Galaxy {
        self.galaxy.refresh_intel();
        self.galaxy
    }
}
