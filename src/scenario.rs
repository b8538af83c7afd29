//! Reproducible random galaxies for benches and stress tests.
//!
//! Every faction gets a home world on a ring around the center, the standard
//! ship designs and a small home fleet. Remaining systems are scattered over a
//! square map; some of them start settled by whichever faction lives closest.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;

use crate::colony::Colony;
use crate::diplomacy::{EmpireView, Stance};
use crate::empire::{Empire, EmpireId};
use crate::galaxy::Galaxy;
use crate::map::{Location, Planet, PlanetType, ResourceTier, StarSystem, SystemId};
use crate::ships::{DesignId, DesignRoles, FleetId, ShipDesign, ShipFleet, ShipLab, ShipStack};

const PLANET_KINDS: [PlanetType; 10] = [
    PlanetType::Terran,
    PlanetType::Ocean,
    PlanetType::Jungle,
    PlanetType::Arid,
    PlanetType::Steppe,
    PlanetType::Desert,
    PlanetType::Tundra,
    PlanetType::Barren,
    PlanetType::Dead,
    PlanetType::Toxic,
];

const RESOURCE_TIERS: [ResourceTier; 5] = [
    ResourceTier::UltraPoor,
    ResourceTier::Poor,
    ResourceTier::Normal,
    ResourceTier::Rich,
    ResourceTier::UltraRich,
];

/// Design slots of [`standard_lab`].
pub const FIGHTER: DesignId = DesignId(0);
pub const BOMBER: DesignId = DesignId(1);
pub const DESTROYER: DesignId = DesignId(2);
pub const REPELLER: DesignId = DesignId(3);
pub const COLONY_SHIP: DesignId = DesignId(4);

#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("a galaxy needs at least one faction")]
    NoEmpires,
    #[error("{systems} systems cannot hold {empires} home worlds")]
    TooFewSystems { systems: usize, empires: u16 },
    #[error("galaxy radius must be a positive finite number, got {0}")]
    InvalidRadius(f32),
    #[error("{field} must lie in [0, 1], got {value}")]
    InvalidShare { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyParams {
    pub empires: u16,
    pub systems: usize,
    /// Half the side of the square map, in light years.
    pub radius: f32,
    /// Chance that a non-home system starts settled.
    pub settled_share: f64,
    /// Chance that two factions start at war.
    pub war_chance: f64,
    pub seed: u64,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            empires: 4,
            systems: 48,
            radius: 12.0,
            settled_share: 0.25,
            war_chance: 0.3,
            seed: 0x5EED,
        }
    }
}

impl GalaxyParams {
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.empires == 0 {
            return Err(ScenarioError::NoEmpires);
        }
        if self.systems < usize::from(self.empires) {
            return Err(ScenarioError::TooFewSystems {
                systems: self.systems,
                empires: self.empires,
            });
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ScenarioError::InvalidRadius(self.radius));
        }
        for (field, value) in [
            ("settled_share", self.settled_share),
            ("war_chance", self.war_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ScenarioError::InvalidShare { field, value });
            }
        }
        Ok(())
    }
}

/// The design set every generated faction starts with.
pub fn standard_lab() -> ShipLab {
    let mut fighter = ShipDesign::new(
        FIGHTER,
        "Fighter",
        20.0,
        DesignRoles::FIGHTER | DesignRoles::ARMED,
    );
    fighter.warp = 2;
    fighter.firepower = 3.0;
    fighter.available_space = 20.0;

    let mut bomber = ShipDesign::new(
        BOMBER,
        "Bomber",
        50.0,
        DesignRoles::BOMBER | DesignRoles::ARMED,
    );
    bomber.bomb_damage = 10.0;
    bomber.hull_points = 20.0;

    let mut destroyer = ShipDesign::new(
        DESTROYER,
        "Destroyer",
        40.0,
        DesignRoles::DESTROYER | DesignRoles::ARMED,
    );
    destroyer.warp = 2;
    destroyer.firepower = 5.0;
    destroyer.hull_points = 30.0;

    let mut repeller = ShipDesign::new(
        REPELLER,
        "Repeller",
        10.0,
        DesignRoles::REPELLER | DesignRoles::ARMED,
    );
    repeller.warp = 3;
    repeller.firepower = 1.0;

    let mut colony_ship = ShipDesign::new(COLONY_SHIP, "Colony Ship", 100.0, DesignRoles::COLONY);
    colony_ship.range = 6.0;

    ShipLab {
        designs: vec![fighter, bomber, destroyer, repeller, colony_ship],
        need_scouts: false,
    }
}

pub struct GalaxyGenerator {
    params: GalaxyParams,
    rng: StdRng,
}

impl GalaxyGenerator {
    pub fn new(params: GalaxyParams) -> Result<Self, ScenarioError> {
        params.validate()?;
        let rng = StdRng::seed_from_u64(params.seed);
        Ok(Self { params, rng })
    }

    pub fn params(&self) -> &GalaxyParams {
        &self.params
    }

    pub fn generate(&mut self) -> Galaxy {
        let mut galaxy = Galaxy {
            turn: 1,
            ..Default::default()
        };

        for index in 0..self.params.empires {
            let id = EmpireId(index);
            let mut empire = Empire::new(id, format!("Empire {index}"));
            empire.lab = standard_lab();
            empire.military_power_level = self.rng.random_range(50.0..150.0);
            empire.power_level = empire.military_power_level * 2.0;
            empire.ship_maint_cost_per_bc = self.rng.random_range(0.5..2.0);
            empire.missile_base_cost_per_bc = self.rng.random_range(0.5..2.0);
            galaxy.empires.push(empire);
        }

        let homes = self.home_locations();
        for (index, location) in homes.iter().enumerate() {
            let id = SystemId(galaxy.systems.len() as u32);
            let mut system = StarSystem::new(
                id,
                format!("Home {index}"),
                *location,
                Planet::new(PlanetType::Terran, 100.0),
            );
            system.colony = Some(Colony::new(EmpireId(index as u16), 100.0, 60.0));
            galaxy.systems.push(system);
        }

        let radius = self.params.radius;
        while galaxy.systems.len() < self.params.systems {
            let id = SystemId(galaxy.systems.len() as u32);
            let location = Location::new(
                self.rng.random_range(-radius..radius),
                self.rng.random_range(-radius..radius),
            );
            let kind = PLANET_KINDS[self.rng.random_range(0..PLANET_KINDS.len())];
            let mut planet = Planet::new(kind, self.rng.random_range(2..=12) as f32 * 10.0);
            planet.resource = RESOURCE_TIERS[self.rng.random_range(0..RESOURCE_TIERS.len())];
            let mut system = StarSystem::new(id, format!("System {}", id.0), location, planet);
            system.in_nebula = self.rng.random_bool(0.1);

            if self.rng.random_bool(self.params.settled_share) {
                let owner = nearest_home(&homes, location);
                let population = self.rng.random_range(10.0..system.planet.current_size);
                let factories = self.rng.random_range(0.0..population);
                system.colony = Some(Colony::new(owner, population, factories));
            }
            galaxy.systems.push(system);
        }

        for index in 0..self.params.empires {
            let owner = EmpireId(index);
            let home = SystemId(u32::from(index));
            let stacks = vec![
                ShipStack {
                    design: FIGHTER,
                    count: self.rng.random_range(1..=6),
                },
                ShipStack {
                    design: BOMBER,
                    count: self.rng.random_range(0..=3),
                },
            ];
            galaxy.fleets.push(ShipFleet {
                id: FleetId(galaxy.fleets.len() as u32),
                owner,
                location: homes[usize::from(index)],
                orbiting: Some(home),
                destination: None,
                eta_known: true,
                stacks,
            });
        }

        self.sign_treaties(&mut galaxy);
        galaxy.refresh_intel();
        debug!(
            "Generated galaxy with {} systems and {} factions (seed {})",
            galaxy.systems.len(),
            galaxy.empires.len(),
            self.params.seed
        );
        galaxy
    }

    /// Home worlds evenly spaced on a ring at two thirds of the radius.
    fn home_locations(&self) -> Vec<Location> {
        let count = self.params.empires;
        let ring = self.params.radius * 2.0 / 3.0;
        (0..count)
            .map(|index| {
                let angle = TAU * f32::from(index) / f32::from(count);
                Location::new(ring * angle.cos(), ring * angle.sin())
            })
            .collect()
    }

    /// Every pair meets; some start at war. Stances are symmetric.
    fn sign_treaties(&mut self, galaxy: &mut Galaxy) {
        let count = galaxy.empires.len();
        for a in 0..count {
            for b in (a + 1)..count {
                let stance = if self.rng.random_bool(self.params.war_chance) {
                    Stance::War
                } else {
                    Stance::NoTreaty
                };
                let (first, second) = (galaxy.empires[a].id, galaxy.empires[b].id);
                galaxy.empires[a]
                    .contacts
                    .insert(second, EmpireView::new(second).with_stance(stance));
                galaxy.empires[b]
                    .contacts
                    .insert(first, EmpireView::new(first).with_stance(stance));
            }
        }
    }
}

fn nearest_home(homes: &[Location], location: Location) -> EmpireId {
    let mut nearest = 0;
    let mut best = f32::MAX;
    for (index, home) in homes.iter().enumerate() {
        let distance = home.distance_to(location);
        if distance < best {
            best = distance;
            nearest = index;
        }
    }
    EmpireId(nearest as u16)
}
