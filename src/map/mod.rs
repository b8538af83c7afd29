//! Star systems, planets and positions on the galaxy map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::colony::Colony;
use crate::empire::EmpireId;

/// Stable index of a star system inside [`crate::galaxy::Galaxy::systems`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SystemId(pub u32);

impl SystemId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A point in galaxy space, measured in light years.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: f32,
    pub y: f32,
}

impl Location {
    pub const ORIGIN: Location = Location { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Location) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_origin(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Planet environment classes, ordered roughly from friendly to hostile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlanetType {
    #[default]
    NoPlanet,
    Gaia,
    Terran,
    Ocean,
    Jungle,
    Arid,
    Steppe,
    Desert,
    Tundra,
    Barren,
    Dead,
    Inferno,
    Toxic,
    Radiated,
}

impl PlanetType {
    /// Environment-control level required to settle this world.
    ///
    /// Returns [`None`] when there is nothing to settle.
    pub fn environment_level(self) -> Option<u8> {
        match self {
            PlanetType::NoPlanet => None,
            PlanetType::Gaia
            | PlanetType::Terran
            | PlanetType::Ocean
            | PlanetType::Jungle
            | PlanetType::Arid
            | PlanetType::Steppe
            | PlanetType::Desert
            | PlanetType::Tundra => Some(0),
            PlanetType::Barren => Some(1),
            PlanetType::Dead => Some(2),
            PlanetType::Inferno => Some(3),
            PlanetType::Toxic => Some(4),
            PlanetType::Radiated => Some(5),
        }
    }
}

/// Economic output classification of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResourceTier {
    UltraPoor,
    Poor,
    #[default]
    Normal,
    Rich,
    UltraRich,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Artifact {
    #[default]
    None,
    Artifacts,
    OrionArtifacts,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Planet {
    pub kind: PlanetType,
    /// Current maximum population.
    pub current_size: f32,
    pub resource: ResourceTier,
    pub artifact: Artifact,
    /// Multiplier applied to colony income when converted into production.
    pub production_adj: f32,
    /// Factories left behind on this planet, keyed by the empire that built them.
    pub alien_factories: BTreeMap<EmpireId, f32>,
}

impl Planet {
    pub fn new(kind: PlanetType, current_size: f32) -> Self {
        Self {
            kind,
            current_size,
            production_adj: 1.0,
            ..Default::default()
        }
    }

    pub fn alien_factories(&self, builder: EmpireId) -> f32 {
        self.alien_factories.get(&builder).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarSystem {
    pub id: SystemId,
    pub name: String,
    pub location: Location,
    pub in_nebula: bool,
    /// A space monster currently guards the system.
    pub monster: bool,
    pub planet: Planet,
    pub colony: Option<Colony>,
}

impl StarSystem {
    pub fn new(id: SystemId, name: impl Into<String>, location: Location, planet: Planet) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            in_nebula: false,
            monster: false,
            planet,
            colony: None,
        }
    }

    pub fn owner(&self) -> Option<EmpireId> {
        self.colony.as_ref().map(|colony| colony.owner)
    }

    pub fn is_colonized(&self) -> bool {
        self.colony.is_some()
    }

    pub fn distance_to(&self, other: &StarSystem) -> f32 {
        self.location.distance_to(other.location)
    }
}
