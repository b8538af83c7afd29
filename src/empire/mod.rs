//! Factions, their leaders, racial traits and their scouted view of the galaxy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diplomacy::{EmpireView, Stance};
use crate::map::{Artifact, PlanetType, ResourceTier, StarSystem, SystemId};
use crate::ships::ShipLab;

pub mod technology;

pub use technology::{BombWeapon, TechProfile};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmpireId(pub u16);

impl EmpireId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Personality {
    #[default]
    Erratic,
    Pacifist,
    Honorable,
    Ruthless,
    Aggressive,
    Xenophobic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Objective {
    #[default]
    Militarist,
    Ecologist,
    Diplomat,
    Industrialist,
    Expansionist,
    Technologist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Leader {
    pub personality: Personality,
    pub objective: Objective,
}

impl Leader {
    pub fn is_pacifist(&self) -> bool {
        self.personality == Personality::Pacifist
    }

    pub fn is_honorable(&self) -> bool {
        self.personality == Personality::Honorable
    }

    pub fn is_ruthless(&self) -> bool {
        self.personality == Personality::Ruthless
    }

    pub fn is_aggressive(&self) -> bool {
        self.personality == Personality::Aggressive
    }

    pub fn is_diplomat(&self) -> bool {
        self.objective == Objective::Diplomat
    }

    pub fn is_technologist(&self) -> bool {
        self.objective == Objective::Technologist
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaceTraits {
    pub growth_rate_mod: f32,
    pub ground_attack_bonus: f32,
    pub ship_attack_bonus: f32,
    pub ship_defense_bonus: f32,
    pub spy_infiltration_adj: f32,
    pub trade_pct_bonus: f32,
    pub ignores_planet_environment: bool,
}

impl Default for RaceTraits {
    fn default() -> Self {
        Self {
            growth_rate_mod: 1.0,
            ground_attack_bonus: 0.0,
            ship_attack_bonus: 0.0,
            ship_defense_bonus: 0.0,
            spy_infiltration_adj: 0.0,
            trade_pct_bonus: 0.0,
            ignores_planet_environment: false,
        }
    }
}

/// Last scouting report a faction holds about a system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoutReport {
    pub owner: Option<EmpireId>,
    pub kind: PlanetType,
    pub resource: ResourceTier,
    pub artifact: Artifact,
    pub size: f32,
    pub factories: f32,
    pub population: f32,
    pub bases: u32,
}

/// A faction's scouted view of one system.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemIntel {
    pub scouted: bool,
    pub explored: bool,
    pub in_ship_range: bool,
    /// Distance from the nearest owned colony.
    pub distance: f32,
    /// Within ship range of another faction's colony.
    pub border: bool,
    pub hostility: f32,
    pub report: Option<ScoutReport>,
}

static UNKNOWN_SYSTEM: SystemIntel = SystemIntel {
    scouted: false,
    explored: false,
    in_ship_range: false,
    distance: f32::MAX,
    border: false,
    hostility: 0.0,
    report: None,
};

impl ScoutReport {
    /// Report of everything currently true about a system.
    pub fn of(system: &StarSystem) -> Self {
        let colony = system.colony.as_ref();
        Self {
            owner: system.owner(),
            kind: system.planet.kind,
            resource: system.planet.resource,
            artifact: system.planet.artifact,
            size: system.planet.current_size,
            factories: colony.map_or(0.0, |colony| colony.factories),
            population: colony.map_or(0.0, |colony| colony.population),
            bases: colony.map_or(0, |colony| colony.defense.bases),
        }
    }
}

impl SystemIntel {
    pub fn owner(&self) -> Option<EmpireId> {
        self.report.and_then(|report| report.owner)
    }

    pub fn is_colonized(&self) -> bool {
        self.owner().is_some()
    }

    pub fn planet_type(&self) -> Option<PlanetType> {
        self.report.map(|report| report.kind)
    }

    pub fn size(&self) -> f32 {
        self.report.map_or(0.0, |report| report.size)
    }

    pub fn factories(&self) -> f32 {
        self.report.map_or(0.0, |report| report.factories)
    }

    pub fn population(&self) -> f32 {
        self.report.map_or(0.0, |report| report.population)
    }

    pub fn bases(&self) -> u32 {
        self.report.map_or(0, |report| report.bases)
    }

    pub fn resource(&self) -> Option<ResourceTier> {
        self.report.map(|report| report.resource)
    }

    pub fn artifact(&self) -> Artifact {
        self.report.map_or(Artifact::None, |report| report.artifact)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Empire {
    pub id: EmpireId,
    pub name: String,
    pub ai_controlled: bool,
    /// Still owns colonies or fleets.
    pub active: bool,
    pub leader: Leader,
    pub race: RaceTraits,
    pub tech: TechProfile,
    pub lab: ShipLab,
    pub contacts: BTreeMap<EmpireId, EmpireView>,
    /// Scouted view of every system, indexed by [`SystemId`].
    pub intel: Vec<SystemIntel>,
    pub power_level: f32,
    pub military_power_level: f32,
    pub missile_base_cost_per_bc: f32,
    pub ship_maint_cost_per_bc: f32,
    /// Scanners reveal planets without scouting them.
    pub scan_planets: bool,
}

impl Empire {
    pub fn new(id: EmpireId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ai_controlled: true,
            active: true,
            leader: Leader::default(),
            race: RaceTraits::default(),
            tech: TechProfile::default(),
            lab: ShipLab::default(),
            contacts: BTreeMap::new(),
            intel: Vec::new(),
            power_level: 0.0,
            military_power_level: 0.0,
            missile_base_cost_per_bc: 0.0,
            ship_maint_cost_per_bc: 0.0,
            scan_planets: false,
        }
    }

    pub fn intel(&self, system: SystemId) -> &SystemIntel {
        self.intel.get(system.index()).unwrap_or(&UNKNOWN_SYSTEM)
    }

    pub fn view(&self, other: EmpireId) -> Option<&EmpireView> {
        self.contacts.get(&other)
    }

    pub fn stance_toward(&self, other: EmpireId) -> Option<Stance> {
        self.view(other).map(|view| view.stance)
    }

    pub fn has_contact(&self, other: EmpireId) -> bool {
        self.contacts.contains_key(&other)
    }

    pub fn contacted(&self) -> impl Iterator<Item = EmpireId> + '_ {
        self.contacts.keys().copied().filter(move |id| *id != self.id)
    }

    pub fn is_at_war_with(&self, other: EmpireId) -> bool {
        self.stance_toward(other).is_some_and(Stance::is_war)
    }

    pub fn is_allied_with(&self, other: EmpireId) -> bool {
        self.stance_toward(other) == Some(Stance::Alliance)
    }

    pub fn aggressive_with(&self, other: EmpireId) -> bool {
        other != self.id
            && self
                .stance_toward(other)
                .is_some_and(Stance::can_attack_without_penalty)
    }

    pub fn war_enemies(&self) -> impl Iterator<Item = EmpireId> + '_ {
        self.contacts
            .values()
            .filter(|view| view.stance.is_war())
            .map(|view| view.empire)
    }

    pub fn allies(&self) -> impl Iterator<Item = EmpireId> + '_ {
        self.contacts
            .values()
            .filter(|view| view.stance == Stance::Alliance)
            .map(|view| view.empire)
    }

    pub fn num_enemies(&self) -> usize {
        self.war_enemies().count()
    }

    pub fn at_war(&self) -> bool {
        self.num_enemies() > 0
    }

    pub fn can_colonize(&self, kind: PlanetType) -> bool {
        self.tech
            .can_colonize(kind, self.race.ignores_planet_environment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_systems_report_nothing() {
        let empire = Empire::new(EmpireId(0), "Alkari");
        let intel = empire.intel(SystemId(42));
        assert!(!intel.scouted);
        assert!(!intel.is_colonized());
        assert_eq!(intel.factories(), 0.0);
    }

    #[test]
    fn war_enemies_follow_stance() {
        let mut empire = Empire::new(EmpireId(0), "Alkari");
        empire
            .contacts
            .insert(EmpireId(1), EmpireView::new(EmpireId(1)).with_stance(Stance::War));
        empire.contacts.insert(
            EmpireId(2),
            EmpireView::new(EmpireId(2)).with_stance(Stance::Alliance),
        );
        empire
            .contacts
            .insert(EmpireId(3), EmpireView::new(EmpireId(3)).with_stance(Stance::Pact));

        assert_eq!(empire.war_enemies().collect::<Vec<_>>(), vec![EmpireId(1)]);
        assert!(empire.is_allied_with(EmpireId(2)));
        assert!(empire.aggressive_with(EmpireId(1)));
        assert!(!empire.aggressive_with(EmpireId(3)));
        assert!(!empire.aggressive_with(EmpireId(0)));
        assert!(empire.at_war());
    }
}
