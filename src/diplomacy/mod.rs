//! One faction's intelligence and treaty record about another.

use serde::{Deserialize, Serialize};

use crate::empire::EmpireId;

/// Treaty state between two factions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stance {
    /// Contact without any treaty; either side may attack freely.
    #[default]
    NoTreaty,
    Pact,
    Alliance,
    War,
    /// War declared as the last stand of the game; bombing gets top priority.
    FinalWar,
}

impl Stance {
    pub fn is_war(self) -> bool {
        matches!(self, Stance::War | Stance::FinalWar)
    }

    /// Whether ships of the other faction can be engaged without a diplomatic penalty.
    pub fn can_attack_without_penalty(self) -> bool {
        matches!(self, Stance::NoTreaty | Stance::War | Stance::FinalWar)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentKind {
    Spying,
    Sabotage,
    BorderEncroachment,
    Atrocity,
    Trade,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub kind: IncidentKind,
    pub severity: f32,
}

impl Incident {
    pub fn is_spying(&self) -> bool {
        self.kind == IncidentKind::Spying
    }
}

/// What our spies believe about another faction's technology.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpyEstimate {
    pub avg_tech_level: f32,
    /// Ground combat bonus the other faction enjoys when defending.
    pub troop_defense_adj: f32,
    pub weapon_level: f32,
}

impl Default for SpyEstimate {
    fn default() -> Self {
        Self {
            avg_tech_level: 1.0,
            troop_defense_adj: 0.0,
            weapon_level: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmpireView {
    pub empire: EmpireId,
    pub stance: Stance,
    pub spy_estimate: SpyEstimate,
    pub incidents: Vec<Incident>,
    /// BC per turn earned from the trade treaty, if one exists.
    pub trade_profit: Option<f32>,
}

impl EmpireView {
    pub fn new(empire: EmpireId) -> Self {
        Self {
            empire,
            ..Default::default()
        }
    }

    pub fn with_stance(mut self, stance: Stance) -> Self {
        self.stance = stance;
        self
    }

    pub fn spying_severity(&self) -> f32 {
        self.incidents
            .iter()
            .filter(|incident| incident.is_spying())
            .map(|incident| incident.severity)
            .sum()
    }
}
