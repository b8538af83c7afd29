//! Judgements the General borrows from other advisors.
//!
//! Ship design, fleet command and diplomacy each have their own AI in a full
//! game. The General only needs a handful of answers from them, collected in
//! [`Oracles`]. [`StandardOracles`] answers them with simple heuristics so a
//! General works without the rest of the AI stack.

use bevy_ecs::prelude::Resource;

use crate::empire::EmpireId;
use crate::galaxy::Galaxy;
use crate::map::SystemId;
use crate::ships::{DesignId, DesignRole, DesignRoles, ShipDesign, ShipFleet};

pub trait Oracles: Send + Sync {
    /// Design the faction should build for a role, if it has one.
    fn best_design(&self, galaxy: &Galaxy, empire: EmpireId, role: DesignRole) -> Option<DesignId>;

    /// Where ships of the given speed should gather before moving on `target`.
    fn optimal_staging_point(
        &self,
        galaxy: &Galaxy,
        empire: EmpireId,
        target: SystemId,
        speed: f32,
    ) -> Option<SystemId>;

    /// Chance in `0..=1` that a first invasion wave survives to land.
    fn bridgehead_confidence(&self, galaxy: &Galaxy, empire: EmpireId, target: SystemId) -> f32;

    /// How well a design suits ship combat, `0..=1`.
    fn fighting_adapted(&self, galaxy: &Galaxy, empire: EmpireId, design: DesignId) -> f32;

    /// BC of a fleet that counts as fighters, as judged by `viewer`.
    fn fighter_bc_value(&self, galaxy: &Galaxy, viewer: EmpireId, fleet: &ShipFleet) -> f32;

    /// Rank by military power among the faction and its contacts, 1 = strongest.
    fn military_rank(&self, galaxy: &Galaxy, empire: EmpireId) -> usize;

    /// Rank by population capacity among the faction and its contacts, 1 = largest.
    fn population_capacity_rank(&self, galaxy: &Galaxy, empire: EmpireId) -> usize;

    /// How good a colony is at producing ships.
    fn production_score(&self, galaxy: &Galaxy, empire: EmpireId, system: SystemId) -> f32;
}

/// Oracles shared by every General in the app.
#[derive(Resource)]
pub struct OracleSet(pub Box<dyn Oracles>);

impl Default for OracleSet {
    fn default() -> Self {
        Self(Box::new(StandardOracles))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardOracles;

impl StandardOracles {
    fn rank_by(galaxy: &Galaxy, empire: EmpireId, score: impl Fn(EmpireId) -> f32) -> usize {
        let Some(me) = galaxy.empire(empire) else {
            return 1;
        };
        let mine = score(empire);
        1 + me.contacted().filter(|other| score(*other) > mine).count()
    }
}

impl Oracles for StandardOracles {
    fn best_design(&self, galaxy: &Galaxy, empire: EmpireId, role: DesignRole) -> Option<DesignId> {
        let lab = &galaxy.empire(empire)?.lab;
        let candidates = lab
            .designs
            .iter()
            .filter(|design| design.active && design.fills(role));
        let best = match role {
            // Reach first, then price
            DesignRole::Colonizer => candidates.min_by(|a, b| {
                b.range
                    .total_cmp(&a.range)
                    .then(a.cost.total_cmp(&b.cost))
                    .then(a.id.cmp(&b.id))
            }),
            // Speed first, then price
            DesignRole::Repeller => candidates.min_by(|a, b| {
                b.warp
                    .cmp(&a.warp)
                    .then(a.cost.total_cmp(&b.cost))
                    .then(a.id.cmp(&b.id))
            }),
            DesignRole::Fighter | DesignRole::Bomber | DesignRole::Destroyer => {
                candidates.min_by(|a, b| a.cost.total_cmp(&b.cost).then(a.id.cmp(&b.id)))
            }
        };
        best.map(|design| design.id)
    }

    fn optimal_staging_point(
        &self,
        galaxy: &Galaxy,
        empire: EmpireId,
        target: SystemId,
        speed: f32,
    ) -> Option<SystemId> {
        galaxy
            .colonies_of(empire)
            .filter(|system| system.id != target)
            .map(|system| (system.id, galaxy.travel_time(system.id, target, speed)))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(system, _)| system)
    }

    fn bridgehead_confidence(&self, galaxy: &Galaxy, empire: EmpireId, target: SystemId) -> f32 {
        let mut ours = 0.0;
        let mut theirs = 0.0;
        for fleet in galaxy.orbiting_fleets(target) {
            if !galaxy.fleet_is_armed(fleet) {
                continue;
            }
            let value = galaxy.fleet_bc_value(fleet);
            if fleet.owner == empire {
                ours += value;
            } else {
                theirs += value;
            }
        }
        if ours + theirs <= 0.0 {
            return 0.0;
        }
        ours / (ours + theirs)
    }

    fn fighting_adapted(&self, galaxy: &Galaxy, empire: EmpireId, design: DesignId) -> f32 {
        galaxy
            .design(empire, design)
            .map_or(0.0, design_fighting_score)
    }

    fn fighter_bc_value(&self, galaxy: &Galaxy, _viewer: EmpireId, fleet: &ShipFleet) -> f32 {
        fleet
            .stacks
            .iter()
            .filter_map(|stack| {
                galaxy
                    .design(fleet.owner, stack.design)
                    .map(|design| design.cost * stack.count as f32 * design_fighting_score(design))
            })
            .sum()
    }

    fn military_rank(&self, galaxy: &Galaxy, empire: EmpireId) -> usize {
        Self::rank_by(galaxy, empire, |id| {
            galaxy
                .empire(id)
                .map_or(0.0, |empire| empire.military_power_level)
        })
    }

    fn population_capacity_rank(&self, galaxy: &Galaxy, empire: EmpireId) -> usize {
        Self::rank_by(galaxy, empire, |id| {
            galaxy
                .colonies_of(id)
                .map(|system| system.planet.current_size)
                .sum()
        })
    }

    fn production_score(&self, galaxy: &Galaxy, empire: EmpireId, system: SystemId) -> f32 {
        let Some(system) = galaxy.system(system) else {
            return 0.0;
        };
        match &system.colony {
            Some(colony) if colony.owner == empire => {
                colony.total_income * system.planet.production_adj
            }
            _ => 0.0,
        }
    }
}

fn design_fighting_score(design: &ShipDesign) -> f32 {
    if !design.is_armed() || design.has_colony_special() {
        return 0.0;
    }
    if design.roles.contains(DesignRoles::FIGHTER) {
        1.0
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Location;
    use crate::test_utils::GalaxyFixture;

    #[test]
    fn colonizer_prefers_range_over_price() {
        let mut fixture = GalaxyFixture::new(1);
        fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
        let cheap = fixture.colonizer(EmpireId(0));
        let far = fixture.add_design(
            EmpireId(0),
            "Long Range Colony Ship",
            200.0,
            DesignRoles::COLONY,
        );
        fixture.design_mut(EmpireId(0), far).range = 9.0;
        let galaxy = fixture.build();

        let best = StandardOracles.best_design(&galaxy, EmpireId(0), DesignRole::Colonizer);
        assert_eq!(best, Some(far));
        assert_ne!(best, Some(cheap));
    }

    #[test]
    fn staging_point_is_the_closest_colony() {
        let mut fixture = GalaxyFixture::new(1);
        fixture.add_colony(EmpireId(0), Location::new(0.0, 0.0), 50.0, 0.0);
        let near = fixture.add_colony(EmpireId(0), Location::new(8.0, 0.0), 20.0, 0.0);
        let target = fixture.add_empty(Location::new(10.0, 0.0));
        let galaxy = fixture.build();

        assert_eq!(
            StandardOracles.optimal_staging_point(&galaxy, EmpireId(0), target, 2.0),
            Some(near)
        );
        assert_eq!(
            StandardOracles.optimal_staging_point(&galaxy, EmpireId(1), target, 2.0),
            None
        );
    }

    #[test]
    fn ranks_count_stronger_contacts() {
        let mut fixture = GalaxyFixture::new(3);
        fixture.contact_all();
        fixture.empire_mut(EmpireId(0)).military_power_level = 50.0;
        fixture.empire_mut(EmpireId(1)).military_power_level = 80.0;
        fixture.empire_mut(EmpireId(2)).military_power_level = 10.0;
        let galaxy = fixture.build();

        assert_eq!(StandardOracles.military_rank(&galaxy, EmpireId(1)), 1);
        assert_eq!(StandardOracles.military_rank(&galaxy, EmpireId(0)), 2);
        assert_eq!(StandardOracles.military_rank(&galaxy, EmpireId(2)), 3);
    }

    #[test]
    fn bridgehead_needs_own_warships_in_orbit() {
        let mut fixture = GalaxyFixture::new(2);
        fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
        let target = fixture.add_colony(EmpireId(1), Location::new(3.0, 0.0), 30.0, 0.0);
        let fighter = fixture.fighter(EmpireId(0));
        let galaxy = fixture.build();
        assert_eq!(
            StandardOracles.bridgehead_confidence(&galaxy, EmpireId(0), target),
            0.0
        );

        let mut fixture = GalaxyFixture::from_galaxy(galaxy);
        fixture.add_fleet(EmpireId(0), target, &[(fighter, 2)]);
        let galaxy = fixture.build();
        assert_eq!(
            StandardOracles.bridgehead_confidence(&galaxy, EmpireId(0), target),
            1.0
        );
    }
}
