//! The capability surface every faction's General exposes.

use crate::ai::fleet_plan::FleetPlanTable;
use crate::ai::oracles::Oracles;
use crate::empire::EmpireId;
use crate::galaxy::Galaxy;
use crate::map::{Location, SystemId};
use crate::orders::TurnOrders;

/// Read-only world a General plans against for one turn.
#[derive(Clone, Copy)]
pub struct TurnContext<'a> {
    pub galaxy: &'a Galaxy,
    pub oracles: &'a dyn Oracles,
}

impl<'a> TurnContext<'a> {
    pub fn new(galaxy: &'a Galaxy, oracles: &'a dyn Oracles) -> Self {
        Self { galaxy, oracles }
    }
}

/// Strategic judgement of one faction.
///
/// Other advisors (diplomacy, governor, fleet command) query these answers
/// during the turn. Methods taking `&mut self` memoize their result until the
/// next [`General::next_turn`].
pub trait General: Send + Sync {
    fn empire(&self) -> EmpireId;

    /// True for the no-op implementation.
    fn is_passive(&self) -> bool;

    /// Starts a new turn: drops cached figures, rebuilds every fleet plan and
    /// returns the shipyard and transport orders issued along the way.
    fn next_turn(&mut self, ctx: TurnContext<'_>) -> TurnOrders;

    fn fleet_plans(&self) -> &FleetPlanTable;

    fn in_war_mode(&self, ctx: TurnContext<'_>) -> bool;

    /// Systems whose ship production should be hurried.
    fn rush_ship_systems(&self) -> &[SystemId];

    /// Owned systems that need defenses hurried.
    fn rush_defense_systems(&self) -> &[SystemId];

    fn invasion_priority(&self, ctx: TurnContext<'_>, system: SystemId) -> f32;

    fn best_victim(&mut self, ctx: TurnContext<'_>) -> Option<EmpireId>;

    fn biggest_threat(&mut self, ctx: TurnContext<'_>) -> EmpireId;

    /// Share of production that should go to defense, at least 0.5.
    fn defense_ratio(&mut self, ctx: TurnContext<'_>) -> f32;

    fn total_empire_population_capacity(&mut self, ctx: TurnContext<'_>, empire: EmpireId) -> f32;

    fn additional_colonizers_to_build(&mut self, ctx: TurnContext<'_>, potential: bool) -> u32;

    fn allowed_to_bomb(&self, ctx: TurnContext<'_>, system: SystemId) -> bool;

    fn strong_enough_to_attack(&mut self, ctx: TurnContext<'_>) -> bool;

    fn is_expander(&self, ctx: TurnContext<'_>) -> bool;

    fn is_invader(&self, ctx: TurnContext<'_>) -> bool;

    fn is_rusher(&self, ctx: TurnContext<'_>) -> bool;

    fn is_spy(&self, ctx: TurnContext<'_>) -> bool;

    fn is_trader(&self, ctx: TurnContext<'_>) -> bool;

    /// Turns `attacker` needs to wipe out `defender`; `f32::MAX` when it never can.
    fn time_to_kill(&self, ctx: TurnContext<'_>, attacker: EmpireId, defender: EmpireId) -> f32;

    fn war_roi(&mut self, ctx: TurnContext<'_>) -> f32;

    fn min_transport_size(&self) -> u32;

    fn need_scout_repellers(&self, ctx: TurnContext<'_>, potential: bool) -> bool;

    fn sense_potential_attack(&mut self, ctx: TurnContext<'_>) -> bool;

    fn colony_center(&self, ctx: TurnContext<'_>, empire: EmpireId) -> Location;

    fn fleet_center(&self, ctx: TurnContext<'_>, empire: EmpireId) -> Location;

    fn absolution(&self) -> f32;

    fn smart_power_level(&mut self, ctx: TurnContext<'_>) -> f32;

    fn highest_prod_score(&mut self, ctx: TurnContext<'_>) -> f32;

    /// Fraction of the projected game length already played.
    fn game_progress(&self, ctx: TurnContext<'_>) -> f32;

    /// Share of `subject`'s victim choice that would fall on `object` (or on us
    /// when `on_me_instead`) if we declared war on `object`.
    fn predict_empire_chance_to_declare_war_if_i_declared_war_on(
        &mut self,
        ctx: TurnContext<'_>,
        subject: EmpireId,
        object: EmpireId,
        on_me_instead: bool,
    ) -> f32;

    fn troops_necessary_to_take_planet(&self, ctx: TurnContext<'_>, system: SystemId) -> f32;
}

/// General for factions that do no strategic planning of their own.
///
/// Human players and the simplest difficulty get this one. It never plans,
/// never orders and answers every question with a neutral value.
#[derive(Debug, Clone)]
pub struct PassiveGeneral {
    empire: EmpireId,
    plans: FleetPlanTable,
}

impl PassiveGeneral {
    pub fn new(empire: EmpireId) -> Self {
        Self {
            empire,
            plans: FleetPlanTable::default(),
        }
    }
}

impl General for PassiveGeneral {
    fn empire(&self) -> EmpireId {
        self.empire
    }

    fn is_passive(&self) -> bool {
        true
    }

    fn next_turn(&mut self, ctx: TurnContext<'_>) -> TurnOrders {
        self.plans.reset(ctx.galaxy.system_count());
        TurnOrders::default()
    }

    fn fleet_plans(&self) -> &FleetPlanTable {
        &self.plans
    }

    fn in_war_mode(&self, ctx: TurnContext<'_>) -> bool {
        ctx.galaxy
            .empire(self.empire)
            .is_some_and(|empire| empire.at_war())
    }

    fn rush_ship_systems(&self) -> &[SystemId] {
        &[]
    }

    fn rush_defense_systems(&self) -> &[SystemId] {
        &[]
    }

    fn invasion_priority(&self, _ctx: TurnContext<'_>, _system: SystemId) -> f32 {
        0.0
    }

    fn best_victim(&mut self, _ctx: TurnContext<'_>) -> Option<EmpireId> {
        None
    }

    fn biggest_threat(&mut self, _ctx: TurnContext<'_>) -> EmpireId {
        self.empire
    }

    fn defense_ratio(&mut self, _ctx: TurnContext<'_>) -> f32 {
        0.5
    }

    fn total_empire_population_capacity(&mut self, _ctx: TurnContext<'_>, _empire: EmpireId) -> f32 {
        0.0
    }

    fn additional_colonizers_to_build(&mut self, _ctx: TurnContext<'_>, _potential: bool) -> u32 {
        0
    }

    fn allowed_to_bomb(&self, _ctx: TurnContext<'_>, _system: SystemId) -> bool {
        true
    }

    fn strong_enough_to_attack(&mut self, _ctx: TurnContext<'_>) -> bool {
        true
    }

    fn is_expander(&self, _ctx: TurnContext<'_>) -> bool {
        false
    }

    fn is_invader(&self, _ctx: TurnContext<'_>) -> bool {
        false
    }

    fn is_rusher(&self, _ctx: TurnContext<'_>) -> bool {
        false
    }

    fn is_spy(&self, _ctx: TurnContext<'_>) -> bool {
        false
    }

    fn is_trader(&self, _ctx: TurnContext<'_>) -> bool {
        false
    }

    fn time_to_kill(&self, _ctx: TurnContext<'_>, _attacker: EmpireId, _defender: EmpireId) -> f32 {
        f32::MAX
    }

    fn war_roi(&mut self, _ctx: TurnContext<'_>) -> f32 {
        f32::MAX
    }

    fn min_transport_size(&self) -> u32 {
        5
    }

    fn need_scout_repellers(&self, _ctx: TurnContext<'_>, _potential: bool) -> bool {
        false
    }

    fn sense_potential_attack(&mut self, _ctx: TurnContext<'_>) -> bool {
        false
    }

    fn colony_center(&self, _ctx: TurnContext<'_>, _empire: EmpireId) -> Location {
        Location::ORIGIN
    }

    fn fleet_center(&self, _ctx: TurnContext<'_>, _empire: EmpireId) -> Location {
        Location::ORIGIN
    }

    fn absolution(&self) -> f32 {
        1.0
    }

    fn smart_power_level(&mut self, _ctx: TurnContext<'_>) -> f32 {
        0.0
    }

    fn highest_prod_score(&mut self, _ctx: TurnContext<'_>) -> f32 {
        1.0
    }

    fn game_progress(&self, _ctx: TurnContext<'_>) -> f32 {
        0.0
    }

    fn predict_empire_chance_to_declare_war_if_i_declared_war_on(
        &mut self,
        _ctx: TurnContext<'_>,
        _subject: EmpireId,
        _object: EmpireId,
        _on_me_instead: bool,
    ) -> f32 {
        0.0
    }

    fn troops_necessary_to_take_planet(&self, _ctx: TurnContext<'_>, _system: SystemId) -> f32 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diplomacy::Stance;
    use crate::test_utils::{GalaxyFixture, context};

    fn two_at_war() -> Galaxy {
        let mut fixture = GalaxyFixture::new(2);
        fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
        fixture.add_colony(EmpireId(1), Location::new(3.0, 0.0), 50.0, 0.0);
        fixture.set_stance(EmpireId(0), EmpireId(1), Stance::War);
        fixture.build()
    }

    #[test]
    fn passive_general_never_plans() {
        let galaxy = two_at_war();
        let ctx = context(&galaxy);
        let mut general = PassiveGeneral::new(EmpireId(0));

        assert!(general.next_turn(ctx).is_empty());
        assert_eq!(general.fleet_plans().len(), 2);
        assert_eq!(general.fleet_plans().active().count(), 0);
        assert!(general.rush_ship_systems().is_empty());
        assert!(general.rush_defense_systems().is_empty());
        assert_eq!(general.best_victim(ctx), None);
        assert_eq!(general.biggest_threat(ctx), EmpireId(0));
        assert!(general.in_war_mode(ctx));
    }

    #[test]
    fn passive_general_answers_like_a_general_without_enemies() {
        let galaxy = two_at_war();
        let ctx = context(&galaxy);
        let mut general = PassiveGeneral::new(EmpireId(0));

        assert_eq!(general.absolution(), 1.0);
        assert_eq!(general.time_to_kill(ctx, EmpireId(1), EmpireId(0)), f32::MAX);
        assert_eq!(general.war_roi(ctx), f32::MAX);
        assert_eq!(general.defense_ratio(ctx), 0.5);
        assert!(general.strong_enough_to_attack(ctx));
        assert_eq!(general.min_transport_size(), 5);
        assert_eq!(general.colony_center(ctx, EmpireId(0)), Location::ORIGIN);
    }
}
