//! The full strategic General.
//!
//! Each turn [`StrategicAdvisor::next_turn`]:
//! 1. drops every cached figure of the previous turn,
//! 2. revises the fleet plan of every known system,
//! 3. reacts to threats, wars and opportunities found along the way,
//! 4. decides how many colony ships to order and where.
//!
//! The scoring itself is split across the sibling modules by concern.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::ai::cache::TurnCache;
use crate::ai::fleet_plan::FleetPlanTable;
use crate::ai::general::{General, TurnContext};
use crate::config::GeneralConfig;
use crate::empire::{Empire, EmpireId};
use crate::map::{Location, SystemId};
use crate::orders::TurnOrders;
use crate::ships::{FleetId, TransportId};

/// A visible hostile ship heading for a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomingShip {
    Fleet(FleetId),
    Transport(TransportId),
}

/// Full planning engine for one computer faction.
#[derive(Debug, Clone)]
pub struct StrategicAdvisor {
    pub(super) empire: EmpireId,
    pub(super) config: GeneralConfig,
    /// Total planetary production at the start of the turn.
    pub(super) civ_prod: f32,
    /// Average tech level at the start of the turn.
    pub(super) civ_tech: f32,
    pub(super) cache: TurnCache,
    pub(super) targeted: BTreeMap<SystemId, Vec<IncomingShip>>,
    pub(super) rush_defense: Vec<SystemId>,
    pub(super) rush_ships: Vec<SystemId>,
    pub(super) plans: FleetPlanTable,
    pub(super) orders: TurnOrders,
}

impl StrategicAdvisor {
    pub fn new(empire: EmpireId) -> Self {
        Self::with_config(empire, GeneralConfig::default())
    }

    pub fn with_config(empire: EmpireId, config: GeneralConfig) -> Self {
        Self {
            empire,
            config,
            civ_prod: 0.0,
            civ_tech: 0.0,
            cache: TurnCache::default(),
            targeted: BTreeMap::new(),
            rush_defense: Vec::new(),
            rush_ships: Vec::new(),
            plans: FleetPlanTable::default(),
            orders: TurnOrders::default(),
        }
    }

    pub fn config(&self) -> &GeneralConfig {
        &self.config
    }

    /// Orders issued so far this turn.
    pub fn pending_orders(&self) -> &TurnOrders {
        &self.orders
    }

    /// Hostile ships known to be heading for each system this turn.
    pub fn targeted_systems(&self) -> &BTreeMap<SystemId, Vec<IncomingShip>> {
        &self.targeted
    }

    pub(super) fn me<'a>(&self, ctx: TurnContext<'a>) -> Option<&'a Empire> {
        ctx.galaxy.empire(self.empire)
    }

    pub fn next_turn(&mut self, ctx: TurnContext<'_>) -> TurnOrders {
        let galaxy = ctx.galaxy;
        self.cache.reset();
        self.orders.clear();
        self.rush_defense.clear();
        self.rush_ships.clear();
        self.plans.reset(galaxy.system_count());

        let Some(me) = self.me(ctx) else {
            warn!("No empire {:?} in galaxy, skipping turn", self.empire);
            self.targeted.clear();
            return TurnOrders::default();
        };
        self.civ_prod = galaxy.production_of(self.empire);
        self.civ_tech = me.tech.avg_tech_level;
        self.reset_targeted_systems(ctx);

        let outcomes: Vec<_> = galaxy
            .systems
            .iter()
            .map(|system| (system.id, self.revise_fleet_plan(ctx, system.id)))
            .collect();
        self.evaluate_relationships(ctx, &outcomes);
        self.plan_colonizers(ctx);

        debug!(
            "{} turn {}: {} fleet plans, {} shipyard orders, {} transport orders",
            me.name,
            galaxy.turn,
            self.plans.active().count(),
            self.orders.shipyard().len(),
            self.orders.transports().len()
        );
        std::mem::take(&mut self.orders)
    }

    pub fn in_war_mode(&self, ctx: TurnContext<'_>) -> bool {
        self.me(ctx).is_some_and(Empire::at_war)
    }
}

impl General for StrategicAdvisor {
    fn empire(&self) -> EmpireId {
        self.empire
    }

    fn is_passive(&self) -> bool {
        false
    }

    fn next_turn(&mut self, ctx: TurnContext<'_>) -> TurnOrders {
        StrategicAdvisor::next_turn(self, ctx)
    }

    fn fleet_plans(&self) -> &FleetPlanTable {
        &self.plans
    }

    fn in_war_mode(&self, ctx: TurnContext<'_>) -> bool {
        StrategicAdvisor::in_war_mode(self, ctx)
    }

    fn rush_ship_systems(&self) -> &[SystemId] {
        &self.rush_ships
    }

    fn rush_defense_systems(&self) -> &[SystemId] {
        &self.rush_defense
    }

    fn invasion_priority(&self, ctx: TurnContext<'_>, system: SystemId) -> f32 {
        StrategicAdvisor::invasion_priority(self, ctx, system)
    }

    fn best_victim(&mut self, ctx: TurnContext<'_>) -> Option<EmpireId> {
        StrategicAdvisor::best_victim(self, ctx)
    }

    fn biggest_threat(&mut self, ctx: TurnContext<'_>) -> EmpireId {
        StrategicAdvisor::biggest_threat(self, ctx)
    }

    fn defense_ratio(&mut self, ctx: TurnContext<'_>) -> f32 {
        StrategicAdvisor::defense_ratio(self, ctx)
    }

    fn total_empire_population_capacity(&mut self, ctx: TurnContext<'_>, empire: EmpireId) -> f32 {
        StrategicAdvisor::total_empire_population_capacity(self, ctx, empire)
    }

    fn additional_colonizers_to_build(&mut self, ctx: TurnContext<'_>, potential: bool) -> u32 {
        StrategicAdvisor::additional_colonizers_to_build(self, ctx, potential)
    }

    fn allowed_to_bomb(&self, ctx: TurnContext<'_>, system: SystemId) -> bool {
        StrategicAdvisor::allowed_to_bomb(self, ctx, system)
    }

    fn strong_enough_to_attack(&mut self, ctx: TurnContext<'_>) -> bool {
        StrategicAdvisor::strong_enough_to_attack(self, ctx)
    }

    fn is_expander(&self, ctx: TurnContext<'_>) -> bool {
        StrategicAdvisor::is_expander(self, ctx)
    }

    fn is_invader(&self, ctx: TurnContext<'_>) -> bool {
        StrategicAdvisor::is_invader(self, ctx)
    }

    fn is_rusher(&self, ctx: TurnContext<'_>) -> bool {
        StrategicAdvisor::is_rusher(self, ctx)
    }

    fn is_spy(&self, ctx: TurnContext<'_>) -> bool {
        StrategicAdvisor::is_spy(self, ctx)
    }

    fn is_trader(&self, ctx: TurnContext<'_>) -> bool {
        StrategicAdvisor::is_trader(self, ctx)
    }

    fn time_to_kill(&self, ctx: TurnContext<'_>, attacker: EmpireId, defender: EmpireId) -> f32 {
        StrategicAdvisor::time_to_kill(self, ctx, attacker, defender)
    }

    fn war_roi(&mut self, ctx: TurnContext<'_>) -> f32 {
        StrategicAdvisor::war_roi(self, ctx)
    }

    fn min_transport_size(&self) -> u32 {
        1
    }

    fn need_scout_repellers(&self, ctx: TurnContext<'_>, potential: bool) -> bool {
        StrategicAdvisor::need_scout_repellers(self, ctx, potential)
    }

    fn sense_potential_attack(&mut self, ctx: TurnContext<'_>) -> bool {
        StrategicAdvisor::sense_potential_attack(self, ctx)
    }

    fn colony_center(&self, ctx: TurnContext<'_>, empire: EmpireId) -> Location {
        StrategicAdvisor::colony_center(self, ctx, empire)
    }

    fn fleet_center(&self, ctx: TurnContext<'_>, empire: EmpireId) -> Location {
        StrategicAdvisor::fleet_center(self, ctx, empire)
    }

    fn absolution(&self) -> f32 {
        1.0
    }

    fn smart_power_level(&mut self, ctx: TurnContext<'_>) -> f32 {
        StrategicAdvisor::smart_power_level(self, ctx)
    }

    fn highest_prod_score(&mut self, ctx: TurnContext<'_>) -> f32 {
        StrategicAdvisor::highest_prod_score(self, ctx)
    }

    fn game_progress(&self, ctx: TurnContext<'_>) -> f32 {
        StrategicAdvisor::game_progress(self, ctx)
    }

    fn predict_empire_chance_to_declare_war_if_i_declared_war_on(
        &mut self,
        ctx: TurnContext<'_>,
        subject: EmpireId,
        object: EmpireId,
        on_me_instead: bool,
    ) -> f32 {
        StrategicAdvisor::predict_empire_chance_to_declare_war_if_i_declared_war_on(
            self,
            ctx,
            subject,
            object,
            on_me_instead,
        )
    }

    fn troops_necessary_to_take_planet(&self, ctx: TurnContext<'_>, system: SystemId) -> f32 {
        StrategicAdvisor::troops_necessary_to_take_planet(self, ctx, system)
    }
}
