//! Per-system fleet planning.
//!
//! Every turn each known system is revised once. Owned systems get rebellion
//! troops and defense, war targets get invasions, and whatever cannot be
//! settled immediately is reported back so the relationship pass can decide
//! on bombardment, encroachment bombing or a sneak attack.

use tracing::{debug, info, trace};

use crate::ai::advisor::{IncomingShip, StrategicAdvisor};
use crate::ai::general::TurnContext;
use crate::constants::*;
use crate::diplomacy::Stance;
use crate::empire::EmpireId;
use crate::map::{Artifact, ResourceTier, SystemId};
use crate::ships::{DesignRole, ShipDesign};

/// What the fleet planning pass concluded about one system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPlan {
    OutOfRange,
    Uncolonized,
    Owned,
    Invading,
    /// War target we will not invade this turn.
    Hostile { owner: EmpireId },
    /// Colony of a faction we are not at war with.
    Foreign { owner: EmpireId },
}

/// Boost against factions down to their last few colonies.
pub(super) fn killer_instinct(remaining_colonies: usize) -> f32 {
    ((remaining_colonies + 7) / (remaining_colonies + 1)) as f32
}

fn artifact_multiplier(artifact: Artifact) -> f32 {
    match artifact {
        Artifact::None => 1.0,
        Artifact::Artifacts => 2.0,
        Artifact::OrionArtifacts => 3.0,
    }
}

/// Whole ships of a design needed to spend `bc`.
pub(super) fn ships_needed(bc: f32, design: &ShipDesign) -> u32 {
    if bc <= 0.0 || design.cost <= 0.0 {
        return 0;
    }
    (bc / design.cost).ceil() as u32
}

impl StrategicAdvisor {
    pub(super) fn role_design<'a>(
        &self,
        ctx: TurnContext<'a>,
        role: DesignRole,
    ) -> Option<&'a ShipDesign> {
        ctx.oracles
            .best_design(ctx.galaxy, self.empire, role)
            .and_then(|design| ctx.galaxy.design(self.empire, design))
    }

    /// How much we want to take a system over, 0 when we cannot.
    pub fn invasion_priority(&self, ctx: TurnContext<'_>, system: SystemId) -> f32 {
        let Some(me) = self.me(ctx) else {
            return 0.0;
        };
        let Some(star) = ctx.galaxy.system(system) else {
            return 0.0;
        };
        let intel = me.intel(system);
        if !intel.in_ship_range || !intel.scouted || !intel.is_colonized() {
            return 0.0;
        }
        if !me.can_colonize(star.planet.kind) {
            return 0.0;
        }

        let mut priority = intel.size() + intel.factories() / INVASION_FACTORY_DIVISOR;
        if let Some(owner) = intel.owner() {
            let remaining = ctx.galaxy.num_colonies(owner);
            if remaining <= KILLER_INSTINCT_PRIORITY_COLONIES {
                priority *= killer_instinct(remaining);
            }
        }
        priority *= match intel.resource() {
            Some(ResourceTier::Poor) => 2.0,
            Some(ResourceTier::Normal) => 3.0,
            Some(ResourceTier::Rich) => 4.0,
            Some(ResourceTier::UltraRich) => 5.0,
            Some(ResourceTier::UltraPoor) | None => 1.0,
        };
        priority *= artifact_multiplier(intel.artifact());
        priority /= intel.distance.max(1.0).sqrt();
        priority /= (intel.bases() as f32).max(1.0).sqrt();
        priority / INVASION_PRIORITY_DIVISOR
    }

    /// Desirability of capturing a colony, 1.0 for a normal size-100 world with 200 factories.
    pub fn take_planet_value(&self, ctx: TurnContext<'_>, system: SystemId) -> f32 {
        let Some(me) = self.me(ctx) else {
            return 0.0;
        };
        let intel = me.intel(system);
        if !intel.in_ship_range || !intel.scouted || !intel.is_colonized() {
            return 0.0;
        }

        let mut value = 4.0 * intel.size().powf(PLANET_SIZE_EXPONENT)
            + intel.factories().sqrt().min(PLANET_FACTORY_VALUE_CAP);
        value *= match intel.resource() {
            Some(ResourceTier::UltraPoor) => 0.6,
            Some(ResourceTier::Poor) => 0.75,
            Some(ResourceTier::Rich) => 2.0,
            Some(ResourceTier::UltraRich) => 3.0,
            Some(ResourceTier::Normal) | None => 1.0,
        };
        value *= artifact_multiplier(intel.artifact());
        if let Some(owner) = intel.owner() {
            let remaining = ctx.galaxy.num_colonies(owner);
            if remaining <= KILLER_INSTINCT_VALUE_COLONIES {
                value *= killer_instinct(remaining);
            }
        }
        value / PLANET_VALUE_NORMALIZER
    }

    pub(super) fn revise_fleet_plan(&mut self, ctx: TurnContext<'_>, system: SystemId) -> SystemPlan {
        let Some(me) = self.me(ctx) else {
            return SystemPlan::OutOfRange;
        };
        let Some(star) = ctx.galaxy.system(system) else {
            return SystemPlan::OutOfRange;
        };
        let intel = me.intel(system);
        if !intel.in_ship_range {
            return SystemPlan::OutOfRange;
        }

        if self.need_scout_repellers(ctx, false)
            && (star.owner() == Some(self.empire) || !intel.is_colonized())
            && !star.monster
            && let Some(repeller) = self.role_design(ctx, DesignRole::Repeller)
        {
            let bands = self.config.bands;
            let mut priority = bands.scout_repel;
            if intel.border {
                priority += bands.scout_repel_border_bonus;
            }
            let plan = self.plans.plan_mut(system);
            plan.set_priority(priority);
            plan.add_ships(repeller.id, 1);
        }

        let Some(owner) = intel.owner() else {
            return SystemPlan::Uncolonized;
        };

        if owner == self.empire {
            let value = self.invasion_priority(ctx, system);
            trace!("{}: own system {} priority {:.2}", me.name, star.name, value);
            if star.colony.as_ref().is_some_and(|colony| colony.in_rebellion) {
                self.launch_rebellion_troops(ctx, system);
            }
            return SystemPlan::Owned;
        }

        if me.is_at_war_with(owner) {
            if self.willing_to_invade(ctx, system) {
                self.order_invasion_fleet(ctx, system);
                return SystemPlan::Invading;
            }
            return SystemPlan::Hostile { owner };
        }
        SystemPlan::Foreign { owner }
    }

    /// Reacts to what the planning pass found: defend, bomb or strike first.
    pub(super) fn evaluate_relationships(
        &mut self,
        ctx: TurnContext<'_>,
        outcomes: &[(SystemId, SystemPlan)],
    ) {
        let Some(me) = self.me(ctx) else {
            return;
        };

        let threatened: Vec<(SystemId, f32)> = self
            .targeted
            .iter()
            .filter(|(system, _)| {
                ctx.galaxy
                    .system(**system)
                    .is_some_and(|star| star.owner() == Some(self.empire))
            })
            .map(|(system, ships)| (*system, self.incoming_strength(ctx, ships)))
            .collect();
        for (system, fleet_size) in threatened {
            self.set_repel_fleet_plan(ctx, system, fleet_size);
        }

        for (system, outcome) in outcomes {
            let system = *system;
            match *outcome {
                SystemPlan::Hostile { owner } => {
                    if !self.allowed_to_bomb(ctx, system) {
                        continue;
                    }
                    let fleet_size = self.defending_fleet_bc(ctx, system, owner);
                    if self.order_bombardment_fleet(ctx, system, fleet_size)
                        && me.stance_toward(owner) == Some(Stance::FinalWar)
                    {
                        self.rush_ships.push(system);
                    }
                }
                SystemPlan::Foreign { owner } => {
                    if me.is_allied_with(owner) {
                        continue;
                    }
                    let fleet_size = self.defending_fleet_bc(ctx, system, owner);
                    if self.best_victim(ctx) == Some(owner) {
                        if self.consider_sneak_attack_fleet(ctx, system, fleet_size) {
                            self.rush_ships.push(system);
                        }
                    } else if me.aggressive_with(owner)
                        && self.is_encroaching(ctx, system, owner)
                        && self.strong_enough_to_attack(ctx)
                    {
                        self.order_bomb_encroachment_fleet(ctx, system, fleet_size);
                    }
                }
                SystemPlan::OutOfRange
                | SystemPlan::Uncolonized
                | SystemPlan::Owned
                | SystemPlan::Invading => {}
            }
        }
    }

    fn defending_fleet_bc(&self, ctx: TurnContext<'_>, system: SystemId, owner: EmpireId) -> f32 {
        ctx.galaxy
            .orbiting_fleets(system)
            .filter(|fleet| fleet.owner == owner)
            .map(|fleet| ctx.galaxy.fleet_bc_value(fleet))
            .sum()
    }

    fn incoming_strength(&self, ctx: TurnContext<'_>, ships: &[IncomingShip]) -> f32 {
        ships
            .iter()
            .map(|ship| match *ship {
                IncomingShip::Fleet(id) => ctx
                    .galaxy
                    .fleet(id)
                    .map_or(0.0, |fleet| ctx.galaxy.fleet_bc_value(fleet)),
                IncomingShip::Transport(id) => ctx.galaxy.transport(id).map_or(0.0, |transport| {
                    let population_cost = ctx
                        .galaxy
                        .empire(transport.owner)
                        .map_or(0.0, |owner| owner.tech.population_cost);
                    transport.size as f32 * population_cost
                }),
            })
            .sum()
    }

    /// A foreign colony sits closer to our space than to the rest of its owner's.
    fn is_encroaching(&self, ctx: TurnContext<'_>, system: SystemId, owner: EmpireId) -> bool {
        let (Some(me), Some(star)) = (self.me(ctx), ctx.galaxy.system(system)) else {
            return false;
        };
        let to_owner = ctx
            .galaxy
            .colonies_of(owner)
            .filter(|colony| colony.id != system)
            .map(|colony| colony.distance_to(star))
            .fold(f32::MAX, f32::min);
        me.intel(system).distance < to_owner
    }

    /// Requests a mixed bombardment fleet against a war target.
    pub fn order_bombardment_fleet(
        &mut self,
        ctx: TurnContext<'_>,
        system: SystemId,
        fleet_size: f32,
    ) -> bool {
        let Some(me) = self.me(ctx) else {
            return false;
        };
        let final_war = me
            .intel(system)
            .owner()
            .and_then(|owner| me.stance_toward(owner))
            == Some(Stance::FinalWar);
        let band = if final_war {
            self.config.bands.bomb_final_war
        } else {
            self.config.bands.bomb_enemy
        };
        self.plan_bombardment(ctx, system, fleet_size, band)
    }

    pub fn order_bomb_encroachment_fleet(
        &mut self,
        ctx: TurnContext<'_>,
        system: SystemId,
        fleet_size: f32,
    ) -> bool {
        let band = self.config.bands.bomb_encroachment;
        let planned = self.plan_bombardment(ctx, system, fleet_size, band);
        if planned {
            debug!("{:?} plans to bomb encroaching colony {:?}", self.empire, system);
        }
        planned
    }

    fn plan_bombardment(
        &mut self,
        ctx: TurnContext<'_>,
        system: SystemId,
        fleet_size: f32,
        band: f32,
    ) -> bool {
        let Some(me) = self.me(ctx) else {
            return false;
        };
        let intel = me.intel(system);
        let target_tech = intel
            .owner()
            .and_then(|owner| me.view(owner))
            .map_or(1.0, |view| view.spy_estimate.avg_tech_level);
        let tech_ratio = (target_tech + TECH_RATIO_OFFSET) / (self.civ_tech + TECH_RATIO_OFFSET);

        let base_bc = intel.bases() as f32 * me.tech.new_missile_base_cost;
        let bc_multiplier = 1.0 + intel.hostility / 2.0;
        let bomb_bc = (base_bc * BOMB_BASE_MARGIN * tech_ratio).max(bc_multiplier * self.civ_prod);
        let fight_bc = BOMB_FLEET_MARGIN * fleet_size * tech_ratio;
        let destroyer_bc = (bomb_bc + fight_bc) * BOMB_DESTROYER_SHARE;

        let requests: Vec<(&ShipDesign, u32)> = [
            (DesignRole::Destroyer, destroyer_bc),
            (DesignRole::Bomber, bomb_bc),
            (DesignRole::Fighter, fight_bc),
        ]
        .into_iter()
        .filter_map(|(role, bc)| {
            self.role_design(ctx, role)
                .map(|design| (design, ships_needed(bc, design)))
        })
        .collect();
        if requests.is_empty() {
            return false;
        }

        let priority = band + self.config.tie_break(self.invasion_priority(ctx, system));
        self.fill_plan(ctx, system, priority, &requests);
        true
    }

    /// Writes priority, staging point and ship requests into a system's plan.
    fn fill_plan(
        &mut self,
        ctx: TurnContext<'_>,
        system: SystemId,
        priority: f32,
        requests: &[(&ShipDesign, u32)],
    ) {
        let speed = requests
            .iter()
            .map(|(design, _)| design.warp)
            .min()
            .unwrap_or(1) as f32;
        let staging_point = ctx
            .oracles
            .optimal_staging_point(ctx.galaxy, self.empire, system, speed);
        let plan = self.plans.plan_mut(system);
        plan.set_priority(priority);
        plan.set_staging_point(staging_point);
        for (design, count) in requests {
            plan.add_ships(design.id, *count);
        }
    }

    /// Decides whether to open an unprovoked war on a colony. Returns true when planned.
    pub fn consider_sneak_attack_fleet(
        &mut self,
        ctx: TurnContext<'_>,
        system: SystemId,
        fleet_size: f32,
    ) -> bool {
        let (Some(me), Some(star)) = (self.me(ctx), ctx.galaxy.system(system)) else {
            return false;
        };
        if me.leader.is_pacifist() || me.leader.is_honorable() {
            return false;
        }
        let my_wars = me.num_enemies();
        if my_wars > SNEAK_ATTACK_MAX_ENEMIES {
            return false;
        }

        let mut chance = SNEAK_ATTACK_BASE_CHANCE - my_wars as f32 * SNEAK_ATTACK_CHANCE_PER_WAR;
        if me.leader.is_aggressive() {
            chance += SNEAK_ATTACK_AGGRESSIVE_BONUS;
        } else if me.leader.is_diplomat() {
            chance -= SNEAK_ATTACK_DIPLOMAT_PENALTY;
        } else if me.leader.is_ruthless() {
            chance += SNEAK_ATTACK_RUTHLESS_BONUS;
        }
        if !me.can_colonize(star.planet.kind) {
            chance -= SNEAK_ATTACK_UNCAPTURABLE_PENALTY;
        }

        // 0.55 at tech 1, rising to 1.0 at the ramp
        let tech = me.tech.avg_tech_level;
        if tech < SNEAK_ATTACK_TECH_RAMP {
            chance *= tech / (2.0 * SNEAK_ATTACK_TECH_RAMP) + 0.5;
        }

        let intel = me.intel(system);
        let their_wars = intel
            .owner()
            .and_then(|owner| ctx.galaxy.empire(owner))
            .map_or(0, |owner| owner.num_enemies());
        chance += SNEAK_ATTACK_WAR_COUNT_FACTOR * (their_wars as f32 - my_wars as f32);

        let value = intel.factories() * SNEAK_ATTACK_FACTORY_VALUE;
        let cost = fleet_size + intel.bases() as f32 * me.tech.new_missile_base_cost;
        let bonus = if value + cost > 0.0 {
            value / (value + cost) - 0.5
        } else {
            -0.5
        };
        trace!(
            "{}: sneak attack on {} chance {:.2} bonus {:.2}",
            me.name, star.name, chance, bonus
        );
        if chance + bonus <= SNEAK_ATTACK_THRESHOLD {
            return false;
        }

        let band = self.config.bands.bomb_undefended;
        let planned = self.plan_bombardment(ctx, system, fleet_size, band);
        if planned {
            info!("{} prepares a surprise attack on {}", me.name, star.name);
        }
        planned
    }

    /// Requests destroyers and fighters to meet ships heading for an owned system.
    pub fn set_repel_fleet_plan(&mut self, ctx: TurnContext<'_>, system: SystemId, fleet_size: f32) {
        let Some(me) = self.me(ctx) else {
            return;
        };
        let fighter = self.role_design(ctx, DesignRole::Fighter);
        let destroyer = self.role_design(ctx, DesignRole::Destroyer);
        if fighter.is_none() && destroyer.is_none() {
            return;
        }

        let base_bc = me.intel(system).bases() as f32 * me.tech.new_missile_base_cost;
        let fighter_cost = fighter.map_or(0.0, |design| design.cost);
        let mut bc_needed = fighter_cost.max(fleet_size * REPEL_FLEET_MARGIN) - base_bc;
        if bc_needed <= 0.0 {
            return;
        }
        self.rush_defense.push(system);

        let mut requests = Vec::with_capacity(2);
        if let Some(destroyer) = destroyer {
            let count = ships_needed(bc_needed / 2.0, destroyer);
            bc_needed = (bc_needed - count as f32 * destroyer.cost).max(0.0);
            requests.push((destroyer, count));
        }
        if let Some(fighter) = fighter {
            requests.push((fighter, ships_needed(bc_needed, fighter)));
        }

        let priority = self.config.bands.repel + self.config.tie_break(self.invasion_priority(ctx, system));
        self.fill_plan(ctx, system, priority, &requests);
        debug!("{}: repelling {:.0} BC heading for {:?}", me.name, fleet_size, system);
    }

    /// Rebuilds the map of visible hostile ships in flight, keyed by destination.
    pub(super) fn reset_targeted_systems(&mut self, ctx: TurnContext<'_>) {
        self.targeted.clear();
        let Some(me) = self.me(ctx) else {
            return;
        };
        let galaxy = ctx.galaxy;
        for fleet in &galaxy.fleets {
            if !fleet.in_transit() || !fleet.eta_known || !me.aggressive_with(fleet.owner) {
                continue;
            }
            if !galaxy.is_visible_to(me, fleet.location) {
                continue;
            }
            if let Some(destination) = fleet.destination {
                self.targeted
                    .entry(destination)
                    .or_default()
                    .push(IncomingShip::Fleet(fleet.id));
            }
        }
        for transport in &galaxy.transports {
            if !transport.eta_known || !me.aggressive_with(transport.owner) {
                continue;
            }
            if !galaxy.is_visible_to(me, transport.location) {
                continue;
            }
            self.targeted
                .entry(transport.destination)
                .or_default()
                .push(IncomingShip::Transport(transport.id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::empire::{EmpireId, Personality};
    use crate::galaxy::Galaxy;
    use crate::map::{Location, PlanetType};
    use crate::ships::DesignId;
    use crate::test_utils::{GalaxyFixture, context};

    struct Designs {
        fighter: DesignId,
        bomber: DesignId,
        destroyer: DesignId,
    }

    /// Our home at the origin facing a 100-factory colony of empire 1 three parsecs east.
    fn border_fixture(empires: u16, personality: Personality) -> (GalaxyFixture, SystemId, Designs) {
        let mut fixture = GalaxyFixture::new(empires);
        fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
        let target = fixture.add_colony(EmpireId(1), Location::new(3.0, 0.0), 50.0, 100.0);
        fixture.contact_all();
        fixture.standard_designs(EmpireId(0));
        let designs = Designs {
            fighter: fixture.fighter(EmpireId(0)),
            bomber: fixture.bomber(EmpireId(0)),
            destroyer: fixture.destroyer(EmpireId(0)),
        };
        let me = fixture.empire_mut(EmpireId(0));
        me.leader.personality = personality;
        me.tech.avg_tech_level = 10.0;
        (fixture, target, designs)
    }

    fn advisor_for(galaxy: &Galaxy) -> StrategicAdvisor {
        let mut advisor = StrategicAdvisor::new(EmpireId(0));
        advisor.civ_prod = galaxy.production_of(EmpireId(0));
        advisor.civ_tech = 10.0;
        advisor
    }

    fn priority_of(advisor: &StrategicAdvisor, system: SystemId) -> f32 {
        advisor.plans.plan(system).map_or(0.0, |plan| plan.priority)
    }

    fn in_band(priority: f32, band: f32) -> bool {
        priority >= band && priority < band + TIE_BREAK_CAP
    }

    #[test]
    fn aggressive_leader_sneak_attacks_a_rich_colony() {
        let (fixture, target, designs) = border_fixture(2, Personality::Aggressive);
        let galaxy = fixture.build();
        let mut advisor = advisor_for(&galaxy);

        assert!(advisor.consider_sneak_attack_fleet(context(&galaxy), target, 0.0));
        let priority = priority_of(&advisor, target);
        assert!(in_band(priority, PRIORITY_BOMB_UNDEFENDED), "priority was {priority}");
        assert!(priority > PRIORITY_BOMB_UNDEFENDED);

        // 50 BC of bombing, a fifth of it in destroyers, no escort
        let plan = advisor.plans.plan(target).expect("target is planned");
        assert_eq!(plan.ship_count(designs.bomber), 1);
        assert_eq!(plan.ship_count(designs.destroyer), 1);
        assert_eq!(plan.ship_count(designs.fighter), 0);
        assert_eq!(plan.staging_point, Some(SystemId(0)));
    }

    #[test]
    fn pacifist_and_honorable_leaders_never_sneak_attack() {
        for personality in [Personality::Pacifist, Personality::Honorable] {
            let (fixture, target, _) = border_fixture(2, personality);
            let galaxy = fixture.build();
            let mut advisor = advisor_for(&galaxy);

            assert!(!advisor.consider_sneak_attack_fleet(context(&galaxy), target, 0.0));
            assert_eq!(advisor.plans.active().count(), 0);
        }
    }

    #[test]
    fn no_new_war_while_fighting_three() {
        let galaxy_with_wars = |wars: u16| {
            let (mut fixture, target, _) = border_fixture(7, Personality::Aggressive);
            // the target's owner is busy on five fronts
            for other in 2..=6 {
                fixture.set_stance(EmpireId(1), EmpireId(other), Stance::War);
            }
            for other in 2..2 + wars {
                fixture.set_stance(EmpireId(0), EmpireId(other), Stance::War);
            }
            (fixture.build(), target)
        };

        let (galaxy, target) = galaxy_with_wars(2);
        let mut advisor = advisor_for(&galaxy);
        assert!(advisor.consider_sneak_attack_fleet(context(&galaxy), target, 0.0));

        let (galaxy, target) = galaxy_with_wars(3);
        let mut advisor = advisor_for(&galaxy);
        assert!(!advisor.consider_sneak_attack_fleet(context(&galaxy), target, 0.0));
        assert_eq!(priority_of(&advisor, target), 0.0);
    }

    #[test]
    fn encroaching_colony_is_bombed_in_its_own_band() {
        let mut fixture = GalaxyFixture::new(2);
        fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
        let encroacher = fixture.add_colony(EmpireId(1), Location::new(2.0, 0.0), 30.0, 0.0);
        let heartland = fixture.add_colony(EmpireId(1), Location::new(10.0, 0.0), 50.0, 0.0);
        fixture.contact_all();
        fixture.standard_designs(EmpireId(0));
        let galaxy = fixture.build();
        let ctx = context(&galaxy);
        let mut advisor = advisor_for(&galaxy);

        assert!(advisor.is_encroaching(ctx, encroacher, EmpireId(1)));
        assert!(!advisor.is_encroaching(ctx, heartland, EmpireId(1)));

        assert!(advisor.order_bomb_encroachment_fleet(ctx, encroacher, 0.0));
        let priority = priority_of(&advisor, encroacher);
        assert!(in_band(priority, PRIORITY_BOMB_ENCROACHMENT), "priority was {priority}");
    }

    #[test]
    fn final_war_targets_are_bombed_first_and_rushed() {
        let (mut fixture, target, _) = border_fixture(2, Personality::Erratic);
        fixture.set_stance(EmpireId(0), EmpireId(1), Stance::FinalWar);
        let galaxy = fixture.build();
        let mut advisor = advisor_for(&galaxy);

        let hostile = [(target, SystemPlan::Hostile { owner: EmpireId(1) })];
        advisor.evaluate_relationships(context(&galaxy), &hostile);
        let priority = priority_of(&advisor, target);
        assert!(in_band(priority, PRIORITY_BOMB_FINAL_WAR), "priority was {priority}");
        assert_eq!(advisor.rush_ships, vec![target]);
    }

    #[test]
    fn ordinary_war_targets_are_bombed_without_rushing() {
        let (mut fixture, target, _) = border_fixture(2, Personality::Erratic);
        fixture.set_stance(EmpireId(0), EmpireId(1), Stance::War);
        let galaxy = fixture.build();
        let mut advisor = advisor_for(&galaxy);

        let hostile = [(target, SystemPlan::Hostile { owner: EmpireId(1) })];
        advisor.evaluate_relationships(context(&galaxy), &hostile);
        let priority = priority_of(&advisor, target);
        assert!(in_band(priority, PRIORITY_BOMB_ENEMY), "priority was {priority}");
        assert!(advisor.rush_ships.is_empty());
    }

    #[test]
    fn bombardment_spends_a_fifth_on_destroyers() {
        let (mut fixture, target, designs) = border_fixture(2, Personality::Erratic);
        fixture.set_stance(EmpireId(0), EmpireId(1), Stance::War);
        fixture
            .view_mut(EmpireId(0), EmpireId(1))
            .spy_estimate
            .avg_tech_level = 10.0;
        let galaxy = fixture.build();
        let mut advisor = advisor_for(&galaxy);
        advisor.civ_prod = 500.0;

        // 500 BC of bombers, 200 BC of fighters against a 100 BC guard, 140 BC of destroyers
        assert!(advisor.order_bombardment_fleet(context(&galaxy), target, 100.0));
        let plan = advisor.plans.plan(target).expect("target is planned");
        assert_eq!(plan.ship_count(designs.bomber), 10);
        assert_eq!(plan.ship_count(designs.fighter), 10);
        assert_eq!(plan.ship_count(designs.destroyer), 4);
    }

    #[test]
    fn killer_instinct_uses_whole_steps() {
        assert_eq!(killer_instinct(0), 7.0);
        assert_eq!(killer_instinct(1), 4.0);
        assert_eq!(killer_instinct(2), 3.0);
        assert_eq!(killer_instinct(3), 2.0);
        assert_eq!(killer_instinct(4), 2.0);
    }

    #[test]
    fn normal_hundred_size_world_is_worth_about_one() {
        let mut fixture = GalaxyFixture::new(2);
        fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
        let target = fixture.add_colony(EmpireId(1), Location::new(3.0, 0.0), 100.0, 200.0);
        for x in [30.0, 32.0, 34.0, 36.0] {
            fixture.add_colony(EmpireId(1), Location::new(x, 0.0), 20.0, 0.0);
        }
        let galaxy = fixture.build();
        let advisor = StrategicAdvisor::new(EmpireId(0));

        let value = advisor.take_planet_value(context(&galaxy), target);
        assert!((value - 1.0).abs() < 0.01, "value was {value}");
    }

    #[test]
    fn own_homeworld_priority() {
        let mut fixture = GalaxyFixture::new(1);
        let home = fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
        let galaxy = fixture.build();
        let advisor = StrategicAdvisor::new(EmpireId(0));

        // 50 size, last colony (x4), normal (x3), no distance or bases, /10
        assert_eq!(advisor.invasion_priority(context(&galaxy), home), 60.0);
    }

    #[test]
    fn unreachable_or_unsettleable_systems_have_no_priority() {
        let mut fixture = GalaxyFixture::new(2);
        fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
        let far = fixture.add_colony(EmpireId(1), Location::new(20.0, 0.0), 40.0, 10.0);
        let barren = fixture.add_colony(EmpireId(1), Location::new(2.0, 0.0), 40.0, 10.0);
        fixture.system_mut(barren).planet.kind = PlanetType::Barren;
        let empty = fixture.add_empty(Location::new(1.0, 1.0));
        let galaxy = fixture.build();
        let advisor = StrategicAdvisor::new(EmpireId(0));
        let ctx = context(&galaxy);

        assert_eq!(advisor.invasion_priority(ctx, far), 0.0);
        assert_eq!(advisor.invasion_priority(ctx, barren), 0.0);
        assert_eq!(advisor.invasion_priority(ctx, empty), 0.0);
        assert_eq!(advisor.invasion_priority(ctx, SystemId(99)), 0.0);
    }

    #[test]
    fn ships_needed_rounds_up() {
        let design = ShipDesign::new(
            crate::ships::DesignId(0),
            "Fighter",
            20.0,
            crate::ships::DesignRoles::FIGHTER,
        );
        assert_eq!(ships_needed(41.0, &design), 3);
        assert_eq!(ships_needed(0.0, &design), 0);
        assert_eq!(ships_needed(-5.0, &design), 0);
    }
}
