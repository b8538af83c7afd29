//! Ground invasions: what a landing costs, what it yields and where the troops come from.

use tracing::{debug, info};

use crate::ai::advisor::StrategicAdvisor;
use crate::ai::general::TurnContext;
use crate::constants::*;
use crate::map::{StarSystem, SystemId};
use crate::orders::TransportOrder;
use crate::ships::DesignRole;

/// Combat rounds transports spend under fire, by engine warp.
pub fn transport_gauntlet_rounds(speed: f32) -> u32 {
    match speed as i32 {
        i32::MIN..=4 => 4,
        5 | 6 => 3,
        7 | 8 => 2,
        _ => 1,
    }
}

/// Attacker casualties per defender casualty in ground combat.
///
/// Both branches share the same exchange model; only the side holding the
/// advantage differs. The surviving share is floored at one point so the
/// ratio stays finite for any gap.
pub fn ground_kill_ratio(attack_adj: f32, defense_adj: f32) -> f32 {
    let scale_sq = GROUND_COMBAT_SCALE * GROUND_COMBAT_SCALE;
    let exchange = |gap: f32| {
        let left = (GROUND_COMBAT_SCALE - gap).max(1.0);
        left * left / 2.0
    };
    if defense_adj >= attack_adj {
        let held = exchange(defense_adj - attack_adj);
        (scale_sq - held) / held
    } else {
        let held = exchange(attack_adj - defense_adj);
        held / (scale_sq - held)
    }
}

/// Turn budget for transports, shrinking as engines get faster.
fn allowable_travel_turns(top_speed: f32) -> f32 {
    1.0 + (TROOP_TRAVEL_BUDGET / top_speed).floor().min(TROOP_MAX_EXTRA_TURNS)
}

/// Population a colony can spare without dropping below the floor.
fn spare_troops(system: &StarSystem) -> f32 {
    system.colony.as_ref().map_or(0.0, |colony| {
        (colony.population - TROOP_POPULATION_FLOOR * system.planet.current_size).max(0.0)
    })
}

impl StrategicAdvisor {
    /// Troops that must land to win the ground battle, before transport losses.
    pub fn troops_necessary_to_take_planet(&self, ctx: TurnContext<'_>, system: SystemId) -> f32 {
        let Some(me) = self.me(ctx) else {
            return 0.0;
        };
        let intel = me.intel(system);
        let defense_adj = intel
            .owner()
            .and_then(|owner| me.view(owner))
            .map_or(0.0, |view| view.spy_estimate.troop_defense_adj);
        intel.population() * ground_kill_ratio(me.tech.troop_attack_adj, defense_adj)
    }

    /// Troops it takes to overwhelm the missile bases at a system.
    pub fn troops_necessary_to_bypass_bases(&self, ctx: TurnContext<'_>, system: SystemId) -> f32 {
        let Some(me) = self.me(ctx) else {
            return 0.0;
        };
        me.intel(system).bases() as f32 * self.troop_to_enemy_base_ratio(ctx, system)
    }

    pub fn troop_to_enemy_base_ratio(&self, ctx: TurnContext<'_>, system: SystemId) -> f32 {
        let Some(me) = self.me(ctx) else {
            return 0.0;
        };
        let weapon_level = me
            .intel(system)
            .owner()
            .and_then(|owner| me.view(owner))
            .map_or(1.0, |view| view.spy_estimate.weapon_level);
        // tech levels start at 1
        weapon_level / me.tech.construction_level.max(1.0)
    }

    /// Transports the defenders are expected to shoot down on the way in.
    pub fn expected_enemy_transport_kill_power(&self, ctx: TurnContext<'_>, system: SystemId) -> f32 {
        let (Some(me), Some(star)) = (self.me(ctx), ctx.galaxy.system(system)) else {
            return 0.0;
        };
        let galaxy = ctx.galaxy;
        let owner = star.owner();
        let mut damage: f32 = owner
            .map(|owner| {
                galaxy
                    .fleets_of(owner)
                    .map(|fleet| galaxy.fleet_firepower(fleet, 0.0))
                    .sum()
            })
            .unwrap_or(0.0);

        let third_parties = galaxy
            .orbiting_fleets(system)
            .chain(galaxy.incoming_fleets(system))
            .filter(|fleet| {
                fleet.owner != self.empire
                    && Some(fleet.owner) != owner
                    && !galaxy
                        .empire(fleet.owner)
                        .is_some_and(|other| other.is_allied_with(self.empire))
            });
        for fleet in third_parties {
            damage += galaxy.fleet_firepower(fleet, 0.0);
        }
        if let Some(colony) = &star.colony {
            damage += colony.defense.firepower;
        }

        let warp = (me.tech.top_engine_warp as f32 - 1.0).max(1.0);
        damage *= transport_gauntlet_rounds(warp) as f32;
        if me.tech.transport_hp > 0.0 {
            damage /= me.tech.transport_hp;
        }
        damage
    }

    /// Raises a troop count to cover losses on the way in.
    fn with_transport_losses(&self, ctx: TurnContext<'_>, system: SystemId, needed: f32) -> f32 {
        let Some(me) = self.me(ctx) else {
            return needed;
        };
        let mut combat_transport = me.tech.combat_transport_pct;
        let interdicted = ctx
            .galaxy
            .system(system)
            .and_then(|star| star.owner())
            .and_then(|owner| ctx.galaxy.empire(owner))
            .is_some_and(|owner| owner.tech.subspace_interdiction);
        if interdicted {
            combat_transport /= 2.0;
        }
        let confidence = ctx
            .oracles
            .bridgehead_confidence(ctx.galaxy, self.empire, system);
        let losses = self.expected_enemy_transport_kill_power(ctx, system) * (1.0 - confidence);
        if combat_transport > 0.0 {
            (needed + losses).max(needed / combat_transport)
        } else {
            needed + losses
        }
    }

    /// BC worth of population an invasion is expected to consume.
    pub fn invasion_cost(&self, ctx: TurnContext<'_>, system: SystemId) -> f32 {
        let Some(me) = self.me(ctx) else {
            return f32::MAX;
        };
        let needed =
            self.with_transport_losses(ctx, system, self.troops_necessary_to_take_planet(ctx, system));
        if me.race.growth_rate_mod <= 0.0 {
            return f32::MAX;
        }
        needed * me.tech.population_cost / me.race.growth_rate_mod
    }

    /// BC worth of factories and technology a successful invasion captures.
    pub fn invasion_gain(&self, ctx: TurnContext<'_>, system: SystemId) -> f32 {
        let (Some(me), Some(star)) = (self.me(ctx), ctx.galaxy.system(system)) else {
            return 0.0;
        };
        let factories = me.intel(system).factories();
        let salvage = factories * (me.tech.base_factory_cost - FACTORY_SALVAGE_DISCOUNT)
            + star.planet.alien_factories(self.empire) * me.tech.base_factory_cost;

        let owner = star.owner().and_then(|owner| ctx.galaxy.empire(owner));
        let (total_cost, tech_count) = owner.map_or((0.0, 0usize), |owner| {
            owner
                .tech
                .techs_unknown_to(&me.tech)
                .fold((0.0, 0), |(sum, count), cost| (sum + cost, count + 1))
        });
        if tech_count == 0 {
            return salvage;
        }
        let average_cost = total_cost / tech_count as f32;
        let captured = MAX_CAPTURED_TECHS
            .min(tech_count as f32)
            .min(CAPTURED_TECHS_PER_FACTORY * factories);
        salvage + captured * average_cost
    }

    pub fn willing_to_invade(&mut self, ctx: TurnContext<'_>, system: SystemId) -> bool {
        let (Some(me), Some(star)) = (self.me(ctx), ctx.galaxy.system(system)) else {
            return false;
        };
        let Some(owner) = star.owner() else {
            return false;
        };
        if !me.is_at_war_with(owner) && !self.strong_enough_to_attack(ctx) {
            return false;
        }
        if !ctx.galaxy.can_send_transports_to(me, system) {
            return false;
        }
        // A captured colony also saves building a colony ship
        let colonizer_cost = self
            .role_design(ctx, DesignRole::Colonizer)
            .map_or(0.0, |design| design.cost);
        self.invasion_cost(ctx, system) <= self.invasion_gain(ctx, system) + colonizer_cost
    }

    pub fn order_invasion_fleet(&mut self, ctx: TurnContext<'_>, system: SystemId) {
        self.launch_ground_troops(ctx, system, 1.0);
    }

    /// Own colonies other than the target, nearest first.
    fn launch_candidates<'a>(&self, ctx: TurnContext<'a>, target: &StarSystem) -> Vec<&'a StarSystem> {
        let mut sources: Vec<&StarSystem> = ctx
            .galaxy
            .colonies_of(self.empire)
            .filter(|system| system.id != target.id)
            .collect();
        sources.sort_by(|a, b| {
            a.distance_to(target)
                .total_cmp(&b.distance_to(target))
                .then(a.id.cmp(&b.id))
        });
        sources
    }

    /// Spare population of a source net of troops it already sends this turn.
    fn troops_left_at(&self, source: &StarSystem) -> f32 {
        (spare_troops(source) - self.orders.troops_sent_from(source.id) as f32).max(0.0)
    }

    fn troops_already_sent(&self, ctx: TurnContext<'_>, system: SystemId) -> f32 {
        ctx.galaxy.transports_in_transit(self.empire, system) + self.orders.troops_sent_to(system) as f32
    }

    /// Sends a synchronized wave of transports from nearby colonies.
    ///
    /// Gives up silently when the colonies in reach cannot field enough troops.
    pub fn launch_ground_troops(&mut self, ctx: TurnContext<'_>, target: SystemId, multiplier: f32) {
        let (Some(me), Some(star)) = (self.me(ctx), ctx.galaxy.system(target)) else {
            return;
        };
        let needed = self.with_transport_losses(
            ctx,
            target,
            multiplier * self.troops_necessary_to_take_planet(ctx, target),
        );
        let desired = needed + me.intel(target).size() * TROOP_SIZE_MARGIN
            - self.troops_already_sent(ctx, target);
        if desired < 1.0 {
            return;
        }

        let allowable_turns = allowable_travel_turns(me.tech.top_speed);
        let mut available = 0.0;
        let mut max_travel: f32 = 0.0;
        let mut launch_points = Vec::new();
        for source in self.launch_candidates(ctx, star) {
            if available >= desired {
                break;
            }
            let can_transport = source.colony.as_ref().is_some_and(|colony| colony.can_transport);
            let travel = ctx.galaxy.travel_time(source.id, target, me.tech.top_speed);
            if travel <= allowable_turns && can_transport {
                launch_points.push(source);
                max_travel = max_travel.max(travel);
                available += self.troops_left_at(source);
            }
        }

        if available < needed {
            debug!(
                "{}: only {:.0} of {:.0} troops in reach of {}",
                me.name, available, needed, star.name
            );
            return;
        }

        let arrive_by = ctx.galaxy.turn + max_travel as u32;
        for source in launch_points {
            let troops = self.troops_left_at(source).floor() as u32;
            if troops == 0 {
                continue;
            }
            self.orders.queue_transport(TransportOrder {
                from: source.id,
                to: target,
                troops,
                arrive_by: Some(arrive_by),
            });
        }
        info!(
            "{} invades {} with {:.0} troops, landing on turn {}",
            me.name, star.name, available, arrive_by
        );
    }

    /// Sends loyal troops to a colony in revolt, outnumbering the rebels.
    pub fn launch_rebellion_troops(&mut self, ctx: TurnContext<'_>, target: SystemId) {
        let Some(star) = ctx.galaxy.system(target) else {
            return;
        };
        let Some(colony) = &star.colony else {
            return;
        };
        let desired =
            colony.rebels * REBELLION_TROOP_MULTIPLIER - self.troops_already_sent(ctx, target);
        if desired < 1.0 {
            return;
        }

        let mut available = 0.0;
        let mut launch_points = Vec::new();
        for source in self.launch_candidates(ctx, star) {
            if available >= desired {
                break;
            }
            let Some(source_colony) = &source.colony else {
                continue;
            };
            let allowed = source_colony
                .max_transports_allowed
                .saturating_sub(self.orders.troops_sent_from(source.id));
            if source_colony.can_transport {
                launch_points.push((source.id, allowed));
                available += allowed as f32;
            }
        }

        for (from, troops) in launch_points {
            if troops == 0 {
                continue;
            }
            self.orders.queue_transport(TransportOrder {
                from,
                to: target,
                troops,
                arrive_by: None,
            });
        }
        debug!("{:?}: putting down rebellion at {}", self.empire, star.name);
    }

    /// Bombing a war target is fine unless our own troops are about to land there.
    pub fn allowed_to_bomb(&self, ctx: TurnContext<'_>, system: SystemId) -> bool {
        let (Some(me), Some(star)) = (self.me(ctx), ctx.galaxy.system(system)) else {
            return false;
        };
        let Some(owner) = star.owner() else {
            return false;
        };
        if !me.is_at_war_with(owner) {
            return false;
        }
        let confidence = ctx
            .oracles
            .bridgehead_confidence(ctx.galaxy, self.empire, system);
        let enough = self.troops_necessary_to_take_planet(ctx, system)
            + self.expected_enemy_transport_kill_power(ctx, system) * (1.0 - confidence);
        ctx.galaxy.transports_in_transit(self.empire, system) <= enough
    }

    /// One of our bombers is already working over the system.
    pub fn am_sieging(&self, ctx: TurnContext<'_>, system: SystemId) -> bool {
        let Some(star) = ctx.galaxy.system(system) else {
            return false;
        };
        let shield = star
            .colony
            .as_ref()
            .map_or(0.0, |colony| colony.defense.shield_level);
        ctx.galaxy
            .orbiting_fleets(system)
            .filter(|fleet| fleet.owner == self.empire)
            .any(|fleet| {
                ctx.galaxy.fleet_bombard_damage(fleet, shield) > 0.0
                    && self.allowed_to_bomb(ctx, system)
            })
    }
}
