//! Who to attack, who to fear, and how long a war would last.

use tracing::{debug, trace};

use crate::ai::advisor::StrategicAdvisor;
use crate::ai::general::TurnContext;
use crate::constants::*;
use crate::empire::{Empire, EmpireId};
use crate::galaxy::Galaxy;
use crate::map::SystemId;

/// Share of the combined power held by `theirs`, 0 when neither has any.
fn power_share(ours: f32, theirs: f32) -> f32 {
    let total = ours + theirs;
    if total <= 0.0 {
        return 0.0;
    }
    theirs / total
}

/// Ratio of two power levels, neutral when the rival has none.
fn power_ratio(ours: f32, theirs: f32) -> f32 {
    if theirs <= 0.0 {
        return 1.0;
    }
    ours / theirs
}

/// Extra appeal of a target already fighting other wars.
fn enemy_of_my_enemy(galaxy: &Galaxy, target: &Empire) -> f32 {
    1.0 + target
        .war_enemies()
        .filter_map(|foe| galaxy.empire(foe))
        .map(|foe| power_share(target.power_level, foe.power_level))
        .sum::<f32>()
}

/// Turns to wipe out a population with a given damage rate after travelling.
fn kill_leg(population_damage: f32, damage_rate: f32, travel: f32) -> f32 {
    if damage_rate <= 0.0 || travel <= 0.0 || travel >= f32::MAX {
        return f32::MAX;
    }
    (population_damage / damage_rate + travel).min(f32::MAX)
}

/// Two independent attack channels working together.
fn harmonic(a: f32, b: f32) -> f32 {
    match (a >= f32::MAX, b >= f32::MAX) {
        (true, true) => f32::MAX,
        (true, false) => b,
        (false, true) => a,
        (false, false) => 1.0 / (1.0 / a + 1.0 / b),
    }
}

impl StrategicAdvisor {
    /// Distance our forces cover to reach another faction's heartland.
    fn reach(&self, ctx: TurnContext<'_>, from: EmpireId, to: EmpireId) -> f32 {
        let target = self.colony_center(ctx, to);
        (self.fleet_center(ctx, from).distance_to(target)
            + self.colony_center(ctx, from).distance_to(target))
        .max(1.0)
    }

    /// The rival we would most like to go to war with, memoized for the turn.
    pub fn best_victim(&mut self, ctx: TurnContext<'_>) -> Option<EmpireId> {
        if let Some(victim) = self.cache.best_victim {
            return victim;
        }
        let victim = self.find_best_victim(ctx);
        self.cache.best_victim = Some(victim);
        victim
    }

    fn find_best_victim(&mut self, ctx: TurnContext<'_>) -> Option<EmpireId> {
        let me = self.me(ctx)?;
        let galaxy = ctx.galaxy;
        let smart_power = self.smart_power_level(ctx);
        let income = galaxy.income_of(self.empire);

        let mut best = None;
        let mut highest = 0.0;
        let candidates: Vec<&Empire> = me
            .contacted()
            .filter(|id| !me.is_allied_with(*id) && galaxy.in_ship_range_of(me, *id))
            .filter_map(|id| galaxy.empire(id))
            .collect();
        for rival in candidates {
            let Some(view) = me.view(rival.id) else {
                continue;
            };
            let mut score = self.total_empire_population_capacity(ctx, rival.id)
                / self.reach(ctx, self.empire, rival.id);

            let trade_mod = match view.trade_profit {
                Some(profit) if income > 0.0 => 1.0 + profit / income,
                _ => 0.9,
            };
            if trade_mod <= 0.0 {
                continue;
            }
            score *= enemy_of_my_enemy(galaxy, rival);
            score /= trade_mod;

            let military_ratio = if rival.military_power_level > 0.0 {
                smart_power / rival.military_power_level
            } else {
                0.0
            };
            score *= power_ratio(me.power_level, rival.power_level).max(military_ratio);
            score *= 100.0 - view.spying_severity();

            trace!("{}: victim score of {} is {:.3}", me.name, rival.name, score);
            if score > highest {
                highest = score;
                best = Some(rival.id);
            }
        }
        if let Some(victim) = best {
            debug!("{} eyes {:?} as its next victim", me.name, victim);
        }
        best
    }

    /// The rival most able to hurt us soon; ourselves when nobody qualifies.
    pub fn biggest_threat(&mut self, ctx: TurnContext<'_>) -> EmpireId {
        let Some(me) = self.me(ctx) else {
            return self.empire;
        };
        let galaxy = ctx.galaxy;
        let at_war = me.at_war();
        let home = self.colony_center(ctx, self.empire);

        let mut threat = self.empire;
        let mut highest = 0.0;
        for rival in me.contacted().filter_map(|id| galaxy.empire(id)) {
            if at_war && !me.is_at_war_with(rival.id) {
                continue;
            }
            if rival.id == self.empire || me.is_allied_with(rival.id) {
                continue;
            }
            let distance = self.fleet_center(ctx, rival.id).distance_to(home).max(1.0);
            let mut level = rival.power_level / distance;
            if !galaxy.in_ship_range_of(me, rival.id) {
                level /= 2.0;
            }
            if level > highest {
                highest = level;
                threat = rival.id;
            }
        }
        threat
    }

    /// Share of `subject`'s attention that would land on `object`, or on us
    /// with `on_me_instead`, were we to attack `object`.
    pub fn predict_empire_chance_to_declare_war_if_i_declared_war_on(
        &mut self,
        ctx: TurnContext<'_>,
        subject: EmpireId,
        object: EmpireId,
        on_me_instead: bool,
    ) -> f32 {
        let galaxy = ctx.galaxy;
        let (Some(me), Some(subject), Some(object)) =
            (self.me(ctx), galaxy.empire(subject), galaxy.empire(object))
        else {
            return 0.0;
        };

        let mut enemy_power = 0.0;
        let mut enemy_military = 0.0;
        for foe in subject.war_enemies() {
            // Already fighting one of us, no backstab to predict
            if foe == object.id || foe == self.empire {
                return 0.0;
            }
            if let Some(foe) = galaxy.empire(foe) {
                enemy_power += foe.power_level;
                enemy_military += foe.military_power_level;
            }
        }
        if enemy_power > subject.power_level || enemy_military > subject.military_power_level {
            return 0.0;
        }

        let mut total = 0.0;
        let mut on_object = 0.0;
        let mut on_me = 0.0;
        let candidates: Vec<&Empire> = subject
            .contacted()
            .filter(|id| galaxy.in_ship_range_of(subject, *id))
            .filter_map(|id| galaxy.empire(id))
            .collect();
        for target in candidates {
            let mut score = self.total_empire_population_capacity(ctx, target.id)
                / self.reach(ctx, subject.id, target.id);
            let military_ratio = if target.military_power_level > 0.0 {
                subject.military_power_level / target.military_power_level
            } else {
                0.0
            };
            score *= power_ratio(subject.power_level, target.power_level).max(military_ratio);

            let mut enemy_mult = enemy_of_my_enemy(galaxy, target);
            if target.id == object.id && !target.is_at_war_with(self.empire) {
                enemy_mult += power_share(target.power_level, me.power_level);
            }
            if target.id == self.empire && !me.is_at_war_with(object.id) {
                enemy_mult += power_share(target.power_level, object.power_level);
            }
            score *= enemy_mult;

            if target.id == self.empire {
                on_me = score;
            }
            if target.id == object.id {
                on_object = score;
            }
            total += score;
        }
        if total <= 0.0 {
            return 0.0;
        }
        if on_me_instead {
            on_me / total
        } else {
            on_object / total
        }
    }

    /// Hostile warships or troops headed our way, or a stronger idle neighbour
    /// whose nearest prey is us.
    pub fn sense_potential_attack(&mut self, ctx: TurnContext<'_>) -> bool {
        let Some(me) = self.me(ctx) else {
            return false;
        };
        let galaxy = ctx.galaxy;
        let empire = self.empire;
        let heading_for_us = |destination: SystemId| {
            galaxy
                .system(destination)
                .is_some_and(|system| system.owner() == Some(empire))
        };

        let armed_fleet_inbound = galaxy.fleets.iter().any(|fleet| {
            fleet.owner != empire
                && me.aggressive_with(fleet.owner)
                && fleet.destination.is_some_and(heading_for_us)
                && galaxy.is_visible_to(me, fleet.location)
                && galaxy.fleet_is_armed(fleet)
        });
        let troops_inbound = galaxy.transports.iter().any(|transport| {
            me.aggressive_with(transport.owner)
                && heading_for_us(transport.destination)
                && galaxy.is_visible_to(me, transport.location)
        });
        if armed_fleet_inbound || troops_inbound {
            return true;
        }

        let smart_power = self.smart_power_level(ctx);
        for contact in me.contacted().filter_map(|id| galaxy.empire(id)) {
            if !galaxy.in_ship_range_of(contact, empire)
                || contact.at_war()
                || contact.is_allied_with(empire)
            {
                continue;
            }
            let fleet_center = self.fleet_center(ctx, contact.id);
            let mut nearest = None;
            let mut best_score = 0.0;
            for prey in contact.contacted() {
                if !galaxy.in_ship_range_of(contact, prey) {
                    continue;
                }
                if galaxy
                    .empire(prey)
                    .is_some_and(|prey| prey.is_allied_with(contact.id))
                {
                    continue;
                }
                let distance = fleet_center
                    .distance_to(self.colony_center(ctx, prey))
                    .max(1.0);
                let score = 1.0 / distance;
                if score > best_score {
                    best_score = score;
                    nearest = Some(prey);
                }
            }
            if nearest == Some(empire) && contact.military_power_level > smart_power {
                debug!("{} fears an attack from {}", me.name, contact.name);
                return true;
            }
        }
        false
    }

    /// Turns `attacker` needs to bomb `defender` out of existence.
    ///
    /// Existing fleets and steady production are two channels working in
    /// parallel; each is unbounded when it cannot do damage.
    pub fn time_to_kill(&self, ctx: TurnContext<'_>, attacker: EmpireId, defender: EmpireId) -> f32 {
        let galaxy = ctx.galaxy;
        let (Some(attacking), Some(defending)) = (galaxy.empire(attacker), galaxy.empire(defender))
        else {
            return f32::MAX;
        };

        let (mut fleet_travel, mut fleet_weight) = (0.0, 0.0);
        let (mut production_travel, mut production_weight) = (0.0, 0.0);
        for theirs in galaxy.colonies_of(defender) {
            for fleet in galaxy.fleets_of(attacker) {
                let speed = if theirs.in_nebula {
                    1.0
                } else {
                    galaxy.fleet_slowest_speed(fleet)
                };
                let value = galaxy.fleet_bc_value(fleet);
                fleet_travel += (fleet.location.distance_to(theirs.location) / speed).max(1.0) * value;
                fleet_weight += value;
            }
            for mine in galaxy.colonies_of(attacker) {
                let Some(colony) = &mine.colony else {
                    continue;
                };
                let speed = if theirs.in_nebula {
                    1.0
                } else {
                    attacking.tech.top_speed.max(1.0)
                };
                let value = colony.total_income * mine.planet.production_adj;
                production_travel += (mine.distance_to(theirs) / speed).max(1.0) * value;
                production_weight += value;
            }
        }
        if fleet_weight > 0.0 {
            fleet_travel /= fleet_weight;
        }
        if production_weight > 0.0 {
            production_travel /= production_weight;
        }
        // doubled as a safety margin
        fleet_travel *= 2.0;
        production_travel *= 2.0;

        let damage_per_bc = attacking
            .tech
            .top_bomb
            .damage_per_bc(defending.tech.max_planetary_shield);
        let population_damage = galaxy.population_of(defender) * POPULATION_KILL_SCALE;
        let fleet_leg = kill_leg(
            population_damage,
            galaxy.total_fleet_cost(attacker) * damage_per_bc,
            fleet_travel,
        );
        let production_leg = kill_leg(
            population_damage,
            galaxy.production_of(attacker) * damage_per_bc,
            production_travel,
        );
        harmonic(fleet_leg, production_leg)
    }

    /// Return on fighting every current war, memoized for the turn.
    pub fn war_roi(&mut self, ctx: TurnContext<'_>) -> f32 {
        if let Some(roi) = self.cache.war_roi {
            return roi;
        }
        let Some(me) = self.me(ctx) else {
            return f32::MAX;
        };
        let mut enemies = me.war_enemies().peekable();
        let roi = if enemies.peek().is_none() {
            f32::MAX
        } else {
            let speed: f32 = enemies
                .map(|enemy| self.time_to_kill(ctx, enemy, self.empire))
                .filter(|turns| *turns > 0.0 && *turns < f32::MAX)
                .map(|turns| 1.0 / turns)
                .sum();
            if speed > 0.0 {
                WAR_ROI_SCALE / speed
            } else {
                f32::MAX
            }
        };
        self.cache.war_roi = Some(roi);
        roi
    }
}
