//! Aggregate figures about a faction's strength and posture.
//!
//! Most of these are read many times per turn by the other advisors, so the
//! expensive ones are memoized in the turn cache.

use crate::ai::advisor::StrategicAdvisor;
use crate::ai::general::TurnContext;
use crate::constants::*;
use crate::empire::{Empire, EmpireId};
use crate::galaxy::Galaxy;
use crate::map::Location;
use crate::ships::ShipFleet;

/// Fleets of rivals we do not share an alliance with, within scanner range.
fn visible_foreign_fleets<'a>(
    galaxy: &'a Galaxy,
    me: &'a Empire,
) -> impl Iterator<Item = &'a ShipFleet> + 'a {
    galaxy.fleets.iter().filter(move |fleet| {
        fleet.owner != me.id
            && !me.is_allied_with(fleet.owner)
            && galaxy.is_visible_to(me, fleet.location)
    })
}

impl StrategicAdvisor {
    /// Hull points of the armed fleet, discounted for obsolete designs.
    pub fn smart_power_level(&mut self, ctx: TurnContext<'_>) -> f32 {
        if let Some(power) = self.cache.smart_power {
            return power;
        }
        let Some(me) = self.me(ctx) else {
            return 0.0;
        };
        let counts = ctx.galaxy.design_counts(self.empire);
        let fastest = me.tech.top_engine_warp.max(1) as f32;
        let power: f32 = me
            .lab
            .designs
            .iter()
            .filter(|design| design.active && design.is_armed() && !design.has_colony_special())
            .map(|design| {
                let count = counts.get(&design.id).copied().unwrap_or(0) as f32;
                let keep = design.space_used() * design.warp as f32 / fastest;
                count * design.hull_points * keep * keep
            })
            .sum();
        let power = power * me.tech.avg_tech_level;
        self.cache.smart_power = Some(power);
        power
    }

    /// Share of production that should go to defense.
    pub fn defense_ratio(&mut self, ctx: TurnContext<'_>) -> f32 {
        if let Some(ratio) = self.cache.defense_ratio {
            return ratio;
        }
        let Some(me) = self.me(ctx) else {
            return MIN_DEFENSE_RATIO;
        };
        let galaxy = ctx.galaxy;
        let smart_power = self.smart_power_level(ctx);
        let my_fighters = self.my_fighter_cost(ctx);
        let enemy_fighters = self.visible_enemy_fighter_cost(ctx);

        let mut rival_in_range = false;
        let mut missile_base_cost = 0.0;
        let mut ship_cost = 0.0;
        let mut highest_power: f32 = 0.0;
        let mut enemy_population = 0.0;
        let mut biggest_population: f32 = 0.0;
        let mut enemy_production = 0.0;
        let mut juiciest: Option<(f32, f32)> = None;
        for rival in me.contacted().filter_map(|id| galaxy.empire(id)) {
            rival_in_range |= galaxy.in_ship_range_of(me, rival.id);
            missile_base_cost += rival.missile_base_cost_per_bc;
            ship_cost += rival.ship_maint_cost_per_bc;
            highest_power = highest_power.max(rival.military_power_level);
            let at_war = me.is_at_war_with(rival.id);
            if at_war {
                enemy_production += galaxy.production_of(rival.id);
            }

            let their_population = galaxy.population_of(rival.id);
            let mut reachable_population = 0.0;
            for system in galaxy.colonies_of(rival.id) {
                let Some(colony) = &system.colony else {
                    continue;
                };
                if me.intel(system.id).in_ship_range {
                    if at_war {
                        enemy_population += their_population;
                    }
                    reachable_population += their_population;
                }
                let score = (1.0 + colony.defense.shield_level) * colony.population;
                if juiciest.is_none_or(|(best, _)| score > best) {
                    juiciest = Some((score, colony.defense.shield_level));
                }
            }
            biggest_population = biggest_population.max(reachable_population);
        }

        let killing_power: f32 = juiciest.map_or(0.0, |(_, shield)| {
            galaxy
                .fleets_of(self.empire)
                .map(|fleet| galaxy.fleet_bombard_damage(fleet, shield) / POPULATION_KILL_SCALE)
                .sum()
        });
        let enemy_population = biggest_population.max(enemy_population);
        let overkill = if enemy_population > 0.0 {
            killing_power / enemy_population
        } else {
            0.0
        };

        let mut ratio = 0.0;
        if highest_power + smart_power > 0.0 {
            ratio = BASE_DEFENSE_RATIO
                + (1.0 - BASE_DEFENSE_RATIO) * highest_power / (highest_power + smart_power);
        }
        if overkill > 1.0 {
            ratio = 1.0 - (1.0 - ratio) / overkill;
        }
        if missile_base_cost + ship_cost > 0.0 {
            ratio = ratio.min(ship_cost / (missile_base_cost + ship_cost));
        }
        if my_fighters < enemy_fighters + enemy_production || !rival_in_range {
            ratio = 1.0;
        }
        let ratio = ratio.max(MIN_DEFENSE_RATIO);
        self.cache.defense_ratio = Some(ratio);
        ratio
    }

    /// Fighter value of visible fleets of factions we are at war with.
    pub fn visible_enemy_fighter_cost(&mut self, ctx: TurnContext<'_>) -> f32 {
        if let Some(cost) = self.cache.visible_enemy_fighter_cost {
            return cost;
        }
        let Some(me) = self.me(ctx) else {
            return 0.0;
        };
        let cost: f32 = visible_foreign_fleets(ctx.galaxy, me)
            .filter(|fleet| me.is_at_war_with(fleet.owner))
            .map(|fleet| ctx.oracles.fighter_bc_value(ctx.galaxy, self.empire, fleet))
            .sum();
        self.cache.visible_enemy_fighter_cost = Some(cost);
        cost
    }

    /// Population value of hostile troops seen heading for our colonies.
    pub fn visible_enemy_transport_cost(&mut self, ctx: TurnContext<'_>) -> f32 {
        if let Some(cost) = self.cache.visible_enemy_transport_cost {
            return cost;
        }
        let Some(me) = self.me(ctx) else {
            return 0.0;
        };
        let galaxy = ctx.galaxy;
        let cost: f32 = galaxy
            .transports
            .iter()
            .filter(|transport| {
                me.aggressive_with(transport.owner)
                    && galaxy.is_visible_to(me, transport.location)
                    && galaxy
                        .system(transport.destination)
                        .is_some_and(|system| system.owner() == Some(self.empire))
            })
            .map(|transport| {
                let population_cost = galaxy
                    .empire(transport.owner)
                    .map_or(0.0, |owner| owner.tech.population_cost);
                transport.size as f32 * population_cost
            })
            .sum();
        self.cache.visible_enemy_transport_cost = Some(cost);
        cost
    }

    /// Build cost of our ships weighted by how well they fight.
    pub fn my_fighter_cost(&mut self, ctx: TurnContext<'_>) -> f32 {
        if let Some(cost) = self.cache.my_fighter_cost {
            return cost;
        }
        let Some(me) = self.me(ctx) else {
            return 0.0;
        };
        let counts = ctx.galaxy.design_counts(self.empire);
        let cost: f32 = me
            .lab
            .designs
            .iter()
            .filter(|design| !design.has_colony_special())
            .map(|design| {
                let count = counts.get(&design.id).copied().unwrap_or(0) as f32;
                design.cost
                    * count
                    * ctx
                        .oracles
                        .fighting_adapted(ctx.galaxy, self.empire, design.id)
            })
            .sum();
        self.cache.my_fighter_cost = Some(cost);
        cost
    }

    /// One warship per colony once anyone knows we exist, minus what is already armed.
    pub fn fighters_to_build(&self, ctx: TurnContext<'_>) -> i32 {
        let Some(me) = self.me(ctx) else {
            return 0;
        };
        let galaxy = ctx.galaxy;
        let mut need = if me.contacted().next().is_some() {
            galaxy.num_colonies(self.empire) as i32
        } else {
            0
        };
        for (design, count) in galaxy.design_counts(self.empire) {
            if me.lab.design(design).is_some_and(|design| design.is_armed()) {
                need -= count as i32;
            }
        }
        need
    }

    /// Whether the armed fleet outweighs a turn of production and we are not
    /// outgunned relative to our size.
    pub fn strong_enough_to_attack(&mut self, ctx: TurnContext<'_>) -> bool {
        let Some(me) = self.me(ctx) else {
            return false;
        };
        let galaxy = ctx.galaxy;
        let armed_cost = match self.cache.armed_fleet_cost {
            Some(cost) => cost,
            None => {
                let counts = galaxy.design_counts(self.empire);
                let cost: f32 = me
                    .lab
                    .designs
                    .iter()
                    .filter(|design| {
                        design.active && design.is_armed() && !design.has_colony_special()
                    })
                    .map(|design| {
                        design.cost * counts.get(&design.id).copied().unwrap_or(0) as f32
                    })
                    .sum();
                self.cache.armed_fleet_cost = Some(cost);
                cost
            }
        };
        armed_cost > galaxy.production_of(self.empire) + ATTACK_THRESHOLD_MARGIN
            && ctx.oracles.military_rank(galaxy, self.empire)
                <= ctx.oracles.population_capacity_rank(galaxy, self.empire)
    }

    /// Summed planet size of every colony of `empire`.
    pub fn total_empire_population_capacity(&mut self, ctx: TurnContext<'_>, empire: EmpireId) -> f32 {
        let ours = empire == self.empire;
        let ai_controlled = self.me(ctx).is_some_and(|me| me.ai_controlled);
        if ours
            && ai_controlled
            && let Some(capacity) = self.cache.population_capacity
        {
            return capacity;
        }
        let capacity: f32 = ctx
            .galaxy
            .colonies_of(empire)
            .map(|system| system.planet.current_size)
            .sum();
        if ours {
            self.cache.population_capacity = Some(capacity);
        }
        capacity
    }

    pub fn highest_prod_score(&mut self, ctx: TurnContext<'_>) -> f32 {
        if let Some(score) = self.cache.highest_prod_score
            && score > 0.0
        {
            return score;
        }
        let highest = ctx
            .galaxy
            .colonies_of(self.empire)
            .map(|system| ctx.oracles.production_score(ctx.galaxy, self.empire, system.id))
            .fold(0.0, f32::max);
        self.cache.highest_prod_score = Some(highest);
        highest
    }

    /// Fraction of the projected game length already played.
    ///
    /// Every known faction's colony share is extrapolated linearly to a
    /// victory turn; the game is assumed to end at the earliest of those, or
    /// earlier still if we are falling behind the leader.
    pub fn game_progress(&self, ctx: TurnContext<'_>) -> f32 {
        let galaxy = ctx.galaxy;
        let Some(me) = self.me(ctx) else {
            return 0.0;
        };
        let systems = galaxy.system_count();
        if systems == 0 || galaxy.turn == 0 {
            return 0.0;
        }
        let turn = galaxy.turn as f32;

        let mut fastest_victory = f32::MAX;
        let mut my_share = 0.0;
        let mut highest_share: f32 = 0.0;
        for empire in galaxy.active_empires() {
            if empire.id != self.empire && !me.has_contact(empire.id) {
                continue;
            }
            let share =
                galaxy.num_colonies(empire.id) as f32 / systems as f32 * VICTORY_SHARE_MULTIPLIER;
            if share <= 0.0 {
                continue;
            }
            if empire.id == self.empire {
                my_share = share;
            }
            highest_share = highest_share.max(share);
            fastest_victory = fastest_victory.min(turn / share);
        }
        if highest_share <= 0.0 || fastest_victory >= f32::MAX {
            return 0.0;
        }
        let defeat = fastest_victory * my_share / highest_share;
        let game_end = fastest_victory.min(defeat);
        if game_end <= 0.0 {
            return 1.0;
        }
        turn / game_end
    }

    /// Population-weighted center of an empire's colonies.
    pub fn colony_center(&self, ctx: TurnContext<'_>, empire: EmpireId) -> Location {
        let (mut x, mut y, mut total) = (0.0, 0.0, 0.0);
        for system in ctx.galaxy.colonies_of(empire) {
            let population = system.colony.as_ref().map_or(0.0, |colony| colony.population);
            x += system.location.x * population;
            y += system.location.y * population;
            total += population;
        }
        if total <= 0.0 {
            return Location::ORIGIN;
        }
        Location::new(x / total, y / total)
    }

    /// Value-weighted center of an empire's fleets, its colony center when it has none.
    pub fn fleet_center(&self, ctx: TurnContext<'_>, empire: EmpireId) -> Location {
        let galaxy = ctx.galaxy;
        let (mut x, mut y, mut total) = (0.0, 0.0, 0.0);
        for fleet in galaxy.fleets_of(empire) {
            let value = galaxy.fleet_bc_value(fleet);
            x += fleet.location.x * value;
            y += fleet.location.y * value;
            total += value;
        }
        if total <= 0.0 {
            return self.colony_center(ctx, empire);
        }
        Location::new(x / total, y / total)
    }

    pub fn is_invader(&self, ctx: TurnContext<'_>) -> bool {
        self.me(ctx)
            .is_some_and(|me| me.race.ground_attack_bonus > 0.0 || me.race.growth_rate_mod > 1.0)
    }

    pub fn is_rusher(&self, ctx: TurnContext<'_>) -> bool {
        self.me(ctx).is_some_and(|me| {
            me.race.ship_attack_bonus > 0.0
                || me.race.ship_defense_bonus > 0.0
                || me.race.spy_infiltration_adj > 0.0
        }) || self.is_invader(ctx)
    }

    pub fn is_expander(&self, ctx: TurnContext<'_>) -> bool {
        self.me(ctx).is_some_and(|me| {
            me.race.ignores_planet_environment || me.race.growth_rate_mod > 1.0
        })
    }

    pub fn is_spy(&self, ctx: TurnContext<'_>) -> bool {
        self.me(ctx).is_some_and(|me| {
            me.race.spy_infiltration_adj > 0.0
                || me.leader.is_technologist()
                || me.leader.is_pacifist()
        })
    }

    pub fn is_trader(&self, ctx: TurnContext<'_>) -> bool {
        self.me(ctx).is_some_and(|me| {
            me.race.trade_pct_bonus > 0.0 || me.leader.is_diplomat() || me.leader.is_pacifist()
        })
    }

    /// Fast hunters are only worth it while scouts still roam unchecked.
    pub fn need_scout_repellers(&self, ctx: TurnContext<'_>, potential: bool) -> bool {
        let Some(me) = self.me(ctx) else {
            return false;
        };
        if me.tech.unlimited_range || me.scan_planets || !me.lab.need_scouts {
            return false;
        }
        potential || (!me.at_war() && visible_foreign_fleets(ctx.galaxy, me).next().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diplomacy::Stance;
    use crate::empire::{Objective, Personality};
    use crate::test_utils::{GalaxyFixture, context};

    #[test]
    fn smart_power_discounts_slow_and_empty_hulls() {
        let mut fixture = GalaxyFixture::new(1);
        let home = fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
        let fighter = fixture.fighter(EmpireId(0));
        fixture.add_fleet(EmpireId(0), home, &[(fighter, 3)]);
        fixture.empire_mut(EmpireId(0)).tech.top_engine_warp = 4;
        fixture.empire_mut(EmpireId(0)).tech.avg_tech_level = 2.0;
        let galaxy = fixture.build();
        let mut advisor = StrategicAdvisor::new(EmpireId(0));

        // 80% of the hull used at half the best warp: keep = 0.4, squared 0.16
        let expected = 3.0 * 10.0 * 0.16 * 2.0;
        let power = advisor.smart_power_level(context(&galaxy));
        assert!((power - expected).abs() < 1e-4, "power was {power}");
    }

    #[test]
    fn defense_ratio_is_full_without_rivals_in_range() {
        let mut fixture = GalaxyFixture::new(1);
        fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
        let galaxy = fixture.build();
        let mut advisor = StrategicAdvisor::new(EmpireId(0));
        assert_eq!(advisor.defense_ratio(context(&galaxy)), 1.0);
    }

    #[test]
    fn defense_ratio_never_drops_below_half() {
        let mut fixture = GalaxyFixture::new(2);
        let home = fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
        fixture.add_colony(EmpireId(1), Location::new(3.0, 0.0), 50.0, 0.0);
        fixture.contact_all();
        let fighter = fixture.fighter(EmpireId(0));
        fixture.add_fleet(EmpireId(0), home, &[(fighter, 20)]);
        fixture.empire_mut(EmpireId(1)).ship_maint_cost_per_bc = 0.0;
        fixture.empire_mut(EmpireId(1)).missile_base_cost_per_bc = 1.0;
        let galaxy = fixture.build();
        let mut advisor = StrategicAdvisor::new(EmpireId(0));

        assert_eq!(advisor.defense_ratio(context(&galaxy)), MIN_DEFENSE_RATIO);
    }

    #[test]
    fn centers_follow_weights() {
        let mut fixture = GalaxyFixture::new(2);
        let big = fixture.add_colony(EmpireId(0), Location::new(0.0, 0.0), 30.0, 0.0);
        fixture.add_colony(EmpireId(0), Location::new(4.0, 0.0), 10.0, 0.0);
        let fighter = fixture.fighter(EmpireId(0));
        fixture.add_fleet(EmpireId(0), big, &[(fighter, 1)]);
        let galaxy = fixture.build();
        let advisor = StrategicAdvisor::new(EmpireId(0));
        let ctx = context(&galaxy);

        assert_eq!(advisor.colony_center(ctx, EmpireId(0)), Location::new(1.0, 0.0));
        assert_eq!(advisor.fleet_center(ctx, EmpireId(0)), Location::new(0.0, 0.0));
        assert_eq!(advisor.colony_center(ctx, EmpireId(1)), Location::ORIGIN);
        assert_eq!(advisor.fleet_center(ctx, EmpireId(1)), Location::ORIGIN);
    }

    #[test]
    fn strong_enough_needs_a_fleet_bigger_than_production() {
        let mut fixture = GalaxyFixture::new(1);
        let home = fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
        let fighter = fixture.fighter(EmpireId(0));
        fixture.add_fleet(EmpireId(0), home, &[(fighter, 2)]);
        let galaxy = fixture.build();
        let mut advisor = StrategicAdvisor::new(EmpireId(0));
        assert!(!advisor.strong_enough_to_attack(context(&galaxy)));

        let mut fixture = GalaxyFixture::new(1);
        let home = fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
        let fighter = fixture.fighter(EmpireId(0));
        fixture.add_fleet(EmpireId(0), home, &[(fighter, 3)]);
        let galaxy = fixture.build();
        let mut advisor = StrategicAdvisor::new(EmpireId(0));
        assert!(advisor.strong_enough_to_attack(context(&galaxy)));
    }

    #[test]
    fn fighters_to_build_counts_armed_ships() {
        let mut fixture = GalaxyFixture::new(2);
        let home = fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
        fixture.add_colony(EmpireId(0), Location::new(2.0, 0.0), 20.0, 0.0);
        fixture.add_colony(EmpireId(0), Location::new(0.0, 2.0), 20.0, 0.0);
        let fighter = fixture.fighter(EmpireId(0));
        fixture.add_fleet(EmpireId(0), home, &[(fighter, 1)]);
        let galaxy = fixture.build();
        let advisor = StrategicAdvisor::new(EmpireId(0));
        assert_eq!(advisor.fighters_to_build(context(&galaxy)), -1);

        let mut fixture = GalaxyFixture::from_galaxy(galaxy);
        fixture.contact_all();
        let galaxy = fixture.build();
        assert_eq!(advisor.fighters_to_build(context(&galaxy)), 2);
    }

    #[test]
    fn game_progress_tracks_the_leader() {
        let mut fixture = GalaxyFixture::new(2);
        fixture.add_colony(EmpireId(0), Location::new(0.0, 0.0), 50.0, 0.0);
        fixture.add_colony(EmpireId(1), Location::new(9.0, 0.0), 50.0, 0.0);
        fixture.add_colony(EmpireId(1), Location::new(9.0, 2.0), 50.0, 0.0);
        fixture.add_empty(Location::new(5.0, 5.0));
        fixture.contact_all();
        let mut galaxy = fixture.build();
        galaxy.turn = 30;
        let advisor = StrategicAdvisor::new(EmpireId(0));

        // leader: 2/4 * 1.5 = 0.75 -> wins at turn 40, we trail at 0.375 -> 20
        assert_eq!(advisor.game_progress(context(&galaxy)), 1.5);
    }

    #[test]
    fn game_progress_is_zero_before_the_first_turn() {
        let mut fixture = GalaxyFixture::new(1);
        fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
        fixture.add_empty(Location::new(3.0, 0.0));
        let mut galaxy = fixture.build();
        galaxy.turn = 0;
        let advisor = StrategicAdvisor::new(EmpireId(0));

        assert_eq!(advisor.game_progress(context(&galaxy)), 0.0);
    }

    #[test]
    fn strong_enough_needs_a_margin_over_production() {
        let build = |production: f32| {
            let mut fixture = GalaxyFixture::new(1);
            let home = fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
            fixture.set_production(home, production);
            let fighter = fixture.fighter(EmpireId(0));
            fixture.add_fleet(EmpireId(0), home, &[(fighter, 3)]);
            fixture.build()
        };

        // 60 BC of fighters against 59.5 BC of production
        let galaxy = build(59.5);
        assert!(!StrategicAdvisor::new(EmpireId(0)).strong_enough_to_attack(context(&galaxy)));

        let galaxy = build(58.5);
        assert!(StrategicAdvisor::new(EmpireId(0)).strong_enough_to_attack(context(&galaxy)));
    }

    #[test]
    fn archetypes_follow_race_and_leader() {
        let mut fixture = GalaxyFixture::new(1);
        fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
        {
            let empire = fixture.empire_mut(EmpireId(0));
            empire.race.growth_rate_mod = 1.5;
            empire.leader.personality = Personality::Pacifist;
            empire.leader.objective = Objective::Industrialist;
        }
        let galaxy = fixture.build();
        let advisor = StrategicAdvisor::new(EmpireId(0));
        let ctx = context(&galaxy);

        assert!(advisor.is_invader(ctx));
        assert!(advisor.is_rusher(ctx));
        assert!(advisor.is_expander(ctx));
        assert!(advisor.is_spy(ctx));
        assert!(advisor.is_trader(ctx));
    }

    #[test]
    fn scout_repellers_only_while_scouting_at_peace() {
        let mut fixture = GalaxyFixture::new(2);
        fixture.add_colony(EmpireId(0), Location::ORIGIN, 50.0, 0.0);
        let far = fixture.add_colony(EmpireId(1), Location::new(30.0, 0.0), 50.0, 0.0);
        fixture.contact_all();
        let scout = fixture.repeller(EmpireId(1));
        fixture.add_fleet_in_transit(EmpireId(1), Location::new(1.0, 1.0), far, &[(scout, 1)]);
        let galaxy = fixture.build();
        let advisor = StrategicAdvisor::new(EmpireId(0));
        assert!(!advisor.need_scout_repellers(context(&galaxy), false));

        let mut fixture = GalaxyFixture::from_galaxy(galaxy);
        fixture.empire_mut(EmpireId(0)).lab.need_scouts = true;
        let galaxy = fixture.build();
        assert!(advisor.need_scout_repellers(context(&galaxy), false));

        let mut fixture = GalaxyFixture::from_galaxy(galaxy);
        fixture.set_stance(EmpireId(0), EmpireId(1), Stance::War);
        let galaxy = fixture.build();
        assert!(!advisor.need_scout_repellers(context(&galaxy), false));
        assert!(advisor.need_scout_repellers(context(&galaxy), true));
    }
}
