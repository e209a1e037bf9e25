use crate::model::config::{ReproductionMode, Role};
use crate::model::interaction::InteractionCommand;
use crate::model::leveling;
use crate::model::lifecycle::{self, AgentBundle};
use crate::model::snapshot::TickIndex;
use crate::model::systems::behavior::{self, AgentDecision, DecideContext};
use crate::model::systems::{reproduction, steering, vitals};
use crate::model::world::{Settlement, World};
use hecs::Entity;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::collections::HashSet;
use std::time::Instant;
use uuid::Uuid;
use worldsim_data::{
    Allegiance, Behavior, BehaviorState, CellCoord, DeathCause, Fertility, FoodItem, Genes,
    Identity, Kinetics, Position, Progression, SimEvent, Vitals,
};

/// Agents leaving the world this tick and agents joining it.
#[derive(Debug, Default)]
pub struct TickOutcome {
    pub deaths: Vec<(Entity, DeathCause)>,
    pub births: Vec<AgentBundle>,
    dead: HashSet<Entity>,
}

impl TickOutcome {
    fn kill(&mut self, handle: Entity, cause: DeathCause) {
        if self.dead.insert(handle) {
            self.deaths.push((handle, cause));
        }
    }

    fn is_dead(&self, handle: Entity) -> bool {
        self.dead.contains(&handle)
    }
}

/// Deterministic per-agent RNG for one tick, independent of thread scheduling.
pub fn agent_rng(tick: u64, world_seed: u64, id: Uuid) -> ChaCha8Rng {
    let u = id.as_u128();
    let mut seed = tick
        .wrapping_add(world_seed)
        .wrapping_mul(0x517CC1B727220A95);
    seed ^= (u >> 64) as u64;
    seed = seed.wrapping_mul(0x517CC1B727220A95);
    seed ^= u as u64;
    ChaCha8Rng::seed_from_u64(seed)
}

impl World {
    /// Advances the simulation by one frame of `frame_dt` seconds.
    ///
    /// Steps chunked terrain, then runs every agent's state machine in
    /// parallel against a snapshot, applies the resulting interactions in
    /// agent-id order, removes the dead, adds the newborn and spawns food.
    ///
    /// # Returns
    /// Events that occurred this tick, in the order they happened.
    pub fn update(&mut self, frame_dt: f64) -> anyhow::Result<Vec<SimEvent>> {
        let started = Instant::now();
        anyhow::ensure!(frame_dt.is_finite(), "frame delta must be finite");
        let dt = frame_dt.max(0.0) * self.time_scale;
        self.tick += 1;
        self.clock += dt;
        let mut events = Vec::new();

        self.pass_terrain(&mut events);

        if !self.pending_population && dt > 0.0 {
            let decisions = self.pass_decide(dt);
            let mut outcome = TickOutcome::default();
            self.pass_write_back(&decisions, &mut outcome, &mut events);
            self.pass_interactions(&decisions, &mut outcome, &mut events);
            self.decision_buffer = decisions;
            self.finalize_tick(outcome, &mut events);
            self.pass_food(dt);
        }

        self.metrics
            .record_tick(started.elapsed(), self.agent_count(), self.food_count());
        Ok(events)
    }

    fn pass_terrain(&mut self, events: &mut Vec<SimEvent>) {
        let Some(chunked) = self.chunked.as_mut() else {
            return;
        };
        let progress = chunked.step_n(
            &mut self.terrain,
            events,
            self.config.terrain.chunks_per_tick,
        );
        if progress.is_complete() {
            tracing::info!(tick = self.tick, "Terrain generation complete");
            self.chunked = None;
            if self.pending_population {
                self.populate();
            }
        }
    }

    fn pass_decide(&mut self, dt: f64) -> Vec<AgentDecision> {
        let index = TickIndex::build(
            &self.ecs,
            &self.registry,
            self.width,
            self.height,
            self.config.world.spatial_cell_size,
        );
        let ctx = DecideContext {
            config: &self.config,
            terrain: &self.terrain,
            index: &index,
            now: self.clock,
            dt,
        };
        let tick = self.tick;
        let world_seed = self.world_seed;

        let mut decisions = std::mem::take(&mut self.decision_buffer);
        decisions.clear();
        (0..index.agents().len())
            .into_par_iter()
            .map(|i| {
                let mut rng = agent_rng(tick, world_seed, index.agents()[i].id);
                behavior::decide(i, &ctx, &mut rng)
            })
            .collect_into_vec(&mut decisions);
        decisions
    }

    fn pass_write_back(
        &mut self,
        decisions: &[AgentDecision],
        outcome: &mut TickOutcome,
        events: &mut Vec<SimEvent>,
    ) {
        for d in decisions {
            let Ok((identity, position, kinetics, vitals, behavior)) = self.ecs.query_one_mut::<(
                &Identity,
                &mut Position,
                &mut Kinetics,
                &mut Vitals,
                &mut Behavior,
            )>(d.handle) else {
                continue;
            };
            *position = d.position;
            *kinetics = d.kinetics;
            *vitals = d.vitals;
            *behavior = d.behavior;
            if d.cue_changed {
                events.push(SimEvent::Animation {
                    id: identity.id,
                    cue: d.behavior.cue,
                });
            }
            if let Some(cause) = d.death {
                outcome.kill(d.handle, cause);
            }
        }
    }

    fn pass_interactions(
        &mut self,
        decisions: &[AgentDecision],
        outcome: &mut TickOutcome,
        events: &mut Vec<SimEvent>,
    ) {
        let mut paired: HashSet<(Entity, Entity)> = HashSet::new();
        for cmd in decisions.iter().flat_map(|d| d.commands.iter().copied()) {
            match cmd {
                InteractionCommand::Eat { eater, food } => {
                    self.apply_eat(eater, food, outcome, events);
                }
                InteractionCommand::Reproduce { a, b } => {
                    // Both partners usually ask; only the first request per pair counts.
                    if paired.insert((a.min(b), a.max(b))) {
                        self.apply_reproduce(a, b, outcome, events);
                    }
                }
                InteractionCommand::Attack { attacker, prey } => {
                    self.apply_attack(attacker, prey, outcome, events);
                }
                InteractionCommand::Fission { parent } => {
                    self.apply_fission(parent, outcome, events);
                }
                InteractionCommand::FoundSettlement { founder } => {
                    self.apply_settlement(founder, outcome, events);
                }
            }
        }
    }

    fn apply_eat(
        &mut self,
        eater: Entity,
        food: Entity,
        outcome: &TickOutcome,
        events: &mut Vec<SimEvent>,
    ) {
        if outcome.is_dead(eater) {
            return;
        }
        let Some((amount, food_id, depleted)) = self
            .ecs
            .query_one_mut::<&mut FoodItem>(food)
            .ok()
            .and_then(|item| item.consume().map(|a| (a, item.id, item.is_depleted())))
        else {
            return;
        };
        let now = self.clock;
        let tick = self.tick;
        let leveling = &self.config.leveling;
        let Ok((identity, vitals_c, behavior_c, progression, genes)) = self.ecs.query_one_mut::<(
            &Identity,
            &mut Vitals,
            &mut Behavior,
            &mut Progression,
            &mut Genes,
        )>(eater) else {
            return;
        };
        vitals::feed(vitals_c, amount);
        behavior_c.last_eat_time = Some(now);
        behavior_c.state = BehaviorState::Wandering;
        behavior_c.target = None;
        let eater_id = identity.id;
        let levels = if self.config.profile(identity.kind).leveling {
            leveling::gain_xp(progression, vitals_c, genes, leveling.xp_per_meal, leveling)
        } else {
            0
        };
        let level = progression.level;

        events.push(SimEvent::FoodEaten {
            eater: eater_id,
            food: food_id,
            depleted,
            tick,
        });
        if levels > 0 {
            events.push(SimEvent::LevelUp {
                id: eater_id,
                level,
                tick,
            });
        }
        if depleted {
            if let Err(e) = self.destroy_food(food) {
                tracing::warn!(error = %e, "Depleted food already gone");
            }
        }
        self.metrics.increment_counter("meals");
    }

    fn apply_reproduce(
        &mut self,
        a: Entity,
        b: Entity,
        outcome: &mut TickOutcome,
        events: &mut Vec<SimEvent>,
    ) {
        if a == b || outcome.is_dead(a) || outcome.is_dead(b) {
            return;
        }
        let now = self.clock;
        let (Some(ia), Some(ib)) = (
            self.component::<Identity>(a),
            self.component::<Identity>(b),
        ) else {
            return;
        };
        let profile = self.config.profile(ia.kind);
        let eligible = |world: &World, h: Entity| {
            match (world.component::<Vitals>(h), world.component::<Fertility>(h)) {
                (Some(v), Some(f)) => reproduction::is_eligible(&v, &f, profile, now),
                _ => false,
            }
        };
        if ia.kind != ib.kind
            || !matches!(profile.reproduction, ReproductionMode::Sexual)
            || !eligible(self, a)
            || !eligible(self, b)
        {
            tracing::debug!(a = %ia.id, b = %ib.id, "Reproduction skipped, parents not eligible");
            return;
        }

        let child = match self.child_of(a, b) {
            Ok(child) => child,
            Err(e) => {
                tracing::debug!(error = %e, "Reproduction skipped");
                return;
            }
        };

        let pa = self.component::<Position>(a).unwrap_or_default();
        let pb = self.component::<Position>(b).unwrap_or_default();
        let apart = steering::normalize(pa.x - pb.x, pa.y - pb.y)
            .unwrap_or_else(|| lifecycle::random_direction(&mut self.rng));
        let leveling = self.config.leveling.clone();
        let levels_up = self.config.profile(ia.kind).leveling;
        let separation = self.config.profile(ia.kind).separation_duration;
        let tick = self.tick;

        for (parent, dir) in [(a, apart), (b, (-apart.0, -apart.1))] {
            let Ok((identity, fertility, kinetics, behavior_c, vitals_c, progression, genes)) =
                self.ecs.query_one_mut::<(
                    &Identity,
                    &mut Fertility,
                    &mut Kinetics,
                    &mut Behavior,
                    &mut Vitals,
                    &mut Progression,
                    &mut Genes,
                )>(parent)
            else {
                continue;
            };
            fertility.children += 1;
            fertility.last_child_time = Some(now);
            kinetics.movement_dir = dir;
            kinetics.target_dir = dir;
            behavior_c.state = BehaviorState::Separating {
                until: now + separation,
            };
            behavior_c.target = None;
            if levels_up
                && leveling::gain_xp(progression, vitals_c, genes, leveling.xp_per_child, &leveling)
                    > 0
            {
                events.push(SimEvent::LevelUp {
                    id: identity.id,
                    level: progression.level,
                    tick,
                });
            }
        }

        tracing::debug!(
            a = %ia.id,
            b = %ib.id,
            child = %child.identity.id,
            "Reproduction"
        );
        outcome.births.push(child);
    }

    fn apply_attack(
        &mut self,
        attacker: Entity,
        prey: Entity,
        outcome: &mut TickOutcome,
        events: &mut Vec<SimEvent>,
    ) {
        if outcome.is_dead(attacker) || outcome.is_dead(prey) {
            return;
        }
        let (Some(ia), Some(ip), Some(from), Some(level)) = (
            self.component::<Identity>(attacker),
            self.component::<Identity>(prey),
            self.component::<Position>(attacker),
            self.component::<Progression>(attacker).map(|p| p.level),
        ) else {
            return;
        };
        let Role::Predator {
            prey: prey_kind,
            damage,
            ..
        } = self.config.profile(ia.kind).role
        else {
            return;
        };
        if ip.kind != prey_kind {
            return;
        }
        let damage = leveling::attack_damage(damage, level, &self.config.leveling);
        let prey_profile = self.config.profile(ip.kind);
        let (distance, duration) = (
            prey_profile.knockback_distance,
            prey_profile.knockback_duration,
        );
        let now = self.clock;

        let Ok((position, vitals_c, behavior_c)) = self
            .ecs
            .query_one_mut::<(&Position, &mut Vitals, &mut Behavior)>(prey)
        else {
            return;
        };
        let lethal = vitals::take_damage(vitals_c, damage);
        let to = steering::knockback_target(*position, from, distance, &self.terrain);
        behavior_c.state = BehaviorState::Knockback {
            from: *position,
            to,
            started: now,
            duration,
        };
        behavior_c.target = None;

        if let Ok(b) = self.ecs.query_one_mut::<&mut Behavior>(attacker) {
            b.last_attack_time = Some(now);
        }
        events.push(SimEvent::Attack {
            attacker: ia.id,
            prey: ip.id,
            damage,
            tick: self.tick,
        });
        if lethal {
            outcome.kill(prey, DeathCause::Combat);
        }
    }

    fn apply_fission(
        &mut self,
        parent: Entity,
        outcome: &mut TickOutcome,
        events: &mut Vec<SimEvent>,
    ) {
        let (Some(identity), Some(pos)) = (
            self.component::<Identity>(parent),
            self.component::<Position>(parent),
        ) else {
            return;
        };
        let ReproductionMode::Fission {
            offspring, offset, ..
        } = self.config.profile(identity.kind).reproduction
        else {
            return;
        };

        let mut ids = Vec::with_capacity(offspring as usize);
        for i in 0..offspring {
            let shift = offset * (2.0 * f64::from(i) - f64::from(offspring - 1));
            let mut spot = Position::new(pos.x + shift, pos.y);
            if !self.terrain.is_walkable(CellCoord::from_world(spot.x, spot.y)) {
                spot = pos;
            }
            let mut child = self.new_agent(identity.kind, spot);
            child.identity.parents = Some((identity.id, identity.id));
            child.identity.generation = identity.generation + 1;
            ids.push(child.identity.id);
            outcome.births.push(child);
        }
        events.push(SimEvent::Fission {
            parent: identity.id,
            offspring: ids,
            tick: self.tick,
        });
    }

    fn apply_settlement(
        &mut self,
        founder: Entity,
        outcome: &TickOutcome,
        events: &mut Vec<SimEvent>,
    ) {
        if outcome.is_dead(founder) {
            return;
        }
        let name = lifecycle::settlement_name(&mut self.rng);
        let Ok((identity, position, allegiance)) = self
            .ecs
            .query_one_mut::<(&Identity, &Position, &mut Allegiance)>(founder)
        else {
            return;
        };
        if allegiance.settlement.is_some() {
            return;
        }
        allegiance.settlement = Some(name.clone());
        let settlement = Settlement {
            name: name.clone(),
            founder: identity.id,
            x: position.x,
            y: position.y,
            founded_tick: self.tick,
        };
        tracing::info!(founder = %identity.id, name = %name, "Settlement founded");
        events.push(SimEvent::SettlementFounded {
            founder: settlement.founder,
            name,
            x: settlement.x,
            y: settlement.y,
            tick: self.tick,
        });
        self.settlements.push(settlement);
    }

    fn pass_food(&mut self, dt: f64) {
        let current = self.food_count();
        let wanted = self.food_spawner.tick(dt, &self.config.food, current);
        let attempts = self.config.food.placement_attempts;
        for _ in 0..wanted {
            if let Some((x, y)) = self.terrain.random_walkable_point(&mut self.rng, attempts) {
                self.spawn_food(Position::new(x, y));
            }
        }
    }
}
