//! Per-agent state machine, evaluated against a read-only tick snapshot.

use super::{reproduction, steering, vitals};
use crate::config::{AgentProfile, AppConfig, ReproductionMode, Role};
use crate::interaction::InteractionCommand;
use crate::registry::EntityCategory;
use crate::snapshot::{AgentSnapshot, SpatialQuery, TickIndex};
use crate::terrain::TerrainMap;
use hecs::Entity;
use rand::Rng;
use worldsim_data::{
    AnimationCue, Behavior, BehaviorState, DeathCause, Kinetics, Position, Target, Vitals,
};

/// Shared read-only inputs of the decide phase.
pub struct DecideContext<'a> {
    pub config: &'a AppConfig,
    pub terrain: &'a TerrainMap,
    pub index: &'a TickIndex,
    /// Simulation clock after this tick's advance.
    pub now: f64,
    pub dt: f64,
}

/// Everything one agent changed about itself, plus the commands it wants
/// applied to others.
#[derive(Debug, Clone)]
pub struct AgentDecision {
    pub handle: Entity,
    pub position: Position,
    pub kinetics: Kinetics,
    pub vitals: Vitals,
    pub behavior: Behavior,
    pub commands: Vec<InteractionCommand>,
    pub death: Option<DeathCause>,
    pub cue_changed: bool,
}

impl AgentDecision {
    fn from_snapshot(agent: &AgentSnapshot) -> Self {
        Self {
            handle: agent.handle,
            position: agent.position,
            kinetics: agent.kinetics,
            vitals: agent.vitals,
            behavior: agent.behavior,
            commands: Vec::new(),
            death: None,
            cue_changed: false,
        }
    }

    fn finish(mut self, previous: AnimationCue) -> Self {
        self.cue_changed = self.behavior.cue != previous;
        self
    }

    fn hold(mut self, previous: AnimationCue) -> Self {
        self.behavior.cue = AnimationCue::Idle;
        self.finish(previous)
    }

    fn moved(mut self, moved: bool, previous: AnimationCue) -> Self {
        self.behavior.cue = if moved {
            let (dx, dy) = self.kinetics.movement_dir;
            AnimationCue::from_direction(dx, dy)
        } else {
            AnimationCue::Idle
        };
        self.finish(previous)
    }
}

/// Runs one tick of the state machine for `ctx.index.agents()[me]`.
pub fn decide<R: Rng>(me: usize, ctx: &DecideContext<'_>, rng: &mut R) -> AgentDecision {
    let agent = &ctx.index.agents()[me];
    let profile = ctx.config.profile(agent.kind);
    let previous_cue = agent.behavior.cue;
    let mut d = AgentDecision::from_snapshot(agent);

    vitals::apply_drains(&mut d.vitals, profile, ctx.dt);
    if let Some(cause) = vitals::death_cause(&d.vitals) {
        d.behavior.state = BehaviorState::Dead;
        d.behavior.target = None;
        d.death = Some(cause);
        return d.hold(previous_cue);
    }

    if let ReproductionMode::Fission { age, .. } = profile.reproduction {
        if d.vitals.age >= age {
            d.commands.push(InteractionCommand::Fission {
                parent: agent.handle,
            });
            d.behavior.state = BehaviorState::Dead;
            d.behavior.target = None;
            d.death = Some(DeathCause::Fission);
            return d.hold(previous_cue);
        }
    }

    if let Some(rule) = &profile.settlement {
        if !agent.settled && d.vitals.age >= rule.min_age && d.vitals.hunger > rule.min_hunger {
            d.commands.push(InteractionCommand::FoundSettlement {
                founder: agent.handle,
            });
        }
    }

    match d.behavior.state {
        BehaviorState::Paused { until } if ctx.now < until => {
            return d.hold(previous_cue);
        }
        BehaviorState::Knockback {
            from,
            to,
            started,
            duration,
        } => {
            let (pos, done) = steering::knockback_position(from, to, started, duration, ctx.now);
            d.position = pos;
            if !done {
                return d.hold(previous_cue);
            }
            d.behavior.state = BehaviorState::Idle;
        }
        BehaviorState::Separating { until } if ctx.now < until => {
            let step = steering::step_length(
                d.position,
                agent.genes.move_speed,
                profile,
                ctx.terrain,
                ctx.dt,
            );
            let dir = d.kinetics.movement_dir;
            let moved = steering::commit_move(
                &mut d.position,
                &mut d.kinetics,
                dir,
                step,
                ctx.terrain,
                rng,
            );
            return d.moved(moved, previous_cue);
        }
        BehaviorState::Paused { .. } | BehaviorState::Separating { .. } => {
            d.behavior.state = BehaviorState::Idle;
        }
        _ => {}
    }

    if profile.pause_chance > 0.0 && rng.gen_bool(profile.pause_chance) {
        let (lo, hi) = profile.pause_duration;
        let length = if lo < hi { rng.gen_range(lo..=hi) } else { lo };
        d.behavior.state = BehaviorState::Paused {
            until: ctx.now + length,
        };
        d.behavior.target = None;
        return d.hold(previous_cue);
    }

    match find_target(me, agent, &d.vitals, profile, ctx) {
        Some((target, handle)) => {
            pursue(agent, d, target, handle, profile, ctx, rng, previous_cue)
        }
        None => {
            d.behavior.state = BehaviorState::Wandering;
            d.behavior.target = None;
            let moved = steering::wander(
                &mut d.position,
                &mut d.kinetics,
                agent.genes.move_speed,
                profile,
                ctx.terrain,
                ctx.now,
                ctx.dt,
                rng,
            );
            d.moved(moved, previous_cue)
        }
    }
}

/// Food when hungry; otherwise a mate, then prey for predators.
fn find_target(
    me: usize,
    agent: &AgentSnapshot,
    vitals: &Vitals,
    profile: &AgentProfile,
    ctx: &DecideContext<'_>,
) -> Option<(Target, Entity)> {
    let index = ctx.index;
    let vision = agent.genes.vision_range;
    let from = agent.position;

    if vitals.hunger <= profile.food_seek_threshold() {
        let found = index.find_nearest(EntityCategory::Food, from, vision, &mut |_| true)?;
        let food = &index.food()[found.index];
        return Some((
            Target::Food {
                id: food.id,
                x: food.position.x,
                y: food.position.y,
            },
            found.handle,
        ));
    }

    let can_mate = matches!(profile.reproduction, ReproductionMode::Sexual)
        && reproduction::is_eligible(vitals, &agent.fertility, profile, ctx.now);
    if can_mate {
        let threshold = profile.food_seek_threshold();
        let mate = index.find_nearest(
            EntityCategory::Agent(agent.kind),
            from,
            vision,
            &mut |i| {
                let other = &index.agents()[i];
                i != me
                    && other.behavior.state != BehaviorState::Dead
                    && other.vitals.hunger > threshold
                    && reproduction::is_eligible(&other.vitals, &other.fertility, profile, ctx.now)
            },
        );
        if let Some(found) = mate {
            let other = &index.agents()[found.index];
            return Some((
                Target::Mate {
                    id: other.id,
                    x: other.position.x,
                    y: other.position.y,
                },
                found.handle,
            ));
        }
    }

    if let Role::Predator { prey, .. } = profile.role {
        let found = index.find_nearest(EntityCategory::Agent(prey), from, vision, &mut |i| {
            let other = &index.agents()[i];
            i != me && !other.vitals.is_dead() && other.behavior.state != BehaviorState::Dead
        })?;
        let other = &index.agents()[found.index];
        return Some((
            Target::Prey {
                id: other.id,
                x: other.position.x,
                y: other.position.y,
            },
            found.handle,
        ));
    }
    None
}

#[allow(clippy::too_many_arguments)]
fn pursue<R: Rng>(
    agent: &AgentSnapshot,
    mut d: AgentDecision,
    target: Target,
    target_handle: Entity,
    profile: &AgentProfile,
    ctx: &DecideContext<'_>,
    rng: &mut R,
    previous_cue: AnimationCue,
) -> AgentDecision {
    d.behavior.target = Some(target);
    d.behavior.state = match target {
        Target::Food { .. } => BehaviorState::SeekingFood,
        Target::Mate { .. } => BehaviorState::SeekingMate,
        Target::Prey { .. } => BehaviorState::SeekingPrey,
    };

    let goal = target.position();
    if d.position.distance(&goal) > ctx.config.world.interaction_radius {
        let moved = steering::seek(
            &mut d.position,
            &mut d.kinetics,
            goal,
            agent.genes.move_speed,
            profile,
            ctx.terrain,
            ctx.dt,
            rng,
        );
        return d.moved(moved, previous_cue);
    }

    let now = ctx.now;
    match target {
        Target::Food { .. } => {
            let rested = d
                .behavior
                .last_eat_time
                .map_or(true, |t| now - t >= profile.eat_cooldown);
            if rested {
                d.commands.push(InteractionCommand::Eat {
                    eater: agent.handle,
                    food: target_handle,
                });
            }
        }
        Target::Mate { .. } => {
            d.commands.push(InteractionCommand::Reproduce {
                a: agent.handle,
                b: target_handle,
            });
        }
        Target::Prey { .. } => {
            if let Role::Predator {
                attack_cooldown, ..
            } = profile.role
            {
                let rested = d
                    .behavior
                    .last_attack_time
                    .map_or(true, |t| now - t >= attack_cooldown);
                if rested {
                    d.commands.push(InteractionCommand::Attack {
                        attacker: agent.handle,
                        prey: target_handle,
                    });
                }
            }
        }
    }
    d.hold(previous_cue)
}
