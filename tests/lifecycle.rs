mod common;

use common::{AgentBuilder, WorldBuilder};
use worldsim_data::{
    AgentKind, AnimationCue, Behavior, BehaviorState, DeathCause, Position, SimEvent, Vitals,
};
use worldsim_lib::model::config::Role;

fn death_causes(events: &[SimEvent]) -> Vec<DeathCause> {
    events
        .iter()
        .filter_map(|e| match e {
            SimEvent::Death { cause, .. } => Some(*cause),
            _ => None,
        })
        .collect()
}

#[test]
fn test_starving_agent_loses_hp_at_hunger_rate() {
    let (mut world, handles) = WorldBuilder::new()
        .with_agent(AgentBuilder::human().at(15.0, 15.0).hunger(0.0))
        .build();
    let human = handles[0];

    for _ in 0..10 {
        world.update(1.0).expect("update");
    }
    let vitals = world.component::<Vitals>(human).expect("alive");
    assert_eq!(vitals.hunger, 0.0);
    assert_eq!(vitals.hp, 90.0);

    for _ in 0..89 {
        let events = world.update(1.0).expect("update");
        assert!(death_causes(&events).is_empty());
    }
    assert_eq!(world.component::<Vitals>(human).map(|v| v.hp), Some(1.0));

    let events = world.update(1.0).expect("update");
    assert_eq!(death_causes(&events), vec![DeathCause::Starvation]);
    assert_agent_dead!(world, human);
    assert_population!(world, 0);
}

#[test]
fn test_zero_hp_agent_removed_in_same_tick() {
    let (mut world, handles) = WorldBuilder::new()
        .with_agent(AgentBuilder::slime().hp(0.0))
        .with_agent(AgentBuilder::slime().at(20.0, 20.0))
        .build();

    let events = world.update(0.1).expect("update");
    assert_eq!(death_causes(&events), vec![DeathCause::Starvation]);
    assert_agent_dead!(world, handles[0]);
    assert_population!(world, AgentKind::Slime, 1);
}

#[test]
fn test_old_age_death() {
    let (mut world, handles) = WorldBuilder::new()
        .with_agent(AgentBuilder::human().age(99.99).max_age(100.0))
        .build();

    let events = world.update(1.0).expect("update");
    assert_eq!(death_causes(&events), vec![DeathCause::OldAge]);
    assert_agent_dead!(world, handles[0]);
    assert_eq!(world.metrics.counter("deaths.oldage"), 1);
}

#[test]
fn test_agents_age_with_simulated_time() {
    let (mut world, handles) = WorldBuilder::new()
        .with_agent(AgentBuilder::human())
        .build();

    for _ in 0..60 {
        world.update(1.0).expect("update");
    }
    let vitals = world.component::<Vitals>(handles[0]).expect("alive");
    assert!((vitals.age - 1.0).abs() < 1e-9, "age {}", vitals.age);
}

#[test]
fn test_lethal_attack_removes_prey_same_tick() {
    let (mut world, handles) = WorldBuilder::new()
        .with_config(|c| {
            c.human.role = Role::Predator {
                prey: AgentKind::Slime,
                damage: 500.0,
                attack_cooldown: 1.0,
            };
        })
        .with_agent(AgentBuilder::human().at(10.0, 10.0))
        .with_agent(AgentBuilder::slime().at(10.3, 10.0))
        .build();

    let events = world.update(0.1).expect("update");
    assert_eq!(death_causes(&events), vec![DeathCause::Combat]);
    assert_agent_dead!(world, handles[1]);
    assert_population!(world, AgentKind::Human, 1);
}

#[test]
fn test_vitals_stay_bounded_in_busy_world() {
    let (mut world, _) = WorldBuilder::new()
        .with_size(40, 40)
        .with_config(|c| {
            c.world.initial_humans = 15;
            c.world.initial_slimes = 10;
            c.food.initial_food = 20;
            c.food.spawn_per_interval = 5;
            c.human.pause_chance = 0.01;
        })
        .build();

    for _ in 0..300 {
        world.update(0.2).expect("update");
        assert_vitals_in_bounds!(world);
    }
}

#[test]
fn test_zero_time_scale_freezes_agents() {
    let (mut world, handles) = WorldBuilder::new()
        .with_agent(AgentBuilder::human().hunger(50.0))
        .build();
    world.set_time_scale(0.0);

    let before = world.component::<Vitals>(handles[0]).expect("alive");
    for _ in 0..10 {
        world.update(1.0).expect("update");
    }
    assert_eq!(world.component::<Vitals>(handles[0]), Some(before));
    assert_eq!(world.clock, 0.0);
    assert_eq!(world.tick, 10);
}

#[test]
fn test_time_scale_is_clamped() {
    let (mut world, _) = WorldBuilder::new().build();
    world.set_time_scale(25.0);
    assert_eq!(world.time_scale(), 10.0);
    world.set_time_scale(-3.0);
    assert_eq!(world.time_scale(), 0.0);
    world.set_time_scale(f64::NAN);
    assert_eq!(world.time_scale(), 1.0);
}

#[test]
fn test_non_finite_frame_is_rejected() {
    let (mut world, _) = WorldBuilder::new().build();
    assert!(world.update(f64::INFINITY).is_err());
}

#[test]
fn test_certain_pause_holds_agent_in_place() {
    let (mut world, handles) = WorldBuilder::new()
        .with_config(|c| {
            c.human.pause_chance = 1.0;
            c.human.pause_duration = (0.5, 3.0);
        })
        .with_agent(AgentBuilder::human().at(15.0, 15.0).hunger(90.0))
        .build();
    let start = world.component::<Position>(handles[0]).expect("alive");

    world.update(0.1).expect("update");
    let behavior = world.component::<Behavior>(handles[0]).expect("alive");
    let BehaviorState::Paused { until } = behavior.state else {
        panic!("expected pause, got {:?}", behavior.state);
    };
    let length = until - world.clock;
    assert!((0.5..=3.0).contains(&length), "pause length {length}");
    assert_eq!(behavior.cue, AnimationCue::Idle);

    for _ in 0..20 {
        world.update(0.1).expect("update");
        assert_eq!(world.component::<Position>(handles[0]), Some(start));
    }
}
