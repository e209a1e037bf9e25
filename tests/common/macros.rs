/// Asserts that the agent behind a handle is no longer in the world.
#[macro_export]
macro_rules! assert_agent_dead {
    ($world:expr, $handle:expr) => {
        assert!(
            !$world.registry.contains($handle),
            "Agent {:?} should be dead but is still registered",
            $handle
        );
        assert!(
            $world.ecs.get::<&worldsim_data::Identity>($handle).is_err(),
            "Agent {:?} should be dead but still has components",
            $handle
        );
    };
}

/// Asserts that the total agent count matches the expected value.
#[macro_export]
macro_rules! assert_population {
    ($world:expr, $count:expr) => {
        assert_eq!($world.agent_count(), $count, "Population count mismatch");
    };
    ($world:expr, $kind:expr, $count:expr) => {
        assert_eq!(
            $world.count_of($kind),
            $count,
            "Population count mismatch for {:?}",
            $kind
        );
    };
}

/// Asserts that every live agent has hunger and hp inside their bounds.
#[macro_export]
macro_rules! assert_vitals_in_bounds {
    ($world:expr) => {
        for handle in $world.agent_handles() {
            let v = $world
                .component::<worldsim_data::Vitals>(handle)
                .expect("Agent without vitals");
            assert!(
                (0.0..=v.max_hunger).contains(&v.hunger),
                "hunger {} outside [0, {}]",
                v.hunger,
                v.max_hunger
            );
            assert!(
                (0.0..=v.max_hp).contains(&v.hp),
                "hp {} outside [0, {}]",
                v.hp,
                v.max_hp
            );
        }
    };
}
