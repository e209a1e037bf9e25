use crate::config::FoodConfig;
use rand::Rng;
use uuid::Uuid;
use worldsim_data::FoodItem;

/// Periodic food waves, capped by `max_food`.
#[derive(Debug, Clone, Default)]
pub struct FoodSpawner {
    elapsed: f64,
}

impl FoodSpawner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the wave timer and returns how many items to spawn now.
    pub fn tick(&mut self, dt: f64, config: &FoodConfig, current: usize) -> usize {
        self.elapsed += dt.max(0.0);
        let mut waves = 0usize;
        while self.elapsed >= config.spawn_interval {
            self.elapsed -= config.spawn_interval;
            waves += 1;
        }
        let wanted = waves.saturating_mul(config.spawn_per_interval);
        wanted.min(config.max_food.saturating_sub(current))
    }
}

pub fn make_food<R: Rng>(config: &FoodConfig, rng: &mut R) -> FoodItem {
    FoodItem {
        id: Uuid::from_u128(rng.gen::<u128>()),
        food_amount: config.food_amount,
        uses_remaining: config.max_uses,
        max_uses: config.max_uses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_spawns_per_interval() {
        let config = FoodConfig::default();
        let mut spawner = FoodSpawner::new();
        assert_eq!(spawner.tick(4.0, &config, 0), 0);
        assert_eq!(spawner.tick(1.0, &config, 0), 5);
        assert_eq!(spawner.tick(10.0, &config, 0), 10);
    }

    #[test]
    fn test_respects_cap() {
        let config = FoodConfig::default();
        let mut spawner = FoodSpawner::new();
        assert_eq!(spawner.tick(5.0, &config, 148), 2);
        assert_eq!(spawner.tick(5.0, &config, 150), 0);
    }

    #[test]
    fn test_make_food_from_config() {
        let config = FoodConfig {
            max_uses: 5,
            food_amount: 5.0,
            ..Default::default()
        };
        let food = make_food(&config, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(food.uses_remaining, 5);
        assert_eq!(food.food_amount, 5.0);
    }
}
