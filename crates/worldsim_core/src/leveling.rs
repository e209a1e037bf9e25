//! Experience and level-ups.

use crate::config::LevelingConfig;
use worldsim_data::{Genes, Progression, Vitals};

/// Adds `amount` XP and applies every level-up it pays for.
///
/// Each level raises max hp, speed and vision, heals fully and makes the next
/// level cost `xp_step_per_level` more. Returns the number of levels gained.
pub fn gain_xp(
    progression: &mut Progression,
    vitals: &mut Vitals,
    genes: &mut Genes,
    amount: u32,
    config: &LevelingConfig,
) -> u32 {
    progression.xp = progression.xp.saturating_add(amount);
    let mut gained = 0;
    while progression.xp >= progression.xp_to_next.max(1) {
        progression.xp -= progression.xp_to_next.max(1);
        progression.level += 1;
        progression.xp_to_next = progression
            .xp_to_next
            .saturating_add(config.xp_step_per_level);

        vitals.max_hp += config.hp_per_level;
        vitals.hp = vitals.max_hp;
        genes.move_speed += config.speed_per_level;
        genes.vision_range += config.vision_per_level;
        gained += 1;
    }
    gained
}

/// Damage dealt by an attacker of `level`.
#[must_use]
pub fn attack_damage(base: f64, level: u32, config: &LevelingConfig) -> f64 {
    base + f64::from(level.saturating_sub(1)) * config.damage_per_level
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> (Progression, Vitals, Genes) {
        (
            Progression {
                level: 1,
                xp: 0,
                xp_to_next: 10,
            },
            Vitals {
                hunger: 50.0,
                max_hunger: 100.0,
                hp: 40.0,
                max_hp: 100.0,
                age: 10.0,
                max_age: 100.0,
            },
            Genes {
                move_speed: 2.0,
                vision_range: 5.0,
            },
        )
    }

    #[test]
    fn test_level_up_boosts_and_heals() {
        let config = LevelingConfig::default();
        let (mut p, mut v, mut g) = fresh();
        assert_eq!(gain_xp(&mut p, &mut v, &mut g, 5, &config), 0);
        assert_eq!(gain_xp(&mut p, &mut v, &mut g, 5, &config), 1);
        assert_eq!(p.level, 2);
        assert_eq!(p.xp, 0);
        assert_eq!(p.xp_to_next, 15);
        assert_eq!(v.max_hp, 110.0);
        assert_eq!(v.hp, 110.0);
        assert!((g.move_speed - 2.2).abs() < 1e-12);
        assert!((g.vision_range - 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_large_gain_multiple_levels() {
        let config = LevelingConfig::default();
        let (mut p, mut v, mut g) = fresh();
        assert_eq!(gain_xp(&mut p, &mut v, &mut g, 30, &config), 2);
        assert_eq!(p.level, 3);
        assert_eq!(p.xp, 5);
        assert_eq!(p.xp_to_next, 20);
    }

    #[test]
    fn test_attack_damage_scales() {
        let config = LevelingConfig::default();
        assert_eq!(attack_damage(10.0, 1, &config), 10.0);
        assert_eq!(attack_damage(10.0, 3, &config), 20.0);
    }
}
