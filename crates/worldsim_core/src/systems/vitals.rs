use crate::config::AgentProfile;
use worldsim_data::{DeathCause, Vitals};

/// Passive hunger, starvation and ageing for `dt` seconds.
///
/// Hunger is clamped to `[0, max_hunger]`; once it sits at zero, hp drains at
/// the hunger rate and is clamped at zero.
pub fn apply_drains(vitals: &mut Vitals, profile: &AgentProfile, dt: f64) {
    let rate = profile.hunger_decrease_rate;
    vitals.hunger = (vitals.hunger - rate * dt).clamp(0.0, vitals.max_hunger);
    if vitals.hunger <= 0.0 {
        vitals.hp = (vitals.hp - rate * dt).clamp(0.0, vitals.max_hp);
    }
    vitals.age += profile.age_increment_rate * dt;

    debug_assert!(vitals.hunger >= 0.0 && vitals.hunger <= vitals.max_hunger);
    debug_assert!(vitals.hp >= 0.0 && vitals.hp <= vitals.max_hp);
}

/// Why these vitals mean death, if they do. Zero hp wins over old age.
#[must_use]
pub fn death_cause(vitals: &Vitals) -> Option<DeathCause> {
    if vitals.hp <= 0.0 {
        Some(DeathCause::Starvation)
    } else if vitals.age >= vitals.max_age {
        Some(DeathCause::OldAge)
    } else {
        None
    }
}

/// Restores hunger from a meal, clamped to the maximum.
pub fn feed(vitals: &mut Vitals, amount: f64) {
    vitals.hunger = (vitals.hunger + amount).clamp(0.0, vitals.max_hunger);
}

/// Applies damage, clamped at zero. Returns `true` if the hit was lethal.
pub fn take_damage(vitals: &mut Vitals, damage: f64) -> bool {
    vitals.hp = (vitals.hp - damage.max(0.0)).clamp(0.0, vitals.max_hp);
    vitals.hp <= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vitals(hunger: f64, hp: f64) -> Vitals {
        Vitals {
            hunger,
            max_hunger: 100.0,
            hp,
            max_hp: 100.0,
            age: 20.0,
            max_age: 100.0,
        }
    }

    #[test]
    fn test_hunger_drains_before_hp() {
        let profile = AgentProfile::human();
        let mut v = vitals(50.0, 100.0);
        apply_drains(&mut v, &profile, 1.0);
        assert_eq!(v.hunger, 49.0);
        assert_eq!(v.hp, 100.0);
        assert!((v.age - (20.0 + 1.0 / 60.0)).abs() < 1e-12);
    }

    #[test]
    fn test_starving_drains_hp_and_clamps() {
        let profile = AgentProfile::human();
        let mut v = vitals(0.0, 3.0);
        apply_drains(&mut v, &profile, 2.0);
        assert_eq!(v.hp, 1.0);
        apply_drains(&mut v, &profile, 2.0);
        assert_eq!(v.hp, 0.0);
        assert_eq!(v.hunger, 0.0);
        assert_eq!(death_cause(&v), Some(DeathCause::Starvation));
    }

    #[test]
    fn test_old_age_independent_of_hp() {
        let mut v = vitals(80.0, 100.0);
        v.age = 100.0;
        assert_eq!(death_cause(&v), Some(DeathCause::OldAge));
    }

    #[test]
    fn test_feed_and_damage_clamp() {
        let mut v = vitals(90.0, 10.0);
        feed(&mut v, 25.0);
        assert_eq!(v.hunger, 100.0);
        assert!(!take_damage(&mut v, 4.0));
        assert!(take_damage(&mut v, 40.0));
        assert_eq!(v.hp, 0.0);
    }
}
