//! Mating eligibility and trait inheritance.

use crate::config::AgentProfile;
use rand::Rng;
use worldsim_data::{Fertility, Genes, Vitals};

/// Age band, child cap and cooldown all satisfied at time `now`.
#[must_use]
pub fn is_eligible(vitals: &Vitals, fertility: &Fertility, profile: &AgentProfile, now: f64) -> bool {
    let in_band = vitals.age >= profile.min_reproductive_age
        && vitals.age <= profile.max_reproductive_age;
    let under_cap = fertility.children < profile.max_children;
    let rested = fertility
        .last_child_time
        .map_or(true, |t| now - t >= profile.child_cooldown);
    in_band && under_cap && rested && !vitals.is_dead()
}

/// Inclusive band `avg * (1 -+ fraction)` around the parents' average.
#[must_use]
pub fn trait_band(a: f64, b: f64, fraction: f64) -> (f64, f64) {
    let avg = (a + b) / 2.0;
    let lo = avg * (1.0 - fraction);
    let hi = avg * (1.0 + fraction);
    (lo.min(hi), lo.max(hi))
}

/// Uniform draw from the trait band, rounded to one decimal and kept in band.
///
/// A band too narrow to hold any one-decimal value yields the unrounded draw.
pub fn blend_trait<R: Rng>(a: f64, b: f64, fraction: f64, rng: &mut R) -> f64 {
    let (lo, hi) = trait_band(a, b, fraction);
    let raw = if lo < hi { rng.gen_range(lo..=hi) } else { lo };
    let step_lo = (lo * 10.0).ceil() / 10.0;
    let step_hi = (hi * 10.0).floor() / 10.0;
    if step_lo > step_hi {
        return raw;
    }
    let rounded = ((raw * 10.0).round() / 10.0).max(step_lo).min(step_hi);
    rounded.max(lo).min(hi)
}

/// Heritable traits of one parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentTraits {
    pub genes: Genes,
    pub max_age: f64,
}

/// Child genes and lifespan blended from two parents.
pub fn inherit<R: Rng>(
    a: &ParentTraits,
    b: &ParentTraits,
    profile: &AgentProfile,
    rng: &mut R,
) -> ParentTraits {
    let vision_range = blend_trait(
        a.genes.vision_range,
        b.genes.vision_range,
        profile.vision_variability,
        rng,
    );
    let move_speed = blend_trait(
        a.genes.move_speed,
        b.genes.move_speed,
        profile.speed_variability,
        rng,
    );
    let max_age = blend_trait(a.max_age, b.max_age, profile.max_age_variability, rng);
    ParentTraits {
        genes: Genes {
            move_speed,
            vision_range,
        },
        max_age,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn adult(age: f64) -> Vitals {
        Vitals {
            hunger: 90.0,
            max_hunger: 100.0,
            hp: 100.0,
            max_hp: 100.0,
            age,
            max_age: 100.0,
        }
    }

    #[test]
    fn test_eligibility_conditions() {
        let profile = AgentProfile::human();
        let fresh = Fertility::default();
        assert!(is_eligible(&adult(20.0), &fresh, &profile, 0.0));
        assert!(!is_eligible(&adult(0.5), &fresh, &profile, 0.0));
        assert!(!is_eligible(&adult(51.0), &fresh, &profile, 0.0));

        let capped = Fertility {
            children: 5,
            last_child_time: None,
        };
        assert!(!is_eligible(&adult(20.0), &capped, &profile, 0.0));

        let recent = Fertility {
            children: 1,
            last_child_time: Some(100.0),
        };
        assert!(!is_eligible(&adult(20.0), &recent, &profile, 109.9));
        assert!(is_eligible(&adult(20.0), &recent, &profile, 110.0));
    }

    #[test]
    fn test_blend_stays_in_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        for _ in 0..500 {
            let v = blend_trait(2.0, 3.0, 0.6, &mut rng);
            assert!((0.999..=4.001).contains(&v), "{v}");
            assert!(((v * 10.0).round() - v * 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_clamped_draw_stays_on_one_decimal() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let (lo, hi) = trait_band(1.0, 1.1, 0.1);
        for _ in 0..500 {
            let v = blend_trait(1.0, 1.1, 0.1, &mut rng);
            assert!(v >= lo && v <= hi, "{v} outside [{lo}, {hi}]");
            assert!(
                (v - 1.0).abs() < 1e-9 || (v - 1.1).abs() < 1e-9,
                "{v} is not one of the one-decimal values in band"
            );
        }
    }

    #[test]
    fn test_band_without_decimal_step_keeps_draw() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let v = blend_trait(1.0, 1.1, 0.0, &mut rng);
        assert!((v - 1.05).abs() < 1e-9, "{v}");
    }

    #[test]
    fn test_zero_variability_is_average() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(blend_trait(4.0, 6.0, 0.0, &mut rng), 5.0);
    }

    #[test]
    fn test_inherit_uses_profile_fractions() {
        let mut rng = ChaCha8Rng::seed_from_u64(33);
        let profile = AgentProfile::human();
        let parent = ParentTraits {
            genes: Genes {
                move_speed: 2.0,
                vision_range: 5.0,
            },
            max_age: 100.0,
        };
        let child = inherit(&parent, &parent, &profile, &mut rng);
        assert!((3.999..=6.001).contains(&child.genes.vision_range));
        assert!((0.799..=3.201).contains(&child.genes.move_speed));
        assert!((79.999..=120.001).contains(&child.max_age));
    }
}
