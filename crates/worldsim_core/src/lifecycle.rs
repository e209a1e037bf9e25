//! Agent construction: names, fresh agents and offspring.

use crate::config::{AgentProfile, LevelingConfig};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;
use worldsim_data::{
    AgentKind, Allegiance, Behavior, Fertility, Genes, Identity, Kinetics, Position, Progression,
    Vitals,
};

const FIRST_NAMES: [&str; 10] = [
    "Arin", "Borin", "Celdor", "Durnan", "Elandor", "Faelan", "Gorim", "Haldir", "Ithil", "Jareth",
];

const LAST_NAMES: [&str; 10] = [
    "Stormwind",
    "Ironfist",
    "Moonshadow",
    "Duskbringer",
    "Starlight",
    "Thunderstrike",
    "Silverleaf",
    "Shadowbane",
    "Brightstar",
    "Nightwhisper",
];

const SLIME_PREFIXES: [&str; 40] = [
    "Goopy", "Blob", "Gel", "Slippy", "Squish", "Gloop", "Sludge", "Mucus", "Ooze", "Slimer",
    "Drip", "Glop", "Goo", "Splurt", "Dribble", "Sloshy", "Snail", "Viscous", "Sappy", "Glum",
    "Slick", "Slosher", "Mushy", "Slurry", "Slobber", "Gummy", "Slob", "Squidge", "Glaze",
    "Muddle", "Wobble", "Flubber", "Squeegee", "Blubber", "Plop", "Squirtle", "Blobfish", "Jiggly",
    "Booger", "Wiggly",
];

const SLIME_SUFFIXES: [&str; 40] = [
    "ster", "ball", "oooze", "drop", "mash", "blob", "drip", "glob", "muck", "slosh", "smooze",
    "puddle", "drizzle", "slick", "splash", "gum", "squirt", "trail", "slime", "slip", "jelly",
    "melt", "squash", "gush", "trickle", "leak", "wet", "sog", "brew", "goo", "zilla", "pants",
    "meister", "puff", "whiz", "giggle", "blobber", "snicker", "snort", "splatter",
];

const SETTLEMENT_NAMES: [&str; 10] = [
    "New Haven",
    "Eldoria",
    "Rivermouth",
    "Brightvale",
    "Silverwood",
    "Stormwatch",
    "Ironhold",
    "Suncrest",
    "Duskwood",
    "Frosthaven",
];

fn pick<'a, R: Rng>(list: &[&'a str], rng: &mut R) -> &'a str {
    list.choose(rng).copied().unwrap_or("Nameless")
}

pub fn generate_name<R: Rng>(kind: AgentKind, rng: &mut R) -> String {
    match kind {
        AgentKind::Human => format!("{} {}", pick(&FIRST_NAMES, rng), pick(&LAST_NAMES, rng)),
        AgentKind::Slime => format!(
            "{} {}",
            pick(&SLIME_PREFIXES, rng),
            pick(&SLIME_SUFFIXES, rng)
        ),
    }
}

pub fn settlement_name<R: Rng>(rng: &mut R) -> String {
    pick(&SETTLEMENT_NAMES, rng).to_string()
}

/// Uniform random unit vector.
pub fn random_direction<R: Rng>(rng: &mut R) -> (f64, f64) {
    let angle = rng.gen_range(0.0..std::f64::consts::TAU);
    (angle.cos(), angle.sin())
}

/// Every component of one agent, ready to spawn.
#[derive(Debug, Clone)]
pub struct AgentBundle {
    pub identity: Identity,
    pub position: Position,
    pub kinetics: Kinetics,
    pub vitals: Vitals,
    pub fertility: Fertility,
    pub genes: Genes,
    pub behavior: Behavior,
    pub progression: Progression,
    pub allegiance: Allegiance,
}

impl AgentBundle {
    #[allow(clippy::type_complexity)]
    pub fn into_components(
        self,
    ) -> (
        Identity,
        Position,
        Kinetics,
        Vitals,
        Fertility,
        Genes,
        Behavior,
        Progression,
        Allegiance,
    ) {
        (
            self.identity,
            self.position,
            self.kinetics,
            self.vitals,
            self.fertility,
            self.genes,
            self.behavior,
            self.progression,
            self.allegiance,
        )
    }
}

/// Newborn agent at full hunger and health with the profile's base traits.
pub fn create_agent_with_rng<R: Rng>(
    kind: AgentKind,
    x: f64,
    y: f64,
    profile: &AgentProfile,
    leveling: &LevelingConfig,
    rng: &mut R,
) -> AgentBundle {
    let genes = Genes {
        move_speed: profile.move_speed,
        vision_range: profile.vision_range,
    };
    spawn_bundle(kind, x, y, genes, profile.max_age, None, 0, profile, leveling, rng)
}

/// Offspring of `parents` with already-inherited traits.
#[allow(clippy::too_many_arguments)]
pub fn create_child_with_rng<R: Rng>(
    kind: AgentKind,
    x: f64,
    y: f64,
    genes: Genes,
    max_age: f64,
    parents: (Uuid, Uuid),
    generation: u32,
    profile: &AgentProfile,
    leveling: &LevelingConfig,
    rng: &mut R,
) -> AgentBundle {
    spawn_bundle(
        kind,
        x,
        y,
        genes,
        max_age,
        Some(parents),
        generation,
        profile,
        leveling,
        rng,
    )
}

#[allow(clippy::too_many_arguments)]
fn spawn_bundle<R: Rng>(
    kind: AgentKind,
    x: f64,
    y: f64,
    genes: Genes,
    max_age: f64,
    parents: Option<(Uuid, Uuid)>,
    generation: u32,
    profile: &AgentProfile,
    leveling: &LevelingConfig,
    rng: &mut R,
) -> AgentBundle {
    let id = Uuid::from_u128(rng.gen::<u128>());
    let name = generate_name(kind, rng);
    let heading = random_direction(rng);
    AgentBundle {
        identity: Identity {
            id,
            name,
            kind,
            parents,
            generation,
        },
        position: Position { x, y },
        kinetics: Kinetics {
            movement_dir: heading,
            target_dir: heading,
            next_direction_change: 0.0,
        },
        vitals: Vitals {
            hunger: profile.max_hunger,
            max_hunger: profile.max_hunger,
            hp: profile.max_hp,
            max_hp: profile.max_hp,
            age: 0.0,
            max_age,
        },
        fertility: Fertility::default(),
        genes,
        behavior: Behavior::default(),
        progression: Progression {
            level: 1,
            xp: 0,
            xp_to_next: leveling.base_xp_to_level,
        },
        allegiance: Allegiance::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_human_name_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let name = generate_name(AgentKind::Human, &mut rng);
        let mut parts = name.split(' ');
        assert!(FIRST_NAMES.contains(&parts.next().unwrap()));
        assert!(LAST_NAMES.contains(&parts.next().unwrap()));
    }

    #[test]
    fn test_slime_name_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let name = generate_name(AgentKind::Slime, &mut rng);
        let (prefix, suffix) = name.split_once(' ').unwrap();
        assert!(SLIME_PREFIXES.contains(&prefix));
        assert!(SLIME_SUFFIXES.contains(&suffix));
    }

    #[test]
    fn test_new_agent_starts_full() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let profile = AgentProfile::slime();
        let agent = create_agent_with_rng(
            AgentKind::Slime,
            4.0,
            5.0,
            &profile,
            &LevelingConfig::default(),
            &mut rng,
        );
        assert_eq!(agent.vitals.hunger, 80.0);
        assert_eq!(agent.vitals.hp, 80.0);
        assert_eq!(agent.vitals.age, 0.0);
        assert_eq!(agent.genes.move_speed, 1.5);
        assert_eq!(agent.progression.level, 1);
        let (dx, dy) = agent.kinetics.movement_dir;
        assert!(((dx * dx + dy * dy).sqrt() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_agent() {
        let profile = AgentProfile::human();
        let leveling = LevelingConfig::default();
        let a = create_agent_with_rng(
            AgentKind::Human,
            1.0,
            1.0,
            &profile,
            &leveling,
            &mut ChaCha8Rng::seed_from_u64(99),
        );
        let b = create_agent_with_rng(
            AgentKind::Human,
            1.0,
            1.0,
            &profile,
            &leveling,
            &mut ChaCha8Rng::seed_from_u64(99),
        );
        assert_eq!(a.identity, b.identity);
    }
}
