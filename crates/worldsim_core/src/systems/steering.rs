//! Movement: wandering, seeking, knockback and walkability enforcement.

use crate::config::AgentProfile;
use crate::lifecycle::random_direction;
use crate::terrain::TerrainMap;
use rand::seq::SliceRandom;
use rand::Rng;
use std::f64::consts::FRAC_1_SQRT_2;
use worldsim_data::{CellCoord, Kinetics, Position};

/// N, NE, E, SE, S, SW, W, NW as unit vectors (+y is north).
pub const COMPASS: [(f64, f64); 8] = [
    (0.0, 1.0),
    (FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    (1.0, 0.0),
    (FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    (0.0, -1.0),
    (-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    (-1.0, 0.0),
    (-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
];

/// Unit vector along `(dx, dy)`, or `None` for a zero vector.
#[must_use]
pub fn normalize(dx: f64, dy: f64) -> Option<(f64, f64)> {
    let len = (dx * dx + dy * dy).sqrt();
    if len > f64::EPSILON && len.is_finite() {
        Some((dx / len, dy / len))
    } else {
        None
    }
}

/// Distance an agent may cover this tick on its current tile.
#[must_use]
pub fn step_length(
    position: Position,
    move_speed: f64,
    profile: &AgentProfile,
    terrain: &TerrainMap,
    dt: f64,
) -> f64 {
    let cell = CellCoord::from_world(position.x, position.y);
    move_speed * terrain.speed_factor(cell, profile.slow_factor) * dt
}

/// Walkable compass direction closest to `heading`, probing one cell ahead.
///
/// Directions are shuffled before ranking so equally aligned options are
/// picked at random. Falls back to a uniformly random direction.
pub fn alternate_direction<R: Rng>(
    position: Position,
    heading: (f64, f64),
    terrain: &TerrainMap,
    rng: &mut R,
) -> (f64, f64) {
    let mut options = COMPASS;
    options.shuffle(rng);
    options.sort_by(|a, b| {
        let da = a.0 * heading.0 + a.1 * heading.1;
        let db = b.0 * heading.0 + b.1 * heading.1;
        db.total_cmp(&da)
    });
    options
        .into_iter()
        .find(|&(dx, dy)| terrain.is_walkable_at(position.x + dx, position.y + dy))
        .unwrap_or_else(|| random_direction(rng))
}

/// Moves `step` along `dir` unless the destination cell is unwalkable.
///
/// A blocked move turns the agent toward an alternate direction instead and
/// nothing is committed this tick. Returns whether the agent moved.
pub fn commit_move<R: Rng>(
    position: &mut Position,
    kinetics: &mut Kinetics,
    dir: (f64, f64),
    step: f64,
    terrain: &TerrainMap,
    rng: &mut R,
) -> bool {
    if step <= 0.0 {
        return false;
    }
    let nx = position.x + dir.0 * step;
    let ny = position.y + dir.1 * step;
    if terrain.is_walkable_at(nx, ny) {
        position.x = nx;
        position.y = ny;
        true
    } else {
        let alt = alternate_direction(*position, dir, terrain, rng);
        kinetics.movement_dir = alt;
        kinetics.target_dir = alt;
        false
    }
}

/// One tick of smooth random wandering. Returns whether the agent moved.
#[allow(clippy::too_many_arguments)]
pub fn wander<R: Rng>(
    position: &mut Position,
    kinetics: &mut Kinetics,
    move_speed: f64,
    profile: &AgentProfile,
    terrain: &TerrainMap,
    now: f64,
    dt: f64,
    rng: &mut R,
) -> bool {
    if now >= kinetics.next_direction_change {
        kinetics.target_dir = random_direction(rng);
        kinetics.next_direction_change = now + profile.change_direction_interval;
    }

    let t = (profile.direction_smoothness * dt).clamp(0.0, 1.0);
    let (mx, my) = kinetics.movement_dir;
    let (tx, ty) = kinetics.target_dir;
    kinetics.movement_dir =
        normalize(mx + (tx - mx) * t, my + (ty - my) * t).unwrap_or(kinetics.target_dir);

    let (dx, dy) = kinetics.movement_dir;
    let reach = profile.edge_avoidance_range;
    if !terrain.is_walkable_at(position.x + dx * reach, position.y + dy * reach) {
        let fresh = clear_direction(*position, reach, terrain, rng)
            .unwrap_or_else(|| alternate_direction(*position, kinetics.movement_dir, terrain, rng));
        kinetics.movement_dir = fresh;
        kinetics.target_dir = fresh;
        kinetics.next_direction_change = now + profile.change_direction_interval;
    }

    let step = step_length(*position, move_speed, profile, terrain, dt);
    let dir = kinetics.movement_dir;
    commit_move(position, kinetics, dir, step, terrain, rng)
}

fn clear_direction<R: Rng>(
    position: Position,
    reach: f64,
    terrain: &TerrainMap,
    rng: &mut R,
) -> Option<(f64, f64)> {
    (0..8).map(|_| random_direction(rng)).find(|&(dx, dy)| {
        terrain.is_walkable_at(position.x + dx * reach, position.y + dy * reach)
    })
}

/// Steps straight toward `target` without overshooting it.
#[allow(clippy::too_many_arguments)]
pub fn seek<R: Rng>(
    position: &mut Position,
    kinetics: &mut Kinetics,
    target: Position,
    move_speed: f64,
    profile: &AgentProfile,
    terrain: &TerrainMap,
    dt: f64,
    rng: &mut R,
) -> bool {
    let distance = position.distance(&target);
    let Some(dir) = normalize(target.x - position.x, target.y - position.y) else {
        return false;
    };
    kinetics.movement_dir = dir;
    kinetics.target_dir = dir;
    let step = step_length(*position, move_speed, profile, terrain, dt).min(distance);
    commit_move(position, kinetics, dir, step, terrain, rng)
}

/// Interpolated knockback position and whether the push has finished.
#[must_use]
pub fn knockback_position(
    from: Position,
    to: Position,
    started: f64,
    duration: f64,
    now: f64,
) -> (Position, bool) {
    let fraction = if duration > 0.0 {
        ((now - started) / duration).clamp(0.0, 1.0)
    } else {
        1.0
    };
    if fraction >= 1.0 {
        return (to, true);
    }
    let pos = Position::new(
        from.x + (to.x - from.x) * fraction,
        from.y + (to.y - from.y) * fraction,
    );
    (pos, false)
}

/// Where a hit pushes the prey: `distance` away from the attacker, kept on
/// the map. Halves the push if the full one lands on an unwalkable cell and
/// stays put if that is blocked too.
#[must_use]
pub fn knockback_target(
    prey: Position,
    attacker: Position,
    distance: f64,
    terrain: &TerrainMap,
) -> Position {
    let (dx, dy) = normalize(prey.x - attacker.x, prey.y - attacker.y).unwrap_or((1.0, 0.0));
    let max_x = f64::from(terrain.width) - 1e-6;
    let max_y = f64::from(terrain.height) - 1e-6;
    for reach in [distance, distance / 2.0] {
        let to = Position::new(
            (prey.x + dx * reach).clamp(0.0, max_x),
            (prey.y + dy * reach).clamp(0.0, max_y),
        );
        if terrain.is_walkable_at(to.x, to.y) {
            return to;
        }
    }
    prey
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WalkabilityConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use worldsim_data::BiomeType;

    fn grass(w: u16, h: u16) -> TerrainMap {
        TerrainMap::filled(w, h, BiomeType::Grass, WalkabilityConfig::default()).unwrap()
    }

    #[test]
    fn test_commit_move_blocked_by_water() {
        let mut map = grass(10, 10);
        for y in 0..10 {
            map.set_biome(CellCoord::new(6, y), BiomeType::WaterDeep);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut pos = Position::new(5.5, 5.5);
        let mut kin = Kinetics::default();

        assert!(!commit_move(&mut pos, &mut kin, (1.0, 0.0), 1.0, &map, &mut rng));
        assert_eq!(pos, Position::new(5.5, 5.5));
        let (dx, dy) = kin.movement_dir;
        assert!(map.is_walkable_at(pos.x + dx, pos.y + dy));
        assert!(dx <= FRAC_1_SQRT_2 + 1e-9);
    }

    #[test]
    fn test_alternate_prefers_heading() {
        let mut map = grass(10, 10);
        map.set_biome(CellCoord::new(5, 6), BiomeType::WaterDeep);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let dir = alternate_direction(Position::new(5.5, 5.5), (0.0, 1.0), &map, &mut rng);
        assert!(dir.1 > 0.5, "expected a northerly diagonal, got {dir:?}");
    }

    #[test]
    fn test_map_edge_is_unwalkable() {
        let map = grass(4, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut pos = Position::new(3.9, 2.0);
        let mut kin = Kinetics::default();
        assert!(!commit_move(&mut pos, &mut kin, (1.0, 0.0), 0.5, &map, &mut rng));
        assert_eq!(pos.x, 3.9);
    }

    #[test]
    fn test_slow_tile_halves_step() {
        let map = TerrainMap::filled(10, 10, BiomeType::ForestGrass, WalkabilityConfig::default())
            .unwrap();
        let profile = AgentProfile::human();
        let step = step_length(Position::new(2.0, 2.0), 2.0, &profile, &map, 1.0);
        assert_eq!(step, 1.0);
    }

    #[test]
    fn test_seek_does_not_overshoot() {
        let map = grass(10, 10);
        let profile = AgentProfile::human();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut pos = Position::new(2.0, 2.0);
        let mut kin = Kinetics::default();
        let target = Position::new(2.5, 2.0);
        assert!(seek(&mut pos, &mut kin, target, 2.0, &profile, &map, 1.0, &mut rng));
        assert!((pos.x - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_wander_turns_smoothly() {
        let map = grass(50, 50);
        let profile = AgentProfile::human();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut pos = Position::new(25.0, 25.0);
        let mut kin = Kinetics {
            movement_dir: (1.0, 0.0),
            target_dir: (-1.0, 0.0),
            next_direction_change: 100.0,
        };
        wander(&mut pos, &mut kin, 2.0, &profile, &map, 0.0, 0.05, &mut rng);
        assert!((kin.movement_dir.0 - 1.0).abs() < 1e-12);
        assert!(pos.x > 25.0);
    }

    #[test]
    fn test_knockback_interpolates_then_snaps() {
        let from = Position::new(0.0, 0.0);
        let to = Position::new(2.0, 0.0);
        let (mid, done) = knockback_position(from, to, 1.0, 0.5, 1.25);
        assert!(!done);
        assert!((mid.x - 1.0).abs() < 1e-12);
        assert_eq!(knockback_position(from, to, 1.0, 0.5, 2.0), (to, true));
    }

    #[test]
    fn test_knockback_target_respects_terrain() {
        let mut map = grass(10, 10);
        let prey = Position::new(5.5, 5.5);
        let attacker = Position::new(4.5, 5.5);
        assert_eq!(knockback_target(prey, attacker, 2.0, &map), Position::new(7.5, 5.5));

        map.set_biome(CellCoord::new(7, 5), BiomeType::WaterDeep);
        assert_eq!(knockback_target(prey, attacker, 2.0, &map), Position::new(6.5, 5.5));

        map.set_biome(CellCoord::new(6, 5), BiomeType::WaterDeep);
        assert_eq!(knockback_target(prey, attacker, 2.0, &map), prey);
    }
}
