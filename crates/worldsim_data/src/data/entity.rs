use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which tuning profile an agent runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Human,
    Slime,
}

/// World position of an agent or food item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Unique identification of an agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub kind: AgentKind,
    pub parents: Option<(Uuid, Uuid)>,
    pub generation: u32,
}

/// Heading state. Both directions are unit vectors or zero.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Kinetics {
    pub movement_dir: (f64, f64),
    pub target_dir: (f64, f64),
    /// Simulation time at which the wander direction is resampled.
    pub next_direction_change: f64,
}

/// Hunger, health and age.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub hunger: f64,
    pub max_hunger: f64,
    pub hp: f64,
    pub max_hp: f64,
    pub age: f64,
    pub max_age: f64,
}

impl Vitals {
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0 || self.age >= self.max_age
    }
}

/// Reproduction bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Fertility {
    pub children: u32,
    pub last_child_time: Option<f64>,
}

/// Heritable traits blended on reproduction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genes {
    pub move_speed: f64,
    pub vision_range: f64,
}

/// What an agent is currently pursuing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Target {
    Food { id: Uuid, x: f64, y: f64 },
    Mate { id: Uuid, x: f64, y: f64 },
    Prey { id: Uuid, x: f64, y: f64 },
}

impl Target {
    #[must_use]
    pub fn id(&self) -> Uuid {
        match *self {
            Target::Food { id, .. } | Target::Mate { id, .. } | Target::Prey { id, .. } => id,
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        match *self {
            Target::Food { x, y, .. } | Target::Mate { x, y, .. } | Target::Prey { x, y, .. } => {
                Position { x, y }
            }
        }
    }
}

/// Behaviour state machine. Timed states carry their own deadlines.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub enum BehaviorState {
    #[default]
    Idle,
    Wandering,
    SeekingFood,
    SeekingMate,
    SeekingPrey,
    Paused {
        until: f64,
    },
    Knockback {
        from: Position,
        to: Position,
        started: f64,
        duration: f64,
    },
    Separating {
        until: f64,
    },
    Dead,
}

impl BehaviorState {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            BehaviorState::Idle => "Idle",
            BehaviorState::Wandering => "Wandering",
            BehaviorState::SeekingFood => "SeekingFood",
            BehaviorState::SeekingMate => "SeekingMate",
            BehaviorState::SeekingPrey => "SeekingPrey",
            BehaviorState::Paused { .. } => "Paused",
            BehaviorState::Knockback { .. } => "Knockback",
            BehaviorState::Separating { .. } => "Separating",
            BehaviorState::Dead => "Dead",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Behavior {
    pub state: BehaviorState,
    pub target: Option<Target>,
    pub last_eat_time: Option<f64>,
    pub last_attack_time: Option<f64>,
    pub cue: AnimationCue,
}

/// Experience and level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
}

/// Settlement membership.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Allegiance {
    pub settlement: Option<String>,
}

/// Edible item. Removed from the world once `uses_remaining` hits zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: Uuid,
    pub food_amount: f64,
    pub uses_remaining: u32,
    pub max_uses: u32,
}

impl FoodItem {
    /// Takes one bite, returning the nourishment gained.
    pub fn consume(&mut self) -> Option<f64> {
        if self.uses_remaining == 0 {
            return None;
        }
        self.uses_remaining -= 1;
        Some(self.food_amount)
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.uses_remaining == 0
    }
}

/// Direction or idle cue forwarded to an animation collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnimationCue {
    #[default]
    Idle,
    WalkNorth,
    WalkSouth,
    WalkEast,
    WalkWest,
}

impl AnimationCue {
    /// Dominant-axis cue for a heading; north is +y.
    #[must_use]
    pub fn from_direction(dx: f64, dy: f64) -> Self {
        if dx == 0.0 && dy == 0.0 {
            AnimationCue::Idle
        } else if dx.abs() > dy.abs() {
            if dx > 0.0 {
                AnimationCue::WalkEast
            } else {
                AnimationCue::WalkWest
            }
        } else if dy > 0.0 {
            AnimationCue::WalkNorth
        } else {
            AnimationCue::WalkSouth
        }
    }
}
