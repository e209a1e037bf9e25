use crate::data::entity::{AgentKind, AnimationCue};
use crate::data::terrain::ChunkCoord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why an agent left the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    Starvation,
    OldAge,
    Combat,
    Fission,
}

/// Events emitted by a single simulation tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum SimEvent {
    /// A new agent entered the world through reproduction or fission.
    Birth {
        id: Uuid,
        name: String,
        kind: AgentKind,
        parents: Option<(Uuid, Uuid)>,
        tick: u64,
        x: f64,
        y: f64,
    },
    /// An agent was removed.
    Death {
        id: Uuid,
        name: String,
        cause: DeathCause,
        age: f64,
        children: u32,
        tick: u64,
    },
    FoodEaten {
        eater: Uuid,
        food: Uuid,
        depleted: bool,
        tick: u64,
    },
    Attack {
        attacker: Uuid,
        prey: Uuid,
        damage: f64,
        tick: u64,
    },
    LevelUp {
        id: Uuid,
        level: u32,
        tick: u64,
    },
    Fission {
        parent: Uuid,
        offspring: Vec<Uuid>,
        tick: u64,
    },
    SettlementFounded {
        founder: Uuid,
        name: String,
        x: f64,
        y: f64,
        tick: u64,
    },
    /// A terrain chunk finished generating.
    ChunkGenerated { chunk: ChunkCoord, cells: usize },
    /// An agent's facing or idle state changed.
    Animation { id: Uuid, cue: AnimationCue },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_tag() {
        let ev = SimEvent::LevelUp {
            id: Uuid::nil(),
            level: 2,
            tick: 7,
        };
        let json = serde_json::to_string(&ev).expect("serialize");
        assert!(json.contains("\"event\":\"LevelUp\""));
    }
}
