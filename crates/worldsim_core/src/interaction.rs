use hecs::Entity;

/// Side effect decided by an agent during the parallel phase.
///
/// Commands touch state other agents may also read, so they are applied
/// serially after every decision is made. Each one is re-validated at apply
/// time; a command whose preconditions no longer hold is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionCommand {
    Eat {
        eater: Entity,
        food: Entity,
    },
    Reproduce {
        a: Entity,
        b: Entity,
    },
    Attack {
        attacker: Entity,
        prey: Entity,
    },
    /// The parent splits into fresh offspring and leaves the world.
    Fission {
        parent: Entity,
    },
    FoundSettlement {
        founder: Entity,
    },
}

impl InteractionCommand {
    /// The agent that issued the command.
    #[must_use]
    pub fn actor(&self) -> Entity {
        match *self {
            InteractionCommand::Eat { eater, .. } => eater,
            InteractionCommand::Reproduce { a, .. } => a,
            InteractionCommand::Attack { attacker, .. } => attacker,
            InteractionCommand::Fission { parent } => parent,
            InteractionCommand::FoundSettlement { founder } => founder,
        }
    }
}
