use bevy_ecs::prelude::*;

/// Commands issued by the UI collaborator (buttons, menu keys), drained once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum GameCommand {
    /// Leave the title screen and begin the first game.
    Start,
    /// Begin a new game from the game-over screen.
    Restart,
    ToggleMute,
    Exit,
}

/// Events flowing through a tick: external commands in, collision results out.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Command(GameCommand),
    /// The net swing overlapped this ghost; it is now fading out.
    GhostCaught(Entity),
    /// This ghost touched the player and has already been removed.
    PlayerHit(Entity),
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}
