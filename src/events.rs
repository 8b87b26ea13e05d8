use serde::Serialize;

/// Gameplay events broadcast by the simulation and drained by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    GameOver { win: bool },
}

/// Queue of events raised during a step.
#[derive(Debug, Default)]
pub struct EventBus {
    pending: Vec<GameEvent>,
}

impl EventBus {
    pub fn broadcast(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
