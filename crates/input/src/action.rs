use serde::{Deserialize, Serialize};

/// A high-level action the frame loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Leave the loop and tear everything down.
    Quit,
    /// Attach the probe box now instead of waiting for the delay.
    AttachJointNow,
    /// Stop or resume stepping the simulation.
    TogglePause,
    /// Input with no binding.
    Noop,
}

/// Keys the demo cares about. Windowing backends translate into this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    J,
    P,
    Other,
}

/// Backend-neutral window event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    CloseRequested,
    KeyPressed(Key),
    KeyReleased(Key),
}

pub fn map_event(event: InputEvent) -> Action {
    match event {
        InputEvent::CloseRequested | InputEvent::KeyPressed(Key::Escape) => Action::Quit,
        InputEvent::KeyPressed(Key::J) => Action::AttachJointNow,
        InputEvent::KeyPressed(Key::P) => Action::TogglePause,
        InputEvent::KeyPressed(Key::Other) | InputEvent::KeyReleased(_) => Action::Noop,
    }
}
