use std::collections::HashSet;

/// Analog axes read by the control schemes, each in -1.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Digital buttons read by the control schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Jump,
    /// Rise, for schemes that can move on Y.
    Fire1,
    /// Sink, for schemes that can move on Y.
    Fire2,
}

/// Raw input delivered by the host between simulation steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    ButtonDown(Button),
    ButtonUp(Button),
    Axis(Axis, f32),
}

/// Snapshot of the input service for one simulation step.
///
/// Buttons report both level (`is_held`) and edge (`was_pressed`); edges
/// are cleared by [`InputState::end_step`] so a press is seen by exactly
/// one step.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub horizontal: f32,
    pub vertical: f32,
    held: HashSet<Button>,
    pressed: HashSet<Button>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, events: &[InputEvent]) {
        for event in events {
            match *event {
                InputEvent::ButtonDown(button) => {
                    if self.held.insert(button) {
                        self.pressed.insert(button);
                    }
                }
                InputEvent::ButtonUp(button) => {
                    self.held.remove(&button);
                }
                InputEvent::Axis(Axis::Horizontal, value) => {
                    self.horizontal = value.clamp(-1.0, 1.0);
                }
                InputEvent::Axis(Axis::Vertical, value) => {
                    self.vertical = value.clamp(-1.0, 1.0);
                }
            }
        }
    }

    pub fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    pub fn is_held(&self, button: Button) -> bool {
        self.held.contains(&button)
    }

    /// True only on the step the button went down.
    pub fn was_pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    pub fn end_step(&mut self) {
        self.pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_an_edge_for_one_step() {
        let mut input = InputState::new();
        input.apply(&[InputEvent::ButtonDown(Button::Jump)]);
        assert!(input.was_pressed(Button::Jump));
        assert!(input.is_held(Button::Jump));

        input.end_step();
        assert!(!input.was_pressed(Button::Jump));
        assert!(input.is_held(Button::Jump));

        // Repeated down events while held are not new edges.
        input.apply(&[InputEvent::ButtonDown(Button::Jump)]);
        assert!(!input.was_pressed(Button::Jump));

        input.apply(&[InputEvent::ButtonUp(Button::Jump)]);
        assert!(!input.is_held(Button::Jump));
    }

    #[test]
    fn axes_are_clamped() {
        let mut input = InputState::new();
        input.apply(&[
            InputEvent::Axis(Axis::Horizontal, 3.0),
            InputEvent::Axis(Axis::Vertical, -0.5),
        ]);
        assert_eq!(input.axis(Axis::Horizontal), 1.0);
        assert_eq!(input.axis(Axis::Vertical), -0.5);
    }
}
