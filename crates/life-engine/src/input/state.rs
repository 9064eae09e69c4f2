use super::frame::InputFrame;
use super::types::{InputEvent, Modifiers};

/// What the runtime tracks between window events.
///
/// winit reports button presses without a position and keys without
/// modifiers, so both are filled in from here.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,

    /// Pointer position in logical pixels; `None` outside the window.
    pub pointer_pos: Option<(f32, f32)>,
}

impl InputState {
    /// Applies `ev` to the tracked state and queues it on `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = m,
            InputEvent::PointerMoved { x, y } => self.pointer_pos = Some((x, y)),
            InputEvent::PointerLeft => self.pointer_pos = None,
            InputEvent::Key { modifiers, .. } => self.modifiers = modifiers,
            InputEvent::PointerButton { x, y, modifiers, .. } => {
                self.pointer_pos = Some((x, y));
                self.modifiers = modifiers;
            }
            InputEvent::Focused(_) => {}
        }

        frame.push_event(ev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ButtonState, Key, MouseButton};

    #[test]
    fn events_queue_in_arrival_order() {
        let shift = Modifiers { shift: true, ..Modifiers::default() };
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        let press = InputEvent::Key {
            key: Key::R,
            state: ButtonState::Pressed,
            modifiers: shift,
            repeat: false,
        };
        s.apply_event(&mut f, press);
        s.apply_event(&mut f, InputEvent::Focused(false));

        assert_eq!(f.events, vec![press, InputEvent::Focused(false)]);
        assert_eq!(s.modifiers, shift);

        f.clear();
        assert!(f.events.is_empty());
    }

    #[test]
    fn pointer_position_follows_motion_and_leave() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, InputEvent::PointerMoved { x: 1.0, y: 2.0 });
        assert_eq!(s.pointer_pos, Some((1.0, 2.0)));

        s.apply_event(
            &mut f,
            InputEvent::PointerButton {
                button: MouseButton::Left,
                state: ButtonState::Pressed,
                x: 3.0,
                y: 4.0,
                modifiers: Modifiers::default(),
            },
        );
        assert_eq!(s.pointer_pos, Some((3.0, 4.0)));

        s.apply_event(&mut f, InputEvent::PointerLeft);
        assert_eq!(s.pointer_pos, None);
    }
}
