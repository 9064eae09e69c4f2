//! Keyboard and pointer bindings.

use life_engine::input::{ButtonState, InputEvent, Key, MouseButton};
use life_sim::ControlEvent;

/// What a raw input event means to the studio.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Binding {
    Control(ControlEvent),
    Quit,
}

/// Maps one input event to a studio command.
///
/// Keys act on release and ignore auto-repeat. A press of the left button
/// starts a painting stroke, any other button an erasing one. Leaving the
/// window or losing focus ends the stroke.
pub fn translate(event: &InputEvent) -> Option<Binding> {
    match *event {
        InputEvent::Key {
            key,
            state: ButtonState::Released,
            modifiers,
            repeat: false,
        } => key_binding(key, modifiers.shift),

        InputEvent::PointerButton {
            button,
            state: ButtonState::Pressed,
            x,
            y,
            ..
        } => Some(Binding::Control(ControlEvent::PointerDown {
            x,
            y,
            paint: button == MouseButton::Left,
        })),

        InputEvent::PointerButton {
            state: ButtonState::Released,
            ..
        }
        | InputEvent::PointerLeft
        | InputEvent::Focused(false) => Some(Binding::Control(ControlEvent::PointerUp)),

        InputEvent::PointerMoved { x, y } => Some(Binding::Control(ControlEvent::PointerMove { x, y })),

        _ => None,
    }
}

fn key_binding(key: Key, shift: bool) -> Option<Binding> {
    let control = match key {
        Key::Escape => return Some(Binding::Quit),
        Key::R => ControlEvent::Randomize,
        Key::Delete => ControlEvent::Clear,
        Key::Space => ControlEvent::ToggleAnimation,
        Key::S if shift => ControlEvent::Restore,
        Key::S => ControlEvent::Save,
        Key::N => ControlEvent::Step,
        Key::F5 => ControlEvent::SaveFile,
        Key::F9 => ControlEvent::LoadFile,
        _ => return None,
    };
    Some(Binding::Control(control))
}
