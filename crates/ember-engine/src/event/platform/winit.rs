use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::event::{Event, Key, MouseButton};

/// Translates a winit `WindowEvent` into an engine [`Event`].
///
/// Returns `None` for events the engine does not deliver. Key repeats are
/// dropped; a held key produces one `KeyPress`.
pub(crate) fn translate_window_event(event: &WindowEvent) -> Option<Event> {
    match event {
        WindowEvent::Resized(size) => Some(Event::WindowResize {
            x: 0,
            y: 0,
            width: size.width,
            height: size.height,
        }),

        WindowEvent::CursorMoved { position, .. } => Some(Event::MouseMove {
            x: position.x as f32,
            y: position.y as f32,
        }),

        WindowEvent::MouseInput { state, button, .. } => {
            let button = map_mouse_button(*button);
            Some(match state {
                ElementState::Pressed => Event::MousePress(button),
                ElementState::Released => Event::MouseRelease(button),
            })
        }

        WindowEvent::KeyboardInput { event, .. } => {
            if event.repeat {
                return None;
            }
            let key = map_key(event.physical_key);
            Some(match event.state {
                ElementState::Pressed => Event::KeyPress(key),
                ElementState::Released => Event::KeyRelease(key),
            })
        }

        _ => None,
    }
}

fn map_mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(id) => MouseButton::Other(id),
    }
}

/// `KeyCode::$code => Key::$key` for each pair, `None` otherwise.
macro_rules! keymap {
    ($code:expr; $($from:ident => $to:ident),* $(,)?) => {
        match $code {
            $(KeyCode::$from => Some(Key::$to),)*
            _ => None,
        }
    };
}

/// Same as [`keymap!`] for keys whose names match on both sides.
macro_rules! keymap_same {
    ($code:expr; $($name:ident),* $(,)?) => {
        keymap!($code; $($name => $name),*)
    };
}

fn map_key(key: PhysicalKey) -> Key {
    let code = match key {
        PhysicalKey::Code(code) => code,
        PhysicalKey::Unidentified(_) => return Key::Unknown(0),
    };

    let letter = keymap!(code;
        KeyA => A, KeyB => B, KeyC => C, KeyD => D, KeyE => E, KeyF => F, KeyG => G,
        KeyH => H, KeyI => I, KeyJ => J, KeyK => K, KeyL => L, KeyM => M, KeyN => N,
        KeyO => O, KeyP => P, KeyQ => Q, KeyR => R, KeyS => S, KeyT => T, KeyU => U,
        KeyV => V, KeyW => W, KeyX => X, KeyY => Y, KeyZ => Z,
    );

    let modifier = keymap!(code;
        ShiftLeft => Shift, ShiftRight => Shift,
        ControlLeft => Control, ControlRight => Control,
        AltLeft => Alt, AltRight => Alt,
        SuperLeft => Meta, SuperRight => Meta,
    );

    letter
        .or(modifier)
        .or_else(|| {
            keymap_same!(code;
                Digit0, Digit1, Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8, Digit9,
                Numpad0, Numpad1, Numpad2, Numpad3, Numpad4,
                Numpad5, Numpad6, Numpad7, Numpad8, Numpad9,
                F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
                ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
                Escape, Enter, Tab, Backspace, Space,
                Insert, Delete, Home, End, PageUp, PageDown,
                Minus, Equal, Comma, Period, Slash, Backslash,
                Semicolon, Quote, Backquote, BracketLeft, BracketRight,
            )
        })
        .unwrap_or(Key::Unknown(code as u32))
}
