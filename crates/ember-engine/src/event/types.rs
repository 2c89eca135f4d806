use std::fmt;

/// Physical key, named after the US layout position.
///
/// Keys without a variant arrive as `Unknown` carrying the platform scan
/// code, or 0 when the platform gives none.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,
    Numpad0, Numpad1, Numpad2, Numpad3, Numpad4,
    Numpad5, Numpad6, Numpad7, Numpad8, Numpad9,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Escape, Enter, Tab, Backspace, Space,
    Insert, Delete, Home, End, PageUp, PageDown,

    Minus, Equal, Comma, Period, Slash, Backslash,
    Semicolon, Quote, Backquote, BracketLeft, BracketRight,

    /// Either shift key; likewise for the other modifiers.
    Shift,
    Control,
    Alt,
    Meta,

    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Unknown(code) => write!(f, "key {code:#x}"),
            key => write!(f, "{key:?}"),
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Subscription tag; one per [`Event`] variant.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventKind {
    WindowResize,
    MouseMove,
    KeyPress,
    KeyRelease,
    MousePress,
    MouseRelease,
}

/// Event delivered to subscribers and to the application.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Event {
    /// Window size changed. Once handled by the window, `x`/`y`/`width`/`height`
    /// describe the letterboxed viewport in physical pixels.
    WindowResize { x: i32, y: i32, width: u32, height: u32 },
    /// Cursor position in physical pixels relative to the window.
    MouseMove { x: f32, y: f32 },
    KeyPress(Key),
    KeyRelease(Key),
    MousePress(MouseButton),
    MouseRelease(MouseButton),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::WindowResize { .. } => EventKind::WindowResize,
            Event::MouseMove { .. } => EventKind::MouseMove,
            Event::KeyPress(_) => EventKind::KeyPress,
            Event::KeyRelease(_) => EventKind::KeyRelease,
            Event::MousePress(_) => EventKind::MousePress,
            Event::MouseRelease(_) => EventKind::MouseRelease,
        }
    }
}
