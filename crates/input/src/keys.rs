use crate::action::CameraAction;

/// Keys the scene responds to. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
    Q,
    E,
    Other,
}

impl Key {
    /// Map a browser-style numeric key code.
    pub fn from_code(code: u32) -> Self {
        match code {
            38 => Key::ArrowUp,
            40 => Key::ArrowDown,
            37 => Key::ArrowLeft,
            39 => Key::ArrowRight,
            87 => Key::W,
            65 => Key::A,
            83 => Key::S,
            68 => Key::D,
            81 => Key::Q,
            69 => Key::E,
            _ => Key::Other,
        }
    }

    /// Map a key name such as `up`, `right` or `w` (case-insensitive).
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "up" | "arrowup" => Key::ArrowUp,
            "down" | "arrowdown" => Key::ArrowDown,
            "left" | "arrowleft" => Key::ArrowLeft,
            "right" | "arrowright" => Key::ArrowRight,
            "w" => Key::W,
            "a" => Key::A,
            "s" => Key::S,
            "d" => Key::D,
            "q" => Key::Q,
            "e" => Key::E,
            other => other.parse::<u32>().map(Key::from_code).unwrap_or(Key::Other),
        }
    }

    pub fn action(self) -> Option<CameraAction> {
        match self {
            Key::ArrowUp => Some(CameraAction::PitchUp),
            Key::ArrowDown => Some(CameraAction::PitchDown),
            Key::ArrowRight => Some(CameraAction::YawRight),
            Key::ArrowLeft => Some(CameraAction::YawLeft),
            Key::W => Some(CameraAction::Forward),
            Key::S => Some(CameraAction::Backward),
            Key::A => Some(CameraAction::StrafeLeft),
            Key::D => Some(CameraAction::StrafeRight),
            Key::Q => Some(CameraAction::Raise),
            Key::E => Some(CameraAction::Lower),
            Key::Other => None,
        }
    }
}
