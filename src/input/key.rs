use std::fmt;

/// Keys the locomotion controller distinguishes.
///
/// Parsed from DOM-style key identifiers (`"ArrowUp"`, `"Shift"`, `" "`).
/// Anything else is kept as [`Key::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Shift,
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl Key {
    #[must_use]
    pub fn parse(identifier: &str) -> Self {
        match identifier {
            "Shift" => Key::Shift,
            " " | "Space" | "Spacebar" => Key::Space,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            other => Key::Other(other.to_string()),
        }
    }

    /// The DOM identifier this key is reported as.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Key::Shift => "Shift",
            Key::Space => " ",
            Key::ArrowUp => "ArrowUp",
            Key::ArrowDown => "ArrowDown",
            Key::ArrowLeft => "ArrowLeft",
            Key::ArrowRight => "ArrowRight",
            Key::Other(s) => s,
        }
    }

    #[must_use]
    pub fn is_arrow(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight
        )
    }
}

impl From<&str> for Key {
    fn from(identifier: &str) -> Self {
        Key::parse(identifier)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}
