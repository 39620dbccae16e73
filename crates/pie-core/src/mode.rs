use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The sticky tool that decides what a click does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Select,
    Erase,
    Drag,
    Amplify,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Select, Mode::Erase, Mode::Drag, Mode::Amplify];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Select => "select",
            Mode::Erase => "erase",
            Mode::Drag => "drag",
            Mode::Amplify => "amplify",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Select => "Select",
            Mode::Erase => "Eraser",
            Mode::Drag => "Drag",
            Mode::Amplify => "Amplify",
        }
    }

    pub fn shortcut(&self) -> char {
        match self {
            Mode::Select => 'V',
            Mode::Erase => 'E',
            Mode::Drag => 'D',
            Mode::Amplify => 'A',
        }
    }

    pub fn from_shortcut(c: char) -> Option<Mode> {
        let c = c.to_ascii_uppercase();
        Mode::ALL.into_iter().find(|m| m.shortcut() == c)
    }

    /// Mode after a request for `requested`: asking again for the active
    /// tool turns it off, and Select is always just Select.
    pub fn toggled(self, requested: Mode) -> Mode {
        if requested == self {
            Mode::Select
        } else {
            requested
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "select" | "v" => Ok(Mode::Select),
            "erase" | "e" => Ok(Mode::Erase),
            "drag" | "d" => Ok(Mode::Drag),
            "amplify" | "a" => Ok(Mode::Amplify),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_off() {
        assert_eq!(Mode::Select.toggled(Mode::Drag), Mode::Drag);
        assert_eq!(Mode::Drag.toggled(Mode::Drag), Mode::Select);
        assert_eq!(Mode::Drag.toggled(Mode::Erase), Mode::Erase);
        assert_eq!(Mode::Select.toggled(Mode::Select), Mode::Select);
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(Mode::from_shortcut('d'), Some(Mode::Drag));
        assert_eq!(Mode::from_shortcut('A'), Some(Mode::Amplify));
        assert_eq!(Mode::from_shortcut('x'), None);
        for m in Mode::ALL {
            assert_eq!(Mode::from_shortcut(m.shortcut()), Some(m));
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("Erase".parse::<Mode>(), Ok(Mode::Erase));
        assert!("paint".parse::<Mode>().is_err());
    }
}
