//! Power mode selector.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which elemental effect the hands produce. Set from the keyboard or UI and
/// read once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerMode {
    /// Left hand burns, right hand freezes.
    #[default]
    FireIce,
    /// Open hands build charge that arcs from the fingers.
    Lightning,
    /// Red and blue glow without bone particles.
    RedBlue,
}

impl PowerMode {
    pub const ALL: [PowerMode; 3] = [PowerMode::FireIce, PowerMode::Lightning, PowerMode::RedBlue];

    /// Modes in which hands carry their own glow and particles.
    pub fn has_hand_effects(self) -> bool {
        matches!(self, PowerMode::FireIce | PowerMode::RedBlue)
    }

    pub fn name(self) -> &'static str {
        match self {
            PowerMode::FireIce   => "fire & ice",
            PowerMode::Lightning => "lightning",
            PowerMode::RedBlue   => "red & blue",
        }
    }
}

impl fmt::Display for PowerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fire_ice() {
        assert_eq!(PowerMode::default(), PowerMode::FireIce);
    }

    #[test]
    fn lightning_has_no_hand_effects() {
        assert!(PowerMode::FireIce.has_hand_effects());
        assert!(PowerMode::RedBlue.has_hand_effects());
        assert!(!PowerMode::Lightning.has_hand_effects());
    }
}
