//! Tunable constants, loadable from TOML.
//!
//! Every section defaults to the stock effect tuning, so a config file only
//! needs the keys it wants to change:
//!
//! ```toml
//! [charge]
//! rise = 0.12
//!
//! [scene]
//! warmup_ms = 0.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Complete effect configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxConfig {
    pub gesture:   GestureConfig,
    pub hands:     HandConfig,
    pub charge:    ChargeConfig,
    pub particles: ParticleConfig,
    pub lightning: LightningConfig,
    pub scene:     SceneConfig,
}

impl FxConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Sections
// ════════════════════════════════════════════════════════════════════════════

/// Open-hand and pinch classifier thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Extended non-thumb fingers needed for an open hand (of 4).
    pub open_min_fingers: usize,
    /// Extended middle/ring/pinky fingers needed before a pinch counts (of 3).
    pub pinch_min_fingers: usize,
    /// Thumb-index distance as a fraction of wrist-to-palm distance.
    pub pinch_ratio: f32,
    /// Wrist displacement per frame (normalized units) above which a pinch
    /// sample is rejected as deliberate motion.
    pub max_wrist_step: f32,
    /// Frames a pinch stays active after its last raw detection.
    pub pinch_hold_frames: u32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            open_min_fingers:  3,
            pinch_min_fingers: 2,
            pinch_ratio:       0.35,
            max_wrist_step:    0.05,
            pinch_hold_frames: 5,
        }
    }
}

/// Per-hand intensity and surge dynamics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandConfig {
    pub intensity_rise: f32,
    pub intensity_fall: f32,
    pub surge_decay:    f32,
    /// Surge below this snaps to zero.
    pub surge_floor:    f32,
}

impl Default for HandConfig {
    fn default() -> Self {
        HandConfig {
            intensity_rise: 0.05,
            intensity_fall: 0.15,
            surge_decay:    0.92,
            surge_floor:    0.01,
        }
    }
}

/// Global lightning charge dynamics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeConfig {
    /// Per-frame gain while a hand is open in lightning mode.
    pub rise: f32,
    /// Per-frame loss in lightning mode with every hand closed.
    pub fall: f32,
    /// Per-frame loss in the other modes.
    pub idle_fall: f32,
}

impl Default for ChargeConfig {
    fn default() -> Self {
        ChargeConfig { rise: 0.08, fall: 0.05, idle_fall: 0.1 }
    }
}

/// Particle spawn parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Positional jitter span (pixels) for ambient particles.
    pub ambient_jitter: f32,
    /// Positional jitter span (pixels) for painted particles.
    pub drawing_jitter: f32,
    pub ambient_decay:  f32,
    pub drawing_decay:  f32,
    /// Particles emitted per drawing spawn.
    pub drawing_count:  usize,
    /// `(min, span)` radius for ambient particles.
    pub ambient_radius: (f32, f32),
    /// `(min, span)` radius for painted particles.
    pub drawing_radius: (f32, f32),
    /// Horizontal drift span (pixels/frame).
    pub drift:          f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        ParticleConfig {
            ambient_jitter: 15.0,
            drawing_jitter: 10.0,
            ambient_decay:  0.06,
            drawing_decay:  0.0055,
            drawing_count:  2,
            ambient_radius: (8.0, 22.0),
            drawing_radius: (20.0, 20.0),
            drift:          4.0,
        }
    }
}

/// Lightning bolt shape, lifetime and spawn odds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightningConfig {
    pub points:       usize,
    /// Random-walk step span (pixels) on both axes.
    pub step:         f32,
    /// Vertical step is `(r - upward_bias) * step`; 0.5 is unbiased.
    pub upward_bias:  f32,
    pub decay:        f32,
    /// Charge at or below this spawns nothing.
    pub min_charge:   f32,
    /// Per-fingertip spawn probability per frame.
    pub tip_chance:   f32,
    /// Per-bone-midpoint spawn probability per frame.
    pub bone_chance:  f32,
    /// Flash probability is `flash_chance * charge`.
    pub flash_chance: f32,
    /// Flash alpha is `flash_alpha * charge`.
    pub flash_alpha:  f32,
}

impl Default for LightningConfig {
    fn default() -> Self {
        LightningConfig {
            points:       25,
            step:         80.0,
            upward_bias:  0.8,
            decay:        0.1,
            min_charge:   0.01,
            tip_chance:   0.07,
            bone_chance:  0.005,
            flash_chance: 0.5,
            flash_alpha:  0.25,
        }
    }
}

/// Scene-level settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Hands beyond this count in a frame are ignored.
    pub max_hands: usize,
    /// Pinch painting is disabled until this long after the first frame.
    pub warmup_ms: f64,
    /// Hand intensity at or below this draws nothing.
    pub min_intensity: f32,
    /// Flip landmark x so effects overlay the mirrored camera image.
    pub mirror_landmarks: bool,
    /// RGBA of the multiply overlay darkening the camera feed.
    pub overlay: [f32; 4],
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            max_hands:        2,
            warmup_ms:        10_000.0,
            min_intensity:    0.01,
            mirror_landmarks: true,
            overlay:          [10.0, 5.0, 0.0, 0.5],
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let cfg = FxConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, FxConfig::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = FxConfig::from_toml_str("[charge]\nrise = 0.2\n").unwrap();
        assert_eq!(cfg.charge.rise, 0.2);
        assert_eq!(cfg.charge.fall, 0.05);
        assert_eq!(cfg.lightning.points, 25);
    }

    #[test]
    fn scene_overrides() {
        let cfg = FxConfig::from_toml_str(
            "[scene]\nwarmup_ms = 0.0\nmirror_landmarks = false\n",
        ).unwrap();
        assert_eq!(cfg.scene.warmup_ms, 0.0);
        assert!(!cfg.scene.mirror_landmarks);
        assert_eq!(cfg.scene.max_hands, 2);
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = FxConfig::from_toml_str("[charge]\nrise = \"lots\"\n").unwrap_err();
        assert!(matches!(err, crate::error::FxError::Config(_)));
    }

    #[test]
    fn serialized_default_round_trips() {
        let text = toml::to_string(&FxConfig::default()).unwrap();
        assert_eq!(FxConfig::from_toml_str(&text).unwrap(), FxConfig::default());
    }
}
