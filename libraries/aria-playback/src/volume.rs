//! Volume and mute state
//!
//! The slider works in percent (0-100); the transport takes a linear
//! value in `[0, 1]`. Mute is tracked separately so unmuting restores the
//! previous level.

use serde::{Deserialize, Serialize};

/// Three-level volume icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeIcon {
    /// Silent: volume is zero or muted
    Mute,

    /// At or below half volume
    Low,

    /// Above half volume
    High,
}

/// Volume controller
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Linear volume in `[0, 1]`
    gain: f64,

    /// Mute state (preserves gain)
    muted: bool,
}

impl Volume {
    /// Create new volume controller from a linear value
    ///
    /// Out-of-range and non-finite values are clamped (NaN reads as full
    /// volume).
    pub fn new(gain: f64) -> Self {
        Self {
            gain: Self::sanitize(gain),
            muted: false,
        }
    }

    /// Set volume from a slider percentage (0-100, clamped)
    pub fn set_level(&mut self, level: u8) {
        self.gain = f64::from(level.min(100)) / 100.0;
    }

    /// Set the linear volume directly
    pub fn set_gain(&mut self, gain: f64) {
        self.gain = Self::sanitize(gain);
    }

    /// Volume as a slider percentage
    pub fn level(&self) -> u8 {
        (self.gain * 100.0).round() as u8
    }

    /// Linear volume for the transport, ignoring mute
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Set mute state
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Slider position to display: zero while muted
    pub fn slider_position(&self) -> u8 {
        if self.muted {
            0
        } else {
            self.level()
        }
    }

    /// Icon for the current level
    pub fn icon(&self) -> VolumeIcon {
        if self.muted || self.gain <= 0.0 {
            VolumeIcon::Mute
        } else if self.gain <= 0.5 {
            VolumeIcon::Low
        } else {
            VolumeIcon::High
        }
    }

    fn sanitize(gain: f64) -> f64 {
        if gain.is_nan() {
            1.0
        } else {
            gain.clamp(0.0, 1.0)
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::new(0.8);
        assert_eq!(vol.level(), 80);
        assert!(!vol.is_muted());
    }

    #[test]
    fn set_volume_level() {
        let mut vol = Volume::new(0.5);
        assert_eq!(vol.level(), 50);

        vol.set_level(75);
        assert_eq!(vol.gain(), 0.75);

        // Clamp to 100
        vol.set_level(150);
        assert_eq!(vol.level(), 100);
        assert_eq!(vol.gain(), 1.0);
    }

    #[test]
    fn gain_is_clamped() {
        assert_eq!(Volume::new(1.7).gain(), 1.0);
        assert_eq!(Volume::new(-0.2).gain(), 0.0);
        assert_eq!(Volume::new(f64::NAN).gain(), 1.0);
    }

    #[test]
    fn mute_preserves_level() {
        let mut vol = Volume::new(0.8);
        vol.toggle_mute();
        assert!(vol.is_muted());
        assert_eq!(vol.level(), 80);
        assert_eq!(vol.slider_position(), 0);

        vol.toggle_mute();
        assert!(!vol.is_muted());
        assert_eq!(vol.slider_position(), 80);
    }

    #[test]
    fn icon_levels() {
        let mut vol = Volume::new(0.0);
        assert_eq!(vol.icon(), VolumeIcon::Mute);

        vol.set_level(50);
        assert_eq!(vol.icon(), VolumeIcon::Low);

        vol.set_level(51);
        assert_eq!(vol.icon(), VolumeIcon::High);

        vol.set_muted(true);
        assert_eq!(vol.icon(), VolumeIcon::Mute);
    }
}
