//! Volume model behind the mute toggle and the volume slider.

use serde::Serialize;

/// Volume level plus mute flag.
///
/// Setting a level always unmutes. While muted the slider reads 0 but the stored
/// level is kept, so unmuting restores it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeControl {
    volume: f32,
    muted: bool,
}

impl VolumeControl {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            muted: false,
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Set the level (clamped to `[0, 1]`) and unmute.
    pub fn set_volume(&mut self, value: f32) {
        self.muted = false;
        self.volume = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    }

    /// Flip the mute flag. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Level that should actually reach the audio output.
    pub fn effective(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    /// What the slider shows.
    pub fn slider_value(&self) -> f32 {
        self.effective()
    }

    /// Whether the toggle button should show the muted icon.
    pub fn shows_muted_icon(&self) -> bool {
        self.muted || self.volume <= 0.0
    }
}

impl Default for VolumeControl {
    fn default() -> Self {
        Self::new(1.0)
    }
}
