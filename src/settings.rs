use crate::elements::EmphasisLevel;
use serde::{Deserialize, Serialize};

/// Speech settings applying to a span of text.
///
/// This is an overlay: a `None` field means the value is inherited from the surrounding
/// context rather than reset to a default. Rate and pitch are multipliers where `1.0` is the
/// voice default, volume runs from `0.0` (silent) to `2.0` and pause is in seconds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<EmphasisLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause: Option<f64>,
}

impl SpeechSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the settings of `self` with every field present in `overlay` replacing ours.
    /// Fields absent from the overlay are left untouched.
    pub fn merge(&self, overlay: &SpeechSettings) -> SpeechSettings {
        SpeechSettings {
            rate: overlay.rate.or(self.rate),
            pitch: overlay.pitch.or(self.pitch),
            volume: overlay.volume.or(self.volume),
            emphasis: overlay.emphasis.or(self.emphasis),
            pause: overlay.pause.or(self.pause),
        }
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.pitch = Some(pitch);
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_emphasis(mut self, emphasis: EmphasisLevel) -> Self {
        self.emphasis = Some(emphasis);
        self
    }

    pub fn with_pause(mut self, pause: f64) -> Self {
        self.pause = Some(pause);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
