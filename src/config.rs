use crate::attributes::DEFAULT_BREAK;
use crate::settings::SpeechSettings;
use derive_builder::Builder;

/// Limits and defaults used by [`crate::parse_with`] and [`crate::process_with`].
///
/// ```
/// use ssml_segments::ParserConfigBuilder;
///
/// let config = ParserConfigBuilder::default()
///     .paragraph_pause(0.75)
///     .max_depth(16)
///     .build()
///     .unwrap();
/// assert_eq!(config.default_break, 0.25);
/// ```
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(default, build_fn(validate = "Self::validate"))]
pub struct ParserConfig {
    /// Inputs longer than this (in bytes) aren't parsed as markup and take the plain text
    /// fallback instead.
    pub max_input_len: usize,
    /// Deepest tag nesting the tree builder will follow.
    pub max_depth: usize,
    /// Pause in seconds for a `break` with no usable `time` or `strength`.
    pub default_break: f64,
    /// Pause in seconds emitted after every paragraph.
    pub paragraph_pause: f64,
    /// Context the segment processor starts from.
    pub base_settings: SpeechSettings,
    /// How an opening tag finds its closing tag.
    pub tag_matching: TagMatching,
}

/// Strategy for pairing an opening tag with its closing tag.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum TagMatching {
    /// Close at the first closing tag with a matching name, even if it belongs to a nested
    /// element of the same name.
    #[default]
    FirstCloser,
    /// Skip over closing tags belonging to nested elements with the same name.
    Balanced,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_input_len: 1024 * 1024,
            max_depth: 64,
            default_break: DEFAULT_BREAK,
            paragraph_pause: 0.5,
            base_settings: SpeechSettings::default(),
            tag_matching: TagMatching::default(),
        }
    }
}

impl ParserConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.max_depth == Some(0) {
            return Err("max_depth must be at least 1".to_string());
        }
        for (name, pause) in [
            ("default_break", self.default_break),
            ("paragraph_pause", self.paragraph_pause),
        ] {
            if let Some(pause) = pause {
                if !pause.is_finite() || pause < 0.0 {
                    return Err(format!("{} must be a non-negative number, got {}", name, pause));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default() {
        let built = ParserConfigBuilder::default().build().unwrap();
        assert_eq!(built, ParserConfig::default());
        assert_eq!(built.tag_matching, TagMatching::FirstCloser);
    }

    #[test]
    fn builder_overrides() {
        let config = ParserConfigBuilder::default()
            .default_break(1.0)
            .base_settings(SpeechSettings::new().with_rate(0.75))
            .build()
            .unwrap();
        assert_eq!(config.default_break, 1.0);
        assert_eq!(config.paragraph_pause, 0.5);
        assert_eq!(config.base_settings.rate, Some(0.75));
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(ParserConfigBuilder::default().max_depth(0).build().is_err());
        assert!(ParserConfigBuilder::default()
            .paragraph_pause(-1.0)
            .build()
            .is_err());
        assert!(ParserConfigBuilder::default()
            .default_break(f64::NAN)
            .build()
            .is_err());
    }
}
