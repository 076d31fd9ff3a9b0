use crate::attributes;
use crate::config::ParserConfig;
use crate::elements::*;
use crate::parser::{decode_entities, strip_tags};
use crate::say_as;
use crate::settings::SpeechSettings;
use crate::ParsedDocument;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A piece of text to synthesise together with the settings to speak it with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub settings: SpeechSettings,
}

impl Segment {
    pub fn new(text: impl Into<String>, settings: SpeechSettings) -> Self {
        Self {
            text: text.into(),
            settings,
        }
    }

    /// Whether this segment only exists to carry a pause.
    pub fn is_pause(&self) -> bool {
        self.text.trim().is_empty() && self.settings.pause.is_some()
    }
}

/// Everything a synthesis engine needs for a document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Processed {
    /// Text of every segment joined with single spaces.
    pub text: String,
    /// Settings the document starts from, before any tag applies its own.
    pub settings: SpeechSettings,
    /// Segments in document order, never empty.
    pub segments: Vec<Segment>,
}

/// Produces the segments for a parsed document using the default [`ParserConfig`].
pub fn process(document: &ParsedDocument) -> Processed {
    process_with(document, &ParserConfig::default())
}

/// [`process`] with explicit pauses and base settings.
pub fn process_with(document: &ParsedDocument, config: &ParserConfig) -> Processed {
    let base = config.base_settings;
    let mut processor = SegmentProcessor {
        config,
        segments: vec![],
    };
    if document.has_ssml() {
        processor.walk(document.elements(), &base);
    }

    let mut segments = processor.segments;
    if segments.is_empty() {
        segments.push(Segment::new(document.plain_text(), base));
    }
    let text = segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    Processed {
        text,
        settings: base,
        segments,
    }
}

struct SegmentProcessor<'a> {
    config: &'a ParserConfig,
    segments: Vec<Segment>,
}

impl SegmentProcessor<'_> {
    fn walk(&mut self, elements: &[Element], context: &SpeechSettings) {
        for element in elements {
            self.visit(element, context);
        }
    }

    fn visit(&mut self, element: &Element, context: &SpeechSettings) {
        let tag = match element {
            Element::Text(text) => {
                if !text.is_empty() {
                    self.emit(text.as_str(), *context);
                }
                return;
            }
            Element::Tag(tag) => tag,
        };

        match &tag.kind {
            SsmlElement::Break => {
                let pause = self.break_pause(tag);
                self.emit(" ", context.merge(&SpeechSettings::new().with_pause(pause)));
            }
            SsmlElement::Emphasis => {
                let context = match tag.attribute("level").map(str::trim) {
                    Some("none") => *context,
                    level => {
                        let level = level
                            .and_then(|l| l.parse::<EmphasisLevel>().ok())
                            .unwrap_or_default();
                        context.merge(&SpeechSettings::new().with_emphasis(level))
                    }
                };
                if let Some(text) = spoken_content(tag) {
                    self.emit(text, context);
                }
            }
            SsmlElement::Prosody => {
                let context = context.merge(&prosody(tag));
                self.walk_or_emit(tag, &context);
            }
            SsmlElement::SayAs => {
                if let Some(text) = spoken_content(tag) {
                    let interpret_as = tag.attribute("interpret-as").unwrap_or_default();
                    let text = say_as::interpret(&text, interpret_as, tag.attribute("format"));
                    self.emit(text, *context);
                }
            }
            SsmlElement::Phoneme => {
                if let Some(text) = spoken_content(tag) {
                    self.emit(text, *context);
                }
            }
            SsmlElement::Sub => match tag.attribute("alias").map(str::trim) {
                Some(alias) if !alias.is_empty() => self.emit(alias, *context),
                _ => {
                    if let Some(text) = spoken_content(tag) {
                        self.emit(text, *context);
                    }
                }
            },
            SsmlElement::Paragraph => {
                self.walk_or_emit(tag, context);
                let pause = SpeechSettings::new().with_pause(self.config.paragraph_pause);
                self.emit(" ", context.merge(&pause));
            }
            SsmlElement::Sentence | SsmlElement::Speak => self.walk_or_emit(tag, context),
            SsmlElement::Other(name) => {
                trace!(tag = %name, "Speaking content of unsupported tag");
                self.walk_or_emit(tag, context);
            }
        }
    }

    /// Children take precedence, a tag without any speaks its content.
    fn walk_or_emit(&mut self, tag: &Tag, context: &SpeechSettings) {
        if tag.has_children() {
            self.walk(&tag.children, context);
        } else if let Some(text) = spoken_content(tag) {
            self.emit(text, *context);
        }
    }

    fn break_pause(&self, tag: &Tag) -> f64 {
        attributes::break_time(
            tag.attribute("time"),
            tag.attribute("strength"),
            self.config.default_break,
        )
    }

    fn emit(&mut self, text: impl Into<String>, settings: SpeechSettings) {
        self.segments.push(Segment::new(text, settings));
    }
}

/// Settings a `prosody` tag sets, only the attributes present on the tag are filled in.
fn prosody(tag: &Tag) -> SpeechSettings {
    SpeechSettings {
        rate: tag.attribute("rate").map(attributes::rate),
        pitch: tag.attribute("pitch").map(attributes::pitch),
        volume: tag.attribute("volume").map(attributes::volume),
        ..Default::default()
    }
}

/// Text content of a tag with any nested markup removed.
fn spoken_content(tag: &Tag) -> Option<String> {
    let content = tag.text_content()?;
    let text = if content.contains('<') {
        decode_entities(&strip_tags(content))
    } else {
        content.to_string()
    };
    (!text.is_empty()).then_some(text)
}
