//! Compiles text which may contain SSML into segments of plain text, each with the speech
//! settings (rate, pitch, volume, emphasis and pauses) it should be spoken with.
//!
//! ```
//! use ssml_segments::{parse, process};
//!
//! let document = parse(r#"<speak>
//!     Your code is <say-as interpret-as="characters">AB12</say-as>.
//!     <break time="500ms"/>
//!     <prosody rate="slow">Please write it down.</prosody>
//! </speak>"#);
//! assert_eq!(document.plain_text(), "Your code is AB12. Please write it down.");
//!
//! let processed = process(&document);
//! assert_eq!(processed.segments[1].text, "A B 1 2");
//! assert_eq!(processed.segments[3].settings.pause, Some(0.5));
//! assert_eq!(processed.segments[4].settings.rate, Some(0.75));
//! ```
//!
//! Parsing never fails. Text without markup is passed through untouched and markup which can't
//! be handled degrades to its text with the tags stripped.
pub mod attributes;
pub mod config;
pub mod elements;
pub mod parser;
pub mod processor;
pub mod say_as;
pub mod settings;

pub use config::{ParserConfig, ParserConfigBuilder, TagMatching};
pub use elements::{Element, EmphasisLevel, SsmlElement, Tag};
pub use parser::{extract_text, parse, parse_with, strip_tags};
pub use processor::{process, process_with, Processed, Segment};
pub use settings::SpeechSettings;

use elements::Element::Text;

/// The result of parsing a string: the element tree and the text to speak without any tags.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedDocument {
    pub(crate) elements: Vec<Element>,
    pub(crate) plain_text: String,
    pub(crate) has_ssml: bool,
}

impl ParsedDocument {
    /// Input without any markup.
    pub(crate) fn plain(input: &str) -> Self {
        Self {
            elements: vec![Text(input.to_string())],
            plain_text: input.to_string(),
            has_ssml: false,
        }
    }

    /// Input which looked like markup but couldn't be parsed.
    pub(crate) fn fallback(input: &str) -> Self {
        Self {
            elements: vec![Text(input.to_string())],
            plain_text: strip_tags(input),
            has_ssml: false,
        }
    }

    /// Top level elements. For parsed markup this is normally a single `speak` element.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn plain_text(&self) -> &str {
        &self.plain_text
    }

    /// Whether the input was parsed as markup. False for plain text and for markup that fell
    /// back to plain text.
    pub fn has_ssml(&self) -> bool {
        self.has_ssml
    }

    /// Writes the document back out as SSML. Sibling elements are separated by a space and text
    /// is escaped, documents which weren't parsed as markup are wrapped in a `speak` element.
    pub fn write_ssml(&self) -> String {
        let mut ssml_str = String::new();
        if self.has_ssml {
            write_elements(&self.elements, &mut ssml_str);
        } else {
            ssml_str.push_str("<speak>");
            ssml_str.push_str(&quick_xml::escape::escape(self.plain_text.as_str()));
            ssml_str.push_str("</speak>");
        }
        ssml_str
    }
}

fn write_elements(elements: &[Element], ssml_str: &mut String) {
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            ssml_str.push(' ');
        }
        match element {
            Text(text) => ssml_str.push_str(&quick_xml::escape::escape(text.as_str())),
            Element::Tag(tag) => write_tag(tag, ssml_str),
        }
    }
}

fn write_tag(tag: &Tag, ssml_str: &mut String) {
    let open = format!("<{}{}", tag.name, tag.attribute_string());
    ssml_str.push_str(&open);
    if tag.kind.is_empty_element() {
        ssml_str.push_str("/>");
        return;
    }

    if tag.has_children() {
        ssml_str.push('>');
        write_elements(&tag.children, ssml_str);
    } else if let Some(content) = tag.text_content() {
        ssml_str.push('>');
        if content.contains('<') {
            ssml_str.push_str(content);
        } else {
            ssml_str.push_str(&quick_xml::escape::escape(content));
        }
    } else {
        ssml_str.push_str("/>");
        return;
    }
    ssml_str.push_str(&format!("</{}>", tag.name));
}
