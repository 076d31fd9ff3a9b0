//! Element tree produced by the tag scanner.
//!
//! Only the tags which change how text is spoken get their own variant, everything else is
//! carried through as [`SsmlElement::Other`] so its text content is still rendered. Tag
//! descriptions follow the [SSML 1.1 recommendation](https://www.w3.org/TR/speech-synthesis11).

// Speak can contain (the ones we act on):
// * p - paragraph, followed by a pause
// * s - sentence
// * break - inserts a pause
// * emphasis - applies an emphasis level to its text
// * prosody - rate, pitch and volume for the contained text
// * say-as - how to verbalise the contained text (digits, dates, phone numbers...)
// * phoneme - phonetic pronunciation, we only speak the contained text
// * sub - spoken alias for the contained text
//
// voice, lang, audio, mark, token, w and vendor tags (mstts:*) end up in Other.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum SsmlElement {
    Speak,
    Paragraph,
    Sentence,
    Break,
    Emphasis,
    Prosody,
    SayAs,
    Phoneme,
    Sub,
    /// Any tag not listed above, holding the local name (namespace prefix removed).
    Other(String),
}

impl SsmlElement {
    /// Tags which are only meaningful as empty elements.
    #[inline(always)]
    pub fn is_empty_element(&self) -> bool {
        matches!(self, Self::Break)
    }
}

impl FromStr for SsmlElement {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let local = match s.rsplit_once(':') {
            Some((_, local)) => local,
            None => s,
        };
        let s = match local {
            "speak" => Self::Speak,
            "p" => Self::Paragraph,
            "s" => Self::Sentence,
            "break" => Self::Break,
            "emphasis" => Self::Emphasis,
            "prosody" => Self::Prosody,
            "say-as" => Self::SayAs,
            "phoneme" => Self::Phoneme,
            "sub" => Self::Sub,
            e => Self::Other(e.to_string()),
        };
        Ok(s)
    }
}

impl fmt::Display for SsmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Speak => "speak",
            Self::Paragraph => "p",
            Self::Sentence => "s",
            Self::Break => "break",
            Self::Emphasis => "emphasis",
            Self::Prosody => "prosody",
            Self::SayAs => "say-as",
            Self::Phoneme => "phoneme",
            Self::Sub => "sub",
            Self::Other(name) => name,
        };
        write!(f, "{}", name)
    }
}

/// A node in the parsed tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    /// A run of text between tags, trimmed and with entities decoded.
    Text(String),
    Tag(Tag),
}

impl Element {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// The tag kind, `None` for text nodes.
    pub fn kind(&self) -> Option<&SsmlElement> {
        match self {
            Self::Text(_) => None,
            Self::Tag(tag) => Some(&tag.kind),
        }
    }

    pub fn as_tag(&self) -> Option<&Tag> {
        match self {
            Self::Text(_) => None,
            Self::Tag(tag) => Some(tag),
        }
    }
}

/// An element created from an opening tag and, if one was found, its closing tag.
#[derive(Clone, Debug, PartialEq)]
pub struct Tag {
    /// Name exactly as written in the markup, used to find the closing tag and when writing
    /// the tree back out.
    pub name: String,
    pub kind: SsmlElement,
    pub attributes: IndexMap<String, String>,
    /// Trimmed text between the opening and closing tag. For tags holding nested markup this is
    /// the raw markup, otherwise entities are decoded.
    pub content: Option<String>,
    /// Elements built from the content, empty when the content held no text or tags.
    pub children: Vec<Element>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = SsmlElement::from_str(&name).unwrap_or_else(|e| match e {});
        Self {
            name,
            kind,
            attributes: IndexMap::new(),
            content: None,
            children: vec![],
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Content if it's present and not blank.
    pub fn text_content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }

    pub(crate) fn attribute_string(&self) -> String {
        let mut s = String::new();
        for (key, value) in self.attributes.iter() {
            s.push_str(&format!(
                " {}=\"{}\"",
                key,
                quick_xml::escape::escape(value.as_str())
            ));
        }
        s
    }
}

impl From<Tag> for Element {
    fn from(tag: Tag) -> Self {
        Self::Tag(tag)
    }
}

/// The `level` attribute of `emphasis`. "none" is handled by leaving the surrounding level in
/// place rather than being a level of its own.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmphasisLevel {
    /// Strong
    Strong,
    /// Moderate (default)
    Moderate,
    /// Reduced
    Reduced,
}

impl Default for EmphasisLevel {
    fn default() -> Self {
        Self::Moderate
    }
}

impl FromStr for EmphasisLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strong" => Ok(Self::Strong),
            "moderate" => Ok(Self::Moderate),
            "reduced" => Ok(Self::Reduced),
            e => anyhow::bail!("Unrecognised value {}", e),
        }
    }
}

impl fmt::Display for EmphasisLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strong => write!(f, "strong"),
            Self::Moderate => write!(f, "moderate"),
            Self::Reduced => write!(f, "reduced"),
        }
    }
}

/// The `strength` attribute of `break`, used for the pause length when no `time` is given.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Strength {
    /// None value - do not insert a break here
    No,
    /// Extra weak break (x-weak)
    ExtraWeak,
    /// Weak break
    Weak,
    /// Medium break (default)
    Medium,
    /// Strong break
    Strong,
    /// Extra strong break (x-strong)
    ExtraStrong,
}

impl Strength {
    /// Pause in seconds.
    pub fn pause(&self) -> f64 {
        match self {
            Self::No => 0.0,
            Self::ExtraWeak => 0.1,
            Self::Weak => 0.2,
            Self::Medium => 0.25,
            Self::Strong => 0.5,
            Self::ExtraStrong => 1.0,
        }
    }
}

impl FromStr for Strength {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::No),
            "x-weak" => Ok(Self::ExtraWeak),
            "weak" => Ok(Self::Weak),
            "medium" => Ok(Self::Medium),
            "strong" => Ok(Self::Strong),
            "x-strong" => Ok(Self::ExtraStrong),
            e => anyhow::bail!("Unrecognised value {}", e),
        }
    }
}
