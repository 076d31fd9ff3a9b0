use crate::config::{ParserConfig, TagMatching};
use crate::elements::*;
use crate::ParsedDocument;
use anyhow::{bail, Result};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::{debug, trace};

lazy_static! {
    static ref ANY_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref OPEN_TAG: Regex = Regex::new(r"<([A-Za-z_][\w:.-]*)([^>]*?)(/?)>").unwrap();
    static ref ATTRIBUTE: Regex =
        Regex::new(r#"([A-Za-z_][\w:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap();
    static ref XML_DECLARATION: Regex = Regex::new(r"^\s*<\?xml[^>]*\?>").unwrap();
    static ref DOCTYPE: Regex = Regex::new(r"(?i)<!DOCTYPE[^>]*>").unwrap();
    static ref COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    static ref SPEAK_ROOT: Regex = Regex::new(r"^<speak[\s/>]").unwrap();
    static ref CLOSE_TAG: Regex = Regex::new(r"</([A-Za-z_][\w:.-]*)>").unwrap();
    static ref STRAY_CLOSE: Regex = Regex::new(r"</[^>]*>").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

const CLOSING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

/// Parses text which may contain SSML using the default [`ParserConfig`].
///
/// This never fails. Text without any tags comes back as a single text element, and markup
/// which can't be handled comes back as its text with the tags stripped.
pub fn parse(input: &str) -> ParsedDocument {
    parse_with(input, &ParserConfig::default())
}

/// [`parse`] with explicit limits.
pub fn parse_with(input: &str, config: &ParserConfig) -> ParsedDocument {
    if !has_markup(input) {
        return ParsedDocument::plain(input);
    }
    match parse_markup(input, config) {
        Ok(document) => document,
        Err(e) => {
            debug!(error = %e, "Falling back to plain text for unparseable SSML");
            ParsedDocument::fallback(input)
        }
    }
}

/// Whether the input contains anything that looks like a tag.
pub fn has_markup(input: &str) -> bool {
    ANY_TAG.is_match(input)
}

/// Removes everything that looks like a tag, collapsing the whitespace left behind.
pub fn strip_tags(input: &str) -> String {
    let stripped = ANY_TAG.replace_all(input, " ");
    collapse_whitespace(&stripped)
}

fn parse_markup(input: &str, config: &ParserConfig) -> Result<ParsedDocument> {
    if input.len() > config.max_input_len {
        bail!(
            "Input of {} bytes is over the {} byte limit",
            input.len(),
            config.max_input_len
        );
    }
    let markup = normalize(input);
    let elements = build_nested(&markup, 0, config)?;
    let plain_text = extract_text(&elements);
    Ok(ParsedDocument {
        elements,
        plain_text,
        has_ssml: true,
    })
}

/// Drops the prologue and comments, makes sure everything sits inside a `speak` root and
/// collapses whitespace.
fn normalize(input: &str) -> String {
    let markup = XML_DECLARATION.replace(input, "");
    let markup = DOCTYPE.replace_all(&markup, "");
    let markup = COMMENT.replace_all(&markup, "");
    let trimmed = markup.trim();
    let rooted = if SPEAK_ROOT.is_match(trimmed) {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("<speak>{}</speak>", trimmed))
    };
    collapse_whitespace(&rooted)
}

/// Builds the element tree for a piece of markup with the default [`ParserConfig`].
///
/// The markup is taken as it is, no root is added and whitespace isn't collapsed.
pub fn build(markup: &str) -> Result<Vec<Element>> {
    build_nested(markup, 0, &ParserConfig::default())
}

fn build_nested(markup: &str, depth: usize, config: &ParserConfig) -> Result<Vec<Element>> {
    if depth > config.max_depth {
        bail!("SSML nested deeper than {} tags", config.max_depth);
    }
    let closers = closing_tags(markup, config.tag_matching);
    let mut elements = vec![];
    let mut pos = 0;
    while pos < markup.len() {
        let rest = &markup[pos..];
        let Some(caps) = OPEN_TAG.captures(rest) else {
            break;
        };
        let Some(open) = caps.get(0) else {
            break;
        };
        push_text(&rest[..open.start()], &mut elements);

        let name = &caps[1];
        let after_open = pos + open.end();
        let mut tag = Tag::new(name);
        tag.attributes = parse_attributes(&caps[2]);

        if !caps[3].is_empty() {
            elements.push(tag.into());
            pos = after_open;
            continue;
        }

        match closers.get(&(pos + open.start())).copied() {
            Some((close_start, close_end)) => {
                let inner = &markup[after_open..close_start];
                tag.children = build_nested(inner, depth + 1, config)?;
                tag.content = leaf_content(inner);
                pos = close_end;
            }
            None => {
                trace!(tag = name, "No closing tag found, treating as empty element");
                pos = after_open;
            }
        }
        elements.push(tag.into());
    }
    if pos < markup.len() {
        push_text(&markup[pos..], &mut elements);
    }
    Ok(elements)
}

/// Pairs the opening tags in a piece of markup with their closing tags in one pass. Keys are
/// where an opening tag starts, values where its closing tag starts and ends. Opening tags
/// without a closing tag are left out.
fn closing_tags(markup: &str, matching: TagMatching) -> HashMap<usize, (usize, usize)> {
    let mut boundaries = vec![];
    for caps in OPEN_TAG.captures_iter(markup) {
        if let (Some(tag), Some(name)) = (caps.get(0), caps.get(1)) {
            if caps[3].is_empty() {
                boundaries.push((tag.start(), tag.end(), name.as_str(), true));
            }
        }
    }
    for caps in CLOSE_TAG.captures_iter(markup) {
        if let (Some(tag), Some(name)) = (caps.get(0), caps.get(1)) {
            boundaries.push((tag.start(), tag.end(), name.as_str(), false));
        }
    }
    boundaries.sort_unstable_by_key(|boundary| boundary.0);

    let mut pending: HashMap<&str, Vec<(usize, usize)>> = HashMap::new();
    let mut closers = HashMap::new();
    for (start, end, name, is_open) in boundaries {
        let opens = pending.entry(name).or_default();
        if is_open {
            opens.push((start, end));
            continue;
        }
        // A closing tag can sit inside the attributes of the opening tag before it, that
        // opening tag only closes after its own `>`.
        match matching {
            TagMatching::FirstCloser => opens.retain(|&(open_start, open_end)| {
                if open_end <= start {
                    closers.insert(open_start, (start, end));
                    false
                } else {
                    true
                }
            }),
            TagMatching::Balanced => {
                if let Some(i) = opens.iter().rposition(|&(_, open_end)| open_end <= start) {
                    let (open_start, _) = opens.remove(i);
                    closers.insert(open_start, (start, end));
                }
            }
        }
    }
    closers
}

/// Lenient attribute parsing, anything that isn't a quoted `name="value"` pair is skipped.
fn parse_attributes(attributes: &str) -> IndexMap<String, String> {
    ATTRIBUTE
        .captures_iter(attributes)
        .map(|caps| {
            let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |v| v.as_str());
            (caps[1].to_string(), decode_entities(value))
        })
        .collect()
}

/// Text between tags. Stray closing tags are dropped and blank runs produce nothing.
fn push_text(text: &str, elements: &mut Vec<Element>) {
    let text = STRAY_CLOSE.replace_all(text, " ");
    let text = collapse_whitespace(&text);
    if !text.is_empty() {
        elements.push(Element::Text(decode_entities(&text)));
    }
}

fn leaf_content(inner: &str) -> Option<String> {
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.contains('<') {
        Some(trimmed.to_string())
    } else {
        Some(decode_entities(trimmed))
    }
}

/// Decodes XML character references, leaving the text as written if it has a bare `&`.
pub(crate) fn decode_entities(text: &str) -> String {
    quick_xml::escape::unescape(text)
        .unwrap_or(Cow::Borrowed(text))
        .into_owned()
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Flattens elements into the text to be spoken, ignoring any speech settings.
///
/// Pieces of text are separated by a space unless the following piece starts with closing
/// punctuation, so `<sub alias="x">y</sub>.` reads "y." rather than "y .".
pub fn extract_text(elements: &[Element]) -> String {
    let mut pieces = vec![];
    collect_text(elements, &mut pieces);

    let mut text = String::new();
    for piece in pieces {
        if !text.is_empty() && !piece.starts_with(CLOSING_PUNCTUATION) {
            text.push(' ');
        }
        text.push_str(piece);
    }
    text.trim().to_string()
}

fn collect_text<'a>(elements: &'a [Element], pieces: &mut Vec<&'a str>) {
    for element in elements {
        match element {
            Element::Text(text) if !text.is_empty() => pieces.push(text),
            Element::Text(_) => {}
            Element::Tag(tag) if tag.has_children() => collect_text(&tag.children, pieces),
            Element::Tag(tag) => {
                if let Some(content) = tag.text_content() {
                    pieces.push(content);
                }
            }
        }
    }
}
