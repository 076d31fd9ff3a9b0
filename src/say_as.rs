//! Verbalisation of `say-as` content.
//!
//! Each rendering falls back to the original text when the content doesn't look like the
//! declared type, so the worst case is the engine reading the text as written.
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::convert::Infallible;
use std::str::FromStr;

lazy_static! {
    static ref YEAR_FIRST_DATE: Regex =
        Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})$").unwrap();
    static ref SLASH_DATE: Regex = Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap();
    static ref DOTTED_DATE: Regex = Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$").unwrap();
    static ref CLOCK_TIME: Regex = Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$").unwrap();
}

const DIGIT_WORDS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

const NUMBER_WORDS: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TEXT_DATE_FORMATS: [&str; 3] = ["%B %d, %Y", "%B %d %Y", "%d %B %Y"];

/// The `interpret-as` attribute of `say-as`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum InterpretAs {
    /// Spell out every character ("characters" or "spell-out")
    Characters,
    /// Read each digit on its own
    Digits,
    /// Cardinal number ("number" or "cardinal")
    Number,
    Date,
    Time,
    Telephone,
    Currency,
    /// Anything else, read as written
    Other(String),
}

impl FromStr for InterpretAs {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = match s.trim().to_ascii_lowercase().as_str() {
            "characters" | "spell-out" => Self::Characters,
            "digits" => Self::Digits,
            "number" | "cardinal" => Self::Number,
            "date" => Self::Date,
            "time" => Self::Time,
            "telephone" => Self::Telephone,
            "currency" => Self::Currency,
            e => Self::Other(e.to_string()),
        };
        Ok(s)
    }
}

/// Renders `text` the way `interpret-as` asks for. `format` is only consulted for dates, where
/// "dmy" reads slash separated dates day first.
pub fn interpret(text: &str, interpret_as: &str, format: Option<&str>) -> String {
    let rendered = match InterpretAs::from_str(interpret_as).unwrap_or_else(|e| match e {}) {
        InterpretAs::Characters => Some(characters(text)),
        InterpretAs::Digits => Some(digits(text)),
        InterpretAs::Number => number(text),
        InterpretAs::Date => date(text, format),
        InterpretAs::Time => time(text),
        InterpretAs::Telephone => telephone(text),
        InterpretAs::Currency => currency(text),
        InterpretAs::Other(_) => None,
    };
    rendered.unwrap_or_else(|| text.to_string())
}

fn characters(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}

fn digits(text: &str) -> String {
    let mut spoken = String::with_capacity(text.len() * 4);
    for c in text.chars() {
        match c.to_digit(10) {
            Some(d) => {
                spoken.push(' ');
                spoken.push_str(DIGIT_WORDS[d as usize]);
                spoken.push(' ');
            }
            None => spoken.push(c),
        }
    }
    spoken.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn number(text: &str) -> Option<String> {
    let n = text.trim().parse::<usize>().ok()?;
    NUMBER_WORDS.get(n).map(|w| w.to_string())
}

fn date(text: &str, format: Option<&str>) -> Option<String> {
    let text = text.trim();
    let day_first = matches!(format, Some(f) if f.trim().eq_ignore_ascii_case("dmy"));

    let date = if let Some(caps) = YEAR_FIRST_DATE.captures(text) {
        ymd(&caps[1], &caps[2], &caps[3])
    } else if let Some(caps) = SLASH_DATE.captures(text) {
        if day_first {
            ymd(&caps[3], &caps[2], &caps[1])
        } else {
            ymd(&caps[3], &caps[1], &caps[2])
        }
    } else if let Some(caps) = DOTTED_DATE.captures(text) {
        ymd(&caps[3], &caps[2], &caps[1])
    } else {
        TEXT_DATE_FORMATS
            .iter()
            .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
    };
    let date = date?;
    Some(date.format("%B %-d, %Y").to_string())
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn time(text: &str) -> Option<String> {
    let caps = CLOCK_TIME.captures(text.trim())?;
    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    let seconds = match caps.get(3) {
        Some(s) => Some(s.as_str().parse::<u32>().ok()?),
        None => None,
    };
    if hours > 23 || minutes > 59 || seconds.map_or(false, |s| s > 59) {
        return None;
    }

    let suffix = if hours < 12 { "AM" } else { "PM" };
    let hours = match hours % 12 {
        0 => 12,
        h => h,
    };
    let mut spoken = format!("{}:{:02}", hours, minutes);
    if let Some(seconds) = seconds {
        spoken.push_str(&format!(":{:02}", seconds));
    }
    spoken.push(' ');
    spoken.push_str(suffix);
    Some(spoken)
}

fn telephone(text: &str) -> Option<String> {
    let digits = text.chars().filter(char::is_ascii_digit).collect::<String>();
    match digits.len() {
        10 => Some(format!(
            "{}-{}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..]
        )),
        11 if digits.starts_with('1') => Some(format!(
            "1-{}-{}-{}",
            &digits[1..4],
            &digits[4..7],
            &digits[7..]
        )),
        _ => None,
    }
}

fn currency(text: &str) -> Option<String> {
    let value = text.trim().replace(',', "");
    // the sign can come before or after the dollar sign
    let (leading_minus, value) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.as_str()),
    };
    let value = value.strip_prefix('$').unwrap_or(value).trim();
    let amount = value.parse::<f64>().ok().filter(|a| a.is_finite())?;
    if leading_minus || amount.is_sign_negative() {
        Some(format!("-${:.2}", amount.abs()))
    } else {
        Some(format!("${:.2}", amount))
    }
}
