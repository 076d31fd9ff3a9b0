//! Normalisation of `prosody` and `break` attribute values.
//!
//! Every interpreter here is total: a value that can't be understood gives the documented
//! default instead of an error, so a typo in one attribute never loses the text around it.
use crate::elements::Strength;
use anyhow::{bail, Result};

/// Rate multiplier used when a `rate` can't be interpreted.
pub const DEFAULT_RATE: f64 = 1.0;
/// Pitch multiplier used when a `pitch` can't be interpreted.
pub const DEFAULT_PITCH: f64 = 1.0;
/// Volume used when a `volume` can't be interpreted, the same as "medium".
pub const DEFAULT_VOLUME: f64 = 0.75;
/// Pause in seconds used for a `break` without a usable `time` or `strength`.
pub const DEFAULT_BREAK: f64 = 0.25;

/// Pitch in Hz that maps onto a multiplier of `1.0`.
const PITCH_BASELINE_HZ: f64 = 200.0;

/// Speaking rate multiplier from a `rate` attribute.
///
/// Accepts "x-slow" through "x-fast", a percentage of the default rate ("80%"), a multiplier
/// with an `x` suffix ("1.5x") or a bare number.
pub fn rate(value: &str) -> f64 {
    parse_rate(value).unwrap_or(DEFAULT_RATE)
}

/// Pitch multiplier from a `pitch` attribute.
///
/// Accepts "x-low" through "x-high", a percentage, a frequency in Hz relative to a 200Hz
/// baseline or a change in semitones ("+2st").
pub fn pitch(value: &str) -> f64 {
    parse_pitch(value).unwrap_or(DEFAULT_PITCH)
}

/// Volume from a `volume` attribute, between `0.0` (silent) and `2.0`.
///
/// Accepts "silent" through "x-loud" or a change in decibels ("+6dB"), where 0dB is full
/// volume (`1.0`) and every 20dB moves the volume by one.
pub fn volume(value: &str) -> f64 {
    parse_volume(value).unwrap_or(DEFAULT_VOLUME)
}

/// Pause length in seconds for a `break`.
///
/// `time` wins when it can be read, then `strength` ("none" through "x-strong"), and a break
/// with neither falls back to `default`.
pub fn break_time(time: Option<&str>, strength: Option<&str>, default: f64) -> f64 {
    if let Some(seconds) = time.and_then(|t| parse_duration(t).ok()) {
        return seconds;
    }
    strength
        .and_then(|s| s.trim().parse::<Strength>().ok())
        .map_or(default, |s| s.pause())
}

fn parse_rate(value: &str) -> Result<f64> {
    let value = value.trim().to_ascii_lowercase();
    let rate = match value.as_str() {
        "x-slow" => 0.5,
        "slow" => 0.75,
        "medium" | "default" => 1.0,
        "fast" => 1.25,
        "x-fast" => 1.5,
        value => {
            let rate = if let Some(percent) = value.strip_suffix('%') {
                parse_number(percent)? / 100.0
            } else if let Some(multiplier) = value.strip_suffix('x') {
                parse_number(multiplier)?
            } else {
                parse_number(value)?
            };
            if rate < 0.0 {
                bail!("Negative rate not allowed: '{}'", value);
            }
            rate
        }
    };
    Ok(rate)
}

fn parse_pitch(value: &str) -> Result<f64> {
    let value = value.trim().to_ascii_lowercase();
    let pitch = match value.as_str() {
        "x-low" => 0.5,
        "low" => 0.75,
        "medium" | "default" => 1.0,
        "high" => 1.25,
        "x-high" => 1.5,
        value => {
            if let Some(percent) = value.strip_suffix('%') {
                parse_number(percent)? / 100.0
            } else if let Some(hz) = value.strip_suffix("hz") {
                parse_number(hz)? / PITCH_BASELINE_HZ
            } else if let Some(semitones) = value.strip_suffix("st") {
                2f64.powf(parse_number(semitones)? / 12.0)
            } else {
                bail!("Unrecognised pitch '{}'", value);
            }
        }
    };
    Ok(pitch)
}

fn parse_volume(value: &str) -> Result<f64> {
    let value = value.trim().to_ascii_lowercase();
    let volume = match value.as_str() {
        "silent" => 0.0,
        "x-soft" => 0.25,
        "soft" => 0.5,
        "medium" | "default" => 0.75,
        "loud" => 1.0,
        "x-loud" => 1.25,
        value => match value.strip_suffix("db") {
            Some(db) => (1.0 + parse_number(db)? / 20.0).clamp(0.0, 2.0),
            None => bail!("Unrecognised volume '{}'", value),
        },
    };
    Ok(volume)
}

/// Parses a time designation into seconds. The unit is optional and defaults to seconds.
pub(crate) fn parse_duration(duration: &str) -> Result<f64> {
    let duration = duration.trim().to_ascii_lowercase();
    let seconds = if let Some(ms) = duration.strip_suffix("ms") {
        parse_number(ms)? / 1000.0
    } else if let Some(s) = duration.strip_suffix('s') {
        parse_number(s)?
    } else if duration.is_empty() {
        bail!("duration string is empty");
    } else {
        parse_number(&duration)?
    };
    if seconds < 0.0 {
        bail!("invalid time: '{}'", duration);
    }
    Ok(seconds)
}

fn parse_number(value: &str) -> Result<f64> {
    let number = value.trim().parse::<f64>()?;
    if !number.is_finite() {
        bail!("'{}' is not a finite number", value);
    }
    Ok(number)
}
