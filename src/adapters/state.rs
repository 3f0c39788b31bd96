//! Normalized MPC-HC player state
//!
//! Turns the raw `variables.html` key/value snapshot into typed fields. Every
//! field is recomputed on each successful poll; a field whose raw value fails
//! to parse keeps whatever it held before.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::ParseError;

/// Raw status variables, keyed by the `id` attribute of each `<p>` element.
/// Values are lowercased at fetch time.
pub type RawVariables = HashMap<String, String>;

const DEFAULT_TIME: &str = "00:00:00";

/// Coarse playback state reported by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Off,
    Playing,
    Paused,
    Idle,
}

impl PlaybackState {
    /// Map the `state` variable: absent is Off, `2` Playing, `1` Paused,
    /// anything else Idle.
    pub fn from_variables(vars: &RawVariables) -> Self {
        match vars.get("state").map(String::as_str) {
            None => PlaybackState::Off,
            Some("2") => PlaybackState::Playing,
            Some("1") => PlaybackState::Paused,
            Some(_) => PlaybackState::Idle,
        }
    }
}

/// State exposed to the host: playback state, or Unavailable when the last
/// poll could not reach the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    Unavailable,
    Off,
    Playing,
    Paused,
    Idle,
}

impl PlayerState {
    pub fn derive(available: bool, playback: PlaybackState) -> Self {
        if !available {
            return PlayerState::Unavailable;
        }
        match playback {
            PlaybackState::Off => PlayerState::Off,
            PlaybackState::Playing => PlayerState::Playing,
            PlaybackState::Paused => PlayerState::Paused,
            PlaybackState::Idle => PlayerState::Idle,
        }
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlayerState::Unavailable => "unavailable",
            PlayerState::Off => "off",
            PlayerState::Playing => "playing",
            PlayerState::Paused => "paused",
            PlayerState::Idle => "idle",
        };
        f.write_str(s)
    }
}

/// Typed view of the last successful poll.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedState {
    pub playback_state: PlaybackState,
    pub duration_secs: u64,
    pub position_secs: u64,
    /// When `position_secs` was sampled, so the host can extrapolate.
    pub position_updated_at: Option<DateTime<Utc>>,
    pub title: Option<String>,
    /// 0.0 ..= 1.0
    pub volume: f64,
    pub muted: bool,
}

impl NormalizedState {
    /// Reconcile with a freshly fetched snapshot taken at `now`.
    pub fn apply(&mut self, vars: &RawVariables, now: DateTime<Utc>) {
        self.playback_state = PlaybackState::from_variables(vars);

        self.position_updated_at = Some(now);
        match parse_timing(vars) {
            Ok((duration, position)) => {
                self.duration_secs = duration;
                self.position_secs = position;
            }
            Err(e) => debug!("Keeping previous duration/position: {}", e),
        }

        self.title = vars.get("file").and_then(|f| title_from_file(f));

        match parse_volume(vars) {
            Ok(volume) => self.volume = volume,
            Err(raw) => debug!("Keeping previous volume, unparseable level {:?}", raw),
        }

        self.muted = vars.get("muted").is_some_and(|m| m == "1");
    }
}

/// Duration and position move together: if either string is malformed,
/// neither is updated.
fn parse_timing(vars: &RawVariables) -> Result<(u64, u64), ParseError> {
    let duration = parse_hms(
        vars.get("durationstring")
            .map(String::as_str)
            .unwrap_or(DEFAULT_TIME),
    )?;
    let position = parse_hms(
        vars.get("positionstring")
            .map(String::as_str)
            .unwrap_or(DEFAULT_TIME),
    )?;
    Ok((duration, position))
}

fn parse_volume(vars: &RawVariables) -> Result<f64, String> {
    match vars.get("volumelevel") {
        None => Ok(0.0),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(|level| (level as f64 / 100.0).clamp(0.0, 1.0))
            .map_err(|_| raw.clone()),
    }
}

/// Parse `H:MM:SS` into seconds.
pub fn parse_hms(s: &str) -> Result<u64, ParseError> {
    let fields: Vec<&str> = s.split(':').collect();
    if fields.len() != 3 {
        return Err(ParseError::FieldCount(fields.len()));
    }

    let mut total = 0u64;
    for (field, scale) in fields.iter().zip([3600u64, 60, 1]) {
        let value: u64 = field
            .trim()
            .parse()
            .map_err(|_| ParseError::NotANumber(field.to_string()))?;
        total = value
            .checked_mul(scale)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(|| ParseError::OutOfRange(s.to_string()))?;
    }
    Ok(total)
}

/// Strip the trailing extension from a file name: `a.b.mkv` → `a.b`.
///
/// A name that is only an extension (`.mkv`) yields no title rather than an
/// empty one.
pub fn title_from_file(file: &str) -> Option<String> {
    let title = match file.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => file,
    };
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Format seconds the way MPC-HC's seek form expects: `H:MM:SS`, with a
/// microsecond fraction only when there is one.
pub fn format_position(seconds: f64) -> String {
    let micros_total = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1_000_000.0).round() as u64
    } else {
        0
    };
    let whole = micros_total / 1_000_000;
    let micros = micros_total % 1_000_000;

    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;

    if micros == 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}:{:02}.{:06}", hours, minutes, secs, micros)
    }
}
