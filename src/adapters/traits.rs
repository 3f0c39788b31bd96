use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::adapters::commands::CommandCode;
use crate::adapters::state::{PlaybackState, PlayerState};

/// Integration domain used in device identifiers
pub const DOMAIN: &str = "mpchc";
/// Manufacturer reported for every device
pub const MANUFACTURER: &str = "MPC-HC";

// =============================================================================
// Refreshable - anything the poll scheduler can tick
// =============================================================================

/// One-shot state refresh, invoked periodically by [`crate::adapters::handle::PollHandle`].
#[async_trait]
pub trait Refreshable: Send + Sync + 'static {
    /// Short label for logs
    fn name(&self) -> &str;

    /// Poll the device once. Must not fail: errors are absorbed into state.
    async fn refresh(&self);
}

// =============================================================================
// Entity identity
// =============================================================================

/// Device registry entry shared by the media player and the remote of one endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// (domain, base URL)
    pub identifiers: (String, String),
    pub name: String,
    pub manufacturer: String,
    pub model: String,
}

impl DeviceInfo {
    pub fn new(name: &str, base_url: &str) -> Self {
        Self {
            identifiers: (DOMAIN.to_string(), base_url.to_string()),
            name: name.to_string(),
            manufacturer: MANUFACTURER.to_string(),
            model: String::new(),
        }
    }
}

/// Build an entity ID like `media_player.127.0.0.1:13579_media_player`.
pub fn entity_unique_id(platform: &str, base_url: &str) -> String {
    let host = base_url
        .strip_prefix("http://")
        .or_else(|| base_url.strip_prefix("https://"))
        .unwrap_or(base_url);
    format!("{}.{}_{}", platform, host, platform)
}

/// Capabilities an entity advertises to its host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityFeature {
    TurnOff,
    NextTrack,
    Pause,
    PreviousTrack,
    VolumeStep,
    VolumeMute,
    Play,
    Stop,
    Seek,
    /// Remote: named command dispatch
    Activity,
}

// =============================================================================
// Media player capability
// =============================================================================

/// Transport operation sent to a media player
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCommand {
    TurnOff,
    VolumeUp,
    VolumeDown,
    /// MPC-HC only toggles; the requested state is informational
    Mute(bool),
    Play,
    PlayPause,
    Pause,
    Stop,
    Next,
    Previous,
    /// Absolute position in seconds
    Seek(f64),
}

impl TransportCommand {
    /// The fixed command ID behind each operation.
    pub fn code(&self) -> CommandCode {
        match self {
            TransportCommand::TurnOff => CommandCode::QUIT,
            TransportCommand::VolumeUp => CommandCode::VOLUME_UP,
            TransportCommand::VolumeDown => CommandCode::VOLUME_DOWN,
            TransportCommand::Mute(_) => CommandCode::VOLUME_MUTE,
            TransportCommand::Play => CommandCode::PLAY,
            TransportCommand::PlayPause => CommandCode::PLAY_PAUSE,
            TransportCommand::Pause => CommandCode::PAUSE,
            TransportCommand::Stop => CommandCode::STOP,
            TransportCommand::Next => CommandCode::NEXT_FILE,
            TransportCommand::Previous => CommandCode::PREVIOUS_FILE,
            TransportCommand::Seek(_) => CommandCode::SEEK,
        }
    }

    /// Parse an action name as used by the HTTP API.
    pub fn from_action(action: &str, value: Option<f64>) -> Option<Self> {
        let command = match action {
            "turn_off" => TransportCommand::TurnOff,
            "volume_up" => TransportCommand::VolumeUp,
            "volume_down" => TransportCommand::VolumeDown,
            "mute_volume" | "mute" => TransportCommand::Mute(value.map_or(true, |v| v != 0.0)),
            "play" => TransportCommand::Play,
            "play_pause" => TransportCommand::PlayPause,
            "pause" => TransportCommand::Pause,
            "stop" => TransportCommand::Stop,
            "next_track" | "next" => TransportCommand::Next,
            "previous_track" | "previous" | "prev" => TransportCommand::Previous,
            "seek" => TransportCommand::Seek(value?),
            _ => return None,
        };
        Some(command)
    }
}

/// Read-only view of a media player, as handed to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub unique_id: String,
    pub name: String,
    pub available: bool,
    pub state: PlayerState,
    pub playback_state: PlaybackState,
    pub media_content_type: String,
    pub title: Option<String>,
    pub duration_secs: u64,
    pub position_secs: u64,
    pub position_updated_at: Option<DateTime<Utc>>,
    pub volume_level: f64,
    pub is_volume_muted: bool,
}

#[async_trait]
pub trait MediaPlayerEntity: Send + Sync {
    fn unique_id(&self) -> &str;
    fn name(&self) -> &str;
    fn device_info(&self) -> DeviceInfo;
    fn supported_features(&self) -> &'static [EntityFeature];

    async fn snapshot(&self) -> PlayerSnapshot;

    /// Fire-and-forget: never reports delivery
    async fn handle_command(&self, command: TransportCommand);
}

// =============================================================================
// Remote capability
// =============================================================================

#[async_trait]
pub trait RemoteEntity: Send + Sync {
    fn unique_id(&self) -> &str;
    fn name(&self) -> &str;
    fn device_info(&self) -> DeviceInfo;
    fn supported_features(&self) -> &'static [EntityFeature];

    /// Dispatch `commands` in order, `num_repeats` times over.
    async fn send_command(&self, commands: &[String], num_repeats: u32, delay: Duration);
}
