//! MPC-HC media player adapter
//!
//! Holds the last status snapshot of one MPC-HC instance and maps transport
//! operations onto fixed command IDs.
//!
//! ## Poll tick
//!
//! ```text
//! fetch variables.html
//!   ok               → replace raw variables, re-normalize, available = true
//!   connection fail  → clear raw variables, playback = Off, available = false
//!                      (error logged only on the available → unavailable edge)
//!   anything else    → error logged, state untouched
//! ```
//!
//! Normalized fields that were already computed (title, duration, position,
//! volume, muted) are not reset on failure; they keep their last known value.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::adapters::client::{log_dispatch_failure, MpcHcClient};
use crate::adapters::commands::CommandCode;
use crate::adapters::state::{NormalizedState, PlaybackState, PlayerState, RawVariables};
use crate::adapters::traits::{
    entity_unique_id, DeviceInfo, EntityFeature, MediaPlayerEntity, PlayerSnapshot, Refreshable,
    TransportCommand,
};
use crate::bus::{BusEvent, SharedBus};

pub const MEDIA_CONTENT_TYPE: &str = "video";

const SUPPORTED_FEATURES: &[EntityFeature] = &[
    EntityFeature::TurnOff,
    EntityFeature::NextTrack,
    EntityFeature::Pause,
    EntityFeature::PreviousTrack,
    EntityFeature::VolumeStep,
    EntityFeature::VolumeMute,
    EntityFeature::Play,
    EntityFeature::Stop,
    EntityFeature::Seek,
];

#[derive(Default)]
struct PlayerInner {
    variables: RawVariables,
    state: NormalizedState,
    available: bool,
}

/// Media player entity for one MPC-HC endpoint
#[derive(Clone)]
pub struct MpcHcMediaPlayer {
    name: String,
    unique_id: String,
    client: MpcHcClient,
    inner: Arc<RwLock<PlayerInner>>,
    bus: SharedBus,
}

impl MpcHcMediaPlayer {
    pub fn new(name: impl Into<String>, base_url: &str, bus: SharedBus) -> Self {
        let client = MpcHcClient::new(base_url);
        Self {
            name: name.into(),
            unique_id: entity_unique_id("media_player", client.base_url()),
            client,
            inner: Arc::new(RwLock::new(PlayerInner::default())),
            bus,
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// One poll tick: fetch, normalize, reconcile availability.
    pub async fn update(&self) {
        debug!("MPC-HC update: {}", self.base_url());

        match self.client.fetch_variables().await {
            Ok(vars) => {
                let now = Utc::now();
                let was_available = {
                    let mut inner = self.inner.write().await;
                    inner.state.apply(&vars, now);
                    inner.variables = vars;
                    std::mem::replace(&mut inner.available, true)
                };

                if !was_available {
                    info!("Connected to MPC-HC at: {}", self.base_url());
                    self.bus.publish(BusEvent::PlayerConnected {
                        url: self.base_url().to_string(),
                    });
                }
            }
            Err(e) if e.is_connection_failure() => {
                debug!("MPC-HC poll failed: {}", e);
                let was_available = {
                    let mut inner = self.inner.write().await;
                    inner.variables.clear();
                    inner.state.playback_state = PlaybackState::Off;
                    std::mem::replace(&mut inner.available, false)
                };

                if was_available {
                    error!("Could not connect to MPC-HC at: {}", self.base_url());
                    self.bus.publish(BusEvent::PlayerDisconnected {
                        url: self.base_url().to_string(),
                    });
                }
            }
            Err(e) => error!("MPC-HC poll error: {}", e),
        }
    }

    // -------------------------------------------------------------------------
    // State accessors
    // -------------------------------------------------------------------------

    pub async fn available(&self) -> bool {
        self.inner.read().await.available
    }

    pub async fn state(&self) -> PlayerState {
        let inner = self.inner.read().await;
        PlayerState::derive(inner.available, inner.state.playback_state)
    }

    pub async fn playback_state(&self) -> PlaybackState {
        self.inner.read().await.state.playback_state
    }

    pub async fn media_title(&self) -> Option<String> {
        self.inner.read().await.state.title.clone()
    }

    pub async fn media_duration(&self) -> u64 {
        self.inner.read().await.state.duration_secs
    }

    pub async fn media_position(&self) -> u64 {
        self.inner.read().await.state.position_secs
    }

    pub async fn media_position_updated_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.state.position_updated_at
    }

    pub async fn volume_level(&self) -> f64 {
        self.inner.read().await.state.volume
    }

    pub async fn is_volume_muted(&self) -> bool {
        self.inner.read().await.state.muted
    }

    /// Raw variables from the last successful poll (empty after a failure)
    pub async fn variables(&self) -> RawVariables {
        self.inner.read().await.variables.clone()
    }

    pub async fn normalized_state(&self) -> NormalizedState {
        self.inner.read().await.state.clone()
    }

    // -------------------------------------------------------------------------
    // Transport operations
    // -------------------------------------------------------------------------

    pub async fn turn_off(&self) {
        self.send(CommandCode::QUIT).await
    }

    pub async fn volume_up(&self) {
        self.send(CommandCode::VOLUME_UP).await
    }

    pub async fn volume_down(&self) {
        self.send(CommandCode::VOLUME_DOWN).await
    }

    /// MPC-HC exposes only a mute toggle.
    pub async fn mute_volume(&self, mute: bool) {
        debug!("Mute requested: {}", mute);
        self.send(CommandCode::VOLUME_MUTE).await
    }

    pub async fn media_play(&self) {
        self.send(CommandCode::PLAY).await
    }

    pub async fn media_play_pause(&self) {
        self.send(CommandCode::PLAY_PAUSE).await
    }

    pub async fn media_pause(&self) {
        self.send(CommandCode::PAUSE).await
    }

    pub async fn media_stop(&self) {
        self.send(CommandCode::STOP).await
    }

    pub async fn media_next_track(&self) {
        self.send(CommandCode::NEXT_FILE).await
    }

    pub async fn media_previous_track(&self) {
        self.send(CommandCode::PREVIOUS_FILE).await
    }

    /// Jump to `position` seconds, then re-poll so the new position is
    /// visible immediately and tell observers.
    pub async fn media_seek(&self, position: f64) {
        if let Err(e) = self.client.seek(position).await {
            log_dispatch_failure(&CommandCode::SEEK.to_string(), self.base_url(), &e);
            return;
        }
        self.bus.publish(BusEvent::CommandSent {
            url: self.base_url().to_string(),
            wm_command: CommandCode::SEEK.to_string(),
        });

        self.update().await;

        let (state, snapshot) = {
            let inner = self.inner.read().await;
            (
                PlayerState::derive(inner.available, inner.state.playback_state),
                inner.state.clone(),
            )
        };
        self.bus.publish(BusEvent::StateRefreshed {
            url: self.base_url().to_string(),
            state,
            snapshot,
        });
    }

    async fn send(&self, code: CommandCode) {
        let wm_command = code.to_string();
        match self.client.command(&wm_command).await {
            Ok(()) => self.bus.publish(BusEvent::CommandSent {
                url: self.base_url().to_string(),
                wm_command,
            }),
            Err(e) => log_dispatch_failure(&wm_command, self.base_url(), &e),
        }
    }
}

#[async_trait]
impl Refreshable for MpcHcMediaPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn refresh(&self) {
        self.update().await
    }
}

#[async_trait]
impl MediaPlayerEntity for MpcHcMediaPlayer {
    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn device_info(&self) -> DeviceInfo {
        DeviceInfo::new(&self.name, self.base_url())
    }

    fn supported_features(&self) -> &'static [EntityFeature] {
        SUPPORTED_FEATURES
    }

    async fn snapshot(&self) -> PlayerSnapshot {
        let inner = self.inner.read().await;
        PlayerSnapshot {
            unique_id: self.unique_id.clone(),
            name: self.name.clone(),
            available: inner.available,
            state: PlayerState::derive(inner.available, inner.state.playback_state),
            playback_state: inner.state.playback_state,
            media_content_type: MEDIA_CONTENT_TYPE.to_string(),
            title: inner.state.title.clone(),
            duration_secs: inner.state.duration_secs,
            position_secs: inner.state.position_secs,
            position_updated_at: inner.state.position_updated_at,
            volume_level: inner.state.volume,
            is_volume_muted: inner.state.muted,
        }
    }

    async fn handle_command(&self, command: TransportCommand) {
        match command {
            TransportCommand::Mute(mute) => self.mute_volume(mute).await,
            TransportCommand::Seek(position) => self.media_seek(position).await,
            other => self.send(other.code()).await,
        }
    }
}
