//! MPC-HC remote adapter
//!
//! One-way command dispatch by symbolic name. Names are resolved through the
//! static command table; unknown names are sent as-is.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::adapters::client::{log_dispatch_failure, MpcHcClient};
use crate::adapters::commands;
use crate::adapters::traits::{entity_unique_id, DeviceInfo, EntityFeature, RemoteEntity};
use crate::bus::{BusEvent, SharedBus};

pub const DEFAULT_NUM_REPEATS: u32 = 1;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(400);

const SUPPORTED_FEATURES: &[EntityFeature] = &[EntityFeature::Activity];

/// Remote entity for one MPC-HC endpoint
#[derive(Clone)]
pub struct MpcHcRemote {
    name: String,
    unique_id: String,
    client: MpcHcClient,
    bus: SharedBus,
}

impl MpcHcRemote {
    pub fn new(name: impl Into<String>, base_url: &str, bus: SharedBus) -> Self {
        let client = MpcHcClient::new(base_url);
        Self {
            name: name.into(),
            unique_id: entity_unique_id("remote", client.base_url()),
            client,
            bus,
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Send every command in `commands`, in order, `num_repeats` times.
    ///
    /// `delay` is informational: pacing between commands belongs to the caller.
    pub async fn send_commands<S: AsRef<str>>(
        &self,
        commands: &[S],
        num_repeats: u32,
        delay: Duration,
    ) {
        debug!(
            commands = %commands.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(","),
            num_repeats,
            delay = ?delay,
            "Remote send_command"
        );

        for _ in 0..num_repeats {
            for name in commands {
                let wm_command = commands::resolve(name.as_ref());
                debug!("Remote command {}", wm_command);
                match self.client.command(&wm_command).await {
                    Ok(()) => self.bus.publish(BusEvent::CommandSent {
                        url: self.base_url().to_string(),
                        wm_command,
                    }),
                    Err(e) => log_dispatch_failure(&wm_command, self.base_url(), &e),
                }
            }
        }
    }
}

#[async_trait]
impl RemoteEntity for MpcHcRemote {
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

    async fn send_command(&self, commands: &[String], num_repeats: u32, delay: Duration) {
        self.send_commands(commands, num_repeats, delay).await
    }
}
