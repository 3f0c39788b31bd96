//! Configuration management

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_NAME: &str = "MPC-HC";
pub const DEFAULT_PLAYER_PORT: u16 = 13579;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Listen port of the host HTTP API
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default)]
    pub player: Option<PlayerConfig>,
}

fn default_port() -> u16 {
    8099
}

fn default_poll_interval_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub host: String,
    #[serde(default = "default_player_port")]
    pub port: u16,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_player_port() -> u16 {
    DEFAULT_PLAYER_PORT
}

impl PlayerConfig {
    /// `http://host:port` for this player. A host without a scheme gets
    /// `http://`.
    pub fn base_url(&self) -> Result<String> {
        let host = self.host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(anyhow!("MPC-HC host is empty"));
        }
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        };

        let base = format!("{}:{}", host, self.port);
        let parsed = url::Url::parse(&base)
            .map_err(|e| anyhow!("Invalid MPC-HC host {:?}: {}", self.host, e))?;
        if parsed.host_str().is_none() {
            return Err(anyhow!("Invalid MPC-HC host {:?}: no host name", self.host));
        }
        Ok(base)
    }
}

/// Get config directory (MPCHC_CONFIG_DIR, XDG_CONFIG_HOME or platform default)
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MPCHC_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join("Library/Application Support/mpc-hc-control");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("mpc-hc-control");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".config/mpc-hc-control");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("mpc-hc-control");
        }
    }

    PathBuf::from(".")
}

pub fn load_config() -> Result<Config> {
    let config_dir = get_config_dir();

    let mut builder = ::config::Config::builder()
        .set_default("port", default_port() as i64)?
        .set_default("poll_interval_secs", default_poll_interval_secs() as i64)?
        .add_source(
            ::config::File::with_name(&config_dir.join("config").to_string_lossy()).required(false),
        )
        // MPCHC_PORT, MPCHC_PLAYER__HOST, ...
        .add_source(
            ::config::Environment::with_prefix("MPCHC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    // Shorthand env vars: MPC_HOST > config file
    if let Ok(host) = std::env::var("MPC_HOST") {
        builder = builder.set_override("player.host", host)?;
    }
    if let Ok(port) = std::env::var("MPC_PORT") {
        if let Ok(port_num) = port.parse::<u16>() {
            builder = builder.set_override("player.port", port_num as i64)?;
        }
    }
    if let Ok(name) = std::env::var("MPC_NAME") {
        builder = builder.set_override("player.name", name)?;
    }

    let config = builder.build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn player(host: &str, port: u16) -> PlayerConfig {
        PlayerConfig {
            name: DEFAULT_NAME.to_string(),
            host: host.to_string(),
            port,
        }
    }

    fn clear_env() {
        for var in [
            "MPC_HOST",
            "MPC_PORT",
            "MPC_NAME",
            "MPCHC_PORT",
            "MPCHC_PLAYER__HOST",
            "MPCHC_POLL_INTERVAL_SECS",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn base_url_adds_scheme() {
        assert_eq!(
            player("192.168.1.20", 13579).base_url().unwrap(),
            "http://192.168.1.20:13579"
        );
        assert_eq!(
            player("http://htpc/", 8080).base_url().unwrap(),
            "http://htpc:8080"
        );
    }

    #[test]
    fn base_url_rejects_empty_host() {
        assert!(player("  ", 13579).base_url().is_err());
        assert!(player("http://", 13579).base_url().is_err());
    }

    #[test]
    #[serial]
    fn defaults_without_player() {
        clear_env();
        env::set_var("MPCHC_CONFIG_DIR", "/tmp/mpchc-test-nonexistent");

        let config = load_config().expect("config should load");

        env::remove_var("MPCHC_CONFIG_DIR");

        assert_eq!(config.port, 8099);
        assert_eq!(config.poll_interval_secs, 10);
        assert!(config.player.is_none());
    }

    #[test]
    #[serial]
    fn mpc_host_env_enables_player() {
        clear_env();
        env::set_var("MPC_HOST", "127.0.0.1");
        env::set_var("MPCHC_CONFIG_DIR", "/tmp/mpchc-test-nonexistent");

        let config = load_config().expect("config should load");

        clear_env();
        env::remove_var("MPCHC_CONFIG_DIR");

        let player = config.player.expect("player should be configured");
        assert_eq!(player.host, "127.0.0.1");
        assert_eq!(player.port, DEFAULT_PLAYER_PORT);
        assert_eq!(player.name, DEFAULT_NAME);
    }

    #[test]
    #[serial]
    fn config_file_is_read() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "port = 9000\npoll_interval_secs = 3\n\n[player]\nname = \"Den\"\nhost = \"htpc\"\nport = 13580\n",
        )
        .unwrap();
        env::set_var("MPCHC_CONFIG_DIR", dir.path());

        let config = load_config().expect("config should load");

        env::remove_var("MPCHC_CONFIG_DIR");

        assert_eq!(config.port, 9000);
        assert_eq!(config.poll_interval_secs, 3);
        let player = config.player.unwrap();
        assert_eq!(player.name, "Den");
        assert_eq!(player.base_url().unwrap(), "http://htpc:13580");
    }

    #[test]
    #[serial]
    fn mpc_port_overrides_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[player]\nhost = \"htpc\"\nport = 13580\n",
        )
        .unwrap();
        env::set_var("MPCHC_CONFIG_DIR", dir.path());
        env::set_var("MPC_PORT", "13600");

        let config = load_config().expect("config should load");

        clear_env();
        env::remove_var("MPCHC_CONFIG_DIR");

        assert_eq!(config.player.unwrap().port, 13600);
    }
}
