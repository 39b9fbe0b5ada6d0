use std::{env, fmt::Display, net::IpAddr, str::FromStr};

use tracing::{info, warn};

use crate::deck::notifier::DEFAULT_CHANNEL_CAPACITY;

pub const HOST_VAR: &str = "LIVE_DECK_HOST";
pub const PORT_VAR: &str = "LIVE_DECK_PORT";
pub const NOTIFY_CAPACITY_VAR: &str = "LIVE_DECK_NOTIFY_CAPACITY";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Buffered invalidation signals per listener before it starts lagging.
    pub notify_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            notify_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: try_load(&lookup, HOST_VAR, defaults.host),
            port: try_load(&lookup, PORT_VAR, defaults.port),
            notify_capacity: try_load(&lookup, NOTIFY_CAPACITY_VAR, defaults.notify_capacity),
        }
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };
    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
        default
    })
}
