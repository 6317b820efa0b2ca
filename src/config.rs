//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use std::path::Path;

use ipnetwork::IpNetwork;
use serde::Deserialize;

use crate::neighbor::Metrics;

/// Typed configuration consumed by the core. Parsing the textual source
/// (here, a JSON file) is ambient plumbing around the core, not part of it;
/// the core never inspects anything but this struct.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub router_id: String,
    pub listen_port: u16,
    pub network_map: BTreeMap<String, IpNetwork>,
    pub neighbors: Vec<NeighborConfig>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NeighborConfig {
    pub id: String,
    pub ip: IpAddr,
    pub port: u16,
    #[serde(default)]
    pub metrics: Metrics,
}

// ===== impl Config =====

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        serde_json::from_str(&text).map_err(ConfigError::Parse)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(..) => write!(f, "failed to read configuration file"),
            ConfigError::Parse(..) => {
                write!(f, "failed to parse configuration file")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(error) => Some(error),
            ConfigError::Parse(error) => Some(error),
        }
    }
}
