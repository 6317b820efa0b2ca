//
// SPDX-License-Identifier: MIT
//

use std::fmt;

use tracing::error;

use crate::config::ConfigError;

/// Fatal startup errors. Everything else the core encounters (malformed
/// datagrams, send failures, unresolvable identifiers) is recoverable and
/// handled inline per the tick's own disposition, not funneled through here.
#[derive(Debug)]
pub enum Error {
    ConfigLoad(ConfigError),
    SocketBind(std::io::Error),
}

impl Error {
    pub fn log(&self) {
        match self {
            Error::ConfigLoad(error) => {
                error!(%error, "{}", self);
            }
            Error::SocketBind(error) => {
                error!(%error, "{}", self);
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigLoad(..) => write!(f, "failed to load configuration"),
            Error::SocketBind(..) => write!(f, "failed to bind listening socket"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ConfigLoad(error) => Some(error),
            Error::SocketBind(error) => Some(error),
        }
    }
}
