use thiserror::Error;

/// Startup and serving failures of the relay process.
#[derive(Debug, Error)]
pub enum RelayServerError {
    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidConfig {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("relay server stopped: {0}")]
    Serve(#[source] std::io::Error),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

impl RelayServerError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidConfig { .. } => 2,
            Self::Bind { .. } | Self::Serve(_) => 10,
            Self::Client(_) => 1,
        }
    }
}
