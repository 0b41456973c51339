use std::net::SocketAddr;
use std::path::PathBuf;

use crate::store::{IdStrategy, PersistMode};

/// Page size used by the browser client and the CLI when none is given.
pub const CLIENT_PAGE_LIMIT: u32 = 5;

/// Configuration for the API server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    /// JSON array of assignments, loaded once at startup.
    pub data_file: PathBuf,
    /// How ids are handed out to newly created assignments.
    pub id_strategy: IdStrategy,
    /// Which mutations rewrite the data file.
    pub persist_mode: PersistMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            // SAFETY: This is a hardcoded valid address that will always parse
            listen_addr: "127.0.0.1:3000"
                .parse()
                .expect("default listen address is valid"),
            data_file: PathBuf::from("data.json"),
            id_strategy: IdStrategy::default(),
            persist_mode: PersistMode::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(listen_addr: SocketAddr, data_file: impl Into<PathBuf>) -> Self {
        Self {
            listen_addr,
            data_file: data_file.into(),
            ..Default::default()
        }
    }

    pub fn with_id_strategy(mut self, id_strategy: IdStrategy) -> Self {
        self.id_strategy = id_strategy;
        self
    }

    pub fn with_persist_mode(mut self, persist_mode: PersistMode) -> Self {
        self.persist_mode = persist_mode;
        self
    }
}

/// Configuration for clients of the API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the server, e.g. `http://127.0.0.1:3000`
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// URL of the assignments collection, without a trailing slash.
    pub fn assignments_url(&self) -> String {
        format!("{}/api/assignments", self.base_url.trim_end_matches('/'))
    }
}
