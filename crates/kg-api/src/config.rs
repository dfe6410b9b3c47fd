//! Startup configuration, read once from the environment and injected into the server.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Store file location. Relative values resolve against the program's directory.
pub const STORE_PATH_ENV: &str = "MEMORY_FILE_PATH";
pub const LISTEN_ENV: &str = "KG_LISTEN";
pub const DEFAULT_STORE_FILE: &str = "memory.json";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8002";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot determine program directory: {0}")]
    ProgramDir(#[source] std::io::Error),
    #[error("invalid listen address {value:?}: {source}")]
    Listen {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Store path from the raw env value and the directory holding the executable.
///
/// Unset or blank gives `<program_dir>/memory.json`; absolute values are used as given;
/// relative values are joined onto `program_dir`, not the working directory.
pub fn resolve_store_path(env_value: Option<&str>, program_dir: &Path) -> PathBuf {
    match env_value.map(str::trim).filter(|v| !v.is_empty()) {
        None => program_dir.join(DEFAULT_STORE_FILE),
        Some(v) => {
            let p = Path::new(v);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                program_dir.join(p)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub store_path: PathBuf,
    pub listen: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let exe = std::env::current_exe().map_err(ConfigError::ProgramDir)?;
        let program_dir = exe
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let store = std::env::var(STORE_PATH_ENV).ok();
        let listen = std::env::var(LISTEN_ENV).ok();
        Self::from_values(store.as_deref(), listen.as_deref(), &program_dir)
    }

    pub fn from_values(
        store: Option<&str>,
        listen: Option<&str>,
        program_dir: &Path,
    ) -> Result<Self, ConfigError> {
        let listen = listen.unwrap_or(DEFAULT_LISTEN);
        let listen = listen.parse().map_err(|source| ConfigError::Listen {
            value: listen.to_string(),
            source,
        })?;
        Ok(Self {
            store_path: resolve_store_path(store, program_dir),
            listen,
        })
    }
}
