//! Path utilities

use std::path::PathBuf;

/// Data directory (~/.mapra)
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .expect("failed to locate home directory")
        .join(".mapra")
}

/// Config file location
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}
