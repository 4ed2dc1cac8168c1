use std::path::PathBuf;

/// Studio home directory (~/.content-studio)
pub fn studio_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".content-studio")
}

/// config.json path
pub fn config_json_path() -> PathBuf {
    studio_dir().join("config.json")
}

/// Default directory for persisted studio state
pub fn default_data_dir() -> PathBuf {
    studio_dir().join("data")
}
