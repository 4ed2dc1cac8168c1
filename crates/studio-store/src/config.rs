use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use studio_core::{Plan, DEFAULT_FREE_MONTHLY_LIMIT};

use crate::paths;

const CONFIG_FILE_PATH: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudioConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub plan: Plan,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_monthly_limit")]
    pub monthly_limit: u32,
}

fn default_monthly_limit() -> u32 {
    DEFAULT_FREE_MONTHLY_LIMIT
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            model: None,
            plan: Plan::Free,
            data_dir: None,
            monthly_limit: DEFAULT_FREE_MONTHLY_LIMIT,
        }
    }
}

impl StudioConfig {
    /// `~/.content-studio/config.json`, else `./config.toml`, then environment overrides.
    pub fn new() -> Self {
        Self::load_from(&paths::config_json_path(), Path::new(CONFIG_FILE_PATH), |name| {
            std::env::var(name).ok()
        })
    }

    pub fn load_from<F>(json_path: &Path, toml_path: &Path, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = StudioConfig::default();

        let mut loaded = false;
        if json_path.exists() {
            match std::fs::read_to_string(json_path) {
                Ok(content) => match serde_json::from_str::<StudioConfig>(&content) {
                    Ok(file_config) => {
                        config = file_config;
                        loaded = true;
                    }
                    Err(e) => log::warn!("Ignoring {}: {}", json_path.display(), e),
                },
                Err(e) => log::warn!("Failed to read {}: {}", json_path.display(), e),
            }
        }

        if !loaded && toml_path.exists() {
            if let Ok(content) = std::fs::read_to_string(toml_path) {
                match toml::from_str::<StudioConfig>(&content) {
                    Ok(file_config) => config = file_config,
                    Err(e) => log::warn!("Ignoring {}: {}", toml_path.display(), e),
                }
            }
        }

        if let Some(api_key) = env("API_KEY") {
            config.api_key = Some(api_key);
        }
        if let Some(api_base) = env("API_BASE") {
            config.api_base = Some(api_base);
        }
        if let Some(model) = env("MODEL") {
            config.model = Some(model);
        }
        if let Some(plan) = env("STUDIO_PLAN") {
            match plan.parse() {
                Ok(plan) => config.plan = plan,
                Err(e) => log::warn!("Ignoring STUDIO_PLAN: {}", e),
            }
        }
        if let Some(data_dir) = env("STUDIO_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(data_dir));
        }

        config
    }

    /// Directory holding the persisted studio state.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(paths::default_data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_files() {
        let dir = tempdir().unwrap();
        let config = StudioConfig::load_from(
            &dir.path().join("config.json"),
            &dir.path().join("config.toml"),
            no_env,
        );
        assert_eq!(config, StudioConfig::default());
        assert_eq!(config.monthly_limit, 10);
    }

    #[test]
    fn json_wins_over_toml() {
        let dir = tempdir().unwrap();
        let json_path = dir.path().join("config.json");
        let toml_path = dir.path().join("config.toml");
        std::fs::write(&json_path, r#"{"model": "from-json", "plan": "pro"}"#).unwrap();
        std::fs::write(&toml_path, "model = \"from-toml\"\n").unwrap();

        let config = StudioConfig::load_from(&json_path, &toml_path, no_env);
        assert_eq!(config.model.as_deref(), Some("from-json"));
        assert_eq!(config.plan, Plan::Pro);
    }

    #[test]
    fn toml_is_used_when_json_is_missing() {
        let dir = tempdir().unwrap();
        let toml_path = dir.path().join("config.toml");
        std::fs::write(&toml_path, "api_base = \"http://localhost:9000\"\nmonthly_limit = 3\n")
            .unwrap();

        let config = StudioConfig::load_from(&dir.path().join("missing.json"), &toml_path, no_env);
        assert_eq!(config.api_base.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.monthly_limit, 3);
    }

    #[test]
    fn environment_overrides_files() {
        let dir = tempdir().unwrap();
        let json_path = dir.path().join("config.json");
        std::fs::write(&json_path, r#"{"api_key": "file-key"}"#).unwrap();

        let env: HashMap<&str, &str> = HashMap::from([
            ("API_KEY", "env-key"),
            ("STUDIO_PLAN", "pro"),
            ("STUDIO_DATA_DIR", "/tmp/studio"),
        ]);
        let config = StudioConfig::load_from(&json_path, &dir.path().join("none.toml"), |name| {
            env.get(name).map(|v| v.to_string())
        });

        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.plan, Plan::Pro);
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/studio"));
    }

    #[test]
    fn unknown_plan_is_ignored() {
        let dir = tempdir().unwrap();
        let config = StudioConfig::load_from(
            &dir.path().join("a.json"),
            &dir.path().join("b.toml"),
            |name| (name == "STUDIO_PLAN").then(|| "platinum".to_string()),
        );
        assert_eq!(config.plan, Plan::Free);
    }
}
