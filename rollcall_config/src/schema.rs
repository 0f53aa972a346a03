use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
    /// The single origin allowed to make cross-origin requests.
    #[serde(default = "ServerConfig::default_client_origin")]
    pub client_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            client_origin: Self::default_client_origin(),
        }
    }
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    const fn default_port() -> u16 {
        5000
    }

    fn default_client_origin() -> String {
        "http://localhost:3000".to_string()
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    Zhipu,
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "zhipu" => Ok(Self::Zhipu),
            other => anyhow::bail!("Unknown provider: {other}"),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::Zhipu => write!(f, "zhipu"),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,
    #[serde(default)]
    pub api_key: String,
    /// Model identifier; the provider's default is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "DatabaseConfig::default_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
        }
    }
}

impl DatabaseConfig {
    fn default_url() -> String {
        "sqlite://rollcall.db?mode=rwc".to_string()
    }
}

impl Config {
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("rollcall")
            .join("config.json"))
    }

    /// Load defaults, then `~/rollcall/config.json` if present, then the
    /// process environment.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with an explicit file path and environment.
    pub fn load_from<F>(path: &Path, env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Self = serde_json::from_str(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            info!("Loaded config from {}", path.display());
            config
        } else {
            Self::default()
        };

        config.apply_env(env)?;
        Ok(config)
    }

    /// Override fields from environment variables.
    ///
    /// `GEMINI_*` variables only apply when the Gemini provider is selected,
    /// and `ZHIPU_API_KEY` only when Zhipu is.
    pub fn apply_env<F>(&mut self, env: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| env(key).filter(|v| !v.is_empty());

        if let Some(origin) = var("CLIENT_ORIGIN") {
            self.server.client_origin = origin;
        }
        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT must be a port number, got {port:?}"))?;
        }
        if let Some(url) = var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(kind) = var("ROLLCALL_PROVIDER") {
            self.provider.kind = kind.parse()?;
        }

        match self.provider.kind {
            ProviderKind::Gemini => {
                if let Some(key) = var("GEMINI_API_KEY") {
                    self.provider.api_key = key;
                }
                if let Some(model) = var("GEMINI_MODEL") {
                    self.provider.model = Some(model);
                }
            }
            ProviderKind::Zhipu => {
                if let Some(key) = var("ZHIPU_API_KEY") {
                    self.provider.api_key = key;
                }
            }
        }
        Ok(())
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("rollcall");

        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, Self::template())?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Edit the config file and add your Gemini API key");
        println!("      (or export GEMINI_API_KEY instead)");
        println!("   2. Point database.url at your database (SQLite by default)");
        println!("   3. Run 'rollcall serve' to start the API");
        println!();
        Ok(())
    }

    const fn template() -> &'static str {
        r#"{
  "server": {
    "host": "0.0.0.0",
    "port": 5000,
    "client_origin": "http://localhost:3000"
  },
  "provider": {
    "kind": "gemini",
    "api_key": "your-gemini-api-key-here",
    "model": "gemini-2.5-flash"
  },
  "database": {
    "url": "sqlite://rollcall.db?mode=rwc"
  }
}"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_file_or_env() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("missing.json"), env_of(&[])).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.client_origin, "http://localhost:3000");
        assert_eq!(config.provider.kind, ProviderKind::Gemini);
        assert!(config.provider.model.is_none());
        assert_eq!(config.database.url, "sqlite://rollcall.db?mode=rwc");
    }

    #[test]
    fn template_parses() {
        let config: Config = serde_json::from_str(Config::template()).unwrap();
        assert_eq!(config.provider.model.as_deref(), Some("gemini-2.5-flash"));
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"provider": {"api_key": "from-file", "model": "gemini-1.5-pro"}, "server": {"port": 8080}}"#,
        )
        .unwrap();

        let config = Config::load_from(
            &path,
            env_of(&[
                ("GEMINI_API_KEY", "from-env"),
                ("CLIENT_ORIGIN", "https://forms.example.edu"),
            ]),
        )
        .unwrap();

        assert_eq!(config.provider.api_key, "from-env");
        assert_eq!(config.provider.model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.client_origin, "https://forms.example.edu");
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env(env_of(&[("CLIENT_ORIGIN", "")])).unwrap();
        assert_eq!(config.server.client_origin, "http://localhost:3000");
    }

    #[test]
    fn provider_selection_switches_key_source() {
        let mut config = Config::default();
        config
            .apply_env(env_of(&[
                ("ROLLCALL_PROVIDER", "zhipu"),
                ("GEMINI_API_KEY", "gemini-key"),
                ("ZHIPU_API_KEY", "zhipu-key"),
            ]))
            .unwrap();
        assert_eq!(config.provider.kind, ProviderKind::Zhipu);
        assert_eq!(config.provider.api_key, "zhipu-key");
    }

    #[test]
    fn bad_port_is_an_error() {
        let mut config = Config::default();
        assert!(config.apply_env(env_of(&[("PORT", "http")])).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_from(&path, env_of(&[])).is_err());
    }
}
