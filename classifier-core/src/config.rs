use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::rules::PatternList;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  pub server: ServerConfig,
  pub logging: LoggingConfig,
  pub rules: Vec<PatternList>,
  pub reputation: ReputationConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      server: ServerConfig::default(),
      logging: LoggingConfig::default(),
      rules: default_rule_lists(),
      reputation: ReputationConfig::default(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host: String,

  #[serde(default = "default_port")]
  pub port: u16,
}

fn default_host() -> String {
  "0.0.0.0".to_string()
}

fn default_port() -> u16 {
  3000
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: default_host(),
      port: default_port(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
  #[serde(default = "default_log_level")]
  pub level: String,

  #[serde(default = "default_log_dir")]
  pub dir: String,

  #[serde(default = "default_retention_days")]
  pub retention_days: u64,
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_log_dir() -> String {
  "logs".to_string()
}

fn default_retention_days() -> u64 {
  14
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      dir: default_log_dir(),
      retention_days: default_retention_days(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReputationConfig {
  #[serde(default = "default_endpoint")]
  pub endpoint: String,

  #[serde(default = "default_api_key_env")]
  pub api_key_env: String,

  #[serde(default = "default_client_id")]
  pub client_id: String,

  #[serde(default = "default_client_version")]
  pub client_version: String,

  #[serde(default = "default_threat_types")]
  pub threat_types: Vec<String>,

  #[serde(default = "default_platform_types")]
  pub platform_types: Vec<String>,

  #[serde(default = "default_threat_entry_types")]
  pub threat_entry_types: Vec<String>,

  #[serde(default = "default_timeout_seconds")]
  pub timeout_seconds: u64,
}

fn default_endpoint() -> String {
  "https://safebrowsing.googleapis.com/v4/threatMatches:find".to_string()
}

fn default_api_key_env() -> String {
  "SAFE_BROWSING_API_KEY".to_string()
}

fn default_client_id() -> String {
  "link-analyzer".to_string()
}

fn default_client_version() -> String {
  "1.0".to_string()
}

fn default_threat_types() -> Vec<String> {
  vec![
    "MALWARE".to_string(),
    "SOCIAL_ENGINEERING".to_string(),
    "UNWANTED_SOFTWARE".to_string(),
    "POTENTIALLY_HARMFUL_APPLICATION".to_string(),
  ]
}

fn default_platform_types() -> Vec<String> {
  vec!["ANY_PLATFORM".to_string()]
}

fn default_threat_entry_types() -> Vec<String> {
  vec!["URL".to_string()]
}

fn default_timeout_seconds() -> u64 {
  10
}

impl Default for ReputationConfig {
  fn default() -> Self {
    Self {
      endpoint: default_endpoint(),
      api_key_env: default_api_key_env(),
      client_id: default_client_id(),
      client_version: default_client_version(),
      threat_types: default_threat_types(),
      platform_types: default_platform_types(),
      threat_entry_types: default_threat_entry_types(),
      timeout_seconds: default_timeout_seconds(),
    }
  }
}

fn default_rule_lists() -> Vec<PatternList> {
  vec![
    PatternList {
      name: "restricted-content".to_string(),
      patterns: vec![
        "porn".to_string(),
        "xxx".to_string(),
        "nude".to_string(),
        "escort".to_string(),
        "casino".to_string(),
        "viagra".to_string(),
        "cialis".to_string(),
        "cannabis".to_string(),
        "cocaine".to_string(),
        "narcotics".to_string(),
      ],
    },
    PatternList {
      name: "suspicious-domain".to_string(),
      patterns: vec![
        "paypai".to_string(),
        "secure-login".to_string(),
        "verify-user".to_string(),
        "account-update".to_string(),
        "login-check".to_string(),
        ".xyz".to_string(),
        ".top".to_string(),
        "confirm-details".to_string(),
        "update-now".to_string(),
        "webscr".to_string(),
        "signin".to_string(),
      ],
    },
  ]
}

pub fn config_path() -> PathBuf {
  std::env::var("LINK_ANALYZER_CONFIG")
    .map(PathBuf::from)
    .unwrap_or_else(|_| PathBuf::from("config.toml"))
}

pub fn load_or_create_default(path: &Path) -> anyhow::Result<Config> {
  if let Some(parent) = path.parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent)?;
    }
  }

  if !path.exists() {
    let cfg = Config::default();
    write_atomic(path, &toml::to_string_pretty(&cfg)?)?;
    return Ok(cfg);
  }

  let raw = fs::read_to_string(path)?;
  match toml::from_str::<Config>(&raw) {
    Ok(cfg) => Ok(cfg),
    Err(e) => {
      let ts = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
      let parent = path.parent().unwrap_or_else(|| Path::new("."));
      let backup = parent.join(format!("config.toml.bad-{ts}"));
      let _ = fs::rename(path, &backup);

      let cfg = Config::default();
      write_atomic(path, &toml::to_string_pretty(&cfg)?)?;
      eprintln!(
        "link-analyzer: invalid config at {} (backed up to {}): {e}",
        path.display(),
        backup.display()
      );
      Ok(cfg)
    }
  }
}

impl Config {
  pub fn validate(&self) -> anyhow::Result<()> {
    if self.reputation.timeout_seconds == 0 {
      anyhow::bail!("reputation.timeout_seconds must be > 0");
    }
    if self.reputation.threat_types.is_empty() {
      anyhow::bail!("reputation.threat_types must not be empty");
    }
    if self.reputation.platform_types.is_empty() {
      anyhow::bail!("reputation.platform_types must not be empty");
    }
    if self.reputation.threat_entry_types.is_empty() {
      anyhow::bail!("reputation.threat_entry_types must not be empty");
    }

    let url = reqwest::Url::parse(&self.reputation.endpoint)
      .map_err(|_| anyhow::anyhow!("invalid reputation.endpoint: {}", self.reputation.endpoint))?;
    if url.scheme() != "https" {
      anyhow::bail!("reputation.endpoint must use HTTPS: {}", self.reputation.endpoint);
    }

    for list in &self.rules {
      if list.name.trim().is_empty() {
        anyhow::bail!("rule list names must not be empty");
      }
      if list.patterns.iter().all(|p| p.trim().is_empty()) {
        anyhow::bail!("rule list `{}` has no usable patterns", list.name);
      }
    }

    Ok(())
  }
}

fn write_atomic(path: &Path, contents: &str) -> anyhow::Result<()> {
  let parent = path
    .parent()
    .ok_or_else(|| anyhow::anyhow!("config path has no parent: {}", path.display()))?;
  let tmp = parent.join(format!(
    ".{}.tmp",
    path.file_name().unwrap_or_default().to_string_lossy()
  ));

  fs::write(&tmp, contents)?;
  fs::rename(&tmp, path)?;
  Ok(())
}
