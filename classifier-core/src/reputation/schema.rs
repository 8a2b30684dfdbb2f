use serde::{Deserialize, Serialize};

use crate::config::ReputationConfig;

/// Outbound `threatMatches:find` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReputationQuery {
  pub client: ClientInfo,
  pub threat_info: ThreatInfo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
  pub client_id: String,
  pub client_version: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatInfo {
  pub threat_types: Vec<String>,
  pub platform_types: Vec<String>,
  pub threat_entry_types: Vec<String>,
  pub threat_entries: Vec<ThreatEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatEntry {
  pub url: String,
}

impl ReputationQuery {
  pub fn for_url(cfg: &ReputationConfig, url: &str) -> Self {
    Self {
      client: ClientInfo {
        client_id: cfg.client_id.clone(),
        client_version: cfg.client_version.clone(),
      },
      threat_info: ThreatInfo {
        threat_types: cfg.threat_types.clone(),
        platform_types: cfg.platform_types.clone(),
        threat_entry_types: cfg.threat_entry_types.clone(),
        threat_entries: vec![ThreatEntry {
          url: url.to_string(),
        }],
      },
    }
  }
}

/// Parsed `threatMatches:find` response. The service returns an empty object
/// when nothing matched, so `matches` defaults to empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReputationResult {
  #[serde(default)]
  pub matches: Vec<ThreatMatch>,
}

impl ReputationResult {
  pub fn is_flagged(&self) -> bool {
    !self.matches.is_empty()
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatMatch {
  pub threat_type: String,

  #[serde(default)]
  pub platform_type: Option<String>,

  #[serde(default)]
  pub threat_entry_type: Option<String>,

  #[serde(default)]
  pub threat: Option<ThreatEntry>,
}
