//! Per-feed configuration: enable flags, credentials, lookback windows.
//!
//! Credentials may come from the YAML file or from environment
//! variables; the environment wins so secrets can stay out of files.

use serde::{Deserialize, Serialize};

use super::common::{
    ConfigError, MAX_SYNDICATION_FEEDS, check_http_url, check_limit, default_lookback_days,
    default_true,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub github: GithubSourceConfig,
    pub nvd: NvdSourceConfig,
    pub redhat: RedHatSourceConfig,
    pub otx: OtxSourceConfig,
    pub threatfox: ThreatFoxSourceConfig,
    pub syndication: SyndicationSourceConfig,
    pub misp: MispSourceConfig,
    pub intelowl: StubSourceConfig,
    pub yara_sigma: StubSourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubSourceConfig {
    pub enabled: bool,
    /// Optional token; raises the API rate limit.
    pub token: Option<String>,
}

impl Default for GithubSourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NvdSourceConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub lookback_days: u32,
}

impl Default for NvdSourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            lookback_days: default_lookback_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedHatSourceConfig {
    pub enabled: bool,
    pub lookback_days: u32,
}

impl Default for RedHatSourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lookback_days: default_lookback_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OtxSourceConfig {
    pub enabled: bool,
    /// Required for live fetches; absent means the source opts out.
    pub api_key: Option<String>,
}

impl Default for OtxSourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatFoxSourceConfig {
    pub enabled: bool,
    /// Required for live fetches; absent means the source opts out.
    pub auth_key: Option<String>,
    pub lookback_days: u32,
}

impl Default for ThreatFoxSourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auth_key: None,
            lookback_days: default_lookback_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyndicationSourceConfig {
    pub enabled: bool,
    pub feeds: Vec<SyndicationFeedConfig>,
}

impl Default for SyndicationSourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            feeds: default_syndication_feeds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyndicationFeedConfig {
    pub name: String,
    pub url: String,
}

/// Curated default feed list: trusted security news and advisory
/// sources. Operators can replace or extend it in the config file.
fn default_syndication_feeds() -> Vec<SyndicationFeedConfig> {
    [
        (
            "SANS Internet Storm Center",
            "https://isc.sans.edu/rssfeed_full.xml",
        ),
        ("US-CERT Alerts", "https://us-cert.cisa.gov/ncas/alerts.xml"),
        ("BleepingComputer", "https://www.bleepingcomputer.com/feed"),
        ("Dark Reading", "https://www.darkreading.com/rss/all.xml"),
        ("Krebs on Security", "https://krebsonsecurity.com/feed/"),
    ]
    .into_iter()
    .map(|(name, url)| SyndicationFeedConfig {
        name: name.to_string(),
        url: url.to_string(),
    })
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MispSourceConfig {
    pub enabled: bool,
    /// Instance base URL, e.g. `https://misp.example.org`.
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl Default for MispSourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
            api_key: None,
        }
    }
}

/// Toggle-only config for the reserved extension-point sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StubSourceConfig {
    pub enabled: bool,
}

impl Default for StubSourceConfig {
    fn default() -> Self {
        Self { enabled: default_true() }
    }
}

impl SourcesConfig {
    /// Fill absent credentials from the environment. The environment
    /// overrides nothing that the file already sets.
    pub(super) fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let fill = |slot: &mut Option<String>, var: &str| {
            if slot.is_none() {
                *slot = lookup(var).filter(|v| !v.is_empty());
            }
        };
        fill(&mut self.github.token, "GITHUB_TOKEN");
        fill(&mut self.nvd.api_key, "NVD_API_KEY");
        fill(&mut self.otx.api_key, "OTX_API_KEY");
        fill(&mut self.threatfox.auth_key, "THREATFOX_AUTH_KEY");
        fill(&mut self.misp.base_url, "MISP_URL");
        fill(&mut self.misp.api_key, "MISP_API_KEY");
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.nvd.lookback_days == 0 {
            return Err(ConfigError::Validation {
                field: "sources.nvd.lookback_days".to_string(),
                message: "lookback must be > 0".to_string(),
            });
        }
        if self.redhat.lookback_days == 0 {
            return Err(ConfigError::Validation {
                field: "sources.redhat.lookback_days".to_string(),
                message: "lookback must be > 0".to_string(),
            });
        }
        if self.threatfox.lookback_days == 0 {
            return Err(ConfigError::Validation {
                field: "sources.threatfox.lookback_days".to_string(),
                message: "lookback must be > 0".to_string(),
            });
        }

        check_limit(
            "sources.syndication.feeds",
            self.syndication.feeds.len(),
            MAX_SYNDICATION_FEEDS,
        )?;
        for (idx, feed) in self.syndication.feeds.iter().enumerate() {
            let prefix = format!("sources.syndication.feeds[{idx}]");
            if feed.name.is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("{prefix}.name"),
                    message: "feed name must not be empty".to_string(),
                });
            }
            check_http_url(&format!("{prefix}.url"), &feed.url)?;
        }

        if let Some(ref base_url) = self.misp.base_url {
            check_http_url("sources.misp.base_url", base_url)?;
        }

        Ok(())
    }
}
