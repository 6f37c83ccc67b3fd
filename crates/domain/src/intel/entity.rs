use serde::Deserialize;

/// One raw record fetched from an external feed, tagged by its source.
///
/// Each variant carries the source-shaped payload exactly as the feed
/// returns it; the normalizer dispatches on the tag and never inspects
/// payload shape at runtime. Source tags are fixed strings except for
/// syndication items, which carry the name of the individual feed they
/// came from.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    Github(GithubAdvisory),
    Nvd(NvdCve),
    RedHat(RedHatCve),
    Otx(OtxPulse),
    ThreatFox(ThreatFoxIoc),
    Syndication(SyndicationItem),
    Misp(MispEvent),
    RuleMatch(RuleMatch),
}

impl RawRecord {
    /// The origin feed tag carried into the normalized alert.
    pub fn source(&self) -> &str {
        match self {
            Self::Github(_) => "GitHub",
            Self::Nvd(_) => "NVD",
            Self::RedHat(_) => "Red Hat",
            Self::Otx(_) => "OTX",
            Self::ThreatFox(_) => "ThreatFox",
            Self::Syndication(item) => &item.source,
            Self::Misp(_) => "MISP",
            Self::RuleMatch(_) => "YARA/Sigma",
        }
    }
}

/// GitHub security advisory, as returned by `GET /advisories`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GithubAdvisory {
    #[serde(default)]
    pub ghsa_id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    /// Native vocabulary: low, moderate, medium, high, critical.
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub html_url: String,
}

/// NVD CVE record from the 2.0 REST API (`vulnerabilities[].cve`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NvdCve {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub descriptions: Vec<NvdDescription>,
    #[serde(default)]
    pub metrics: NvdMetrics,
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub last_modified: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NvdDescription {
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub value: String,
}

/// CVSS metric blocks keyed by version. v3.x carries a textual
/// `baseSeverity`; v2 carries only the numeric `baseScore`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NvdMetrics {
    #[serde(default)]
    pub cvss_metric_v31: Vec<NvdCvssMetric>,
    #[serde(default)]
    pub cvss_metric_v30: Vec<NvdCvssMetric>,
    #[serde(default)]
    pub cvss_metric_v2: Vec<NvdCvssMetric>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NvdCvssMetric {
    #[serde(default)]
    pub cvss_data: NvdCvssData,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NvdCvssData {
    #[serde(default)]
    pub base_severity: String,
    #[serde(default)]
    pub base_score: f64,
}

/// Red Hat CVE summary from the hydra security-data API. Field names on
/// the wire are PascalCase/upper-case, hence the explicit renames.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RedHatCve {
    #[serde(default, rename = "CVE")]
    pub cve: String,
    /// Native vocabulary: Low, Moderate, Important, Critical.
    #[serde(default, rename = "ThreatSeverity")]
    pub threat_severity: String,
    #[serde(default, rename = "Bugzilla")]
    pub bugzilla: Option<RedHatBugzilla>,
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default, rename = "PublicDate")]
    pub public_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RedHatBugzilla {
    #[serde(default)]
    pub description: String,
}

/// AlienVault OTX pulse from `pulses/subscribed`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OtxPulse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub modified: String,
}

/// ThreatFox IOC entry from the `get_iocs` query.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ThreatFoxIoc {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub ioc_type: String,
    #[serde(default)]
    pub first_seen: String,
}

/// One article from a syndication (RSS/Atom) feed, already reduced to a
/// uniform shape by the syndication adapter. `source` is the configured
/// name of the individual feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyndicationItem {
    pub source: String,
    pub id: String,
    pub title: String,
    pub link: String,
    pub published: String,
}

/// MISP event summary from `/events/index`. Depending on the instance,
/// fields appear either at the top level or nested under `Event`; the
/// normalizer resolves both, preferring the top level.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MispEvent {
    /// Instance base URL, attached by the adapter for link synthesis.
    #[serde(skip)]
    pub base_url: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub date: String,
    /// Numeric threat level as a string: 1=High, 2=Medium, 3=Low.
    #[serde(default)]
    pub threat_level_id: String,
    #[serde(default, rename = "Event")]
    pub event: Option<Box<MispEvent>>,
}

/// A YARA/Sigma rule match. The matching engine integration is a stub,
/// but the record shape is normalized so a future engine only has to
/// produce these. This is the one source that classifies the kill-chain
/// stage of an alert.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RuleMatch {
    #[serde(default)]
    pub rule: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub attack_phase: String,
}
