use serde::{Deserialize, Serialize};

/// Canonical alert severity. Every source-specific vocabulary maps into
/// exactly one of these five values; nothing else is ever stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl Severity {
    /// Ordinal rank used for both query ordering and notification
    /// thresholding: Critical ranks highest, Unknown lowest.
    pub fn rank(self) -> u8 {
        match self {
            Self::Critical => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::Unknown => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse a canonical severity label (case-insensitive).
    ///
    /// This accepts only the five canonical names; vendor vocabularies
    /// ("Important", "Moderate", CVSS scores) are resolved by the
    /// normalizer, not here.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage status of a stored alert. Mutated only through the store's
/// status-update operation; every freshly normalized alert starts Open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
        }
    }

    /// Parse a status label. Accepts the wire spellings plus the common
    /// hyphen/underscore variants of "In Progress" (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "in progress" | "in-progress" | "in_progress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kill-chain stage classification. Only sources that natively classify
/// a record's phase set anything other than Unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPhase {
    Reconnaissance,
    Weaponization,
    Delivery,
    Exploitation,
    Installation,
    #[serde(rename = "Command and Control")]
    CommandAndControl,
    #[serde(rename = "Actions on Objectives")]
    ActionsOnObjectives,
    #[default]
    Unknown,
}

impl AttackPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reconnaissance => "Reconnaissance",
            Self::Weaponization => "Weaponization",
            Self::Delivery => "Delivery",
            Self::Exploitation => "Exploitation",
            Self::Installation => "Installation",
            Self::CommandAndControl => "Command and Control",
            Self::ActionsOnObjectives => "Actions on Objectives",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse a phase label; hyphens and underscores are treated as
    /// spaces. Unrecognized labels collapse to Unknown so the enum
    /// stays closed.
    pub fn parse(s: &str) -> Self {
        let normalized: String = s
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c.to_ascii_lowercase() })
            .collect();
        match normalized.as_str() {
            "reconnaissance" => Self::Reconnaissance,
            "weaponization" => Self::Weaponization,
            "delivery" => Self::Delivery,
            "exploitation" => Self::Exploitation,
            "installation" => Self::Installation,
            "command and control" | "c2" => Self::CommandAndControl,
            "actions on objectives" => Self::ActionsOnObjectives,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for AttackPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
