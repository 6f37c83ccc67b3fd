//! Per-source normalization of raw feed records into the canonical
//! alert shape.
//!
//! `normalize` is pure and deterministic: the same record always yields
//! a field-identical alert. Anything time-dependent (rolling lookback
//! windows) happens in the adapters before a record gets here.

use crate::alert::entity::NewAlert;
use crate::common::entity::{AttackPhase, Severity};

use super::entity::{
    GithubAdvisory, MispEvent, NvdCve, OtxPulse, RawRecord, RedHatCve, RuleMatch,
    SyndicationItem, ThreatFoxIoc,
};

/// Map a tagged raw record into a canonical alert. Dispatch is a closed
/// match over the source tag; each arm owns that source's severity,
/// title, date, id, and link resolution rules.
pub fn normalize(record: &RawRecord) -> NewAlert {
    match record {
        RawRecord::Github(adv) => normalize_github(adv),
        RawRecord::Nvd(cve) => normalize_nvd(cve),
        RawRecord::RedHat(cve) => normalize_redhat(cve),
        RawRecord::Otx(pulse) => normalize_otx(pulse),
        RawRecord::ThreatFox(ioc) => normalize_threatfox(ioc),
        RawRecord::Syndication(item) => normalize_syndication(item),
        RawRecord::Misp(evt) => normalize_misp(evt),
        RawRecord::RuleMatch(m) => normalize_rule_match(m),
    }
}

/// Bucket a numeric CVSS base score into the canonical enum.
pub fn severity_from_score(score: f64) -> Severity {
    if score >= 9.0 {
        Severity::Critical
    } else if score >= 7.0 {
        Severity::High
    } else if score >= 4.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Remap a textual severity word into the canonical enum. Covers the
/// canonical names plus the vendor spellings that appear in practice
/// ("moderate" from GitHub and Red Hat). Unrecognized words collapse to
/// Unknown so nothing leaks through the closed enum.
pub fn severity_from_text(s: &str) -> Severity {
    match s.to_ascii_lowercase().as_str() {
        "critical" => Severity::Critical,
        "high" => Severity::High,
        "medium" | "moderate" => Severity::Medium,
        "low" => Severity::Low,
        _ => Severity::Unknown,
    }
}

/// Red Hat's vocabulary: "Important" means High; the rest goes through
/// the shared table.
fn redhat_severity(s: &str) -> Severity {
    if s.eq_ignore_ascii_case("important") {
        Severity::High
    } else {
        severity_from_text(s)
    }
}

/// MISP numeric threat levels: 1=High, 2=Medium, 3=Low, 4/absent=Unknown.
fn misp_severity(threat_level: &str) -> Severity {
    match threat_level {
        "1" => Severity::High,
        "2" => Severity::Medium,
        "3" => Severity::Low,
        _ => Severity::Unknown,
    }
}

/// First candidate that is non-empty after trimming, or "".
fn first_non_empty<'a>(candidates: &[&'a str]) -> &'a str {
    candidates
        .iter()
        .copied()
        .find(|c| !c.trim().is_empty())
        .unwrap_or("")
}

fn normalize_github(adv: &GithubAdvisory) -> NewAlert {
    let severity = if adv.severity.is_empty() {
        Severity::Unknown
    } else {
        severity_from_text(&adv.severity)
    };
    let title = first_non_empty(&[&adv.summary, &adv.description, "GitHub Advisory"]);
    let date = first_non_empty(&[&adv.published_at, &adv.updated_at]);
    let url = if !adv.html_url.is_empty() {
        adv.html_url.clone()
    } else if !adv.ghsa_id.is_empty() {
        format!("https://github.com/advisories/{}", adv.ghsa_id)
    } else {
        String::new()
    };
    NewAlert::open("GitHub", &adv.ghsa_id, title, severity, date, url)
}

fn normalize_nvd(cve: &NvdCve) -> NewAlert {
    // Prefer the textual v3.x base severity; fall back to bucketing the
    // numeric v2 score; no metric at all means Unknown.
    let severity = if let Some(m) = cve.metrics.cvss_metric_v31.first() {
        severity_from_text(&m.cvss_data.base_severity)
    } else if let Some(m) = cve.metrics.cvss_metric_v30.first() {
        severity_from_text(&m.cvss_data.base_severity)
    } else if let Some(m) = cve.metrics.cvss_metric_v2.first() {
        severity_from_score(m.cvss_data.base_score)
    } else {
        Severity::Unknown
    };

    let english = cve
        .descriptions
        .iter()
        .find(|d| d.lang == "en")
        .map(|d| d.value.as_str())
        .unwrap_or("");
    let title = first_non_empty(&[english, &cve.id, "NVD Advisory"]);
    let date = first_non_empty(&[&cve.published, &cve.last_modified]);
    let url = if cve.id.is_empty() {
        String::new()
    } else {
        format!("https://nvd.nist.gov/vuln/detail/{}", cve.id)
    };
    NewAlert::open("NVD", &cve.id, title, severity, date, url)
}

fn normalize_redhat(cve: &RedHatCve) -> NewAlert {
    let severity = if cve.threat_severity.is_empty() {
        Severity::Unknown
    } else {
        redhat_severity(&cve.threat_severity)
    };

    let bugzilla = cve
        .bugzilla
        .as_ref()
        .map(|b| b.description.as_str())
        .unwrap_or("");
    let detail = cve
        .details
        .iter()
        .map(String::as_str)
        .find(|d| !d.trim().is_empty())
        .unwrap_or("");
    let mut title = first_non_empty(&[bugzilla, detail]).to_string();
    if title.is_empty() {
        title = if cve.cve.is_empty() {
            "Red Hat Advisory".to_string()
        } else {
            format!("Red Hat Advisory {}", cve.cve)
        };
    }

    let url = if cve.cve.is_empty() {
        String::new()
    } else {
        format!("https://access.redhat.com/security/cve/{}", cve.cve)
    };
    NewAlert::open("Red Hat", &cve.cve, title, severity, &cve.public_date, url)
}

fn normalize_otx(pulse: &OtxPulse) -> NewAlert {
    // Pulses carry no severity concept; they are community threat
    // reports, classified Medium across the board.
    let title = first_non_empty(&[&pulse.name, "OTX Pulse"]);
    let date = first_non_empty(&[&pulse.modified, &pulse.created]);
    let url = if pulse.id.is_empty() {
        String::new()
    } else {
        format!("https://otx.alienvault.com/pulse/{}", pulse.id)
    };
    NewAlert::open("OTX", &pulse.id, title, Severity::Medium, date, url)
}

fn normalize_threatfox(ioc: &ThreatFoxIoc) -> NewAlert {
    // Live IOCs are actionable by definition; fixed High.
    let kind = if ioc.ioc_type.is_empty() {
        "unknown"
    } else {
        ioc.ioc_type.as_str()
    };
    let title = format!("ThreatFox IOC ({kind})");
    let url = if ioc.id.is_empty() {
        String::new()
    } else {
        format!("https://threatfox.abuse.ch/ioc/{}", ioc.id)
    };
    NewAlert::open(
        "ThreatFox",
        &ioc.id,
        title,
        Severity::High,
        &ioc.first_seen,
        url,
    )
}

fn normalize_syndication(item: &SyndicationItem) -> NewAlert {
    // News coverage defaults to Low; it is context, not an indicator.
    let external_id = first_non_empty(&[&item.id, &item.link]);
    let title = first_non_empty(&[&item.title, "RSS Article"]);
    NewAlert::open(
        &item.source,
        external_id,
        title,
        Severity::Low,
        &item.published,
        &item.link,
    )
}

fn normalize_misp(evt: &MispEvent) -> NewAlert {
    // Instances return fields either at the top level or nested under
    // "Event"; resolve each field with the top level winning.
    let inner = evt.event.as_deref();
    let field = |top: &str, nested: fn(&MispEvent) -> &str| -> String {
        first_non_empty(&[top, inner.map(nested).unwrap_or("")]).to_string()
    };

    let id = field(&evt.id, |e| &e.id);
    let uuid = field(&evt.uuid, |e| &e.uuid);
    let info = field(&evt.info, |e| &e.info);
    let date = field(&evt.date, |e| &e.date);
    let threat_level = field(&evt.threat_level_id, |e| &e.threat_level_id);

    let external_id = first_non_empty(&[&uuid, &id]).to_string();
    let title = if info.is_empty() {
        if id.is_empty() {
            "MISP Event".to_string()
        } else {
            format!("MISP Event {id}")
        }
    } else {
        info
    };
    let base = evt.base_url.trim_end_matches('/');
    let url = if base.is_empty() || id.is_empty() {
        String::new()
    } else {
        format!("{base}/events/view/{id}")
    };
    NewAlert::open(
        "MISP",
        external_id,
        title,
        misp_severity(&threat_level),
        date,
        url,
    )
}

fn normalize_rule_match(m: &RuleMatch) -> NewAlert {
    let severity = if m.severity.is_empty() {
        Severity::Medium
    } else {
        severity_from_text(&m.severity)
    };
    let title = first_non_empty(&[&m.title, "YARA/Sigma Match"]);
    let mut alert = NewAlert::open("YARA/Sigma", &m.rule, title, severity, &m.date, &m.url);
    // The one source that can classify the kill-chain stage.
    alert.attack_phase = AttackPhase::parse(&m.attack_phase);
    alert
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::entity::AlertStatus;
    use crate::intel::entity::{NvdCvssData, NvdCvssMetric, NvdDescription, NvdMetrics};

    // ── Severity tables ───────────────────────────────────────────

    #[test]
    fn score_buckets_match_thresholds() {
        assert_eq!(severity_from_score(10.0), Severity::Critical);
        assert_eq!(severity_from_score(9.0), Severity::Critical);
        assert_eq!(severity_from_score(8.9), Severity::High);
        assert_eq!(severity_from_score(7.0), Severity::High);
        assert_eq!(severity_from_score(6.9), Severity::Medium);
        assert_eq!(severity_from_score(4.0), Severity::Medium);
        assert_eq!(severity_from_score(3.9), Severity::Low);
        assert_eq!(severity_from_score(0.0), Severity::Low);
    }

    #[test]
    fn text_table_maps_vendor_words() {
        assert_eq!(severity_from_text("CRITICAL"), Severity::Critical);
        assert_eq!(severity_from_text("high"), Severity::High);
        assert_eq!(severity_from_text("Medium"), Severity::Medium);
        assert_eq!(severity_from_text("Moderate"), Severity::Medium);
        assert_eq!(severity_from_text("low"), Severity::Low);
        assert_eq!(severity_from_text("negligible"), Severity::Unknown);
    }

    #[test]
    fn redhat_important_maps_to_high() {
        assert_eq!(redhat_severity("Important"), Severity::High);
        assert_eq!(redhat_severity("Moderate"), Severity::Medium);
        assert_eq!(redhat_severity("Low"), Severity::Low);
        assert_eq!(redhat_severity("Critical"), Severity::Critical);
        assert_eq!(redhat_severity("something-else"), Severity::Unknown);
    }

    #[test]
    fn misp_threat_levels() {
        assert_eq!(misp_severity("1"), Severity::High);
        assert_eq!(misp_severity("2"), Severity::Medium);
        assert_eq!(misp_severity("3"), Severity::Low);
        assert_eq!(misp_severity("4"), Severity::Unknown);
        assert_eq!(misp_severity(""), Severity::Unknown);
    }

    // ── Determinism ───────────────────────────────────────────────

    #[test]
    fn normalize_is_deterministic() {
        let record = RawRecord::RedHat(RedHatCve {
            cve: "CVE-2024-1111".to_string(),
            threat_severity: "Important".to_string(),
            public_date: "2024-02-01T00:00:00Z".to_string(),
            ..Default::default()
        });
        assert_eq!(normalize(&record), normalize(&record));
    }

    // ── GitHub ────────────────────────────────────────────────────

    #[test]
    fn github_maps_fields_and_synthesizes_link() {
        let record = RawRecord::Github(GithubAdvisory {
            ghsa_id: "GHSA-aaaa-bbbb-cccc".to_string(),
            summary: "Prototype pollution in example".to_string(),
            severity: "critical".to_string(),
            published_at: "2024-03-01T10:00:00Z".to_string(),
            ..Default::default()
        });
        let alert = normalize(&record);
        assert_eq!(alert.source, "GitHub");
        assert_eq!(alert.external_id, "GHSA-aaaa-bbbb-cccc");
        assert_eq!(alert.severity, Severity::Critical);
        assert_eq!(alert.url, "https://github.com/advisories/GHSA-aaaa-bbbb-cccc");
        assert_eq!(alert.status, AlertStatus::Open);
        assert_eq!(alert.attack_phase, AttackPhase::Unknown);
    }

    #[test]
    fn github_prefers_direct_link_and_moderate_is_medium() {
        let record = RawRecord::Github(GithubAdvisory {
            ghsa_id: "GHSA-x".to_string(),
            description: "fallback description".to_string(),
            severity: "moderate".to_string(),
            html_url: "https://github.com/advisories/GHSA-x".to_string(),
            updated_at: "2024-03-02T00:00:00Z".to_string(),
            ..Default::default()
        });
        let alert = normalize(&record);
        assert_eq!(alert.severity, Severity::Medium);
        assert_eq!(alert.title, "fallback description");
        assert_eq!(alert.date, "2024-03-02T00:00:00Z");
        assert_eq!(alert.url, "https://github.com/advisories/GHSA-x");
    }

    #[test]
    fn github_without_severity_is_unknown() {
        let alert = normalize(&RawRecord::Github(GithubAdvisory::default()));
        assert_eq!(alert.severity, Severity::Unknown);
        assert_eq!(alert.title, "GitHub Advisory");
        assert_eq!(alert.external_id, "");
        assert_eq!(alert.url, "");
    }

    // ── NVD ───────────────────────────────────────────────────────

    fn nvd_with_metrics(metrics: NvdMetrics) -> NvdCve {
        NvdCve {
            id: "CVE-2024-0001".to_string(),
            descriptions: vec![
                NvdDescription {
                    lang: "es".to_string(),
                    value: "Una falla.".to_string(),
                },
                NvdDescription {
                    lang: "en".to_string(),
                    value: "A flaw.".to_string(),
                },
            ],
            metrics,
            published: "2024-01-02T00:00:00.000".to_string(),
            last_modified: "2024-01-03T00:00:00.000".to_string(),
        }
    }

    #[test]
    fn nvd_prefers_v31_base_severity() {
        let metrics = NvdMetrics {
            cvss_metric_v31: vec![NvdCvssMetric {
                cvss_data: NvdCvssData {
                    base_severity: "HIGH".to_string(),
                    base_score: 8.1,
                },
            }],
            ..Default::default()
        };
        let alert = normalize(&RawRecord::Nvd(nvd_with_metrics(metrics)));
        assert_eq!(alert.severity, Severity::High);
        assert_eq!(alert.title, "A flaw.");
        assert_eq!(alert.date, "2024-01-02T00:00:00.000");
        assert_eq!(alert.url, "https://nvd.nist.gov/vuln/detail/CVE-2024-0001");
    }

    #[test]
    fn nvd_falls_back_to_v2_score_bucketing() {
        let metrics = NvdMetrics {
            cvss_metric_v2: vec![NvdCvssMetric {
                cvss_data: NvdCvssData {
                    base_severity: String::new(),
                    base_score: 9.3,
                },
            }],
            ..Default::default()
        };
        let alert = normalize(&RawRecord::Nvd(nvd_with_metrics(metrics)));
        assert_eq!(alert.severity, Severity::Critical);
    }

    #[test]
    fn nvd_without_metrics_is_unknown_and_title_falls_back_to_id() {
        let cve = NvdCve {
            id: "CVE-2024-0002".to_string(),
            ..Default::default()
        };
        let alert = normalize(&RawRecord::Nvd(cve));
        assert_eq!(alert.severity, Severity::Unknown);
        assert_eq!(alert.title, "CVE-2024-0002");
    }

    // ── Red Hat ───────────────────────────────────────────────────

    #[test]
    fn redhat_title_candidates_in_order() {
        let cve = RedHatCve {
            cve: "CVE-2024-2222".to_string(),
            bugzilla: Some(crate::intel::entity::RedHatBugzilla {
                description: "openssl: buffer overflow".to_string(),
            }),
            details: vec!["secondary detail".to_string()],
            ..Default::default()
        };
        assert_eq!(normalize(&RawRecord::RedHat(cve)).title, "openssl: buffer overflow");

        let cve = RedHatCve {
            cve: "CVE-2024-2222".to_string(),
            details: vec![String::new(), "secondary detail".to_string()],
            ..Default::default()
        };
        assert_eq!(normalize(&RawRecord::RedHat(cve)).title, "secondary detail");

        let cve = RedHatCve {
            cve: "CVE-2024-2222".to_string(),
            ..Default::default()
        };
        assert_eq!(
            normalize(&RawRecord::RedHat(cve)).title,
            "Red Hat Advisory CVE-2024-2222"
        );
    }

    #[test]
    fn redhat_moderate_without_id_synthesizes_fallbacks() {
        let cve = RedHatCve {
            threat_severity: "Moderate".to_string(),
            ..Default::default()
        };
        let alert = normalize(&RawRecord::RedHat(cve));
        assert_eq!(alert.severity, Severity::Medium);
        assert_eq!(alert.external_id, "");
        assert_eq!(alert.title, "Red Hat Advisory");
        assert_eq!(alert.url, "");
        assert_eq!(alert.status, AlertStatus::Open);
    }

    // ── Fixed-default sources ─────────────────────────────────────

    #[test]
    fn otx_pulse_is_medium_with_pulse_link() {
        let pulse = OtxPulse {
            id: "65a1b2c3".to_string(),
            name: "New stealer campaign".to_string(),
            modified: "2024-04-01T00:00:00Z".to_string(),
            created: "2024-03-28T00:00:00Z".to_string(),
        };
        let alert = normalize(&RawRecord::Otx(pulse));
        assert_eq!(alert.severity, Severity::Medium);
        assert_eq!(alert.date, "2024-04-01T00:00:00Z");
        assert_eq!(alert.url, "https://otx.alienvault.com/pulse/65a1b2c3");
    }

    #[test]
    fn threatfox_ioc_is_high_with_type_in_title() {
        let ioc = ThreatFoxIoc {
            id: "41".to_string(),
            ioc_type: "ip:port".to_string(),
            first_seen: "2024-04-02 11:22:33 UTC".to_string(),
        };
        let alert = normalize(&RawRecord::ThreatFox(ioc));
        assert_eq!(alert.severity, Severity::High);
        assert_eq!(alert.title, "ThreatFox IOC (ip:port)");
        assert_eq!(alert.url, "https://threatfox.abuse.ch/ioc/41");

        let alert = normalize(&RawRecord::ThreatFox(ThreatFoxIoc::default()));
        assert_eq!(alert.title, "ThreatFox IOC (unknown)");
        assert_eq!(alert.url, "");
    }

    #[test]
    fn syndication_article_is_low_and_falls_back_to_link_id() {
        let item = SyndicationItem {
            source: "SANS Internet Storm Center".to_string(),
            id: String::new(),
            title: "Diary: odd DNS traffic".to_string(),
            link: "https://isc.sans.edu/diary/1".to_string(),
            published: "2024-04-03T00:00:00Z".to_string(),
        };
        let alert = normalize(&RawRecord::Syndication(item));
        assert_eq!(alert.source, "SANS Internet Storm Center");
        assert_eq!(alert.severity, Severity::Low);
        assert_eq!(alert.external_id, "https://isc.sans.edu/diary/1");
        assert_eq!(alert.url, "https://isc.sans.edu/diary/1");
    }

    // ── MISP ──────────────────────────────────────────────────────

    #[test]
    fn misp_resolves_nested_event_fields() {
        let evt = MispEvent {
            base_url: "https://misp.example.org/".to_string(),
            event: Some(Box::new(MispEvent {
                id: "55".to_string(),
                uuid: "c99-uuid".to_string(),
                info: "Phishing campaign".to_string(),
                date: "2024-04-04".to_string(),
                threat_level_id: "1".to_string(),
                ..Default::default()
            })),
            ..Default::default()
        };
        let alert = normalize(&RawRecord::Misp(evt));
        assert_eq!(alert.external_id, "c99-uuid");
        assert_eq!(alert.title, "Phishing campaign");
        assert_eq!(alert.severity, Severity::High);
        assert_eq!(alert.url, "https://misp.example.org/events/view/55");
    }

    #[test]
    fn misp_title_falls_back_to_event_id() {
        let evt = MispEvent {
            base_url: "https://misp.example.org".to_string(),
            id: "77".to_string(),
            threat_level_id: "2".to_string(),
            ..Default::default()
        };
        let alert = normalize(&RawRecord::Misp(evt));
        assert_eq!(alert.title, "MISP Event 77");
        assert_eq!(alert.external_id, "77");
        assert_eq!(alert.severity, Severity::Medium);
    }

    // ── Rule matches ──────────────────────────────────────────────

    #[test]
    fn rule_match_sets_attack_phase() {
        let m = RuleMatch {
            rule: "win_cobaltstrike_beacon".to_string(),
            title: "Cobalt Strike beacon config".to_string(),
            severity: "high".to_string(),
            attack_phase: "Command and Control".to_string(),
            ..Default::default()
        };
        let alert = normalize(&RawRecord::RuleMatch(m));
        assert_eq!(alert.severity, Severity::High);
        assert_eq!(alert.attack_phase, AttackPhase::CommandAndControl);
    }

    #[test]
    fn rule_match_defaults_to_medium_and_unknown_phase() {
        let alert = normalize(&RawRecord::RuleMatch(RuleMatch::default()));
        assert_eq!(alert.severity, Severity::Medium);
        assert_eq!(alert.title, "YARA/Sigma Match");
        assert_eq!(alert.attack_phase, AttackPhase::Unknown);
    }
}
