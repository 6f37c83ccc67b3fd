use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use adapters::feeds::{
    GithubAdvisoriesAdapter, IntelOwlAdapter, MispAdapter, NvdAdapter, OtxAdapter, RedHatAdapter,
    SyndicationAdapter, SyndicationFeed, ThreatFoxAdapter, YaraSigmaAdapter, client::build_client,
};
use adapters::notify::SlackWebhookSender;
use adapters::storage::RedbAlertStore;
use application::notify::Notifier;
use application::pipeline::IngestPipeline;
use application::retry::RetryConfig;
use infrastructure::config::AgentConfig;
use infrastructure::logging::init_logging;
use ports::secondary::alert_sender::AlertSender;
use ports::secondary::alert_store::AlertStore;
use ports::secondary::feed_adapter::FeedAdapter;

use crate::cli::Cli;

/// Run the agent daemon: one ingestion cycle immediately, then one per
/// configured interval until SIGINT/SIGTERM.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = AgentConfig::load_or_default(Some(&cli.config))
        .context("loading configuration")?;
    init_logging(config.logging.level, config.logging.format);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "intelwatch agent starting"
    );

    let pipeline = build_pipeline(&config)?;
    let cancel = shutdown_token();

    // Initial cycle at startup, before the recurring cadence begins.
    run_cycle_logged(&pipeline).await;

    let interval_secs = config.scheduler.fetch_interval_secs.max(60);
    info!(interval_secs, "scheduler running");
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await; // consume the immediate tick; startup cycle already ran
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }
        run_cycle_logged(&pipeline).await;
    }

    info!("shutdown signal received, stopping");
    Ok(())
}

/// Run exactly one cycle and exit; a failed snapshot commit is a
/// process failure here, unlike in the daemon loop.
pub async fn run_once(cli: &Cli) -> Result<()> {
    let config = AgentConfig::load_or_default(Some(&cli.config))
        .context("loading configuration")?;
    init_logging(config.logging.level, config.logging.format);

    let pipeline = build_pipeline(&config)?;
    let stats = pipeline.run_cycle().await.context("ingestion cycle")?;
    info!(
        collected = stats.collected,
        notified = stats.notified,
        "single cycle complete"
    );
    Ok(())
}

async fn run_cycle_logged(pipeline: &IngestPipeline) {
    match pipeline.run_cycle().await {
        Ok(stats) => info!(
            collected = stats.collected,
            notified = stats.notified,
            "ingestion cycle complete"
        ),
        Err(err) => error!(
            error = %err,
            "ingestion cycle failed, previous snapshot retained"
        ),
    }
}

fn build_pipeline(config: &AgentConfig) -> Result<IngestPipeline> {
    let client = build_client().context("building HTTP client")?;

    let adapters = build_adapters(config, &client);
    info!(adapter_count = adapters.len(), "feed adapters configured");

    let store = RedbAlertStore::open(&config.storage.path)
        .with_context(|| format!("opening alert store at {}", config.storage.path.display()))?;

    let notifier = match config.notifications.webhook_url {
        Some(ref webhook_url) => {
            info!(threshold = %config.notifications.threshold, "webhook notifications enabled");
            let sender = SlackWebhookSender::new(
                client.clone(),
                webhook_url.clone(),
                RetryConfig::default(),
            );
            Notifier::new(
                Arc::new(sender) as Arc<dyn AlertSender>,
                config.notifications.threshold_severity(),
            )
        }
        None => Notifier::disabled(),
    };

    Ok(IngestPipeline::new(
        adapters,
        Arc::new(store) as Arc<dyn AlertStore>,
        notifier,
    ))
}

/// Instantiate every enabled adapter in the fixed fan-out order. The
/// order is part of the contract: the combined alert list concatenates
/// per-adapter results in exactly this sequence.
fn build_adapters(config: &AgentConfig, client: &reqwest::Client) -> Vec<Arc<dyn FeedAdapter>> {
    let sources = &config.sources;
    let mut adapters: Vec<Arc<dyn FeedAdapter>> = Vec::new();

    if sources.github.enabled {
        adapters.push(Arc::new(GithubAdvisoriesAdapter::new(
            client.clone(),
            sources.github.token.clone(),
        )));
    }
    if sources.nvd.enabled {
        adapters.push(Arc::new(NvdAdapter::new(
            client.clone(),
            sources.nvd.api_key.clone(),
            i64::from(sources.nvd.lookback_days),
        )));
    }
    if sources.redhat.enabled {
        adapters.push(Arc::new(RedHatAdapter::new(
            client.clone(),
            i64::from(sources.redhat.lookback_days),
        )));
    }
    if sources.otx.enabled {
        adapters.push(Arc::new(OtxAdapter::new(
            client.clone(),
            sources.otx.api_key.clone(),
        )));
    }
    if sources.threatfox.enabled {
        adapters.push(Arc::new(ThreatFoxAdapter::new(
            client.clone(),
            sources.threatfox.auth_key.clone(),
            sources.threatfox.lookback_days,
        )));
    }
    if sources.syndication.enabled {
        let feeds = sources
            .syndication
            .feeds
            .iter()
            .map(|f| SyndicationFeed {
                name: f.name.clone(),
                url: f.url.clone(),
            })
            .collect();
        adapters.push(Arc::new(SyndicationAdapter::new(client.clone(), feeds)));
    }
    if sources.misp.enabled {
        adapters.push(Arc::new(MispAdapter::new(
            client.clone(),
            sources.misp.base_url.clone(),
            sources.misp.api_key.clone(),
        )));
    }
    if sources.intelowl.enabled {
        adapters.push(Arc::new(IntelOwlAdapter));
    }
    if sources.yara_sigma.enabled {
        adapters.push(Arc::new(YaraSigmaAdapter));
    }

    adapters
}

/// Create a token that is cancelled on SIGINT or SIGTERM.
fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {},
            () = terminate => {},
        }
        token_clone.cancel();
    });

    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::alert::query::AlertQuery;
    use domain::common::entity::{AlertStatus, AttackPhase, Severity};
    use domain::intel::entity::{RawRecord, RedHatCve};
    use ports::secondary::feed_adapter::FetchOutcome;
    use std::future::Future;
    use std::pin::Pin;

    #[test]
    fn default_config_builds_all_nine_adapters_in_order() {
        let config = AgentConfig::default();
        let client = build_client().unwrap();
        let adapters = build_adapters(&config, &client);

        let sources: Vec<&str> = adapters.iter().map(|a| a.source()).collect();
        assert_eq!(
            sources,
            vec![
                "GitHub",
                "NVD",
                "Red Hat",
                "OTX",
                "ThreatFox",
                "Syndication",
                "MISP",
                "IntelOwl",
                "YARA/Sigma",
            ]
        );
    }

    #[test]
    fn disabled_sources_are_left_out() {
        let mut config = AgentConfig::default();
        config.sources.github.enabled = false;
        config.sources.syndication.enabled = false;
        config.sources.yara_sigma.enabled = false;

        let client = build_client().unwrap();
        let adapters = build_adapters(&config, &client);
        let sources: Vec<&str> = adapters.iter().map(|a| a.source()).collect();
        assert_eq!(
            sources,
            vec!["NVD", "Red Hat", "OTX", "ThreatFox", "MISP", "IntelOwl"]
        );
    }

    struct FixedAdapter {
        records: Vec<RawRecord>,
    }

    impl FeedAdapter for FixedAdapter {
        fn source(&self) -> &str {
            "fixture"
        }
        fn fetch(&self) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + '_>> {
            Box::pin(async { FetchOutcome::Fetched(self.records.clone()) })
        }
    }

    /// End-to-end: one raw record with native severity "Moderate" and
    /// no native id flows through a full cycle into the store.
    #[tokio::test]
    async fn full_cycle_persists_a_normalized_alert() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let store = Arc::new(RedbAlertStore::open(tmp.path()).unwrap());

        let record = RawRecord::RedHat(RedHatCve {
            threat_severity: "Moderate".to_string(),
            ..Default::default()
        });
        let pipeline = IngestPipeline::new(
            vec![Arc::new(FixedAdapter {
                records: vec![record],
            })],
            Arc::clone(&store) as Arc<dyn AlertStore>,
            Notifier::disabled(),
        );

        let stats = pipeline.run_cycle().await.unwrap();
        assert_eq!(stats.stored, 1);

        let query = AlertQuery {
            source: Some("Red Hat".to_string()),
            ..Default::default()
        };
        let results = store.query_alerts(&query).unwrap();
        assert_eq!(results.len(), 1);
        let alert = &results[0];
        assert_eq!(alert.severity, Severity::Medium);
        assert_eq!(alert.external_id, "");
        assert_eq!(alert.title, "Red Hat Advisory");
        assert_eq!(alert.status, AlertStatus::Open);
        assert_eq!(alert.attack_phase, AttackPhase::Unknown);
    }

    #[tokio::test]
    async fn consecutive_cycles_replace_the_snapshot() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let store = Arc::new(RedbAlertStore::open(tmp.path()).unwrap());

        let make_pipeline = |count: usize| {
            let records = (0..count)
                .map(|i| {
                    RawRecord::RedHat(RedHatCve {
                        cve: format!("CVE-2024-{i:04}"),
                        threat_severity: "Important".to_string(),
                        ..Default::default()
                    })
                })
                .collect();
            IngestPipeline::new(
                vec![Arc::new(FixedAdapter { records })],
                Arc::clone(&store) as Arc<dyn AlertStore>,
                Notifier::disabled(),
            )
        };

        make_pipeline(3).run_cycle().await.unwrap();
        assert_eq!(store.alert_count().unwrap(), 3);

        make_pipeline(1).run_cycle().await.unwrap();
        assert_eq!(store.alert_count().unwrap(), 1);
        let alert = &store.query_alerts(&AlertQuery::default()).unwrap()[0];
        assert_eq!(alert.severity, Severity::High);
    }
}
