//! Application orchestrator: wires bootstrap, watcher, monitor and sinks.

use anyhow::Context;
use scpwatch_log_watch::{Monitor, watch_directory};
use scpwatch_player_count::{Aggregator, compute_initial_count};
use scpwatch_presence::{DisplayTemplate, FileSink, LogSink, MultiSink, Publisher};
use tokio_util::sync::CancellationToken;

use crate::config::Config;

/// Runs until shutdown is requested, or returns after the first publish when
/// `once` is set.
pub async fn run(config: Config, once: bool) -> anyhow::Result<()> {
    config.validate()?;
    let log_dir = config.log_dir();

    // -- Bootstrap --
    let scan_dir = log_dir.clone();
    let initial = tokio::task::spawn_blocking(move || compute_initial_count(&scan_dir))
        .await
        .context("bootstrap task failed")?
        .with_context(|| {
            format!(
                "cannot establish initial player count from {}",
                log_dir.display()
            )
        })?;

    let publisher = Publisher::new(
        DisplayTemplate::new(config.nickname.clone()),
        config.max_players,
        build_sink(&config),
    );
    let monitor = Monitor::new(Aggregator::starting_now(initial), publisher);
    monitor.publish_current().await;

    if once {
        return Ok(());
    }

    // -- Watcher --
    let (watcher, events) = watch_directory(&log_dir)?;
    let cancel = CancellationToken::new();
    let mut monitor_task = tokio::spawn(monitor.run(events, cancel.clone()));

    tracing::info!(count = initial, "scpwatch ready");

    // -- Main loop: wait for shutdown --
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("SIGINT received, shutting down");
        }
        result = &mut monitor_task => {
            drop(watcher);
            let monitor = result.context("monitor task failed")?;
            tracing::warn!(count = monitor.count(), "log event feed ended unexpectedly");
            return Ok(());
        }
    }

    // -- Graceful shutdown --
    cancel.cancel();
    let monitor = monitor_task.await.context("monitor task failed")?;
    drop(watcher);
    tracing::info!(count = monitor.count(), "final player count");

    Ok(())
}

fn build_sink(config: &Config) -> MultiSink {
    let sink = MultiSink::new().with(LogSink);
    match &config.label_file {
        Some(path) => sink.with(FileSink::new(path)),
        None => sink,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONNECT: &str = "2024-01-01 10:00:00.000 | Connection update | Networking | Player 1 connected\n";

    #[tokio::test]
    async fn once_publishes_initial_count() {
        let tmp = tempfile::tempdir().unwrap();
        let log_dir = tmp.path().join("7777");
        std::fs::create_dir(&log_dir).unwrap();
        std::fs::write(log_dir.join("Round 1.txt"), [CONNECT, CONNECT].concat()).unwrap();

        let label = tmp.path().join("label.txt");
        let config = Config {
            path: format!("{}/", tmp.path().display()),
            port: 7777,
            label_file: Some(label.clone()),
            ..Config::default()
        };

        run(config, true).await.unwrap();
        assert_eq!(std::fs::read_to_string(label).unwrap(), "Players: 2/20\n");
    }

    #[tokio::test]
    async fn missing_log_directory_fails_fast() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            path: format!("{}/", tmp.path().display()),
            port: 9999,
            ..Config::default()
        };

        let err = run(config, true).await.unwrap_err();
        assert!(format!("{err:#}").contains("9999"));
    }

    #[tokio::test]
    async fn label_file_in_log_dir_is_rejected_before_publishing() {
        let tmp = tempfile::tempdir().unwrap();
        let log_dir = tmp.path().join("7777");
        std::fs::create_dir(&log_dir).unwrap();
        std::fs::write(log_dir.join("Round 1.txt"), CONNECT).unwrap();

        let label = log_dir.join("label.txt");
        let config = Config {
            path: format!("{}/", tmp.path().display()),
            port: 7777,
            label_file: Some(label.clone()),
            ..Config::default()
        };

        let err = run(config, false).await.unwrap_err();
        assert!(err.to_string().contains("inside the watched log directory"));
        assert!(!label.exists());
    }

    #[test]
    fn sink_includes_label_file_when_configured() {
        assert_eq!(build_sink(&Config::default()).len(), 1);

        let config = Config {
            label_file: Some("/tmp/label".into()),
            ..Config::default()
        };
        assert_eq!(build_sink(&config).len(), 2);
    }
}
