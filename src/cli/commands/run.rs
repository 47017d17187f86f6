// 実行コマンド - 引数からシステムを起動し、終了時にサマリーを出力する

use crate::cli::Cli;
use crate::core::RunSummary;
use crate::engine::QueueSystem;
use crate::services::{ConsoleActivityReporter, NoOpItemSink, TimestampSource};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// システムを起動して終了まで待つ
///
/// `--max-items`も`--duration-secs`も無い場合は外部から停止されるまで戻らない。
pub fn execute(cli: &Cli) -> Result<RunSummary> {
    let config = cli.to_config();
    config.validate()?;

    if cli.summary_json.is_some() && !cli.is_bounded() {
        tracing::warn!("--summary-json has no effect on a run without --max-items or --duration-secs");
    }

    let reporter = if cli.quiet {
        ConsoleActivityReporter::quiet()
    } else {
        ConsoleActivityReporter::new()
    };

    let running = QueueSystem::new(config, reporter)
        .launch(TimestampSource::new(), Arc::new(NoOpItemSink::new()))?;

    let summary = match cli.duration_secs {
        Some(secs) => running.run_for(Duration::from_secs(secs))?,
        None => running.wait()?,
    };

    if let Some(path) = &cli.summary_json {
        write_summary(&summary, path)?;
    }
    Ok(summary)
}

/// サマリーをJSONファイルへ書き出す
pub fn write_summary(summary: &RunSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write summary to {}", path.display()))?;
    tracing::info!(path = %path.display(), "summary written");
    Ok(())
}
