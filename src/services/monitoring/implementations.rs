// 活動報告の具象実装

use crate::core::{ActivityReporter, ErrorSeverity, Item, TaskError, TaskStats};
use std::io::{self, Write};

/// 標準出力に`ADD`/`REMOVE`行を出す報告実装
///
/// エラーと停止の通知は`tracing`経由で標準エラーへ出す。
#[derive(Debug, Default, Clone)]
pub struct ConsoleActivityReporter {
    quiet: bool,
}

impl ConsoleActivityReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 要素行を出さない
    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    // 出力先が閉じられていてもパニックしない（パイプ先の終了など）
    fn emit(&self, action: &str, item: &Item) {
        if self.quiet {
            return;
        }
        if let Err(error) = writeln!(io::stdout().lock(), "{action} {item}") {
            tracing::debug!(error = %error, "failed to write item line");
        }
    }
}

impl ActivityReporter for ConsoleActivityReporter {
    fn report_added(&self, item: &Item) {
        self.emit("ADD", item);
    }

    fn report_removed(&self, worker_id: usize, item: &Item) {
        self.emit("REMOVE", item);
        tracing::trace!(worker_id, item = %item, "item removed");
    }

    fn report_error(&self, task: &str, error: &TaskError) {
        if error.severity() >= ErrorSeverity::High {
            tracing::error!(task, severity = error.severity().as_str(), error = ?error, "task iteration failed");
        } else {
            tracing::warn!(task, severity = error.severity().as_str(), error = %error, "task iteration failed");
        }
    }

    fn report_stopped(&self, stats: &TaskStats) {
        tracing::info!(
            task = %stats.task,
            iterations = stats.iterations,
            completed = stats.completed,
            transient_failures = stats.transient_failures,
            outcome = ?stats.outcome,
            "task stopped"
        );
    }
}

/// 何もしない報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpActivityReporter;

impl NoOpActivityReporter {
    pub fn new() -> Self {
        Self
    }
}

impl ActivityReporter for NoOpActivityReporter {
    fn report_added(&self, _item: &Item) {}

    fn report_removed(&self, _worker_id: usize, _item: &Item) {}

    fn report_error(&self, _task: &str, _error: &TaskError) {}

    fn report_stopped(&self, _stats: &TaskStats) {}
}
