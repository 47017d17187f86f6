// テスト用のモック実装
// 失敗を注入できる生成元・受け取り先と、出力を記録する報告実装

use shared_queue::{ActivityReporter, Item, ItemSink, ItemSource, TaskError, TaskStats};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

// mockallが生成したモックも再エクスポート
pub use shared_queue::core::traits::{
    MockActivityReporter, MockItemSink, MockItemSource, MockRelayConfig,
};

/// 指定した反復で失敗する連番生成元
///
/// 反復番号は1から数え、クローン間で共有される。
#[derive(Clone, Default)]
pub struct FlakySource {
    calls: Arc<AtomicU64>,
    next_value: Arc<AtomicU64>,
    transient_at: Arc<HashSet<u64>>,
    fatal_at: Option<u64>,
    panic_at: Option<u64>,
}

impl FlakySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_transiently_at(mut self, iterations: &[u64]) -> Self {
        self.transient_at = Arc::new(iterations.iter().copied().collect());
        self
    }

    pub fn failing_fatally_at(mut self, iteration: u64) -> Self {
        self.fatal_at = Some(iteration);
        self
    }

    pub fn panicking_at(mut self, iteration: u64) -> Self {
        self.panic_at = Some(iteration);
        self
    }
}

impl ItemSource for FlakySource {
    fn next_item(&mut self) -> Result<Item, TaskError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if self.fatal_at == Some(call) {
            return Err(TaskError::fatal("flaky_source", anyhow::anyhow!("source exhausted at {call}")));
        }
        if self.panic_at == Some(call) {
            panic!("flaky source panicked at {call}");
        }
        if self.transient_at.contains(&call) {
            return Err(TaskError::transient("flaky_source", anyhow::anyhow!("hiccup at {call}")));
        }

        let value = self.next_value.fetch_add(1, Ordering::SeqCst);
        Ok(Item::new(value.to_string()))
    }
}

/// 指定した要素で失敗し、それ以外を記録する受け取り先
#[derive(Default)]
pub struct FlakySink {
    transient_items: HashSet<String>,
    fatal_items: HashSet<String>,
    panic_items: HashSet<String>,
    accepted: Mutex<Vec<(usize, Item)>>,
}

impl FlakySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_transiently_on(mut self, items: &[&str]) -> Self {
        self.transient_items = items.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn failing_fatally_on(mut self, items: &[&str]) -> Self {
        self.fatal_items = items.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn panicking_on(mut self, items: &[&str]) -> Self {
        self.panic_items = items.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn accepted_items(&self) -> Vec<Item> {
        self.accepted
            .lock()
            .unwrap()
            .iter()
            .map(|(_, item)| item.clone())
            .collect()
    }

    pub fn accepted_by(&self, worker_id: usize) -> usize {
        self.accepted
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == worker_id)
            .count()
    }
}

impl ItemSink for FlakySink {
    fn consume(&self, worker_id: usize, item: &Item) -> Result<(), TaskError> {
        let value = item.as_str();
        if self.fatal_items.contains(value) {
            return Err(TaskError::fatal("flaky_sink", anyhow::anyhow!("cannot accept {value}")));
        }
        if self.panic_items.contains(value) {
            panic!("flaky sink panicked on {value}");
        }
        if self.transient_items.contains(value) {
            return Err(TaskError::transient("flaky_sink", anyhow::anyhow!("retry later: {value}")));
        }

        self.accepted.lock().unwrap().push((worker_id, item.clone()));
        Ok(())
    }
}

/// 出力行を記録する報告実装
#[derive(Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<String>>,
    errors: Mutex<Vec<(String, bool)>>,
    stopped: Mutex<Vec<TaskStats>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// (タスク名, 回復可能か) の一覧
    pub fn errors(&self) -> Vec<(String, bool)> {
        self.errors.lock().unwrap().clone()
    }

    pub fn stopped_tasks(&self) -> Vec<TaskStats> {
        self.stopped.lock().unwrap().clone()
    }
}

impl ActivityReporter for RecordingReporter {
    fn report_added(&self, item: &Item) {
        self.lines.lock().unwrap().push(format!("ADD {item}"));
    }

    fn report_removed(&self, _worker_id: usize, item: &Item) {
        self.lines.lock().unwrap().push(format!("REMOVE {item}"));
    }

    fn report_error(&self, task: &str, error: &TaskError) {
        self.errors
            .lock()
            .unwrap()
            .push((task.to_string(), error.is_recoverable()));
    }

    fn report_stopped(&self, stats: &TaskStats) {
        self.stopped.lock().unwrap().push(stats.clone());
    }
}

/// 指定回目の追加・削除報告でパニックする報告実装（出力先の消失を模す）
#[derive(Default)]
pub struct PanickyReporter {
    added_calls: AtomicU64,
    removed_calls: AtomicU64,
    panic_on_added: Option<u64>,
    panic_on_removed: Option<u64>,
    errors: Mutex<Vec<(String, bool)>>,
}

impl PanickyReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panicking_on_added(mut self, call: u64) -> Self {
        self.panic_on_added = Some(call);
        self
    }

    pub fn panicking_on_removed(mut self, call: u64) -> Self {
        self.panic_on_removed = Some(call);
        self
    }

    pub fn errors(&self) -> Vec<(String, bool)> {
        self.errors.lock().unwrap().clone()
    }
}

impl ActivityReporter for PanickyReporter {
    fn report_added(&self, _item: &Item) {
        let call = self.added_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.panic_on_added == Some(call) {
            panic!("stdout closed on add #{call}");
        }
    }

    fn report_removed(&self, _worker_id: usize, _item: &Item) {
        let call = self.removed_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.panic_on_removed == Some(call) {
            panic!("stdout closed on remove #{call}");
        }
    }

    fn report_error(&self, task: &str, error: &TaskError) {
        self.errors
            .lock()
            .unwrap()
            .push((task.to_string(), error.is_recoverable()));
    }

    fn report_stopped(&self, _stats: &TaskStats) {}
}

/// 全ての要素を致命的エラーで拒否する受け取り先
#[derive(Default)]
pub struct RejectingSink;

impl ItemSink for RejectingSink {
    fn consume(&self, _worker_id: usize, item: &Item) -> Result<(), TaskError> {
        Err(TaskError::fatal("rejecting_sink", anyhow::anyhow!("refused {item}")))
    }
}
