// WorkerPool - 固定数のOSスレッドスロットへ長時間タスクを投入する
// tokioランタイムのブロッキングプールをスロットとして使う

use crate::core::{TaskError, TaskResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

/// 既定のスロット数
pub const DEFAULT_POOL_SLOTS: usize = 8;

/// 投入済みタスクのハンドル
pub struct TaskHandle<T> {
    name: String,
    inner: tokio::task::JoinHandle<T>,
}

impl<T> TaskHandle<T> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

// 実行中のスロット数を数えるガード
struct SlotGuard {
    active: Arc<AtomicUsize>,
}

impl SlotGuard {
    fn occupy(active: Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::SeqCst);
        Self { active }
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// 固定サイズのワーカープール
///
/// スロット数を超えて投入されたタスクは空きが出るまで待機する。
/// 再配分・サイズ変更・失敗タスクの置き換えは行わない。
/// `join`と`shutdown`は非同期コンテキストの外から呼ぶこと。
pub struct WorkerPool {
    runtime: Runtime,
    slots: usize,
    active: Arc<AtomicUsize>,
}

impl WorkerPool {
    pub fn new(slots: usize) -> TaskResult<Self> {
        if slots == 0 {
            return Err(TaskError::configuration(
                "ワーカースロット数は1以上である必要があります",
            ));
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(slots)
            .thread_name("queue-worker")
            .enable_time()
            .build()
            .map_err(|e| TaskError::pool(format!("ランタイムの起動に失敗しました: {e}")))?;

        tracing::debug!(slots, "worker pool created");

        Ok(Self {
            runtime,
            slots,
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// タスクを空きスロットへ投入
    pub fn dispatch<F, T>(&self, name: impl Into<String>, job: F) -> TaskHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let name = name.into();
        if self.active() >= self.slots {
            tracing::warn!(task = %name, slots = self.slots, "all worker slots busy, task is queued");
        }

        let active = Arc::clone(&self.active);
        let task = name.clone();
        let inner = self.runtime.spawn_blocking(move || {
            let _slot = SlotGuard::occupy(active);
            tracing::debug!(task = %task, "task running on worker slot");
            job()
        });

        TaskHandle { name, inner }
    }

    /// タスクの完了を待って結果を取得
    pub fn join<T>(&self, handle: TaskHandle<T>) -> TaskResult<T> {
        let TaskHandle { name, inner } = handle;
        self.runtime.block_on(inner).map_err(|e| {
            tracing::error!(task = %name, error = %e, "task terminated abnormally");
            TaskError::join(e)
        })
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    /// 現在タスクが実行中のスロット数
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn idle_slots(&self) -> usize {
        self.slots.saturating_sub(self.active())
    }

    /// ランタイムを停止（終了しないタスクは`timeout`後に切り離される）
    pub fn shutdown(self, timeout: Duration) {
        tracing::debug!(active = self.active(), "worker pool shutting down");
        self.runtime.shutdown_timeout(timeout);
    }
}
