// Consumer - 共有キューから要素を取り出して報告する

use super::guard::run_guarded;
use super::pool::{TaskHandle, WorkerPool};
use super::queue::{Observed, SharedQueue};
use crate::core::{
    ActivityReporter, Item, ItemSink, QueueError, StopSignal, TaskError, TaskKind, TaskOutcome,
    TaskStats,
};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 空のキューで待機中に停止シグナルを確認する間隔
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// キューが閉じられるまで取り出しを繰り返すタスク
pub struct ConsumerTask<K, R> {
    worker_id: usize,
    name: String,
    queue: Arc<SharedQueue<Item>>,
    sink: Arc<K>,
    reporter: Arc<R>,
    stop: StopSignal,
}

impl<K, R> ConsumerTask<K, R>
where
    K: ItemSink,
    R: ActivityReporter,
{
    pub fn new(
        worker_id: usize,
        queue: Arc<SharedQueue<Item>>,
        sink: Arc<K>,
        reporter: Arc<R>,
        stop: StopSignal,
    ) -> Self {
        Self {
            worker_id,
            name: TaskKind::Consumer.task_name(worker_id),
            queue,
            sink,
            reporter,
            stop,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// メインループ
    ///
    /// 停止シグナル後もキューに残っている要素は処理してから終了する。
    /// キューが閉じられなくても、停止シグナルは`STOP_POLL_INTERVAL`以内に反映される。
    pub fn run(self) -> TaskStats {
        let mut stats = TaskStats::new(&self.name, TaskKind::Consumer);
        tracing::debug!(task = %self.name, "consumer started");

        loop {
            if self.stop.is_stopped() && self.queue.is_empty() {
                stats.outcome = TaskOutcome::Stopped;
                break;
            }

            stats.iterations += 1;
            let item = match self.take_one() {
                Ok(Observed {
                    value,
                    observer_panic,
                }) => {
                    // 取り出しは成立しているので、報告に失敗しても要素は受け渡す
                    stats.completed += 1;
                    if let Some(message) = observer_panic {
                        stats.transient_failures += 1;
                        self.reporter
                            .report_error(&self.name, &TaskError::panicked(&self.name, message));
                    }
                    value
                }
                Err(TaskError::QueueFailure {
                    source: QueueError::Timeout,
                }) => {
                    stats.iterations -= 1;
                    continue;
                }
                Err(TaskError::QueueFailure { .. }) => {
                    stats.iterations -= 1;
                    stats.outcome = TaskOutcome::QueueClosed;
                    break;
                }
                Err(error) => match self.absorb(&mut stats, error) {
                    ControlFlow::Continue(()) => continue,
                    ControlFlow::Break(()) => break,
                },
            };

            if let Err(error) = self.deliver(&item) {
                if self.absorb(&mut stats, error).is_break() {
                    break;
                }
            }
        }

        self.reporter.report_stopped(&stats);
        stats
    }

    fn take_one(&self) -> Result<Observed<Item>, TaskError> {
        run_guarded(&self.name, || {
            let popped = self.queue.pop_timeout_with(STOP_POLL_INTERVAL, |removed| {
                self.reporter.report_removed(self.worker_id, removed)
            })?;
            Ok(popped)
        })
    }

    fn deliver(&self, item: &Item) -> Result<(), TaskError> {
        run_guarded(&self.name, || self.sink.consume(self.worker_id, item))
    }

    // 回復可能なら継続、そうでなければタスクを終了させる
    fn absorb(&self, stats: &mut TaskStats, error: TaskError) -> ControlFlow<()> {
        self.reporter.report_error(&self.name, &error);
        if error.is_recoverable() {
            stats.transient_failures += 1;
            ControlFlow::Continue(())
        } else {
            stats.outcome = TaskOutcome::Failed(error.to_string());
            ControlFlow::Break(())
        }
    }
}

// 最後に終了したコンシューマがキューを閉じ、空き待ちのプロデューサを解放する
struct LastConsumerOut {
    live: Arc<AtomicUsize>,
    queue: Arc<SharedQueue<Item>>,
}

impl Drop for LastConsumerOut {
    fn drop(&mut self) {
        if self.live.fetch_sub(1, Ordering::AcqRel) == 1 && !self.queue.is_closed() {
            tracing::warn!("all consumers stopped, closing queue");
            self.queue.close();
        }
    }
}

/// Consumers: 同じキューを共有する複数のワーカー
///
/// 全員が終了した時点でキューは閉じられる。
pub fn spawn_consumers<K, R>(
    pool: &WorkerPool,
    queue: &Arc<SharedQueue<Item>>,
    sink: &Arc<K>,
    reporter: &Arc<R>,
    stop: &StopSignal,
    worker_count: usize,
) -> Vec<TaskHandle<TaskStats>>
where
    K: ItemSink + 'static,
    R: ActivityReporter + 'static,
{
    let live = Arc::new(AtomicUsize::new(worker_count));

    (0..worker_count)
        .map(|worker_id| {
            let task = ConsumerTask::new(
                worker_id,
                Arc::clone(queue),
                Arc::clone(sink),
                Arc::clone(reporter),
                stop.clone(),
            );
            let last_out = LastConsumerOut {
                live: Arc::clone(&live),
                queue: Arc::clone(queue),
            };
            let name = task.name().to_string();
            pool.dispatch(name, move || {
                let _last_out = last_out;
                task.run()
            })
        })
        .collect()
}
