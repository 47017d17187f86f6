// Producer - 要素を生成して共有キューへ追加する

use super::guard::run_guarded;
use super::pool::{TaskHandle, WorkerPool};
use super::queue::SharedQueue;
use crate::core::{
    ActivityReporter, Item, ItemSource, StopSignal, TaskError, TaskKind, TaskOutcome, TaskStats,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// 停止されるまで生成と追加を繰り返すタスク
pub struct ProducerTask<S, R> {
    name: String,
    source: S,
    queue: Arc<SharedQueue<Item>>,
    reporter: Arc<R>,
    stop: StopSignal,
    max_items: Option<u64>,
    pause: Option<Duration>,
}

impl<S, R> ProducerTask<S, R>
where
    S: ItemSource,
    R: ActivityReporter,
{
    pub fn new(
        worker_id: usize,
        source: S,
        queue: Arc<SharedQueue<Item>>,
        reporter: Arc<R>,
        stop: StopSignal,
    ) -> Self {
        Self {
            name: TaskKind::Producer.task_name(worker_id),
            source,
            queue,
            reporter,
            stop,
            max_items: None,
            pause: None,
        }
    }

    /// 追加数の上限（到達すると`Exhausted`で終了）
    pub fn with_max_items(mut self, max_items: Option<u64>) -> Self {
        self.max_items = max_items;
        self
    }

    /// 反復間の休止時間
    pub fn with_pause(mut self, pause: Option<Duration>) -> Self {
        self.pause = pause;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// メインループ
    pub fn run(mut self) -> TaskStats {
        let mut stats = TaskStats::new(&self.name, TaskKind::Producer);
        tracing::debug!(task = %self.name, "producer started");

        loop {
            if self.stop.is_stopped() {
                stats.outcome = TaskOutcome::Stopped;
                break;
            }
            if self.max_items.is_some_and(|limit| stats.completed >= limit) {
                stats.outcome = TaskOutcome::Exhausted;
                break;
            }

            stats.iterations += 1;
            match self.produce_one() {
                Ok(observer_panic) => {
                    // キューへの追加は成立しているので、報告の失敗とは別に数える
                    stats.completed += 1;
                    if let Some(message) = observer_panic {
                        stats.transient_failures += 1;
                        self.reporter
                            .report_error(&self.name, &TaskError::panicked(&self.name, message));
                    }
                }
                Err(TaskError::QueueFailure { .. }) => {
                    stats.outcome = TaskOutcome::QueueClosed;
                    break;
                }
                Err(error) if error.is_recoverable() => {
                    stats.transient_failures += 1;
                    self.reporter.report_error(&self.name, &error);
                }
                Err(error) => {
                    self.reporter.report_error(&self.name, &error);
                    stats.outcome = TaskOutcome::Failed(error.to_string());
                    break;
                }
            }

            if let Some(pause) = self.pause {
                thread::sleep(pause);
            }
        }

        self.reporter.report_stopped(&stats);
        stats
    }

    // 追加後の報告でパニックした場合はその内容を返す
    fn produce_one(&mut self) -> Result<Option<String>, TaskError> {
        run_guarded(&self.name, || {
            let item = self.source.next_item()?;
            let pushed = self
                .queue
                .push_with(item, |added| self.reporter.report_added(added))?;
            Ok(pushed.observer_panic)
        })
    }
}

/// Producerをワーカープールへ投入
pub fn spawn_producer<S, R>(pool: &WorkerPool, task: ProducerTask<S, R>) -> TaskHandle<TaskStats>
where
    S: ItemSource + 'static,
    R: ActivityReporter + 'static,
{
    let name = task.name().to_string();
    pool.dispatch(name, move || task.run())
}
