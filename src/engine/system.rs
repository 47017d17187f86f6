// QueueSystem - 設定・キュー・プール・タスクを組み立てるオーケストレーション

use super::consumer::spawn_consumers;
use super::pool::{TaskHandle, WorkerPool};
use super::producer::{spawn_producer, ProducerTask};
use super::queue::SharedQueue;
use crate::core::{
    ActivityReporter, Item, ItemSink, ItemSource, RelayConfig, RunSummary, StopSignal,
    TaskResult, TaskStats,
};
use crate::services::validate_config;
use std::sync::Arc;
use std::time::{Duration, Instant};

const POOL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// 一つの共有キューに対してプロデューサとコンシューマを起動するシステム
pub struct QueueSystem<C, R> {
    config: C,
    reporter: Arc<R>,
}

impl<C, R> QueueSystem<C, R>
where
    C: RelayConfig,
    R: ActivityReporter + 'static,
{
    pub fn new(config: C, reporter: R) -> Self {
        Self {
            config,
            reporter: Arc::new(reporter),
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn reporter(&self) -> Arc<R> {
        Arc::clone(&self.reporter)
    }

    /// 設定どおりにキューを作成し、全タスクをワーカープールへ投入
    ///
    /// プロデューサごとに`source`のクローンを渡す。
    pub fn launch<S, K>(&self, source: S, sink: Arc<K>) -> TaskResult<RunningSystem>
    where
        S: ItemSource + Clone + 'static,
        K: ItemSink + 'static,
    {
        validate_config(&self.config)?;

        let queue = match self.config.queue_capacity() {
            Some(capacity) => SharedQueue::bounded(capacity),
            None => SharedQueue::new(),
        }
        .with_wake_policy(self.config.wake_policy());
        let queue = Arc::new(queue);

        let stop = StopSignal::new();
        let pool = WorkerPool::new(self.config.pool_slots())?;

        let producers = (0..self.config.producer_count())
            .map(|worker_id| {
                let task = ProducerTask::new(
                    worker_id,
                    source.clone(),
                    Arc::clone(&queue),
                    Arc::clone(&self.reporter),
                    stop.clone(),
                )
                .with_max_items(self.config.max_items())
                .with_pause(self.config.producer_pause());
                spawn_producer(&pool, task)
            })
            .collect();

        let consumers = spawn_consumers(
            &pool,
            &queue,
            &sink,
            &self.reporter,
            &stop,
            self.config.consumer_count(),
        );

        tracing::info!(
            slots = pool.slots(),
            producers = self.config.producer_count(),
            consumers = self.config.consumer_count(),
            capacity = ?queue.capacity(),
            wake = ?queue.wake_policy(),
            "queue system launched"
        );

        Ok(RunningSystem {
            pool,
            queue,
            stop,
            producers,
            consumers,
            started: Instant::now(),
        })
    }
}

/// 起動済みシステムのハンドル
///
/// `wait`・`shutdown`・`run_for`のいずれかで終了させる。
pub struct RunningSystem {
    pool: WorkerPool,
    queue: Arc<SharedQueue<Item>>,
    stop: StopSignal,
    producers: Vec<TaskHandle<TaskStats>>,
    consumers: Vec<TaskHandle<TaskStats>>,
    started: Instant,
}

impl RunningSystem {
    pub fn queue(&self) -> &Arc<SharedQueue<Item>> {
        &self.queue
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// プロデューサの終了を待ち、キューを閉じて残りをコンシューマに処理させる
    ///
    /// 生成上限がない場合は外部から停止されるまで戻らない。
    pub fn wait(self) -> TaskResult<RunSummary> {
        let Self {
            pool,
            queue,
            stop: _,
            producers,
            consumers,
            started,
        } = self;

        let mut results = join_all(&pool, producers);
        queue.close();
        results.extend(join_all(&pool, consumers));

        finish(pool, &queue, results, started)
    }

    /// 停止シグナルを出してキューを閉じ、全タスクの終了を待つ
    pub fn shutdown(self) -> TaskResult<RunSummary> {
        tracing::info!("queue system shutting down");
        self.stop.trigger();
        self.queue.close();
        self.wait()
    }

    /// 指定時間だけ実行してから停止する
    pub fn run_for(self, duration: Duration) -> TaskResult<RunSummary> {
        std::thread::sleep(duration);
        self.shutdown()
    }
}

fn join_all(pool: &WorkerPool, handles: Vec<TaskHandle<TaskStats>>) -> Vec<TaskResult<TaskStats>> {
    handles
        .into_iter()
        .map(|handle| {
            tracing::debug!(task = handle.name(), "waiting for task");
            pool.join(handle)
        })
        .collect()
}

fn finish(
    pool: WorkerPool,
    queue: &SharedQueue<Item>,
    results: Vec<TaskResult<TaskStats>>,
    started: Instant,
) -> TaskResult<RunSummary> {
    pool.shutdown(POOL_SHUTDOWN_TIMEOUT);

    let tasks = results.into_iter().collect::<TaskResult<Vec<_>>>()?;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let summary = RunSummary::from_tasks(tasks, queue.len(), elapsed_ms);

    tracing::info!(
        pushed = summary.pushed,
        popped = summary.popped,
        remaining = summary.remaining,
        errors = summary.error_count,
        "queue system finished"
    );
    Ok(summary)
}
