// エンジン層 - 共有キューと並列タスクのオーケストレーション
// サービス層の実装を組み合わせて高レベルな処理を提供

pub mod api;
pub mod consumer;
mod guard;
pub mod pool;
pub mod producer;
pub mod queue;
pub mod system;

// 公開API
pub use api::{create_default_queue_system, create_quiet_queue_system, run_bounded};
pub use consumer::{spawn_consumers, ConsumerTask};
pub use pool::{TaskHandle, WorkerPool, DEFAULT_POOL_SLOTS};
pub use producer::{spawn_producer, ProducerTask};
pub use queue::{Observed, SharedQueue};
pub use system::{QueueSystem, RunningSystem};
