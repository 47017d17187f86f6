// コアレイヤー - 基盤となるトレイト、型、エラー定義
// 他のレイヤーから参照される基本的な抽象化を提供

pub mod error;
pub mod signal;
pub mod traits;
pub mod types;

// 公開API
pub use error::{ErrorSeverity, QueueError, QueueResult, TaskError, TaskResult};
pub use signal::StopSignal;
pub use traits::{ActivityReporter, ItemSink, ItemSource, RelayConfig};
pub use types::{Item, RunSummary, TaskKind, TaskOutcome, TaskStats, WakePolicy};
