// サービス層 - 機能別の具象実装
// 設定・報告・要素の生成元と受け取り先

pub mod config;
pub mod monitoring;
pub mod sinks;
pub mod sources;

// 公開API - 各サービスの主要機能を明示的にエクスポート
pub use config::{validate_config, DefaultRelayConfig};
pub use monitoring::{ConsoleActivityReporter, NoOpActivityReporter};
pub use sinks::{MemoryItemSink, NoOpItemSink};
pub use sources::{SequenceSource, TimestampSource};
