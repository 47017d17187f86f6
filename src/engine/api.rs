// 高レベル公開API
// QueueSystemを簡単に使用できるようにするための便利な関数

use super::system::QueueSystem;
use crate::core::{ItemSink, RunSummary, TaskResult};
use crate::services::{
    ConsoleActivityReporter, DefaultRelayConfig, NoOpActivityReporter, TimestampSource,
};
use std::sync::Arc;

/// 既定構成（8スロット・1プロデューサ・4コンシューマ）のシステムを作成
pub fn create_default_queue_system() -> QueueSystem<DefaultRelayConfig, ConsoleActivityReporter>
{
    QueueSystem::new(DefaultRelayConfig::default(), ConsoleActivityReporter::new())
}

/// 出力なしのシステムを作成（テスト・ベンチマーク用）
pub fn create_quiet_queue_system(
    config: DefaultRelayConfig,
) -> QueueSystem<DefaultRelayConfig, NoOpActivityReporter> {
    QueueSystem::new(config, NoOpActivityReporter::new())
}

/// タイムスタンプ要素を`max_items`個生成して全て取り出すまで実行
pub fn run_bounded<K>(
    config: DefaultRelayConfig,
    max_items: u64,
    sink: Arc<K>,
) -> TaskResult<RunSummary>
where
    K: ItemSink + 'static,
{
    create_quiet_queue_system(config.with_max_items(Some(max_items)))
        .launch(TimestampSource::new(), sink)?
        .wait()
}
