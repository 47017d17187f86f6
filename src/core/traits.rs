// キュー連携システムのトレイト定義
// 設定・生成・消費・報告の抽象化インターフェース

use super::error::{TaskError, TaskResult};
use super::types::{Item, TaskStats, WakePolicy};
use mockall::automock;
use std::time::Duration;

/// 実行設定を抽象化するトレイト
#[automock]
pub trait RelayConfig: Send + Sync {
    /// ワーカープールのスロット数
    fn pool_slots(&self) -> usize;

    /// プロデューサ数
    fn producer_count(&self) -> usize;

    /// コンシューマ数
    fn consumer_count(&self) -> usize;

    /// キュー容量（Noneは無制限）
    fn queue_capacity(&self) -> Option<usize>;

    /// push時の起床方式
    fn wake_policy(&self) -> WakePolicy;

    /// プロデューサの反復間の休止時間（Noneは休止なし）
    fn producer_pause(&self) -> Option<Duration>;

    /// プロデューサ一つあたりの生成上限（Noneは無制限）
    fn max_items(&self) -> Option<u64>;
}

/// 要素の生成元
///
/// 失敗は`TaskError::transient`か`TaskError::fatal`で分類して返す。
#[automock]
pub trait ItemSource: Send {
    fn next_item(&mut self) -> TaskResult<Item>;
}

/// 取り出された要素の受け取り先
#[automock]
pub trait ItemSink: Send + Sync {
    fn consume(&self, worker_id: usize, item: &Item) -> TaskResult<()>;
}

/// 追加・削除・エラーの報告
///
/// `report_added`と`report_removed`はキューのロック内で呼ばれる。
#[automock]
pub trait ActivityReporter: Send + Sync {
    fn report_added(&self, item: &Item);

    fn report_removed(&self, worker_id: usize, item: &Item);

    fn report_error(&self, task: &str, error: &TaskError);

    fn report_stopped(&self, stats: &TaskStats);
}
