// 活動監視機能
// 追加・削除の出力、エラー通知、停止通知

pub mod implementations;

// 公開API
pub use implementations::{ConsoleActivityReporter, NoOpActivityReporter};
