// 停止シグナル - 無限ループのタスクを決定的に終了させる

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 全タスクで共有される停止フラグ
///
/// クローンは同じフラグを参照する。各タスクは反復ごとに確認する。
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// 停止を要求（複数回呼んでも安全）
    pub fn trigger(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}
