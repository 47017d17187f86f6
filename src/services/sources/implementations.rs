// 要素生成元の具象実装

use crate::core::{Item, ItemSource, TaskResult};
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// 現在時刻（エポックミリ秒）を文字列化した要素を生成
///
/// 同じミリ秒内では同じ値が続く（重複は許容される）。
#[derive(Debug, Default, Clone)]
pub struct TimestampSource;

impl TimestampSource {
    pub fn new() -> Self {
        Self
    }
}

impl ItemSource for TimestampSource {
    fn next_item(&mut self) -> TaskResult<Item> {
        Ok(Item::new(Utc::now().timestamp_millis().to_string()))
    }
}

/// 連番の要素を生成（クローン間でカウンタを共有し、値は重複しない）
#[derive(Debug, Default, Clone)]
pub struct SequenceSource {
    next: Arc<AtomicU64>,
}

impl SequenceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(start: u64) -> Self {
        Self {
            next: Arc::new(AtomicU64::new(start)),
        }
    }

    /// 次に払い出される値
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl ItemSource for SequenceSource {
    fn next_item(&mut self) -> TaskResult<Item> {
        let value = self.next.fetch_add(1, Ordering::Relaxed);
        Ok(Item::new(value.to_string()))
    }
}
