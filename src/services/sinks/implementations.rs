// 要素受け取り先の具象実装

use crate::core::{Item, ItemSink, TaskResult};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// 受け取った要素を破棄する実装（既定）
#[derive(Debug, Default, Clone)]
pub struct NoOpItemSink;

impl NoOpItemSink {
    pub fn new() -> Self {
        Self
    }
}

impl ItemSink for NoOpItemSink {
    fn consume(&self, _worker_id: usize, _item: &Item) -> TaskResult<()> {
        Ok(())
    }
}

/// メモリ内記録の実装（テスト用）
#[derive(Debug, Default)]
pub struct MemoryItemSink {
    consumed: Mutex<Vec<(usize, Item)>>,
}

impl MemoryItemSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 受け取った順の要素一覧
    pub fn consumed_items(&self) -> Vec<Item> {
        self.lock().iter().map(|(_, item)| item.clone()).collect()
    }

    /// ワーカーごとの受け取り数
    pub fn per_worker_counts(&self) -> HashMap<usize, usize> {
        let mut counts = HashMap::new();
        for (worker_id, _) in self.lock().iter() {
            *counts.entry(*worker_id).or_insert(0) += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(usize, Item)>> {
        self.consumed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ItemSink for MemoryItemSink {
    fn consume(&self, worker_id: usize, item: &Item) -> TaskResult<()> {
        self.lock().push((worker_id, item.clone()));
        Ok(())
    }
}
