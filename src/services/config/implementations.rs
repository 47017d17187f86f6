// 設定管理の具象実装

use crate::core::{RelayConfig, TaskError, TaskResult, WakePolicy};
use crate::engine::DEFAULT_POOL_SLOTS;
use std::time::Duration;

/// デフォルト設定実装（8スロット・1プロデューサ・4コンシューマ・無制限キュー）
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultRelayConfig {
    slots: usize,
    producers: usize,
    consumers: usize,
    capacity: Option<usize>,
    wake: WakePolicy,
    pause: Option<Duration>,
    max_items: Option<u64>,
}

impl DefaultRelayConfig {
    pub fn new(slots: usize) -> Self {
        Self {
            slots,
            ..Self::default()
        }
    }

    pub fn with_slots(mut self, slots: usize) -> Self {
        self.slots = slots;
        self
    }

    pub fn with_producers(mut self, producers: usize) -> Self {
        self.producers = producers;
        self
    }

    pub fn with_consumers(mut self, consumers: usize) -> Self {
        self.consumers = consumers;
        self
    }

    pub fn with_capacity(mut self, capacity: Option<usize>) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_wake_policy(mut self, wake: WakePolicy) -> Self {
        self.wake = wake;
        self
    }

    pub fn with_pause(mut self, pause: Option<Duration>) -> Self {
        self.pause = pause;
        self
    }

    pub fn with_max_items(mut self, max_items: Option<u64>) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn validate(&self) -> TaskResult<()> {
        validate_config(self)
    }
}

impl Default for DefaultRelayConfig {
    fn default() -> Self {
        Self {
            slots: DEFAULT_POOL_SLOTS,
            producers: 1,
            consumers: 4,
            capacity: None,
            wake: WakePolicy::One,
            pause: None,
            max_items: None,
        }
    }
}

impl RelayConfig for DefaultRelayConfig {
    fn pool_slots(&self) -> usize {
        self.slots
    }

    fn producer_count(&self) -> usize {
        self.producers
    }

    fn consumer_count(&self) -> usize {
        self.consumers
    }

    fn queue_capacity(&self) -> Option<usize> {
        self.capacity
    }

    fn wake_policy(&self) -> WakePolicy {
        self.wake
    }

    fn producer_pause(&self) -> Option<Duration> {
        self.pause
    }

    fn max_items(&self) -> Option<u64> {
        self.max_items
    }
}

/// 設定値の整合性を検証
///
/// ワーカープール自体はスロット数を超えたタスクを待機させるが、
/// システムのタスクは終了しないため、全タスクが同時にスロットを占有できる必要がある。
pub fn validate_config<C>(config: &C) -> TaskResult<()>
where
    C: RelayConfig + ?Sized,
{
    let slots = config.pool_slots();
    let tasks = config
        .producer_count()
        .checked_add(config.consumer_count())
        .ok_or_else(|| TaskError::configuration("タスク数が大きすぎます"))?;

    if slots == 0 {
        return Err(TaskError::configuration(
            "ワーカースロット数は1以上である必要があります",
        ));
    }
    if config.producer_count() == 0 {
        return Err(TaskError::configuration(
            "プロデューサ数は1以上である必要があります",
        ));
    }
    if config.consumer_count() == 0 {
        return Err(TaskError::configuration(
            "コンシューマ数は1以上である必要があります",
        ));
    }
    if tasks > slots {
        return Err(TaskError::configuration(format!(
            "タスク数({tasks})がスロット数({slots})を超えています"
        )));
    }
    if config.queue_capacity() == Some(0) {
        return Err(TaskError::configuration(
            "キュー容量は1以上である必要があります",
        ));
    }
    Ok(())
}
