// SharedQueue - 一つのロックと条件変数で守られたFIFOバッファ

use super::guard::catch_observer;
use crate::core::{QueueError, QueueResult, WakePolicy};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// ロック内で呼んだ観測コールバックの結果付きの値
#[derive(Debug, PartialEq, Eq)]
pub struct Observed<T> {
    pub value: T,
    /// コールバックがパニックした場合のメッセージ
    pub observer_panic: Option<String>,
}

struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// プロデューサとコンシューマで共有されるキュー
///
/// 内容の読み書きは必ず`state`のロック内で行う。
/// `pop`は起床のたびに空かどうかを確認し直すため、複数のコンシューマが
/// 同じ通知を取り合っても同じ要素を二度返すことはない。
pub struct SharedQueue<T> {
    state: Mutex<QueueState<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: Option<usize>,
    wake_policy: WakePolicy,
}

impl<T> SharedQueue<T> {
    /// 容量無制限のキューを作成
    pub fn new() -> Self {
        Self::with_capacity_limit(None)
    }

    /// 容量付きのキューを作成（満杯時のpushは空きが出るまで待機）
    pub fn bounded(capacity: usize) -> Self {
        Self::with_capacity_limit(Some(capacity.max(1)))
    }

    fn with_capacity_limit(capacity: Option<usize>) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
            wake_policy: WakePolicy::default(),
        }
    }

    pub fn with_wake_policy(mut self, wake_policy: WakePolicy) -> Self {
        self.wake_policy = wake_policy;
        self
    }

    // VecDequeの操作は途中で中断されないため、ポイズンされても状態は一貫している
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wake(&self, condvar: &Condvar) {
        match self.wake_policy {
            WakePolicy::One => condvar.notify_one(),
            WakePolicy::All => condvar.notify_all(),
        }
    }

    /// 末尾に追加して待機中のコンシューマを起こす
    pub fn push(&self, item: T) -> QueueResult<()> {
        self.push_with(item, |_| {}).map(|observed| observed.value)
    }

    /// 末尾に追加し、ロックを保持したまま`on_enqueued`を呼ぶ
    ///
    /// 追加後に`on_enqueued`がパニックしても追加は取り消されず、
    /// パニックの内容は`Observed::observer_panic`で返す。
    pub fn push_with<F>(&self, item: T, on_enqueued: F) -> QueueResult<Observed<()>>
    where
        F: FnOnce(&T),
    {
        let mut state = self.lock();

        if let Some(capacity) = self.capacity {
            while !state.closed && state.items.len() >= capacity {
                state = self
                    .not_full
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        }

        if state.closed {
            return Err(QueueError::Closed);
        }

        state.items.push_back(item);
        self.wake(&self.not_empty);

        let observer_panic = state
            .items
            .back()
            .and_then(|enqueued| catch_observer(|| on_enqueued(enqueued)));
        Ok(Observed {
            value: (),
            observer_panic,
        })
    }

    /// 先頭を取り出す（空の間は待機）
    pub fn pop(&self) -> QueueResult<T> {
        self.pop_with(|_| {}).map(|observed| observed.value)
    }

    /// 先頭を取り出し、ロックを保持したまま`on_dequeued`を呼ぶ
    ///
    /// 閉じられたキューでも残っている要素は返し、空になってから`Closed`を返す。
    /// `on_dequeued`がパニックしても取り出した要素は呼び出し元へ返す。
    pub fn pop_with<F>(&self, on_dequeued: F) -> QueueResult<Observed<T>>
    where
        F: FnOnce(&T),
    {
        self.pop_until(None, on_dequeued)
    }

    /// `pop_with`の期限付き版（期限切れは`Timeout`）
    pub fn pop_timeout_with<F>(&self, timeout: Duration, on_dequeued: F) -> QueueResult<Observed<T>>
    where
        F: FnOnce(&T),
    {
        self.pop_until(Some(Instant::now() + timeout), on_dequeued)
    }

    fn pop_until<F>(&self, deadline: Option<Instant>, on_dequeued: F) -> QueueResult<Observed<T>>
    where
        F: FnOnce(&T),
    {
        let mut state = self.lock();

        loop {
            if let Some(item) = state.items.pop_front() {
                if self.capacity.is_some() {
                    self.wake(&self.not_full);
                }
                let observer_panic = catch_observer(|| on_dequeued(&item));
                return Ok(Observed {
                    value: item,
                    observer_panic,
                });
            }

            if state.closed {
                return Err(QueueError::Closed);
            }

            state = match deadline {
                None => self
                    .not_empty
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(QueueError::Timeout);
                    }
                    self.not_empty
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
            };
        }
    }

    /// キューを閉じ、待機中の全スレッドを起こす
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn wake_policy(&self) -> WakePolicy {
        self.wake_policy
    }
}

impl<T> Default for SharedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
