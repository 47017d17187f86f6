// 反復単位の失敗隔離 - パニックをタスクエラーに変換する

use crate::core::{TaskError, TaskResult};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// 一回の反復を実行し、パニックを`TaskError::PanickedError`として返す
pub(crate) fn run_guarded<T, F>(task: &str, iteration: F) -> TaskResult<T>
where
    F: FnOnce() -> TaskResult<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(iteration)) {
        Ok(result) => result,
        Err(payload) => Err(TaskError::panicked(task, panic_message(payload.as_ref()))),
    }
}

/// ロック内の観測コールバックを実行し、パニックした場合はその内容を返す
pub(crate) fn catch_observer<F>(observer: F) -> Option<String>
where
    F: FnOnce(),
{
    panic::catch_unwind(AssertUnwindSafe(observer))
        .err()
        .map(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
