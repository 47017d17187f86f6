// キュー連携に関連するデータ型定義

use serde::{Deserialize, Serialize};
use std::fmt;

/// キューを流れる不透明な値（重複可）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(String);

impl Item {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Item {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Item {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// push時に待機中のコンシューマを起こす方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WakePolicy {
    /// 待機者を一つだけ起こす
    #[default]
    One,
    /// 待機者を全て起こす
    All,
}

/// タスクの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Producer,
    Consumer,
}

impl TaskKind {
    /// ワーカー番号付きのタスク名を生成
    pub fn task_name(&self, worker_id: usize) -> String {
        match self {
            Self::Producer => format!("producer-{worker_id}"),
            Self::Consumer => format!("consumer-{worker_id}"),
        }
    }
}

/// タスクが終了した理由
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    /// 停止シグナルを受けて終了
    Stopped,
    /// 生成上限に到達して終了
    Exhausted,
    /// キューが閉じられて終了
    QueueClosed,
    /// 回復不能なエラーで終了
    Failed(String),
}

/// タスク単位の実行統計
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub task: String,
    pub kind: TaskKind,
    pub iterations: u64,
    pub completed: u64,
    pub transient_failures: u64,
    pub outcome: TaskOutcome,
}

impl TaskStats {
    pub fn new(task: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            task: task.into(),
            kind,
            iterations: 0,
            completed: 0,
            transient_failures: 0,
            outcome: TaskOutcome::Stopped,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, TaskOutcome::Failed(_))
    }
}

/// 実行全体のサマリー
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub pushed: u64,
    pub popped: u64,
    pub remaining: usize,
    pub error_count: u64,
    pub elapsed_ms: u64,
    pub tasks: Vec<TaskStats>,
}

impl RunSummary {
    /// タスク統計から集計を作成
    pub fn from_tasks(tasks: Vec<TaskStats>, remaining: usize, elapsed_ms: u64) -> Self {
        let pushed = Self::sum_completed(&tasks, TaskKind::Producer);
        let popped = Self::sum_completed(&tasks, TaskKind::Consumer);
        let error_count = tasks
            .iter()
            .map(|stats| stats.transient_failures + u64::from(stats.is_failed()))
            .sum();

        Self {
            pushed,
            popped,
            remaining,
            error_count,
            elapsed_ms,
            tasks,
        }
    }

    fn sum_completed(tasks: &[TaskStats], kind: TaskKind) -> u64 {
        tasks
            .iter()
            .filter(|stats| stats.kind == kind)
            .map(|stats| stats.completed)
            .sum()
    }

    /// 追加数 = 取り出し数 + 残数 が成り立つか
    pub fn is_balanced(&self) -> bool {
        self.pushed == self.popped + self.remaining as u64
    }
}
