// キュー連携用のカスタムエラー型
// キュー操作のエラーとタスク反復のエラーを分類する

use thiserror::Error;

/// 共有キュー操作のエラー型
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// キューが閉じられ、取り出せる要素も残っていない
    #[error("キューは閉じられています")]
    Closed,

    /// 指定時間内に要素を取得できなかった
    #[error("キュー待機がタイムアウトしました")]
    Timeout,
}

/// タスク固有のエラー型
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("一時的エラー: {task} - {source}")]
    TransientFailure {
        task: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("致命的エラー: {task} - {source}")]
    FatalFailure {
        task: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("パニック発生: {task} - {message}")]
    PanickedError { task: String, message: String },

    #[error("キューエラー: {source}")]
    QueueFailure {
        #[from]
        source: QueueError,
    },

    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("ワーカープールエラー: {message}")]
    PoolError { message: String },

    #[error("タスク結合エラー: {source}")]
    JoinFailure {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl TaskError {
    /// 一時的エラーの作成（次の反復は継続される）
    pub fn transient(task: impl Into<String>, source: anyhow::Error) -> Self {
        Self::TransientFailure {
            task: task.into(),
            source,
        }
    }

    /// 致命的エラーの作成（該当タスクのみ停止する）
    pub fn fatal(task: impl Into<String>, source: anyhow::Error) -> Self {
        Self::FatalFailure {
            task: task.into(),
            source,
        }
    }

    pub fn panicked(task: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PanickedError {
            task: task.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    pub fn pool(message: impl Into<String>) -> Self {
        Self::PoolError {
            message: message.into(),
        }
    }

    pub fn join(source: tokio::task::JoinError) -> Self {
        Self::JoinFailure { source }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::QueueFailure { .. } => ErrorSeverity::Low,
            Self::TransientFailure { .. } => ErrorSeverity::Medium,
            Self::PanickedError { .. } | Self::PoolError { .. } | Self::JoinFailure { .. } => {
                ErrorSeverity::High
            }
            Self::FatalFailure { .. } | Self::ConfigurationError { .. } => {
                ErrorSeverity::Critical
            }
        }
    }

    /// 同じタスクが次の反復へ進めるかどうかを判定
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::TransientFailure { .. } | Self::PanickedError { .. } => true,
            Self::FatalFailure { .. }
            | Self::QueueFailure { .. }
            | Self::ConfigurationError { .. }
            | Self::PoolError { .. }
            | Self::JoinFailure { .. } => false,
        }
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 低重要度 - 正常終了の一部
    Low,
    /// 中重要度 - 警告レベル
    Medium,
    /// 高重要度 - 要対応
    High,
    /// 致命的 - タスク停止レベル
    Critical,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// キュー操作の結果型
pub type QueueResult<T> = std::result::Result<T, QueueError>;

/// タスク処理の結果型
pub type TaskResult<T> = std::result::Result<T, TaskError>;
