use crate::core::WakePolicy;
use crate::services::DefaultRelayConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "shared_queue")]
#[command(about = "Runs producer and consumer tasks over one shared in-memory queue")]
#[command(version)]
pub struct Cli {
    /// Number of worker slots in the pool
    #[arg(long, default_value = "8")]
    pub slots: usize,

    /// Number of producer tasks
    #[arg(long, default_value = "1")]
    pub producers: usize,

    /// Number of consumer tasks
    #[arg(long, default_value = "4")]
    pub consumers: usize,

    /// Queue capacity (unbounded when omitted)
    #[arg(long)]
    pub capacity: Option<usize>,

    /// How many waiting consumers a push wakes
    #[arg(long, value_enum, default_value = "one")]
    pub wake: WakeMode,

    /// Pause between producer iterations in milliseconds
    #[arg(long)]
    pub pause_ms: Option<u64>,

    /// Stop each producer after this many items, then drain the queue
    #[arg(long)]
    pub max_items: Option<u64>,

    /// Stop after this many seconds, then drain the queue
    #[arg(long)]
    pub duration_secs: Option<u64>,

    /// Write the run summary as JSON to this file
    #[arg(long)]
    pub summary_json: Option<PathBuf>,

    /// Suppress ADD/REMOVE lines
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WakeMode {
    One,
    All,
}

impl From<WakeMode> for WakePolicy {
    fn from(mode: WakeMode) -> Self {
        match mode {
            WakeMode::One => WakePolicy::One,
            WakeMode::All => WakePolicy::All,
        }
    }
}

impl Cli {
    /// 引数から実行設定を組み立てる
    pub fn to_config(&self) -> DefaultRelayConfig {
        DefaultRelayConfig::new(self.slots)
            .with_producers(self.producers)
            .with_consumers(self.consumers)
            .with_capacity(self.capacity)
            .with_wake_policy(self.wake.into())
            .with_pause(self.pause_ms.map(Duration::from_millis))
            .with_max_items(self.max_items)
    }

    /// 実行が自然に終了するかどうか
    pub fn is_bounded(&self) -> bool {
        self.max_items.is_some() || self.duration_secs.is_some()
    }

    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}
