pub mod cli;
pub mod core;
pub mod engine;
pub mod services;

pub use crate::core::{
    ActivityReporter, Item, ItemSink, ItemSource, QueueError, RelayConfig, RunSummary,
    StopSignal, TaskError, TaskKind, TaskOutcome, TaskStats, WakePolicy,
};
pub use engine::{
    ConsumerTask, ProducerTask, QueueSystem, RunningSystem, SharedQueue, WorkerPool,
};
pub use services::{
    ConsoleActivityReporter, DefaultRelayConfig, MemoryItemSink, NoOpActivityReporter,
    NoOpItemSink, SequenceSource, TimestampSource,
};
