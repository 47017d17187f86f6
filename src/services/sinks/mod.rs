// 要素受け取り機能

pub mod implementations;

// 公開API
pub use implementations::{MemoryItemSink, NoOpItemSink};
