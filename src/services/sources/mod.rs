// 要素生成機能

pub mod implementations;

// 公開API
pub use implementations::{SequenceSource, TimestampSource};
