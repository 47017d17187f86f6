pub mod run;

pub use run::{execute, write_summary};
