use clap::Parser;
use shared_queue::cli::{self, Cli};

fn init_tracing(level: tracing::Level) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    match cli::execute(&cli) {
        Ok(summary) => {
            if summary.error_count > 0 {
                tracing::warn!(errors = summary.error_count, "run finished with task errors");
            }
        }
        Err(error) => {
            tracing::error!(error = ?error, "run failed");
            std::process::exit(1);
        }
    }
}
