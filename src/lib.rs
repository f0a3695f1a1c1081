pub mod diagnostic;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod session;
pub mod stack;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`. Does nothing
/// when `RUST_LOG` is unset, and only ever runs once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
