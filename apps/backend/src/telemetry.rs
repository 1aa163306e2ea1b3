use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the process-wide JSON subscriber. `RUST_LOG` wins when set;
/// otherwise our own crate logs at info while the database layers stay
/// at warn (sea-orm routes its query logs through sqlx targets).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,backend=info,sea_orm=warn,sqlx=warn"));

    let json_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false)
        .json();

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .init();
}
