use log::LevelFilter;
use std::io::Write;

/// Install the `env_logger` backend.
///
/// `RUST_LOG` wins over `level` when it parses; falls back to `info`.
pub fn init_logging(level: Option<&str>) {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .or_else(|| level.and_then(|l| l.parse().ok()))
        .unwrap_or(LevelFilter::Info);
    let result = env_logger::Builder::new()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:5} {}] {}",
                buf.timestamp_seconds(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
    if result.is_ok() {
        log::debug!("Logger initialized (level: {})", log_level);
    }
}
