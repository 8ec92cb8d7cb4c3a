//! Logging setup for the `otsu` binary.
//!
//! [`init_with_level`] installs a plain `log` backend writing
//!
//! `otsu    +12.4ms DEBUG segment: threshold 87`
//!
//! to stderr: the elapsed time since installation, the level, and the last
//! path segment of the record target. With the `tracing` feature,
//! [`init_tracing`] installs a `tracing-subscriber` filtered by `OTSU_LOG`.

use std::fmt::Arguments;
use std::io::Write;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the `tracing` filter directives.
#[cfg(feature = "tracing")]
pub const LOG_ENV: &str = "OTSU_LOG";

/// `otsu_core::segment` -> `segment`.
fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

fn format_line(elapsed: Duration, level: Level, target: &str, args: &Arguments<'_>) -> String {
    format!(
        "otsu {:>+8.1}ms {:<5} {}: {}",
        elapsed.as_secs_f64() * 1e3,
        level,
        short_target(target),
        args
    )
}

struct OtsuLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for OtsuLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.started.elapsed(),
            record.level(),
            record.target(),
            record.args(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<OtsuLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter.
///
/// Calling this more than once is a no-op after the first successful
/// initialization.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| OtsuLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Install a `tracing` subscriber filtered by [`LOG_ENV`] (default `info`).
///
/// `json = true` emits one flattened JSON object per event, for piping the
/// per-stage span timings into other tools.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_target(false)
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_uses_short_target_and_millis() {
        let line = format_line(
            Duration::from_micros(12_400),
            Level::Debug,
            "otsu_core::segment",
            &format_args!("threshold {}", 87),
        );
        assert_eq!(line, "otsu    +12.4ms DEBUG segment: threshold 87");
    }

    #[test]
    fn plain_target_is_kept() {
        assert_eq!(short_target("otsu"), "otsu");
        assert_eq!(short_target("otsu::image_io"), "image_io");
    }
}
