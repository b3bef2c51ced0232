//! Tracing setup.
//!
//! The REPL owns stdout, so diagnostics go to stderr, filtered by
//! `RUST_LOG` and defaulting to warnings. Setting `STYLESCOPE_LOG=1`
//! additionally writes structured logs to
//! `$XDG_DATA_HOME/stylescope/stylescope.log` through a non-blocking
//! appender and widens the default filter to `info`.

use std::path::PathBuf;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Flushes the file appender on drop. Keep it alive for the whole session.
pub struct LogGuard {
    _flush: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Install the global subscriber. Call once from `main`.
pub fn init() -> LogGuard {
    let sink = file_sink();
    let default_filter = if sink.is_some() { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let (writer, flush) = match sink {
        Some((writer, guard)) => (Some(writer), Some(guard)),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(writer.map(|w| fmt::layer().with_writer(w).with_ansi(false)))
        .init();

    LogGuard { _flush: flush }
}

/// Non-blocking log-file writer, opted into with `STYLESCOPE_LOG=1`. None
/// when disabled or when no writable log directory can be determined.
fn file_sink() -> Option<(
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
)> {
    if std::env::var("STYLESCOPE_LOG").as_deref() != Ok("1") {
        return None;
    }
    let dir = log_dir(
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )?;
    std::fs::create_dir_all(&dir).ok()?;
    let appender = tracing_appender::rolling::never(dir, "stylescope.log");
    Some(tracing_appender::non_blocking(appender))
}

/// `$XDG_DATA_HOME/stylescope`, falling back to `~/.local/share/stylescope`.
fn log_dir(xdg_data_home: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    let base = xdg_data_home.or_else(|| home.map(|h| h.join(".local").join("share")))?;
    Some(base.join("stylescope"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_data_home_wins() {
        let dir = log_dir(Some(PathBuf::from("/data")), Some(PathBuf::from("/home/u")));
        assert_eq!(dir, Some(PathBuf::from("/data/stylescope")));
    }

    #[test]
    fn falls_back_to_home_share_dir() {
        let dir = log_dir(None, Some(PathBuf::from("/home/u")));
        assert_eq!(dir, Some(PathBuf::from("/home/u/.local/share/stylescope")));
    }

    #[test]
    fn no_home_means_no_log_file() {
        assert_eq!(log_dir(None, None), None);
    }
}
