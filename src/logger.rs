//! File logging for `--debug` runs, rotated daily in local time.

use anyhow::{Context, Result, anyhow};
use logroller::{LogRollerBuilder, Rotation, RotationAge, TimeZone};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use time::macros::format_description;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::prelude::*;

use crate::config::Config;

/// Log files are named `pair-sight.YYYY-MM-DD`.
const LOG_FILE_PREFIX: &str = "pair-sight";

/// Days a rotated log survives, both in the roller and in [`prune_expired_logs`].
const LOG_RETENTION_DAYS: u64 = 3;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Install the global subscriber writing to `config.log_path`.
///
/// `RUST_LOG` overrides the default `debug` level.
pub fn init(config: &Config) -> Result<()> {
    let dir = config.log_path.as_path();
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create pair-sight log directory: {}", dir.display()))?;
    prune_expired_logs(dir, SystemTime::now())?;

    let roller = LogRollerBuilder::new(dir, Path::new(LOG_FILE_PREFIX))
        .rotation(Rotation::AgeBased(RotationAge::Daily))
        .time_zone(TimeZone::Local)
        .max_keep_files(LOG_RETENTION_DAYS as _)
        .build()
        .map_err(|e| anyhow!("Failed to open pair-sight log in {}: {e}", dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(roller);

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_timer(local_timer());

    tracing::subscriber::set_global_default(
        tracing_subscriber::registry().with(log_filter()).with(layer),
    )
    .map_err(|e| anyhow!("pair-sight logging already initialised: {e}"))?;

    // Dropping the guard stops the writer thread; keep it for the process lifetime
    std::mem::forget(guard);

    tracing::debug!(log_dir = %dir.display(), "pair-sight logging started");
    Ok(())
}

fn local_timer() -> OffsetTime<&'static [time::format_description::BorrowedFormatItem<'static>]> {
    let offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    OffsetTime::new(
        offset,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
}

fn log_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(tracing::Level::DEBUG.into())
        .from_env_lossy()
}

/// Delete pair-sight log files last modified more than
/// [`LOG_RETENTION_DAYS`] before `now`. Returns how many were removed.
///
/// Other files and directories in `dir` are left alone.
pub fn prune_expired_logs(dir: &Path, now: SystemTime) -> Result<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }
    let cutoff = now - Duration::from_secs(LOG_RETENTION_DAYS * SECS_PER_DAY);

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !is_pair_sight_log(&path) {
            continue;
        }
        let expired = fs::metadata(&path)
            .and_then(|m| m.modified())
            .is_ok_and(|modified| modified < cutoff);
        if expired && fs::remove_file(&path).is_ok() {
            removed += 1;
        }
    }
    Ok(removed)
}

fn is_pair_sight_log(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(LOG_FILE_PREFIX))
}
