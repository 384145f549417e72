use std::fs;
use std::path::Path;

use fern::FormatCallback;

use crate::error::Result;

/// Send log records to `log_file`. The terminal belongs to the UI, so nothing
/// is printed to the console.
pub fn setup_logger(log_file: &Path, level: log::LevelFilter) -> Result<()> {
    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent)?;
    }
    let applied = fern::Dispatch::new()
        .level(level)
        .level_for("rusqlite", log::LevelFilter::Warn)
        .format(format_log)
        .chain(fern::log_file(log_file)?)
        .apply();
    if applied.is_err() {
        // a logger was already installed (tests, repeated setup)
        log::debug!("logger already configured");
    }
    Ok(())
}

/// The function given to [`fern`] to format messages.
fn format_log(out: FormatCallback, message: &std::fmt::Arguments, record: &log::Record) {
    out.finish(format_args!(
        "[{} {} {}] {}",
        chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        record.level(),
        record
            .target()
            .split("::")
            .last()
            .unwrap_or_default(),
        message
    ))
}
