/// Log line formatting and console output
///
/// Formats: `HH:MM:SS.mmm LEVEL [TAG] message` with the level colored by
/// severity. Errors go to stderr, everything else to stdout.
use colored::Colorize;

use super::levels::LogLevel;
use super::tags::LogTag;

pub fn format_and_log(tag: LogTag, level: LogLevel, message: &str) {
    let timestamp = chrono::Local::now().format("%H:%M:%S%.3f").to_string();

    let level_label = match level {
        LogLevel::Error => level.as_str().red().bold(),
        LogLevel::Warning => level.as_str().yellow(),
        LogLevel::Info => level.as_str().green(),
        LogLevel::Debug => level.as_str().blue(),
        LogLevel::Verbose => level.as_str().magenta(),
    };

    let line = format!(
        "{} {} [{}] {}",
        timestamp.dimmed(),
        level_label,
        tag.as_str().cyan(),
        message
    );

    if level == LogLevel::Error {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}
