use std::env;
use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Environment variable holding the log level (`error` .. `trace`).
pub const LOG_ENV: &str = "SKIRMISH_LOG";

/// Console backend: warnings and errors on stderr, the rest on stdout.
/// Records are tagged with the module they came from, without the crate
/// prefix, so server lines read `INFO  server::coordinator: ...`.
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = std::format!(
            "{:<5} {}: {}",
            record.level(),
            short_target(record.target()),
            record.args()
        );
        // a closed pipe must not take the server down
        let _ = match record.level() {
            Level::Error | Level::Warn => writeln!(std::io::stderr().lock(), "{}", line),
            _ => writeln!(std::io::stdout().lock(), "{}", line),
        };
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn short_target(target: &str) -> &str {
    target
        .strip_prefix("skirmish::")
        .unwrap_or(target)
}

/// Level named by `value`; `info` when absent or not a level name.
fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|lvl| lvl.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Install the console logger with the level from `SKIRMISH_LOG`. Later calls
/// are no-ops.
pub fn init_logging() {
    let level = level_from(env::var(LOG_ENV).ok().as_deref());
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
