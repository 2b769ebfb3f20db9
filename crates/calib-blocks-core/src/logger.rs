//! Stderr logger for setup tooling.
//!
//! Lines look like `[  0.012s DEBUG calib_blocks::registry] message`; the
//! elapsed time and the target column can be switched off through
//! [`LoggerOptions`]. Registry insertions and rejections are logged under
//! the `calib_blocks` target, so a per-target filter keeps them quiet while
//! the caller's own records still print.

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Logger settings. The first successful [`init`] fixes them for the process.
#[derive(Clone, Debug)]
pub struct LoggerOptions {
    pub level: LevelFilter,
    /// Prefix each line with seconds since installation.
    pub elapsed: bool,
    /// Print the record target (usually the module path).
    pub target: bool,
    /// Per-target overrides, longest matching prefix wins.
    pub target_levels: Vec<(String, LevelFilter)>,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            elapsed: true,
            target: true,
            target_levels: Vec::new(),
        }
    }
}

impl LoggerOptions {
    pub fn with_level(level: LevelFilter) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Override the level for records whose target starts with `prefix`.
    pub fn target_level(mut self, prefix: impl Into<String>, level: LevelFilter) -> Self {
        self.target_levels.push((prefix.into(), level));
        self
    }

    fn level_for(&self, target: &str) -> LevelFilter {
        self.target_levels
            .iter()
            .filter(|(prefix, _)| target.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map_or(self.level, |(_, level)| *level)
    }

    fn max_level(&self) -> LevelFilter {
        self.target_levels
            .iter()
            .map(|(_, level)| *level)
            .fold(self.level, Ord::max)
    }
}

struct StderrLogger {
    options: LoggerOptions,
    started: Instant,
}

impl StderrLogger {
    fn write_record(&self, out: &mut impl Write, record: &Record) -> io::Result<()> {
        out.write_all(b"[")?;
        if self.options.elapsed {
            write!(out, "{:7.3}s ", self.started.elapsed().as_secs_f64())?;
        }
        write!(out, "{:>5}", record.level())?;
        if self.options.target {
            write!(out, " {}", record.target())?;
        }
        writeln!(out, "] {}", record.args())
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.options.level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = self.write_record(&mut io::stderr().lock(), record);
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger.
///
/// Later calls are no-ops; the options of the first call stay in effect.
pub fn init(options: LoggerOptions) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let max_level = options.max_level();
    let logger = LOGGER.get_or_init(|| StderrLogger {
        options,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(max_level);
    Ok(())
}

/// Install the stderr logger with a single global level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    init(LoggerOptions::with_level(level))
}

/// Install a `tracing` subscriber honoring `RUST_LOG` (default `calib_blocks=debug`).
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("calib_blocks=debug"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    if json {
        let _ = builder.json().flatten_event(true).finish().try_init();
    } else {
        let _ = builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}
