//! Logger implementation for the log crate.

use core::fmt::{self, Display};
use std::io::Write;
use std::time::Instant;

use lazyinit::LazyInit;
use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::{PicoError, PicoResult};

static START: LazyInit<Instant> = LazyInit::new();

pub struct SimpleLogger;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCode {
    Red = 31,
    Green = 32,
    Yellow = 33,
    Cyan = 36,
    BrightBlack = 90,
}

impl Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\u{1B}[{}m", *self as u8)
    }
}

impl Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let file = record.file().unwrap_or("none");
        let line = record.line().unwrap_or(0);
        let args = record.args();
        let color_reset = "\u{1B}[0m";

        let args_color = match record.level() {
            Level::Error => ColorCode::Red,
            Level::Warn => ColorCode::Yellow,
            Level::Info => ColorCode::Green,
            Level::Debug => ColorCode::Cyan,
            Level::Trace => ColorCode::BrightBlack,
        };

        let secs = if START.is_inited() {
            START.elapsed().as_secs_f64()
        } else {
            0.0
        };

        // [time file:line] message
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{secs:.5} {file}:{line}] {args_color}{args}{color_reset}"
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_from_env(value: Option<&str>) -> LevelFilter {
    match value {
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        _ => LevelFilter::Off,
    }
}

/// Initialize the logger.
///
/// The level comes from the `LOG` environment variable at run time, falling
/// back to the value `LOG` had at build time.
pub fn init() -> PicoResult<()> {
    let level = std::env::var("LOG").ok();
    let level = level_from_env(level.as_deref().or(option_env!("LOG")));

    log::set_logger(&SimpleLogger).map_err(|_| PicoError::LoggerInitFailed)?;
    if !START.is_inited() {
        START.init_once(Instant::now());
    }
    log::set_max_level(level);
    Ok(())
}
