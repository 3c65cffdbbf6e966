use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Mutex, MutexGuard},
};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

use crate::config::LoggingConfig;

// --- Formatter ---

/// `<local timestamp> <LEVEL> <file:line> <fields>`, coloured when the
/// writer supports ANSI escapes.
struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        if ansi {
            write!(writer, "\x1b[2m")?
        }
        write!(
            writer,
            "{} ",
            Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )?;
        if ansi {
            write!(writer, "\x1b[0m")?
        }

        let (pre, post) = if ansi {
            level_colour(meta.level())
        } else {
            ("", "")
        };
        write!(writer, "{}{:>5}{} ", pre, meta.level(), post)?;

        let file = meta.file().map(|f| {
            f.strip_prefix("src/")
                .or_else(|| f.strip_prefix("src\\"))
                .unwrap_or(f)
        });
        if let (Some(file), Some(line)) = (file, meta.line()) {
            if ansi {
                write!(writer, "\x1b[36m{file}:{line}\x1b[0m ")?;
            } else {
                write!(writer, "{file}:{line} ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_colour(level: &Level) -> (&'static str, &'static str) {
    match *level {
        Level::ERROR => ("\x1b[1;31m", "\x1b[0m"),
        Level::WARN => ("\x1b[1;33m", "\x1b[0m"),
        Level::INFO => ("\x1b[1;32m", "\x1b[0m"),
        Level::DEBUG => ("\x1b[1;34m", "\x1b[0m"),
        Level::TRACE => ("\x1b[1;35m", "\x1b[0m"),
    }
}

// --- File writer ---

struct LogFile(Mutex<File>);

struct LockedFile<'a>(MutexGuard<'a, File>);

impl Write for LockedFile<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LockedFile<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        // A panic while holding the lock leaves the file usable.
        LockedFile(self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))
}

// --- Level selection ---

const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Moves a bare level up (`verbosity > 0`) or down (`< 0`) the ladder.
/// Full directives such as `forge_core=debug` are returned unchanged.
pub fn adjust_level(
    level: &str,
    verbosity: i8,
) -> String {
    let normalized = level.trim().to_ascii_lowercase();
    match LEVELS.iter().position(|l| *l == normalized) {
        Some(index) => {
            let shifted = (index as i32 + i32::from(verbosity)).clamp(0, LEVELS.len() as i32 - 1);
            LEVELS[shifted as usize].to_string()
        }
        None => level.to_string(),
    }
}

/// Net `-v` minus `-q` count, clamped to the range of `i8`.
pub fn verbosity(
    verbose: u8,
    quiet: u8,
) -> i8 {
    (i16::from(verbose) - i16::from(quiet)).clamp(i8::MIN.into(), i8::MAX.into()) as i8
}

fn make_filter(
    config: &LoggingConfig,
    verbosity: i8,
) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directive = adjust_level(&config.level, verbosity);
    EnvFilter::try_new(&directive).with_context(|| format!("invalid log level '{directive}'"))
}

// --- Public API ---

/// Installs the global subscriber. Call once at startup.
///
/// - Stderr: coloured when attached to a terminal, plain when piped.
/// - File: appended to when `config.file` is set.
/// - Level: `RUST_LOG` when set, else `config.level` shifted by `verbosity`.
pub fn init_logging(
    config: &LoggingConfig,
    verbosity: i8,
) -> Result<()> {
    let filter = make_filter(config, verbosity)?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = match &config.file {
        Some(path) => Some(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_ansi(false)
                .with_writer(LogFile(Mutex::new(open_log_file(path)?))),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialized")
}
