//! File and console log sinks for a session directory.
//!
//! Lines look like `2024-06-01 12:00:00 INFO     message`. The sinks are
//! exposed as a [`Layer`] so they can be stacked onto a caller's own
//! subscriber, or installed globally with [`install`].

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::writer::MakeWriter;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use crate::document::LOG_FILE;
use crate::error::{DirlogError, Result};

const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How the run log is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// File name inside the session directory.
    pub filename: String,
    /// Least severe level that is recorded.
    pub level: Level,
    /// Also mirror log lines to stderr.
    pub stream: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            filename: LOG_FILE.to_string(),
            level: Level::DEBUG,
            stream: true,
        }
    }
}

/// `timestamp level message` line format shared by both sinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

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
    ) -> fmt::Result {
        let level = event.metadata().level().to_string();
        write!(
            writer,
            "{} {:<8} ",
            chrono::Local::now().format(LOG_TIME_FORMAT),
            level
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Append-only log file shared between writer handles.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    file: Arc<Mutex<File>>,
}

impl FileSink {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| DirlogError::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Arc::new(Mutex::new(file)),
        })
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<'a> MakeWriter<'a> for FileSink {
    type Writer = FileSinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        FileSinkWriter {
            file: self.file.clone(),
        }
    }
}

/// Writer handle produced by [`FileSink`].
pub struct FileSinkWriter {
    file: Arc<Mutex<File>>,
}

impl Write for FileSinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self.file.lock().map_err(|_| io::ErrorKind::Other)?;
        file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self.file.lock().map_err(|_| io::ErrorKind::Other)?;
        file.flush()
    }
}

/// Build the file sink (and optional stderr sink) for `session_dir`.
pub fn log_layer<S>(session_dir: &Path, options: &LogOptions) -> Result<impl Layer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let sink = FileSink::open(&session_dir.join(&options.filename))?;
    let filter = LevelFilter::from_level(options.level);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_ansi(false)
        .with_writer(sink)
        .with_filter(filter);

    let console_layer = options.stream.then(|| {
        tracing_subscriber::fmt::layer()
            .event_format(LineFormat)
            .with_ansi(false)
            .with_writer(io::stderr)
            .with_filter(filter)
    });

    Ok(file_layer.and_then(console_layer))
}

/// Install the session log sinks as the global default subscriber.
pub fn install(session_dir: &Path, options: &LogOptions) -> Result<()> {
    let layer = log_layer(session_dir, options)?;
    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| DirlogError::Logging(e.to_string()))
}
