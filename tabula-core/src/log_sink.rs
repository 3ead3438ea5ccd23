use crate::Error;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
    sync::Mutex,
};
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

const DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Destination of the diagnostic entries produced by a repository.
pub trait LogSink: Send + Sync {
    fn record(&self, timestamp: OffsetDateTime, message: &str);

    fn record_error(&self, timestamp: OffsetDateTime, error: &Error) {
        self.record(timestamp, &format!("{:#}", error));
    }
}

/// Forwards every entry to the `log` crate, target `tabula`.
#[derive(Default, Debug, Clone, Copy)]
pub struct LogCrateSink;

impl LogSink for LogCrateSink {
    fn record(&self, _timestamp: OffsetDateTime, message: &str) {
        log::info!(target: "tabula", "{}", message);
    }
}

/// Keeps every entry in memory.
#[derive(Default, Debug)]
pub struct MemorySink {
    entries: Mutex<Vec<(OffsetDateTime, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(OffsetDateTime, String)> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|(_, v)| v).collect()
    }

    pub fn clear(&self) {
        match self.entries.lock() {
            Ok(mut entries) => entries.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl LogSink for MemorySink {
    fn record(&self, timestamp: OffsetDateTime, message: &str) {
        let entry = (timestamp, message.to_string());
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSinkConfig {
    /// Directory holding one `YYYY-MM-DD.log` file per day.
    pub directory: PathBuf,
    /// Also print every entry to stderr.
    pub console_echo: bool,
    /// Maximum number of causes written after an error message.
    pub chain_depth: usize,
}

impl Default for FileSinkConfig {
    fn default() -> Self {
        Self {
            directory: "logs/".into(),
            console_echo: false,
            chain_depth: 10,
        }
    }
}

/// Appends entries to daily files, a line looks like `[2024-05-01 10:20:30] - message`.
#[derive(Debug, Default)]
pub struct FileSink {
    config: FileSinkConfig,
    lock: Mutex<()>,
}

impl FileSink {
    pub fn new(config: FileSinkConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &FileSinkConfig {
        &self.config
    }

    /// File receiving the entries recorded at `timestamp`.
    pub fn file_path(&self, timestamp: OffsetDateTime) -> PathBuf {
        let date = timestamp.format(DATE).unwrap_or_default();
        self.config.directory.join(format!("{}.log", date))
    }

    fn append(&self, timestamp: OffsetDateTime, text: &str) {
        let _guard = self.lock.lock();
        let path = self.file_path(timestamp);
        let result = fs::create_dir_all(&self.config.directory).and_then(|_| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?
                .write_all(text.as_bytes())
        });
        if let Err(error) = result {
            log::error!("Could not write the log file {}: {}", path.display(), error);
        }
        if self.config.console_echo {
            eprint!("{}", text);
        }
    }

    fn line(timestamp: OffsetDateTime, message: &str) -> String {
        format!(
            "[{}] - {}\n",
            timestamp.format(TIMESTAMP).unwrap_or_default(),
            message
        )
    }
}

impl LogSink for FileSink {
    fn record(&self, timestamp: OffsetDateTime, message: &str) {
        self.append(timestamp, &Self::line(timestamp, message));
    }

    fn record_error(&self, timestamp: OffsetDateTime, error: &Error) {
        let mut text = Self::line(timestamp, &error.to_string());
        for cause in error.chain().skip(1).take(self.config.chain_depth) {
            text.push('\t');
            text.push_str(&cause.to_string());
            text.push('\n');
        }
        self.append(timestamp, &text);
    }
}
