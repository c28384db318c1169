//! Append JSON lines to a log file with optional date/size based rotation.
//!
//! Without a policy everything goes to `<base>.log`. With one, the active file
//! is `<base>-<period>.log` (then `<base>-<period>.<n>.log` once the size cap
//! is hit); a new period or a full file rolls over, optionally gzips the file
//! that was closed, and prunes old rolled files beyond the retention count.

use crate::config::RotationConfig;
use chrono::format::{Item, Parsed, StrftimeItems};
use chrono::{DateTime, Utc};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    pub date_pattern: String,
    pub max_size_bytes: Option<u64>,
    pub compress: bool,
    pub max_files: Option<usize>,
}

impl From<&RotationConfig> for RotationPolicy {
    fn from(config: &RotationConfig) -> Self {
        Self {
            date_pattern: config.date_pattern.clone(),
            max_size_bytes: config.max_size_bytes,
            compress: config.compress,
            max_files: config.max_files,
        }
    }
}

struct ActiveFile {
    file: File,
    path: PathBuf,
    period: String,
    size: u64,
}

pub struct RotatingWriter {
    directory: PathBuf,
    base_name: String,
    policy: Option<RotationPolicy>,
    active: Option<ActiveFile>,
}

impl RotatingWriter {
    pub fn new(
        directory: impl Into<PathBuf>,
        base_name: impl Into<String>,
        policy: Option<RotationPolicy>,
    ) -> io::Result<Self> {
        let directory = directory.into();
        if let Some(policy) = &policy
            && StrftimeItems::new(&policy.date_pattern).any(|item| matches!(item, Item::Error))
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid date pattern '{}'", policy.date_pattern),
            ));
        }
        fs::create_dir_all(&directory)?;
        Ok(Self {
            directory,
            base_name: base_name.into(),
            policy,
            active: None,
        })
    }

    /// Path of the file currently written to, if one is open.
    pub fn current_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|active| active.path.as_path())
    }

    /// Append `line` plus a newline, rotating first when needed.
    pub fn write_line(&mut self, line: &str, now: DateTime<Utc>) -> io::Result<()> {
        let period = self.period_for(now);
        let incoming = line.len() as u64 + 1;

        let due = self
            .active
            .as_ref()
            .is_some_and(|active| self.needs_roll(active, &period, incoming));
        if due {
            self.roll()?;
        }

        if self.active.is_none() {
            self.active = Some(self.open(&period, incoming)?);
        }

        let Some(active) = self.active.as_mut() else {
            return Err(io::Error::other("log file not open"));
        };
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        active.file.write_all(&buf)?;
        active.size += incoming;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match self.active.as_mut() {
            Some(active) => active.file.flush(),
            None => Ok(()),
        }
    }

    fn period_for(&self, now: DateTime<Utc>) -> String {
        match &self.policy {
            Some(policy) => now.format(&policy.date_pattern).to_string(),
            None => String::new(),
        }
    }

    fn needs_roll(&self, active: &ActiveFile, period: &str, incoming: u64) -> bool {
        let Some(policy) = &self.policy else {
            return false;
        };
        if active.period != period {
            return true;
        }
        match policy.max_size_bytes {
            // A single oversized line still goes into an empty file
            Some(max) => active.size > 0 && active.size + incoming > max,
            None => false,
        }
    }

    fn file_path(&self, period: &str, sequence: u32) -> PathBuf {
        let name = match (&self.policy, sequence) {
            (None, _) => format!("{}.log", self.base_name),
            (Some(_), 0) => format!("{}-{}.log", self.base_name, period),
            (Some(_), n) => format!("{}-{}.{}.log", self.base_name, period, n),
        };
        self.directory.join(name)
    }

    /// Open the first file of `period` that still has room, appending to it.
    fn open(&self, period: &str, incoming: u64) -> io::Result<ActiveFile> {
        let max = self.policy.as_ref().and_then(|policy| policy.max_size_bytes);
        let mut sequence = 0;
        let path = loop {
            let candidate = self.file_path(period, sequence);
            let existing = match fs::metadata(&candidate) {
                Ok(metadata) => metadata.len(),
                Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
                Err(e) => return Err(e),
            };
            let full = matches!(max, Some(max) if existing > 0 && existing + incoming > max);
            let compressed = self.policy.is_some() && gz_path(&candidate).exists();
            if !full && !compressed {
                break candidate;
            }
            sequence += 1;
        };

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let size = file.metadata()?.len();
        debug!("Opened log file {:?}", path);

        Ok(ActiveFile {
            file,
            path,
            period: period.to_string(),
            size,
        })
    }

    fn roll(&mut self) -> io::Result<()> {
        let Some(mut active) = self.active.take() else {
            return Ok(());
        };
        active.file.flush()?;
        let closed = active.path;
        drop(active.file);

        if self.policy.as_ref().is_some_and(|policy| policy.compress)
            && let Err(e) = compress_file(&closed)
        {
            warn!("Failed to compress rotated log {:?}: {e}", closed);
        }

        if let Some(max_files) = self.policy.as_ref().and_then(|policy| policy.max_files) {
            self.prune(max_files)?;
        }

        Ok(())
    }

    /// Whether `name` is one of the shapes `file_path` produces for this
    /// writer, compressed or not. Other applications sharing the directory
    /// may use names with the same prefix.
    fn owns(&self, name: &str) -> bool {
        let Some(policy) = &self.policy else {
            return false;
        };
        let Some(rest) = name
            .strip_prefix(self.base_name.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
        else {
            return false;
        };
        let Some(stem) = rest
            .strip_suffix(".log.gz")
            .or_else(|| rest.strip_suffix(".log"))
        else {
            return false;
        };

        if matches_period(stem, &policy.date_pattern) {
            return true;
        }
        match stem.rsplit_once('.') {
            Some((period, sequence)) => {
                !sequence.is_empty()
                    && sequence.bytes().all(|b| b.is_ascii_digit())
                    && matches_period(period, &policy.date_pattern)
            }
            None => false,
        }
    }

    /// Delete the oldest rolled files so at most `max_files` remain.
    fn prune(&self, max_files: usize) -> io::Result<()> {
        let mut rolled: Vec<(PathBuf, std::time::SystemTime)> = Vec::new();

        for entry in fs::read_dir(&self.directory)? {
            let entry = entry?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !self.owns(name) {
                continue;
            }
            if self.current_path() == Some(path.as_path()) {
                continue;
            }
            let metadata = entry.metadata()?;
            if metadata.is_file() {
                rolled.push((path, metadata.modified()?));
            }
        }

        if rolled.len() <= max_files {
            return Ok(());
        }

        // Oldest first; names break ties between files closed in the same instant
        rolled.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        let excess = rolled.len() - max_files;
        for (path, _) in rolled.into_iter().take(excess) {
            match fs::remove_file(&path) {
                Ok(()) => debug!("Removed rotated log {:?}", path),
                Err(e) => warn!("Failed to remove rotated log {:?}: {e}", path),
            }
        }

        Ok(())
    }
}

/// Whether `period` is text `pattern` could have formatted.
fn matches_period(period: &str, pattern: &str) -> bool {
    let mut parsed = Parsed::default();
    chrono::format::parse(&mut parsed, period, StrftimeItems::new(pattern)).is_ok()
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}

fn compress_file(path: &Path) -> io::Result<()> {
    let target = gz_path(path);
    let mut input = File::open(path)?;
    let output = File::create(&target)?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?.sync_all()?;
    fs::remove_file(path)?;
    Ok(())
}
