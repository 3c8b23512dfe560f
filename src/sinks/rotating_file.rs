//! Rotating file sink
//!
//! Appends to a single file and rotates it once the next write would push
//! it past the size limit. The rotated file is renamed to
//! `<stem>-<local time>.<ext>` (for example `app-2025-01-08T10-30-45.123.log`),
//! optionally gzipped, and old backups are pruned by age and count.
//!
//! Writes go straight to the file without buffering.

use crate::core::config::FileSinkConfig;
use crate::core::error::{LoggerError, Result};
use crate::core::Sink;
use chrono::{Local, NaiveDateTime};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

const MEGABYTE: u64 = 1024 * 1024;
const DEFAULT_MAX_MEGABYTES: u64 = 100;
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";

/// When to rotate and what to keep.
///
/// # Examples
///
/// ```
/// use service_logger::sinks::RotationPolicy;
/// use std::time::Duration;
///
/// let policy = RotationPolicy::new()
///     .with_max_megabytes(50)
///     .with_max_age(Duration::from_secs(7 * 24 * 3600))
///     .with_compression(true);
/// assert_eq!(policy.max_bytes, 50 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Size in bytes that triggers rotation
    pub max_bytes: u64,
    /// Rotated files older than this are removed; `None` keeps them
    pub max_age: Option<Duration>,
    /// Maximum number of rotated files to keep; 0 keeps all
    pub max_backups: usize,
    /// Whether to gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_MEGABYTES * MEGABYTE,
            max_age: None,
            max_backups: 0,
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy described by a file sink config. A size of 0 means the
    /// default 100 MB, an age of 0 disables age-based removal.
    #[must_use]
    pub fn from_config(config: &FileSinkConfig) -> Self {
        let megabytes = if config.max_size == 0 {
            DEFAULT_MAX_MEGABYTES
        } else {
            config.max_size
        };
        let max_age = (config.max_age > 0).then(|| Duration::from_secs(config.max_age * 24 * 3600));
        Self {
            max_bytes: megabytes.saturating_mul(MEGABYTE),
            max_age,
            max_backups: 0,
            compress: config.compress,
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_megabytes(mut self, megabytes: u64) -> Self {
        self.max_bytes = megabytes.saturating_mul(MEGABYTE);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_bytes(mut self, bytes: u64) -> Self {
        self.max_bytes = bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = Some(age);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

/// Size-bounded log file with timestamped, optionally compressed backups.
///
/// # Examples
///
/// ```no_run
/// use service_logger::sinks::{RotatingFileSink, RotationPolicy};
///
/// let sink = RotatingFileSink::with_policy(
///     "/var/log/app/app.log",
///     RotationPolicy::new().with_max_megabytes(10).with_compression(true),
/// )
/// .unwrap();
/// ```
pub struct RotatingFileSink {
    base_path: PathBuf,
    policy: RotationPolicy,
    file: Option<File>,
    current_size: u64,
}

impl RotatingFileSink {
    /// Open `path` with the default policy, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or the file cannot be created
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    /// # Errors
    ///
    /// Returns error if the directory or the file cannot be created
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| LoggerError::directory(parent.display().to_string(), e))?;
        }

        let (file, current_size) = Self::open(&base_path)?;

        Ok(Self {
            base_path,
            policy,
            file: Some(file),
            current_size,
        })
    }

    fn open(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_sink(path.display().to_string(), format!("Failed to open: {}", e))
            })?;
        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_sink(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();
        Ok((file, size))
    }

    /// Rotate now, regardless of size.
    ///
    /// # Errors
    ///
    /// Returns error if the current file cannot be renamed or reopened
    pub fn rotate(&mut self) -> Result<()> {
        // release the handle before renaming
        self.file.take();

        if self.base_path.exists() {
            let backup = self.free_backup_path();
            fs::rename(&self.base_path, &backup).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;

            if self.policy.compress {
                if let Err(e) = compress_file(&backup) {
                    eprintln!("[LOGGER WARNING] Failed to compress {}: {}", backup.display(), e);
                }
            }
        }

        let (file, size) = Self::open(&self.base_path)?;
        self.file = Some(file);
        self.current_size = size;

        self.prune_backups();
        Ok(())
    }

    fn stem_and_extension(&self) -> (String, String) {
        let stem = self
            .base_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("app")
            .to_string();
        let ext = self
            .base_path
            .extension()
            .and_then(|s| s.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        (stem, ext)
    }

    fn backup_path_at(&self, time: NaiveDateTime) -> PathBuf {
        let (stem, ext) = self.stem_and_extension();
        self.base_path
            .with_file_name(format!("{}-{}{}", stem, time.format(BACKUP_TIME_FORMAT), ext))
    }

    /// Backup path for the current time, nudged forward one millisecond at a
    /// time while an earlier rotation in the same millisecond holds the name.
    fn free_backup_path(&self) -> PathBuf {
        let mut time = Local::now().naive_local();
        loop {
            let candidate = self.backup_path_at(time);
            let compressed = gz_path(&candidate);
            if !candidate.exists() && !compressed.exists() {
                return candidate;
            }
            time += chrono::Duration::milliseconds(1);
        }
    }

    /// Rotated files with their embedded timestamps, newest first.
    pub fn backups(&self) -> Vec<(NaiveDateTime, PathBuf)> {
        let (stem, ext) = self.stem_and_extension();
        let prefix = format!("{}-", stem);
        let dir = match self.base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(dir) => dir.to_path_buf(),
            None => PathBuf::from("."),
        };

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut backups: Vec<(NaiveDateTime, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                let rest = name.strip_prefix(&prefix)?;
                let rest = rest.strip_suffix(".gz").unwrap_or(rest);
                let stamp = rest.strip_suffix(ext.as_str())?;
                let time = NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT).ok()?;
                Some((time, entry.path()))
            })
            .collect();

        backups.sort_by(|a, b| b.0.cmp(&a.0));
        backups
    }

    fn prune_backups(&self) {
        let now = Local::now().naive_local();
        for (index, (time, path)) in self.backups().into_iter().enumerate() {
            let over_count = self.policy.max_backups > 0 && index >= self.policy.max_backups;
            let too_old = self.policy.max_age.is_some_and(|max_age| {
                (now - time)
                    .to_std()
                    .map(|age| age > max_age)
                    .unwrap_or(false)
            });

            if over_count || too_old {
                if let Err(e) = fs::remove_file(&path) {
                    eprintln!(
                        "[LOGGER WARNING] Failed to remove old backup {}: {}",
                        path.display(),
                        e
                    );
                }
            }
        }
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}

/// Gzip `path` into `path.gz`, removing the original only once the
/// compressed copy is complete.
fn compress_file(path: &Path) -> Result<()> {
    let gz = gz_path(path);
    let mut temp = gz.clone().into_os_string();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    let result = (|| -> io::Result<()> {
        let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
        let output = BufWriter::with_capacity(64 * 1024, File::create(&temp)?);
        let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
        io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        fs::rename(&temp, &gz)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[LOGGER WARNING] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

impl Sink for RotatingFileSink {
    fn name(&self) -> &str {
        "rotating_file"
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let incoming = bytes.len() as u64;
        if self.current_size > 0 && self.current_size + incoming > self.policy.max_bytes {
            if let Err(e) = self.rotate() {
                eprintln!("[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.", e);
                if self.file.is_none() {
                    let (file, size) = Self::open(&self.base_path)?;
                    self.file = Some(file);
                    self.current_size = size;
                }
            }
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| LoggerError::sink_closed(self.base_path.display().to_string()))?;
        file.write_all(bytes).map_err(|e| {
            LoggerError::file_sink(
                self.base_path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })?;
        self.current_size += incoming;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut file) = self.file {
            file.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn test_policy_from_config() {
        let config = FileSinkConfig::enabled("logs/app.log")
            .with_max_size(2)
            .with_max_age(3)
            .with_compression(true);
        let policy = RotationPolicy::from_config(&config);
        assert_eq!(policy.max_bytes, 2 * MEGABYTE);
        assert_eq!(policy.max_age, Some(Duration::from_secs(3 * 24 * 3600)));
        assert!(policy.compress);

        let zero = FileSinkConfig::enabled("a.log").with_max_size(0).with_max_age(0);
        let policy = RotationPolicy::from_config(&zero);
        assert_eq!(policy.max_bytes, DEFAULT_MAX_MEGABYTES * MEGABYTE);
        assert_eq!(policy.max_age, None);
    }

    #[test]
    fn test_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested/deeper/app.log");
        let sink = RotatingFileSink::new(&log_path).unwrap();
        assert!(log_path.exists());
        assert_eq!(sink.current_size(), 0);
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.log");
        fs::write(&log_path, b"existing\n").unwrap();

        let mut sink = RotatingFileSink::new(&log_path).unwrap();
        assert_eq!(sink.current_size(), 9);
        sink.write(b"next\n").unwrap();
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "existing\nnext\n");
    }

    #[test]
    fn test_rotates_when_size_exceeded() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("rotation.log");
        let policy = RotationPolicy::new().with_max_bytes(100);
        let mut sink = RotatingFileSink::with_policy(&log_path, policy).unwrap();

        for i in 0..20 {
            sink.write(format!("Test message number {}\n", i).as_bytes()).unwrap();
        }

        assert!(!sink.backups().is_empty());
        assert!(fs::metadata(&log_path).unwrap().len() <= 100);
        for (_, backup) in sink.backups() {
            let name = backup.file_name().unwrap().to_str().unwrap().to_string();
            assert!(name.starts_with("rotation-"));
            assert!(name.ends_with(".log"));
        }
    }

    #[test]
    fn test_oversized_single_write_is_kept() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("big.log");
        let policy = RotationPolicy::new().with_max_bytes(4);
        let mut sink = RotatingFileSink::with_policy(&log_path, policy).unwrap();
        sink.write(b"far more than four bytes\n").unwrap();
        assert_eq!(
            fs::read_to_string(&log_path).unwrap(),
            "far more than four bytes\n"
        );
    }

    #[test]
    fn test_compressed_backups() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("zipped.log");
        let policy = RotationPolicy::new().with_max_bytes(10).with_compression(true);
        let mut sink = RotatingFileSink::with_policy(&log_path, policy).unwrap();

        sink.write(b"first line\n").unwrap();
        sink.write(b"second line\n").unwrap();

        let backups = sink.backups();
        assert_eq!(backups.len(), 1);
        let backup = &backups[0].1;
        assert!(backup.to_str().unwrap().ends_with(".log.gz"));

        let mut decoded = String::new();
        flate2::read::GzDecoder::new(File::open(backup).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "first line\n");
    }

    #[test]
    fn test_max_backups_prunes_oldest() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("multi.log");
        let policy = RotationPolicy::new().with_max_bytes(10).with_max_backups(2);
        let mut sink = RotatingFileSink::with_policy(&log_path, policy).unwrap();

        for i in 0..10 {
            sink.write(format!("entry {:04}\n", i).as_bytes()).unwrap();
        }

        assert_eq!(sink.backups().len(), 2);
    }

    #[test]
    fn test_max_age_prunes_expired_backups() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("aged.log");
        let stale = dir.path().join("aged-2001-01-01T00-00-00.000.log");
        fs::write(&stale, b"old\n").unwrap();

        let policy = RotationPolicy::new()
            .with_max_bytes(5)
            .with_max_age(Duration::from_secs(24 * 3600));
        let mut sink = RotatingFileSink::with_policy(&log_path, policy).unwrap();
        sink.write(b"fresh\n").unwrap();
        sink.write(b"again\n").unwrap();

        assert!(!stale.exists());
        assert_eq!(sink.backups().len(), 1);
    }

    #[test]
    fn test_unrelated_files_are_ignored() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("svc.log");
        fs::write(dir.path().join("svc-notes.txt"), b"keep").unwrap();
        fs::write(dir.path().join("other-2001-01-01T00-00-00.000.log"), b"keep").unwrap();

        let sink = RotatingFileSink::new(&log_path).unwrap();
        assert!(sink.backups().is_empty());
    }
}
