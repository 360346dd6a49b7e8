//! Source file change detection for watch mode.
//!
//! Detects when mod source files have been modified, added, or removed
//! by polling modification times on an interval; the build loop decides
//! what to do with the changes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use tracing::debug;

/// Default scan interval (1000ms = 1Hz)
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_millis(1000);

/// File extensions that count as mod sources.
pub const SOURCE_EXTENSIONS: &[&str] = &["tl", "lua", "xml", "toml"];

/// Result of scanning for source changes
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Files that were modified (path and new modification time)
    pub changed: Vec<(PathBuf, SystemTime)>,
    /// Files that were added to the tree
    pub added: Vec<PathBuf>,
    /// Files that were removed from the tree
    pub removed: Vec<PathBuf>,
}

impl ScanResult {
    /// Returns true if there are any changes detected
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty() || !self.added.is_empty() || !self.removed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.changed.len() + self.added.len() + self.removed.len()
    }
}

/// Scanner for detecting source file changes
pub struct SourceScanner {
    /// Root directory to scan
    source_dir: PathBuf,
    /// Directories whose contents never count as sources (build
    /// outputs, or the watcher would retrigger itself forever).
    excluded_dirs: Vec<PathBuf>,
    /// Time between scans
    scan_interval: Duration,
    /// Last time we performed a scan
    last_scan: Option<Instant>,
    /// Cached state from last scan: path -> modification time
    cached_state: HashMap<PathBuf, SystemTime>,
}

impl SourceScanner {
    /// Create a new scanner with the default scan interval.
    pub fn new(source_dir: PathBuf) -> Self {
        Self::with_interval(source_dir, DEFAULT_SCAN_INTERVAL)
    }

    /// Create a new scanner with a custom scan interval.
    pub fn with_interval(source_dir: PathBuf, scan_interval: Duration) -> Self {
        Self::with_excluded_dirs(source_dir, scan_interval, Vec::new())
    }

    /// Create a new scanner that skips the given directories.
    pub fn with_excluded_dirs(
        source_dir: PathBuf,
        scan_interval: Duration,
        excluded_dirs: Vec<PathBuf>,
    ) -> Self {
        // Pre-populate the cache with current files to avoid detecting
        // them as "added" on the first scan.
        let cached_state = Self::sources_in_tree(&source_dir, &excluded_dirs);

        Self {
            source_dir,
            excluded_dirs,
            scan_interval,
            last_scan: None,
            cached_state,
        }
    }

    /// Check if enough time has elapsed since the last scan
    pub fn should_scan(&self) -> bool {
        match self.last_scan {
            Some(last) => last.elapsed() >= self.scan_interval,
            None => true,
        }
    }

    pub fn scan_interval(&self) -> Duration {
        self.scan_interval
    }

    /// Scan the source tree for changes, updating the internal cache.
    pub fn scan_changes(&mut self) -> ScanResult {
        self.last_scan = Some(Instant::now());

        debug!(
            target: "watch",
            "Scanning source tree for changes: {}",
            self.source_dir.display()
        );

        let current_state = Self::sources_in_tree(&self.source_dir, &self.excluded_dirs);

        let mut result = ScanResult {
            changed: Vec::new(),
            added: Vec::new(),
            removed: Vec::new(),
        };

        for (path, modified_time) in &current_state {
            match self.cached_state.get(path) {
                Some(cached_time) => {
                    if cached_time != modified_time {
                        debug!(target: "watch", "Source changed: {}", path.display());
                        result.changed.push((path.clone(), *modified_time));
                    }
                }
                None => {
                    debug!(target: "watch", "Source added: {}", path.display());
                    result.added.push(path.clone());
                }
            }
        }

        for path in self.cached_state.keys() {
            if !current_state.contains_key(path) {
                debug!(target: "watch", "Source removed: {}", path.display());
                result.removed.push(path.clone());
            }
        }

        self.cached_state = current_state;

        result
    }

    /// Walk the source tree and collect every source file's modification
    /// time.
    fn sources_in_tree(
        source_dir: &Path,
        excluded_dirs: &[PathBuf],
    ) -> HashMap<PathBuf, SystemTime> {
        let mut sources = HashMap::new();

        if !source_dir.exists() {
            debug!(
                target: "watch",
                "Source directory does not exist: {}",
                source_dir.display()
            );
            return sources;
        }

        let mut pending = vec![source_dir.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        target: "watch",
                        "Failed to read directory {}: {}",
                        dir.display(),
                        e
                    );
                    continue;
                }
            };

            for entry in entries.flatten() {
                let path = entry.path();

                if path.is_dir() {
                    if !excluded_dirs.iter().any(|excluded| path == *excluded) {
                        pending.push(path);
                    }
                    continue;
                }

                let is_source = path
                    .extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
                if !is_source {
                    continue;
                }

                match std::fs::metadata(&path).and_then(|m| m.modified()) {
                    Ok(modified_time) => {
                        sources.insert(path, modified_time);
                    }
                    Err(e) => {
                        tracing::warn!(
                            target: "watch",
                            "Failed to get modification time for {}: {}",
                            path.display(),
                            e
                        );
                    }
                }
            }
        }

        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_detect_new_source() {
        let temp_dir = TempDir::new().unwrap();
        let mut scanner = SourceScanner::new(temp_dir.path().to_path_buf());

        let result = scanner.scan_changes();
        assert!(!result.has_changes());

        let source_path = temp_dir.path().join("main.tl");
        let mut file = File::create(&source_path).unwrap();
        file.write_all(b"-- entry point").unwrap();

        let result = scanner.scan_changes();
        assert_eq!(result.added, vec![source_path]);
        assert!(result.changed.is_empty());
        assert!(result.removed.is_empty());
    }

    #[test]
    fn test_detect_modified_source_in_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        let sub_dir = temp_dir.path().join("features");
        fs::create_dir(&sub_dir).unwrap();
        let source_path = sub_dir.join("doors.tl");
        File::create(&source_path)
            .unwrap()
            .write_all(b"a")
            .unwrap();

        let mut scanner = SourceScanner::new(temp_dir.path().to_path_buf());
        scanner.scan_changes();

        std::thread::sleep(Duration::from_millis(10)); // Ensure different timestamp
        File::create(&source_path)
            .unwrap()
            .write_all(b"b")
            .unwrap();

        let result = scanner.scan_changes();
        assert_eq!(result.changed.len(), 1);
        assert_eq!(result.changed[0].0, source_path);
    }

    #[test]
    fn test_detect_removed_source() {
        let temp_dir = TempDir::new().unwrap();
        let source_path = temp_dir.path().join("main.tl");
        File::create(&source_path).unwrap();

        let mut scanner = SourceScanner::new(temp_dir.path().to_path_buf());
        scanner.scan_changes();

        fs::remove_file(&source_path).unwrap();

        let result = scanner.scan_changes();
        assert_eq!(result.removed, vec![source_path]);
    }

    #[test]
    fn test_ignores_non_source_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut scanner = SourceScanner::new(temp_dir.path().to_path_buf());

        File::create(temp_dir.path().join("notes.txt")).unwrap();
        File::create(temp_dir.path().join("image.png")).unwrap();
        File::create(temp_dir.path().join("main.tl")).unwrap();

        let result = scanner.scan_changes();
        assert_eq!(result.added.len(), 1);
    }

    #[test]
    fn test_excluded_directories_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("mod");
        fs::create_dir(&output_dir).unwrap();
        File::create(temp_dir.path().join("main.tl")).unwrap();

        let mut scanner = SourceScanner::with_excluded_dirs(
            temp_dir.path().to_path_buf(),
            DEFAULT_SCAN_INTERVAL,
            vec![output_dir.clone()],
        );
        scanner.scan_changes();

        // A build output appearing in the excluded directory is not a
        // change.
        File::create(output_dir.join("generated.xml")).unwrap();
        let result = scanner.scan_changes();
        assert!(!result.has_changes());
    }

    #[test]
    fn test_handles_missing_directory() {
        let missing = PathBuf::from("/tmp/oubliette_watch_does_not_exist_12345");
        let mut scanner = SourceScanner::new(missing);

        let result = scanner.scan_changes();
        assert!(!result.has_changes());
    }

    #[test]
    fn test_should_scan_timing() {
        let temp_dir = TempDir::new().unwrap();
        let mut scanner =
            SourceScanner::with_interval(temp_dir.path().to_path_buf(), Duration::from_millis(50));

        assert!(scanner.should_scan());
        scanner.scan_changes();
        assert!(!scanner.should_scan());

        std::thread::sleep(Duration::from_millis(60));
        assert!(scanner.should_scan());
    }
}
