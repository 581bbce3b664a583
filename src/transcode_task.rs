use std::fs;
use std::sync::mpsc::Sender;

use log::{debug, warn};

use crate::error::EncodeError;
use crate::file_entry::FileEntry;
use crate::timestamps;
use crate::transcoder::Transcoder;

#[derive(Clone, Debug, PartialEq)]
pub enum TaskResult {
    Skipped,
    Succeeded,
    Failed(EncodeError),
}

/// One encode of one entry. Transient; owns nothing beyond the entry and
/// the skip flag.
#[derive(Clone, Debug)]
pub struct TranscodeTask {
    pub entry: FileEntry,
    pub skip_existing: bool,
}

impl TranscodeTask {
    pub fn new(entry: FileEntry, skip_existing: bool) -> Self {
        TranscodeTask {
            entry,
            skip_existing,
        }
    }

    pub fn run(&self, transcoder: &Transcoder, progress_tx: Option<&Sender<String>>) -> TaskResult {
        // The skip decision happens before any process launch or metadata
        // read, so re-running a batch over converted files is a no-op.
        if self.skip_existing && self.entry.destination.exists() {
            debug!("{} already exists in target folder, skipping", self.entry);
            return TaskResult::Skipped;
        }

        let created = timestamps::read(&self.entry.source);
        if created.is_none() {
            debug!("no creation time available for {}", self.entry);
        }

        if let Some(parent) = self.entry.destination.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                return TaskResult::Failed(EncodeError::for_file(
                    &self.entry.source,
                    &format!("unable to create {:?}: {}", parent, err),
                ));
            }
        }

        match transcoder.encode(&self.entry.source, &self.entry.destination, progress_tx) {
            Ok(()) => {
                if let Some(ts) = &created {
                    if !timestamps::restore(&self.entry.destination, ts) {
                        warn!(
                            "could not restore creation time on {:?}",
                            self.entry.destination
                        );
                    }
                }
                TaskResult::Succeeded
            }
            Err(err) => TaskResult::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcoder::EncodeOptions;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn entry_in(dir: &std::path::Path, name: &str) -> FileEntry {
        let source = dir.join(name);
        fs::write(&source, b"source bytes").unwrap();
        FileEntry::new(source).unwrap()
    }

    fn transcoder_for(program: &str) -> Transcoder {
        Transcoder::new(
            EncodeOptions {
                program: String::from(program),
                ..EncodeOptions::default()
            },
            None,
        )
    }

    #[test]
    fn test_skip_existing_never_launches_encoder() {
        let dir = tempdir().unwrap();
        let entry = entry_in(dir.path(), "a.mp4");
        fs::create_dir_all(entry.destination.parent().unwrap()).unwrap();
        fs::write(&entry.destination, b"previous output").unwrap();

        // A broken encoder path proves no process launch is attempted.
        let task = TranscodeTask::new(entry.clone(), true);
        let result = task.run(&transcoder_for("/no/such/encoder"), None);
        assert_eq!(result, TaskResult::Skipped);
        assert_eq!(fs::read(&entry.destination).unwrap(), b"previous output");
    }

    #[test]
    fn test_missing_output_is_not_skipped() {
        let dir = tempdir().unwrap();
        let entry = entry_in(dir.path(), "a.mp4");

        let task = TranscodeTask::new(entry, true);
        let result = task.run(&transcoder_for("/no/such/encoder"), None);
        assert!(matches!(result, TaskResult::Failed(_)));
    }

    #[test]
    #[cfg(unix)]
    fn test_creates_compressed_directory() {
        let dir = tempdir().unwrap();
        let entry = entry_in(dir.path(), "a.mp4");
        assert!(!dir.path().join("compressed").exists());

        let task = TranscodeTask::new(entry, false);
        let result = task.run(&transcoder_for("true"), None);
        assert_eq!(result, TaskResult::Succeeded);
        assert!(dir.path().join("compressed").is_dir());
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_unwritable_destination_parent_fails() {
        let task = TranscodeTask::new(
            FileEntry {
                source: PathBuf::from("in.mp4"),
                destination: PathBuf::from("/proc/compress-videos-test/compressed/in.mp4"),
                name: String::from("in.mp4"),
            },
            false,
        );
        let result = task.run(&transcoder_for("true"), None);
        assert!(matches!(result, TaskResult::Failed(_)));
    }
}
