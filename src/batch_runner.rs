use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::error::EncodeError;
use crate::file_entry::{EntryStatus, FileEntry};
use crate::transcode_task::{TaskResult, TranscodeTask};
use crate::transcoder::{EncodeOptions, Transcoder};

#[derive(Clone, Debug)]
pub struct BatchItem {
    pub entry: FileEntry,
    pub status: EntryStatus,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Every attempted entry failed before the encoder even started;
    /// the binary is probably missing from the system.
    pub encoder_unavailable: bool,
    /// The stop flag ended the run before all entries were processed.
    pub interrupted: bool,
    pub input_bytes: u64,
    pub output_bytes: u64,
}

#[derive(Clone, Debug)]
pub enum BatchMessage {
    ItemStarted {
        index: usize,
        total: usize,
        entry: FileEntry,
    },
    /// One opaque progress line from the encoder, forwarded as it arrives.
    EncoderOutput { index: usize, line: String },
    ItemFinished { index: usize, result: TaskResult },
    BatchComplete(BatchSummary),
}

/// Drives one batch of entries strictly sequentially. `run` consumes the
/// runner, so a second run over the same entries needs a new instance;
/// the busy flag lets a caller grey out its actions while a run is live.
pub struct BatchRunner {
    items: Arc<Mutex<Vec<BatchItem>>>,
    options: EncodeOptions,
    skip_existing: bool,
    stop: Arc<AtomicBool>,
    busy: Arc<AtomicBool>,
    subscribers: Vec<Sender<BatchMessage>>,
}

impl BatchRunner {
    pub fn new(
        entries: Vec<FileEntry>,
        options: EncodeOptions,
        skip_existing: bool,
        stop: Arc<AtomicBool>,
    ) -> Self {
        let items = entries
            .into_iter()
            .map(|entry| BatchItem {
                entry,
                status: EntryStatus::Pending,
            })
            .collect();
        BatchRunner {
            items: Arc::new(Mutex::new(items)),
            options,
            skip_existing,
            stop,
            busy: Arc::new(AtomicBool::new(false)),
            subscribers: vec![],
        }
    }

    pub fn subscribe(&mut self) -> Receiver<BatchMessage> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Shared handle onto the per-item status list; callers may snapshot
    /// it while a run is active but must not mutate entries.
    pub fn items(&self) -> Arc<Mutex<Vec<BatchItem>>> {
        Arc::clone(&self.items)
    }

    pub fn busy_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.busy)
    }

    pub fn spawn(self) -> JoinHandle<BatchSummary> {
        thread::spawn(move || self.run())
    }

    pub fn run(self) -> BatchSummary {
        self.busy.store(true, Ordering::SeqCst);

        let total = self.items.lock().unwrap().len();
        let mut summary = BatchSummary {
            total,
            ..BatchSummary::default()
        };
        let mut launch_failures = 0;

        for index in 0..total {
            if self.stop.load(Ordering::SeqCst) {
                summary.interrupted = true;
                break;
            }

            let entry = {
                let items = self.items.lock().unwrap();
                items[index].entry.clone()
            };

            self.set_status(index, EntryStatus::Running);
            self.publish(BatchMessage::ItemStarted {
                index,
                total,
                entry: entry.clone(),
            });

            let result = self.process_entry(index, entry.clone());

            match &result {
                TaskResult::Skipped => {
                    summary.skipped += 1;
                    self.set_status(index, EntryStatus::Skipped);
                }
                TaskResult::Succeeded => {
                    summary.succeeded += 1;
                    summary.input_bytes += file_size(&entry.source);
                    summary.output_bytes += file_size(&entry.destination);
                    self.set_status(index, EntryStatus::Done);
                }
                TaskResult::Failed(err) => {
                    summary.failed += 1;
                    if err.is_launch_failure() {
                        launch_failures += 1;
                    }
                    self.set_status(index, EntryStatus::Failed);
                }
            }

            self.publish(BatchMessage::ItemFinished { index, result });
        }

        let attempted = summary.succeeded + summary.failed;
        summary.encoder_unavailable = attempted > 0 && launch_failures == attempted;

        self.busy.store(false, Ordering::SeqCst);
        self.publish(BatchMessage::BatchComplete(summary.clone()));
        summary
    }

    fn process_entry(&self, index: usize, entry: FileEntry) -> TaskResult {
        let (tx, rx) = mpsc::channel();
        let transcoder = Transcoder::new(self.options.clone(), Some(Arc::clone(&self.stop)));
        let task = TranscodeTask::new(entry.clone(), self.skip_existing);
        let task_thread = thread::spawn(move || task.run(&transcoder, Some(&tx)));

        // The channel closes when the task returns, ending this loop, so
        // every line for entry N is published before N finishes.
        for line in rx {
            self.publish(BatchMessage::EncoderOutput { index, line });
        }

        task_thread.join().unwrap_or_else(|_| {
            TaskResult::Failed(EncodeError::for_file(&entry.source, "encode worker panicked"))
        })
    }

    fn set_status(&self, index: usize, status: EntryStatus) {
        let mut items = self.items.lock().unwrap();
        if let Some(item) = items.get_mut(index) {
            item.status = status;
        }
    }

    fn publish(&self, msg: BatchMessage) {
        for tx in &self.subscribers {
            let _ = tx.send(msg.clone());
        }
    }
}

fn file_size(path: &Path) -> u64 {
    match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(_) => 0,
    }
}
