use std::ffi::OsString;
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{ChildStderr, ChildStdout, Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use log::debug;

use crate::error::EncodeError;

#[derive(Clone, Debug)]
pub struct EncodeOptions {
    /// Encoder binary to invoke, normally "ffmpeg".
    pub program: String,
    pub crf: u32,
    pub preset: String,
    pub bitrate_kbps: u32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            program: String::from("ffmpeg"),
            crf: 23,
            preset: String::from("medium"),
            bitrate_kbps: 3000,
        }
    }
}

pub struct Transcoder {
    stop: Option<Arc<AtomicBool>>,
    pub options: EncodeOptions,
}

impl Transcoder {
    pub fn new(options: EncodeOptions, stop: Option<Arc<AtomicBool>>) -> Self {
        Transcoder { stop, options }
    }

    pub fn is_available(&self) -> bool {
        let cmd = Command::new(&self.options.program).arg("-version").output();
        match cmd {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }

    /// Re-encodes `source` into `destination`, forwarding the encoder's
    /// progress lines verbatim as they arrive. Blocks until the child
    /// exits; a set stop flag kills the child and removes the partial
    /// output file.
    pub fn encode(
        &self,
        source: &Path,
        destination: &Path,
        progress_tx: Option<&Sender<String>>,
    ) -> Result<(), EncodeError> {
        let args = self.build_args(source, destination);
        debug!(
            "running {} {}",
            self.options.program,
            args.iter()
                .map(|s| format!("{:?}", s))
                .collect::<Vec<String>>()
                .join(" ")
        );

        let mut child = Command::new(&self.options.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                EncodeError::launch(
                    source,
                    &format!("unable to start {}: {}", self.options.program, err),
                )
            })?;

        // stderr must drain on its own thread; a child that fills the
        // stderr pipe would otherwise block and never reach stdout EOF.
        let stderr_thread = drain_stderr(child.stderr.take());

        let interrupted = self.consume_stdout(child.stdout.take(), progress_tx);
        if interrupted {
            let _ = child.kill();
        }

        let status = child
            .wait()
            .map_err(|err| EncodeError::for_file(source, &format!("wait failed: {}", err)))?;
        let stderr_text = match stderr_thread {
            None => String::new(),
            Some(handle) => handle.join().unwrap_or_default(),
        };

        if interrupted {
            let _ = fs::remove_file(destination);
            return Err(EncodeError::for_file(source, "encode interrupted"));
        }

        if status.success() {
            Ok(())
        } else {
            let _ = fs::remove_file(destination);
            let msg = match status.code() {
                Some(code) => format!(
                    "{} exited with {}: {}",
                    self.options.program,
                    code,
                    stderr_text.trim()
                ),
                None => format!(
                    "{} did not exit successfully: {}",
                    self.options.program,
                    stderr_text.trim()
                ),
            };
            Err(EncodeError::for_file(source, &msg))
        }
    }

    fn build_args(&self, source: &Path, destination: &Path) -> Vec<OsString> {
        fn oss(s: &str) -> OsString {
            OsString::from(s)
        }

        vec![
            oss("-hide_banner"),
            oss("-nostats"),
            oss("-loglevel"),
            oss("warning"),
            oss("-progress"),
            oss("pipe:1"),
            oss("-i"),
            source.into(),
            oss("-y"),
            oss("-c:v"),
            oss("libx264"),
            oss("-crf"),
            oss(&self.options.crf.to_string()),
            oss("-preset"),
            oss(&self.options.preset),
            oss("-b:v"),
            oss(&format!("{}k", self.options.bitrate_kbps)),
            oss("-c:a"),
            oss("copy"),
            destination.into(),
        ]
    }

    fn consume_stdout(
        &self,
        stdout: Option<ChildStdout>,
        progress_tx: Option<&Sender<String>>,
    ) -> bool {
        let Some(stdout) = stdout else {
            return false;
        };
        let stdout_reader = BufReader::new(stdout);
        for line in stdout_reader.lines().map_while(Result::ok) {
            if let Some(tx) = progress_tx {
                let _ = tx.send(line);
            }

            let should_stop = match &self.stop {
                None => false,
                Some(s) => s.load(Ordering::SeqCst),
            };
            if should_stop {
                return true;
            }
        }

        false
    }
}

fn drain_stderr(stderr: Option<ChildStderr>) -> Option<JoinHandle<String>> {
    stderr.map(|stream| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = BufReader::new(stream).read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}
