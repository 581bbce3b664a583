use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use human_repr::HumanCount;
use kdam::{BarExt, term, tqdm};
use rustop::opts;

use compress_videos::batch_runner::{BatchMessage, BatchRunner};
use compress_videos::config::Config;
use compress_videos::file_entry::EntryStatus;
use compress_videos::filescanner::FileScanner;
use compress_videos::transcode_task::TaskResult;
use compress_videos::transcoder::Transcoder;

fn main() -> ExitCode {
    env_logger::init();

    let (args, _rest) = opts! {
        synopsis "Compress the video files in a directory into a compressed/ subdirectory.";
        opt bitrate:Option<u32>, desc:"Target video bitrate in kbit/s. [default: 3000]";
        opt skip_existing:bool=false, desc:"Skip files that already have a compressed output.";
        opt config:Option<String>, desc:"Path to a JSON configuration file.";
        param indir:String, desc:"Directory containing video files.";
    }
    .parse_or_exit();

    let config = match &args.config {
        None => Config::default(),
        Some(path) => match Config::load(&PathBuf::from(path)) {
            Ok(config) => config,
            Err(err) => {
                println!("{}", err);
                return ExitCode::FAILURE;
            }
        },
    };

    let bitrate = args.bitrate.unwrap_or(config.bitrate_kbps);
    let skip_existing = args.skip_existing || config.skip_existing;
    let options = config.encode_options(bitrate);

    if !Transcoder::new(options.clone(), None).is_available() {
        println!("{} is not installed.", options.program);
        return ExitCode::FAILURE;
    }

    let scanner = FileScanner::new(&config.extensions);
    let entries = match scanner.scan(&PathBuf::from(&args.indir)) {
        Ok(entries) => entries,
        Err(err) => {
            println!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    println!("Found {} files.", entries.len());
    if entries.is_empty() {
        return ExitCode::SUCCESS;
    }

    let total = entries.len();
    let stop = Arc::new(AtomicBool::new(false));
    if let Err(err) = signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&stop)) {
        println!("Unable to register SIGINT handler: {}", err);
    }

    let mut runner = BatchRunner::new(entries, options, skip_existing, stop);
    let messages = runner.subscribe();
    let handle = runner.spawn();

    term::init(false);
    let mut pbar = tqdm!(
        total = total,
        desc = "compressing",
        position = 0,
        force_refresh = true
    );

    for msg in messages {
        match msg {
            BatchMessage::ItemStarted {
                index,
                total,
                entry,
            } => {
                let _ = pbar.write(format!("compressing {} ({}/{})", entry, index + 1, total));
            }
            BatchMessage::EncoderOutput { line, .. } => {
                pbar.set_postfix(line);
            }
            BatchMessage::ItemFinished { index, result } => {
                let glyph = match &result {
                    TaskResult::Skipped => EntryStatus::Skipped,
                    TaskResult::Succeeded => EntryStatus::Done,
                    TaskResult::Failed(_) => EntryStatus::Failed,
                };
                if let TaskResult::Failed(err) = &result {
                    let _ = pbar.write(format!("{} {}", glyph, err));
                } else {
                    let _ = pbar.write(format!("{}", glyph));
                }
                let _ = pbar.update_to(index + 1);
            }
            BatchMessage::BatchComplete(_) => break,
        }
    }

    let summary = match handle.join() {
        Ok(summary) => summary,
        Err(_) => {
            println!("The batch worker exited unexpectedly.");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "\nFinished converting {} items: {} succeeded, {} skipped, {} failed ({} -> {}).",
        summary.total,
        summary.succeeded,
        summary.skipped,
        summary.failed,
        summary.input_bytes.human_count_bytes(),
        summary.output_bytes.human_count_bytes()
    );
    if summary.interrupted {
        println!("Interrupted; remaining files were not processed.");
    }
    if summary.encoder_unavailable {
        println!("The encoder could not be started for any file.");
        return ExitCode::FAILURE;
    }

    match summary.failed {
        0 => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
