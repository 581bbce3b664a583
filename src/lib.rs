pub mod batch_runner;
pub mod config;
pub mod error;
pub mod file_entry;
pub mod filescanner;
pub mod timestamps;
pub mod transcode_task;
pub mod transcoder;
