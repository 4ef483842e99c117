// Infrastructure adapters for the rewrite engine: syntax tree loading,
// committing edits, config files and the worker pool.

pub mod committer;
pub mod concurrency;
pub mod config_loader;
pub mod json_front_end;

pub use committer::{DryRunSink, FsEditSink};
pub use config_loader::ConfigFile;
pub use json_front_end::JsonFrontEnd;
