// Rewrite engine: syntax model, rules, edits and driver synthesis.
// Pure code, no I/O.

pub mod ast;
pub mod config;
pub mod context;
pub mod driver;
pub mod edit;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod rules;
pub mod template;
pub mod types;

pub use engine::rewrite_unit;
