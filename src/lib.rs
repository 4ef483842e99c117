// Main library entry point for nse_rewrite.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;
