//! Configuration module
//!
//! Display geometry (row heights, overscan), behavior flags and the demo
//! renderer's selection styling, loaded from a TOML file.

pub mod config;
