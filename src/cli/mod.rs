// src/cli/mod.rs
//! Command-line definitions of the `ghostrider` binary

/// clap command and option types
pub mod commands;

pub use commands::{
    Action, Commands, ConfigOptions, HugePagesOptions, OrderOptions, OrderSource, TuningOptions,
};
