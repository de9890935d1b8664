#![allow(unused_assignments)] // thiserror/miette proc macros trigger false positives

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod machine;
pub mod nfs;
pub mod paths;
pub mod process;
pub mod provider;
