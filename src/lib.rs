//! Firmware change and compliance analysis.
//!
//! Binaries are decompiled with a headless decompiler, old/new code and
//! specification versions are compared through a reasoning service, and the
//! two change sets are correlated into a compliance report.

pub mod adapters;
pub mod config;
pub mod constants;
pub mod enums;
pub mod errors;
pub mod helpers;
pub mod prompts;
pub mod server;
pub mod services;
pub mod structs;
pub mod traits;
pub mod workers;
