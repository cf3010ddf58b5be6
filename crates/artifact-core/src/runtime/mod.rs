//! Runtime detection and package manager invocation
//!
//! This module provides:
//! - Node.js and package manager detection
//! - A blocking package manager adapter used by `init` and by reconciliation

pub mod check;
pub mod package_manager;

pub use check::{check_node, check_package_manager, check_runtimes, RuntimeInfo};
pub use package_manager::{CommandError, CommandOutput, PackageManager};
