//! Runtime detection for Node.js and the package manager

use anyhow::Result;
use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: String,
    pub version: Option<String>,
    pub available: bool,
}

impl RuntimeInfo {
    /// One-line description for status output
    pub fn describe(&self) -> String {
        if self.available {
            format!("{} ({})", self.name, self.version.as_deref().unwrap_or("unknown"))
        } else {
            format!("{} (not installed)", self.name)
        }
    }
}

/// Probe `program --version`
pub fn check_program(program: &str, name: &str) -> RuntimeInfo {
    let output = Command::new(program).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name: name.to_string(),
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name: name.to_string(),
            version: None,
            available: false,
        },
    }
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    check_program("node", "Node.js")
}

/// Check if the configured package manager is available
pub fn check_package_manager(program: &str) -> RuntimeInfo {
    check_program(program, program)
}

/// Check everything `init` shells out to; fails listing whatever is missing.
pub fn check_runtimes(package_manager: &str) -> Result<Vec<RuntimeInfo>> {
    let runtimes = vec![check_node(), check_package_manager(package_manager)];

    let missing: Vec<String> = runtimes
        .iter()
        .filter(|r| !r.available)
        .map(|r| match r.name.as_str() {
            "Node.js" => "Node.js (install from https://nodejs.org)".to_string(),
            other => format!("{} (expected on PATH)", other),
        })
        .collect();

    if !missing.is_empty() {
        anyhow::bail!(
            "Missing required runtimes:\n{}",
            missing
                .iter()
                .map(|m| format!("  - {}", m))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Ok(runtimes)
}
