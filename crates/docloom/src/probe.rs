//! Runtime capability probes.
//!
//! The capability registry merges the declared capability list with a
//! [`CapabilityProbe`]. This module provides the probe used for
//! tool-backed capabilities: checking that the external program a
//! capability depends on is actually reachable before the build promises
//! to use it.

use std::collections::HashMap;
use std::process::{Command, Stdio};

use docloom_model::CapabilityProbe;

/// Probes capabilities by invoking their backing programs.
///
/// Capabilities with a registered command are available only if
/// `<program> --version` runs and exits successfully; a program that
/// cannot be spawned makes the capability unavailable. Capabilities with
/// no registered command are not tool-backed and pass unconditionally.
#[derive(Debug, Default)]
pub struct CommandProbe {
    commands: HashMap<String, String>,
}

impl CommandProbe {
    /// Creates a probe with no registered commands.
    pub fn new() -> Self {
        CommandProbe::default()
    }

    /// Registers the backing program for a capability.
    pub fn command(mut self, capability: impl Into<String>, program: impl Into<String>) -> Self {
        self.commands.insert(capability.into(), program.into());
        self
    }
}

impl CapabilityProbe for CommandProbe {
    fn probe(&self, name: &str) -> bool {
        match self.commands.get(name) {
            Some(program) => Command::new(program)
                .arg("--version")
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|status| status.success())
                .unwrap_or(false),
            None => true,
        }
    }
}
