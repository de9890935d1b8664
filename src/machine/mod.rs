//! The `dinghy` VM, driven through docker-machine.
//!
//! `Machine` holds no VM state of its own. Every query re-runs docker-machine,
//! since the VM can be stopped, destroyed or recreated behind our back.

pub mod connect;
pub mod inspect;
pub mod lifecycle;

use std::path::{Path, PathBuf};

use crate::config::ToolsConfig;
use crate::process::{Invocation, Runner};

pub use connect::{host_ip_for, render_ssh_config};
pub use inspect::{DriverInfo, MachineInfo, MachineState};

/// docker-machine name of the one VM dinghy manages.
pub const MACHINE_NAME: &str = "dinghy";

pub struct Machine<R> {
    runner: R,
    tools: ToolsConfig,
    ssh_config_path: PathBuf,
}

impl<R: Runner> Machine<R> {
    pub fn new(runner: R, tools: ToolsConfig, ssh_config_path: PathBuf) -> Self {
        Self {
            runner,
            tools,
            ssh_config_path,
        }
    }

    pub fn name(&self) -> &'static str {
        MACHINE_NAME
    }

    pub fn ssh_config_path(&self) -> &Path {
        &self.ssh_config_path
    }

    fn machine_cmd(&self) -> Invocation {
        Invocation::new(&self.tools.machine)
    }

    /// Run once and log a failure instead of returning it.
    async fn best_effort(&self, invocation: Invocation) {
        match self.runner.run(&invocation).await {
            Ok(output) if output.success() => {}
            Ok(output) => {
                tracing::warn!(
                    command = %invocation,
                    status = output.status_code,
                    "command failed, continuing"
                );
            }
            Err(e) => {
                tracing::warn!(command = %invocation, error = %e, "command could not be run, continuing");
            }
        }
    }
}
