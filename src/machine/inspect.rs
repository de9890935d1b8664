//! Querying docker-machine for the VM's state and attributes.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{MACHINE_NAME, Machine};
use crate::error::DinghyError;
use crate::process::{CommandOutput, Runner};

/// Where the VM is in its lifecycle, as reported by `docker-machine status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineState {
    /// docker-machine does not know the machine.
    Absent,
    /// Known but not running. Holds the lowercased vendor status
    /// ("stopped", "saved", "paused", ...).
    Stopped(String),
    Running,
}

impl MachineState {
    /// Only the exit code decides absence. docker-machine prints an error
    /// message on stdout for unknown machines, which must not be read as a status.
    pub fn from_status_output(output: &CommandOutput) -> Self {
        if !output.success() {
            return MachineState::Absent;
        }
        let status = output.stdout_lossy().trim().to_lowercase();
        if status == "running" {
            MachineState::Running
        } else {
            MachineState::Stopped(status)
        }
    }

    pub fn as_status(&self) -> &str {
        match self {
            MachineState::Absent => "not created",
            MachineState::Stopped(status) => status,
            MachineState::Running => "running",
        }
    }
}

/// The subset of `docker-machine inspect` output dinghy reads. Every field is
/// optional; accessors turn absence into an `Inspection` error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MachineInfo {
    #[serde(rename = "DriverName")]
    pub driver_name: Option<String>,
    #[serde(rename = "StorePath")]
    pub store_path: Option<String>,
    #[serde(rename = "Driver")]
    pub driver: Option<DriverInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriverInfo {
    #[serde(rename = "IPAddress")]
    pub ip_address: Option<String>,
    #[serde(rename = "StorePath")]
    pub store_path: Option<String>,
    #[serde(rename = "MachineName")]
    pub machine_name: Option<String>,
}

impl MachineInfo {
    pub fn parse(json: &str) -> Result<Self, DinghyError> {
        serde_json::from_str(json).map_err(|e| inspection_error(format!("invalid inspect output: {e}")))
    }

    pub fn ip_address(&self) -> Result<&str, DinghyError> {
        self.driver
            .as_ref()
            .and_then(|d| d.ip_address.as_deref())
            .ok_or_else(|| missing("Driver.IPAddress"))
    }

    pub fn driver_name(&self) -> Result<&str, DinghyError> {
        self.driver_name.as_deref().ok_or_else(|| missing("DriverName"))
    }

    /// Directory holding the VM's private data, including `id_rsa`.
    ///
    /// Older drivers expose the docker-machine root under `Driver.StorePath`
    /// and the machine dir lives beneath it; newer ones put the machine dir
    /// itself at the top-level `StorePath`.
    pub fn store_path(&self) -> Result<PathBuf, DinghyError> {
        if let Some(driver) = &self.driver
            && let Some(root) = &driver.store_path
        {
            let machine = driver
                .machine_name
                .as_deref()
                .ok_or_else(|| missing("Driver.MachineName"))?;
            return Ok(Path::new(root).join("machines").join(machine));
        }

        self.store_path
            .as_deref()
            .map(PathBuf::from)
            .ok_or_else(|| missing("StorePath"))
    }
}

fn inspection_error(message: String) -> DinghyError {
    DinghyError::Inspection {
        name: MACHINE_NAME.to_string(),
        message,
    }
}

fn missing(key: &str) -> DinghyError {
    inspection_error(format!("inspect output has no {key}"))
}

impl<R: Runner> Machine<R> {
    /// Run `docker-machine inspect`. Fails for an absent VM, so check
    /// [`Machine::created`] first to tell absence from a real error.
    pub async fn inspect(&self) -> Result<MachineInfo, DinghyError> {
        let invocation = self
            .machine_cmd()
            .args(["inspect", MACHINE_NAME])
            .captured();
        let output = self.runner.run(&invocation).await?;
        if !output.success() {
            return Err(inspection_error(format!(
                "`{invocation}` exited with status {}",
                output.status_code
            )));
        }
        MachineInfo::parse(&output.stdout_lossy())
    }

    pub async fn state(&self) -> Result<MachineState, DinghyError> {
        let invocation = self
            .machine_cmd()
            .args(["status", MACHINE_NAME])
            .captured();
        let output = self.runner.run(&invocation).await?;
        let state = MachineState::from_status_output(&output);
        tracing::debug!(name = MACHINE_NAME, state = state.as_status(), "queried VM status");
        Ok(state)
    }

    /// "running", the vendor status, or "not created".
    pub async fn status(&self) -> Result<String, DinghyError> {
        Ok(self.state().await?.as_status().to_string())
    }

    pub async fn created(&self) -> Result<bool, DinghyError> {
        Ok(self.state().await? != MachineState::Absent)
    }

    pub async fn running(&self) -> Result<bool, DinghyError> {
        Ok(self.state().await? == MachineState::Running)
    }

    pub async fn ip_address(&self) -> Result<String, DinghyError> {
        Ok(self.inspect().await?.ip_address()?.to_string())
    }

    pub async fn driver_name(&self) -> Result<String, DinghyError> {
        Ok(self.inspect().await?.driver_name()?.to_string())
    }

    pub async fn store_path(&self) -> Result<PathBuf, DinghyError> {
        self.inspect().await?.store_path()
    }
}
