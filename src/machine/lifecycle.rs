//! Creating, starting, stopping and removing the VM.

use super::{MACHINE_NAME, Machine};
use crate::error::DinghyError;
use crate::process::{CommandOutput, Invocation, Runner};
use crate::provider::{CreateOptions, Provider};

impl<R: Runner> Machine<R> {
    /// `docker-machine create`. On failure docker-machine's stderr is echoed
    /// and whatever it left behind stays in place.
    ///
    /// VirtualBox machines get post-create configuration and end up running;
    /// other providers are left as `create` left them.
    pub async fn create(
        &self,
        provider: Provider,
        options: &CreateOptions,
    ) -> Result<(), DinghyError> {
        let invocation = self
            .machine_cmd()
            .args(["create", "-d", provider.driver_name()])
            .args(options.flags(provider))
            .arg(MACHINE_NAME)
            .captured();

        tracing::info!(name = MACHINE_NAME, %provider, "creating VM");
        let output = self.runner.run(&invocation).await?;
        if !output.success() {
            return Err(provisioning_failure(
                "There was an error creating the VM.",
                &output,
            ));
        }
        tracing::info!(name = MACHINE_NAME, "VM created");

        self.configure_new_machine(provider).await
    }

    /// `docker-machine start`, then regenerate the SSH config for the
    /// (possibly new) IP address.
    pub async fn up(&self) -> Result<(), DinghyError> {
        let invocation = self
            .machine_cmd()
            .args(["start", MACHINE_NAME])
            .captured();
        let output = self.runner.run(&invocation).await?;
        if !output.success() {
            return Err(provisioning_failure(
                "There was an error bringing up the VM. Dinghy cannot continue.",
                &output,
            ));
        }
        tracing::info!(name = MACHINE_NAME, "VM started");

        self.write_ssh_config().await
    }

    pub async fn halt(&self) {
        self.best_effort(self.machine_cmd().args(["stop", MACHINE_NAME]))
            .await;
    }

    pub async fn upgrade(&self) {
        self.best_effort(self.machine_cmd().args(["upgrade", MACHINE_NAME]))
            .await;
    }

    pub async fn destroy(&self, force: bool) {
        let mut invocation = self.machine_cmd().arg("rm");
        if force {
            invocation = invocation.arg("--force");
        }
        self.best_effort(invocation.arg(MACHINE_NAME)).await;
    }

    async fn configure_new_machine(&self, provider: Provider) -> Result<(), DinghyError> {
        if provider != Provider::VirtualBox {
            return Ok(());
        }

        self.halt().await;

        // Resolve DNS through the host so *.docker names work inside containers.
        // docker-machine has no flag for this.
        let invocation = Invocation::new(&self.tools.vbox_manage).args([
            "modifyvm",
            MACHINE_NAME,
            "--natdnshostresolver1",
            "on",
        ]);
        let output = self.runner.run(&invocation).await?;
        if !output.success() {
            return Err(DinghyError::Provisioning {
                message: "There was an error configuring the VM.".into(),
                stderr: output.stderr_lossy(),
            });
        }

        self.up().await
    }
}

fn provisioning_failure(message: &str, output: &CommandOutput) -> DinghyError {
    let stderr = output.stderr_lossy();
    if !stderr.trim().is_empty() {
        eprintln!("{}", stderr.trim_end());
    }
    DinghyError::Provisioning {
        message: message.to_string(),
        stderr,
    }
}
