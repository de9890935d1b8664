//! Host-to-guest connectivity: the generated SSH config, remote commands
//! over `docker-machine ssh`, and the NFS mount.

use std::convert::Infallible;
use std::path::Path;

use super::{MACHINE_NAME, Machine};
use crate::error::DinghyError;
use crate::nfs::NfsExport;
use crate::process::Runner;

/// Shared folder docker-machine mounts on boot. There is no option to skip
/// creating it, so it is unmounted before the NFS mount.
const LEGACY_SHARED_FOLDER: &str = "/Users";

/// Render the SSH client config for the VM.
pub fn render_ssh_config(ip: &str, store_path: &Path) -> String {
    format!(
        "Host {MACHINE_NAME}\n  \
         HostName {ip}\n  \
         User docker\n  \
         Port 22\n  \
         UserKnownHostsFile /dev/null\n  \
         StrictHostKeyChecking no\n  \
         PasswordAuthentication no\n  \
         IdentityFile {key}\n  \
         IdentitiesOnly yes\n  \
         LogLevel ERROR\n",
        key = store_path.join("id_rsa").display(),
    )
}

/// The host's address as seen from the VM: the VM address with its last
/// octet replaced by `1`.
///
/// This leans on docker-machine's host-only network always giving the host
/// the `.1` address next to the VM. Nothing checks that; a custom network
/// layout yields a wrong address.
pub fn host_ip_for(vm_ip: &str) -> Result<String, DinghyError> {
    match vm_ip.rsplit_once('.') {
        Some((prefix, last)) if !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit()) => {
            Ok(format!("{prefix}.1"))
        }
        _ => Err(DinghyError::Inspection {
            name: MACHINE_NAME.to_string(),
            message: format!("cannot derive host IP from VM address '{vm_ip}'"),
        }),
    }
}

impl<R: Runner> Machine<R> {
    /// SSH config for the VM's current address and key.
    pub async fn ssh_config(&self) -> Result<String, DinghyError> {
        let info = self.inspect().await?;
        Ok(render_ssh_config(info.ip_address()?, &info.store_path()?))
    }

    /// Overwrite the SSH config file with a freshly rendered one.
    pub async fn write_ssh_config(&self) -> Result<(), DinghyError> {
        let config = self.ssh_config().await?;
        let path = &self.ssh_config_path;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DinghyError::Io {
                    context: format!("creating directory {}", parent.display()),
                    source: e,
                })?;
        }
        tokio::fs::write(path, config.as_bytes())
            .await
            .map_err(|e| DinghyError::Io {
                context: format!("writing SSH config to {}", path.display()),
                source: e,
            })?;

        tracing::info!(path = %path.display(), "wrote SSH config");
        Ok(())
    }

    /// Replace this process with an interactive SSH session.
    pub fn ssh_interactive(&self) -> Result<Infallible, DinghyError> {
        let invocation = self.machine_cmd().args(["ssh", MACHINE_NAME]);
        self.runner.handoff(&invocation)
    }

    /// Run `command` in the VM. An empty command hands off to an
    /// interactive session instead.
    pub async fn ssh<S: AsRef<str>>(&self, command: &[S]) -> Result<(), DinghyError> {
        if command.is_empty() {
            match self.ssh_interactive()? {}
        }

        let invocation = self
            .machine_cmd()
            .args(["ssh", MACHINE_NAME, "--"])
            .args(command.iter().map(|c| c.as_ref()));
        let output = self.runner.run(&invocation).await?;
        if !output.success() {
            return Err(DinghyError::CommandFailed {
                command: command
                    .iter()
                    .map(|c| c.as_ref())
                    .collect::<Vec<_>>()
                    .join(" "),
                exit_status: output.status_code,
            });
        }
        Ok(())
    }

    pub async fn host_ip(&self) -> Result<String, DinghyError> {
        host_ip_for(&self.ip_address().await?)
    }

    /// Mount the host's NFS export inside the VM.
    pub async fn mount(&self, export: &NfsExport) -> Result<(), DinghyError> {
        println!("Mounting NFS {}", export.guest_dir);

        let unmount = format!("sudo umount {LEGACY_SHARED_FOLDER} || true");
        if let Err(e) = self.ssh(&[unmount]).await {
            tracing::debug!(error = %e, "ignoring failed shared folder unmount");
        }

        let host_ip = self.host_ip().await?;
        self.ssh(&[format!("sudo mkdir -p {}", export.guest_dir)])
            .await?;
        self.ssh(&[format!(
            "sudo mount -t nfs {host_ip}:{host} {guest} \
             -o nfsvers=3,udp,mountport={port},port={port},nolock,hard,intr",
            host = export.host_dir,
            guest = export.guest_dir,
            port = export.port,
        )])
        .await?;

        tracing::info!(guest_dir = %export.guest_dir, %host_ip, "mounted NFS export");
        Ok(())
    }
}
