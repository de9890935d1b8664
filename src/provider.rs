use std::fmt;

use crate::error::DinghyError;

/// The docker-machine drivers dinghy knows how to provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    VirtualBox,
    VmwareFusion,
}

impl Provider {
    /// Map a user-facing provider name onto a driver. Case-sensitive.
    pub fn from_alias(name: &str) -> Option<Provider> {
        match name {
            "virtualbox" => Some(Provider::VirtualBox),
            "vmware" | "vmware_fusion" | "vmwarefusion" | "vmware_desktop" => {
                Some(Provider::VmwareFusion)
            }
            _ => None,
        }
    }

    /// Like [`Provider::from_alias`], rejecting unknown names.
    pub fn translate(name: &str) -> Result<Provider, DinghyError> {
        Self::from_alias(name).ok_or_else(|| DinghyError::UnsupportedProvider {
            name: name.to_string(),
        })
    }

    /// The driver name passed to `docker-machine create -d`.
    pub fn driver_name(self) -> &'static str {
        match self {
            Provider::VirtualBox => "virtualbox",
            Provider::VmwareFusion => "vmwarefusion",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.driver_name())
    }
}

/// Resource settings for a new VM, translated into driver-specific
/// `docker-machine create` flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    pub memory_mb: Option<u32>,
    pub cpus: Option<u32>,
    pub disk_mb: Option<u32>,
    pub boot2docker_url: Option<String>,
}

impl CreateOptions {
    pub fn flags(&self, provider: Provider) -> Vec<String> {
        let (memory, cpus, disk, url) = match provider {
            Provider::VirtualBox => (
                "--virtualbox-memory",
                "--virtualbox-cpu-count",
                "--virtualbox-disk-size",
                "--virtualbox-boot2docker-url",
            ),
            Provider::VmwareFusion => (
                "--vmwarefusion-memory-size",
                "--vmwarefusion-cpu-count",
                "--vmwarefusion-disk-size",
                "--vmwarefusion-boot2docker-url",
            ),
        };

        let mut flags = Vec::new();
        if let Some(mb) = self.memory_mb {
            flags.extend([memory.to_string(), mb.to_string()]);
        }
        if let Some(n) = self.cpus {
            flags.extend([cpus.to_string(), n.to_string()]);
        }
        if let Some(mb) = self.disk_mb {
            flags.extend([disk.to_string(), mb.to_string()]);
        }
        if let Some(ref u) = self.boot2docker_url {
            flags.extend([url.to_string(), u.clone()]);
        }
        flags
    }
}
