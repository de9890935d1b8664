use std::path::Path;

use facet::Facet;

use crate::error::DinghyError;
use crate::nfs::DEFAULT_NFS_PORT;
use crate::provider::{CreateOptions, Provider};

#[derive(Debug, Clone, Default, Facet)]
#[facet(default)]
pub struct Preferences {
    #[facet(default)]
    pub create: CreateConfig,
    #[facet(default)]
    pub mount: MountConfig,
    #[facet(default)]
    pub tools: ToolsConfig,
}

/// Defaults for `dinghy create`; CLI flags take precedence.
#[derive(Debug, Clone, Facet)]
#[facet(default)]
pub struct CreateConfig {
    #[facet(default = "virtualbox")]
    pub provider: String,
    pub memory_mb: Option<u32>,
    pub cpus: Option<u32>,
    pub disk_mb: Option<u32>,
    pub boot2docker_url: Option<String>,
}

impl Default for CreateConfig {
    fn default() -> Self {
        Self {
            provider: "virtualbox".into(),
            memory_mb: None,
            cpus: None,
            disk_mb: None,
            boot2docker_url: None,
        }
    }
}

impl CreateConfig {
    pub fn options(&self) -> CreateOptions {
        CreateOptions {
            memory_mb: self.memory_mb,
            cpus: self.cpus,
            disk_mb: self.disk_mb,
            boot2docker_url: self.boot2docker_url.clone(),
        }
    }
}

/// NFS export parameters. Empty dirs are resolved by `NfsExport::from_config`.
#[derive(Debug, Clone, Facet)]
#[facet(default)]
pub struct MountConfig {
    #[facet(default)]
    pub host_dir: String,
    #[facet(default)]
    pub guest_dir: String,
    #[facet(default = 19321)]
    pub port: u16,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            host_dir: String::new(),
            guest_dir: String::new(),
            port: DEFAULT_NFS_PORT,
        }
    }
}

/// External binaries dinghy shells out to.
#[derive(Debug, Clone, Facet)]
#[facet(default)]
pub struct ToolsConfig {
    #[facet(default = "docker-machine")]
    pub machine: String,
    #[facet(default = "VBoxManage")]
    pub vbox_manage: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            machine: "docker-machine".into(),
            vbox_manage: "VBoxManage".into(),
        }
    }
}

// ── validation ────────────────────────────────────────────

fn validate_preferences(prefs: &Preferences) -> Result<(), DinghyError> {
    Provider::translate(&prefs.create.provider)?;

    for (key, value) in [
        ("memory_mb", prefs.create.memory_mb),
        ("cpus", prefs.create.cpus),
        ("disk_mb", prefs.create.disk_mb),
    ] {
        if value == Some(0) {
            return Err(DinghyError::Validation {
                message: format!("create.{key} must be greater than 0"),
            });
        }
    }

    if prefs.mount.port == 0 {
        return Err(DinghyError::Validation {
            message: "mount.port must not be 0".into(),
        });
    }
    for (key, dir) in [
        ("host_dir", &prefs.mount.host_dir),
        ("guest_dir", &prefs.mount.guest_dir),
    ] {
        if !dir.is_empty() && !dir.starts_with('/') {
            return Err(DinghyError::Validation {
                message: format!("mount.{key} must be absolute (got '{dir}')"),
            });
        }
    }

    if prefs.tools.machine.trim().is_empty() || prefs.tools.vbox_manage.trim().is_empty() {
        return Err(DinghyError::Validation {
            message: "tool binaries must not be empty".into(),
        });
    }

    Ok(())
}

// ── public API ────────────────────────────────────────────

/// Load preferences from `path`. A missing file yields the defaults.
pub fn load_preferences(path: &Path) -> Result<Preferences, DinghyError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no preferences file, using defaults");
        return Ok(Preferences::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| DinghyError::ConfigLoad {
        path: path.display().to_string(),
        source,
    })?;

    parse_preferences(&contents, path)
}

fn parse_preferences(contents: &str, path: &Path) -> Result<Preferences, DinghyError> {
    let prefs: Preferences =
        facet_toml::from_str(contents).map_err(|e| DinghyError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    validate_preferences(&prefs)?;
    Ok(prefs)
}
