use crate::config::MountConfig;
use crate::paths;

/// Port the host-side unfsd listens on for both mountd and nfsd.
pub const DEFAULT_NFS_PORT: u16 = 19321;

/// Where the host NFS export is mounted inside the VM.
///
/// The NFS server itself is managed outside this crate; this only describes
/// the export so the guest can mount it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfsExport {
    pub host_dir: String,
    pub guest_dir: String,
    pub port: u16,
}

impl NfsExport {
    /// Resolve empty directories in the mount preferences: the host dir
    /// defaults to `$HOME`, the guest dir to the host dir.
    pub fn from_config(config: &MountConfig) -> Self {
        let host_dir = if config.host_dir.is_empty() {
            paths::home_dir().display().to_string()
        } else {
            config.host_dir.clone()
        };
        let guest_dir = if config.guest_dir.is_empty() {
            host_dir.clone()
        } else {
            config.guest_dir.clone()
        };
        Self {
            host_dir,
            guest_dir,
            port: config.port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_dir_defaults_to_host_dir() {
        let export = NfsExport::from_config(&MountConfig {
            host_dir: "/Users/me".into(),
            guest_dir: String::new(),
            port: DEFAULT_NFS_PORT,
        });
        assert_eq!(export.guest_dir, "/Users/me");
        assert_eq!(export.port, 19321);
    }

    #[test]
    fn explicit_dirs_are_kept() {
        let export = NfsExport::from_config(&MountConfig {
            host_dir: "/Users/me/src".into(),
            guest_dir: "/src".into(),
            port: 2049,
        });
        assert_eq!(export.host_dir, "/Users/me/src");
        assert_eq!(export.guest_dir, "/src");
        assert_eq!(export.port, 2049);
    }
}
