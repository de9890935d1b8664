use std::path::PathBuf;

/// The user's home directory, `/tmp` if it cannot be determined.
pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"))
}

/// Dinghy state directory: `~/.dinghy/`
pub fn dinghy_dir() -> PathBuf {
    home_dir().join(".dinghy")
}

/// Generated SSH client config: `~/.dinghy/ssh-config`
///
/// The fsevents_to_vm launchd plist hard-codes this path as well; moving it
/// here without updating the plist breaks file event forwarding.
pub fn ssh_config_path() -> PathBuf {
    dinghy_dir().join("ssh-config")
}

/// Default preferences file: `~/.dinghy/preferences.toml`
pub fn preferences_path() -> PathBuf {
    dinghy_dir().join("preferences.toml")
}

/// Debug log written by every invocation: `~/.dinghy/dinghy.log`
pub fn log_path() -> PathBuf {
    dinghy_dir().join("dinghy.log")
}
