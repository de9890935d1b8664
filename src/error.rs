use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum DinghyError {
    #[error("failed to load preferences from {path}")]
    ConfigLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse preferences from {path}: {message}")]
    ConfigParse { path: String, message: String },

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("unsupported provider '{name}'")]
    #[diagnostic(help("use one of: virtualbox, vmware, vmware_fusion, vmwarefusion, vmware_desktop"))]
    UnsupportedProvider { name: String },

    /// docker-machine (or VBoxManage) exited nonzero while creating,
    /// starting or configuring the VM. `stderr` is what the tool printed.
    #[error("{message}")]
    Provisioning { message: String, stderr: String },

    #[error("error executing command: {command} (exit status {exit_status})")]
    CommandFailed { command: String, exit_status: i32 },

    #[error("failed to inspect VM '{name}': {message}")]
    Inspection { name: String, message: String },

    #[error("VM '{name}' has not been created")]
    #[diagnostic(help("run `dinghy create` first"))]
    NotCreated { name: String },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}
