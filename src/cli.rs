use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dinghy", about = "Manage the dinghy docker-machine VM")]
pub struct Cli {
    /// Path to preferences file (default: ~/.dinghy/preferences.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the VM (VirtualBox machines are also started)
    Create {
        /// virtualbox, vmware, vmware_fusion, vmwarefusion or vmware_desktop
        #[arg(long)]
        provider: Option<String>,

        /// Memory in MB
        #[arg(long)]
        memory: Option<u32>,

        /// Number of CPUs
        #[arg(long)]
        cpus: Option<u32>,

        /// Disk size in MB
        #[arg(long)]
        disk: Option<u32>,

        /// boot2docker ISO to provision from
        #[arg(long)]
        boot2docker_url: Option<String>,
    },

    /// Start the VM and regenerate its SSH config
    Up,

    /// Stop the VM
    Halt,

    /// Remove the VM
    Destroy {
        /// Skip docker-machine's confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Upgrade the VM's docker installation
    Upgrade,

    /// Show the VM status
    Status {
        /// Print status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the VM's IP address
    Ip,

    /// Print the SSH config for the VM
    SshConfig,

    /// SSH into the VM, or run a command in it
    Ssh {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Mount the host NFS export inside the VM
    Mount {
        /// Exported host directory (default: $HOME)
        #[arg(long)]
        host_dir: Option<String>,

        /// Mount point inside the VM (default: the host directory)
        #[arg(long)]
        guest_dir: Option<String>,

        /// NFS server port
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        port: Option<u16>,
    },
}
