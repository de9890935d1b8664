use clap::Parser;

use dinghy::cli::{Cli, Command};
use dinghy::config::{self, MountConfig};
use dinghy::error::DinghyError;
use dinghy::logging;
use dinghy::machine::{MACHINE_NAME, Machine, MachineState};
use dinghy::nfs::NfsExport;
use dinghy::paths;
use dinghy::process::{ProcessRunner, Runner};
use dinghy::provider::{CreateOptions, Provider};

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, &paths::log_path());

    let prefs_path = cli.config.clone().unwrap_or_else(paths::preferences_path);
    let prefs = config::load_preferences(&prefs_path)?;

    let machine = Machine::new(ProcessRunner, prefs.tools.clone(), paths::ssh_config_path());

    match cli.command {
        Command::Create {
            provider,
            memory,
            cpus,
            disk,
            boot2docker_url,
        } => {
            let provider_name = provider.unwrap_or_else(|| prefs.create.provider.clone());
            let provider = Provider::translate(&provider_name)?;
            let defaults = prefs.create.options();
            let options = CreateOptions {
                memory_mb: memory.or(defaults.memory_mb),
                cpus: cpus.or(defaults.cpus),
                disk_mb: disk.or(defaults.disk_mb),
                boot2docker_url: boot2docker_url.or(defaults.boot2docker_url),
            };

            if machine.created().await? {
                println!("The {MACHINE_NAME} VM already exists.");
                return Ok(());
            }

            println!("Creating the {MACHINE_NAME} VM ({provider})...");
            machine.create(provider, &options).await?;
            if provider != Provider::VirtualBox {
                println!("VM created. Run `dinghy up` to start it.");
            }
        }
        Command::Up => {
            require_created(&machine).await?;
            println!("Starting the {MACHINE_NAME} VM...");
            machine.up().await?;
            println!(
                "SSH config written to {}",
                machine.ssh_config_path().display()
            );
        }
        Command::Halt => {
            println!("Stopping the {MACHINE_NAME} VM...");
            machine.halt().await;
        }
        Command::Destroy { force } => machine.destroy(force).await,
        Command::Upgrade => machine.upgrade().await,
        Command::Status { json } => {
            let state = machine.state().await?;
            if json {
                println!(
                    "{}",
                    facet_json::to_string(&StatusJson {
                        name: MACHINE_NAME.to_string(),
                        status: state.as_status().to_string(),
                        created: state != MachineState::Absent,
                    })
                    .expect("JSON serialization"),
                );
            } else {
                println!("VM '{MACHINE_NAME}': {}", state.as_status());
            }
        }
        Command::Ip => {
            require_created(&machine).await?;
            println!("{}", machine.ip_address().await?);
        }
        Command::SshConfig => {
            require_created(&machine).await?;
            print!("{}", machine.ssh_config().await?);
        }
        Command::Ssh { command } => {
            require_created(&machine).await?;
            if command.is_empty() {
                match machine.ssh_interactive()? {}
            }
            machine.ssh(&command).await?;
        }
        Command::Mount {
            host_dir,
            guest_dir,
            port,
        } => {
            require_created(&machine).await?;
            let mount = MountConfig {
                host_dir: host_dir.unwrap_or_else(|| prefs.mount.host_dir.clone()),
                guest_dir: guest_dir.unwrap_or_else(|| prefs.mount.guest_dir.clone()),
                port: port.unwrap_or(prefs.mount.port),
            };
            machine.mount(&NfsExport::from_config(&mount)).await?;
        }
    }

    Ok(())
}

/// Inspection fails for an absent VM, so rule that out first.
async fn require_created<R: Runner>(machine: &Machine<R>) -> Result<(), DinghyError> {
    if machine.created().await? {
        Ok(())
    } else {
        Err(DinghyError::NotCreated {
            name: machine.name().to_string(),
        })
    }
}

// ── JSON output structs ─────────────────────────────────────────────

#[derive(facet::Facet)]
struct StatusJson {
    name: String,
    status: String,
    created: bool,
}
