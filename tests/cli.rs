use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

const INSPECT_JSON: &str = r#"{"DriverName":"virtualbox","Driver":{"IPAddress":"192.168.99.100","StorePath":"/store","MachineName":"dinghy"}}"#;

fn dinghy(home: &Path) -> assert_cmd::Command {
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("dinghy").into();
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

/// Write a fake docker-machine into `home` and point the preferences at it.
/// Every invocation's arguments are appended to `calls.log` next to it.
#[cfg(unix)]
fn install_fake_machine(home: &Path, created: bool) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let status = if created {
        "echo Running"
    } else {
        "echo 'Host does not exist: \"dinghy\"'; exit 1"
    };
    let script = format!(
        r#"#!/bin/sh
echo "$@" >> "{home}/calls.log"
case "$1" in
  status) {status} ;;
  inspect) echo '{INSPECT_JSON}' ;;
esac
exit 0
"#,
        home = home.display(),
    );

    let path = home.join("docker-machine");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

    let dinghy_dir = home.join(".dinghy");
    std::fs::create_dir_all(&dinghy_dir).unwrap();
    std::fs::write(
        dinghy_dir.join("preferences.toml"),
        format!(
            "[tools]\nmachine = \"{}\"\nvbox_manage = \"true\"\n",
            path.display()
        ),
    )
    .unwrap();
    path
}

fn calls(home: &Path) -> String {
    std::fs::read_to_string(home.join("calls.log")).unwrap_or_default()
}

#[test]
fn help_works() {
    let home = tempfile::tempdir().unwrap();
    dinghy(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage the dinghy docker-machine VM"));
}

#[test]
fn create_rejects_unknown_provider() {
    let home = tempfile::tempdir().unwrap();
    dinghy(home.path())
        .args(["create", "--provider", "parallels"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported provider"));
}

#[test]
fn invalid_preferences_show_error() {
    let home = tempfile::tempdir().unwrap();
    let prefs = home.path().join("prefs.toml");
    std::fs::write(&prefs, "[mount]\nport = 0\n").unwrap();

    dinghy(home.path())
        .args(["--config", prefs.to_str().unwrap(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("mount.port"));
}

#[cfg(unix)]
#[test]
fn status_absent_vm() {
    let home = tempfile::tempdir().unwrap();
    install_fake_machine(home.path(), false);

    dinghy(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("VM 'dinghy': not created"));
}

#[cfg(unix)]
#[test]
fn status_json() {
    let home = tempfile::tempdir().unwrap();
    install_fake_machine(home.path(), true);

    dinghy(home.path())
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("running").and(predicate::str::contains("created")));
}

#[cfg(unix)]
#[test]
fn ip_requires_created_vm() {
    let home = tempfile::tempdir().unwrap();
    install_fake_machine(home.path(), false);

    dinghy(home.path())
        .arg("ip")
        .assert()
        .failure()
        .stderr(predicate::str::contains("has not been created"));
    assert!(!calls(home.path()).contains("inspect"));
}

#[cfg(unix)]
#[test]
fn ip_prints_inspected_address() {
    let home = tempfile::tempdir().unwrap();
    install_fake_machine(home.path(), true);

    dinghy(home.path())
        .arg("ip")
        .assert()
        .success()
        .stdout("192.168.99.100\n");
}

#[cfg(unix)]
#[test]
fn up_writes_ssh_config() {
    let home = tempfile::tempdir().unwrap();
    install_fake_machine(home.path(), true);

    dinghy(home.path()).arg("up").assert().success();

    let config = std::fs::read_to_string(home.path().join(".dinghy/ssh-config")).unwrap();
    assert!(config.contains("HostName 192.168.99.100\n"));
    assert!(config.contains("IdentityFile /store/machines/dinghy/id_rsa\n"));
    assert!(calls(home.path()).contains("start dinghy"));
}

#[cfg(unix)]
#[test]
fn ssh_config_is_printed() {
    let home = tempfile::tempdir().unwrap();
    install_fake_machine(home.path(), true);

    dinghy(home.path())
        .arg("ssh-config")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Host dinghy\n"));
}

#[cfg(unix)]
#[test]
fn create_vmware_does_not_start_vm() {
    let home = tempfile::tempdir().unwrap();
    install_fake_machine(home.path(), false);

    dinghy(home.path())
        .args(["create", "--provider", "vmware_desktop", "--cpus", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dinghy up"));

    let calls = calls(home.path());
    assert!(calls.contains("create -d vmwarefusion --vmwarefusion-cpu-count 2 dinghy"));
    assert!(!calls.contains("start"));
}

#[cfg(unix)]
#[test]
fn create_virtualbox_configures_and_starts_vm() {
    let home = tempfile::tempdir().unwrap();
    install_fake_machine(home.path(), false);

    dinghy(home.path())
        .args(["create", "--provider", "virtualbox"])
        .assert()
        .success();

    let calls = calls(home.path());
    let create = calls.find("create -d virtualbox dinghy").unwrap();
    let stop = calls.find("stop dinghy").unwrap();
    let start = calls.find("start dinghy").unwrap();
    assert!(create < stop && stop < start);
    assert!(home.path().join(".dinghy/ssh-config").exists());
}

#[cfg(unix)]
#[test]
fn destroy_force_passes_flag() {
    let home = tempfile::tempdir().unwrap();
    install_fake_machine(home.path(), true);

    dinghy(home.path())
        .args(["destroy", "--force"])
        .assert()
        .success();
    assert!(calls(home.path()).contains("rm --force dinghy"));
}

#[cfg(unix)]
#[test]
fn ssh_runs_remote_command() {
    let home = tempfile::tempdir().unwrap();
    install_fake_machine(home.path(), true);

    dinghy(home.path())
        .args(["ssh", "docker", "ps", "-a"])
        .assert()
        .success();
    assert!(calls(home.path()).contains("ssh dinghy -- docker ps -a"));
}

#[cfg(unix)]
#[test]
fn mount_uses_host_ip_and_port() {
    let home = tempfile::tempdir().unwrap();
    install_fake_machine(home.path(), true);

    dinghy(home.path())
        .args(["mount", "--host-dir", "/Users/me", "--port", "2049"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mounting NFS /Users/me"));

    let calls = calls(home.path());
    assert!(calls.contains("sudo umount /Users || true"));
    assert!(calls.contains(
        "sudo mount -t nfs 192.168.99.1:/Users/me /Users/me \
         -o nfsvers=3,udp,mountport=2049,port=2049,nolock,hard,intr"
    ));
}
