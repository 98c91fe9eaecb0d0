// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn store() -> (TempDir, Store) {
    let dir = TempDir::new().unwrap();
    let store = Store::at(dir.path().join("home"));
    (dir, store)
}

#[test]
fn create_shim_writes_executable_script() {
    let (_dir, store) = store();
    let path = create_shim(&store, AgentKind::Claude).unwrap();
    assert_eq!(path.file_name().unwrap(), "claude");
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("#!/bin/sh"));
    assert!(content.contains("versions/claude/$version/node_modules/.bin/claude"));
    assert!(content.contains("HOME=\"$AGX_HOME/versions/claude/$version/home\""));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}

#[test]
fn cursor_shim_uses_cli_name() {
    let (_dir, store) = store();
    let path = create_shim(&store, AgentKind::Cursor).unwrap();
    assert_eq!(path.file_name().unwrap(), "cursor-agent");
    let content = std::fs::read_to_string(&path).unwrap();
    // Version lookup key is the agent id, not the cli name
    assert!(content.contains("agent=\"cursor:\""));
}

#[test]
fn remove_shim_is_idempotent() {
    let (_dir, store) = store();
    create_shim(&store, AgentKind::Claude).unwrap();
    remove_shim(&store, AgentKind::Claude).unwrap();
    remove_shim(&store, AgentKind::Claude).unwrap();
    assert!(!shim_path(&store, AgentKind::Claude).exists());
}

#[test]
fn shims_in_path_checks_path_var() {
    let (_dir, store) = store();
    // The temp shims dir can't be on this process's PATH
    assert!(!shims_in_path(&store));
}

#[yare::parameterized(
    bash = { Shell::Bash, ".bashrc" },
    zsh = { Shell::Zsh, ".zshrc" },
    fish = { Shell::Fish, "fish_add_path" },
)]
fn instructions_name_the_shell_config(shell: Shell, marker: &str) {
    let (_dir, store) = store();
    let text = path_instructions(&store, shell);
    assert!(text.contains(marker));
    assert!(text.contains("shims"));
}

#[cfg(unix)]
#[test]
fn shim_resolves_project_pin_end_to_end() {
    use std::process::Command;

    let (_tmp, store) = store();
    store.ensure_layout().unwrap();
    create_shim(&store, AgentKind::Claude).unwrap();

    // Fake installed binary that reports its HOME
    let vdir = store.version_dir(AgentKind::Claude, "9.9.9");
    let bin_dir = vdir.join("node_modules/.bin");
    std::fs::create_dir_all(&bin_dir).unwrap();
    std::fs::create_dir_all(vdir.join("home")).unwrap();
    let bin = bin_dir.join("claude");
    std::fs::write(&bin, "#!/bin/sh\necho \"HOME=$HOME\"\n").unwrap();
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    // Project pinning 9.9.9
    let project = TempDir::new().unwrap();
    let agents = project.path().join(".agents");
    std::fs::create_dir_all(&agents).unwrap();
    std::fs::write(agents.join("agents.yaml"), "agents:\n  claude: 9.9.9\n").unwrap();

    let output = Command::new(shim_path(&store, AgentKind::Claude))
        .current_dir(project.path())
        .env("AGX_HOME", store.home())
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("versions/claude/9.9.9/home"), "{stdout}");
}

#[cfg(unix)]
#[test]
fn shim_fails_cleanly_without_version() {
    use std::process::Command;

    let (_tmp, store) = store();
    store.ensure_layout().unwrap();
    create_shim(&store, AgentKind::Claude).unwrap();

    let elsewhere = TempDir::new().unwrap();
    let output = Command::new(shim_path(&store, AgentKind::Claude))
        .current_dir(elsewhere.path())
        .env("AGX_HOME", store.home())
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no version selected"));
}
