//! Integration tests for lamina
//!
//! Every test points the binary at a throwaway store via --config, so the
//! real layer store and mount table are never touched. Mount and unmount
//! against the live system need root plus aufs and are only exercised on
//! their error paths.

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use serial_test::serial;
    use tempfile::TempDir;

    /// Throwaway config with layers/mounts dirs inside a tempdir
    fn temp_config() -> (TempDir, String) {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            format!(
                "[storage]\nlayers_dir = \"{}\"\nmounts_dir = \"{}\"\n",
                dir.path().join("layers").display(),
                dir.path().join("mounts").display(),
            ),
        )
        .unwrap();
        let config = config_path.to_str().unwrap().to_string();
        (dir, config)
    }

    fn lamina(config: &str) -> Command {
        let mut cmd = cargo_bin_cmd!("lamina");
        cmd.args(["--config", config]);
        cmd
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("lamina")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("copy-on-write"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("lamina")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("lamina"));
    }

    #[test]
    fn list_empty_store() {
        let (_dir, config) = temp_config();
        lamina(&config)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("No layers"));
    }

    #[test]
    fn create_root_then_list() {
        let (_dir, config) = temp_config();

        lamina(&config)
            .args(["create", "base"])
            .assert()
            .success()
            .stdout(predicate::str::contains("base"));

        lamina(&config)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("base"));
    }

    #[test]
    fn create_lineage_lists_forest_with_depth() {
        let (_dir, config) = temp_config();

        lamina(&config).args(["create", "base"]).assert().success();
        lamina(&config)
            .args(["create", "app", "--parent", "base"])
            .assert()
            .success();
        lamina(&config)
            .args(["create", "app-v2", "--parent", "app"])
            .assert()
            .success();

        lamina(&config)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("base\n  app\n    app-v2\n"));
    }

    #[test]
    fn create_duplicate_fails() {
        let (_dir, config) = temp_config();

        lamina(&config).args(["create", "base"]).assert().success();
        lamina(&config)
            .args(["create", "base"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn create_missing_parent_fails() {
        let (_dir, config) = temp_config();

        lamina(&config)
            .args(["create", "app", "--parent", "ghost"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no manifest"));

        // nothing half-created
        lamina(&config)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("No layers"));
    }

    #[test]
    fn delete_leaf_layer() {
        let (_dir, config) = temp_config();

        lamina(&config).args(["create", "base"]).assert().success();
        lamina(&config)
            .args(["delete", "base"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Deleted"));

        lamina(&config)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("No layers"));
    }

    #[test]
    fn delete_cascade_with_yes_removes_subtree() {
        let (_dir, config) = temp_config();

        lamina(&config).args(["create", "base"]).assert().success();
        lamina(&config)
            .args(["create", "app", "--parent", "base"])
            .assert()
            .success();
        lamina(&config)
            .args(["create", "app-v2", "--parent", "app"])
            .assert()
            .success();

        lamina(&config)
            .args(["delete", "--yes", "base"])
            .assert()
            .success();

        lamina(&config)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("No layers"));
    }

    #[test]
    fn delete_cascade_without_yes_aborts_non_interactive() {
        let (_dir, config) = temp_config();

        lamina(&config).args(["create", "base"]).assert().success();
        lamina(&config)
            .args(["create", "app", "--parent", "base"])
            .assert()
            .success();

        // no terminal attached, so the cascade confirmation declines
        lamina(&config)
            .args(["delete", "base"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("aborted"));

        lamina(&config)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("base"))
            .stdout(predicate::str::contains("app"));
    }

    #[test]
    fn delete_missing_layer_fails() {
        let (_dir, config) = temp_config();

        lamina(&config)
            .args(["delete", "ghost"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not found"));
    }

    #[test]
    fn mount_missing_layer_fails() {
        let (_dir, config) = temp_config();

        lamina(&config)
            .args(["mount", "ghost"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not found"));
    }

    #[test]
    #[serial]
    fn unmount_unmounted_layer_fails() {
        let (_dir, config) = temp_config();

        lamina(&config).args(["create", "base"]).assert().success();

        // without root this is RootRequired; with root the OS rejects the
        // unknown label; either way the command fails
        lamina(&config)
            .args(["unmount", "base"])
            .assert()
            .failure();
    }

    #[test]
    fn run_requires_command() {
        let (_dir, config) = temp_config();

        lamina(&config).args(["run", "base"]).assert().failure();
    }

    #[test]
    fn run_missing_layer_fails() {
        let (_dir, config) = temp_config();

        lamina(&config)
            .args(["run", "ghost", "--", "true"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not found"));
    }
}
