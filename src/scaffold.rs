//! Prepare the module directory before export: remove stale output and make
//! sure the target manifest exists.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::exec::Executor;
use crate::naming::ModuleNames;
use crate::store::ArtifactStore;

/// Manifest that holds the module's main class.
pub const MAIN_MANIFEST: &str = "init";

/// Program used by [`ScaffoldMode::Puppet`].
pub const PUPPET_PROGRAM: &str = "puppet";

/// How the module skeleton is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScaffoldMode {
    /// Write a minimal manifest containing an empty class.
    #[default]
    Builtin,
    /// Run `puppet module generate` in the working directory.
    Puppet,
}

/// Remove `module_dir` if it exists. Returns whether anything was removed.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be removed.
pub fn clean(module_dir: &Path) -> Result<bool> {
    if !module_dir.exists() {
        return Ok(false);
    }
    std::fs::remove_dir_all(module_dir)
        .with_context(|| format!("removing {}", module_dir.display()))?;
    Ok(true)
}

/// Class declared by `manifest_name`: the main class for `init`, otherwise
/// the nested `<class>::<manifest>` class.
#[must_use]
pub fn class_for_manifest(class: &str, manifest_name: &str) -> String {
    if manifest_name == MAIN_MANIFEST {
        class.to_string()
    } else {
        format!("{class}::{manifest_name}")
    }
}

/// Create the module skeleton under `working_dir` and return the module
/// directory.
///
/// With [`ScaffoldMode::Puppet`] the external generator runs first. In both
/// modes a missing `manifests/<manifest_name>.pp` is then written as an empty
/// class; an existing manifest is left untouched.
///
/// # Errors
///
/// Returns an error if `puppet` is required but not on `PATH`, if the
/// generator fails, or if the skeleton cannot be written.
pub fn scaffold(
    mode: ScaffoldMode,
    working_dir: &Path,
    names: &ModuleNames,
    manifest_name: &str,
    executor: &dyn Executor,
) -> Result<PathBuf> {
    let module = names.module();
    let module_dir = working_dir.join(&module);

    if mode == ScaffoldMode::Puppet {
        if !executor.which(PUPPET_PROGRAM) {
            bail!("'{PUPPET_PROGRAM}' not found on PATH; use the builtin scaffold instead");
        }
        std::fs::create_dir_all(working_dir)
            .with_context(|| format!("creating {}", working_dir.display()))?;
        let generated = executor.run_in(
            working_dir,
            PUPPET_PROGRAM,
            &["module", "generate", &module, "--skip-interview"],
        )?;
        for line in generated.stdout.lines().filter(|l| !l.trim().is_empty()) {
            tracing::debug!("{PUPPET_PROGRAM}: {line}");
        }
    }

    let manifest = ArtifactStore::manifest_path(&module_dir, manifest_name);
    if !manifest.exists() {
        if let Some(parent) = manifest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let class = class_for_manifest(&names.class, manifest_name);
        std::fs::write(&manifest, format!("class {class} {{\n}}\n"))
            .with_context(|| format!("writing {}", manifest.display()))?;
    }
    Ok(module_dir)
}

/// Place the finished module in `output_dir`, replacing any previous copy.
///
/// Returns the module's final location; when `output_dir` is the directory
/// the module was built in, nothing is copied.
///
/// # Errors
///
/// Returns an error if the previous copy cannot be removed or the module
/// cannot be copied.
pub fn publish(module_dir: &Path, output_dir: &Path) -> Result<PathBuf> {
    let Some(name) = module_dir.file_name() else {
        bail!("module directory {} has no name", module_dir.display());
    };
    let destination = output_dir.join(name);
    if destination == module_dir {
        return Ok(destination);
    }
    clean(&destination)?;
    copy_tree(module_dir, &destination)?;
    Ok(destination)
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    std::fs::create_dir_all(to).with_context(|| format!("creating {}", to.display()))?;
    for entry in std::fs::read_dir(from).with_context(|| format!("reading {}", from.display()))? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)
                .with_context(|| format!("copying to {}", target.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::exec::ExecResult;
    use std::sync::Mutex;

    /// Records `run_in` invocations and optionally creates the generated
    /// manifest the way `puppet module generate` would.
    #[derive(Debug)]
    struct RecordingExecutor {
        which_result: bool,
        generate_class: Option<String>,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingExecutor {
        fn new(which_result: bool, generate_class: Option<&str>) -> Self {
            Self {
                which_result,
                generate_class: generate_class.map(str::to_string),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Executor for RecordingExecutor {
        fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{program} {}", args.join(" ")));
            if let (Some(class), Some(module)) = (&self.generate_class, args.get(2)) {
                let manifests = dir.join(module).join("manifests");
                std::fs::create_dir_all(&manifests)?;
                std::fs::write(
                    manifests.join("init.pp"),
                    format!("# generated\nclass {class} (\n) {{\n\n}}\n"),
                )?;
            }
            Ok(ExecResult {
                stdout: format!("Notice: Generating module at {}\n", dir.display()),
                stderr: String::new(),
                success: true,
                code: Some(0),
            })
        }

        fn which(&self, _: &str) -> bool {
            self.which_result
        }
    }

    fn names() -> ModuleNames {
        ModuleNames::derive("Acme", "motd").unwrap()
    }

    #[test]
    fn clean_removes_existing_module() {
        let dir = tempfile::tempdir().unwrap();
        let module = dir.path().join("acme-motd");
        std::fs::create_dir_all(module.join("files")).unwrap();
        assert!(clean(&module).unwrap());
        assert!(!module.exists());
    }

    #[test]
    fn clean_missing_module_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!clean(&dir.path().join("absent")).unwrap());
    }

    #[test]
    fn class_for_nested_manifest() {
        assert_eq!(class_for_manifest("motd", "init"), "motd");
        assert_eq!(class_for_manifest("motd", "config"), "motd::config");
    }

    #[test]
    fn builtin_writes_empty_class() {
        let dir = tempfile::tempdir().unwrap();
        let executor = RecordingExecutor::new(false, None);
        let module_dir = scaffold(ScaffoldMode::Builtin, dir.path(), &names(), "init", &executor)
            .unwrap();

        assert_eq!(module_dir, dir.path().join("acme-motd"));
        assert_eq!(
            std::fs::read_to_string(module_dir.join("manifests").join("init.pp")).unwrap(),
            "class motd {\n}\n"
        );
        assert!(executor.calls().is_empty());
    }

    #[test]
    fn builtin_keeps_existing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let manifests = dir.path().join("acme-motd").join("manifests");
        std::fs::create_dir_all(&manifests).unwrap();
        std::fs::write(manifests.join("init.pp"), "# mine\nclass motd {\n}\n").unwrap();

        scaffold(
            ScaffoldMode::Builtin,
            dir.path(),
            &names(),
            "init",
            &RecordingExecutor::new(false, None),
        )
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(manifests.join("init.pp")).unwrap(),
            "# mine\nclass motd {\n}\n"
        );
    }

    #[test]
    fn puppet_runs_generator_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let executor = RecordingExecutor::new(true, Some("motd"));
        let module_dir =
            scaffold(ScaffoldMode::Puppet, dir.path(), &names(), "init", &executor).unwrap();

        assert_eq!(
            executor.calls(),
            ["puppet module generate acme-motd --skip-interview"]
        );
        let manifest =
            std::fs::read_to_string(module_dir.join("manifests").join("init.pp")).unwrap();
        assert!(manifest.starts_with("# generated\n"));
    }

    #[test]
    fn publish_copies_module_tree() {
        let build = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let module = build.path().join("acme-motd");
        std::fs::create_dir_all(module.join("files")).unwrap();
        std::fs::write(module.join("files").join("_etc_motd"), "hi").unwrap();
        std::fs::create_dir_all(out.path().join("acme-motd").join("stale")).unwrap();

        let published = publish(&module, out.path()).unwrap();

        assert_eq!(published, out.path().join("acme-motd"));
        assert_eq!(
            std::fs::read_to_string(published.join("files").join("_etc_motd")).unwrap(),
            "hi"
        );
        assert!(!published.join("stale").exists());
        assert!(module.exists());
    }

    #[test]
    fn publish_in_place_is_noop() {
        let build = tempfile::tempdir().unwrap();
        let module = build.path().join("acme-motd");
        std::fs::create_dir_all(&module).unwrap();
        assert_eq!(publish(&module, build.path()).unwrap(), module);
        assert!(module.exists());
    }

    #[test]
    fn puppet_mode_requires_puppet_on_path() {
        let dir = tempfile::tempdir().unwrap();
        let executor = RecordingExecutor::new(false, None);
        let err = scaffold(ScaffoldMode::Puppet, dir.path(), &names(), "init", &executor)
            .unwrap_err();
        assert!(err.to_string().contains("not found on PATH"));
        assert!(executor.calls().is_empty());
    }
}
