//! Command: convert a channel export into a Puppet module.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::channel::ChannelExport;
use crate::cli::ConvertOpts;
use crate::config::{Config, PuppetSection};
use crate::exec::{Executor, SystemExecutor};
use crate::logging::Logger;
use crate::scaffold;
use crate::store::ArtifactStore;
use crate::tags::TagMapper;

/// Run the convert command against the real system.
///
/// # Errors
///
/// Returns an error if configuration or the channel export cannot be loaded,
/// an artifact is invalid, scaffolding fails, or the export fails.
pub fn run(opts: &ConvertOpts, log: &Logger) -> Result<()> {
    let cwd = std::env::current_dir().context("resolving current directory")?;
    run_with(opts, log, &SystemExecutor, &cwd).map(|_| ())
}

/// Run the convert command with an explicit executor and base directory for
/// relative defaults. Returns the finished module's location.
///
/// # Errors
///
/// See [`run`].
pub fn run_with(
    opts: &ConvertOpts,
    log: &Logger,
    executor: &dyn Executor,
    cwd: &Path,
) -> Result<PathBuf> {
    let version = option_env!("PUPPETIZE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.debug(&format!("puppetize {version}"));

    log.stage("Loading configuration");
    let config = Config::load(&opts.config)?;
    log.debug(&format!("config: {}", opts.config.display()));
    let settings = apply_overrides(config.puppet, opts);
    let working_dir = settings.resolved_working_dir(cwd);
    let output_dir = settings.resolved_output_dir(cwd);
    let table = settings.mapping_table()?;
    log.info(&format!(
        "mapping: {} ({} entries, {:?} order)",
        settings
            .mapping
            .as_deref()
            .map_or_else(|| "built-in".to_string(), |p| p.display().to_string()),
        table.len(),
        table.order()
    ));

    log.stage("Reading channel");
    let channel = ChannelExport::load(&opts.channel)?;
    let names = channel.names()?;
    let module = names.module();
    let module_dir = working_dir.join(&module);
    log.begin(&channel.channel_name, &opts.channel, &module, &module_dir);
    log.info(&format!("{} channel entries", channel.files.len()));

    log.stage("Preparing module");
    if !opts.keep && scaffold::clean(&module_dir)? {
        log.info(&format!("removed {}", module_dir.display()));
    }
    let module_dir = scaffold::scaffold(
        settings.scaffold,
        &working_dir,
        &names,
        &settings.manifest,
        executor,
    )?;
    log.debug(&format!("module directory: {}", module_dir.display()));

    log.stage("Collecting artifacts");
    let mut store = ArtifactStore::new(TagMapper::new(table));
    for file in &channel.files {
        let Some(record_config) = file.to_config()? else {
            log.warn(&format!("skipping {}: unsupported type", file.path));
            continue;
        };
        if store.add(record_config)?.is_some() {
            log.warn(&format!("{} listed more than once; keeping the last entry", file.path));
        }
        log.debug(&format!("added {}", file.path));
    }
    log.info(&format!("{} artifacts", store.len()));

    log.stage("Exporting module");
    let report = store
        .export(&module_dir, &names.class, &settings.manifest, &settings.custom_parameters)
        .with_context(|| format!("exporting {module}"))?;
    for artifact in &report.artifacts {
        log.debug(&format!("{} {}", artifact.kind, artifact.path));
        log.record_artifact(&artifact.name, artifact.kind, &artifact.path);
    }
    log.info(&format!("patched {}", report.manifest.display()));

    let destination = scaffold::publish(&module_dir, &output_dir)?;
    if destination != module_dir {
        log.info(&format!("published to {}", destination.display()));
    }

    log.print_summary();
    Ok(destination)
}

/// Layer command-line options over the configured `[puppet]` settings.
#[must_use]
pub fn apply_overrides(mut settings: PuppetSection, opts: &ConvertOpts) -> PuppetSection {
    if let Some(mapping) = &opts.mapping {
        settings.mapping = Some(mapping.clone());
    }
    if let Some(dir) = &opts.working_dir {
        settings.working_dir = Some(dir.clone());
    }
    if let Some(dir) = &opts.output_dir {
        settings.output_dir = Some(dir.clone());
    }
    if !opts.params.is_empty() {
        settings.custom_parameters.clone_from(&opts.params);
    }
    if let Some(manifest) = &opts.manifest {
        settings.manifest.clone_from(manifest);
    }
    if let Some(mode) = opts.scaffold {
        settings.scaffold = mode;
    }
    if let Some(order) = opts.match_order {
        settings.match_order = order;
    }
    settings
}
