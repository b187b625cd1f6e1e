//! Command Execution Logic
//!
//! Each scene command loads a scene document, applies the selection overrides,
//! runs one engine operation, reports it and optionally saves the scene.

use anyhow::Context;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::cli::args::*;
use crate::cli::config_layer::{
    load_configuration, CollectionOverrides, ConfigMerge, FromCliArgs, RenameOverrides,
    SelectionOverrides,
};
use crate::cli::output::*;
use helping_hand_rs::{HelpingHandConfig, HelpingHandEngine, InMemoryScene, ObjectRepository};

/// Load the scene and apply `--active` / `--select` overrides
fn open_scene(args: &SceneArgs) -> anyhow::Result<InMemoryScene> {
    let mut scene = InMemoryScene::from_file(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;

    if let Some(active) = &args.active {
        let id = scene.require(active)?;
        scene.set_active(Some(id));
    }
    if !args.select.is_empty() {
        let ids = args
            .select
            .iter()
            .map(|name| scene.require(name))
            .collect::<helping_hand_rs::Result<Vec<_>>>()?;
        scene.deselect_all();
        scene.select_objects(&ids);
    }
    Ok(scene)
}

/// Persist the scene when `--write` or `--output` asked for it
fn save_scene(args: &SceneArgs, scene: &InMemoryScene) -> anyhow::Result<()> {
    let destination = if let Some(output) = &args.output {
        output.as_path()
    } else if args.write {
        args.scene.as_path()
    } else {
        return Ok(());
    };

    scene
        .to_file(destination)
        .with_context(|| format!("Failed to save scene {}", destination.display()))?;
    info!("Saved scene to {}", destination.display());
    Ok(())
}

fn emit<T: Serialize>(report: &T, format: OutputFormat, print_text: impl FnOnce(&T)) -> anyhow::Result<()> {
    match render_structured(report, format)? {
        Some(rendered) => println!("{rendered}"),
        None => print_text(report),
    }
    Ok(())
}

pub fn select_similar_command(args: SelectSimilarArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = load_configuration(config_path)?;
    config
        .selection
        .merge_with(SelectionOverrides::from_cli_args(&args));

    let mut scene = open_scene(&args.scene)?;
    let mut engine = HelpingHandEngine::new(config)?;
    let report = engine.select_similar(&mut scene)?;

    emit(&report, args.scene.format, print_selection)?;
    save_scene(&args.scene, &scene)
}

pub fn rename_command(args: RenameArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = load_configuration(config_path)?;
    config.rename.merge_with(RenameOverrides::from_cli_args(&args));

    let mut scene = open_scene(&args.scene)?;
    let mut engine = HelpingHandEngine::new(config)?;
    let report = engine.batch_rename(&mut scene)?;

    emit(&report, args.scene.format, print_rename)?;
    save_scene(&args.scene, &scene)
}

pub fn move_to_collection_command(args: MoveArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = load_configuration(config_path)?;
    config
        .collections
        .merge_with(CollectionOverrides::from_cli_args(&args));

    let mut scene = open_scene(&args.scene)?;
    let mut engine = HelpingHandEngine::new(config)?;
    let report = engine.move_to_collection(&mut scene, None)?;

    emit(&report, args.scene.format, print_move)?;
    save_scene(&args.scene, &scene)
}

pub fn link_data_command(args: SceneArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_configuration(config_path)?;

    let mut scene = open_scene(&args)?;
    let mut engine = HelpingHandEngine::new(config)?;
    let report = engine.link_data(&mut scene)?;

    emit(&report, args.format, print_link)?;
    save_scene(&args, &scene)
}

pub fn check_version_command(args: CheckVersionArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_configuration(config_path)?;
    let releases_url = config.updates.releases_url.clone();
    let engine = HelpingHandEngine::new(config)?;
    let status = engine.check_release(&args.latest)?;

    emit(&status, args.format, |status| {
        print_update_status(status, &releases_url);
    })
}

/// Print default configuration
pub fn print_default_config() -> anyhow::Result<()> {
    println!("{}", "# Default helping-hand configuration".dimmed());
    println!("{}", "# Save this to a file and customize as needed".dimmed());
    println!("{}", "# Usage: helping-hand --config your-config.yml <command>".dimmed());
    println!();

    let yaml_output = serde_yaml::to_string(&HelpingHandConfig::default())?;
    println!("{yaml_output}");
    Ok(())
}

/// Initialize a configuration file with defaults
pub fn init_config(args: InitConfigArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "Configuration file already exists: {} (use --force to overwrite)",
            args.output.display()
        );
    }

    HelpingHandConfig::default().to_yaml_file(&args.output)?;
    println!(
        "{} {}",
        "✅ Configuration saved to:".bright_green().bold(),
        args.output.display().to_string().cyan()
    );
    Ok(())
}

/// Validate a configuration file
pub fn validate_config(args: ValidateConfigArgs) -> anyhow::Result<()> {
    println!(
        "{} {}",
        "🔍 Validating configuration:".bright_blue().bold(),
        args.file.display().to_string().cyan()
    );

    let config = HelpingHandConfig::from_yaml_file(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;

    println!("{}", "✅ Configuration file is valid!".bright_green().bold());
    println!("   Selection method: {}", config.selection.method);
    println!(
        "   Rename format:    {}{}_{}",
        config.rename.prefix,
        config.rename.base_name,
        "N".repeat(config.rename.padding)
    );
    if let Some(target) = &config.collections.target {
        println!("   Target collection: {target}");
    }
    Ok(())
}
