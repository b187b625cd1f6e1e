//! CLI Argument Structures
//!
//! Command definitions and shared argument groups for the helping-hand binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use helping_hand_rs::SelectionMethod;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Batch object tools for 3D scenes
#[derive(Parser)]
#[command(name = "helping-hand")]
#[command(version = VERSION)]
#[command(about = "Select similar objects, link data, move and batch-rename scene objects")]
#[command(long_about = "
Run the Helping Hand object tools against a scene document (YAML or JSON).

Common Usage:

  # Select every object sharing the active object's base name
  helping-hand select-similar scene.yml --active Cube.001 --write

  # Select by identical mesh topology
  helping-hand select-similar scene.yml --method topology

  # Rename the selection to SM_Rock_01, SM_Rock_02, ...
  helping-hand rename scene.yml --base-name Rock --select Rock --select Rock.001 --write

  # Compare the installed version with a release tag
  helping-hand check-version --latest v0.3.0
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./.helping-hand.yml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select objects similar to the active one
    #[command(name = "select-similar")]
    SelectSimilar(SelectSimilarArgs),

    /// Batch rename the selected objects
    Rename(RenameArgs),

    /// Move the selected objects into a collection
    #[command(name = "move-to-collection")]
    MoveToCollection(MoveArgs),

    /// Link the selected objects' data to the active object's data
    #[command(name = "link-data")]
    LinkData(SceneArgs),

    /// Compare the installed version with a release tag
    #[command(name = "check-version")]
    CheckVersion(CheckVersionArgs),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Initialize a configuration file with defaults
    #[command(name = "init-config")]
    InitConfig(InitConfigArgs),

    /// Validate a configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

/// Scene document and selection overrides shared by every scene command
#[derive(Args, Debug, Clone)]
pub struct SceneArgs {
    /// Scene document (.yml/.yaml/.json)
    #[arg(value_name = "SCENE")]
    pub scene: PathBuf,

    /// Make the named object active
    #[arg(long)]
    pub active: Option<String>,

    /// Replace the selection with these objects (repeatable)
    #[arg(long = "select", value_name = "NAME")]
    pub select: Vec<String>,

    /// Save the modified scene back to SCENE
    #[arg(short, long, conflicts_with = "output")]
    pub write: bool,

    /// Save the modified scene to another file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct SelectSimilarArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Similarity criterion
    #[arg(short, long, value_enum)]
    pub method: Option<MethodArg>,

    /// Match base names with case intact
    #[arg(long)]
    pub case_sensitive: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RenameArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Text added to the beginning of every name
    #[arg(long)]
    pub prefix: Option<String>,

    /// Main part of every name
    #[arg(long)]
    pub base_name: Option<String>,

    /// Number the first object receives
    #[arg(long)]
    pub start: Option<u32>,

    /// Digits in the numeric suffix (1-4)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub padding: Option<u8>,
}

#[derive(Args, Debug, Clone)]
pub struct MoveArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Target collection (defaults to collections.target from the config)
    #[arg(short, long)]
    pub target: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckVersionArgs {
    /// Latest published release tag, e.g. v0.3.0
    #[arg(long)]
    pub latest: String,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct InitConfigArgs {
    /// Output configuration file name
    #[arg(short, long, default_value = ".helping-hand.yml")]
    pub output: PathBuf,

    /// Overwrite existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Path to configuration file to validate
    #[arg(value_name = "CONFIG")]
    pub file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// Same base name once the numeric suffix is stripped
    Name,
    /// Same vertex, edge and face counts
    Topology,
}

impl From<MethodArg> for SelectionMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Name => SelectionMethod::ByName,
            MethodArg::Topology => SelectionMethod::ByTopology,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable format
    Text,
    /// JSON format output
    Json,
    /// YAML format output
    Yaml,
}
