use clap::{Parser, Subcommand, ValueEnum};
use ocra_core::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use ocra_core::navigation::parse_url;
use ocra_core::store::default_data_dir;
use ocra_core::{AppError, GenerationConfig, HttpConfig, Settings, UnitSystem};
use std::path::PathBuf;
use std::sync::LazyLock;
use url::Url;

static VERSION_INFO: LazyLock<String> = LazyLock::new(|| {
    let version = env!("CARGO_PKG_VERSION");

    // Use VERGEN_GIT_SHA for the commit hash (with safe slicing)
    let commit = option_env!("VERGEN_GIT_SHA")
        .map(|s| s.chars().take(7).collect::<String>())
        .unwrap_or_else(|| "unknown".to_string());

    let built = option_env!("VERGEN_BUILD_DATE").unwrap_or("unknown"); // YYYY-MM-DD
    let target = option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown");
    let rustc = option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown");

    format!("{version}\ncommit: {commit}\nbuilt: {built}\ntarget: {target}\nrustc: {rustc}")
});

pub fn version_info() -> &'static str {
    &VERSION_INFO
}

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "ocra")]
#[command(
    author,
    version = version_info(),
    about = "One Cookbook to Rule them All: your personal AI chef"
)]
#[command(after_help = "Examples:
  ocra search \"spaghetti carbonara\"
  ocra search \"pad thai\" --units metric --save
  ocra open \"https://ocra.app/?dish=Spaghetti%20Carbonara\"
  ocra shell
  ocra saved list

Settings file:
  ~/.config/ocra/config.toml (created on first run, overridden by flags and env)")]
pub struct Config {
    /// Google Gemini API key (required for searches)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "OCRA_MODEL")]
    pub model: Option<String>,

    /// Seconds to wait for a recipe before giving up
    #[arg(long, env = "OCRA_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Page URL that shareable links are built on
    #[arg(long, env = "OCRA_BASE_URL")]
    pub base_url: Option<String>,

    /// Directory holding saved recipes
    #[arg(long, env = "OCRA_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Custom path to the settings file
    #[arg(long, env = "OCRA_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Command that receives copied text on stdin (e.g. "wl-copy", "pbcopy").
    /// Copied text is printed when unset.
    #[arg(long, env = "OCRA_CLIPBOARD_CMD", value_name = "CMD")]
    pub clipboard_cmd: Option<String>,

    /// Unit system for ingredient quantities
    #[arg(short, long, global = true)]
    pub units: Option<UnitsArg>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a recipe for a dish
    #[command(after_help = "Examples:
  ocra search \"beef wellington\"
  ocra search \"banana bread\" --format page > banana-bread.md
  ocra search \"miso soup\" --copy --share")]
    Search {
        /// Dish name
        dish: String,
        /// How to print the recipe
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
        /// Add the recipe to the saved collection
        #[arg(long)]
        save: bool,
        /// Copy the recipe text to the clipboard
        #[arg(long)]
        copy: bool,
        /// Share the recipe link
        #[arg(long)]
        share: bool,
    },
    /// Reopen a shared recipe link
    #[command(after_help = "Example: ocra open \"https://ocra.app/?dish=Spaghetti%20Carbonara\"")]
    Open {
        /// Link containing a `dish` parameter
        url: String,
        /// How to print the recipe
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
    /// Interactive recipe page
    #[command(after_help = "Type a dish name to search. Commands:
  :save            toggle saved
  :units [SYSTEM]  switch or set imperial/metric
  :rate N          rate 1-5 stars
  :copy            copy recipe text
  :share           share the link
  :print           show the printable page
  :link            show the shareable link
  :back, :forward  move through history
  :saved           list saved recipes
  :quit            leave")]
    Shell,
    /// Manage saved recipes
    Saved {
        #[command(subcommand)]
        action: SavedCommand,
    },
}

/// Saved collection commands
#[derive(Subcommand, Debug)]
pub enum SavedCommand {
    /// List saved recipe names
    List,
    /// Print a saved recipe
    Show {
        /// Recipe name
        name: String,
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
    /// Remove a recipe from the collection
    Remove {
        /// Recipe name
        name: String,
    },
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text, as copied to the clipboard
    Text,
    /// Printable markdown page
    Page,
    /// Recipe JSON
    Json,
}

/// Unit system flag values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitsArg {
    Imperial,
    Metric,
}

impl From<UnitsArg> for UnitSystem {
    fn from(arg: UnitsArg) -> Self {
        match arg {
            UnitsArg::Imperial => UnitSystem::Imperial,
            UnitsArg::Metric => UnitSystem::Metric,
        }
    }
}

/// Effective settings after layering flags and env over the settings file
/// over built-in defaults.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub generation: GenerationConfig,
    pub base_url: Url,
    pub data_dir: PathBuf,
    pub units: UnitSystem,
}

impl Config {
    /// Layers this configuration over the settings file.
    pub fn resolve(&self, settings: Option<&Settings>) -> Result<ResolvedConfig, AppError> {
        let file = settings.cloned().unwrap_or_default();

        let model = self
            .model
            .clone()
            .or(file.model)
            .unwrap_or_else(|| GenerationConfig::default().model);
        let timeout_secs = self
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let generation = GenerationConfig {
            model,
            http: HttpConfig::default().with_timeout_secs(timeout_secs),
            ..Default::default()
        };

        let base_url = self
            .base_url
            .clone()
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_url(&base_url)?;

        let data_dir = self
            .data_dir
            .clone()
            .or(file.data_dir)
            .or_else(default_data_dir)
            .ok_or_else(|| {
                AppError::ConfigError(
                    "No data directory available. Set OCRA_DATA_DIR.".to_string(),
                )
            })?;

        let units = self
            .units
            .map(UnitSystem::from)
            .or(file.units)
            .unwrap_or_default();

        Ok(ResolvedConfig {
            generation,
            base_url,
            data_dir,
            units,
        })
    }
}
