use clap::Parser;
use eyre::{Context, Result, eyre};
use scriv_export::convert::{self, ConversionResult};
use scriv_export::project::{self, project_name};
use scriv_export::utils::ConvertConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Convert a Scrivener project into a Markdown vault.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The `.scriv` project directory to convert.
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Directory that becomes the vault root.
    /// Defaults to <output_root>/<project name> from config, else ./<project name>.
    #[arg(value_name = "TARGET_DIR")]
    target_dir: Option<PathBuf>,

    /// Path to a specific configuration file.
    /// Defaults to SOURCE/scriv-export.toml, then $XDG_CONFIG_HOME/scriv-export/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the conversion report as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Log every folder and document written.
    #[arg(short, long)]
    verbose: bool,

    /// Only log warnings and errors; no progress bar.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Deserialize, Default)]
struct FileConfig {
    output_root: Option<PathBuf>,
}

/// Shape of the JSON report.
#[derive(Serialize)]
struct Report<'a> {
    message: String,
    #[serde(flatten)]
    result: &'a ConversionResult,
}

/// File name of a config stored inside a project, next to its `.scrivx` index.
const PROJECT_CONFIG: &str = "scriv-export.toml";

impl FileConfig {
    /// Load the first config found: `--config`, then one kept inside the
    /// project, then the user's config directory. None at all is the default.
    fn load(explicit_path: Option<&Path>, source: &Path) -> Result<Self> {
        let path = match explicit_path {
            Some(p) if !p.is_file() => {
                return Err(eyre!("Config file not found: {}", p.display()));
            }
            Some(p) => Some(p.to_path_buf()),
            None => [
                Some(source.join(PROJECT_CONFIG)),
                dirs::config_dir().map(|d| d.join("scriv-export/config.toml")),
            ]
            .into_iter()
            .flatten()
            .find(|p| p.is_file()),
        };

        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(&path)
            .wrap_err_with(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .wrap_err_with(|| format!("Failed to parse config: {}", path.display()))
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    // 1. Load config file (CLI path > project > user config dir)
    let file_cfg = FileConfig::load(cli.config.as_deref(), &cli.source)?;

    // 2. The source must be an existing .scriv directory
    project::validate_source(&cli.source)
        .wrap_err_with(|| format!("Cannot convert {}", cli.source.display()))?;

    // 3. Resolve target_dir (CLI > Config > Default)
    let name = project_name(&cli.source);
    let target_dir = cli
        .target_dir
        .or_else(|| file_cfg.output_root.map(|root| root.join(&name)))
        .unwrap_or_else(|| PathBuf::from(&name));

    // 4. Run the conversion
    let config = ConvertConfig {
        source: cli.source,
        target_dir,
        quiet: cli.quiet || cli.json,
    };
    let result = convert::run(&config);

    // 5. Report
    if cli.json {
        let report = Report {
            message: result.summary(),
            result: &result,
        };
        let json = serde_json::to_string_pretty(&report).wrap_err("Failed to encode report")?;
        println!("{}", json);
    } else if !cli.quiet {
        eprintln!("{} -> {}", result.summary(), config.target_dir.display());
    }

    if result.success {
        Ok(())
    } else {
        Err(eyre!(result.summary()))
    }
}
