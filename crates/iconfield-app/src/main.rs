//! Headless iconfield shell.
//!
//! - `layout` - lay out a list of uris and print the icon positions
//! - `decode` - print the items of an icon list selection payload
//! - `config` - print or write the container configuration

mod shell;

use clap::{Parser, Subcommand, ValueEnum};
use iconfield_core::config::{CONFIG_FILE_NAME, default_config_path};
use iconfield_core::{ConfigError, ContainerConfig, ContainerError, LabelPosition, LayoutMode, wire};
use kurbo::Size;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error("Failed to read {0}: {1}")]
    Read(String, std::io::Error),
    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Parser)]
#[command(name = "iconfield")]
#[command(about = "Lay out and inspect icon fields")]
struct Cli {
    /// Configuration file (defaults to the user configuration directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out uris and print their positions as JSON
    Layout {
        /// Uris of the icons
        #[arg(required = true)]
        uris: Vec<String>,
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
        /// Directory the icons live in
        #[arg(long)]
        directory: Option<String>,
        #[arg(long, value_enum)]
        mode: Option<Mode>,
        /// Labels beside the images instead of under them
        #[arg(long)]
        beside: bool,
        /// Use the desktop layout
        #[arg(long)]
        desktop: bool,
        /// Keep positions instead of flowing icons
        #[arg(long)]
        manual: bool,
    },
    /// Decode an icon list payload from a file, or stdin with `-`
    Decode { input: PathBuf },
    /// Print the configuration, or write the defaults with --init
    Config {
        #[arg(long)]
        init: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    LeftRight,
    RightLeft,
    TopBottom,
    TopBottomRightLeft,
}

impl From<Mode> for LayoutMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::LeftRight => LayoutMode::LeftRightTopBottom,
            Mode::RightLeft => LayoutMode::RightLeftTopBottom,
            Mode::TopBottom => LayoutMode::TopBottomLeftRight,
            Mode::TopBottomRightLeft => LayoutMode::TopBottomRightLeft,
        }
    }
}

fn config_path(explicit: Option<&Path>) -> Result<PathBuf, AppError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(default_config_path()?),
    }
}

fn load_config(explicit: Option<&Path>) -> Result<ContainerConfig, AppError> {
    match explicit {
        Some(path) => Ok(ContainerConfig::load(path)?),
        None => match default_config_path() {
            Ok(path) => Ok(ContainerConfig::load_or_default(&path)?),
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Ok(ContainerConfig::default())
            }
        },
    }
}

fn read_input(input: &Path) -> Result<Vec<u8>, AppError> {
    if input == Path::new("-") {
        let mut data = Vec::new();
        std::io::stdin()
            .read_to_end(&mut data)
            .map_err(|e| AppError::Read("stdin".to_string(), e))?;
        Ok(data)
    } else {
        fs::read(input).map_err(|e| AppError::Read(input.display().to_string(), e))
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let explicit = cli.config.as_deref();
    match cli.command {
        Commands::Layout {
            uris,
            width,
            height,
            directory,
            mode,
            beside,
            desktop,
            manual,
        } => {
            let mut config = if desktop {
                ContainerConfig::desktop()
            } else {
                load_config(explicit)?
            };
            if let Some(mode) = mode {
                config.layout_mode = mode.into();
            }
            if beside {
                config.label_position = LabelPosition::Beside;
            }
            if manual {
                config.auto_layout = false;
            }
            let placed = shell::lay_out(&config, Size::new(width, height), directory, &uris)?;
            println!("{}", serde_json::to_string_pretty(&placed)?);
        }
        Commands::Decode { input } => {
            let data = read_input(&input)?;
            let items = wire::decode(&data);
            log::info!("Decoded {} items", items.len());
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        Commands::Config { init } => {
            if init {
                let path = config_path(explicit)?;
                ContainerConfig::default().save(&path)?;
                log::info!("Wrote {}", path.display());
                println!("{}", path.display());
            } else {
                let config = load_config(explicit)?;
                println!("{}", config.to_json()?);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::debug!("Starting iconfield ({})", CONFIG_FILE_NAME);

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("iconfield: {}", e);
            ExitCode::FAILURE
        }
    }
}
