use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, CustomUserError, Text, validator::Validation};
use pocketkit_core::{
    CharClass, Config,
    password::{MAX_LENGTH, MIN_LENGTH},
};
use std::path::PathBuf;

use crate::{bmi::BmiCommand, password::PasswordCommand};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "pocketkit", version, about = "BMI calculator and password generator")]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calculate BMI and manage saved measurements.
    Bmi {
        #[command(subcommand)]
        command: BmiCommand,
    },

    /// Generate, score and save passwords.
    Password {
        #[command(subcommand)]
        command: PasswordCommand,
    },

    /// Interactively set default password rules and the data directory.
    Configure,

    /// Inspect the active configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the configuration and the resolved file locations.
    Show,
    /// Print the config file path.
    Path,
}

impl Cli {
    /// Only the commands that need the config file load it, so a broken
    /// file never blocks `config path`.
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Bmi { command } => command.run(),
            Command::Password { command } => command.run(),
            Command::Configure => configure(Config::load()?),
            Command::Config { action } => match action {
                ConfigAction::Show => show_config(&Config::load()?),
                ConfigAction::Path => {
                    println!("{}", Config::config_file_path()?.display());
                    Ok(())
                }
            },
        }
    }
}

fn configure(mut config: Config) -> Result<()> {
    let defaults = &mut config.password;

    defaults.length = CustomType::<usize>::new("Default password length:")
        .with_default(defaults.length)
        .with_help_message(&format!("between {MIN_LENGTH} and {MAX_LENGTH}"))
        .with_validator(|length: &usize| -> Result<Validation, CustomUserError> {
            if (MIN_LENGTH..=MAX_LENGTH).contains(length) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(
                    format!("Choose a length between {MIN_LENGTH} and {MAX_LENGTH}").into(),
                ))
            }
        })
        .prompt()?;

    for class in CharClass::all() {
        let enabled = Confirm::new(&format!("Include {class}?"))
            .with_default(defaults.is_enabled(*class))
            .prompt()?;
        defaults.set_enabled(*class, enabled);
    }

    defaults.exclude_similar = Confirm::new("Exclude similar characters (i, l, 1, L, o, 0, O)?")
        .with_default(defaults.exclude_similar)
        .prompt()?;
    defaults.exclude_ambiguous =
        Confirm::new("Exclude ambiguous characters ({ } [ ] ( ) / \\ ' \" ` ~ , ; : . < >)?")
            .with_default(defaults.exclude_ambiguous)
            .prompt()?;
    defaults.require_all_classes = Confirm::new("Require every selected character type?")
        .with_default(defaults.require_all_classes)
        .prompt()?;
    defaults.exclude = Text::new("Always exclude these characters:")
        .with_default(&defaults.exclude)
        .prompt()?;

    let current_dir = configured_data_dir(&config);
    let answer = Text::new("Data directory:")
        .with_default(&current_dir)
        .with_help_message("leave empty for the platform default")
        .prompt()?;
    config.data_dir = data_dir_answer(&answer);

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

/// The data dir stored in the file, ignoring any environment override.
fn configured_data_dir(config: &Config) -> String {
    config
        .data_dir
        .as_ref()
        .map(|dir| dir.display().to_string())
        .unwrap_or_default()
}

/// An empty answer keeps the platform default.
fn data_dir_answer(input: &str) -> Option<PathBuf> {
    let input = input.trim();
    (!input.is_empty()).then(|| PathBuf::from(input))
}

fn show_config(config: &Config) -> Result<()> {
    println!("# {}", Config::config_file_path()?.display());
    print!("{}", config.to_toml()?);
    println!();
    println!("# BMI history:    {}", config.bmi_history_path()?.display());
    println!("# Password vault: {}", config.vault_path()?.display());
    Ok(())
}
