use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use pocketkit_core::{
    Config, PasswordPolicy, PasswordVault, SavedPasswordEntry,
    model::{TIMESTAMP_FORMAT, now},
    password::{generate_secure, score_strength},
};

#[derive(Debug, Subcommand)]
pub enum PasswordCommand {
    /// Generate a password from the configured rules and any overrides.
    Generate(GenerateArgs),

    /// Score an existing password.
    Strength {
        password: String,
    },

    /// Show every saved password.
    List,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Number of characters (8-32).
    #[arg(short, long)]
    length: Option<usize>,

    /// Leave out A-Z.
    #[arg(long)]
    no_upper: bool,

    /// Leave out a-z.
    #[arg(long)]
    no_lower: bool,

    /// Leave out 0-9.
    #[arg(long)]
    no_digits: bool,

    /// Leave out symbols.
    #[arg(long)]
    no_symbols: bool,

    /// Extra characters to leave out.
    #[arg(long, value_name = "CHARS")]
    exclude: Option<String>,

    /// Allow similar-looking characters (i, l, 1, L, o, 0, O).
    #[arg(long)]
    allow_similar: bool,

    /// Leave out brackets, quotes and other ambiguous punctuation.
    #[arg(long)]
    exclude_ambiguous: bool,

    /// Do not insist on one character from every selected type.
    #[arg(long)]
    no_require_all: bool,

    /// Save the password for this website or app.
    #[arg(long, value_name = "WEBSITE", requires = "username")]
    save: Option<String>,

    /// Username or email stored with --save.
    #[arg(long)]
    username: Option<String>,

    /// Notes stored with --save.
    #[arg(long, default_value = "")]
    notes: String,
}

impl GenerateArgs {
    /// Flags only ever tighten or relax the configured defaults.
    fn policy(&self, defaults: &PasswordPolicy) -> PasswordPolicy {
        let mut policy = defaults.clone();

        if let Some(length) = self.length {
            policy.length = length;
        }
        policy.uppercase &= !self.no_upper;
        policy.lowercase &= !self.no_lower;
        policy.digits &= !self.no_digits;
        policy.symbols &= !self.no_symbols;
        if let Some(exclude) = &self.exclude {
            policy.exclude.push_str(exclude);
        }
        policy.exclude_similar &= !self.allow_similar;
        policy.exclude_ambiguous |= self.exclude_ambiguous;
        policy.require_all_classes &= !self.no_require_all;

        policy
    }
}

impl PasswordCommand {
    pub fn run(self) -> Result<()> {
        match self {
            PasswordCommand::Generate(args) => generate(args, &Config::load()?),
            PasswordCommand::Strength { password } => {
                println!("Strength: {}", score_strength(&password));
                Ok(())
            }
            PasswordCommand::List => list(&Config::load()?),
        }
    }
}

fn open_vault(config: &Config) -> Result<PasswordVault> {
    let path = config.vault_path()?;
    PasswordVault::open(&path).context("Could not load saved passwords")
}

fn generate(args: GenerateArgs, config: &Config) -> Result<()> {
    let policy = args.policy(&config.password);
    let generated = generate_secure(&policy)?;

    if let Some(warning) = generated.warning() {
        eprintln!("Warning: {warning}");
    }

    let password = generated.password();
    println!("Password: {password}");
    println!("Strength: {}", score_strength(password));

    if let Some(website) = &args.save {
        let Some(username) = &args.username else {
            bail!("--username is required with --save");
        };

        let entry = SavedPasswordEntry::new(website, username, password, &args.notes, now())?;
        let website = entry.website.clone();

        let mut vault = open_vault(config)?;
        vault.add(entry)?;
        println!("Password for {website} saved successfully!");
    }

    Ok(())
}

fn list(config: &Config) -> Result<()> {
    let vault = open_vault(config)?;
    if vault.is_empty() {
        println!("No saved passwords found!");
        return Ok(());
    }

    for (i, entry) in vault.entries().iter().enumerate() {
        println!("Entry #{}", i + 1);
        println!("Website/App: {}", entry.website);
        println!("Username: {}", entry.username);
        println!("Password: {}", entry.password);
        println!("Length: {} | Strength: {}", entry.length, entry.strength);
        if !entry.notes.is_empty() {
            println!("Notes: {}", entry.notes);
        }
        println!("Created: {}", entry.created_at.format(TIMESTAMP_FORMAT));
        println!("{}\n", "-".repeat(50));
    }

    Ok(())
}
