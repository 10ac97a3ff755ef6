use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use inquire::{Confirm, CustomUserError, Select, Text, validator::Validation};
use pocketkit_core::{
    BmiHistory, BmiRecord, Config, Height, HeightUnit, Weight, WeightUnit,
    bmi::{BmiAssessment, BmiCategory, Measurement, Unit, assess},
    model::{TIMESTAMP_FORMAT, now},
};

const RULE: usize = 50;

#[derive(Debug, Subcommand)]
pub enum BmiCommand {
    /// Calculate BMI. Missing values are asked for interactively.
    Calc(CalcArgs),

    /// Show every saved record for a user.
    History {
        /// Name the records were saved under.
        name: String,
    },

    /// List users and record counts.
    Users,

    /// Compare a user's first and latest records.
    Trend {
        name: String,
    },

    /// Print the BMI classification table.
    Table,

    /// Delete all saved records.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
pub struct CalcArgs {
    /// Weight value, e.g. 70 or 154.5.
    #[arg(long)]
    weight: Option<String>,

    /// kg or lb (default kg when --weight is given).
    #[arg(long, value_name = "UNIT")]
    weight_unit: Option<WeightUnit>,

    /// Height value, e.g. 1.75, 175 or 5.9.
    #[arg(long)]
    height: Option<String>,

    /// m, cm or ft (default m when --height is given).
    #[arg(long, value_name = "UNIT")]
    height_unit: Option<HeightUnit>,

    /// Save the result to this user's history.
    #[arg(long, value_name = "NAME")]
    save: Option<String>,
}

impl BmiCommand {
    pub fn run(self) -> Result<()> {
        match self {
            BmiCommand::Calc(args) => calc(args),
            BmiCommand::History { name } => {
                let history = open_history()?;
                print_history(&history, &name);
                Ok(())
            }
            BmiCommand::Users => {
                let history = open_history()?;
                let stats = history.stats();
                println!("Users: {} | Records: {}", stats.users, stats.records);
                for user in history.users() {
                    println!("  {user} ({} records)", history.records(user).len());
                }
                Ok(())
            }
            BmiCommand::Trend { name } => {
                let history = open_history()?;
                print_trend(&history, &name)
            }
            BmiCommand::Table => {
                print_table();
                Ok(())
            }
            BmiCommand::Clear { yes } => clear(yes),
        }
    }
}

fn open_history() -> Result<BmiHistory> {
    let path = Config::load()?.bmi_history_path()?;
    BmiHistory::open(&path).context("Could not load BMI history")
}

fn calc(args: CalcArgs) -> Result<()> {
    let weight = match args.weight {
        Some(raw) => Weight::parse(&raw, args.weight_unit.unwrap_or(WeightUnit::Kg))?,
        None => {
            let unit = match args.weight_unit {
                Some(unit) => unit,
                None => Select::new("Select weight unit:", WeightUnit::all().to_vec()).prompt()?,
            };
            prompt_measurement(unit)?
        }
    };

    let height = match args.height {
        Some(raw) => Height::parse(&raw, args.height_unit.unwrap_or(HeightUnit::M))?,
        None => {
            let unit = match args.height_unit {
                Some(unit) => unit,
                None => Select::new("Select height unit:", HeightUnit::all().to_vec()).prompt()?,
            };
            prompt_measurement(unit)?
        }
    };

    let assessment = assess(&weight, &height)?;
    print_result(&weight, &height, &assessment);

    if let Some(name) = args.save {
        let mut history = open_history()?;
        let record = BmiRecord::new(&assessment, &weight, &height, now());
        history.add(&name, record)?;
        println!("\nBMI record saved for {}.", name.trim());
    }

    Ok(())
}

/// Ask until the input parses and is inside the unit's range.
fn prompt_measurement<U: Unit + 'static>(unit: U) -> Result<Measurement<U>> {
    let (min, max) = unit.range();
    let raw = Text::new(&format!("Enter your {} in {unit}:", U::KIND))
        .with_help_message(&format!("between {min} and {max}"))
        .with_validator(move |input: &str| -> Result<Validation, CustomUserError> {
            match Measurement::parse(input, unit) {
                Ok(_) => Ok(Validation::Valid),
                Err(err) => Ok(Validation::Invalid(err.to_string().into())),
            }
        })
        .prompt()?;

    Ok(Measurement::parse(&raw, unit)?)
}

fn print_result(weight: &Weight, height: &Height, assessment: &BmiAssessment) {
    println!("{}", "=".repeat(RULE));
    println!("{:^width$}", "BMI RESULTS", width = RULE);
    println!("{}", "=".repeat(RULE));
    println!("Weight:   {weight}");
    println!("Height:   {height}");
    println!("BMI:      {:.2}", assessment.bmi);
    println!("Category: {}", assessment.category);
    println!("{}", "=".repeat(RULE));
    println!();
    println!("Recommendation: {}", assessment.category.recommendation());
    println!();
    print_table();
}

fn print_table() {
    println!("BMI Classification Table:");
    println!("+-----------------+-------------------+");
    println!("| Category        | BMI Range         |");
    println!("+-----------------+-------------------+");
    for category in BmiCategory::all() {
        println!(
            "| {:<15} | {:<17} |",
            category.label(),
            category.range_label()
        );
    }
    println!("+-----------------+-------------------+");
}

fn print_history(history: &BmiHistory, name: &str) {
    let records = history.records(name);
    if records.is_empty() {
        println!("No records found for {}.", name.trim());
        return;
    }

    println!("BMI History for {}:\n", name.trim());
    for (i, record) in records.iter().enumerate() {
        let (weight, weight_unit) = record.display_weight();
        let (height, height_unit) = record.display_height();

        println!("Record #{}", i + 1);
        println!("   Date: {}", record.timestamp.format(TIMESTAMP_FORMAT));
        println!("   Weight: {weight:.2} {weight_unit}");
        println!("   Height: {height:.2} {height_unit}");
        println!("   BMI: {:.2}", record.bmi);
        println!("   Category: {}", record.category);
        println!("{}", "-".repeat(RULE));
    }
}

fn print_trend(history: &BmiHistory, name: &str) -> Result<()> {
    let trend = history.trend(name)?;

    println!("BMI trend for {} ({} records)", name.trim(), trend.records);
    println!(
        "   From:   {}  BMI {:.2} ({})",
        trend.since.format(TIMESTAMP_FORMAT),
        trend.first_bmi,
        trend.first_category
    );
    println!(
        "   To:     {}  BMI {:.2} ({})",
        trend.until.format(TIMESTAMP_FORMAT),
        trend.latest_bmi,
        trend.latest_category
    );
    println!("   Change: {:+.2} BMI, {:+.2} kg", trend.bmi_change, trend.weight_change_kg);
    println!("   Range:  {:.2} - {:.2}", trend.min_bmi, trend.max_bmi);
    Ok(())
}

/// Replaces the history file without reading it, so corrupt data can be cleared.
fn clear(yes: bool) -> Result<()> {
    let confirmed = yes
        || Confirm::new("Delete all BMI data? This action cannot be undone.")
            .with_default(false)
            .prompt()?;

    if !confirmed {
        println!("Nothing deleted.");
        return Ok(());
    }

    let path = Config::load()?.bmi_history_path()?;
    BmiHistory::reset(&path).context("Could not clear BMI history")?;
    println!("All BMI data has been cleared.");
    Ok(())
}
