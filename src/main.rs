use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use expense_tracker::{
    append_expense, append_expenses, collect_expense, init_workbook, load_csv, summarize,
    Settings,
};

/// Log an expense to a spreadsheet and see how much is left to spend this month
#[derive(Parser, Debug)]
#[command(name = "expense-tracker", version)]
struct Args {
    /// Spreadsheet holding the expenses
    #[arg(short, long, env = "EXPENSE_FILE")]
    file: Option<PathBuf>,

    /// Monthly budget
    #[arg(short, long, env = "EXPENSE_BUDGET")]
    budget: Option<f64>,

    /// JSON settings file ({"file": ..., "budget": ...})
    #[arg(short, long, env = "EXPENSE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prompt for one expense, append it and summarize (default)
    Add,

    /// Summarize the expenses already recorded
    Summary {
        /// Print the summary as JSON instead of the report
        #[arg(long)]
        json: bool,
    },

    /// Create the spreadsheet with its header row
    Init {
        /// Overwrite an existing spreadsheet
        #[arg(long)]
        force: bool,
    },

    /// Append every expense from a CSV file (name,amount,category), then summarize
    Import {
        csv: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref())?.with_overrides(args.file, args.budget);

    match args.command.unwrap_or(Command::Add) {
        Command::Add => run_add(&settings)?,
        Command::Summary { json } => run_summary(&settings, json)?,
        Command::Init { force } => run_init(&settings, force)?,
        Command::Import { csv } => run_import(&settings, &csv)?,
    }

    Ok(())
}

fn run_add(settings: &Settings) -> Result<()> {
    println!("🎯 Running Expense Tracker!");

    // 1. Get user input for expense
    let stdin = io::stdin();
    let expense = collect_expense(stdin.lock(), io::stdout())?;

    // 2. Write it to the spreadsheet
    println!(
        "🎯 Saving User Expense: {}, {:?}, {} to {}",
        expense.name,
        expense.amount,
        expense.category,
        settings.file.display()
    );
    append_expense(&settings.file, &expense)?;

    // 3. Read the file back and summarize
    print_summary(settings)?;
    Ok(())
}

fn run_summary(settings: &Settings, json: bool) -> Result<()> {
    if json {
        let summary = summarize(&settings.file, settings.budget, Local::now().date_naive())?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(settings)?;
    }
    Ok(())
}

fn run_init(settings: &Settings, force: bool) -> Result<()> {
    init_workbook(&settings.file, force)?;
    println!("✓ Created {}", settings.file.display());
    Ok(())
}

fn run_import(settings: &Settings, csv: &Path) -> Result<()> {
    println!("📂 Loading CSV...");
    let expenses = load_csv(csv)?;
    println!("✓ Loaded {} expenses from {}", expenses.len(), csv.display());

    let rows = append_expenses(&settings.file, &expenses)?;
    println!("✓ {} now holds {} rows", settings.file.display(), rows);

    print_summary(settings)?;
    Ok(())
}

fn print_summary(settings: &Settings) -> Result<()> {
    println!("🎯 Summarizing User Expense");
    let summary = summarize(&settings.file, settings.budget, Local::now().date_naive())?;
    summary.render(io::stdout())
}
