use anyhow::Result;
use chrono::{Days, Local};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use secfund::commands::{self, FactsheetOptions, RmfOptions};
use secfund::{Client, Overrides, logging, mask_key};

#[derive(Debug, Parser)]
#[command(name = "secfund", version, about = "Query the Thailand SEC Fund Factsheet API")]
struct Cli {
    /// Exit non-zero when any API call fails
    #[arg(long, global = true)]
    strict: bool,

    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Base API URL (defaults to SEC_API_URL or https://api.sec.or.th)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Hide the progress bar
    #[arg(long, global = true)]
    no_progress: bool,

    /// Defaults to `factsheet` with its default arguments
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Args)]
struct FactsheetArgs {
    #[arg(long, default_value = commands::DEFAULT_FUND_ID)]
    fund_id: String,
    #[arg(long, default_value = commands::DEFAULT_FACTSHEET_OUTPUT)]
    output: PathBuf,
    /// Print only the summary, not each response
    #[arg(long)]
    quiet: bool,
}

impl Default for FactsheetArgs {
    fn default() -> Self {
        Self {
            fund_id: commands::DEFAULT_FUND_ID.to_string(),
            output: PathBuf::from(commands::DEFAULT_FACTSHEET_OUTPUT),
            quiet: false,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch every factsheet section of one fund and save them as JSON
    Factsheet(FactsheetArgs),
    /// Find an AMC's retirement mutual funds and export them
    Rmf {
        #[arg(long, default_value = commands::DEFAULT_AMC)]
        amc: String,
        /// Fund code to look up among all of the AMC's funds
        #[arg(long, default_value = commands::DEFAULT_LOOKUP)]
        lookup: String,
        #[arg(long, default_value = commands::DEFAULT_RMF_OUTPUT)]
        output: PathBuf,
        #[arg(long, default_value = ".")]
        export_dir: PathBuf,
        #[arg(long)]
        no_export: bool,
    },
    /// Show one day's NAV (needs SEC_FUND_DAILY_INFO_KEY)
    Nav {
        #[arg(long, default_value = commands::DEFAULT_FUND_ID)]
        fund_id: String,
        /// YYYY-MM-DD, defaults to yesterday
        #[arg(long)]
        date: Option<String>,
    },
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("✗ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let client = Client::new(Overrides {
        url: cli.url,
        timeout: cli.timeout.map(std::time::Duration::from_secs),
        ..Overrides::default()
    })?;

    println!("Fund Factsheet API Key: {}", mask_key(client.factsheet_key()));
    match client.daily_info_key() {
        Some(k) => println!("Fund Daily Info API Key: {}", mask_key(k)),
        None => println!("⚠️  SEC_FUND_DAILY_INFO_KEY not set - NAV data will not be available"),
    }

    let command = cli
        .command
        .unwrap_or_else(|| Command::Factsheet(FactsheetArgs::default()));

    match command {
        Command::Factsheet(args) => {
            let opts = FactsheetOptions {
                fund_id: args.fund_id,
                output: args.output,
                progress: !cli.no_progress,
                show_responses: !args.quiet,
                strict: cli.strict,
            };
            commands::run_factsheet(&client, &opts)?;
        }
        Command::Rmf {
            amc,
            lookup,
            output,
            export_dir,
            no_export,
        } => {
            let opts = RmfOptions {
                amc,
                lookup: Some(lookup).filter(|l| !l.is_empty()),
                output,
                export_dir: if no_export { None } else { Some(export_dir) },
                strict: cli.strict,
            };
            let outcome = commands::run_rmf(&client, &opts, Local::now().naive_local())?;
            if let Some(reason) = outcome.stopped {
                tracing::info!("rmf search stopped early: {}", reason);
            }
        }
        Command::Nav { fund_id, date } => {
            let date = match date {
                Some(d) => d,
                None => Local::now()
                    .date_naive()
                    .checked_sub_days(Days::new(1))
                    .unwrap_or_else(|| Local::now().date_naive())
                    .format("%Y-%m-%d")
                    .to_string(),
            };
            commands::run_nav(&client, &fund_id, &date, cli.strict)?;
        }
    }

    Ok(())
}
