//! End-to-end flows behind the CLI subcommands.
//!
//! Each flow prints its own report to stdout, logs through `tracing`, and
//! writes its output files. Per-call API failures are recorded and only turn
//! into an error when `strict` is set.

use anyhow::{Result, anyhow, bail};
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

use crate::aggregate::{Aggregation, collect};
use crate::client::Client;
use crate::endpoint::factsheet_endpoints;
use crate::export::{export_funds_csv, write_json};
use crate::funds::{Amc, Fund, active_funds, find_amc, find_by_abbr, rmf_funds};
use crate::report;
use crate::util::timestamped_filename;

pub const DEFAULT_FUND_ID: &str = "M0570_2565";
pub const DEFAULT_FACTSHEET_OUTPUT: &str = "abgdd-rmf-complete-data.json";
pub const DEFAULT_AMC: &str = "SCB";
pub const DEFAULT_LOOKUP: &str = "SCBM3";
pub const DEFAULT_RMF_OUTPUT: &str = "scb_rmf_funds.json";
pub const EXPORT_PREFIX: &str = "scb_rmf_funds";

#[derive(Debug, Clone)]
pub struct FactsheetOptions {
    pub fund_id: String,
    pub output: PathBuf,
    pub progress: bool,
    pub show_responses: bool,
    pub strict: bool,
}

impl Default for FactsheetOptions {
    fn default() -> Self {
        Self {
            fund_id: DEFAULT_FUND_ID.to_string(),
            output: PathBuf::from(DEFAULT_FACTSHEET_OUTPUT),
            progress: true,
            show_responses: true,
            strict: false,
        }
    }
}

/// Fetches every factsheet section of one fund and writes the successes to
/// `opts.output`, keyed by section label.
pub fn run_factsheet(client: &Client, opts: &FactsheetOptions) -> Result<Aggregation> {
    let endpoints = factsheet_endpoints(&opts.fund_id);
    tracing::info!(fund_id = %opts.fund_id, endpoints = endpoints.len(), "fetching factsheet");

    let agg = collect(client, &endpoints, client.factsheet_key(), opts.progress);

    if opts.show_responses {
        for (label, value) in &agg.results {
            println!("{}", report::section(label));
            println!("{}", serde_json::to_string_pretty(value)?);
        }
    }

    write_json(&opts.output, &agg.results)?;
    println!("\nComplete data saved to: {}\n", opts.output.display());
    println!("{}", report::aggregation_summary(&agg));

    agg.check(opts.strict)?;
    Ok(agg)
}

#[derive(Debug, Clone)]
pub struct RmfOptions {
    pub amc: String,
    pub lookup: Option<String>,
    pub output: PathBuf,
    /// Directory for the timestamped CSV export; `None` disables it.
    pub export_dir: Option<PathBuf>,
    pub strict: bool,
}

impl Default for RmfOptions {
    fn default() -> Self {
        Self {
            amc: DEFAULT_AMC.to_string(),
            lookup: Some(DEFAULT_LOOKUP.to_string()),
            output: PathBuf::from(DEFAULT_RMF_OUTPUT),
            export_dir: Some(PathBuf::from(".")),
            strict: false,
        }
    }
}

/// JSON document written by [`run_rmf`].
#[derive(Debug, Serialize)]
pub struct RmfResults {
    pub amc: Amc,
    pub active_rmf_funds: Vec<Fund>,
    pub all_rmf_funds: Vec<Fund>,
}

#[derive(Debug, Default)]
pub struct RmfOutcome {
    /// `None` when the flow stopped before the funds were filtered.
    pub results: Option<RmfResults>,
    pub total_funds: usize,
    pub lookup: Option<Fund>,
    pub export: Option<PathBuf>,
    /// Non-fatal steps that failed, as human-readable messages.
    pub warnings: Vec<String>,
    /// Why the flow ended before writing results.
    pub stopped: Option<String>,
}

impl RmfOutcome {
    pub fn completed(&self) -> bool {
        self.stopped.is_none()
    }
}

// Prerequisite failures end the flow; only strict runs turn them into errors.
fn stop_early(strict: bool, err: anyhow::Error) -> Result<RmfOutcome> {
    if strict {
        return Err(err);
    }
    tracing::warn!("{:#}", err);
    println!("✗ {:#}", err);
    Ok(RmfOutcome {
        stopped: Some(format!("{:#}", err)),
        ..RmfOutcome::default()
    })
}

/// Finds an AMC, filters its RMF funds, and writes them out.
///
/// Failing to list AMCs, find the AMC, or list its funds stops the flow
/// before anything is written; the outcome records why. The asset allocation
/// lookup and the CSV export only warn. With `strict`, either kind of failure
/// is returned as an error.
pub fn run_rmf(client: &Client, opts: &RmfOptions, now: NaiveDateTime) -> Result<RmfOutcome> {
    println!("{}", report::section(&format!("Step 1: Finding {} Asset Management Company", opts.amc)));
    let amcs = match client.amcs() {
        Ok(a) => a,
        Err(e) => return stop_early(opts.strict, anyhow::Error::new(e).context("failed to fetch AMC list")),
    };
    println!("✓ Found {} AMCs", amcs.len());

    let Some(amc) = find_amc(&amcs, &opts.amc).cloned() else {
        return stop_early(
            opts.strict,
            anyhow!("no asset management company matching {:?}", opts.amc),
        );
    };
    let amc_id = amc.unique_id().into_owned();
    println!("  AMC ID:      {}", amc_id);
    println!("  Name (EN):   {}", amc.name_en());
    println!("  Name (TH):   {}", amc.name_th());

    println!("{}", report::section(&format!("Step 2: Fetching all {} funds", opts.amc)));
    let all_funds = match client.funds_by_amc(&amc_id) {
        Ok(f) if f.is_empty() => return stop_early(opts.strict, anyhow!("{} has no funds", amc_id)),
        Ok(f) => f,
        Err(e) => {
            return stop_early(
                opts.strict,
                anyhow::Error::new(e).context(format!("failed to fetch funds of {}", amc_id)),
            );
        }
    };
    println!("✓ Found {} funds", all_funds.len());

    println!("{}", report::section("Step 3: Filtering for RMF funds"));
    let all_rmf = rmf_funds(&all_funds);
    let active_rmf = active_funds(&all_rmf);
    println!("✓ Found {} RMF funds (including inactive)", all_rmf.len());
    println!("✓ Found {} active RMF funds", active_rmf.len());
    tracing::info!(total = all_funds.len(), rmf = all_rmf.len(), active = active_rmf.len(), "filtered funds");

    let shown: &[Fund] = if active_rmf.is_empty() {
        println!("No active RMF funds found; showing all RMF funds (including inactive)");
        &all_rmf
    } else {
        &active_rmf
    };
    println!("{}", report::fund_table(shown));

    let lookup = match &opts.lookup {
        Some(abbr) => {
            println!("{}", report::section(&format!("Step 4: Searching for {}", abbr)));
            let found = find_by_abbr(&all_funds, abbr).cloned();
            match &found {
                Some(f) => println!(
                    "✓ Found {}: {} ({}, status {})",
                    abbr,
                    f.proj_id(),
                    f.proj_name_en(),
                    f.fund_status()
                ),
                None => println!("✗ No fund with code {:?} found; it may have been renamed, merged, or delisted", abbr),
            }
            found
        }
        None => None,
    };

    let mut warnings = Vec::new();

    if let Some(example) = shown.first() {
        println!("{}", report::section("Step 5: Example - Asset Allocation"));
        let proj_id = example.proj_id();
        println!("Fetching asset allocation for {}...", example.proj_abbr_name());
        match client.fund_assets(&proj_id) {
            Ok(assets) if assets.is_empty() => println!("No asset data available"),
            Ok(assets) => println!("{}", report::asset_table(&assets)),
            Err(e) => {
                tracing::warn!(%proj_id, "could not fetch asset allocation: {}", e);
                warnings.push(format!("asset allocation of {}: {}", proj_id, e));
            }
        }
    }

    let export = match &opts.export_dir {
        Some(dir) => {
            println!("{}", report::section("Step 6: Export"));
            let path = dir.join(timestamped_filename(EXPORT_PREFIX, now, "csv"));
            match export_funds_csv(&path, shown) {
                Ok(p) => {
                    println!("✓ Data exported to: {}\n  Total records: {}", p.display(), shown.len());
                    Some(p)
                }
                Err(e) => {
                    tracing::warn!("could not export CSV: {:#}", e);
                    warnings.push(format!("CSV export: {:#}", e));
                    None
                }
            }
        }
        None => None,
    };

    let results = RmfResults {
        amc,
        active_rmf_funds: active_rmf,
        all_rmf_funds: all_rmf,
    };
    write_json(&opts.output, &results)?;

    println!("{}", report::section("Summary"));
    println!("  ✓ {} AMC ID: {}", opts.amc, amc_id);
    println!("  ✓ Total funds: {}", all_funds.len());
    println!("  ✓ Total RMF funds: {}", results.all_rmf_funds.len());
    println!("  ✓ Active RMF funds: {}", results.active_rmf_funds.len());
    println!("✓ Results saved to: {}", opts.output.display());

    if opts.strict && !warnings.is_empty() {
        bail!("{} step(s) failed: {}", warnings.len(), warnings.join("; "));
    }

    Ok(RmfOutcome {
        results: Some(results),
        total_funds: all_funds.len(),
        lookup,
        export,
        warnings,
        stopped: None,
    })
}

/// Fetches and prints one day's NAV. `Ok(None)` means nothing was published,
/// no Daily Info key is configured, or (without `strict`) the call failed.
pub fn run_nav(client: &Client, fund_id: &str, nav_date: &str, strict: bool) -> Result<Option<Value>> {
    let nav = match client.daily_nav(fund_id, nav_date) {
        Ok(nav) => nav,
        Err(e) => {
            let err = anyhow::Error::new(e)
                .context(format!("failed to fetch NAV of {} for {}", fund_id, nav_date));
            if strict {
                return Err(err);
            }
            tracing::warn!("{:#}", err);
            println!("✗ {:#}", err);
            return Ok(None);
        }
    };
    match &nav {
        Some(v) => println!("{}", serde_json::to_string_pretty(v)?),
        None => println!("No NAV available for {} on {}", fund_id, nav_date),
    }
    Ok(nav)
}
