//! Command-line access checks.
//!
//! Loads the reference dataset, resolves a distributor rule (from a config
//! file or from `--include`/`--exclude`), and reports whether each given
//! location is permitted.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use territory::access::{check, check_strict, resolve, resolve_strict, GrantedCity};
use territory::catalog::load_reference;
use territory::config::Config;
use territory::{Catalog, LocationLevel, PermissionRule};

#[derive(Parser, Debug)]
#[command(name = "check")]
#[command(about = "Check distributor access for locations")]
struct Args {
    /// Locations to check, e.g. "Chennai-TamilNadu-India"
    locations: Vec<String>,

    /// Reference dataset file or directory (overrides the config file)
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// TOML config with reference path and named distributors
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Distributor from the config file whose rule to use
    #[arg(short, long, conflicts_with_all = ["include", "exclude"])]
    distributor: Option<String>,

    /// Path expression to include (repeatable)
    #[arg(short, long)]
    include: Vec<String>,

    /// Path expression to exclude (repeatable)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Reject unknown names and malformed paths
    #[arg(long)]
    strict: bool,

    /// Print every permitted city
    #[arg(long)]
    list: bool,

    /// Print the catalog hierarchy
    #[arg(long)]
    dump_catalog: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    rule: &'a PermissionRule,
    #[serde(skip_serializing_if = "Option::is_none")]
    granted: Option<Vec<GrantedCity<'a>>>,
    results: Vec<CheckResult<'a>>,
}

#[derive(Serialize)]
struct CheckResult<'a> {
    location: &'a str,
    allowed: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = args
        .config
        .as_ref()
        .map(Config::load_from_file)
        .transpose()?;

    let reference = args
        .reference
        .clone()
        .or_else(|| config.as_ref().map(|c| c.global.reference.clone()))
        .context("No reference dataset given; pass --reference or --config")?;
    let strict = args.strict || config.as_ref().is_some_and(|c| c.global.strict);

    info!("Reference: {}", reference.display());
    let records = load_reference(&reference)?;
    let catalog = Catalog::build(&records);

    for level in LocationLevel::all() {
        let shadowed = catalog.shadowed(*level);
        if !shadowed.is_empty() {
            warn!(
                "{} {} name(s) map to more than one code, last record wins: {}",
                shadowed.len(),
                level,
                shadowed.join(", ")
            );
        }
    }

    if args.dump_catalog {
        dump_catalog(&catalog);
    }

    let rule = match &args.distributor {
        Some(name) => config
            .as_ref()
            .context("--distributor requires --config")?
            .rule_for(name)?,
        None => PermissionRule::new(args.include.iter(), args.exclude.iter()),
    };

    let set = if strict {
        resolve_strict(&catalog, &rule)?
    } else {
        resolve(&catalog, &rule)
    };
    info!("Rule grants {} cities", set.len());

    let mut results = Vec::with_capacity(args.locations.len());
    for location in &args.locations {
        let allowed = if strict {
            check_strict(&catalog, &set, location)?
        } else {
            check(&catalog, &set, location)
        };
        results.push(CheckResult { location, allowed });
    }

    let granted = args.list.then(|| set.granted().collect::<Vec<_>>());

    if args.json {
        let report = Report {
            rule: &rule,
            granted,
            results,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Some(granted) = granted {
        for g in granted {
            println!("Granted: {}-{}-{}", g.city, g.province, g.country);
        }
    }

    for result in results {
        println!("Permission for {}: {}", result.location, result.allowed);
    }

    Ok(())
}

fn dump_catalog(catalog: &Catalog) {
    for country in catalog.countries() {
        println!("Country: {}", country);
        for province in catalog.provinces(country) {
            println!("  Province: {}", province);
            for city in catalog.cities(country, province) {
                println!("    City: {}", city);
            }
        }
    }
}
