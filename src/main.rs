//! Relicforge - command line entry point
//!
//! Generates items and prints them as JSON on stdout. Logs go to stderr.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use relicforge::{export_default_data, ForgeConfig, GenerationRequest, ItemForge, Rarity};

/// Procedural RPG item generator
#[derive(Parser, Debug)]
#[command(name = "relicforge")]
#[command(version)]
struct Args {
    /// Category id or alias (sword, armor, ring, potion, ...); random when omitted
    #[arg(short, long)]
    category: Option<String>,

    /// Sub-type id within the category (longsword, ring, healing_potion, ...)
    #[arg(short = 't', long)]
    sub_type: Option<String>,

    /// COMMON, UNCOMMON, RARE, EPIC or LEGENDARY; rolled when omitted
    #[arg(short, long)]
    rarity: Option<Rarity>,

    /// Preferred material id; ignored when the sub-type does not allow it
    #[arg(short, long)]
    material: Option<String>,

    /// Number of items to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    count: u32,

    /// Seed for reproducible output
    #[arg(short, long)]
    seed: Option<u64>,

    /// Config file (RON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory with materials.json and categories/
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Skip sprite generation
    #[arg(long)]
    no_art: bool,

    /// Pretty-print a JSON array instead of one item per line
    #[arg(long)]
    pretty: bool,

    /// List categories and sub-types, then exit
    #[arg(long)]
    list: bool,

    /// Write the built-in data files to a directory, then exit
    #[arg(long, value_name = "DIR")]
    export_data: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Some(dir) = &args.export_data {
        export_default_data(dir).with_context(|| format!("exporting data to {:?}", dir))?;
        return Ok(());
    }

    let mut config = ForgeConfig::load(args.config.as_deref()).context("loading config")?;
    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if args.no_art {
        config.art.enabled = false;
    }

    let forge = ItemForge::from_config(&config).context("loading item data")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.list {
        for category in &forge.data().categories {
            let sub_types: Vec<&str> = category.sub_types.iter().map(|s| s.id.as_str()).collect();
            writeln!(out, "{} ({}): {}", category.id, category.name, sub_types.join(", "))?;
        }
        return Ok(());
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let request = GenerationRequest {
        category: args.category.clone(),
        sub_type: args.sub_type.clone(),
        rarity: args.rarity,
        material: args.material.clone(),
    };

    let items: Vec<_> = (0..args.count)
        .filter_map(|_| forge.generate_with_rng(&request, &mut rng))
        .collect();

    if items.is_empty() && args.count > 0 {
        bail!("no items could be generated for {:?}", request);
    }
    if items.len() < args.count as usize {
        log::warn!("Generated {} of {} requested items", items.len(), args.count);
    }

    if args.pretty {
        writeln!(out, "{}", serde_json::to_string_pretty(&items)?)?;
    } else {
        for item in &items {
            writeln!(out, "{}", serde_json::to_string(item)?)?;
        }
    }

    log::info!("Generated {} item(s)", items.len());
    Ok(())
}
