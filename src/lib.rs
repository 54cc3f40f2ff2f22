pub mod ai;
pub mod battle;
pub mod battle_logger;
pub mod character;
pub mod effects;
pub mod items;
pub mod matrix;
pub mod model;
pub mod moves;
pub mod pokemon;
pub mod types;

use crate::ai::{AiConfig, AiTier};
use crate::battle::BattleFormat;
use crate::matrix::{compute_tier_matrix, simulate_battle, MatrixOptions};
use crate::model::{validate_roster, RosterFile};
use crate::pokemon::DamageRules;
use anyhow::Context;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub roster_path: PathBuf,
    pub battles_per_cell: usize,
    pub seed: u64,
    pub output_path: PathBuf,
    pub format: BattleFormat,
    pub damage_rules: DamageRules,
    pub ai: AiConfig,
    pub max_turns: u32,
    /// Also dump one Expert vs Aggressive battle log here.
    pub log_json: Option<PathBuf>,
}

pub fn load_roster(path: &Path) -> anyhow::Result<RosterFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file at {}", path.display()))?;
    let parsed: RosterFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
    validate_roster(&parsed).with_context(|| format!("Invalid roster in {}", path.display()))?;
    Ok(parsed)
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    if opts.battles_per_cell == 0 {
        anyhow::bail!("--battles must be > 0");
    }
    let roster = load_roster(&opts.roster_path)?;
    let options = MatrixOptions {
        format: opts.format,
        damage_rules: opts.damage_rules,
        ai: opts.ai,
        max_turns: opts.max_turns,
    };
    let matrix = compute_tier_matrix(&roster, opts.battles_per_cell, opts.seed, &options)?;
    matrix::write_csv(&matrix, &opts.output_path)?;
    println!(
        "Wrote {}x{} tier matrix ({} battles per cell) to {}",
        matrix.len(),
        matrix.first().map(|r| r.len()).unwrap_or(0),
        opts.battles_per_cell,
        opts.output_path.display()
    );

    if let Some(log_path) = &opts.log_json {
        let battle = simulate_battle(&roster, (AiTier::Expert, AiTier::Offensive), opts.seed, &options)?;
        let json = serde_json::to_string_pretty(&battle.logger().to_json())?;
        std::fs::write(log_path, json)
            .with_context(|| format!("Failed to write battle log to {}", log_path.display()))?;
        println!("Wrote battle log to {}", log_path.display());
    }
    Ok(())
}
