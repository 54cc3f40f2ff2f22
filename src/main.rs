use poobkemon_battle::ai::{AiConfig, HpRatioBasis};
use poobkemon_battle::battle::{BattleFormat, DEFAULT_MAX_TURNS};
use poobkemon_battle::pokemon::DamageRules;
use poobkemon_battle::{run, CliOptions};
use std::env;
use std::path::PathBuf;

fn usage() -> ! {
    eprintln!(
        "Usage: cargo run --release -- [--roster data/roster.json] [--battles N] [--seed SEED] [--output matrix.csv] \
[--format normal|survival] [--damage-rules standard|legacy] [--hp-ratio literal|max] [--max-turns N] [--log-json battle.json]"
    );
    std::process::exit(1);
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut roster_path = PathBuf::from("data/roster.json");
    let mut battles_per_cell = 100usize;
    let mut seed = 0u64;
    let mut output_path = PathBuf::from("matrix.csv");
    let mut format = BattleFormat::Normal;
    let mut damage_rules = DamageRules::default();
    let mut ai = AiConfig::default();
    let mut max_turns = DEFAULT_MAX_TURNS;
    let mut log_json = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--roster" => {
                roster_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--roster requires a path (e.g. --roster data/roster.json)")
                })?;
            }
            "--battles" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--battles requires a number"))?;
                battles_per_cell = val.parse()?;
            }
            "--seed" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                seed = val.parse()?;
            }
            "--output" => {
                output_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--output requires a path (e.g. --output matrix.csv)")
                })?;
            }
            "--format" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--format requires normal or survival"))?;
                format = BattleFormat::parse(&val)
                    .ok_or_else(|| anyhow::anyhow!("Unknown format {val} (use normal or survival)"))?;
            }
            "--damage-rules" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--damage-rules requires standard or legacy"))?;
                damage_rules = match val.to_ascii_lowercase().as_str() {
                    "standard" => DamageRules::default(),
                    "legacy" => DamageRules::legacy(),
                    other => anyhow::bail!("Unknown damage rules {other} (use standard or legacy)"),
                };
            }
            "--hp-ratio" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--hp-ratio requires literal or max"))?;
                ai.hp_ratio = match val.to_ascii_lowercase().as_str() {
                    "literal" => HpRatioBasis::Literal,
                    "max" => HpRatioBasis::MaxHp,
                    other => anyhow::bail!("--hp-ratio must be literal or max, got {other}"),
                };
            }
            "--max-turns" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--max-turns requires a number"))?;
                max_turns = val.parse()?;
            }
            "--log-json" => {
                log_json = Some(args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--log-json requires a path (e.g. --log-json battle.json)")
                })?);
            }
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }

    Ok(CliOptions {
        roster_path,
        battles_per_cell,
        seed,
        output_path,
        format,
        damage_rules,
        ai,
        max_turns,
        log_json,
    })
}

fn main() -> anyhow::Result<()> {
    let opts = parse_args()?;
    run(opts)
}
