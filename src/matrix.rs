use crate::ai::{AiConfig, AiTier};
use crate::battle::{Battle, BattleFormat, BattleResult};
use crate::character::Character;
use crate::model::RosterFile;
use crate::pokemon::DamageRules;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

#[derive(Debug, Clone, Copy)]
pub struct MatrixOptions {
    pub format: BattleFormat,
    pub damage_rules: DamageRules,
    pub ai: AiConfig,
    pub max_turns: u32,
}

impl Default for MatrixOptions {
    fn default() -> Self {
        Self {
            format: BattleFormat::Normal,
            damage_rules: DamageRules::default(),
            ai: AiConfig::default(),
            max_turns: crate::battle::DEFAULT_MAX_TURNS,
        }
    }
}

struct CellResult {
    row: usize,
    col: usize,
    win_rate: f64,
}

fn contestant(roster: &RosterFile, tier: AiTier, options: &MatrixOptions) -> anyhow::Result<Character> {
    let mut character = Character::machine(format!("{} {}", roster.name, tier.label()), tier)
        .with_ai_config(options.ai);
    for pokemon in roster.team()? {
        character.add_pokemon(pokemon);
    }
    for item in roster.items() {
        character.add_item(item);
    }
    Ok(character)
}

/// Plays one seeded battle between two tiers fielding the same roster.
pub fn simulate_battle(
    roster: &RosterFile,
    tiers: (AiTier, AiTier),
    seed: u64,
    options: &MatrixOptions,
) -> anyhow::Result<Battle> {
    let one = contestant(roster, tiers.0, options)?;
    let two = contestant(roster, tiers.1, options)?;
    let mut battle =
        Battle::new(options.format, one, two, seed)?.with_damage_rules(options.damage_rules);
    battle.play_out(options.max_turns);
    Ok(battle)
}

/// Row tier's win rate against the column tier, draws counting half.
pub fn compute_tier_matrix(
    roster: &RosterFile,
    battles_per_cell: usize,
    seed: u64,
    options: &MatrixOptions,
) -> anyhow::Result<Vec<Vec<f64>>> {
    let tiers = AiTier::ALL;
    let tasks: Vec<(usize, usize)> = (0..tiers.len())
        .flat_map(|a| (0..tiers.len()).map(move |b| (a, b)))
        .collect();
    let cells: Vec<CellResult> = tasks
        .par_iter()
        .map(|&(row, col)| -> anyhow::Result<CellResult> {
            let mut cell_rng = SmallRng::seed_from_u64(seed ^ ((row as u64) << 32) ^ (col as u64));
            let mut wins = 0u64;
            let mut draws = 0u64;
            for _ in 0..battles_per_cell {
                let battle = simulate_battle(roster, (tiers[row], tiers[col]), cell_rng.gen(), options)?;
                match battle.result() {
                    Some(BattleResult::PlayerOneWins) => wins += 1,
                    Some(BattleResult::PlayerTwoWins) => {}
                    Some(BattleResult::Draw) | None => draws += 1,
                }
            }
            let total = battles_per_cell.max(1) as f64;
            log::debug!(
                "{} vs {}: {wins} wins, {draws} draws",
                tiers[row].label(),
                tiers[col].label()
            );
            Ok(CellResult {
                row,
                col,
                win_rate: (wins as f64 + 0.5 * draws as f64) / total,
            })
        })
        .collect::<anyhow::Result<_>>()?;

    let mut matrix = vec![vec![0.0; tiers.len()]; tiers.len()];
    for cell in cells {
        matrix[cell.row][cell.col] = cell.win_rate;
    }
    Ok(matrix)
}

/// Header row and first column carry the tier labels.
pub fn write_csv(matrix: &[Vec<f64>], path: &std::path::Path) -> anyhow::Result<()> {
    let labels: Vec<&str> = AiTier::ALL.iter().map(|t| t.label()).collect();
    let mut out = String::from("tier");
    for label in &labels {
        out.push(',');
        out.push_str(label);
    }
    for (row_idx, row) in matrix.iter().enumerate() {
        out.push('\n');
        out.push_str(labels.get(row_idx).copied().unwrap_or("?"));
        for value in row {
            out.push_str(&format!(",{value:.4}"));
        }
    }
    std::fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> RosterFile {
        serde_json::from_str(
            r#"{
                "name": "Test",
                "pokemon": [
                    {"name": "Alpha", "types": ["water"],
                     "stats": {"hp": 120, "atk": 80, "def": 70, "spa": 90, "spd": 70, "spe": 60},
                     "moves": [{"name": "Surf", "type": "water", "category": "special", "power": 90, "pp": 15}]},
                    {"name": "Beta", "types": ["grass"],
                     "stats": {"hp": 110, "atk": 85, "def": 80, "spa": 70, "spd": 80, "spe": 70},
                     "moves": [{"name": "Razor Leaf", "type": "grass", "category": "physical", "power": 55, "pp": 25}]}
                ],
                "items": [{"kind": "potion"}]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn matrix_is_square_and_deterministic() {
        let options = MatrixOptions::default();
        let first = compute_tier_matrix(&roster(), 3, 9, &options).unwrap();
        let second = compute_tier_matrix(&roster(), 3, 9, &options).unwrap();
        assert_eq!(first.len(), AiTier::ALL.len());
        assert!(first.iter().all(|row| row.len() == AiTier::ALL.len()));
        assert!(first.iter().flatten().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(first, second);
    }

    #[test]
    fn survival_needs_six_members() {
        let options = MatrixOptions {
            format: BattleFormat::Survival,
            ..MatrixOptions::default()
        };
        assert!(compute_tier_matrix(&roster(), 1, 0, &options).is_err());
    }
}
