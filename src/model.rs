//! Serde shapes for roster files and their conversion into battle entities.

use crate::character::MAX_TEAM_SIZE;
use crate::effects::{self, normalize_move_id};
use crate::items::{Item, ItemKind};
use crate::moves::{MoveCategory, Movement};
use crate::pokemon::{BaseStats, ModStat, Pokemon, DEFAULT_LEVEL, MAX_MOVES, MAX_STAGE};
use crate::types::Type;
use serde::Deserialize;

fn default_accuracy() -> u32 {
    100
}

fn default_pp() -> u32 {
    10
}

fn default_level() -> u8 {
    DEFAULT_LEVEL
}

fn default_stages() -> i8 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveDef {
    pub name: String,
    #[serde(rename = "type", default)]
    pub move_type: Option<Type>,
    pub category: MoveCategory,
    #[serde(default)]
    pub power: u32,
    #[serde(default = "default_accuracy")]
    pub accuracy: u32,
    #[serde(default = "default_pp")]
    pub pp: u32,
    #[serde(default)]
    pub side_effect: f64,
    #[serde(default)]
    pub priority: i8,
    /// Borrows the effect of another move id (e.g. "swordsdance").
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonDef {
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u8,
    pub types: Vec<Type>,
    pub stats: Stats,
    #[serde(default)]
    pub moves: Vec<MoveDef>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatName {
    Attack,
    Defence,
    SpecialAttack,
    SpecialDefence,
    Speed,
    Accuracy,
    Evasion,
}

impl From<StatName> for ModStat {
    fn from(stat: StatName) -> ModStat {
        match stat {
            StatName::Attack => ModStat::Attack,
            StatName::Defence => ModStat::Defence,
            StatName::SpecialAttack => ModStat::SpecialAttack,
            StatName::SpecialDefence => ModStat::SpecialDefence,
            StatName::Speed => ModStat::Speed,
            StatName::Accuracy => ModStat::Accuracy,
            StatName::Evasion => ModStat::Evasion,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemDef {
    Potion,
    SuperPotion,
    HyperPotion,
    Revive,
    FullHeal,
    Heal {
        name: String,
        amount: u32,
    },
    Boost {
        name: String,
        stat: StatName,
        #[serde(default = "default_stages")]
        stages: i8,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterFile {
    pub name: String,
    pub pokemon: Vec<PokemonDef>,
    #[serde(default)]
    pub items: Vec<ItemDef>,
}

impl MoveDef {
    pub fn to_movement(&self) -> anyhow::Result<Movement> {
        if self.accuracy > 100 {
            anyhow::bail!("{}: accuracy {} is above 100", self.name, self.accuracy);
        }
        if !(0.0..=1.0).contains(&self.side_effect) {
            anyhow::bail!("{}: side_effect must be within 0..=1", self.name);
        }
        if self.pp == 0 {
            anyhow::bail!("{}: pp must be > 0", self.name);
        }
        let mut mv = Movement::new(&self.name, self.category, self.power, self.accuracy, self.pp)
            .with_side_effect(self.side_effect)
            .with_priority(self.priority)
            .with_description(&self.description);
        if let Some(t) = self.move_type {
            mv = mv.with_type(t);
        }
        if let Some(effect_id) = &self.effect {
            let effect = effects::lookup(&normalize_move_id(effect_id))
                .ok_or_else(|| anyhow::anyhow!("{}: unknown effect '{effect_id}'", self.name))?;
            mv = mv.with_effect(Some(effect));
        }
        Ok(mv)
    }
}

impl PokemonDef {
    pub fn to_pokemon(&self) -> anyhow::Result<Pokemon> {
        let (primary, secondary) = match self.types.as_slice() {
            [primary] => (*primary, None),
            [primary, secondary] => (*primary, Some(*secondary)),
            other => anyhow::bail!("{}: expected one or two types, got {}", self.name, other.len()),
        };
        if self.moves.len() > MAX_MOVES {
            anyhow::bail!("{}: at most {MAX_MOVES} moves, got {}", self.name, self.moves.len());
        }
        if self.stats.hp == 0 {
            anyhow::bail!("{}: hp must be > 0", self.name);
        }
        let stats = BaseStats {
            hp: self.stats.hp,
            attack: self.stats.atk,
            defence: self.stats.def,
            speed: self.stats.spe,
            special_attack: self.stats.spa,
            special_defence: self.stats.spd,
        };
        let moves = self
            .moves
            .iter()
            .map(MoveDef::to_movement)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(
            Pokemon::with_level(&self.name, stats, primary, secondary, self.level)
                .with_description(&self.description)
                .with_moves(moves),
        )
    }
}

impl ItemDef {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let ItemDef::Boost { name, stages, .. } = self {
            if *stages == 0 || !(-MAX_STAGE..=MAX_STAGE).contains(stages) {
                anyhow::bail!("{name}: stages must be within -{MAX_STAGE}..={MAX_STAGE} and non-zero, got {stages}");
            }
        }
        Ok(())
    }

    pub fn to_item(&self) -> Item {
        match self {
            ItemDef::Potion => Item::potion(),
            ItemDef::SuperPotion => Item::super_potion(),
            ItemDef::HyperPotion => Item::hyper_potion(),
            ItemDef::Revive => Item::revive(),
            ItemDef::FullHeal => Item::full_heal(),
            ItemDef::Heal { name, amount } => Item::new(name, ItemKind::Potion { heal: *amount }),
            ItemDef::Boost { name, stat, stages } => Item::new(
                name,
                ItemKind::StatBoost {
                    stat: (*stat).into(),
                    stages: *stages,
                },
            ),
        }
    }
}

impl RosterFile {
    pub fn team(&self) -> anyhow::Result<Vec<Pokemon>> {
        self.pokemon.iter().map(PokemonDef::to_pokemon).collect()
    }

    pub fn items(&self) -> Vec<Item> {
        self.items.iter().map(ItemDef::to_item).collect()
    }
}

pub fn validate_roster(roster: &RosterFile) -> anyhow::Result<()> {
    if roster.pokemon.is_empty() || roster.pokemon.len() > MAX_TEAM_SIZE {
        anyhow::bail!(
            "Expected between 1 and {MAX_TEAM_SIZE} Pokemon, got {}",
            roster.pokemon.len()
        );
    }
    for def in &roster.pokemon {
        def.to_pokemon()?;
    }
    for item in &roster.items {
        item.validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::MoveEffect;
    use crate::pokemon::Status;

    const SAMPLE: &str = r#"{
        "name": "Red",
        "pokemon": [{
            "name": "Charizard",
            "level": 50,
            "types": ["fire", "flying"],
            "stats": {"hp": 153, "atk": 104, "def": 98, "spa": 129, "spd": 105, "spe": 120},
            "moves": [
                {"name": "Flamethrower", "type": "fire", "category": "special", "power": 90, "pp": 15, "side_effect": 0.1},
                {"name": "Focus", "category": "status", "pp": 20, "effect": "Swords Dance"}
            ]
        }],
        "items": [{"kind": "potion"}, {"kind": "boost", "name": "X Sp. Atk", "stat": "special_attack"}]
    }"#;

    #[test]
    fn parses_and_converts_sample() {
        let roster: RosterFile = serde_json::from_str(SAMPLE).unwrap();
        validate_roster(&roster).unwrap();
        let team = roster.team().unwrap();
        let charizard = &team[0];
        assert_eq!(charizard.secondary_type, Some(Type::Flying));
        assert_eq!(charizard.moves().len(), 2);
        assert_eq!(
            charizard.moves()[0].effect(),
            Some(MoveEffect::Inflict(Status::Burn))
        );
        assert!(charizard.moves()[1].is_boosting_move());
        let items = roster.items();
        assert_eq!(items[0].name, "Potion");
        assert_eq!(items[1].effect_kind(), "boost_special_attack");
    }

    #[test]
    fn rejects_unknown_types_and_bad_accuracy() {
        let bad_type = SAMPLE.replace("\"flying\"", "\"plasma\"");
        assert!(serde_json::from_str::<RosterFile>(&bad_type).is_err());
        let bad_acc = SAMPLE.replace("\"pp\": 15", "\"pp\": 15, \"accuracy\": 140");
        let roster: RosterFile = serde_json::from_str(&bad_acc).unwrap();
        assert!(validate_roster(&roster).is_err());
    }

    #[test]
    fn rejects_boosts_beyond_the_stage_range() {
        let huge = SAMPLE.replace("\"stat\": \"special_attack\"", "\"stat\": \"special_attack\", \"stages\": 125");
        let roster: RosterFile = serde_json::from_str(&huge).unwrap();
        assert!(validate_roster(&roster).is_err());
        let sharp = SAMPLE.replace("\"stat\": \"special_attack\"", "\"stat\": \"special_attack\", \"stages\": 2");
        let roster: RosterFile = serde_json::from_str(&sharp).unwrap();
        validate_roster(&roster).unwrap();
    }
}
