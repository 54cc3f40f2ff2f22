use crate::pokemon::{ModStat, Pokemon, MAX_STAGE};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ItemKind {
    Potion { heal: u32 },
    Revive { percent: u8 },
    StatusCure,
    StatBoost { stat: ModStat, stages: i8 },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Item {
    pub name: String,
    pub description: String,
    pub kind: ItemKind,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn potion() -> Self {
        Item::new("Potion", ItemKind::Potion { heal: 20 }).with_description("Restores 20 HP")
    }

    pub fn super_potion() -> Self {
        Item::new("Super Potion", ItemKind::Potion { heal: 50 }).with_description("Restores 50 HP")
    }

    pub fn hyper_potion() -> Self {
        Item::new("Hyper Potion", ItemKind::Potion { heal: 200 })
            .with_description("Restores 200 HP")
    }

    pub fn revive() -> Self {
        Item::new("Revive", ItemKind::Revive { percent: 50 })
            .with_description("Revives a fainted Pokemon with half its HP")
    }

    pub fn full_heal() -> Self {
        Item::new("Full Heal", ItemKind::StatusCure).with_description("Cures every status condition")
    }

    pub fn x_attack() -> Self {
        Item::new(
            "X Attack",
            ItemKind::StatBoost {
                stat: ModStat::Attack,
                stages: 1,
            },
        )
    }

    pub fn x_defense() -> Self {
        Item::new(
            "X Defense",
            ItemKind::StatBoost {
                stat: ModStat::Defence,
                stages: 1,
            },
        )
    }

    pub fn x_speed() -> Self {
        Item::new(
            "X Speed",
            ItemKind::StatBoost {
                stat: ModStat::Speed,
                stages: 1,
            },
        )
    }

    pub fn effect_kind(&self) -> &'static str {
        match self.kind {
            ItemKind::Potion { .. } => "heal",
            ItemKind::Revive { .. } => "revive",
            ItemKind::StatusCure => "cure_status",
            ItemKind::StatBoost { stat, .. } => match stat {
                ModStat::Attack => "boost_attack",
                ModStat::Defence => "boost_defence",
                ModStat::SpecialAttack => "boost_special_attack",
                ModStat::SpecialDefence => "boost_special_defence",
                ModStat::Speed => "boost_speed",
                ModStat::Accuracy => "boost_accuracy",
                ModStat::Evasion => "boost_evasion",
            },
        }
    }

    pub fn magnitude(&self) -> u32 {
        match self.kind {
            ItemKind::Potion { heal } => heal,
            ItemKind::Revive { percent } => percent as u32,
            ItemKind::StatusCure => 0,
            ItemKind::StatBoost { stages, .. } => stages.unsigned_abs() as u32,
        }
    }

    /// Every item in the game is used up on use.
    pub fn is_consumable(&self) -> bool {
        true
    }

    pub fn is_healing(&self) -> bool {
        matches!(self.kind, ItemKind::Potion { .. })
    }

    pub fn is_revive(&self) -> bool {
        matches!(self.kind, ItemKind::Revive { .. })
    }

    pub fn can_use_on(&self, target: Option<&Pokemon>) -> bool {
        let Some(target) = target else {
            return false;
        };
        match self.kind {
            ItemKind::Potion { .. } => !target.is_fainted() && target.current_hp() < target.max_hp(),
            ItemKind::Revive { .. } => target.is_fainted(),
            ItemKind::StatusCure => !target.is_fainted() && target.has_any_status(),
            ItemKind::StatBoost { stat, .. } => !target.is_fainted() && target.modifier(stat) < MAX_STAGE,
        }
    }

    /// Applies the effect and reports whether the target observably changed.
    pub fn apply_effect(&self, target: &mut Pokemon) -> bool {
        match self.kind {
            ItemKind::Potion { heal } => target.heal(heal) > 0,
            ItemKind::Revive { percent } => target.revive(percent as f64 / 100.0),
            ItemKind::StatusCure => {
                let had_status = target.has_any_status();
                target.clear_status();
                had_status
            }
            ItemKind::StatBoost { stat, stages } => target.modify_stat(stat, stages) != 0,
        }
    }

    pub fn use_on(&self, target: Option<&mut Pokemon>) -> bool {
        match target {
            Some(target) if self.can_use_on(Some(&*target)) => self.apply_effect(target),
            _ => false,
        }
    }

    /// Revives aim at the first fainted roster member; everything else at the active one.
    pub fn default_target(&self, team: &[Pokemon], active: usize) -> Option<usize> {
        if self.is_revive() {
            return team.iter().position(Pokemon::is_fainted);
        }
        (active < team.len()).then_some(active)
    }
}
