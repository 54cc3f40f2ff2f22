use crate::pokemon::{ModStat, Status};
use phf::phf_map;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatChange {
    pub stat: ModStat,
    pub stages: i8,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoveEffect {
    /// Stage changes applied to the target.
    Target(&'static [StatChange]),
    /// Stage changes applied to the user.
    User(&'static [StatChange]),
    /// Condition inflicted on the target.
    Inflict(Status),
    /// Restores `percent` of the user's max HP.
    HealUser { percent: u8 },
    CureUser,
}

impl MoveEffect {
    pub fn is_healing(self) -> bool {
        matches!(self, MoveEffect::HealUser { .. })
    }

    pub fn is_boosting(self) -> bool {
        match self {
            MoveEffect::User(changes) => changes.iter().all(|c| c.stages > 0),
            _ => false,
        }
    }

    pub fn is_debuffing(self) -> bool {
        match self {
            MoveEffect::Target(changes) => changes.iter().all(|c| c.stages < 0),
            _ => false,
        }
    }

    pub fn inflicts_status(self) -> bool {
        matches!(self, MoveEffect::Inflict(_))
    }
}

// Keys are normalized ids (see `normalize_move_id`).
pub static MOVE_EFFECTS: phf::Map<&'static str, MoveEffect> = phf_map! {
    "crunch" => MoveEffect::Target(&[StatChange { stat: ModStat::Defence, stages: -1 }]),
    "bite" => MoveEffect::Target(&[StatChange { stat: ModStat::Defence, stages: -1 }]),
    "closecombat" => MoveEffect::User(&[
        StatChange { stat: ModStat::Defence, stages: -1 },
        StatChange { stat: ModStat::SpecialDefence, stages: -1 },
    ]),
    "hammerarm" => MoveEffect::User(&[StatChange { stat: ModStat::Speed, stages: -1 }]),
    "thunderbolt" => MoveEffect::Inflict(Status::Paralysis),
    "thunder" => MoveEffect::Inflict(Status::Paralysis),
    "thunderpunch" => MoveEffect::Inflict(Status::Paralysis),
    "flamethrower" => MoveEffect::Inflict(Status::Burn),
    "fireblast" => MoveEffect::Inflict(Status::Burn),
    "firepunch" => MoveEffect::Inflict(Status::Burn),
    "firefang" => MoveEffect::Inflict(Status::Burn),
    "icebeam" => MoveEffect::Inflict(Status::Freeze),
    "icepunch" => MoveEffect::Inflict(Status::Freeze),
    "icefang" => MoveEffect::Inflict(Status::Freeze),
    "blizzard" => MoveEffect::Inflict(Status::Freeze),
    "psychic" => MoveEffect::Target(&[StatChange { stat: ModStat::SpecialDefence, stages: -1 }]),
    "shadowball" => MoveEffect::Target(&[StatChange { stat: ModStat::SpecialDefence, stages: -1 }]),
    "swordsdance" => MoveEffect::User(&[StatChange { stat: ModStat::Attack, stages: 2 }]),
    "dragondance" => MoveEffect::User(&[
        StatChange { stat: ModStat::Attack, stages: 1 },
        StatChange { stat: ModStat::Speed, stages: 1 },
    ]),
    "calmmind" => MoveEffect::User(&[
        StatChange { stat: ModStat::SpecialAttack, stages: 1 },
        StatChange { stat: ModStat::SpecialDefence, stages: 1 },
    ]),
    "irondefense" => MoveEffect::User(&[StatChange { stat: ModStat::Defence, stages: 2 }]),
    "agility" => MoveEffect::User(&[StatChange { stat: ModStat::Speed, stages: 2 }]),
    "sleeppowder" => MoveEffect::Inflict(Status::Sleep),
    "hypnosis" => MoveEffect::Inflict(Status::Sleep),
    "thunderwave" => MoveEffect::Inflict(Status::Paralysis),
    "toxic" => MoveEffect::Inflict(Status::Poison),
    "willowisp" => MoveEffect::Inflict(Status::Burn),
    "recover" => MoveEffect::HealUser { percent: 50 },
    "roost" => MoveEffect::HealUser { percent: 50 },
    "synthesis" => MoveEffect::HealUser { percent: 50 },
    "moonlight" => MoveEffect::HealUser { percent: 50 },
    "aromatherapy" => MoveEffect::CureUser,
    "growl" => MoveEffect::Target(&[StatChange { stat: ModStat::Attack, stages: -1 }]),
    "leer" => MoveEffect::Target(&[StatChange { stat: ModStat::Defence, stages: -1 }]),
    "charm" => MoveEffect::Target(&[StatChange { stat: ModStat::Attack, stages: -2 }]),
    "screech" => MoveEffect::Target(&[StatChange { stat: ModStat::Defence, stages: -2 }]),
    "scaryface" => MoveEffect::Target(&[StatChange { stat: ModStat::Speed, stages: -2 }]),
};

pub fn normalize_move_id(name: &str) -> String {
    name.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

pub fn lookup(move_id: &str) -> Option<MoveEffect> {
    MOVE_EFFECTS.get(move_id).copied()
}
