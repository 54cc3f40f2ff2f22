use serde::Deserialize;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Deserialize)]
#[serde(try_from = "String")]
pub enum Type {
    Steel,
    Water,
    Bug,
    Dragon,
    Electric,
    Ghost,
    Fire,
    Fairy,
    Ice,
    Fighting,
    Normal,
    Grass,
    Psychic,
    Rock,
    Dark,
    Ground,
    Poison,
    Flying,
}

impl Type {
    pub const ALL: [Type; 18] = [
        Type::Steel,
        Type::Water,
        Type::Bug,
        Type::Dragon,
        Type::Electric,
        Type::Ghost,
        Type::Fire,
        Type::Fairy,
        Type::Ice,
        Type::Fighting,
        Type::Normal,
        Type::Grass,
        Type::Psychic,
        Type::Rock,
        Type::Dark,
        Type::Ground,
        Type::Poison,
        Type::Flying,
    ];

    /// Attack multiplier of `self` against a single defending type.
    pub fn multiplier(self, defender: Type) -> f64 {
        use Type::*;
        match self {
            Steel => match defender {
                Fairy | Ice | Rock => 2.0,
                Steel | Water | Electric | Fire => 0.5,
                _ => 1.0,
            },
            Water => match defender {
                Fire | Ground | Rock => 2.0,
                Water | Dragon | Grass => 0.5,
                _ => 1.0,
            },
            Bug => match defender {
                Grass | Psychic | Dark => 2.0,
                Steel | Ghost | Fire | Fairy | Fighting | Poison | Flying => 0.5,
                _ => 1.0,
            },
            Dragon => match defender {
                Dragon => 2.0,
                Steel => 0.5,
                Fairy => 0.0,
                _ => 1.0,
            },
            Electric => match defender {
                Water | Flying => 2.0,
                Dragon | Electric | Grass => 0.5,
                Ground => 0.0,
                _ => 1.0,
            },
            Ghost => match defender {
                Ghost | Psychic => 2.0,
                Dark => 0.5,
                Normal => 0.0,
                _ => 1.0,
            },
            Fire => match defender {
                Steel | Bug | Ice | Grass => 2.0,
                Water | Dragon | Fire | Rock => 0.5,
                _ => 1.0,
            },
            Fairy => match defender {
                Dragon | Fighting | Dark => 2.0,
                Steel | Fire | Poison => 0.5,
                _ => 1.0,
            },
            Ice => match defender {
                Dragon | Grass | Ground | Flying => 2.0,
                Steel | Water | Fire | Ice => 0.5,
                _ => 1.0,
            },
            Fighting => match defender {
                Steel | Ice | Normal | Rock | Dark => 2.0,
                Bug | Fairy | Psychic | Poison | Flying => 0.5,
                Ghost => 0.0,
                _ => 1.0,
            },
            Normal => match defender {
                Steel | Rock => 0.5,
                Ghost => 0.0,
                _ => 1.0,
            },
            Grass => match defender {
                Water | Rock | Ground => 2.0,
                Steel | Bug | Dragon | Fire | Grass | Poison | Flying => 0.5,
                _ => 1.0,
            },
            Psychic => match defender {
                Fighting | Poison => 2.0,
                Psychic => 0.5,
                Dark => 0.0,
                _ => 1.0,
            },
            Rock => match defender {
                Bug | Fire | Ice | Flying => 2.0,
                Steel | Fighting | Ground => 0.5,
                _ => 1.0,
            },
            Dark => match defender {
                Ghost | Psychic => 2.0,
                Fairy | Fighting | Dark => 0.5,
                _ => 1.0,
            },
            Ground => match defender {
                Steel | Electric | Fire | Rock | Poison => 2.0,
                Bug | Grass => 0.5,
                Flying => 0.0,
                _ => 1.0,
            },
            Poison => match defender {
                Fairy | Grass => 2.0,
                Ghost | Rock | Ground | Poison => 0.5,
                Steel => 0.0,
                _ => 1.0,
            },
            Flying => match defender {
                Bug | Fighting | Grass => 2.0,
                Steel | Electric | Rock => 0.5,
                _ => 1.0,
            },
        }
    }

    /// Product over the defender's primary and optional secondary type.
    pub fn against(self, primary: Type, secondary: Option<Type>) -> f64 {
        let mut multiplier = self.multiplier(primary);
        if let Some(second) = secondary {
            multiplier *= self.multiplier(second);
        }
        multiplier
    }

    pub fn is_effective_against(self, defender: Type) -> bool {
        self.multiplier(defender) > 1.0
    }

    pub fn is_resisted_by(self, defender: Type) -> bool {
        self.multiplier(defender) < 1.0
    }

    pub fn has_no_effect_on(self, defender: Type) -> bool {
        self.multiplier(defender) == 0.0
    }

    pub fn name(self) -> &'static str {
        match self {
            Type::Steel => "Steel",
            Type::Water => "Water",
            Type::Bug => "Bug",
            Type::Dragon => "Dragon",
            Type::Electric => "Electric",
            Type::Ghost => "Ghost",
            Type::Fire => "Fire",
            Type::Fairy => "Fairy",
            Type::Ice => "Ice",
            Type::Fighting => "Fighting",
            Type::Normal => "Normal",
            Type::Grass => "Grass",
            Type::Psychic => "Psychic",
            Type::Rock => "Rock",
            Type::Dark => "Dark",
            Type::Ground => "Ground",
            Type::Poison => "Poison",
            Type::Flying => "Flying",
        }
    }

    pub fn parse(name: &str) -> Option<Type> {
        let lower = name.trim().to_ascii_lowercase();
        let alias = match lower.as_str() {
            "fight" => "fighting",
            other => other,
        };
        Type::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(alias))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for Type {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Type::parse(&value).ok_or_else(|| format!("unknown type '{value}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_rows_match_known_matchups() {
        assert_eq!(Type::Fire.multiplier(Type::Grass), 2.0);
        assert_eq!(Type::Fire.multiplier(Type::Water), 0.5);
        assert_eq!(Type::Electric.multiplier(Type::Ground), 0.0);
        assert_eq!(Type::Dragon.multiplier(Type::Fairy), 0.0);
        assert_eq!(Type::Poison.multiplier(Type::Steel), 0.0);
        assert_eq!(Type::Normal.multiplier(Type::Fire), 1.0);
    }

    #[test]
    fn every_multiplier_is_in_the_closed_set() {
        for attacker in Type::ALL {
            for defender in Type::ALL {
                let m = attacker.multiplier(defender);
                assert!([0.0, 0.5, 1.0, 2.0].contains(&m), "{attacker} vs {defender} = {m}");
            }
        }
    }

    #[test]
    fn dual_types_multiply() {
        assert_eq!(Type::Ice.against(Type::Dragon, Some(Type::Flying)), 4.0);
        assert_eq!(Type::Electric.against(Type::Water, Some(Type::Ground)), 0.0);
        assert_eq!(Type::Fire.against(Type::Grass, Some(Type::Water)), 1.0);
        assert_eq!(Type::Fire.against(Type::Grass, None), 2.0);
    }

    #[test]
    fn predicates_follow_multiplier() {
        assert!(Type::Water.is_effective_against(Type::Fire));
        assert!(Type::Water.is_resisted_by(Type::Grass));
        assert!(Type::Ghost.has_no_effect_on(Type::Normal));
        assert!(!Type::Ghost.is_resisted_by(Type::Psychic));
    }

    #[test]
    fn parse_accepts_display_names_and_aliases() {
        assert_eq!(Type::parse("fire"), Some(Type::Fire));
        assert_eq!(Type::parse(" Fight "), Some(Type::Fighting));
        assert_eq!(Type::parse("Psychic"), Some(Type::Psychic));
        assert_eq!(Type::parse("shadow"), None);
    }
}
