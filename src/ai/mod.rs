//! Decision making for machine-controlled rosters.
//!
//! A policy only ever sees a [`SideView`]: an immutable snapshot of its own
//! roster, its battle bag and the opposing active combatant. The battle applies
//! whatever [`Decision`] comes back.

mod adaptive;
mod defensive;
mod expert;
mod offensive;

pub use adaptive::AdaptivePolicy;
pub use defensive::DefensivePolicy;
pub use expert::ExpertPolicy;
pub use offensive::OffensivePolicy;

use crate::items::Item;
use crate::pokemon::{DamageRules, Pokemon};
use crate::types::Type;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
    Attack(usize),
    UseItem { item: usize, target: usize },
    Switch(usize),
}

/// Denominator used when policies compute an HP ratio.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum HpRatioBasis {
    /// current / current, which is 1.0 for every standing combatant.
    #[default]
    Literal,
    /// current / max.
    MaxHp,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AiConfig {
    pub hp_ratio: HpRatioBasis,
}

impl AiConfig {
    pub fn hp_ratio(&self, pokemon: &Pokemon) -> f64 {
        let denominator = match self.hp_ratio {
            HpRatioBasis::Literal => pokemon.current_hp(),
            HpRatioBasis::MaxHp => pokemon.max_hp(),
        };
        if denominator == 0 {
            return 0.0;
        }
        pokemon.current_hp() as f64 / denominator as f64
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SideView<'a> {
    pub team: &'a [Pokemon],
    pub active: usize,
    pub bag: &'a [Item],
    pub opponent: &'a Pokemon,
    pub rules: DamageRules,
    pub items_allowed: bool,
}

impl<'a> SideView<'a> {
    pub fn active_pokemon(&self) -> &'a Pokemon {
        &self.team[self.active]
    }

    /// Roster indices with HP left, in roster order.
    pub fn available(&self) -> Vec<usize> {
        self.team
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_available())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn switch_targets(&self) -> Vec<usize> {
        self.available()
            .into_iter()
            .filter(|idx| *idx != self.active)
            .collect()
    }

    pub fn fainted(&self) -> Vec<usize> {
        self.team
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_fainted())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Bag items that can be applied to `target` right now.
    pub fn usable_items_on(&self, target: usize) -> Vec<usize> {
        if !self.items_allowed {
            return Vec::new();
        }
        let Some(pokemon) = self.team.get(target) else {
            return Vec::new();
        };
        self.bag
            .iter()
            .enumerate()
            .filter(|(_, item)| item.can_use_on(Some(pokemon)))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn permits(&self, decision: &Decision) -> bool {
        match *decision {
            Decision::Attack(idx) => usable_moves(self.active_pokemon()).contains(&idx),
            Decision::UseItem { item, target } => self.usable_items_on(target).contains(&item),
            Decision::Switch(idx) => self.switch_targets().contains(&idx),
        }
    }
}

pub trait DecisionPolicy: Sync {
    fn decide(&self, view: &SideView<'_>, config: &AiConfig) -> Option<Decision>;

    /// Default: the candidate with the most HP left, first one on ties.
    fn choose_pokemon(&self, candidates: &[&Pokemon]) -> Option<usize> {
        best_index(
            candidates
                .iter()
                .enumerate()
                .map(|(idx, p)| (idx, p.current_hp() as f64)),
            -1.0,
        )
    }

    /// Default: the usable move with the highest power.
    fn choose_move(&self, pokemon: &Pokemon) -> Option<usize> {
        let usable = usable_moves(pokemon);
        best_index(
            usable.iter().map(|&idx| (idx, pokemon.moves()[idx].power as f64)),
            -1.0,
        )
        .or_else(|| usable.first().copied())
    }

    fn choose_item(&self, candidates: &[&Item]) -> Option<usize> {
        (!candidates.is_empty()).then_some(0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AiTier {
    Offensive,
    Defensive,
    Adaptive,
    Expert,
}

impl AiTier {
    pub const ALL: [AiTier; 4] = [
        AiTier::Offensive,
        AiTier::Defensive,
        AiTier::Adaptive,
        AiTier::Expert,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AiTier::Offensive => "Aggressive",
            AiTier::Defensive => "Defensive",
            AiTier::Adaptive => "Adaptive",
            AiTier::Expert => "Expert",
        }
    }

    pub fn difficulty(self) -> u8 {
        match self {
            AiTier::Expert => 3,
            _ => 2,
        }
    }

    pub fn policy(self) -> &'static dyn DecisionPolicy {
        match self {
            AiTier::Offensive => &OffensivePolicy,
            AiTier::Defensive => &DefensivePolicy,
            AiTier::Adaptive => &AdaptivePolicy,
            AiTier::Expert => &ExpertPolicy,
        }
    }

    pub fn parse(name: &str) -> Option<AiTier> {
        match name.trim().to_ascii_lowercase().as_str() {
            "offensive" | "aggressive" | "attack" => Some(AiTier::Offensive),
            "defensive" => Some(AiTier::Defensive),
            "adaptive" | "change" => Some(AiTier::Adaptive),
            "expert" => Some(AiTier::Expert),
            _ => None,
        }
    }
}

/// Runs one machine turn: forced replacement when the active combatant is down,
/// otherwise the policy, gated so nothing unusable leaves this function.
pub fn make_decision(
    policy: &dyn DecisionPolicy,
    view: &SideView<'_>,
    config: &AiConfig,
) -> Option<Decision> {
    if view.active_pokemon().is_fainted() {
        let targets = view.switch_targets();
        let candidates: Vec<&Pokemon> = targets.iter().map(|&idx| &view.team[idx]).collect();
        let pick = policy.choose_pokemon(&candidates)?;
        return targets.get(pick).map(|&idx| Decision::Switch(idx));
    }
    match policy.decide(view, config) {
        Some(decision) if view.permits(&decision) => Some(decision),
        Some(decision) => {
            log::debug!("discarding unusable decision {decision:?}");
            fallback(view)
        }
        None => fallback(view),
    }
}

/// First usable move, else a switch to the first standing teammate.
pub fn fallback(view: &SideView<'_>) -> Option<Decision> {
    if let Some(&idx) = usable_moves(view.active_pokemon()).first() {
        return Some(Decision::Attack(idx));
    }
    view.switch_targets().first().map(|&idx| Decision::Switch(idx))
}

/// Move indices with PP left; empty while the user cannot act at all.
pub fn usable_moves(pokemon: &Pokemon) -> Vec<usize> {
    if pokemon.is_fainted() || pokemon.is_immobilized() {
        return Vec::new();
    }
    pokemon
        .moves()
        .iter()
        .enumerate()
        .filter(|(_, mv)| mv.has_pp())
        .map(|(idx, _)| idx)
        .collect()
}

/// First index whose score strictly beats everything before it and `floor`.
pub fn best_index(scores: impl IntoIterator<Item = (usize, f64)>, floor: f64) -> Option<usize> {
    let mut best = None;
    let mut best_score = floor;
    for (idx, score) in scores {
        if score > best_score {
            best_score = score;
            best = Some(idx);
        }
    }
    best
}

/// Effectiveness of `attacker`'s primary type against `defender`.
pub fn primary_matchup(attacker: &Pokemon, defender: &Pokemon) -> f64 {
    type_against(attacker.primary_type, defender)
}

fn type_against(attack: Type, defender: &Pokemon) -> f64 {
    attack.against(defender.primary_type, defender.secondary_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Movement;
    use crate::pokemon::{BaseStats, Status};

    fn mk_pokemon(name: &str, hp: u32) -> Pokemon {
        Pokemon::new(
            name,
            BaseStats {
                hp,
                attack: 60,
                defence: 60,
                speed: 60,
                special_attack: 60,
                special_defence: 60,
            },
            Type::Normal,
            None,
        )
        .with_moves([
            Movement::physical("Tackle", 40, 100, 35),
            Movement::physical("Body Slam", 85, 100, 15),
        ])
    }

    #[test]
    fn literal_ratio_is_always_one_for_standing_pokemon() {
        let mut mon = mk_pokemon("A", 100);
        mon.take_damage(90);
        assert_eq!(AiConfig::default().hp_ratio(&mon), 1.0);
        let corrected = AiConfig {
            hp_ratio: HpRatioBasis::MaxHp,
        };
        assert!((corrected.hp_ratio(&mon) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn usable_moves_skip_empty_pp_and_sleepers() {
        let mut mon = mk_pokemon("A", 100);
        if let Some(mv) = mon.move_at_mut(0) {
            while mv.use_pp() {}
        }
        assert_eq!(usable_moves(&mon), vec![1]);
        mon.add_status(Status::Sleep);
        assert!(usable_moves(&mon).is_empty());
    }

    #[test]
    fn best_index_keeps_first_on_ties() {
        assert_eq!(best_index([(0, 3.0), (1, 5.0), (2, 5.0)], -1.0), Some(1));
        assert_eq!(best_index([(0, -3.0)], -1.0), None);
    }

    #[test]
    fn forced_switch_when_active_is_down() {
        let mut team = vec![mk_pokemon("A", 100), mk_pokemon("B", 40), mk_pokemon("C", 90)];
        team[0].take_damage(100);
        let opponent = mk_pokemon("Foe", 100);
        let view = SideView {
            team: &team,
            active: 0,
            bag: &[],
            opponent: &opponent,
            rules: DamageRules::default(),
            items_allowed: true,
        };
        let decision = make_decision(AiTier::Offensive.policy(), &view, &AiConfig::default());
        assert_eq!(decision, Some(Decision::Switch(2)));
    }

    #[test]
    fn tiers_expose_labels_and_difficulty() {
        assert_eq!(AiTier::Offensive.label(), "Aggressive");
        assert_eq!(AiTier::Expert.difficulty(), 3);
        assert_eq!(AiTier::parse("change"), Some(AiTier::Adaptive));
    }
}
