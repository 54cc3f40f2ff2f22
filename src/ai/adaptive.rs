use super::{best_index, primary_matchup, usable_moves, AiConfig, Decision, DecisionPolicy, SideView};
use crate::moves::{MoveCategory, Movement};
use crate::pokemon::Pokemon;

const COUNTER_THRESHOLD: f64 = 1.5;

/// Adaptive tier: chases type advantage before anything else.
pub struct AdaptivePolicy;

/// Offensive pressure over defensive exposure, with small stat bonuses.
pub(crate) fn matchup_value(mine: &Pokemon, opponent: &Pokemon) -> f64 {
    let offensive = primary_matchup(mine, opponent);
    let defensive = primary_matchup(opponent, mine);
    let mut value = (offensive * 2.0) / (defensive + 0.5);
    if offensive > 1.0 {
        value += (mine.stats.attack + mine.stats.special_attack) as f64 / 200.0;
    }
    if defensive < 1.0 {
        value += (mine.stats.defence + mine.stats.special_defence) as f64 / 200.0;
    }
    value
}

fn move_effectiveness(mv: &Movement, user: &Pokemon) -> f64 {
    let mut value = (1.0 + mv.power as f64 / 100.0) * (mv.accuracy as f64 / 100.0);
    value += match mv.category {
        MoveCategory::Physical => user.stats.attack as f64 / 200.0,
        MoveCategory::Special => user.stats.special_attack as f64 / 200.0,
        MoveCategory::Status => 0.0,
    };
    value
}

fn most_effective_move(pokemon: &Pokemon) -> Option<usize> {
    let usable = usable_moves(pokemon);
    best_index(
        usable
            .iter()
            .map(|&idx| (idx, move_effectiveness(&pokemon.moves()[idx], pokemon))),
        -1.0,
    )
    .or_else(|| usable.first().copied())
}

fn strongest_move(pokemon: &Pokemon) -> Option<usize> {
    let usable = usable_moves(pokemon);
    let moves = pokemon.moves();
    let mut strongest = *usable.first()?;
    for &idx in &usable {
        if moves[idx].power > moves[strongest].power {
            strongest = idx;
        }
    }
    Some(strongest)
}

impl DecisionPolicy for AdaptivePolicy {
    fn decide(&self, view: &SideView<'_>, config: &AiConfig) -> Option<Decision> {
        let current = view.active_pokemon();
        let counters = view
            .available()
            .into_iter()
            .map(|idx| (idx, matchup_value(&view.team[idx], view.opponent)));
        let mut best_counter = None;
        let mut best_value = -1.0;
        for (idx, value) in counters {
            if value > best_value {
                best_value = value;
                best_counter = Some(idx);
            }
        }
        if let Some(idx) = best_counter {
            if best_value >= COUNTER_THRESHOLD && idx != view.active {
                log::debug!("{} counters {} ({best_value:.2})", view.team[idx].name, view.opponent.name);
                return Some(Decision::Switch(idx));
            }
        }

        if matchup_value(current, view.opponent) < 0.8 && config.hp_ratio(current) < 0.6 {
            if let Some(decision) = strategic_item(view) {
                return Some(decision);
            }
        }

        most_effective_move(current).map(Decision::Attack)
    }

    fn choose_pokemon(&self, candidates: &[&Pokemon]) -> Option<usize> {
        (!candidates.is_empty()).then_some(0)
    }

    fn choose_move(&self, pokemon: &Pokemon) -> Option<usize> {
        strongest_move(pokemon)
    }
}

/// First potion that helps the active combatant, or a revive while someone is down.
fn strategic_item(view: &SideView<'_>) -> Option<Decision> {
    if !view.items_allowed {
        return None;
    }
    let first_fainted = view.fainted().first().copied();
    for (idx, item) in view.bag.iter().enumerate() {
        if item.is_healing() && item.can_use_on(Some(view.active_pokemon())) {
            return Some(Decision::UseItem {
                item: idx,
                target: view.active,
            });
        }
        if item.is_revive() {
            if let Some(target) = first_fainted {
                return Some(Decision::UseItem { item: idx, target });
            }
        }
    }
    None
}
