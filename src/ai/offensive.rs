use super::{best_index, primary_matchup, usable_moves, AiConfig, Decision, DecisionPolicy, SideView};
use crate::moves::{MoveCategory, Movement};
use crate::pokemon::Pokemon;

/// Aggressive tier: swap to the hardest hitter, otherwise hit as hard as possible.
pub struct OffensivePolicy;

fn move_value(mv: &Movement, user: &Pokemon) -> i64 {
    let mut value = mv.power as i64 * 2 + mv.accuracy as i64 / 10;
    value += match mv.category {
        MoveCategory::Physical => 30 + user.stats.attack as i64 / 10,
        MoveCategory::Special => 30 + user.stats.special_attack as i64 / 10,
        MoveCategory::Status => -20,
    };
    if mv.side_effect < 0.2 {
        value += 15;
    }
    value
}

pub(crate) fn offensive_value(pokemon: &Pokemon, opponent: &Pokemon) -> i64 {
    let mut value = pokemon.stats.attack as i64 * 3
        + pokemon.stats.special_attack as i64 * 3
        + pokemon.stats.speed as i64 * 2;
    let effectiveness = primary_matchup(pokemon, opponent);
    if effectiveness > 1.0 {
        value += ((effectiveness - 1.0) * 100.0) as i64;
    }
    value + 20 * pokemon.moves().iter().filter(|mv| mv.power > 80).count() as i64
}

fn strongest_move(pokemon: &Pokemon) -> Option<usize> {
    let usable = usable_moves(pokemon);
    best_index(
        usable
            .iter()
            .map(|&idx| (idx, move_value(&pokemon.moves()[idx], pokemon) as f64)),
        -1.0,
    )
    .or_else(|| usable.first().copied())
}

impl DecisionPolicy for OffensivePolicy {
    fn decide(&self, view: &SideView<'_>, config: &AiConfig) -> Option<Decision> {
        let current = view.active_pokemon();
        let current_value = offensive_value(current, view.opponent);
        let targets = view.switch_targets();
        let scored = targets
            .iter()
            .map(|&idx| (idx, offensive_value(&view.team[idx], view.opponent) as f64));
        if let Some(idx) = best_index(scored, current_value as f64) {
            log::debug!("{} looks like a stronger attacker than {}", view.team[idx].name, current.name);
            return Some(Decision::Switch(idx));
        }

        if config.hp_ratio(current) < 0.25 {
            let potion = view
                .usable_items_on(view.active)
                .into_iter()
                .find(|&idx| view.bag[idx].is_healing());
            if let Some(item) = potion {
                return Some(Decision::UseItem {
                    item,
                    target: view.active,
                });
            }
        }

        strongest_move(current).map(Decision::Attack)
    }

    fn choose_move(&self, pokemon: &Pokemon) -> Option<usize> {
        strongest_move(pokemon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pokemon::{BaseStats, DamageRules};
    use crate::types::Type;

    fn stats(attack: u32) -> BaseStats {
        BaseStats {
            hp: 100,
            attack,
            defence: 70,
            speed: 70,
            special_attack: 70,
            special_defence: 70,
        }
    }

    #[test]
    fn prefers_power_over_status() {
        let mon = Pokemon::new("Brawler", stats(100), Type::Fighting, None).with_moves([
            Movement::status("Growl", 100, 40),
            Movement::physical("Tackle", 40, 100, 35),
            Movement::physical("Close Combat", 120, 100, 5).with_side_effect(1.0),
        ]);
        assert_eq!(OffensivePolicy.choose_move(&mon), Some(2));
    }

    #[test]
    fn switches_to_super_effective_attacker() {
        let current = Pokemon::new("Plain", stats(70), Type::Normal, None)
            .with_moves([Movement::physical("Tackle", 40, 100, 35)]);
        let bench = Pokemon::new("Striker", stats(70), Type::Fighting, None)
            .with_moves([Movement::physical("Tackle", 40, 100, 35)]);
        let foe = Pokemon::new("Rockmon", stats(70), Type::Rock, None);
        let team = vec![current, bench];
        let view = SideView {
            team: &team,
            active: 0,
            bag: &[],
            opponent: &foe,
            rules: DamageRules::default(),
            items_allowed: true,
        };
        assert_eq!(
            OffensivePolicy.decide(&view, &AiConfig::default()),
            Some(Decision::Switch(1))
        );
    }

    #[test]
    fn stays_in_when_nobody_is_stronger() {
        let team = vec![Pokemon::new("Solo", stats(90), Type::Fire, None)
            .with_moves([Movement::special("Ember", 40, 100, 25)])];
        let foe = Pokemon::new("Leafy", stats(70), Type::Grass, None);
        let view = SideView {
            team: &team,
            active: 0,
            bag: &[],
            opponent: &foe,
            rules: DamageRules::default(),
            items_allowed: true,
        };
        assert_eq!(
            OffensivePolicy.decide(&view, &AiConfig::default()),
            Some(Decision::Attack(0))
        );
    }
}
