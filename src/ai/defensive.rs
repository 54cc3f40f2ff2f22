use super::{best_index, primary_matchup, usable_moves, AiConfig, Decision, DecisionPolicy, SideView};
use crate::moves::{MoveCategory, Movement};
use crate::pokemon::Pokemon;

/// Defensive tier: heal early, dodge bad matchups, favour safe utility moves.
pub struct DefensivePolicy;

fn move_value(mv: &Movement) -> i64 {
    let mut value = 0;
    if mv.category == MoveCategory::Status {
        value += 50;
    }
    if mv.power <= 60 {
        value += 30;
    }
    if mv.side_effect > 0.3 {
        value += 20;
    }
    if mv.accuracy >= 90 {
        value += 15;
    }
    value
}

fn defensive_value(pokemon: &Pokemon, opponent: &Pokemon) -> i64 {
    let mut value = pokemon.stats.defence as i64 * 2
        + pokemon.stats.special_defence as i64 * 2
        + pokemon.current_hp() as i64;
    let resistance = primary_matchup(opponent, pokemon);
    if resistance < 1.0 {
        value += ((1.0 - resistance) * 100.0) as i64;
    }
    value
}

/// Most accurate move; ties go to the stronger one while it stays at or under 80 power.
fn safest_move(pokemon: &Pokemon, usable: &[usize]) -> Option<usize> {
    let moves = pokemon.moves();
    let mut safest = *usable.first()?;
    for &idx in usable {
        let (mv, best) = (&moves[idx], &moves[safest]);
        if mv.accuracy > best.accuracy
            || (mv.accuracy == best.accuracy && mv.power > best.power && mv.power <= 80)
        {
            safest = idx;
        }
    }
    Some(safest)
}

fn defensive_move(pokemon: &Pokemon) -> Option<usize> {
    let usable = usable_moves(pokemon);
    best_index(
        usable
            .iter()
            .map(|&idx| (idx, move_value(&pokemon.moves()[idx]) as f64)),
        -1.0,
    )
    .or_else(|| safest_move(pokemon, &usable))
}

impl DecisionPolicy for DefensivePolicy {
    fn decide(&self, view: &SideView<'_>, config: &AiConfig) -> Option<Decision> {
        let current = view.active_pokemon();
        if config.hp_ratio(current) < 0.4 {
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

        if primary_matchup(view.opponent, current) > 1.5 {
            let scored = view
                .switch_targets()
                .into_iter()
                .map(|idx| (idx, defensive_value(&view.team[idx], view.opponent) as f64));
            if let Some(idx) = best_index(scored, -1.0) {
                log::debug!("{} is exposed, retreating to {}", current.name, view.team[idx].name);
                return Some(Decision::Switch(idx));
            }
        }

        defensive_move(current).map(Decision::Attack)
    }

    fn choose_move(&self, pokemon: &Pokemon) -> Option<usize> {
        defensive_move(pokemon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::Item;
    use crate::ai::HpRatioBasis;
    use crate::pokemon::{BaseStats, DamageRules};
    use crate::types::Type;

    fn stats(defence: u32) -> BaseStats {
        BaseStats {
            hp: 100,
            attack: 70,
            defence,
            speed: 70,
            special_attack: 70,
            special_defence: defence,
        }
    }

    #[test]
    fn favours_utility_moves() {
        let mon = Pokemon::new("Wall", stats(100), Type::Steel, None).with_moves([
            Movement::physical("Iron Head", 80, 100, 15),
            Movement::status("Recover", 100, 10),
        ]);
        assert_eq!(DefensivePolicy.choose_move(&mon), Some(1));
    }

    #[test]
    fn equal_utility_scores_keep_the_first_move() {
        let mon = Pokemon::new("Wall", stats(100), Type::Steel, None).with_moves([
            Movement::status("Growl", 100, 40),
            Movement::status("Recover", 100, 10),
        ]);
        assert_eq!(DefensivePolicy.choose_move(&mon), Some(0));
    }

    #[test]
    fn retreats_from_super_effective_opponent() {
        let team = vec![
            Pokemon::new("Leafy", stats(60), Type::Grass, None)
                .with_moves([Movement::physical("Vine Whip", 45, 100, 25)]),
            Pokemon::new("Sponge", stats(60), Type::Water, None),
            Pokemon::new("Bulwark", stats(120), Type::Fire, None),
        ];
        let foe = Pokemon::new("Blaze", stats(70), Type::Fire, None);
        let view = SideView {
            team: &team,
            active: 0,
            bag: &[],
            opponent: &foe,
            rules: DamageRules::default(),
            items_allowed: true,
        };
        assert_eq!(
            DefensivePolicy.decide(&view, &AiConfig::default()),
            Some(Decision::Switch(2))
        );
    }

    #[test]
    fn heals_when_ratio_uses_max_hp() {
        let mut hurt = Pokemon::new("Hurt", stats(60), Type::Normal, None)
            .with_moves([Movement::physical("Tackle", 40, 100, 35)]);
        hurt.take_damage(70);
        let team = vec![hurt];
        let bag = vec![Item::x_attack(), Item::potion()];
        let foe = Pokemon::new("Foe", stats(60), Type::Normal, None);
        let view = SideView {
            team: &team,
            active: 0,
            bag: &bag,
            opponent: &foe,
            rules: DamageRules::default(),
            items_allowed: true,
        };
        assert_eq!(
            DefensivePolicy.decide(&view, &AiConfig::default()),
            Some(Decision::Attack(0))
        );
        let corrected = AiConfig {
            hp_ratio: HpRatioBasis::MaxHp,
        };
        assert_eq!(
            DefensivePolicy.decide(&view, &corrected),
            Some(Decision::UseItem { item: 1, target: 0 })
        );
    }
}
