use super::{best_index, primary_matchup, usable_moves, AiConfig, Decision, DecisionPolicy, SideView};
use crate::items::Item;
use crate::moves::{MoveCategory, Movement};
use crate::pokemon::{DamageRules, Pokemon};

/// Expert tier: scores attacking, item use and switching, then takes the best.
pub struct ExpertPolicy;

struct Scorer<'a> {
    rules: &'a DamageRules,
}

impl Scorer<'_> {
    fn type_effectiveness(&self, mv: &Movement, attacker: &Pokemon, defender: Option<&Pokemon>) -> f64 {
        match defender {
            Some(defender) => self.rules.effectiveness(mv, attacker, defender),
            None => 1.0,
        }
    }

    fn matchup(&self, mine: &Pokemon, opponent: Option<&Pokemon>) -> f64 {
        let Some(opponent) = opponent else {
            return 1.0;
        };
        let offensive = primary_matchup(mine, opponent);
        let defensive = primary_matchup(opponent, mine);
        (offensive * 2.0) / (defensive + 0.5)
    }

    /// Rough damage: power scaled by the stat ratio and typing, divided by five.
    fn estimate_damage(&self, attacker: &Pokemon, defender: &Pokemon, mv: &Movement) -> u32 {
        let power = mv.power as u64;
        let base = match mv.category {
            MoveCategory::Physical => {
                power * attacker.stats.attack as u64 / defender.stats.defence.max(1) as u64
            }
            MoveCategory::Special => {
                power * attacker.stats.special_attack as u64
                    / defender.stats.special_defence.max(1) as u64
            }
            MoveCategory::Status => power,
        };
        let typed = (base as f64 * self.type_effectiveness(mv, attacker, Some(defender))) as u64;
        ((typed / 5) as u32).max(1)
    }

    fn estimate_opponent_damage(&self, opponent: &Pokemon, mine: &Pokemon) -> u32 {
        let moves = opponent.moves();
        let Some(mut strongest) = moves.first() else {
            return 20;
        };
        for mv in moves {
            if mv.power > strongest.power {
                strongest = mv;
            }
        }
        self.estimate_damage(opponent, mine, strongest)
    }

    fn status_move_value(&self, mv: &Movement, mine: &Pokemon, opponent: Option<&Pokemon>) -> f64 {
        let mut value = mv.side_effect * 30.0;
        if let Some(opponent) = opponent {
            let theirs = opponent.stats.attack + opponent.stats.special_attack;
            let ours = mine.stats.attack + mine.stats.special_attack;
            if theirs > ours {
                value += 20.0;
            }
        }
        value
    }

    fn move_value(&self, mv: &Movement, mine: &Pokemon, opponent: Option<&Pokemon>) -> f64 {
        let mut value = mv.power as f64 * (mv.accuracy as f64 / 100.0);
        if opponent.is_some() {
            value *= self.type_effectiveness(mv, mine, opponent);
        }
        value += match mv.category {
            MoveCategory::Physical => mine.stats.attack as f64 * 0.5,
            MoveCategory::Special => mine.stats.special_attack as f64 * 0.5,
            MoveCategory::Status => self.status_move_value(mv, mine, opponent),
        };
        if mv.side_effect > 0.0 {
            value += mv.side_effect * 20.0;
        }
        value + mv.priority as f64 * 10.0
    }

    fn optimal_move(&self, mine: &Pokemon, opponent: Option<&Pokemon>) -> Option<usize> {
        let usable = usable_moves(mine);
        best_index(
            usable
                .iter()
                .map(|&idx| (idx, self.move_value(&mine.moves()[idx], mine, opponent))),
            -1.0,
        )
        .or_else(|| usable.first().copied())
    }

    fn moveset_value(&self, pokemon: &Pokemon) -> f64 {
        pokemon
            .moves()
            .iter()
            .map(|mv| {
                let versatility = if mv.category == MoveCategory::Status { 5.0 } else { 0.0 };
                mv.power as f64 * 0.1 + mv.accuracy as f64 * 0.05 + versatility
            })
            .sum()
    }

    fn pokemon_value(&self, pokemon: &Pokemon, opponent: Option<&Pokemon>) -> f64 {
        let stats = &pokemon.stats;
        let mut value = stats.attack as f64 * 0.3
            + stats.special_attack as f64 * 0.3
            + stats.defence as f64 * 0.2
            + stats.special_defence as f64 * 0.2
            + stats.speed as f64 * 0.25
            + pokemon.current_hp() as f64 * 0.4;
        if let Some(opponent) = opponent {
            value *= self.matchup(pokemon, Some(opponent));
            if let Some(idx) = self.optimal_move(pokemon, Some(opponent)) {
                let estimate = self.estimate_damage(pokemon, opponent, &pokemon.moves()[idx]);
                if estimate >= opponent.current_hp() {
                    value += 100.0;
                }
            }
        }
        value + self.moveset_value(pokemon)
    }

    fn optimal_pokemon(&self, team: &[Pokemon], candidates: &[usize], opponent: Option<&Pokemon>) -> Option<usize> {
        best_index(
            candidates
                .iter()
                .map(|&idx| (idx, self.pokemon_value(&team[idx], opponent))),
            -1.0,
        )
    }

    fn best_fainted(&self, view: &SideView<'_>) -> Option<usize> {
        best_index(
            view.fainted()
                .into_iter()
                .map(|idx| (idx, self.matchup(&view.team[idx], Some(view.opponent)))),
            -1.0,
        )
    }

    fn item_value(&self, item: &Item, view: &SideView<'_>, config: &AiConfig) -> f64 {
        let mine = view.active_pokemon();
        if item.is_healing() {
            let mut value = ((0.6 - config.hp_ratio(mine)) * 100.0).max(0.0);
            let incoming = self.estimate_opponent_damage(view.opponent, mine);
            if mine.current_hp() + item.magnitude() > incoming {
                value += 30.0;
            }
            return value;
        }
        if item.is_revive() {
            if let Some(idx) = self.best_fainted(view) {
                let fainted = self.pokemon_value(&view.team[idx], Some(view.opponent));
                let current = self.pokemon_value(mine, Some(view.opponent));
                if fainted > current * 1.2 {
                    return (fainted - current) * 0.5;
                }
            }
        }
        0.0
    }

    /// Best applicable bag entry with the roster slot it would be used on.
    fn optimal_item(&self, view: &SideView<'_>, config: &AiConfig) -> Option<(usize, usize)> {
        let revive_target = self.best_fainted(view);
        let mut best = None;
        let mut best_value = -1.0;
        for (idx, item) in view.bag.iter().enumerate() {
            let target = if item.is_revive() { revive_target } else { Some(view.active) };
            let Some(target) = target else { continue };
            if !view.usable_items_on(target).contains(&idx) {
                continue;
            }
            let value = self.item_value(item, view, config);
            if value > best_value {
                best_value = value;
                best = Some((idx, target));
            }
        }
        best
    }

    fn attack_strategy(&self, view: &SideView<'_>, config: &AiConfig) -> (f64, Option<usize>) {
        let mine = view.active_pokemon();
        let Some(idx) = self.optimal_move(mine, Some(view.opponent)) else {
            return (0.0, None);
        };
        let mv = &mine.moves()[idx];
        let mut value = mv.power as f64 / 10.0;
        value *= self.type_effectiveness(mv, mine, Some(view.opponent));
        value *= mv.accuracy as f64 / 100.0;
        value += match mv.category {
            MoveCategory::Physical => mine.stats.attack as f64 / 50.0,
            MoveCategory::Special => mine.stats.special_attack as f64 / 50.0,
            MoveCategory::Status => 0.0,
        };
        if self.estimate_damage(mine, view.opponent, mv) >= view.opponent.current_hp() {
            value += 50.0;
        }
        if config.hp_ratio(mine) < 0.3 {
            value *= 0.7;
        }
        (value, Some(idx))
    }

    fn item_strategy(&self, view: &SideView<'_>, config: &AiConfig) -> (f64, Option<(usize, usize)>) {
        let Some((idx, target)) = self.optimal_item(view, config) else {
            return (0.0, None);
        };
        let item = &view.bag[idx];
        let mine = view.active_pokemon();
        let ratio = config.hp_ratio(mine);
        let mut value = 0.0;
        if item.is_healing() {
            if ratio < 0.4 {
                value = (0.4 - ratio) * 100.0;
                let incoming = self.estimate_opponent_damage(view.opponent, mine);
                if mine.current_hp() + item.magnitude() > incoming {
                    value += 25.0;
                }
            }
        } else if item.is_revive() {
            let revived = self.matchup(&view.team[target], Some(view.opponent));
            if revived > self.matchup(mine, Some(view.opponent)) {
                value = revived * 30.0;
            }
        }
        (value, Some((idx, target)))
    }

    fn switch_strategy(&self, view: &SideView<'_>) -> (f64, Option<usize>) {
        let best = self.optimal_pokemon(view.team, &view.available(), Some(view.opponent));
        let Some(idx) = best.filter(|idx| *idx != view.active) else {
            return (0.0, None);
        };
        let improvement = self.matchup(&view.team[idx], Some(view.opponent))
            - self.matchup(view.active_pokemon(), Some(view.opponent));
        if improvement > 0.5 {
            (improvement * 40.0, Some(idx))
        } else {
            (0.0, None)
        }
    }
}

impl DecisionPolicy for ExpertPolicy {
    fn decide(&self, view: &SideView<'_>, config: &AiConfig) -> Option<Decision> {
        let scorer = Scorer { rules: &view.rules };
        let (attack_value, attack) = scorer.attack_strategy(view, config);
        let (item_value, item) = scorer.item_strategy(view, config);
        let (switch_value, switch) = scorer.switch_strategy(view);
        log::debug!(
            "expert scores: attack {attack_value:.1}, item {item_value:.1}, switch {switch_value:.1}"
        );

        if switch_value > attack_value && switch_value > item_value && switch_value > 0.0 {
            if let Some(idx) = switch {
                return Some(Decision::Switch(idx));
            }
        }
        if item_value > attack_value && item_value > 0.0 {
            if let Some((item, target)) = item {
                return Some(Decision::UseItem { item, target });
            }
        }
        attack.map(Decision::Attack)
    }

    fn choose_pokemon(&self, candidates: &[&Pokemon]) -> Option<usize> {
        let rules = DamageRules::default();
        let scorer = Scorer { rules: &rules };
        best_index(
            candidates
                .iter()
                .enumerate()
                .map(|(idx, p)| (idx, scorer.pokemon_value(p, None))),
            -1.0,
        )
    }

    fn choose_move(&self, pokemon: &Pokemon) -> Option<usize> {
        let rules = DamageRules::default();
        Scorer { rules: &rules }.optimal_move(pokemon, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::HpRatioBasis;
    use crate::pokemon::BaseStats;
    use crate::types::Type;

    fn stats(hp: u32, attack: u32) -> BaseStats {
        BaseStats {
            hp,
            attack,
            defence: 80,
            speed: 80,
            special_attack: attack,
            special_defence: 80,
        }
    }

    fn view<'a>(team: &'a [Pokemon], bag: &'a [Item], opponent: &'a Pokemon) -> SideView<'a> {
        SideView {
            team,
            active: 0,
            bag,
            opponent,
            rules: DamageRules::default(),
            items_allowed: true,
        }
    }

    #[test]
    fn attacks_when_nothing_beats_it() {
        let team = vec![Pokemon::new("Blaze", stats(100, 100), Type::Fire, None)
            .with_moves([Movement::special("Flamethrower", 90, 100, 15).with_type(Type::Fire)])];
        let foe = Pokemon::new("Leafy", stats(100, 80), Type::Grass, None);
        assert_eq!(
            ExpertPolicy.decide(&view(&team, &[], &foe), &AiConfig::default()),
            Some(Decision::Attack(0))
        );
    }

    #[test]
    fn switches_out_of_a_losing_matchup() {
        let team = vec![
            Pokemon::new("Leafy", stats(100, 60), Type::Grass, None)
                .with_moves([Movement::physical("Vine Whip", 45, 100, 25)]),
            Pokemon::new("Splash", stats(100, 60), Type::Water, None)
                .with_moves([Movement::special("Water Gun", 40, 100, 25)]),
        ];
        let foe = Pokemon::new("Blaze", stats(100, 90), Type::Fire, None)
            .with_moves([Movement::special("Ember", 40, 100, 25)]);
        assert_eq!(
            ExpertPolicy.decide(&view(&team, &[], &foe), &AiConfig::default()),
            Some(Decision::Switch(1))
        );
    }

    #[test]
    fn heals_at_low_hp_with_max_hp_ratio() {
        let mut hurt = Pokemon::new("Hurt", stats(200, 20), Type::Normal, None)
            .with_moves([Movement::status("Growl", 100, 40)]);
        hurt.take_damage(190);
        let team = vec![hurt];
        let bag = vec![Item::super_potion()];
        let foe = Pokemon::new("Foe", stats(100, 80), Type::Normal, None)
            .with_moves([Movement::physical("Tackle", 40, 100, 35)]);
        let config = AiConfig {
            hp_ratio: HpRatioBasis::MaxHp,
        };
        assert_eq!(
            ExpertPolicy.decide(&view(&team, &bag, &foe), &config),
            Some(Decision::UseItem { item: 0, target: 0 })
        );
    }

    #[test]
    fn forced_choice_prefers_the_sturdier_candidate() {
        let weak = Pokemon::new("Weak", stats(30, 30), Type::Normal, None);
        let strong = Pokemon::new("Strong", stats(150, 120), Type::Normal, None);
        assert_eq!(ExpertPolicy.choose_pokemon(&[&weak, &strong]), Some(1));
    }

    #[test]
    fn estimate_never_drops_below_one() {
        let rules = DamageRules::default();
        let scorer = Scorer { rules: &rules };
        let attacker = Pokemon::new("A", stats(100, 1), Type::Normal, None);
        let ghost = Pokemon::new("G", stats(100, 80), Type::Ghost, None);
        let tackle = Movement::physical("Tackle", 40, 100, 35);
        assert_eq!(scorer.estimate_damage(&attacker, &ghost, &tackle), 1);
    }
}
