use poobkemon_battle::ai::AiTier;
use poobkemon_battle::battle::{Battle, BattlePhase, BattleResult, SideId, DEFAULT_MAX_TURNS};
use poobkemon_battle::character::Character;
use poobkemon_battle::items::Item;
use poobkemon_battle::moves::Movement;
use poobkemon_battle::pokemon::{BaseStats, DamageRules, Pokemon, Status};
use poobkemon_battle::types::Type;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn stats(hp: u32) -> BaseStats {
    BaseStats {
        hp,
        attack: 100,
        defence: 80,
        speed: 80,
        special_attack: 100,
        special_defence: 80,
    }
}

fn make_mon(name: &str, primary: Type, hp: u32, mv: Movement) -> Pokemon {
    Pokemon::new(name, stats(hp), primary, None).with_moves([mv])
}

fn strike() -> Movement {
    Movement::physical("Mega Strike", 200, 100, 20).with_type(Type::Normal)
}

fn nudge() -> Movement {
    Movement::physical("Nudge", 10, 100, 20).with_type(Type::Normal)
}

fn frail(name: &str) -> Pokemon {
    let mut mon = make_mon(name, Type::Normal, 100, nudge());
    mon.set_current_hp(1);
    mon
}

fn trainer_with(name: &str, team: Vec<Pokemon>) -> Character {
    let mut trainer = Character::trainer(name);
    for mon in team {
        assert!(trainer.add_pokemon(mon));
    }
    trainer
}

fn logged(battle: &Battle, prefix: &str) -> bool {
    battle
        .logger()
        .log_lines()
        .iter()
        .any(|line| line.starts_with(prefix))
}

#[test]
fn fire_move_hurts_grass_more_than_water() {
    let attacker = make_mon("Blaze", Type::Fire, 150, Movement::physical("Flare Kick", 80, 100, 15).with_type(Type::Fire));
    let grass = make_mon("Leafy", Type::Grass, 150, nudge());
    let water = make_mon("Drippy", Type::Water, 150, nudge());
    let mv = &attacker.moves()[0];
    let rules = DamageRules::default();
    let vs_grass = attacker.calculate_damage(mv, &grass, &rules, &mut SmallRng::seed_from_u64(7));
    let vs_water = attacker.calculate_damage(mv, &water, &rules, &mut SmallRng::seed_from_u64(7));
    assert!(vs_grass > vs_water, "{vs_grass} should exceed {vs_water}");
}

#[test]
fn knockout_ends_battle_with_winner() {
    let one = trainer_with("Ash", vec![make_mon("Hitter", Type::Normal, 120, strike())]);
    let two = trainer_with("Gary", vec![frail("Target")]);
    let mut battle = Battle::normal(one, two, 3).unwrap();
    assert!(battle.start_battle());
    assert!(battle.execute_attack(0));
    assert!(battle.is_battle_ended());
    assert_eq!(battle.phase(), BattlePhase::Ended);
    assert_eq!(battle.winner().map(|c| c.name.as_str()), Some("Ash"));
    assert_eq!(battle.result(), Some(BattleResult::PlayerOneWins));
    assert!(logged(&battle, "|faint|p2a: Target"));
    assert!(logged(&battle, "|win|Ash"));
    assert!(!battle.execute_attack(0));
}

#[test]
fn fainted_side_sends_next_member() {
    let one = trainer_with("Ash", vec![make_mon("Hitter", Type::Normal, 120, strike())]);
    let two = trainer_with("Gary", vec![frail("First"), make_mon("Second", Type::Normal, 100, nudge())]);
    let mut battle = Battle::normal(one, two, 3).unwrap();
    battle.start_battle();
    assert!(battle.execute_attack(0));
    assert!(!battle.is_battle_ended());
    assert_eq!(battle.active_index(SideId::Two), 1);
    assert_eq!(battle.current_turn(), SideId::Two);
    assert!(logged(&battle, "|switch|p2a: Second"));
}

#[test]
fn rejected_actions_keep_the_turn() {
    let one = trainer_with(
        "Ash",
        vec![make_mon("A", Type::Normal, 100, nudge()), make_mon("B", Type::Normal, 100, nudge())],
    );
    let two = trainer_with("Gary", vec![make_mon("C", Type::Normal, 100, nudge())]);
    let mut battle = Battle::normal(one, two, 1).unwrap();
    battle.start_battle();
    assert!(!battle.switch_pokemon(0));
    assert!(!battle.switch_pokemon(9));
    assert!(!battle.execute_attack(3));
    assert!(!battle.use_item(0));
    assert_eq!(battle.current_turn(), SideId::One);
    assert!(battle.switch_pokemon(1));
    assert_eq!(battle.current_turn(), SideId::Two);
    assert_eq!(battle.active_pokemon(SideId::One).name, "B");
}

#[test]
fn potion_heals_active_and_is_consumed() {
    let mut hurt = make_mon("Hurt", Type::Normal, 100, nudge());
    hurt.set_current_hp(40);
    let mut one = trainer_with("Ash", vec![hurt]);
    one.add_item(Item::potion());
    let two = trainer_with("Gary", vec![make_mon("C", Type::Normal, 100, nudge())]);
    let mut battle = Battle::normal(one, two, 1).unwrap();
    battle.start_battle();
    assert!(battle.use_item(0));
    assert_eq!(battle.active_pokemon(SideId::One).current_hp(), 60);
    assert!(battle.battle_bag(SideId::One).is_empty());
    assert_eq!(battle.current_turn(), SideId::Two);
    let (ash, _) = battle.into_characters();
    assert!(ash.bag().is_empty());
    assert_eq!(ash.team()[0].current_hp(), 60);
}

#[test]
fn revive_targets_first_fainted_member() {
    let mut down = make_mon("Down", Type::Normal, 100, nudge());
    down.take_damage(100);
    let mut one = trainer_with("Ash", vec![make_mon("Up", Type::Normal, 100, nudge()), down]);
    one.add_item(Item::revive());
    let two = trainer_with("Gary", vec![make_mon("C", Type::Normal, 100, nudge())]);
    let mut battle = Battle::normal(one, two, 1).unwrap();
    battle.start_battle();
    assert!(battle.use_item(0));
    assert_eq!(battle.team(SideId::One)[1].current_hp(), 50);
}

#[test]
fn sleeping_attacker_cannot_move() {
    let mut sleeper = make_mon("Sleeper", Type::Normal, 100, nudge());
    sleeper.add_status(Status::Sleep);
    let one = trainer_with("Ash", vec![sleeper, make_mon("Backup", Type::Normal, 100, nudge())]);
    let two = trainer_with("Gary", vec![make_mon("C", Type::Normal, 100, nudge())]);
    let mut battle = Battle::normal(one, two, 1).unwrap();
    battle.start_battle();
    assert!(!battle.execute_attack(0));
    assert_eq!(battle.current_turn(), SideId::One);
    assert!(logged(&battle, "|cant|p1a: Sleeper|slp"));
    assert!(battle.play_turn());
    assert_eq!(battle.active_pokemon(SideId::One).name, "Backup");
}

#[test]
fn survival_counts_defeats_and_forbids_items() {
    let one = trainer_with(
        "Ash",
        (0..6).map(|i| make_mon(&format!("H{i}"), Type::Normal, 120, strike())).collect(),
    );
    let mut two = trainer_with("Gary", (0..6).map(|i| frail(&format!("F{i}"))).collect());
    two.add_item(Item::potion());
    let mut battle = Battle::survival(one, two, 5).unwrap();
    assert!(battle.battle_bag(SideId::Two).is_empty());
    battle.start_battle();
    assert!(battle.execute_attack(0));
    assert_eq!(battle.defeated_count(SideId::Two), Some(1));
    assert_eq!(battle.defeated_count(SideId::One), Some(0));
    assert!(!battle.use_item_on(0, 0));
    let (_, gary) = battle.into_characters();
    assert_eq!(gary.bag().len(), 1);
}

#[test]
fn survival_item_use_leaves_hp_and_turn_alone() {
    let mut hurt = make_mon("Hurt0", Type::Normal, 100, nudge());
    hurt.set_current_hp(30);
    let mut team = vec![hurt];
    team.extend((1..6).map(|i| make_mon(&format!("Hurt{i}"), Type::Normal, 100, nudge())));
    let mut one = trainer_with("Ash", team);
    one.add_item(Item::potion());
    one.add_item(Item::revive());
    let two = trainer_with(
        "Gary",
        (0..6).map(|i| make_mon(&format!("G{i}"), Type::Normal, 100, nudge())).collect(),
    );
    let mut battle = Battle::survival(one, two, 2).unwrap();
    assert!(!battle.add_item_to_bag(SideId::One, Item::potion()));
    battle.start_battle();
    for attempt in 0..2 {
        assert!(!battle.use_item(attempt));
        assert!(!battle.use_item_on(attempt, 0));
    }
    assert_eq!(battle.active_pokemon(SideId::One).current_hp(), 30);
    assert_eq!(battle.current_turn(), SideId::One);
    let (ash, _) = battle.into_characters();
    assert_eq!(ash.bag().len(), 2);
}

#[test]
fn survival_teams_can_be_replaced_before_start() {
    let team = |prefix: &str| -> Vec<Pokemon> {
        (0..6).map(|i| make_mon(&format!("{prefix}{i}"), Type::Normal, 100, nudge())).collect()
    };
    let mut battle = Battle::survival(
        trainer_with("Ash", team("A")),
        trainer_with("Gary", team("G")),
        0,
    )
    .unwrap();
    assert!(battle.set_teams(team("X")[..5].to_vec(), team("Y")).is_err());
    battle.set_teams(team("X"), team("Y")).unwrap();
    assert_eq!(battle.active_pokemon(SideId::One).name, "X0");
    battle.start_battle();
    assert!(battle.set_teams(team("X"), team("Y")).is_err());
}

#[test]
fn machine_battles_are_reproducible() {
    let build = || {
        let mut one = Character::machine("Bot1", AiTier::Adaptive);
        let mut two = Character::machine("Bot2", AiTier::Defensive);
        for (i, t) in [Type::Fire, Type::Water, Type::Grass].into_iter().enumerate() {
            one.add_pokemon(make_mon(&format!("O{i}"), t, 90, Movement::special("Blast", 60, 90, 20).with_type(t)));
            two.add_pokemon(make_mon(&format!("T{i}"), t, 90, Movement::physical("Slam", 70, 85, 20).with_type(t)));
        }
        one.add_item(Item::super_potion());
        Battle::normal(one, two, 42).unwrap()
    };
    let mut first = build();
    let mut second = build();
    let result = first.play_out(DEFAULT_MAX_TURNS);
    assert_eq!(result, second.play_out(DEFAULT_MAX_TURNS));
    assert_eq!(first.logger().log_lines(), second.logger().log_lines());
    assert!(first.is_battle_ended());
}

#[test]
fn turn_cap_declares_a_draw() {
    let mut sleeper_a = make_mon("A", Type::Normal, 100, nudge());
    sleeper_a.add_status(Status::Sleep);
    let mut sleeper_b = make_mon("B", Type::Normal, 100, nudge());
    sleeper_b.add_status(Status::Freeze);
    let mut battle = Battle::normal(
        trainer_with("Ash", vec![sleeper_a]),
        trainer_with("Gary", vec![sleeper_b]),
        0,
    )
    .unwrap();
    assert_eq!(battle.play_out(20), BattleResult::Draw);
    assert!(battle.winner().is_none());
    assert!(logged(&battle, "|tie|"));
}
