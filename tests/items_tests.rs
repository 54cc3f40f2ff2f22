use poobkemon_battle::character::Character;
use poobkemon_battle::items::Item;
use poobkemon_battle::moves::Movement;
use poobkemon_battle::pokemon::{BaseStats, ModStat, Pokemon, Status};
use poobkemon_battle::types::Type;

fn make_mon(name: &str, hp: u32) -> Pokemon {
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
        Type::Water,
        None,
    )
    .with_moves([Movement::special("Bubble", 40, 100, 30)])
}

#[test]
fn bag_respects_capacity() {
    let mut trainer = Character::trainer("Misty");
    for _ in 0..15 {
        assert!(trainer.add_item(Item::potion()));
    }
    assert!(!trainer.add_item(Item::potion()));
    assert_eq!(trainer.max_item_count(), 15);
}

#[test]
fn character_use_item_consumes_only_when_applied() {
    let mut trainer = Character::trainer("Misty");
    trainer.add_pokemon(make_mon("Staryu", 100));
    trainer.add_item(Item::full_heal());
    assert!(!trainer.use_item(0, 0));
    assert_eq!(trainer.bag().len(), 1);

    trainer.team_mut()[0].add_status(Status::Poison);
    assert!(trainer.use_item(0, 0));
    assert!(trainer.bag().is_empty());
    assert!(!trainer.team()[0].has_any_status());
}

#[test]
fn hyper_potion_caps_at_max_hp() {
    let mut mon = make_mon("Psyduck", 150);
    mon.set_current_hp(10);
    assert!(Item::hyper_potion().use_on(Some(&mut mon)));
    assert_eq!(mon.current_hp(), 150);
    assert!(!Item::hyper_potion().use_on(Some(&mut mon)));
}

#[test]
fn revive_restores_half_and_ignores_standing_targets() {
    let mut mon = make_mon("Golduck", 120);
    assert!(!Item::revive().use_on(Some(&mut mon)));
    mon.take_damage(500);
    assert!(Item::revive().use_on(Some(&mut mon)));
    assert_eq!(mon.current_hp(), 60);
    assert!(!Item::revive().use_on(None));
}

#[test]
fn x_items_raise_a_stage() {
    let mut mon = make_mon("Starmie", 100);
    assert!(Item::x_speed().use_on(Some(&mut mon)));
    assert_eq!(mon.modifier(ModStat::Speed), 1);
    assert_eq!(Item::x_speed().effect_kind(), "boost_speed");
}
