use crate::ai::{self, Decision, SideView};
use crate::battle_logger::{battle_ident, BattleLogger};
use crate::character::{Character, MAX_TEAM_SIZE};
use crate::items::Item;
use crate::moves::{EffectEvent, Usability};
use crate::pokemon::{DamageRules, Pokemon};
use rand::rngs::SmallRng;
use rand::SeedableRng;

pub const DEFAULT_MAX_TURNS: u32 = 500;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BattleFormat {
    Normal,
    Survival,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormatRules {
    pub max_team_size: usize,
    pub exact_team_size: bool,
    pub items_allowed: bool,
    pub max_items_per_side: usize,
    pub track_defeats: bool,
}

const NORMAL_RULES: FormatRules = FormatRules {
    max_team_size: MAX_TEAM_SIZE,
    exact_team_size: false,
    items_allowed: true,
    max_items_per_side: 3,
    track_defeats: false,
};

const SURVIVAL_RULES: FormatRules = FormatRules {
    max_team_size: MAX_TEAM_SIZE,
    exact_team_size: true,
    items_allowed: false,
    max_items_per_side: 0,
    track_defeats: true,
};

impl BattleFormat {
    pub fn rules(self) -> &'static FormatRules {
        match self {
            BattleFormat::Normal => &NORMAL_RULES,
            BattleFormat::Survival => &SURVIVAL_RULES,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            BattleFormat::Normal => "normal",
            BattleFormat::Survival => "survival",
        }
    }

    pub fn parse(name: &str) -> Option<BattleFormat> {
        match name.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(BattleFormat::Normal),
            "survival" => Some(BattleFormat::Survival),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SideId {
    One,
    Two,
}

impl SideId {
    pub fn opponent(self) -> SideId {
        match self {
            SideId::One => SideId::Two,
            SideId::Two => SideId::One,
        }
    }

    pub fn index(self) -> usize {
        match self {
            SideId::One => 0,
            SideId::Two => 1,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BattlePhase {
    NotStarted,
    InProgress,
    Ended,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BattleResult {
    PlayerOneWins,
    PlayerTwoWins,
    Draw,
}

struct Side {
    character: Character,
    bag: Vec<Item>,
    active: usize,
    defeated: u32,
}

impl Side {
    fn active_pokemon(&self) -> &Pokemon {
        &self.character.team()[self.active]
    }
}

fn pair_mut(sides: &mut [Side; 2], side: SideId) -> (&mut Side, &mut Side) {
    let (first, second) = sides.split_at_mut(1);
    match side {
        SideId::One => (&mut first[0], &mut second[0]),
        SideId::Two => (&mut second[0], &mut first[0]),
    }
}

pub struct Battle {
    format: BattleFormat,
    sides: [Side; 2],
    turn: SideId,
    phase: BattlePhase,
    winner: Option<SideId>,
    turn_count: u32,
    rules: DamageRules,
    logger: BattleLogger,
    rng: SmallRng,
}

impl Battle {
    /// Takes both rosters for the length of the encounter. Each side draws its
    /// battle bag from the front of its character's bag.
    pub fn new(
        format: BattleFormat,
        player_one: Character,
        player_two: Character,
        seed: u64,
    ) -> anyhow::Result<Self> {
        let rules = format.rules();
        for player in [&player_one, &player_two] {
            validate_roster(format, player)?;
        }
        let side = |mut character: Character| -> Side {
            let bag = character.take_items(rules.max_items_per_side);
            let active = character.first_available().unwrap_or(0);
            Side {
                character,
                bag,
                active,
                defeated: 0,
            }
        };
        Ok(Battle {
            format,
            sides: [side(player_one), side(player_two)],
            turn: SideId::One,
            phase: BattlePhase::NotStarted,
            winner: None,
            turn_count: 0,
            rules: DamageRules::default(),
            logger: BattleLogger::new(format.id()),
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    pub fn normal(player_one: Character, player_two: Character, seed: u64) -> anyhow::Result<Self> {
        Battle::new(BattleFormat::Normal, player_one, player_two, seed)
    }

    pub fn survival(player_one: Character, player_two: Character, seed: u64) -> anyhow::Result<Self> {
        Battle::new(BattleFormat::Survival, player_one, player_two, seed)
    }

    pub fn with_damage_rules(mut self, rules: DamageRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn format(&self) -> BattleFormat {
        self.format
    }

    pub fn damage_rules(&self) -> &DamageRules {
        &self.rules
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is_battle_ended(&self) -> bool {
        self.phase == BattlePhase::Ended
    }

    pub fn current_turn(&self) -> SideId {
        self.turn
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn player(&self, side: SideId) -> &Character {
        &self.sides[side.index()].character
    }

    pub fn current_player(&self) -> &Character {
        self.player(self.turn)
    }

    pub fn opponent_player(&self) -> &Character {
        self.player(self.turn.opponent())
    }

    pub fn active_index(&self, side: SideId) -> usize {
        self.sides[side.index()].active
    }

    pub fn active_pokemon(&self, side: SideId) -> &Pokemon {
        self.sides[side.index()].active_pokemon()
    }

    pub fn current_pokemon(&self) -> &Pokemon {
        self.active_pokemon(self.turn)
    }

    pub fn opponent_pokemon(&self) -> &Pokemon {
        self.active_pokemon(self.turn.opponent())
    }

    pub fn team(&self, side: SideId) -> &[Pokemon] {
        self.sides[side.index()].character.team()
    }

    pub fn battle_bag(&self, side: SideId) -> &[Item] {
        &self.sides[side.index()].bag
    }

    pub fn can_use_items(&self) -> bool {
        self.format.rules().items_allowed
    }

    /// Fainted members per side; only survival battles keep count.
    pub fn defeated_count(&self, side: SideId) -> Option<u32> {
        self.format
            .rules()
            .track_defeats
            .then(|| self.sides[side.index()].defeated)
    }

    pub fn winner_side(&self) -> Option<SideId> {
        self.winner
    }

    pub fn winner(&self) -> Option<&Character> {
        self.winner.map(|side| self.player(side))
    }

    pub fn result(&self) -> Option<BattleResult> {
        if self.phase != BattlePhase::Ended {
            return None;
        }
        Some(match self.winner {
            Some(SideId::One) => BattleResult::PlayerOneWins,
            Some(SideId::Two) => BattleResult::PlayerTwoWins,
            None => BattleResult::Draw,
        })
    }

    pub fn logger(&self) -> &BattleLogger {
        &self.logger
    }

    pub fn side_view(&self, side: SideId) -> SideView<'_> {
        let state = &self.sides[side.index()];
        SideView {
            team: state.character.team(),
            active: state.active,
            bag: &state.bag,
            opponent: self.active_pokemon(side.opponent()),
            rules: self.rules,
            items_allowed: self.can_use_items(),
        }
    }

    /// Adds to a side's roster before the battle starts.
    pub fn add_pokemon_to_team(&mut self, side: SideId, pokemon: Pokemon) -> bool {
        if self.phase != BattlePhase::NotStarted {
            return false;
        }
        let state = &mut self.sides[side.index()];
        if state.character.team().len() >= self.format.rules().max_team_size {
            return false;
        }
        state.character.add_pokemon(pokemon)
    }

    pub fn add_item_to_bag(&mut self, side: SideId, item: Item) -> bool {
        let rules = self.format.rules();
        let state = &mut self.sides[side.index()];
        if !rules.items_allowed || state.bag.len() >= rules.max_items_per_side {
            return false;
        }
        state.bag.push(item);
        true
    }

    /// Replaces both rosters of a survival battle before it starts.
    pub fn set_teams(&mut self, team_one: Vec<Pokemon>, team_two: Vec<Pokemon>) -> anyhow::Result<()> {
        if self.phase != BattlePhase::NotStarted {
            anyhow::bail!("Teams can only be replaced before the battle starts");
        }
        let rules = self.format.rules();
        for team in [&team_one, &team_two] {
            if rules.exact_team_size && team.len() != rules.max_team_size {
                anyhow::bail!(
                    "Expected exactly {} Pokemon per team, got {}",
                    rules.max_team_size,
                    team.len()
                );
            }
            if !team.iter().any(Pokemon::is_available) {
                anyhow::bail!("Every team needs at least one Pokemon able to battle");
            }
        }
        for (state, team) in self.sides.iter_mut().zip([team_one, team_two]) {
            if !state.character.set_team(team) {
                anyhow::bail!("{} cannot carry that many Pokemon", state.character.name);
            }
            state.active = state.character.first_available().unwrap_or(0);
            state.defeated = 0;
        }
        Ok(())
    }

    pub fn start_battle(&mut self) -> bool {
        if self.phase != BattlePhase::NotStarted {
            return false;
        }
        self.phase = BattlePhase::InProgress;
        self.turn = SideId::One;
        self.turn_count = 1;
        for (idx, state) in self.sides.iter().enumerate() {
            self.logger.log_player(if idx == 0 { "p1" } else { "p2" }, &state.character.name);
        }
        self.logger.log_start();
        for (idx, state) in self.sides.iter().enumerate() {
            let active = state.active_pokemon();
            self.logger.log_switch(
                &battle_ident(idx, &active.name),
                &active.name,
                active.current_hp(),
                active.max_hp(),
            );
        }
        self.logger.log_turn(self.turn_count);
        log::info!(
            "{} battle started: {} vs {}",
            self.format.id(),
            self.sides[0].character.name,
            self.sides[1].character.name
        );
        true
    }

    fn accepts_actions(&self, action: &str) -> bool {
        if self.phase == BattlePhase::InProgress {
            return true;
        }
        log::debug!("rejecting {action}: battle is {:?}", self.phase);
        false
    }

    pub fn execute_attack(&mut self, move_index: usize) -> bool {
        if !self.accepts_actions("attack") {
            return false;
        }
        let side = self.turn;
        let foe = side.opponent();
        let (user_side, target_side) = pair_mut(&mut self.sides, side);
        let user_active = user_side.active;
        let target_active = target_side.active;
        let user = &mut user_side.character.team_mut()[user_active];
        let target = &mut target_side.character.team_mut()[target_active];
        if user.is_fainted() {
            log::debug!("rejecting attack: {} has fainted", user.name);
            return false;
        }
        let Some(mv) = user.move_at(move_index).cloned() else {
            log::debug!("rejecting attack: {} has no move #{move_index}", user.name);
            return false;
        };
        let user_ident = battle_ident(side.index(), &user.name);
        let target_ident = battle_ident(foe.index(), &target.name);

        match mv.usability(user, &mut self.rng) {
            Usability::Ready => {}
            Usability::PushedThrough => self.logger.log_activate(&user_ident, "par"),
            blocked => {
                let reason = match blocked {
                    Usability::OutOfPp => "nopp",
                    Usability::Immobilized(status) => status.id(),
                    _ => "par",
                };
                self.logger.log_cant(&user_ident, reason);
                log::debug!("{} cannot use {}: {reason}", user.name, mv.name);
                return false;
            }
        }

        if let Some(slot) = user.move_at_mut(move_index) {
            slot.use_pp();
        }
        self.logger.log_move(&user_ident, &mv.name, &target_ident);
        if mv.does_hit(&mut self.rng) {
            if mv.category.rules().deals_damage {
                let damage = user.calculate_damage(&mv, target, &self.rules, &mut self.rng);
                target.take_damage(damage);
                self.logger
                    .log_damage(&target_ident, target.current_hp(), target.max_hp());
            }
            if !target.is_fainted() {
                for event in mv.resolve_special_effect(user, target, &mut self.rng) {
                    log_effect(&mut self.logger, event, &mv.name, &user_ident, user, &target_ident);
                }
            }
        } else {
            self.logger.log_miss(&user_ident, &target_ident);
        }

        if target.is_fainted() {
            self.handle_faint(foe);
        }
        if self.phase == BattlePhase::InProgress {
            self.end_turn();
        }
        true
    }

    /// Uses a battle-bag item on its default target (revives pick the first fainted member).
    pub fn use_item(&mut self, item_index: usize) -> bool {
        let state = &self.sides[self.turn.index()];
        let Some(target) = state
            .bag
            .get(item_index)
            .and_then(|item| item.default_target(state.character.team(), state.active))
        else {
            return false;
        };
        self.use_item_on(item_index, target)
    }

    pub fn use_item_on(&mut self, item_index: usize, target: usize) -> bool {
        if !self.accepts_actions("item") {
            return false;
        }
        if !self.can_use_items() {
            log::debug!("rejecting item: {} battles forbid items", self.format.id());
            return false;
        }
        let side = self.turn;
        let state = &mut self.sides[side.index()];
        let Some(item) = state.bag.get(item_index) else {
            return false;
        };
        let Some(pokemon) = state.character.team_mut().get_mut(target) else {
            return false;
        };
        if !item.can_use_on(Some(&*pokemon)) {
            log::debug!("rejecting item: {} has no effect on {}", item.name, pokemon.name);
            return false;
        }
        item.apply_effect(pokemon);
        let ident = battle_ident(side.index(), &pokemon.name);
        let (hp, max_hp) = (pokemon.current_hp(), pokemon.max_hp());
        let item = state.bag.remove(item_index);
        self.logger.log_item(&ident, &item.name);
        if item.is_healing() || item.is_revive() {
            self.logger.log_heal(&ident, hp, max_hp);
        }
        self.end_turn();
        true
    }

    pub fn switch_pokemon(&mut self, team_index: usize) -> bool {
        if !self.accepts_actions("switch") {
            return false;
        }
        let side = self.turn;
        let state = &mut self.sides[side.index()];
        let Some(pokemon) = state.character.team().get(team_index) else {
            return false;
        };
        if pokemon.is_fainted() || team_index == state.active {
            log::debug!("rejecting switch to {}", pokemon.name);
            return false;
        }
        self.logger.log_switch(
            &battle_ident(side.index(), &pokemon.name),
            &pokemon.name,
            pokemon.current_hp(),
            pokemon.max_hp(),
        );
        state.active = team_index;
        self.end_turn();
        true
    }

    /// Forfeits the acting side's action.
    pub fn skip_turn(&mut self) -> bool {
        if !self.accepts_actions("skip") {
            return false;
        }
        let ident = battle_ident(self.turn.index(), &self.current_pokemon().name);
        self.logger.log_cant(&ident, "nothing");
        self.end_turn();
        true
    }

    pub fn apply(&mut self, decision: Decision) -> bool {
        match decision {
            Decision::Attack(idx) => self.execute_attack(idx),
            Decision::UseItem { item, target } => self.use_item_on(item, target),
            Decision::Switch(idx) => self.switch_pokemon(idx),
        }
    }

    pub fn check_win_condition(&mut self) -> bool {
        if self.phase == BattlePhase::Ended {
            return true;
        }
        let one = self.sides[0].character.has_available_pokemon();
        let two = self.sides[1].character.has_available_pokemon();
        match (one, two) {
            (true, true) => false,
            (false, false) => {
                self.end(None);
                true
            }
            (true, false) => {
                self.end(Some(SideId::One));
                true
            }
            (false, true) => {
                self.end(Some(SideId::Two));
                true
            }
        }
    }

    fn end(&mut self, winner: Option<SideId>) {
        self.phase = BattlePhase::Ended;
        self.winner = winner;
        match winner {
            Some(side) => {
                let name = &self.sides[side.index()].character.name;
                self.logger.log_win(name);
                log::info!("{name} wins after {} turns", self.turn_count);
            }
            None => {
                self.logger.log_tie();
                log::info!("battle ended in a draw after {} turns", self.turn_count);
            }
        }
    }

    fn end_turn(&mut self) {
        self.turn = self.turn.opponent();
        self.turn_count += 1;
        self.logger.log_turn(self.turn_count);
    }

    fn handle_faint(&mut self, side: SideId) {
        let track_defeats = self.format.rules().track_defeats;
        let state = &mut self.sides[side.index()];
        let fallen = battle_ident(side.index(), &state.active_pokemon().name);
        self.logger.log_faint(&fallen);
        if track_defeats {
            state.defeated += 1;
        }
        match state.character.first_available() {
            Some(next) => {
                state.active = next;
                let pokemon = state.active_pokemon();
                self.logger.log_switch(
                    &battle_ident(side.index(), &pokemon.name),
                    &pokemon.name,
                    pokemon.current_hp(),
                    pokemon.max_hp(),
                );
            }
            None => {
                self.check_win_condition();
            }
        }
    }

    /// What the acting side would do right now. Humans fall back to their placeholder pick.
    pub fn decide_current(&self) -> Option<Decision> {
        let view = self.side_view(self.turn);
        let player = self.current_player();
        player.make_decision(&view).or_else(|| {
            if player.is_machine() {
                return None;
            }
            player
                .choose_move(view.active_pokemon())
                .map(Decision::Attack)
        })
    }

    /// Plays one action for whichever side is acting; a side with nothing legal loses its turn.
    pub fn play_turn(&mut self) -> bool {
        if self.phase != BattlePhase::InProgress {
            return false;
        }
        let decision = self.decide_current();
        let fallback = ai::fallback(&self.side_view(self.turn));
        if let Some(decision) = decision {
            if self.apply(decision) {
                return true;
            }
        }
        if let Some(fallback) = fallback.filter(|f| Some(*f) != decision) {
            if self.apply(fallback) {
                return true;
            }
        }
        self.skip_turn()
    }

    /// Drives the battle to completion; hitting `max_turns` ends it as a draw.
    pub fn play_out(&mut self, max_turns: u32) -> BattleResult {
        self.start_battle();
        while self.phase == BattlePhase::InProgress && self.turn_count <= max_turns {
            if self.check_win_condition() {
                break;
            }
            self.play_turn();
        }
        if self.phase == BattlePhase::InProgress {
            self.end(None);
        }
        self.result().unwrap_or(BattleResult::Draw)
    }

    /// Hands both characters back with unused battle items returned to their bags.
    pub fn into_characters(self) -> (Character, Character) {
        let [one, two] = self.sides;
        let restore = |mut side: Side| {
            side.character.return_items(side.bag);
            side.character
        };
        (restore(one), restore(two))
    }
}

fn validate_roster(format: BattleFormat, player: &Character) -> anyhow::Result<()> {
    let rules = format.rules();
    let size = player.team().len();
    if size == 0 {
        anyhow::bail!("{} has no Pokemon", player.name);
    }
    if size > rules.max_team_size {
        anyhow::bail!(
            "{} brings {size} Pokemon; {} battles allow at most {}",
            player.name,
            format.id(),
            rules.max_team_size
        );
    }
    if rules.exact_team_size && size != rules.max_team_size {
        anyhow::bail!(
            "{} battles need exactly {} Pokemon per side, {} has {size}",
            format.id(),
            rules.max_team_size,
            player.name
        );
    }
    if !player.has_available_pokemon() {
        anyhow::bail!("{} has no Pokemon able to battle", player.name);
    }
    Ok(())
}

fn log_effect(
    logger: &mut BattleLogger,
    event: EffectEvent,
    move_name: &str,
    user_ident: &str,
    user: &Pokemon,
    target_ident: &str,
) {
    match event {
        EffectEvent::StatChanged {
            on_user,
            stat,
            change,
        } => {
            let ident = if on_user { user_ident } else { target_ident };
            logger.log_boost(ident, stat.id(), change);
        }
        EffectEvent::StatusInflicted(status) => logger.log_status(target_ident, status.id()),
        EffectEvent::Healed(_) => logger.log_heal(user_ident, user.current_hp(), user.max_hp()),
        EffectEvent::Cured => logger.log_cure_status(user_ident),
        EffectEvent::Generic => logger.log_activate(user_ident, &format!("move: {move_name}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiTier;
    use crate::moves::Movement;
    use crate::pokemon::BaseStats;
    use crate::types::Type;

    fn mk_pokemon(name: &str) -> Pokemon {
        Pokemon::new(
            name,
            BaseStats {
                hp: 100,
                attack: 80,
                defence: 80,
                speed: 80,
                special_attack: 80,
                special_defence: 80,
            },
            Type::Normal,
            None,
        )
        .with_moves([Movement::physical("Tackle", 40, 100, 35)])
    }

    fn roster(name: &str, size: usize) -> Character {
        let mut trainer = Character::trainer(name);
        for i in 0..size {
            trainer.add_pokemon(mk_pokemon(&format!("{name}{i}")));
        }
        trainer
    }

    #[test]
    fn rejects_empty_and_oversized_setups() {
        assert!(Battle::normal(roster("A", 0), roster("B", 1), 0).is_err());
        assert!(Battle::survival(roster("A", 5), roster("B", 6), 0).is_err());
        assert!(Battle::survival(roster("A", 6), roster("B", 6), 0).is_ok());
    }

    #[test]
    fn actions_wait_for_start() {
        let mut battle = Battle::normal(roster("A", 1), roster("B", 1), 0).unwrap();
        assert!(!battle.execute_attack(0));
        assert!(battle.start_battle());
        assert!(!battle.start_battle());
        assert!(battle.execute_attack(0));
        assert_eq!(battle.current_turn(), SideId::Two);
    }

    #[test]
    fn battle_bag_draws_at_most_three_and_returns_leftovers() {
        let mut trainer = roster("A", 1);
        for _ in 0..5 {
            trainer.add_item(Item::potion());
        }
        let battle = Battle::normal(trainer, roster("B", 1), 0).unwrap();
        assert_eq!(battle.battle_bag(SideId::One).len(), 3);
        let (trainer, _) = battle.into_characters();
        assert_eq!(trainer.bag().len(), 5);
    }

    #[test]
    fn survival_disallows_items_and_counts_defeats() {
        let mut battle = Battle::survival(roster("A", 6), roster("B", 6), 0).unwrap();
        assert!(!battle.add_item_to_bag(SideId::One, Item::potion()));
        assert_eq!(battle.defeated_count(SideId::Two), Some(0));
        let normal = Battle::normal(roster("A", 1), roster("B", 1), 0).unwrap();
        assert_eq!(normal.defeated_count(SideId::One), None);
        battle.start_battle();
        assert!(!battle.use_item_on(0, 0));
    }

    #[test]
    fn survival_rejects_items_even_when_one_is_carried() {
        let mut battle = Battle::survival(roster("A", 6), roster("B", 6), 0).unwrap();
        battle.sides[0].character.team_mut()[0].set_current_hp(40);
        battle.sides[0].bag.push(Item::potion());
        battle.start_battle();
        assert!(!battle.use_item(0));
        assert!(!battle.use_item_on(0, 0));
        assert_eq!(battle.current_pokemon().current_hp(), 40);
        assert_eq!(battle.current_turn(), SideId::One);
        assert_eq!(battle.battle_bag(SideId::One).len(), 1);
    }

    #[test]
    fn both_rosters_down_is_a_draw() {
        let mut battle = Battle::normal(roster("A", 2), roster("B", 1), 0).unwrap();
        battle.start_battle();
        assert!(!battle.check_win_condition());
        for side in battle.sides.iter_mut() {
            for pokemon in side.character.team_mut() {
                pokemon.take_damage(pokemon.max_hp());
            }
        }
        assert!(battle.check_win_condition());
        assert!(battle.winner().is_none());
        assert_eq!(battle.result(), Some(BattleResult::Draw));
        assert!(battle.logger().log_lines().iter().any(|line| line == "|tie|"));
    }

    #[test]
    fn machines_finish_a_battle() {
        let mut one = Character::machine("Bot1", AiTier::Offensive);
        let mut two = Character::machine("Bot2", AiTier::Expert);
        for i in 0..3 {
            one.add_pokemon(mk_pokemon(&format!("X{i}")));
            two.add_pokemon(mk_pokemon(&format!("Y{i}")));
        }
        let mut battle = Battle::normal(one, two, 11).unwrap();
        let result = battle.play_out(DEFAULT_MAX_TURNS);
        assert!(battle.is_battle_ended());
        assert_eq!(battle.result(), Some(result));
    }
}
