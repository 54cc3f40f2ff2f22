use crate::moves::{MoveCategory, Movement};
use crate::types::Type;
use rand::Rng;
use std::collections::BTreeSet;

pub const MAX_MOVES: usize = 4;
pub const DEFAULT_LEVEL: u8 = 50;
pub const MAX_STAGE: i8 = 6;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Status {
    Burn,
    Freeze,
    Paralysis,
    Poison,
    Sleep,
}

impl Status {
    pub fn id(self) -> &'static str {
        match self {
            Status::Burn => "brn",
            Status::Freeze => "frz",
            Status::Paralysis => "par",
            Status::Poison => "psn",
            Status::Sleep => "slp",
        }
    }

    /// Conditions that stop every move outright.
    pub fn immobilizes(self) -> bool {
        matches!(self, Status::Sleep | Status::Freeze)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ModStat {
    Attack,
    Defence,
    SpecialAttack,
    SpecialDefence,
    Speed,
    Accuracy,
    Evasion,
}

impl ModStat {
    pub const ALL: [ModStat; 7] = [
        ModStat::Attack,
        ModStat::Defence,
        ModStat::SpecialAttack,
        ModStat::SpecialDefence,
        ModStat::Speed,
        ModStat::Accuracy,
        ModStat::Evasion,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn id(self) -> &'static str {
        match self {
            ModStat::Attack => "atk",
            ModStat::Defence => "def",
            ModStat::SpecialAttack => "spa",
            ModStat::SpecialDefence => "spd",
            ModStat::Speed => "spe",
            ModStat::Accuracy => "accuracy",
            ModStat::Evasion => "evasion",
        }
    }
}

/// Temporary stat stages, each clamped to [-6, +6].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StatModifiers([i8; 7]);

impl StatModifiers {
    pub fn get(&self, stat: ModStat) -> i8 {
        self.0[stat.index()]
    }

    /// Applies `delta` and returns the stage change that actually happened.
    pub fn apply(&mut self, stat: ModStat, delta: i8) -> i8 {
        let slot = &mut self.0[stat.index()];
        let before = *slot;
        *slot = before.saturating_add(delta).clamp(-MAX_STAGE, MAX_STAGE);
        *slot - before
    }

    pub fn clear(&mut self) {
        self.0 = [0; 7];
    }

    pub fn is_neutral(&self) -> bool {
        self.0.iter().all(|stage| *stage == 0)
    }
}

pub fn stage_multiplier(stage: i8) -> f64 {
    let stage = stage.clamp(-MAX_STAGE, MAX_STAGE) as f64;
    if stage >= 0.0 {
        (2.0 + stage) / 2.0
    } else {
        2.0 / (2.0 - stage)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defence: u32,
    pub speed: u32,
    pub special_attack: u32,
    pub special_defence: u32,
}

impl BaseStats {
    fn scaled(self, factor: f64) -> BaseStats {
        let scale = |value: u32| (value as f64 * factor) as u32;
        BaseStats {
            hp: scale(self.hp),
            attack: scale(self.attack),
            defence: scale(self.defence),
            speed: scale(self.speed),
            special_attack: scale(self.special_attack),
            special_defence: scale(self.special_defence),
        }
    }
}

/// Which type a move attacks with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TypeSource {
    /// The move's own type tag, falling back to the user's primary type.
    MoveTag,
    /// Always the user's primary type.
    UserPrimary,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StabRule {
    /// x1.5 when the attacking type is one of the user's types.
    TypeMatch,
    /// x1.5 on every damaging move.
    Always,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DamageRules {
    pub type_source: TypeSource,
    pub stab: StabRule,
}

impl Default for DamageRules {
    fn default() -> Self {
        DamageRules {
            type_source: TypeSource::MoveTag,
            stab: StabRule::TypeMatch,
        }
    }
}

impl DamageRules {
    /// Primary-type effectiveness and unconditional STAB.
    pub fn legacy() -> Self {
        DamageRules {
            type_source: TypeSource::UserPrimary,
            stab: StabRule::Always,
        }
    }

    pub fn attack_type(&self, mv: &Movement, user: &Pokemon) -> Type {
        match self.type_source {
            TypeSource::MoveTag => mv.move_type().unwrap_or(user.primary_type),
            TypeSource::UserPrimary => user.primary_type,
        }
    }

    pub fn effectiveness(&self, mv: &Movement, user: &Pokemon, defender: &Pokemon) -> f64 {
        self.attack_type(mv, user)
            .against(defender.primary_type, defender.secondary_type)
    }

    pub fn has_stab(&self, mv: &Movement, user: &Pokemon) -> bool {
        match self.stab {
            StabRule::Always => true,
            StabRule::TypeMatch => user.has_type(self.attack_type(mv, user)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Pokemon {
    pub name: String,
    pub description: String,
    pub level: u8,
    pub stats: BaseStats,
    pub primary_type: Type,
    pub secondary_type: Option<Type>,
    current_hp: u32,
    moves: Vec<Movement>,
    modifiers: StatModifiers,
    status: BTreeSet<Status>,
}

impl Pokemon {
    pub fn new(
        name: impl Into<String>,
        stats: BaseStats,
        primary_type: Type,
        secondary_type: Option<Type>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            level: DEFAULT_LEVEL,
            current_hp: stats.hp,
            stats,
            primary_type,
            secondary_type,
            moves: Vec::new(),
            modifiers: StatModifiers::default(),
            status: BTreeSet::new(),
        }
    }

    /// Builds a combatant whose stats are scaled from their level-50 values.
    pub fn with_level(
        name: impl Into<String>,
        stats: BaseStats,
        primary_type: Type,
        secondary_type: Option<Type>,
        level: u8,
    ) -> Self {
        let mut pokemon = Pokemon::new(name, stats, primary_type, secondary_type);
        pokemon.set_level(level);
        pokemon
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_moves(mut self, moves: impl IntoIterator<Item = Movement>) -> Self {
        for mv in moves {
            self.add_move(mv);
        }
        self
    }

    /// Rescales stats proportionally to the level change and refills HP.
    pub fn set_level(&mut self, level: u8) {
        let level = level.clamp(1, 100);
        let factor = level as f64 / self.level.max(1) as f64;
        self.level = level;
        self.stats = self.stats.scaled(factor);
        self.current_hp = self.stats.hp;
    }

    pub fn max_hp(&self) -> u32 {
        self.stats.hp
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    /// Clamps to [0, max]; reaching 0 applies fainting.
    pub fn set_current_hp(&mut self, hp: u32) {
        self.current_hp = hp.min(self.stats.hp);
        if self.current_hp == 0 {
            self.on_faint();
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn is_available(&self) -> bool {
        !self.is_fainted()
    }

    pub fn hp_fraction(&self) -> f64 {
        if self.stats.hp == 0 {
            return 0.0;
        }
        self.current_hp as f64 / self.stats.hp as f64
    }

    pub fn is_healthy(&self) -> bool {
        self.hp_fraction() > 0.5
    }

    pub fn is_critically_injured(&self) -> bool {
        self.hp_fraction() < 0.25
    }

    pub fn has_type(&self, t: Type) -> bool {
        self.primary_type == t || self.secondary_type == Some(t)
    }

    pub fn moves(&self) -> &[Movement] {
        &self.moves
    }

    pub fn move_at(&self, index: usize) -> Option<&Movement> {
        self.moves.get(index)
    }

    pub fn move_at_mut(&mut self, index: usize) -> Option<&mut Movement> {
        self.moves.get_mut(index)
    }

    pub fn add_move(&mut self, mv: Movement) -> bool {
        if self.moves.len() >= MAX_MOVES {
            return false;
        }
        self.moves.push(mv);
        true
    }

    /// Swaps in `mv` at `index`, handing back the forgotten move.
    pub fn replace_move(&mut self, index: usize, mv: Movement) -> Option<Movement> {
        let slot = self.moves.get_mut(index)?;
        Some(std::mem::replace(slot, mv))
    }

    pub fn restore_all_pp(&mut self) {
        for mv in &mut self.moves {
            mv.restore_pp();
        }
    }

    pub fn modifiers(&self) -> &StatModifiers {
        &self.modifiers
    }

    pub fn modifier(&self, stat: ModStat) -> i8 {
        self.modifiers.get(stat)
    }

    pub fn modify_stat(&mut self, stat: ModStat, delta: i8) -> i8 {
        self.modifiers.apply(stat, delta)
    }

    pub fn clear_modifiers(&mut self) {
        self.modifiers.clear();
    }

    fn modified(&self, base: u32, stat: ModStat) -> u32 {
        (base as f64 * stage_multiplier(self.modifiers.get(stat))) as u32
    }

    pub fn modified_attack(&self) -> u32 {
        self.modified(self.stats.attack, ModStat::Attack)
    }

    pub fn modified_defence(&self) -> u32 {
        self.modified(self.stats.defence, ModStat::Defence)
    }

    pub fn modified_special_attack(&self) -> u32 {
        self.modified(self.stats.special_attack, ModStat::SpecialAttack)
    }

    pub fn modified_special_defence(&self) -> u32 {
        self.modified(self.stats.special_defence, ModStat::SpecialDefence)
    }

    pub fn modified_speed(&self) -> u32 {
        self.modified(self.stats.speed, ModStat::Speed)
    }

    pub fn statuses(&self) -> impl Iterator<Item = Status> + '_ {
        self.status.iter().copied()
    }

    pub fn has_status(&self, status: Status) -> bool {
        self.status.contains(&status)
    }

    pub fn has_any_status(&self) -> bool {
        !self.status.is_empty()
    }

    pub fn is_immobilized(&self) -> bool {
        self.status.iter().any(|s| s.immobilizes())
    }

    /// Fainted combatants cannot pick up conditions.
    pub fn add_status(&mut self, status: Status) -> bool {
        if self.is_fainted() {
            return false;
        }
        self.status.insert(status)
    }

    pub fn remove_status(&mut self, status: Status) -> bool {
        self.status.remove(&status)
    }

    pub fn clear_status(&mut self) {
        self.status.clear();
    }

    pub fn reset_battle_state(&mut self) {
        self.clear_modifiers();
        self.clear_status();
    }

    pub fn calculate_damage<R: Rng + ?Sized>(
        &self,
        mv: &Movement,
        defender: &Pokemon,
        rules: &DamageRules,
        rng: &mut R,
    ) -> u32 {
        if mv.power == 0 {
            return 0;
        }
        let (attack, defence) = match mv.category {
            MoveCategory::Physical => (self.modified_attack(), defender.modified_defence()),
            MoveCategory::Special => (
                self.modified_special_attack(),
                defender.modified_special_defence(),
            ),
            MoveCategory::Status => return 0,
        };
        let level = self.level as f64;
        let mut damage = ((2.0 * level + 10.0) / 250.0)
            * (attack as f64 / defence.max(1) as f64)
            * mv.power as f64
            + 2.0;
        damage *= rules.effectiveness(mv, self, defender);
        if rules.has_stab(mv, self) {
            damage *= 1.5;
        }
        damage *= rng.gen_range(0.85..1.0);
        if mv.category.rules().burn_halves && self.has_status(Status::Burn) {
            damage *= 0.5;
        }
        (damage as u32).max(1)
    }

    /// Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_sub(amount);
        if self.current_hp == 0 && before > 0 {
            self.on_faint();
        }
        before - self.current_hp
    }

    fn on_faint(&mut self) {
        self.status.clear();
        self.modifiers.clear();
    }

    /// Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.stats.hp);
        self.current_hp - before
    }

    pub fn heal_fraction(&mut self, fraction: f64) -> u32 {
        let amount = (self.stats.hp as f64 * fraction.clamp(0.0, 1.0)) as u32;
        self.heal(amount)
    }

    pub fn full_heal(&mut self) -> u32 {
        self.heal(self.stats.hp)
    }

    /// Brings a fainted combatant back at `fraction` of max HP; no-op otherwise.
    pub fn revive(&mut self, fraction: f64) -> bool {
        if !self.is_fainted() {
            return false;
        }
        self.current_hp = (self.stats.hp as f64 * fraction.clamp(0.0, 1.0)) as u32;
        self.status.clear();
        true
    }
}
