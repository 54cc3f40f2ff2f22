use crate::effects::{self, MoveEffect};
use crate::pokemon::{ModStat, Pokemon, Status};
use crate::types::Type;
use rand::Rng;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Per-category behaviour knobs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryRules {
    pub deals_damage: bool,
    /// Chance that paralysis stops the move.
    pub paralysis_block_chance: f64,
    /// Chance that a paralyzed user visibly pushes through.
    pub paralysis_flavor_chance: f64,
    /// Whether identified effects wait on the side-effect roll.
    pub effect_needs_roll: bool,
    /// Chance of a no-op "generic effect" event for unidentified moves, after a successful roll.
    pub generic_effect_chance: f64,
    pub burn_halves: bool,
}

const PHYSICAL_RULES: CategoryRules = CategoryRules {
    deals_damage: true,
    paralysis_block_chance: 0.25,
    paralysis_flavor_chance: 0.0,
    effect_needs_roll: true,
    generic_effect_chance: 0.10,
    burn_halves: true,
};

const SPECIAL_RULES: CategoryRules = CategoryRules {
    deals_damage: true,
    paralysis_block_chance: 0.0,
    paralysis_flavor_chance: 0.10,
    effect_needs_roll: true,
    generic_effect_chance: 0.10,
    burn_halves: false,
};

const STATUS_RULES: CategoryRules = CategoryRules {
    deals_damage: false,
    paralysis_block_chance: 0.15,
    paralysis_flavor_chance: 0.0,
    effect_needs_roll: false,
    generic_effect_chance: 1.0,
    burn_halves: false,
};

impl MoveCategory {
    pub fn rules(self) -> &'static CategoryRules {
        match self {
            MoveCategory::Physical => &PHYSICAL_RULES,
            MoveCategory::Special => &SPECIAL_RULES,
            MoveCategory::Status => &STATUS_RULES,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            MoveCategory::Physical => "physical",
            MoveCategory::Special => "special",
            MoveCategory::Status => "status",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Usability {
    Ready,
    /// Paralyzed but acted anyway.
    PushedThrough,
    OutOfPp,
    Immobilized(Status),
    FullyParalyzed,
}

impl Usability {
    pub fn is_usable(self) -> bool {
        matches!(self, Usability::Ready | Usability::PushedThrough)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectEvent {
    StatChanged {
        on_user: bool,
        stat: ModStat,
        change: i8,
    },
    StatusInflicted(Status),
    Healed(u32),
    Cured,
    /// Visible flourish with no state change.
    Generic,
}

#[derive(Clone, Debug)]
pub struct Movement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: MoveCategory,
    pub power: u32,
    pub accuracy: u32,
    pub side_effect: f64,
    pub priority: i8,
    move_type: Option<Type>,
    pp: u32,
    max_pp: u32,
    effect: Option<MoveEffect>,
}

impl Movement {
    pub fn new(
        name: impl Into<String>,
        category: MoveCategory,
        power: u32,
        accuracy: u32,
        pp: u32,
    ) -> Self {
        let name = name.into();
        let id = effects::normalize_move_id(&name);
        let effect = effects::lookup(&id);
        Self {
            id,
            name,
            description: String::new(),
            category,
            power: if category.rules().deals_damage { power } else { 0 },
            accuracy: accuracy.min(100),
            side_effect: 0.0,
            priority: 0,
            move_type: None,
            pp,
            max_pp: pp,
            effect,
        }
    }

    pub fn physical(name: impl Into<String>, power: u32, accuracy: u32, pp: u32) -> Self {
        Movement::new(name, MoveCategory::Physical, power, accuracy, pp)
    }

    pub fn special(name: impl Into<String>, power: u32, accuracy: u32, pp: u32) -> Self {
        Movement::new(name, MoveCategory::Special, power, accuracy, pp)
    }

    pub fn status(name: impl Into<String>, accuracy: u32, pp: u32) -> Self {
        Movement::new(name, MoveCategory::Status, 0, accuracy, pp)
    }

    pub fn with_type(mut self, move_type: Type) -> Self {
        self.move_type = Some(move_type);
        self
    }

    pub fn with_side_effect(mut self, chance: f64) -> Self {
        self.side_effect = chance.clamp(0.0, 1.0);
        self
    }

    pub fn with_priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Overrides the effect resolved from the move id.
    pub fn with_effect(mut self, effect: Option<MoveEffect>) -> Self {
        self.effect = effect;
        self
    }

    pub fn move_type(&self) -> Option<Type> {
        self.move_type
    }

    pub fn effect(&self) -> Option<MoveEffect> {
        self.effect
    }

    pub fn pp(&self) -> u32 {
        self.pp
    }

    pub fn max_pp(&self) -> u32 {
        self.max_pp
    }

    pub fn has_pp(&self) -> bool {
        self.pp > 0
    }

    pub fn use_pp(&mut self) -> bool {
        if self.pp == 0 {
            return false;
        }
        self.pp -= 1;
        true
    }

    pub fn restore_pp(&mut self) {
        self.pp = self.max_pp;
    }

    pub fn restore_pp_by(&mut self, amount: u32) {
        self.pp = self.pp.saturating_add(amount).min(self.max_pp);
    }

    pub fn is_healing_move(&self) -> bool {
        self.effect.is_some_and(MoveEffect::is_healing)
    }

    pub fn is_boosting_move(&self) -> bool {
        self.effect.is_some_and(MoveEffect::is_boosting)
    }

    pub fn is_debuffing_move(&self) -> bool {
        self.effect.is_some_and(MoveEffect::is_debuffing)
    }

    pub fn causes_status_condition(&self) -> bool {
        self.effect.is_some_and(MoveEffect::inflicts_status)
    }

    pub fn does_hit<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_range(1..=100) <= self.accuracy
    }

    pub fn triggers_side_effect<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        self.side_effect > 0.0 && rng.gen::<f64>() < self.side_effect
    }

    pub fn usability<R: Rng + ?Sized>(&self, user: &Pokemon, rng: &mut R) -> Usability {
        if !self.has_pp() {
            return Usability::OutOfPp;
        }
        if let Some(status) = user.statuses().find(|s| s.immobilizes()) {
            return Usability::Immobilized(status);
        }
        if user.has_status(Status::Paralysis) {
            let rules = self.category.rules();
            if rules.paralysis_block_chance > 0.0 && rng.gen::<f64>() < rules.paralysis_block_chance {
                return Usability::FullyParalyzed;
            }
            if rules.paralysis_flavor_chance > 0.0 && rng.gen::<f64>() < rules.paralysis_flavor_chance {
                return Usability::PushedThrough;
            }
        }
        Usability::Ready
    }

    pub fn can_be_used<R: Rng + ?Sized>(&self, user: &Pokemon, rng: &mut R) -> bool {
        self.usability(user, rng).is_usable()
    }

    /// Resolves this move's secondary or primary effect and reports what changed.
    pub fn resolve_special_effect<R: Rng + ?Sized>(
        &self,
        user: &mut Pokemon,
        target: &mut Pokemon,
        rng: &mut R,
    ) -> Vec<EffectEvent> {
        let rules = self.category.rules();
        let Some(effect) = self.effect else {
            if self.triggers_side_effect(rng) && rng.gen::<f64>() < rules.generic_effect_chance {
                return vec![EffectEvent::Generic];
            }
            return Vec::new();
        };
        if rules.effect_needs_roll && !self.triggers_side_effect(rng) {
            return Vec::new();
        }
        apply_effect(effect, user, target)
    }

    pub fn apply_special_effect<R: Rng + ?Sized>(
        &self,
        user: &mut Pokemon,
        target: &mut Pokemon,
        rng: &mut R,
    ) -> bool {
        !self.resolve_special_effect(user, target, rng).is_empty()
    }
}

fn apply_effect(effect: MoveEffect, user: &mut Pokemon, target: &mut Pokemon) -> Vec<EffectEvent> {
    let mut events = Vec::new();
    match effect {
        MoveEffect::Target(changes) => {
            for c in changes {
                let change = target.modify_stat(c.stat, c.stages);
                if change != 0 {
                    events.push(EffectEvent::StatChanged {
                        on_user: false,
                        stat: c.stat,
                        change,
                    });
                }
            }
        }
        MoveEffect::User(changes) => {
            for c in changes {
                let change = user.modify_stat(c.stat, c.stages);
                if change != 0 {
                    events.push(EffectEvent::StatChanged {
                        on_user: true,
                        stat: c.stat,
                        change,
                    });
                }
            }
        }
        MoveEffect::Inflict(status) => {
            if target.add_status(status) {
                events.push(EffectEvent::StatusInflicted(status));
            }
        }
        MoveEffect::HealUser { percent } => {
            let healed = user.heal_fraction(percent as f64 / 100.0);
            if healed > 0 {
                events.push(EffectEvent::Healed(healed));
            }
        }
        MoveEffect::CureUser => {
            if user.has_any_status() {
                user.clear_status();
                events.push(EffectEvent::Cured);
            }
        }
    }
    events
}
