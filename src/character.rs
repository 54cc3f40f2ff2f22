use crate::ai::{self, AiConfig, AiTier, Decision, SideView};
use crate::items::Item;
use crate::pokemon::Pokemon;

pub const MAX_TEAM_SIZE: usize = 6;
pub const TRAINER_BAG_CAPACITY: usize = 15;
pub const MACHINE_BAG_CAPACITY: usize = 5;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Controller {
    /// Decisions come from outside (a UI); placeholders pick the first candidate.
    Human,
    Machine { tier: AiTier, config: AiConfig },
}

#[derive(Clone, Debug)]
pub struct Character {
    pub name: String,
    pub description: String,
    team: Vec<Pokemon>,
    bag: Vec<Item>,
    max_team_size: usize,
    max_item_count: usize,
    controller: Controller,
}

impl Character {
    pub fn new(name: impl Into<String>, controller: Controller, max_item_count: usize) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            team: Vec::new(),
            bag: Vec::new(),
            max_team_size: MAX_TEAM_SIZE,
            max_item_count,
            controller,
        }
    }

    pub fn trainer(name: impl Into<String>) -> Self {
        Character::new(name, Controller::Human, TRAINER_BAG_CAPACITY)
    }

    pub fn machine(name: impl Into<String>, tier: AiTier) -> Self {
        Character::new(
            name,
            Controller::Machine {
                tier,
                config: AiConfig::default(),
            },
            MACHINE_BAG_CAPACITY,
        )
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_ai_config(mut self, config: AiConfig) -> Self {
        if let Controller::Machine { config: current, .. } = &mut self.controller {
            *current = config;
        }
        self
    }

    pub fn controller(&self) -> Controller {
        self.controller
    }

    pub fn is_machine(&self) -> bool {
        matches!(self.controller, Controller::Machine { .. })
    }

    pub fn ai_type(&self) -> Option<&'static str> {
        match self.controller {
            Controller::Machine { tier, .. } => Some(tier.label()),
            Controller::Human => None,
        }
    }

    pub fn difficulty_level(&self) -> Option<u8> {
        match self.controller {
            Controller::Machine { tier, .. } => Some(tier.difficulty()),
            Controller::Human => None,
        }
    }

    pub fn max_team_size(&self) -> usize {
        self.max_team_size
    }

    pub fn max_item_count(&self) -> usize {
        self.max_item_count
    }

    pub fn team(&self) -> &[Pokemon] {
        &self.team
    }

    pub fn team_mut(&mut self) -> &mut [Pokemon] {
        &mut self.team
    }

    pub fn bag(&self) -> &[Item] {
        &self.bag
    }

    pub fn add_pokemon(&mut self, pokemon: Pokemon) -> bool {
        if self.team.len() >= self.max_team_size {
            return false;
        }
        self.team.push(pokemon);
        true
    }

    /// Replaces the whole roster; rejected when it exceeds the team limit.
    pub fn set_team(&mut self, team: Vec<Pokemon>) -> bool {
        if team.len() > self.max_team_size {
            return false;
        }
        self.team = team;
        true
    }

    pub fn remove_pokemon(&mut self, index: usize) -> Option<Pokemon> {
        (index < self.team.len()).then(|| self.team.remove(index))
    }

    pub fn add_item(&mut self, item: Item) -> bool {
        if self.bag.len() >= self.max_item_count {
            return false;
        }
        self.bag.push(item);
        true
    }

    pub fn remove_item(&mut self, index: usize) -> Option<Item> {
        (index < self.bag.len()).then(|| self.bag.remove(index))
    }

    /// Uses the bag entry at `item` on roster slot `target`, consuming it on success.
    pub fn use_item(&mut self, item: usize, target: usize) -> bool {
        let Some(entry) = self.bag.get(item) else {
            return false;
        };
        if !entry.use_on(self.team.get_mut(target)) {
            return false;
        }
        self.bag.remove(item);
        true
    }

    pub(crate) fn take_items(&mut self, count: usize) -> Vec<Item> {
        let count = count.min(self.bag.len());
        self.bag.drain(..count).collect()
    }

    pub(crate) fn return_items(&mut self, items: Vec<Item>) {
        self.bag.splice(0..0, items);
    }

    pub fn available_pokemon(&self) -> Vec<&Pokemon> {
        self.team.iter().filter(|p| p.is_available()).collect()
    }

    pub fn first_available(&self) -> Option<usize> {
        self.team.iter().position(Pokemon::is_available)
    }

    pub fn has_available_pokemon(&self) -> bool {
        self.first_available().is_some()
    }

    pub fn choose_pokemon(&self, candidates: &[&Pokemon]) -> Option<usize> {
        match self.controller {
            Controller::Human => (!candidates.is_empty()).then_some(0),
            Controller::Machine { tier, .. } => tier.policy().choose_pokemon(candidates),
        }
    }

    pub fn choose_move(&self, pokemon: &Pokemon) -> Option<usize> {
        match self.controller {
            Controller::Human => (!pokemon.moves().is_empty()).then_some(0),
            Controller::Machine { tier, .. } => tier.policy().choose_move(pokemon),
        }
    }

    pub fn choose_item(&self, candidates: &[&Item]) -> Option<usize> {
        match self.controller {
            Controller::Human => (!candidates.is_empty()).then_some(0),
            Controller::Machine { tier, .. } => tier.policy().choose_item(candidates),
        }
    }

    /// Humans act through the battle directly, so only machines decide here.
    pub fn make_decision(&self, view: &SideView<'_>) -> Option<Decision> {
        match self.controller {
            Controller::Human => None,
            Controller::Machine { tier, config } => ai::make_decision(tier.policy(), view, &config),
        }
    }
}
