use serde_json::json;

/// Protocol-style event log for a single battle.
#[derive(Clone, Debug, Default)]
pub struct BattleLogger {
    format_id: String,
    log: Vec<String>,
}

impl BattleLogger {
    pub fn new(format_id: impl Into<String>) -> Self {
        Self {
            format_id: format_id.into(),
            log: Vec::new(),
        }
    }

    pub fn log_player(&mut self, slot: &str, name: &str) {
        self.log.push(format!("|player|{slot}|{name}"));
    }

    pub fn log_start(&mut self) {
        self.log.push("|start".to_string());
    }

    pub fn log_turn(&mut self, turn: u32) {
        self.log.push(format!("|turn|{turn}"));
    }

    pub fn log_move(&mut self, source: &str, move_name: &str, target: &str) {
        self.log.push(format!("|move|{source}|{move_name}|{target}"));
    }

    pub fn log_miss(&mut self, source: &str, target: &str) {
        self.log.push(format!("|-miss|{source}|{target}"));
    }

    pub fn log_cant(&mut self, source: &str, reason: &str) {
        self.log.push(format!("|cant|{source}|{reason}"));
    }

    pub fn log_damage(&mut self, target: &str, hp: u32, max_hp: u32) {
        self.log.push(format!("|-damage|{target}|{hp}/{max_hp}"));
    }

    pub fn log_heal(&mut self, target: &str, hp: u32, max_hp: u32) {
        self.log.push(format!("|-heal|{target}|{hp}/{max_hp}"));
    }

    pub fn log_status(&mut self, target: &str, status: &str) {
        self.log.push(format!("|-status|{target}|{status}"));
    }

    pub fn log_cure_status(&mut self, target: &str) {
        self.log.push(format!("|-curestatus|{target}"));
    }

    pub fn log_boost(&mut self, target: &str, stat: &str, stages: i8) {
        let tag = if stages >= 0 { "-boost" } else { "-unboost" };
        self.log
            .push(format!("|{tag}|{target}|{stat}|{}", stages.unsigned_abs()));
    }

    pub fn log_activate(&mut self, target: &str, what: &str) {
        self.log.push(format!("|-activate|{target}|{what}"));
    }

    pub fn log_item(&mut self, target: &str, item: &str) {
        self.log.push(format!("|-item|{target}|{item}"));
    }

    pub fn log_switch(&mut self, pokemon: &str, species: &str, hp: u32, max_hp: u32) {
        self.log
            .push(format!("|switch|{pokemon}|{species}|{hp}/{max_hp}"));
    }

    pub fn log_faint(&mut self, pokemon: &str) {
        self.log.push(format!("|faint|{pokemon}"));
    }

    pub fn log_win(&mut self, winner: &str) {
        self.log.push(format!("|win|{winner}"));
    }

    pub fn log_tie(&mut self) {
        self.log.push("|tie|".to_string());
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "format": self.format_id,
            "log": self.log,
        })
    }
}

pub fn battle_ident(side_idx: usize, name: &str) -> String {
    let side = if side_idx == 0 { "p1a" } else { "p2a" };
    format!("{side}: {name}")
}
