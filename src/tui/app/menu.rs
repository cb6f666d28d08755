use crate::agents::Difficulty;
use crate::settings::SeatKind;

use super::{AppState, Scene};

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    Raising,
    RaiseLimit,
    Striking,
    StrikingBack,
    AllowWenz,
    AllowGeier,
    BotDifficulty,
    BotDelayMs,
}

const MENU_ITEMS: [MenuItem; 8] = [
    MenuItem::Raising,
    MenuItem::RaiseLimit,
    MenuItem::Striking,
    MenuItem::StrikingBack,
    MenuItem::AllowWenz,
    MenuItem::AllowGeier,
    MenuItem::BotDifficulty,
    MenuItem::BotDelayMs,
];

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn next_difficulty(d: Difficulty) -> Difficulty {
    match d {
        Difficulty::Easy => Difficulty::Medium,
        Difficulty::Medium => Difficulty::Hard,
        Difficulty::Hard => Difficulty::Expert,
        Difficulty::Expert => Difficulty::Easy,
    }
}

fn prev_difficulty(d: Difficulty) -> Difficulty {
    match d {
        Difficulty::Easy => Difficulty::Expert,
        Difficulty::Medium => Difficulty::Easy,
        Difficulty::Hard => Difficulty::Medium,
        Difficulty::Expert => Difficulty::Hard,
    }
}

impl MenuItem {
    fn display(self, app: &AppState) -> String {
        let rules = &app.cfg.rules;
        match self {
            MenuItem::Raising => format!("Raising: {}", on_off(rules.raising)),
            MenuItem::RaiseLimit => format!("Raise limit: {}", rules.raise_limit),
            MenuItem::Striking => format!("Striking: {}", on_off(rules.striking)),
            MenuItem::StrikingBack => format!("Striking back: {}", on_off(rules.striking_back)),
            MenuItem::AllowWenz => format!("Wenz: {}", on_off(rules.allow_wenz)),
            MenuItem::AllowGeier => format!("Geier: {}", on_off(rules.allow_geier)),
            MenuItem::BotDifficulty => {
                format!("Bot difficulty: {}", AppState::difficulty_label(app.cfg_bot_difficulty()))
            }
            MenuItem::BotDelayMs => format!("Bot delay (ms): {}", app.cfg.bot_delay_ms),
        }
    }

    fn adjust(self, app: &mut AppState, up: bool) {
        let rules = &mut app.cfg.rules;
        match self {
            MenuItem::Raising => rules.raising = !rules.raising,
            MenuItem::Striking => rules.striking = !rules.striking,
            MenuItem::StrikingBack => rules.striking_back = !rules.striking_back,
            MenuItem::AllowWenz => rules.allow_wenz = !rules.allow_wenz,
            MenuItem::AllowGeier => rules.allow_geier = !rules.allow_geier,
            MenuItem::RaiseLimit => {
                rules.raise_limit = if up {
                    (rules.raise_limit + 1).min(4)
                } else {
                    rules.raise_limit.saturating_sub(1).max(1)
                };
            }
            MenuItem::BotDifficulty => {
                let current = app.cfg_bot_difficulty();
                let next = if up { next_difficulty(current) } else { prev_difficulty(current) };
                for seat in app.cfg.seats.iter_mut().filter(|s| s.kind == SeatKind::Bot) {
                    seat.difficulty = next;
                }
            }
            MenuItem::BotDelayMs => {
                app.cfg.bot_delay_ms = if up {
                    app.cfg.bot_delay_ms.saturating_add(100).min(2_000)
                } else {
                    app.cfg.bot_delay_ms.saturating_sub(100)
                };
            }
        }
    }
}

impl AppState {
    pub fn menu_items_display(&self) -> Vec<String> {
        MENU_ITEMS.iter().map(|item| item.display(self)).collect()
    }

    /// Difficulty of the first bot seat in the edited settings.
    fn cfg_bot_difficulty(&self) -> Difficulty {
        self.cfg
            .seats
            .iter()
            .find(|s| s.kind == SeatKind::Bot)
            .map_or(Difficulty::Medium, |s| s.difficulty)
    }

    pub fn toggle_menu(&mut self) {
        self.close_help();
        self.close_history();
        match self.scene {
            Scene::Menu => self.scene = Scene::Table,
            _ => self.open_menu(),
        }
    }

    pub fn open_menu(&mut self) {
        self.close_help();
        self.close_history();
        self.menu_index = 0;
        self.cfg = self.settings.clone();
        self.scene = Scene::Menu;
    }

    /// Apply the edited settings and deal a fresh table.
    pub fn apply_menu(&mut self) {
        if let Err(err) = self.cfg.validate() {
            self.set_message(err.to_string());
            return;
        }
        self.settings = self.cfg.clone();
        self.rebuild_table();
        self.scene = Scene::Table;
    }

    pub fn cancel_menu(&mut self) {
        self.cfg = self.settings.clone();
        self.scene = Scene::Table;
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MENU_ITEMS.len();
    }
    pub fn menu_prev(&mut self) {
        self.menu_index = (self.menu_index + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
    }
    pub fn menu_inc(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.adjust(self, true);
    }
    pub fn menu_dec(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.adjust(self, false);
    }
}
