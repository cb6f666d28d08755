use crate::action::{Action, ActionKind, Validatable};
use crate::agents::{AgentKind, AgentTable, AiAgent, Difficulty, HumanAgent, PlayerAgent};
use crate::cards::{Card, Suit};
use crate::controller::{Controller, SeatHandle};
use crate::engine::TurnSource;
use crate::game::{GameState, HistoryEntry};
use crate::rules::GameType;
use crate::seat::{PlayerId, PlayerPosition};
use crate::settings::{GameSettings, SeatKind};
use crate::view::RestrictedView;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Scene {
    Menu,
    Table,
}

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    MenuNext,
    MenuPrev,
    MenuInc,
    MenuDec,
    MenuApply,
    MenuCancel,
    ToggleMenu,
    ToggleHelp,
    ToggleHistory,
    HistoryUp,
    HistoryDown,
    SelectCard(usize),
    /// Play the selected card, announce the pending game, or accept the next game.
    Confirm,
    Pass,
    Yes,
    CycleCall,
    Wenz,
    Geier,
    CycleSolo,
    NextGame,
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub scene: Scene,
    pub started: Instant,
    pub settings: GameSettings,
    // Settings being edited in the menu
    pub cfg: GameSettings,
    pub menu_index: usize,
    pub table_seed: u64,
    /// Seat whose view is shown: the human, or Bottom when only bots play.
    pub focus: PlayerPosition,
    pub agents: AgentTable,
    controller: Arc<Controller>,
    seats: Vec<SeatHandle>,
    selected: Option<usize>,
    pending_game: Option<GameType>,
    last_game_no: u32,
    help_open: bool,
    history_open: bool,
    history_offset: usize,
    message: Option<String>,
    message_at: Option<Instant>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(GameSettings::default())
    }
}

impl AppState {
    pub const HISTORY_PAGE_SIZE: usize = 20;
    const MESSAGE_TTL: Duration = Duration::from_secs(3);

    pub fn new(settings: GameSettings) -> Self {
        let table_seed = settings.table_seed();
        let (controller, agents, seats) = Self::build_table(&settings, table_seed);
        Self {
            scene: Scene::Menu,
            started: Instant::now(),
            cfg: settings.clone(),
            focus: settings.human_seat().unwrap_or(PlayerPosition::Bottom),
            settings,
            menu_index: 0,
            table_seed,
            agents,
            controller,
            seats,
            selected: None,
            pending_game: None,
            last_game_no: 0,
            help_open: false,
            history_open: false,
            history_offset: 0,
            message: None,
            message_at: None,
        }
    }

    fn build_table(
        settings: &GameSettings,
        table_seed: u64,
    ) -> (Arc<Controller>, AgentTable, Vec<SeatHandle>) {
        let controller = Arc::new(Controller::new(settings.rules.clone(), table_seed));
        let mut agents = AgentTable::new();
        if settings.bot_delay_ms > 0 {
            agents.set_min_action_delay_ms(150);
        }
        let mut seats = Vec::with_capacity(4);
        for pos in PlayerPosition::ALL {
            let Ok(handle) = controller.subscribe_player(Some(pos)) else {
                continue;
            };
            let agent: Box<dyn PlayerAgent> = match settings.seats[pos.index()].kind {
                SeatKind::Human => Box::new(HumanAgent::new()),
                SeatKind::Bot => Box::new(AiAgent::standard(settings.bot_profile(pos))),
            };
            agents.set_agent(pos, handle.id(), Some(agent));
            seats.push(handle);
        }
        (controller, agents, seats)
    }

    /// Replace the table with a fresh one for the current settings.
    pub(crate) fn rebuild_table(&mut self) {
        self.table_seed = self.settings.table_seed();
        let (controller, agents, seats) = Self::build_table(&self.settings, self.table_seed);
        self.controller = controller;
        self.agents = agents;
        self.seats = seats;
        self.focus = self.settings.human_seat().unwrap_or(PlayerPosition::Bottom);
        self.selected = None;
        self.pending_game = None;
        self.last_game_no = 0;
        self.history_offset = 0;
        self.clear_message();
    }

    pub fn controller(&self) -> &Arc<Controller> {
        &self.controller
    }

    pub fn human_seat(&self) -> Option<PlayerPosition> {
        self.settings.human_seat()
    }

    fn seat_id(&self, pos: PlayerPosition) -> Option<PlayerId> {
        self.seats.iter().find(|h| h.position() == pos).map(SeatHandle::id)
    }

    /// The focused seat's current view.
    pub fn view(&self) -> RestrictedView {
        self.controller.view(self.focus)
    }

    /// Page of history entries, newest last, `history_offset` entries back from the end.
    pub fn history_page(&self) -> Vec<HistoryEntry> {
        let offset = self.history_offset;
        self.controller.with_game_data(|g| {
            let h = g.history();
            let end = h.len().saturating_sub(offset);
            let start = end.saturating_sub(Self::HISTORY_PAGE_SIZE);
            h[start..end].to_vec()
        })
    }

    pub fn wins(&self) -> [u32; 4] {
        self.controller.wins()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn pending_game(&self) -> Option<GameType> {
        self.pending_game
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub(crate) fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.message_at = Some(Instant::now());
    }

    fn clear_message(&mut self) {
        self.message = None;
        self.message_at = None;
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn history_open(&self) -> bool {
        self.history_open
    }

    pub fn history_offset(&self) -> usize {
        self.history_offset
    }

    pub(crate) fn close_help(&mut self) {
        self.help_open = false;
    }

    pub(crate) fn close_history(&mut self) {
        self.history_open = false;
    }

    pub fn seat_label(&self, pos: PlayerPosition) -> String {
        match self.agents.agent_kind(pos) {
            Some(AgentKind::Bot) => {
                let diff = self.settings.seats[pos.index()].difficulty;
                format!("{} [BOT:{}]", pos.label(), Self::difficulty_label(diff))
            }
            Some(_) => format!("{} [You]", pos.label()),
            None => pos.label().to_string(),
        }
    }

    pub fn difficulty_label(difficulty: Difficulty) -> &'static str {
        match difficulty {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Med",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Xprt",
        }
    }

    /// Check an intent for the human seat and hand it to its agent.
    fn queue_intent(&mut self, kind: ActionKind) -> bool {
        if self.scene != Scene::Table {
            return false;
        }
        let Some(pos) = self.human_seat() else {
            return false;
        };
        let Some(id) = self.seat_id(pos) else {
            return false;
        };
        let code = Action::new(id, pos, kind).validate(&self.controller.view(pos));
        if !code.is_success() {
            self.set_message(code.message());
            return false;
        }
        self.clear_message();
        self.agents.receive(pos, kind)
    }

    fn select_card(&mut self, idx: usize) -> bool {
        if idx < self.view().hand.len() {
            self.selected = Some(idx);
        }
        false
    }

    fn confirm(&mut self) -> bool {
        let view = self.view();
        match view.state {
            GameState::ChoosingGame => {
                let game = self.pending_game;
                let queued = self.queue_intent(ActionKind::ChooseGame(game));
                if queued {
                    self.pending_game = None;
                }
                queued
            }
            GameState::Playing => {
                let Some(card) = self.selected.and_then(|i| view.hand.get(i).copied()) else {
                    self.set_message("select a card with 1-8 first");
                    return false;
                };
                let queued = self.queue_intent(ActionKind::PlayCard(card));
                if queued {
                    self.selected = None;
                }
                queued
            }
            GameState::Finished => self.queue_intent(ActionKind::StartNextGame),
            _ => false,
        }
    }

    fn answer(&mut self, yes: bool) -> bool {
        let kind = match self.view().state {
            GameState::ChoosingGame if !yes => ActionKind::ChooseGame(None),
            GameState::Raising => ActionKind::Raise(yes),
            GameState::Striking => ActionKind::Strike(yes),
            GameState::StrikingBack => ActionKind::StrikeBack(yes),
            _ => return false,
        };
        self.queue_intent(kind)
    }

    fn cycle_suit(current: Option<Suit>, suits: &[Suit]) -> Suit {
        let next = current
            .and_then(|s| suits.iter().position(|&x| x == s))
            .map_or(0, |i| (i + 1) % suits.len());
        suits[next]
    }

    fn cycle_call(&mut self) {
        let current = match self.pending_game {
            Some(GameType::Call(s)) => Some(s),
            _ => None,
        };
        self.pending_game = Some(GameType::Call(Self::cycle_suit(current, &Suit::CALLABLE)));
    }

    fn cycle_solo(&mut self) {
        let current = match self.pending_game {
            Some(GameType::Solo(s)) => Some(s),
            _ => None,
        };
        self.pending_game = Some(GameType::Solo(Self::cycle_suit(current, &Suit::ALL)));
    }

    /// Card in the focused hand, for display.
    pub fn hand_card(&self, idx: usize) -> Option<Card> {
        self.view().hand.get(idx).copied()
    }

    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::ToggleMenu => {
                self.toggle_menu();
                false
            }
            InputAction::ToggleHelp => {
                if self.scene == Scene::Table {
                    self.history_open = false;
                    self.help_open = !self.help_open;
                }
                false
            }
            InputAction::ToggleHistory => {
                if self.scene == Scene::Table {
                    self.help_open = false;
                    if !self.history_open {
                        self.history_offset = 0;
                    }
                    self.history_open = !self.history_open;
                }
                false
            }
            InputAction::HistoryUp => {
                if self.scene == Scene::Table && self.history_open {
                    let max_offset =
                        self.controller.history_len().saturating_sub(Self::HISTORY_PAGE_SIZE);
                    self.history_offset = (self.history_offset + 1).min(max_offset);
                }
                false
            }
            InputAction::HistoryDown => {
                if self.scene == Scene::Table && self.history_open && self.history_offset > 0 {
                    self.history_offset -= 1;
                }
                false
            }
            InputAction::MenuNext => {
                if self.scene == Scene::Menu {
                    self.menu_next();
                }
                false
            }
            InputAction::MenuPrev => {
                if self.scene == Scene::Menu {
                    self.menu_prev();
                }
                false
            }
            InputAction::MenuInc => {
                if self.scene == Scene::Menu {
                    self.menu_inc();
                }
                false
            }
            InputAction::MenuDec => {
                if self.scene == Scene::Menu {
                    self.menu_dec();
                }
                false
            }
            InputAction::MenuApply => {
                if self.scene == Scene::Menu {
                    self.apply_menu();
                }
                false
            }
            InputAction::MenuCancel => {
                if self.scene == Scene::Menu {
                    self.cancel_menu();
                }
                false
            }
            InputAction::SelectCard(idx) => self.select_card(idx),
            InputAction::Confirm => self.confirm(),
            InputAction::Pass => self.answer(false),
            InputAction::Yes => self.answer(true),
            InputAction::CycleCall => {
                self.cycle_call();
                false
            }
            InputAction::Wenz => {
                self.pending_game = Some(GameType::Wenz);
                false
            }
            InputAction::Geier => {
                self.pending_game = Some(GameType::Geier);
                false
            }
            InputAction::CycleSolo => {
                self.cycle_solo();
                false
            }
            InputAction::NextGame => self.queue_intent(ActionKind::StartNextGame),
        }
    }

    /// Let whichever seat may act do so, and surface rejections.
    pub fn agents_on_turn(&mut self) {
        if self.scene != Scene::Table {
            return;
        }
        if let Some(at) = self.message_at {
            if at.elapsed() >= Self::MESSAGE_TTL {
                self.clear_message();
            }
        }
        if let Some(code) = self.agents.on_turn(&*self.controller) {
            if !code.is_success() {
                self.set_message(code.message());
            }
        }
        let game_no = self.view().game_no;
        if game_no != self.last_game_no {
            self.last_game_no = game_no;
            self.selected = None;
            self.pending_game = None;
            self.history_offset = 0;
        }
    }
}
