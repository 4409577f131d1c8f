use crate::animation::Animation;
use crate::game::animation::{FloatingSymbol, NumberAnimator};
use crate::game::board::CascadeBoard;
use crate::game::GameAction;
use common::board::DropInfo;
use common::catalog::{SymbolCatalog, SymbolKind};
use common::config::{BoardConfig, GameRules};
use common::matcher;
use common::pool::VisualFactory;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Ref, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;
use yew::Reducible;

/// Resting states of the game loop. The transient processing and
/// checking-wins steps of a move run synchronously inside one reduction, the
/// same way the original's always-transitions collapse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Cascading,
    GameWon,
    GameOver,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameContext {
    pub current_move: u32,
    pub score: u32,
    pub is_game_over: bool,
    pub game_won: bool,
    /// Near-win indices per staged kind, recomputed after every settled state.
    pub possible_wins: BTreeMap<SymbolKind, BTreeSet<usize>>,
}

impl GameContext {
    fn new() -> Self {
        GameContext {
            current_move: 0,
            score: 0,
            is_game_over: false,
            game_won: false,
            possible_wins: BTreeMap::new(),
        }
    }
}

/// The game store: move counting, win/loss thresholds, match evaluation and
/// cascade sequencing over the board. Cheap to clone; the board, RNG and
/// score easing are shared handles, so every reducer generation drives the
/// same animation state.
#[derive(Clone)]
pub struct CrushGame {
    board: Rc<RefCell<CascadeBoard>>,
    catalog: Rc<SymbolCatalog>,
    rng: Rc<RefCell<StdRng>>,
    score_animator: Rc<RefCell<NumberAnimator>>,
    pub rules: GameRules,
    pub phase: Phase,
    pub context: GameContext,
    /// Epoch of the in-flight cascade; a completion with a different board
    /// epoch has been superseded by a reset and is dropped.
    cascade_epoch: Option<u64>,
}

impl CrushGame {
    pub fn new(config: BoardConfig, rules: GameRules, seed: u64) -> Self {
        let catalog = Rc::new(SymbolCatalog::new(&config.symbols));
        let board = CascadeBoard::new(config, catalog.clone());
        Self::start(board, catalog, rules, seed)
    }

    /// Game over a board with a caller-supplied renderable factory; this is
    /// how the whole loop runs without a browser.
    pub fn with_factory(
        config: BoardConfig,
        rules: GameRules,
        seed: u64,
        factory: VisualFactory,
    ) -> Self {
        let catalog = Rc::new(SymbolCatalog::new(&config.symbols));
        let board = CascadeBoard::with_factory(config, catalog.clone(), factory);
        Self::start(board, catalog, rules, seed)
    }

    fn start(board: CascadeBoard, catalog: Rc<SymbolCatalog>, rules: GameRules, seed: u64) -> Self {
        let mut game = CrushGame {
            board: Rc::new(RefCell::new(board)),
            catalog,
            rng: Rc::new(RefCell::new(StdRng::seed_from_u64(seed))),
            score_animator: Rc::new(RefCell::new(NumberAnimator::new(0))),
            rules,
            phase: Phase::Playing,
            context: GameContext::new(),
            cascade_epoch: None,
        };
        game.reset();
        game
    }

    /// Zeroes the context, rebuilds the board and re-enters `Playing`.
    /// Accepted from every state; the epoch bump in `fill_grid` invalidates
    /// any cascade still in flight.
    fn reset(&mut self) {
        {
            let mut board = self.board.borrow_mut();
            let mut rng = self.rng.borrow_mut();
            board.set_disabled(false);
            board.refresh_strip(&mut *rng);
            board.fill_grid(&mut *rng);
            self.context = GameContext::new();
            self.context.possible_wins = matcher::find_possible_wins(
                board.grid(),
                &board.strip_kinds(),
                self.rules.min_win_count,
            );
        }
        self.score_animator.borrow_mut().set_target(0);
        self.phase = Phase::Playing;
        self.cascade_epoch = None;
    }

    fn handle_drop(&mut self, slot: usize, drop: DropInfo, from: (f64, f64)) {
        if self.phase != Phase::Playing {
            return;
        }

        // processing: the move is spent before the outcome is known
        self.context.current_move += 1;
        if (self.rules.win_check)(self.context.current_move, self.context.score) {
            self.board.borrow_mut().snap_back(slot, from);
            self.enter_terminal(true);
            return;
        }
        if self.context.current_move >= self.rules.max_moves {
            self.board.borrow_mut().snap_back(slot, from);
            self.enter_terminal(false);
            return;
        }

        // checking wins: evaluate the hypothetical placement, leaving the
        // grid untouched until a run is confirmed
        let mut board = self.board.borrow_mut();
        let dropped = match board.strip_kind(slot) {
            Some(kind) => kind,
            None => {
                board.snap_back(slot, from);
                return;
            }
        };
        if board.grid().kind_at(drop.column, drop.row) == Some(dropped) {
            // swapping identical types is a no-op match by definition
            board.snap_back(slot, from);
            return;
        }
        let run = matcher::find_run(
            board.grid(),
            drop.column,
            drop.row,
            dropped,
            self.rules.min_win_count,
        );
        if run.is_empty() {
            board.snap_back(slot, from);
            return;
        }

        board.commit_drop(slot, drop);
        let mut rng = self.rng.borrow_mut();
        let insert = self.catalog.random_kinds(&mut *rng, run.len());
        self.context.score += (self.rules.calc_score)(self.context.current_move);
        self.score_animator
            .borrow_mut()
            .set_target(self.context.score);
        let epoch = board.cascade(&run, &insert, &mut *rng);
        self.cascade_epoch = Some(epoch);
        self.phase = Phase::Cascading;
    }

    fn enter_terminal(&mut self, won: bool) {
        self.context.is_game_over = true;
        self.context.game_won = won;
        self.phase = if won { Phase::GameWon } else { Phase::GameOver };
        self.board.borrow_mut().set_disabled(true);
    }

    fn animate(&mut self, frames: usize) {
        self.board.borrow_mut().animate(frames);
        self.score_animator.borrow_mut().advance_frames(frames);

        if self.phase != Phase::Cascading {
            return;
        }
        let mut board = self.board.borrow_mut();
        if board.is_animating() {
            return;
        }
        if self.cascade_epoch == Some(board.epoch()) {
            board.finish_cascade();
            let mut rng = self.rng.borrow_mut();
            board.refresh_strip(&mut *rng);
            self.context.possible_wins = matcher::find_possible_wins(
                board.grid(),
                &board.strip_kinds(),
                self.rules.min_win_count,
            );
        }
        self.cascade_epoch = None;
        self.phase = Phase::Playing;
    }

    pub fn board(&self) -> Ref<'_, CascadeBoard> {
        self.board.borrow()
    }

    pub fn board_frame(&self) -> Vec<FloatingSymbol> {
        self.board.borrow().frame()
    }

    pub fn catalog(&self) -> &Rc<SymbolCatalog> {
        &self.catalog
    }

    /// Score as the HUD shows it, eased towards the real value.
    pub fn displayed_score(&self) -> u32 {
        self.score_animator.borrow().current_frame()
    }

    pub fn moves_left(&self) -> u32 {
        self.rules.max_moves.saturating_sub(self.context.current_move)
    }

    pub fn restart_enabled(&self) -> bool {
        !self.context.is_game_over
    }
}

impl Reducible for CrushGame {
    type Action = GameAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut game = (*self).clone();

        match action {
            GameAction::SymbolDropped { slot, drop, from } => game.handle_drop(slot, drop, from),
            GameAction::DragCancelled { slot, from } => {
                game.board.borrow_mut().snap_back(slot, from)
            }
            GameAction::Animate { frames } => game.animate(frames),
            GameAction::Restart => game.reset(),
        }

        game.into()
    }
}
