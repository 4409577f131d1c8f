use crate::animation::{Animation, AnimationChain, AnimationStream, Animator, MergeAnimator};
use crate::game::animation::{FloatingSymbol, SymbolAnimator};
use crate::game::visual::{registry_factory, VisualRegistry};
use crate::log;
use common::board::{DropInfo, SymbolCell, SymbolGrid};
use common::catalog::{SymbolCatalog, SymbolKind, WIN_ANIMATION};
use common::config::BoardConfig;
use common::pool::{SymbolInstance, SymbolPool, VisualFactory};
use rand::Rng;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

const FILL_FADE_FRAMES: usize = 15;
const SNAP_BACK_FRAMES: usize = 18;
const DROP_FRAMES: usize = 18;
const STAGGER_FRAMES: usize = 2;
/// Below this offset a symbol is repositioned instantly instead of tweened.
const SETTLE_EPSILON: f64 = 1.;

struct WinsPending {
    done: Rc<Cell<usize>>,
    total: usize,
}

/// The stateful board: owns the grid of value records, the instance side
/// table, the staging strip and the animation timeline. The game store talks
/// to the grid and pool exclusively through this type.
pub struct CascadeBoard {
    config: BoardConfig,
    catalog: Rc<SymbolCatalog>,
    pool: SymbolPool,
    grid: SymbolGrid,
    /// Instances currently standing in the grid, by instance id.
    placed: HashMap<usize, SymbolInstance>,
    strip: Vec<Option<SymbolInstance>>,
    stream: AnimationStream<Vec<FloatingSymbol>>,
    registry: Rc<RefCell<VisualRegistry>>,
    /// Extracted instances parked until the cascade settles.
    pending_release: Vec<SymbolInstance>,
    wins_pending: Option<WinsPending>,
    epoch: u64,
    cascading: bool,
    disabled: bool,
}

impl CascadeBoard {
    pub fn new(config: BoardConfig, catalog: Rc<SymbolCatalog>) -> Self {
        let registry = Rc::new(RefCell::new(VisualRegistry::new()));
        let factory = registry_factory(registry.clone());
        Self::build(config, catalog, factory, registry)
    }

    /// Board with a caller-supplied renderable factory, for driving the game
    /// without a browser.
    pub fn with_factory(
        config: BoardConfig,
        catalog: Rc<SymbolCatalog>,
        factory: VisualFactory,
    ) -> Self {
        let registry = Rc::new(RefCell::new(VisualRegistry::new()));
        Self::build(config, catalog, factory, registry)
    }

    fn build(
        config: BoardConfig,
        catalog: Rc<SymbolCatalog>,
        factory: VisualFactory,
        registry: Rc<RefCell<VisualRegistry>>,
    ) -> Self {
        let grid = SymbolGrid::new(config.columns, config.rows);
        let strip = (0..config.option_count).map(|_| None).collect();
        CascadeBoard {
            pool: SymbolPool::new(catalog.clone(), factory),
            config,
            catalog,
            grid,
            placed: HashMap::new(),
            strip,
            stream: AnimationStream::new(),
            registry,
            pending_release: Vec::new(),
            wins_pending: None,
            epoch: 0,
            cascading: false,
            disabled: false,
        }
    }

    pub fn grid(&self) -> &SymbolGrid {
        &self.grid
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_animating(&self) -> bool {
        !self.stream.is_over()
    }

    pub fn is_cascading(&self) -> bool {
        self.cascading
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Dims the board and suppresses drag interaction; state is untouched.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    fn cell_position(&self, column: usize, row: usize) -> (f64, f64) {
        (
            column as f64 * self.config.cell_size,
            row as f64 * self.config.cell_size,
        )
    }

    /// Resting position of a staging slot, centered under the board.
    pub fn strip_position(&self, slot: usize) -> (f64, f64) {
        let size = self.config.cell_size;
        let x = self.config.board_width() / 2.
            + (slot as f64 - self.config.option_count as f64 / 2.) * size;
        let y = self.config.board_height() + 0.4 * size;
        (x, y)
    }

    /// Staging slot under a board-local pointer position, if any.
    pub fn strip_slot_at(&self, x: f64, y: f64) -> Option<usize> {
        let size = self.config.cell_size;
        (0..self.strip.len()).find(|&slot| {
            let (sx, sy) = self.strip_position(slot);
            x >= sx && x < sx + size && y >= sy && y < sy + size
        })
    }

    /// Grid cell under a board-local pointer position: integer division by
    /// the cell size, bounds-checked. Outside the board is "no drop".
    pub fn resolve_drop(&self, x: f64, y: f64) -> Option<DropInfo> {
        let size = self.config.cell_size;
        let column = (x / size).floor() as isize;
        let row = (y / size).floor() as isize;
        if column < 0
            || column >= self.config.columns as isize
            || row < 0
            || row >= self.config.rows as isize
        {
            return None;
        }
        let (column, row) = (column as usize, row as usize);
        Some(DropInfo {
            row,
            column,
            index: self.grid.index_of(column, row),
        })
    }

    pub fn can_drag(&self, slot: usize) -> bool {
        if self.disabled || self.is_animating() {
            return false;
        }
        matches!(
            self.strip.get(slot),
            Some(Some(instance)) if !instance.is_animating
        )
    }

    pub fn strip_kind(&self, slot: usize) -> Option<SymbolKind> {
        self.strip
            .get(slot)
            .and_then(|slot| slot.as_ref())
            .map(|instance| instance.kind)
    }

    /// Kinds currently offered for drag-in; these scope the hint search.
    pub fn strip_kinds(&self) -> Vec<SymbolKind> {
        self.strip
            .iter()
            .flatten()
            .map(|instance| instance.kind)
            .collect()
    }

    pub fn strip_instance_id(&self, slot: usize) -> Option<usize> {
        self.strip
            .get(slot)
            .and_then(|slot| slot.as_ref())
            .map(|instance| instance.id)
    }

    /// (Re)populates every cell with freshly pooled random symbols, evicting
    /// any prior occupants first. Session reset only; bumps the epoch so any
    /// in-flight cascade completion becomes stale.
    pub fn fill_grid(&mut self, rng: &mut impl Rng) {
        self.epoch += 1;
        self.stream.clear();
        self.cascading = false;
        self.wins_pending = None;
        for instance in self.pending_release.drain(..) {
            self.pool.give_back(instance);
        }
        self.grid.clear();
        for (_, instance) in self.placed.drain() {
            self.pool.give_back(instance);
        }

        let mut fades: Vec<Box<dyn Animation<Frame = FloatingSymbol>>> = Vec::new();
        for column in 0..self.config.columns {
            for row in 0..self.config.rows {
                let kind = match self.catalog.random_kind(rng) {
                    Some(kind) => kind,
                    None => continue,
                };
                let mut instance = self.pool.get(kind);
                let (x, y) = self.cell_position(column, row);
                instance.set_position(x, y);
                self.grid.push(column, instance.cell());
                fades.push(Box::new(SymbolAnimator::new(
                    instance.id,
                    kind,
                    (x, x),
                    (y, y),
                    (0., 1.),
                    0,
                    FILL_FADE_FRAMES,
                )));
                self.placed.insert(instance.id, instance);
            }
        }
        if !fades.is_empty() {
            fades.extend(self.strip_holds());
            self.stream.push(Animator::new(fades));
        }
    }

    /// Replaces the whole staging strip with fresh random symbols.
    pub fn refresh_strip(&mut self, rng: &mut impl Rng) {
        for slot in self.strip.iter_mut() {
            if let Some(instance) = slot.take() {
                self.pool.give_back(instance);
            }
        }
        for slot in 0..self.strip.len() {
            let kind = match self.catalog.random_kind(rng) {
                Some(kind) => kind,
                None => continue,
            };
            let mut instance = self.pool.get(kind);
            let (x, y) = self.strip_position(slot);
            instance.set_position(x, y);
            self.strip[slot] = Some(instance);
        }
    }

    /// Swaps the dragged symbol into the grid and the displaced occupant into
    /// the vacated strip slot. Only called once the match finder has
    /// confirmed a win at this placement.
    pub fn commit_drop(&mut self, slot: usize, drop: DropInfo) {
        let dragged = match self.strip.get_mut(slot).and_then(Option::take) {
            Some(instance) => instance,
            None => return,
        };
        match self.grid.replace(drop.column, drop.row, dragged.cell()) {
            Some(displaced_cell) => {
                let mut dragged = dragged;
                let (x, y) = self.cell_position(drop.column, drop.row);
                dragged.set_position(x, y);
                self.placed.insert(dragged.id, dragged);
                if let Some(mut displaced) = self.placed.remove(&displaced_cell.id) {
                    let (x, y) = self.strip_position(slot);
                    displaced.set_position(x, y);
                    self.strip[slot] = Some(displaced);
                }
            }
            None => {
                // no live cell at the target; leave the board untouched
                self.strip[slot] = Some(dragged);
            }
        }
    }

    /// Animates a strip symbol from a lift position back to its slot. The
    /// grid is not involved; this is the no-drop and no-match path.
    pub fn snap_back(&mut self, slot: usize, from: (f64, f64)) {
        let (instance_id, kind) = match self.strip.get(slot).and_then(|slot| slot.as_ref()) {
            Some(instance) => (instance.id, instance.kind),
            None => return,
        };
        let (sx, sy) = self.strip_position(slot);
        let mut animators: Vec<Box<dyn Animation<Frame = FloatingSymbol>>> =
            vec![Box::new(SymbolAnimator::new(
                instance_id,
                kind,
                (from.0, sx),
                (from.1, sy),
                (1., 1.),
                0,
                SNAP_BACK_FRAMES,
            ))];
        animators.extend(self.grid_holds(&BTreeSet::new()));
        animators.extend(self.strip_holds_except(instance_id));
        self.stream.push(Animator::new(animators));
    }

    /// The refill algorithm. Works per affected column independently: play
    /// the removal animations, splice the column, then drop everything to its
    /// row-indexed resting position with a reverse stagger. Returns the epoch
    /// the caller must present when the join drains.
    pub fn cascade(
        &mut self,
        extract: &[usize],
        insert: &[SymbolKind],
        rng: &mut impl Rng,
    ) -> u64 {
        self.cascading = true;
        let size = self.config.cell_size;

        // pair each extraction with its replacement before grouping so the
        // per-column order matches the original extraction order
        let mut by_column: BTreeMap<usize, Vec<(usize, Option<SymbolKind>)>> = BTreeMap::new();
        for (i, &index) in extract.iter().enumerate() {
            let (column, row) = self.grid.position_of(index);
            by_column
                .entry(column)
                .or_default()
                .push((row, insert.get(i).copied()));
        }
        for pairs in by_column.values_mut() {
            pairs.sort_by_key(|&(row, _)| row);
        }

        let done = Rc::new(Cell::new(0usize));
        let mut total = 0usize;
        let mut timelines: Vec<Box<dyn Animation<Frame = Vec<FloatingSymbol>>>> = Vec::new();

        for (&column, pairs) in &by_column {
            let rows: Vec<usize> = pairs.iter().map(|&(row, _)| row).collect();

            // step 1: removal animations through the visual contract; a
            // playback that fails to start counts as already finished
            let removed_cells = self.grid.remove_rows(column, &rows);
            let mut removed = Vec::with_capacity(removed_cells.len());
            for cell in &removed_cells {
                if let Some(instance) = self.placed.remove(&cell.id) {
                    removed.push(instance);
                }
            }
            let mut fades: Vec<Box<dyn Animation<Frame = FloatingSymbol>>> = Vec::new();
            for instance in removed.iter_mut() {
                let frames = self
                    .catalog
                    .style_or_placeholder(instance.kind)
                    .animation(WIN_ANIMATION)
                    .map_or(1, |spec| spec.frames);
                total += 1;
                let counter = done.clone();
                let started = instance.visual.play_animation(
                    WIN_ANIMATION,
                    false,
                    1.,
                    Some(Box::new(move || counter.set(counter.get() + 1))),
                );
                match started {
                    Ok(()) => instance.is_animating = true,
                    Err(err) => {
                        log::warn(&format!(
                            "win animation failed for symbol {}: {err}",
                            instance.id
                        ));
                        done.set(done.get() + 1);
                    }
                }
                fades.push(Box::new(SymbolAnimator::new(
                    instance.id,
                    instance.kind,
                    (instance.x, instance.x),
                    (instance.y, instance.y),
                    (1., 0.),
                    0,
                    frames,
                )));
            }

            // step 3: replacements enter above the visible area
            let mut entering = Vec::new();
            for &(_, kind) in pairs {
                if let Some(kind) = kind {
                    if self.catalog.style(kind).is_none() {
                        log::warn(&format!(
                            "no style for symbol kind {}; using the placeholder",
                            kind.0
                        ));
                    }
                    let mut instance = self.pool.get(kind);
                    instance.set_position(column as f64 * size, -size);
                    entering.push(instance.cell());
                    self.placed.insert(instance.id, instance);
                }
            }
            self.grid.prepend(column, entering);

            // step 4: normalize the column back to exactly `rows` symbols
            for cell in self.grid.trim_excess(column) {
                if let Some(instance) = self.placed.remove(&cell.id) {
                    self.pool.give_back(instance);
                }
            }
            while self.grid.shortfall(column) > 0 {
                let kind = match self.catalog.random_kind(rng) {
                    Some(kind) => kind,
                    None => break,
                };
                let mut instance = self.pool.get(kind);
                let row = self.grid.column(column).len();
                let (x, y) = self.cell_position(column, row);
                instance.set_position(x, y);
                self.grid.push(column, instance.cell());
                self.placed.insert(instance.id, instance);
            }

            // the rest of the column stays on screen while the fades play
            let survivors: Vec<SymbolCell> = self.grid.column(column).to_vec();
            for cell in &survivors {
                if let Some(instance) = self.placed.get(&cell.id) {
                    fades.push(Box::new(SymbolAnimator::hold(
                        instance.id,
                        instance.kind,
                        instance.x,
                        instance.y,
                        1.,
                    )));
                }
            }

            // step 5: everything settles to its row-indexed resting position,
            // staggered so tiles nearer the bottom move first
            let count = survivors.len();
            let mut drops: Vec<Box<dyn Animation<Frame = FloatingSymbol>>> = Vec::new();
            for (row, cell) in survivors.iter().enumerate() {
                let instance = match self.placed.get_mut(&cell.id) {
                    Some(instance) => instance,
                    None => continue,
                };
                let (x, final_y) = (column as f64 * size, row as f64 * size);
                if (instance.y - final_y).abs() <= SETTLE_EPSILON {
                    instance.set_position(x, final_y);
                    drops.push(Box::new(SymbolAnimator::hold(
                        instance.id,
                        instance.kind,
                        x,
                        final_y,
                        1.,
                    )));
                } else {
                    let start_y = if instance.y <= final_y { instance.y } else { -size };
                    let delay = (count - row) * STAGGER_FRAMES;
                    drops.push(Box::new(SymbolAnimator::new(
                        instance.id,
                        instance.kind,
                        (x, x),
                        (start_y, final_y),
                        (1., 1.),
                        delay,
                        DROP_FRAMES,
                    )));
                    instance.set_position(x, final_y);
                }
            }

            timelines.push(Box::new(AnimationChain::new(vec![
                Box::new(Animator::new(fades)) as Box<dyn Animation<Frame = Vec<FloatingSymbol>>>,
                Box::new(Animator::new(drops)),
            ])));
            self.pending_release.extend(removed);
        }

        self.wins_pending = Some(WinsPending { done, total });

        // untouched columns and the strip are held on screen for the join
        let touched: BTreeSet<usize> = by_column.keys().copied().collect();
        let mut holds = self.grid_holds(&touched);
        holds.extend(self.strip_holds());
        timelines.push(Box::new(Animator::new(holds)));

        self.stream.push(MergeAnimator::new(timelines));
        self.epoch
    }

    /// Returns the extracted instances to the pool and lifts the mask, once
    /// the join has drained and the completion is not stale.
    pub fn finish_cascade(&mut self) {
        for instance in self.pending_release.drain(..) {
            self.pool.give_back(instance);
        }
        self.wins_pending = None;
        self.cascading = false;
    }

    pub fn animate(&mut self, frames: usize) {
        if frames == 0 {
            return;
        }
        self.stream.advance_frames(frames);
        self.registry.borrow_mut().tick(frames);
        let wins_done = self
            .wins_pending
            .as_ref()
            .map_or(false, |pending| pending.done.get() >= pending.total);
        if wins_done {
            for instance in self.pending_release.iter_mut() {
                instance.is_animating = false;
                instance.visual.set_visible(false);
            }
            self.wins_pending = None;
        }
    }

    /// What the renderer draws this frame: the transition timeline while one
    /// is running, the settled side table otherwise.
    pub fn frame(&self) -> Vec<FloatingSymbol> {
        match self.stream.current_frame() {
            Some(frame) => frame,
            None => self.registry.borrow().frame(),
        }
    }

    /// Releases the whole board: every instance back to the pool, then the
    /// pool itself.
    pub fn destroy(mut self) {
        self.grid.clear();
        for (_, instance) in self.placed.drain() {
            self.pool.give_back(instance);
        }
        for slot in self.strip.iter_mut() {
            if let Some(instance) = slot.take() {
                self.pool.give_back(instance);
            }
        }
        for instance in self.pending_release.drain(..) {
            self.pool.give_back(instance);
        }
        self.pool.destroy();
    }

    fn grid_holds(
        &self,
        skip_columns: &BTreeSet<usize>,
    ) -> Vec<Box<dyn Animation<Frame = FloatingSymbol>>> {
        self.grid
            .iter_cells()
            .filter(|(column, _, _)| !skip_columns.contains(column))
            .filter_map(|(_, _, cell)| {
                self.placed.get(&cell.id).map(|instance| {
                    Box::new(SymbolAnimator::hold(
                        instance.id,
                        instance.kind,
                        instance.x,
                        instance.y,
                        1.,
                    )) as Box<dyn Animation<Frame = FloatingSymbol>>
                })
            })
            .collect()
    }

    fn strip_holds(&self) -> Vec<Box<dyn Animation<Frame = FloatingSymbol>>> {
        self.strip
            .iter()
            .flatten()
            .map(|instance| {
                Box::new(SymbolAnimator::hold(
                    instance.id,
                    instance.kind,
                    instance.x,
                    instance.y,
                    1.,
                )) as Box<dyn Animation<Frame = FloatingSymbol>>
            })
            .collect()
    }

    fn strip_holds_except(
        &self,
        skip_id: usize,
    ) -> Vec<Box<dyn Animation<Frame = FloatingSymbol>>> {
        self.strip
            .iter()
            .flatten()
            .filter(|instance| instance.id != skip_id)
            .map(|instance| {
                Box::new(SymbolAnimator::hold(
                    instance.id,
                    instance.kind,
                    instance.x,
                    instance.y,
                    1.,
                )) as Box<dyn Animation<Frame = FloatingSymbol>>
            })
            .collect()
    }

    #[cfg(test)]
    pub fn force_grid(&mut self, rows: &[&[SymbolKind]]) {
        self.grid.clear();
        for (_, instance) in self.placed.drain() {
            self.pool.give_back(instance);
        }
        for (row, kinds) in rows.iter().enumerate() {
            for (column, &kind) in kinds.iter().enumerate() {
                let mut instance = self.pool.get(kind);
                let (x, y) = self.cell_position(column, row);
                instance.set_position(x, y);
                self.grid.push(column, instance.cell());
                self.placed.insert(instance.id, instance);
            }
        }
    }

    #[cfg(test)]
    pub fn force_strip(&mut self, kinds: &[SymbolKind]) {
        for slot in self.strip.iter_mut() {
            if let Some(instance) = slot.take() {
                self.pool.give_back(instance);
            }
        }
        for (slot, &kind) in kinds.iter().enumerate() {
            let mut instance = self.pool.get(kind);
            let (x, y) = self.strip_position(slot);
            instance.set_position(x, y);
            self.strip[slot] = Some(instance);
        }
    }

    #[cfg(test)]
    pub fn placed_position(&self, column: usize, row: usize) -> Option<(f64, f64)> {
        let cell = self.grid.cell(column, row)?;
        self.placed
            .get(&cell.id)
            .map(|instance| (instance.x, instance.y))
    }

    #[cfg(test)]
    pub fn pool_idle_count(&self) -> usize {
        self.pool.idle_count()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::game::test_support::{broken_factory, catalog, config, instant_factory};
    use rand::SeedableRng;

    const B: SymbolKind = SymbolKind(0);
    const G: SymbolKind = SymbolKind(1);
    const P: SymbolKind = SymbolKind(2);

    const NAMES: &[(&str, &str)] = &[("b", "#00F"), ("g", "#0F0"), ("p", "#F0F")];

    fn board() -> CascadeBoard {
        CascadeBoard::with_factory(config(NAMES), catalog(NAMES), instant_factory())
    }

    fn rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(11)
    }

    #[test]
    fn test_fill_grid_fills_every_cell_once() {
        let mut board = board();
        let mut rng = rng();
        board.fill_grid(&mut rng);

        assert!(board.grid().is_full());
        let mut seen = BTreeSet::new();
        for (_, _, cell) in board.grid().iter_cells() {
            assert!(seen.insert(cell.id), "instance {} referenced twice", cell.id);
        }
        assert_eq!(seen.len(), 25);
        assert_eq!(board.epoch(), 1);
    }

    #[test]
    fn test_refill_recycles_through_the_pool() {
        let mut board = board();
        let mut rng = rng();
        board.fill_grid(&mut rng);
        let first: BTreeSet<usize> = board.grid().iter_cells().map(|(_, _, c)| c.id).collect();

        board.fill_grid(&mut rng);
        let second: BTreeSet<usize> = board.grid().iter_cells().map(|(_, _, c)| c.id).collect();

        // same-kind slots are reused, so the id universe barely grows
        assert!(board.grid().is_full());
        assert!(second.iter().any(|id| first.contains(id)));
        assert_eq!(board.epoch(), 2);
    }

    #[test]
    fn test_empty_catalog_places_nothing() {
        let empty: &[(&str, &str)] = &[];
        let mut board = CascadeBoard::with_factory(config(empty), catalog(empty), instant_factory());
        let mut rng = rng();
        board.fill_grid(&mut rng);
        board.refresh_strip(&mut rng);

        assert!(!board.grid().is_full());
        assert!(board.strip_kinds().is_empty());
        assert!(board.strip_kind(0).is_none());
    }

    #[test]
    fn test_refresh_strip_offers_option_count_symbols() {
        let mut board = board();
        let mut rng = rng();
        board.refresh_strip(&mut rng);
        assert_eq!(board.strip_kinds().len(), 3);
        assert!(board.strip_instance_id(0).is_some());

        board.refresh_strip(&mut rng);
        assert_eq!(board.strip_kinds().len(), 3);
        // evicted strip symbols go back through the pool
        assert!(board.pool_idle_count() <= 3);
    }

    #[test]
    fn test_resolve_drop_bounds_checked() {
        let board = board();
        assert_eq!(board.resolve_drop(-5., 50.), None);
        assert_eq!(board.resolve_drop(50., -5.), None);
        assert_eq!(board.resolve_drop(501., 50.), None);
        assert_eq!(board.resolve_drop(50., 501.), None);

        let drop = board.resolve_drop(250., 130.).unwrap();
        assert_eq!((drop.column, drop.row), (2, 1));
        assert_eq!(drop.index, 7);
    }

    #[test]
    fn test_strip_slot_hit_test() {
        let mut board = board();
        let mut rng = rng();
        board.refresh_strip(&mut rng);

        let (x, y) = board.strip_position(1);
        assert_eq!(board.strip_slot_at(x + 10., y + 10.), Some(1));
        assert_eq!(board.strip_slot_at(x + 10., y - 200.), None);
    }

    #[test]
    fn test_commit_drop_swaps_with_strip_slot() {
        let mut board = board();
        board.force_grid(&[
            &[G, G, P, G, P],
            &[P, P, G, P, G],
            &[G, B, P, B, G],
            &[P, G, G, P, P],
            &[G, P, P, G, G],
        ]);
        board.force_strip(&[B, G, P]);

        let drop = DropInfo {
            row: 2,
            column: 2,
            index: 12,
        };
        board.commit_drop(0, drop);

        assert_eq!(board.grid().kind_at(2, 2), Some(B));
        assert_eq!(board.strip_kind(0), Some(P));
        assert_eq!(board.placed_position(2, 2), Some((200., 200.)));
    }

    #[test]
    fn test_empty_cascade_still_resolves() {
        let mut board = board();
        let mut rng = rng();
        board.fill_grid(&mut rng);
        board.animate(FILL_FADE_FRAMES + 1);
        assert!(!board.is_animating());

        board.cascade(&[], &[], &mut rng);
        assert!(board.is_cascading());
        board.animate(2);
        assert!(!board.is_animating());
        board.finish_cascade();
        assert!(!board.is_cascading());
        assert!(board.grid().is_full());
    }

    #[test]
    fn test_cascade_refills_the_column_in_order() {
        let mut board = board();
        let mut rng = rng();
        board.force_grid(&[
            &[G, G, P, G, P],
            &[P, P, B, P, G],
            &[G, B, B, B, G],
            &[P, G, B, P, P],
            &[G, P, P, G, G],
        ]);

        // vertical run in column 2, rows 1..=3
        let extract = [7, 12, 17];
        board.cascade(&extract, &[G, G, G], &mut rng);
        board.animate(300);
        assert!(!board.is_animating());

        assert_eq!(board.grid().column(2).len(), 5);
        assert_eq!(board.grid().kind_at(2, 0), Some(G));
        assert_eq!(board.grid().kind_at(2, 1), Some(G));
        assert_eq!(board.grid().kind_at(2, 2), Some(G));
        // the survivors kept their order below the replacements
        assert_eq!(board.grid().kind_at(2, 3), Some(P));
        assert_eq!(board.grid().kind_at(2, 4), Some(P));

        for row in 0..5usize {
            assert_eq!(
                board.placed_position(2, row),
                Some((200., row as f64 * 100.))
            );
        }

        let idle_before = board.pool_idle_count();
        board.finish_cascade();
        assert_eq!(board.pool_idle_count(), idle_before + 3);
    }

    #[test]
    fn test_cascade_with_failing_win_animations_completes() {
        let mut board =
            CascadeBoard::with_factory(config(NAMES), catalog(NAMES), broken_factory());
        let mut rng = rng();
        board.force_grid(&[
            &[G, G, P, G, P],
            &[P, P, B, P, G],
            &[G, B, B, B, G],
            &[P, G, B, P, P],
            &[G, P, P, G, G],
        ]);

        board.cascade(&[7, 12, 17], &[B, G, P], &mut rng);
        board.animate(300);
        assert!(!board.is_animating());
        board.finish_cascade();
        assert!(board.grid().is_full());
    }

    #[test]
    fn test_cascade_frames_cover_the_whole_board() {
        let mut board = board();
        let mut rng = rng();
        board.force_grid(&[
            &[G, G, P, G, P],
            &[P, P, B, P, G],
            &[G, B, B, B, G],
            &[P, G, B, P, P],
            &[G, P, P, G, G],
        ]);

        board.cascade(&[7, 12, 17], &[G, G, G], &mut rng);
        board.animate(1);
        // three fading extractions, five settling in column 2, twenty held
        assert_eq!(board.frame().len(), 28);

        // once the removal stage is over the extracted symbols are gone
        board.animate(40);
        assert_eq!(board.frame().len(), 25);
    }

    #[test]
    fn test_destroy_returns_everything_to_the_pool() {
        let mut board = board();
        let mut rng = rng();
        board.fill_grid(&mut rng);
        board.refresh_strip(&mut rng);
        board.destroy();
    }

    #[test]
    fn test_disabled_board_blocks_drag() {
        let mut board = board();
        let mut rng = rng();
        board.refresh_strip(&mut rng);
        assert!(board.can_drag(0));

        board.set_disabled(true);
        assert!(!board.can_drag(0));
        assert!(board.is_disabled());

        board.set_disabled(false);
        assert!(board.can_drag(0));
    }

    #[test]
    fn test_snap_back_only_queues_an_animation() {
        let mut board = board();
        let mut rng = rng();
        board.fill_grid(&mut rng);
        board.refresh_strip(&mut rng);
        board.animate(FILL_FADE_FRAMES + 1);
        let before = board.grid().clone();

        board.snap_back(1, (220., 410.));
        assert!(board.is_animating());
        board.animate(SNAP_BACK_FRAMES + 1);
        assert!(!board.is_animating());
        assert_eq!(*board.grid(), before);
    }
}
