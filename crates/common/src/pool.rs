use crate::catalog::{StyleOverride, SymbolCatalog, SymbolKind, SymbolStyle};
use crate::board::SymbolCell;
use crate::visual::SymbolVisual;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Builds the renderable for a freshly constructed pool slot.
pub type VisualFactory = Box<dyn Fn(usize, SymbolKind, &SymbolStyle) -> Box<dyn SymbolVisual>>;

/// A recyclable symbol: one pool slot and its renderable handle. The id is
/// unique for the session; `kind` is whatever type the slot currently plays.
pub struct SymbolInstance {
    pub id: usize,
    pub kind: SymbolKind,
    pub x: f64,
    pub y: f64,
    pub is_animating: bool,
    pub visual: Box<dyn SymbolVisual>,
}

impl SymbolInstance {
    pub fn cell(&self) -> SymbolCell {
        SymbolCell {
            id: self.id,
            kind: self.kind,
        }
    }

    /// Moves the symbol, keeping the model position and the renderable in step.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        self.visual.set_position(x, y);
    }

    fn reset(&mut self) {
        self.is_animating = false;
        self.visual.stop_animation();
        self.visual.set_visible(true);
    }
}

/// Recycles symbol instances keyed by their type so a session churns through
/// a handful of renderables instead of one per spawn.
///
/// Ownership is strict: idle instances belong to the pool, everything handed
/// out belongs to the board until given back. `destroy` consumes the pool, so
/// a destroyed pool cannot be used again by construction.
pub struct SymbolPool {
    catalog: Rc<SymbolCatalog>,
    factory: VisualFactory,
    idle: BTreeMap<SymbolKind, Vec<SymbolInstance>>,
    next_id: usize,
}

impl SymbolPool {
    pub fn new(catalog: Rc<SymbolCatalog>, factory: VisualFactory) -> Self {
        SymbolPool {
            catalog,
            factory,
            idle: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// A reset, visible instance of the requested kind: a recycled one when
    /// available, otherwise freshly built from the catalog style. Unknown
    /// kinds build from the placeholder style rather than failing.
    pub fn get(&mut self, kind: SymbolKind) -> SymbolInstance {
        self.get_with(kind, None)
    }

    pub fn get_with(&mut self, kind: SymbolKind, over: Option<&StyleOverride>) -> SymbolInstance {
        let mut instance = match self.idle.get_mut(&kind).and_then(Vec::pop) {
            Some(instance) => instance,
            None => {
                let base = self.catalog.style_or_placeholder(kind);
                let style = match over {
                    Some(over) => base.merged(over),
                    None => base.clone(),
                };
                let id = self.next_id;
                self.next_id += 1;
                SymbolInstance {
                    id,
                    kind,
                    x: 0.,
                    y: 0.,
                    is_animating: false,
                    visual: (self.factory)(id, kind, &style),
                }
            }
        };
        instance.reset();
        instance
    }

    /// Files the instance under its kind for reuse, hidden and stopped.
    pub fn give_back(&mut self, mut instance: SymbolInstance) {
        instance.is_animating = false;
        instance.visual.stop_animation();
        instance.visual.set_visible(false);
        self.idle.entry(instance.kind).or_default().push(instance);
    }

    pub fn idle_count(&self) -> usize {
        self.idle.values().map(Vec::len).sum()
    }

    /// Releases every pooled renderable. Consuming `self` makes
    /// use-after-destroy unrepresentable.
    pub fn destroy(self) {
        for (_, instances) in self.idle {
            for mut instance in instances {
                instance.visual.release();
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::visual::{OnComplete, VisualError};
    use std::cell::RefCell;

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    struct Recorded {
        visible: Option<bool>,
        position: (f64, f64),
        released: bool,
    }

    /// Test double in place of a renderable; records what the pool drives.
    struct RecordingVisual {
        id: usize,
        log: Rc<RefCell<Vec<(usize, Recorded)>>>,
        state: Recorded,
    }

    impl SymbolVisual for RecordingVisual {
        fn set_position(&mut self, x: f64, y: f64) {
            self.state.position = (x, y);
            self.log.borrow_mut().push((self.id, self.state));
        }

        fn set_visible(&mut self, visible: bool) {
            self.state.visible = Some(visible);
            self.log.borrow_mut().push((self.id, self.state));
        }

        fn play_animation(
            &mut self,
            _name: &str,
            _looped: bool,
            _speed: f64,
            _on_complete: Option<OnComplete>,
        ) -> Result<(), VisualError> {
            Ok(())
        }

        fn stop_animation(&mut self) {}

        fn release(&mut self) {
            self.state.released = true;
            self.log.borrow_mut().push((self.id, self.state));
        }
    }

    fn pool_with_log() -> (SymbolPool, Rc<RefCell<Vec<(usize, Recorded)>>>) {
        let symbols = [
            ("b".to_string(), SymbolStyle::new("b", "#00F")),
            ("g".to_string(), SymbolStyle::new("g", "#0F0")),
        ]
        .into_iter()
        .collect();
        let catalog = Rc::new(SymbolCatalog::new(&symbols));
        let log: Rc<RefCell<Vec<(usize, Recorded)>>> = Rc::default();
        let cloned_log = log.clone();
        let factory: VisualFactory = Box::new(move |id, _kind, _style| {
            Box::new(RecordingVisual {
                id,
                log: cloned_log.clone(),
                state: Recorded::default(),
            })
        });
        (SymbolPool::new(catalog, factory), log)
    }

    #[test]
    fn test_get_reuses_same_kind_only() {
        let (mut pool, _log) = pool_with_log();
        let b = pool.get(SymbolKind(0));
        let b_id = b.id;
        pool.give_back(b);

        let g = pool.get(SymbolKind(1));
        assert_ne!(g.id, b_id, "different kind must not reuse the slot");

        let b_again = pool.get(SymbolKind(0));
        assert_eq!(b_again.id, b_id);
        assert_eq!(pool.idle_count(), 0);
    }

    #[test]
    fn test_give_back_hides_and_get_shows() {
        let (mut pool, log) = pool_with_log();
        let instance = pool.get(SymbolKind(0));
        assert_eq!(log.borrow().last().unwrap().1.visible, Some(true));
        pool.give_back(instance);
        assert_eq!(log.borrow().last().unwrap().1.visible, Some(false));
        let reused = pool.get(SymbolKind(0));
        assert_eq!(log.borrow().last().unwrap().1.visible, Some(true));
        assert!(!reused.is_animating);
    }

    #[test]
    fn test_unknown_kind_builds_placeholder() {
        let (mut pool, _log) = pool_with_log();
        let instance = pool.get(SymbolKind(9));
        assert_eq!(instance.kind, SymbolKind(9));
    }

    #[test]
    fn test_destroy_releases_all_idle_visuals() {
        let (mut pool, log) = pool_with_log();
        let a = pool.get(SymbolKind(0));
        let b = pool.get(SymbolKind(1));
        pool.give_back(a);
        pool.give_back(b);
        pool.destroy();
        let released = log
            .borrow()
            .iter()
            .filter(|(_, state)| state.released)
            .count();
        assert_eq!(released, 2);
    }

    #[test]
    fn test_instance_position_tracks_visual() {
        let (mut pool, log) = pool_with_log();
        let mut instance = pool.get(SymbolKind(0));
        instance.set_position(200., 300.);
        assert_eq!((instance.x, instance.y), (200., 300.));
        assert_eq!(log.borrow().last().unwrap().1.position, (200., 300.));
    }
}
