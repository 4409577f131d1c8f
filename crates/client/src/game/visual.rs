use crate::game::animation::{interpolation, FloatingSymbol};
use common::catalog::{AnimationSpec, SymbolKind, SymbolStyle};
use common::pool::VisualFactory;
use common::visual::{OnComplete, SymbolVisual, VisualError};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

struct Playing {
    spec: AnimationSpec,
    looped: bool,
    speed: f64,
    elapsed: f64,
    on_complete: Option<OnComplete>,
}

/// Display state of one pooled symbol, shared between its `SvgVisual` handle
/// and the registry that renders and ticks it.
pub struct VisualState {
    pub kind: SymbolKind,
    pub x: f64,
    pub y: f64,
    pub visible: bool,
    playing: Option<Playing>,
}

impl VisualState {
    fn floating(&self, id: usize) -> FloatingSymbol {
        let opacity = match &self.playing {
            Some(playing) => {
                let frames = playing.spec.frames.max(1) as f64;
                let position = if playing.looped {
                    (playing.elapsed % frames) / frames
                } else {
                    (playing.elapsed / frames).min(1.)
                };
                interpolation(playing.spec.opacity, position)
            }
            None => 1.,
        };
        FloatingSymbol {
            id,
            kind: self.kind,
            x: self.x,
            y: self.y,
            opacity,
        }
    }
}

/// Side table from instance id to display state: the renderer reads it for
/// idle frames and the game ticks it to drive named-animation playback.
#[derive(Default)]
pub struct VisualRegistry {
    states: BTreeMap<usize, Rc<RefCell<VisualState>>>,
}

impl VisualRegistry {
    pub fn new() -> Self {
        VisualRegistry::default()
    }

    fn register(&mut self, id: usize, state: Rc<RefCell<VisualState>>) {
        self.states.insert(id, state);
    }

    fn remove(&mut self, id: usize) {
        self.states.remove(&id);
    }

    /// Advances every running playback and fires the completions that
    /// finished this tick. Callbacks run after all borrows are released.
    pub fn tick(&mut self, frames: usize) {
        let mut completions: Vec<OnComplete> = Vec::new();
        for state in self.states.values() {
            let mut state = state.borrow_mut();
            let mut finished = false;
            if let Some(playing) = state.playing.as_mut() {
                playing.elapsed += frames as f64 * playing.speed;
                if !playing.looped && playing.elapsed >= playing.spec.frames as f64 {
                    if let Some(on_complete) = playing.on_complete.take() {
                        completions.push(on_complete);
                    }
                    finished = true;
                }
            }
            if finished {
                state.playing = None;
            }
        }
        for on_complete in completions {
            on_complete();
        }
    }

    /// Every visible symbol at rest, for rendering outside transitions.
    pub fn frame(&self) -> Vec<FloatingSymbol> {
        self.states
            .iter()
            .filter(|(_, state)| state.borrow().visible)
            .map(|(&id, state)| state.borrow().floating(id))
            .collect()
    }
}

/// The renderable handle the pool hands out: writes through to the shared
/// display state the registry renders from.
pub struct SvgVisual {
    id: usize,
    animations: BTreeMap<String, AnimationSpec>,
    state: Rc<RefCell<VisualState>>,
    registry: Rc<RefCell<VisualRegistry>>,
}

impl SymbolVisual for SvgVisual {
    fn set_position(&mut self, x: f64, y: f64) {
        let mut state = self.state.borrow_mut();
        state.x = x;
        state.y = y;
    }

    fn set_visible(&mut self, visible: bool) {
        self.state.borrow_mut().visible = visible;
    }

    fn play_animation(
        &mut self,
        name: &str,
        looped: bool,
        speed: f64,
        on_complete: Option<OnComplete>,
    ) -> Result<(), VisualError> {
        let spec = self
            .animations
            .get(name)
            .ok_or_else(|| VisualError::UnknownAnimation(name.to_string()))?;
        self.state.borrow_mut().playing = Some(Playing {
            spec: spec.clone(),
            looped,
            speed,
            elapsed: 0.,
            on_complete,
        });
        Ok(())
    }

    fn stop_animation(&mut self) {
        self.state.borrow_mut().playing = None;
    }

    fn release(&mut self) {
        self.registry.borrow_mut().remove(self.id);
    }
}

/// Pool factory wiring every new visual into the registry.
pub fn registry_factory(registry: Rc<RefCell<VisualRegistry>>) -> VisualFactory {
    Box::new(move |id, kind, style: &SymbolStyle| {
        let state = Rc::new(RefCell::new(VisualState {
            kind,
            x: 0.,
            y: 0.,
            visible: false,
            playing: None,
        }));
        registry.borrow_mut().register(id, state.clone());
        Box::new(SvgVisual {
            id,
            animations: style.animations.clone(),
            state,
            registry: registry.clone(),
        })
    })
}
