pub mod animation;
pub mod board;
pub mod state;
pub mod visual;

pub use state::{CrushGame, Phase};

use common::board::DropInfo;

/// Typed inputs of the game store; the only way anything outside the reducer
/// affects the game.
pub enum GameAction {
    /// A staged symbol was released over a grid cell. `from` is the lift
    /// position the symbol snaps back from when the drop does not win.
    SymbolDropped {
        slot: usize,
        drop: DropInfo,
        from: (f64, f64),
    },
    /// A drag ended outside the grid.
    DragCancelled { slot: usize, from: (f64, f64) },
    /// Frame-clock tick from the requestAnimationFrame loop.
    Animate { frames: usize },
    Restart,
}

#[cfg(test)]
pub mod test_support {
    use common::catalog::{SymbolCatalog, SymbolStyle};
    use common::config::BoardConfig;
    use common::pool::VisualFactory;
    use common::visual::{OnComplete, SymbolVisual, VisualError};
    use std::rc::Rc;

    /// Renderable stub whose playbacks complete synchronously.
    pub struct InstantVisual;

    impl SymbolVisual for InstantVisual {
        fn set_position(&mut self, _x: f64, _y: f64) {}

        fn set_visible(&mut self, _visible: bool) {}

        fn play_animation(
            &mut self,
            _name: &str,
            _looped: bool,
            _speed: f64,
            on_complete: Option<OnComplete>,
        ) -> Result<(), VisualError> {
            if let Some(on_complete) = on_complete {
                on_complete();
            }
            Ok(())
        }

        fn stop_animation(&mut self) {}

        fn release(&mut self) {}
    }

    /// Renderable stub that refuses every playback.
    pub struct BrokenVisual;

    impl SymbolVisual for BrokenVisual {
        fn set_position(&mut self, _x: f64, _y: f64) {}

        fn set_visible(&mut self, _visible: bool) {}

        fn play_animation(
            &mut self,
            name: &str,
            _looped: bool,
            _speed: f64,
            _on_complete: Option<OnComplete>,
        ) -> Result<(), VisualError> {
            Err(VisualError::UnknownAnimation(name.to_string()))
        }

        fn stop_animation(&mut self) {}

        fn release(&mut self) {}
    }

    pub fn instant_factory() -> VisualFactory {
        Box::new(|_id, _kind, _style| Box::new(InstantVisual))
    }

    pub fn broken_factory() -> VisualFactory {
        Box::new(|_id, _kind, _style| Box::new(BrokenVisual))
    }

    pub fn config(names: &[(&str, &str)]) -> BoardConfig {
        BoardConfig {
            symbols: names
                .iter()
                .map(|&(name, color)| (name.to_string(), SymbolStyle::new(name, color)))
                .collect(),
            ..BoardConfig::default()
        }
    }

    pub fn catalog(names: &[(&str, &str)]) -> Rc<SymbolCatalog> {
        Rc::new(SymbolCatalog::new(&config(names).symbols))
    }
}
