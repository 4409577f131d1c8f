use std::error::Error;
use std::fmt;

/// Completion callback handed to `play_animation`. Fired exactly once when
/// the playback finishes; implementations must not call back into the board.
pub type OnComplete = Box<dyn FnOnce()>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VisualError {
    UnknownAnimation(String),
}

impl fmt::Display for VisualError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisualError::UnknownAnimation(name) => {
                write!(f, "unknown animation \"{name}\"")
            }
        }
    }
}

impl Error for VisualError {}

/// Contract the board consumes to drive a symbol's renderable. The concrete
/// renderer behind it is opaque to the game model.
pub trait SymbolVisual {
    fn set_position(&mut self, x: f64, y: f64);

    fn set_visible(&mut self, visible: bool);

    /// Starts the named animation. A failed start is reported back so the
    /// caller can treat the playback as already completed; `on_complete` is
    /// dropped unfired in that case.
    fn play_animation(
        &mut self,
        name: &str,
        looped: bool,
        speed: f64,
        on_complete: Option<OnComplete>,
    ) -> Result<(), VisualError>;

    fn stop_animation(&mut self);

    /// Releases the renderable's resources; the visual is unusable after.
    fn release(&mut self);
}
