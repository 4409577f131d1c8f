pub trait Animation {
    type Frame;

    fn advance_frames(&mut self, frames: usize);
    fn current_frame(&self) -> Self::Frame;
    fn is_over(&self) -> bool;
}

/// Joins animations that run in parallel; over when every member is over.
/// Members that finish early keep reporting their final frame until the join
/// completes.
pub struct Animator<T> {
    animations: Vec<Box<dyn Animation<Frame = T>>>,
}

impl<T> Animator<T> {
    pub fn new(animations: Vec<Box<dyn Animation<Frame = T>>>) -> Self {
        Animator { animations }
    }
}

impl<T> Animation for Animator<T> {
    type Frame = Vec<T>;

    fn advance_frames(&mut self, frames: usize) {
        for anim in self.animations.iter_mut() {
            anim.advance_frames(frames);
        }
    }

    fn current_frame(&self) -> Vec<T> {
        self.animations
            .iter()
            .map(|anim| anim.current_frame())
            .collect()
    }

    fn is_over(&self) -> bool {
        self.animations.iter().all(|anim| anim.is_over())
    }
}

/// Plays stages strictly one after another. The final stage keeps reporting
/// its last frame once the chain is over.
pub struct AnimationChain<T> {
    // reversed so the active stage is the last element
    animations: Vec<Box<dyn Animation<Frame = T>>>,
}

impl<T> AnimationChain<T> {
    pub fn new(animations: Vec<Box<dyn Animation<Frame = T>>>) -> Self {
        AnimationChain {
            animations: animations.into_iter().rev().collect(),
        }
    }
}

impl<T> Animation for AnimationChain<T> {
    type Frame = T;

    fn advance_frames(&mut self, frames: usize) {
        for _ in 0..frames {
            if let Some(anim) = self.animations.last_mut() {
                anim.advance_frames(1);
            } else {
                break;
            }

            while self.animations.len() >= 2 && self.animations.last().unwrap().is_over() {
                self.animations.pop();
            }
        }
    }

    fn current_frame(&self) -> T {
        self.animations.last().unwrap().current_frame()
    }

    fn is_over(&self) -> bool {
        self.animations.last().map_or(true, |anim| anim.is_over())
    }
}

/// Joins animations that each already produce a whole batch of frames,
/// flattening the batches. Used for the cascade: one chain per column plus
/// the held rest of the board, all advancing independently.
pub struct MergeAnimator<T> {
    animations: Vec<Box<dyn Animation<Frame = Vec<T>>>>,
}

impl<T> MergeAnimator<T> {
    pub fn new(animations: Vec<Box<dyn Animation<Frame = Vec<T>>>>) -> Self {
        MergeAnimator { animations }
    }
}

impl<T> Animation for MergeAnimator<T> {
    type Frame = Vec<T>;

    fn advance_frames(&mut self, frames: usize) {
        for anim in self.animations.iter_mut() {
            anim.advance_frames(frames);
        }
    }

    fn current_frame(&self) -> Vec<T> {
        self.animations
            .iter()
            .flat_map(|anim| anim.current_frame())
            .collect()
    }

    fn is_over(&self) -> bool {
        self.animations.iter().all(|anim| anim.is_over())
    }
}

/// Queue of animations played back to back; empty between transitions.
pub struct AnimationStream<T> {
    animations: Vec<Box<dyn Animation<Frame = T>>>,
}

impl<T> AnimationStream<T> {
    pub fn new() -> Self {
        AnimationStream {
            animations: Vec::new(),
        }
    }

    pub fn push(&mut self, animation: impl Animation<Frame = T> + 'static) {
        if !animation.is_over() {
            self.animations.push(Box::new(animation));
        }
    }

    pub fn clear(&mut self) {
        self.animations.clear();
    }
}

impl<T> Default for AnimationStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Animation for AnimationStream<T> {
    type Frame = Option<T>;

    fn advance_frames(&mut self, frames: usize) {
        for _ in 0..frames {
            if let Some(animation) = self.animations.first_mut() {
                animation.advance_frames(1);
            } else {
                break;
            }

            if self.animations[0].is_over() {
                self.animations.remove(0);
            }
        }
    }

    fn current_frame(&self) -> Option<T> {
        self.animations.first().map(|x| x.current_frame())
    }

    fn is_over(&self) -> bool {
        self.animations.is_empty()
    }
}

/// Converts the wall clock into elapsed 60fps frames between ticks. Lives at
/// the requestAnimationFrame boundary; everything below it works in frames.
pub struct FrameClock {
    begin_at: f64,
    elapsed_frames: usize,
}

impl FrameClock {
    pub fn new() -> Self {
        FrameClock {
            begin_at: js_sys::Date::now(),
            elapsed_frames: 0,
        }
    }

    pub fn tick(&mut self) -> usize {
        let elapsed = js_sys::Date::now() - self.begin_at;
        let frames = (elapsed / 1000.0 * 60.0).floor() as usize;
        let frame_delta = frames - self.elapsed_frames;
        self.elapsed_frames = frames;
        frame_delta
    }
}
