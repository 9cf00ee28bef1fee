//! Scalars the demo loops mutate once per frame.
//!
//! Both types are plain values owned by a frame closure. They are never reset:
//! the state lives exactly as long as the window.

use crate::transform::{Matrix4, multiply, rotate_y};

/// A scalar that moves by a fixed step each frame and turns around at `±bound`.
///
/// The step is `speed * factor`. The bounds check runs after the move, so the
/// value overshoots by at most one step before heading back.
///
/// ```
/// use firstlight::Bounce;
///
/// let mut x = Bounce::sphere();
/// let first = x.step();
/// assert!((first - 0.005).abs() < 1e-6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounce {
    value: f32,
    speed: f32,
    factor: f32,
    bound: f32,
}

impl Bounce {
    pub fn new(start: f32, speed: f32, factor: f32, bound: f32) -> Self {
        Self {
            value: start,
            speed,
            factor,
            bound,
        }
    }

    /// The sphere demo's horizontal motion: starts at 0.0, moves 0.005 per frame,
    /// turns around past ±1.0.
    pub fn sphere() -> Self {
        Self::new(0.0, 0.5, 0.01, 1.0)
    }

    /// Advances one frame and returns the new value.
    pub fn step(&mut self) -> f32 {
        self.value += self.speed * self.factor;
        if self.value > self.bound || self.value < -self.bound {
            self.speed = -self.speed;
        }
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Largest distance from zero the value can reach.
    pub fn max_excursion(&self) -> f32 {
        self.bound + (self.speed * self.factor).abs()
    }
}

/// A model matrix that picks up a small Y rotation every frame.
///
/// The rotation is folded into the running matrix (`model = model · R`) rather
/// than rebuilt from a total angle, so rounding error accumulates over time.
#[derive(Clone, Copy, Debug)]
pub struct Spin {
    model: Matrix4,
    degrees_per_frame: f32,
    frames: u64,
}

impl Spin {
    pub fn new(model: Matrix4, degrees_per_frame: f32) -> Self {
        Self {
            model,
            degrees_per_frame,
            frames: 0,
        }
    }

    /// Applies one frame's rotation and returns the updated model matrix.
    pub fn step(&mut self) -> Matrix4 {
        self.model = multiply(self.model, rotate_y(self.degrees_per_frame));
        self.frames += 1;
        self.model
    }

    pub fn model(&self) -> Matrix4 {
        self.model
    }

    /// Number of frames applied so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
