//! Frame-stepped open/close animation shared by every room object

/// Which end of the animation an object is heading for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Towards `progress() == 1`.
    Opening,
    /// Towards `progress() == 0`.
    #[default]
    Closing,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Opening => Direction::Closing,
            Direction::Closing => Direction::Opening,
        }
    }
}

/// Integer frame counter moving one step per rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    frame: u32,
    max_frames: u32,
    direction: Direction,
}

impl Animation {
    pub const DEFAULT_FRAMES: u32 = 20;

    /// At rest: frame 0, closing. A zero frame count is raised to 1.
    pub fn new(max_frames: u32) -> Self {
        Self {
            frame: 0,
            max_frames: max_frames.max(1),
            direction: Direction::Closing,
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn max_frames(&self) -> u32 {
        self.max_frames
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// `frame / max_frames`, always within `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.frame as f32 / self.max_frames as f32
    }

    /// Advances one frame towards the current direction's end and stops there.
    pub fn step(&mut self) {
        match self.direction {
            Direction::Opening if self.frame < self.max_frames => self.frame += 1,
            Direction::Closing if self.frame > 0 => self.frame -= 1,
            _ => {}
        }
    }

    /// Progress one [`step`](Self::step) from now, without stepping.
    pub fn next_progress(&self) -> f32 {
        let mut next = *self;
        next.step();
        next.progress()
    }

    /// Reverses direction. Mid-animation the object turns around where it is.
    pub fn toggle(&mut self) {
        self.direction = self.direction.flipped();
    }

    pub fn is_at_rest(&self) -> bool {
        match self.direction {
            Direction::Opening => self.frame == self.max_frames,
            Direction::Closing => self.frame == 0,
        }
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FRAMES)
    }
}
