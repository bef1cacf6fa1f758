pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

/// Row-major view of the monochrome pixel grid handed to presenters.
pub type FrameBuffer = [[bool; SCREEN_WIDTH]; SCREEN_HEIGHT];

pub struct Display {
    fb: FrameBuffer,
}

impl Display {
    pub fn new() -> Self {
        Self {
            fb: [[false; SCREEN_WIDTH]; SCREEN_HEIGHT],
        }
    }

    pub fn fb(&self) -> &FrameBuffer {
        &self.fb
    }

    /// Toggle the pixel at the coordinates and return true if it was already
    /// on. Coordinates outside the grid are ignored.
    pub(crate) fn toggle(&mut self, x: usize, y: usize) -> bool {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return false;
        }
        let prev = self.fb[y][x];
        self.fb[y][x] = !prev;
        prev
    }

    /// Clear the display contents by switching every pixel off
    pub(crate) fn clear(&mut self) {
        self.fb = [[false; SCREEN_WIDTH]; SCREEN_HEIGHT];
    }

    #[cfg(test)]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.fb[y][x]
    }
}
