pub const WIDTH: usize = 64; // Pixels
pub const HEIGHT: usize = 32; // Pixels

/// Monochrome 64x32 frame buffer. Only the clear and draw instructions
/// change it; the host reads it to present a frame.
#[derive(Clone, PartialEq, Eq)]
pub struct Screen {
    pixels: [[bool; WIDTH]; HEIGHT],
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    pub fn new() -> Self {
        Screen {
            pixels: [[false; WIDTH]; HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [[false; WIDTH]; HEIGHT];
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y % HEIGHT][x % WIDTH]
    }

    pub fn rows(&self) -> &[[bool; WIDTH]; HEIGHT] {
        &self.pixels
    }

    /// (x, y) of every lit pixel
    pub fn lit(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pixels.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, on)| **on)
                .map(move |(x, _)| (x, y))
        })
    }

    /// XOR a sprite onto the screen and return whether any lit pixel was
    /// turned off.
    ///
    /// The start position wraps around the screen, but the sprite itself is
    /// clipped at the right and bottom edges.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let x0 = x as usize % WIDTH;
        let y0 = y as usize % HEIGHT;
        let mut collision = false;

        for (row, &bits) in sprite.iter().enumerate() {
            let y = y0 + row;
            if y >= HEIGHT {
                break;
            }

            for bit in 0..8 {
                let x = x0 + bit;
                if x >= WIDTH {
                    break;
                }

                if (0x80 >> bit) & bits != 0 {
                    let pixel = &mut self.pixels[y][x];
                    collision |= *pixel;
                    *pixel = !*pixel;
                }
            }
        }

        collision
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_screen_dark() {
        let s = Screen::new();
        assert_eq!(s.lit().count(), 0);
    }

    #[test]
    fn test_draw_sets_pixels() {
        let mut s = Screen::new();
        let collision = s.draw_sprite(2, 3, &[0b1010_0000]);
        assert!(!collision);
        assert_eq!(s.lit().collect::<Vec<_>>(), vec![(2, 3), (4, 3)]);
    }

    #[test]
    fn test_draw_twice_restores_and_collides() {
        let mut s = Screen::new();
        let before = s.clone();
        assert!(!s.draw_sprite(10, 10, &[0xF0, 0x90, 0xF0]));
        assert!(s.draw_sprite(10, 10, &[0xF0, 0x90, 0xF0]));
        assert!(s == before);
    }

    #[test]
    fn test_start_position_wraps() {
        let mut s = Screen::new();
        s.draw_sprite(64 + 1, 32 + 2, &[0x80]);
        assert!(s.pixel(1, 2));
    }

    #[test]
    fn test_clips_right_edge() {
        let mut s = Screen::new();
        s.draw_sprite(60, 0, &[0xFF]);
        assert_eq!(s.lit().count(), 4);
        assert!(!s.pixel(0, 0));
    }

    #[test]
    fn test_clips_bottom_edge() {
        let mut s = Screen::new();
        s.draw_sprite(0, 30, &[0x80, 0x80, 0x80, 0x80]);
        assert_eq!(s.lit().collect::<Vec<_>>(), vec![(0, 30), (0, 31)]);
    }

    #[test]
    fn test_clear() {
        let mut s = Screen::new();
        s.draw_sprite(0, 0, &[0xFF; 15]);
        s.clear();
        assert_eq!(s.lit().count(), 0);
    }
}
