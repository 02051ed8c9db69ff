use anyhow::{anyhow, Result};
use chip8_vm::screen::{Screen, HEIGHT, WIDTH};
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::video::Window;
use sdl2::{render::Canvas, Sdl};

const PIXEL_OFF_COLOR: Color = Color::RGB(0x99, 0x66, 0x01);
//const PIXEL_OFF_COLOR: Color = Color::RGB(0x0, 0x0, 0x0);
const PIXEL_ON_COLOR: Color = Color::RGB(0xff, 0xcc, 0x01);

pub struct Display {
    pub sdl_context: Sdl,
    pub canvas: Canvas<Window>,
    scale: u32,
}

impl Display {
    pub fn new(scale: u32) -> Result<Self> {
        let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
        let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;
        let window = video_subsystem
            .window("Chip-8", WIDTH as u32 * scale, HEIGHT as u32 * scale)
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| anyhow!(e.to_string()))?;
        let canvas = window
            .into_canvas()
            .build()
            .map_err(|e| anyhow!(e.to_string()))?;

        let mut screen = Display {
            sdl_context,
            canvas,
            scale,
        };

        screen.clear();
        screen.canvas.present();

        Ok(screen)
    }

    pub fn clear(&mut self) {
        self.canvas.set_draw_color(PIXEL_OFF_COLOR);
        self.canvas.clear();
    }

    /// repaint the whole window from the frame buffer
    pub fn present(&mut self, screen: &Screen) -> Result<()> {
        self.clear();
        self.canvas.set_draw_color(PIXEL_ON_COLOR);

        let rects: Vec<Rect> = screen
            .lit()
            .map(|(x, y)| pixel_rect(x, y, self.scale))
            .collect();
        if !rects.is_empty() {
            self.canvas.fill_rects(&rects).map_err(|e| anyhow!(e))?;
        }

        self.canvas.present();
        Ok(())
    }
}

fn pixel_rect(x: usize, y: usize, scale: u32) -> Rect {
    Rect::new(
        (x as u32 * scale) as i32,
        (y as u32 * scale) as i32,
        scale,
        scale,
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pixel_rect_scaled() {
        let r = pixel_rect(3, 2, 20);
        assert_eq!((r.x(), r.y(), r.width(), r.height()), (60, 40, 20, 20));
    }

    #[test]
    fn test_last_pixel_fits_window() {
        let r = pixel_rect(WIDTH - 1, HEIGHT - 1, 10);
        assert_eq!(r.right() as u32, WIDTH as u32 * 10);
        assert_eq!(r.bottom() as u32, HEIGHT as u32 * 10);
    }
}
