use std::collections::HashSet;

use image::{Rgb, RgbImage};
use ratatui::layout::Rect;

// Pixel block per terminal cell in the snapshot raster. Terminal cells are
// roughly twice as tall as wide, so the block keeps strokes proportional.
const CELL_PX_W: u32 = 10;
const CELL_PX_H: u32 = 20;

const INK: Rgb<u8> = Rgb([30, 30, 30]);
const PAPER: Rgb<u8> = Rgb([253, 251, 247]);

/// Drawing surface laid over the month grid.
///
/// Owns the stroke buffer exclusively; callers interact only through the
/// command methods below. While inactive all input is ignored. Points are
/// stored in surface-local cell coordinates.
#[derive(Debug, Default)]
pub struct StrokeCanvas {
    area: Rect,
    active: bool,
    strokes: Vec<Vec<(u16, u16)>>,
    current: Option<Vec<(u16, u16)>>,
}

impl StrokeCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the screen region the surface covers. Called on every layout
    /// pass; strokes already captured keep their coordinates.
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Gates input. Deactivation ends any stroke in progress but leaves the
    /// buffer alone; clearing is a separate, caller-driven command.
    pub fn set_active(&mut self, active: bool) {
        if !active {
            self.end_stroke();
        }
        self.active = active;
    }

    /// Starts a stroke session at the given screen position.
    pub fn begin_stroke(&mut self, column: u16, row: u16) {
        if !self.active {
            return;
        }
        match self.to_local(column, row) {
            Some(p) => self.current = Some(vec![p]),
            None => self.current = None,
        }
    }

    /// Extends the stroke in progress. A sample outside the surface ends the
    /// stroke, the pointer-leave rule.
    pub fn extend_stroke(&mut self, column: u16, row: u16) {
        if !self.active {
            return;
        }
        match self.to_local(column, row) {
            Some(p) => {
                if let Some(stroke) = self.current.as_mut() {
                    if stroke.last() != Some(&p) {
                        stroke.push(p);
                    }
                }
            }
            None => self.end_stroke(),
        }
    }

    pub fn end_stroke(&mut self) {
        if let Some(stroke) = self.current.take() {
            // a lone press with no movement draws nothing
            if stroke.len() >= 2 {
                self.strokes.push(stroke);
            }
        }
    }

    /// True once the first segment has been drawn, until cleared.
    pub fn has_content(&self) -> bool {
        !self.strokes.is_empty()
            || self.current.as_ref().is_some_and(|s| s.len() >= 2)
    }

    /// Drops all strokes. A no-op on an already-empty surface.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.current = None;
    }

    /// Cells touched by any stroke, for rendering the ink overlay.
    pub fn inked_cells(&self) -> HashSet<(u16, u16)> {
        let mut cells = HashSet::new();
        for stroke in self.strokes.iter().chain(self.current.as_ref()) {
            for pair in stroke.windows(2) {
                for (x, y) in line_points(
                    (pair[0].0 as i32, pair[0].1 as i32),
                    (pair[1].0 as i32, pair[1].1 as i32),
                ) {
                    cells.insert((x as u16, y as u16));
                }
            }
        }
        cells
    }

    /// Encodes the accumulated strokes as a PNG, or `None` when there is
    /// nothing to send.
    pub fn snapshot(&self) -> Option<Vec<u8>> {
        if !self.has_content() || self.area.width == 0 || self.area.height == 0 {
            return None;
        }

        let width = self.area.width as u32 * CELL_PX_W;
        let height = self.area.height as u32 * CELL_PX_H;
        let mut img = RgbImage::from_pixel(width, height, PAPER);

        for stroke in self.strokes.iter().chain(self.current.as_ref()) {
            for pair in stroke.windows(2) {
                let a = cell_center(pair[0]);
                let b = cell_center(pair[1]);
                for (x, y) in line_points(a, b) {
                    stamp(&mut img, x, y);
                }
            }
        }

        let mut buf = Vec::new();
        if let Err(err) = img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        {
            log::error!("failed to encode stroke snapshot: {err}");
            return None;
        }
        Some(buf)
    }

    fn to_local(&self, column: u16, row: u16) -> Option<(u16, u16)> {
        if column >= self.area.x
            && column < self.area.x + self.area.width
            && row >= self.area.y
            && row < self.area.y + self.area.height
        {
            Some((column - self.area.x, row - self.area.y))
        } else {
            None
        }
    }
}

fn cell_center((x, y): (u16, u16)) -> (i32, i32) {
    (
        (x as u32 * CELL_PX_W + CELL_PX_W / 2) as i32,
        (y as u32 * CELL_PX_H + CELL_PX_H / 2) as i32,
    )
}

/// Stamps a 3x3 dot so strokes read as pen lines rather than hairlines.
fn stamp(img: &mut RgbImage, x: i32, y: i32) {
    for dy in -1..=1 {
        for dx in -1..=1 {
            let (px, py) = (x + dx, y + dy);
            if px >= 0 && py >= 0 && (px as u32) < img.width() && (py as u32) < img.height() {
                img.put_pixel(px as u32, py as u32, INK);
            }
        }
    }
}

/// Bresenham walk from `a` to `b`, inclusive.
fn line_points(a: (i32, i32), b: (i32, i32)) -> Vec<(i32, i32)> {
    let (mut x0, mut y0) = a;
    let (x1, y1) = b;
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut points = Vec::new();
    loop {
        points.push((x0, y0));
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_canvas() -> StrokeCanvas {
        let mut canvas = StrokeCanvas::new();
        canvas.set_area(Rect::new(2, 3, 40, 20));
        canvas.set_active(true);
        canvas
    }

    #[test]
    fn inactive_surface_ignores_input() {
        let mut canvas = StrokeCanvas::new();
        canvas.set_area(Rect::new(0, 0, 10, 10));
        canvas.begin_stroke(1, 1);
        canvas.extend_stroke(2, 2);
        canvas.end_stroke();
        assert!(!canvas.has_content());
        assert!(canvas.snapshot().is_none());
    }

    #[test]
    fn content_appears_on_first_segment() {
        let mut canvas = active_canvas();
        canvas.begin_stroke(5, 5);
        assert!(!canvas.has_content());
        canvas.extend_stroke(6, 5);
        assert!(canvas.has_content());
        canvas.end_stroke();
        assert!(canvas.has_content());
    }

    #[test]
    fn lone_press_leaves_no_content() {
        let mut canvas = active_canvas();
        canvas.begin_stroke(5, 5);
        canvas.end_stroke();
        assert!(!canvas.has_content());
    }

    #[test]
    fn clear_on_empty_surface_is_a_noop() {
        let mut canvas = active_canvas();
        canvas.clear();
        assert!(!canvas.has_content());
        assert!(canvas.snapshot().is_none());
    }

    #[test]
    fn clear_resets_content() {
        let mut canvas = active_canvas();
        canvas.begin_stroke(5, 5);
        canvas.extend_stroke(8, 7);
        canvas.end_stroke();
        assert!(canvas.has_content());
        canvas.clear();
        assert!(!canvas.has_content());
    }

    #[test]
    fn deactivation_keeps_strokes() {
        let mut canvas = active_canvas();
        canvas.begin_stroke(5, 5);
        canvas.extend_stroke(9, 5);
        canvas.set_active(false);
        assert!(canvas.has_content());
        assert!(canvas.snapshot().is_some());
    }

    #[test]
    fn leaving_the_surface_ends_the_stroke() {
        let mut canvas = active_canvas();
        canvas.begin_stroke(5, 5);
        canvas.extend_stroke(6, 5);
        canvas.extend_stroke(200, 200);
        assert!(canvas.has_content());
        // a new drag outside the surface records nothing
        canvas.extend_stroke(201, 200);
        assert_eq!(canvas.inked_cells().len(), 2);
    }

    #[test]
    fn snapshot_is_a_png() {
        let mut canvas = active_canvas();
        canvas.begin_stroke(5, 5);
        canvas.extend_stroke(15, 12);
        canvas.end_stroke();
        let png = canvas.snapshot().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn inked_cells_cover_the_segment() {
        let mut canvas = active_canvas();
        canvas.begin_stroke(2, 3); // local (0, 0)
        canvas.extend_stroke(6, 3); // local (4, 0)
        canvas.end_stroke();
        let cells = canvas.inked_cells();
        for x in 0..=4 {
            assert!(cells.contains(&(x, 0)));
        }
    }
}
