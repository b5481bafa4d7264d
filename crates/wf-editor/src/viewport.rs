//! Canvas pan/zoom and grid state.

use wf_core::{Position, Rect, Size};

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Screen position of the canvas origin.
    pub pan: Position,
    pub zoom: f64,
    pub show_grid: bool,
    /// Size of the canvas element on screen.
    pub canvas: Size,
    zoom_step: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl Viewport {
    pub fn new(canvas: Size, zoom_step: f64, min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            pan: Position::ORIGIN,
            zoom: 1.0,
            show_grid: true,
            canvas,
            zoom_step,
            min_zoom,
            max_zoom,
        }
    }

    pub fn screen_to_canvas(&self, screen: Position) -> Position {
        Position::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    pub fn canvas_to_screen(&self, canvas: Position) -> Position {
        Position::new(
            canvas.x * self.zoom + self.pan.x,
            canvas.y * self.zoom + self.pan.y,
        )
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.show_grid = !self.show_grid;
        self.show_grid
    }

    pub fn zoom_in(&mut self) {
        self.zoom_to(self.zoom * self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_to(self.zoom / self.zoom_step);
    }

    /// Zoom while keeping the canvas point under the screen centre fixed.
    pub fn zoom_to(&mut self, zoom: f64) {
        let center = Position::new(self.canvas.width / 2.0, self.canvas.height / 2.0);
        let anchor = self.screen_to_canvas(center);
        self.zoom = self.clamp_zoom(zoom);
        self.pan = Position::new(
            center.x - anchor.x * self.zoom,
            center.y - anchor.y * self.zoom,
        );
    }

    /// Limit `zoom` to the configured range. Unlike `f64::clamp` this never
    /// panics on crossed or NaN limits; the minimum wins.
    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.min(self.max_zoom).max(self.min_zoom)
    }

    pub fn reset(&mut self) {
        self.pan = Position::ORIGIN;
        self.zoom = 1.0;
    }

    /// Fit `bounds` (canvas space) plus `padding` into the canvas, centred.
    pub fn fit(&mut self, bounds: Option<Rect>, padding: f64) {
        let Some(bounds) = bounds else {
            self.reset();
            return;
        };
        let bounds = bounds.expand(padding);
        let zx = self.canvas.width / bounds.width().max(1.0);
        let zy = self.canvas.height / bounds.height().max(1.0);
        self.zoom = self.clamp_zoom(zx.min(zy));

        let center = bounds.center();
        self.pan = Position::new(
            self.canvas.width / 2.0 - center.x * self.zoom,
            self.canvas.height / 2.0 - center.y * self.zoom,
        );
    }
}
