//! Canvas that records draw calls instead of rasterizing them

use glam::Vec2;

use super::{Canvas, Paint, Path};

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    ClearRect { x: f32, y: f32, width: f32, height: f32 },
    FillPath { path: Path, paint: Paint },
    FillCircle { center: Vec2, radius: f32, paint: Paint },
}

/// In-memory canvas for tests and headless runs
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Every command since creation (or the last `take_commands`)
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Commands drawn after the most recent clear
    pub fn since_last_clear(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::ClearRect { .. }))
            .map_or(0, |i| i + 1);
        &self.commands[start..]
    }

    /// True when the last command was a full-surface clear
    pub fn is_cleared(&self) -> bool {
        matches!(
            self.commands.last(),
            Some(DrawCommand::ClearRect { x, y, width, height })
                if *x == 0.0 && *y == 0.0
                    && *width >= self.width as f32
                    && *height >= self.height as f32
        )
    }

    pub fn clear_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::ClearRect { .. }))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCommand::ClearRect { x, y, width, height });
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.commands.push(DrawCommand::FillPath {
            path: path.clone(),
            paint: paint.clone(),
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            paint: paint.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Rgba;

    #[test]
    fn test_since_last_clear() {
        let mut canvas = RecordingCanvas::new(100, 50);
        let paint = Paint::Solid(Rgba::rgb(0xff0000));
        canvas.fill_circle(Vec2::ZERO, 1.0, &paint);
        canvas.clear();
        assert!(canvas.is_cleared());
        canvas.fill_circle(Vec2::ONE, 2.0, &paint);
        assert!(!canvas.is_cleared());
        assert_eq!(canvas.since_last_clear().len(), 1);
        assert_eq!(canvas.clear_count(), 1);
    }
}
