//! Retained path made of move-to / quadratic-curve-to / close commands

use glam::Vec2;

/// A single path command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    QuadTo { ctrl: Vec2, to: Vec2 },
    Close,
}

/// Ordered list of path commands
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    pub fn move_to(&mut self, p: Vec2) {
        self.commands.push(PathCommand::MoveTo(p));
    }

    pub fn quad_to(&mut self, ctrl: Vec2, to: Vec2) {
        self.commands.push(PathCommand::QuadTo { ctrl, to });
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of quadratic segments
    pub fn quad_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::QuadTo { .. }))
            .count()
    }

    /// All points (anchors and controls), for bounds and sanity checks
    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.commands.iter().flat_map(|c| match *c {
            PathCommand::MoveTo(p) => vec![p],
            PathCommand::QuadTo { ctrl, to } => vec![ctrl, to],
            PathCommand::Close => Vec::new(),
        })
    }
}
