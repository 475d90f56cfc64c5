use bevy::color::Color;
use bevy::prelude::{Gizmos, Vec2};

use crate::math::Vector2D;

/// Something steering behaviours can sketch their internal geometry onto.
pub trait DebugSurface {
    fn circle(&mut self, center: Vector2D, radius: f64, color: Color);

    fn line(&mut self, start: Vector2D, end: Vector2D, color: Color);

    /// Small marker, e.g. a target position.
    fn point(&mut self, at: Vector2D, color: Color) {
        self.circle(at, 2.0, color);
    }
}

/// Draws through bevy gizmos.
///
/// World coordinates grow right and down from the top-left corner, which is
/// placed at `origin` in bevy's y-up space.
pub struct GizmoSurface<'a, 'w, 's> {
    gizmos: &'a mut Gizmos<'w, 's>,
    origin: Vec2,
}

impl<'a, 'w, 's> GizmoSurface<'a, 'w, 's> {
    pub fn new(gizmos: &'a mut Gizmos<'w, 's>, origin: Vec2) -> Self {
        Self { gizmos, origin }
    }

    fn project(&self, v: Vector2D) -> Vec2 {
        Vec2::new(self.origin.x + v.x() as f32, self.origin.y - v.y() as f32)
    }
}

impl DebugSurface for GizmoSurface<'_, '_, '_> {
    fn circle(&mut self, center: Vector2D, radius: f64, color: Color) {
        let center = self.project(center);
        self.gizmos.circle_2d(center, radius as f32, color);
    }

    fn line(&mut self, start: Vector2D, end: Vector2D, color: Color) {
        let (start, end) = (self.project(start), self.project(end));
        self.gizmos.line_2d(start, end, color);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Vector2D,
        radius: f64,
        color: Color,
    },
    Line {
        start: Vector2D,
        end: Vector2D,
        color: Color,
    },
}

/// Records draw calls instead of rendering them. Handy for headless runs.
#[derive(Debug, Default, Clone)]
pub struct DebugLog {
    pub commands: Vec<DrawCommand>,
}

impl DebugSurface for DebugLog {
    fn circle(&mut self, center: Vector2D, radius: f64, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn line(&mut self, start: Vector2D, end: Vector2D, color: Color) {
        self.commands.push(DrawCommand::Line { start, end, color });
    }
}
