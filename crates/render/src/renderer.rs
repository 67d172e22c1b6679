use glam::Mat4;
use jointbench_common::Color;
use std::fmt::Write;

/// A unit cube transformed by `model` and filled with `color`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawBox {
    pub model: Mat4,
    pub color: Color,
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// Boxes are unit cubes centered on the origin; the model matrix carries
/// the entity's scale, rotation and translation.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Begin a new frame, discarding anything drawn since the last present.
    fn clear(&mut self);

    /// Queue one box for the current frame.
    fn draw_box(&mut self, model: Mat4, color: Color);

    /// Finish the frame.
    fn present(&mut self) -> Self::Output;
}

/// Text renderer for headless runs.
///
/// Produces one line per box with the translation and scale taken from the
/// model matrix.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frame: u64,
    boxes: Vec<DrawBox>,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented so far.
    pub fn frames_presented(&self) -> u64 {
        self.frame
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn clear(&mut self) {
        self.boxes.clear();
    }

    fn draw_box(&mut self, model: Mat4, color: Color) {
        self.boxes.push(DrawBox { model, color });
    }

    fn present(&mut self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} ({} boxes) ===",
            self.frame,
            self.boxes.len()
        );
        for b in &self.boxes {
            let (scale, _, p) = b.model.to_scale_rotation_translation();
            let _ = writeln!(
                out,
                "  box pos=({:.2}, {:.2}, {:.2}) size=({:.2}, {:.2}, {:.2}) rgb=({:.1}, {:.1}, {:.1})",
                p.x, p.y, p.z, scale.x, scale.y, scale.z, b.color.r, b.color.g, b.color.b
            );
        }
        self.frame += 1;
        tracing::trace!(frame = self.frame, boxes = self.boxes.len(), "text frame presented");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use jointbench_common::Transform;

    #[test]
    fn empty_frame() {
        let mut r = DebugTextRenderer::new();
        r.clear();
        let output = r.present();
        assert!(output.contains("Frame 0 (0 boxes)"));
        assert_eq!(r.frames_presented(), 1);
    }

    #[test]
    fn boxes_report_translation_and_scale() {
        let mut r = DebugTextRenderer::new();
        r.clear();
        let t = Transform::from_position_scale(Vec3::new(0.0, 4.0, 0.0), Vec3::new(16.0, 0.5, 3.0));
        r.draw_box(t.model_matrix(), Color::RED);
        r.draw_box(Mat4::IDENTITY, Color::GREEN);
        let output = r.present();

        assert!(output.contains("(2 boxes)"));
        assert!(output.contains("pos=(0.00, 4.00, 0.00) size=(16.00, 0.50, 3.00)"));
        assert!(output.contains("rgb=(1.0, 0.2, 0.2)"));
    }

    #[test]
    fn rotation_does_not_leak_into_size() {
        let mut r = DebugTextRenderer::new();
        let t = Transform {
            position: Vec3::ZERO,
            rotation: Quat::from_rotation_y(1.0),
            scale: Vec3::new(1.0, 2.0, 3.0),
        };
        r.draw_box(t.model_matrix(), Color::GROUND);
        assert!(r.present().contains("size=(1.00, 2.00, 3.00)"));
    }

    #[test]
    fn clear_discards_previous_boxes() {
        let mut r = DebugTextRenderer::new();
        r.draw_box(Mat4::IDENTITY, Color::RED);
        r.present();
        r.clear();
        let output = r.present();
        assert!(output.contains("Frame 1 (0 boxes)"));
    }
}
