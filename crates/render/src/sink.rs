use std::fmt;

use boatclub_common::{Material, MeshHandle, Rgb};
use boatclub_kernel::Lighting;
use glam::Mat4;

use crate::error::RenderError;

/// One leaf draw: a mesh placed by a model transform, with its material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub mesh: MeshHandle,
    /// Per-vertex default color. Feeds ambient light even when textured.
    pub color: Rgb,
    pub material: Material,
    pub model: Mat4,
    /// Inverse-transpose of `model`.
    pub normal: Mat4,
}

impl DrawCall {
    /// World-space origin of the model frame.
    pub fn origin(&self) -> glam::Vec3 {
        self.model.w_axis.truncate()
    }
}

/// Destination of draw calls. Implemented by GPU backends and by recorders.
///
/// A sink only consumes what it is given. It never reaches back into scene
/// state.
pub trait DrawSink {
    fn begin_frame(&mut self, view_projection: Mat4, lighting: &Lighting) -> Result<(), RenderError> {
        let _ = (view_projection, lighting);
        Ok(())
    }

    fn draw(&mut self, call: &DrawCall) -> Result<(), RenderError>;

    fn end_frame(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

impl<S: DrawSink + ?Sized> DrawSink for &mut S {
    fn begin_frame(&mut self, view_projection: Mat4, lighting: &Lighting) -> Result<(), RenderError> {
        (**self).begin_frame(view_projection, lighting)
    }

    fn draw(&mut self, call: &DrawCall) -> Result<(), RenderError> {
        (**self).draw(call)
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        (**self).end_frame()
    }
}

/// Everything submitted between one `begin_frame` and `end_frame`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub view_projection: Mat4,
    pub clear_color: Rgb,
    pub draws: Vec<DrawCall>,
    pub finished: bool,
}

impl fmt::Display for RecordedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let textured = self.draws.iter().filter(|d| d.material.is_textured()).count();
        writeln!(
            f,
            "=== Frame ({} draws, {} textured, {} flat) ===",
            self.draws.len(),
            textured,
            self.draws.len() - textured
        )?;
        for (i, d) in self.draws.iter().enumerate() {
            let o = d.origin();
            let material = match d.material {
                Material::Textured(t) => format!("texture#{}", t.0),
                Material::Flat(c) => format!("flat({:.2}, {:.2}, {:.2})", c.r, c.g, c.b),
            };
            writeln!(
                f,
                "  {:>3} mesh#{} {} at=({:.2}, {:.2}, {:.2})",
                i, d.mesh.0, material, o.x, o.y, o.z
            )?;
        }
        Ok(())
    }
}

/// Sink that records every frame in memory, for tests and the headless CLI.
#[derive(Debug, Default)]
pub struct RecordingSink {
    frames: Vec<RecordedFrame>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    pub fn total_draws(&self) -> usize {
        self.frames.iter().map(|f| f.draws.len()).sum()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    fn open_frame(&mut self) -> Result<&mut RecordedFrame, RenderError> {
        self.frames
            .last_mut()
            .filter(|f| !f.finished)
            .ok_or(RenderError::NoFrame)
    }
}

impl DrawSink for RecordingSink {
    fn begin_frame(&mut self, view_projection: Mat4, lighting: &Lighting) -> Result<(), RenderError> {
        self.frames.push(RecordedFrame {
            view_projection,
            clear_color: lighting.clear_color,
            draws: Vec::new(),
            finished: false,
        });
        Ok(())
    }

    fn draw(&mut self, call: &DrawCall) -> Result<(), RenderError> {
        self.open_frame()?.draws.push(*call);
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        self.open_frame()?.finished = true;
        Ok(())
    }
}
