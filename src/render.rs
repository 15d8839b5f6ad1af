use kurbo::{Affine, BezPath, Point, Shape as _, Vec2};

use crate::{
    error::{StarburstError, StarburstResult},
    scene::{CursorSpec, FillClip, Rgba8, Scene},
    sequencer::SceneFrame,
    shape::Shape,
};

/// One rendered frame, premultiplied RGBA8, row-major.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

struct ResolvedStage {
    shape: Shape,
    outline: BezPath,
    centroid: Point,
    max_radius: f64,
    stroke_width: f64,
    stroke_color: Rgba8,
    fill_color: Rgba8,
    fill_clip: FillClip,
    cursor: Option<CursorSpec>,
}

/// CPU rasterizer for one scene, backed by `vello_cpu`.
///
/// Rendering is a pure function of the sampled [`SceneFrame`]: the same frame
/// always produces identical pixel bytes.
pub struct Renderer {
    width: u16,
    height: u16,
    background: Rgba8,
    stages: Vec<ResolvedStage>,
    ctx: Option<vello_cpu::RenderContext>,
    pixmap: Option<vello_cpu::Pixmap>,
}

impl Renderer {
    pub fn new(scene: &Scene) -> StarburstResult<Self> {
        scene.validate()?;

        let width = u16::try_from(scene.canvas.width)
            .map_err(|_| StarburstError::render("canvas width exceeds the u16 raster limit"))?;
        let height = u16::try_from(scene.canvas.height)
            .map_err(|_| StarburstError::render("canvas height exceeds the u16 raster limit"))?;

        let stages = scene
            .stages
            .iter()
            .map(|spec| {
                let shape = spec.shape.build()?;
                let outline = shape.to_path();
                let centroid = shape.centroid();
                let max_radius = spec.fill_radius.unwrap_or_else(|| shape.fill_radius());
                Ok(ResolvedStage {
                    shape,
                    outline,
                    centroid,
                    max_radius,
                    stroke_width: spec.stroke_width,
                    stroke_color: spec.stroke_color,
                    fill_color: spec.fill_color,
                    fill_clip: spec.fill_clip,
                    cursor: spec.cursor,
                })
            })
            .collect::<StarburstResult<Vec<_>>>()?;

        Ok(Self {
            width,
            height,
            background: scene.background,
            stages,
            ctx: None,
            pixmap: None,
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    #[tracing::instrument(skip(self, frame), level = "debug")]
    pub fn render(&mut self, frame: &SceneFrame) -> StarburstResult<FrameRgba> {
        if frame.stages.len() != self.stages.len() {
            return Err(StarburstError::render(format!(
                "frame has {} stage states, scene has {} stages",
                frame.stages.len(),
                self.stages.len()
            )));
        }

        let mut pixmap = match self.pixmap.take() {
            Some(pm) if pm.width() == self.width && pm.height() == self.height => pm,
            _ => vello_cpu::Pixmap::new(self.width, self.height),
        };
        clear_pixmap(&mut pixmap, premul_rgba8(self.background));

        // Every stage is drawn centered on the canvas.
        let center = Vec2::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0);
        let to_center = Affine::translate(center);

        self.with_ctx_mut(|stages, ctx| {
            ctx.set_transform(affine_to_cpu(to_center));

            for (stage, state) in stages.iter().zip(&frame.stages) {
                // Outline traced up to the current path length.
                if state.trace_len > 0.0 {
                    let traced = stage.shape.traced_path(state.trace_len);
                    ctx.set_paint(color_to_cpu(stage.stroke_color));
                    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(stage.stroke_width));
                    ctx.stroke_path(&path_to_cpu(&traced));
                }

                // Tracing cursor dot riding the outline tip.
                if state.cursor_visible
                    && let Some(cursor) = stage.cursor
                {
                    let tip = stage.shape.point_at(state.trace_len);
                    let dot = kurbo::Circle::new(tip, cursor.radius).to_path(0.1);
                    ctx.set_paint(color_to_cpu(cursor.color));
                    ctx.fill_path(&path_to_cpu(&dot));
                }

                // Radial fill: a growing disc clipped to the stage's region.
                if state.fill_progress > 0.0 {
                    let radius = stage.max_radius * state.fill_progress;
                    let disc = Shape::disc_path(stage.centroid, radius);
                    let clip = match stage.fill_clip {
                        FillClip::Bounds => stage.shape.bounds().to_path(0.1),
                        FillClip::Outline => stage.outline.clone(),
                    };
                    ctx.push_clip_layer(&path_to_cpu(&clip));
                    ctx.set_paint(color_to_cpu(stage.fill_color));
                    ctx.fill_path(&path_to_cpu(&disc));
                    ctx.pop_layer();
                }
            }

            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        let out = FrameRgba {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
        };
        self.pixmap = Some(pixmap);
        Ok(out)
    }

    fn with_ctx_mut<R>(
        &mut self,
        f: impl FnOnce(&[ResolvedStage], &mut vello_cpu::RenderContext) -> StarburstResult<R>,
    ) -> StarburstResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == self.width && ctx.height() == self.height => ctx,
            _ => vello_cpu::RenderContext::new(self.width, self.height),
        };
        ctx.reset();
        let out = f(&self.stages, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn premul_rgba8(c: Rgba8) -> [u8; 4] {
    fn premul(c: u8, a: u8) -> u8 {
        (((u16::from(c) * u16::from(a)) + 127) / 255) as u8
    }
    [premul(c.r, c.a), premul(c.g, c.a), premul(c.b, c.a), c.a]
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn path_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in path.elements() {
        match *el {
            kurbo::PathEl::MoveTo(p) => out.move_to(pt(p)),
            kurbo::PathEl::LineTo(p) => out.line_to(pt(p)),
            kurbo::PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            kurbo::PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            kurbo::PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pt(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::Phase;

    #[test]
    fn premul_matches_expectations() {
        let c = Rgba8 {
            r: 255,
            g: 0,
            b: 0,
            a: 128,
        };
        assert_eq!(premul_rgba8(c), [128, 0, 0, 128]);
        assert_eq!(premul_rgba8(Rgba8::WHITE), [255, 255, 255, 255]);
    }

    #[test]
    fn path_conversion_preserves_element_count() {
        let shape = Shape::star(2.0).unwrap();
        let path = shape.to_path();
        assert_eq!(path_to_cpu(&path).elements().len(), path.elements().len());
    }

    #[test]
    fn renderer_rejects_mismatched_frame() {
        let scene = Scene::national_day();
        let mut renderer = Renderer::new(&scene).unwrap();
        let frame = SceneFrame {
            phase: Phase::Done,
            stages: vec![],
        };
        assert!(renderer.render(&frame).is_err());
    }
}
