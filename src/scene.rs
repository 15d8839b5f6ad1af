use crate::{
    ease::Ease,
    error::{StarburstError, StarburstResult},
    shape::Shape,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// Straight (non-premultiplied) RGBA8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const RED: Self = Self::opaque(255, 0, 0);
    pub const YELLOW: Self = Self::opaque(255, 235, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Shape constants by name rather than inline vertex literals, so scenes can
/// swap in alternate shapes from JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ShapeSpec {
    Rectangle { width: f64, height: f64 },
    Star { scale: f64 },
    Polygon { vertices: Vec<[f64; 2]> },
}

impl ShapeSpec {
    pub fn build(&self) -> StarburstResult<Shape> {
        match self {
            Self::Rectangle { width, height } => Shape::rectangle(*width, *height),
            Self::Star { scale } => Shape::star(*scale),
            Self::Polygon { vertices } => Shape::polygon(
                vertices
                    .iter()
                    .map(|&[x, y]| kurbo::Point::new(x, y))
                    .collect(),
            ),
        }
    }
}

/// Region the fill disc is clipped against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FillClip {
    /// The shape's axis-aligned bounding box.
    Bounds,
    /// The exact shape outline.
    Outline,
}

/// The dot riding the outline tip while a stage is tracing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CursorSpec {
    pub radius: f64,
    pub color: Rgba8,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct StageSpec {
    pub name: String,
    pub shape: ShapeSpec,
    pub trace_ms: u64,
    pub trace_ease: Ease,
    pub fill_ms: u64,
    pub fill_ease: Ease,
    pub stroke_width: f64,
    pub stroke_color: Rgba8,
    pub fill_color: Rgba8,
    pub fill_clip: FillClip,
    /// Maximum disc radius; defaults to the shape's own `fill_radius()`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<CursorSpec>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub title: String,
    pub canvas: Canvas,
    pub background: Rgba8,
    pub stages: Vec<StageSpec>,
}

impl Scene {
    /// The built-in sequence: trace and fill a rectangle, then a star.
    pub fn national_day() -> Self {
        Self {
            title: "Vietnamese National Day".to_string(),
            canvas: Canvas {
                width: 800,
                height: 600,
            },
            background: Rgba8::WHITE,
            stages: vec![
                StageSpec {
                    name: "rectangle".to_string(),
                    shape: ShapeSpec::Rectangle {
                        width: 300.0,
                        height: 200.0,
                    },
                    trace_ms: 4000,
                    trace_ease: Ease::Linear,
                    fill_ms: 2000,
                    fill_ease: Ease::FastOutSlowIn,
                    stroke_width: 2.0,
                    stroke_color: Rgba8::BLACK,
                    fill_color: Rgba8::RED,
                    fill_clip: FillClip::Bounds,
                    fill_radius: None,
                    cursor: Some(CursorSpec {
                        radius: 4.0,
                        color: Rgba8::RED,
                    }),
                },
                StageSpec {
                    name: "star".to_string(),
                    shape: ShapeSpec::Star { scale: 2.0 },
                    trace_ms: 4000,
                    trace_ease: Ease::Linear,
                    fill_ms: 2000,
                    fill_ease: Ease::FastOutSlowIn,
                    stroke_width: 2.0,
                    stroke_color: Rgba8::BLACK,
                    fill_color: Rgba8::YELLOW,
                    fill_clip: FillClip::Outline,
                    // The original animation grows the star's fill disc to a
                    // fixed 100px radius rather than the bounds minimum.
                    fill_radius: Some(100.0),
                    cursor: None,
                },
            ],
        }
    }

    pub fn validate(&self) -> StarburstResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(StarburstError::validation(
                "canvas width/height must be > 0",
            ));
        }
        if self.stages.is_empty() {
            return Err(StarburstError::validation(
                "scene must have at least one stage",
            ));
        }

        for stage in &self.stages {
            if stage.trace_ms == 0 || stage.fill_ms == 0 {
                return Err(StarburstError::validation(format!(
                    "stage '{}' must have non-zero trace and fill durations",
                    stage.name
                )));
            }
            if !(stage.stroke_width > 0.0 && stage.stroke_width.is_finite()) {
                return Err(StarburstError::validation(format!(
                    "stage '{}' stroke width must be positive and finite",
                    stage.name
                )));
            }
            if let Some(r) = stage.fill_radius
                && !(r > 0.0 && r.is_finite())
            {
                return Err(StarburstError::validation(format!(
                    "stage '{}' fill radius must be positive and finite",
                    stage.name
                )));
            }
            if let Some(c) = &stage.cursor
                && !(c.radius > 0.0 && c.radius.is_finite())
            {
                return Err(StarburstError::validation(format!(
                    "stage '{}' cursor radius must be positive and finite",
                    stage.name
                )));
            }

            // Shape construction performs its own vertex validation.
            stage.shape.build()?;
        }

        Ok(())
    }
}
