#![forbid(unsafe_code)]

pub mod ease;
pub mod encode;
pub mod error;
pub mod render;
pub mod scene;
pub mod sequencer;
pub mod shape;
pub mod timeline;
#[cfg(feature = "window")]
pub mod window;

pub use ease::Ease;
pub use encode::{EncodeConfig, FfmpegEncoder, render_to_mp4};
pub use error::{StarburstError, StarburstResult};
pub use render::{FrameRgba, Renderer};
pub use scene::{Canvas, CursorSpec, FillClip, Rgba8, Scene, ShapeSpec, StageSpec};
pub use sequencer::{Phase, SceneFrame, Sequencer, StageState};
pub use shape::Shape;
pub use timeline::Timeline;
