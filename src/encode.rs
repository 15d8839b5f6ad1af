use std::{
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
    time::Duration,
};

use crate::{
    error::{StarburstError, StarburstResult},
    render::{FrameRgba, Renderer},
    scene::Scene,
    sequencer::Sequencer,
};

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeConfig {
    pub fn validate(&self) -> StarburstResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StarburstError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(StarburstError::validation("encode fps must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // The default settings target yuv420p output for maximum compatibility.
            return Err(StarburstError::validation(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> StarburstResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Streams raw RGBA frames to a system `ffmpeg` process producing an MP4.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    child: Child,
    stdin: Option<ChildStdin>,
    scratch: Vec<u8>,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig) -> StarburstResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(StarburstError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(StarburstError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        // System `ffmpeg` binary rather than linked FFmpeg libraries: no
        // native dev header/lib requirements.
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if cfg.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&cfg.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            StarburstError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| StarburstError::encode("failed to open ffmpeg stdin (unexpected)"))?;

        Ok(Self {
            scratch: vec![0u8; (cfg.width * cfg.height * 4) as usize],
            cfg,
            child,
            stdin: Some(stdin),
        })
    }

    pub fn encode_frame(&mut self, frame: &FrameRgba) -> StarburstResult<()> {
        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(StarburstError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(StarburstError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        // Frames come out of the renderer premultiplied over an opaque
        // background, so every pixel is already opaque RGBA.
        self.scratch.copy_from_slice(&frame.data);

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(StarburstError::encode("ffmpeg encoder is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            StarburstError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;

        Ok(())
    }

    pub fn finish(mut self) -> StarburstResult<()> {
        drop(self.stdin.take());

        let output = self.child.wait_with_output().map_err(|e| {
            StarburstError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StarburstError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

/// Render the full animation sequence of `scene` to an MP4 at `fps`.
///
/// Samples the sequencer at `i / fps` seconds per frame, covering the whole
/// schedule plus one final frame holding the completed state.
pub fn render_to_mp4(
    scene: &Scene,
    out_path: impl Into<PathBuf>,
    fps: u32,
    overwrite: bool,
) -> StarburstResult<()> {
    let sequencer = Sequencer::new(scene)?;
    let mut renderer = Renderer::new(scene)?;

    let cfg = EncodeConfig {
        width: renderer.width(),
        height: renderer.height(),
        fps,
        out_path: out_path.into(),
        overwrite,
    };
    let mut encoder = FfmpegEncoder::new(cfg)?;

    let total_secs = sequencer.total_duration().as_secs_f64();
    let frame_count = (total_secs * f64::from(fps)).ceil() as u64 + 1;
    tracing::info!(frame_count, fps, "encoding animation sequence");

    for i in 0..frame_count {
        let elapsed = Duration::from_secs_f64(i as f64 / f64::from(fps));
        let frame = renderer.render(&sequencer.frame_at(elapsed))?;
        encoder.encode_frame(&frame)?;
    }

    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_validation_catches_bad_values() {
        assert!(
            EncodeConfig {
                width: 0,
                height: 10,
                fps: 30,
                out_path: PathBuf::from("out/anim.mp4"),
                overwrite: true,
            }
            .validate()
            .is_err()
        );

        assert!(
            EncodeConfig {
                width: 11,
                height: 10,
                fps: 30,
                out_path: PathBuf::from("out/anim.mp4"),
                overwrite: true,
            }
            .validate()
            .is_err()
        );

        assert!(
            EncodeConfig {
                width: 10,
                height: 10,
                fps: 0,
                out_path: PathBuf::from("out/anim.mp4"),
                overwrite: true,
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn config_accepts_even_dimensions() {
        assert!(
            EncodeConfig {
                width: 800,
                height: 600,
                fps: 60,
                out_path: PathBuf::from("out/anim.mp4"),
                overwrite: true,
            }
            .validate()
            .is_ok()
        );
    }
}
