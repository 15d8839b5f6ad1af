use std::{fs, path::PathBuf, time::Duration};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use starburst::{Renderer, Scene, Sequencer, render_to_mp4};

#[derive(Parser, Debug)]
#[command(name = "starburst", version, about = "Trace-and-fill shape animation player")]
struct Cli {
    /// Scene description (JSON). Defaults to the built-in national day scene.
    #[arg(long, global = true)]
    scene: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the animation in a native window.
    Play,
    /// Render a single frame to a PNG.
    Frame {
        /// Timestamp to sample, in milliseconds from the start.
        #[arg(long, default_value_t = 0)]
        at_ms: u64,
        /// Output PNG path.
        #[arg(long)]
        out: PathBuf,
    },
    /// Render the whole sequence to an MP4 via ffmpeg.
    Render {
        /// Output MP4 path.
        #[arg(long)]
        out: PathBuf,
        /// Frame rate of the output video.
        #[arg(long, default_value_t = 30)]
        fps: u32,
        /// Overwrite the output file if it exists.
        #[arg(long)]
        overwrite: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let scene = load_scene(cli.scene.as_deref())?;

    match cli.command {
        None | Some(Command::Play) => play(scene),
        Some(Command::Frame { at_ms, out }) => frame(scene, at_ms, &out),
        Some(Command::Render { out, fps, overwrite }) => {
            render_to_mp4(&scene, &out, fps, overwrite)?;
            Ok(())
        }
    }
}

fn load_scene(path: Option<&std::path::Path>) -> anyhow::Result<Scene> {
    let scene = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read scene file {}", path.display()))?;
            let scene: Scene = serde_json::from_str(&text)
                .with_context(|| format!("failed to parse scene file {}", path.display()))?;
            scene.validate()?;
            scene
        }
        None => Scene::national_day(),
    };
    Ok(scene)
}

#[cfg(feature = "window")]
fn play(scene: Scene) -> anyhow::Result<()> {
    starburst::window::run(scene)?;
    Ok(())
}

#[cfg(not(feature = "window"))]
fn play(_scene: Scene) -> anyhow::Result<()> {
    anyhow::bail!(
        "this build has no window support; rebuild with the `window` feature \
         or use the `frame` / `render` subcommands"
    )
}

fn frame(scene: Scene, at_ms: u64, out: &std::path::Path) -> anyhow::Result<()> {
    let sequencer = Sequencer::new(&scene)?;
    let mut renderer = Renderer::new(&scene)?;
    let frame = renderer.render(&sequencer.frame_at(Duration::from_millis(at_ms)))?;

    image::save_buffer_with_format(
        out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("failed to write {}", out.display()))?;
    tracing::info!(path = %out.display(), at_ms, "wrote frame");
    Ok(())
}
