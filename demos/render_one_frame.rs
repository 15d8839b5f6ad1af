use std::{path::PathBuf, time::Duration};

use starburst::{Renderer, Scene, Sequencer};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let scene = Scene::national_day();

    let out_dir = PathBuf::from("assets");
    std::fs::create_dir_all(&out_dir)?;
    let out_png = out_dir.join("frame_5500ms.png");

    // Mid-fill of the rectangle stage: traced outline plus a partial disc.
    let sequencer = Sequencer::new(&scene)?;
    let mut renderer = Renderer::new(&scene)?;
    let frame = renderer.render(&sequencer.frame_at(Duration::from_millis(5500)))?;

    image::save_buffer_with_format(
        &out_png,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )?;

    eprintln!("wrote {}", out_png.display());
    Ok(())
}
