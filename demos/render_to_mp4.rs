use std::path::PathBuf;

use starburst::{Scene, render_to_mp4};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let scene = Scene::national_day();

    let out_dir = PathBuf::from("assets");
    std::fs::create_dir_all(&out_dir)?;
    let out_mp4 = out_dir.join("national_day.mp4");

    render_to_mp4(&scene, &out_mp4, 30, true)?;

    eprintln!("wrote {}", out_mp4.display());
    Ok(())
}
