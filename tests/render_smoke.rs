use std::time::Duration;

use starburst::{Renderer, Rgba8, Scene, Sequencer};

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn digest_u64(bytes: &[u8]) -> u64 {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for chunk in bytes.chunks(8) {
        let mut v = 0u64;
        for (i, &b) in chunk.iter().enumerate() {
            v |= (b as u64) << (i * 8);
        }
        state = mix64(state ^ v);
    }
    state
}

fn count_non_background(data: &[u8], background: Rgba8) -> usize {
    data.chunks_exact(4)
        .filter(|px| px[0] != background.r || px[1] != background.g || px[2] != background.b)
        .count()
}

#[test]
fn render_is_deterministic_and_nonempty_mid_trace() {
    let scene = Scene::national_day();
    let sequencer = Sequencer::new(&scene).unwrap();
    let mut renderer = Renderer::new(&scene).unwrap();

    // Halfway through tracing the rectangle.
    let frame = sequencer.frame_at(Duration::from_millis(2000));
    let a = renderer.render(&frame).unwrap();
    let b = renderer.render(&frame).unwrap();

    assert_eq!(a.width, scene.canvas.width);
    assert_eq!(a.height, scene.canvas.height);
    assert_eq!(a.data.len(), (a.width * a.height * 4) as usize);
    assert_eq!(digest_u64(&a.data), digest_u64(&b.data));
    assert!(count_non_background(&a.data, scene.background) > 0);
}

#[test]
fn blank_before_start_and_ink_accumulates() {
    let scene = Scene::national_day();
    let sequencer = Sequencer::new(&scene).unwrap();
    let mut renderer = Renderer::new(&scene).unwrap();
    let bg = scene.background;

    let at = |renderer: &mut Renderer, ms| {
        let frame = renderer.render(&sequencer.frame_at(Duration::from_millis(ms))).unwrap();
        count_non_background(&frame.data, bg)
    };

    // Nothing has been traced yet at t=0.
    assert_eq!(at(&mut renderer, 0), 0);

    // The outline grows during the trace, the fill adds more ink on top,
    // and the finished scene carries the most.
    let mid_trace = at(&mut renderer, 2000);
    let fill_start = at(&mut renderer, 4000);
    let mid_fill = at(&mut renderer, 5000);
    let done = at(&mut renderer, 12000);
    assert!(mid_trace > 0);
    assert!(fill_start > mid_trace);
    assert!(mid_fill > fill_start);
    assert!(done > mid_fill);
}

#[test]
fn finished_frame_contains_both_fill_colors() {
    let scene = Scene::national_day();
    let sequencer = Sequencer::new(&scene).unwrap();
    let mut renderer = Renderer::new(&scene).unwrap();

    let frame = renderer
        .render(&sequencer.frame_at(Duration::from_millis(12_000)))
        .unwrap();

    let has = |r: u8, g: u8, b: u8| {
        frame
            .data
            .chunks_exact(4)
            .any(|px| px[0] == r && px[1] == g && px[2] == b)
    };
    // Red rectangle fill and yellow star fill.
    assert!(has(Rgba8::RED.r, Rgba8::RED.g, Rgba8::RED.b));
    assert!(has(Rgba8::YELLOW.r, Rgba8::YELLOW.g, Rgba8::YELLOW.b));
}
