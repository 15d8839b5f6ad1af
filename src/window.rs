use std::{num::NonZeroU32, sync::Arc, time::Instant};

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    error::{StarburstError, StarburstResult},
    render::{FrameRgba, Renderer},
    scene::Scene,
    sequencer::Sequencer,
};

/// Open a native window titled after the scene and play the animation
/// sequence once, holding the final frame until the window is closed.
///
/// Playback is wall-clock driven: each redraw samples the sequencer at the
/// real elapsed time, so dropped frames never desynchronize the schedule.
pub fn run(scene: Scene) -> StarburstResult<()> {
    let sequencer = Sequencer::new(&scene)?;
    let renderer = Renderer::new(&scene)?;

    let event_loop = EventLoop::new()
        .map_err(|e| StarburstError::render(format!("failed to create event loop: {e}")))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        title: scene.title.clone(),
        canvas_width: renderer.width(),
        canvas_height: renderer.height(),
        sequencer,
        renderer,
        started: None,
        window: None,
        context: None,
        surface: None,
        error: None,
    };

    event_loop
        .run_app(&mut app)
        .map_err(|e| StarburstError::render(format!("event loop failed: {e}")))?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    title: String,
    canvas_width: u32,
    canvas_height: u32,
    sequencer: Sequencer,
    renderer: Renderer,
    started: Option<Instant>,
    window: Option<Arc<Window>>,
    // The display context must outlive its surfaces.
    context: Option<softbuffer::Context<Arc<Window>>>,
    surface: Option<softbuffer::Surface<Arc<Window>, Arc<Window>>>,
    error: Option<StarburstError>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: StarburstError) {
        tracing::error!(%err, "window playback failed");
        self.error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self) -> StarburstResult<()> {
        let Some(window) = self.window.clone() else {
            return Ok(());
        };
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };

        let started = *self.started.get_or_insert_with(Instant::now);
        let elapsed = started.elapsed();
        let frame = self.renderer.render(&self.sequencer.frame_at(elapsed))?;

        let size = window.inner_size();
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            // Zero-sized surface (minimized); skip this frame.
            return Ok(());
        };
        surface
            .resize(w, h)
            .map_err(|e| StarburstError::render(format!("surface resize failed: {e}")))?;

        let mut buffer = surface
            .buffer_mut()
            .map_err(|e| StarburstError::render(format!("surface buffer unavailable: {e}")))?;
        blit_frame(&frame, &mut buffer, size.width, size.height);
        buffer
            .present()
            .map_err(|e| StarburstError::render(format!("surface present failed: {e}")))?;

        // Keep redrawing while the sequence runs; the final frame stays up.
        if !self.sequencer.is_done(elapsed) {
            window.request_redraw();
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(LogicalSize::new(
                f64::from(self.canvas_width),
                f64::from(self.canvas_height),
            ))
            .with_resizable(false);

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                return self.fail(
                    event_loop,
                    StarburstError::render(format!("failed to create window: {e}")),
                );
            }
        };

        let context = match softbuffer::Context::new(window.clone()) {
            Ok(c) => c,
            Err(e) => {
                return self.fail(
                    event_loop,
                    StarburstError::render(format!("failed to create display context: {e}")),
                );
            }
        };
        let surface = match softbuffer::Surface::new(&context, window.clone()) {
            Ok(s) => s,
            Err(e) => {
                return self.fail(
                    event_loop,
                    StarburstError::render(format!("failed to create surface: {e}")),
                );
            }
        };

        window.request_redraw();
        self.window = Some(window);
        self.context = Some(context);
        self.surface = Some(surface);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }
}

/// Copy a premultiplied-RGBA frame into a softbuffer 0RGB buffer, top-left
/// anchored. The surface can be larger than the canvas on hidpi displays;
/// uncovered pixels stay black.
fn blit_frame(frame: &FrameRgba, buffer: &mut [u32], buf_width: u32, buf_height: u32) {
    let copy_w = frame.width.min(buf_width) as usize;
    let copy_h = frame.height.min(buf_height) as usize;

    for y in 0..copy_h {
        let src_row = &frame.data[y * frame.width as usize * 4..];
        let dst_row = &mut buffer[y * buf_width as usize..];
        for x in 0..copy_w {
            let px = &src_row[x * 4..x * 4 + 4];
            dst_row[x] =
                (u32::from(px[0]) << 16) | (u32::from(px[1]) << 8) | u32::from(px[2]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blit_packs_rgb_into_0rgb_words() {
        let frame = FrameRgba {
            width: 2,
            height: 1,
            data: vec![255, 0, 0, 255, 0, 128, 255, 255],
        };
        let mut buffer = vec![0u32; 2];
        blit_frame(&frame, &mut buffer, 2, 1);
        assert_eq!(buffer, vec![0x00FF_0000, 0x0000_80FF]);
    }

    #[test]
    fn blit_clips_to_the_smaller_extent() {
        let frame = FrameRgba {
            width: 2,
            height: 2,
            data: vec![255; 16],
        };
        let mut buffer = vec![0u32; 1];
        blit_frame(&frame, &mut buffer, 1, 1);
        assert_eq!(buffer[0], 0x00FF_FFFF);
    }
}
