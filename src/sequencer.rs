use std::time::Duration;

use crate::{error::StarburstResult, scene::Scene, timeline::Timeline};

/// Which window of the sequence a point in time falls in.
///
/// Stages run strictly back to back: `Tracing(0)`, `Filling(0)`,
/// `Tracing(1)`, ... `Done`. Transitions are purely time-driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Tracing(usize),
    Filling(usize),
    Done,
}

/// Draw state of one stage at a point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageState {
    /// Outline path length to draw, in `[0, perimeter]`.
    pub trace_len: f64,
    /// Fill disc progress in `[0, 1]`.
    pub fill_progress: f64,
    /// Whether the tracing cursor dot is shown (only while tracing).
    pub cursor_visible: bool,
}

/// Draw state of the whole scene at a point in time. Completed stages stay
/// fully drawn; stages that have not started yet are invisible.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneFrame {
    pub phase: Phase,
    pub stages: Vec<StageState>,
}

#[derive(Clone, Copy, Debug)]
struct StageClock {
    start: Duration,
    trace: Timeline,
    fill: Timeline,
    perimeter: f64,
    has_cursor: bool,
}

/// Pure time-to-draw-state mapping for a scene.
///
/// Holds no mutable progress: every sample recomputes from the elapsed time,
/// so the driver loop (window playback or a frame-by-frame encoder) owns the
/// clock.
#[derive(Clone, Debug)]
pub struct Sequencer {
    clocks: Vec<StageClock>,
    total: Duration,
}

impl Sequencer {
    pub fn new(scene: &Scene) -> StarburstResult<Self> {
        scene.validate()?;

        let mut clocks = Vec::with_capacity(scene.stages.len());
        let mut start = Duration::ZERO;
        for stage in &scene.stages {
            let trace = Timeline::from_millis(stage.trace_ms, stage.trace_ease)?;
            let fill = Timeline::from_millis(stage.fill_ms, stage.fill_ease)?;
            let perimeter = stage.shape.build()?.perimeter();
            clocks.push(StageClock {
                start,
                trace,
                fill,
                perimeter,
                has_cursor: stage.cursor.is_some(),
            });
            start += trace.duration() + fill.duration();
        }

        Ok(Self {
            clocks,
            total: start,
        })
    }

    pub fn total_duration(&self) -> Duration {
        self.total
    }

    pub fn is_done(&self, elapsed: Duration) -> bool {
        elapsed >= self.total
    }

    pub fn phase_at(&self, elapsed: Duration) -> Phase {
        for (i, clock) in self.clocks.iter().enumerate() {
            let trace_end = clock.start + clock.trace.duration();
            if elapsed < trace_end {
                return Phase::Tracing(i);
            }
            if elapsed < trace_end + clock.fill.duration() {
                return Phase::Filling(i);
            }
        }
        Phase::Done
    }

    #[tracing::instrument(skip(self), level = "trace")]
    pub fn frame_at(&self, elapsed: Duration) -> SceneFrame {
        let stages = self
            .clocks
            .iter()
            .map(|clock| {
                let Some(local) = elapsed.checked_sub(clock.start) else {
                    // Stage has not started yet.
                    return StageState {
                        trace_len: 0.0,
                        fill_progress: 0.0,
                        cursor_visible: false,
                    };
                };

                let trace_len = clock.perimeter * clock.trace.progress_at(local);
                let fill_progress = local
                    .checked_sub(clock.trace.duration())
                    .map(|fill_local| clock.fill.progress_at(fill_local))
                    .unwrap_or(0.0);

                StageState {
                    trace_len,
                    fill_progress,
                    // The dot disappears the instant tracing completes.
                    cursor_visible: clock.has_cursor && !clock.trace.is_complete(local),
                }
            })
            .collect();

        SceneFrame {
            phase: self.phase_at(elapsed),
            stages,
        }
    }
}
