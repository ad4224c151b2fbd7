use std::time::Duration;

use boatclub_kernel::SceneState;

use crate::error::RenderError;
use crate::scene::SceneNodes;
use crate::sink::DrawSink;
use crate::walk::{FrameStats, draw_frame};

/// Decides whether another frame follows the current one.
///
/// Returning `false` means the owning context is gone and the loop stops.
pub trait FrameScheduler {
    fn schedule_next(&mut self) -> bool;
}

/// Schedules a fixed number of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualScheduler {
    remaining: u64,
}

impl ManualScheduler {
    pub fn new(frames: u64) -> Self {
        Self { remaining: frames }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// The per-frame orchestrator: owns the scene state and resolved nodes and
/// turns each scheduled frame into one update plus one hierarchy walk.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    state: SceneState,
    nodes: SceneNodes,
    frames: u64,
}

impl FrameLoop {
    pub fn new(state: SceneState, nodes: SceneNodes) -> Self {
        Self {
            state,
            nodes,
            frames: 0,
        }
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    /// Mutable scene state, for input handlers between frames.
    pub fn state_mut(&mut self) -> &mut SceneState {
        &mut self.state
    }

    pub fn nodes(&self) -> &SceneNodes {
        &self.nodes
    }

    /// Frames completed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame: rebuild the view-projection, advance every actor one
    /// tick, then walk the hierarchy into `sink`.
    ///
    /// On error the frame is abandoned. Actors have still advanced.
    pub fn frame<S: DrawSink + ?Sized>(&mut self, sink: &mut S) -> Result<FrameStats, RenderError> {
        let _span = tracing::info_span!("frame", n = self.frames).entered();

        let view_projection = self.state.view_projection();
        self.state.step();
        let stats = draw_frame(view_projection, &self.state, &self.nodes, sink)?;

        self.frames += 1;
        tracing::trace!(draws = stats.draws, tick = self.state.tick(), "frame done");
        Ok(stats)
    }

    /// Run one frame, then ask the scheduler for the next. Returns whether
    /// another frame was scheduled.
    pub fn step<S, F>(&mut self, sink: &mut S, scheduler: &mut F) -> Result<bool, RenderError>
    where
        S: DrawSink + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        self.frame(sink)?;
        Ok(scheduler.schedule_next())
    }

    /// Keep drawing frames for as long as the scheduler grants them.
    /// Returns the number of frames drawn by this call.
    pub fn run<S, F>(&mut self, sink: &mut S, scheduler: &mut F) -> Result<u64, RenderError>
    where
        S: DrawSink + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        let start = self.frames;
        while scheduler.schedule_next() {
            self.frame(sink)?;
        }
        tracing::debug!(frames = self.frames - start, "frame loop stopped");
        Ok(self.frames - start)
    }
}

/// Rolling window of recent frame durations.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    samples: Vec<Duration>,
    next: usize,
    filled: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: vec![Duration::ZERO; capacity.max(1)],
            next: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.samples[self.next] = dt;
        self.next = (self.next + 1) % self.samples.len();
        self.filled |= self.next == 0;
    }

    fn window(&self) -> &[Duration] {
        if self.filled {
            &self.samples
        } else {
            &self.samples[..self.next]
        }
    }

    pub fn len(&self) -> usize {
        self.window().len()
    }

    pub fn is_empty(&self) -> bool {
        self.window().is_empty()
    }

    pub fn average(&self) -> Duration {
        let window = self.window();
        if window.is_empty() {
            return Duration::ZERO;
        }
        window.iter().sum::<Duration>() / window.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.window().iter().copied().max().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::layout;
    use crate::sink::RecordingSink;
    use boatclub_assets::{MeshLibrary, SCENE_TEXTURES, SolidColorLoader, load_all};

    fn frame_loop() -> FrameLoop {
        let textures = load_all(&SolidColorLoader::default(), &SCENE_TEXTURES).unwrap();
        let nodes = SceneNodes::resolve(&MeshLibrary::builtin(), &textures).unwrap();
        FrameLoop::new(SceneState::new(), nodes)
    }

    #[test]
    fn manual_scheduler_counts_down() {
        let mut s = ManualScheduler::new(2);
        assert!(s.schedule_next());
        assert!(s.schedule_next());
        assert!(!s.schedule_next());
        assert_eq!(s.remaining(), 0);
    }

    #[test]
    fn run_draws_one_frame_per_grant() {
        let mut fl = frame_loop();
        let mut sink = RecordingSink::new();
        let drawn = fl.run(&mut sink, &mut ManualScheduler::new(5)).unwrap();
        assert_eq!(drawn, 5);
        assert_eq!(fl.frames(), 5);
        assert_eq!(fl.state().tick(), 5);
        assert_eq!(sink.frames().len(), 5);
        let per_frame = layout::STATIC_DRAWS + fl.state().actors().len();
        assert!(sink.frames().iter().all(|f| f.draws.len() == per_frame));
    }

    #[test]
    fn step_reports_scheduler_decision() {
        let mut fl = frame_loop();
        let mut sink = RecordingSink::new();
        let mut sched = ManualScheduler::new(1);
        assert!(fl.step(&mut sink, &mut sched).unwrap());
        assert!(!fl.step(&mut sink, &mut sched).unwrap());
        assert_eq!(fl.frames(), 2);
    }

    #[test]
    fn actors_advance_before_the_walk() {
        let mut fl = frame_loop();
        let mut sink = RecordingSink::new();
        fl.frame(&mut sink).unwrap();

        let actor = fl.state().actors()[0];
        assert!(actor.motion.distance > 0.0);
        let fleet = glam::Mat4::from_rotation_y((-85.0f32).to_radians());
        let expected = fleet.transform_point3(actor.motion.position(&actor.config));
        let drawn = sink.last_frame().unwrap().draws[layout::STATIC_DRAWS].origin();
        assert!(drawn.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn camera_changes_reach_the_next_frame() {
        let mut fl = frame_loop();
        let mut sink = RecordingSink::new();
        fl.frame(&mut sink).unwrap();
        fl.state_mut().camera_mut().turn(10.0);
        fl.frame(&mut sink).unwrap();

        let frames = sink.frames();
        assert_ne!(frames[0].view_projection, frames[1].view_projection);
        assert_eq!(frames[1].view_projection, fl.state().view_projection());
    }

    #[test]
    fn identical_loops_produce_identical_frames() {
        let mut a = frame_loop();
        let mut b = frame_loop();
        let (mut sa, mut sb) = (RecordingSink::new(), RecordingSink::new());
        a.run(&mut sa, &mut ManualScheduler::new(300)).unwrap();
        b.run(&mut sb, &mut ManualScheduler::new(300)).unwrap();
        assert_eq!(sa.frames(), sb.frames());
    }

    #[test]
    fn frame_timer_averages_window() {
        let mut t = FrameTimer::new(3);
        assert!(t.is_empty());
        assert_eq!(t.average(), Duration::ZERO);

        for ms in [10, 20, 30, 40] {
            t.record(Duration::from_millis(ms));
        }
        assert_eq!(t.len(), 3);
        assert_eq!(t.average(), Duration::from_millis(30));
        assert_eq!(t.max(), Duration::from_millis(40));
    }
}
