//! Lifecycle-scoped backdrop component.
//!
//! `Backdrop` owns the mount-to-unmount story: it acquires the drawing
//! surface once, drives the per-frame resize/update/draw cycle, and
//! guarantees that no callback outlives teardown. The phase machine is
//! strictly `Uninitialized → Running → Stopped`; a failed mount goes straight
//! to `Stopped` without ever entering `Running`, and nothing transitions back.

use winit::dpi::PhysicalSize;

use crate::runtime::{FrameHandle, FrameScheduler};

/// Lifecycle phase of the backdrop component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Running,
    Stopped,
}

/// Drawing operations the backdrop needs from its surface.
///
/// `GpuState` is the production implementation; tests substitute a recording
/// double so the frame/resize/teardown contract can be observed without a
/// GPU.
pub trait BackdropSurface {
    /// Current backing-buffer extent in physical pixels.
    fn size(&self) -> PhysicalSize<u32>;

    /// Reallocates the backing buffer and rewrites the resolution uniform.
    /// Only called when the size actually changed.
    fn resize(&mut self, new_size: PhysicalSize<u32>);

    /// Writes the loop timestamp in milliseconds into the time uniform.
    fn set_time_millis(&mut self, timestamp_ms: f64);

    /// Issues the draw call for one frame.
    fn draw(&mut self) -> Result<(), wgpu::SurfaceError>;

    /// Reconfigures the backing buffer at its current size after the host
    /// reported it lost or outdated.
    fn recover(&mut self);
}

/// Continuously animated, resolution-independent background component.
pub struct Backdrop<S> {
    surface: Option<S>,
    phase: Phase,
    pending: Option<FrameHandle>,
}

impl<S: BackdropSurface> Backdrop<S> {
    /// Creates the component in its unmounted state.
    pub fn new() -> Self {
        Self {
            surface: None,
            phase: Phase::Uninitialized,
            pending: None,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Mounts the drawing surface produced by `acquire`, enters `Running`,
    /// and schedules the first frame.
    ///
    /// A failed acquisition is the soft-failure path: the error is logged,
    /// the component enters `Stopped` without ever running, and the caller
    /// sees no error. The window stays usable either way.
    pub fn initialize<F>(&mut self, scheduler: &mut dyn FrameScheduler, acquire: F)
    where
        F: FnOnce() -> anyhow::Result<S>,
    {
        if self.phase != Phase::Uninitialized {
            return;
        }
        match acquire() {
            Ok(surface) => {
                self.surface = Some(surface);
                self.phase = Phase::Running;
                self.pending = Some(scheduler.request_frame());
            }
            Err(err) => {
                tracing::warn!(error = %err, "drawing surface unavailable; backdrop disabled");
                self.phase = Phase::Stopped;
            }
        }
    }

    /// Reacts to a viewport-change notification.
    ///
    /// Idempotent: an unchanged size leaves the backing buffer and the
    /// resolution uniform untouched.
    pub fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        if self.phase != Phase::Running {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            if surface.size() != new_size {
                surface.resize(new_size);
            }
        }
    }

    /// Renders one frame: idempotent resize check, time update, draw, and
    /// re-scheduling.
    ///
    /// `current_size` is the host's report of the surface's present size (the
    /// per-frame safety check that also covers scale-factor changes);
    /// `timestamp_ms` comes from the frame clock. Returns `None` when the
    /// component is not running — notably after teardown, which drops a frame
    /// that was already queued.
    pub fn frame(
        &mut self,
        scheduler: &mut dyn FrameScheduler,
        current_size: PhysicalSize<u32>,
        timestamp_ms: f64,
    ) -> Option<Result<(), wgpu::SurfaceError>> {
        if self.phase != Phase::Running {
            return None;
        }
        self.pending = None;
        let surface = self.surface.as_mut()?;
        if surface.size() != current_size {
            surface.resize(current_size);
        }
        surface.set_time_millis(timestamp_ms);
        let result = surface.draw();
        self.pending = Some(scheduler.request_frame());
        Some(result)
    }

    /// Reconfigures the backing buffer after a lost or outdated surface.
    pub fn recover(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.recover();
        }
    }

    /// Cancels the pending frame callback and enters `Stopped`.
    ///
    /// Safe to call when initialization never completed, and on repeat calls;
    /// dropping the surface releases every GPU handle it owned.
    pub fn teardown(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
        self.surface = None;
        self.phase = Phase::Stopped;
    }
}

impl<S: BackdropSurface> Default for Backdrop<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[derive(Default)]
    struct RecordingScheduler {
        requested: u32,
        cancelled: Vec<FrameHandle>,
        next_id: u64,
    }

    impl FrameScheduler for RecordingScheduler {
        fn request_frame(&mut self) -> FrameHandle {
            self.requested += 1;
            self.next_id += 1;
            FrameHandle::new(self.next_id)
        }

        fn cancel(&mut self, handle: FrameHandle) {
            self.cancelled.push(handle);
        }
    }

    struct FakeSurface {
        size: PhysicalSize<u32>,
        resizes: u32,
        recoveries: u32,
        draws: u32,
        times: Vec<f64>,
    }

    impl FakeSurface {
        fn new(width: u32, height: u32) -> Self {
            Self {
                size: PhysicalSize::new(width, height),
                resizes: 0,
                recoveries: 0,
                draws: 0,
                times: Vec::new(),
            }
        }
    }

    impl BackdropSurface for FakeSurface {
        fn size(&self) -> PhysicalSize<u32> {
            self.size
        }

        fn resize(&mut self, new_size: PhysicalSize<u32>) {
            self.size = new_size;
            self.resizes += 1;
        }

        fn set_time_millis(&mut self, timestamp_ms: f64) {
            self.times.push(timestamp_ms);
        }

        fn draw(&mut self) -> Result<(), wgpu::SurfaceError> {
            self.draws += 1;
            Ok(())
        }

        fn recover(&mut self) {
            self.recoveries += 1;
        }
    }

    fn running_backdrop(
        scheduler: &mut RecordingScheduler,
        width: u32,
        height: u32,
    ) -> Backdrop<FakeSurface> {
        let mut backdrop = Backdrop::new();
        backdrop.initialize(scheduler, || Ok(FakeSurface::new(width, height)));
        assert_eq!(backdrop.phase(), Phase::Running);
        backdrop
    }

    #[test]
    fn initialize_schedules_the_first_frame() {
        let mut scheduler = RecordingScheduler::default();
        let backdrop = running_backdrop(&mut scheduler, 800, 600);
        assert_eq!(scheduler.requested, 1);
        assert_eq!(backdrop.phase(), Phase::Running);
    }

    #[test]
    fn failed_acquisition_degrades_silently() {
        let mut scheduler = RecordingScheduler::default();
        let mut backdrop: Backdrop<FakeSurface> = Backdrop::new();
        backdrop.initialize(&mut scheduler, || Err(anyhow!("no adapter")));
        assert_eq!(backdrop.phase(), Phase::Stopped);
        assert_eq!(scheduler.requested, 0);

        // The loop may still deliver events; they must be no-ops.
        assert!(backdrop
            .frame(&mut scheduler, PhysicalSize::new(800, 600), 16.0)
            .is_none());
        backdrop.handle_resize(PhysicalSize::new(400, 300));
        backdrop.teardown(&mut scheduler);
        assert_eq!(backdrop.phase(), Phase::Stopped);
        assert!(scheduler.cancelled.is_empty());
    }

    #[test]
    fn unchanged_size_never_touches_the_backing_buffer() {
        let mut scheduler = RecordingScheduler::default();
        let mut backdrop = running_backdrop(&mut scheduler, 800, 600);

        backdrop.handle_resize(PhysicalSize::new(800, 600));
        backdrop.handle_resize(PhysicalSize::new(800, 600));
        backdrop.frame(&mut scheduler, PhysicalSize::new(800, 600), 16.0);

        let surface = backdrop.surface.as_ref().unwrap();
        assert_eq!(surface.resizes, 0);
        assert_eq!(surface.draws, 1);
    }

    #[test]
    fn resize_notification_lands_before_the_next_draw() {
        let mut scheduler = RecordingScheduler::default();
        let mut backdrop = running_backdrop(&mut scheduler, 800, 600);

        backdrop.handle_resize(PhysicalSize::new(400, 300));
        {
            let surface = backdrop.surface.as_ref().unwrap();
            assert_eq!(surface.size, PhysicalSize::new(400, 300));
            assert_eq!(surface.resizes, 1);
            assert_eq!(surface.draws, 0);
        }

        backdrop.frame(&mut scheduler, PhysicalSize::new(400, 300), 16.0);
        let surface = backdrop.surface.as_ref().unwrap();
        assert_eq!(surface.resizes, 1);
        assert_eq!(surface.draws, 1);
    }

    #[test]
    fn per_frame_size_check_catches_unannounced_changes() {
        let mut scheduler = RecordingScheduler::default();
        let mut backdrop = running_backdrop(&mut scheduler, 800, 600);

        backdrop.frame(&mut scheduler, PhysicalSize::new(1600, 1200), 16.0);
        let surface = backdrop.surface.as_ref().unwrap();
        assert_eq!(surface.size, PhysicalSize::new(1600, 1200));
        assert_eq!(surface.resizes, 1);
    }

    #[test]
    fn frame_timestamps_flow_through_strictly_increasing() {
        let mut scheduler = RecordingScheduler::default();
        let mut backdrop = running_backdrop(&mut scheduler, 800, 600);

        let size = PhysicalSize::new(800, 600);
        for timestamp in [0.0, 16.7, 33.4, 50.1] {
            backdrop.frame(&mut scheduler, size, timestamp);
        }

        let surface = backdrop.surface.as_ref().unwrap();
        assert_eq!(surface.times, vec![0.0, 16.7, 33.4, 50.1]);
        assert!(surface
            .times
            .windows(2)
            .all(|pair| pair[1] > pair[0]));
    }

    #[test]
    fn every_frame_reschedules_exactly_once() {
        let mut scheduler = RecordingScheduler::default();
        let mut backdrop = running_backdrop(&mut scheduler, 800, 600);

        let size = PhysicalSize::new(800, 600);
        for frame in 0..5 {
            backdrop.frame(&mut scheduler, size, frame as f64 * 16.0);
        }
        assert_eq!(scheduler.requested, 6);
    }

    #[test]
    fn teardown_cancels_the_pending_frame_and_stops_scheduling() {
        let mut scheduler = RecordingScheduler::default();
        let mut backdrop = running_backdrop(&mut scheduler, 800, 600);
        backdrop.frame(&mut scheduler, PhysicalSize::new(800, 600), 16.0);

        backdrop.teardown(&mut scheduler);
        assert_eq!(backdrop.phase(), Phase::Stopped);
        assert_eq!(scheduler.cancelled.len(), 1);

        // A frame that was already queued when teardown ran must be dropped.
        let before = scheduler.requested;
        assert!(backdrop
            .frame(&mut scheduler, PhysicalSize::new(800, 600), 32.0)
            .is_none());
        assert_eq!(scheduler.requested, before);
    }

    #[test]
    fn teardown_is_idempotent_and_final() {
        let mut scheduler = RecordingScheduler::default();
        let mut backdrop = running_backdrop(&mut scheduler, 800, 600);

        backdrop.teardown(&mut scheduler);
        backdrop.teardown(&mut scheduler);
        assert_eq!(scheduler.cancelled.len(), 1);

        // No transition back to Running once stopped.
        backdrop.initialize(&mut scheduler, || Ok(FakeSurface::new(800, 600)));
        assert_eq!(backdrop.phase(), Phase::Stopped);
    }

    #[test]
    fn recover_reconfigures_the_current_surface() {
        let mut scheduler = RecordingScheduler::default();
        let mut backdrop = running_backdrop(&mut scheduler, 800, 600);
        backdrop.recover();
        assert_eq!(backdrop.surface.as_ref().unwrap().recoveries, 1);
    }
}
