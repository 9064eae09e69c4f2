//! Turns host input into state-machine calls.

use std::path::PathBuf;
use std::time::Instant;

use thiserror::Error;

use crate::backend::SurfaceBackend;
use crate::coords::CellMapper;
use crate::error::LifeError;
use crate::machine::StateMachine;
use crate::snapshot::{CellEncoding, Snapshot, SnapshotFileError, SnapshotSlot};

/// Platform-agnostic input commands.
///
/// Pointer positions are display pixels, top-left origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlEvent {
    /// Starts a stroke: `paint` sets cells alive, otherwise erases.
    PointerDown { x: f32, y: f32, paint: bool },
    /// Continues the active stroke, if any.
    PointerMove { x: f32, y: f32 },
    PointerUp,
    Randomize,
    Clear,
    ToggleAnimation,
    /// Stores the current grid in the snapshot slot.
    Save,
    /// Restores the snapshot slot; no-op when empty.
    Restore,
    /// Advances exactly one generation.
    Step,
    SaveFile,
    LoadFile,
}

#[derive(Debug, Error)]
pub enum ControlError {
    #[error(transparent)]
    Life(#[from] LifeError),

    #[error(transparent)]
    File(#[from] SnapshotFileError),

    #[error("no snapshot file configured")]
    NoSnapshotPath,
}

/// Owns a [`StateMachine`] and a single-slot snapshot buffer.
pub struct InteractionController<B: SurfaceBackend> {
    machine: StateMachine<B>,
    mapper: CellMapper,
    /// `Some(paint)` while a pointer button is held.
    stroke: Option<bool>,
    slot: SnapshotSlot,
    snapshot_path: Option<PathBuf>,
    encoding: CellEncoding,
}

impl<B: SurfaceBackend> InteractionController<B> {
    pub fn new(machine: StateMachine<B>) -> Self {
        let mapper = CellMapper::new(machine.size(), machine.scale());
        Self {
            machine,
            mapper,
            stroke: None,
            slot: SnapshotSlot::new(),
            snapshot_path: None,
            encoding: CellEncoding::default(),
        }
    }

    /// File used by [`ControlEvent::SaveFile`] and [`ControlEvent::LoadFile`].
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>, encoding: CellEncoding) -> Self {
        self.snapshot_path = Some(path.into());
        self.encoding = encoding;
        self
    }

    pub fn machine(&self) -> &StateMachine<B> {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut StateMachine<B> {
        &mut self.machine
    }

    pub fn slot(&self) -> &SnapshotSlot {
        &self.slot
    }

    #[inline]
    pub fn is_stroking(&self) -> bool {
        self.stroke.is_some()
    }

    /// Applies `event`, logging and dropping any error.
    pub fn handle(&mut self, event: ControlEvent, now: Instant) {
        if let Err(e) = self.apply(event, now) {
            log::warn!("InteractionController: {event:?} failed: {e}");
        }
    }

    /// Applies `event` and reports failures to the caller.
    pub fn apply(&mut self, event: ControlEvent, now: Instant) -> Result<(), ControlError> {
        match event {
            ControlEvent::PointerDown { x, y, paint } => {
                self.stroke = Some(paint);
                self.paint_at(x, y, paint)?;
            }
            ControlEvent::PointerMove { x, y } => {
                if let Some(paint) = self.stroke {
                    self.paint_at(x, y, paint)?;
                }
            }
            ControlEvent::PointerUp => self.stroke = None,
            ControlEvent::Randomize => self.machine.fill_random(None)?,
            ControlEvent::Clear => self.machine.fill_empty()?,
            ControlEvent::ToggleAnimation => {
                self.machine.toggle_animation(now);
            }
            ControlEvent::Save => {
                self.slot.save(self.machine.snapshot()?);
                log::info!("InteractionController: saved generation {}", self.machine.generation());
            }
            ControlEvent::Restore => match self.slot.get() {
                Some(snapshot) => self.machine.restore(snapshot)?,
                None => log::debug!("InteractionController: nothing to restore"),
            },
            ControlEvent::Step => self.machine.step(),
            ControlEvent::SaveFile => self.save_file()?,
            ControlEvent::LoadFile => self.load_file()?,
        }
        Ok(())
    }

    fn paint_at(&mut self, px: f32, py: f32, alive: bool) -> Result<(), LifeError> {
        let cell = self.mapper.display_to_cell(px, py);
        if !self.machine.size().contains(cell.x, cell.y) {
            log::debug!("InteractionController: pointer ({px}, {py}) is off the grid");
            return Ok(());
        }
        self.machine.set(cell.x, cell.y, alive)
    }

    fn save_file(&mut self) -> Result<(), ControlError> {
        let path = self.snapshot_path.as_ref().ok_or(ControlError::NoSnapshotPath)?;
        self.machine.snapshot()?.save(path, self.encoding)?;
        log::info!("InteractionController: wrote {}", path.display());
        Ok(())
    }

    fn load_file(&mut self) -> Result<(), ControlError> {
        let path = self.snapshot_path.as_ref().ok_or(ControlError::NoSnapshotPath)?;
        let snapshot = Snapshot::load_sized(path, self.machine.size())?;
        self.machine.restore(&snapshot)?;
        log::info!("InteractionController: loaded {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CpuBackend, PixelBuffer};
    use crate::grid::{Grid, GridSize};
    use crate::machine::LifeConfig;
    use std::time::Duration;

    // 8x4 cells at scale 4: a 32x16 view.
    fn controller() -> InteractionController<CpuBackend> {
        let config = LifeConfig {
            view_width: 32,
            view_height: 16,
            scale: 4,
            seed_probability: 0.0,
            seed: Some(5),
            tick_interval: Duration::from_millis(60),
        };
        InteractionController::new(StateMachine::initialize(CpuBackend::new(), &config).unwrap())
    }

    fn cell(c: &mut InteractionController<CpuBackend>, x: u32, y: u32) -> bool {
        let size: GridSize = c.machine().size();
        c.machine_mut().get().unwrap()[size.index(x, y)] != 0
    }

    // ── Pointer ───────────────────────────────────────────────────────────

    #[test]
    fn pointer_down_paints_flipped_cell() {
        let mut c = controller();
        let now = Instant::now();
        c.handle(ControlEvent::PointerDown { x: 1.0, y: 1.0, paint: true }, now);
        assert!(cell(&mut c, 0, 3));
        assert_eq!(c.machine_mut().live_count().unwrap(), 1);
    }

    #[test]
    fn drag_paints_until_pointer_up() {
        let mut c = controller();
        let now = Instant::now();
        c.handle(ControlEvent::PointerDown { x: 0.0, y: 15.0, paint: true }, now);
        c.handle(ControlEvent::PointerMove { x: 5.0, y: 15.0 }, now);
        c.handle(ControlEvent::PointerUp, now);
        c.handle(ControlEvent::PointerMove { x: 9.0, y: 15.0 }, now);
        assert!(cell(&mut c, 0, 0));
        assert!(cell(&mut c, 1, 0));
        assert!(!cell(&mut c, 2, 0));
        assert!(!c.is_stroking());
    }

    #[test]
    fn move_without_press_does_nothing() {
        let mut c = controller();
        c.handle(ControlEvent::PointerMove { x: 5.0, y: 5.0 }, Instant::now());
        assert_eq!(c.machine_mut().live_count().unwrap(), 0);
    }

    #[test]
    fn erase_stroke_kills_cells() {
        let mut c = controller();
        let now = Instant::now();
        c.machine_mut().fill_random(Some(1.0)).unwrap();
        c.handle(ControlEvent::PointerDown { x: 0.0, y: 0.0, paint: false }, now);
        assert!(!cell(&mut c, 0, 3));
        assert_eq!(c.machine_mut().live_count().unwrap(), 31);
    }

    #[test]
    fn off_grid_pointer_is_ignored() {
        let mut c = controller();
        let now = Instant::now();
        assert!(c.apply(ControlEvent::PointerDown { x: -3.0, y: 2.0, paint: true }, now).is_ok());
        assert!(c.apply(ControlEvent::PointerMove { x: 40.0, y: 2.0 }, now).is_ok());
        assert_eq!(c.machine_mut().live_count().unwrap(), 0);
    }

    // ── Commands ──────────────────────────────────────────────────────────

    #[test]
    fn randomize_then_clear() {
        let mut c = controller();
        let now = Instant::now();
        c.machine_mut().fill_random(Some(1.0)).unwrap();
        c.handle(ControlEvent::Clear, now);
        assert_eq!(c.machine_mut().get().unwrap(), vec![0; 32]);
        c.handle(ControlEvent::Randomize, now);
        assert_eq!(c.machine_mut().get().unwrap().len(), 32);
    }

    #[test]
    fn toggle_and_step() {
        let mut c = controller();
        let now = Instant::now();
        c.handle(ControlEvent::ToggleAnimation, now);
        assert!(c.machine().is_animating());
        c.handle(ControlEvent::ToggleAnimation, now);
        assert!(!c.machine().is_animating());
        c.handle(ControlEvent::Step, now);
        assert_eq!(c.machine().generation(), 1);
    }

    // ── Snapshots ─────────────────────────────────────────────────────────

    #[test]
    fn save_mutate_restore() {
        let mut c = controller();
        let now = Instant::now();
        c.handle(ControlEvent::PointerDown { x: 6.0, y: 6.0, paint: true }, now);
        c.handle(ControlEvent::PointerUp, now);
        let saved = c.machine_mut().get().unwrap();

        c.handle(ControlEvent::Save, now);
        c.handle(ControlEvent::Randomize, now);
        c.handle(ControlEvent::PointerDown { x: 0.0, y: 0.0, paint: true }, now);
        c.handle(ControlEvent::Restore, now);
        assert_eq!(c.machine_mut().get().unwrap(), saved);
    }

    #[test]
    fn restore_without_save_is_noop() {
        let mut c = controller();
        let now = Instant::now();
        c.machine_mut().fill_random(Some(0.5)).unwrap();
        let before = c.machine_mut().get().unwrap();
        assert!(c.slot().is_empty());
        assert!(c.apply(ControlEvent::Restore, now).is_ok());
        assert_eq!(c.machine_mut().get().unwrap(), before);
    }

    #[test]
    fn file_commands_need_a_path() {
        let mut c = controller();
        let err = c.apply(ControlEvent::SaveFile, Instant::now()).unwrap_err();
        assert!(matches!(err, ControlError::NoSnapshotPath));
    }

    #[test]
    fn save_file_then_load_file() {
        let path = std::env::temp_dir().join(format!("life-sim-controller-{}.life", std::process::id()));
        let mut c = controller().with_snapshot_path(&path, CellEncoding::Bytes);
        let now = Instant::now();
        c.handle(ControlEvent::PointerDown { x: 10.0, y: 10.0, paint: true }, now);
        let saved = c.machine_mut().get().unwrap();

        c.apply(ControlEvent::SaveFile, now).unwrap();
        c.handle(ControlEvent::Clear, now);
        c.apply(ControlEvent::LoadFile, now).unwrap();
        assert_eq!(c.machine_mut().get().unwrap(), saved);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_file_of_other_size_leaves_grid() {
        let path = std::env::temp_dir().join(format!("life-sim-controller-size-{}.life", std::process::id()));
        let other = Snapshot::new(GridSize::new(3, 3), vec![1; 9], 4).unwrap();
        other.save(&path, CellEncoding::Packed).unwrap();

        let mut c = controller().with_snapshot_path(&path, CellEncoding::Packed);
        let now = Instant::now();
        c.handle(ControlEvent::PointerDown { x: 10.0, y: 10.0, paint: true }, now);
        let before = c.machine_mut().get().unwrap();

        let err = c.apply(ControlEvent::LoadFile, now).unwrap_err();
        assert!(matches!(
            err,
            ControlError::File(SnapshotFileError::Life(LifeError::SizeMismatch { expected: 32, actual: 9 }))
        ));
        assert_eq!(c.machine_mut().get().unwrap(), before);
        let _ = std::fs::remove_file(&path);
    }

    // ── Readback failure ──────────────────────────────────────────────────

    /// CPU backend whose readback can be switched off.
    #[derive(Default)]
    struct FlakyReadback {
        inner: CpuBackend,
        broken: bool,
    }

    impl SurfaceBackend for FlakyReadback {
        type Surface = Grid;
        type Target<'t> = PixelBuffer;

        fn create_surface(&mut self, size: GridSize) -> crate::Result<Grid> {
            self.inner.create_surface(size)
        }

        fn upload(&mut self, surface: &mut Grid, cells: &[u8]) {
            self.inner.upload(surface, cells);
        }

        fn write_cell(&mut self, surface: &mut Grid, x: u32, y: u32, alive: bool) {
            self.inner.write_cell(surface, x, y, alive);
        }

        fn download(&mut self, surface: &Grid) -> crate::Result<Vec<u8>> {
            if self.broken {
                return Err(LifeError::BackendUnavailable("readback lost".to_string()));
            }
            self.inner.download(surface)
        }

        fn run_step(&mut self, current: &Grid, next: &mut Grid) {
            self.inner.run_step(current, next);
        }

        fn present(&mut self, current: &Grid, scale: u32, target: &mut PixelBuffer) {
            self.inner.present(current, scale, target);
        }
    }

    fn flaky_controller(path: &std::path::Path) -> InteractionController<FlakyReadback> {
        let config = LifeConfig {
            view_width: 32,
            view_height: 16,
            scale: 4,
            seed_probability: 0.5,
            seed: Some(5),
            tick_interval: Duration::from_millis(60),
        };
        let machine = StateMachine::initialize(FlakyReadback::default(), &config).unwrap();
        InteractionController::new(machine).with_snapshot_path(path, CellEncoding::Bytes)
    }

    #[test]
    fn failed_readback_keeps_previous_snapshot() {
        let path = std::env::temp_dir().join(format!("life-sim-controller-flaky-{}.life", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let mut c = flaky_controller(&path);
        let now = Instant::now();

        c.apply(ControlEvent::Save, now).unwrap();
        let saved = c.slot().get().cloned();
        assert!(saved.is_some());

        c.machine_mut().backend_mut().broken = true;
        assert!(matches!(c.machine_mut().get(), Err(LifeError::BackendUnavailable(_))));
        assert!(c.machine_mut().live_count().is_err());

        let err = c.apply(ControlEvent::Save, now).unwrap_err();
        assert!(matches!(err, ControlError::Life(LifeError::BackendUnavailable(_))));
        assert_eq!(c.slot().get().cloned(), saved);

        let err = c.apply(ControlEvent::SaveFile, now).unwrap_err();
        assert!(matches!(err, ControlError::Life(LifeError::BackendUnavailable(_))));
        assert!(!path.exists());
    }
}
