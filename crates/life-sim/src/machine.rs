use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::{Animation, DEFAULT_TICK_INTERVAL};
use crate::backend::SurfaceBackend;
use crate::coords::ViewSize;
use crate::error::{LifeError, Result};
use crate::fps::{epoch_seconds, FpsCounter, FpsSink};
use crate::grid::GridSize;
use crate::pack;
use crate::snapshot::Snapshot;
use crate::surface::{Slot, SurfacePair};

/// Live probability used when a caller does not pass one.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Construction parameters for a [`StateMachine`].
#[derive(Debug, Clone, PartialEq)]
pub struct LifeConfig {
    /// Visible output width in display pixels.
    pub view_width: u32,
    /// Visible output height in display pixels.
    pub view_height: u32,
    /// Display pixels per cell along each axis.
    pub scale: u32,
    /// Initial live probability per cell.
    pub seed_probability: f64,
    /// Fixed RNG seed for reproducible seeding; `None` uses OS entropy.
    pub seed: Option<u64>,
    /// Delay between automatic ticks.
    pub tick_interval: Duration,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            view_width: 512,
            view_height: 512,
            scale: 4,
            seed_probability: DEFAULT_PROBABILITY,
            seed: None,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// Double-buffered Game of Life over a [`SurfaceBackend`].
///
/// Holds two surfaces and a selector naming the current one. [`step`] runs the
/// backend's step program from current into the other surface, then flips the
/// selector. Every other mutation targets the current surface only.
///
/// All operations take `&mut self`; a host that shares the machine across
/// threads must serialize access itself.
///
/// [`step`]: StateMachine::step
pub struct StateMachine<B: SurfaceBackend> {
    backend: B,
    pair: SurfacePair<B::Surface>,
    size: GridSize,
    view: ViewSize,
    scale: u32,
    rng: StdRng,

    fps: FpsCounter,
    fps_sink: Option<Box<dyn FpsSink>>,

    generation: u64,
    animation: Animation,
}

impl<B: SurfaceBackend> StateMachine<B> {
    /// Validates `config`, allocates both surfaces and seeds the current one.
    pub fn initialize(mut backend: B, config: &LifeConfig) -> Result<Self> {
        let view = ViewSize::new(config.view_width, config.view_height);
        let size = view.grid_size(config.scale)?;
        check_probability(config.seed_probability)?;

        let a = backend.create_surface(size)?;
        let b = backend.create_surface(size)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut machine = Self {
            backend,
            pair: SurfacePair::new(a, b),
            size,
            view,
            scale: config.scale,
            rng,
            fps: FpsCounter::new(),
            fps_sink: None,
            generation: 0,
            animation: Animation::new(config.tick_interval),
        };
        machine.fill_random(Some(config.seed_probability))?;

        log::info!(
            "StateMachine: {}x{} cells ({}x{} view, scale {}), p={}",
            size.width,
            size.height,
            view.width,
            view.height,
            config.scale,
            config.seed_probability
        );
        Ok(machine)
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Advances one generation.
    ///
    /// The step program reads only the current surface and writes every cell
    /// of the other; the selector flips once the pass is complete.
    pub fn step(&mut self) {
        let (current, next) = self.pair.split();
        self.backend.run_step(current, next);
        self.pair.flip();
        self.generation += 1;
        self.record_frame(epoch_seconds());
    }

    /// Upscales the current surface into `target`. Does not mutate the grid.
    pub fn draw(&mut self, target: &mut B::Target<'_>) {
        self.backend.present(self.pair.current(), self.scale, target);
    }

    /// Runs one `step` + `draw` pair if the animation schedule is due at `now`.
    pub fn tick(&mut self, now: Instant, target: &mut B::Target<'_>) -> bool {
        if !self.animation.poll(now) {
            return false;
        }
        self.step();
        self.draw(target);
        true
    }

    fn record_frame(&mut self, second: u64) {
        if let Some(fps) = self.fps.record(second) {
            log::trace!("StateMachine: {fps} fps");
            if let Some(sink) = self.fps_sink.as_mut() {
                sink.report(fps);
            }
        }
    }

    // ── Cell access ───────────────────────────────────────────────────────

    /// Writes one cell of the current surface.
    pub fn set(&mut self, x: i32, y: i32, alive: bool) -> Result<()> {
        let (x, y) = self.size.check(x, y)?;
        self.backend.write_cell(self.pair.current_mut(), x, y, alive);
        Ok(())
    }

    /// Alias of [`set`](Self::set).
    #[inline]
    pub fn poke(&mut self, x: i32, y: i32, alive: bool) -> Result<()> {
        self.set(x, y, alive)
    }

    /// Replaces the current surface. Any nonzero byte is alive.
    pub fn fill(&mut self, cells: &[u8]) -> Result<()> {
        self.size.expect_len(cells.len())?;
        let normalized: Vec<u8> = cells.iter().map(|&c| (c != 0) as u8).collect();
        self.backend.upload(self.pair.current_mut(), &normalized);
        Ok(())
    }

    pub fn fill_bools(&mut self, cells: &[bool]) -> Result<()> {
        self.size.expect_len(cells.len())?;
        let bytes: Vec<u8> = cells.iter().map(|&c| c as u8).collect();
        self.backend.upload(self.pair.current_mut(), &bytes);
        Ok(())
    }

    /// Reseeds the current surface with independent Bernoulli(`p`) draws.
    ///
    /// `None` means [`DEFAULT_PROBABILITY`].
    pub fn fill_random(&mut self, p: Option<f64>) -> Result<()> {
        let p = p.unwrap_or(DEFAULT_PROBABILITY);
        check_probability(p)?;
        let cells: Vec<u8> = (0..self.size.cell_count())
            .map(|_| self.rng.random_bool(p) as u8)
            .collect();
        self.backend.upload(self.pair.current_mut(), &cells);
        log::debug!("StateMachine: reseeded with p={p}");
        Ok(())
    }

    pub fn fill_empty(&mut self) -> Result<()> {
        self.fill_random(Some(0.0))
    }

    /// Current grid as `0`/`1` bytes, row-major, row `y = 0` first.
    ///
    /// Fails with `BackendUnavailable` when the backend cannot read the
    /// surface back.
    pub fn get(&mut self) -> Result<Vec<u8>> {
        let cells = self.backend.download(self.pair.current())?;
        self.size.expect_len(cells.len())?;
        Ok(cells)
    }

    pub fn get_bools(&mut self) -> Result<Vec<bool>> {
        Ok(self.get()?.into_iter().map(|c| c != 0).collect())
    }

    /// Packed form of [`get`](Self::get), see [`pack::compact_bytes`].
    pub fn get_packed(&mut self) -> Result<Vec<u8>> {
        Ok(pack::compact_bytes(&self.get()?))
    }

    pub fn live_count(&mut self) -> Result<usize> {
        Ok(self.get()?.iter().filter(|&&c| c != 0).count())
    }

    // ── Snapshots ─────────────────────────────────────────────────────────

    pub fn snapshot(&mut self) -> Result<Snapshot> {
        let cells = self.get()?;
        Ok(Snapshot::from_parts(self.size, cells, self.generation))
    }

    /// Replaces the current grid with `snapshot`.
    ///
    /// A snapshot captured at different dimensions is rejected and the grid is
    /// left as it was.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        let theirs = snapshot.size();
        if theirs != self.size {
            return Err(LifeError::SizeMismatch {
                expected: self.size.cell_count(),
                actual: theirs.cell_count(),
            });
        }
        self.backend.upload(self.pair.current_mut(), snapshot.cells());
        self.generation = snapshot.generation();
        log::debug!("StateMachine: restored generation {}", self.generation);
        Ok(())
    }

    // ── Animation ─────────────────────────────────────────────────────────

    /// Starts or stops periodic stepping. Returns the new running state.
    pub fn toggle_animation(&mut self, now: Instant) -> bool {
        let running = self.animation.toggle(now);
        log::debug!("StateMachine: animation {}", if running { "started" } else { "stopped" });
        running
    }

    pub fn start_animation(&mut self, now: Instant) {
        self.animation.start(now);
    }

    /// Cancels the pending tick. No tick runs after this returns.
    pub fn stop_animation(&mut self) {
        self.animation.stop();
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_running()
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn set_fps_sink(&mut self, sink: impl FpsSink + 'static) {
        self.fps_sink = Some(Box::new(sink));
    }

    #[inline]
    pub fn size(&self) -> GridSize {
        self.size
    }

    #[inline]
    pub fn view(&self) -> ViewSize {
        self.view
    }

    #[inline]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn current_slot(&self) -> Slot {
        self.pair.current_slot()
    }

    /// Steps counted in the last completed wall-clock second.
    #[inline]
    pub fn fps(&self) -> u32 {
        self.fps.last()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

fn check_probability(p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(LifeError::InvalidProbability(p))
    }
}
