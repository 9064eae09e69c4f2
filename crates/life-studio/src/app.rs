use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};

use life_engine::core::{App, AppControl, FrameCtx};
use life_engine::input::InputEvent;
use life_engine::render::RenderCtx;
use life_engine::render::life::GpuBackend;
use life_sim::{ControlEvent, InteractionController, StateMachine, SurfaceBackend};

use crate::bindings::{self, Binding};
use crate::config::Config;

/// The studio window: one GPU-backed state machine driven by mouse and keys.
///
/// The backend needs a device, so the machine is built inside the first
/// rendered frame. Controls arriving earlier wait in `pending`.
pub struct LifeApp {
    config: Config,
    title: String,
    controller: Option<InteractionController<GpuBackend>>,
    pending: Vec<ControlEvent>,
    frames: u64,
    /// Written by the machine's FPS sink, read when updating the title.
    fps: Rc<Cell<u32>>,
    shown_fps: Option<u32>,
}

impl LifeApp {
    pub fn new(config: Config, title: impl Into<String>) -> Self {
        Self {
            config,
            title: title.into(),
            controller: None,
            pending: Vec::new(),
            frames: 0,
            fps: Rc::new(Cell::new(0)),
            shown_fps: None,
        }
    }

    fn start(
        config: &Config,
        fps: &Rc<Cell<u32>>,
        rctx: &RenderCtx<'_>,
        now: Instant,
    ) -> Result<InteractionController<GpuBackend>> {
        let mut backend = GpuBackend::new(rctx);
        backend.set_palette(config.cell_palette());

        let mut machine = StateMachine::initialize(backend, &config.life_config())
            .context("failed to initialize the life grid")?;

        let sink = Rc::clone(fps);
        machine.set_fps_sink(move |value: u32| sink.set(value));

        if !config.simulation.paused {
            machine.start_animation(now);
        }

        let mut controller = InteractionController::new(machine);
        if let Some(path) = &config.snapshot.path {
            controller = controller.with_snapshot_path(path.clone(), config.snapshot.encoding);
        }
        Ok(controller)
    }

    fn update_title(&mut self, ctx: &FrameCtx<'_, '_>) {
        let fps = self.fps.get();
        if self.shown_fps == Some(fps) {
            return;
        }
        self.shown_fps = Some(fps);
        ctx.window.set_title(&format!("{} - {fps} fps", self.title));
    }
}

/// Translates a frame's events onto `pending`. Returns true on quit.
fn queue_controls(events: &[InputEvent], pending: &mut Vec<ControlEvent>) -> bool {
    for event in events {
        match bindings::translate(event) {
            Some(Binding::Control(control)) => pending.push(control),
            Some(Binding::Quit) => return true,
            None => {}
        }
    }
    false
}

/// Applies queued controls in arrival order.
fn drain_controls<B: SurfaceBackend>(
    controller: &mut InteractionController<B>,
    pending: &mut Vec<ControlEvent>,
    now: Instant,
) {
    for control in pending.drain(..) {
        controller.handle(control, now);
    }
}

impl App for LifeApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let now = ctx.time.now;
        self.frames = ctx.time.frame_index + 1;

        if queue_controls(&ctx.input_frame.events, &mut self.pending) {
            return AppControl::Exit;
        }

        let config = &self.config;
        let fps = &self.fps;
        let slot = &mut self.controller;
        let pending = &mut self.pending;
        let mut failure = None;

        let control = ctx.render(config.cell_palette().dead, |rctx, target| {
            if slot.is_none() {
                match Self::start(config, fps, rctx, now) {
                    Ok(controller) => *slot = Some(controller),
                    Err(e) => {
                        failure = Some(e);
                        return;
                    }
                }
            }
            let Some(controller) = slot.as_mut() else {
                return;
            };
            drain_controls(controller, pending, now);

            let machine = controller.machine_mut();
            machine.backend_mut().prepare(rctx);
            if !machine.tick(now, target) {
                machine.draw(target);
            }
        });

        if let Some(e) = failure {
            log::error!("{e:#}");
            return AppControl::Exit;
        }

        self.update_title(ctx);
        control
    }

    fn on_exit(&mut self) {
        if let Some(controller) = self.controller.as_ref() {
            let machine = controller.machine();
            log::info!(
                "exiting at generation {} after {} frames",
                machine.generation(),
                self.frames
            );
        }
    }
}
