//! The engine and its frame loop.
//!
//! [`Engine`] owns the platform, the configuration, the event handlers and
//! the receiving end of the request channel. Everything else game code
//! touches lives in the shared [`Context`] it hands out.
//!
//! # State machine
//!
//! `Constructed → Running → Stopped`. [`Engine::run`] moves from
//! `Constructed` to `Running` and loops until something quits; the engine
//! cannot be run again afterwards. [`Engine::quit`] moves `Running` to
//! `Stopped` exactly once.
//!
//! # Frame order
//!
//! 1. capture input (previous/current snapshot pair)
//! 2. refresh the in-game clock
//! 3. clear the frame to the configured background
//! 4. run the active scene's loop function
//! 5. drain platform events to every handler, then engine requests
//!    (a platform `Quit`, an `EngineRequest::Quit` or a raised
//!    [`QuitHandle`] stops the loop after this frame)
//! 6. draw the debug overlay and present
//! 7. pace to the target frame rate, measuring the next frame's delta

use std::io::{self, BufRead, BufReader};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crossbeam_channel::Receiver;
use log::{debug, error, info, warn};

use crate::error::{EngineError, panic_message};
use crate::events::platform::{EventHandler, PlatformEvent};
use crate::events::request::{EngineRequest, QuitHandle, RequestSender, request_channel};
use crate::platform::Platform;
use crate::resources::context::Context;
use crate::resources::frameclock::{SystemTimeSource, TimeSource};
use crate::resources::gameconfig::EngineConfig;
use crate::scene::Scene;
use crate::systems::console::{CommandTable, ConsoleContext, spawn_console};
use crate::systems::debug::render_debug_ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Constructed,
    Running,
    Stopped,
}

type Hook = Box<dyn FnOnce(&Context)>;

pub struct Engine<P: Platform> {
    platform: P,
    config: EngineConfig,
    ctx: Context,
    state: EngineState,
    handlers: Vec<Box<dyn EventHandler>>,
    on_start: Option<Hook>,
    on_end: Option<Hook>,
    request_tx: RequestSender,
    request_rx: Receiver<EngineRequest>,
    commands: CommandTable,
    console_input: Option<Box<dyn BufRead + Send>>,
    faults: u64,
}

impl<P: Platform> Engine<P> {
    /// Engine on the real clock. When `config.console` is set, the debug
    /// console reads stdin once `run` starts.
    pub fn new(platform: P, config: EngineConfig) -> Self {
        Self::with_time_source(platform, config, Box::new(SystemTimeSource::new()))
    }

    pub fn with_time_source(platform: P, config: EngineConfig, source: Box<dyn TimeSource>) -> Self {
        let ctx = Context::with_time_source(source);
        ctx.set_debug(config.debug);
        let (request_tx, request_rx) = request_channel();
        let console_input: Option<Box<dyn BufRead + Send>> = if config.console {
            Some(Box::new(BufReader::new(io::stdin())))
        } else {
            None
        };
        Self {
            platform,
            config,
            ctx,
            state: EngineState::Constructed,
            handlers: Vec::new(),
            on_start: None,
            on_end: None,
            request_tx,
            request_rx,
            commands: CommandTable::with_builtins(),
            console_input,
            faults: 0,
        }
    }

    // ---- wiring ----

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn into_platform(self) -> P {
        self.platform
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Faults isolated so far: failed scene objects plus failed handlers.
    pub fn fault_count(&self) -> u64 {
        self.faults
    }

    pub fn add_event_handler(&mut self, handler: impl EventHandler + 'static) -> &mut Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Run `hook` once, right before the first frame.
    pub fn on_start(&mut self, hook: impl FnOnce(&Context) + 'static) -> &mut Self {
        self.on_start = Some(Box::new(hook));
        self
    }

    /// Run `hook` once, after the loop stops.
    pub fn on_end(&mut self, hook: impl FnOnce(&Context) + 'static) -> &mut Self {
        self.on_end = Some(Box::new(hook));
        self
    }

    pub fn set_active_scene(&mut self, scene: &Rc<Scene>) -> &mut Self {
        self.ctx.set_active_scene(scene);
        self
    }

    pub fn active_scene(&self) -> Option<Rc<Scene>> {
        self.ctx.active_scene()
    }

    pub fn scenes(&self) -> Vec<Rc<Scene>> {
        self.ctx.scenes()
    }

    pub fn set_debug(&mut self, debug: bool) -> &mut Self {
        self.ctx.set_debug(debug);
        self
    }

    pub fn quit_handle(&self) -> QuitHandle {
        self.ctx.quit_handle()
    }

    pub fn request_sender(&self) -> RequestSender {
        self.request_tx.clone()
    }

    /// Commands the console will serve. Extend before calling `run`.
    pub fn console_commands_mut(&mut self) -> &mut CommandTable {
        &mut self.commands
    }

    /// Read console commands from `input` instead of stdin.
    pub fn enable_console(&mut self, input: impl BufRead + Send + 'static) -> &mut Self {
        self.console_input = Some(Box::new(input));
        self
    }

    pub fn disable_console(&mut self) -> &mut Self {
        self.console_input = None;
        self
    }

    // ---- lifecycle ----

    /// Run the frame loop until quit.
    ///
    /// The active scene is `first_scene` when given, else the scene set
    /// earlier, else the first scene created with this engine's context.
    pub fn run(&mut self, first_scene: Option<&Rc<Scene>>) -> Result<(), EngineError> {
        match self.state {
            EngineState::Running => return Err(EngineError::AlreadyRunning),
            EngineState::Stopped => return Err(EngineError::AlreadyStopped),
            EngineState::Constructed => {}
        }

        if let Some(scene) = first_scene {
            self.ctx.set_active_scene(scene);
        } else if self.ctx.active_scene().is_none() {
            if let Some(scene) = self.ctx.scene(0) {
                self.ctx.set_active_scene(&scene);
            }
        }
        match self.ctx.active_scene() {
            Some(scene) => info!("Starting with scene {:?}", scene.name()),
            None => warn!("No scene registered; frames will only clear and present"),
        }

        self.platform.set_title(&self.config.window_title());
        self.start_console();

        if let Some(hook) = self.on_start.take() {
            hook(&self.ctx);
        }
        self.state = EngineState::Running;
        info!("Engine running at target {} fps", self.config.target_fps);

        while self.state == EngineState::Running {
            self.frame();
        }

        if let Some(hook) = self.on_end.take() {
            hook(&self.ctx);
        }
        info!("Engine stopped after {} frames", self.ctx.clock().frame_index());
        Ok(())
    }

    /// Leave `Running`. Returns true only for the call that stopped the loop.
    pub fn quit(&mut self) -> bool {
        if self.state != EngineState::Running {
            return false;
        }
        self.state = EngineState::Stopped;
        info!("Quitting the game...");
        true
    }

    fn start_console(&mut self) {
        let Some(input) = self.console_input.take() else {
            return;
        };
        let ctx = ConsoleContext {
            quit: self.ctx.quit_handle(),
            requests: self.request_tx.clone(),
        };
        let table = std::mem::take(&mut self.commands);
        if let Err(err) = spawn_console(table, ctx, input) {
            error!(target: "novaengine::console", "{err}");
        }
    }

    fn frame(&mut self) {
        // 1. input
        let keys = self.platform.key_snapshot();
        let mouse = self.platform.mouse_snapshot();
        self.ctx.input_mut().capture(keys, mouse);

        // 2. clock
        self.ctx.clock_mut().refresh();

        // 3. clear
        self.platform.clear(self.config.background);

        // 4. scene
        if let Some(scene) = self.ctx.active_scene() {
            if scene.has_custom_loop() {
                scene.run_loop(&mut self.platform);
            } else {
                self.faults += scene.update(&mut self.platform) as u64;
            }
        }

        // 5. events and requests
        self.dispatch_events();
        self.drain_requests();
        if self.ctx.quit_handle().is_requested() {
            self.quit();
        }

        // 6. present
        render_debug_ui(&self.ctx, &mut self.platform);
        self.platform.present();

        // 7. pace
        let dt = self.ctx.clock_mut().tick(self.config.target_fps);
        log::trace!(target: "novaengine::engine", "frame done, dt={dt:.4}");
    }

    fn dispatch_events(&mut self) {
        for event in self.platform.drain_events() {
            if event == PlatformEvent::Quit {
                self.quit();
            }
            for (index, handler) in self.handlers.iter_mut().enumerate() {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.handle_event(&event)));
                let reason = match outcome {
                    Ok(Ok(())) => continue,
                    Ok(Err(err)) => format!("{err:#}"),
                    Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
                };
                self.faults += 1;
                error!(target: "novaengine::events", "event handler #{index} failed on {event:?}: {reason}");
            }
        }
    }

    fn drain_requests(&mut self) {
        let requests: Vec<EngineRequest> = self.request_rx.try_iter().collect();
        for request in requests {
            debug!(target: "novaengine::engine", "request {request:?}");
            match request {
                EngineRequest::Quit => {
                    self.quit();
                }
                EngineRequest::SetDebug(on) => self.ctx.set_debug(on),
                EngineRequest::SwitchScene(index) => match self.ctx.scene(index) {
                    Some(scene) => {
                        info!("Switching to scene {:?}", scene.name());
                        self.ctx.set_active_scene(&scene);
                    }
                    None => warn!("{}", EngineError::UnknownScene(index)),
                },
                EngineRequest::Freeze => self.ctx.freeze(),
                EngineRequest::Unfreeze => self.ctx.unfreeze(),
                EngineRequest::LogStats => {
                    let clock = self.ctx.clock();
                    let scene = self.ctx.active_scene();
                    info!(
                        "fps={:.1} frame={} in-game={:.2}s frozen={} scene={:?}",
                        clock.fps(),
                        clock.frame_index(),
                        clock.now().as_secs_f32(),
                        clock.is_frozen(),
                        scene.as_ref().map(|s| s.name())
                    );
                }
            }
        }
    }
}
