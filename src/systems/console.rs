//! Line-oriented debug console.
//!
//! The console reads commands from a [`BufRead`] (stdin in a real game) on
//! its own thread and dispatches them through a closed [`CommandTable`]:
//! a name maps to a handler, and nothing outside the table can run. Handlers
//! only see a [`ConsoleContext`], so every effect on the game goes through
//! the quit flag or the engine request channel and is applied by the frame
//! loop on its next event step.
//!
//! Built-in commands:
//!
//! | command            | effect                                   |
//! |--------------------|------------------------------------------|
//! | `quit`, `kill`     | request quit and stop reading            |
//! | `help`             | log the command list                     |
//! | `debug on\|off`    | toggle debug drawing                     |
//! | `scene <index>`    | switch the active scene                  |
//! | `freeze`           | stop in-game time                        |
//! | `unfreeze`         | resume in-game time                      |
//! | `fps`              | log frame statistics                     |
//!
//! A trailing `()` on the command name is accepted, so `quit()` works too.
//! Unknown commands, handler errors and handler panics are logged under
//! `novaengine::console`; the reader keeps going.

use std::io::BufRead;
use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use anyhow::{Context as _, bail};
use rustc_hash::FxHashMap;

use crate::error::{EngineError, panic_message};
use crate::events::request::{EngineRequest, QuitHandle, RequestSender};

/// What console handlers are allowed to touch.
#[derive(Debug, Clone)]
pub struct ConsoleContext {
    pub quit: QuitHandle,
    pub requests: RequestSender,
}

impl ConsoleContext {
    /// Post a request, failing once the engine is gone.
    pub fn send(&self, request: EngineRequest) -> anyhow::Result<()> {
        if !self.requests.send(request) {
            bail!("engine is gone");
        }
        Ok(())
    }
}

/// Signature of a console command handler. `args` excludes the name.
pub type CommandFn =
    dyn FnMut(&ConsoleContext, &[&str]) -> anyhow::Result<ControlFlow<()>> + Send;

struct Command {
    help: String,
    handler: Box<CommandFn>,
}

/// Closed name → handler table.
#[derive(Default)]
pub struct CommandTable {
    commands: FxHashMap<String, Command>,
}

impl CommandTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding the built-in commands.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        let quit = |ctx: &ConsoleContext, _: &[&str]| -> anyhow::Result<ControlFlow<()>> {
            log::info!(target: "novaengine::console", "quit requested from console");
            ctx.quit.request();
            Ok(ControlFlow::Break(()))
        };
        table
            .register("quit", "stop the engine", quit)
            .register("kill", "stop the engine", quit)
            .register("help", "list commands", |_, _| Ok(ControlFlow::Continue(())))
            .register("debug", "debug on|off", |ctx, args| {
                let on = match args.first().copied() {
                    Some("on" | "true" | "1") => true,
                    Some("off" | "false" | "0") => false,
                    other => bail!("expected on|off, got {other:?}"),
                };
                ctx.send(EngineRequest::SetDebug(on))?;
                Ok(ControlFlow::Continue(()))
            })
            .register("scene", "scene <index>", |ctx, args| {
                let index: usize = args
                    .first()
                    .context("missing scene index")?
                    .parse()
                    .context("scene index must be a number")?;
                ctx.send(EngineRequest::SwitchScene(index))?;
                Ok(ControlFlow::Continue(()))
            })
            .register("freeze", "stop in-game time", |ctx, _| {
                ctx.send(EngineRequest::Freeze)?;
                Ok(ControlFlow::Continue(()))
            })
            .register("unfreeze", "resume in-game time", |ctx, _| {
                ctx.send(EngineRequest::Unfreeze)?;
                Ok(ControlFlow::Continue(()))
            })
            .register("fps", "log frame statistics", |ctx, _| {
                ctx.send(EngineRequest::LogStats)?;
                Ok(ControlFlow::Continue(()))
            });
        table
    }

    /// Add or replace a command.
    pub fn register<F>(&mut self, name: &str, help: &str, handler: F) -> &mut Self
    where
        F: FnMut(&ConsoleContext, &[&str]) -> anyhow::Result<ControlFlow<()>> + Send + 'static,
    {
        self.commands.insert(
            name.to_owned(),
            Command {
                help: help.to_owned(),
                handler: Box::new(handler),
            },
        );
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn log_help(&self) {
        for name in self.names() {
            let help = self.commands.get(name).map_or("", |c| c.help.as_str());
            log::info!(target: "novaengine::console", "{name:<10} {help}");
        }
    }

    /// Parse and run one line. `Break` means the reader should stop.
    pub fn dispatch(&mut self, ctx: &ConsoleContext, line: &str) -> ControlFlow<()> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return ControlFlow::Continue(());
        };
        let name = head.strip_suffix("()").unwrap_or(head);
        let args: Vec<&str> = words.collect();

        if name == "help" {
            self.log_help();
        }
        let Some(command) = self.commands.get_mut(name) else {
            log::warn!(target: "novaengine::console", "unknown command {name:?}, try `help`");
            return ControlFlow::Continue(());
        };

        let handler = &mut command.handler;
        match panic::catch_unwind(AssertUnwindSafe(|| handler(ctx, &args))) {
            Ok(Ok(flow)) => flow,
            Ok(Err(err)) => {
                log::error!(target: "novaengine::console", "{name}: {err:#}");
                ControlFlow::Continue(())
            }
            Err(payload) => {
                log::error!(
                    target: "novaengine::console",
                    "{name} panicked: {}",
                    panic_message(payload.as_ref())
                );
                ControlFlow::Continue(())
            }
        }
    }
}

impl std::fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Read `input` line by line until EOF, a read error, or a command asks to
/// stop.
pub fn run_console<R: BufRead>(mut table: CommandTable, ctx: ConsoleContext, input: R) {
    log::debug!(target: "novaengine::console", "console reader started");
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log::error!(target: "novaengine::console", "console input failed: {err}");
                break;
            }
        };
        if table.dispatch(&ctx, &line).is_break() {
            break;
        }
    }
    log::debug!(target: "novaengine::console", "console reader finished");
}

/// Run [`run_console`] on a background thread.
pub fn spawn_console<R>(
    table: CommandTable,
    ctx: ConsoleContext,
    input: R,
) -> Result<JoinHandle<()>, EngineError>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("novaengine-console".into())
        .spawn(move || run_console(table, ctx, input))
        .map_err(|source| EngineError::Thread {
            name: "console",
            source,
        })
}
