//! Engine configuration.
//!
//! Window and engine settings loaded from an INI file. Every field has a
//! default, so a missing file or key never blocks startup.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 500
//! height = 500
//! title = Game
//! target_fps = 60
//! show_engine_tag = true
//!
//! [engine]
//! debug = false
//! console = true
//! background = 255,255,255
//! ```

use std::path::PathBuf;

use configparser::ini::Ini;
use log::{info, warn};

use crate::ENGINE_VERSION;
use crate::error::EngineError;
use crate::platform::Color;

const DEFAULT_WINDOW_WIDTH: u32 = 500;
const DEFAULT_WINDOW_HEIGHT: u32 = 500;
const DEFAULT_TITLE: &str = "Game";
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_SHOW_ENGINE_TAG: bool = true;
const DEFAULT_DEBUG: bool = false;
const DEFAULT_CONSOLE: bool = true;
const DEFAULT_BACKGROUND: Color = Color::WHITE;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Application name shown in the title bar.
    pub title: String,
    /// Target frames per second; 0 runs unpaced.
    pub target_fps: u32,
    /// Append the engine tag to the window title.
    pub show_engine_tag: bool,
    /// Start with debug drawing on.
    pub debug: bool,
    /// Start the stdin debug console on `run`.
    pub console: bool,
    /// Colour the frame is cleared to.
    pub background: Color,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            title: DEFAULT_TITLE.to_owned(),
            target_fps: DEFAULT_TARGET_FPS,
            show_engine_tag: DEFAULT_SHOW_ENGINE_TAG,
            debug: DEFAULT_DEBUG,
            console: DEFAULT_CONSOLE,
            background: DEFAULT_BACKGROUND,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Defaults overlaid with whatever `path` provides. A missing or broken
    /// file is logged and the defaults are kept.
    pub fn load_or_default(path: impl Into<PathBuf>) -> Self {
        let mut config = Self::with_path(path);
        if let Err(err) = config.load_from_file() {
            warn!("{err}; using defaults");
        }
        config
    }

    /// Load values from `config_path`. Missing keys keep their current value.
    pub fn load_from_file(&mut self) -> Result<(), EngineError> {
        let mut ini = Ini::new();
        ini.load(&self.config_path)
            .map_err(|e| EngineError::Config(format!("failed to load {:?}: {e}", self.config_path)))?;

        // [window]
        if let Some(width) = ini.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = ini.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(title) = ini.get("window", "title") {
            self.title = title;
        }
        if let Some(fps) = ini.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(tag) = ini.getbool("window", "show_engine_tag").ok().flatten() {
            self.show_engine_tag = tag;
        }

        // [engine]
        if let Some(debug) = ini.getbool("engine", "debug").ok().flatten() {
            self.debug = debug;
        }
        if let Some(console) = ini.getbool("engine", "console").ok().flatten() {
            self.console = console;
        }
        if let Some(text) = ini.get("engine", "background") {
            match Color::parse(&text) {
                Some(color) => self.background = color,
                None => warn!("ignoring background {text:?}: expected r,g,b[,a]"),
            }
        }

        info!(
            "Loaded config: {}x{} window, title={:?}, fps={}, debug={}, console={}",
            self.window_width, self.window_height, self.title, self.target_fps, self.debug, self.console
        );
        Ok(())
    }

    /// Write every value to `config_path`, creating the file if needed.
    pub fn save_to_file(&self) -> Result<(), EngineError> {
        let mut ini = Ini::new();

        ini.set("window", "width", Some(self.window_width.to_string()));
        ini.set("window", "height", Some(self.window_height.to_string()));
        ini.set("window", "title", Some(self.title.clone()));
        ini.set("window", "target_fps", Some(self.target_fps.to_string()));
        ini.set("window", "show_engine_tag", Some(self.show_engine_tag.to_string()));

        let bg = self.background;
        ini.set("engine", "debug", Some(self.debug.to_string()));
        ini.set("engine", "console", Some(self.console.to_string()));
        ini.set("engine", "background", Some(format!("{},{},{},{}", bg.r, bg.g, bg.b, bg.a)));

        ini.write(&self.config_path)
            .map_err(|e| EngineError::Config(format!("failed to save {:?}: {e}", self.config_path)))?;

        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// Title bar text, tagged with the engine version unless disabled.
    pub fn window_title(&self) -> String {
        if self.show_engine_tag {
            format!("{} | Running with NovaEngine {ENGINE_VERSION}", self.title)
        } else {
            self.title.clone()
        }
    }
}
