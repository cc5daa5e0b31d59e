//! NovaEngine library.
//!
//! A small 2D engine built around retained scene objects: sprites and groups
//! registered into scenes, updated in layer order once per frame by
//! [`Engine`](engine::Engine). Drawing, input and image loading go through the
//! [`platform`] traits, so the whole engine runs headless in tests.
//!
//! - [`components`] – sprites, groups, animation clips, cooldowns, rects
//! - [`events`] – platform events and cross-thread engine requests
//! - [`platform`] – backend contracts plus the headless and raylib backends
//! - [`resources`] – context, frame clock, input state, config, attributes
//! - [`systems`] – debug overlay, debug console, background timers
//! - [`scene`] – layer-ordered object list with fault isolation
//! - [`engine`] – the frame loop

pub mod components;
pub mod engine;
pub mod error;
pub mod events;
pub mod platform;
pub mod resources;
pub mod scene;
pub mod systems;

/// Version tag appended to the window title.
pub const ENGINE_VERSION: &str = "V1.9.2";

pub use components::group::{Group, GroupRef};
pub use components::sprite::{Sprite, SpriteRef};
pub use engine::{Engine, EngineState};
pub use error::EngineError;
pub use platform::{Color, Image, Platform, Surface};
pub use resources::context::Context;
pub use resources::gameconfig::EngineConfig;
pub use scene::{Scene, SceneObject};
