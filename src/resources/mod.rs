//! Long-lived engine state shared with game objects.
//!
//! Overview
//! - `attributes` – stable-key getter/setter registry for external persistence
//! - `context` – the injected engine context every sprite and scene holds
//! - `frameclock` – frame pacing, delta time and freezable in-game time
//! - `gameconfig` – window and engine settings loaded from INI
//! - `input` – per-frame key and mouse snapshots with edge queries
pub mod attributes;
pub mod context;
pub mod frameclock;
pub mod gameconfig;
pub mod input;
