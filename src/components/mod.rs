//! Building blocks of game objects.
//!
//! Submodules overview:
//! - [`animation`] – named frame-sequence clips and the per-sprite clip table
//! - [`cooldown`] – read-only-check countdown gate on the in-game clock
//! - [`group`] – identity-deduplicated sprite collection with batch operations
//! - [`rect`] – axis-aligned rectangle math used for bounds and collision
//! - [`sprite`] – the drawable, updatable, collidable game object

pub mod animation;
pub mod cooldown;
pub mod group;
pub mod rect;
pub mod sprite;
