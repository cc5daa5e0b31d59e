//! NovaEngine demo.
//!
//! A small dodge game: steer the black box with the arrow keys or WASD while
//! the chasers close in. Every hit is logged, rate-limited by the player's
//! collision immunity. F1 toggles debug mode, P freezes the in-game clock and
//! Escape quits. The debug console reads commands from stdin (`help`).
//!
//! # Running
//!
//! ```sh
//! cargo run --release --features raylib -- --config ./config.ini
//! ```

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use glam::Vec2;
use log::info;

use novaengine::components::group::Group;
use novaengine::components::rect::Rect;
use novaengine::components::sprite::Sprite;
use novaengine::events::platform::PlatformEvent;
use novaengine::platform::raylib::RaylibPlatform;
use novaengine::resources::input::Key;
use novaengine::{Engine, EngineConfig, Scene, Surface};

const PLAYER_SPEED: f32 = 220.0;
const CHASER_SPEED: f32 = 60.0;
const PLAYER_IMMUNITY: f32 = 1.0;

/// NovaEngine 2D demo
#[derive(Parser)]
#[command(version, about = "Dodge the chasers. A NovaEngine demo.")]
struct Cli {
    /// Path to the INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Start in debug mode regardless of the config file.
    #[arg(long)]
    debug: bool,

    /// Do not start the stdin debug console.
    #[arg(long)]
    no_console: bool,

    /// TTF/OTF font for on-screen text instead of the built-in one.
    #[arg(long, value_name = "PATH")]
    font: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = EngineConfig::load_or_default(&cli.config);
    config.debug |= cli.debug;
    if cli.no_console {
        config.console = false;
    }

    let (width, height) = config.window_size();
    let mut platform = RaylibPlatform::open(width, height, &config.window_title());
    platform.set_font(cli.font.as_deref())?;
    let mut engine = Engine::new(platform, config);
    let ctx = engine.context().clone();
    let arena = Rect::new(0.0, 0.0, width as f32, height as f32);

    let scene = Scene::new(&ctx, "dodge");

    // --------------- player ---------------
    let player_pos = Rc::new(Cell::new(arena.center()));
    let hits = Rc::new(Cell::new(0u32));

    let player = Sprite::new(&ctx, Vec2::splat(30.0), false).into_ref();
    player
        .borrow_mut()
        .place_centered(arena.center())
        .set_collide_immunity(PLAYER_IMMUNITY);

    // --------------- chasers ---------------
    let mut chasers = Group::new(&ctx);
    for corner in [
        Vec2::new(20.0, 20.0),
        Vec2::new(arena.right() - 20.0, 20.0),
        Vec2::new(20.0, arena.bottom() - 20.0),
        Vec2::new(arena.right() - 20.0, arena.bottom() - 20.0),
    ] {
        let chaser = Sprite::new(&ctx, Vec2::splat(20.0), true).into_ref();
        let target = Rc::clone(&player_pos);
        chaser
            .borrow_mut()
            .place_centered(corner)
            .on_update(move |sprite, _surface| {
                sprite.look_at(target.get()).move_to(target.get(), CHASER_SPEED);
                Ok(())
            });
        chasers.add(&chaser);
    }
    let chasers = chasers.into_ref();

    {
        let chasers = Rc::clone(&chasers);
        let player_pos = Rc::clone(&player_pos);
        let hits = Rc::clone(&hits);
        player.borrow_mut().on_update(move |sprite, _surface| {
            let (dir, toggle_debug, toggle_freeze, quit) = {
                let input = sprite.context().input();
                let axis = |neg: [Key; 2], pos: [Key; 2]| {
                    f32::from(u8::from(input.any_held(&pos))) - f32::from(u8::from(input.any_held(&neg)))
                };
                let dir = Vec2::new(axis([Key::LEFT, Key::A], [Key::RIGHT, Key::D]), axis([Key::UP, Key::W], [Key::DOWN, Key::S]));
                (
                    dir.normalize_or_zero(),
                    input.pressed(Key::F1),
                    input.pressed(Key::P),
                    input.pressed(Key::ESCAPE),
                )
            };

            let ctx = sprite.context().clone();
            if toggle_debug {
                ctx.set_debug(!ctx.debug());
            }
            if toggle_freeze {
                if ctx.is_frozen() {
                    ctx.unfreeze();
                } else {
                    ctx.freeze();
                }
            }
            if quit {
                ctx.request_quit();
            }

            let step = dir * PLAYER_SPEED * ctx.dt();
            sprite.move_by(step.x, step.y).stay_in_rect(arena);
            player_pos.set(sprite.center());

            // One immunity window covers every chaser: find the one touching
            // the player, then spend the gate once.
            let touching = chasers.borrow().touching(sprite.rect());
            let hit = touching.is_some_and(|chaser| chaser.try_borrow().is_ok_and(|chaser| sprite.collide(&chaser)));
            if hit {
                hits.set(hits.get() + 1);
                info!("Caught! {} hit(s) so far", hits.get());
            }
            Ok(())
        });
    }

    scene.register(|r| {
        r.add(&player).add(&chasers);
    });

    engine
        .add_event_handler(|event: &PlatformEvent| -> anyhow::Result<()> {
            if let PlatformEvent::Resized { width, height } = event {
                info!("Window resized to {width}x{height}");
            }
            Ok(())
        })
        .on_end(move |ctx| info!("Survived {:.1}s with {} hit(s)", ctx.now().as_secs_f32(), hits.get()));

    engine.run(Some(&scene))?;
    Ok(())
}
