//! Time-driven behavior: cooldowns, freezing, collision immunity, animation
//! stepping and background timers.

use std::ops::ControlFlow;
use std::time::Duration;

use glam::Vec2;

use novaengine::components::cooldown::Cooldown;
use novaengine::components::sprite::Sprite;
use novaengine::platform::{Image, ImageId};
use novaengine::resources::context::Context;
use novaengine::resources::frameclock::ManualTimeSource;
use novaengine::systems::timer::{Interval, Repeat, Timer};

fn manual_context() -> (Context, ManualTimeSource) {
    let clock = ManualTimeSource::new();
    let ctx = Context::with_time_source(Box::new(clock.clone()));
    (ctx, clock)
}

/// Advance the clock by `ms` and tick unpaced, so `ctx.dt()` reflects it.
fn step(ctx: &Context, clock: &ManualTimeSource, ms: u64) {
    clock.advance(Duration::from_millis(ms));
    ctx.clock_mut().tick(0);
    ctx.clock_mut().refresh();
}

fn frames(n: u32) -> Vec<Image> {
    (0..n)
        .map(|i| Image {
            id: ImageId(i),
            width: 16.0,
            height: 16.0,
        })
        .collect()
}

#[test]
fn cooldown_is_ready_only_after_its_duration() {
    let (ctx, clock) = manual_context();
    let mut cd = Cooldown::new(&ctx, 0.5);
    assert!(cd.check(), "a fresh cooldown starts ready");

    cd.start();
    clock.advance(Duration::from_millis(499));
    assert!(!cd.check());
    assert!(!cd.check(), "check never changes state");

    clock.advance(Duration::from_millis(1));
    assert!(cd.check());
    assert!(cd.check());
    assert_eq!(cd.duration_ms(), 500);
}

#[test]
fn freezing_stops_in_game_time_and_cooldowns() {
    let (ctx, clock) = manual_context();
    clock.advance(Duration::from_secs(1));
    let mut cd = Cooldown::new(&ctx, 1.0);
    cd.start();

    let before = ctx.now();
    ctx.freeze();
    clock.advance(Duration::from_secs(5));
    ctx.unfreeze();
    let after = ctx.now();

    assert_eq!(before, after);
    assert!(!cd.check());
    clock.advance(Duration::from_secs(1));
    assert!(cd.check());
}

#[test]
fn continuous_overlap_collides_once_per_immunity_window() {
    let (ctx, clock) = manual_context();
    let mut a = Sprite::new(&ctx, Vec2::splat(10.0), false);
    let b = Sprite::new(&ctx, Vec2::splat(10.0), false);
    a.set_collide_immunity(0.25);

    // 0ms..=500ms in 50ms steps while the rectangles never move.
    let mut hits = Vec::new();
    for frame in 0..=10u64 {
        if a.collide(&b) {
            hits.push(frame * 50);
        }
        clock.advance(Duration::from_millis(50));
    }
    assert_eq!(hits, vec![0, 250, 500]);
}

#[test]
fn one_immunity_window_covers_every_partner() {
    let (ctx, _clock) = manual_context();
    let mut a = Sprite::new(&ctx, Vec2::splat(10.0), false);
    let b = Sprite::new(&ctx, Vec2::splat(10.0), false);
    let c = Sprite::new(&ctx, Vec2::splat(10.0), false);

    assert!(a.collide(&b));
    assert!(!a.collide(&c));
}

#[test]
fn looped_animation_wraps_after_three_frame_durations() {
    let (ctx, clock) = manual_context();
    let mut sprite = Sprite::new(&ctx, Vec2::splat(16.0), false);
    sprite.set_animation("walk", frames(3), 0.1, true).unwrap();

    let mut seen = Vec::new();
    for _ in 0..3 {
        step(&ctx, &clock, 100);
        sprite.play_animation(None);
        seen.push(sprite.animations().current_clip().unwrap().index());
    }
    assert_eq!(seen, vec![1, 2, 0]);
    assert_eq!(sprite.image().map(|img| img.id), Some(ImageId(0)));
}

#[test]
fn one_shot_animation_clamps_on_its_last_frame() {
    let (ctx, clock) = manual_context();
    let mut sprite = Sprite::new(&ctx, Vec2::splat(16.0), false);
    sprite.set_animation("die", frames(3), 0.1, false).unwrap();

    for _ in 0..10 {
        step(&ctx, &clock, 100);
        sprite.play_animation(None);
    }
    let clip = sprite.animations().current_clip().unwrap();
    assert_eq!(clip.index(), 2);
    assert!(clip.is_finished());
    assert_eq!(sprite.image().map(|img| img.id), Some(ImageId(2)));
}

#[test]
fn switching_animation_restarts_the_clip() {
    let (ctx, clock) = manual_context();
    let mut sprite = Sprite::new(&ctx, Vec2::splat(16.0), false);
    sprite.set_animation("idle", frames(2), 0.1, true).unwrap();
    sprite.set_animation("run", frames(3), 0.1, true).unwrap();

    step(&ctx, &clock, 100);
    sprite.play_animation(Some("run"));
    assert_eq!(sprite.animations().current_name(), Some("run"));
    assert_eq!(sprite.animations().current_clip().unwrap().index(), 0);

    sprite.play_animation(Some("missing"));
    assert_eq!(sprite.animations().current_name(), Some("run"));
}

#[test]
fn empty_animation_is_rejected() {
    let (ctx, _clock) = manual_context();
    let mut sprite = Sprite::new(&ctx, Vec2::splat(16.0), false);
    assert!(sprite.set_animation("none", Vec::new(), 0.1, true).is_err());
}

#[test]
fn timer_fires_once_on_a_background_thread() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let handle = Timer::new(0.01)
        .start(move || {
            tx.send(std::thread::current().name().map(str::to_owned))?;
            Ok(())
        })
        .unwrap();
    handle.join().unwrap();
    let name = rx.try_recv().unwrap();
    assert_eq!(name.as_deref(), Some("novaengine-timer"));
    assert!(rx.try_recv().is_err());
}

#[test]
fn interval_runs_the_requested_number_of_times() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let handle = Interval::new(Repeat::Times(3), 0.001)
        .start(move || {
            tx.send(())?;
            Ok(ControlFlow::Continue(()))
        })
        .unwrap();
    handle.join().unwrap();
    assert_eq!(rx.try_iter().count(), 3);
}

#[test]
fn forever_interval_stops_on_break_or_error() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut count = 0;
    let handle = Interval::new(Repeat::Forever, 0.001)
        .start(move || {
            count += 1;
            tx.send(count)?;
            if count == 4 {
                return Ok(ControlFlow::Break(()));
            }
            Ok(ControlFlow::Continue(()))
        })
        .unwrap();
    handle.join().unwrap();
    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);

    let failing = Interval::new(Repeat::Forever, 0.001)
        .start(|| anyhow::bail!("boom"))
        .unwrap();
    failing.join().unwrap();
}
