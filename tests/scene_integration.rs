//! Scene and group integration tests: registration order, fault isolation
//! and dead-sprite behavior.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use novaengine::components::group::Group;
use novaengine::components::sprite::Sprite;
use novaengine::platform::headless::HeadlessPlatform;
use novaengine::platform::{DrawCmd, Surface};
use novaengine::resources::context::Context;
use novaengine::resources::frameclock::ManualTimeSource;
use novaengine::scene::{Scene, SceneObject};

type Log = Rc<RefCell<Vec<&'static str>>>;

enum Outcome {
    Ok,
    Fail,
    Panic,
}

struct Probe {
    name: &'static str,
    layer: i32,
    outcome: Outcome,
    log: Log,
}

impl Probe {
    fn shared(name: &'static str, layer: i32, outcome: Outcome, log: &Log) -> Rc<RefCell<Probe>> {
        Rc::new(RefCell::new(Probe {
            name,
            layer,
            outcome,
            log: Rc::clone(log),
        }))
    }
}

impl SceneObject for Probe {
    fn update(&mut self, _surface: &mut dyn Surface) -> anyhow::Result<()> {
        self.log.borrow_mut().push(self.name);
        match self.outcome {
            Outcome::Ok => Ok(()),
            Outcome::Fail => anyhow::bail!("{} failed on purpose", self.name),
            Outcome::Panic => panic!("{} panicked on purpose", self.name),
        }
    }

    fn layer(&self) -> i32 {
        self.layer
    }
}

fn setup() -> (Context, HeadlessPlatform) {
    let ctx = Context::with_time_source(Box::new(ManualTimeSource::new()));
    (ctx, HeadlessPlatform::new(Vec2::new(200.0, 200.0)))
}

#[test]
fn lower_layer_updates_first_regardless_of_registration_order() {
    let (ctx, mut platform) = setup();
    let log = Log::default();
    let x = Probe::shared("x", 5, Outcome::Ok, &log);
    let y = Probe::shared("y", 2, Outcome::Ok, &log);

    let scene = Scene::new(&ctx, "order");
    scene.register(|r| {
        r.add(&x).add(&y);
    });
    scene.update(&mut platform);

    assert_eq!(*log.borrow(), vec!["y", "x"]);
}

#[test]
fn equal_layers_keep_insertion_order() {
    let (ctx, mut platform) = setup();
    let log = Log::default();
    let a = Probe::shared("a", 1, Outcome::Ok, &log);
    let b = Probe::shared("b", 0, Outcome::Ok, &log);
    let c = Probe::shared("c", 1, Outcome::Ok, &log);
    let d = Probe::shared("d", 1, Outcome::Ok, &log);

    let scene = Scene::new(&ctx, "stable");
    scene.register(|r| {
        r.add(&a).add(&b).add(&c);
    });
    assert!(scene.add_object(&d));
    scene.update(&mut platform);

    assert_eq!(*log.borrow(), vec!["b", "a", "c", "d"]);
}

#[test]
fn failing_member_does_not_stop_the_pass() {
    let (ctx, mut platform) = setup();
    let log = Log::default();
    let p = Probe::shared("p", 0, Outcome::Ok, &log);
    let q = Probe::shared("q", 1, Outcome::Fail, &log);
    let r = Probe::shared("r", 2, Outcome::Ok, &log);

    let scene = Scene::new(&ctx, "faults");
    scene.register(|reg| {
        reg.add(&p).add(&q).add(&r);
    });

    assert_eq!(scene.update(&mut platform), 1);
    assert_eq!(*log.borrow(), vec!["p", "q", "r"]);
}

#[test]
fn panicking_member_is_isolated_too() {
    let (ctx, mut platform) = setup();
    let log = Log::default();
    let p = Probe::shared("p", 0, Outcome::Ok, &log);
    let q = Probe::shared("q", 1, Outcome::Panic, &log);
    let r = Probe::shared("r", 2, Outcome::Ok, &log);

    let scene = Scene::new(&ctx, "panics");
    scene.register(|reg| {
        reg.add(&p).add(&q).add(&r);
    });

    assert_eq!(scene.update(&mut platform), 1);
    assert_eq!(scene.update(&mut platform), 1);
    assert_eq!(*log.borrow(), vec!["p", "q", "r", "p", "q", "r"]);
}

#[test]
fn duplicate_registration_is_ignored_and_removal_works() {
    let (ctx, mut platform) = setup();
    let log = Log::default();
    let p = Probe::shared("p", 0, Outcome::Ok, &log);

    let scene = Scene::new(&ctx, "dedup");
    scene.register(|r| {
        r.add(&p).add(&p);
    });
    assert!(!scene.add_object(&p));
    assert_eq!(scene.len(), 1);

    assert!(scene.remove_object(&p));
    assert!(!scene.remove_object(&p));
    scene.update(&mut platform);
    assert!(log.borrow().is_empty());
}

#[test]
fn killed_sprite_neither_draws_nor_calls_back() {
    let (ctx, mut platform) = setup();
    let calls = Rc::new(RefCell::new(0));
    let sprite = Sprite::new(&ctx, Vec2::splat(10.0), false).into_ref();
    {
        let calls = Rc::clone(&calls);
        sprite.borrow_mut().on_update(move |_, _| {
            *calls.borrow_mut() += 1;
            Ok(())
        });
    }
    let scene = Scene::new(&ctx, "kill");
    scene.add_object(&sprite);

    scene.update(&mut platform);
    assert_eq!(*calls.borrow(), 1);
    assert!(!platform.pending().is_empty());
    platform.present();

    sprite.borrow_mut().kill();
    for _ in 0..3 {
        scene.update(&mut platform);
        sprite.borrow_mut().draw(&mut platform);
    }
    assert_eq!(*calls.borrow(), 1);
    assert!(platform.pending().is_empty());
    // Dead objects stay registered until removed.
    assert!(scene.contains(&sprite));
}

#[test]
fn solids_track_the_solid_flag() {
    let (ctx, _platform) = setup();
    let wall = Sprite::new(&ctx, Vec2::splat(10.0), true).into_ref();
    let ghost = Sprite::new(&ctx, Vec2::splat(10.0), false).into_ref();
    let scene = Scene::new(&ctx, "solids");
    scene.register(|r| {
        r.add(&wall).add(&ghost);
    });
    assert_eq!(scene.objects().len(), 2);
    assert_eq!(scene.solids().len(), 1);
}

#[test]
fn group_updates_members_by_layer_and_draws_each() {
    let (ctx, mut platform) = setup();
    let order = Rc::new(RefCell::new(Vec::new()));
    let mut group = Group::new(&ctx);
    for (name, layer) in [("high", 9), ("low", 1), ("mid", 4)] {
        let sprite = Sprite::new(&ctx, Vec2::splat(4.0), false).into_ref();
        let order = Rc::clone(&order);
        sprite.borrow_mut().set_layer(layer).on_update(move |_, _| {
            order.borrow_mut().push(name);
            Ok(())
        });
        group.add(&sprite);
    }

    group.update(&mut platform).unwrap();
    assert_eq!(*order.borrow(), vec!["low", "mid", "high"]);
    let rects = platform
        .pending()
        .iter()
        .filter(|cmd| matches!(cmd, DrawCmd::Rect { filled: true, .. }))
        .count();
    assert_eq!(rects, 3);
}

#[test]
fn group_collide_returns_overlapping_members() {
    let (ctx, _platform) = setup();
    let probe = Sprite::new(&ctx, Vec2::splat(10.0), false).into_ref();
    let near = Sprite::new(&ctx, Vec2::splat(10.0), false).into_ref();
    let far = Sprite::new(&ctx, Vec2::splat(10.0), false).into_ref();
    near.borrow_mut().set_position(Some(5.0), Some(5.0));
    far.borrow_mut().set_position(Some(100.0), Some(100.0));

    let group = Group::with_sprites(&ctx, [&probe, &near, &far]);
    let hits = group.collide(&probe);
    assert_eq!(hits.len(), 1);
    assert!(Rc::ptr_eq(&hits[0], &near));
}

#[test]
fn any_group_member_can_hit_through_one_immunity_window() {
    let clock = ManualTimeSource::new();
    let ctx = Context::with_time_source(Box::new(clock.clone()));
    let player = Sprite::new(&ctx, Vec2::splat(10.0), false).into_ref();
    player.borrow_mut().set_collide_immunity(0.5);
    let far = Sprite::new(&ctx, Vec2::splat(10.0), true).into_ref();
    let near = Sprite::new(&ctx, Vec2::splat(10.0), true).into_ref();
    far.borrow_mut().set_position(Some(100.0), Some(100.0));
    near.borrow_mut().set_position(Some(5.0), Some(5.0));
    let chasers = Group::with_sprites(&ctx, [&far, &near]);

    let hit_by = |chasers: &Group| {
        let mut player = player.borrow_mut();
        chasers
            .touching(player.rect())
            .filter(|chaser| player.collide(&chaser.borrow()))
    };

    let first = hit_by(&chasers).expect("the second member overlaps");
    assert!(Rc::ptr_eq(&first, &near));
    assert!(hit_by(&chasers).is_none(), "inside the immunity window");

    clock.advance(std::time::Duration::from_millis(500));
    near.borrow_mut().kill();
    assert!(hit_by(&chasers).is_none());
    assert!(player.borrow().collide_immunity().check(), "no overlap leaves the gate unspent");
}

#[test]
fn custom_loop_replaces_default_update() {
    let (ctx, mut platform) = setup();
    let log = Log::default();
    let p = Probe::shared("p", 0, Outcome::Ok, &log);
    let scene = Scene::new(&ctx, "custom");
    scene.add_object(&p);

    let custom_log = Rc::clone(&log);
    scene.set_loop(move |scene, surface| {
        custom_log.borrow_mut().push("custom");
        scene.update(surface);
    });
    scene.run_loop(&mut platform);
    scene.reset_loop();
    scene.run_loop(&mut platform);

    assert_eq!(*log.borrow(), vec!["custom", "p", "p"]);
}
