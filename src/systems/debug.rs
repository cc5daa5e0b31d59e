//! Debug overlay drawn on top of the frame while debug mode is on.
//!
//! Shows the frame rate, the in-game clock, the active scene's object count
//! and the cursor position. Sprites draw their own outlines; see
//! [`Sprite::draw`](crate::components::sprite::Sprite::draw).

use glam::Vec2;

use crate::platform::{Color, Surface};
use crate::resources::context::Context;

const TEXT_SIZE: f32 = 10.0;
const LINE_HEIGHT: f32 = 20.0;
const MARGIN: f32 = 10.0;

/// Draw the overlay when the context's debug flag is set.
pub fn render_debug_ui(ctx: &Context, surface: &mut dyn Surface) {
    if !ctx.debug() {
        return;
    }

    let (fps, in_game, frozen) = {
        let clock = ctx.clock();
        (clock.fps(), clock.now(), clock.is_frozen())
    };
    let scene = ctx.active_scene();
    let cursor = ctx.cursor();

    let mut lines = vec![format!("DEBUG MODE | FPS: {fps:.0}")];
    lines.push(format!(
        "Time: {:.2}s{}",
        in_game.as_secs_f32(),
        if frozen { " (frozen)" } else { "" }
    ));
    if let Some(scene) = scene {
        lines.push(format!("Scene: {} | Objects: {}", scene.name(), scene.len()));
    }
    lines.push(format!("Mouse: ({:.1}, {:.1})", cursor.x, cursor.y));

    for (row, text) in lines.iter().enumerate() {
        let pos = Vec2::new(MARGIN, MARGIN + row as f32 * LINE_HEIGHT);
        surface.draw_text(text, pos, TEXT_SIZE, Color::BLACK, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::DrawCmd;
    use crate::platform::headless::HeadlessPlatform;
    use crate::resources::frameclock::ManualTimeSource;
    use crate::scene::Scene;

    #[test]
    fn overlay_only_in_debug_mode() {
        let ctx = Context::with_time_source(Box::new(ManualTimeSource::new()));
        let _scene = Scene::new(&ctx, "level");
        let mut platform = HeadlessPlatform::new(Vec2::splat(100.0));

        render_debug_ui(&ctx, &mut platform);
        assert!(platform.pending().is_empty());

        ctx.set_debug(true);
        render_debug_ui(&ctx, &mut platform);
        let texts: Vec<&str> = platform
            .pending()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts[0].starts_with("DEBUG MODE"));
        assert!(texts.iter().any(|t| t.starts_with("Mouse:")));
    }
}
