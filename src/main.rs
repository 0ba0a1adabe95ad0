use std::path::Path;
use std::process::ExitCode;

use voxui::error::Result;
use voxui::loading::load_theme;
use voxui::ui::{
    Axis, DemoScreen, DrawKind, DrawList, EventKind, Key, Modifiers, MouseButton, build_demo,
};

/// Scripted headless session over the demo screen: hover, wheel, keyboard,
/// drag and clicks, with one render pass logged at the end.
fn run(mut demo: DemoScreen) -> Result<()> {
    let list = demo.list;
    demo.screen
        .subscribe(list, EventKind::ScrollChange, |e| log::info!("scroll: {:?}", e.event))?;
    demo.screen.subscribe(demo.ok_button, EventKind::Activated, |_| {
        log::info!("OK activated")
    })?;

    let screen = &mut demo.screen;
    let list_at = screen.screen_position(list);

    screen.mouse_moved(list_at.x + 20, list_at.y + 20);
    log::info!(
        "hovering {:?}, tooltip {:?}",
        screen.hovered(),
        screen.tooltip_at_cursor()
    );
    screen.advance_frame();

    screen.mouse_scrolled(2);
    screen.set_modifiers(Modifiers {
        shift: true,
        ..Modifiers::default()
    });
    screen.mouse_scrolled(1);
    screen.set_modifiers(Modifiers::default());
    log::info!(
        "list scrolled to {:.2}",
        screen.scroll_offset(list, Axis::Vertical)?
    );
    screen.advance_frame();

    screen.key_typed(Key::Tab, None);
    log::info!("focus after tab: {:?}", screen.focused());
    screen.key_typed(Key::End, None);
    screen.advance_frame();

    // Drag the window by its move handle.
    let grip = screen.screen_position(demo.mover);
    screen.mouse_pressed(MouseButton::Left, grip.x + 10, grip.y + 2);
    screen.mouse_moved(grip.x + 30, grip.y + 12);
    screen.mouse_released(MouseButton::Left, grip.x + 30, grip.y + 12);
    log::info!("window moved to {:?}", screen.screen_position(demo.window));
    screen.advance_frame();

    let ok = screen.screen_position(demo.ok_button);
    screen.mouse_pressed(MouseButton::Left, ok.x + 2, ok.y + 2);
    screen.mouse_released(MouseButton::Left, ok.x + 2, ok.y + 2);
    screen.advance_frame();

    let mut draw_list = DrawList::new();
    screen.render(&mut draw_list, 0.0);
    for command in &draw_list.commands {
        match &command.kind {
            DrawKind::Text { text, .. } => log::debug!(
                "text {:?} at ({}, {}) clip {:?}",
                text,
                command.x,
                command.y,
                command.clip
            ),
            kind => log::debug!(
                "{:?} {}x{} at ({}, {})",
                kind,
                command.width,
                command.height,
                command.x,
                command.y
            ),
        }
    }
    log::info!("{} draw commands", draw_list.commands.len());

    let close = screen.screen_position(demo.close);
    screen.mouse_pressed(MouseButton::Left, close.x + 1, close.y + 1);
    screen.mouse_released(MouseButton::Left, close.x + 1, close.y + 1);
    log::info!("window visible after close: {}", screen.is_visible(demo.window));

    screen.close();
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let theme = load_theme(Path::new("data/theme.ron"));
    let result = build_demo(theme).and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("demo failed: {e}");
            ExitCode::FAILURE
        }
    }
}
