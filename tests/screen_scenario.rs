//! End-to-end screen scenarios: layout, clipping, hit-testing, per-frame
//! caching and input bubbling working together through the public API.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use voxui::ui::{
    Axis, ClipArea, DrawList, EventKind, Extent, InputEvent, InputKind, Modifiers, MouseButton,
    NodeBuilder, Padding, Point, Screen, Size, Theme, Widget, WidgetId,
};

fn label(text: &str) -> Widget {
    Widget::Label {
        text: text.into(),
        color: [0.0, 0.0, 0.0, 1.0],
    }
}

/// 200x150 screen with a clipping 100x80 panel at (10,10), padding 3, and
/// a 200x20 label overflowing it.
fn overflowing_panel() -> (Screen, WidgetId, WidgetId) {
    let mut screen = Screen::new(200, 150, Theme::default());
    let root = screen.root();
    let panel = NodeBuilder::new(Widget::Panel { background: None })
        .parent(root)
        .at(10, 10)
        .sized(100, 80)
        .padding(Padding::all(3))
        .clip_content(true)
        .build(&mut screen)
        .expect("panel");
    let leaf = NodeBuilder::new(label("overflowing"))
        .parent(panel)
        .at(0, 0)
        .sized(200, 20)
        .build(&mut screen)
        .expect("leaf");
    (screen, panel, leaf)
}

#[test]
fn overflowing_leaf_is_clipped_by_its_panel() {
    let (screen, panel, leaf) = overflowing_panel();

    assert_eq!(
        screen.intersected_clip_area(panel),
        ClipArea::new(13, 13, 107, 87)
    );
    assert_eq!(screen.screen_position(leaf), Point::new(10, 10));

    // Inside the leaf's raw bounds but outside the panel's clip.
    assert!(screen.is_inside_bounds(leaf, 150, 20));
    assert_eq!(screen.component_at(150, 20), None);
    assert_eq!(screen.component_at(150, 50), None);
    // Inside both.
    assert_eq!(screen.component_at(50, 20), Some(leaf));
    // Inside the panel's padding band: the panel itself.
    assert_eq!(screen.component_at(11, 50), Some(panel));

    let mut list = DrawList::new();
    screen.render(&mut list, 0.5);
    assert_eq!(list.partial_tick, 0.5);
    let text = list.for_widget(leaf).next().expect("leaf drawn");
    assert_eq!(text.clip, ClipArea::new(13, 13, 107, 87));
    assert_eq!(text.width, 200);
}

#[test]
fn geometry_is_cached_for_one_frame() {
    let mut screen = Screen::new(200, 150, Theme::default());
    let root = screen.root();
    let calls = Rc::new(Cell::new(0));
    let width = Rc::new(Cell::new(40));

    let id = screen.insert(root, label("dynamic")).expect("insert");
    let (c, w) = (Rc::clone(&calls), Rc::clone(&width));
    screen
        .set_size(
            id,
            Size::new(
                Extent::dynamic(move || {
                    c.set(c.get() + 1);
                    w.get()
                }),
                Extent::Fixed(10),
            ),
        )
        .expect("size");

    screen.advance_frame();
    calls.set(0);
    assert_eq!(screen.size(id).width, 40);
    assert_eq!(screen.size(id).width, 40);
    assert_eq!(calls.get(), 1, "supplier runs once per frame");

    // A changed supplier value is not seen until the next frame.
    width.set(60);
    assert_eq!(screen.size(id).width, 40);
    screen.advance_frame();
    assert_eq!(screen.size(id).width, 60);
    assert_eq!(calls.get(), 2);

    // Layout mutations invalidate within the same frame.
    width.set(70);
    screen.set_padding(id, Padding::all(1)).expect("padding");
    assert_eq!(screen.size(id).width, 70);
}

#[test]
fn press_bubbles_to_the_first_handler() {
    let (mut screen, panel, _leaf) = overflowing_panel();
    let root = screen.root();
    let seen: Rc<RefCell<Vec<&'static str>>> = Rc::default();

    let log = Rc::clone(&seen);
    screen
        .set_input_handler(panel, move |_, _, event| {
            log.borrow_mut().push("panel");
            matches!(event.kind, InputKind::Press { .. })
        })
        .expect("panel handler");
    let log = Rc::clone(&seen);
    screen
        .set_input_handler(root, move |_, _, _| {
            log.borrow_mut().push("root");
            true
        })
        .expect("root handler");

    assert!(screen.mouse_pressed(MouseButton::Left, 50, 20));
    assert_eq!(*seen.borrow(), ["panel"]);

    // Release and the click it produces are declined by the panel and
    // reach the root.
    screen.mouse_released(MouseButton::Left, 50, 20);
    assert_eq!(*seen.borrow(), ["panel", "panel", "root", "panel", "root"]);
}

#[test]
fn disabled_ancestors_are_skipped_and_cancel_stops_bubbling() {
    let (mut screen, panel, leaf) = overflowing_panel();
    let root = screen.root();
    let panel_calls = Rc::new(Cell::new(0));
    let root_calls = Rc::new(Cell::new(0));

    let c = Rc::clone(&panel_calls);
    screen
        .set_input_handler(panel, move |_, _, _| {
            c.set(c.get() + 1);
            true
        })
        .expect("panel handler");
    let c = Rc::clone(&root_calls);
    screen
        .set_input_handler(root, move |_, _, event| {
            c.set(c.get() + 1);
            event.cancel();
            false
        })
        .expect("root handler");

    screen.set_enabled(panel, false).expect("disable");
    let press = InputKind::Press {
        button: MouseButton::Left,
        x: 50,
        y: 20,
    };
    let mut event = InputEvent::new(press, Modifiers::default());
    // The leaf inherits the disabled state, the panel is skipped, the root
    // cancels.
    assert!(screen.dispatch(leaf, &mut event));
    assert!(event.is_cancelled());
    assert_eq!(panel_calls.get(), 0);
    assert_eq!(root_calls.get(), 1);

    screen.clear_input_handler(root);
    let mut event = InputEvent::new(press, Modifiers::default());
    assert!(!screen.dispatch(leaf, &mut event), "unhandled past the root");
}

#[test]
fn wheel_over_a_child_scrolls_its_container() {
    let mut screen = Screen::new(200, 150, Theme::default());
    let root = screen.root();
    let list = NodeBuilder::new(Widget::Panel { background: None })
        .parent(root)
        .sized(100, 60)
        .build(&mut screen)
        .expect("list");
    let bar = screen
        .attach_scrollbar(list, Axis::Vertical)
        .expect("scrollbar");
    assert!(!screen.is_visible(bar), "hidden while the list is empty");

    let tall = NodeBuilder::new(label("tall"))
        .parent(list)
        .sized(80, 200)
        .build(&mut screen)
        .expect("tall child");
    assert!(screen.is_visible(bar));
    assert_eq!(screen.scroll_range(list, Axis::Vertical), 140);

    let changes = Rc::new(Cell::new(0));
    let c = Rc::clone(&changes);
    screen
        .subscribe(list, EventKind::ScrollChange, move |_| c.set(c.get() + 1))
        .expect("subscribe");

    screen.mouse_moved(20, 20);
    assert_eq!(screen.hovered(), Some(tall));
    assert!(screen.mouse_scrolled(1));
    assert_eq!(changes.get(), 1);
    assert_eq!(screen.screen_position(tall), Point::new(0, -10));

    // Scrolling back past the start clamps to zero.
    screen.mouse_scrolled(-5);
    assert_eq!(screen.scroll_offset(list, Axis::Vertical).expect("offset"), 0.0);
    assert_eq!(screen.screen_position(tall), Point::new(0, 0));
    assert_eq!(changes.get(), 2);

    // Removing the content hides the bar again.
    screen.remove(tall).expect("remove");
    assert!(!screen.is_visible(bar));
}
