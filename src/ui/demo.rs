//! Sample screen exercising every core feature: a padded clipping window
//! with close/move handles, an overflowing label, a scrollable slot list
//! with both scrollbars, and a button.

use super::builder::NodeBuilder;
use super::geometry::{Axis, Padding};
use super::layout::{Extent, Position, Size};
use super::theme::Theme;
use super::widget::{HandleKind, ItemHandle, Widget};
use super::{Screen, WidgetId};
use crate::error::Result;

/// Screen dimensions of the demo.
pub const DEMO_WIDTH: i32 = 320;
pub const DEMO_HEIGHT: i32 = 240;

const ROW_COUNT: u64 = 12;
const ROW_HEIGHT: i32 = 16;
const ROW_GAP: i32 = 2;

/// The demo screen plus handles to its interesting widgets.
pub struct DemoScreen {
    pub screen: Screen,
    pub window: WidgetId,
    pub title: WidgetId,
    pub overflow: WidgetId,
    pub list: WidgetId,
    pub rows: Vec<WidgetId>,
    pub ok_button: WidgetId,
    pub close: WidgetId,
    pub mover: WidgetId,
}

/// Build the demo screen.
pub fn build_demo(theme: Theme) -> Result<DemoScreen> {
    let mut screen = Screen::new(DEMO_WIDTH, DEMO_HEIGHT, theme.clone());
    let root = screen.root();

    // Window: padded, clipping, with handles.
    let window = NodeBuilder::new(Widget::Panel {
        background: Some(theme.panel_bg),
    })
    .parent(root)
    .at(20, 20)
    .sized(220, 180)
    .padding(Padding::all(theme.panel_padding))
    .clip_content(true)
    .build(&mut screen)?;

    let close = NodeBuilder::new(Widget::Handle {
        kind: HandleKind::Close,
        color: theme.handle_color,
    })
    .control_of(window)
    .position(Position::builder().right_aligned(0).top_aligned(0).build()?)
    .sized(theme.handle_size, theme.handle_size)
    .tooltip("Close")
    .build(&mut screen)?;

    let mover = NodeBuilder::new(Widget::Handle {
        kind: HandleKind::Move,
        color: theme.handle_color,
    })
    .control_of(window)
    .at(0, 0)
    .size(Size::new(
        Extent::Parent {
            fraction: 1.0,
            offset: -theme.handle_size,
        },
        Extent::Fixed(theme.handle_size),
    ))
    .build(&mut screen)?;

    // -----------------------------------------------------------------------
    // Labels
    // -----------------------------------------------------------------------
    let title = NodeBuilder::new(Widget::Label {
        text: "Inventory".into(),
        color: theme.text_dark,
    })
    .parent(window)
    .position(Position::builder().left_aligned(0).top_aligned(0).build()?)
    .sized(120, 10)
    .build(&mut screen)?;

    // Wider than the window on purpose: clipped at the window's inner edge.
    let overflow = NodeBuilder::new(Widget::Label {
        text: "This caption is far too long to fit inside the window".into(),
        color: theme.text_dark,
    })
    .parent(window)
    .position(Position::builder().left_aligned(0).below(title, 2).build()?)
    .sized(300, 10)
    .build(&mut screen)?;

    // -----------------------------------------------------------------------
    // Scrollable slot list
    // -----------------------------------------------------------------------
    let list = NodeBuilder::new(Widget::Panel { background: None })
        .parent(window)
        .position(Position::builder().left_aligned(0).below(overflow, 4).build()?)
        .size(Size::new(Extent::fill(), Extent::Fixed(100)))
        .padding(Padding::all(2))
        .tooltip("Scroll with the wheel, shift for larger steps")
        .build(&mut screen)?;
    screen.attach_scrollbar(list, Axis::Vertical)?;
    screen.attach_scrollbar(list, Axis::Horizontal)?;

    let mut rows = Vec::new();
    for i in 0..ROW_COUNT {
        let row = NodeBuilder::new(Widget::Slot {
            item: Some(ItemHandle(i)),
            bg_color: theme.slot_bg,
        })
        .parent(list)
        .at(2, 2 + i as i32 * (ROW_HEIGHT + ROW_GAP))
        .sized(260, ROW_HEIGHT)
        .build(&mut screen)?;
        rows.push(row);
    }

    let ok_button = NodeBuilder::new(Widget::Button {
        text: "OK".into(),
        color: theme.text_light,
        bg_color: theme.button_bg,
    })
    .parent(window)
    .position(Position::builder().right_aligned(0).bottom_aligned(0).build()?)
    .sized(40, 14)
    .tooltip("Confirm")
    .build(&mut screen)?;

    log::debug!("demo screen built ({} widgets)", screen.len());
    Ok(DemoScreen {
        screen,
        window,
        title,
        overflow,
        list,
        rows,
        ok_button,
        close,
        mover,
    })
}
