use std::cell::RefCell;
use std::rc::Rc;

use super::events::ComponentEvent;
use super::geometry::{Axis, Point};
use super::layout::{Position, Size};
use super::widget::{HandleKind, Widget};
use super::{Screen, WidgetId};
use crate::error::{GuiError, Result};

/// Mouse button identifier (decoupled from the host).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Shift or ctrl switches wheel scrolling to coarse steps.
    pub fn coarse(&self) -> bool {
        self.shift || self.ctrl
    }
}

/// Key codes the core interprets. Everything else arrives as `Other` with
/// the host's raw code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    Escape,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    Other(u32),
}

/// Mouse/keyboard interaction delivered to widgets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputKind {
    Press { button: MouseButton, x: i32, y: i32 },
    Release { button: MouseButton, x: i32, y: i32 },
    /// Press and release over the same widget, without a drag in between.
    Click { button: MouseButton, x: i32, y: i32 },
    /// Second click on the same widget within the theme's frame window.
    DoubleClick { button: MouseButton, x: i32, y: i32 },
    /// Cursor motion while a button is held. Deltas are since the last drag.
    Drag {
        button: MouseButton,
        x: i32,
        y: i32,
        dx: i32,
        dy: i32,
    },
    /// Wheel notches (positive = toward the end: down/right).
    Scroll { delta: i32 },
    KeyTyped { key: Key, ch: Option<char> },
}

/// An input event in flight. Cancelling stops it from bubbling further up
/// but keeps whatever the current handler already did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    pub kind: InputKind,
    pub modifiers: Modifiers,
    cancelled: bool,
}

impl InputEvent {
    pub fn new(kind: InputKind, modifiers: Modifiers) -> Self {
        Self {
            kind,
            modifiers,
            cancelled: false,
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Custom per-widget input hook. Returns true if it handled the event.
pub type InputHandler = Rc<RefCell<dyn FnMut(&mut Screen, WidgetId, &mut InputEvent) -> bool>>;

/// Squared pixel distance a press must travel before it becomes a drag.
const DRAG_THRESHOLD_SQ: i32 = 3 * 3;

/// Hover/focus/press state of one screen. Owned by the `Screen`; dropped
/// (and thereby reset) with it or on `Screen::close`.
#[derive(Debug, Default)]
pub(crate) struct InputState {
    /// Widget currently under the cursor.
    pub hovered: Option<WidgetId>,
    /// Widget receiving keyboard events.
    pub focused: Option<WidgetId>,
    /// Widget being pressed, and with which button. Drag events route here
    /// even once the cursor leaves it.
    pressed: Option<(WidgetId, MouseButton)>,
    press_origin: Point,
    dragging: bool,
    drag_last: Point,
    /// Last click target and the frame it happened on.
    last_click: Option<(WidgetId, u64)>,
    cursor: Point,
    modifiers: Modifiers,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every reference to widgets that are leaving the tree.
    pub fn forget(&mut self, removed: &[WidgetId]) {
        let gone = |slot: Option<WidgetId>| slot.is_some_and(|id| removed.contains(&id));
        if gone(self.hovered) {
            self.hovered = None;
        }
        if gone(self.focused) {
            self.focused = None;
        }
        if gone(self.pressed.map(|(id, _)| id)) {
            self.pressed = None;
            self.dragging = false;
        }
        if gone(self.last_click.map(|(id, _)| id)) {
            self.last_click = None;
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Holder {
    Hover,
    Focus,
}

/// Built-in behavior of the interactive widget kinds.
#[derive(Debug, Clone, Copy)]
enum Behavior {
    Button,
    Handle(HandleKind),
    Scrollbar(Axis),
}

impl Screen {
    // ------------------------------------------------------------------
    // Host input entry points
    // ------------------------------------------------------------------

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.input.modifiers = modifiers;
    }

    pub fn cursor(&self) -> Point {
        self.input.cursor
    }

    /// Handle cursor motion. Returns true if the cursor is over the UI or a
    /// press is being held (the host should not act on it).
    pub fn mouse_moved(&mut self, x: i32, y: i32) -> bool {
        self.input.cursor = Point::new(x, y);

        if let Some((target, button)) = self.input.pressed {
            if !self.input.dragging {
                let origin = self.input.press_origin;
                let (dx, dy) = (x - origin.x, y - origin.y);
                if dx * dx + dy * dy >= DRAG_THRESHOLD_SQ {
                    self.input.dragging = true;
                    self.input.drag_last = origin;
                }
            }
            if self.input.dragging {
                let last = self.input.drag_last;
                self.input.drag_last = Point::new(x, y);
                let (dx, dy) = (x - last.x, y - last.y);
                if dx != 0 || dy != 0 {
                    let mut event = self.input_event(InputKind::Drag {
                        button,
                        x,
                        y,
                        dx,
                        dy,
                    });
                    self.dispatch(target, &mut event);
                }
            }
            let hit = self.component_at(x, y);
            self.set_hovered(hit);
            return true;
        }

        let hit = self.component_at(x, y);
        self.set_hovered(hit);
        hit.is_some()
    }

    /// Handle a mouse button press. Focuses the pressed widget (left button)
    /// and captures it for dragging. Pressing outside the UI clears focus.
    pub fn mouse_pressed(&mut self, button: MouseButton, x: i32, y: i32) -> bool {
        self.input.cursor = Point::new(x, y);
        let Some(target) = self.component_at(x, y) else {
            self.set_focused(None);
            return false;
        };
        self.input.pressed = Some((target, button));
        self.input.press_origin = Point::new(x, y);
        self.input.dragging = false;
        if button == MouseButton::Left {
            self.set_focused(Some(target));
        }
        let mut event = self.input_event(InputKind::Press { button, x, y });
        self.dispatch(target, &mut event);
        true
    }

    /// Handle a mouse button release. Produces a click (and possibly a double
    /// click) if released over the pressed widget without dragging.
    pub fn mouse_released(&mut self, button: MouseButton, x: i32, y: i32) -> bool {
        self.input.cursor = Point::new(x, y);
        let Some((target, pressed_button)) = self.input.pressed.take() else {
            return false;
        };
        let was_dragging = std::mem::take(&mut self.input.dragging);

        let mut release = self.input_event(InputKind::Release { button, x, y });
        self.dispatch(target, &mut release);

        if was_dragging || pressed_button != button || self.component_at(x, y) != Some(target) {
            return true;
        }

        let mut click = self.input_event(InputKind::Click { button, x, y });
        self.dispatch(target, &mut click);

        let frame = self.frame;
        let window = self.theme.double_click_frames;
        match self.input.last_click {
            Some((last, at)) if last == target && frame.saturating_sub(at) <= window => {
                self.input.last_click = None;
                let mut double = self.input_event(InputKind::DoubleClick { button, x, y });
                self.dispatch(target, &mut double);
            }
            _ => self.input.last_click = Some((target, frame)),
        }
        true
    }

    /// Handle wheel notches over the widget under the cursor.
    pub fn mouse_scrolled(&mut self, delta: i32) -> bool {
        let cursor = self.input.cursor;
        let Some(target) = self.component_at(cursor.x, cursor.y) else {
            return false;
        };
        let mut event = self.input_event(InputKind::Scroll { delta });
        self.dispatch(target, &mut event)
    }

    /// Handle a typed key. Tab (shift+Tab backwards) cycles focus; other keys
    /// go to the focused widget and bubble from there.
    pub fn key_typed(&mut self, key: Key, ch: Option<char>) -> bool {
        if key == Key::Tab {
            return self.cycle_focus(self.input.modifiers.shift);
        }
        let Some(target) = self.input.focused else {
            return false;
        };
        let mut event = self.input_event(InputKind::KeyTyped { key, ch });
        self.dispatch(target, &mut event)
    }

    fn input_event(&self, kind: InputKind) -> InputEvent {
        InputEvent::new(kind, self.input.modifiers)
    }

    // ------------------------------------------------------------------
    // Bubbling
    // ------------------------------------------------------------------

    /// Offer `event` to `target`, then to each ancestor in turn until one
    /// handles or cancels it. Disabled widgets are skipped. For wheel and
    /// key events each widget's controls get first refusal. Returns false
    /// if the event reached past the root unhandled.
    pub fn dispatch(&mut self, target: WidgetId, event: &mut InputEvent) -> bool {
        let mut current = Some(target);
        while let Some(id) = current {
            if !self.contains(id) {
                break;
            }
            if self.is_enabled(id) {
                if matches!(
                    event.kind,
                    InputKind::Scroll { .. } | InputKind::KeyTyped { .. }
                ) {
                    for control in self.controls(id).to_vec() {
                        if self.is_enabled(control) && self.widget_behavior(control, event) {
                            log::trace!("{:?} consumed by control {:?}", event.kind, control);
                            return true;
                        }
                    }
                }
                let handled =
                    self.widget_behavior(id, event) || self.run_input_handler(id, event);
                if handled || event.is_cancelled() {
                    log::trace!(
                        "{:?} stopped at {:?} (handled: {}, cancelled: {})",
                        event.kind,
                        id,
                        handled,
                        event.is_cancelled()
                    );
                    return true;
                }
            }
            current = self.parent(id);
        }
        log::trace!("{:?} unhandled", event.kind);
        false
    }

    /// Install a custom input hook on a widget, replacing any previous one.
    /// It runs after the widget's built-in behavior declined the event.
    pub fn set_input_handler<F>(&mut self, id: WidgetId, handler: F) -> Result<()>
    where
        F: FnMut(&mut Screen, WidgetId, &mut InputEvent) -> bool + 'static,
    {
        let node = self.get_mut(id).ok_or(GuiError::UnknownWidget(id))?;
        node.input_handler = Some(Rc::new(RefCell::new(handler)));
        Ok(())
    }

    pub fn clear_input_handler(&mut self, id: WidgetId) {
        if let Some(node) = self.get_mut(id) {
            node.input_handler = None;
        }
    }

    fn run_input_handler(&mut self, id: WidgetId, event: &mut InputEvent) -> bool {
        let Some(handler) = self.get(id).and_then(|n| n.input_handler.clone()) else {
            return false;
        };
        let Ok(mut hook) = handler.try_borrow_mut() else {
            log::warn!("re-entrant input handler on {:?} skipped", id);
            return false;
        };
        (&mut *hook)(self, id, event)
    }

    fn widget_behavior(&mut self, id: WidgetId, event: &mut InputEvent) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        let behavior = match &node.widget {
            Widget::Button { .. } => Behavior::Button,
            Widget::Handle { kind, .. } => Behavior::Handle(*kind),
            Widget::Scrollbar { axis, .. } => Behavior::Scrollbar(*axis),
            _ => return false,
        };
        let owner = node.parent;

        match (behavior, event.kind) {
            (
                Behavior::Button,
                InputKind::Click {
                    button: MouseButton::Left,
                    ..
                }
                | InputKind::KeyTyped {
                    key: Key::Enter, ..
                },
            ) => {
                self.post(id, ComponentEvent::Activated);
                true
            }
            (Behavior::Handle(_), InputKind::Press { .. } | InputKind::Release { .. }) => true,
            (
                Behavior::Handle(HandleKind::Close),
                InputKind::Click {
                    button: MouseButton::Left,
                    ..
                },
            ) => {
                if let Some(owner) = owner
                    && let Err(err) = self.set_visible(owner, false)
                {
                    log::warn!("close handle {:?}: {}", id, err);
                }
                true
            }
            (Behavior::Handle(HandleKind::Move), InputKind::Drag { dx, dy, .. }) => {
                if let Some(owner) = owner {
                    let pos = self.position(owner);
                    if let Err(err) =
                        self.set_position(owner, Position::fixed(pos.x + dx, pos.y + dy))
                    {
                        log::warn!("move handle {:?}: {}", id, err);
                    }
                }
                true
            }
            (Behavior::Handle(HandleKind::Resize), InputKind::Drag { dx, dy, .. }) => {
                if let Some(owner) = owner {
                    let size = self.size(owner);
                    let min = self.theme.handle_size;
                    let resized =
                        Size::fixed((size.width + dx).max(min), (size.height + dy).max(min));
                    if let Err(err) = self.set_size(owner, resized) {
                        log::warn!("resize handle {:?}: {}", id, err);
                    }
                }
                true
            }
            (Behavior::Scrollbar(axis), kind) => match owner {
                Some(owner) => self.scrollbar_behavior(id, owner, axis, kind, event.modifiers),
                None => false,
            },
            _ => false,
        }
    }

    fn scrollbar_behavior(
        &mut self,
        bar: WidgetId,
        owner: WidgetId,
        axis: Axis,
        kind: InputKind,
        modifiers: Modifiers,
    ) -> bool {
        let step = self.theme.scroll_step;
        let page = self.inner_size(owner).along(axis);
        let outcome = match (axis, kind) {
            (_, InputKind::Scroll { delta }) => {
                // The horizontal bar only takes the wheel when nothing
                // scrolls vertically.
                if axis == Axis::Horizontal && self.scroll_range(owner, Axis::Vertical) > 0 {
                    return false;
                }
                let multiplier = if modifiers.coarse() {
                    self.theme.coarse_scroll_multiplier
                } else {
                    1
                };
                self.scroll_by_pixels(owner, axis, delta * step * multiplier)
            }
            (Axis::Vertical, InputKind::KeyTyped { key, .. }) => match key {
                Key::Up => self.scroll_by_pixels(owner, axis, -step),
                Key::Down => self.scroll_by_pixels(owner, axis, step),
                Key::PageUp => self.scroll_by_pixels(owner, axis, -page),
                Key::PageDown => self.scroll_by_pixels(owner, axis, page),
                Key::Home => self.set_scroll_offset(owner, axis, 0.0),
                Key::End => self.set_scroll_offset(owner, axis, 1.0),
                _ => return false,
            },
            (Axis::Horizontal, InputKind::KeyTyped { key, .. }) => match key {
                Key::Left => self.scroll_by_pixels(owner, axis, -step),
                Key::Right => self.scroll_by_pixels(owner, axis, step),
                _ => return false,
            },
            (
                _,
                InputKind::Press {
                    button: MouseButton::Left,
                    x,
                    y,
                },
            ) => {
                // Track click pages toward the click; a press on the thumb
                // only starts the drag.
                let local = Point::new(x, y).minus(self.screen_position(bar)).along(axis);
                let Some((start, length)) = self.scrollbar_thumb(bar) else {
                    return false;
                };
                if local < start {
                    self.scroll_by_pixels(owner, axis, -page)
                } else if local >= start + length {
                    self.scroll_by_pixels(owner, axis, page)
                } else {
                    Ok(())
                }
            }
            (_, InputKind::Drag { dx, dy, .. }) => {
                let Some((_, length)) = self.scrollbar_thumb(bar) else {
                    return false;
                };
                let free = self.size(bar).along(axis) - length;
                if free <= 0 {
                    return true;
                }
                let moved = Point::new(dx, dy).along(axis);
                let current = self.scroll_offset(owner, axis).unwrap_or(0.0);
                self.set_scroll_offset(owner, axis, current + moved as f32 / free as f32)
            }
            (_, InputKind::Release { .. }) => Ok(()),
            _ => return false,
        };
        if let Err(err) = outcome {
            log::warn!("scrollbar {:?}: {}", bar, err);
        }
        true
    }

    // ------------------------------------------------------------------
    // Hover / focus
    // ------------------------------------------------------------------

    pub fn hovered(&self) -> Option<WidgetId> {
        self.input.hovered
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.input.focused
    }

    pub fn is_hovered(&self, id: WidgetId) -> bool {
        self.input.hovered == Some(id)
    }

    pub fn is_focused(&self, id: WidgetId) -> bool {
        self.input.focused == Some(id)
    }

    /// Make `target` the hovered widget. The new holder's `HoverChange` post
    /// may veto the swap (returns false, previous holder kept); the previous
    /// holder is told afterwards.
    pub fn set_hovered(&mut self, target: Option<WidgetId>) -> bool {
        self.swap_holder(Holder::Hover, target)
    }

    /// Make `target` the focused widget, with the same veto rules as hover.
    pub fn set_focused(&mut self, target: Option<WidgetId>) -> bool {
        self.swap_holder(Holder::Focus, target)
    }

    fn swap_holder(&mut self, holder: Holder, target: Option<WidgetId>) -> bool {
        let previous = match holder {
            Holder::Hover => self.input.hovered,
            Holder::Focus => self.input.focused,
        };
        if previous == target {
            return true;
        }
        let change = |gained: bool| match holder {
            Holder::Hover => ComponentEvent::HoverChange { hovered: gained },
            Holder::Focus => ComponentEvent::FocusChange { focused: gained },
        };
        if let Some(id) = target
            && !self.post(id, change(true))
        {
            return false;
        }
        match holder {
            Holder::Hover => self.input.hovered = target,
            Holder::Focus => self.input.focused = target,
        }
        if let Some(old) = previous {
            self.post(old, change(false));
        }
        log::trace!("{:?}: {:?} -> {:?}", holder, previous, target);
        true
    }

    /// Focusable widgets in tree order: visible, enabled, of a focusable kind.
    pub fn focusable_widgets(&self) -> Vec<WidgetId> {
        let mut out = Vec::new();
        self.collect_focusable(self.root(), &mut out);
        out
    }

    fn collect_focusable(&self, id: WidgetId, out: &mut Vec<WidgetId>) {
        let Some(node) = self.get(id) else {
            return;
        };
        if !node.visible || !node.enabled {
            return;
        }
        if node.widget.is_focusable() {
            out.push(id);
        }
        for &child in &node.children {
            self.collect_focusable(child, out);
        }
    }

    fn cycle_focus(&mut self, backwards: bool) -> bool {
        let focusable = self.focusable_widgets();
        if focusable.is_empty() {
            self.set_focused(None);
            return false;
        }
        let len = focusable.len();
        let next = match self
            .input
            .focused
            .and_then(|f| focusable.iter().position(|&id| id == f))
        {
            Some(idx) if backwards => (idx + len - 1) % len,
            Some(idx) => (idx + 1) % len,
            None if backwards => len - 1,
            None => 0,
        };
        self.set_focused(Some(focusable[next]))
    }

    /// Tooltip for the hovered widget: the nearest one on its ancestor chain.
    pub fn tooltip_at_cursor(&self) -> Option<&str> {
        let hovered = self.input.hovered?;
        self.ancestors(hovered).find_map(|id| self.tooltip(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::events::EventKind;
    use crate::ui::theme::Theme;
    use std::cell::Cell;

    fn screen() -> Screen {
        Screen::new(300, 200, Theme::default())
    }

    fn place(s: &mut Screen, parent: WidgetId, widget: Widget, rect: (i32, i32, i32, i32)) -> WidgetId {
        let id = s.insert(parent, widget).expect("insert");
        s.set_position(id, Position::fixed(rect.0, rect.1)).expect("pos");
        s.set_size(id, Size::fixed(rect.2, rect.3)).expect("size");
        id
    }

    fn button(label: &str) -> Widget {
        Widget::Button {
            text: label.into(),
            color: [1.0; 4],
            bg_color: [0.0; 4],
        }
    }

    fn panel() -> Widget {
        Widget::Panel { background: None }
    }

    /// Panel at (10,10) 200x100 with a button at local (10,10) 50x20.
    fn panel_with_button() -> (Screen, WidgetId, WidgetId) {
        let mut s = screen();
        let root = s.root();
        let p = place(&mut s, root, panel(), (10, 10, 200, 100));
        let b = place(&mut s, p, button("ok"), (10, 10, 50, 20));
        (s, p, b)
    }

    fn count_activations(s: &mut Screen, id: WidgetId) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        s.subscribe(id, EventKind::Activated, move |_| c.set(c.get() + 1))
            .expect("subscribe");
        count
    }

    #[test]
    fn hover_tracking() {
        let (mut s, p, b) = panel_with_button();
        assert!(s.mouse_moved(25, 25));
        assert_eq!(s.hovered(), Some(b));
        assert!(s.mouse_moved(150, 80));
        assert_eq!(s.hovered(), Some(p));
        assert!(!s.mouse_moved(290, 190));
        assert_eq!(s.hovered(), None);
    }

    #[test]
    fn hover_swap_notifies_both_holders() {
        let (mut s, p, b) = panel_with_button();
        let log = Rc::new(RefCell::new(Vec::new()));
        for id in [p, b] {
            let l = log.clone();
            s.subscribe(id, EventKind::HoverChange, move |e| {
                l.borrow_mut().push((e.source, e.event.clone()))
            })
            .expect("subscribe");
        }
        s.mouse_moved(25, 25);
        s.mouse_moved(150, 80);
        assert_eq!(
            log.borrow().as_slice(),
            &[
                (b, ComponentEvent::HoverChange { hovered: true }),
                (p, ComponentEvent::HoverChange { hovered: true }),
                (b, ComponentEvent::HoverChange { hovered: false }),
            ]
        );
    }

    #[test]
    fn cancelled_hover_keeps_previous_holder() {
        let (mut s, p, b) = panel_with_button();
        s.mouse_moved(150, 80);
        assert_eq!(s.hovered(), Some(p));
        s.subscribe(b, EventKind::HoverChange, |e| {
            if e.event == (ComponentEvent::HoverChange { hovered: true }) {
                e.cancel();
            }
        })
        .expect("subscribe");
        s.mouse_moved(25, 25);
        assert_eq!(s.hovered(), Some(p));
    }

    #[test]
    fn click_activates_button_and_focuses_it() {
        let (mut s, _p, b) = panel_with_button();
        let count = count_activations(&mut s, b);
        assert!(s.mouse_pressed(MouseButton::Left, 25, 25));
        assert_eq!(s.focused(), Some(b));
        assert!(s.mouse_released(MouseButton::Left, 25, 25));
        assert_eq!(count.get(), 1);

        // Enter on the focused button activates it too.
        assert!(s.key_typed(Key::Enter, None));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn release_elsewhere_is_not_a_click() {
        let (mut s, _p, b) = panel_with_button();
        let count = count_activations(&mut s, b);
        s.mouse_pressed(MouseButton::Left, 25, 25);
        s.mouse_moved(150, 80);
        s.mouse_released(MouseButton::Left, 150, 80);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn press_outside_clears_focus() {
        let (mut s, _p, b) = panel_with_button();
        s.mouse_pressed(MouseButton::Left, 25, 25);
        s.mouse_released(MouseButton::Left, 25, 25);
        assert_eq!(s.focused(), Some(b));
        assert!(!s.mouse_pressed(MouseButton::Left, 290, 190));
        assert_eq!(s.focused(), None);
    }

    #[test]
    fn double_click_within_frame_window() {
        let (mut s, p, _b) = panel_with_button();
        let doubles = Rc::new(Cell::new(0));
        let d = doubles.clone();
        s.set_input_handler(p, move |_, _, e| {
            if matches!(e.kind, InputKind::DoubleClick { .. }) {
                d.set(d.get() + 1);
                return true;
            }
            false
        })
        .expect("handler");

        let click = |s: &mut Screen| {
            s.mouse_pressed(MouseButton::Left, 150, 80);
            s.mouse_released(MouseButton::Left, 150, 80);
        };
        click(&mut s);
        s.advance_frame();
        click(&mut s);
        assert_eq!(doubles.get(), 1);

        // Too slow: two single clicks.
        let window = s.theme().double_click_frames;
        click(&mut s);
        s.set_frame(s.frame() + window + 1);
        click(&mut s);
        assert_eq!(doubles.get(), 1);
    }

    #[test]
    fn disabled_widget_bubbles_to_parent() {
        let (mut s, p, b) = panel_with_button();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for id in [p, b] {
            let l = seen.clone();
            s.set_input_handler(id, move |_, me, _| {
                l.borrow_mut().push(me);
                false
            })
            .expect("handler");
        }
        s.set_enabled(b, false).expect("disable");
        let mut ev = InputEvent::new(InputKind::Scroll { delta: 1 }, Modifiers::default());
        assert!(!s.dispatch(b, &mut ev));
        assert_eq!(seen.borrow().as_slice(), &[p]);
    }

    #[test]
    fn unhandled_event_reaches_every_ancestor() {
        let (mut s, p, b) = panel_with_button();
        let root = s.root();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for id in [root, p] {
            let l = seen.clone();
            s.set_input_handler(id, move |_, me, _| {
                l.borrow_mut().push(me);
                false
            })
            .expect("handler");
        }
        let mut ev = InputEvent::new(
            InputKind::KeyTyped {
                key: Key::Other(65),
                ch: Some('a'),
            },
            Modifiers::default(),
        );
        assert!(!s.dispatch(b, &mut ev));
        assert_eq!(seen.borrow().as_slice(), &[p, root]);
    }

    #[test]
    fn cancel_stops_bubbling_but_keeps_side_effects() {
        let (mut s, p, b) = panel_with_button();
        let parent_calls = Rc::new(Cell::new(0));
        let pc = parent_calls.clone();
        s.set_input_handler(p, move |_, _, _| {
            pc.set(pc.get() + 1);
            true
        })
        .expect("handler");
        s.set_input_handler(b, |screen, me, e| {
            screen.set_z_index(me, 9).expect("z");
            e.cancel();
            false
        })
        .expect("handler");

        let mut ev = InputEvent::new(InputKind::Scroll { delta: 1 }, Modifiers::default());
        assert!(s.dispatch(b, &mut ev));
        assert!(ev.is_cancelled());
        assert_eq!(parent_calls.get(), 0);
        assert_eq!(s.z_index(b), 9);
    }

    #[test]
    fn tab_cycles_focus_skipping_disabled_and_hidden() {
        let mut s = screen();
        let root = s.root();
        let a = place(&mut s, root, button("a"), (0, 0, 10, 10));
        let b = place(&mut s, root, button("b"), (20, 0, 10, 10));
        let c = place(&mut s, root, button("c"), (40, 0, 10, 10));
        let d = place(&mut s, root, button("d"), (60, 0, 10, 10));
        s.set_enabled(b, false).expect("disable");
        s.set_visible(d, false).expect("hide");

        assert_eq!(s.focusable_widgets(), vec![a, c]);
        assert!(s.key_typed(Key::Tab, None));
        assert_eq!(s.focused(), Some(a));
        s.key_typed(Key::Tab, None);
        assert_eq!(s.focused(), Some(c));
        s.key_typed(Key::Tab, None);
        assert_eq!(s.focused(), Some(a));

        s.set_modifiers(Modifiers {
            shift: true,
            ..Modifiers::default()
        });
        s.key_typed(Key::Tab, None);
        assert_eq!(s.focused(), Some(c));
    }

    #[test]
    fn removal_clears_hover_and_focus() {
        let (mut s, p, b) = panel_with_button();
        s.mouse_pressed(MouseButton::Left, 25, 25);
        s.mouse_moved(25, 25);
        assert_eq!(s.hovered(), Some(b));
        s.remove(p).expect("remove");
        assert_eq!(s.hovered(), None);
        assert_eq!(s.focused(), None);
        assert!(!s.mouse_released(MouseButton::Left, 25, 25));
    }

    #[test]
    fn close_handle_hides_container() {
        let (mut s, p, _b) = panel_with_button();
        let close = s
            .insert_control(
                p,
                Widget::Handle {
                    kind: HandleKind::Close,
                    color: [1.0; 4],
                },
            )
            .expect("handle");
        s.set_position(close, Position::fixed(190, 0)).expect("pos");
        s.set_size(close, Size::fixed(10, 10)).expect("size");

        // Vetoed first.
        let veto = s
            .subscribe(p, EventKind::VisibilityChange, |e| e.cancel())
            .expect("subscribe");
        s.mouse_pressed(MouseButton::Left, 205, 15);
        s.mouse_released(MouseButton::Left, 205, 15);
        assert!(s.is_visible(p));

        s.unsubscribe(p, veto);
        s.mouse_pressed(MouseButton::Left, 205, 15);
        s.mouse_released(MouseButton::Left, 205, 15);
        assert!(!s.is_visible(p));
    }

    #[test]
    fn move_and_resize_handles_drag_their_container() {
        let (mut s, p, _b) = panel_with_button();
        let mover = s
            .insert_control(
                p,
                Widget::Handle {
                    kind: HandleKind::Move,
                    color: [1.0; 4],
                },
            )
            .expect("move");
        s.set_size(mover, Size::fixed(200, 5)).expect("size");
        let resizer = s
            .insert_control(
                p,
                Widget::Handle {
                    kind: HandleKind::Resize,
                    color: [1.0; 4],
                },
            )
            .expect("resize");
        s.set_position(resizer, Position::fixed(195, 95)).expect("pos");
        s.set_size(resizer, Size::fixed(5, 5)).expect("size");

        s.mouse_pressed(MouseButton::Left, 50, 12);
        s.mouse_moved(60, 32);
        s.mouse_moved(70, 42);
        s.mouse_released(MouseButton::Left, 70, 42);
        assert_eq!(s.position(p), Point::new(30, 40));

        // Resize handle now sits at screen (225,135).
        s.mouse_pressed(MouseButton::Left, 226, 136);
        s.mouse_moved(246, 146);
        s.mouse_released(MouseButton::Left, 246, 146);
        assert_eq!(s.size(p), crate::ui::Dimension::new(220, 110));
    }

    /// Scrollable panel 100x100 at the origin with a vertical bar and a
    /// 300 px tall list; returns (screen, panel, bar, first row).
    fn scroll_list() -> (Screen, WidgetId, WidgetId, WidgetId) {
        let mut s = screen();
        let root = s.root();
        let p = place(&mut s, root, panel(), (0, 0, 100, 100));
        let bar = s.attach_scrollbar(p, Axis::Vertical).expect("bar");
        let row = place(&mut s, p, button("row"), (0, 0, 80, 300));
        (s, p, bar, row)
    }

    #[test]
    fn wheel_scrolls_through_the_scrollbar_control() {
        let (mut s, p, _bar, _row) = scroll_list();
        let step = s.theme().scroll_step as f32;
        let range = s.scroll_range(p, Axis::Vertical) as f32;
        assert_eq!(range, 200.0);

        s.mouse_moved(40, 40);
        assert!(s.mouse_scrolled(1));
        let fine = s.scroll_offset(p, Axis::Vertical).expect("offset");
        assert!((fine - step / range).abs() < 1e-4);

        s.set_modifiers(Modifiers {
            ctrl: true,
            ..Modifiers::default()
        });
        s.mouse_scrolled(1);
        let coarse = s.scroll_offset(p, Axis::Vertical).expect("offset") - fine;
        let multiplier = s.theme().coarse_scroll_multiplier as f32;
        assert!((coarse - multiplier * step / range).abs() < 1e-4);
    }

    #[test]
    fn keys_navigate_focused_scroll_content() {
        let (mut s, p, _bar, row) = scroll_list();
        s.set_focused(Some(row));
        assert!(s.key_typed(Key::End, None));
        assert_eq!(s.scroll_offset(p, Axis::Vertical).expect("offset"), 1.0);
        s.key_typed(Key::PageUp, None);
        // inner height is 100 of a 200 px range
        assert!((s.scroll_offset(p, Axis::Vertical).expect("offset") - 0.5).abs() < 1e-4);
        s.key_typed(Key::Home, None);
        assert_eq!(s.scroll_offset(p, Axis::Vertical).expect("offset"), 0.0);
        // Horizontal keys are not taken by a vertical bar.
        assert!(!s.key_typed(Key::Left, None));
    }

    #[test]
    fn thumb_drag_and_track_click() {
        let (mut s, p, bar, _row) = scroll_list();
        let bar_x = s.screen_position(bar).x + 1;
        // Thumb spans 0..33 of the 100 px track.
        let (start, len) = s.scrollbar_thumb(bar).expect("thumb");
        assert_eq!((start, len), (0, 33));

        // Track click below the thumb pages down.
        s.mouse_pressed(MouseButton::Left, bar_x, 90);
        s.mouse_released(MouseButton::Left, bar_x, 90);
        assert!((s.scroll_offset(p, Axis::Vertical).expect("offset") - 0.5).abs() < 1e-4);

        s.set_scroll_offset(p, Axis::Vertical, 0.0).expect("reset");
        s.mouse_pressed(MouseButton::Left, bar_x, 10);
        s.mouse_moved(bar_x, 10 + 67);
        s.mouse_released(MouseButton::Left, bar_x, 77);
        assert_eq!(s.scroll_offset(p, Axis::Vertical).expect("offset"), 1.0);
    }

    #[test]
    fn tooltip_comes_from_nearest_ancestor() {
        let (mut s, p, b) = panel_with_button();
        s.set_tooltip(p, Some("panel".into())).expect("tooltip");
        s.mouse_moved(25, 25);
        assert_eq!(s.tooltip_at_cursor(), Some("panel"));
        s.set_tooltip(b, Some("button".into())).expect("tooltip");
        assert_eq!(s.tooltip_at_cursor(), Some("button"));
        s.mouse_moved(290, 190);
        assert_eq!(s.tooltip_at_cursor(), None);
    }
}
