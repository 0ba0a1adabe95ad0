use super::geometry::{Axis, ClipArea, Point};
use super::widget::{HandleKind, ItemHandle, Widget};
use super::{Screen, WidgetId};

/// What to draw for one command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawKind {
    /// Filled quad (panel, button and slot backgrounds).
    Background { color: [f32; 4] },
    /// Single text run at the rect's origin.
    Text { text: String, color: [f32; 4] },
    /// Scrollbar track.
    Track { color: [f32; 4] },
    /// Scrollbar thumb.
    Thumb { color: [f32; 4] },
    /// Close/move/resize handle.
    Handle { kind: HandleKind, color: [f32; 4] },
    /// Opaque host item inside a slot. The host resolves and draws it.
    Item { item: ItemHandle },
}

/// One resolved draw request: screen rect, clip to apply, effective alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub widget: WidgetId,
    pub kind: DrawKind,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub clip: ClipArea,
    pub alpha: u8,
    pub z_index: i32,
}

/// Host rendering backend.
///
/// `current` is the widget being drawn, for backends that resolve
/// coordinates relative to it. The render pass sets it before drawing a
/// widget and restores the previous value afterwards.
pub trait Renderer {
    fn current(&self) -> Option<WidgetId>;
    fn set_current(&mut self, widget: Option<WidgetId>);
    fn draw(&mut self, command: DrawCommand);

    /// Called once before the pass with the fraction of the host tick
    /// elapsed since the last update.
    fn begin_frame(&mut self, _partial_tick: f32) {}
}

/// Collects draw commands from the widget tree.
/// Decouples widget logic from the host renderer.
#[derive(Debug, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
    pub partial_tick: f32,
    current: Option<WidgetId>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.current = None;
    }

    /// Commands emitted for one widget, in draw order.
    pub fn for_widget(&self, widget: WidgetId) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |c| c.widget == widget)
    }
}

impl Renderer for DrawList {
    fn current(&self) -> Option<WidgetId> {
        self.current
    }

    fn set_current(&mut self, widget: Option<WidgetId>) {
        self.current = widget;
    }

    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    fn begin_frame(&mut self, partial_tick: f32) {
        self.partial_tick = partial_tick;
    }
}

impl Screen {
    /// Walk the tree and emit draw commands into `renderer`.
    ///
    /// Children draw in ascending effective z-index (insertion order on
    /// ties) under the node's intersected clip; controls draw last, over the
    /// children, under the parent's clip. Invisible subtrees and anything
    /// entirely outside its clip produce nothing.
    pub fn render(&self, renderer: &mut dyn Renderer, partial_tick: f32) {
        renderer.begin_frame(partial_tick);
        self.render_node(self.root(), renderer, ClipArea::NoClip);
    }

    fn render_node(&self, id: WidgetId, renderer: &mut dyn Renderer, clip: ClipArea) {
        let Some(node) = self.get(id) else {
            return;
        };
        if !node.visible || clip.is_full_clip() {
            return;
        }

        let previous = renderer.current();
        renderer.set_current(Some(id));
        self.emit_widget(id, &node.widget, renderer, clip);

        let child_clip = clip.intersect(self.clip_area(id));
        if !child_clip.is_full_clip() {
            let mut children: Vec<(i32, WidgetId)> = node
                .children
                .iter()
                .map(|&child| (self.z_index(child), child))
                .collect();
            children.sort_by_key(|(z, _)| *z);
            for (_, child) in children {
                self.render_node(child, renderer, child_clip);
            }
        }
        for &control in &node.controls {
            self.render_node(control, renderer, clip);
        }

        renderer.set_current(previous);
    }

    fn emit_widget(&self, id: WidgetId, widget: &Widget, renderer: &mut dyn Renderer, clip: ClipArea) {
        let origin = self.screen_position(id);
        let size = self.size(id);
        let rect = ClipArea::from_origin(origin, size);
        if rect.intersect(clip).is_full_clip() {
            return;
        }
        let alpha = self.alpha(id);
        let z_index = self.z_index(id);
        let mut emit = |kind: DrawKind, at: Point, width: i32, height: i32| {
            renderer.draw(DrawCommand {
                widget: id,
                kind,
                x: at.x,
                y: at.y,
                width,
                height,
                clip,
                alpha,
                z_index,
            });
        };

        match widget {
            Widget::Root => {}
            Widget::Panel { background } => {
                if let Some(color) = background {
                    emit(DrawKind::Background { color: *color }, origin, size.width, size.height);
                }
            }
            Widget::Label { text, color } => {
                emit(
                    DrawKind::Text {
                        text: text.clone(),
                        color: *color,
                    },
                    origin,
                    size.width,
                    size.height,
                );
            }
            Widget::Button {
                text,
                color,
                bg_color,
            } => {
                // Button = background + text inset by the theme padding.
                emit(
                    DrawKind::Background { color: *bg_color },
                    origin,
                    size.width,
                    size.height,
                );
                let inset = self.theme().panel_padding;
                emit(
                    DrawKind::Text {
                        text: text.clone(),
                        color: *color,
                    },
                    origin.plus(Point::new(inset, inset)),
                    size.width - 2 * inset,
                    size.height - 2 * inset,
                );
            }
            Widget::Slot { item, bg_color } => {
                emit(
                    DrawKind::Background { color: *bg_color },
                    origin,
                    size.width,
                    size.height,
                );
                if let Some(item) = item {
                    emit(DrawKind::Item { item: *item }, origin, size.width, size.height);
                }
            }
            Widget::Scrollbar {
                axis,
                track_color,
                thumb_color,
            } => {
                emit(
                    DrawKind::Track {
                        color: *track_color,
                    },
                    origin,
                    size.width,
                    size.height,
                );
                if let Some((start, length)) = self.scrollbar_thumb(id) {
                    let (at, width, height) = match axis {
                        Axis::Vertical => (origin.plus(Point::new(0, start)), size.width, length),
                        Axis::Horizontal => (origin.plus(Point::new(start, 0)), length, size.height),
                    };
                    emit(DrawKind::Thumb { color: *thumb_color }, at, width, height);
                }
            }
            Widget::Handle { kind, color } => {
                emit(
                    DrawKind::Handle {
                        kind: *kind,
                        color: *color,
                    },
                    origin,
                    size.width,
                    size.height,
                );
            }
        }
    }
}
