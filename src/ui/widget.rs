use super::geometry::Axis;

/// Opaque host item carried through slot widgets (an item stack, an
/// inventory entry...). The core never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemHandle(pub u64);

/// Which container handle a control widget drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    /// Click hides the owning container.
    Close,
    /// Drag moves the owning container.
    Move,
    /// Drag resizes the owning container.
    Resize,
}

/// Flat enum widget identity.
/// Closed set: behavior is dispatched by matching, not through trait objects.
#[derive(Debug, Clone)]
pub enum Widget {
    /// Top-level node covering the whole screen. One per `Screen`.
    Root,

    /// Generic container with an optional background fill.
    Panel {
        background: Option<[f32; 4]>, // sRGB RGBA, None = transparent
    },

    /// Single line of text.
    Label {
        text: String,
        color: [f32; 4], // sRGB RGBA
    },

    /// Clickable text. Posts `ComponentEvent::Activated` when clicked.
    Button {
        text: String,
        color: [f32; 4],    // text sRGB RGBA
        bg_color: [f32; 4], // background sRGB RGBA
    },

    /// Inventory-style cell showing an opaque host item.
    Slot {
        item: Option<ItemHandle>,
        bg_color: [f32; 4], // sRGB RGBA
    },

    /// Scrollbar control attached to a scrollable container.
    Scrollbar {
        axis: Axis,
        track_color: [f32; 4], // sRGB RGBA
        thumb_color: [f32; 4], // sRGB RGBA
    },

    /// Close/move/resize handle control.
    Handle {
        kind: HandleKind,
        color: [f32; 4], // sRGB RGBA
    },
}

impl Widget {
    /// Whether this widget may own ordinary children.
    pub fn is_container(&self) -> bool {
        matches!(self, Widget::Root | Widget::Panel { .. })
    }

    /// Whether keyboard focus may land on this widget via Tab cycling.
    pub fn is_focusable(&self) -> bool {
        matches!(self, Widget::Button { .. } | Widget::Slot { .. })
    }

    /// Short name used in error messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Widget::Root => "root",
            Widget::Panel { .. } => "panel",
            Widget::Label { .. } => "label",
            Widget::Button { .. } => "button",
            Widget::Slot { .. } => "slot",
            Widget::Scrollbar { .. } => "scrollbar",
            Widget::Handle { .. } => "handle",
        }
    }
}
