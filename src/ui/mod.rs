mod builder;
mod clip;
mod demo;
mod draw;
mod events;
mod geometry;
mod input;
mod layout;
mod scroll;
mod theme;
mod widget;

pub use builder::NodeBuilder;
pub use demo::{DemoScreen, build_demo};
pub use draw::{DrawCommand, DrawKind, DrawList, Renderer};
pub use events::{BusEvent, ComponentEvent, EventBus, EventKind, ListenerId};
pub use geometry::{Axis, ClipArea, Dimension, Padding, Point};
pub use input::{InputEvent, InputHandler, InputKind, Key, Modifiers, MouseButton};
pub use layout::{Coord, Extent, Position, PositionBuilder, Size, SizeBuilder, Supplier};
pub use scroll::ScrollState;
pub use theme::Theme;
pub use widget::{HandleKind, ItemHandle, Widget};

use slotmap::{SlotMap, new_key_type};

use crate::error::{GuiError, Result};
use input::InputState;
use layout::LayoutCache;

new_key_type! {
    /// Handle into the widget arena. Stable across insertions/removals.
    pub struct WidgetId;
}

// ---------------------------------------------------------------------------
// Widget node (arena entry)
// ---------------------------------------------------------------------------

/// Arena entry pairing a widget with tree, layout and interaction state.
///
/// Read access is public; every mutation goes through `Screen` so caches,
/// content-update notifications and bus posts stay consistent.
pub struct WidgetNode {
    pub widget: Widget,
    pub parent: Option<WidgetId>,
    /// Ordinary children, in insertion order (hit-test tiebreak order).
    pub children: Vec<WidgetId>,
    /// Control sub-components (scrollbars, handles): drawn over and
    /// hit-tested before the ordinary children.
    pub controls: Vec<WidgetId>,
    /// True if this node sits in its parent's `controls`.
    pub is_control: bool,
    pub position: Position,
    pub size: Size,
    pub padding: Padding,
    /// Clip children (and hit-testing of children) to the inner area.
    pub clip_content: bool,
    /// Exempt from the parent's scroll translation.
    pub fixed: bool,
    /// 0 = inherit the parent's effective z-index.
    pub z_index: i32,
    /// Own alpha; the effective alpha is the minimum along the ancestor chain.
    pub alpha: u8,
    pub visible: bool,
    /// Own flag; the effective state is the AND along the ancestor chain.
    pub enabled: bool,
    pub tooltip: Option<String>,
    /// Present on scrollable containers.
    pub scroll: Option<ScrollState>,
    pub(crate) bus: EventBus,
    pub(crate) input_handler: Option<InputHandler>,
    pub(crate) cache: LayoutCache,
}

impl WidgetNode {
    fn new(widget: Widget, parent: Option<WidgetId>, is_control: bool) -> Self {
        Self {
            widget,
            parent,
            children: Vec::new(),
            controls: Vec::new(),
            is_control,
            position: Position::ZERO,
            size: Size::ZERO,
            padding: Padding::ZERO,
            clip_content: false,
            fixed: is_control,
            z_index: 0,
            alpha: 255,
            visible: true,
            enabled: true,
            tooltip: None,
            scroll: None,
            bus: EventBus::new(),
            input_handler: None,
            cache: LayoutCache::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// A top-level screen: the arena-backed widget tree plus the per-screen
/// context (frame counter, hover/focus/drag state, theme).
///
/// Everything runs on the caller's thread within one host tick: input is
/// dispatched, then `advance_frame` invalidates the per-frame geometry
/// caches for the next tick, then `render` reads the tree.
pub struct Screen {
    arena: SlotMap<WidgetId, WidgetNode>,
    root: WidgetId,
    /// Host frame counter. Part of every geometry cache key.
    frame: u64,
    /// Bumped by every layout-affecting mutation. Part of every cache key.
    generation: u64,
    pub(crate) input: InputState,
    theme: Theme,
}

impl Screen {
    pub fn new(width: i32, height: i32, theme: Theme) -> Self {
        let mut arena = SlotMap::with_key();
        let mut root_node = WidgetNode::new(Widget::Root, None, false);
        root_node.size = Size::fixed(width, height);
        let root = arena.insert(root_node);
        log::debug!("screen opened ({}x{})", width, height);
        Self {
            arena,
            root,
            frame: 0,
            generation: 0,
            input: InputState::new(),
            theme,
        }
    }

    pub fn root(&self) -> WidgetId {
        self.root
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Start the next frame: invalidates every per-frame geometry cache and
    /// re-evaluates scrollbar auto-hide for content driven by dynamic
    /// suppliers.
    pub fn advance_frame(&mut self) {
        self.frame += 1;
        self.refresh_all_scrollbars();
    }

    /// Adopt the host's frame counter. Counters that go backwards are ignored.
    pub fn set_frame(&mut self, frame: u64) {
        if frame < self.frame {
            log::warn!("frame counter went backwards ({} -> {})", self.frame, frame);
            return;
        }
        if frame != self.frame {
            self.frame = frame;
            self.refresh_all_scrollbars();
        }
    }

    /// Resize the screen (root) area.
    pub fn resize(&mut self, width: i32, height: i32) {
        let root = self.root;
        if let Some(node) = self.arena.get_mut(root) {
            node.size = Size::fixed(width, height);
        }
        self.generation += 1;
        self.refresh_all_scrollbars();
    }

    /// Close the screen: drop hover/focus/drag state. The tree itself is
    /// discarded with the `Screen`.
    pub fn close(&mut self) {
        self.input = InputState::new();
        log::debug!("screen closed ({} widgets)", self.arena.len());
    }

    // ------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------

    /// Insert `widget` as the last ordinary child of `parent`.
    pub fn insert(&mut self, parent: WidgetId, widget: Widget) -> Result<WidgetId> {
        let parent_node = self
            .arena
            .get(parent)
            .ok_or(GuiError::UnknownWidget(parent))?;
        if !parent_node.widget.is_container() {
            return Err(GuiError::MissingCapability {
                id: parent,
                widget: parent_node.widget.name(),
                capability: "children",
            });
        }
        let name = widget.name();
        let id = self
            .arena
            .insert(WidgetNode::new(widget, Some(parent), false));
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.push(id);
        }
        log::debug!("attached {} {:?} to {:?}", name, id, parent);
        self.notify_content_update(parent);
        Ok(id)
    }

    /// Insert `widget` as a control sub-component of `owner`. Controls are
    /// fixed (not scrolled) and never count toward content bounds.
    pub fn insert_control(&mut self, owner: WidgetId, widget: Widget) -> Result<WidgetId> {
        if !self.arena.contains_key(owner) {
            return Err(GuiError::UnknownWidget(owner));
        }
        let name = widget.name();
        let id = self.arena.insert(WidgetNode::new(widget, Some(owner), true));
        if let Some(owner_node) = self.arena.get_mut(owner) {
            owner_node.controls.push(id);
        }
        self.generation += 1;
        log::debug!("attached {} control {:?} to {:?}", name, id, owner);
        Ok(id)
    }

    /// Detach a widget and drop it with all its descendants and controls.
    /// Hover/focus/drag held by any of them is cleared.
    pub fn remove(&mut self, id: WidgetId) -> Result<()> {
        if id == self.root {
            return Err(GuiError::MissingCapability {
                id,
                widget: "root",
                capability: "detachment",
            });
        }
        let node = self.arena.get(id).ok_or(GuiError::UnknownWidget(id))?;
        let parent = node.parent;
        let was_control = node.is_control;

        let mut to_remove = Vec::new();
        Self::collect_subtree(&self.arena, id, &mut to_remove);
        self.input.forget(&to_remove);

        if let Some(parent_id) = parent
            && let Some(parent_node) = self.arena.get_mut(parent_id)
        {
            parent_node.children.retain(|c| *c != id);
            parent_node.controls.retain(|c| *c != id);
            if let Some(scroll) = parent_node.scroll.as_mut() {
                scroll.detach_scrollbar(id);
            }
        }

        for rid in &to_remove {
            self.arena.remove(*rid);
        }
        self.generation += 1;
        log::debug!("detached {:?} ({} widgets)", id, to_remove.len());

        let dangling = self.dangling_references();
        if !dangling.is_empty() {
            log::warn!(
                "{} widget(s) still position or size against removed {:?}: {:?}",
                dangling.len(),
                id,
                dangling
            );
        }

        if let Some(parent_id) = parent
            && !was_control
        {
            self.notify_content_update(parent_id);
        }
        Ok(())
    }

    fn collect_subtree(
        arena: &SlotMap<WidgetId, WidgetNode>,
        id: WidgetId,
        out: &mut Vec<WidgetId>,
    ) {
        out.push(id);
        if let Some(node) = arena.get(id) {
            for &child in node.children.iter().chain(node.controls.iter()) {
                Self::collect_subtree(arena, child, out);
            }
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn get(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.arena.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: WidgetId) -> Option<&mut WidgetNode> {
        self.arena.get_mut(id)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.arena.contains_key(id)
    }

    /// Number of widgets, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.arena.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.arena.get(id).map_or(&[], |n| n.children.as_slice())
    }

    pub fn controls(&self, id: WidgetId) -> &[WidgetId] {
        self.arena.get(id).map_or(&[], |n| n.controls.as_slice())
    }

    /// `id` followed by its parent, grandparent, ... up to the root.
    pub fn ancestors(&self, id: WidgetId) -> impl Iterator<Item = WidgetId> + '_ {
        std::iter::successors(Some(id), move |&current| self.parent(current))
            .take_while(move |&current| self.arena.contains_key(current))
    }

    /// Own visibility flag.
    pub fn is_visible(&self, id: WidgetId) -> bool {
        self.arena.get(id).is_some_and(|n| n.visible)
    }

    /// Effective enabled state: own flag AND every ancestor's.
    pub fn is_enabled(&self, id: WidgetId) -> bool {
        self.arena.contains_key(id)
            && self
                .ancestors(id)
                .all(|a| self.arena.get(a).is_some_and(|n| n.enabled))
    }

    /// Effective alpha: minimum along the ancestor chain.
    pub fn alpha(&self, id: WidgetId) -> u8 {
        self.ancestors(id)
            .filter_map(|a| self.arena.get(a).map(|n| n.alpha))
            .min()
            .unwrap_or(255)
    }

    /// Effective z-index: own if non-zero, otherwise the parent's.
    pub fn z_index(&self, id: WidgetId) -> i32 {
        self.ancestors(id)
            .filter_map(|a| self.arena.get(a).map(|n| n.z_index))
            .find(|z| *z != 0)
            .unwrap_or(0)
    }

    pub fn padding(&self, id: WidgetId) -> Padding {
        self.arena.get(id).map_or(Padding::ZERO, |n| n.padding)
    }

    pub fn tooltip(&self, id: WidgetId) -> Option<&str> {
        self.arena.get(id).and_then(|n| n.tooltip.as_deref())
    }

    // ------------------------------------------------------------------
    // State mutation
    // ------------------------------------------------------------------

    /// Show or hide a widget. Posts `VisibilityChange` first; returns
    /// `Ok(false)` if a listener cancelled it (visibility unchanged).
    pub fn set_visible(&mut self, id: WidgetId, visible: bool) -> Result<bool> {
        let node = self.arena.get(id).ok_or(GuiError::UnknownWidget(id))?;
        if node.visible == visible {
            return Ok(true);
        }
        if !self.post(id, ComponentEvent::VisibilityChange { visible }) {
            return Ok(false);
        }
        if let Some(node) = self.arena.get_mut(id) {
            node.visible = visible;
        }
        self.geometry_changed(id);
        Ok(true)
    }

    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) -> Result<()> {
        let node = self.arena.get_mut(id).ok_or(GuiError::UnknownWidget(id))?;
        node.enabled = enabled;
        Ok(())
    }

    /// Set own alpha, clamped to 0..=255.
    pub fn set_alpha(&mut self, id: WidgetId, alpha: i32) -> Result<()> {
        let node = self.arena.get_mut(id).ok_or(GuiError::UnknownWidget(id))?;
        node.alpha = alpha.clamp(0, 255) as u8;
        Ok(())
    }

    pub fn set_z_index(&mut self, id: WidgetId, z_index: i32) -> Result<()> {
        let node = self.arena.get_mut(id).ok_or(GuiError::UnknownWidget(id))?;
        node.z_index = z_index;
        Ok(())
    }

    pub fn set_padding(&mut self, id: WidgetId, padding: Padding) -> Result<()> {
        let node = self.arena.get_mut(id).ok_or(GuiError::UnknownWidget(id))?;
        node.padding = padding;
        self.geometry_changed(id);
        self.refresh_scrollbars(id);
        Ok(())
    }

    pub fn set_clip_content(&mut self, id: WidgetId, clip: bool) -> Result<()> {
        let node = self.arena.get_mut(id).ok_or(GuiError::UnknownWidget(id))?;
        node.clip_content = clip;
        Ok(())
    }

    /// Exempt (or not) a widget from its parent's scroll translation.
    pub fn set_fixed(&mut self, id: WidgetId, fixed: bool) -> Result<()> {
        let node = self.arena.get_mut(id).ok_or(GuiError::UnknownWidget(id))?;
        node.fixed = fixed;
        self.generation += 1;
        Ok(())
    }

    pub fn set_tooltip(&mut self, id: WidgetId, tooltip: Option<String>) -> Result<()> {
        let node = self.arena.get_mut(id).ok_or(GuiError::UnknownWidget(id))?;
        node.tooltip = tooltip;
        Ok(())
    }

    /// Replace the widget's kind-specific data (label text, slot item...).
    pub fn set_widget(&mut self, id: WidgetId, widget: Widget) -> Result<()> {
        let node = self.arena.get_mut(id).ok_or(GuiError::UnknownWidget(id))?;
        node.widget = widget;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Component event bus
    // ------------------------------------------------------------------

    pub fn subscribe<F>(&mut self, id: WidgetId, kind: EventKind, listener: F) -> Result<ListenerId>
    where
        F: FnMut(&mut BusEvent) + 'static,
    {
        let node = self.arena.get_mut(id).ok_or(GuiError::UnknownWidget(id))?;
        Ok(node.bus.subscribe(kind, listener))
    }

    pub fn unsubscribe(&mut self, id: WidgetId, listener: ListenerId) -> bool {
        self.arena
            .get_mut(id)
            .is_some_and(|n| n.bus.unsubscribe(listener))
    }

    /// Post on `id`'s bus. Returns true if no listener cancelled.
    pub(crate) fn post(&self, id: WidgetId, event: ComponentEvent) -> bool {
        let Some(node) = self.arena.get(id) else {
            return true;
        };
        let mut bus_event = BusEvent::new(id, event);
        node.bus.post(&mut bus_event)
    }

    // ------------------------------------------------------------------
    // Change propagation
    // ------------------------------------------------------------------

    /// A widget's position, size or visibility changed: invalidate caches
    /// and tell its container (controls never affect content bounds).
    pub(crate) fn geometry_changed(&mut self, id: WidgetId) {
        self.generation += 1;
        let Some(node) = self.arena.get(id) else {
            return;
        };
        if let Some(parent) = node.parent
            && !node.is_control
        {
            self.notify_content_update(parent);
        }
    }

    /// The visible children of `id`, or their geometry, changed. Posts
    /// `ContentUpdate`, re-evaluates scrollbars, and re-broadcasts to the
    /// parent when `id` sizes itself to its content.
    pub fn notify_content_update(&mut self, id: WidgetId) {
        self.generation += 1;
        self.post(id, ComponentEvent::ContentUpdate);
        self.refresh_scrollbars(id);
        let Some(node) = self.arena.get(id) else {
            return;
        };
        if node.size.is_content()
            && !node.is_control
            && let Some(parent) = node.parent
        {
            self.notify_content_update(parent);
        }
    }

    // ------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------

    /// Whether (x, y) lies within the widget's own screen rectangle.
    /// Always false for invisible widgets.
    pub fn is_inside_bounds(&self, id: WidgetId, x: i32, y: i32) -> bool {
        if !self.is_visible(id) {
            return false;
        }
        ClipArea::from_origin(self.screen_position(id), self.size(id)).contains(x, y)
    }

    /// Topmost interactive widget at screen point (x, y). The root itself
    /// is never returned.
    pub fn component_at(&self, x: i32, y: i32) -> Option<WidgetId> {
        self.component_at_node(self.root, x, y)
            .filter(|&id| id != self.root)
    }

    /// Resolve (x, y) within the subtree of `id`.
    ///
    /// Controls take precedence over ordinary children regardless of
    /// z-index. Among children the highest effective z-index wins; on ties
    /// the later child wins. A clipping container only offers children the
    /// points inside its clip area.
    pub fn component_at_node(&self, id: WidgetId, x: i32, y: i32) -> Option<WidgetId> {
        let node = self.arena.get(id)?;
        let is_container = node.widget.is_container();
        if is_container && (!node.visible || !self.is_enabled(id)) {
            return None;
        }
        let own = || self.is_inside_bounds(id, x, y).then_some(id);

        let mut control_hit = None;
        for &control in &node.controls {
            if let Some(hit) = self.component_at_node(control, x, y) {
                control_hit = Some(hit);
            }
        }
        if let Some(hit) = control_hit
            && self.is_enabled(hit)
        {
            return Some(hit);
        }

        if !is_container || node.children.is_empty() {
            return own();
        }
        if node.clip_content && !self.clip_area(id).contains(x, y) {
            return own();
        }

        let mut best: Option<(WidgetId, i32)> = None;
        for &child in &node.children {
            if let Some(hit) = self.component_at_node(child, x, y) {
                let z = self.z_index(hit);
                if best.is_none_or(|(_, best_z)| z >= best_z) {
                    best = Some((hit, z));
                }
            }
        }
        match best {
            Some((hit, _)) if self.is_enabled(hit) => Some(hit),
            _ => own(),
        }
    }
}
