use super::geometry::Padding;
use super::layout::{Position, Size};
use super::widget::Widget;
use super::{Screen, WidgetId};
use crate::error::{GuiError, Result};

/// Composes a widget with its layout and state, then attaches it in one
/// step. `build` fails with `MissingOwner` if no parent was given, and
/// leaves no half-configured widget behind if any declaration is rejected.
#[derive(Debug)]
pub struct NodeBuilder {
    widget: Widget,
    parent: Option<WidgetId>,
    control: bool,
    position: Option<Position>,
    size: Option<Size>,
    padding: Padding,
    clip_content: bool,
    alpha: Option<i32>,
    z_index: i32,
    tooltip: Option<String>,
    visible: bool,
    enabled: bool,
}

impl NodeBuilder {
    pub fn new(widget: Widget) -> Self {
        Self {
            widget,
            parent: None,
            control: false,
            position: None,
            size: None,
            padding: Padding::ZERO,
            clip_content: false,
            alpha: None,
            z_index: 0,
            tooltip: None,
            visible: true,
            enabled: true,
        }
    }

    /// Attach as an ordinary child of `parent`.
    pub fn parent(mut self, parent: WidgetId) -> Self {
        self.parent = Some(parent);
        self.control = false;
        self
    }

    /// Attach as a control sub-component of `owner`.
    pub fn control_of(mut self, owner: WidgetId) -> Self {
        self.parent = Some(owner);
        self.control = true;
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn at(self, x: i32, y: i32) -> Self {
        self.position(Position::fixed(x, y))
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn sized(self, width: i32, height: i32) -> Self {
        self.size(Size::fixed(width, height))
    }

    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn clip_content(mut self, clip: bool) -> Self {
        self.clip_content = clip;
        self
    }

    pub fn alpha(mut self, alpha: i32) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn build(mut self, screen: &mut Screen) -> Result<WidgetId> {
        let Some(parent) = self.parent else {
            return Err(GuiError::MissingOwner {
                widget: self.widget.name(),
            });
        };
        let widget = std::mem::replace(&mut self.widget, Widget::Root);
        let id = if self.control {
            screen.insert_control(parent, widget)?
        } else {
            screen.insert(parent, widget)?
        };

        if let Err(err) = self.configure(screen, id) {
            if let Err(cleanup) = screen.remove(id) {
                log::warn!("could not discard half-built {:?}: {}", id, cleanup);
            }
            return Err(err);
        }
        Ok(id)
    }

    fn configure(self, screen: &mut Screen, id: WidgetId) -> Result<()> {
        screen.set_padding(id, self.padding)?;
        if let Some(position) = self.position {
            screen.set_position(id, position)?;
        }
        if let Some(size) = self.size {
            screen.set_size(id, size)?;
        }
        screen.set_clip_content(id, self.clip_content)?;
        if let Some(alpha) = self.alpha {
            screen.set_alpha(id, alpha)?;
        }
        screen.set_z_index(id, self.z_index)?;
        screen.set_tooltip(id, self.tooltip)?;
        screen.set_enabled(id, self.enabled)?;
        if !self.visible {
            screen.set_visible(id, false)?;
        }
        Ok(())
    }
}
