//! Scrolling composition.
//!
//! A scrollable container keeps one scroll fraction per axis in `[0, 1]`.
//! The pixel translation applied to its (non-fixed) children is
//! `-(fraction * range)` where `range = content - inner`. Scrollbars are
//! control sub-components of the container; they hide and disable
//! themselves while the content fits, and a visible scrollbar reserves its
//! thickness from the container's inner size, which makes two visible
//! bars leave the corner to each other.

use super::events::ComponentEvent;
use super::geometry::{Axis, Dimension, Point};
use super::layout::{Coord, Extent, Position, Size};
use super::widget::Widget;
use super::{Screen, WidgetId};
use crate::error::{GuiError, Result};

/// Scroll fractions and attached scrollbars of a scrollable container.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    horizontal: f32,
    vertical: f32,
    horizontal_bar: Option<WidgetId>,
    vertical_bar: Option<WidgetId>,
}

impl ScrollState {
    pub fn offset(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    /// Store a fraction, clamped into `[0, 1]`. NaN is treated as 0.
    fn set_offset(&mut self, axis: Axis, fraction: f32) {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        match axis {
            Axis::Horizontal => self.horizontal = fraction,
            Axis::Vertical => self.vertical = fraction,
        }
    }

    pub fn scrollbar(&self, axis: Axis) -> Option<WidgetId> {
        match axis {
            Axis::Horizontal => self.horizontal_bar,
            Axis::Vertical => self.vertical_bar,
        }
    }

    fn set_scrollbar(&mut self, axis: Axis, bar: WidgetId) {
        match axis {
            Axis::Horizontal => self.horizontal_bar = Some(bar),
            Axis::Vertical => self.vertical_bar = Some(bar),
        }
    }

    /// Forget `bar` if it is one of the attached scrollbars.
    pub(crate) fn detach_scrollbar(&mut self, bar: WidgetId) {
        if self.horizontal_bar == Some(bar) {
            self.horizontal_bar = None;
        }
        if self.vertical_bar == Some(bar) {
            self.vertical_bar = None;
        }
    }
}

impl Screen {
    /// Give a container the scrollable capability. Scrollable containers
    /// clip their content. Idempotent.
    pub fn make_scrollable(&mut self, id: WidgetId) -> Result<()> {
        let node = self.get_mut(id).ok_or(GuiError::UnknownWidget(id))?;
        if !node.widget.is_container() {
            return Err(GuiError::MissingCapability {
                id,
                widget: node.widget.name(),
                capability: "scrolling",
            });
        }
        if node.scroll.is_none() {
            node.scroll = Some(ScrollState::default());
            node.clip_content = true;
            self.generation += 1;
        }
        Ok(())
    }

    /// Attach a scrollbar along `axis` as a control of `container`,
    /// making it scrollable first if needed. Replaces nothing: a second
    /// call for the same axis returns the existing bar.
    pub fn attach_scrollbar(&mut self, container: WidgetId, axis: Axis) -> Result<WidgetId> {
        self.make_scrollable(container)?;
        if let Some(bar) = self.scroll_state(container)?.scrollbar(axis) {
            return Ok(bar);
        }

        let theme = self.theme();
        let thickness = theme.scrollbar_thickness;
        let widget = Widget::Scrollbar {
            axis,
            track_color: theme.scrollbar_track,
            thumb_color: theme.scrollbar_thumb,
        };
        let bar = self.insert_control(container, widget)?;
        let (position, size) = match axis {
            Axis::Vertical => (
                Position::new(Coord::End(0), Coord::Start(0)),
                Size::new(Extent::Fixed(thickness), Extent::fill()),
            ),
            Axis::Horizontal => (
                Position::new(Coord::Start(0), Coord::End(0)),
                Size::new(Extent::fill(), Extent::Fixed(thickness)),
            ),
        };
        self.set_position(bar, position)?;
        self.set_size(bar, size)?;

        if let Some(state) = self.get_mut(container).and_then(|n| n.scroll.as_mut()) {
            state.set_scrollbar(axis, bar);
        }
        // Starts hidden; refresh shows it if the content overflows.
        if let Some(node) = self.get_mut(bar) {
            node.visible = false;
            node.enabled = false;
        }
        self.generation += 1;
        self.refresh_scrollbars(container);
        log::debug!("attached {:?} scrollbar {:?} to {:?}", axis, bar, container);
        Ok(bar)
    }

    fn scroll_state(&self, id: WidgetId) -> Result<ScrollState> {
        let node = self.get(id).ok_or(GuiError::UnknownWidget(id))?;
        node.scroll.ok_or(GuiError::MissingCapability {
            id,
            widget: node.widget.name(),
            capability: "scrolling",
        })
    }

    pub fn is_scrollable(&self, id: WidgetId) -> bool {
        self.get(id).is_some_and(|n| n.scroll.is_some())
    }

    /// Current scroll fraction along `axis`.
    pub fn scroll_offset(&self, id: WidgetId, axis: Axis) -> Result<f32> {
        Ok(self.scroll_state(id)?.offset(axis))
    }

    /// Set the scroll fraction along `axis`, clamped into `[0, 1]`. Posts
    /// `ScrollChange` when the stored fraction actually changes.
    pub fn set_scroll_offset(&mut self, id: WidgetId, axis: Axis, fraction: f32) -> Result<()> {
        let before = self.scroll_state(id)?.offset(axis);
        let Some(state) = self.get_mut(id).and_then(|n| n.scroll.as_mut()) else {
            return Ok(());
        };
        state.set_offset(axis, fraction);
        let after = state.offset(axis);
        if after != before {
            self.generation += 1;
            self.post(
                id,
                ComponentEvent::ScrollChange {
                    axis,
                    offset: after,
                },
            );
        }
        Ok(())
    }

    /// Scroll by a pixel delta (positive = toward the end). No-op while the
    /// content fits.
    pub fn scroll_by_pixels(&mut self, id: WidgetId, axis: Axis, delta: i32) -> Result<()> {
        let current = self.scroll_state(id)?.offset(axis);
        let range = self.scroll_range(id, axis);
        if range <= 0 {
            return Ok(());
        }
        self.set_scroll_offset(id, axis, current + delta as f32 / range as f32)
    }

    /// Scrollable distance in pixels: content beyond the inner extent.
    pub fn scroll_range(&self, id: WidgetId, axis: Axis) -> i32 {
        (self.content_size(id).along(axis) - self.inner_size(id).along(axis)).max(0)
    }

    /// Pixel translation applied to the non-fixed children of `id`. Zero
    /// for non-scrollable widgets.
    pub fn scroll_translation(&self, id: WidgetId) -> Point {
        let Some(state) = self.get(id).and_then(|n| n.scroll) else {
            return Point::ZERO;
        };
        let shift = |axis: Axis| -> i32 {
            let fraction = state.offset(axis);
            if fraction == 0.0 {
                return 0;
            }
            -((fraction * self.scroll_range(id, axis) as f32).round() as i32)
        };
        Point::new(shift(Axis::Horizontal), shift(Axis::Vertical))
    }

    /// Whether the content overflows the space left for it along `axis`:
    /// the padded area minus whatever the other, visible bar reserves.
    pub fn needs_scrollbar(&self, id: WidgetId, axis: Axis) -> bool {
        self.content_size(id).along(axis) > self.inner_size(id).along(axis)
    }

    /// Space taken from the inner size by visible scrollbars: a vertical bar
    /// reserves width, a horizontal bar reserves height.
    ///
    /// Bars fill their owner's inner extent, so the thickness comes from the
    /// bar's declaration, never from its evaluated size.
    pub(crate) fn scrollbar_reservation(&self, id: WidgetId) -> Dimension {
        let Some(state) = self.get(id).and_then(|n| n.scroll) else {
            return Dimension::ZERO;
        };
        let reserved = |axis: Axis| -> i32 {
            state
                .scrollbar(axis)
                .filter(|&bar| self.is_visible(bar))
                .map_or(0, |bar| self.bar_thickness(bar, axis))
        };
        Dimension::new(reserved(Axis::Vertical), reserved(Axis::Horizontal))
    }

    /// Cross-axis extent of a bar running along `axis`. Anything other than
    /// a fixed declaration reserves the theme thickness.
    fn bar_thickness(&self, bar: WidgetId, axis: Axis) -> i32 {
        match self.get(bar).map(|n| n.size.extent(axis.other())) {
            Some(Extent::Fixed(thickness)) => (*thickness).max(0),
            _ => self.theme().scrollbar_thickness,
        }
    }

    /// Re-evaluate scrollbar auto-hide for `id`: a bar is visible and
    /// enabled exactly while its axis needs scrolling. Hiding a bar resets
    /// its fraction to 0; showing it clamps the fraction into `[0, 1]`.
    pub(crate) fn refresh_scrollbars(&mut self, id: WidgetId) {
        let Some(state) = self.get(id).and_then(|n| n.scroll) else {
            return;
        };
        // Toggling one bar changes the space left beside the other one.
        for _ in 0..3 {
            let mut toggled = false;
            for axis in [Axis::Horizontal, Axis::Vertical] {
                let Some(bar) = state.scrollbar(axis) else {
                    continue;
                };
                let needed = self.needs_scrollbar(id, axis);
                if self.is_visible(bar) == needed {
                    continue;
                }
                if let Some(node) = self.get_mut(bar) {
                    node.visible = needed;
                    node.enabled = needed;
                }
                if let Some(scroll) = self.get_mut(id).and_then(|n| n.scroll.as_mut()) {
                    let fraction = if needed { scroll.offset(axis) } else { 0.0 };
                    scroll.set_offset(axis, fraction);
                }
                self.generation += 1;
                toggled = true;
                log::debug!(
                    "{:?} scrollbar of {:?} {}",
                    axis,
                    id,
                    if needed { "shown" } else { "hidden" }
                );
            }
            if !toggled {
                break;
            }
        }
    }

    pub(crate) fn refresh_all_scrollbars(&mut self) {
        let scrollable: Vec<WidgetId> = self
            .arena
            .iter()
            .filter(|(_, n)| n.scroll.is_some())
            .map(|(id, _)| id)
            .collect();
        for id in scrollable {
            self.refresh_scrollbars(id);
        }
    }

    /// Thumb of a scrollbar as (start, length) along the bar's own axis,
    /// relative to the bar's origin. The length is proportional to the
    /// visible share of the content, never below the theme minimum and
    /// never beyond the track.
    pub fn scrollbar_thumb(&self, bar: WidgetId) -> Option<(i32, i32)> {
        let node = self.get(bar)?;
        let Widget::Scrollbar { axis, .. } = node.widget else {
            return None;
        };
        let owner = node.parent?;
        let fraction = self.scroll_offset(owner, axis).ok()?;
        let track = self.size(bar).along(axis);
        let content = self.content_size(owner).along(axis);
        let visible = self.inner_size(owner).along(axis);
        if track <= 0 {
            return Some((0, 0));
        }
        let length = if content <= 0 {
            track
        } else {
            ((track as i64 * visible as i64 / content as i64) as i32)
                .max(self.theme().min_thumb_length)
                .min(track)
        };
        let start = ((track - length) as f32 * fraction).round() as i32;
        Some((start, length))
    }
}
