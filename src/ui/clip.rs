use super::geometry::ClipArea;
use super::{Screen, WidgetId};

impl Screen {
    /// The widget's own clip area: its inner rectangle on screen, or
    /// `NoClip` if it does not clip its content.
    pub fn clip_area(&self, id: WidgetId) -> ClipArea {
        let Some(node) = self.get(id) else {
            return ClipArea::NoClip;
        };
        if !node.clip_content {
            return ClipArea::NoClip;
        }
        let origin = self.screen_position(id);
        let inner = self.inner_size(id);
        let x = origin.x + node.padding.left;
        let y = origin.y + node.padding.top;
        ClipArea::new(x, y, x + inner.width, y + inner.height)
    }

    /// Clip area applied when drawing the widget's children: its own clip
    /// intersected with every ancestor's. Stops early on `FullClip`.
    pub fn intersected_clip_area(&self, id: WidgetId) -> ClipArea {
        let mut clip = ClipArea::NoClip;
        for ancestor in self.ancestors(id) {
            clip = clip.intersect(self.clip_area(ancestor));
            if clip.is_full_clip() {
                break;
            }
        }
        clip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{Padding, Position, Size, Theme, Widget};

    fn clipped_panel(
        s: &mut Screen,
        parent: WidgetId,
        pos: (i32, i32),
        size: (i32, i32),
        pad: i32,
    ) -> WidgetId {
        let id = s
            .insert(parent, Widget::Panel { background: None })
            .expect("panel");
        s.set_position(id, Position::fixed(pos.0, pos.1)).expect("pos");
        s.set_size(id, Size::fixed(size.0, size.1)).expect("size");
        s.set_padding(id, Padding::all(pad)).expect("padding");
        s.set_clip_content(id, true).expect("clip");
        id
    }

    #[test]
    fn own_clip_is_inner_rect() {
        let mut s = Screen::new(200, 150, Theme::default());
        let root = s.root();
        let p = clipped_panel(&mut s, root, (10, 10), (100, 80), 3);
        assert_eq!(s.clip_area(p), ClipArea::new(13, 13, 107, 87));
        assert_eq!(s.intersected_clip_area(p), ClipArea::new(13, 13, 107, 87));

        s.set_clip_content(p, false).expect("clip");
        assert!(s.clip_area(p).is_no_clip());
    }

    #[test]
    fn nested_clip_is_within_every_ancestor() {
        let mut s = Screen::new(200, 150, Theme::default());
        let root = s.root();
        let outer = clipped_panel(&mut s, root, (10, 10), (100, 80), 3);
        let inner = clipped_panel(&mut s, outer, (50, 40), (100, 100), 2);

        let clip = s.intersected_clip_area(inner);
        // Inner's own area is (62,52)..(158,148); outer cuts it at (107,87).
        assert_eq!(s.clip_area(inner), ClipArea::new(62, 52, 158, 148));
        assert_eq!(clip, ClipArea::new(62, 52, 107, 87));
        assert!(clip.is_within(&s.clip_area(outer)));
        assert!(clip.is_within(&s.clip_area(inner)));
    }

    #[test]
    fn disjoint_ancestor_clips_everything() {
        let mut s = Screen::new(200, 150, Theme::default());
        let root = s.root();
        let outer = clipped_panel(&mut s, root, (0, 0), (20, 20), 0);
        let inner = clipped_panel(&mut s, outer, (30, 30), (10, 10), 0);
        assert!(s.intersected_clip_area(inner).is_full_clip());
    }

    #[test]
    fn padding_larger_than_size_is_full_clip() {
        let mut s = Screen::new(200, 150, Theme::default());
        let root = s.root();
        let p = clipped_panel(&mut s, root, (0, 0), (10, 10), 6);
        assert!(s.clip_area(p).is_full_clip());
    }
}
