//! Desktop and mobile layouts for the viewer chrome.
//!
//! One breakpoint, two arrangements: desktop puts a five-column control
//! strip under the 16:9 viewer; mobile stacks the controls below it. Both
//! expose the same buttons and share all behavior.

use engine::surface::SurfaceSize;
use engine::ui::{Anchor, Insets, Rect};

/// Below this viewport width the mobile presentation is used.
pub const MOBILE_BREAKPOINT: u32 = 768;

pub fn is_mobile(viewport_width: u32) -> bool {
    viewport_width < MOBILE_BREAKPOINT
}

const MARGIN: u32 = 16;
const GAP: u32 = 8;
const LABEL_H: u32 = 48;
const DESKTOP_STRIP_H: u32 = 120;
const MOBILE_ROW_H: u32 = 48;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewerLayout {
    pub mobile: bool,
    /// The 16:9 room/video area.
    pub viewer: Rect,
    /// The sign-board strip above the viewer.
    pub label: Rect,
    pub prev_button: Rect,
    pub next_button: Rect,
    pub walls_button: Rect,
    pub ceiling_button: Rect,
    pub ambient_button: Rect,
    /// The decorative audio-preview meter.
    pub preview: Rect,
}

pub fn layout(size: SurfaceSize) -> ViewerLayout {
    if is_mobile(size.width) {
        mobile_layout(size)
    } else {
        desktop_layout(size)
    }
}

fn desktop_layout(size: SurfaceSize) -> ViewerLayout {
    let content = Rect::from_size(size.width, size.height).inset(Insets::all(MARGIN));

    let label = Rect::new(content.x, content.y, content.w, LABEL_H.min(content.h));
    let below_label = content.inset(Insets {
        top: LABEL_H + GAP,
        ..Insets::ZERO
    });

    let strip_h = DESKTOP_STRIP_H.min(below_label.h);
    let viewer_area = below_label.inset(Insets {
        bottom: strip_h + GAP,
        ..Insets::ZERO
    });
    let viewer = viewer_area.fit_aspect(16, 9, Anchor::TopCenter);

    let strip = Rect::new(
        below_label.x,
        below_label.y + below_label.h.saturating_sub(strip_h),
        below_label.w,
        strip_h,
    );
    let columns = strip.split_columns(5, GAP);
    let panel_rows = columns[1].split_rows(2, GAP);

    ViewerLayout {
        mobile: false,
        viewer,
        label,
        prev_button: columns[0],
        walls_button: panel_rows[0],
        ceiling_button: panel_rows[1],
        preview: columns[2],
        ambient_button: columns[3],
        next_button: columns[4],
    }
}

fn mobile_layout(size: SurfaceSize) -> ViewerLayout {
    let content = Rect::from_size(size.width, size.height).inset(Insets::all(GAP));

    let label = Rect::new(content.x, content.y, content.w, LABEL_H.min(content.h));
    let below_label = content.inset(Insets {
        top: LABEL_H + GAP,
        ..Insets::ZERO
    });

    let viewer = below_label.fit_aspect(16, 9, Anchor::TopCenter);
    let mut cursor_y = viewer.y + viewer.h + GAP;

    let mut next_row = || {
        let row = Rect::new(content.x, cursor_y, content.w, MOBILE_ROW_H);
        cursor_y += MOBILE_ROW_H + GAP;
        row
    };

    let nav = next_row().split_columns(2, GAP);
    let panels = next_row().split_columns(2, GAP);
    let preview = next_row();
    let ambient_button = next_row();

    ViewerLayout {
        mobile: true,
        viewer,
        label,
        prev_button: nav[0],
        next_button: nav[1],
        walls_button: panels[0],
        ceiling_button: panels[1],
        preview,
        ambient_button,
    }
}
