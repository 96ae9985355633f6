//! Minimal UI layout primitives.
//!
//! Dependency-free `Rect` math: insets, anchored placement, aspect-ratio
//! fitting, and even row/column splitting for control strips.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_size(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    pub fn size(&self) -> Size {
        Size {
            w: self.w,
            h: self.h,
        }
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x
            && px < self.x.saturating_add(self.w)
            && py >= self.y
            && py < self.y.saturating_add(self.h)
    }

    /// Returns the rectangle inset by `insets` (the inner content area).
    ///
    /// If insets exceed the rect size, the resulting width/height saturate to 0.
    pub fn inset(&self, insets: Insets) -> Self {
        let w = self
            .w
            .saturating_sub(insets.left.saturating_add(insets.right));
        let h = self
            .h
            .saturating_sub(insets.top.saturating_add(insets.bottom));
        Self {
            x: self.x.saturating_add(insets.left),
            y: self.y.saturating_add(insets.top),
            w,
            h,
        }
    }

    /// Places a child of `size` inside this rect using the requested `anchor`.
    ///
    /// If `size` exceeds this rect, it is clamped to fit.
    pub fn place(&self, size: Size, anchor: Anchor) -> Self {
        let w = size.w.min(self.w);
        let h = size.h.min(self.h);

        let x = match anchor {
            Anchor::TopLeft | Anchor::CenterLeft | Anchor::BottomLeft => self.x,
            Anchor::TopCenter | Anchor::Center | Anchor::BottomCenter => {
                self.x.saturating_add(self.w.saturating_sub(w) / 2)
            }
            Anchor::TopRight | Anchor::CenterRight | Anchor::BottomRight => {
                self.x.saturating_add(self.w.saturating_sub(w))
            }
        };

        let y = match anchor {
            Anchor::TopLeft | Anchor::TopCenter | Anchor::TopRight => self.y,
            Anchor::CenterLeft | Anchor::Center | Anchor::CenterRight => {
                self.y.saturating_add(self.h.saturating_sub(h) / 2)
            }
            Anchor::BottomLeft | Anchor::BottomCenter | Anchor::BottomRight => {
                self.y.saturating_add(self.h.saturating_sub(h))
            }
        };

        Self { x, y, w, h }
    }

    /// The largest `aspect_w : aspect_h` rect that fits inside this one,
    /// placed with `anchor`.
    pub fn fit_aspect(&self, aspect_w: u32, aspect_h: u32, anchor: Anchor) -> Self {
        if aspect_w == 0 || aspect_h == 0 || self.w == 0 || self.h == 0 {
            return Self::new(self.x, self.y, 0, 0);
        }

        // Try full width first; fall back to full height if that overflows.
        let h_for_full_w = (self.w as u64 * aspect_h as u64 / aspect_w as u64) as u32;
        let size = if h_for_full_w <= self.h {
            Size::new(self.w, h_for_full_w)
        } else {
            let w_for_full_h = (self.h as u64 * aspect_w as u64 / aspect_h as u64) as u32;
            Size::new(w_for_full_h, self.h)
        };
        self.place(size, anchor)
    }

    /// Splits this rect into `n` equal-width columns separated by `gap`.
    ///
    /// Remainder pixels from integer division are left at the right edge.
    pub fn split_columns(&self, n: u32, gap: u32) -> Vec<Rect> {
        if n == 0 {
            return Vec::new();
        }
        let total_gap = gap.saturating_mul(n.saturating_sub(1));
        let col_w = self.w.saturating_sub(total_gap) / n;
        (0..n)
            .map(|i| {
                Rect::new(
                    self.x.saturating_add(i.saturating_mul(col_w + gap)),
                    self.y,
                    col_w,
                    self.h,
                )
            })
            .collect()
    }

    /// Splits this rect into `n` equal-height rows separated by `gap`.
    pub fn split_rows(&self, n: u32, gap: u32) -> Vec<Rect> {
        if n == 0 {
            return Vec::new();
        }
        let total_gap = gap.saturating_mul(n.saturating_sub(1));
        let row_h = self.h.saturating_sub(total_gap) / n;
        (0..n)
            .map(|i| {
                Rect::new(
                    self.x,
                    self.y.saturating_add(i.saturating_mul(row_h + gap)),
                    self.w,
                    row_h,
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Insets {
    pub const ZERO: Insets = Insets {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub fn all(v: u32) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}
