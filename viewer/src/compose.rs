//! Room layer compositing.
//!
//! A room is drawn as up to four stacked photo layers: the bare room, the
//! wall-panel shot, the ceiling-panel shot, and the fully treated shot.
//! Toggles reveal layers; with both panels on, the fully treated shot sits
//! on top. Missing layers degrade to flat washes so the toggles stay
//! visible before the preloader has warmed anything.

use engine::graphics::{Color, Renderer2d, RgbaImage};
use engine::ui::Rect;

use crate::room::{PanelConfig, Room};

/// Decoded layers for the room being shown; any of them may be absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomLayers<'a> {
    pub base: Option<&'a RgbaImage>,
    pub wall: Option<&'a RgbaImage>,
    pub ceiling: Option<&'a RgbaImage>,
    pub full: Option<&'a RgbaImage>,
}

/// Flat stand-in color while a room's base photo is unavailable.
pub fn placeholder_color(room: Room) -> Color {
    match room {
        Room::Office => [64, 96, 140, 255],
        Room::Classroom => [150, 120, 70, 255],
        Room::Hospital => [110, 150, 130, 255],
        Room::Cinema => [90, 50, 60, 255],
    }
}

const WALL_WASH: Color = [220, 220, 210, 255];
const CEILING_WASH: Color = [190, 200, 215, 255];
const WASH_ALPHA: u8 = 70;

pub fn draw_room(
    gfx: &mut dyn Renderer2d,
    rect: Rect,
    room: Room,
    panels: PanelConfig,
    layers: RoomLayers<'_>,
) {
    if rect.w == 0 || rect.h == 0 {
        return;
    }

    match layers.base {
        Some(image) => gfx.blit_scaled(image, rect),
        None => gfx.fill_rect(rect, placeholder_color(room)),
    }

    if panels.walls {
        draw_layer(gfx, rect, layers.wall, WALL_WASH);
    }
    if panels.ceiling {
        draw_layer(gfx, rect, layers.ceiling, CEILING_WASH);
    }
    if panels.walls && panels.ceiling {
        // The fully treated shot wins when present; otherwise the two
        // washes above already mark both treatments.
        if let Some(image) = layers.full {
            gfx.blit_scaled(image, rect);
        }
    }
}

fn draw_layer(gfx: &mut dyn Renderer2d, rect: Rect, layer: Option<&RgbaImage>, wash: Color) {
    match layer {
        Some(image) => gfx.blit_scaled(image, rect),
        None => gfx.blend_rect(rect, wash, WASH_ALPHA),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::graphics::CpuRenderer;
    use engine::surface::SurfaceSize;

    fn render(room: Room, panels: PanelConfig, layers: RoomLayers<'_>) -> Vec<u8> {
        let size = SurfaceSize::new(32, 18);
        let mut buf = vec![0u8; size.rgba_len()];
        let mut gfx = CpuRenderer::new(&mut buf, size);
        draw_room(&mut gfx, Rect::from_size(32, 18), room, panels, layers);
        buf
    }

    #[test]
    fn placeholder_colors_are_distinct_per_room() {
        let mut seen = std::collections::HashSet::new();
        for room in Room::ALL {
            seen.insert(placeholder_color(room));
        }
        assert_eq!(seen.len(), Room::ALL.len());
    }

    #[test]
    fn missing_base_falls_back_to_the_room_wash() {
        let frame = render(Room::Cinema, PanelConfig::NONE, RoomLayers::default());
        let expected = placeholder_color(Room::Cinema);
        assert_eq!(&frame[0..4], &expected);
    }

    #[test]
    fn toggling_walls_changes_the_frame() {
        let plain = render(Room::Office, PanelConfig::NONE, RoomLayers::default());
        let walls = render(
            Room::Office,
            PanelConfig {
                walls: true,
                ceiling: false,
            },
            RoomLayers::default(),
        );
        assert_ne!(plain, walls);
    }

    #[test]
    fn full_shot_covers_the_washes_when_both_panels_on() {
        let full_image = RgbaImage::solid(4, 4, [1, 2, 3, 255]);
        let layers = RoomLayers {
            full: Some(&full_image),
            ..RoomLayers::default()
        };
        let frame = render(
            Room::Office,
            PanelConfig {
                walls: true,
                ceiling: true,
            },
            layers,
        );
        assert_eq!(&frame[0..4], &[1, 2, 3, 255]);
    }

    #[test]
    fn base_layer_is_drawn_when_present() {
        let base = RgbaImage::solid(4, 4, [10, 20, 30, 255]);
        let layers = RoomLayers {
            base: Some(&base),
            ..RoomLayers::default()
        };
        let frame = render(Room::Hospital, PanelConfig::NONE, layers);
        assert_eq!(&frame[0..4], &[10, 20, 30, 255]);
    }
}
