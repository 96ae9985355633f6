use std::error::Error;
use std::time::{Duration, Instant};

use engine::app::{AppConfig, AppContext, WidgetApp, run_widget};
use engine::graphics::{Color, Renderer2d, text_width};
use engine::media::{AudioElement, MediaError};
use engine::view_tree::{
    ButtonNode, PanelNode, TextNode, UiInput, ViewNode, ViewTree, hovered_button,
};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, VirtualKeyCode, WindowEvent};
use winit::event_loop::ControlFlow;

use viewer::assets;
use viewer::compose::{self, RoomLayers};
use viewer::controller::PlaybackController;
use viewer::layout;
use viewer::media_io::{FsFetch, FsVideo, ImageCache, RodioAudio};
use viewer::preload_plan::ViewerPreloader;
use viewer::remote::{self, RemoteServer};
use viewer::settings::{SettingsStore, ViewerSettings};
use viewer::state::{ViewerEvent, ViewerState};

// Stable node ids for hover styling.
const ID_PREV: u32 = 1;
const ID_NEXT: u32 = 2;
const ID_WALLS: u32 = 3;
const ID_CEILING: u32 = 4;
const ID_AMBIENT: u32 = 5;

const BACKDROP: Color = [26, 58, 74, 255];
const PANEL_BG: Color = [244, 246, 248, 255];
const BUTTON_BG: Color = [229, 231, 235, 255];
const BUTTON_BG_HOVER: Color = [64, 125, 213, 255];
const BUTTON_BG_ACTIVE: Color = [64, 125, 213, 255];
const BUTTON_TEXT: Color = [75, 85, 99, 255];
const BUTTON_TEXT_STRONG: Color = [255, 255, 255, 255];
const LABEL_TEXT: Color = [255, 255, 255, 255];
const VIDEO_FILL: Color = [8, 10, 12, 255];
const METER_FILL: Color = [64, 125, 213, 255];

fn main() -> Result<(), Box<dyn Error>> {
    let settings = SettingsStore::from_env().load();

    let desired = PhysicalSize::new(
        env_u32("ROOMVIEW_WINDOW_WIDTH").unwrap_or(1280).max(1),
        env_u32("ROOMVIEW_WINDOW_HEIGHT").unwrap_or(800).max(1),
    );
    let config = AppConfig {
        title: "Acoustic Room Viewer".to_string(),
        desired_size: desired,
        clamp_to_monitor: true,
        vsync: None,
    };

    let app = HeadfulApp::new(settings)?;
    run_widget(config, app)
}

/// Ambient output with graceful degradation: when no audio device exists
/// the viewer keeps running, it just stays quiet.
enum AmbientOut {
    Device(Box<RodioAudio>),
    Muted,
}

impl AudioElement for AmbientOut {
    fn set_source(&mut self, path: &str) {
        if let AmbientOut::Device(audio) = self {
            audio.set_source(path);
        }
    }

    fn set_looping(&mut self, looping: bool) {
        if let AmbientOut::Device(audio) = self {
            audio.set_looping(looping);
        }
    }

    fn set_volume(&mut self, volume: f32) {
        if let AmbientOut::Device(audio) = self {
            audio.set_volume(volume);
        }
    }

    fn play(&mut self) -> Result<(), MediaError> {
        match self {
            AmbientOut::Device(audio) => audio.play(),
            AmbientOut::Muted => Ok(()),
        }
    }

    fn pause(&mut self) {
        if let AmbientOut::Device(audio) = self {
            audio.pause();
        }
    }

    fn rewind(&mut self) {
        if let AmbientOut::Device(audio) = self {
            audio.rewind();
        }
    }
}

struct HeadfulApp {
    controller: PlaybackController<FsVideo, AmbientOut>,
    preloader: ViewerPreloader,
    fetch: FsFetch,
    images: ImageCache,
    remote: Option<RemoteServer>,
    hovered: Option<u32>,
}

impl HeadfulApp {
    fn new(settings: ViewerSettings) -> Result<Self, Box<dyn Error>> {
        let root = settings.asset_root.clone();
        let hold = Duration::from_millis(settings.display.transition_hold_ms);

        let audio = match RodioAudio::new(&root) {
            Ok(audio) => AmbientOut::Device(Box::new(audio)),
            Err(err) => {
                eprintln!("warning: audio disabled: {err}");
                AmbientOut::Muted
            }
        };

        let state = ViewerState::new()
            .with_ambient_volume(settings.audio.effective_ambient_volume());
        let controller = PlaybackController::new(
            state,
            FsVideo::new(&root, hold),
            FsVideo::new(&root, hold),
            audio,
        )
        .with_mobile_breakpoint(settings.display.mobile_breakpoint);

        let remote = match env_u16("ROOMVIEW_REMOTE_PORT").unwrap_or(0) {
            0 => None,
            port => match RemoteServer::start(port) {
                Ok(server) => {
                    println!("remote control: http://{}", server.info.addr);
                    Some(server)
                }
                Err(err) => {
                    eprintln!("warning: failed to start remote control on 127.0.0.1:{port}: {err}");
                    None
                }
            },
        };

        Ok(Self {
            controller,
            preloader: ViewerPreloader::new(Instant::now()),
            fetch: FsFetch::new(&root),
            images: ImageCache::new(&root),
            remote,
            hovered: None,
        })
    }
}

impl WidgetApp for HeadfulApp {
    type Action = ViewerEvent;

    fn build_view(&self, ctx: &AppContext) -> ViewTree<ViewerEvent> {
        let l = layout::layout(ctx.surface_size);
        let state = self.controller.state();
        let navigating = state.is_transitioning();

        let mut view = ViewTree::new();
        view.push(ViewNode::Panel(PanelNode { rect: l.viewer }));
        view.push(ViewNode::Text(TextNode {
            pos: centered_text(l.label, state.room().label(), 4),
            text: state.room().label().to_string(),
            scale: 4,
        }));
        view.push(ViewNode::Button(ButtonNode {
            id: ID_PREV,
            rect: l.prev_button,
            label: format!("< {}", state.room().prev().label()),
            action: ViewerEvent::PrevRoom,
            enabled: !navigating,
            active: false,
        }));
        view.push(ViewNode::Button(ButtonNode {
            id: ID_NEXT,
            rect: l.next_button,
            label: format!("{} >", state.room().next().label()),
            action: ViewerEvent::NextRoom,
            enabled: !navigating,
            active: false,
        }));
        view.push(ViewNode::Button(ButtonNode {
            id: ID_WALLS,
            rect: l.walls_button,
            label: "WALL PANELS".to_string(),
            action: ViewerEvent::ToggleWalls,
            enabled: true,
            active: state.panels().walls,
        }));
        view.push(ViewNode::Button(ButtonNode {
            id: ID_CEILING,
            rect: l.ceiling_button,
            label: "CEILING PANELS".to_string(),
            action: ViewerEvent::ToggleCeiling,
            enabled: true,
            active: state.panels().ceiling,
        }));
        view.push(ViewNode::Button(ButtonNode {
            id: ID_AMBIENT,
            rect: l.ambient_button,
            label: "SOUNDSCAPE".to_string(),
            action: ViewerEvent::ToggleAmbient,
            enabled: true,
            active: state.ambient_enabled(),
        }));
        view
    }

    fn update(
        &mut self,
        input: UiInput,
        _dt: Duration,
        actions: &[ViewerEvent],
        ctx: &mut AppContext,
    ) {
        let width = ctx.surface_size.width;
        self.hovered = hovered_button(&self.build_view(ctx), input.mouse_pos);

        for action in actions {
            self.controller.apply(*action, width);
        }

        let now = Instant::now();
        self.preloader.poll(now, &mut self.fetch);
        for (path, ok) in self.fetch.drain_completions() {
            self.preloader.mark_done(&path, ok, now);
        }

        self.controller.pump();

        remote::drain_remote_commands(
            self.remote.as_mut(),
            &mut self.controller,
            width,
            self.preloader.images_ready(),
            self.preloader.videos_ready(),
        );
    }

    fn render(&mut self, view: &ViewTree<ViewerEvent>, gfx: &mut dyn Renderer2d) {
        gfx.clear(BACKDROP);

        let l = layout::layout(gfx.size());
        let state = *self.controller.state();

        if state.show_video() {
            // No decoder in this build: the transition overlay is a dark
            // hold while the element times the clip out.
            gfx.fill_rect(l.viewer, VIDEO_FILL);
        } else {
            let set = assets::room_images(state.room());
            for path in set.layers() {
                self.images.ensure(path);
            }
            let layers = RoomLayers {
                base: self.images.get(&set.base),
                wall: self.images.get(&set.wall_layer),
                ceiling: self.images.get(&set.ceiling_layer),
                full: self.images.get(&set.full),
            };
            compose::draw_room(gfx, l.viewer, state.room(), state.panels(), layers);
        }

        draw_preview_meter(gfx, l.preview, state.ambient_enabled());

        for node in &view.nodes {
            match node {
                ViewNode::Panel(panel) => gfx.rect_outline(panel.rect, PANEL_BG),
                ViewNode::Text(text) => {
                    gfx.draw_text_scaled(text.pos.0, text.pos.1, &text.text, LABEL_TEXT, text.scale);
                }
                ViewNode::Button(button) => {
                    let hovered = self.hovered == Some(button.id);
                    let bg = if button.active {
                        BUTTON_BG_ACTIVE
                    } else if hovered && button.enabled {
                        BUTTON_BG_HOVER
                    } else {
                        BUTTON_BG
                    };
                    let fg = if button.active || (hovered && button.enabled) {
                        BUTTON_TEXT_STRONG
                    } else {
                        BUTTON_TEXT
                    };
                    if button.enabled {
                        gfx.fill_rect(button.rect, bg);
                    } else {
                        gfx.blend_rect(button.rect, bg, 128);
                    }
                    gfx.rect_outline(button.rect, PANEL_BG);
                    let (tx, ty) = centered_text(button.rect, &button.label, 2);
                    gfx.draw_text_scaled(tx, ty, &button.label, fg, 2);
                }
            }
        }
    }

    fn handle_event(
        &mut self,
        event: &Event<()>,
        _input: &mut UiInput,
        ctx: &mut AppContext,
        _control_flow: &mut ControlFlow,
    ) -> bool {
        let Event::WindowEvent {
            event: WindowEvent::KeyboardInput { input, .. },
            ..
        } = event
        else {
            return false;
        };
        if input.state != ElementState::Pressed {
            return false;
        }
        let Some(action) = input.virtual_keycode.and_then(key_to_action) else {
            return false;
        };
        self.controller.apply(action, ctx.surface_size.width);
        true
    }
}

fn key_to_action(key: VirtualKeyCode) -> Option<ViewerEvent> {
    match key {
        VirtualKeyCode::Left => Some(ViewerEvent::PrevRoom),
        VirtualKeyCode::Right => Some(ViewerEvent::NextRoom),
        VirtualKeyCode::W => Some(ViewerEvent::ToggleWalls),
        VirtualKeyCode::C => Some(ViewerEvent::ToggleCeiling),
        VirtualKeyCode::S => Some(ViewerEvent::ToggleAmbient),
        _ => None,
    }
}

fn centered_text(rect: engine::ui::Rect, text: &str, scale: u32) -> (u32, u32) {
    let w = text_width(text, scale);
    let x = rect.x + rect.w.saturating_sub(w) / 2;
    let y = rect.y + rect.h.saturating_sub(6 * scale) / 2;
    (x, y)
}

fn draw_preview_meter(gfx: &mut dyn Renderer2d, rect: engine::ui::Rect, ambient_on: bool) {
    gfx.fill_rect(rect, PANEL_BG);
    gfx.rect_outline(rect, BUTTON_BG);
    if rect.w < 24 || rect.h < 12 {
        return;
    }

    // Fixed pseudo-random bar heights; the meter is decorative.
    let bars = 16u32;
    let inner = rect.inset(engine::ui::Insets::all(6));
    let bar_w = (inner.w / (bars * 2)).max(1);
    for i in 0..bars {
        let seed = (i * 37 + 11) % 23;
        let h = if ambient_on {
            (inner.h * (8 + seed % 12)) / 24
        } else {
            inner.h / 10
        };
        let x = inner.x + i * bar_w * 2;
        let y = inner.y + (inner.h - h.min(inner.h)) / 2;
        gfx.fill_rect(engine::ui::Rect::new(x, y, bar_w, h.min(inner.h)), METER_FILL);
    }
}

fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_u16(name: &str) -> Option<u16> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
