use std::error::Error;
use std::time::{Duration, Instant};

use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::graphics::Renderer2d;
use crate::pixels_renderer::PixelsRenderer2d;
use crate::surface::SurfaceSize;
use crate::view_tree::{UiInput, ViewTree, hit_test_actions};

pub struct AppConfig {
    pub title: String,
    pub desired_size: PhysicalSize<u32>,
    pub clamp_to_monitor: bool,
    pub vsync: Option<bool>,
}

pub struct AppContext {
    pub window: Window,
    pub renderer: PixelsRenderer2d,
    pub surface_size: SurfaceSize,
}

/// A widget driven by the windowed event loop.
///
/// Each redraw: the view tree is built, pointer input is hit-tested into
/// actions, `update` advances widget state (including any owned media
/// elements), and the rebuilt view is rendered.
pub trait WidgetApp {
    type Action: Clone;

    fn build_view(&self, ctx: &AppContext) -> ViewTree<Self::Action>;

    fn update(
        &mut self,
        input: UiInput,
        dt: Duration,
        actions: &[Self::Action],
        ctx: &mut AppContext,
    );

    fn render(&mut self, view: &ViewTree<Self::Action>, gfx: &mut dyn Renderer2d);

    /// First chance at raw window events; return `true` to consume.
    fn handle_event(
        &mut self,
        _event: &Event<()>,
        _input: &mut UiInput,
        _ctx: &mut AppContext,
        _control_flow: &mut ControlFlow,
    ) -> bool {
        false
    }
}

pub fn run_widget<W: WidgetApp + 'static>(
    config: AppConfig,
    mut widget: W,
) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new();
    let monitor_size = if config.clamp_to_monitor {
        event_loop.primary_monitor().map(|m| m.size())
    } else {
        None
    };
    let initial_size = if let Some(monitor) = monitor_size {
        PhysicalSize::new(
            config.desired_size.width.min(monitor.width),
            config.desired_size.height.min(monitor.height),
        )
    } else {
        config.desired_size
    };
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(initial_size)
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_size = SurfaceSize::new(window_size.width, window_size.height);

    let pixels = build_pixels(&window, surface_size, config.vsync)?;
    let renderer = PixelsRenderer2d::new(pixels, surface_size)?;

    let mut ctx = AppContext {
        window,
        renderer,
        surface_size,
    };
    let mut input = UiInput::default();
    let mut last_frame = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        if widget.handle_event(&event, &mut input, &mut ctx, control_flow) {
            return;
        }

        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    ctx.surface_size = SurfaceSize::new(size.width, size.height);
                    if let Err(err) = ctx.renderer.resize(ctx.surface_size) {
                        eprintln!("resize failed: {err}");
                    }
                    ctx.window.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input.mouse_pos = Some((position.x.max(0.0) as u32, position.y.max(0.0) as u32));
                }
                WindowEvent::MouseInput {
                    state: mouse_state,
                    button,
                    ..
                } => {
                    if *button == MouseButton::Left {
                        match mouse_state {
                            ElementState::Pressed => input.mouse_down = true,
                            ElementState::Released => input.mouse_up = true,
                        }
                    }
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                let view_for_input = widget.build_view(&ctx);
                let actions = hit_test_actions(&view_for_input, input);
                widget.update(input, dt, &actions, &mut ctx);

                let view_for_render = widget.build_view(&ctx);
                let draw_res = ctx.renderer.draw_frame(|gfx| {
                    widget.render(&view_for_render, gfx);
                });
                if let Err(err) = draw_res {
                    eprintln!("draw failed: {err}");
                }
                if let Err(err) = ctx.renderer.present() {
                    eprintln!("present failed: {err}");
                }

                input.mouse_down = false;
                input.mouse_up = false;
            }
            Event::MainEventsCleared => {
                ctx.window.request_redraw();
            }
            _ => {}
        }
    });

    #[allow(unreachable_code)]
    Ok(())
}

fn build_pixels(
    window: &Window,
    size: SurfaceSize,
    vsync: Option<bool>,
) -> Result<Pixels, pixels::Error> {
    let surface_texture = SurfaceTexture::new(size.width, size.height, window);
    let mut builder = PixelsBuilder::new(size.width, size.height, surface_texture);
    if let Some(vsync) = vsync {
        builder = builder.enable_vsync(vsync);
    }
    builder.build()
}
