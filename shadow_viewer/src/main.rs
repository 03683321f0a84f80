mod material;
mod model;
mod obj;
mod scene;
mod shader;
mod texture;

use log::{error, info};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::{KeyboardState, Keycode, Scancode};
use sdl2::mouse::MouseButton;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;
use sdl2::render::{Canvas, Texture as DisplayTexture, TextureAccess, TextureCreator};
use sdl2::video::{Window, WindowContext};
use thiserror::Error;

use rasterizer::Framebuffer;

use crate::obj::ModelError;
use crate::scene::camera::MoveDirection;
use crate::scene::{renderer, shadow, FrameContext, SceneAssets, ShadowPass};

const WINDOW_TITLE: &str = "shadow viewer";
const WINDOW_WIDTH: u32 = 1600;
const WINDOW_HEIGHT: u32 = 1200;

// Arrow keys feed the camera's look path as simulated cursor deltas.
const ARROW_LOOK_RATE: f32 = 500.0;

#[derive(Debug, Error)]
enum ViewerError {
    #[error("window system error: {0}")]
    Window(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        error!("fatal: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), ViewerError> {
    let sdl = sdl2::init().map_err(ViewerError::Window)?;
    let video = sdl.video().map_err(ViewerError::Window)?;
    let window = video
        .window(WINDOW_TITLE, WINDOW_WIDTH, WINDOW_HEIGHT)
        .position_centered()
        .resizable()
        .build()
        .map_err(|e| ViewerError::Window(e.to_string()))?;
    let mut canvas = window
        .into_canvas()
        .build()
        .map_err(|e| ViewerError::Window(e.to_string()))?;
    let texture_creator = canvas.texture_creator();

    let assets = SceneAssets::load()?;
    let mut shadow_pass = ShadowPass::new();
    let mut ctx = FrameContext::new(WINDOW_WIDTH, WINDOW_HEIGHT);

    let mut display = create_display_texture(&texture_creator, WINDOW_WIDTH, WINDOW_HEIGHT)?;
    let mut pixels = vec![0u8; (4 * WINDOW_WIDTH * WINDOW_HEIGHT) as usize];

    info!("entering frame loop");
    let mut event_pump = sdl.event_pump().map_err(ViewerError::Window)?;
    'running: loop {
        let delta = ctx.clock.tick();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::Window {
                    win_event: WindowEvent::SizeChanged(width, height),
                    ..
                } => {
                    let (width, height) = (width.max(1) as u32, height.max(1) as u32);
                    ctx.resize(width, height);
                    display = create_display_texture(&texture_creator, width, height)?;
                    pixels.resize((4 * width * height) as usize, 0);
                }
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } => ctx.orientation.begin_drag(x as f32, y as f32),
                Event::MouseButtonUp {
                    mouse_btn: MouseButton::Left,
                    ..
                } => ctx.orientation.end_drag(),
                Event::MouseMotion { x, y, .. } if ctx.orientation.is_dragging() => {
                    ctx.orientation.drag_to(x as f32, y as f32)
                }
                Event::MouseWheel { y, .. } => ctx.camera.zoom(y as f32),
                _ => {}
            }
        }

        process_keys(&event_pump.keyboard_state(), &mut ctx, delta);

        // Depth pass first; the color pass reads the map it just wrote,
        // under the same light-space transform.
        let light_space = shadow::light_space_transform();
        shadow_pass.render(&assets, &ctx.orientation, light_space);

        let aspect = ctx.aspect();
        renderer::render(
            &mut ctx.rasterizer,
            &ctx.camera,
            aspect,
            &assets,
            &ctx.orientation,
            shadow_pass.depth_map(),
            light_space,
        );

        present(
            &mut canvas,
            &mut display,
            ctx.rasterizer.framebuffer(),
            &mut pixels,
        )
        .map_err(ViewerError::Window)?;
        log::trace!("frame stages: {:?}", ctx.rasterizer.frametime());
    }

    Ok(())
}

fn process_keys(keys: &KeyboardState, ctx: &mut FrameContext, delta: f32) {
    if keys.is_scancode_pressed(Scancode::W) {
        ctx.camera.translate(MoveDirection::Forward, delta);
    }
    if keys.is_scancode_pressed(Scancode::S) {
        ctx.camera.translate(MoveDirection::Backward, delta);
    }
    if keys.is_scancode_pressed(Scancode::A) {
        ctx.camera.translate(MoveDirection::Left, delta);
    }
    if keys.is_scancode_pressed(Scancode::D) {
        ctx.camera.translate(MoveDirection::Right, delta);
    }

    let look = delta * ARROW_LOOK_RATE;
    if keys.is_scancode_pressed(Scancode::Up) {
        ctx.camera.look(0.0, look);
    }
    if keys.is_scancode_pressed(Scancode::Down) {
        ctx.camera.look(0.0, -look);
    }
    if keys.is_scancode_pressed(Scancode::Left) {
        ctx.camera.look(-look, 0.0);
    }
    if keys.is_scancode_pressed(Scancode::Right) {
        ctx.camera.look(look, 0.0);
    }
}

fn create_display_texture(
    creator: &TextureCreator<WindowContext>,
    width: u32,
    height: u32,
) -> Result<DisplayTexture<'_>, ViewerError> {
    creator
        .create_texture(PixelFormatEnum::RGBA32, TextureAccess::Streaming, width, height)
        .map_err(|e| ViewerError::Window(e.to_string()))
}

fn present(
    canvas: &mut Canvas<Window>,
    display: &mut DisplayTexture,
    framebuffer: &Framebuffer,
    pixels: &mut [u8],
) -> Result<(), String> {
    for (index, (_, _, color)) in framebuffer.color().enumerate() {
        pixels[index * 4] = (color.x * 255.0) as u8;
        pixels[index * 4 + 1] = (color.y * 255.0) as u8;
        pixels[index * 4 + 2] = (color.z * 255.0) as u8;
        pixels[index * 4 + 3] = 255;
    }

    let rect = Rect::new(0, 0, framebuffer.width(), framebuffer.height());
    display
        .update(rect, pixels, (4 * framebuffer.width()) as usize)
        .map_err(|e| e.to_string())?;
    canvas.copy(display, rect, rect)?;
    canvas.present();
    Ok(())
}
