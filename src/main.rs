use anyhow::{Context, Result};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{error, info, LevelFilter};
use raw_window_handle::HasRawWindowHandle;
use simple_logger::SimpleLogger;
use std::{
    ffi::{CStr, CString},
    mem,
    num::NonZeroU32,
    ptr,
};
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{Event, WindowEvent},
    event_loop::{EventLoop, EventLoopBuilder},
    window::{Window, WindowBuilder},
};

use glcanvas::{config::rendering::load_or_create_config, gl_check, ShaderProgram};

const QUAD_VERTICES: [f32; 8] = [
    -0.5, -0.5, // 0
    0.5, -0.5, // 1
    0.5, 0.5, // 2
    -0.5, 0.5, // 3
];

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

struct App {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    program: ShaderProgram,
    vao: u32,
    vbo: u32,
    ebo: u32,
}

impl App {
    fn new() -> Result<(Self, EventLoop<()>)> {
        SimpleLogger::new().with_level(LevelFilter::Info).init()?;
        info!("Initializing application...");

        let config = load_or_create_config()?;

        let event_loop = EventLoopBuilder::new().build()?;
        let window_builder = WindowBuilder::new()
            .with_title(&config.window_title)
            .with_inner_size(LogicalSize::new(config.window_width, config.window_height));

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_depth_size(24)
            .with_stencil_size(8);

        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .unwrap()
            })
            .unwrap();

        let window = window.unwrap();
        let raw_window_handle = window.raw_window_handle();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Compatibility)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();

        let gl_context = unsafe {
            gl_display
                .create_context(&gl_config, &context_attributes)
                .expect("Failed to create OpenGL context")
        };

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe {
            gl_config
                .display()
                .create_window_surface(&gl_config, &attrs)
                .expect("Failed to create GL surface")
        };

        let gl_context = gl_context
            .make_current(&gl_surface)
            .expect("Failed to make context current");

        if config.vsync {
            gl_surface
                .set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::new(1).unwrap()))
                .context("Failed to enable vsync")?;
        }

        // Load OpenGL functions
        gl::load_with(|symbol| {
            let symbol = CString::new(symbol).unwrap();
            gl_display.get_proc_address(symbol.as_c_str()) as *const _
        });

        let version = unsafe { CStr::from_ptr(gl::GetString(gl::VERSION) as *const _) };
        info!("OpenGL version: {}", version.to_string_lossy());

        let size = window.inner_size();
        let [r, g, b, a] = config.clear_color;
        gl_check!(unsafe { gl::Viewport(0, 0, size.width as i32, size.height as i32) })?;
        gl_check!(unsafe { gl::ClearColor(r, g, b, a) })?;

        let (vao, vbo, ebo) = upload_quad()?;

        let program = ShaderProgram::from_file(&config.shader_path)
            .with_context(|| format!("Failed to build {}", config.shader_path.display()))?;
        info!("Shader program {} ready", program.id());

        Ok((
            Self {
                window,
                gl_context,
                gl_surface,
                program,
                vao,
                vbo,
                ebo,
            },
            event_loop,
        ))
    }

    fn handle_resize(&self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.gl_surface.resize(
            &self.gl_context,
            NonZeroU32::new(size.width).unwrap(),
            NonZeroU32::new(size.height).unwrap(),
        );
        unsafe {
            gl::Viewport(0, 0, size.width as i32, size.height as i32);
        }
    }

    fn draw(&self) -> Result<()> {
        gl_check!(unsafe { gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT) })?;

        self.program.set_used();
        gl_check!(unsafe {
            gl::DrawElements(
                gl::TRIANGLES,
                QUAD_INDICES.len() as i32,
                gl::UNSIGNED_INT,
                ptr::null(),
            )
        })?;

        self.gl_surface
            .swap_buffers(&self.gl_context)
            .context("Failed to swap buffers")?;
        Ok(())
    }

    fn cleanup(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteBuffers(1, &self.ebo);
        }
        self.vao = 0;
        self.vbo = 0;
        self.ebo = 0;
    }
}

fn upload_quad() -> Result<(u32, u32, u32)> {
    let mut vao = 0;
    gl_check!(unsafe { gl::GenVertexArrays(1, &mut vao) })?;
    gl_check!(unsafe { gl::BindVertexArray(vao) })?;

    let mut vbo = 0;
    gl_check!(unsafe { gl::GenBuffers(1, &mut vbo) })?;
    gl_check!(unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, vbo) })?;
    gl_check!(unsafe {
        gl::BufferData(
            gl::ARRAY_BUFFER,
            mem::size_of_val(&QUAD_VERTICES) as isize,
            QUAD_VERTICES.as_ptr() as *const _,
            gl::STATIC_DRAW,
        )
    })?;

    gl_check!(unsafe { gl::EnableVertexAttribArray(0) })?;
    gl_check!(unsafe {
        gl::VertexAttribPointer(
            0,
            2,
            gl::FLOAT,
            gl::FALSE,
            (2 * mem::size_of::<f32>()) as i32,
            ptr::null(),
        )
    })?;

    let mut ebo = 0;
    gl_check!(unsafe { gl::GenBuffers(1, &mut ebo) })?;
    gl_check!(unsafe { gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo) })?;
    gl_check!(unsafe {
        gl::BufferData(
            gl::ELEMENT_ARRAY_BUFFER,
            mem::size_of_val(&QUAD_INDICES) as isize,
            QUAD_INDICES.as_ptr() as *const _,
            gl::STATIC_DRAW,
        )
    })?;

    Ok((vao, vbo, ebo))
}

fn main() -> Result<()> {
    let (mut app, event_loop) = App::new()?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => {
                app.cleanup();
                elwt.exit();
            }
            WindowEvent::Resized(size) => app.handle_resize(size),
            WindowEvent::RedrawRequested => {
                if let Err(err) = app.draw() {
                    error!("Stopping render loop: {}", err);
                    app.cleanup();
                    elwt.exit();
                }
            }
            _ => (),
        },
        Event::AboutToWait => {
            app.window.request_redraw();
        }
        _ => (),
    })?;

    Ok(())
}
