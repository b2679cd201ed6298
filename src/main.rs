use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::PhysicalKey,
    window::Window,
};

use cubelab::controller::{CameraController, InputState};
use cubelab::model::{cube_mesh, CameraRig, MeshBuffer, Scene};
use cubelab::view::{
    gpu_init::GpuContext,
    render::{self, ProgramBinding},
    shader::{read_shader_source, ShaderError, ShaderProgram},
    texture::SceneTexture,
};
use cubelab::logging;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.4,
    g: 0.3,
    b: 0.5,
    a: 1.0,
};

fn assets_dir() -> PathBuf {
    std::env::var_os("CUBELAB_ASSETS")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets"))
}

struct App {
    // Core GPU resources
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    window: Arc<Window>,

    // Rendering state
    program: ShaderProgram,
    binding: ProgramBinding,
    cube: MeshBuffer,
    depth_view: wgpu::TextureView,

    // Camera and input
    camera: CameraRig,
    camera_controller: CameraController,
    input: InputState,

    // Frame timing
    start_time: Instant,
    last_frame_time: Instant,
}

impl App {
    async fn new(window: Arc<Window>) -> Result<Self, ShaderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .expect("Failed to create surface");
        let gpu = GpuContext::new(&instance, surface, size.width, size.height).await;

        let device = gpu.device.clone();
        let queue = gpu.queue.clone();
        let config = gpu.config.clone();

        let (_, depth_view) = render::create_depth_texture(&device, size.width, size.height);

        // Shader program: two stage files read wholesale, compiled and linked
        let assets = assets_dir();
        let vertex_src = read_shader_source(assets.join("shaders/cube.vert.wgsl"))?;
        let fragment_src = read_shader_source(assets.join("shaders/cube.frag.wgsl"))?;
        let mut program = ShaderProgram::compile(&vertex_src, &fragment_src)?;

        // Textures degrade to checkerboards when missing
        let base = SceneTexture::load(&device, &queue, assets.join("textures/crate.png"));
        let overlay = SceneTexture::load(&device, &queue, assets.join("textures/overlay.png"));

        let binding = ProgramBinding::new(
            &device,
            config.format,
            wgpu::TextureFormat::Depth32Float,
            &program,
            [&base, &overlay],
            Scene::instance_count() as u32,
        );
        if !binding.supports_wireframe() {
            tracing::warn!("adapter lacks line polygon mode, wireframe toggle disabled");
        }

        program.set_float("mix_amount", 0.2);

        let cube = cube_mesh().upload(&device);

        Ok(Self {
            surface: gpu.surface,
            device,
            queue,
            config,
            size,
            window,
            program,
            binding,
            cube,
            depth_view,
            camera: CameraRig::new(),
            camera_controller: CameraController::new(),
            input: InputState::new(),
            start_time: Instant::now(),
            last_frame_time: Instant::now(),
        })
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    state, physical_key, ..
                },
                ..
            } => {
                if let PhysicalKey::Code(code) = physical_key {
                    self.input.process_key(*code, *state);
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.camera
                    .on_pointer_move(position.x as f32, position.y as f32);
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let y_offset = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
                };
                self.camera.on_scroll(y_offset);
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);

            let (_, depth_view) =
                render::create_depth_texture(&self.device, new_size.width, new_size.height);
            self.depth_view = depth_view;
        }
    }

    fn update(&mut self, dt: f32) {
        self.camera_controller
            .update(&mut self.camera, &self.input, dt);

        let elapsed = self.start_time.elapsed().as_secs_f32();
        let aspect = self.config.width as f32 / self.config.height as f32;
        let view = self.camera.view_matrix();
        let projection = self.camera.projection_matrix(aspect);

        // Submit model/view/projection per instance; each draw reads its own
        // uniform slot via a dynamic offset
        for i in 0..Scene::instance_count() {
            self.program.set_mat4("model", Scene::instance_model(i, elapsed));
            self.program.set_mat4("view", view);
            self.program.set_mat4("projection", projection);
            self.binding.stage_slot(i as u32, &self.program);
        }
        self.binding.flush(&self.queue);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.binding
                .activate(&mut render_pass, self.input.wireframe_mode);
            render_pass.set_vertex_buffer(0, self.cube.vertex_buffer.slice(..));

            for i in 0..Scene::instance_count() {
                self.binding.bind_slot(&mut render_pass, i as u32);
                render_pass.draw(0..self.cube.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn main() -> ExitCode {
    logging::init();

    let event_loop = EventLoop::new().unwrap();
    let window_attributes = Window::default_attributes()
        .with_title("cubelab")
        .with_inner_size(winit::dpi::LogicalSize::new(800, 600));
    #[allow(deprecated)]
    let window = event_loop.create_window(window_attributes).unwrap();
    let window = Arc::new(window);

    let mut app = match pollster::block_on(App::new(window.clone())) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("setup failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    #[allow(deprecated)]
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                if app.input(event) {
                    if app.input.quit_requested {
                        elwt.exit();
                    }
                    return;
                }
                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(physical_size) => {
                        app.resize(*physical_size);
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let dt = (now - app.last_frame_time).as_secs_f32();
                        app.last_frame_time = now;

                        app.update(dt);

                        match app.render() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => app.resize(app.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                            Err(e) => tracing::warn!("surface error: {e:?}"),
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        })
        .unwrap();

    ExitCode::SUCCESS
}
