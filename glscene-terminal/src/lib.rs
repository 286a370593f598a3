/// Terminal host running a scene against the ASCII rasterizer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use glscene_core::{Camera, Scene, SceneConfig, Transport};
use std::io::{self, stdout, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub mod renderer;
pub mod scene;
pub mod transport;

pub use renderer::AsciiRenderer;
pub use scene::{CylinderParams, CylinderScene};
pub use transport::FileTransport;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: CylinderScene,
    transport: Rc<FileTransport>,
    camera: Camera,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Create the app; resources are read relative to `root`.
    pub fn new(config: SceneConfig, root: impl Into<PathBuf>) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let transport = Rc::new(FileTransport::new(root));
        let scene = CylinderScene::new(config, transport.clone() as Rc<dyn Transport>);

        Ok(Self {
            scene,
            transport,
            // terminal cells are roughly twice as tall as they are wide
            camera: Camera::new(width as u32, height as u32 * 2),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        self.scene.start(&mut self.renderer);
        let result = self.main_loop();
        self.scene.end();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            // Deliver IO completed since the last frame, then tick the scene
            self.transport.pump();
            if self.scene.base().is_load_complete() {
                self.scene.orientation.rotate(0.0, 0.02);
            }
            self.scene.update(&mut self.renderer);

            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            let orientation = &mut self.scene.orientation;
            match code {
                KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                KeyCode::Char('w') | KeyCode::Up => orientation.rotate(0.1, 0.0),
                KeyCode::Char('s') | KeyCode::Down => orientation.rotate(-0.1, 0.0),
                KeyCode::Char('a') | KeyCode::Left => orientation.rotate(0.0, -0.1),
                KeyCode::Char('d') | KeyCode::Right => orientation.rotate(0.0, 0.1),
                _ => {}
            }
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let rotation = self.scene.orientation.matrix();
        for entity in self.scene.base().entities() {
            if let Some(mesh) = entity.mesh() {
                let model = rotation * entity.model_matrix();
                self.renderer.render_mesh(mesh, &model, &self.camera);
            }
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        let state = self.scene.base().load_state();
        let status = if state.is_complete {
            "ready".to_string()
        } else {
            format!("loading {}/{}", state.completed, state.total)
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "GLScene Terminal | {status} | FPS: {:.1} | WASD/Arrows=Rotate Q=Quit",
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
