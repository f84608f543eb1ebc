// Window module - Desktop simulator for the V5 display
//
// Runs the real frame loop against a simulated 480×272 screen and shows that
// screen in a window using the winit and pixels crates. Keyboard and gamepad
// stand in for the V5 controller; the operator text goes to the title bar.

use super::blitter::{PHYSICAL_HEIGHT, PHYSICAL_WIDTH};
use super::palette::argb_to_rgba;
use super::simulated::SimulatedScreen;
use super::text::TextBuffer;
use crate::emulator::{
    Engine, LoopController, Peripherals, PresenterConfig, SystemClock, TestPatternEngine,
    TickOutcome,
};
use crate::input::{GamepadHandler, KeyboardHandler, UnifiedController};
use pixels::{Pixels, SurfaceTexture};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Window configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Scale factor (1x, 2x, 3x, 4x, etc.)
    pub scale: u32,
}

impl WindowConfig {
    /// Create a new window configuration with default values
    ///
    /// Default: 2x scale
    pub fn new() -> Self {
        Self { scale: 2 }
    }

    /// Set the scale factor
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.clamp(1, 8); // Clamp between 1x and 8x
        self
    }

    /// Get the window width in pixels
    pub fn window_width(&self) -> u32 {
        PHYSICAL_WIDTH as u32 * self.scale
    }

    /// Get the window height in pixels
    pub fn window_height(&self) -> u32 {
        PHYSICAL_HEIGHT as u32 * self.scale
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Simulator application driving the frame loop from the winit event loop
pub struct SimulatorApp<E: Engine> {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    config: WindowConfig,
    controller: Option<LoopController<E>>,
    screen: Rc<RefCell<SimulatedScreen>>,
    text: Rc<RefCell<TextBuffer>>,
    keyboard: Rc<RefCell<KeyboardHandler>>,
    /// Title currently shown on the window
    title: String,
}

impl<E: Engine> SimulatorApp<E> {
    /// Wrap a running loop controller
    ///
    /// `screen`, `text` and `keyboard` must be the same handles the
    /// controller's peripherals were built from.
    pub fn new(
        config: WindowConfig,
        controller: LoopController<E>,
        screen: Rc<RefCell<SimulatedScreen>>,
        text: Rc<RefCell<TextBuffer>>,
        keyboard: Rc<RefCell<KeyboardHandler>>,
    ) -> Self {
        Self {
            window: None,
            pixels: None,
            config,
            controller: Some(controller),
            screen,
            text,
            keyboard,
            title: String::new(),
        }
    }

    fn current_title(&self) -> String {
        format!("NES V5 - {}", self.text.borrow().line(0))
    }

    /// New window title if the operator text changed since the last call
    fn pending_title(&mut self) -> Option<String> {
        let title = self.current_title();
        if title == self.title {
            return None;
        }
        self.title = title.clone();
        Some(title)
    }

    /// Copy the simulated screen into the window and present it
    fn render(&mut self) -> Result<(), pixels::Error> {
        if let Some(pixels) = &mut self.pixels {
            let screen = self.screen.borrow();
            for (dst, &argb) in pixels
                .frame_mut()
                .chunks_exact_mut(4)
                .zip(screen.as_slice())
            {
                dst.copy_from_slice(&argb_to_rgba(argb));
            }
            pixels.render()?;
        }
        Ok(())
    }

    fn create_window(
        &mut self,
        event_loop: &ActiveEventLoop,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let title = self.pending_title().unwrap_or_else(|| self.title.clone());
        let window_attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(LogicalSize::new(
                self.config.window_width(),
                self.config.window_height(),
            ))
            .with_resizable(false);

        // Wrap window in Arc for shared ownership
        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let window_size = window.inner_size();

        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());
        let pixels = Pixels::new(PHYSICAL_WIDTH as u32, PHYSICAL_HEIGHT as u32, surface_texture)?;

        self.window = Some(window);
        self.pixels = Some(pixels);
        Ok(())
    }

    fn shutdown(&mut self) {
        if let Some(controller) = self.controller.take() {
            controller.shutdown();
        }
    }
}

impl<E: Engine> ApplicationHandler for SimulatorApp<E> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            eprintln!("Failed to create window: {}", e);
            self.shutdown();
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                println!("Close requested, exiting...");
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                ..
            } => {
                let mut keyboard = self.keyboard.borrow_mut();
                match state {
                    ElementState::Pressed => keyboard.handle_key_press(physical_key),
                    ElementState::Released => keyboard.handle_key_release(physical_key),
                }
            }
            WindowEvent::Focused(false) => {
                // Keys released while unfocused never arrive
                self.keyboard.borrow_mut().release_all();
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.render() {
                    eprintln!("Render error: {}", err);
                    self.shutdown();
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(title) = self.pending_title() {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
        }

        let Some(controller) = &mut self.controller else {
            return;
        };

        if let TickOutcome::Presented { .. } = controller.tick() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }
}

/// Run the presenter in a desktop window with the test pattern engine
///
/// Setup failures are returned before any window opens, after being shown
/// on stderr through the operator text channel.
pub fn run_simulator(
    config: &PresenterConfig,
    window_config: WindowConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let screen = Rc::new(RefCell::new(SimulatedScreen::new()));
    let text = Rc::new(RefCell::new(TextBuffer::new().with_echo(true)));
    let keyboard = Rc::new(RefCell::new(KeyboardHandler::new()));
    let input = UnifiedController::new(Rc::clone(&keyboard), GamepadHandler::new());

    let peripherals = Peripherals::new(
        Rc::clone(&screen),
        input,
        Rc::clone(&text),
        SystemClock::new(),
    );
    let controller = LoopController::setup(config, peripherals, || Some(TestPatternEngine::new()))?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    println!("Starting simulator...");
    println!("  Display: {}x{}", PHYSICAL_WIDTH, PHYSICAL_HEIGHT);
    println!(
        "  Window size: {}x{}",
        window_config.window_width(),
        window_config.window_height()
    );
    println!("  Target FPS: {}", config.video.target_fps);
    println!("  Blit mode: {:?}", config.video.blit_mode);

    let mut app = SimulatorApp::new(window_config, controller, screen, text, keyboard);
    event_loop.run_app(&mut app)?;

    Ok(())
}
