//! # Application State Management
//!
//! This module handles the application's state management, including:
//! - Window and graphics initialization
//! - Input handling
//! - Startup configuration
//! - Application lifecycle events
//! - State transitions between initialization and running states

pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;
pub mod viewer_config;

use std::sync::Arc;

use anyhow::Context;
use graphics_resources_builder::{Graphics, GraphicsBuilder, GraphicsEvent, MaybeGraphics};
use input_manager::InputManager;
use log::error;
use viewer_config::ViewerConfig;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::engine_state::{
    voxels::{grid::VoxelGrid, tile::tile_type::TileType},
    EngineState,
};

/// The main application state container that manages the application's lifecycle.
///
/// This struct holds the current state of the application, including graphics resources,
/// input handling, and window management. It implements `ApplicationHandler` to handle
/// window events.
pub struct ApplicationState {
    /// The current graphics state, which may be initializing, ready, or moved into the engine
    pub graphics: MaybeGraphics,

    /// The initialized application state, if the application has started
    pub state: Option<InitializedApplicationState>,

    /// Startup settings
    config: ViewerConfig,

    /// The loaded map, handed to the engine once graphics are ready
    grid: Option<VoxelGrid>,

    /// Tile selected before any number key is pressed
    initial_tile: TileType,

    /// The error that stopped the event loop, if any
    fatal_error: Option<anyhow::Error>,
}

/// Represents the fully initialized and running state of the application.
pub struct InitializedApplicationState {
    /// The core editor state and renderer
    pub engine_state: EngineState,

    /// Handle to the application window
    pub window: Arc<Window>,

    /// Manages input state and event processing
    pub input_manager: InputManager,

    /// Timestamp of the last frame for delta time calculations
    pub last_wait_time: web_time::Instant,
}

impl ApplicationState {
    /// Creates the application state before any window exists.
    ///
    /// # Arguments
    /// * `config` - Startup settings
    /// * `grid` - The loaded map
    /// * `initial_tile` - Tile selected for placement at startup
    /// * `builder` - Creates the window and graphics once the event loop resumes
    pub fn new(config: ViewerConfig, grid: VoxelGrid, initial_tile: TileType, builder: GraphicsBuilder) -> Self {
        Self {
            graphics: MaybeGraphics::Builder(builder),
            state: None,
            config,
            grid: Some(grid),
            initial_tile,
            fatal_error: None,
        }
    }

    /// Consumes the application after the event loop returned.
    ///
    /// # Returns
    /// The error that stopped the event loop, if one did.
    pub fn into_result(self) -> anyhow::Result<()> {
        match self.fatal_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Records a fatal error and stops the event loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        error!("{error:#}");
        self.fatal_error.get_or_insert(error);
        event_loop.exit();
    }

    /// Initializes the application state with the required graphics resources.
    ///
    /// This method transitions the application from the initialization phase to the running state
    /// by setting up the engine state with the provided graphics resources.
    fn initialize_application_state(&mut self) -> anyhow::Result<()> {
        let MaybeGraphics::Graphics(gfx) = std::mem::replace(&mut self.graphics, MaybeGraphics::Moved) else {
            return Ok(());
        };
        let grid = self.grid.take().context("the map was already handed to the engine")?;

        let Graphics {
            window,
            surface,
            surface_config,
            adapter,
            device,
            queue,
            assets,
        } = gfx;

        let engine_state = EngineState::new(
            surface,
            surface_config,
            device,
            queue,
            &adapter,
            &assets,
            grid,
            &self.config.camera,
            self.initial_tile,
        )
        .context("failed to set up the renderer")?;

        self.state = Some(InitializedApplicationState {
            engine_state,
            window,
            input_manager: InputManager::new(),
            last_wait_time: web_time::Instant::now(),
        });

        Ok(())
    }
}

/// Escape key presses and window close requests both quit.
fn is_quit_request(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event: KeyEvent {
                    state: ElementState::Pressed,
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    ..
                },
                ..
            }
    )
}

impl ApplicationHandler<GraphicsEvent> for ApplicationState {
    /// Handles window-related events such as resize, focus changes, and input events.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    /// * `_window_id` - ID of the window that generated the event
    /// * `event` - The window event to process
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if is_quit_request(&event) {
            event_loop.exit();
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        state.input_manager.intake_input(&event);

        match event {
            WindowEvent::Resized(size) => {
                state.engine_state.resize_surface(size);
            }
            WindowEvent::Focused(is_focused) => {
                if !is_focused {
                    state.input_manager.reset_inputs();
                }
            }
            WindowEvent::RedrawRequested => {
                let size = state.window.inner_size();
                if let Err(error) = state.engine_state.render(size) {
                    self.fail(event_loop, anyhow::Error::new(error).context("frame failed"));
                }
            }
            _ => (),
        }
    }

    /// Called when the application is resumed after being suspended.
    ///
    /// This method triggers the graphics initialization process if the
    /// graphics builder has not run yet.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop, &self.config);
        }
    }

    /// Handles the result of graphics initialization.
    ///
    /// Success transitions the application to the running state; any failure
    /// stops the event loop.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    /// * `graphics` - The initialized graphics resources, or why they could not be created
    fn user_event(&mut self, event_loop: &ActiveEventLoop, graphics: GraphicsEvent) {
        let result = graphics.and_then(|graphics| {
            self.graphics = MaybeGraphics::Graphics(graphics);
            self.initialize_application_state()
        });

        if let Err(error) = result {
            self.fail(event_loop, error.context("graphics initialization failed"));
        }
    }

    /// Called before the event loop goes to sleep.
    ///
    /// This method handles frame timing, input processing, and requests the
    /// next frame.
    ///
    /// # Arguments
    /// * `_event_loop` - Reference to the active event loop
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            let now = web_time::Instant::now();
            let wait_dt = now - state.last_wait_time;

            let processed_input = state.input_manager.get_and_reset_processed_input();
            state.engine_state.set_input_commands(&processed_input);
            state.engine_state.process_input(wait_dt);

            state.last_wait_time = now;

            state.window.request_redraw();
        }
    }
}
