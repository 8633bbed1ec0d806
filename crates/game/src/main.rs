//! Traitor - first-person detective game: find the evidence, then find the culprit.

mod clue;
mod clue_service;
mod config;
mod events;
mod hud;
mod interaction;
mod level;
mod npc;
mod player;
mod projection;
mod scene;
mod state;

use anyhow::Result;
use audio::{AudioPort, NullAudio};
use engine_core::{Time, Vec2};
use input::InputState;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use clue_service::{ClueSource, CommandClueSource, OfflineClueSource};
use config::GameConfig;
use player::{PlayerController, PlayerInput};
use state::{GamePhase, Session};

/// Main game state: window, input, audio and the case session.
pub struct GameState {
    pub window: Arc<Window>,
    pub config: GameConfig,
    pub time: Time,
    pub input: InputState,
    pub session: Session,
    pub audio: Box<dyn AudioPort>,
    pub running: bool,
    /// Finger currently driving the view, with its last position.
    pub(crate) look_touch: Option<(u64, Vec2)>,
    /// Whether the last frame's look deltas were spent by a tick.
    look_consumed: bool,
    /// Minimap markers as raw bytes, ready for upload.
    minimap: Vec<u8>,
    title: String,
    dossier_shown: bool,
}

impl GameState {
    fn new(window: Arc<Window>, config: GameConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!("Case seed: {}", seed);

        let player = PlayerController::default()
            .with_sensitivity(config.mouse_sensitivity, config.touch_sensitivity);
        let session = Session::new(clue_source(&config), seed, config.clue_timeout(), player);
        let audio = open_audio(&config);

        Self {
            window,
            config,
            time: Time::new(),
            input: InputState::new(),
            session,
            audio,
            running: true,
            look_touch: None,
            look_consumed: true,
            minimap: Vec::new(),
            title: String::new(),
            dossier_shown: false,
        }
    }

    /// Advance the frame: loading, fixed ticks, then the display side.
    fn update(&mut self) {
        self.time.update();
        if self.look_consumed {
            self.input.begin_frame();
        }
        self.session.messages.update(self.time.delta_seconds());

        match self.session.phase {
            GamePhase::Loading => {
                self.session.poll_loading(self.audio.as_mut());
                if self.session.phase == GamePhase::Playing {
                    self.time.reset_accumulator();
                    self.input.clear_pending();
                }
            }
            GamePhase::Playing => self.run_ticks(),
            GamePhase::MainMenu | GamePhase::Won | GamePhase::Failed => {
                self.input.drain_actions();
            }
        }

        self.present();
    }

    fn run_ticks(&mut self) {
        let mut ticked = false;
        while self.time.should_fixed_update() {
            let sample = PlayerInput::sample(&self.input);
            let sample = if ticked { sample.without_look() } else { sample };
            self.session.queue_actions(self.input.drain_actions());
            self.session.tick(&sample, self.audio.as_mut());
            ticked = true;

            if self.session.phase != GamePhase::Playing {
                self.release_cursor();
                self.input.clear_pending();
                break;
            }
        }
        self.look_consumed = ticked;
    }

    /// Push the read-only projection out to the window.
    fn present(&mut self) {
        self.minimap.clear();
        if let Some(projection) = self.session.projection() {
            self.minimap
                .extend_from_slice(bytemuck::cast_slice(&projection.markers()));
        }

        let title = hud::hud_line(&self.session);
        if title != self.title {
            self.window.set_title(&title);
            self.title = title;
        }

        let dossier_open = self.session.dossier_open;
        if dossier_open && !self.dossier_shown {
            if let Some(level) = &self.session.level {
                log::info!("Dossier, case {}:", level.number);
                for line in hud::dossier_lines(level) {
                    log::info!("  {}", line);
                }
                for line in hud::evidence_lines(level) {
                    log::info!("  Evidence - {}", line);
                }
            }
        }
        self.dossier_shown = dossier_open;
    }
}

fn clue_source(config: &GameConfig) -> Arc<dyn ClueSource> {
    let Some(argv) = config.clue_command.clone() else {
        log::info!("No clue command configured, using built-in clues");
        return Arc::new(OfflineClueSource);
    };
    match CommandClueSource::new(argv) {
        Ok(source) => Arc::new(source),
        Err(e) => {
            log::warn!("Ignoring clue command: {}", e);
            Arc::new(OfflineClueSource)
        }
    }
}

fn open_audio(config: &GameConfig) -> Box<dyn AudioPort> {
    #[cfg(feature = "sound")]
    {
        if let Some(dir) = &config.sound_dir {
            match audio::KiraAudio::new(dir, config.master_volume) {
                Ok(kira) => return Box::new(kira),
                Err(e) => log::warn!("Audio unavailable, continuing silently: {}", e),
            }
        }
    }
    #[cfg(not(feature = "sound"))]
    {
        if config.sound_dir.is_some() {
            log::warn!("Built without the \"sound\" feature, ignoring sound_dir");
        }
    }
    Box::new(NullAudio)
}

/// Application handler for winit.
struct App {
    state: Option<GameState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = GameConfig::load();
            let window_attrs = Window::default_attributes()
                .with_title("Traitor")
                .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            self.state = Some(GameState::new(window, config));
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        if let Some(state) = &mut self.state {
            state.handle_device_event(event);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            state.update();
            event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + state.time.fixed_timestep()));
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                            TRAITOR                               ║");
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!("║  CONTROLS:                                                       ║");
    println!("║    WASD       - Move           │  Mouse      - Look around       ║");
    println!("║    G          - Grab evidence  │  P          - Draw/holster      ║");
    println!("║    Left Click - Fire (drawn)   │  E          - Suspect dossier   ║");
    println!("║    Enter      - Start/continue │  Escape     - Release cursor    ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");

    log::info!("Starting Traitor");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
