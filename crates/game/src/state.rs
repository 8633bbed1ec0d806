//! Game state: phases, the on-screen message log and the case session.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use audio::{AudioCue, AudioPort};
use engine_core::EntityTag;
use input::ActionKind;
use procgen::{CaseBlueprint, CLUE_COUNT};
use rand::{rngs::StdRng, SeedableRng};

use crate::clue_service::{ClueBatch, ClueRequest, ClueSource};
use crate::interaction::{self, Action, ActionResult, GrabOutcome, ShotOutcome, HOVER_RANGE};
use crate::level::Level;
use crate::player::{PlayerController, PlayerInput};
use crate::projection::DisplayProjection;

// ── Phases ─────────────────────────────────────────────────────────────────

/// Game phase (menu, waiting for clues, playing, case over).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    MainMenu,
    Loading,
    Playing,
    Won,
    Failed,
}

// ── Messages ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct GameMessage {
    pub text: String,
    pub time_remaining: f32,
}

/// Short-lived notices shown next to the status line.
#[derive(Debug, Clone)]
pub struct GameMessages {
    pub messages: Vec<GameMessage>,
    default_duration: f32,
}

impl Default for GameMessages {
    fn default() -> Self {
        Self::new()
    }
}

impl GameMessages {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            default_duration: 4.0,
        }
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.messages.push(GameMessage {
            text: text.into(),
            time_remaining: self.default_duration,
        });
        if self.messages.len() > 20 {
            self.messages.remove(0);
        }
    }

    pub fn latest(&self) -> Option<&str> {
        self.messages.last().map(|m| m.text.as_str())
    }

    pub fn update(&mut self, dt: f32) {
        for msg in &mut self.messages {
            msg.time_remaining -= dt;
        }
        self.messages.retain(|m| m.time_remaining > 0.0);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

// ── Session ────────────────────────────────────────────────────────────────

/// Status line while the case file is being put together.
pub const LOADING_STATUS: &str = "INITIALIZING CASE FILE...";
/// Status line once every clue is in.
pub const READY_STATUS: &str = "READY FOR EXECUTION";

/// Status line after `found` of the clues have been collected.
pub fn progress_status(found: usize, total: usize) -> String {
    if found >= total {
        READY_STATUS.to_string()
    } else {
        format!("{found}/{CLUE_COUNT} SECURED")
    }
}

/// A case waiting for its clue texts.
struct PendingCase {
    blueprint: CaseBlueprint,
    request: ClueRequest,
}

/// Everything from the main menu to a solved or failed case.
pub struct Session {
    pub phase: GamePhase,
    /// Case number, starting at 1.
    pub case_number: u32,
    pub level: Option<Level>,
    pub player: PlayerController,
    pub pistol_equipped: bool,
    pub dossier_open: bool,
    /// Clue or suspect under the crosshair, refreshed every tick.
    pub looking_at: Option<EntityTag>,
    /// HUD status line.
    pub status: String,
    pub messages: GameMessages,
    /// Whether the current case got generated clue text.
    pub generated_clues: bool,
    seed: u64,
    wander_rng: StdRng,
    clue_source: Arc<dyn ClueSource>,
    clue_timeout: Duration,
    pending: Option<PendingCase>,
    queued_actions: VecDeque<ActionKind>,
}

impl Session {
    pub fn new(
        clue_source: Arc<dyn ClueSource>,
        seed: u64,
        clue_timeout: Duration,
        player: PlayerController,
    ) -> Self {
        Self {
            phase: GamePhase::MainMenu,
            case_number: 1,
            level: None,
            player,
            pistol_equipped: false,
            dossier_open: false,
            looking_at: None,
            status: String::new(),
            messages: GameMessages::new(),
            generated_clues: false,
            seed,
            wander_rng: StdRng::seed_from_u64(seed),
            clue_source,
            clue_timeout,
            pending: None,
            queued_actions: VecDeque::new(),
        }
    }

    /// Drop the current case (if any) and start loading case `number`.
    pub fn start_case(&mut self, number: u32, audio: &mut dyn AudioPort) {
        self.end_level(audio);
        if let Some(pending) = self.pending.take() {
            pending.request.abandon();
        }

        let blueprint = CaseBlueprint::generate(number, self.seed);
        let request = ClueRequest::spawn(
            Arc::clone(&self.clue_source),
            blueprint.culprit_profile(),
            blueprint.fallback_clue_texts(),
            self.clue_timeout,
        );
        log::info!("Loading case {}", number);

        self.case_number = number;
        self.phase = GamePhase::Loading;
        self.status = LOADING_STATUS.to_string();
        self.pending = Some(PendingCase { blueprint, request });
    }

    /// Check on the clue request; spawn the case once texts are in.
    pub fn poll_loading(&mut self, audio: &mut dyn AudioPort) {
        if self.phase != GamePhase::Loading {
            return;
        }
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let Some(batch) = pending.request.poll() else {
            return;
        };
        let Some(PendingCase { blueprint, .. }) = self.pending.take() else {
            return;
        };
        self.begin_playing(&blueprint, batch, audio);
    }

    /// Skip waiting for the clue writer.
    pub fn skip_loading(&mut self, audio: &mut dyn AudioPort) {
        if let Some(PendingCase { blueprint, request }) = self.pending.take() {
            let batch = request.cancel();
            self.begin_playing(&blueprint, batch, audio);
        }
    }

    fn begin_playing(&mut self, blueprint: &CaseBlueprint, batch: ClueBatch, audio: &mut dyn AudioPort) {
        let level = Level::spawn(blueprint, batch.texts(), &mut self.wander_rng);
        self.generated_clues = batch.is_generated();
        self.level = Some(level);
        self.player.reset();
        self.pistol_equipped = false;
        self.dossier_open = false;
        self.looking_at = None;
        self.queued_actions.clear();
        self.messages.clear();
        self.status = format!("MISSION ACTIVE: SECURE {} CLUES", CLUE_COUNT);
        self.phase = GamePhase::Playing;
        audio.play(AudioCue::Ambience);
    }

    /// Leave the result screen: next case after a win, same case after a failure.
    pub fn advance(&mut self, audio: &mut dyn AudioPort) {
        match self.phase {
            GamePhase::MainMenu | GamePhase::Failed => self.start_case(self.case_number, audio),
            GamePhase::Won => self.start_case(self.case_number + 1, audio),
            GamePhase::Loading | GamePhase::Playing => {}
        }
    }

    /// Queue actions for the next tick. Ignored outside play.
    pub fn queue_actions(&mut self, actions: impl IntoIterator<Item = ActionKind>) {
        if self.phase == GamePhase::Playing {
            self.queued_actions.extend(actions);
        }
    }

    /// One simulation tick: player, suspects, look-at, then queued actions.
    pub fn tick(&mut self, input: &PlayerInput, audio: &mut dyn AudioPort) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let Some(level) = self.level.as_mut() else {
            return;
        };

        self.player.update(input, &level.bounds);
        level.advance_npcs(&mut self.wander_rng);
        self.looking_at = interaction::classify(level, &self.player.pose, HOVER_RANGE);

        while let Some(action) = self.queued_actions.pop_front() {
            self.handle_action(action, audio);
            if self.phase != GamePhase::Playing {
                self.queued_actions.clear();
                break;
            }
        }
    }

    pub fn handle_action(&mut self, action: ActionKind, audio: &mut dyn AudioPort) {
        if self.phase != GamePhase::Playing {
            return;
        }
        match action {
            ActionKind::Grab => self.grab(audio),
            ActionKind::Shoot => self.shoot(audio),
            ActionKind::TogglePistol => {
                self.pistol_equipped = !self.pistol_equipped;
                audio.play(AudioCue::PistolToggle);
            }
            ActionKind::ToggleDossier => self.dossier_open = !self.dossier_open,
        }
    }

    fn grab(&mut self, audio: &mut dyn AudioPort) {
        let Some(level) = self.level.as_mut() else {
            return;
        };
        let result = interaction::resolve_action(Action::Grab, level, &self.player.pose, self.pistol_equipped);
        if let ActionResult::Grab(GrabOutcome::Collected(entity)) = result {
            audio.play(AudioCue::ClueGrab);
            if let Some(category) = level.describe(EntityTag::clue(entity)) {
                self.messages.push(format!("{} SECURED", category.to_uppercase()));
            }
            self.status = progress_status(level.found_count(), level.clue_count());
            self.looking_at = None;
        }
    }

    fn shoot(&mut self, audio: &mut dyn AudioPort) {
        let Some(level) = self.level.as_mut() else {
            return;
        };
        let result = interaction::resolve_action(Action::Shoot, level, &self.player.pose, self.pistol_equipped);
        let ActionResult::Shot(outcome) = result else {
            return;
        };
        if outcome == ShotOutcome::NotArmed {
            return;
        }
        audio.play(AudioCue::Gunshot);

        let culprit = level.culprit();
        let solved = matches!(outcome, ShotOutcome::Suspect(hit) if Some(hit) == culprit);
        match outcome {
            ShotOutcome::Suspect(hit) => log::info!(
                "Accused {} in case {}: {}",
                level.describe(EntityTag::npc(hit)).unwrap_or_default(),
                self.case_number,
                if solved { "culprit" } else { "innocent" }
            ),
            other => log::info!("Shot in case {} hit no suspect ({:?})", self.case_number, other),
        }

        self.end_level(audio);
        if solved {
            self.phase = GamePhase::Won;
            self.status = "SOLVED".to_string();
            audio.play(AudioCue::Win);
        } else {
            self.phase = GamePhase::Failed;
            self.status = "FAIL".to_string();
            audio.play(AudioCue::Fail);
        }
    }

    /// Drop the whole level at once.
    fn end_level(&mut self, audio: &mut dyn AudioPort) {
        if self.level.take().is_some() {
            audio.stop_all();
        }
        self.looking_at = None;
        self.pistol_equipped = false;
        self.dossier_open = false;
        self.queued_actions.clear();
    }

    /// Snapshot for the HUD and minimap, while a case is running.
    pub fn projection(&self) -> Option<DisplayProjection> {
        self.level
            .as_ref()
            .map(|level| DisplayProjection::capture(level, &self.player.pose))
    }
}
