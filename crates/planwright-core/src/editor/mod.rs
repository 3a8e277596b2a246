//! The editor context: tool state machine, camera, history and the
//! per-tick input handler the shell drives.
//!
//! [`Editor::handle_input`] is the single entry point. Each call consumes one
//! [`InputEvent`] plus the held keys, updates the model through the active
//! tool, and reports whether the shell should keep running. Faults raised
//! while handling an event are logged and reset the tool to idle; they never
//! reach the shell.

mod messages;
mod placement;
mod selection;
mod snapshot;

pub use messages::{MessageStack, TextLines, status_line};
pub use selection::Selection;
pub use snapshot::{EditorSnapshot, Preview};

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::document::PlanDocument;
use crate::entities::{EntityId, Layer};
use crate::geometry::Vertex;
use crate::history::{ActionLog, HistoryError, Replay};
use crate::housekeeping::Housekeeper;
use crate::input::{InputEvent, Key, KeyState};
use crate::model::{ModelEvent, PlanModel};
use crate::snap::SnapResult;
use crate::storage::{
    AutoSaveManager, LAST_DOCUMENT_KEY, MemoryStorage, Storage, StorageError, StorageResult,
};
use crate::tools::{ToolKind, ToolState};
use kurbo::{Affine, Point, Size};
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Faults raised while handling one input event.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<HistoryError> for EditorError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::MissingEntity(id) => EditorError::EntityNotFound(id),
        }
    }
}

/// Work the editor hands back to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Render the current frame to an image.
    ExportImage,
    /// Write the inventory text somewhere the user can read it.
    WriteInventory(String),
}

struct Autosave {
    manager: AutoSaveManager,
    housekeeper: Housekeeper,
}

/// Owns the plan and everything needed to edit it.
pub struct Editor {
    config: EditorConfig,
    model: PlanModel,
    history: ActionLog,
    camera: Camera,
    tool: ToolState,
    selection: Selection,
    /// Move pivots on the start vertex (or top-left corner).
    use_start: bool,
    /// Label text or typed length digits.
    typed: String,
    layer: Layer,
    show_grid: bool,
    viewport: Size,
    /// Last pointer position in screen coordinates.
    pointer: Point,
    pan_anchor: Option<Point>,
    snap: Option<SnapResult>,
    moving_vertex: Option<Vertex>,
    messages: MessageStack,
    lines: TextLines,
    storage: Arc<dyn Storage>,
    last_save: Option<Instant>,
    last_scroll: Option<Instant>,
    autosave: Option<Autosave>,
    pending: Vec<ShellCommand>,
    running: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Editor backed by in-memory storage.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_storage(config, Arc::new(MemoryStorage::new()))
    }

    pub fn with_storage(config: EditorConfig, storage: Arc<dyn Storage>) -> Self {
        Self::build(config, storage, true)
    }

    /// `background` runs housekeeping on its own thread where threads exist.
    pub(crate) fn build(config: EditorConfig, storage: Arc<dyn Storage>, background: bool) -> Self {
        let model = PlanModel::with_attach_distance(config.fixture_attach_distance);

        let autosave = config.autosave_interval().and_then(|interval| {
            let housekeeper = start_housekeeper(&model, background)?;
            let mut manager = AutoSaveManager::new(Arc::clone(&storage), config.document_id.clone());
            manager.set_interval(interval);
            Some(Autosave {
                manager,
                housekeeper,
            })
        });

        let mut editor = Self {
            history: ActionLog::with_interval(config.history_interval()),
            camera: Camera::with_limits(config.zoom_step, config.min_zoom, config.max_zoom),
            messages: MessageStack::new(config.message_lifetime()),
            model,
            tool: ToolState::Idle,
            selection: Selection::new(),
            use_start: true,
            typed: String::new(),
            layer: 0,
            show_grid: false,
            viewport: Size::ZERO,
            pointer: Point::ZERO,
            pan_anchor: None,
            snap: None,
            moving_vertex: None,
            lines: TextLines::default(),
            storage,
            last_save: None,
            last_scroll: None,
            autosave,
            pending: Vec::new(),
            running: true,
            config,
        };
        editor.restore_last_autosave(Instant::now());
        editor
    }

    /// Load the most recent autosave into the empty model, when autosave is on.
    fn restore_last_autosave(&mut self, now: Instant) {
        let Some(autosave) = self.autosave.as_mut() else {
            return;
        };
        let Some(document) = autosave.manager.load_last(now) else {
            return;
        };
        let count = document.entity_count();
        self.model.load_document(document);
        log::info!("Restored last autosave ({} entities)", count);
        self.messages.push("Restored autosaved drawing.", now);
    }

    /// Handle one tick of input. Returns `false` once the shell should quit.
    pub fn handle_input(&mut self, keys: &KeyState, event: &InputEvent, viewport: Size) -> bool {
        self.handle_input_at(keys, event, viewport, Instant::now())
    }

    /// [`handle_input`](Self::handle_input) with an explicit clock.
    pub fn handle_input_at(
        &mut self,
        keys: &KeyState,
        event: &InputEvent,
        viewport: Size,
        now: Instant,
    ) -> bool {
        if matches!(event, InputEvent::Quit) {
            log::info!("Quit requested");
            self.running = false;
            return false;
        }

        self.viewport = viewport;
        self.pointer = event.position().unwrap_or(keys.pointer);
        let world = self.camera.screen_to_world(self.pointer);

        self.lines.reset();
        self.collect_text(event);
        self.lines.info = self
            .model
            .peek_entity_at_point(world)
            .map(|e| e.describe())
            .unwrap_or_default();

        if let Err(e) = self.dispatch(keys, event, world, now) {
            log::warn!("Input handling failed, resetting tool: {}", e);
            self.reset();
        }

        self.scroll_camera(keys, now);
        self.messages.expire(now);
        self.autosave_tick(now);

        let world = self.camera.screen_to_world(self.pointer);
        self.lines.hint = self.tool.hint().to_string();
        if self.tool == ToolState::AddingText {
            self.lines.info = self.typed.clone();
        }
        self.lines.status = status_line(world, self.camera.zoom);

        self.running
    }

    fn collect_text(&mut self, event: &InputEvent) {
        let InputEvent::Text(text) = event else {
            return;
        };
        if self.tool == ToolState::AddingText {
            self.typed.push_str(text);
        } else if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
            self.typed.push_str(text);
        } else {
            self.typed.clear();
        }
    }

    fn dispatch(
        &mut self,
        keys: &KeyState,
        event: &InputEvent,
        world: Point,
        now: Instant,
    ) -> Result<(), EditorError> {
        match event {
            InputEvent::KeyDown(Key::Escape) => {
                log::debug!("Cancelled {:?}", self.tool);
                self.reset();
                return Ok(());
            }
            InputEvent::KeyDown(key) => return self.handle_key(keys, *key, world, now),
            InputEvent::Tool(tool) => return self.activate(*tool, now),
            InputEvent::Wheel { delta_y } => {
                self.camera.zoom_wheel(self.pointer, *delta_y);
                return Ok(());
            }
            InputEvent::FileDropped(path) => return self.load_path(path, now),
            _ => {}
        }

        if self.handle_pan(keys, event) {
            return Ok(());
        }

        match self.tool.clone() {
            ToolState::PlacingFirstPoint { kind } => self.handle_first_point(kind, event, world),
            ToolState::PlacingSecondPoint { .. } => self.handle_second_point(keys, event, world, now),
            ToolState::PlacingOnePoint { kind, .. } => self.handle_one_point(kind, event, world, now),
            state => {
                if let Some(mode) = state.select_mode() {
                    self.handle_selecting(mode, event, world, now)?;
                }
            }
        }
        Ok(())
    }

    fn handle_key(
        &mut self,
        keys: &KeyState,
        key: Key,
        world: Point,
        now: Instant,
    ) -> Result<(), EditorError> {
        if let Some(tool) = self.shortcut(keys, key) {
            return self.activate(tool, now);
        }
        match key {
            Key::R if keys.ctrl() => self.camera.reset(),
            Key::Delete => {
                self.erase_selection()?;
            }
            Key::Tab if self.tool == ToolState::Moving => {
                self.use_start = !self.use_start;
                log::debug!("Move pivot on start vertex: {}", self.use_start);
            }
            Key::Enter if self.tool == ToolState::AddingText => self.commit_label(world)?,
            _ => {}
        }
        Ok(())
    }

    fn shortcut(&self, keys: &KeyState, key: Key) -> Option<ToolKind> {
        if keys.ctrl() {
            return match key {
                Key::D => Some(ToolKind::Draw),
                Key::T => Some(ToolKind::AddText),
                Key::M => Some(ToolKind::Measure),
                Key::G => Some(ToolKind::Grid),
                Key::E => Some(ToolKind::Export),
                Key::Z => Some(ToolKind::Undo),
                Key::Y => Some(ToolKind::Redo),
                Key::S => Some(ToolKind::Save),
                _ => None,
            };
        }
        if self.tool.is_placing_two_points() || self.tool == ToolState::AddingText {
            return None;
        }
        match key {
            Key::Keypad0 => Some(ToolKind::ExteriorWall),
            Key::Keypad1 => Some(ToolKind::InteriorWall),
            _ => None,
        }
    }

    /// SHIFT+drag while selecting, or any drag with the pan tool.
    fn handle_pan(&mut self, keys: &KeyState, event: &InputEvent) -> bool {
        let pan_tool = self.tool == ToolState::Panning;
        let resting = matches!(
            self.tool,
            ToolState::Idle | ToolState::Moving | ToolState::Erasing
        );

        match (event, self.pan_anchor) {
            (InputEvent::PointerDown { position, .. }, _)
                if event.is_commit() && (pan_tool || (resting && keys.shift())) =>
            {
                self.pan_anchor = Some(*position);
                true
            }
            (InputEvent::PointerMove { position }, Some(anchor)) => {
                self.camera.pan(*position - anchor);
                self.pan_anchor = Some(*position);
                true
            }
            (InputEvent::PointerUp { .. }, Some(_)) => {
                self.pan_anchor = None;
                true
            }
            _ => pan_tool,
        }
    }

    fn scroll_camera(&mut self, keys: &KeyState, now: Instant) {
        let elapsed = self
            .last_scroll
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_scroll = Some(now);

        if self.tool == ToolState::AddingText || keys.ctrl() {
            return;
        }
        let direction = keys.scroll_direction();
        if direction.is_idle() {
            return;
        }
        let speed = if keys.shift() {
            self.config.fast_scroll_speed
        } else {
            self.config.scroll_speed
        };
        self.camera.scroll(direction, speed * elapsed.as_secs_f64());
    }

    /// Run a tool from the palette or a shortcut.
    pub fn activate(&mut self, tool: ToolKind, now: Instant) -> Result<(), EditorError> {
        log::debug!("Activating {:?}", tool);

        if let Some(state) = ToolState::for_tool(tool) {
            let keep_selection = matches!(state, ToolState::Moving | ToolState::Erasing);
            if keep_selection {
                self.clear_transient();
            } else {
                self.reset();
            }
            self.tool = state;
            match self.tool {
                ToolState::Erasing => {
                    self.erase_selection()?;
                }
                ToolState::Loading => self.announce_saved_plans(now),
                _ => {}
            }
            return Ok(());
        }

        self.reset();
        match tool {
            ToolKind::Grid => self.show_grid = !self.show_grid,
            ToolKind::Layer(layer) => {
                if layer >= self.config.layer_count {
                    return Err(EditorError::InvalidState(format!(
                        "layer {} out of range (0..{})",
                        layer, self.config.layer_count
                    )));
                }
                self.layer = layer;
            }
            ToolKind::Undo => {
                if self.history.undo(&self.model, now)? == Replay::Applied {
                    log::debug!("Undo applied, {} left", self.history.undo_len());
                }
            }
            ToolKind::Redo => {
                if self.history.redo(&self.model, now)? == Replay::Applied {
                    log::debug!("Redo applied, {} left", self.history.redo_len());
                }
            }
            ToolKind::Save => {
                self.save_at(now)?;
            }
            ToolKind::ExportInventory => {
                let inventory = self.model.inventory();
                let lines = inventory.lines().count();
                self.pending.push(ShellCommand::WriteInventory(inventory));
                self.messages
                    .push(format!("Created list of entities: {} lines", lines), now);
            }
            ToolKind::Export => {
                self.pending.push(ShellCommand::ExportImage);
                self.messages.push("Exporting drawing as image.", now);
            }
            ToolKind::Exit => {
                log::info!("Exit requested");
                self.running = false;
            }
            _ => {}
        }
        Ok(())
    }

    /// Return to idle, dropping the selection and every in-progress gesture.
    pub fn reset(&mut self) {
        self.tool = ToolState::Idle;
        self.selection.clear();
        self.model.clear_selection();
        self.clear_transient();
    }

    fn clear_transient(&mut self) {
        self.typed.clear();
        self.pan_anchor = None;
        self.snap = None;
        self.moving_vertex = None;
    }

    /// Save the plan under the configured document id.
    ///
    /// Returns `Ok(false)` when the previous save is too recent.
    pub fn save_at(&mut self, now: Instant) -> Result<bool, EditorError> {
        if self
            .last_save
            .is_some_and(|last| now.saturating_duration_since(last) < self.config.save_interval())
        {
            return Ok(false);
        }

        let id = self.config.document_id.clone();
        if let Err(e) = self.storage.save(&id, &self.model.to_document()) {
            log::error!("Saving {} failed: {}", id, e);
            self.messages.push(format!("Error saving drawing: {}", id), now);
            return Err(e.into());
        }
        self.last_save = Some(now);
        log::info!("Saved drawing {}", id);
        self.messages.push(format!("Saved drawing: {}", id), now);
        Ok(true)
    }

    pub fn save(&mut self) -> Result<bool, EditorError> {
        self.save_at(Instant::now())
    }

    /// Replace the plan with the document stored under `id`.
    pub fn load_at(&mut self, id: &str, now: Instant) -> Result<(), EditorError> {
        let result = self.storage.load(id);
        self.apply_loaded(id, result, now)
    }

    pub fn load(&mut self, id: &str) -> Result<(), EditorError> {
        self.load_at(id, Instant::now())
    }

    /// Replace the plan with a dropped plan file.
    pub fn load_path(&mut self, path: &Path, now: Instant) -> Result<(), EditorError> {
        #[cfg(not(target_arch = "wasm32"))]
        let result = crate::storage::read_document(path);
        #[cfg(target_arch = "wasm32")]
        let result = Err(StorageError::Other(
            "reading files is not supported on this platform".to_string(),
        ));
        self.apply_loaded(&path.display().to_string(), result, now)
    }

    /// On failure the model is left empty.
    fn apply_loaded(
        &mut self,
        name: &str,
        result: StorageResult<PlanDocument>,
        now: Instant,
    ) -> Result<(), EditorError> {
        self.reset();
        self.history.clear();
        match result {
            Ok(document) => {
                let count = document.entity_count();
                self.model.load_document(document);
                log::info!("Loaded {} ({} entities)", name, count);
                self.messages
                    .push(format!("Loaded from save file: {}", name), now);
                Ok(())
            }
            Err(e) => {
                self.model.clear();
                self.messages
                    .push(format!("Error loading save file: {}", name), now);
                Err(e.into())
            }
        }
    }

    /// Post the ids of the stored plans the Load tool can open.
    fn announce_saved_plans(&mut self, now: Instant) {
        let mut ids = match self.storage.list() {
            Ok(ids) => ids,
            Err(e) => {
                log::warn!("Could not list saved drawings: {}", e);
                return;
            }
        };
        ids.retain(|id| id != LAST_DOCUMENT_KEY);
        ids.sort();
        let text = if ids.is_empty() {
            "No saved drawings.".to_string()
        } else {
            format!("Saved drawings: {}", ids.join(", "))
        };
        self.messages.push(text, now);
    }

    /// Save when the housekeeper saw changes and the autosave interval has
    /// elapsed.
    pub fn autosave_tick(&mut self, now: Instant) {
        let Some(autosave) = self.autosave.as_mut() else {
            return;
        };
        if autosave.housekeeper.take_dirty() {
            autosave.manager.mark_dirty();
        }
        if !autosave.manager.should_save(now) {
            return;
        }
        let document = self.model.to_document();
        if let Err(e) = autosave.manager.maybe_save(&document, now) {
            log::error!("Autosave failed: {}", e);
        }
    }

    /// Take the commands queued for the shell.
    pub fn drain_commands(&mut self) -> Vec<ShellCommand> {
        std::mem::take(&mut self.pending)
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        let mut preview = Preview::NONE;
        let mut fixture_preview = None;
        let mut selection_rect = None;
        match &self.tool {
            ToolState::PlacingSecondPoint { kind, first, end, .. } => {
                preview = Preview {
                    start: *first,
                    end: *end,
                    thickness: kind.thickness().width(),
                };
            }
            ToolState::PlacingOnePoint { preview: fixture, .. } => fixture_preview = fixture.clone(),
            ToolState::DragSelecting { rect, .. } if rect.has_area() => selection_rect = Some(*rect),
            _ => {}
        }

        EditorSnapshot {
            segments: self.model.segments(),
            windows: self.model.windows(),
            doors: self.model.doors(),
            labels: self.model.labels(),
            gap_patches: self.model.gap_patches(),
            transform: self.camera.transform(),
            preview,
            fixture_preview,
            selection_rect,
            snapped_vertex: self.snap.and_then(|s| s.vertex()),
            snapped_axis: self.snap.and_then(|s| s.axis()),
            moving_vertex: self.moving_vertex,
            show_grid: self.show_grid,
            layer: self.layer,
            messages: self.messages.texts(),
            hint: self.lines.hint.clone(),
            info: self.lines.info.clone(),
            status: self.lines.status.clone(),
        }
    }

    /// World to screen transform.
    pub fn camera_transform(&self) -> Affine {
        self.camera.transform()
    }

    pub fn inventory(&self) -> String {
        self.model.inventory()
    }

    pub fn model(&self) -> &PlanModel {
        &self.model
    }

    pub fn history(&self) -> &ActionLog {
        &self.history
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn tool(&self) -> &ToolState {
        &self.tool
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn messages(&self) -> &MessageStack {
        &self.messages
    }

    pub fn lines(&self) -> &TextLines {
        &self.lines
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

fn start_housekeeper(model: &PlanModel, background: bool) -> Option<Housekeeper> {
    let events = model.subscribe();
    if background {
        spawn_housekeeper(events)
    } else {
        Some(Housekeeper::inline(events))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_housekeeper(events: Receiver<ModelEvent>) -> Option<Housekeeper> {
    match Housekeeper::spawn(events) {
        Ok(housekeeper) => Some(housekeeper),
        Err(e) => {
            log::warn!("Could not start housekeeping thread, autosave disabled: {}", e);
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn spawn_housekeeper(events: Receiver<ModelEvent>) -> Option<Housekeeper> {
    Some(Housekeeper::inline(events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EntityTrait, SegmentKind};
    use crate::geometry::Bounds;
    use crate::input::MouseButton;
    use std::time::Duration;

    const VIEW: Size = Size::new(800.0, 600.0);

    fn test_config() -> EditorConfig {
        EditorConfig {
            autosave_interval_secs: None,
            history_interval_ms: 0,
            ..EditorConfig::default()
        }
    }

    fn editor() -> Editor {
        Editor::new(test_config())
    }

    fn send(editor: &mut Editor, keys: &KeyState, event: InputEvent, now: Instant) -> bool {
        editor.handle_input_at(keys, &event, VIEW, now)
    }

    fn press(editor: &mut Editor, keys: &KeyState, x: f64, y: f64, now: Instant) {
        let event = InputEvent::PointerDown {
            position: Point::new(x, y),
            button: MouseButton::Left,
        };
        send(editor, keys, event, now);
    }

    fn release(editor: &mut Editor, keys: &KeyState, x: f64, y: f64, now: Instant) {
        let event = InputEvent::PointerUp {
            position: Point::new(x, y),
            button: MouseButton::Left,
        };
        send(editor, keys, event, now);
    }

    fn click(editor: &mut Editor, x: f64, y: f64, now: Instant) {
        let keys = KeyState::new();
        press(editor, &keys, x, y, now);
        release(editor, &keys, x, y, now);
    }

    fn tool(editor: &mut Editor, tool: ToolKind, now: Instant) {
        send(editor, &KeyState::new(), InputEvent::Tool(tool), now);
    }

    fn draw_wall(editor: &mut Editor, kind: ToolKind, from: (f64, f64), to: (f64, f64), now: Instant) {
        tool(editor, kind, now);
        click(editor, from.0, from.1, now);
        click(editor, to.0, to.1, now);
    }

    #[test]
    fn test_wall_and_door_end_to_end() {
        let t = Instant::now();
        let mut editor = editor();

        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (0.0, 144.0), t);
        let segments = editor.model().segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind(), SegmentKind::ExteriorWall);
        assert_eq!(segments[0].length(), 144.0);
        assert_eq!(editor.tool(), &ToolState::Idle);

        tool(&mut editor, ToolKind::Door, t);
        send(
            &mut editor,
            &KeyState::new(),
            InputEvent::PointerMove {
                position: Point::new(2.0, 84.0),
            },
            t,
        );
        assert!(editor.snapshot().fixture_preview.is_some());
        click(&mut editor, 2.0, 84.0, t);

        let doors = editor.model().doors();
        assert_eq!(doors.len(), 1);
        assert_eq!(doors[0].rect, Bounds::new(-3, 66, 6, 36));
        assert_eq!(editor.history().undo_len(), 2);
        assert_eq!(editor.tool(), &ToolState::Idle);
    }

    #[test]
    fn test_window_without_wall_reports_once() {
        let t = Instant::now();
        let mut editor = editor();

        tool(&mut editor, ToolKind::Window, t);
        click(&mut editor, 10.0, 10.0, t);

        assert!(editor.model().windows().is_empty());
        assert_eq!(editor.messages().len(), 1);
        assert_eq!(
            editor.messages().latest(),
            Some("No exterior wall for window placement at that location.")
        );
        assert_eq!(editor.tool(), &ToolState::Idle);
    }

    #[test]
    fn test_window_rejects_interior_wall() {
        let t = Instant::now();
        let mut editor = editor();
        draw_wall(&mut editor, ToolKind::InteriorWall, (0.0, 0.0), (120.0, 0.0), t);

        tool(&mut editor, ToolKind::Window, t);
        click(&mut editor, 60.0, 0.0, t);
        assert!(editor.model().windows().is_empty());

        tool(&mut editor, ToolKind::Door, t);
        click(&mut editor, 60.0, 0.0, t);
        assert_eq!(editor.model().doors().len(), 1);
    }

    #[test]
    fn test_undo_redo_shortcuts() {
        let t = Instant::now();
        let mut editor = editor();
        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (0.0, 144.0), t);

        let ctrl = KeyState::new().with(Key::Ctrl);
        send(&mut editor, &ctrl, InputEvent::KeyDown(Key::Z), t);
        assert!(editor.model().segments().is_empty());
        assert!(editor.history().can_redo());

        send(&mut editor, &ctrl, InputEvent::KeyDown(Key::Y), t);
        assert_eq!(editor.model().segments().len(), 1);
        assert!(!editor.history().can_redo());
    }

    #[test]
    fn test_undo_is_throttled() {
        let t = Instant::now();
        let mut editor = Editor::new(EditorConfig {
            autosave_interval_secs: None,
            ..EditorConfig::default()
        });
        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (0.0, 144.0), t);
        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (144.0, 0.0), t);

        tool(&mut editor, ToolKind::Undo, t);
        tool(&mut editor, ToolKind::Undo, t + Duration::from_millis(50));
        assert_eq!(editor.model().segments().len(), 1);

        tool(&mut editor, ToolKind::Undo, t + Duration::from_millis(200));
        assert!(editor.model().segments().is_empty());
    }

    #[test]
    fn test_move_waits_for_debounce() {
        let t = Instant::now();
        let mut editor = editor();
        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (0.0, 144.0), t);

        tool(&mut editor, ToolKind::Move, t);
        click(&mut editor, 0.0, 50.0, t);
        assert_eq!(editor.selection().len(), 1);
        assert_eq!(editor.tool(), &ToolState::Moving);

        // Too soon: the press only reselects.
        let soon = t + Duration::from_millis(100);
        click(&mut editor, 0.0, 60.0, soon);
        assert_eq!(editor.model().segments()[0].start(), Vertex::new(0, 0));
        assert_eq!(editor.selection().len(), 1);

        let settled = soon + Duration::from_millis(250);
        send(&mut editor, &KeyState::new(), InputEvent::Tick, settled);
        assert_eq!(editor.snapshot().moving_vertex, Some(Vertex::new(0, 0)));

        press(&mut editor, &KeyState::new(), 60.0, 0.0, settled);
        let segments = editor.model().segments();
        let wall = &segments[0];
        assert_eq!(wall.start(), Vertex::new(60, 0));
        assert_eq!(wall.end(), Vertex::new(60, 144));
        assert_eq!(wall.length(), 144.0);
        assert_eq!(editor.tool(), &ToolState::Idle);
        assert!(editor.selection().is_empty());

        tool(&mut editor, ToolKind::Undo, settled);
        assert_eq!(editor.model().segments()[0].start(), Vertex::new(0, 0));
    }

    #[test]
    fn test_tab_moves_end_vertex() {
        let t = Instant::now();
        let mut editor = editor();
        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (0.0, 144.0), t);

        tool(&mut editor, ToolKind::Move, t);
        click(&mut editor, 0.0, 50.0, t);
        send(&mut editor, &KeyState::new(), InputEvent::KeyDown(Key::Tab), t);

        let later = t + Duration::from_millis(300);
        press(&mut editor, &KeyState::new(), 60.0, 144.0, later);
        let segments = editor.model().segments();
        let wall = &segments[0];
        assert_eq!(wall.start(), Vertex::new(60, 0));
        assert_eq!(wall.end(), Vertex::new(60, 144));
    }

    #[test]
    fn test_move_of_vanished_entity_records_nothing() {
        let t = Instant::now();
        let mut editor = editor();
        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (0.0, 144.0), t);
        let id = editor.model().segments()[0].id();

        tool(&mut editor, ToolKind::Move, t);
        click(&mut editor, 0.0, 50.0, t);
        assert_eq!(editor.selection().primary(), Some(id));
        editor.model().remove(id);

        press(&mut editor, &KeyState::new(), 60.0, 144.0, t + Duration::from_millis(300));
        assert!(editor.model().is_empty());
        assert_eq!(editor.history().undo_len(), 1);
        assert_eq!(editor.tool(), &ToolState::Idle);
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_erase_tool_deletes_selection() {
        let t = Instant::now();
        let mut editor = editor();
        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (0.0, 144.0), t);
        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (144.0, 0.0), t);

        click(&mut editor, 0.0, 50.0, t);
        assert_eq!(editor.selection().len(), 1);

        tool(&mut editor, ToolKind::Erase, t);
        assert_eq!(editor.model().segments().len(), 1);
        assert!(editor.selection().is_empty());
        assert_eq!(editor.tool(), &ToolState::Erasing);

        // Further clicks erase immediately.
        click(&mut editor, 50.0, 0.0, t);
        assert!(editor.model().segments().is_empty());
        assert_eq!(editor.history().undo_len(), 4);
    }

    #[test]
    fn test_delete_key_erases_selection() {
        let t = Instant::now();
        let mut editor = editor();
        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (0.0, 144.0), t);

        click(&mut editor, 0.0, 50.0, t);
        send(&mut editor, &KeyState::new(), InputEvent::KeyDown(Key::Delete), t);
        assert!(editor.model().is_empty());

        tool(&mut editor, ToolKind::Undo, t);
        let segments = editor.model().segments();
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].is_selected());
    }

    #[test]
    fn test_escape_cancels_placement() {
        let t = Instant::now();
        let mut editor = editor();

        tool(&mut editor, ToolKind::ExteriorWall, t);
        click(&mut editor, 0.0, 0.0, t);
        send(
            &mut editor,
            &KeyState::new(),
            InputEvent::PointerMove {
                position: Point::new(0.0, 60.0),
            },
            t,
        );
        assert_eq!(editor.snapshot().preview.end, Vertex::new(0, 60));

        send(&mut editor, &KeyState::new(), InputEvent::KeyDown(Key::Escape), t);
        assert_eq!(editor.tool(), &ToolState::Idle);
        assert!(editor.snapshot().preview.is_none());
        assert!(editor.model().is_empty());
    }

    #[test]
    fn test_drag_select() {
        let t = Instant::now();
        let mut editor = editor();
        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (0.0, 144.0), t);
        draw_wall(&mut editor, ToolKind::InteriorWall, (60.0, 0.0), (60.0, 144.0), t);

        let keys = KeyState::new();
        press(&mut editor, &keys, -20.0, -20.0, t);
        send(
            &mut editor,
            &keys,
            InputEvent::PointerMove {
                position: Point::new(200.0, 200.0),
            },
            t,
        );
        assert_eq!(editor.selection().len(), 2);
        assert_eq!(
            editor.snapshot().selection_rect,
            Some(Bounds::new(-20, -20, 220, 220))
        );

        release(&mut editor, &keys, 200.0, 200.0, t);
        assert_eq!(editor.tool(), &ToolState::Idle);
        assert_eq!(editor.selection().len(), 2);
        assert_eq!(editor.snapshot().selection_rect, None);
        assert!(editor.model().segments().iter().all(|s| s.is_selected()));
    }

    #[test]
    fn test_measure_creates_no_entity() {
        let t = Instant::now();
        let mut editor = editor();
        draw_wall(&mut editor, ToolKind::Measure, (0.0, 0.0), (0.0, 144.0), t);

        assert!(editor.model().is_empty());
        assert_eq!(editor.messages().latest(), Some("Measurement: 12 ft 0 in"));
        assert_eq!(editor.history().undo_len(), 0);
    }

    #[test]
    fn test_typed_length_overrides_pointer() {
        let t = Instant::now();
        let mut editor = editor();
        let keys = KeyState::new();

        tool(&mut editor, ToolKind::ExteriorWall, t);
        click(&mut editor, 0.0, 0.0, t);
        send(&mut editor, &keys, InputEvent::Text("4".to_string()), t);
        send(&mut editor, &keys, InputEvent::Text("8".to_string()), t);
        press(&mut editor, &keys, 100.0, 0.0, t);

        let segments = editor.model().segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end(), Vertex::new(48, 0));
    }

    #[test]
    fn test_oversized_typed_length_is_rejected() {
        let t = Instant::now();
        let mut editor = editor();
        let keys = KeyState::new();

        tool(&mut editor, ToolKind::ExteriorWall, t);
        click(&mut editor, 0.0, 0.0, t);
        send(
            &mut editor,
            &keys,
            InputEvent::Text("18446744073709551615".to_string()),
            t,
        );
        assert_eq!(editor.messages().latest(), Some("Typed length exceeds 1000000 units."));
        press(&mut editor, &keys, -102.0, 0.0, t);

        let segments = editor.model().segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end(), Vertex::new(-102, 0));

        tool(&mut editor, ToolKind::Move, t);
        click(&mut editor, -50.0, 0.0, t);
        send(&mut editor, &keys, InputEvent::KeyDown(Key::Tab), t);
        press(&mut editor, &keys, 60.0, 60.0, t + Duration::from_millis(300));

        let segments = editor.model().segments();
        let wall = &segments[0];
        assert_eq!(wall.start(), Vertex::new(162, 60));
        assert_eq!(wall.end(), Vertex::new(60, 60));
    }

    #[test]
    fn test_shift_locks_axis_and_shows_length() {
        let t = Instant::now();
        let mut editor = editor();
        let shift = KeyState::new().with(Key::Shift);

        tool(&mut editor, ToolKind::InteriorWall, t);
        press(&mut editor, &shift, 0.0, 0.0, t);
        release(&mut editor, &shift, 0.0, 0.0, t);
        send(
            &mut editor,
            &shift,
            InputEvent::PointerMove {
                position: Point::new(60.0, 18.0),
            },
            t,
        );
        assert_eq!(editor.lines().info, "Length: 5 ft 0 in");

        press(&mut editor, &shift, 60.0, 18.0, t);
        assert_eq!(editor.model().segments()[0].end(), Vertex::new(60, 0));
    }

    #[test]
    fn test_label_tool() {
        let t = Instant::now();
        let mut editor = editor();
        let keys = KeyState::at(Point::new(30.0, 30.0));

        tool(&mut editor, ToolKind::AddText, t);
        for c in ["K", "i", "t"] {
            send(&mut editor, &keys, InputEvent::Text(c.to_string()), t);
        }
        assert_eq!(editor.lines().info, "Kit");
        send(&mut editor, &keys, InputEvent::KeyDown(Key::Enter), t);

        let labels = editor.model().labels();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "Kit");
        assert_eq!(labels[0].position, Vertex::new(30, 30));
        assert_eq!(editor.tool(), &ToolState::Idle);
        assert_eq!(editor.history().undo_len(), 1);
    }

    #[test]
    fn test_shift_drag_pans() {
        let t = Instant::now();
        let mut editor = editor();
        let shift = KeyState::new().with(Key::Shift);

        press(&mut editor, &shift, 100.0, 100.0, t);
        send(
            &mut editor,
            &shift,
            InputEvent::PointerMove {
                position: Point::new(150.0, 120.0),
            },
            t,
        );
        release(&mut editor, &shift, 150.0, 120.0, t);

        assert_eq!(editor.camera_transform().translation(), kurbo::Vec2::new(50.0, 20.0));
        assert_eq!(editor.tool(), &ToolState::Idle);
    }

    #[test]
    fn test_keyboard_scroll() {
        let t = Instant::now();
        let mut editor = editor();
        let keys = KeyState::new().with(Key::D);

        send(&mut editor, &keys, InputEvent::Tick, t);
        send(&mut editor, &keys, InputEvent::Tick, t + Duration::from_secs(1));
        assert_eq!(editor.camera().offset.x, -500.0);

        let fast = KeyState::new().with(Key::D).with(Key::Shift);
        send(&mut editor, &fast, InputEvent::Tick, t + Duration::from_secs(2));
        assert_eq!(editor.camera().offset.x, -3500.0);

        let ctrl = KeyState::new().with(Key::D).with(Key::Ctrl);
        send(&mut editor, &ctrl, InputEvent::Tick, t + Duration::from_secs(3));
        assert_eq!(editor.camera().offset.x, -3500.0);
    }

    #[test]
    fn test_grid_layer_and_invalid_layer() {
        let t = Instant::now();
        let mut editor = editor();

        send(
            &mut editor,
            &KeyState::new().with(Key::Ctrl),
            InputEvent::KeyDown(Key::G),
            t,
        );
        assert!(editor.snapshot().show_grid);

        tool(&mut editor, ToolKind::Layer(2), t);
        assert_eq!(editor.layer(), 2);
        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (0.0, 144.0), t);
        assert_eq!(editor.model().segments()[0].layer(), 2);

        tool(&mut editor, ToolKind::ExteriorWall, t);
        tool(&mut editor, ToolKind::Layer(9), t);
        assert_eq!(editor.layer(), 2);
        assert_eq!(editor.tool(), &ToolState::Idle);
    }

    #[test]
    fn test_save_and_load() {
        let t = Instant::now();
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut editor = Editor::with_storage(test_config(), Arc::clone(&storage));
        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (0.0, 144.0), t);

        let ctrl = KeyState::new().with(Key::Ctrl);
        send(&mut editor, &ctrl, InputEvent::KeyDown(Key::S), t);
        assert!(storage.exists("plan").unwrap());
        assert_eq!(editor.messages().latest(), Some("Saved drawing: plan"));

        // Within the save interval nothing happens.
        assert!(!editor.save_at(t + Duration::from_millis(10)).unwrap());

        let mut other = Editor::with_storage(test_config(), storage);
        other.load_at("plan", t).unwrap();
        assert_eq!(other.model().segments(), editor.model().segments());
        assert_eq!(other.messages().latest(), Some("Loaded from save file: plan"));
    }

    #[test]
    fn test_load_tool_lists_saved_plans() {
        let t = Instant::now();
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut editor = Editor::with_storage(test_config(), Arc::clone(&storage));

        tool(&mut editor, ToolKind::Load, t);
        assert_eq!(editor.tool(), &ToolState::Loading);
        assert_eq!(editor.messages().latest(), Some("No saved drawings."));

        let document = editor.model().to_document();
        storage.save("kitchen", &document).unwrap();
        storage.save(LAST_DOCUMENT_KEY, &document).unwrap();
        storage.save("attic", &document).unwrap();
        tool(&mut editor, ToolKind::Load, t);
        assert_eq!(editor.messages().latest(), Some("Saved drawings: attic, kitchen"));
    }

    #[test]
    fn test_startup_restores_last_autosave() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let config = EditorConfig {
            autosave_interval_secs: Some(30),
            ..test_config()
        };
        let mut first = Editor::build(config.clone(), Arc::clone(&storage), false);
        draw_wall(&mut first, ToolKind::ExteriorWall, (0.0, 0.0), (0.0, 144.0), Instant::now());
        assert!(storage.exists(LAST_DOCUMENT_KEY).unwrap());

        let restored = Editor::build(config, Arc::clone(&storage), false);
        assert_eq!(restored.model().segments(), first.model().segments());
        assert_eq!(restored.messages().latest(), Some("Restored autosaved drawing."));

        let fresh = Editor::build(test_config(), storage, false);
        assert!(fresh.model().is_empty());
    }

    #[test]
    fn test_failed_load_empties_model() {
        let t = Instant::now();
        let mut editor = editor();
        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (0.0, 144.0), t);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        send(
            &mut editor,
            &KeyState::new(),
            InputEvent::FileDropped(path.clone()),
            t,
        );

        assert!(editor.model().is_empty());
        assert!(!editor.history().can_undo());
        assert_eq!(
            editor.messages().latest(),
            Some(format!("Error loading save file: {}", path.display()).as_str())
        );
    }

    #[test]
    fn test_export_commands() {
        let t = Instant::now();
        let mut editor = editor();
        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (0.0, 12.0), t);
        draw_wall(&mut editor, ToolKind::ExteriorWall, (60.0, 0.0), (60.0, 12.0), t);

        tool(&mut editor, ToolKind::ExportInventory, t);
        send(
            &mut editor,
            &KeyState::new().with(Key::Ctrl),
            InputEvent::KeyDown(Key::E),
            t,
        );

        assert_eq!(
            editor.drain_commands(),
            vec![
                ShellCommand::WriteInventory("Exterior wall: 2 x 1 ft 0 in\n".to_string()),
                ShellCommand::ExportImage,
            ]
        );
        assert!(editor.drain_commands().is_empty());
    }

    #[test]
    fn test_quit_and_exit() {
        let t = Instant::now();
        let mut editor = editor();
        assert!(send(&mut editor, &KeyState::new(), InputEvent::Tick, t));
        assert!(!send(&mut editor, &KeyState::new(), InputEvent::Tool(ToolKind::Exit), t));

        let mut editor = self::editor();
        assert!(!send(&mut editor, &KeyState::new(), InputEvent::Quit, t));
        assert!(!editor.is_running());
    }

    #[test]
    fn test_status_and_hint_lines() {
        let t = Instant::now();
        let mut editor = editor();
        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (0.0, 144.0), t);

        tool(&mut editor, ToolKind::Move, t);
        send(
            &mut editor,
            &KeyState::new(),
            InputEvent::PointerMove {
                position: Point::new(0.0, 30.0),
            },
            t,
        );
        let snapshot = editor.snapshot();
        assert_eq!(snapshot.status, "X: 0 Y: 30 Zoom: 1");
        assert_eq!(snapshot.info, "Exterior Wall (12 ft 0 in)");
        assert!(snapshot.hint.starts_with("Select an entity"));
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_autosave_follows_housekeeper() {
        let t = Instant::now();
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let config = EditorConfig {
            autosave_interval_secs: Some(30),
            ..test_config()
        };
        let mut editor = Editor::build(config, Arc::clone(&storage), false);
        assert!(!storage.exists("plan").unwrap());

        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (0.0, 144.0), t);
        assert_eq!(storage.load("plan").unwrap().entity_count(), 1);

        draw_wall(&mut editor, ToolKind::ExteriorWall, (0.0, 0.0), (144.0, 0.0), t);
        assert_eq!(storage.load("plan").unwrap().entity_count(), 1);

        send(&mut editor, &KeyState::new(), InputEvent::Tick, t + Duration::from_secs(30));
        assert_eq!(storage.load("plan").unwrap().entity_count(), 2);
    }
}
