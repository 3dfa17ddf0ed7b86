use serde::Serialize;

use isoscene_core::commands::{
    Command, CommandHistory, DeleteObjectCommand, EditObjectCommand, MoveObjectCommand,
    PlaceObjectCommand,
};
use isoscene_core::geometry::unproject_delta;
use isoscene_core::{
    unproject, ObjectId, ObjectKind, Point, Scene, SceneError, SceneObject, Size, WorldPos,
};

use crate::animation::{self, Ticker};
use crate::camera::{Camera, CameraSnapshot};
use crate::config::{CameraConfig, SceneConfig, ViewportConfig};
use crate::hit_test::pick;
use crate::input::{key_action, DragSession, KeyAction, KeyEvent, Tool};
use crate::render::{render, RenderToggles, ViewOptions};
use crate::render_data::Surface;

/// What side panels read: camera values, selection and follow state.
#[derive(Debug, Clone, Serialize)]
pub struct ViewportSnapshot {
    pub camera: CameraSnapshot,
    pub selected: Option<ObjectId>,
    pub following: Option<ObjectId>,
    pub tool: Tool,
    pub playing: bool,
    pub object_count: usize,
    pub can_undo: bool,
    pub can_redo: bool,
    /// Label of the edit the next undo reverts, e.g. "Place object".
    pub undo_label: Option<String>,
    pub redo_label: Option<String>,
}

/// The owned state behind one viewport.
///
/// All mutation goes through the methods here. Each one that changes what
/// would be drawn marks the state for redraw; the host checks
/// [`ViewportState::take_redraw`] and calls [`ViewportState::render`].
#[derive(Debug)]
pub struct ViewportState {
    config: ViewportConfig,
    initial_camera: CameraConfig,
    surface: Size,
    scene: Scene,
    camera: Camera,
    history: CommandHistory,
    selection: Option<ObjectId>,
    tool: Tool,
    placement_kind: ObjectKind,
    toggles: RenderToggles,
    ticker: Ticker,
    drag: Option<DragSession>,
    needs_redraw: bool,
}

impl Default for ViewportState {
    fn default() -> Self {
        let config = ViewportConfig::default();
        let initial_camera = CameraConfig::default();
        Self::assemble(config, initial_camera, Scene::new())
    }
}

impl ViewportState {
    /// Mount a viewport from a config, validating it and its objects.
    pub fn new(config: &SceneConfig) -> Result<Self, SceneError> {
        config.viewport.validate()?;
        let scene = config.build_scene()?;
        log::info!("viewport mounted with {} objects", scene.len());
        Ok(Self::assemble(config.viewport.clone(), config.camera, scene))
    }

    pub fn with_scene(
        config: ViewportConfig,
        camera: CameraConfig,
        scene: Scene,
    ) -> Result<Self, SceneError> {
        config.validate()?;
        Ok(Self::assemble(config, camera, scene))
    }

    fn assemble(config: ViewportConfig, initial_camera: CameraConfig, scene: Scene) -> Self {
        Self {
            surface: config.surface(),
            camera: Camera::new(&initial_camera, config.zoom_bounds()),
            config,
            initial_camera,
            scene,
            history: CommandHistory::new(),
            selection: None,
            tool: Tool::default(),
            placement_kind: ObjectKind::Character,
            toggles: RenderToggles::default(),
            ticker: Ticker::default(),
            drag: None,
            needs_redraw: true,
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn surface(&self) -> Size {
        self.surface
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn placement_kind(&self) -> ObjectKind {
        self.placement_kind
    }

    pub fn toggles(&self) -> RenderToggles {
        self.toggles
    }

    pub fn is_playing(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The selected object, if it still exists.
    pub fn selection(&self) -> Option<ObjectId> {
        self.selection.filter(|id| self.scene.contains(id))
    }

    /// The follow target, if follow mode is on and the target still exists.
    pub fn follow_target(&self) -> Option<ObjectId> {
        self.camera.follow_target.filter(|id| self.scene.contains(id))
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn snapshot(&self) -> ViewportSnapshot {
        ViewportSnapshot {
            camera: self.camera.snapshot(),
            selected: self.selection(),
            following: self.follow_target(),
            tool: self.tool,
            playing: self.is_playing(),
            object_count: self.scene.len(),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            undo_label: self.history.undo_description().map(str::to_string),
            redo_label: self.history.redo_description().map(str::to_string),
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// True once per batch of changes; clears the flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Draw the current state. Never mutates it.
    pub fn render(&self, surface: &mut dyn Surface) {
        let view = ViewOptions {
            toggles: self.toggles,
            selection: self.selection(),
            tool: self.tool,
        };
        render(surface, &self.camera, &self.scene, &view, &self.config);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.surface = Size::new(width, height);
        if self.surface.is_degenerate() {
            log::debug!("surface resized to {}x{}; rendering paused", width, height);
        }
        self.needs_redraw = true;
    }

    // ── Controls ─────────────────────────────────────────────────────

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.needs_redraw = true;
    }

    pub fn set_placement_kind(&mut self, kind: ObjectKind) {
        self.placement_kind = kind;
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        self.toggles.show_grid = visible;
        self.needs_redraw = true;
    }

    pub fn set_ui_visible(&mut self, visible: bool) {
        self.toggles.show_ui = visible;
        self.needs_redraw = true;
    }

    pub fn zoom_in(&mut self) {
        self.camera.zoom_in(self.config.zoom_step);
        self.needs_redraw = true;
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_out(self.config.zoom_step);
        self.needs_redraw = true;
    }

    /// Slider input; clamped.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.camera.set_zoom(zoom);
        self.needs_redraw = true;
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.camera.set_rotation(degrees);
        self.needs_redraw = true;
    }

    pub fn set_smoothing(&mut self, smoothing: f64) {
        self.camera.set_smoothing(smoothing);
        self.needs_redraw = true;
    }

    pub fn set_camera_position(&mut self, position: Point) {
        self.camera.set_position(position);
        self.needs_redraw = true;
    }

    /// Wheel input: zoom one step around the pointer. Negative `delta` zooms in.
    pub fn wheel(&mut self, screen: Point, delta: f64) {
        if delta == 0.0 || !delta.is_finite() {
            return;
        }
        let step = self.config.zoom_step;
        let factor = if delta < 0.0 { step } else { 1.0 / step };
        self.camera.zoom_at(screen, self.surface, factor);
        self.needs_redraw = true;
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset(&self.initial_camera);
        self.needs_redraw = true;
    }

    /// Fit every object on screen. Does nothing for an empty scene.
    pub fn frame_all(&mut self) {
        if let Some(bounds) = self.scene.iso_bounds() {
            self.camera.fit_bbox(&bounds, self.surface);
            self.needs_redraw = true;
        }
    }

    /// Follow the current selection, or stop following.
    pub fn set_following(&mut self, follow: bool) {
        self.camera.follow_target = if follow { self.selection() } else { None };
        if follow && self.camera.follow_target.is_none() {
            log::debug!("follow requested with nothing selected");
        }
    }

    pub fn toggle_following(&mut self) {
        let following = self.follow_target().is_some();
        self.set_following(!following);
    }

    // ── Playback ─────────────────────────────────────────────────────

    pub fn play(&mut self) {
        self.ticker.start();
    }

    /// Stops stepping at once; state stays as the last tick left it.
    pub fn pause(&mut self) {
        self.ticker.stop();
        self.needs_redraw = true;
    }

    pub fn toggle_playback(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Display-refresh callback. Does nothing while paused.
    pub fn tick(&mut self, now_ms: f64) {
        if let Some(elapsed) = self.ticker.elapsed(now_ms) {
            self.advance(elapsed);
        }
    }

    /// Step animations and the follow camera by `elapsed_ms`.
    pub fn advance(&mut self, elapsed_ms: f64) {
        let (interval, cycle) = (self.config.frame_interval_ms, self.config.frame_cycle);
        for obj in self.scene.iter_mut() {
            if let Some(anim) = &mut obj.animation {
                animation::step(anim, elapsed_ms, interval, cycle);
            }
        }

        if let Some(id) = self.camera.follow_target {
            match self.scene.get(&id) {
                Some(target) => {
                    let goal = target.iso_bbox().center();
                    self.camera.follow_step(goal);
                }
                None => {
                    log::debug!("follow target {} is gone; follow off", id);
                    self.camera.follow_target = None;
                }
            }
        }
        self.needs_redraw = true;
    }

    // ── Scene edits ──────────────────────────────────────────────────

    /// Select an object, or clear the selection. Unknown ids clear it.
    pub fn select(&mut self, id: Option<ObjectId>) {
        self.selection = id.filter(|id| self.scene.contains(id));
        self.needs_redraw = true;
    }

    /// Place an object of `kind` at a world position and select it.
    pub fn place(&mut self, kind: ObjectKind, position: WorldPos) -> Result<ObjectId, SceneError> {
        let object = SceneObject::placed(kind, position)?;
        self.place_object(object)
    }

    /// Place a fully built object and select it.
    pub fn place_object(&mut self, object: SceneObject) -> Result<ObjectId, SceneError> {
        object.validate()?;
        let command = PlaceObjectCommand::new(object);
        let id = command.object_id();
        self.run(Box::new(command));
        self.selection = Some(id);
        Ok(id)
    }

    /// Remove an object. Selection and follow pointing at it are cleared.
    pub fn delete(&mut self, id: ObjectId) -> bool {
        if !self.scene.contains(&id) {
            return false;
        }
        self.run(Box::new(DeleteObjectCommand::new(id)));
        self.release_references();
        true
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selection() {
            Some(id) => self.delete(id),
            None => false,
        }
    }

    /// Move an object by a world offset as one undoable step.
    pub fn move_object(&mut self, id: ObjectId, delta: WorldPos) -> Result<(), SceneError> {
        let obj = self.scene.get(&id).ok_or(SceneError::UnknownObject(id))?;
        if !obj.position.offset(delta.x, delta.y, delta.z).is_finite() {
            return Err(SceneError::NonFinitePosition);
        }
        self.run(Box::new(MoveObjectCommand::new(id, delta)));
        Ok(())
    }

    /// Edit an object's properties as one undoable step. The edit is
    /// validated before it is applied.
    pub fn update_object(
        &mut self,
        id: ObjectId,
        edit: impl FnOnce(&mut SceneObject),
    ) -> Result<(), SceneError> {
        let mut edited = self
            .scene
            .get(&id)
            .cloned()
            .ok_or(SceneError::UnknownObject(id))?;
        edit(&mut edited);
        edited.id = id;
        edited.validate()?;
        self.run(Box::new(EditObjectCommand::new(edited)));
        Ok(())
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_drag();
        let undone = self.history.undo(&mut self.scene);
        if undone {
            self.release_references();
            self.needs_redraw = true;
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_drag();
        let redone = self.history.redo(&mut self.scene);
        if redone {
            self.release_references();
            self.needs_redraw = true;
        }
        redone
    }

    fn run(&mut self, command: Box<dyn Command>) {
        // History must never see an unrecorded drag preview.
        self.cancel_drag();
        self.history.execute(command, &mut self.scene);
        self.needs_redraw = true;
    }

    /// Drop selection, follow target and drag session that point at
    /// objects no longer in the scene.
    fn release_references(&mut self) {
        self.selection = self.selection();
        self.camera.follow_target = self.follow_target();
        if let Some(DragSession::Object { id, .. }) = self.drag {
            if !self.scene.contains(&id) {
                self.drag = None;
            }
        }
    }

    // ── Pointer input ────────────────────────────────────────────────

    /// Ground-plane world position under a surface pixel.
    pub fn screen_to_ground(&self, screen: Point) -> WorldPos {
        unproject(self.camera.screen_to_world(screen, self.surface), 0.0)
    }

    pub fn pointer_down(&mut self, screen: Point) {
        if self.surface.is_degenerate() || !screen.is_finite() {
            return;
        }
        // A missed pointer-up must not leave a stale session behind.
        self.cancel_drag();

        match self.tool {
            Tool::Select => {
                let hit = pick(&self.scene, &self.camera, self.surface, screen);
                self.select(hit);
            }
            Tool::Move => {
                self.drag = Some(DragSession::Pan {
                    start_pointer: screen,
                    start_camera: self.camera.position(),
                });
            }
            Tool::Place => {
                let position = self.screen_to_ground(screen);
                if let Err(e) = self.place(self.placement_kind, position) {
                    log::warn!("placement at {:?} rejected: {}", position, e);
                }
            }
            Tool::Drag => {
                let hit = pick(&self.scene, &self.camera, self.surface, screen);
                self.select(hit);
                if let Some(id) = hit {
                    if let Some(obj) = self.scene.get(&id) {
                        self.drag = Some(DragSession::Object {
                            id,
                            start_pointer: screen,
                            start_position: obj.position,
                        });
                    }
                }
            }
        }
    }

    /// End any drag session without recording it. An object being dragged
    /// goes back to where the drag started.
    pub fn cancel_drag(&mut self) {
        if let Some(DragSession::Object {
            id, start_position, ..
        }) = self.drag.take()
        {
            if let Some(obj) = self.scene.get_mut(&id) {
                obj.position = start_position;
                self.needs_redraw = true;
            }
        }
    }

    pub fn pointer_move(&mut self, screen: Point) {
        if !screen.is_finite() {
            return;
        }
        let Some(session) = self.drag else {
            return;
        };
        match session {
            DragSession::Pan {
                start_pointer,
                start_camera,
            } => {
                self.camera
                    .pan_from(start_camera, screen.x - start_pointer.x, screen.y - start_pointer.y);
            }
            DragSession::Object {
                id,
                start_pointer,
                start_position,
            } => {
                let (dx, dy) = self.ground_delta(start_pointer, screen);
                if let Some(obj) = self.scene.get_mut(&id) {
                    obj.position = start_position.offset(dx, dy, 0.0);
                }
            }
        }
        self.needs_redraw = true;
    }

    /// Ends any drag session, whether or not the pointer is still over the
    /// surface.
    pub fn pointer_up(&mut self, screen: Point) {
        let Some(session) = self.drag.take() else {
            return;
        };
        if let DragSession::Object {
            id,
            start_pointer,
            start_position,
        } = session
        {
            let (dx, dy) = if screen.is_finite() {
                self.ground_delta(start_pointer, screen)
            } else {
                (0.0, 0.0)
            };
            if let Some(obj) = self.scene.get_mut(&id) {
                // Rewind the live preview and record the whole drag as one move.
                obj.position = start_position;
                if dx != 0.0 || dy != 0.0 {
                    self.run(Box::new(MoveObjectCommand::new(id, WorldPos::new(dx, dy, 0.0))));
                }
            }
        }
        self.needs_redraw = true;
    }

    fn ground_delta(&self, from: Point, to: Point) -> (f64, f64) {
        let a = self.camera.screen_to_world(from, self.surface);
        let b = self.camera.screen_to_world(to, self.surface);
        unproject_delta(b.x - a.x, b.y - a.y)
    }

    // ── Keyboard input ───────────────────────────────────────────────

    pub fn key_down(&mut self, event: KeyEvent) {
        let Some(action) = key_action(&event) else {
            return;
        };
        match action {
            KeyAction::Nudge { dx, dy } => {
                let step = self.config.nudge_step / self.camera.zoom();
                self.camera.nudge(dx * step, dy * step);
                self.needs_redraw = true;
            }
            KeyAction::DeleteSelected => {
                self.delete_selected();
            }
            KeyAction::ZoomIn => self.zoom_in(),
            KeyAction::ZoomOut => self.zoom_out(),
            KeyAction::ResetCamera => self.reset_camera(),
            KeyAction::FrameAll => self.frame_all(),
            KeyAction::ToggleFollow => self.toggle_following(),
            KeyAction::ToggleGrid => self.set_grid_visible(!self.toggles.show_grid),
            KeyAction::ToggleUi => self.set_ui_visible(!self.toggles.show_ui),
            KeyAction::TogglePlayback => self.toggle_playback(),
            KeyAction::Undo => {
                self.undo();
            }
            KeyAction::Redo => {
                self.redo();
            }
        }
    }
}
