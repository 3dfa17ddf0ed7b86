use crate::geometry::WorldPos;
use crate::object::{ObjectId, SceneObject};
use crate::scene::Scene;

/// A reversible scene edit for the undo/redo system.
pub trait Command: std::fmt::Debug + Send {
    /// Apply the edit to the scene.
    fn execute(&mut self, scene: &mut Scene);
    /// Reverse the edit.
    fn undo(&mut self, scene: &mut Scene);
    /// Human-readable description for the undo/redo history.
    fn description(&self) -> &str;
}

// ══════════════════════════════════════════════════════════════════════
// Concrete Commands
// ══════════════════════════════════════════════════════════════════════

/// Place a new object in the scene.
#[derive(Debug)]
pub struct PlaceObjectCommand {
    object: SceneObject,
    placed: bool,
}

impl PlaceObjectCommand {
    pub fn new(object: SceneObject) -> Self {
        Self {
            object,
            placed: false,
        }
    }

    pub fn object_id(&self) -> ObjectId {
        self.object.id
    }
}

impl Command for PlaceObjectCommand {
    fn execute(&mut self, scene: &mut Scene) {
        if !scene.contains(&self.object.id) {
            scene.add(self.object.clone());
            self.placed = true;
        }
    }

    fn undo(&mut self, scene: &mut Scene) {
        if self.placed {
            // Keep whatever edits the object picked up while it was live.
            if let Some((_, obj)) = scene.remove(&self.object.id) {
                self.object = obj;
            }
            self.placed = false;
        }
    }

    fn description(&self) -> &str {
        "Place object"
    }
}

/// Delete an object from the scene.
#[derive(Debug)]
pub struct DeleteObjectCommand {
    pub id: ObjectId,
    /// The removed object and its index (saved for undo).
    removed: Option<(usize, SceneObject)>,
}

impl DeleteObjectCommand {
    pub fn new(id: ObjectId) -> Self {
        Self { id, removed: None }
    }
}

impl Command for DeleteObjectCommand {
    fn execute(&mut self, scene: &mut Scene) {
        self.removed = scene.remove(&self.id);
    }

    fn undo(&mut self, scene: &mut Scene) {
        if let Some((index, obj)) = self.removed.take() {
            // Back at the original index so draw-order ties resolve as before.
            scene.insert(index, obj);
        }
    }

    fn description(&self) -> &str {
        "Delete object"
    }
}

/// Move an object by a world-space offset.
#[derive(Debug)]
pub struct MoveObjectCommand {
    pub id: ObjectId,
    pub delta: WorldPos,
}

impl MoveObjectCommand {
    pub fn new(id: ObjectId, delta: WorldPos) -> Self {
        Self { id, delta }
    }
}

impl Command for MoveObjectCommand {
    fn execute(&mut self, scene: &mut Scene) {
        if let Some(obj) = scene.get_mut(&self.id) {
            obj.position = obj.position.offset(self.delta.x, self.delta.y, self.delta.z);
        }
    }

    fn undo(&mut self, scene: &mut Scene) {
        if let Some(obj) = scene.get_mut(&self.id) {
            obj.position = obj.position.offset(-self.delta.x, -self.delta.y, -self.delta.z);
        }
    }

    fn description(&self) -> &str {
        "Move object"
    }
}

/// Replace an object's properties (name, position, health, ...) wholesale.
#[derive(Debug)]
pub struct EditObjectCommand {
    replacement: SceneObject,
}

impl EditObjectCommand {
    /// `edited` must carry the id of the object it replaces.
    pub fn new(edited: SceneObject) -> Self {
        Self {
            replacement: edited,
        }
    }

    fn swap(&mut self, scene: &mut Scene) {
        match scene.replace(self.replacement.clone()) {
            Ok(previous) => self.replacement = previous,
            Err(e) => log::warn!("edit skipped: {}", e),
        }
    }
}

impl Command for EditObjectCommand {
    fn execute(&mut self, scene: &mut Scene) {
        self.swap(scene);
    }

    fn undo(&mut self, scene: &mut Scene) {
        self.swap(scene);
    }

    fn description(&self) -> &str {
        "Edit object"
    }
}

/// Manages the undo/redo history stack.
#[derive(Debug, Default)]
pub struct CommandHistory {
    undo_stack: Vec<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn execute(&mut self, mut command: Box<dyn Command>, scene: &mut Scene) {
        command.execute(scene);
        log::debug!("executed: {}", command.description());
        self.undo_stack.push(command);
        // Executing a new command clears the redo stack.
        self.redo_stack.clear();
    }

    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        if let Some(mut command) = self.undo_stack.pop() {
            command.undo(scene);
            self.redo_stack.push(command);
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        if let Some(mut command) = self.redo_stack.pop() {
            command.execute(scene);
            self.undo_stack.push(command);
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.description())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectKind;

    fn npc(x: f64, y: f64) -> SceneObject {
        SceneObject::placed(ObjectKind::Npc, WorldPos::ground(x, y)).unwrap()
    }

    #[test]
    fn test_place_undo_redo() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        let cmd = PlaceObjectCommand::new(npc(5.0, 5.0));
        let id = cmd.object_id();
        history.execute(Box::new(cmd), &mut scene);
        assert!(scene.contains(&id));

        assert!(history.undo(&mut scene));
        assert!(scene.is_empty());
        assert!(history.redo(&mut scene));
        assert!(scene.contains(&id));
        assert_eq!(history.undo_description(), Some("Place object"));
    }

    #[test]
    fn test_delete_undo_restores_index() {
        let mut scene = Scene::new();
        let first = scene.add(npc(0.0, 0.0));
        let middle = scene.add(npc(1.0, 0.0));
        let last = scene.add(npc(2.0, 0.0));
        let mut history = CommandHistory::new();

        history.execute(Box::new(DeleteObjectCommand::new(middle)), &mut scene);
        assert_eq!(scene.len(), 2);
        history.undo(&mut scene);

        let order: Vec<ObjectId> = scene.iter().map(|o| o.id).collect();
        assert_eq!(order, vec![first, middle, last]);
    }

    #[test]
    fn test_move_undo() {
        let mut scene = Scene::new();
        let id = scene.add(npc(10.0, 20.0));
        let mut history = CommandHistory::new();
        history.execute(
            Box::new(MoveObjectCommand::new(id, WorldPos::new(5.0, -5.0, 0.0))),
            &mut scene,
        );
        assert_eq!(scene.get(&id).unwrap().position, WorldPos::ground(15.0, 15.0));
        history.undo(&mut scene);
        assert_eq!(scene.get(&id).unwrap().position, WorldPos::ground(10.0, 20.0));
    }

    #[test]
    fn test_edit_swaps_back_on_undo() {
        let mut scene = Scene::new();
        let id = scene.add(npc(0.0, 0.0));
        let mut edited = scene.get(&id).unwrap().clone().with_name("Kashya");
        edited.set_health(40.0);

        let mut history = CommandHistory::new();
        history.execute(Box::new(EditObjectCommand::new(edited)), &mut scene);
        assert_eq!(scene.get(&id).unwrap().name.as_deref(), Some("Kashya"));

        history.undo(&mut scene);
        let restored = scene.get(&id).unwrap();
        assert!(restored.name.is_none());
        assert_eq!(restored.health.unwrap().current, 100.0);

        history.redo(&mut scene);
        assert_eq!(scene.get(&id).unwrap().health.unwrap().current, 40.0);
    }

    #[test]
    fn test_new_command_clears_redo() {
        let mut scene = Scene::new();
        let mut history = CommandHistory::new();
        history.execute(Box::new(PlaceObjectCommand::new(npc(0.0, 0.0))), &mut scene);
        history.undo(&mut scene);
        assert!(history.can_redo());
        history.execute(Box::new(PlaceObjectCommand::new(npc(1.0, 1.0))), &mut scene);
        assert!(!history.can_redo());
    }
}
