//! Selection set and the select, drag-select, move and erase gestures.

use super::{Editor, EditorError};
use crate::entities::{Entity, EntityId};
use crate::geometry::{Bounds, Vertex};
use crate::history::Action;
use crate::input::InputEvent;
use crate::tools::{SelectMode, ToolState};
use kurbo::Point;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Ids of the selected entities and when they were selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: Vec<EntityId>,
    since: Option<Instant>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection. An empty `ids` clears it.
    pub fn set(&mut self, ids: Vec<EntityId>, now: Instant) {
        self.since = if ids.is_empty() { None } else { Some(now) };
        self.ids = ids;
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.since = None;
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Entity a move relocates.
    pub fn primary(&self) -> Option<EntityId> {
        self.ids.first().copied()
    }

    /// True once a non-empty selection is at least `debounce` old.
    pub fn is_settled(&self, now: Instant, debounce: Duration) -> bool {
        self.since
            .is_some_and(|since| now.saturating_duration_since(since) >= debounce)
    }
}

impl Editor {
    /// Pointer handling shared by the idle, moving and erasing tools.
    pub(super) fn handle_selecting(
        &mut self,
        mode: SelectMode,
        event: &InputEvent,
        world: Point,
        now: Instant,
    ) -> Result<(), EditorError> {
        if event.is_commit() {
            if mode == SelectMode::Move
                && self.selection.is_settled(now, self.config.move_debounce())
            {
                return self.commit_move(world);
            }
            self.select_at(world, now);
            self.tool = ToolState::DragSelecting {
                mode,
                start: Vertex::round(world),
                rect: Bounds::default(),
            };
        } else if let ToolState::DragSelecting { start, .. } = self.tool {
            match event {
                InputEvent::PointerMove { .. } => {
                    let rect = Bounds::from_corners(start, Vertex::round(world));
                    if rect.has_area() {
                        let hits = self.model.entities_in_rect(&rect);
                        self.selection
                            .set(hits.iter().map(Entity::id).collect(), now);
                    }
                    self.tool = ToolState::DragSelecting { mode, start, rect };
                }
                InputEvent::PointerUp { .. } => self.tool = mode.resting_state(),
                _ => {}
            }
        }

        self.moving_vertex = None;
        if mode == SelectMode::Move && self.selection.is_settled(now, self.config.move_debounce())
        {
            self.moving_vertex = self
                .selection
                .primary()
                .and_then(|id| self.model.get(id))
                .map(|e| e.moving_vertex(self.use_start));
        }

        if mode == SelectMode::Erase {
            self.erase_selection()?;
        }
        Ok(())
    }

    /// Select exactly the entity under `world`, or nothing.
    fn select_at(&mut self, world: Point, now: Instant) {
        let hit = self.model.entity_at_point(world);
        self.selection.set(hit.iter().map(Entity::id).collect(), now);
    }

    /// Relocate the primary selected entity to the adjusted pointer.
    fn commit_move(&mut self, world: Point) -> Result<(), EditorError> {
        let id = self
            .selection
            .primary()
            .ok_or_else(|| EditorError::InvalidState("nothing selected to move".to_string()))?;
        let before = self.model.get(id).ok_or(EditorError::EntityNotFound(id))?;

        let target = self.adjusted_pointer(world, None).point;
        let mut after = before.clone();
        after.move_to(target, self.use_start);
        after.adjust_after_move(&self.model, target);
        after.set_selected(false);

        self.model
            .replace(after.clone())
            .ok_or(EditorError::EntityNotFound(id))?;
        log::debug!("Moved {} to {:?}", after.describe(), target);
        self.history.record(Action::Move { before, after });
        self.reset();
        Ok(())
    }

    /// Delete every selected entity, one Delete record each.
    ///
    /// Every id is resolved before anything is removed, so a stale id
    /// leaves the model untouched.
    pub fn erase_selection(&mut self) -> Result<usize, EditorError> {
        if self.selection.is_empty() {
            return Ok(0);
        }
        let entities = self
            .selection
            .ids()
            .iter()
            .map(|&id| self.model.get(id).ok_or(EditorError::EntityNotFound(id)))
            .collect::<Result<Vec<_>, _>>()?;

        for entity in &entities {
            self.model.remove(entity.id());
            log::debug!("Erased {}", entity.describe());
            self.history.record(Action::Delete(entity.clone()));
        }
        self.selection.clear();
        self.model.clear_selection();
        Ok(entities.len())
    }
}
