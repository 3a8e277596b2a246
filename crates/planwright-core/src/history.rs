//! Undo/redo log of invertible edits.

use crate::entities::{Entity, EntityId};
use crate::model::PlanModel;
use std::time::Duration;
use thiserror::Error;

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Default minimum time between two undo (or two redo) steps.
pub const DEFAULT_HISTORY_INTERVAL: Duration = Duration::from_millis(150);

/// Replay failures. The record stays on the stack it was popped from.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Entity {0} is no longer in the model")]
    MissingEntity(EntityId),
}

/// One recorded edit, holding entity values by copy.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Add(Entity),
    Delete(Entity),
    Move { before: Entity, after: Entity },
}

impl Action {
    /// Undo this edit on `model`.
    fn revert(&self, model: &PlanModel) -> Result<(), HistoryError> {
        match self {
            Action::Add(entity) => remove(model, entity.id()),
            Action::Delete(entity) => {
                model.insert(deselected(entity));
                Ok(())
            }
            Action::Move { before, .. } => replace(model, before),
        }
    }

    /// Redo this edit on `model`.
    fn apply(&self, model: &PlanModel) -> Result<(), HistoryError> {
        match self {
            Action::Add(entity) => {
                model.insert(deselected(entity));
                Ok(())
            }
            Action::Delete(entity) => remove(model, entity.id()),
            Action::Move { after, .. } => replace(model, after),
        }
    }
}

fn deselected(entity: &Entity) -> Entity {
    let mut copy = entity.clone();
    copy.set_selected(false);
    copy
}

fn remove(model: &PlanModel, id: EntityId) -> Result<(), HistoryError> {
    model
        .remove(id)
        .map(|_| ())
        .ok_or(HistoryError::MissingEntity(id))
}

fn replace(model: &PlanModel, entity: &Entity) -> Result<(), HistoryError> {
    model
        .replace(deselected(entity))
        .map(|_| ())
        .ok_or(HistoryError::MissingEntity(entity.id()))
}

/// What an undo or redo request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replay {
    Applied,
    /// Nothing recorded on that stack.
    Empty,
    /// Requested again before the minimum interval elapsed.
    Throttled,
}

/// Pair of stacks recording edits in LIFO order.
///
/// Recording a new edit clears the redo stack.
#[derive(Debug, Clone)]
pub struct ActionLog {
    undo_stack: Vec<Action>,
    redo_stack: Vec<Action>,
    interval: Duration,
    last_undo: Option<Instant>,
    last_redo: Option<Instant>,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::with_interval(DEFAULT_HISTORY_INTERVAL)
    }
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            interval,
            last_undo: None,
            last_redo: None,
        }
    }

    /// Push an edit that was just performed.
    pub fn record(&mut self, action: Action) {
        self.undo_stack.push(action);
        self.redo_stack.clear();
    }

    /// Revert the most recent edit.
    pub fn undo(&mut self, model: &PlanModel, now: Instant) -> Result<Replay, HistoryError> {
        if throttled(self.last_undo, now, self.interval) {
            return Ok(Replay::Throttled);
        }
        let Some(action) = self.undo_stack.pop() else {
            return Ok(Replay::Empty);
        };

        if let Err(e) = action.revert(model) {
            self.undo_stack.push(action);
            return Err(e);
        }
        log::debug!("Undo {:?}", action);
        self.redo_stack.push(action);
        self.last_undo = Some(now);
        Ok(Replay::Applied)
    }

    /// Re-apply the most recently undone edit.
    pub fn redo(&mut self, model: &PlanModel, now: Instant) -> Result<Replay, HistoryError> {
        if throttled(self.last_redo, now, self.interval) {
            return Ok(Replay::Throttled);
        }
        let Some(action) = self.redo_stack.pop() else {
            return Ok(Replay::Empty);
        };

        if let Err(e) = action.apply(model) {
            self.redo_stack.push(action);
            return Err(e);
        }
        log::debug!("Redo {:?}", action);
        self.undo_stack.push(action);
        self.last_redo = Some(now);
        Ok(Replay::Applied)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Forget every record.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

fn throttled(last: Option<Instant>, now: Instant, interval: Duration) -> bool {
    last.is_some_and(|t| now.saturating_duration_since(t) < interval)
}
