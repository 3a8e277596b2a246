//! Live entity collections and the state derived from them.
//!
//! Each collection sits behind its own lock. A method holds at most one lock
//! at a time and change notifications go out only after the lock is
//! released, so a listener may call back into the model.

use crate::document::PlanDocument;
use crate::entities::{
    Entity, EntityId, EntityKind, EntityTrait, Fixture, FixtureKind, Label, Layer, Segment,
    SegmentKind,
};
use crate::geometry::{Bounds, Vertex};
use crate::units::format_feet_inches;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::mpsc::{Receiver, Sender, channel};

/// Default maximum distance between a fixture and its wall.
pub const DEFAULT_ATTACH_DISTANCE: f64 = 100.0;

/// Square filling the miter gap where two walls meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapPatch {
    pub rect: Bounds,
    pub layer: Layer,
}

/// Structural change broadcast to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    Added { kind: EntityKind, id: EntityId },
    Removed { kind: EntityKind, id: EntityId },
    Replaced { kind: EntityKind, id: EntityId },
    /// Every collection was replaced at once (clear or load).
    Reset,
}

/// Owner of every entity in the plan.
pub struct PlanModel {
    segments: Mutex<Vec<Segment>>,
    windows: Mutex<Vec<Fixture>>,
    doors: Mutex<Vec<Fixture>>,
    labels: Mutex<Vec<Label>>,
    vertices: Mutex<BTreeSet<Vertex>>,
    gap_patches: Mutex<Vec<GapPatch>>,
    listeners: Mutex<Vec<Sender<ModelEvent>>>,
    pub(crate) attach_distance: f64,
}

impl Default for PlanModel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PlanModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let segments = self.segments.lock().len();
        let windows = self.windows.lock().len();
        let doors = self.doors.lock().len();
        let labels = self.labels.lock().len();
        f.debug_struct("PlanModel")
            .field("segments", &segments)
            .field("windows", &windows)
            .field("doors", &doors)
            .field("labels", &labels)
            .finish()
    }
}

impl PlanModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::with_attach_distance(DEFAULT_ATTACH_DISTANCE)
    }

    /// Create an empty model with a custom fixture attach distance.
    pub fn with_attach_distance(attach_distance: f64) -> Self {
        Self {
            segments: Mutex::new(Vec::new()),
            windows: Mutex::new(Vec::new()),
            doors: Mutex::new(Vec::new()),
            labels: Mutex::new(Vec::new()),
            vertices: Mutex::new(BTreeSet::new()),
            gap_patches: Mutex::new(Vec::new()),
            listeners: Mutex::new(Vec::new()),
            attach_distance,
        }
    }

    /// Receive a [`ModelEvent`] for every structural change.
    pub fn subscribe(&self) -> Receiver<ModelEvent> {
        let (tx, rx) = channel();
        self.listeners.lock().push(tx);
        rx
    }

    fn notify(&self, event: ModelEvent) {
        self.listeners.lock().retain(|tx| tx.send(event).is_ok());
    }

    // --- Construction helpers -------------------------------------------

    /// Create and register a segment.
    pub fn add_segment(&self, kind: SegmentKind, start: Vertex, end: Vertex, layer: Layer) -> Segment {
        let mut segment = Segment::new(kind, start, end);
        segment.layer = layer;
        self.insert(Entity::Segment(segment.clone()));
        segment
    }

    /// Create and register a window centered on `center`.
    pub fn add_window(&self, center: Vertex, horizontal: bool, layer: Layer) -> Fixture {
        let mut window = Fixture::window(center, horizontal);
        window.layer = layer;
        self.insert(Entity::Fixture(window.clone()));
        window
    }

    /// Create and register a door centered on `center`.
    pub fn add_door(&self, center: Vertex, horizontal: bool, thickness: i64, layer: Layer) -> Fixture {
        let mut door = Fixture::door(center, horizontal, thickness);
        door.layer = layer;
        self.insert(Entity::Fixture(door.clone()));
        door
    }

    /// Create and register a text label.
    pub fn add_label(&self, text: &str, position: Vertex, layer: Layer) -> Label {
        let mut label = Label::new(text, position);
        label.layer = layer;
        self.insert(Entity::Label(label.clone()));
        label
    }

    // --- Collection membership ------------------------------------------

    /// Add an already constructed entity to its collection.
    pub fn insert(&self, entity: Entity) {
        let kind = entity.kind();
        let id = entity.id();
        match entity {
            Entity::Segment(s) => self.segments.lock().push(s),
            Entity::Fixture(f) => match f.kind {
                FixtureKind::Window => self.windows.lock().push(f),
                FixtureKind::Door => self.doors.lock().push(f),
            },
            Entity::Label(l) => self.labels.lock().push(l),
        }
        if kind == EntityKind::Segment {
            self.rebuild_derived_state();
        }
        log::debug!("Added {:?} {}", kind, id);
        self.notify(ModelEvent::Added { kind, id });
    }

    /// Remove an entity by id, returning it.
    pub fn remove(&self, id: EntityId) -> Option<Entity> {
        let removed = take_by_id(&self.segments, id)
            .map(Entity::Segment)
            .or_else(|| take_by_id(&self.windows, id).map(Entity::Fixture))
            .or_else(|| take_by_id(&self.doors, id).map(Entity::Fixture))
            .or_else(|| take_by_id(&self.labels, id).map(Entity::Label))?;

        let kind = removed.kind();
        if kind == EntityKind::Segment {
            self.rebuild_derived_state();
        }
        log::debug!("Removed {:?} {}", kind, id);
        self.notify(ModelEvent::Removed { kind, id });
        Some(removed)
    }

    /// Swap in a new value for the entity with the same id, returning the
    /// previous value. Returns `None` (and changes nothing) when no entity
    /// with that id exists in the matching collection.
    pub fn replace(&self, entity: Entity) -> Option<Entity> {
        let kind = entity.kind();
        let id = entity.id();
        let previous = match entity {
            Entity::Segment(s) => swap_by_id(&self.segments, s).map(Entity::Segment),
            Entity::Fixture(f) => match f.kind {
                FixtureKind::Window => swap_by_id(&self.windows, f).map(Entity::Fixture),
                FixtureKind::Door => swap_by_id(&self.doors, f).map(Entity::Fixture),
            },
            Entity::Label(l) => swap_by_id(&self.labels, l).map(Entity::Label),
        }?;

        if kind == EntityKind::Segment {
            self.rebuild_derived_state();
        }
        log::debug!("Replaced {:?} {}", kind, id);
        self.notify(ModelEvent::Replaced { kind, id });
        Some(previous)
    }

    /// Look up an entity by id.
    pub fn get(&self, id: EntityId) -> Option<Entity> {
        find_by_id(&self.segments, id)
            .map(Entity::Segment)
            .or_else(|| find_by_id(&self.windows, id).map(Entity::Fixture))
            .or_else(|| find_by_id(&self.doors, id).map(Entity::Fixture))
            .or_else(|| find_by_id(&self.labels, id).map(Entity::Label))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Drop every entity and all derived state.
    pub fn clear(&self) {
        self.segments.lock().clear();
        self.windows.lock().clear();
        self.doors.lock().clear();
        self.labels.lock().clear();
        self.rebuild_derived_state();
        self.notify(ModelEvent::Reset);
    }

    // --- Read access ----------------------------------------------------

    pub fn segments(&self) -> Vec<Segment> {
        self.segments.lock().clone()
    }

    pub fn windows(&self) -> Vec<Fixture> {
        self.windows.lock().clone()
    }

    pub fn doors(&self) -> Vec<Fixture> {
        self.doors.lock().clone()
    }

    pub fn labels(&self) -> Vec<Label> {
        self.labels.lock().clone()
    }

    /// Deduplicated endpoints of every segment, in lexicographic order.
    pub fn vertices(&self) -> BTreeSet<Vertex> {
        self.vertices.lock().clone()
    }

    pub fn gap_patches(&self) -> Vec<GapPatch> {
        self.gap_patches.lock().clone()
    }

    /// Every entity, doors first, then windows, segments and labels.
    pub fn entities(&self) -> Vec<Entity> {
        let mut all: Vec<Entity> = self.doors().into_iter().map(Entity::Fixture).collect();
        all.extend(self.windows().into_iter().map(Entity::Fixture));
        all.extend(self.segments().into_iter().map(Entity::Segment));
        all.extend(self.labels().into_iter().map(Entity::Label));
        all
    }

    pub fn len(&self) -> usize {
        let segments = self.segments.lock().len();
        let windows = self.windows.lock().len();
        let doors = self.doors.lock().len();
        let labels = self.labels.lock().len();
        segments + windows + doors + labels
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // --- Selection flags ------------------------------------------------

    /// Mark exactly the entities in `ids` as selected.
    pub fn select_only(&self, ids: &[EntityId]) {
        set_selection(&self.doors, ids);
        set_selection(&self.windows, ids);
        set_selection(&self.segments, ids);
        set_selection(&self.labels, ids);
    }

    pub fn clear_selection(&self) {
        self.select_only(&[]);
    }

    // --- Derived state --------------------------------------------------

    /// Recompute the vertex set and the gap patches from the segments.
    pub fn rebuild_derived_state(&self) {
        let segments = self.segments();

        let vertices: BTreeSet<Vertex> = segments
            .iter()
            .flat_map(|s| [s.start(), s.end()])
            .collect();
        *self.vertices.lock() = vertices;

        *self.gap_patches.lock() = gap_patches_for(&segments);
    }

    // --- Reporting ------------------------------------------------------

    /// Wall tally grouped by kind and length, one line per group in order
    /// of first occurrence.
    pub fn inventory(&self) -> String {
        let mut groups: Vec<(SegmentKind, f64, usize)> = Vec::new();
        for segment in self.segments.lock().iter().filter(|s| s.kind().is_wall()) {
            let key = (segment.kind(), segment.length());
            match groups.iter_mut().find(|(k, l, _)| (*k, *l) == key) {
                Some(group) => group.2 += 1,
                None => groups.push((key.0, key.1, 1)),
            }
        }

        groups
            .into_iter()
            .map(|(kind, length, count)| {
                let name = match kind {
                    SegmentKind::ExteriorWall => "Exterior wall",
                    _ => "Interior wall",
                };
                format!("{}: {} x {}\n", name, count, format_feet_inches(length))
            })
            .collect()
    }

    // --- Persistence ----------------------------------------------------

    /// Copy the collections into a persistable document.
    pub fn to_document(&self) -> PlanDocument {
        PlanDocument {
            segments: self.segments(),
            windows: self.windows(),
            doors: self.doors(),
            labels: self.labels(),
            ..PlanDocument::default()
        }
    }

    /// Replace every collection with the contents of `document`.
    pub fn load_document(&self, document: PlanDocument) {
        let PlanDocument {
            segments,
            windows,
            doors,
            labels,
            ..
        } = document;
        *self.segments.lock() = segments;
        *self.windows.lock() = windows;
        *self.doors.lock() = doors;
        *self.labels.lock() = labels;
        self.rebuild_derived_state();
        self.notify(ModelEvent::Reset);
    }
}

fn gap_patches_for(segments: &[Segment]) -> Vec<GapPatch> {
    let mut patches = Vec::new();
    for wall in segments.iter().filter(|s| s.kind().is_wall()) {
        let width = wall.thickness().width();
        let patch_at = |v: Vertex| GapPatch {
            rect: Bounds::new(v.x - width / 2, v.y - width / 2, width, width),
            layer: wall.layer,
        };

        for other in segments.iter().filter(|o| o.kind().is_wall()) {
            if other.id() == wall.id() {
                continue;
            }
            if wall.start() == other.start() || wall.start() == other.end() {
                patches.push(patch_at(wall.start()));
            }
            if wall.end() == other.end() || wall.end() == other.start() {
                patches.push(patch_at(wall.end()));
            }
        }
    }
    patches
}

fn take_by_id<T: EntityTrait>(collection: &Mutex<Vec<T>>, id: EntityId) -> Option<T> {
    let mut items = collection.lock();
    let index = items.iter().position(|e| e.id() == id)?;
    Some(items.remove(index))
}

fn swap_by_id<T: EntityTrait>(collection: &Mutex<Vec<T>>, entity: T) -> Option<T> {
    let mut items = collection.lock();
    let slot = items.iter_mut().find(|e| e.id() == entity.id())?;
    Some(std::mem::replace(slot, entity))
}

fn find_by_id<T: EntityTrait + Clone>(collection: &Mutex<Vec<T>>, id: EntityId) -> Option<T> {
    collection.lock().iter().find(|e| e.id() == id).cloned()
}

fn set_selection<T: EntityTrait>(collection: &Mutex<Vec<T>>, ids: &[EntityId]) {
    for item in collection.lock().iter_mut() {
        let selected = ids.contains(&item.id());
        item.set_selected(selected);
    }
}
