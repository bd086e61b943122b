//! The diagram repository: the single source of truth.
//!
//! Every operation follows the same path:
//!
//! ```text
//! clone current snapshot
//!     ↓ validate against capabilities and structure (may reject)
//!     ↓ mutate the clone
//!     ↓ re-run layout up the affected owner chains
//!     ↓ reroute relationships whose endpoints moved, recompute size
//! commit as the new immutable snapshot (version + 1)
//! ```
//!
//! A rejected operation drops the clone, so the committed snapshot is never
//! partially updated. Operations that change nothing do not bump the
//! version.

use std::sync::Arc;

use log::{debug, trace};

use trellis_core::{
    element::{Capabilities, Element, ElementKind, Resizable},
    geometry::{Bounds, Point, Size},
    identifier::Id,
    kind::KindRegistry,
    layout::LayoutEngine,
    relationship::{Endpoint, Message, MessageDirection, Relationship, RelationshipKind},
    routing,
    text::{MonospaceMeasurer, TextMeasurer},
};

use crate::{
    config::AppConfig,
    error::Rejection,
    model::{DiagramType, Score},
    snapshot::{EntityRef, Snapshot},
};

/// Parameters of [`Repository::add_element`].
///
/// # Examples
///
/// ```
/// # use trellis::{Repository, NewElement, model::DiagramType};
/// # use trellis_core::{element::ElementKind, geometry::Bounds};
/// let mut repo = Repository::new(DiagramType::ClassDiagram);
/// let id = repo
///     .add_element(NewElement::new(ElementKind::Package).bounds(Bounds::new(0.0, 0.0, 200.0, 100.0)))
///     .unwrap();
/// assert!(repo.element(id).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct NewElement {
    kind: ElementKind,
    name: String,
    bounds: Option<Bounds>,
    owner: Option<Id>,
}

impl NewElement {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            name: String::new(),
            bounds: None,
            owner: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Initial bounds in the owner's frame. Defaults to the kind's creation
    /// size at the frame origin.
    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn owner(mut self, owner: Id) -> Self {
        self.owner = Some(owner);
        self
    }
}

#[derive(Debug)]
pub struct Repository {
    snapshot: Arc<Snapshot>,
    registry: KindRegistry,
    engine: LayoutEngine,
    routing_margin: f32,
    readonly: bool,
}

impl Repository {
    /// Creates an empty repository with the default configuration.
    pub fn new(diagram_type: DiagramType) -> Self {
        Self::with_config(diagram_type, &AppConfig::default())
    }

    pub fn with_config(diagram_type: DiagramType, config: &AppConfig) -> Self {
        Self::with_measurer(diagram_type, config, Arc::new(MonospaceMeasurer))
    }

    /// Creates an empty repository that measures labels with `measurer`.
    pub fn with_measurer(
        diagram_type: DiagramType,
        config: &AppConfig,
        measurer: Arc<dyn TextMeasurer>,
    ) -> Self {
        let layout = config.layout();
        let engine = LayoutEngine::new(measurer, config.style().text_definition())
            .with_container_margin(layout.container_margin());
        let registry = KindRegistry::new()
            .with_default_size(Size::new(layout.default_width(), layout.default_height()));

        Self {
            snapshot: Arc::new(Snapshot::new(diagram_type)),
            registry,
            engine,
            routing_margin: layout.routing_margin(),
            readonly: false,
        }
    }

    /// Replaces the whole diagram, e.g. after importing a model.
    ///
    /// The loaded snapshot is taken as-is, without layout.
    pub fn load(&mut self, mut snapshot: Snapshot) {
        snapshot.set_version(self.snapshot.version() + 1);
        debug!(
            version = snapshot.version(),
            elements = snapshot.element_count();
            "Snapshot loaded"
        );
        self.snapshot = Arc::new(snapshot);
    }

    /// Current snapshot. Cheap to clone and never changes once handed out.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn version(&self) -> u64 {
        self.snapshot.version()
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    /// Kind table used for capability checks. Overrides apply to later operations.
    pub fn registry_mut(&mut self) -> &mut KindRegistry {
        &mut self.registry
    }

    pub fn layout_engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// In read-only mode geometry and content mutations are rejected with
    /// [`Rejection::ReadOnly`]; selection, hover, interactivity and
    /// assessments stay available.
    pub fn set_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
    }

    /// Read-only lookup of an element or relationship.
    pub fn get_by_id(&self, id: Id) -> Option<EntityRef<'_>> {
        self.snapshot.get(id)
    }

    pub fn element(&self, id: Id) -> Option<&Element> {
        self.snapshot.element(id)
    }

    pub fn relationship(&self, id: Id) -> Option<&Relationship> {
        self.snapshot.relationship(id)
    }

    pub fn capabilities(&self, kind: ElementKind) -> Capabilities {
        self.registry.capabilities(kind)
    }

    // ==================
    // Operations
    // ==================

    /// Creates an element with a fresh id and lays it out.
    pub fn add_element(&mut self, new: NewElement) -> Result<Id, Rejection> {
        self.apply("add_element", move |repo, next| {
            repo.ensure_writable()?;
            if let Some(owner) = new.owner {
                repo.ensure_droppable(next, owner)?;
            }

            let bounds = new.bounds.unwrap_or_else(|| {
                Bounds::new_from_top_left(Point::default(), repo.registry.default_size(new.kind))
            });
            validate_size(bounds.to_size())?;
            validate_position(bounds.min_point())?;

            let id = Id::generate();
            let element = Element::new(id, new.kind, new.name)
                .with_bounds(bounds)
                .with_owner(new.owner);
            next.insert_element(element);
            repo.relayout_chain(next, Some(id));
            Ok(id)
        })
    }

    /// Sets `selected` on exactly the given ids.
    ///
    /// Unknown and non-selectable ids are ignored. Unless `additive`, every
    /// other entity is deselected first. The last accepted id becomes the
    /// primary selection.
    pub fn select(&mut self, ids: &[Id], additive: bool) -> Result<(), Rejection> {
        self.apply("select", |repo, next| {
            let accepted: Vec<Id> = ids
                .iter()
                .copied()
                .filter(|id| repo.is_selectable(next, *id))
                .collect();

            if !additive {
                next.elements_mut().for_each(|e| e.set_selected(false));
                next.relationships_mut().for_each(|r| r.set_selected(false));
                next.set_primary(None);
            }
            for id in &accepted {
                set_selected(next, *id, true);
            }
            if let Some(last) = accepted.last() {
                next.set_primary(Some(*last));
            }
            Ok(())
        })
    }

    /// Clears `selected` on the given ids. Unknown ids are ignored.
    pub fn deselect(&mut self, ids: &[Id]) -> Result<(), Rejection> {
        self.apply("deselect", |_, next| {
            for id in ids {
                set_selected(next, *id, false);
                if next.primary_selection() == Some(*id) {
                    next.set_primary(None);
                }
            }
            Ok(())
        })
    }

    /// Marks `id` as hovered. No-op for unknown or non-hoverable ids.
    pub fn hover(&mut self, id: Id) -> Result<(), Rejection> {
        self.apply("hover", |repo, next| {
            repo.set_hovered(next, id, true);
            Ok(())
        })
    }

    /// Clears the hovered flag of `id`. No-op for unknown ids.
    pub fn leave(&mut self, id: Id) -> Result<(), Rejection> {
        self.apply("leave", |repo, next| {
            repo.set_hovered(next, id, false);
            Ok(())
        })
    }

    /// Translates an element's origin by `delta`.
    ///
    /// Children are expressed in their owner's frame, so they follow the
    /// element without being touched. With `id == None` every selected
    /// movable element whose owner chain holds no other selected element is
    /// moved instead.
    pub fn move_by(&mut self, id: Option<Id>, delta: Point) -> Result<(), Rejection> {
        self.apply("move", |repo, next| {
            repo.ensure_writable()?;
            if !delta.is_finite() {
                return Err(Rejection::InvalidDelta {
                    dx: delta.x(),
                    dy: delta.y(),
                });
            }

            let targets = match id {
                Some(id) => {
                    let element = next.element(id).ok_or(Rejection::UnknownId(id))?;
                    if !repo.registry.capabilities(element.kind()).movable {
                        return Err(Rejection::NotMovable(id));
                    }
                    vec![id]
                }
                None => repo.movable_selection(next),
            };
            if targets.is_empty() {
                return Err(Rejection::NothingToMove);
            }

            let mut owners = Vec::with_capacity(targets.len());
            for target in &targets {
                if let Some(element) = next.element_mut(*target) {
                    element.set_bounds(element.bounds().translate(delta));
                    owners.push(element.owner());
                }
            }
            for owner in owners {
                repo.relayout_chain(next, owner);
            }
            trace!(count = targets.len(), dx = delta.x(), dy = delta.y(); "Elements moved");
            Ok(())
        })
    }

    /// Changes the size of an element on the axes its kind allows.
    ///
    /// The new size becomes the element's preferred size, below which layout
    /// will not shrink it.
    pub fn resize(&mut self, id: Id, size: Size) -> Result<(), Rejection> {
        self.apply("resize", |repo, next| {
            repo.ensure_writable()?;
            let element = next.element(id).ok_or(Rejection::UnknownId(id))?;
            let policy = repo.registry.capabilities(element.kind()).resizable;
            if policy == Resizable::None {
                return Err(Rejection::NotResizable(id));
            }
            validate_size(size)?;

            let current = element.bounds().to_size();
            let size = Size::new(
                if policy.allows_width() {
                    size.width()
                } else {
                    current.width()
                },
                if policy.allows_height() {
                    size.height()
                } else {
                    current.height()
                },
            );

            if let Some(element) = next.element_mut(id) {
                element.set_bounds(element.bounds().with_size(size));
                element.set_preferred_size(Some(size));
            }
            repo.relayout_chain(next, Some(id));
            Ok(())
        })
    }

    /// Moves an element under `new_owner` (or to the root when `None`).
    ///
    /// `position` is the element's new top-left corner in canvas
    /// coordinates; it is re-expressed in the new owner's frame.
    pub fn reparent(
        &mut self,
        id: Id,
        new_owner: Option<Id>,
        position: Point,
    ) -> Result<(), Rejection> {
        self.apply("reparent", |repo, next| {
            repo.ensure_writable()?;
            let old_owner = next.element(id).ok_or(Rejection::UnknownId(id))?.owner();
            validate_position(position)?;
            if let Some(owner) = new_owner {
                if next.element(owner).is_none() {
                    return Err(Rejection::UnknownId(owner));
                }
                if owner == id || next.is_ancestor(id, owner) {
                    return Err(Rejection::Cycle { element: id, owner });
                }
                repo.ensure_droppable(next, owner)?;
            }

            let frame = next
                .frame_origin(new_owner)
                .ok_or(Rejection::UnknownId(id))?;
            if let Some(element) = next.element_mut(id) {
                element.set_owner(new_owner);
                element.set_bounds(element.bounds().with_origin(position.sub_point(frame)));
            }
            next.move_to_end(id);

            repo.relayout_chain(next, old_owner);
            repo.relayout_chain(next, new_owner);
            Ok(())
        })
    }

    /// Creates a relationship of `kind` from `source` to `target` with a
    /// freshly routed path.
    pub fn connect(
        &mut self,
        source: Id,
        target: Id,
        kind: RelationshipKind,
    ) -> Result<Id, Rejection> {
        self.apply("connect", |repo, next| {
            repo.ensure_writable()?;
            for end in [source, target] {
                let element = next.element(end).ok_or(Rejection::UnknownId(end))?;
                if !repo.registry.capabilities(element.kind()).connectable {
                    return Err(Rejection::NotConnectable(end));
                }
            }
            if source == target {
                return Err(Rejection::SelfConnection(source));
            }

            let source_bounds = next
                .absolute_bounds(source)
                .ok_or(Rejection::UnknownId(source))?;
            let target_bounds = next
                .absolute_bounds(target)
                .ok_or(Rejection::UnknownId(target))?;
            let route = routing::route(source_bounds, target_bounds, repo.routing_margin);

            let id = Id::generate();
            next.insert_relationship(
                Relationship::new(
                    id,
                    kind,
                    Endpoint::new(source, route.source_direction),
                    Endpoint::new(target, route.target_direction),
                )
                .with_path(route.path),
            );
            Ok(id)
        })
    }

    /// Removes an element or relationship.
    ///
    /// Children of a deleted element are promoted to its owner, keeping their
    /// canvas position. Relationships attached to it are removed. Unknown ids
    /// are a no-op.
    pub fn delete(&mut self, id: Id) -> Result<(), Rejection> {
        self.apply("delete", |repo, next| {
            repo.ensure_writable()?;

            if next.remove_relationship(id).is_some() {
                return Ok(());
            }
            let Some(element) = next.element(id) else {
                return Ok(());
            };
            let owner = element.owner();
            let offset = element.origin();

            for child in next.children(Some(id)) {
                if let Some(child) = next.element_mut(child) {
                    child.set_owner(owner);
                    child.set_bounds(child.bounds().translate(offset));
                }
            }
            let attached: Vec<Id> = next
                .relationships()
                .filter(|relationship| relationship.touches(id))
                .map(Relationship::id)
                .collect();
            for relationship in attached {
                next.remove_relationship(relationship);
            }
            next.remove_element(id);

            repo.relayout_chain(next, owner);
            Ok(())
        })
    }

    /// Changes the name of an element or relationship.
    ///
    /// Elements are laid out again since their size may depend on the label.
    pub fn rename(&mut self, id: Id, name: &str) -> Result<(), Rejection> {
        self.apply("rename", |repo, next| {
            repo.ensure_writable()?;
            match next.get(id) {
                Some(EntityRef::Element(element)) => {
                    if !repo.registry.capabilities(element.kind()).editable {
                        return Err(Rejection::NotEditable(id));
                    }
                    if let Some(element) = next.element_mut(id) {
                        element.set_name(name);
                    }
                    repo.relayout_chain(next, Some(id));
                }
                Some(EntityRef::Relationship(_)) => {
                    if let Some(relationship) = next.relationship_mut(id) {
                        relationship.set_name(name);
                    }
                }
                None => return Err(Rejection::UnknownId(id)),
            }
            Ok(())
        })
    }

    /// Sets the `interactive` flag on the given ids.
    ///
    /// Unknown ids and elements whose kind is not interactable are skipped.
    pub fn set_interactive(&mut self, ids: &[Id], interactive: bool) -> Result<(), Rejection> {
        self.apply("set_interactive", |repo, next| {
            for id in ids {
                let interactable = match next.get(*id) {
                    Some(EntityRef::Element(element)) => {
                        repo.registry.capabilities(element.kind()).interactable
                    }
                    Some(EntityRef::Relationship(_)) => true,
                    None => false,
                };
                if !interactable {
                    continue;
                }
                if let Some(element) = next.element_mut(*id) {
                    element.set_interactive(interactive);
                } else if let Some(relationship) = next.relationship_mut(*id) {
                    relationship.set_interactive(interactive);
                }
            }
            Ok(())
        })
    }

    /// Appends a message travelling towards the target.
    ///
    /// A message with the same name already on the link is left as is.
    pub fn add_message(&mut self, relationship: Id, name: &str) -> Result<(), Rejection> {
        self.apply("add_message", |repo, next| {
            let messages = repo.messages_mut(next, relationship)?;
            if messages.iter().all(|message| message.name != name) {
                messages.push(Message {
                    name: name.to_string(),
                    direction: MessageDirection::Target,
                });
            }
            Ok(())
        })
    }

    pub fn rename_message(
        &mut self,
        relationship: Id,
        index: usize,
        name: &str,
    ) -> Result<(), Rejection> {
        self.apply("rename_message", |repo, next| {
            let messages = repo.messages_mut(next, relationship)?;
            let message = messages
                .get_mut(index)
                .ok_or(Rejection::UnknownMessage {
                    relationship,
                    index,
                })?;
            message.name = name.to_string();
            Ok(())
        })
    }

    /// Reverses the direction of a message.
    pub fn flip_message(&mut self, relationship: Id, index: usize) -> Result<(), Rejection> {
        self.apply("flip_message", |repo, next| {
            let messages = repo.messages_mut(next, relationship)?;
            let message = messages
                .get_mut(index)
                .ok_or(Rejection::UnknownMessage {
                    relationship,
                    index,
                })?;
            message.direction = message.direction.flipped();
            Ok(())
        })
    }

    pub fn remove_message(&mut self, relationship: Id, index: usize) -> Result<(), Rejection> {
        self.apply("remove_message", |repo, next| {
            let messages = repo.messages_mut(next, relationship)?;
            if index >= messages.len() {
                return Err(Rejection::UnknownMessage {
                    relationship,
                    index,
                });
            }
            messages.remove(index);
            Ok(())
        })
    }

    /// Records a score for an element or relationship, replacing any previous one.
    pub fn assess(
        &mut self,
        id: Id,
        score: f64,
        feedback: Option<String>,
    ) -> Result<(), Rejection> {
        self.apply("assess", |_, next| {
            if !next.contains(id) {
                return Err(Rejection::UnknownId(id));
            }
            next.set_score(id, Score { score, feedback });
            Ok(())
        })
    }

    /// Removes the score of `id`, if any.
    pub fn clear_assessment(&mut self, id: Id) -> Result<(), Rejection> {
        self.apply("clear_assessment", |_, next| {
            next.clear_score(id);
            Ok(())
        })
    }

    /// Lays out every element, deepest first.
    pub fn relayout(&mut self) -> Result<(), Rejection> {
        self.apply("relayout", |repo, next| {
            repo.ensure_writable()?;
            let mut order: Vec<(usize, Id)> = next
                .elements()
                .map(|element| (next.ancestors(element.id()).len(), element.id()))
                .collect();
            order.sort_by(|a, b| b.0.cmp(&a.0));
            for (_, id) in order {
                repo.layout_element(next, id);
            }
            Ok(())
        })
    }

    // ==================
    // Internals
    // ==================

    /// Runs `operation` on a clone of the current snapshot and commits the
    /// clone only if the operation succeeds.
    fn apply<T>(
        &mut self,
        operation: &'static str,
        f: impl FnOnce(&Self, &mut Snapshot) -> Result<T, Rejection>,
    ) -> Result<T, Rejection> {
        let before = Arc::clone(&self.snapshot);
        let mut next = (*before).clone();

        match f(self, &mut next) {
            Ok(value) => {
                self.finish(&before, &mut next);
                self.commit(operation, next);
                Ok(value)
            }
            Err(rejection) => {
                debug!(operation, reason:% = rejection; "Operation rejected");
                Err(rejection)
            }
        }
    }

    fn commit(&mut self, operation: &'static str, mut next: Snapshot) {
        if next == *self.snapshot {
            trace!(operation; "Operation changed nothing");
            return;
        }
        next.set_version(self.snapshot.version() + 1);
        trace!(operation, version = next.version(); "Snapshot committed");
        self.snapshot = Arc::new(next);
    }

    /// Reroutes relationships whose endpoints moved and recomputes the size.
    fn finish(&self, before: &Snapshot, next: &mut Snapshot) {
        let stale: Vec<(Id, Bounds, Bounds)> = next
            .relationships()
            .filter_map(|relationship| {
                let source = relationship.source().element;
                let target = relationship.target().element;
                let source_bounds = next.absolute_bounds(source)?;
                let target_bounds = next.absolute_bounds(target)?;
                let moved = before.absolute_bounds(source) != Some(source_bounds)
                    || before.absolute_bounds(target) != Some(target_bounds);
                moved.then_some((relationship.id(), source_bounds, target_bounds))
            })
            .collect();

        for (id, source_bounds, target_bounds) in stale {
            let route = routing::route(source_bounds, target_bounds, self.routing_margin);
            if let Some(relationship) = next.relationship_mut(id) {
                relationship.set_route(route.source_direction, route.target_direction, route.path);
            }
        }

        let size = next
            .extent()
            .map(|extent| Size::new(extent.width().max(0.0), extent.height().max(0.0)))
            .unwrap_or_default();
        next.set_size(size);
    }

    /// Lays out `start` and then each of its owners up to the root.
    fn relayout_chain(&self, next: &mut Snapshot, start: Option<Id>) {
        let limit = next.element_count();
        let mut current = start;
        let mut steps = 0;
        while let Some(id) = current {
            if steps > limit {
                break;
            }
            self.layout_element(next, id);
            current = next.element(id).and_then(Element::owner);
            steps += 1;
        }
    }

    fn layout_element(&self, next: &mut Snapshot, id: Id) {
        let Some(element) = next.element(id) else {
            return;
        };
        let children = next.children(Some(id));
        let child_bounds: Vec<Bounds> = children
            .iter()
            .filter_map(|child| next.element(*child).map(Element::bounds))
            .collect();
        let layout = self.engine.layout(
            element,
            self.registry.layout(element.kind()),
            &child_bounds,
        );

        if !layout.child_offset.is_zero() {
            for child in children {
                if let Some(child) = next.element_mut(child) {
                    child.set_bounds(child.bounds().translate(layout.child_offset));
                }
            }
        }
        if let Some(element) = next.element_mut(id) {
            element.set_bounds(layout.bounds);
        }
    }

    fn ensure_writable(&self) -> Result<(), Rejection> {
        if self.readonly {
            Err(Rejection::ReadOnly)
        } else {
            Ok(())
        }
    }

    fn ensure_droppable(&self, snapshot: &Snapshot, owner: Id) -> Result<(), Rejection> {
        let element = snapshot.element(owner).ok_or(Rejection::UnknownId(owner))?;
        if self.registry.capabilities(element.kind()).droppable {
            Ok(())
        } else {
            Err(Rejection::NotDroppable(owner))
        }
    }

    fn is_selectable(&self, snapshot: &Snapshot, id: Id) -> bool {
        match snapshot.get(id) {
            Some(EntityRef::Element(element)) => {
                self.registry.capabilities(element.kind()).selectable
            }
            Some(EntityRef::Relationship(_)) => true,
            None => false,
        }
    }

    fn set_hovered(&self, snapshot: &mut Snapshot, id: Id, hovered: bool) {
        let hoverable = match snapshot.get(id) {
            Some(EntityRef::Element(element)) => {
                self.registry.capabilities(element.kind()).hoverable
            }
            Some(EntityRef::Relationship(_)) => true,
            None => false,
        };
        if !hoverable && hovered {
            return;
        }
        if let Some(element) = snapshot.element_mut(id) {
            element.set_hovered(hovered);
        } else if let Some(relationship) = snapshot.relationship_mut(id) {
            relationship.set_hovered(hovered);
        }
    }

    /// Selected movable elements with no selected ancestor.
    fn movable_selection(&self, snapshot: &Snapshot) -> Vec<Id> {
        snapshot
            .elements()
            .filter(|element| element.is_selected())
            .filter(|element| self.registry.capabilities(element.kind()).movable)
            .filter(|element| {
                snapshot.ancestors(element.id()).iter().all(|ancestor| {
                    !snapshot
                        .element(*ancestor)
                        .is_some_and(Element::is_selected)
                })
            })
            .map(Element::id)
            .collect()
    }

    fn messages_mut<'a>(
        &self,
        snapshot: &'a mut Snapshot,
        id: Id,
    ) -> Result<&'a mut Vec<Message>, Rejection> {
        self.ensure_writable()?;
        let relationship = snapshot
            .relationship_mut(id)
            .ok_or(Rejection::UnknownId(id))?;
        if !relationship.kind().carries_messages() {
            return Err(Rejection::NoMessages(id));
        }
        Ok(relationship.messages_mut())
    }
}

fn set_selected(snapshot: &mut Snapshot, id: Id, selected: bool) {
    if let Some(element) = snapshot.element_mut(id) {
        element.set_selected(selected);
    } else if let Some(relationship) = snapshot.relationship_mut(id) {
        relationship.set_selected(selected);
    }
}

fn validate_size(size: Size) -> Result<(), Rejection> {
    if size.is_positive() {
        Ok(())
    } else {
        Err(Rejection::InvalidSize {
            width: size.width(),
            height: size.height(),
        })
    }
}

fn validate_position(position: Point) -> Result<(), Rejection> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(Rejection::InvalidPosition {
            x: position.x(),
            y: position.y(),
        })
    }
}
