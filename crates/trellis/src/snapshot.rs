//! Immutable point-in-time diagram state.
//!
//! A [`Snapshot`] is an arena of elements and relationships keyed by [`Id`].
//! Ownership is stored on each element as an optional owner id; children and
//! ancestors are found through id lookups, never through embedded pointers.
//!
//! Snapshots are only produced by the [`Repository`](crate::Repository).
//! Readers hold an `Arc<Snapshot>` and can never observe a half-applied
//! operation.

use indexmap::IndexMap;

use trellis_core::{
    element::Element,
    geometry::{Bounds, Point, Size},
    identifier::Id,
    relationship::Relationship,
};

use crate::model::{Assessment, DiagramType, MODEL_VERSION, Score, Selection};

/// Borrowed view of either entity type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityRef<'a> {
    Element(&'a Element),
    Relationship(&'a Relationship),
}

impl EntityRef<'_> {
    pub fn id(&self) -> Id {
        match self {
            EntityRef::Element(element) => element.id(),
            EntityRef::Relationship(relationship) => relationship.id(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    version: u64,
    diagram_type: DiagramType,
    model_version: String,
    size: Size,
    elements: IndexMap<Id, Element>,
    relationships: IndexMap<Id, Relationship>,
    assessments: IndexMap<Id, Score>,
    primary: Option<Id>,
}

impl Snapshot {
    /// An empty diagram of the given type.
    pub fn new(diagram_type: DiagramType) -> Self {
        Self::from_parts(
            diagram_type,
            MODEL_VERSION.to_string(),
            Size::default(),
            IndexMap::new(),
            IndexMap::new(),
            IndexMap::new(),
        )
    }

    pub(crate) fn from_parts(
        diagram_type: DiagramType,
        model_version: String,
        size: Size,
        elements: IndexMap<Id, Element>,
        relationships: IndexMap<Id, Relationship>,
        assessments: IndexMap<Id, Score>,
    ) -> Self {
        Self {
            version: 0,
            diagram_type,
            model_version,
            size,
            elements,
            relationships,
            assessments,
            primary: None,
        }
    }

    /// Number of operations committed since the repository was created or loaded.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn diagram_type(&self) -> DiagramType {
        self.diagram_type
    }

    /// Model format version this diagram was imported with, or
    /// [`MODEL_VERSION`] for diagrams created in memory.
    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    /// Extent of the diagram in diagram units.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Elements in insertion order; an element reparented later moves to the end.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn element(&self, id: Id) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn relationship(&self, id: Id) -> Option<&Relationship> {
        self.relationships.get(&id)
    }

    /// Looks up an element or relationship.
    pub fn get(&self, id: Id) -> Option<EntityRef<'_>> {
        self.elements
            .get(&id)
            .map(EntityRef::Element)
            .or_else(|| self.relationships.get(&id).map(EntityRef::Relationship))
    }

    pub fn contains(&self, id: Id) -> bool {
        self.elements.contains_key(&id) || self.relationships.contains_key(&id)
    }

    /// Direct children of `owner`, or root elements when `owner` is `None`.
    pub fn children(&self, owner: Option<Id>) -> Vec<Id> {
        self.elements
            .values()
            .filter(|element| element.owner() == owner)
            .map(Element::id)
            .collect()
    }

    /// Owner chain of `id`, nearest owner first.
    pub fn ancestors(&self, id: Id) -> Vec<Id> {
        let mut chain = Vec::new();
        let mut current = self.elements.get(&id).and_then(Element::owner);
        while let Some(owner) = current {
            if chain.contains(&owner) || chain.len() > self.elements.len() {
                break;
            }
            chain.push(owner);
            current = self.elements.get(&owner).and_then(Element::owner);
        }
        chain
    }

    /// All elements owned directly or indirectly by `id`, breadth first.
    pub fn descendants(&self, id: Id) -> Vec<Id> {
        let mut result = Vec::new();
        let mut frontier = vec![id];
        while let Some(current) = frontier.pop() {
            for child in self.children(Some(current)) {
                if child != id && !result.contains(&child) {
                    result.push(child);
                    frontier.push(child);
                }
            }
        }
        result
    }

    /// Returns true if `ancestor` appears in the owner chain of `id`.
    pub fn is_ancestor(&self, ancestor: Id, id: Id) -> bool {
        self.ancestors(id).contains(&ancestor)
    }

    /// Canvas position of the top-left corner of `id`.
    ///
    /// The sum of bounds offsets along the owner chain.
    pub fn absolute_origin(&self, id: Id) -> Option<Point> {
        let element = self.elements.get(&id)?;
        let origin = self
            .ancestors(id)
            .into_iter()
            .filter_map(|owner| self.elements.get(&owner))
            .fold(element.origin(), |acc, owner| acc.add_point(owner.origin()));
        Some(origin)
    }

    /// Bounds of `id` in canvas coordinates.
    pub fn absolute_bounds(&self, id: Id) -> Option<Bounds> {
        let element = self.elements.get(&id)?;
        let origin = self.absolute_origin(id)?;
        Some(element.bounds().with_origin(origin))
    }

    /// Canvas position of the frame children of `owner` are expressed in.
    pub fn frame_origin(&self, owner: Option<Id>) -> Option<Point> {
        match owner {
            Some(owner) => self.absolute_origin(owner),
            None => Some(Point::default()),
        }
    }

    /// Union of the absolute bounds of all elements, or `None` for an empty diagram.
    pub fn extent(&self) -> Option<Bounds> {
        self.elements
            .keys()
            .filter_map(|id| self.absolute_bounds(*id))
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Ids currently carrying the `selected` flag.
    pub fn selection(&self) -> Selection {
        Selection::new(
            self.elements
                .values()
                .filter(|element| element.is_selected())
                .map(Element::id),
            self.relationships
                .values()
                .filter(|relationship| relationship.is_selected())
                .map(Relationship::id),
        )
    }

    /// The entity most recently added to the selection, if still selected.
    pub fn primary_selection(&self) -> Option<Id> {
        self.primary
    }

    /// Ids currently carrying the `interactive` flag.
    pub fn interactive(&self) -> Selection {
        Selection::new(
            self.elements
                .values()
                .filter(|element| element.is_interactive())
                .map(Element::id),
            self.relationships
                .values()
                .filter(|relationship| relationship.is_interactive())
                .map(Relationship::id),
        )
    }

    pub fn score(&self, id: Id) -> Option<&Score> {
        self.assessments.get(&id)
    }

    /// Derived assessment list, in the order scores were first given.
    pub fn assessments(&self) -> Vec<Assessment> {
        self.assessments
            .iter()
            .filter_map(|(id, score)| {
                let element_type = match self.get(*id)? {
                    EntityRef::Element(element) => element.kind().to_string(),
                    EntityRef::Relationship(relationship) => relationship.kind().to_string(),
                };
                Some(Assessment {
                    model_element_id: *id,
                    element_type,
                    score: score.score,
                    feedback: score.feedback.clone(),
                })
            })
            .collect()
    }

    // Mutation is reserved to the repository, which works on a private clone.

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    pub(crate) fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub(crate) fn set_primary(&mut self, primary: Option<Id>) {
        self.primary = primary;
    }

    pub(crate) fn element_mut(&mut self, id: Id) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub(crate) fn relationship_mut(&mut self, id: Id) -> Option<&mut Relationship> {
        self.relationships.get_mut(&id)
    }

    pub(crate) fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.elements.values_mut()
    }

    pub(crate) fn relationships_mut(&mut self) -> impl Iterator<Item = &mut Relationship> {
        self.relationships.values_mut()
    }

    pub(crate) fn insert_element(&mut self, element: Element) {
        self.elements.insert(element.id(), element);
    }

    /// Moves `id` to the end of the element order.
    pub(crate) fn move_to_end(&mut self, id: Id) {
        if let Some(element) = self.elements.shift_remove(&id) {
            self.elements.insert(id, element);
        }
    }

    pub(crate) fn remove_element(&mut self, id: Id) -> Option<Element> {
        self.assessments.shift_remove(&id);
        if self.primary == Some(id) {
            self.primary = None;
        }
        self.elements.shift_remove(&id)
    }

    pub(crate) fn insert_relationship(&mut self, relationship: Relationship) {
        self.relationships.insert(relationship.id(), relationship);
    }

    pub(crate) fn remove_relationship(&mut self, id: Id) -> Option<Relationship> {
        self.assessments.shift_remove(&id);
        if self.primary == Some(id) {
            self.primary = None;
        }
        self.relationships.shift_remove(&id)
    }

    pub(crate) fn set_score(&mut self, id: Id, score: Score) {
        self.assessments.insert(id, score);
    }

    pub(crate) fn clear_score(&mut self, id: Id) -> bool {
        self.assessments.shift_remove(&id).is_some()
    }
}
