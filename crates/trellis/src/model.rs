//! Serializable diagram model.
//!
//! [`DiagramModel`] is the stable, host-facing form of a diagram: elements,
//! relationships, the interactive subset, assessments, a size and a diagram
//! type tag, versioned by [`MODEL_VERSION`]. Conversion to and from a
//! [`Snapshot`] is exact: `Snapshot::from_model(m)?.to_model() == m` for
//! every valid model.

use indexmap::{IndexMap, IndexSet};
use log::info;
use serde::{Deserialize, Serialize};

use trellis_core::{
    element::{Element, ElementKind},
    geometry::{Bounds, Point, Size},
    identifier::Id,
    relationship::{Endpoint, Message, Relationship, RelationshipKind},
};

use crate::{error::ModelError, snapshot::Snapshot};

/// Version written into every exported model.
pub const MODEL_VERSION: &str = "2.0";

/// Diagram type tag of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DiagramType {
    #[default]
    ClassDiagram,
    ObjectDiagram,
    ActivityDiagram,
    CommunicationDiagram,
    #[serde(rename = "BPMN")]
    Bpmn,
}

/// Pair of element and relationship id sets.
///
/// Used for the current selection and for the interactive subset. Equality is
/// set equality: the order of ids does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub elements: IndexSet<Id>,
    #[serde(default)]
    pub relationships: IndexSet<Id>,
}

impl Selection {
    pub fn new(
        elements: impl IntoIterator<Item = Id>,
        relationships: impl IntoIterator<Item = Id>,
    ) -> Self {
        Self {
            elements: elements.into_iter().collect(),
            relationships: relationships.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.relationships.is_empty()
    }

    /// All ids, elements first.
    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.elements.iter().chain(self.relationships.iter()).copied()
    }
}

/// Score given to one element or relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// Assessment entry as reported to hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub model_element_id: Id,
    pub element_type: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(default)]
    pub owner: Option<Id>,
    pub bounds: Bounds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_size: Option<Size>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
    pub source: Endpoint,
    pub target: Endpoint,
    #[serde(default)]
    pub path: Vec<Point>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
}

/// Host-facing serialized diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramModel {
    pub version: String,
    #[serde(rename = "type")]
    pub diagram_type: DiagramType,
    #[serde(default)]
    pub size: Size,
    #[serde(default)]
    pub interactive: Selection,
    #[serde(default)]
    pub elements: Vec<ElementRecord>,
    #[serde(default)]
    pub relationships: Vec<RelationshipRecord>,
    #[serde(default)]
    pub assessments: Vec<Assessment>,
}

impl DiagramModel {
    /// An empty model of the given type.
    pub fn new(diagram_type: DiagramType) -> Self {
        Self {
            version: MODEL_VERSION.to_string(),
            diagram_type,
            size: Size::default(),
            interactive: Selection::default(),
            elements: Vec::new(),
            relationships: Vec::new(),
            assessments: Vec::new(),
        }
    }

    /// Parses a model from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the model as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn major_version(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

impl Snapshot {
    /// Builds a snapshot from a model without running layout.
    ///
    /// Stored bounds, paths and size are taken as-is.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] if the version's major number differs from
    /// [`MODEL_VERSION`], an id is used twice, an owner or relationship
    /// endpoint is missing, owners form a cycle, or an assessment names an
    /// unknown id.
    pub fn from_model(model: &DiagramModel) -> Result<Self, ModelError> {
        if major_version(&model.version) != major_version(MODEL_VERSION) {
            return Err(ModelError::UnsupportedVersion(model.version.clone()));
        }

        let mut elements = IndexMap::with_capacity(model.elements.len());
        for record in &model.elements {
            let mut element = Element::new(record.id, record.kind, record.name.clone())
                .with_bounds(record.bounds)
                .with_owner(record.owner)
                .with_preferred_size(record.preferred_size);
            element.set_interactive(model.interactive.elements.contains(&record.id));
            if elements.insert(record.id, element).is_some() {
                return Err(ModelError::DuplicateId(record.id));
            }
        }

        for record in &model.elements {
            let Some(owner) = record.owner else {
                continue;
            };
            if !elements.contains_key(&owner) {
                return Err(ModelError::DanglingOwner {
                    element: record.id,
                    owner,
                });
            }
        }
        check_acyclic(&elements)?;

        let mut relationships = IndexMap::with_capacity(model.relationships.len());
        for record in &model.relationships {
            for endpoint in [record.source, record.target] {
                if !elements.contains_key(&endpoint.element) {
                    return Err(ModelError::MissingEndpoint {
                        relationship: record.id,
                        element: endpoint.element,
                    });
                }
            }
            if elements.contains_key(&record.id) {
                return Err(ModelError::DuplicateId(record.id));
            }
            let mut relationship =
                Relationship::new(record.id, record.kind, record.source, record.target)
                    .with_name(record.name.clone())
                    .with_path(record.path.clone())
                    .with_messages(record.messages.clone());
            relationship.set_interactive(model.interactive.relationships.contains(&record.id));
            if relationships.insert(record.id, relationship).is_some() {
                return Err(ModelError::DuplicateId(record.id));
            }
        }

        let mut assessments = IndexMap::with_capacity(model.assessments.len());
        for assessment in &model.assessments {
            let id = assessment.model_element_id;
            if !elements.contains_key(&id) && !relationships.contains_key(&id) {
                return Err(ModelError::UnknownAssessmentTarget(id));
            }
            assessments.insert(
                id,
                Score {
                    score: assessment.score,
                    feedback: assessment.feedback.clone(),
                },
            );
        }

        info!(
            elements = elements.len(),
            relationships = relationships.len();
            "Model imported"
        );

        Ok(Snapshot::from_parts(
            model.diagram_type,
            model.version.clone(),
            model.size,
            elements,
            relationships,
            assessments,
        ))
    }

    /// Converts this snapshot into its serializable model.
    ///
    /// Transient flags (selection, hover) are not part of the model.
    pub fn to_model(&self) -> DiagramModel {
        let elements = self
            .elements()
            .map(|element| ElementRecord {
                id: element.id(),
                name: element.name().to_string(),
                kind: element.kind(),
                owner: element.owner(),
                bounds: element.bounds(),
                preferred_size: element.preferred_size(),
            })
            .collect();

        let relationships = self
            .relationships()
            .map(|relationship| RelationshipRecord {
                id: relationship.id(),
                name: relationship.name().to_string(),
                kind: relationship.kind(),
                source: relationship.source(),
                target: relationship.target(),
                path: relationship.path().to_vec(),
                messages: relationship.messages().to_vec(),
            })
            .collect();

        DiagramModel {
            version: self.model_version().to_string(),
            diagram_type: self.diagram_type(),
            size: self.size(),
            interactive: self.interactive(),
            elements,
            relationships,
            assessments: self.assessments(),
        }
    }
}

fn check_acyclic(elements: &IndexMap<Id, Element>) -> Result<(), ModelError> {
    for element in elements.values() {
        let mut steps = 0usize;
        let mut current = element.owner();
        while let Some(owner) = current {
            steps += 1;
            if owner == element.id() || steps > elements.len() {
                return Err(ModelError::OwnershipCycle(element.id()));
            }
            current = elements.get(&owner).and_then(Element::owner);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use trellis_core::relationship::{Direction, MessageDirection};

    use super::*;

    fn sample_model() -> DiagramModel {
        let mut model = DiagramModel::new(DiagramType::CommunicationDiagram);
        model.size = Size::new(400.0, 200.0);
        model.elements = vec![
            ElementRecord {
                id: Id::new("pkg"),
                name: "Orders".to_string(),
                kind: ElementKind::Package,
                owner: None,
                bounds: Bounds::new(0.0, 0.0, 300.0, 150.0),
                preferred_size: Some(Size::new(300.0, 150.0)),
            },
            ElementRecord {
                id: Id::new("obj"),
                name: "order:Order".to_string(),
                kind: ElementKind::ObjectName,
                owner: Some(Id::new("pkg")),
                bounds: Bounds::new(10.0, 20.0, 120.0, 40.0),
                preferred_size: None,
            },
            ElementRecord {
                id: Id::new("other"),
                name: "shop:Shop".to_string(),
                kind: ElementKind::ObjectName,
                owner: None,
                bounds: Bounds::new(320.0, 20.0, 80.0, 40.0),
                preferred_size: None,
            },
        ];
        model.relationships = vec![RelationshipRecord {
            id: Id::new("link"),
            name: String::new(),
            kind: RelationshipKind::CommunicationLink,
            source: Endpoint::new(Id::new("obj"), Direction::Right),
            target: Endpoint::new(Id::new("other"), Direction::Left),
            path: vec![Point::new(130.0, 40.0), Point::new(320.0, 40.0)],
            messages: vec![Message {
                name: "checkout()".to_string(),
                direction: MessageDirection::Target,
            }],
        }];
        model.interactive = Selection::new([Id::new("obj")], [Id::new("link")]);
        model.assessments = vec![Assessment {
            model_element_id: Id::new("obj"),
            element_type: "ObjectName".to_string(),
            score: 1.5,
            feedback: Some("correct".to_string()),
        }];
        model
    }

    #[test]
    fn test_round_trip() {
        let model = sample_model();
        let snapshot = Snapshot::from_model(&model).unwrap();
        assert_eq!(snapshot.to_model(), model);
    }

    #[test]
    fn test_json_round_trip() {
        let model = sample_model();
        let json = model.to_json().unwrap();
        assert!(json.contains("\"type\": \"CommunicationDiagram\""));
        assert!(json.contains("\"modelElementId\": \"obj\""));

        let parsed = DiagramModel::from_json(&json).unwrap();
        assert_eq!(parsed, model);
    }

    #[test]
    fn test_interactive_flags_applied() {
        let snapshot = Snapshot::from_model(&sample_model()).unwrap();
        assert!(snapshot.element(Id::new("obj")).unwrap().is_interactive());
        assert!(!snapshot.element(Id::new("pkg")).unwrap().is_interactive());
        assert!(snapshot.relationship(Id::new("link")).unwrap().is_interactive());
    }

    #[test]
    fn test_minor_version_accepted() {
        let mut model = sample_model();
        model.version = "2.3".to_string();
        let snapshot = Snapshot::from_model(&model).unwrap();
        assert_eq!(snapshot.model_version(), "2.3");
        assert_eq!(snapshot.to_model(), model);
    }

    #[test]
    fn test_major_version_rejected() {
        let mut model = sample_model();
        model.version = "3.0".to_string();
        assert_eq!(
            Snapshot::from_model(&model),
            Err(ModelError::UnsupportedVersion("3.0".to_string()))
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut model = sample_model();
        let duplicate = model.elements[1].clone();
        model.elements.push(duplicate);
        assert_eq!(
            Snapshot::from_model(&model),
            Err(ModelError::DuplicateId(Id::new("obj")))
        );
    }

    #[test]
    fn test_relationship_id_clashing_with_element_rejected() {
        let mut model = sample_model();
        model.relationships[0].id = Id::new("pkg");
        assert_eq!(
            Snapshot::from_model(&model),
            Err(ModelError::DuplicateId(Id::new("pkg")))
        );
    }

    #[test]
    fn test_dangling_owner_rejected() {
        let mut model = sample_model();
        model.elements[1].owner = Some(Id::new("ghost"));
        assert_eq!(
            Snapshot::from_model(&model),
            Err(ModelError::DanglingOwner {
                element: Id::new("obj"),
                owner: Id::new("ghost"),
            })
        );
    }

    #[test]
    fn test_cycle_rejected() {
        let mut model = sample_model();
        model.elements[0].owner = Some(Id::new("obj"));
        assert!(matches!(
            Snapshot::from_model(&model),
            Err(ModelError::OwnershipCycle(_))
        ));
    }

    #[test]
    fn test_missing_endpoint_rejected() {
        let mut model = sample_model();
        model.relationships[0].target.element = Id::new("ghost");
        assert_eq!(
            Snapshot::from_model(&model),
            Err(ModelError::MissingEndpoint {
                relationship: Id::new("link"),
                element: Id::new("ghost"),
            })
        );
    }

    #[test]
    fn test_unknown_assessment_rejected() {
        let mut model = sample_model();
        model.assessments[0].model_element_id = Id::new("ghost");
        assert_eq!(
            Snapshot::from_model(&model),
            Err(ModelError::UnknownAssessmentTarget(Id::new("ghost")))
        );
    }

    #[test]
    fn test_selection_equality_ignores_order() {
        let a = Selection::new([Id::new("x"), Id::new("y")], []);
        let b = Selection::new([Id::new("y"), Id::new("x")], []);
        assert_eq!(a, b);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::{prelude::*, sample::Index};
    use trellis_core::relationship::{Direction, MessageDirection};

    use super::*;

    const DIRECTIONS: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    fn element_id(i: usize) -> Id {
        Id::new(&format!("e{i}"))
    }

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -500.0f32..500.0,
            -500.0f32..500.0,
            1.0f32..300.0,
            1.0f32..300.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new(x, y, w, h))
    }

    /// Element `i` may only be owned by an element before it, so owners
    /// never form a cycle.
    fn element_strategy(i: usize) -> impl Strategy<Value = ElementRecord> {
        (
            "[a-zA-Z:]{0,16}",
            any::<Index>(),
            prop::option::of(any::<Index>()),
            bounds_strategy(),
            prop::option::of((1.0f32..300.0, 1.0f32..300.0)),
        )
            .prop_map(move |(name, kind, owner, bounds, preferred)| ElementRecord {
                id: element_id(i),
                name,
                kind: *kind.get(&ElementKind::BUILTIN),
                owner: owner.filter(|_| i > 0).map(|o| element_id(o.index(i))),
                bounds,
                preferred_size: preferred.map(|(w, h)| Size::new(w, h)),
            })
    }

    fn relationship_strategy(j: usize, count: usize) -> impl Strategy<Value = RelationshipRecord> {
        (
            (0..count, 0..count),
            any::<Index>(),
            (any::<Index>(), any::<Index>()),
            prop::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 0..5),
            prop::collection::vec(("[a-z()]{1,10}", any::<bool>()), 0..3),
        )
            .prop_map(
                move |((source, target), kind, (from, to), path, messages)| RelationshipRecord {
                    id: Id::new(&format!("r{j}")),
                    name: String::new(),
                    kind: *kind.get(&RelationshipKind::BUILTIN),
                    source: Endpoint::new(element_id(source), *from.get(&DIRECTIONS)),
                    target: Endpoint::new(element_id(target), *to.get(&DIRECTIONS)),
                    path: path.into_iter().map(|(x, y)| Point::new(x, y)).collect(),
                    messages: messages
                        .into_iter()
                        .map(|(name, towards_target)| Message {
                            name,
                            direction: if towards_target {
                                MessageDirection::Target
                            } else {
                                MessageDirection::Source
                            },
                        })
                        .collect(),
                },
            )
    }

    fn model_strategy() -> impl Strategy<Value = DiagramModel> {
        (1..8usize, 0..6usize)
            .prop_flat_map(|(count, links)| {
                (
                    (0..count).map(element_strategy).collect::<Vec<_>>(),
                    (0..links)
                        .map(|j| relationship_strategy(j, count))
                        .collect::<Vec<_>>(),
                    prop::collection::vec(any::<bool>(), count + links),
                    prop::collection::vec(
                        prop::option::of((0.0f64..10.0, prop::option::of("[a-z ]{0,12}"))),
                        count,
                    ),
                    0u8..10,
                    (0.0f32..2000.0, 0.0f32..2000.0),
                )
            })
            .prop_map(
                |(elements, relationships, interactive, scores, minor, (width, height))| {
                    let (element_flags, relationship_flags) = interactive.split_at(elements.len());
                    let mut model = DiagramModel::new(DiagramType::ActivityDiagram);
                    model.version = format!("2.{minor}");
                    model.size = Size::new(width, height);
                    model.interactive = Selection::new(
                        elements
                            .iter()
                            .zip(element_flags)
                            .filter(|(_, on)| **on)
                            .map(|(e, _)| e.id),
                        relationships
                            .iter()
                            .zip(relationship_flags)
                            .filter(|(_, on)| **on)
                            .map(|(r, _)| r.id),
                    );
                    model.assessments = elements
                        .iter()
                        .zip(scores)
                        .filter_map(|(element, score)| {
                            let (score, feedback) = score?;
                            Some(Assessment {
                                model_element_id: element.id,
                                element_type: element.kind.to_string(),
                                score,
                                feedback,
                            })
                        })
                        .collect();
                    model.elements = elements;
                    model.relationships = relationships;
                    model
                },
            )
    }

    fn check_snapshot_round_trip(model: DiagramModel) -> Result<(), TestCaseError> {
        let snapshot = Snapshot::from_model(&model)
            .map_err(|err| TestCaseError::fail(format!("valid model rejected: {err}")))?;
        prop_assert_eq!(snapshot.to_model(), model);
        Ok(())
    }

    fn check_json_round_trip(model: DiagramModel) -> Result<(), TestCaseError> {
        let json = model
            .to_json()
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let parsed =
            DiagramModel::from_json(&json).map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(parsed, model);
        Ok(())
    }

    proptest! {
        #[test]
        fn snapshot_round_trip(model in model_strategy()) {
            check_snapshot_round_trip(model)?;
        }

        #[test]
        fn json_round_trip(model in model_strategy()) {
            check_json_round_trip(model)?;
        }
    }
}
