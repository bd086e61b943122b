//! Relationship value type: a routed connector between two elements.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{geometry::Point, identifier::Id};

/// Connector family of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    ClassAssociation,
    ClassInheritance,
    ActivityControlFlow,
    BpmnSequenceFlow,
    CommunicationLink,
    Custom(Id),
}

impl RelationshipKind {
    pub const BUILTIN: [RelationshipKind; 5] = [
        RelationshipKind::ClassAssociation,
        RelationshipKind::ClassInheritance,
        RelationshipKind::ActivityControlFlow,
        RelationshipKind::BpmnSequenceFlow,
        RelationshipKind::CommunicationLink,
    ];

    fn builtin_name(self) -> Option<&'static str> {
        let name = match self {
            RelationshipKind::ClassAssociation => "ClassAssociation",
            RelationshipKind::ClassInheritance => "ClassInheritance",
            RelationshipKind::ActivityControlFlow => "ActivityControlFlow",
            RelationshipKind::BpmnSequenceFlow => "BPMNSequenceFlow",
            RelationshipKind::CommunicationLink => "CommunicationLink",
            RelationshipKind::Custom(_) => return None,
        };
        Some(name)
    }

    /// Whether relationships of this kind carry a message list.
    pub fn carries_messages(self) -> bool {
        self == RelationshipKind::CommunicationLink
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipKind::Custom(name) => write!(f, "{name}"),
            builtin => f.write_str(builtin.builtin_name().unwrap_or_default()),
        }
    }
}

impl From<&str> for RelationshipKind {
    fn from(name: &str) -> Self {
        Self::BUILTIN
            .into_iter()
            .find(|kind| kind.builtin_name() == Some(name))
            .unwrap_or_else(|| RelationshipKind::Custom(Id::new(name)))
    }
}

impl FromStr for RelationshipKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl Serialize for RelationshipKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RelationshipKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from(name.as_str()))
    }
}

/// Side of an element a connector leaves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    #[default]
    Right,
    Down,
    Left,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// One end of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub element: Id,
    pub direction: Direction,
}

impl Endpoint {
    pub fn new(element: Id, direction: Direction) -> Self {
        Self { element, direction }
    }
}

/// Which end of a relationship a message travels towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageDirection {
    Source,
    #[default]
    Target,
}

impl MessageDirection {
    pub fn flipped(self) -> Self {
        match self {
            MessageDirection::Source => MessageDirection::Target,
            MessageDirection::Target => MessageDirection::Source,
        }
    }
}

/// A named message on a communication link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    pub name: String,
    pub direction: MessageDirection,
}

/// A typed connector between two elements.
///
/// `path` is expressed in absolute diagram coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    id: Id,
    kind: RelationshipKind,
    name: String,
    source: Endpoint,
    target: Endpoint,
    path: Vec<Point>,
    messages: Vec<Message>,
    selected: bool,
    hovered: bool,
    interactive: bool,
}

impl Relationship {
    pub fn new(id: Id, kind: RelationshipKind, source: Endpoint, target: Endpoint) -> Self {
        Self {
            id,
            kind,
            name: String::new(),
            source,
            target,
            path: Vec::new(),
            messages: Vec::new(),
            selected: false,
            hovered: false,
            interactive: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_path(mut self, path: Vec<Point>) -> Self {
        self.path = path;
        self
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> RelationshipKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> Endpoint {
        self.source
    }

    pub fn target(&self) -> Endpoint {
        self.target
    }

    pub fn path(&self) -> &[Point] {
        &self.path
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns true if either endpoint references `element`.
    pub fn touches(&self, element: Id) -> bool {
        self.source.element == element || self.target.element == element
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_route(&mut self, source: Direction, target: Direction, path: Vec<Point>) {
        self.source.direction = source;
        self.target.direction = target;
        self.path = path;
    }

    pub fn messages_mut(&mut self) -> &mut Vec<Message> {
        &mut self.messages
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }
}
