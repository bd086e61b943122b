//! Element value type and element kinds.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

/// Default width of a freshly created element, in diagram units.
pub const DEFAULT_WIDTH: f32 = 200.0;
/// Default height of a freshly created element, in diagram units.
pub const DEFAULT_HEIGHT: f32 = 100.0;

/// Shape family of an element.
///
/// Builtin kinds have fixed names; any other name deserializes into
/// [`ElementKind::Custom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Package,
    Class,
    Activity,
    ActivityActionNode,
    ActivityInitialNode,
    ObjectName,
    BpmnTask,
    BpmnCallActivity,
    BpmnGateway,
    Custom(Id),
}

impl ElementKind {
    /// Every builtin kind, in declaration order.
    pub const BUILTIN: [ElementKind; 9] = [
        ElementKind::Package,
        ElementKind::Class,
        ElementKind::Activity,
        ElementKind::ActivityActionNode,
        ElementKind::ActivityInitialNode,
        ElementKind::ObjectName,
        ElementKind::BpmnTask,
        ElementKind::BpmnCallActivity,
        ElementKind::BpmnGateway,
    ];

    fn builtin_name(self) -> Option<&'static str> {
        let name = match self {
            ElementKind::Package => "Package",
            ElementKind::Class => "Class",
            ElementKind::Activity => "Activity",
            ElementKind::ActivityActionNode => "ActivityActionNode",
            ElementKind::ActivityInitialNode => "ActivityInitialNode",
            ElementKind::ObjectName => "ObjectName",
            ElementKind::BpmnTask => "BPMNTask",
            ElementKind::BpmnCallActivity => "BPMNCallActivity",
            ElementKind::BpmnGateway => "BPMNGateway",
            ElementKind::Custom(_) => return None,
        };
        Some(name)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Custom(name) => write!(f, "{name}"),
            builtin => f.write_str(builtin.builtin_name().unwrap_or_default()),
        }
    }
}

impl From<&str> for ElementKind {
    fn from(name: &str) -> Self {
        Self::BUILTIN
            .into_iter()
            .find(|kind| kind.builtin_name() == Some(name))
            .unwrap_or_else(|| ElementKind::Custom(Id::new(name)))
    }
}

impl FromStr for ElementKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl Serialize for ElementKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ElementKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from(name.as_str()))
    }
}

/// Which axes of an element may be changed by a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Resizable {
    #[default]
    Both,
    Width,
    Height,
    None,
}

impl Resizable {
    pub fn allows_width(self) -> bool {
        matches!(self, Resizable::Both | Resizable::Width)
    }

    pub fn allows_height(self) -> bool {
        matches!(self, Resizable::Both | Resizable::Height)
    }
}

/// Per-kind policy consulted before an operation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities {
    pub hoverable: bool,
    pub selectable: bool,
    pub movable: bool,
    pub resizable: Resizable,
    pub connectable: bool,
    pub droppable: bool,
    pub editable: bool,
    pub interactable: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            hoverable: true,
            selectable: true,
            movable: true,
            resizable: Resizable::Both,
            connectable: true,
            droppable: false,
            editable: true,
            interactable: true,
        }
    }
}

/// A positioned, typed node in the diagram.
///
/// `bounds` are relative to the owner's origin, or to the canvas when
/// `owner` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: Id,
    kind: ElementKind,
    name: String,
    bounds: Bounds,
    owner: Option<Id>,
    preferred_size: Option<Size>,
    base_size: Size,
    selected: bool,
    hovered: bool,
    interactive: bool,
}

impl Element {
    /// Creates a root-level element with the default 200×100 bounds at the origin.
    pub fn new(id: Id, kind: ElementKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            bounds: Bounds::new(0.0, 0.0, DEFAULT_WIDTH, DEFAULT_HEIGHT),
            owner: None,
            preferred_size: None,
            base_size: Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            selected: false,
            hovered: false,
            interactive: false,
        }
    }

    /// Sets the bounds the element is created with.
    ///
    /// Their size also becomes the element's base size.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self.base_size = bounds.to_size();
        self
    }

    pub fn with_owner(mut self, owner: Option<Id>) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_preferred_size(mut self, size: Option<Size>) -> Self {
        self.preferred_size = size;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Top-left corner in the owner's frame.
    pub fn origin(&self) -> Point {
        self.bounds.min_point()
    }

    pub fn owner(&self) -> Option<Id> {
        self.owner
    }

    /// The size last set by an explicit resize, if any.
    ///
    /// Layout never shrinks an element below this size.
    pub fn preferred_size(&self) -> Option<Size> {
        self.preferred_size
    }

    /// Size the element was created or imported with.
    ///
    /// Layout falls back to it when there is no preferred size, so growth
    /// caused by content is undone once the content shrinks again.
    pub fn base_size(&self) -> Size {
        self.base_size
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

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn set_owner(&mut self, owner: Option<Id>) {
        self.owner = owner;
    }

    pub fn set_preferred_size(&mut self, size: Option<Size>) {
        self.preferred_size = size;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_defaults() {
        let element = Element::new(Id::new("a"), ElementKind::Package, "A");
        assert_eq!(element.bounds(), Bounds::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(element.owner(), None);
        assert!(!element.is_selected());
        assert!(!element.is_hovered());
        assert!(!element.is_interactive());
        assert_eq!(element.preferred_size(), None);
        assert_eq!(element.base_size(), Size::new(200.0, 100.0));
    }

    #[test]
    fn test_base_size_follows_creation_bounds_only() {
        let mut element = Element::new(Id::new("a"), ElementKind::Package, "A")
            .with_bounds(Bounds::new(5.0, 5.0, 120.0, 80.0));
        assert_eq!(element.base_size(), Size::new(120.0, 80.0));

        element.set_bounds(Bounds::new(5.0, 5.0, 300.0, 200.0));
        assert_eq!(element.base_size(), Size::new(120.0, 80.0));
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ElementKind::BUILTIN {
            assert_eq!(ElementKind::from(kind.to_string().as_str()), kind);
        }
    }

    #[test]
    fn test_unknown_kind_is_custom() {
        let kind = ElementKind::from("UseCase");
        assert_eq!(kind, ElementKind::Custom(Id::new("UseCase")));
        assert_eq!(kind.to_string(), "UseCase");
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&ElementKind::BpmnTask).unwrap();
        assert_eq!(json, "\"BPMNTask\"");

        let kind: ElementKind = serde_json::from_str("\"Package\"").unwrap();
        assert_eq!(kind, ElementKind::Package);
    }

    #[test]
    fn test_resizable_axes() {
        assert!(Resizable::Both.allows_width() && Resizable::Both.allows_height());
        assert!(Resizable::Width.allows_width() && !Resizable::Width.allows_height());
        assert!(!Resizable::Height.allows_width() && Resizable::Height.allows_height());
        assert!(!Resizable::None.allows_width() && !Resizable::None.allows_height());
    }

    #[test]
    fn test_default_capabilities() {
        let caps = Capabilities::default();
        assert!(caps.movable);
        assert!(caps.connectable);
        assert!(!caps.droppable);
        assert_eq!(caps.resizable, Resizable::Both);
    }
}
