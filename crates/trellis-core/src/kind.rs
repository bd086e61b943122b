//! Kind registry: capability and layout policy per element kind.
//!
//! Capabilities are a property of the kind, never of an individual element.
//! Builtin kinds come with a fixed profile; hosts can register overrides for
//! builtin or custom kinds.

use std::collections::HashMap;

use crate::{
    element::{Capabilities, DEFAULT_HEIGHT, DEFAULT_WIDTH, ElementKind, Resizable},
    geometry::Size,
};

/// How the layout engine derives an element's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutStrategy {
    /// Size driven by the label: grow to fit the name.
    #[default]
    Leaf,
    /// Size driven by owned children plus margin.
    Container,
    /// Size never changes.
    Fixed,
}

/// Capabilities, layout strategy and creation size of a kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindProfile {
    pub capabilities: Capabilities,
    pub layout: LayoutStrategy,
    pub default_size: Size,
}

impl Default for KindProfile {
    fn default() -> Self {
        Self {
            capabilities: Capabilities::default(),
            layout: LayoutStrategy::Leaf,
            default_size: Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
        }
    }
}

impl KindProfile {
    fn builtin(kind: ElementKind, base_size: Size) -> Self {
        let base = Self {
            default_size: base_size,
            ..Self::default()
        };
        match kind {
            ElementKind::Package | ElementKind::Activity => Self {
                capabilities: Capabilities {
                    droppable: true,
                    ..base.capabilities
                },
                layout: LayoutStrategy::Container,
                ..base
            },
            ElementKind::Class => Self {
                layout: LayoutStrategy::Container,
                ..base
            },
            ElementKind::ActivityActionNode
            | ElementKind::ObjectName
            | ElementKind::BpmnTask
            | ElementKind::BpmnCallActivity
            | ElementKind::Custom(_) => base,
            ElementKind::ActivityInitialNode => Self::fixed(Size::new(45.0, 45.0), false),
            ElementKind::BpmnGateway => Self::fixed(Size::new(40.0, 40.0), true),
        }
    }

    fn fixed(size: Size, editable: bool) -> Self {
        let base = Self::default();
        Self {
            capabilities: Capabilities {
                resizable: Resizable::None,
                editable,
                ..base.capabilities
            },
            layout: LayoutStrategy::Fixed,
            default_size: size,
        }
    }
}

/// Lookup table from element kind to [`KindProfile`].
///
/// # Examples
///
/// ```
/// # use trellis_core::element::{ElementKind, Resizable};
/// # use trellis_core::kind::{KindRegistry, LayoutStrategy};
/// let mut registry = KindRegistry::new();
/// assert_eq!(registry.layout(ElementKind::Package), LayoutStrategy::Container);
///
/// let custom = ElementKind::from("Note");
/// let mut profile = registry.profile(custom);
/// profile.capabilities.resizable = Resizable::Width;
/// registry.register(custom, profile);
/// assert_eq!(registry.capabilities(custom).resizable, Resizable::Width);
/// ```
#[derive(Debug, Clone)]
pub struct KindRegistry {
    overrides: HashMap<ElementKind, KindProfile>,
    base_size: Size,
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self {
            overrides: HashMap::new(),
            base_size: Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
        }
    }
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the creation size of containers and custom kinds.
    pub fn with_default_size(mut self, size: Size) -> Self {
        self.base_size = size;
        self
    }

    /// Replaces the profile used for `kind`.
    pub fn register(&mut self, kind: ElementKind, profile: KindProfile) {
        self.overrides.insert(kind, profile);
    }

    pub fn profile(&self, kind: ElementKind) -> KindProfile {
        self.overrides
            .get(&kind)
            .copied()
            .unwrap_or_else(|| KindProfile::builtin(kind, self.base_size))
    }

    pub fn capabilities(&self, kind: ElementKind) -> Capabilities {
        self.profile(kind).capabilities
    }

    pub fn layout(&self, kind: ElementKind) -> LayoutStrategy {
        self.profile(kind).layout
    }

    pub fn default_size(&self, kind: ElementKind) -> Size {
        self.profile(kind).default_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::Id;

    #[test]
    fn test_containers() {
        let registry = KindRegistry::new();
        for kind in [ElementKind::Package, ElementKind::Activity] {
            assert_eq!(registry.layout(kind), LayoutStrategy::Container);
            assert!(registry.capabilities(kind).droppable);
        }
        assert_eq!(registry.layout(ElementKind::Class), LayoutStrategy::Container);
        assert!(!registry.capabilities(ElementKind::Class).droppable);
    }

    #[test]
    fn test_fixed_kinds_are_not_resizable() {
        let registry = KindRegistry::new();
        for kind in [ElementKind::ActivityInitialNode, ElementKind::BpmnGateway] {
            assert_eq!(registry.layout(kind), LayoutStrategy::Fixed);
            assert_eq!(registry.capabilities(kind).resizable, Resizable::None);
        }
        assert!(!registry.capabilities(ElementKind::ActivityInitialNode).editable);
    }

    #[test]
    fn test_custom_kind_uses_defaults() {
        let registry = KindRegistry::new();
        let profile = registry.profile(ElementKind::Custom(Id::new("Actor")));
        assert_eq!(profile, KindProfile::default());
        assert_eq!(profile.default_size, Size::new(200.0, 100.0));
    }

    #[test]
    fn test_configured_default_size() {
        let registry = KindRegistry::new().with_default_size(Size::new(120.0, 80.0));
        assert_eq!(registry.default_size(ElementKind::Package), Size::new(120.0, 80.0));
        assert_eq!(registry.default_size(ElementKind::BpmnGateway), Size::new(40.0, 40.0));
        assert_eq!(registry.default_size(ElementKind::BpmnTask), Size::new(120.0, 80.0));
    }

    #[test]
    fn test_override_builtin() {
        let mut registry = KindRegistry::new();
        let mut profile = registry.profile(ElementKind::BpmnTask);
        profile.capabilities.movable = false;
        registry.register(ElementKind::BpmnTask, profile);

        assert!(!registry.capabilities(ElementKind::BpmnTask).movable);
        assert!(registry.capabilities(ElementKind::BpmnCallActivity).movable);
    }
}
