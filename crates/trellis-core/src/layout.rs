//! Layout engine: derives element bounds from content and containment.
//!
//! Every function here is pure. The engine reads an [`Element`] and the
//! bounds of its children and returns new bounds; committing the result is
//! the caller's job.
//!
//! Layout is idempotent: feeding an already laid-out element back in returns
//! the same bounds.

use std::sync::Arc;

use log::trace;

use crate::{
    element::Element,
    geometry::{Bounds, Point, Size},
    kind::LayoutStrategy,
    text::{MonospaceMeasurer, TextDefinition, TextMeasurer, measure_label},
};

/// Default space kept between a container border and its children.
pub const DEFAULT_CONTAINER_MARGIN: f32 = 10.0;

/// Result of laying out an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementLayout {
    /// New bounds in the owner's frame.
    pub bounds: Bounds,
    /// Translation to apply to every child's bounds.
    ///
    /// Non-zero only when the container origin moved up or left to make room
    /// for a child; children are shifted by the opposite amount so their
    /// absolute positions do not change.
    pub child_offset: Point,
}

impl ElementLayout {
    fn unchanged_children(bounds: Bounds) -> Self {
        Self {
            bounds,
            child_offset: Point::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutEngine {
    measurer: Arc<dyn TextMeasurer>,
    text: TextDefinition,
    container_margin: f32,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(Arc::new(MonospaceMeasurer), TextDefinition::default())
    }
}

impl LayoutEngine {
    pub fn new(measurer: Arc<dyn TextMeasurer>, text: TextDefinition) -> Self {
        Self {
            measurer,
            text,
            container_margin: DEFAULT_CONTAINER_MARGIN,
        }
    }

    pub fn with_container_margin(mut self, margin: f32) -> Self {
        self.container_margin = margin;
        self
    }

    pub fn container_margin(&self) -> f32 {
        self.container_margin
    }

    pub fn text_definition(&self) -> &TextDefinition {
        &self.text
    }

    /// Minimum size needed to render `text` without clipping, padding included.
    pub fn measure_label(&self, text: &str) -> Size {
        measure_label(self.measurer.as_ref(), text, &self.text)
    }

    /// Lays out `element` according to its kind's strategy.
    ///
    /// `children` are the bounds of the element's direct children, in the
    /// element's own frame. They are ignored for non-container strategies.
    pub fn layout(
        &self,
        element: &Element,
        strategy: LayoutStrategy,
        children: &[Bounds],
    ) -> ElementLayout {
        match strategy {
            LayoutStrategy::Fixed => ElementLayout::unchanged_children(element.bounds()),
            LayoutStrategy::Leaf => ElementLayout::unchanged_children(self.layout_leaf(element)),
            LayoutStrategy::Container => self.layout_container(element, children),
        }
    }

    /// Grows an element to fit its label, keeping the top-left corner.
    ///
    /// The element never becomes smaller than its explicitly resized size,
    /// or its base size when it was never resized.
    pub fn layout_leaf(&self, element: &Element) -> Bounds {
        let size = size_floor(element).max(self.measure_label(element.name()));
        element.bounds().with_size(size)
    }

    /// Computes the smallest bounds enclosing the label and all children
    /// plus the container margin.
    ///
    /// If a child sits closer than the margin to the top or left border, the
    /// container origin moves up or left by the missing amount and
    /// [`ElementLayout::child_offset`] reports how far children must move to
    /// keep their absolute position.
    pub fn layout_container(&self, element: &Element, children: &[Bounds]) -> ElementLayout {
        let margin = self.container_margin;
        let label = self.measure_label(element.name());
        let floor = size_floor(element).max(label);

        let Some(extent) = merge_all(children.iter().copied()) else {
            return ElementLayout::unchanged_children(element.bounds().with_size(floor));
        };

        let shift = Point::new(
            missing_margin(extent.min_x(), margin),
            missing_margin(extent.min_y(), margin),
        );
        let child_offset = Point::new(-shift.x(), -shift.y());

        // Measure the children where they will end up so that a second pass
        // over the shifted children sees exactly the same extent.
        let placed =
            merge_all(children.iter().map(|b| b.translate(child_offset))).unwrap_or(extent);
        let required = Size::new(placed.max_x() + margin, placed.max_y() + margin);

        let bounds = element
            .bounds()
            .translate(shift)
            .with_size(floor.max(required));

        if !child_offset.is_zero() {
            trace!(
                element_id:% = element.id(),
                dx = child_offset.x(),
                dy = child_offset.y();
                "Container origin shifted to fit children"
            );
        }

        ElementLayout {
            bounds,
            child_offset,
        }
    }
}

/// Tolerance below which a child is considered to respect the margin.
const MARGIN_EPSILON: f32 = 1e-3;

fn size_floor(element: &Element) -> Size {
    element.preferred_size().unwrap_or_else(|| element.base_size())
}

fn merge_all(bounds: impl Iterator<Item = Bounds>) -> Option<Bounds> {
    bounds.reduce(|acc, b| acc.merge(&b))
}

/// Negative amount by which `min` violates `margin`, or zero.
fn missing_margin(min: f32, margin: f32) -> f32 {
    if min < margin - MARGIN_EPSILON {
        min - margin
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::{element::ElementKind, identifier::Id};

    fn package(name: &str, bounds: Bounds) -> Element {
        Element::new(Id::new("container"), ElementKind::Package, name).with_bounds(bounds)
    }

    fn leaf(name: &str, bounds: Bounds) -> Element {
        Element::new(Id::new("leaf"), ElementKind::ActivityActionNode, name).with_bounds(bounds)
    }

    #[test]
    fn test_measure_label_empty() {
        let engine = LayoutEngine::default();
        assert_eq!(engine.measure_label(""), Size::default());
    }

    #[test]
    fn test_leaf_without_name_keeps_default_bounds() {
        let engine = LayoutEngine::default();
        let element = Element::new(Id::new("n"), ElementKind::ActivityActionNode, "");
        assert_eq!(
            engine.layout_leaf(&element),
            Bounds::new(0.0, 0.0, 200.0, 100.0)
        );
    }

    #[test]
    fn test_leaf_grows_to_label_keeping_origin() {
        let engine = LayoutEngine::default();
        let element = leaf("A rather long action name", Bounds::new(5.0, 7.0, 20.0, 10.0));
        let label = engine.measure_label(element.name());

        let bounds = engine.layout_leaf(&element);
        assert_eq!(bounds.min_point(), Point::new(5.0, 7.0));
        assert_approx_eq!(f32, bounds.width(), label.width());
        assert_approx_eq!(f32, bounds.height(), label.height());
    }

    #[test]
    fn test_leaf_shrinks_back_to_preferred_size() {
        let engine = LayoutEngine::default();
        let element = leaf("x", Bounds::new(0.0, 0.0, 400.0, 100.0))
            .with_preferred_size(Some(Size::new(120.0, 60.0)));

        let bounds = engine.layout_leaf(&element);
        assert_eq!(bounds.to_size(), Size::new(120.0, 60.0));
    }

    #[test]
    fn test_container_without_children_keeps_size() {
        let engine = LayoutEngine::default();
        let element = package("", Bounds::new(0.0, 0.0, 200.0, 100.0));

        let layout = engine.layout_container(&element, &[]);
        assert_eq!(layout.bounds, Bounds::new(0.0, 0.0, 200.0, 100.0));
        assert!(layout.child_offset.is_zero());
    }

    #[test]
    fn test_container_grows_to_enclose_children() {
        let engine = LayoutEngine::default();
        let element = package("", Bounds::new(0.0, 0.0, 200.0, 100.0));
        let children = [Bounds::new(150.0, 80.0, 100.0, 50.0)];

        let layout = engine.layout_container(&element, &children);
        assert_eq!(layout.bounds, Bounds::new(0.0, 0.0, 260.0, 140.0));
        assert!(layout.child_offset.is_zero());
    }

    #[test]
    fn test_container_shifts_origin_for_close_child() {
        let engine = LayoutEngine::default();
        let element = package("", Bounds::new(100.0, 100.0, 200.0, 100.0));
        let children = [Bounds::new(-20.0, 4.0, 50.0, 20.0)];

        let layout = engine.layout_container(&element, &children);
        assert_eq!(layout.child_offset, Point::new(30.0, 6.0));
        assert_eq!(layout.bounds.min_point(), Point::new(70.0, 94.0));

        // Absolute child position is unchanged.
        let before = children[0].translate(Point::new(100.0, 100.0));
        let after = children[0]
            .translate(layout.child_offset)
            .translate(layout.bounds.min_point());
        assert_eq!(before, after);
    }

    #[test]
    fn test_container_is_idempotent() {
        let engine = LayoutEngine::default();
        let element = package("Domain", Bounds::new(100.0, 100.0, 200.0, 100.0));
        let children = [
            Bounds::new(-20.0, 4.0, 50.0, 20.0),
            Bounds::new(180.0, 90.0, 80.0, 40.0),
        ];

        let first = engine.layout_container(&element, &children);
        let moved: Vec<Bounds> = children
            .iter()
            .map(|b| b.translate(first.child_offset))
            .collect();
        let mut laid_out = element.clone();
        laid_out.set_bounds(first.bounds);

        let second = engine.layout_container(&laid_out, &moved);
        assert_eq!(second.bounds, first.bounds);
        assert!(second.child_offset.is_zero());
    }

    #[test]
    fn test_container_shrinks_back_to_base_size() {
        let engine = LayoutEngine::default();
        let mut element = package("", Bounds::new(0.0, 0.0, 200.0, 100.0));

        let grown = engine.layout_container(&element, &[Bounds::new(320.0, 20.0, 50.0, 20.0)]);
        assert_eq!(grown.bounds.to_size(), Size::new(380.0, 100.0));
        element.set_bounds(grown.bounds);

        let back = engine.layout_container(&element, &[Bounds::new(20.0, 20.0, 50.0, 20.0)]);
        assert_eq!(back.bounds, Bounds::new(0.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn test_fixed_strategy_keeps_bounds() {
        let engine = LayoutEngine::default();
        let element = Element::new(Id::new("g"), ElementKind::BpmnGateway, "a long gateway label")
            .with_bounds(Bounds::new(1.0, 2.0, 40.0, 40.0));

        let layout = engine.layout(&element, LayoutStrategy::Fixed, &[]);
        assert_eq!(layout.bounds, element.bounds());
    }

    #[test]
    fn test_custom_margin() {
        let engine = LayoutEngine::default().with_container_margin(25.0);
        let element = package("", Bounds::new(0.0, 0.0, 10.0, 10.0));
        let layout = engine.layout_container(&element, &[Bounds::new(25.0, 25.0, 10.0, 10.0)]);
        assert_eq!(layout.bounds.to_size(), Size::new(60.0, 60.0));
    }
}
