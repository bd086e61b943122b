//! Z-ordered collection of SVG nodes.
//!
//! Drawing code tags every node with a [`RenderLayer`]; [`LayeredOutput::render`]
//! emits one `<g data-layer="...">` group per non-empty layer, bottom first.
//! Within a layer nodes keep insertion order, so owners drawn before their
//! children stay underneath them.

use svg::node::element as svg_element;

pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers, bottom to top in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Canvas fill.
    Background,
    /// Container shapes (packages, activities, classes).
    Container,
    /// Leaf and fixed-size shapes.
    Element,
    /// Relationship paths.
    Relationship,
    /// Names and messages.
    Text,
}

impl RenderLayer {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Container => "container",
            Self::Element => "element",
            Self::Relationship => "relationship",
            Self::Text => "text",
        }
    }
}

#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the output and returns one group per non-empty layer.
    pub fn render(mut self) -> Vec<SvgNode> {
        if self.is_empty() {
            return Vec::new();
        }

        // Stable, so insertion order survives within a layer.
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result = Vec::new();
        let mut current_layer = self.items[0].0;
        let mut current_group =
            svg_element::Group::new().set("data-layer", current_layer.name());

        for (layer, node) in self.items {
            if layer != current_layer {
                result.push(Box::new(current_group) as SvgNode);
                current_layer = layer;
                current_group = svg_element::Group::new().set("data-layer", layer.name());
            }
            current_group = current_group.add(node);
        }
        result.push(Box::new(current_group) as SvgNode);

        result
    }
}
