//! Arrowhead marker definitions for relationship paths.

use svg::node::element::{Definitions, Marker, Path};

use trellis_core::{color::Color, relationship::RelationshipKind};

/// Head drawn at the target end of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowHead {
    /// Filled arrow (control and sequence flows).
    Filled,
    /// Hollow triangle (inheritance).
    Hollow,
}

impl ArrowHead {
    pub fn for_kind(kind: RelationshipKind) -> Option<Self> {
        match kind {
            RelationshipKind::ActivityControlFlow | RelationshipKind::BpmnSequenceFlow => {
                Some(Self::Filled)
            }
            RelationshipKind::ClassInheritance => Some(Self::Hollow),
            RelationshipKind::ClassAssociation
            | RelationshipKind::CommunicationLink
            | RelationshipKind::Custom(_) => None,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::Filled => "arrow",
            Self::Hollow => "triangle",
        }
    }

    /// `url(#...)` reference to the marker of this head in `color`.
    pub fn reference(self, color: Color) -> String {
        format!("url(#{}-{})", self.prefix(), color.to_id_safe_string())
    }
}

/// Creates both marker kinds for every color in `colors`.
pub fn marker_definitions(colors: &[Color], fill: Color) -> Definitions {
    let mut defs = Definitions::new();

    for color in colors {
        let arrow = Marker::new()
            .set("id", format!("arrow-{}", color.to_id_safe_string()))
            .set("viewBox", "0 0 10 10")
            .set("refX", 9)
            .set("refY", 5)
            .set("markerWidth", 6)
            .set("markerHeight", 6)
            .set("orient", "auto")
            .add(
                Path::new()
                    .set("d", "M 0 0 L 10 5 L 0 10 z")
                    .set("fill", color.to_string()),
            );

        let triangle = Marker::new()
            .set("id", format!("triangle-{}", color.to_id_safe_string()))
            .set("viewBox", "0 0 10 10")
            .set("refX", 9)
            .set("refY", 5)
            .set("markerWidth", 10)
            .set("markerHeight", 10)
            .set("orient", "auto")
            .add(
                Path::new()
                    .set("d", "M 0 0 L 10 5 L 0 10 z")
                    .set("fill", fill.to_string())
                    .set("stroke", color.to_string()),
            );

        defs = defs.add(arrow).add(triangle);
    }

    defs
}
