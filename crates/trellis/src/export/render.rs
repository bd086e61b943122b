//! Shape drawing for elements and relationships.

use indexmap::IndexSet;
use log::debug;
use svg::node::{Text as SvgText, element as svg_element};

use trellis_core::{
    color::Color,
    element::{Element, ElementKind},
    geometry::{Bounds, Insets, Point},
    identifier::Id,
    kind::{KindRegistry, LayoutStrategy},
    relationship::{MessageDirection, Relationship},
    text::{MonospaceMeasurer, TextMeasurer, measure_text},
};

use super::{
    ExportStyle, ExportedSvg,
    layer::{LayeredOutput, RenderLayer},
    markers::{ArrowHead, marker_definitions},
};
use crate::snapshot::Snapshot;

pub(super) struct SvgRenderer<'a> {
    snapshot: &'a Snapshot,
    registry: &'a KindRegistry,
    style: &'a ExportStyle,
}

impl<'a> SvgRenderer<'a> {
    pub(super) fn new(
        snapshot: &'a Snapshot,
        registry: &'a KindRegistry,
        style: &'a ExportStyle,
    ) -> Self {
        Self {
            snapshot,
            registry,
            style,
        }
    }

    pub(super) fn render(
        &self,
        elements: &IndexSet<Id>,
        relationships: &IndexSet<Id>,
        margin: f32,
    ) -> ExportedSvg {
        let mut output = LayeredOutput::new();
        let mut content: Option<Bounds> = None;
        let mut include = |bounds: Bounds| {
            content = Some(match content {
                Some(acc) => acc.merge(&bounds),
                None => bounds,
            });
        };

        for id in elements {
            let Some(element) = self.snapshot.element(*id) else {
                continue;
            };
            let Some(bounds) = self.snapshot.absolute_bounds(*id) else {
                continue;
            };
            include(bounds);
            output.merge(self.render_element(element, bounds));
        }

        for id in relationships {
            let Some(relationship) = self.snapshot.relationship(*id) else {
                continue;
            };
            if let Some(bounds) = path_bounds(relationship.path()) {
                include(bounds);
            }
            output.merge(self.render_relationship(relationship));
        }

        let clip = content
            .unwrap_or_default()
            .add_padding(Insets::uniform(margin));
        debug!(
            x = clip.x(),
            y = clip.y(),
            width = clip.width(),
            height = clip.height();
            "Export clip computed"
        );

        let mut doc = svg::Document::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    clip.x(),
                    clip.y(),
                    clip.width(),
                    clip.height()
                ),
            )
            .set("width", clip.width())
            .set("height", clip.height());

        if let Some(background) = self.style.background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", clip.x())
                    .set("y", clip.y())
                    .set("width", clip.width())
                    .set("height", clip.height())
                    .set("fill", background.to_string())
                    .set("fill-opacity", background.alpha()),
            );
        }

        doc = doc.add(marker_definitions(
            &[self.style.stroke, self.style.selection],
            self.style.fill,
        ));
        for node in output.render() {
            doc = doc.add(node);
        }

        ExportedSvg {
            svg: doc.to_string(),
            clip,
        }
    }

    fn stroke_for(&self, selected: bool) -> Color {
        if selected {
            self.style.selection
        } else {
            self.style.stroke
        }
    }

    fn render_element(&self, element: &Element, bounds: Bounds) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let stroke = self.stroke_for(element.is_selected());
        let layer = match self.registry.layout(element.kind()) {
            LayoutStrategy::Container => RenderLayer::Container,
            LayoutStrategy::Leaf | LayoutStrategy::Fixed => RenderLayer::Element,
        };
        let id = element.id().to_string();

        match element.kind() {
            ElementKind::ActivityInitialNode => {
                let center = bounds.center();
                let shape = svg_element::Circle::new()
                    .set("data-id", id)
                    .set("cx", center.x())
                    .set("cy", center.y())
                    .set("r", bounds.width().min(bounds.height()) / 2.0)
                    .set("fill", stroke.to_string());
                output.add_to_layer(layer, Box::new(shape));
                return output;
            }
            ElementKind::BpmnGateway => {
                let center = bounds.center();
                let points = format!(
                    "{},{} {},{} {},{} {},{}",
                    center.x(),
                    bounds.min_y(),
                    bounds.max_x(),
                    center.y(),
                    center.x(),
                    bounds.max_y(),
                    bounds.min_x(),
                    center.y()
                );
                let shape = svg_element::Polygon::new()
                    .set("data-id", id)
                    .set("points", points)
                    .set("fill", self.style.fill.to_string())
                    .set("stroke", stroke.to_string());
                output.add_to_layer(layer, Box::new(shape));
            }
            kind => {
                let rounded = matches!(
                    kind,
                    ElementKind::Activity
                        | ElementKind::ActivityActionNode
                        | ElementKind::BpmnTask
                        | ElementKind::BpmnCallActivity
                );
                let mut shape = svg_element::Rectangle::new()
                    .set("data-id", id)
                    .set("x", bounds.x())
                    .set("y", bounds.y())
                    .set("width", bounds.width())
                    .set("height", bounds.height())
                    .set("fill", self.style.fill.to_string())
                    .set("stroke", stroke.to_string())
                    .set(
                        "stroke-width",
                        if kind == ElementKind::BpmnCallActivity {
                            3
                        } else {
                            1
                        },
                    );
                if rounded {
                    shape = shape.set("rx", 10);
                }
                output.add_to_layer(layer, Box::new(shape));
            }
        }

        if element.name().is_empty() {
            return output;
        }

        let text = &self.style.text;
        let label = measure_text(&MonospaceMeasurer, element.name(), text);
        let anchor = match layer {
            // Container names sit in a header band at the top.
            RenderLayer::Container => Point::new(
                bounds.center().x(),
                bounds.min_y() + text.padding().top() + label.height() / 2.0,
            ),
            _ => bounds.center(),
        };
        output.add_to_layer(RenderLayer::Text, Box::new(self.text(element.name(), anchor)));

        if element.kind() == ElementKind::Class {
            let y = bounds.min_y() + label.height() + text.padding().vertical_sum();
            let divider = svg_element::Line::new()
                .set("x1", bounds.min_x())
                .set("y1", y)
                .set("x2", bounds.max_x())
                .set("y2", y)
                .set("stroke", stroke.to_string());
            output.add_to_layer(RenderLayer::Container, Box::new(divider));
        }

        output
    }

    fn render_relationship(&self, relationship: &Relationship) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let path = relationship.path();
        if path.len() < 2 {
            return output;
        }

        let stroke = self.stroke_for(relationship.is_selected());
        let data = path
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{} {} {}", if i == 0 { "M" } else { "L" }, p.x(), p.y()))
            .collect::<Vec<_>>()
            .join(" ");

        let mut line = svg_element::Path::new()
            .set("data-id", relationship.id().to_string())
            .set("d", data)
            .set("fill", "none")
            .set("stroke", stroke.to_string());
        if let Some(head) = ArrowHead::for_kind(relationship.kind()) {
            line = line.set("marker-end", head.reference(stroke));
        }
        output.add_to_layer(RenderLayer::Relationship, Box::new(line));

        let anchor = path_midpoint(path);
        let line_height = MonospaceMeasurer.line_height(&self.style.text);
        let mut offset = 0.0;
        if !relationship.name().is_empty() {
            output.add_to_layer(
                RenderLayer::Text,
                Box::new(self.text(
                    relationship.name(),
                    anchor.add_point(Point::new(0.0, -line_height)),
                )),
            );
        }
        for message in relationship.messages() {
            offset += line_height;
            let arrow = match message.direction {
                MessageDirection::Source => "\u{2190}",
                MessageDirection::Target => "\u{2192}",
            };
            let content = format!("{arrow} {}", message.name);
            output.add_to_layer(
                RenderLayer::Text,
                Box::new(self.text(&content, anchor.add_point(Point::new(0.0, offset)))),
            );
        }

        output
    }

    /// Multi-line text centered on `position`.
    fn text(&self, content: &str, position: Point) -> svg_element::Text {
        let definition = &self.style.text;
        let lines: Vec<&str> = content.lines().collect();
        let line_height = MonospaceMeasurer.line_height(definition);
        let total_height = line_height * lines.len() as f32;
        let y_offset = -(total_height + line_height) / 2.0;

        let mut rendered = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", position.y() + y_offset)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", definition.font_family())
            .set("font-size", definition.font_size());

        for line in lines {
            rendered = rendered.add(
                svg_element::TSpan::new("")
                    .set("x", position.x())
                    .set("dy", line_height)
                    .add(SvgText::new(line)),
            );
        }
        rendered
    }
}

fn path_bounds(path: &[Point]) -> Option<Bounds> {
    path.iter()
        .map(|p| Bounds::new(p.x(), p.y(), 0.0, 0.0))
        .reduce(|acc, b| acc.merge(&b))
}

/// Point halfway along the polyline.
fn path_midpoint(path: &[Point]) -> Point {
    let total: f32 = path.windows(2).map(|w| w[1].sub_point(w[0]).hypot()).sum();
    let mut remaining = total / 2.0;
    for w in path.windows(2) {
        let length = w[1].sub_point(w[0]).hypot();
        if length >= remaining && length > 0.0 {
            let t = remaining / length;
            return w[0].add_point(w[1].sub_point(w[0]).scale(t));
        }
        remaining -= length;
    }
    path.first().copied().unwrap_or_default()
}
