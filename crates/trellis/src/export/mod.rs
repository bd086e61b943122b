//! SVG export of a snapshot.
//!
//! Export is a pure read path: it walks an immutable [`Snapshot`] and never
//! goes through the repository.
//!
//! ```text
//! Snapshot
//!     ↓ filter (include / exclude, descendants follow their owner)
//! Drawn elements + relationships
//!     ↓ render into z-ordered layers
//! SVG document with viewBox = clip
//! ```

mod layer;
mod markers;
mod render;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};

use std::{fs, io, path::Path};

use indexmap::IndexSet;
use log::{error, info};
use thiserror::Error;

use trellis_core::{
    color::Color, geometry::Bounds, identifier::Id, kind::KindRegistry, text::TextDefinition,
};

use crate::{config::StyleConfig, error::TrellisError, snapshot::Snapshot};

/// Space around the drawn content, in diagram units.
pub const DEFAULT_EXPORT_MARGIN: f32 = 15.0;

#[derive(Debug, Error)]
pub enum Error {
    #[error("export filter references unknown id `{0}`")]
    UnknownId(Id),

    #[error("failed to write `{path}`")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Colors and font used for drawing.
#[derive(Debug, Clone)]
pub struct ExportStyle {
    pub background: Option<Color>,
    pub stroke: Color,
    pub fill: Color,
    pub selection: Color,
    pub text: TextDefinition,
}

impl Default for ExportStyle {
    fn default() -> Self {
        Self {
            background: None,
            stroke: Color::default(),
            fill: Color::new("white").unwrap_or_default(),
            selection: Color::new("#1e90ff").unwrap_or_default(),
            text: TextDefinition::default(),
        }
    }
}

impl ExportStyle {
    /// Resolves the color strings of a [`StyleConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Config`] if a configured color is invalid.
    pub fn from_config(style: &StyleConfig) -> Result<Self, TrellisError> {
        Ok(Self {
            background: style.background_color()?,
            selection: style.selection_color()?,
            text: style.text_definition(),
            ..Self::default()
        })
    }
}

/// What to draw and how.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Space around the drawn content.
    pub margin: f32,
    /// When set, only these elements (with their descendants) and
    /// relationships are drawn.
    pub include: Option<Vec<Id>>,
    /// Elements (with their descendants) and relationships never drawn.
    pub exclude: Vec<Id>,
    pub style: ExportStyle,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            margin: DEFAULT_EXPORT_MARGIN,
            include: None,
            exclude: Vec::new(),
            style: ExportStyle::default(),
        }
    }
}

/// A rendered document and the diagram-space box it shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedSvg {
    pub svg: String,
    pub clip: Bounds,
}

impl ExportedSvg {
    /// Writes the document to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        info!(path:? = path; "Writing SVG file");
        fs::write(path, &self.svg).map_err(|source| {
            error!(path:? = path, err:% = source; "Failed to write SVG file");
            Error::Write {
                path: path.display().to_string(),
                source,
            }
        })
    }
}

/// Renders `snapshot` to SVG.
///
/// # Errors
///
/// Returns [`Error::UnknownId`] if `include` or `exclude` names an id that
/// is not in the snapshot.
pub fn export_svg(
    snapshot: &Snapshot,
    registry: &KindRegistry,
    options: &ExportOptions,
) -> Result<ExportedSvg, Error> {
    for id in options.include.iter().flatten().chain(&options.exclude) {
        if !snapshot.contains(*id) {
            return Err(Error::UnknownId(*id));
        }
    }

    let drawn = DrawnSet::new(snapshot, options);
    let exported = render::SvgRenderer::new(snapshot, registry, &options.style).render(
        &drawn.elements,
        &drawn.relationships,
        options.margin,
    );
    info!(
        elements = drawn.elements.len(),
        relationships = drawn.relationships.len(),
        width = exported.clip.width(),
        height = exported.clip.height();
        "Diagram exported"
    );
    Ok(exported)
}

/// Ids selected for drawing, in snapshot order.
struct DrawnSet {
    elements: IndexSet<Id>,
    relationships: IndexSet<Id>,
}

impl DrawnSet {
    fn new(snapshot: &Snapshot, options: &ExportOptions) -> Self {
        let listed = |list: &[Id], id: Id| {
            list.contains(&id)
                || snapshot
                    .ancestors(id)
                    .iter()
                    .any(|ancestor| list.contains(ancestor))
        };

        let elements: IndexSet<Id> = snapshot
            .elements()
            .map(|element| element.id())
            .filter(|id| {
                options
                    .include
                    .as_deref()
                    .is_none_or(|include| listed(include, *id))
            })
            .filter(|id| !listed(&options.exclude, *id))
            .collect();

        let relationships = snapshot
            .relationships()
            .filter(|relationship| !options.exclude.contains(&relationship.id()))
            .filter(|relationship| {
                let explicit = options
                    .include
                    .as_deref()
                    .is_some_and(|include| include.contains(&relationship.id()));
                explicit
                    || (elements.contains(&relationship.source().element)
                        && elements.contains(&relationship.target().element))
            })
            .map(|relationship| relationship.id())
            .collect();

        Self {
            elements,
            relationships,
        }
    }
}
