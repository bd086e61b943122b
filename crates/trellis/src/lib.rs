//! Trellis - an interactive diagram model.
//!
//! This library keeps a tree of typed, positioned elements connected by
//! relationships, and applies user operations (select, move, resize,
//! reparent, connect, delete, ...) to it atomically. Each operation produces
//! a new immutable [`Snapshot`]; layout and relationship routing are
//! re-derived as part of the operation so every snapshot is consistent.
//!
//! # Pipeline
//!
//! ```text
//! DiagramModel (JSON)
//!     ↓ import (validated)
//! Snapshot ──▶ Repository operations ──▶ Snapshot ──▶ ...
//!     ↓ export
//! DiagramModel (JSON) / SVG
//! ```
//!
//! Hosts usually go through an [`Editor`], which adds change notification
//! and an explicit lifecycle on top of the [`Repository`].
//!
//! # Example
//!
//! ```
//! use trellis::{NewElement, Repository, model::DiagramType};
//! use trellis::element::ElementKind;
//! use trellis::geometry::{Bounds, Point};
//!
//! let mut repo = Repository::new(DiagramType::ClassDiagram);
//! let package = repo
//!     .add_element(NewElement::new(ElementKind::Package).bounds(Bounds::new(0.0, 0.0, 200.0, 100.0)))
//!     .unwrap();
//! repo.move_by(Some(package), Point::new(30.0, 0.0)).unwrap();
//! assert_eq!(repo.element(package).unwrap().bounds().x(), 30.0);
//! ```

pub mod config;
pub mod editor;
pub mod export;
pub mod interaction;
pub mod model;
pub mod notify;
pub mod repository;
pub mod snapshot;

mod error;

pub use trellis_core::{
    color, coordinate, element, geometry, identifier, kind, layout, relationship, routing, text,
};

pub use editor::{Editor, EditorMode, EditorOptions};
pub use error::{ModelError, Rejection, TrellisError};
pub use repository::{NewElement, Repository};
pub use snapshot::Snapshot;

use log::{debug, info};

use config::AppConfig;
use export::{ExportOptions, ExportStyle, ExportedSvg};
use model::DiagramModel;

/// Parses a model from JSON, optionally re-runs layout, and renders it to SVG.
///
/// This is the batch path used by the command-line tool.
///
/// # Errors
///
/// Returns [`TrellisError::Json`] for malformed JSON, [`TrellisError::Model`]
/// for a model violating diagram invariants, [`TrellisError::Config`] for
/// invalid style colors and [`TrellisError::Export`] if rendering fails.
pub fn render_json(
    source: &str,
    config: &AppConfig,
    relayout: bool,
) -> Result<(DiagramModel, ExportedSvg), TrellisError> {
    info!(bytes = source.len(); "Reading diagram model");
    let model = DiagramModel::from_json(source)?;

    let mut repository = Repository::with_config(model.diagram_type, config);
    repository.load(Snapshot::from_model(&model)?);
    if relayout {
        repository.relayout()?;
        debug!(version = repository.version(); "Layout re-derived");
    }

    let options = ExportOptions {
        style: ExportStyle::from_config(config.style())?,
        ..ExportOptions::default()
    };
    let snapshot = repository.snapshot();
    let exported = export::export_svg(&snapshot, repository.registry(), &options)?;
    Ok((snapshot.to_model(), exported))
}
