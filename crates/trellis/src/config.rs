//! Configuration types for Trellis.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! a partial configuration file only overrides what it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration root.
//! - [`LayoutConfig`] - Container margin, creation size and routing margin.
//! - [`InteractionConfig`] - Pointer gesture tuning.
//! - [`StyleConfig`] - Colors and label font.
//!
//! # Example
//!
//! ```
//! # use trellis::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().container_margin(), 10.0);
//! assert_eq!(config.interaction().drag_threshold(), 5.0);
//! assert!(config.style().background_color().unwrap().is_none());
//! ```

use serde::Deserialize;

use trellis_core::{
    color::Color,
    element::{DEFAULT_HEIGHT, DEFAULT_WIDTH},
    layout::DEFAULT_CONTAINER_MARGIN,
    routing::DEFAULT_ROUTING_MARGIN,
    text::TextDefinition,
};

use crate::error::TrellisError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    interaction: InteractionConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(layout: LayoutConfig, interaction: InteractionConfig, style: StyleConfig) -> Self {
        Self {
            layout,
            interaction,
            style,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn interaction(&self) -> &InteractionConfig {
        &self.interaction
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Geometry settings used by the layout engine and the router.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Space kept between a container border and its children.
    container_margin: f32,
    default_width: f32,
    default_height: f32,
    /// Distance a relationship path steps away from an element before bending.
    routing_margin: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            container_margin: DEFAULT_CONTAINER_MARGIN,
            default_width: DEFAULT_WIDTH,
            default_height: DEFAULT_HEIGHT,
            routing_margin: DEFAULT_ROUTING_MARGIN,
        }
    }
}

impl LayoutConfig {
    pub fn container_margin(&self) -> f32 {
        self.container_margin
    }

    pub fn default_width(&self) -> f32 {
        self.default_width
    }

    pub fn default_height(&self) -> f32 {
        self.default_height
    }

    pub fn routing_margin(&self) -> f32 {
        self.routing_margin
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Pointer travel, in diagram units, below which a press is a click and not a drag.
    drag_threshold: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 5.0,
        }
    }
}

impl InteractionConfig {
    pub fn drag_threshold(&self) -> f32 {
        self.drag_threshold
    }
}

/// Visual styling configuration.
///
/// Colors are kept as strings and parsed on access so that a bad value is
/// reported where it is used.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: Option<String>,
    selection_color: String,
    font_family: String,
    font_size: u16,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            selection_color: "#1e90ff".to_string(),
            font_family: "Arial".to_string(),
            font_size: 15,
        }
    }
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Config`] if the configured string is not a valid color.
    pub fn background_color(&self) -> Result<Option<Color>, TrellisError> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| TrellisError::Config(format!("Invalid background color: {err}")))
    }

    /// Returns the parsed highlight [`Color`] for selected entities.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Config`] if the configured string is not a valid color.
    pub fn selection_color(&self) -> Result<Color, TrellisError> {
        Color::new(&self.selection_color)
            .map_err(|err| TrellisError::Config(format!("Invalid selection color: {err}")))
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    /// Label font derived from this style.
    pub fn text_definition(&self) -> TextDefinition {
        TextDefinition::new(&self.font_family, self.font_size)
    }
}
