//! Pointer interaction adapters.
//!
//! These translate raw pointer events into repository operations. They hold
//! no timers: the host calls [`DragGesture::arm`] once per press, after its
//! own selection handling for that event has run.
//!
//! ```text
//! Idle ──pointer_down──▶ Pending ──arm (element selected)──▶ Armed
//!                                                            │ pointer_move beyond threshold
//!                                                            ▼
//!                                                          Moving ──pointer_move──▶ move(None, Δ)
//! any state ──pointer_up──▶ Idle
//! ```

use log::{debug, trace};

use trellis_core::{coordinate::CoordinateSystem, geometry::Point, identifier::Id};

use crate::{config::InteractionConfig, error::Rejection, repository::Repository};

/// Pointer button of a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Pending {
        element: Id,
        pointer: Point,
    },
    Armed {
        element: Id,
        /// Pointer position relative to the element's canvas origin.
        grab_offset: Point,
        moving: bool,
    },
}

/// Click-versus-drag state machine for moving selected elements.
#[derive(Debug, Clone)]
pub struct DragGesture {
    threshold: f32,
    state: DragState,
}

impl Default for DragGesture {
    fn default() -> Self {
        Self::from_config(&InteractionConfig::default())
    }
}

impl DragGesture {
    /// `threshold` is the distance, in diagram units and per axis, the element
    /// must travel before a press turns into a drag.
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            state: DragState::Idle,
        }
    }

    pub fn from_config(config: &InteractionConfig) -> Self {
        Self::new(config.drag_threshold())
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Element being dragged, once armed.
    pub fn element(&self) -> Option<Id> {
        match self.state {
            DragState::Armed { element, .. } => Some(element),
            DragState::Idle | DragState::Pending { .. } => None,
        }
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.state, DragState::Armed { moving: true, .. })
    }

    /// Records a press on `element` at screen position `pointer`.
    ///
    /// Only the primary button can start a drag.
    pub fn pointer_down(&mut self, element: Id, pointer: Point, button: PointerButton) {
        self.state = match button {
            PointerButton::Primary => DragState::Pending { element, pointer },
            PointerButton::Secondary | PointerButton::Auxiliary => DragState::Idle,
        };
    }

    /// Arms a pending press if its element is selected.
    ///
    /// A press on an unselected element only selects it; the next press
    /// can drag. Returns whether the gesture is now armed.
    pub fn arm(&mut self, repo: &Repository, coordinates: &CoordinateSystem) -> bool {
        let DragState::Pending { element, pointer } = self.state else {
            return false;
        };

        let selected = repo.element(element).is_some_and(|e| e.is_selected());
        let origin = repo.snapshot().absolute_origin(element);
        let (true, Some(origin)) = (selected, origin) else {
            trace!(element_id:% = element; "Press on unselected element, drag not armed");
            self.state = DragState::Idle;
            return false;
        };

        let grab_offset = coordinates.screen_to_diagram(pointer).sub_point(origin);
        self.state = DragState::Armed {
            element,
            grab_offset,
            moving: false,
        };
        true
    }

    /// Feeds a pointer position in screen pixels.
    ///
    /// Returns `Ok(true)` if the selection was moved. A rejected move ends
    /// the gesture and is returned to the caller.
    pub fn pointer_move(
        &mut self,
        repo: &mut Repository,
        coordinates: &CoordinateSystem,
        pointer: Point,
    ) -> Result<bool, Rejection> {
        let DragState::Armed {
            element,
            grab_offset,
            moving,
        } = self.state
        else {
            return Ok(false);
        };

        let Some(origin) = repo.snapshot().absolute_origin(element) else {
            // Deleted while dragging.
            self.state = DragState::Idle;
            return Ok(false);
        };

        let target = coordinates.screen_to_diagram(pointer).sub_point(grab_offset);
        let delta = target.sub_point(origin);

        if !moving {
            let travel = delta.abs();
            if travel.x() <= self.threshold && travel.y() <= self.threshold {
                return Ok(false);
            }
            debug!(element_id:% = element; "Drag started");
        }
        self.state = DragState::Armed {
            element,
            grab_offset,
            moving: true,
        };

        if delta.is_zero() {
            return Ok(false);
        }
        match repo.move_by(None, delta) {
            Ok(()) => Ok(true),
            Err(rejection) => {
                self.state = DragState::Idle;
                Err(rejection)
            }
        }
    }

    /// Ends the gesture. Returns whether it was a drag rather than a click.
    pub fn pointer_up(&mut self) -> bool {
        let was_moving = self.is_moving();
        self.state = DragState::Idle;
        was_moving
    }
}

/// Forwards pointer enter and leave to the repository, keeping at most one
/// element hovered through this tracker.
#[derive(Debug, Clone, Default)]
pub struct HoverTracker {
    current: Option<Id>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Id> {
        self.current
    }

    pub fn enter(&mut self, repo: &mut Repository, id: Id) -> Result<(), Rejection> {
        if self.current == Some(id) {
            return Ok(());
        }
        if let Some(previous) = self.current.take() {
            repo.leave(previous)?;
        }
        repo.hover(id)?;
        self.current = Some(id);
        Ok(())
    }

    pub fn leave(&mut self, repo: &mut Repository, id: Id) -> Result<(), Rejection> {
        if self.current == Some(id) {
            self.current = None;
        }
        repo.leave(id)
    }
}
