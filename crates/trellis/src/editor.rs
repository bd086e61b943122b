//! Host-facing editor handle.
//!
//! An [`Editor`] owns one [`Repository`] and one [`ChangeNotifier`]. Hosts
//! drive it through [`Editor::update`] and read it through snapshots; there
//! is no global store. After [`Editor::destroy`] every method fails with
//! [`TrellisError::Destroyed`].

use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use trellis_core::{identifier::Id, kind::KindRegistry};

use crate::{
    config::{AppConfig, InteractionConfig},
    error::TrellisError,
    export::{self, ExportOptions, ExportedSvg},
    interaction::DragGesture,
    model::{Assessment, DiagramModel, DiagramType, Selection},
    notify::{ChangeNotifier, SubscriptionId},
    repository::Repository,
    snapshot::Snapshot,
};

/// What the host uses the editor for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EditorMode {
    /// Full editing.
    #[default]
    Modelling,
    /// Display only, for rendering and export.
    Exporting,
    /// Reviewing a model: geometry is frozen, assessments can be given.
    Assessment,
}

#[derive(Debug, Clone, Default)]
pub struct EditorOptions {
    pub diagram_type: DiagramType,
    pub mode: EditorMode,
    pub readonly: bool,
    /// Whether the host should open property popups on double click.
    pub enable_popups: bool,
    /// Initial model. Its diagram type takes precedence over `diagram_type`.
    pub model: Option<DiagramModel>,
    pub config: AppConfig,
}

#[derive(Debug)]
struct EditorState {
    repository: Repository,
    notifier: ChangeNotifier,
    mode: EditorMode,
    enable_popups: bool,
    interaction: InteractionConfig,
}

#[derive(Debug)]
pub struct Editor {
    state: Option<EditorState>,
}

impl Editor {
    /// Creates an editor, importing `options.model` if present.
    ///
    /// The repository is read-only when `options.readonly` is set or the
    /// mode is not [`EditorMode::Modelling`].
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Model`] if the initial model is invalid.
    pub fn new(options: EditorOptions) -> Result<Self, TrellisError> {
        let diagram_type = options
            .model
            .as_ref()
            .map_or(options.diagram_type, |model| model.diagram_type);
        let mut repository = Repository::with_config(diagram_type, &options.config);
        if let Some(model) = &options.model {
            repository.load(Snapshot::from_model(model)?);
        }
        repository.set_readonly(options.readonly || options.mode != EditorMode::Modelling);

        let notifier = ChangeNotifier::new(&repository.snapshot());
        info!(
            diagram_type:? = diagram_type,
            mode:? = options.mode,
            readonly = repository.is_readonly();
            "Editor created"
        );

        Ok(Self {
            state: Some(EditorState {
                repository,
                notifier,
                mode: options.mode,
                enable_popups: options.enable_popups,
                interaction: options.config.interaction().clone(),
            }),
        })
    }

    fn state(&self) -> Result<&EditorState, TrellisError> {
        self.state.as_ref().ok_or(TrellisError::Destroyed)
    }

    fn state_mut(&mut self) -> Result<&mut EditorState, TrellisError> {
        self.state.as_mut().ok_or(TrellisError::Destroyed)
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.is_none()
    }

    pub fn mode(&self) -> Result<EditorMode, TrellisError> {
        Ok(self.state()?.mode)
    }

    pub fn enable_popups(&self) -> Result<bool, TrellisError> {
        Ok(self.state()?.enable_popups)
    }

    pub fn is_readonly(&self) -> Result<bool, TrellisError> {
        Ok(self.state()?.repository.is_readonly())
    }

    /// A fresh drag gesture using the configured threshold.
    pub fn drag_gesture(&self) -> Result<DragGesture, TrellisError> {
        Ok(DragGesture::from_config(&self.state()?.interaction))
    }

    pub fn repository(&self) -> Result<&Repository, TrellisError> {
        Ok(&self.state()?.repository)
    }

    pub fn snapshot(&self) -> Result<Arc<Snapshot>, TrellisError> {
        Ok(self.state()?.repository.snapshot())
    }

    /// Current diagram as a serializable model.
    pub fn model(&self) -> Result<DiagramModel, TrellisError> {
        Ok(self.state()?.repository.snapshot().to_model())
    }

    /// Replaces the diagram with `model`.
    ///
    /// Subscribers are notified if the selection or assessments differ from
    /// what they last saw.
    pub fn set_model(&mut self, model: &DiagramModel) -> Result<(), TrellisError> {
        let snapshot = Snapshot::from_model(model)?;
        let state = self.state_mut()?;
        state.repository.load(snapshot);
        state.notifier.notify(&state.repository.snapshot());
        Ok(())
    }

    /// Replaces the current selection with `selection`.
    pub fn select(&mut self, selection: &Selection) -> Result<(), TrellisError> {
        let ids: Vec<Id> = selection.ids().collect();
        self.update(|repo| repo.select(&ids, false))??;
        Ok(())
    }

    /// Runs repository operations and then notifies subscribers once.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trellis::{Editor, EditorOptions, NewElement};
    /// # use trellis_core::element::ElementKind;
    /// let mut editor = Editor::new(EditorOptions::default()).unwrap();
    /// let id = editor
    ///     .update(|repo| repo.add_element(NewElement::new(ElementKind::Class)))
    ///     .unwrap()
    ///     .unwrap();
    /// assert_eq!(editor.model().unwrap().elements[0].id, id);
    /// ```
    pub fn update<T>(
        &mut self,
        operations: impl FnOnce(&mut Repository) -> T,
    ) -> Result<T, TrellisError> {
        let state = self.state_mut()?;
        let result = operations(&mut state.repository);
        state.notifier.notify(&state.repository.snapshot());
        Ok(result)
    }

    pub fn subscribe_to_selection_change(
        &mut self,
        callback: impl FnMut(&Selection) + 'static,
    ) -> Result<SubscriptionId, TrellisError> {
        Ok(self
            .state_mut()?
            .notifier
            .subscribe_to_selection_change(callback))
    }

    pub fn unsubscribe_from_selection_change(
        &mut self,
        id: SubscriptionId,
    ) -> Result<bool, TrellisError> {
        Ok(self.state_mut()?.notifier.unsubscribe_from_selection_change(id))
    }

    pub fn subscribe_to_assessment_change(
        &mut self,
        callback: impl FnMut(&[Assessment]) + 'static,
    ) -> Result<SubscriptionId, TrellisError> {
        Ok(self
            .state_mut()?
            .notifier
            .subscribe_to_assessment_change(callback))
    }

    pub fn unsubscribe_from_assessment_change(
        &mut self,
        id: SubscriptionId,
    ) -> Result<bool, TrellisError> {
        Ok(self.state_mut()?.notifier.unsubscribe_from_assessment_change(id))
    }

    /// Renders the current diagram.
    pub fn export_svg(&self, options: &ExportOptions) -> Result<ExportedSvg, TrellisError> {
        let state = self.state()?;
        let repository = &state.repository;
        Ok(export::export_svg(
            &repository.snapshot(),
            repository.registry(),
            options,
        )?)
    }

    /// Renders `model` without creating an editor.
    pub fn export_model_as_svg(
        model: &DiagramModel,
        options: &ExportOptions,
    ) -> Result<ExportedSvg, TrellisError> {
        let snapshot = Snapshot::from_model(model)?;
        Ok(export::export_svg(&snapshot, &KindRegistry::new(), options)?)
    }

    /// Releases the repository and all subscriptions.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Destroyed`] if called twice.
    pub fn destroy(&mut self) -> Result<(), TrellisError> {
        self.state.take().ok_or(TrellisError::Destroyed)?;
        info!("Editor destroyed");
        Ok(())
    }
}
