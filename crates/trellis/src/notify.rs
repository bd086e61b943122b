//! Selection and assessment change notification.
//!
//! Every committed operation produces a new snapshot, so identity says
//! nothing about what changed. The notifier keeps the last emitted
//! projections and calls subscribers only when the new projection differs by
//! value.

use std::fmt;

use log::trace;

use crate::{
    model::{Assessment, Selection},
    snapshot::Snapshot,
};

/// Handle returned by the subscribe methods.
///
/// A handle stays valid until it is unsubscribed, regardless of other
/// subscriptions being removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type SelectionCallback = Box<dyn FnMut(&Selection)>;
type AssessmentCallback = Box<dyn FnMut(&[Assessment])>;

/// Ordered list of subscribers with stable slot indices.
struct Subscribers<F> {
    slots: Vec<Option<F>>,
}

impl<F> Default for Subscribers<F> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<F> Subscribers<F> {
    fn insert(&mut self, callback: F) -> SubscriptionId {
        self.slots.push(Some(callback));
        SubscriptionId(self.slots.len() - 1)
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        self.slots
            .get_mut(id.0)
            .and_then(Option::take)
            .is_some()
    }

    fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut F> {
        self.slots.iter_mut().flatten()
    }
}

#[derive(Default)]
pub struct ChangeNotifier {
    selection: Selection,
    assessments: Vec<Assessment>,
    selection_subscribers: Subscribers<SelectionCallback>,
    assessment_subscribers: Subscribers<AssessmentCallback>,
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("selection", &self.selection)
            .field("assessments", &self.assessments)
            .field("selection_subscribers", &self.selection_subscribers.len())
            .field("assessment_subscribers", &self.assessment_subscribers.len())
            .finish()
    }
}

impl ChangeNotifier {
    /// Creates a notifier whose baseline is `snapshot`.
    ///
    /// Nothing is emitted for the baseline itself.
    pub fn new(snapshot: &Snapshot) -> Self {
        Self {
            selection: snapshot.selection(),
            assessments: snapshot.assessments(),
            ..Self::default()
        }
    }

    pub fn subscribe_to_selection_change(
        &mut self,
        callback: impl FnMut(&Selection) + 'static,
    ) -> SubscriptionId {
        self.selection_subscribers.insert(Box::new(callback))
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe_from_selection_change(&mut self, id: SubscriptionId) -> bool {
        self.selection_subscribers.remove(id)
    }

    pub fn subscribe_to_assessment_change(
        &mut self,
        callback: impl FnMut(&[Assessment]) + 'static,
    ) -> SubscriptionId {
        self.assessment_subscribers.insert(Box::new(callback))
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe_from_assessment_change(&mut self, id: SubscriptionId) -> bool {
        self.assessment_subscribers.remove(id)
    }

    /// Compares `snapshot` with the last emitted projections and calls the
    /// subscribers of whichever changed.
    pub fn notify(&mut self, snapshot: &Snapshot) {
        let selection = snapshot.selection();
        if selection != self.selection {
            trace!(
                elements = selection.elements.len(),
                relationships = selection.relationships.len();
                "Selection changed"
            );
            for callback in self.selection_subscribers.iter_mut() {
                callback(&selection);
            }
            self.selection = selection;
        }

        let assessments = snapshot.assessments();
        if assessments != self.assessments {
            trace!(count = assessments.len(); "Assessments changed");
            for callback in self.assessment_subscribers.iter_mut() {
                callback(&assessments);
            }
            self.assessments = assessments;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use trellis_core::{element::ElementKind, geometry::Point};

    use super::*;
    use crate::{
        model::DiagramType,
        repository::{NewElement, Repository},
    };

    fn setup() -> (Repository, ChangeNotifier) {
        let repo = Repository::new(DiagramType::ClassDiagram);
        let notifier = ChangeNotifier::new(&repo.snapshot());
        (repo, notifier)
    }

    #[test]
    fn test_selection_emitted_once_per_change() {
        let (mut repo, mut notifier) = setup();
        let a = repo.add_element(NewElement::new(ElementKind::Class)).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        notifier.subscribe_to_selection_change(move |selection| {
            sink.borrow_mut().push(selection.clone());
        });

        repo.select(&[a], false).unwrap();
        notifier.notify(&repo.snapshot());
        repo.move_by(None, Point::new(10.0, 0.0)).unwrap();
        notifier.notify(&repo.snapshot());
        repo.select(&[a], false).unwrap();
        notifier.notify(&repo.snapshot());

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].elements.contains(&a));
    }

    #[test]
    fn test_assessment_changes() {
        let (mut repo, mut notifier) = setup();
        let a = repo.add_element(NewElement::new(ElementKind::Class)).unwrap();

        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        notifier.subscribe_to_assessment_change(move |list| {
            assert!(list.len() <= 1);
            *sink.borrow_mut() += 1;
        });

        repo.assess(a, 1.0, None).unwrap();
        notifier.notify(&repo.snapshot());
        repo.assess(a, 1.0, None).unwrap();
        notifier.notify(&repo.snapshot());
        repo.assess(a, 2.0, Some("better".to_string())).unwrap();
        notifier.notify(&repo.snapshot());

        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_subscription_ids_survive_other_unsubscribes() {
        let (mut repo, mut notifier) = setup();
        let a = repo.add_element(NewElement::new(ElementKind::Class)).unwrap();

        let hits = Rc::new(RefCell::new(Vec::new()));
        let first_sink = Rc::clone(&hits);
        let first =
            notifier.subscribe_to_selection_change(move |_| first_sink.borrow_mut().push(1));
        let second_sink = Rc::clone(&hits);
        let second =
            notifier.subscribe_to_selection_change(move |_| second_sink.borrow_mut().push(2));

        assert!(notifier.unsubscribe_from_selection_change(first));
        assert!(!notifier.unsubscribe_from_selection_change(first));

        repo.select(&[a], false).unwrap();
        notifier.notify(&repo.snapshot());
        assert_eq!(*hits.borrow(), vec![2]);

        assert!(notifier.unsubscribe_from_selection_change(second));
    }
}
