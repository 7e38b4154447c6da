//src/selection.rs
use crate::parsed::{ExerciseToAdd, SetToLog};
use log::debug;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Index {index} is out of range for a list of {len} item(s).")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A list of proposed items plus the indices the user currently has ticked.
/// Every item starts out selected.
#[derive(Debug, Clone, PartialEq)]
pub struct SetSelectionModel<T> {
    items: Vec<T>,
    selected: BTreeSet<usize>,
}

impl<T> SetSelectionModel<T> {
    pub fn new(items: Vec<T>) -> Self {
        let selected = (0..items.len()).collect();
        Self { items, selected }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn all_selected(&self) -> bool {
        self.selected.len() == self.items.len()
    }

    /// # Errors
    /// Returns `Error::IndexOutOfRange` if `index` is not a position in the list.
    pub fn is_selected(&self, index: usize) -> Result<bool, Error> {
        self.check_index(index)?;
        Ok(self.selected.contains(&index))
    }

    /// Selected indices in ascending order.
    pub fn selected_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    /// # Errors
    /// Returns `Error::IndexOutOfRange` if `index` is not a position in the list.
    pub fn toggle(&mut self, index: usize) -> Result<(), Error> {
        self.check_index(index)?;
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
        debug!("Toggled item {index}, {} selected", self.selected.len());
        Ok(())
    }

    /// Clears the selection when everything is ticked, otherwise ticks everything.
    pub fn toggle_all(&mut self) {
        if self.all_selected() {
            self.selected.clear();
        } else {
            self.selected = (0..self.items.len()).collect();
        }
    }

    /// Swaps in an edited item. The selection is left as it was.
    /// # Errors
    /// Returns `Error::IndexOutOfRange` if `index` is not a position in the list.
    pub fn replace(&mut self, index: usize, item: T) -> Result<(), Error> {
        self.check_index(index)?;
        self.items[index] = item;
        Ok(())
    }

    /// Consumes the model, keeping only the selected items in list order.
    pub fn into_selected(self) -> Vec<T> {
        let Self { items, selected } = self;
        items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| selected.contains(&i).then_some(item))
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<(), Error> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }
}

/// Label for the confirm button, built only from the selected counts.
pub fn confirm_label_for(selected_sets: usize, selected_exercises: usize) -> String {
    let mut parts = Vec::with_capacity(2);
    if selected_sets > 0 {
        parts.push(format!("Log {}", pluralize(selected_sets, "set", "sets")));
    }
    if selected_exercises > 0 {
        parts.push(format!(
            "Add {}",
            pluralize(selected_exercises, "exercise", "exercises")
        ));
    }
    if parts.is_empty() {
        "Select items".to_string()
    } else {
        parts.join(" & ")
    }
}

fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// What the user chose when closing the confirmation sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfirmationResult {
    pub sets: Vec<SetToLog>,
    pub exercises: Vec<ExerciseToAdd>,
}

/// Selection state for one open confirmation sheet: sets to log and exercises to add.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationSheet {
    pub sets: SetSelectionModel<SetToLog>,
    pub exercises: SetSelectionModel<ExerciseToAdd>,
}

impl ConfirmationSheet {
    pub fn open(sets: Vec<SetToLog>, exercises: Vec<ExerciseToAdd>) -> Self {
        debug!(
            "Opening confirmation sheet with {} set(s) and {} exercise(s)",
            sets.len(),
            exercises.len()
        );
        Self {
            sets: SetSelectionModel::new(sets),
            exercises: SetSelectionModel::new(exercises),
        }
    }

    pub fn total_selected(&self) -> usize {
        self.sets.selected_count() + self.exercises.selected_count()
    }

    pub fn confirm_label(&self) -> String {
        confirm_label_for(self.sets.selected_count(), self.exercises.selected_count())
    }

    pub fn is_confirm_enabled(&self) -> bool {
        self.total_selected() > 0
    }

    /// Closes the sheet with the selected items. With nothing selected the sheet is
    /// handed back unchanged.
    /// # Errors
    /// Returns `Err(self)` when the confirm button would be disabled.
    pub fn confirm(self) -> Result<ConfirmationResult, Self> {
        if !self.is_confirm_enabled() {
            return Err(self);
        }
        Ok(ConfirmationResult {
            sets: self.sets.into_selected(),
            exercises: self.exercises.into_selected(),
        })
    }

    pub fn cancel(self) {
        debug!("Confirmation sheet dismissed without changes");
    }
}
