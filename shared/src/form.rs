use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::validation::{self, FieldRule, FormField};

/// A value snapshot for one form, addressable field by field.
pub trait FormValues: Clone + Default {
    type Field: FormField;

    fn rules() -> &'static [FieldRule<Self::Field>];

    fn value(&self, field: Self::Field) -> &str;

    fn set_value(&mut self, field: Self::Field, value: String);
}

/// Identifies one dispatched submission. Completions carrying an older
/// ticket than the form's current one are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionTicket(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<V: FormValues> {
    Dispatched {
        values: V,
        ticket: SubmissionTicket,
    },
    Invalid {
        errors: BTreeMap<V::Field, String>,
    },
    AlreadySubmitting,
}

/// Values, errors and touched flags for one logical form.
///
/// Errors are always kept in sync with the values; they only become visible
/// once the field is touched.
#[derive(Debug, Clone)]
pub struct FormState<V: FormValues> {
    values: V,
    errors: BTreeMap<V::Field, String>,
    touched: BTreeSet<V::Field>,
    in_flight: Option<SubmissionTicket>,
    generation: u64,
}

impl<V: FormValues> Default for FormState<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V: FormValues> FormState<V> {
    #[must_use]
    pub fn new(values: V) -> Self {
        let errors = validation::validate_all(&values);
        Self {
            values,
            errors,
            touched: BTreeSet::new(),
            in_flight: None,
            generation: 0,
        }
    }

    #[must_use]
    pub fn values(&self) -> &V {
        &self.values
    }

    #[must_use]
    pub fn errors(&self) -> &BTreeMap<V::Field, String> {
        &self.errors
    }

    #[must_use]
    pub fn error(&self, field: V::Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn visible_error(&self, field: V::Field) -> Option<&str> {
        if self.is_touched(field) {
            self.error(field)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_touched(&self, field: V::Field) -> bool {
        self.touched.contains(&field)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.is_valid() && !self.is_submitting()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_field(&mut self, field: V::Field, value: String) {
        self.values.set_value(field, value);
        self.revalidate(field);
        for dependent in validation::dependents_of::<V>(field) {
            self.revalidate(dependent);
        }
    }

    pub fn set_touched(&mut self, field: V::Field) {
        self.touched.insert(field);
    }

    /// Validates every field and, if all pass, hands out a snapshot plus the
    /// ticket its completion must echo back.
    pub fn submit(&mut self) -> SubmitOutcome<V> {
        self.touched.extend(V::Field::all().iter().copied());

        if self.in_flight.is_some() {
            return SubmitOutcome::AlreadySubmitting;
        }

        self.errors = validation::validate_all(&self.values);
        if !self.errors.is_empty() {
            return SubmitOutcome::Invalid {
                errors: self.errors.clone(),
            };
        }

        self.generation += 1;
        let ticket = SubmissionTicket(self.generation);
        self.in_flight = Some(ticket);

        SubmitOutcome::Dispatched {
            values: self.values.clone(),
            ticket,
        }
    }

    /// Ends the in-flight submission if `ticket` is still the current one.
    /// Returns `false` for stale completions, which must then be discarded.
    pub fn complete(&mut self, ticket: SubmissionTicket) -> bool {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Replaces the snapshot. Pending submissions become stale.
    pub fn reset(&mut self, values: V) {
        self.clear_values(values);
        self.in_flight = None;
        self.generation += 1;
    }

    /// Replaces the snapshot but leaves any in-flight submission current, so
    /// its completion is still accepted.
    pub fn clear_values(&mut self, values: V) {
        self.errors = validation::validate_all(&values);
        self.values = values;
        self.touched.clear();
    }

    fn revalidate(&mut self, field: V::Field) {
        match validation::validate_field(&self.values, field) {
            Some(msg) => {
                self.errors.insert(field, msg.to_owned());
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }
}
