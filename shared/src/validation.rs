//! Declarative per-field constraints.
//!
//! Every form declares a static table of [`FieldRule`]s. A rule is a list of
//! [`Constraint`]s checked in order against the field's current value and,
//! for cross-field constraints, the value of the field it references. The
//! first failing constraint is the field's error.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::form::FormValues;

/// A named input within one form.
pub trait FormField: Copy + Eq + Ord + Hash + Debug + 'static {
    /// Every field of the form, in display order.
    fn all() -> &'static [Self];

    /// Wire name used by the shell and in GraphQL variables.
    fn name(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint<F> {
    /// Non-empty. Whitespace counts as content.
    Required(&'static str),
    /// Trimmed value parses as a finite number.
    Numeric(&'static str),
    /// At least `n` characters.
    MinLength(usize, &'static str),
    /// Must equal the value of another field exactly.
    EqualTo(F, &'static str),
    /// Must differ from the value of another field.
    NotEqualTo(F, &'static str),
}

impl<F: FormField> Constraint<F> {
    /// The other field this constraint reads, if any.
    #[must_use]
    pub const fn references(&self) -> Option<F> {
        match self {
            Self::EqualTo(other, _) | Self::NotEqualTo(other, _) => Some(*other),
            Self::Required(_) | Self::Numeric(_) | Self::MinLength(..) => None,
        }
    }

    pub fn check<V>(&self, value: &str, values: &V) -> Option<&'static str>
    where
        V: FormValues<Field = F>,
    {
        let failed = match self {
            Self::Required(_) => value.is_empty(),
            Self::Numeric(_) => !is_numeric(value),
            Self::MinLength(min, _) => value.chars().count() < *min,
            Self::EqualTo(other, _) => value != values.value(*other),
            Self::NotEqualTo(other, _) => value == values.value(*other),
        };

        failed.then_some(self.message())
    }

    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Required(msg)
            | Self::Numeric(msg)
            | Self::MinLength(_, msg)
            | Self::EqualTo(_, msg)
            | Self::NotEqualTo(_, msg) => msg,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule<F: 'static> {
    pub field: F,
    pub constraints: &'static [Constraint<F>],
}

/// Whitespace anywhere is ignored, so `"555 1234"` is a number.
fn is_numeric(value: &str) -> bool {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    compact.parse::<f64>().is_ok_and(f64::is_finite)
}

fn rule_for<V: FormValues>(field: V::Field) -> Option<&'static FieldRule<V::Field>> {
    V::rules().iter().find(|rule| rule.field == field)
}

/// Runs the rule for `field` against the current snapshot.
pub fn validate_field<V: FormValues>(values: &V, field: V::Field) -> Option<&'static str> {
    let rule = rule_for::<V>(field)?;
    let value = values.value(field);
    rule.constraints
        .iter()
        .find_map(|constraint| constraint.check(value, values))
}

pub fn validate_all<V: FormValues>(values: &V) -> BTreeMap<V::Field, String> {
    V::Field::all()
        .iter()
        .filter_map(|&field| validate_field(values, field).map(|msg| (field, msg.to_owned())))
        .collect()
}

/// Fields whose rules read `field` and therefore need revalidating when it changes.
pub fn dependents_of<V: FormValues>(field: V::Field) -> Vec<V::Field> {
    V::rules()
        .iter()
        .filter(|rule| {
            rule.constraints
                .iter()
                .any(|constraint| constraint.references() == Some(field))
        })
        .map(|rule| rule.field)
        .collect()
}
