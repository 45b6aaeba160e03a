//! Account records and the three settings forms built on them.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::form::FormValues;
use crate::validation::{Constraint, FieldRule, FormField};
use crate::MIN_PASSWORD_LENGTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    #[default]
    Client,
    ProductOwner,
    Developer,
    Admin,
    #[serde(other)]
    Unknown,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::ProductOwner => "productOwner",
            Self::Developer => "developer",
            Self::Admin => "admin",
            Self::Unknown => "unknown",
        }
    }

    /// Only clients may delete their own account from the settings page.
    #[must_use]
    pub const fn can_delete_account(self) -> bool {
        matches!(self, Self::Client)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Phone {
    pub prefix: String,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Address {
    pub place: String,
    pub city: String,
    pub zip: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub phone: Phone,
    pub address: Address,
}

// --- General info ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GeneralField {
    FirstName,
    LastName,
    Prefix,
    Number,
    Place,
    City,
    Country,
    Zip,
}

impl FormField for GeneralField {
    fn all() -> &'static [Self] {
        &[
            Self::FirstName,
            Self::LastName,
            Self::Prefix,
            Self::Number,
            Self::Place,
            Self::City,
            Self::Country,
            Self::Zip,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Prefix => "prefix",
            Self::Number => "number",
            Self::Place => "place",
            Self::City => "city",
            Self::Country => "country",
            Self::Zip => "zip",
        }
    }
}

const GENERAL_RULES: &[FieldRule<GeneralField>] = &[
    FieldRule {
        field: GeneralField::FirstName,
        constraints: &[Constraint::Required("First Name is required")],
    },
    FieldRule {
        field: GeneralField::LastName,
        constraints: &[Constraint::Required("Last Name is required")],
    },
    FieldRule {
        field: GeneralField::Prefix,
        constraints: &[Constraint::Required("Prefix is required")],
    },
    FieldRule {
        field: GeneralField::Number,
        constraints: &[
            Constraint::Required("Phone is required"),
            Constraint::Numeric("Phone must be a number"),
        ],
    },
    FieldRule {
        field: GeneralField::Place,
        constraints: &[Constraint::Required("Address is required")],
    },
    FieldRule {
        field: GeneralField::City,
        constraints: &[Constraint::Required("City is required")],
    },
    FieldRule {
        field: GeneralField::Country,
        constraints: &[Constraint::Required("Country is required")],
    },
    FieldRule {
        field: GeneralField::Zip,
        constraints: &[
            Constraint::Required("Zip is required"),
            Constraint::Numeric("Zip must be a number"),
        ],
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneralInfoValues {
    pub first_name: String,
    pub last_name: String,
    pub prefix: String,
    pub number: String,
    pub place: String,
    pub city: String,
    pub zip: String,
    pub country: String,
}

impl GeneralInfoValues {
    #[must_use]
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            prefix: profile.phone.prefix.clone(),
            number: profile.phone.number.clone(),
            place: profile.address.place.clone(),
            city: profile.address.city.clone(),
            zip: profile.address.zip.clone(),
            country: profile.address.country.clone(),
        }
    }

    /// Builds the full record to write back, keeping identity fields from `current`.
    #[must_use]
    pub fn to_profile(&self, current: &UserProfile) -> UserProfile {
        UserProfile {
            id: current.id.clone(),
            email: current.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: current.role,
            phone: Phone {
                prefix: self.prefix.clone(),
                number: self.number.clone(),
            },
            address: Address {
                place: self.place.clone(),
                city: self.city.clone(),
                zip: self.zip.clone(),
                country: self.country.clone(),
            },
        }
    }
}

impl FormValues for GeneralInfoValues {
    type Field = GeneralField;

    fn rules() -> &'static [FieldRule<GeneralField>] {
        GENERAL_RULES
    }

    fn value(&self, field: GeneralField) -> &str {
        match field {
            GeneralField::FirstName => &self.first_name,
            GeneralField::LastName => &self.last_name,
            GeneralField::Prefix => &self.prefix,
            GeneralField::Number => &self.number,
            GeneralField::Place => &self.place,
            GeneralField::City => &self.city,
            GeneralField::Country => &self.country,
            GeneralField::Zip => &self.zip,
        }
    }

    fn set_value(&mut self, field: GeneralField, value: String) {
        let slot = match field {
            GeneralField::FirstName => &mut self.first_name,
            GeneralField::LastName => &mut self.last_name,
            GeneralField::Prefix => &mut self.prefix,
            GeneralField::Number => &mut self.number,
            GeneralField::Place => &mut self.place,
            GeneralField::City => &mut self.city,
            GeneralField::Country => &mut self.country,
            GeneralField::Zip => &mut self.zip,
        };
        *slot = value;
    }
}

// --- Security ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecurityField {
    OldPassword,
    NewPassword,
    ConfirmNewPassword,
}

impl FormField for SecurityField {
    fn all() -> &'static [Self] {
        &[Self::OldPassword, Self::NewPassword, Self::ConfirmNewPassword]
    }

    fn name(self) -> &'static str {
        match self {
            Self::OldPassword => "oldPassword",
            Self::NewPassword => "newPassword",
            Self::ConfirmNewPassword => "confirmNewPassword",
        }
    }
}

const SECURITY_RULES: &[FieldRule<SecurityField>] = &[
    FieldRule {
        field: SecurityField::OldPassword,
        constraints: &[
            Constraint::Required("Old password is required"),
            Constraint::MinLength(MIN_PASSWORD_LENGTH, "Old password is 6 characters minimum"),
        ],
    },
    FieldRule {
        field: SecurityField::NewPassword,
        constraints: &[
            Constraint::Required("New password is required"),
            Constraint::NotEqualTo(
                SecurityField::OldPassword,
                "New password should not be old password",
            ),
            Constraint::MinLength(MIN_PASSWORD_LENGTH, "New password is 6 characters minimum"),
        ],
    },
    FieldRule {
        field: SecurityField::ConfirmNewPassword,
        constraints: &[
            Constraint::Required("Confirm new password is required"),
            Constraint::EqualTo(
                SecurityField::NewPassword,
                "Confirm new password doesn't match with new password",
            ),
        ],
    },
];

/// Password change request. Never persisted; wiped on drop.
#[derive(Clone, PartialEq, Eq, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecurityValues {
    pub old_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

impl fmt::Debug for SecurityValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityValues")
            .field("old_password", &"[REDACTED]")
            .field("new_password", &"[REDACTED]")
            .field("confirm_new_password", &"[REDACTED]")
            .finish()
    }
}

impl FormValues for SecurityValues {
    type Field = SecurityField;

    fn rules() -> &'static [FieldRule<SecurityField>] {
        SECURITY_RULES
    }

    fn value(&self, field: SecurityField) -> &str {
        match field {
            SecurityField::OldPassword => &self.old_password,
            SecurityField::NewPassword => &self.new_password,
            SecurityField::ConfirmNewPassword => &self.confirm_new_password,
        }
    }

    fn set_value(&mut self, field: SecurityField, value: String) {
        let slot = match field {
            SecurityField::OldPassword => &mut self.old_password,
            SecurityField::NewPassword => &mut self.new_password,
            SecurityField::ConfirmNewPassword => &mut self.confirm_new_password,
        };
        slot.zeroize();
        *slot = value;
    }
}

// --- Account deletion ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeleteAccountField {
    Password,
}

impl FormField for DeleteAccountField {
    fn all() -> &'static [Self] {
        &[Self::Password]
    }

    fn name(self) -> &'static str {
        "password"
    }
}

const DELETE_ACCOUNT_RULES: &[FieldRule<DeleteAccountField>] = &[FieldRule {
    field: DeleteAccountField::Password,
    constraints: &[
        Constraint::Required("Password is required"),
        Constraint::MinLength(MIN_PASSWORD_LENGTH, "Password is 6 characters minimum"),
    ],
}];

#[derive(Clone, PartialEq, Eq, Default, Zeroize, ZeroizeOnDrop)]
pub struct DeleteAccountValues {
    pub password: String,
}

impl fmt::Debug for DeleteAccountValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeleteAccountValues")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl FormValues for DeleteAccountValues {
    type Field = DeleteAccountField;

    fn rules() -> &'static [FieldRule<DeleteAccountField>] {
        DELETE_ACCOUNT_RULES
    }

    fn value(&self, _field: DeleteAccountField) -> &str {
        &self.password
    }

    fn set_value(&mut self, _field: DeleteAccountField, value: String) {
        self.password.zeroize();
        self.password = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{validate_all, validate_field};
    use proptest::prelude::*;

    pub(crate) fn sample_profile() -> UserProfile {
        UserProfile {
            id: "u-1".into(),
            email: "jane@example.com".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            role: Role::Client,
            phone: Phone {
                prefix: "1".into(),
                number: "5551234".into(),
            },
            address: Address {
                place: "1 Main St".into(),
                city: "Springfield".into(),
                zip: "62704".into(),
                country: "US".into(),
            },
        }
    }

    mod record_tests {
        use super::*;

        #[test]
        fn profile_uses_camel_case_on_the_wire() {
            let json = serde_json::to_value(sample_profile()).unwrap();
            assert_eq!(json["firstName"], "Jane");
            assert_eq!(json["lastName"], "Doe");
            assert_eq!(json["role"], "client");
            assert_eq!(json["phone"]["prefix"], "1");
            assert_eq!(json["address"]["zip"], "62704");
        }

        #[test]
        fn unknown_role_decodes_without_failing() {
            let role: Role = serde_json::from_str("\"superuser\"").unwrap();
            assert_eq!(role, Role::Unknown);
            let role: Role = serde_json::from_str("\"productOwner\"").unwrap();
            assert_eq!(role, Role::ProductOwner);
        }

        #[test]
        fn general_values_round_trip_through_profile() {
            let profile = sample_profile();
            let values = GeneralInfoValues::from_profile(&profile);
            assert_eq!(values.to_profile(&profile), profile);
        }

        #[test]
        fn to_profile_keeps_identity_from_current_record() {
            let profile = sample_profile();
            let mut values = GeneralInfoValues::from_profile(&profile);
            values.city = "Shelbyville".into();
            let updated = values.to_profile(&profile);
            assert_eq!(updated.id, "u-1");
            assert_eq!(updated.email, "jane@example.com");
            assert_eq!(updated.address.city, "Shelbyville");
        }

        #[test]
        fn passwords_are_redacted_in_debug() {
            let values = SecurityValues {
                old_password: "hunter22".into(),
                new_password: "hunter23".into(),
                confirm_new_password: "hunter23".into(),
            };
            let rendered = format!("{values:?}");
            assert!(!rendered.contains("hunter"));

            let delete = DeleteAccountValues {
                password: "hunter22".into(),
            };
            assert!(!format!("{delete:?}").contains("hunter"));
        }
    }

    mod rule_tests {
        use super::*;

        #[test]
        fn empty_first_name_is_the_only_error() {
            let mut values = GeneralInfoValues::from_profile(&sample_profile());
            values.first_name = String::new();
            let errors = validate_all(&values);
            assert_eq!(errors.len(), 1);
            assert_eq!(
                errors.get(&GeneralField::FirstName).map(String::as_str),
                Some("First Name is required")
            );
        }

        #[test]
        fn phone_and_zip_must_be_numeric() {
            let mut values = GeneralInfoValues::from_profile(&sample_profile());
            values.number = "555-ABCD".into();
            values.zip = "SW1A".into();
            assert_eq!(
                validate_field(&values, GeneralField::Number),
                Some("Phone must be a number")
            );
            assert_eq!(
                validate_field(&values, GeneralField::Zip),
                Some("Zip must be a number")
            );
        }

        #[test]
        fn empty_numeric_fields_report_required_first() {
            let mut values = GeneralInfoValues::from_profile(&sample_profile());
            values.number = String::new();
            values.zip = "  ".into();
            assert_eq!(
                validate_field(&values, GeneralField::Number),
                Some("Phone is required")
            );
            assert_eq!(
                validate_field(&values, GeneralField::Zip),
                Some("Zip must be a number")
            );
        }

        #[test]
        fn whitespace_passes_required_and_is_ignored_by_numeric() {
            let mut values = GeneralInfoValues::from_profile(&sample_profile());
            values.first_name = "   ".into();
            values.number = "555 1234".into();
            assert_eq!(validate_field(&values, GeneralField::FirstName), None);
            assert_eq!(validate_field(&values, GeneralField::Number), None);
        }

        #[test]
        fn reused_password_is_rejected() {
            let values = SecurityValues {
                old_password: "secret1".into(),
                new_password: "secret1".into(),
                confirm_new_password: "secret1".into(),
            };
            let errors = validate_all(&values);
            assert_eq!(errors.len(), 1);
            assert_eq!(
                errors.get(&SecurityField::NewPassword).map(String::as_str),
                Some("New password should not be old password")
            );
        }

        #[test]
        fn short_delete_password_is_rejected() {
            let values = DeleteAccountValues {
                password: "12345".into(),
            };
            assert_eq!(
                validate_field(&values, DeleteAccountField::Password),
                Some("Password is 6 characters minimum")
            );
        }
    }

    fn required_message(field: GeneralField) -> &'static str {
        match field {
            GeneralField::FirstName => "First Name is required",
            GeneralField::LastName => "Last Name is required",
            GeneralField::Prefix => "Prefix is required",
            GeneralField::Number => "Phone is required",
            GeneralField::Place => "Address is required",
            GeneralField::City => "City is required",
            GeneralField::Country => "Country is required",
            GeneralField::Zip => "Zip is required",
        }
    }

    proptest! {
        #[test]
        fn empty_required_field_always_errors(
            idx in 0usize..8,
            other in "[a-zA-Z0-9 ]{0,12}",
        ) {
            let field = GeneralField::all()[idx];
            let mut values = GeneralInfoValues::default();
            for f in GeneralField::all() {
                values.set_value(*f, other.clone());
            }
            values.set_value(field, String::new());
            prop_assert_eq!(validate_field(&values, field), Some(required_message(field)));
        }

        #[test]
        fn new_password_equal_to_old_always_errors(pw in "[a-zA-Z0-9]{6,20}") {
            let values = SecurityValues {
                old_password: pw.clone(),
                new_password: pw.clone(),
                confirm_new_password: pw,
            };
            prop_assert_eq!(
                validate_field(&values, SecurityField::NewPassword),
                Some("New password should not be old password")
            );
        }

        #[test]
        fn confirm_errors_iff_it_differs(new in "[a-z0-9]{1,12}", confirm in "[a-z0-9]{1,12}") {
            let values = SecurityValues {
                old_password: "irrelevant".into(),
                new_password: new.clone(),
                confirm_new_password: confirm.clone(),
            };
            let error = validate_field(&values, SecurityField::ConfirmNewPassword);
            if new == confirm {
                prop_assert_eq!(error, None);
            } else {
                prop_assert_eq!(
                    error,
                    Some("Confirm new password doesn't match with new password")
                );
            }
        }
    }
}
