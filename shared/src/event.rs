use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::SettingsConfig;
use crate::form::SubmissionTicket;
use crate::graphql::{CountryCode, MutationFailure};
use crate::model::SectionKey;
use crate::notification::{NotificationChannel, NotificationToken};
use crate::overlay::Rect;
use crate::profile::{GeneralField, SecurityField, UserProfile};

// --- Secret wrapper: redacts Debug, zeroizes on Drop ---

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<&str> for Secret {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    Noop,
    Configure(SettingsConfig),

    // Session & page lifecycle
    SessionStarted {
        user: UserProfile,
        token: Secret,
    },
    PageOpened,
    SectionSelected(SectionKey),
    BackRequested,

    // General info form
    GeneralFieldChanged {
        field: GeneralField,
        value: String,
    },
    GeneralFieldBlurred {
        field: GeneralField,
    },
    GeneralSubmitted,

    // Security form
    SecurityFieldChanged {
        field: SecurityField,
        value: Secret,
    },
    SecurityFieldBlurred {
        field: SecurityField,
    },
    SecuritySubmitted,

    // Account deletion
    DeleteAccountRequested,
    DeleteAccountCancelled,
    DeletePasswordChanged {
        value: Secret,
    },
    DeletePasswordBlurred,
    DeleteAccountConfirmed,

    // Section menu
    MenuAnchorEntered {
        anchor: Rect,
    },
    MenuPointerLeft,
    MenuItemActivated {
        index: usize,
    },

    // Completions
    #[serde(skip)]
    ProfileUpdated {
        ticket: SubmissionTicket,
        result: Result<UserProfile, MutationFailure>,
    },
    #[serde(skip)]
    PasswordUpdated {
        ticket: SubmissionTicket,
        result: Result<UserProfile, MutationFailure>,
    },
    #[serde(skip)]
    AccountDeleted {
        ticket: SubmissionTicket,
        result: Result<(), MutationFailure>,
    },
    #[serde(skip)]
    CountryCodesLoaded {
        result: Result<Vec<CountryCode>, MutationFailure>,
    },
    #[serde(skip)]
    NotificationExpired {
        channel: NotificationChannel,
        token: NotificationToken,
    },
    #[serde(skip)]
    TokenPersisted {
        error: Option<String>,
    },
    #[serde(skip)]
    TokenCleared {
        error: Option<String>,
    },
}

impl Event {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::Configure(_) => "configure",
            Self::SessionStarted { .. } => "session_started",
            Self::PageOpened => "page_opened",
            Self::SectionSelected(_) => "section_selected",
            Self::BackRequested => "back_requested",
            Self::GeneralFieldChanged { .. } => "general_field_changed",
            Self::GeneralFieldBlurred { .. } => "general_field_blurred",
            Self::GeneralSubmitted => "general_submitted",
            Self::SecurityFieldChanged { .. } => "security_field_changed",
            Self::SecurityFieldBlurred { .. } => "security_field_blurred",
            Self::SecuritySubmitted => "security_submitted",
            Self::DeleteAccountRequested => "delete_account_requested",
            Self::DeleteAccountCancelled => "delete_account_cancelled",
            Self::DeletePasswordChanged { .. } => "delete_password_changed",
            Self::DeletePasswordBlurred => "delete_password_blurred",
            Self::DeleteAccountConfirmed => "delete_account_confirmed",
            Self::MenuAnchorEntered { .. } => "menu_anchor_entered",
            Self::MenuPointerLeft => "menu_pointer_left",
            Self::MenuItemActivated { .. } => "menu_item_activated",
            Self::ProfileUpdated { .. } => "profile_updated",
            Self::PasswordUpdated { .. } => "password_updated",
            Self::AccountDeleted { .. } => "account_deleted",
            Self::CountryCodesLoaded { .. } => "country_codes_loaded",
            Self::NotificationExpired { .. } => "notification_expired",
            Self::TokenPersisted { .. } => "token_persisted",
            Self::TokenCleared { .. } => "token_cleared",
        }
    }

    /// Events that originate from the person using the page rather than
    /// from a capability completing.
    #[must_use]
    pub fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::SectionSelected(_)
                | Self::BackRequested
                | Self::GeneralFieldChanged { .. }
                | Self::GeneralFieldBlurred { .. }
                | Self::GeneralSubmitted
                | Self::SecurityFieldChanged { .. }
                | Self::SecurityFieldBlurred { .. }
                | Self::SecuritySubmitted
                | Self::DeleteAccountRequested
                | Self::DeleteAccountCancelled
                | Self::DeletePasswordChanged { .. }
                | Self::DeletePasswordBlurred
                | Self::DeleteAccountConfirmed
                | Self::MenuAnchorEntered { .. }
                | Self::MenuPointerLeft
                | Self::MenuItemActivated { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_debug_is_redacted() {
        let event = Event::DeletePasswordChanged {
            value: Secret::new("hunter22"),
        };
        let rendered = format!("{event:?}");
        assert!(!rendered.contains("hunter22"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn secret_serializes_as_plain_string() {
        let json = serde_json::to_string(&Secret::new("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }

    #[test]
    fn user_events_round_trip_through_json() {
        let event = Event::GeneralFieldChanged {
            field: GeneralField::Zip,
            value: "1000".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(serde_json::from_str::<Event>(&json).unwrap(), event);
    }

    #[test]
    fn completions_are_not_user_initiated() {
        assert!(Event::GeneralSubmitted.is_user_initiated());
        assert!(!Event::TokenCleared { error: None }.is_user_initiated());
        assert_eq!(Event::PageOpened.name(), "page_opened");
    }
}
