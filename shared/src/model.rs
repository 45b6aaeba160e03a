use serde::{Deserialize, Serialize};

use crate::capabilities::{KvError, StorageKey};
use crate::config::SettingsConfig;
use crate::form::FormState;
use crate::graphql::CountryCode;
use crate::modal::DeleteAccountModal;
use crate::notification::NotificationStore;
use crate::overlay::{ContextMenu, MenuItem};
use crate::profile::{GeneralInfoValues, SecurityValues};
use crate::session::Session;

#[derive(Default, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    #[default]
    General,
    Security,
}

impl SectionKey {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Security => "Security",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum CountryCodes {
    #[default]
    NotRequested,
    Loading,
    Loaded(Vec<CountryCode>),
    Failed(String),
}

impl CountryCodes {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn codes(&self) -> &[CountryCode] {
        match self {
            Self::Loaded(codes) => codes,
            _ => &[],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Select(SectionKey),
    Back,
}

#[derive(Debug)]
pub struct Model {
    pub config: SettingsConfig,
    pub session: Session,
    pub section: SectionKey,
    pub general: FormState<GeneralInfoValues>,
    pub security: FormState<SecurityValues>,
    pub delete_modal: DeleteAccountModal,
    pub notifications: NotificationStore,
    pub country_codes: CountryCodes,
    pub menu: ContextMenu<MenuAction>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            config: SettingsConfig::default(),
            session: Session::default(),
            section: SectionKey::default(),
            general: FormState::default(),
            security: FormState::default(),
            delete_modal: DeleteAccountModal::default(),
            notifications: NotificationStore::new(),
            country_codes: CountryCodes::default(),
            menu: section_menu(),
        }
    }
}

impl Model {
    /// Only assigns; both forms keep their state while hidden.
    pub fn select_section(&mut self, key: SectionKey) {
        self.section = key;
    }

    pub fn token_key(&self) -> Result<StorageKey, KvError> {
        StorageKey::new(self.config.token_storage_key.as_str())
    }

    /// Seeds the general form from the signed-in user, if any.
    pub fn seed_general_form(&mut self) {
        let values = self
            .session
            .current_user()
            .map(GeneralInfoValues::from_profile)
            .unwrap_or_default();
        self.general.reset(values);
    }
}

fn section_menu() -> ContextMenu<MenuAction> {
    ContextMenu::new(vec![
        MenuItem::new(
            SectionKey::General.title(),
            Some(MenuAction::Select(SectionKey::General)),
        ),
        MenuItem::new(
            SectionKey::Security.title(),
            Some(MenuAction::Select(SectionKey::Security)),
        ),
        MenuItem::new("Back", Some(MenuAction::Back)),
    ])
}
