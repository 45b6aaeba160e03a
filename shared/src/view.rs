use serde::{Deserialize, Serialize};

use crate::form::{FormState, FormValues};
use crate::graphql::CountryCode;
use crate::model::{Model, SectionKey};
use crate::modal::ModalPhase;
use crate::profile::DeleteAccountField;
use crate::theme::{Swatch, ThemeKey};
use crate::validation::FormField;
use crate::SUCCESS_MESSAGE;

pub const FALLBACK_PREFIX: &str = "216";
pub const FALLBACK_COUNTRY: &str = "Tunisia";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FieldView {
    pub name: String,
    pub value: String,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FormView {
    pub fields: Vec<FieldView>,
    pub submitting: bool,
    pub can_submit: bool,
}

impl FormView {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GeneralSectionView {
    pub form: FormView,
    pub prefix_options: Vec<SelectOption>,
    pub country_options: Vec<SelectOption>,
    pub country_codes_loading: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DeleteModalView {
    pub open: bool,
    pub submitting: bool,
    pub password: String,
    pub password_error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MenuView {
    pub open: bool,
    pub top: f64,
    pub left: f64,
    pub labels: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ViewModel {
    pub section: SectionKey,
    pub section_title: String,
    pub accent: ThemeKey,
    pub accent_color: String,
    pub accent_swatch: Swatch,
    pub is_authenticated: bool,
    pub email: Option<String>,
    pub general: GeneralSectionView,
    pub security: FormView,
    pub can_delete_account: bool,
    pub delete_modal: DeleteModalView,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
    pub menu: MenuView,
}

#[must_use]
pub fn build(model: &Model) -> ViewModel {
    let role = model.session.role();
    let accent = ThemeKey::for_role(role);
    let codes = model.country_codes.codes();

    ViewModel {
        section: model.section,
        section_title: model.section.title().to_string(),
        accent,
        accent_color: accent.main().to_string(),
        accent_swatch: accent.swatch(),
        is_authenticated: model.session.is_authenticated(),
        email: model.session.current_user().map(|u| u.email.clone()),
        general: GeneralSectionView {
            form: form_view(&model.general),
            prefix_options: prefix_options(codes),
            country_options: country_options(codes),
            country_codes_loading: model.country_codes.is_loading(),
        },
        security: form_view(&model.security),
        can_delete_account: role.is_some_and(|r| r.can_delete_account()),
        delete_modal: delete_modal_view(model),
        success_message: model
            .notifications
            .success()
            .then(|| SUCCESS_MESSAGE.to_string()),
        error_message: model.notifications.error_message().map(str::to_string),
        menu: menu_view(model),
    }
}

fn form_view<V: FormValues>(form: &FormState<V>) -> FormView {
    FormView {
        fields: V::Field::all()
            .iter()
            .map(|&field| FieldView {
                name: field.name().to_string(),
                value: form.values().value(field).to_string(),
                error: form.visible_error(field).map(str::to_string),
            })
            .collect(),
        submitting: form.is_submitting(),
        can_submit: form.can_submit(),
    }
}

fn prefix_options(codes: &[CountryCode]) -> Vec<SelectOption> {
    if codes.is_empty() {
        return vec![SelectOption {
            value: FALLBACK_PREFIX.to_string(),
            label: format!("+{FALLBACK_PREFIX}"),
        }];
    }
    codes
        .iter()
        .map(|c| SelectOption {
            value: c.prefix.clone(),
            label: format!("+{} ({})", c.prefix, c.country),
        })
        .collect()
}

fn country_options(codes: &[CountryCode]) -> Vec<SelectOption> {
    if codes.is_empty() {
        return vec![SelectOption {
            value: FALLBACK_COUNTRY.to_string(),
            label: FALLBACK_COUNTRY.to_string(),
        }];
    }
    codes
        .iter()
        .map(|c| SelectOption {
            value: c.country.clone(),
            label: c.country.clone(),
        })
        .collect()
}

fn delete_modal_view(model: &Model) -> DeleteModalView {
    let modal = &model.delete_modal;
    DeleteModalView {
        open: modal.is_open(),
        submitting: matches!(modal.phase(), ModalPhase::Submitting(_)),
        password: modal.form().values().password.clone(),
        password_error: modal
            .form()
            .visible_error(DeleteAccountField::Password)
            .map(str::to_string),
    }
}

fn menu_view(model: &Model) -> MenuView {
    let position = model.menu.position();
    MenuView {
        open: model.menu.is_open(),
        top: position.map_or(0.0, |p| p.top),
        left: position.map_or(0.0, |p| p.left),
        labels: model.menu.items().iter().map(|i| i.label.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CountryCodes;
    use crate::profile::{GeneralField, Role};

    #[test]
    fn fallback_options_without_country_codes() {
        let view = build(&Model::default());
        assert_eq!(view.general.prefix_options[0].label, "+216");
        assert_eq!(view.general.country_options[0].value, "Tunisia");
    }

    #[test]
    fn options_from_loaded_country_codes() {
        let mut model = Model::default();
        model.country_codes = CountryCodes::Loaded(vec![CountryCode {
            prefix: "33".into(),
            country: "France".into(),
        }]);
        let view = build(&model);
        assert_eq!(view.general.prefix_options[0].label, "+33 (France)");
        assert_eq!(view.general.country_options[0].label, "France");
    }

    #[test]
    fn errors_are_hidden_until_touched() {
        let mut model = Model::default();
        let view = build(&model);
        assert_eq!(view.general.form.field("firstName").unwrap().error, None);

        model.general.set_touched(GeneralField::FirstName);
        let view = build(&model);
        assert_eq!(
            view.general.form.field("firstName").unwrap().error.as_deref(),
            Some("First Name is required")
        );
    }

    #[test]
    fn anonymous_view_uses_client_accent_and_hides_delete() {
        let view = build(&Model::default());
        assert_eq!(view.accent, ThemeKey::Client);
        assert_eq!(view.accent_color, "#5F6CAD");
        assert!(!view.can_delete_account);
        assert!(!view.is_authenticated);
        assert_eq!(view.success_message, None);
    }

    #[test]
    fn accent_swatch_follows_session_role() {
        let view = build(&Model::default());
        assert_eq!(view.accent_swatch.main, "#5F6CAD");
        assert!(view.accent_swatch.light.is_some());
        assert!(view.accent_swatch.dark.is_some());

        let mut model = Model::default();
        model.session.set_role(Some(Role::Admin));
        let view = build(&model);
        assert_eq!(view.accent, ThemeKey::Admin);
        assert_eq!(view.accent_swatch, ThemeKey::Admin.swatch());
    }

    #[test]
    fn success_notification_uses_fixed_message() {
        let mut model = Model::default();
        model.notifications.report_success();
        assert_eq!(
            build(&model).success_message.as_deref(),
            Some("Account updated successfully")
        );
    }
}
