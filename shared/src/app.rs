use serde::de::{DeserializeOwned, IgnoredAny};

use crate::capabilities::{clear_token, persist_token, post_graphql, CapabilityError, Capabilities};
use crate::event::Event;
use crate::form::SubmitOutcome;
use crate::graphql::{self, GraphQlOperation, MutationFailure};
use crate::modal::ConfirmOutcome;
use crate::model::{CountryCodes, MenuAction, Model};
use crate::notification::NotificationChannel;
use crate::profile::{GeneralInfoValues, SecurityValues, UserProfile};
use crate::session::Session;
use crate::view::{self, ViewModel};
use crate::{AppError, ErrorKind};

#[derive(Default)]
pub struct App;

impl App {
    fn notify_success(model: &mut Model, caps: &Capabilities) {
        let token = model.notifications.report_success();
        caps.delay.start(
            model.config.notification_window_ms,
            Event::NotificationExpired {
                channel: NotificationChannel::Success,
                token,
            },
        );
    }

    fn notify_error(model: &mut Model, caps: &Capabilities, message: impl Into<String>) {
        let token = model.notifications.report_error(message);
        caps.delay.start(
            model.config.notification_window_ms,
            Event::NotificationExpired {
                channel: NotificationChannel::Error,
                token,
            },
        );
    }

    fn signed_in_user(model: &Model) -> Result<&UserProfile, AppError> {
        model
            .session
            .current_user()
            .ok_or_else(|| AppError::new(ErrorKind::Authentication, "no signed-in user"))
    }

    /// Encodes and posts one GraphQL operation. Nothing is sent on error.
    fn dispatch<T, F>(
        model: &Model,
        caps: &Capabilities,
        operation: GraphQlOperation,
        body: Result<Vec<u8>, AppError>,
        make_event: F,
    ) -> Result<(), AppError>
    where
        T: DeserializeOwned,
        F: FnOnce(Result<T, MutationFailure>) -> Event + Send + 'static,
    {
        let body = body?;
        post_graphql(
            &caps.http,
            &model.config.graphql_endpoint,
            model.session.token(),
            operation,
            body,
            make_event,
        )
        .map_err(|e| AppError::from(CapabilityError::from(e)))
    }

    fn submit_general(model: &mut Model, caps: &Capabilities) {
        match model.general.submit() {
            SubmitOutcome::Dispatched { values, ticket } => {
                tracing::info!(form = "general", generation = ticket.0, "submitting profile");
                let body = Self::signed_in_user(model)
                    .and_then(|current| graphql::update_user_info_body(&values.to_profile(current)));
                let sent = Self::dispatch(
                    model,
                    caps,
                    GraphQlOperation::UpdateUserInfo,
                    body,
                    move |result| Event::ProfileUpdated { ticket, result },
                );
                if let Err(e) = sent {
                    tracing::warn!(form = "general", error = %e, "profile update not sent");
                    model.general.complete(ticket);
                    Self::notify_error(model, caps, e.user_facing_message());
                }
            }
            SubmitOutcome::Invalid { errors } => {
                tracing::debug!(form = "general", invalid = errors.len(), "submission blocked");
            }
            SubmitOutcome::AlreadySubmitting => {
                tracing::debug!(form = "general", "submission already in flight");
            }
        }
    }

    fn submit_security(model: &mut Model, caps: &Capabilities) {
        match model.security.submit() {
            SubmitOutcome::Dispatched { values, ticket } => {
                tracing::info!(form = "security", generation = ticket.0, "submitting password change");
                model.security.clear_values(SecurityValues::default());
                let body = Self::signed_in_user(model).and_then(|user| {
                    graphql::update_user_password_body(
                        &user.id,
                        &values.old_password,
                        &values.new_password,
                    )
                });
                let sent = Self::dispatch(
                    model,
                    caps,
                    GraphQlOperation::UpdateUserPassword,
                    body,
                    move |result| Event::PasswordUpdated { ticket, result },
                );
                if let Err(e) = sent {
                    tracing::warn!(form = "security", error = %e, "password change not sent");
                    model.security.complete(ticket);
                    Self::notify_error(model, caps, e.user_facing_message());
                }
            }
            SubmitOutcome::Invalid { errors } => {
                tracing::debug!(form = "security", invalid = errors.len(), "submission blocked");
            }
            SubmitOutcome::AlreadySubmitting => {
                tracing::debug!(form = "security", "submission already in flight");
            }
        }
    }

    fn confirm_deletion(model: &mut Model, caps: &Capabilities) {
        let user_id = match Self::signed_in_user(model) {
            Ok(user) => user.id.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "deletion without a session");
                model.delete_modal.dismiss();
                Self::notify_error(model, caps, e.user_facing_message());
                return;
            }
        };

        match model.delete_modal.confirm() {
            ConfirmOutcome::Dispatch { values, ticket } => {
                tracing::info!(generation = ticket.0, "requesting account deletion");
                let sent = Self::dispatch(
                    model,
                    caps,
                    GraphQlOperation::DeleteUser,
                    graphql::delete_user_body(&user_id, &values.password),
                    move |result: Result<IgnoredAny, MutationFailure>| Event::AccountDeleted {
                        ticket,
                        result: result.map(|_| ()),
                    },
                );
                if let Err(e) = sent {
                    tracing::warn!(error = %e, "account deletion not sent");
                    model.delete_modal.finish(ticket);
                    Self::notify_error(model, caps, e.user_facing_message());
                }
            }
            ConfirmOutcome::Rejected => {
                tracing::debug!("deletion blocked by validation");
            }
            ConfirmOutcome::Ignored => {}
        }
    }

    fn load_country_codes(model: &mut Model, caps: &Capabilities) {
        model.country_codes = CountryCodes::Loading;
        let sent = Self::dispatch(
            model,
            caps,
            GraphQlOperation::GetCountryCodes,
            graphql::get_country_codes_body(),
            |result| Event::CountryCodesLoaded { result },
        );
        if let Err(e) = sent {
            tracing::warn!(error = %e, "country codes not requested");
            model.country_codes = CountryCodes::Failed(e.user_facing_message());
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        tracing::debug!(
            event = event.name(),
            user_initiated = event.is_user_initiated(),
            "update"
        );

        match event {
            Event::Noop => {}

            Event::Configure(config) => match config.validate() {
                Ok(()) => {
                    tracing::info!(endpoint = %config.graphql_endpoint, "configuration applied");
                    model.config = config;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "configuration rejected");
                }
            },

            Event::SessionStarted { user, token } => {
                tracing::info!(role = %user.role, "session started");
                model.session = Session::start(user, token.expose().to_string());
                model.seed_general_form();
                model.security.reset(SecurityValues::default());
                model.delete_modal.dismiss();

                match model.token_key() {
                    Ok(key) => persist_token(&caps.kv, &key, token.expose()),
                    Err(e) => tracing::warn!(error = %e, "token not persisted"),
                }
                caps.render.render();
            }

            Event::PageOpened => {
                model.seed_general_form();
                Self::load_country_codes(model, caps);
                caps.render.render();
            }

            Event::SectionSelected(key) => {
                model.select_section(key);
                caps.render.render();
            }

            Event::BackRequested => {
                caps.navigate.back();
            }

            Event::GeneralFieldChanged { field, value } => {
                model.general.set_field(field, value);
                caps.render.render();
            }

            Event::GeneralFieldBlurred { field } => {
                model.general.set_touched(field);
                caps.render.render();
            }

            Event::GeneralSubmitted => {
                Self::submit_general(model, caps);
                caps.render.render();
            }

            Event::SecurityFieldChanged { field, value } => {
                model.security.set_field(field, value.expose().to_string());
                caps.render.render();
            }

            Event::SecurityFieldBlurred { field } => {
                model.security.set_touched(field);
                caps.render.render();
            }

            Event::SecuritySubmitted => {
                Self::submit_security(model, caps);
                caps.render.render();
            }

            Event::DeleteAccountRequested => {
                let allowed = model.session.role().is_some_and(|r| r.can_delete_account());
                if allowed && model.delete_modal.open() {
                    caps.render.render();
                } else {
                    tracing::debug!(role = ?model.session.role(), "delete intent ignored");
                }
            }

            Event::DeleteAccountCancelled => {
                if model.delete_modal.cancel() {
                    caps.render.render();
                }
            }

            Event::DeletePasswordChanged { value } => {
                model.delete_modal.set_password(value.expose().to_string());
                caps.render.render();
            }

            Event::DeletePasswordBlurred => {
                model.delete_modal.touch_password();
                caps.render.render();
            }

            Event::DeleteAccountConfirmed => {
                Self::confirm_deletion(model, caps);
                caps.render.render();
            }

            Event::MenuAnchorEntered { anchor } => {
                model.menu.open(anchor);
                caps.render.render();
            }

            Event::MenuPointerLeft => {
                model.menu.close();
                caps.render.render();
            }

            Event::MenuItemActivated { index } => {
                match model.menu.activate(index) {
                    Some(MenuAction::Select(key)) => model.select_section(key),
                    Some(MenuAction::Back) => caps.navigate.back(),
                    None => return,
                }
                caps.render.render();
            }

            Event::ProfileUpdated { ticket, result } => {
                if !model.general.complete(ticket) {
                    tracing::debug!(form = "general", generation = ticket.0, "stale completion discarded");
                    return;
                }
                match result {
                    Ok(user) => {
                        tracing::info!("profile updated");
                        model.general.reset(GeneralInfoValues::from_profile(&user));
                        model.session.set_role(Some(user.role));
                        model.session.set_current_user(Some(user));
                        Self::notify_success(model, caps);
                    }
                    Err(failure) => {
                        tracing::warn!(error = %failure, "profile update failed");
                        Self::notify_error(model, caps, failure.message);
                    }
                }
                caps.render.render();
            }

            Event::PasswordUpdated { ticket, result } => {
                if !model.security.complete(ticket) {
                    tracing::debug!(form = "security", generation = ticket.0, "stale completion discarded");
                    return;
                }
                match result {
                    Ok(user) => {
                        tracing::info!("password updated");
                        model.session.set_role(Some(user.role));
                        model.session.set_current_user(Some(user));
                        model.security.reset(SecurityValues::default());
                        Self::notify_success(model, caps);
                    }
                    Err(failure) => {
                        tracing::warn!(error = %failure, "password update failed");
                        Self::notify_error(model, caps, failure.message);
                    }
                }
                caps.render.render();
            }

            Event::AccountDeleted { ticket, result } => {
                if !model.delete_modal.finish(ticket) {
                    tracing::debug!(generation = ticket.0, "stale deletion result discarded");
                    return;
                }
                match result {
                    Ok(()) => {
                        tracing::info!("account deleted");
                        let key = model.token_key();
                        model.session.clear();
                        match key {
                            Ok(key) => clear_token(&caps.kv, &key),
                            Err(e) => tracing::warn!(error = %e, "token not cleared"),
                        }
                        caps.navigate.to(model.config.signup_path.clone());
                    }
                    Err(failure) => {
                        tracing::warn!(error = %failure, "account deletion failed");
                        Self::notify_error(model, caps, failure.message);
                    }
                }
                caps.render.render();
            }

            Event::CountryCodesLoaded { result } => {
                model.country_codes = match result {
                    Ok(codes) => {
                        tracing::debug!(count = codes.len(), "country codes loaded");
                        CountryCodes::Loaded(codes)
                    }
                    Err(failure) => {
                        tracing::warn!(error = %failure, "country codes unavailable");
                        CountryCodes::Failed(failure.message)
                    }
                };
                caps.render.render();
            }

            Event::NotificationExpired { channel, token } => {
                if model.notifications.expire(channel, token) {
                    caps.render.render();
                }
            }

            Event::TokenPersisted { error } | Event::TokenCleared { error } => {
                if let Some(error) = error {
                    tracing::warn!(%error, "token storage failed");
                }
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        view::build(model)
    }
}
