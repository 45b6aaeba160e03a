//! Delete-account confirmation.
//!
//! `Closed -> Open -> Submitting -> Closed`, with `Open -> Closed` on cancel.

use crate::form::{FormState, SubmissionTicket, SubmitOutcome};
use crate::profile::{DeleteAccountField, DeleteAccountValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalPhase {
    #[default]
    Closed,
    Open,
    Submitting(SubmissionTicket),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    /// Send the deletion with this password; the form has already been cleared.
    Dispatch {
        values: DeleteAccountValues,
        ticket: SubmissionTicket,
    },
    Rejected,
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteAccountModal {
    phase: ModalPhase,
    form: FormState<DeleteAccountValues>,
}

impl DeleteAccountModal {
    #[must_use]
    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self.phase, ModalPhase::Closed)
    }

    #[must_use]
    pub fn form(&self) -> &FormState<DeleteAccountValues> {
        &self.form
    }

    pub fn open(&mut self) -> bool {
        if self.phase == ModalPhase::Closed {
            self.phase = ModalPhase::Open;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) -> bool {
        if self.phase == ModalPhase::Open {
            self.phase = ModalPhase::Closed;
            true
        } else {
            false
        }
    }

    pub fn set_password(&mut self, value: String) {
        if self.phase == ModalPhase::Open {
            self.form.set_field(DeleteAccountField::Password, value);
        }
    }

    pub fn touch_password(&mut self) {
        if self.phase == ModalPhase::Open {
            self.form.set_touched(DeleteAccountField::Password);
        }
    }

    pub fn confirm(&mut self) -> ConfirmOutcome {
        if self.phase != ModalPhase::Open {
            return ConfirmOutcome::Ignored;
        }

        match self.form.submit() {
            SubmitOutcome::Dispatched { values, ticket } => {
                self.form.reset(DeleteAccountValues::default());
                self.phase = ModalPhase::Submitting(ticket);
                ConfirmOutcome::Dispatch { values, ticket }
            }
            SubmitOutcome::Invalid { .. } => ConfirmOutcome::Rejected,
            SubmitOutcome::AlreadySubmitting => ConfirmOutcome::Ignored,
        }
    }

    /// Closes the modal when the matching deletion response arrives.
    pub fn finish(&mut self, ticket: SubmissionTicket) -> bool {
        if self.phase == ModalPhase::Submitting(ticket) {
            self.phase = ModalPhase::Closed;
            true
        } else {
            false
        }
    }

    pub fn dismiss(&mut self) {
        self.phase = ModalPhase::Closed;
        self.form.reset(DeleteAccountValues::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened() -> DeleteAccountModal {
        let mut modal = DeleteAccountModal::default();
        assert!(modal.open());
        modal
    }

    #[test]
    fn cancel_closes_an_open_modal() {
        let mut modal = opened();
        assert!(modal.cancel());
        assert_eq!(modal.phase(), ModalPhase::Closed);
    }

    #[test]
    fn invalid_confirm_keeps_modal_open_with_visible_error() {
        let mut modal = opened();
        modal.set_password("abc".into());
        assert_eq!(modal.confirm(), ConfirmOutcome::Rejected);
        assert_eq!(modal.phase(), ModalPhase::Open);
        assert_eq!(
            modal.form().visible_error(DeleteAccountField::Password),
            Some("Password is 6 characters minimum")
        );
    }

    #[test]
    fn valid_confirm_dispatches_and_clears_password() {
        let mut modal = opened();
        modal.set_password("wrongpass".into());

        let ConfirmOutcome::Dispatch { values, ticket } = modal.confirm() else {
            panic!("expected dispatch");
        };
        assert_eq!(values.password, "wrongpass");
        assert_eq!(modal.phase(), ModalPhase::Submitting(ticket));
        assert_eq!(modal.form().values().password, "");
    }

    #[test]
    fn cancel_is_ignored_while_submitting() {
        let mut modal = opened();
        modal.set_password("secret12".into());
        let ConfirmOutcome::Dispatch { ticket, .. } = modal.confirm() else {
            panic!("expected dispatch");
        };
        assert!(!modal.cancel());
        assert!(modal.finish(ticket));
        assert_eq!(modal.phase(), ModalPhase::Closed);
    }

    #[test]
    fn finish_with_foreign_ticket_is_rejected() {
        let mut modal = opened();
        modal.set_password("secret12".into());
        let ConfirmOutcome::Dispatch { ticket, .. } = modal.confirm() else {
            panic!("expected dispatch");
        };
        assert!(!modal.finish(SubmissionTicket(ticket.0 + 7)));
        assert!(modal.is_open());
    }

    #[test]
    fn confirm_on_closed_modal_does_nothing() {
        let mut modal = DeleteAccountModal::default();
        assert_eq!(modal.confirm(), ConfirmOutcome::Ignored);
    }
}
