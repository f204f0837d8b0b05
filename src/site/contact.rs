use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

use crate::site::notification::NotificationKind;

pub const CONTACT_FORM_ID: &str = "contact-form";
pub const CONTACT_ENDPOINT: &str = "/contact/ajax/";
pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const CSRF_FIELD_SELECTOR: &str = "[name=csrfmiddlewaretoken]";
pub const FORM_INPUT_SELECTOR: &str = ".form__input";
pub const SUBMIT_BUTTON_SELECTOR: &str = ".form__button";
pub const SENDING_LABEL: &str = "Sending...";

pub const INVALID_FORM_MESSAGE: &str = "Please fill in all required fields correctly.";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Message sent successfully!";
pub const DEFAULT_REJECTED_MESSAGE: &str = "There was an error sending your message.";
pub const NETWORK_ERROR_MESSAGE: &str = "There was a network error. Please try again later.";

pub const PAYLOAD_FIELD_IDS: [&str; 4] = ["name", "email", "subject", "message"];

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

/// Snapshot of one `.form__input` taken at submit time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInput {
    pub required: bool,
    pub is_email: bool,
    pub value: String,
}

impl FieldInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            required: false,
            is_email: false,
            value: value.into(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn email(mut self) -> Self {
        self.is_email = true;
        self
    }

    fn is_valid(&self) -> bool {
        if self.required && self.value.trim().is_empty() {
            return false;
        }

        if self.is_email && !self.value.is_empty() && !is_valid_email(&self.value) {
            return false;
        }

        true
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{} contact field(s) failed validation", .invalid_fields.len())]
pub struct ValidationError {
    /// Positions into the validated slice, in input order.
    pub invalid_fields: Vec<usize>,
}

pub fn validate(fields: &[FieldInput]) -> Result<(), ValidationError> {
    let invalid_fields: Vec<usize> = fields
        .iter()
        .enumerate()
        .filter(|(_, field)| !field.is_valid())
        .map(|(index, _)| index)
        .collect();

    if invalid_fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { invalid_fields })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactPayload {
    /// Builds the payload from the named form controls; a missing control
    /// contributes an empty string.
    pub fn from_lookup(mut lookup: impl FnMut(&str) -> Option<String>) -> Self {
        let mut read = |id: &str| {
            lookup(id)
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };

        Self {
            name: read(PAYLOAD_FIELD_IDS[0]),
            email: read(PAYLOAD_FIELD_IDS[1]),
            subject: read(PAYLOAD_FIELD_IDS[2]),
            message: read(PAYLOAD_FIELD_IDS[3]),
        }
    }

    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.subject, &self.message]
            .iter()
            .all(|value| !value.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReply {
    // A reply that omits the flag counts as a rejection.
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// Built by the preview server only.
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
impl ContactReply {
    pub fn accepted(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
        }
    }

    pub fn rejected(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
        }
    }
}

/// Raw HTTP result handed back by a transport before interpretation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawReply {
    pub status: u16,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted(Option<String>),
    Rejected(Option<String>),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("contact request failed: {0}")]
    Transport(String),
    #[error("contact endpoint answered with status {0}")]
    Status(u16),
    #[error("contact endpoint returned an unreadable body: {0}")]
    Decode(String),
}

impl SubmitError {
    pub fn class(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status(_) => "status",
            Self::Decode(_) => "decode",
        }
    }
}

pub fn interpret_reply(raw: &RawReply) -> Result<SubmitOutcome, SubmitError> {
    if !(200..300).contains(&raw.status) {
        return Err(SubmitError::Status(raw.status));
    }

    let reply: ContactReply =
        serde_json::from_str(&raw.body).map_err(|error| SubmitError::Decode(error.to_string()))?;
    let message = reply.message.filter(|value| !value.is_empty());

    Ok(if reply.success {
        SubmitOutcome::Accepted(message)
    } else {
        SubmitOutcome::Rejected(message)
    })
}

/// Delivery seam for the contact payload; the browser build posts through
/// `gloo-net`, tests substitute a canned reply.
#[allow(async_fn_in_trait)]
pub trait ContactTransport {
    async fn post_contact(&self, payload: &ContactPayload, csrf_token: &str) -> Result<RawReply, SubmitError>;
}

pub async fn deliver<T: ContactTransport>(
    transport: &T,
    payload: &ContactPayload,
    csrf_token: &str,
) -> Result<SubmitOutcome, SubmitError> {
    let raw = transport.post_contact(payload, csrf_token).await?;
    interpret_reply(&raw)
}

/// The button that starts a submission.
pub trait SubmitControl {
    fn label(&self) -> Option<String>;
    fn set_label(&self, label: Option<&str>);
    fn set_disabled(&self, disabled: bool);
}

/// Holds the submit control in its sending state; dropping the guard
/// re-enables it and restores the label it had when engaged.
pub struct SubmitGuard<C: SubmitControl> {
    control: C,
    label: Option<String>,
}

impl<C: SubmitControl> SubmitGuard<C> {
    pub fn engage(control: C) -> Self {
        let label = control.label();
        control.set_label(Some(SENDING_LABEL));
        control.set_disabled(true);
        Self { control, label }
    }
}

impl<C: SubmitControl> Drop for SubmitGuard<C> {
    fn drop(&mut self) {
        self.control.set_label(self.label.as_deref());
        self.control.set_disabled(false);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub kind: NotificationKind,
    pub reset_form: bool,
}

impl Feedback {
    pub fn invalid_form() -> Self {
        Self {
            message: INVALID_FORM_MESSAGE.to_string(),
            kind: NotificationKind::Error,
            reset_form: false,
        }
    }

    pub fn for_result(result: &Result<SubmitOutcome, SubmitError>) -> Self {
        match result {
            Ok(SubmitOutcome::Accepted(message)) => Self {
                message: message.clone().unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
                kind: NotificationKind::Success,
                reset_form: true,
            },
            Ok(SubmitOutcome::Rejected(message)) => Self {
                message: message.clone().unwrap_or_else(|| DEFAULT_REJECTED_MESSAGE.to_string()),
                kind: NotificationKind::Error,
                reset_form: false,
            },
            Err(_) => Self {
                message: NETWORK_ERROR_MESSAGE.to_string(),
                kind: NotificationKind::Error,
                reset_form: false,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// A request is already in flight.
    Busy,
    Invalid(ValidationError),
    Ready,
}

/// Submission lifecycle of the contact form. Validation and the terminal
/// outcomes are synchronous steps, so only `Idle` and `Submitting` persist.
#[derive(Debug, Default)]
pub struct ContactForm {
    phase: FormPhase,
}

impl ContactForm {
    pub fn begin(&mut self, fields: &[FieldInput]) -> SubmitAttempt {
        if self.phase == FormPhase::Submitting {
            return SubmitAttempt::Busy;
        }

        match validate(fields) {
            Ok(()) => {
                self.phase = FormPhase::Submitting;
                SubmitAttempt::Ready
            }
            Err(error) => SubmitAttempt::Invalid(error),
        }
    }

    pub fn finish(&mut self, result: &Result<SubmitOutcome, SubmitError>) -> Feedback {
        self.phase = FormPhase::Idle;
        Feedback::for_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct CannedTransport {
        reply: Result<RawReply, SubmitError>,
        calls: Cell<usize>,
    }

    impl CannedTransport {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                reply: Ok(RawReply {
                    status,
                    body: body.to_string(),
                }),
                calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(SubmitError::Transport("connection reset".to_string())),
                calls: Cell::new(0),
            }
        }
    }

    impl ContactTransport for CannedTransport {
        async fn post_contact(&self, _payload: &ContactPayload, _csrf_token: &str) -> Result<RawReply, SubmitError> {
            self.calls.set(self.calls.get() + 1);
            self.reply.clone()
        }
    }

    #[derive(Default)]
    struct FakeButton {
        label: RefCell<Option<String>>,
        disabled: Cell<bool>,
    }

    impl FakeButton {
        fn labelled(label: &str) -> Rc<Self> {
            let button = Self::default();
            *button.label.borrow_mut() = Some(label.to_string());
            Rc::new(button)
        }
    }

    impl SubmitControl for Rc<FakeButton> {
        fn label(&self) -> Option<String> {
            self.label.borrow().clone()
        }

        fn set_label(&self, label: Option<&str>) {
            *self.label.borrow_mut() = label.map(str::to_string);
        }

        fn set_disabled(&self, disabled: bool) {
            self.disabled.set(disabled);
        }
    }

    async fn send_with_button(transport: &CannedTransport, button: &Rc<FakeButton>) -> Feedback {
        let mut form = ContactForm::default();
        assert_eq!(form.begin(&complete_fields()), SubmitAttempt::Ready);

        let guard = SubmitGuard::engage(Rc::clone(button));
        assert!(button.disabled.get());
        assert_eq!(button.label.borrow().as_deref(), Some(SENDING_LABEL));

        let payload = ContactPayload::from_lookup(|_| None);
        let result = deliver(transport, &payload, "csrf-token").await;
        drop(guard);
        form.finish(&result)
    }

    fn complete_fields() -> Vec<FieldInput> {
        vec![
            FieldInput::new("Asha").required(),
            FieldInput::new("asha@example.com").required().email(),
            FieldInput::new("Quote").required(),
            FieldInput::new("Need a conveyor refit.").required(),
        ]
    }

    async fn submit(form: &mut ContactForm, transport: &CannedTransport, fields: &[FieldInput]) -> Feedback {
        match form.begin(fields) {
            SubmitAttempt::Ready => {
                let payload = ContactPayload::from_lookup(|id| {
                    PAYLOAD_FIELD_IDS
                        .iter()
                        .position(|known| *known == id)
                        .and_then(|index| fields.get(index))
                        .map(|field| field.value.clone())
                });
                let result = deliver(transport, &payload, "csrf-token").await;
                form.finish(&result)
            }
            SubmitAttempt::Invalid(_) => Feedback::invalid_form(),
            SubmitAttempt::Busy => panic!("form unexpectedly busy"),
        }
    }

    #[test]
    fn email_pattern_requires_local_domain_and_tld() {
        assert!(!is_valid_email("foo"));
        assert!(!is_valid_email("foo@bar"));
        assert!(!is_valid_email("fo o@bar.com"));
        assert!(is_valid_email("a@b.co"));
    }

    #[test]
    fn whitespace_only_required_field_is_invalid() {
        let fields = vec![FieldInput::new("Asha").required(), FieldInput::new("   ").required()];

        assert_eq!(
            validate(&fields),
            Err(ValidationError {
                invalid_fields: vec![1]
            })
        );
    }

    #[test]
    fn optional_empty_email_passes_but_malformed_fails() {
        assert!(validate(&[FieldInput::new("").email()]).is_ok());
        assert!(validate(&[FieldInput::new("foo").email()]).is_err());
    }

    #[test]
    fn payload_trims_and_defaults_missing_controls() {
        let payload = ContactPayload::from_lookup(|id| match id {
            "name" => Some("  Ravi ".to_string()),
            "email" => Some("ravi@example.in".to_string()),
            _ => None,
        });

        assert_eq!(payload.name, "Ravi");
        assert_eq!(payload.subject, "");
        assert_eq!(payload.message, "");
        assert_eq!(
            serde_json::to_value(&payload).expect("payload serializes"),
            serde_json::json!({
                "name": "Ravi",
                "email": "ravi@example.in",
                "subject": "",
                "message": "",
            })
        );
    }

    #[test]
    fn non_success_status_is_a_failure_even_with_json_body() {
        let raw = RawReply {
            status: 500,
            body: r#"{"success": true}"#.to_string(),
        };

        assert_eq!(interpret_reply(&raw), Err(SubmitError::Status(500)));
    }

    #[test]
    fn malformed_body_is_a_decode_failure() {
        let raw = RawReply {
            status: 200,
            body: "<html>oops</html>".to_string(),
        };

        assert!(matches!(interpret_reply(&raw), Err(SubmitError::Decode(_))));
    }

    #[test]
    fn empty_server_message_falls_back_to_default() {
        let raw = RawReply {
            status: 200,
            body: r#"{"success": true, "message": ""}"#.to_string(),
        };
        let feedback = Feedback::for_result(&interpret_reply(&raw));

        assert_eq!(feedback.message, DEFAULT_SUCCESS_MESSAGE);
    }

    #[tokio::test]
    async fn blank_required_field_never_reaches_transport() {
        let mut form = ContactForm::default();
        let transport = CannedTransport::replying(200, r#"{"success": true}"#);
        let mut fields = complete_fields();
        fields[0].value = String::new();

        let feedback = submit(&mut form, &transport, &fields).await;

        assert_eq!(transport.calls.get(), 0);
        assert_eq!(feedback.kind, NotificationKind::Error);
        assert_eq!(feedback.message, INVALID_FORM_MESSAGE);
        assert_eq!(form.phase, FormPhase::Idle);
    }

    #[tokio::test]
    async fn malformed_email_is_rejected_locally() {
        let mut form = ContactForm::default();
        let transport = CannedTransport::replying(200, r#"{"success": true}"#);
        let mut fields = complete_fields();
        fields[1].value = "foo".to_string();

        let feedback = submit(&mut form, &transport, &fields).await;

        assert_eq!(transport.calls.get(), 0);
        assert_eq!(feedback.kind, NotificationKind::Error);
    }

    #[tokio::test]
    async fn accepted_reply_resets_form_with_server_message() {
        let mut form = ContactForm::default();
        let transport = CannedTransport::replying(200, r#"{"success": true, "message": "OK"}"#);

        let feedback = submit(&mut form, &transport, &complete_fields()).await;

        assert_eq!(transport.calls.get(), 1);
        assert_eq!(
            feedback,
            Feedback {
                message: "OK".to_string(),
                kind: NotificationKind::Success,
                reset_form: true,
            }
        );
        assert_eq!(form.phase, FormPhase::Idle);
    }

    #[tokio::test]
    async fn rejected_reply_keeps_values_and_shows_server_message() {
        let mut form = ContactForm::default();
        let transport = CannedTransport::replying(200, r#"{"success": false, "message": "Bad"}"#);

        let feedback = submit(&mut form, &transport, &complete_fields()).await;

        assert_eq!(feedback.kind, NotificationKind::Error);
        assert_eq!(feedback.message, "Bad");
        assert!(!feedback.reset_form);
    }

    #[tokio::test]
    async fn transport_failure_uses_generic_network_message() {
        let mut form = ContactForm::default();
        let transport = CannedTransport::failing();

        let feedback = submit(&mut form, &transport, &complete_fields()).await;

        assert_eq!(feedback.message, NETWORK_ERROR_MESSAGE);
        assert!(!feedback.reset_form);
        assert_eq!(form.phase, FormPhase::Idle);
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let mut form = ContactForm::default();

        assert_eq!(form.begin(&complete_fields()), SubmitAttempt::Ready);
        assert_eq!(form.begin(&complete_fields()), SubmitAttempt::Busy);
    }

    #[test]
    fn completeness_requires_all_four_fields() {
        let payload = ContactPayload {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            subject: " ".to_string(),
            message: "Hello".to_string(),
        };

        assert!(payload.is_complete());
        assert!(!payload.trimmed().is_complete());
    }

    #[test]
    fn reply_without_success_flag_shows_server_message_as_error() {
        let raw = RawReply {
            status: 200,
            body: r#"{"message": "Bad"}"#.to_string(),
        };

        let outcome = interpret_reply(&raw);
        assert_eq!(outcome, Ok(SubmitOutcome::Rejected(Some("Bad".to_string()))));

        let feedback = Feedback::for_result(&outcome);
        assert_eq!(feedback.kind, NotificationKind::Error);
        assert_eq!(feedback.message, "Bad");
    }

    #[tokio::test]
    async fn submit_button_is_restored_after_every_outcome() {
        let transports = [
            ("accepted", CannedTransport::replying(200, r#"{"success": true}"#)),
            ("rejected", CannedTransport::replying(200, r#"{"success": false, "message": "Bad"}"#)),
            ("transport", CannedTransport::failing()),
            ("status", CannedTransport::replying(503, "")),
            ("decode", CannedTransport::replying(200, "<html>oops</html>")),
        ];

        for (case, transport) in transports {
            let button = FakeButton::labelled("Send Message");

            send_with_button(&transport, &button).await;

            assert_eq!(transport.calls.get(), 1, "{case}");
            assert!(!button.disabled.get(), "{case}: button left disabled");
            assert_eq!(button.label.borrow().as_deref(), Some("Send Message"), "{case}");
        }
    }

    #[test]
    fn guard_restores_a_button_without_label() {
        let button = Rc::new(FakeButton::default());

        let guard = SubmitGuard::engage(Rc::clone(&button));
        assert_eq!(button.label.borrow().as_deref(), Some(SENDING_LABEL));
        drop(guard);

        assert_eq!(*button.label.borrow(), None);
        assert!(!button.disabled.get());
    }
}
