use gloo::events::{EventListener, EventListenerOptions};
use gloo_net::http::Request;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlTextAreaElement, RequestCredentials,
};

use crate::frontend::dom::{self, DomError};
use crate::frontend::notification::NotificationPresenter;
use crate::site::contact::{
    deliver, ContactForm, ContactPayload, ContactTransport, FieldInput, Feedback, RawReply, SubmitAttempt,
    SubmitControl, SubmitError, SubmitGuard, CONTACT_ENDPOINT, CONTACT_FORM_ID, CSRF_FIELD_SELECTOR, CSRF_HEADER,
    FORM_INPUT_SELECTOR, SUBMIT_BUTTON_SELECTOR,
};
use crate::telemetry::{log_event, LogLevel};

const INVALID_BORDER: &str = "#ef4444";
const INVALID_BACKGROUND: &str = "rgba(239, 68, 68, 0.05)";
const VALID_BORDER: &str = "var(--border-color)";
const VALID_BACKGROUND: &str = "var(--container-color)";

/// Posts the contact payload to the site's AJAX endpoint.
struct FetchTransport;

impl ContactTransport for FetchTransport {
    async fn post_contact(&self, payload: &ContactPayload, csrf_token: &str) -> Result<RawReply, SubmitError> {
        let response = Request::post(CONTACT_ENDPOINT)
            .header(CSRF_HEADER, csrf_token)
            .credentials(RequestCredentials::SameOrigin)
            .json(payload)
            .map_err(|error| SubmitError::Transport(error.to_string()))?
            .send()
            .await
            .map_err(|error| SubmitError::Transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| SubmitError::Transport(error.to_string()))?;

        Ok(RawReply { status, body })
    }
}

impl SubmitControl for HtmlButtonElement {
    fn label(&self) -> Option<String> {
        self.text_content()
    }

    fn set_label(&self, label: Option<&str>) {
        self.set_text_content(label);
    }

    fn set_disabled(&self, disabled: bool) {
        HtmlButtonElement::set_disabled(self, disabled);
    }
}

struct FormControl {
    element: HtmlElement,
    input: FieldInput,
}

pub struct ContactFormWidget {
    document: Document,
    form: HtmlFormElement,
    submit_button: Option<HtmlButtonElement>,
    presenter: Rc<NotificationPresenter>,
    machine: RefCell<ContactForm>,
    listeners: RefCell<Vec<EventListener>>,
}

impl ContactFormWidget {
    pub fn attach(document: &Document, presenter: Rc<NotificationPresenter>) -> Result<Rc<Self>, DomError> {
        let form = dom::by_id_as::<HtmlFormElement>(document, CONTACT_FORM_ID)
            .ok_or_else(|| DomError::MissingElement(format!("#{CONTACT_FORM_ID}")))?;
        let submit_button = dom::find_in_as::<HtmlButtonElement>(&form, SUBMIT_BUTTON_SELECTOR);

        let widget = Rc::new(Self {
            document: document.clone(),
            form,
            submit_button,
            presenter,
            machine: RefCell::new(ContactForm::default()),
            listeners: RefCell::new(Vec::new()),
        });

        let handle = Rc::clone(&widget);
        let listener = EventListener::new_with_options(
            &widget.form,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                event.prevent_default();
                handle.submit();
            },
        );
        widget.listeners.borrow_mut().push(listener);
        Ok(widget)
    }

    fn submit(self: &Rc<Self>) {
        let controls = self.controls();
        let fields: Vec<FieldInput> = controls.iter().map(|control| control.input.clone()).collect();

        let attempt = self.machine.borrow_mut().begin(&fields);
        match attempt {
            SubmitAttempt::Busy => {}
            SubmitAttempt::Invalid(error) => {
                annotate(&controls, &error.invalid_fields);
                log_event(
                    LogLevel::Debug,
                    "contact_validation_failed",
                    serde_json::json!({ "invalid_fields": error.invalid_fields }),
                );
                let feedback = Feedback::invalid_form();
                self.presenter.show(&feedback.message, feedback.kind);
            }
            SubmitAttempt::Ready => {
                annotate(&controls, &[]);
                self.send();
            }
        }
    }

    fn send(self: &Rc<Self>) {
        let payload = ContactPayload::from_lookup(|id| {
            dom::find_in(&self.form, &format!("#{id}")).and_then(|element| control_value(&element))
        });
        let csrf_token = self.csrf_token();
        let guard = self.submit_button.clone().map(SubmitGuard::engage);
        let widget = Rc::clone(self);

        spawn_local(async move {
            let _guard = guard;
            let result = deliver(&FetchTransport, &payload, &csrf_token).await;

            if let Err(error) = &result {
                log_event(
                    LogLevel::Error,
                    "contact_submit_failed",
                    serde_json::json!({
                        "error_class": error.class(),
                        "message": error.to_string(),
                    }),
                );
            }

            let feedback = widget.machine.borrow_mut().finish(&result);
            if feedback.reset_form {
                widget.form.reset();
            }
            widget.presenter.show(&feedback.message, feedback.kind);
        });
    }

    fn controls(&self) -> Vec<FormControl> {
        dom::find_all_in(&self.form, FORM_INPUT_SELECTOR)
            .into_iter()
            .filter_map(|element| {
                let value = control_value(&element)?;
                let mut input = FieldInput::new(value);
                input.required = element.has_attribute("required");
                input.is_email = element
                    .get_attribute("type")
                    .is_some_and(|kind| kind.eq_ignore_ascii_case("email"));
                let element = element.dyn_into::<HtmlElement>().ok()?;
                Some(FormControl { element, input })
            })
            .collect()
    }

    fn csrf_token(&self) -> String {
        match dom::find_as::<HtmlInputElement>(&self.document, CSRF_FIELD_SELECTOR) {
            Some(field) => field.value(),
            None => {
                log_event(LogLevel::Warn, "csrf_token_missing", serde_json::json!({}));
                String::new()
            }
        }
    }

    pub fn detach(&self) {
        self.listeners.borrow_mut().clear();
    }
}

fn control_value(element: &Element) -> Option<String> {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    element
        .dyn_ref::<HtmlTextAreaElement>()
        .map(HtmlTextAreaElement::value)
}

fn annotate(controls: &[FormControl], invalid: &[usize]) {
    for (index, control) in controls.iter().enumerate() {
        let (border, background) = if invalid.contains(&index) {
            (INVALID_BORDER, INVALID_BACKGROUND)
        } else {
            (VALID_BORDER, VALID_BACKGROUND)
        };
        dom::set_style(&control.element, "border-color", border);
        dom::set_style(&control.element, "background-color", background);
    }
}
