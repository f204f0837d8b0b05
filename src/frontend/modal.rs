use gloo::events::{EventListener, EventListenerOptions};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, HtmlImageElement, KeyboardEvent, Node};

use crate::frontend::dom::{self, DomError};
use crate::frontend::timer::TimerSlot;
use crate::site::modal::{
    trigger_project_id, ModalState, ACTIVATE_DELAY_MS, CLOSE_TRANSITION_MS, MODAL_ACTIVE_CLASS,
    MODAL_CATEGORY_SELECTOR, MODAL_CLIENT_SELECTOR, MODAL_CLOSE_SELECTOR, MODAL_DATE_SELECTOR,
    MODAL_DESCRIPTION_SELECTOR, MODAL_IMAGE_SELECTOR, MODAL_SELECTOR, MODAL_TITLE_SELECTOR, PROJECT_CARD_SELECTOR,
    PROJECT_ID_ATTRIBUTE, READ_MORE_SELECTOR,
};
use crate::site::projects::ProjectRecord;
use crate::telemetry::{log_event, LogLevel};

/// Project detail overlay opened from the "read more" buttons.
pub struct ProjectModal {
    document: Document,
    overlay: HtmlElement,
    state: RefCell<ModalState>,
    // Shared by activation and close so a reopen supersedes a pending hide.
    transition: TimerSlot,
    listeners: RefCell<Vec<EventListener>>,
}

impl ProjectModal {
    pub fn attach(document: &Document) -> Result<Rc<Self>, DomError> {
        let overlay = dom::require_as::<HtmlElement>(document, MODAL_SELECTOR, "HTMLElement")?;

        let modal = Rc::new(Self {
            document: document.clone(),
            overlay,
            state: RefCell::new(ModalState::default()),
            transition: TimerSlot::default(),
            listeners: RefCell::new(Vec::new()),
        });
        modal.install_listeners();
        Ok(modal)
    }

    fn install_listeners(self: &Rc<Self>) {
        let mut listeners = Vec::new();
        let options = EventListenerOptions::enable_prevent_default();

        for button in dom::find_all(&self.document, READ_MORE_SELECTOR) {
            let modal = Rc::clone(self);
            let trigger = button.clone();
            listeners.push(EventListener::new_with_options(&button, "click", options, move |event: &Event| {
                event.prevent_default();
                match project_id_for(&trigger) {
                    Some(project_id) => modal.open(&project_id),
                    None => log_event(
                        LogLevel::Warn,
                        "project_trigger_without_id",
                        serde_json::json!({ "selector": READ_MORE_SELECTOR }),
                    ),
                }
            }));
        }

        if let Some(close) = dom::find_in(&self.overlay, MODAL_CLOSE_SELECTOR) {
            let modal = Rc::clone(self);
            listeners.push(EventListener::new_with_options(&close, "click", options, move |event: &Event| {
                event.prevent_default();
                modal.close();
            }));
        }

        let modal = Rc::clone(self);
        listeners.push(EventListener::new(&self.overlay, "click", move |event: &Event| {
            let Some(target) = event.target().and_then(|target| target.dyn_into::<Node>().ok()) else {
                return;
            };
            // Only clicks on the backdrop itself, not on the dialog content.
            if modal.overlay.is_same_node(Some(&target)) {
                modal.close();
            }
        }));

        let modal = Rc::clone(self);
        listeners.push(EventListener::new(&self.document, "keydown", move |event: &Event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if event.key() == "Escape" && modal.state.borrow().phase().is_visible() {
                modal.close();
            }
        }));

        *self.listeners.borrow_mut() = listeners;
    }

    pub fn open(self: &Rc<Self>, project_id: &str) {
        let opened = self.state.borrow_mut().open(project_id);
        let record = match opened {
            Ok(record) => record,
            Err(error) => {
                log_event(
                    LogLevel::Warn,
                    "project_lookup_failed",
                    serde_json::json!({ "project_id": project_id, "message": error.to_string() }),
                );
                return;
            }
        };

        self.populate(record);
        dom::set_style(&self.overlay, "display", "block");
        self.set_body_overflow("hidden");

        let modal = Rc::clone(self);
        self.transition.schedule(ACTIVATE_DELAY_MS, move || {
            if modal.state.borrow_mut().activate() {
                dom::set_class(&modal.overlay, MODAL_ACTIVE_CLASS, true);
            }
        });
    }

    pub fn close(self: &Rc<Self>) {
        let mut state = self.state.borrow_mut();
        if !state.begin_close() {
            return;
        }
        log_event(
            LogLevel::Debug,
            "project_modal_closing",
            serde_json::json!({ "project_id": state.project().map(|record| record.id) }),
        );
        drop(state);
        dom::set_class(&self.overlay, MODAL_ACTIVE_CLASS, false);

        let modal = Rc::clone(self);
        self.transition.schedule(CLOSE_TRANSITION_MS, move || {
            if modal.state.borrow_mut().finish_close() {
                dom::set_style(&modal.overlay, "display", "none");
                modal.set_body_overflow("");
            }
        });
    }

    fn populate(&self, record: &ProjectRecord) {
        let text_slots = [
            (MODAL_TITLE_SELECTOR, record.title),
            (MODAL_CATEGORY_SELECTOR, record.category),
            (MODAL_DESCRIPTION_SELECTOR, record.description),
            (MODAL_CLIENT_SELECTOR, record.client),
            (MODAL_DATE_SELECTOR, record.date),
        ];
        for (selector, text) in text_slots {
            if let Some(element) = dom::find_in(&self.overlay, selector) {
                element.set_text_content(Some(text));
            }
        }

        if let Some(image) = dom::find_in_as::<HtmlImageElement>(&self.overlay, MODAL_IMAGE_SELECTOR) {
            image.set_src(record.image_url);
            image.set_alt(record.title);
        }
    }

    fn set_body_overflow(&self, value: &str) {
        if let Some(body) = self.document.body() {
            dom::set_style(&body, "overflow", value);
        }
    }

    pub fn detach(&self) {
        self.listeners.borrow_mut().clear();
        self.transition.cancel();
    }
}

fn project_id_for(trigger: &Element) -> Option<String> {
    trigger_project_id(trigger.get_attribute(PROJECT_ID_ATTRIBUTE), || {
        trigger
            .closest(PROJECT_CARD_SELECTOR)
            .ok()
            .flatten()
            .and_then(|card| card.get_attribute(PROJECT_ID_ATTRIBUTE))
    })
}
