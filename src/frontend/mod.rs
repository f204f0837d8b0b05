mod contact;
mod dom;
mod modal;
mod navigation;
mod notification;
mod observer;
mod reveal;
mod scroll;
mod timer;
mod video;

use gloo::events::EventListener;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Event, PageTransitionEvent, Storage, Window};

use crate::site::theme::{resolve_theme, THEME_ATTRIBUTE, THEME_KEY};
use crate::telemetry::{log_event, LogLevel};
use contact::ContactFormWidget;
use dom::DomError;
use modal::ProjectModal;
use navigation::NavigationController;
use notification::NotificationPresenter;
use reveal::RevealAnimator;
use scroll::{HeaderEffect, ScrollTopButton};
use video::VideoController;

const SERVICE_WORKER_PATH: &str = "/sw.js";

/// Every widget mounted on the current page. Absent markup leaves a slot empty.
struct Page {
    navigation: Option<Rc<NavigationController>>,
    header: Option<Rc<HeaderEffect>>,
    scroll_top: Option<Rc<ScrollTopButton>>,
    contact: Option<Rc<ContactFormWidget>>,
    reveal: Option<RevealAnimator>,
    modal: Option<Rc<ProjectModal>>,
    video: Option<Rc<VideoController>>,
    notifications: Rc<NotificationPresenter>,
}

impl Page {
    fn mount(window: &Window, document: &Document) -> Self {
        let notifications = NotificationPresenter::new(document);

        Self {
            navigation: settle("navigation", NavigationController::attach(document)),
            header: settle("header", HeaderEffect::attach(window, document)),
            scroll_top: settle("scroll_top", ScrollTopButton::attach(window, document)),
            contact: settle(
                "contact_form",
                ContactFormWidget::attach(document, Rc::clone(&notifications)),
            ),
            reveal: settle("reveal", RevealAnimator::attach(document)),
            modal: settle("project_modal", ProjectModal::attach(document)),
            video: settle("video", VideoController::attach(document)),
            notifications,
        }
    }

    /// Breaks the listener cycles so every widget can be freed.
    fn teardown(mut self) {
        if let Some(widget) = self.navigation.take() {
            widget.detach();
        }
        if let Some(widget) = self.header.take() {
            widget.detach();
        }
        if let Some(widget) = self.scroll_top.take() {
            widget.detach();
        }
        if let Some(widget) = self.contact.take() {
            widget.detach();
        }
        if let Some(widget) = self.reveal.take() {
            widget.detach();
        }
        if let Some(widget) = self.modal.take() {
            widget.detach();
        }
        if let Some(widget) = self.video.take() {
            widget.detach();
        }
        self.notifications.clear();
    }
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

pub fn run() {
    let (window, document) = match browser_context() {
        Ok(context) => context,
        Err(error) => {
            log_event(
                LogLevel::Error,
                "frontend_boot_failed",
                serde_json::json!({ "message": error.to_string() }),
            );
            return;
        }
    };

    apply_stored_theme(&window, &document);
    register_service_worker(&window);

    let page = Page::mount(&window, &document);
    if let Some(previous) = PAGE.with(|slot| slot.borrow_mut().replace(page)) {
        previous.teardown();
    }

    // Restored bfcache pages keep their widgets.
    EventListener::new(&window, "pagehide", |event: &Event| {
        let persisted = event
            .dyn_ref::<PageTransitionEvent>()
            .is_some_and(PageTransitionEvent::persisted);
        if persisted {
            return;
        }
        if let Some(page) = PAGE.with(|slot| slot.borrow_mut().take()) {
            page.teardown();
        }
    })
    .forget();

    log_event(LogLevel::Debug, "frontend_ready", serde_json::json!({}));
}

fn browser_context() -> Result<(Window, Document), DomError> {
    Ok((dom::browser_window()?, dom::browser_document()?))
}

fn settle<T>(widget: &'static str, attached: Result<T, DomError>) -> Option<T> {
    match attached {
        Ok(mounted) => Some(mounted),
        Err(error) => {
            let level = match error {
                DomError::MissingElement(_) => LogLevel::Debug,
                _ => LogLevel::Error,
            };
            log_event(
                level,
                "widget_not_mounted",
                serde_json::json!({ "widget": widget, "message": error.to_string() }),
            );
            None
        }
    }
}

fn local_storage(window: &Window) -> Option<Storage> {
    window.local_storage().ok().flatten()
}

fn apply_stored_theme(window: &Window, document: &Document) {
    let stored = local_storage(window)
        .and_then(|storage| storage.get_item(THEME_KEY).ok().flatten());

    if let Some(root) = document.document_element() {
        let _ = root.set_attribute(THEME_ATTRIBUTE, &resolve_theme(stored));
    }
}

fn register_service_worker(window: &Window) {
    let navigator = window.navigator();
    if navigator.service_worker().is_undefined() {
        return;
    }

    spawn_local(async move {
        let registration = navigator.service_worker().register(SERVICE_WORKER_PATH);
        match JsFuture::from(registration).await {
            Ok(_) => log_event(
                LogLevel::Debug,
                "service_worker_registered",
                serde_json::json!({ "path": SERVICE_WORKER_PATH }),
            ),
            Err(error) => log_event(
                LogLevel::Warn,
                "service_worker_registration_failed",
                serde_json::json!({ "message": format!("{error:?}") }),
            ),
        }
    });
}
