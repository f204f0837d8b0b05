use gloo::events::EventListener;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement};

use crate::frontend::dom::{self, DomError};
use crate::frontend::timer::TimerSlot;
use crate::site::notification::{
    NotificationKind, NotificationSlot, ToastId, AUTO_HIDE_MS, NOTIFICATION_SELECTOR, SLIDE_IN_DELAY_MS,
    SLIDE_OUT_MS,
};
use crate::telemetry::{log_event, LogLevel};

const TOAST_STYLE: &str = "position: fixed; top: 20px; right: 20px; color: white; \
    padding: 1rem 1.5rem; border-radius: 8px; box-shadow: 0 4px 12px rgba(0, 0, 0, 0.15); \
    z-index: 1000; display: flex; align-items: center; gap: 1rem; font-weight: 500; \
    transform: translateX(100%); transition: transform 0.3s ease;";
const CLOSE_BUTTON_STYLE: &str = "background: none; border: none; color: white; font-size: 1.5rem; \
    cursor: pointer; padding: 0; margin-left: 0.5rem;";

struct Toast {
    element: HtmlElement,
    _close_listener: EventListener,
    slide_in: TimerSlot,
    auto_hide: TimerSlot,
    removal: TimerSlot,
}

impl Toast {
    fn remove_now(&self) {
        if self.element.is_connected() {
            self.element.remove();
        }
    }
}

/// Transient toast messages; at most one is on screen.
pub struct NotificationPresenter {
    document: Document,
    slot: RefCell<NotificationSlot<Toast>>,
}

impl NotificationPresenter {
    pub fn new(document: &Document) -> Rc<Self> {
        Rc::new(Self {
            document: document.clone(),
            slot: RefCell::new(NotificationSlot::default()),
        })
    }

    pub fn show(self: &Rc<Self>, message: &str, kind: NotificationKind) {
        if let Err(error) = self.try_show(message, kind) {
            log_event(
                LogLevel::Error,
                "notification_render_failed",
                serde_json::json!({ "message": error.to_string() }),
            );
        }
    }

    fn try_show(self: &Rc<Self>, message: &str, kind: NotificationKind) -> Result<(), DomError> {
        for stray in dom::find_all(&self.document, NOTIFICATION_SELECTOR) {
            stray.remove();
        }

        let body = self.document.body().ok_or_else(|| DomError::MissingElement("body".to_string()))?;
        let element: HtmlElement = self.document.create_element("div")?.unchecked_into();
        element.set_class_name(&kind.class_name());
        element.style().set_css_text(TOAST_STYLE);
        dom::set_style(&element, "background", kind.background());

        let text = self.document.create_element("span")?;
        text.set_class_name("notification__message");
        text.set_text_content(Some(message));

        let close: HtmlElement = self.document.create_element("button")?.unchecked_into();
        close.set_class_name("notification__close");
        let _ = close.set_attribute("type", "button");
        let _ = close.set_attribute("aria-label", "Dismiss notification");
        close.set_text_content(Some("\u{d7}"));
        close.style().set_css_text(CLOSE_BUTTON_STYLE);

        element.append_child(&text)?;
        element.append_child(&close)?;
        body.append_child(&element)?;

        // The id is only known once the toast is in the slot, so the close
        // listener looks it up through a shared cell.
        let id_cell: Rc<RefCell<Option<ToastId>>> = Rc::new(RefCell::new(None));
        let close_listener = {
            let presenter = Rc::clone(self);
            let id_cell = Rc::clone(&id_cell);
            EventListener::new(&close, "click", move |_event: &Event| {
                if let Some(id) = *id_cell.borrow() {
                    presenter.hide(id);
                }
            })
        };

        let toast = Toast {
            element,
            _close_listener: close_listener,
            slide_in: TimerSlot::default(),
            auto_hide: TimerSlot::default(),
            removal: TimerSlot::default(),
        };

        let (id, evicted) = self.slot.borrow_mut().show(toast);
        *id_cell.borrow_mut() = Some(id);
        if let Some(previous) = evicted {
            previous.remove_now();
        }

        let slot = self.slot.borrow();
        if let Some(toast) = slot.current() {
            let element = toast.element.clone();
            toast.slide_in.schedule(SLIDE_IN_DELAY_MS, move || {
                dom::set_style(&element, "transform", "translateX(0)");
            });

            let presenter = Rc::clone(self);
            toast.auto_hide.schedule(AUTO_HIDE_MS, move || presenter.hide(id));
        }

        Ok(())
    }

    /// Slides the toast out and removes it once the transition is over.
    /// Hiding a toast that is already gone or replaced does nothing.
    pub fn hide(self: &Rc<Self>, id: ToastId) {
        let mut slot = self.slot.borrow_mut();
        let Some(toast) = slot.current_mut(id) else {
            return;
        };

        dom::set_style(&toast.element, "transform", "translateX(100%)");
        let presenter = Rc::clone(self);
        toast.removal.schedule(SLIDE_OUT_MS, move || {
            let finished = presenter.slot.borrow_mut().dismiss(id);
            if let Some(toast) = finished {
                toast.remove_now();
            }
        });
    }

    /// Drops the live toast, cancelling its timers.
    pub fn clear(&self) {
        let taken = self.slot.borrow_mut().take();
        if let Some(toast) = taken {
            toast.remove_now();
        }
    }
}
