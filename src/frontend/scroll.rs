use gloo::events::EventListener;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use web_sys::{Document, Element, Event, ScrollBehavior, ScrollToOptions, Window};

use crate::frontend::dom::{self, DomError};
use crate::frontend::timer::{Debouncer, TimerSlot};
use crate::site::scroll::{
    header_is_scrolled, ScrollTopAction, ScrollTopState, HEADER_ID, HEADER_SCROLLED_CLASS,
    SCROLL_DEBOUNCE_MS, SCROLL_TOP_ID, SCROLL_TOP_IDLE_HIDE_MS, SCROLL_TOP_VISIBLE_CLASS,
};

/// Header background swap driven by scroll offset.
pub struct HeaderEffect {
    header: Element,
    debounce: Debouncer,
    listeners: RefCell<Vec<EventListener>>,
}

impl HeaderEffect {
    pub fn attach(window: &Window, document: &Document) -> Result<Rc<Self>, DomError> {
        let header = document
            .get_element_by_id(HEADER_ID)
            .ok_or_else(|| DomError::MissingElement(format!("#{HEADER_ID}")))?;

        let effect = Rc::new(Self {
            header,
            debounce: Debouncer::new(SCROLL_DEBOUNCE_MS),
            listeners: RefCell::new(Vec::new()),
        });

        let handle = Rc::clone(&effect);
        let listener = EventListener::new(window, "scroll", move |_event: &Event| {
            let target = Rc::clone(&handle);
            handle.debounce.call(move || target.refresh());
        });
        effect.listeners.borrow_mut().push(listener);
        effect.refresh();
        Ok(effect)
    }

    fn refresh(&self) {
        dom::set_class(&self.header, HEADER_SCROLLED_CLASS, header_is_scrolled(dom::scroll_y()));
    }

    pub fn detach(&self) {
        self.listeners.borrow_mut().clear();
        self.debounce.cancel();
    }
}

/// Floating "back to top" button that hides itself after a quiet period.
pub struct ScrollTopButton {
    window: Window,
    button: Element,
    state: Cell<ScrollTopState>,
    debounce: Debouncer,
    hide_timer: TimerSlot,
    listeners: RefCell<Vec<EventListener>>,
}

impl ScrollTopButton {
    pub fn attach(window: &Window, document: &Document) -> Result<Rc<Self>, DomError> {
        let button = document
            .get_element_by_id(SCROLL_TOP_ID)
            .ok_or_else(|| DomError::MissingElement(format!("#{SCROLL_TOP_ID}")))?;

        let widget = Rc::new(Self {
            window: window.clone(),
            button,
            state: Cell::new(ScrollTopState::default()),
            debounce: Debouncer::new(SCROLL_DEBOUNCE_MS),
            hide_timer: TimerSlot::default(),
            listeners: RefCell::new(Vec::new()),
        });

        let mut listeners = Vec::new();
        let handle = Rc::clone(&widget);
        listeners.push(EventListener::new(window, "scroll", move |_event: &Event| {
            let target = Rc::clone(&handle);
            handle.debounce.call(move || target.refresh());
        }));

        let handle = Rc::clone(&widget);
        listeners.push(EventListener::new(&widget.button, "click", move |_event: &Event| {
            handle.scroll_to_top();
        }));
        *widget.listeners.borrow_mut() = listeners;

        Ok(widget)
    }

    fn refresh(self: &Rc<Self>) {
        let mut state = self.state.get();
        let action = state.on_scroll(dom::scroll_y());
        self.state.set(state);

        match action {
            ScrollTopAction::ShowAndRearm => {
                let widget = Rc::clone(self);
                self.hide_timer.schedule(SCROLL_TOP_IDLE_HIDE_MS, move || {
                    let mut state = widget.state.get();
                    state.on_idle_timeout();
                    widget.state.set(state);
                    widget.sync_class();
                });
            }
            ScrollTopAction::HideNow => self.hide_timer.cancel(),
        }
        self.sync_class();
    }

    fn sync_class(&self) {
        dom::set_class(&self.button, SCROLL_TOP_VISIBLE_CLASS, self.state.get().is_visible());
    }

    fn scroll_to_top(&self) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    pub fn detach(&self) {
        self.listeners.borrow_mut().clear();
        self.debounce.cancel();
        self.hide_timer.cancel();
    }
}
