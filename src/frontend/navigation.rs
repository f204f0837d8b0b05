use gloo::events::{EventListener, EventListenerOptions};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlElement, KeyboardEvent, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition,
};

use crate::frontend::dom::{self, DomError};
use crate::frontend::timer::{Debouncer, TimerSlot};
use crate::site::navigation::{
    active_section, nav_link_selector, NavMenuState, SectionBounds, ACTIVE_LINK_CLASS,
    FIRST_LINK_FOCUS_DELAY_MS, IN_PAGE_ANCHOR_SELECTOR, MENU_OPEN_CLASS, NAV_CLOSE_ID, NAV_LINK_SELECTOR,
    NAV_MENU_ID, NAV_TOGGLE_ID, SECTION_SELECTOR,
};
use crate::site::scroll::SCROLL_DEBOUNCE_MS;
use crate::telemetry::{log_event, LogLevel};

struct TrackedSection {
    element: HtmlElement,
    id: String,
    link: Option<Element>,
}

/// Mobile menu, active-link highlighting and in-page anchor scrolling.
pub struct NavigationController {
    document: Document,
    menu: Element,
    toggle: HtmlElement,
    close: Option<HtmlElement>,
    links: Vec<HtmlElement>,
    sections: Vec<TrackedSection>,
    state: Cell<NavMenuState>,
    focus_timer: TimerSlot,
    scroll_debounce: Debouncer,
    listeners: RefCell<Vec<EventListener>>,
}

impl NavigationController {
    pub fn attach(document: &Document) -> Result<Rc<Self>, DomError> {
        let menu = document
            .get_element_by_id(NAV_MENU_ID)
            .ok_or_else(|| DomError::MissingElement(format!("#{NAV_MENU_ID}")))?;
        let toggle = dom::by_id_as::<HtmlElement>(document, NAV_TOGGLE_ID)
            .ok_or_else(|| DomError::MissingElement(format!("#{NAV_TOGGLE_ID}")))?;
        let close = dom::by_id_as::<HtmlElement>(document, NAV_CLOSE_ID);
        let links = dom::find_all(document, NAV_LINK_SELECTOR)
            .into_iter()
            .filter_map(|element| element.dyn_into::<HtmlElement>().ok())
            .collect();

        let sections = dom::find_all(document, SECTION_SELECTOR)
            .into_iter()
            .filter_map(|element| {
                let id = element.get_attribute("id").filter(|id| !id.is_empty())?;
                let link = dom::find(document, &nav_link_selector(&id));
                if link.is_none() {
                    log_event(
                        LogLevel::Debug,
                        "nav_section_without_link",
                        serde_json::json!({ "section_id": id }),
                    );
                }
                let element = element.dyn_into::<HtmlElement>().ok()?;
                Some(TrackedSection { element, id, link })
            })
            .collect();

        let controller = Rc::new(Self {
            document: document.clone(),
            menu,
            toggle,
            close,
            links,
            sections,
            state: Cell::new(NavMenuState::default()),
            focus_timer: TimerSlot::default(),
            scroll_debounce: Debouncer::new(SCROLL_DEBOUNCE_MS),
            listeners: RefCell::new(Vec::new()),
        });
        controller.install_listeners()?;
        controller.update_active_link();
        Ok(controller)
    }

    fn install_listeners(self: &Rc<Self>) -> Result<(), DomError> {
        let mut listeners = Vec::new();

        let controller = Rc::clone(self);
        listeners.push(EventListener::new(&self.toggle, "click", move |_event: &Event| {
            controller.toggle_menu();
        }));

        if let Some(close) = self.close.as_ref() {
            let controller = Rc::clone(self);
            listeners.push(EventListener::new(close, "click", move |_event: &Event| {
                controller.close_menu(false);
            }));
        }

        for link in &self.links {
            let controller = Rc::clone(self);
            listeners.push(EventListener::new(link, "click", move |_event: &Event| {
                controller.close_menu(false);
            }));
        }

        let controller = Rc::clone(self);
        listeners.push(EventListener::new(&self.document, "keydown", move |event: &Event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if event.key() == "Escape" {
                controller.close_menu(true);
            }
        }));

        for anchor in dom::find_all(&self.document, IN_PAGE_ANCHOR_SELECTOR) {
            let document = self.document.clone();
            let href = anchor.get_attribute("href").unwrap_or_default();
            listeners.push(EventListener::new_with_options(
                &anchor,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event: &Event| {
                    event.prevent_default();
                    scroll_to_fragment(&document, &href);
                },
            ));
        }

        let window = dom::browser_window()?;
        let controller = Rc::clone(self);
        listeners.push(EventListener::new(&window, "scroll", move |_event: &Event| {
            let target = Rc::clone(&controller);
            controller
                .scroll_debounce
                .call(move || target.update_active_link());
        }));

        *self.listeners.borrow_mut() = listeners;
        Ok(())
    }

    fn toggle_menu(self: &Rc<Self>) {
        let mut state = self.state.get();
        let open = state.toggle();
        self.state.set(state);
        dom::set_class(&self.menu, MENU_OPEN_CLASS, open);

        if open {
            let menu = self.menu.clone();
            self.focus_timer.schedule(FIRST_LINK_FOCUS_DELAY_MS, move || {
                if let Some(first) = dom::find_in_as::<HtmlElement>(&menu, NAV_LINK_SELECTOR) {
                    let _ = first.focus();
                }
            });
        } else {
            self.focus_timer.cancel();
        }
    }

    fn close_menu(&self, restore_focus: bool) {
        let mut state = self.state.get();
        // The class is the source of truth when markup opened the menu.
        let was_open = state.close() || dom::has_class(&self.menu, MENU_OPEN_CLASS);
        self.state.set(state);
        if !was_open {
            return;
        }

        self.focus_timer.cancel();
        dom::set_class(&self.menu, MENU_OPEN_CLASS, false);
        if restore_focus {
            let _ = self.toggle.focus();
        }
    }

    fn update_active_link(&self) {
        let bounds: Vec<SectionBounds> = self
            .sections
            .iter()
            .map(|section| {
                SectionBounds::new(
                    section.id.clone(),
                    f64::from(section.element.offset_top()),
                    f64::from(section.element.offset_height()),
                )
            })
            .collect();
        let active = active_section(&bounds, dom::scroll_y());

        for (index, section) in self.sections.iter().enumerate() {
            if let Some(link) = section.link.as_ref() {
                dom::set_class(link, ACTIVE_LINK_CLASS, active == Some(index));
            }
        }
    }

    pub fn detach(&self) {
        self.listeners.borrow_mut().clear();
        self.focus_timer.cancel();
        self.scroll_debounce.cancel();
    }
}

fn scroll_to_fragment(document: &Document, href: &str) {
    // A bare "#" is not a valid selector.
    if href.len() <= 1 {
        return;
    }

    let Some(target) = dom::find(document, href) else {
        log_event(
            LogLevel::Debug,
            "anchor_target_missing",
            serde_json::json!({ "href": href }),
        );
        return;
    };

    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}
