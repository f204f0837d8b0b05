use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::frontend::dom::{self, DomError};
use crate::frontend::observer::VisibilityObserver;
use crate::site::reveal::{
    hidden_style, reveal_selector_list, ANIMATION_STYLES, PLACEHOLDER_BACKGROUND, PLACEHOLDER_SELECTOR,
    PLACEHOLDER_TRANSITION, REVEALED_CLASS, REVEAL_ROOT_MARGIN, REVEAL_THRESHOLD, STYLE_ELEMENT_ID,
};
use crate::site::modal::PROJECT_CARD_SELECTOR;

/// One-shot enter animations plus the project-card placeholder tint. Each
/// element is unobserved as soon as it has been revealed.
pub struct RevealAnimator {
    reveal: VisibilityObserver,
    placeholders: VisibilityObserver,
}

impl RevealAnimator {
    pub fn attach(document: &Document) -> Result<Self, DomError> {
        install_animation_styles(document)?;

        let reveal = VisibilityObserver::new(REVEAL_THRESHOLD, Some(REVEAL_ROOT_MARGIN), |crossings, observer| {
            for crossing in crossings.into_iter().filter(|crossing| crossing.intersecting) {
                dom::set_class(&crossing.target, REVEALED_CLASS, true);
                observer.unobserve(&crossing.target);
            }
        })?;

        let selectors = reveal_selector_list();
        for (index, element) in dom::find_all(document, &selectors).into_iter().enumerate() {
            let Ok(element) = element.dyn_into::<HtmlElement>() else {
                continue;
            };
            for (property, value) in hidden_style(index) {
                dom::set_style(&element, property, &value);
            }
            reveal.observe(&element);
        }

        let placeholders = VisibilityObserver::new(0.0, None, |crossings, observer| {
            for crossing in crossings.into_iter().filter(|crossing| crossing.intersecting) {
                if let Some(placeholder) = dom::find_in_as::<HtmlElement>(&crossing.target, PLACEHOLDER_SELECTOR) {
                    dom::set_style(&placeholder, "background", PLACEHOLDER_BACKGROUND);
                    dom::set_style(&placeholder, "transition", PLACEHOLDER_TRANSITION);
                }
                observer.unobserve(&crossing.target);
            }
        })?;

        for card in dom::find_all(document, PROJECT_CARD_SELECTOR) {
            placeholders.observe(&card);
        }

        Ok(Self { reveal, placeholders })
    }

    /// Disconnects both observers; elements not yet revealed stay hidden.
    pub fn detach(self) {
        drop(self.reveal);
        drop(self.placeholders);
    }
}

fn install_animation_styles(document: &Document) -> Result<(), DomError> {
    if document.get_element_by_id(STYLE_ELEMENT_ID).is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| DomError::MissingElement("head".to_string()))?;
    let style = document.create_element("style")?;
    style.set_id(STYLE_ELEMENT_ID);
    style.set_text_content(Some(ANIMATION_STYLES));
    head.append_child(&style)?;
    Ok(())
}
