use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, Document, Element, HtmlElement, NodeList, Window};

#[derive(Debug, Error)]
pub enum DomError {
    #[error("browser window is unavailable")]
    NoWindow,
    #[error("document is unavailable")]
    NoDocument,
    #[error("missing element `{0}`")]
    MissingElement(String),
    #[error("element `{selector}` is not a {expected}")]
    WrongElementType {
        selector: String,
        expected: &'static str,
    },
    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

pub fn browser_window() -> Result<Window, DomError> {
    window().ok_or(DomError::NoWindow)
}

pub fn browser_document() -> Result<Document, DomError> {
    browser_window()?.document().ok_or(DomError::NoDocument)
}

pub fn find(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub fn find_in(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

pub fn find_as<T: JsCast>(document: &Document, selector: &str) -> Option<T> {
    find(document, selector).and_then(|element| element.dyn_into::<T>().ok())
}

pub fn find_in_as<T: JsCast>(root: &Element, selector: &str) -> Option<T> {
    find_in(root, selector).and_then(|element| element.dyn_into::<T>().ok())
}

pub fn require_as<T: JsCast>(document: &Document, selector: &str, expected: &'static str) -> Result<T, DomError> {
    find(document, selector)
        .ok_or_else(|| DomError::MissingElement(selector.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| DomError::WrongElementType {
            selector: selector.to_string(),
            expected,
        })
}

pub fn by_id_as<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<T>().ok())
}

pub fn find_all(document: &Document, selector: &str) -> Vec<Element> {
    document
        .query_selector_all(selector)
        .map(|nodes| elements_of(&nodes))
        .unwrap_or_default()
}

pub fn find_all_in(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(|nodes| elements_of(&nodes))
        .unwrap_or_default()
}

fn elements_of(nodes: &NodeList) -> Vec<Element> {
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

pub fn set_class(element: &Element, class: &str, enabled: bool) {
    let classes = element.class_list();
    let _ = if enabled {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
}

pub fn has_class(element: &Element, class: &str) -> bool {
    element.class_list().contains(class)
}

pub fn scroll_y() -> f64 {
    window()
        .and_then(|win| win.scroll_y().ok())
        .unwrap_or(0.0)
}
