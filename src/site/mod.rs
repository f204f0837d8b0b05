//! Widget state and page rules shared by the browser build and the preview
//! server. Nothing in here touches the DOM.

// The preview server reads only the contact wire types; everything else
// here backs a browser widget.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub mod contact;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub mod modal;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub mod navigation;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub mod notification;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub mod projects;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub mod reveal;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub mod scroll;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub mod theme;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub mod video;
