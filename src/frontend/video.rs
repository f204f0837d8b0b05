use gloo::events::{EventListener, EventListenerOptions};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, Event, HtmlElement, HtmlVideoElement};

use crate::frontend::dom::{self, DomError};
use crate::frontend::observer::VisibilityObserver;
use crate::site::video::{
    progress_percent, IconPair, MediaCommand, VideoState, CONTROL_BUTTON_SELECTOR, MUTE_ICON_SELECTOR,
    MUTE_SELECTOR, PAUSE_ICON_SELECTOR, PLAY_ICON_SELECTOR, PLAY_PAUSE_SELECTOR, PROGRESS_BAR_SELECTOR,
    VIDEO_SELECTOR, VISIBILITY_THRESHOLD, VOLUME_ICON_SELECTOR,
};
use crate::telemetry::{log_event, LogLevel};

struct IconToggle {
    first: HtmlElement,
    second: HtmlElement,
}

impl IconToggle {
    fn find(document: &Document, first: &str, second: &str) -> Option<Self> {
        Some(Self {
            first: dom::find_as(document, first)?,
            second: dom::find_as(document, second)?,
        })
    }

    fn apply(&self, pair: IconPair) {
        let (first, second) = pair.displays();
        dom::set_style(&self.first, "display", first);
        dom::set_style(&self.second, "display", second);
    }
}

/// Custom controls for the showcase video.
pub struct VideoController {
    video: HtmlVideoElement,
    play_pause: Option<Element>,
    mute: Option<Element>,
    progress_bar: Option<HtmlElement>,
    play_pause_icons: Option<IconToggle>,
    volume_icons: Option<IconToggle>,
    state: Cell<VideoState>,
    // Set while a pause we issued for visibility is in flight, so the native
    // `pause` event does not clear `is_playing`.
    suspended: Cell<bool>,
    observer: RefCell<Option<VisibilityObserver>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl VideoController {
    pub fn attach(document: &Document) -> Result<Rc<Self>, DomError> {
        let video = dom::require_as::<HtmlVideoElement>(document, VIDEO_SELECTOR, "HTMLVideoElement")?;

        let controller = Rc::new(Self {
            video,
            play_pause: dom::find(document, PLAY_PAUSE_SELECTOR),
            mute: dom::find(document, MUTE_SELECTOR),
            progress_bar: dom::find_as(document, PROGRESS_BAR_SELECTOR),
            play_pause_icons: IconToggle::find(document, PLAY_ICON_SELECTOR, PAUSE_ICON_SELECTOR),
            volume_icons: IconToggle::find(document, VOLUME_ICON_SELECTOR, MUTE_ICON_SELECTOR),
            state: Cell::new(VideoState::default()),
            suspended: Cell::new(false),
            observer: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        });

        controller.sync_icons();
        controller.install_listeners();
        controller.observe_visibility()?;
        Ok(controller)
    }

    fn install_listeners(self: &Rc<Self>) {
        let mut listeners = Vec::new();
        let options = EventListenerOptions::enable_prevent_default();

        if let Some(button) = self.play_pause.as_ref() {
            let controller = Rc::clone(self);
            listeners.push(EventListener::new_with_options(button, "click", options, move |event: &Event| {
                event.prevent_default();
                event.stop_propagation();
                controller.toggle_play_pause();
            }));
        }

        if let Some(button) = self.mute.as_ref() {
            let controller = Rc::clone(self);
            listeners.push(EventListener::new_with_options(button, "click", options, move |event: &Event| {
                event.prevent_default();
                event.stop_propagation();
                controller.toggle_mute();
            }));
        }

        let controller = Rc::clone(self);
        listeners.push(EventListener::new_with_options(&self.video, "click", options, move |event: &Event| {
            let on_control = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|target| target.closest(CONTROL_BUTTON_SELECTOR).ok().flatten())
                .is_some();
            if on_control {
                return;
            }
            event.prevent_default();
            controller.toggle_play_pause();
        }));

        let controller = Rc::clone(self);
        listeners.push(EventListener::new(&self.video, "timeupdate", move |_event: &Event| {
            controller.update_progress();
        }));

        let controller = Rc::clone(self);
        listeners.push(EventListener::new(&self.video, "play", move |_event: &Event| {
            controller.suspended.set(false);
            controller.resync(true);
        }));

        let controller = Rc::clone(self);
        listeners.push(EventListener::new(&self.video, "pause", move |_event: &Event| {
            if controller.suspended.get() {
                return;
            }
            controller.resync(false);
        }));

        let controller = Rc::clone(self);
        listeners.push(EventListener::new(&self.video, "ended", move |_event: &Event| {
            controller.resync(false);
        }));

        let source = self.video.current_src();
        listeners.push(EventListener::new(&self.video, "error", move |_event: &Event| {
            log_event(LogLevel::Error, "video_load_failed", serde_json::json!({ "src": source }));
        }));

        *self.listeners.borrow_mut() = listeners;
    }

    fn observe_visibility(self: &Rc<Self>) -> Result<(), DomError> {
        let controller = Rc::downgrade(self);
        let observer = VisibilityObserver::new(VISIBILITY_THRESHOLD, None, move |crossings, _observer| {
            let Some(controller) = controller.upgrade() else {
                return;
            };
            for crossing in crossings {
                let command = controller
                    .state
                    .get()
                    .visibility_command(crossing.intersecting, controller.video.paused());
                match command {
                    Some(MediaCommand::Pause) => {
                        controller.suspended.set(true);
                        controller.pause();
                    }
                    Some(MediaCommand::Play) => controller.play("video_autoplay_failed"),
                    None => {}
                }
            }
        })?;
        observer.observe(&self.video);
        *self.observer.borrow_mut() = Some(observer);
        Ok(())
    }

    pub fn toggle_play_pause(&self) {
        let mut state = self.state.get();
        let command = state.toggle_play_pause();
        self.state.set(state);

        match command {
            MediaCommand::Pause => self.pause(),
            MediaCommand::Play => self.play("video_play_failed"),
        }
        self.sync_icons();
        self.log_controls(state);
    }

    pub fn toggle_mute(&self) {
        let mut state = self.state.get();
        let muted = state.toggle_mute();
        self.state.set(state);
        self.video.set_muted(muted);
        self.sync_icons();
        self.log_controls(state);
    }

    fn log_controls(&self, state: VideoState) {
        log_event(
            LogLevel::Debug,
            "video_controls_changed",
            serde_json::json!({ "playing": state.is_playing(), "muted": state.is_muted() }),
        );
    }

    fn resync(&self, playing: bool) {
        let mut state = self.state.get();
        state.on_media_playing(playing);
        self.state.set(state);
        self.sync_icons();
    }

    fn play(&self, failure_event: &'static str) {
        let promise = match self.video.play() {
            Ok(promise) => promise,
            Err(error) => {
                log_event(LogLevel::Warn, failure_event, serde_json::json!({ "message": format!("{error:?}") }));
                return;
            }
        };
        spawn_local(async move {
            if let Err(error) = JsFuture::from(promise).await {
                log_event(LogLevel::Warn, failure_event, serde_json::json!({ "message": format!("{error:?}") }));
            }
        });
    }

    fn pause(&self) {
        if let Err(error) = self.video.pause() {
            log_event(LogLevel::Warn, "video_pause_failed", serde_json::json!({ "message": format!("{error:?}") }));
        }
    }

    fn sync_icons(&self) {
        let state = self.state.get();
        if let Some(icons) = self.play_pause_icons.as_ref() {
            icons.apply(state.play_pause_icons());
        }
        if let Some(icons) = self.volume_icons.as_ref() {
            icons.apply(state.volume_icons());
        }
    }

    fn update_progress(&self) {
        let Some(bar) = self.progress_bar.as_ref() else {
            return;
        };
        if let Some(percent) = progress_percent(self.video.current_time(), self.video.duration()) {
            dom::set_style(bar, "width", &format!("{percent}%"));
        }
    }

    pub fn detach(&self) {
        self.listeners.borrow_mut().clear();
        self.observer.borrow_mut().take();
    }
}
