pub const VIDEO_SELECTOR: &str = ".video-player__video";
pub const PLAY_PAUSE_SELECTOR: &str = ".video-player__play-pause";
pub const MUTE_SELECTOR: &str = ".video-player__mute";
pub const PROGRESS_BAR_SELECTOR: &str = ".video-player__progress-bar";
pub const PLAY_ICON_SELECTOR: &str = ".video-player__play-icon";
pub const PAUSE_ICON_SELECTOR: &str = ".video-player__pause-icon";
pub const VOLUME_ICON_SELECTOR: &str = ".video-player__volume-icon";
pub const MUTE_ICON_SELECTOR: &str = ".video-player__mute-icon";
pub const CONTROL_BUTTON_SELECTOR: &str = ".video-control-btn";

pub const VISIBILITY_THRESHOLD: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaCommand {
    Play,
    Pause,
}

/// Which icon of a two-icon toggle is displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IconPair {
    pub show_first: bool,
}

impl IconPair {
    pub fn displays(self) -> (&'static str, &'static str) {
        if self.show_first {
            ("block", "none")
        } else {
            ("none", "block")
        }
    }
}

/// Logical playback state of the showcase video. Starts playing and muted to
/// match the `autoplay muted` markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoState {
    is_playing: bool,
    is_muted: bool,
}

impl Default for VideoState {
    fn default() -> Self {
        Self {
            is_playing: true,
            is_muted: true,
        }
    }
}

impl VideoState {
    pub fn is_playing(self) -> bool {
        self.is_playing
    }

    pub fn is_muted(self) -> bool {
        self.is_muted
    }

    pub fn toggle_play_pause(&mut self) -> MediaCommand {
        let command = if self.is_playing {
            MediaCommand::Pause
        } else {
            MediaCommand::Play
        };
        self.is_playing = !self.is_playing;
        command
    }

    /// Flips muted and returns the value to apply to the element.
    pub fn toggle_mute(&mut self) -> bool {
        self.is_muted = !self.is_muted;
        self.is_muted
    }

    /// Native `play`, `pause` and `ended` events keep the flag honest when
    /// playback is driven from outside the widget.
    pub fn on_media_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    /// Play icon shows while paused; pause icon while playing.
    pub fn play_pause_icons(self) -> IconPair {
        IconPair {
            show_first: !self.is_playing,
        }
    }

    /// Volume icon shows while audible; mute icon while muted.
    pub fn volume_icons(self) -> IconPair {
        IconPair {
            show_first: !self.is_muted,
        }
    }

    /// What to do when the player crosses the visibility threshold. Never
    /// changes the logical playing flag.
    pub fn visibility_command(self, visible: bool, media_paused: bool) -> Option<MediaCommand> {
        if !self.is_playing {
            return None;
        }

        match (visible, media_paused) {
            (true, true) => Some(MediaCommand::Play),
            (false, false) => Some(MediaCommand::Pause),
            _ => None,
        }
    }
}

/// Progress as a percentage, or `None` while the duration is unknown.
pub fn progress_percent(current_time: f64, duration: f64) -> Option<f64> {
    if !duration.is_finite() || duration <= 0.0 {
        return None;
    }

    Some((current_time / duration * 100.0).clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_playing_and_muted() {
        let state = VideoState::default();

        assert!(state.is_playing());
        assert!(state.is_muted());
        assert_eq!(state.play_pause_icons().displays(), ("none", "block"));
        assert_eq!(state.volume_icons().displays(), ("none", "block"));
    }

    #[test]
    fn double_toggle_restores_state_and_icons() {
        let mut state = VideoState::default();
        let before = state;

        assert_eq!(state.toggle_play_pause(), MediaCommand::Pause);
        assert_eq!(state.play_pause_icons().displays(), ("block", "none"));
        assert_eq!(state.toggle_play_pause(), MediaCommand::Play);

        assert_eq!(state, before);
        assert_eq!(state.play_pause_icons(), before.play_pause_icons());
    }

    #[test]
    fn mute_toggle_is_symmetric() {
        let mut state = VideoState::default();

        assert!(!state.toggle_mute());
        assert_eq!(state.volume_icons().displays(), ("block", "none"));
        assert!(state.toggle_mute());
    }

    #[test]
    fn native_events_resync_flag() {
        let mut state = VideoState::default();

        state.on_media_playing(false);
        assert_eq!(state.toggle_play_pause(), MediaCommand::Play);
    }

    #[test]
    fn visibility_only_acts_while_logically_playing() {
        let mut state = VideoState::default();

        assert_eq!(state.visibility_command(false, false), Some(MediaCommand::Pause));
        assert_eq!(state.visibility_command(true, true), Some(MediaCommand::Play));
        assert_eq!(state.visibility_command(true, false), None);
        assert!(state.is_playing());

        state.toggle_play_pause();
        assert_eq!(state.visibility_command(true, true), None);
        assert_eq!(state.visibility_command(false, false), None);
        assert!(!state.is_playing());
    }

    #[test]
    fn progress_guards_unknown_duration() {
        assert_eq!(progress_percent(3.0, f64::NAN), None);
        assert_eq!(progress_percent(3.0, 0.0), None);
        assert_eq!(progress_percent(3.0, f64::INFINITY), None);
        assert_eq!(progress_percent(15.0, 60.0), Some(25.0));
    }
}
