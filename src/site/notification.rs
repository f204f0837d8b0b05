pub const NOTIFICATION_SELECTOR: &str = ".notification";
pub const SLIDE_IN_DELAY_MS: u32 = 100;
pub const AUTO_HIDE_MS: u32 = 5_000;
pub const SLIDE_OUT_MS: u32 = 300;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    #[default]
    Info,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            Self::Success => "#10b981",
            Self::Error => "#ef4444",
            Self::Info => "#3b82f6",
        }
    }

    pub fn class_name(self) -> String {
        format!("notification notification--{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ToastId(u64);

/// Holds the single live notification. `show` always evicts before inserting,
/// within one call, so two toasts are never live together.
#[derive(Debug)]
pub struct NotificationSlot<T> {
    next_id: u64,
    current: Option<(ToastId, T)>,
}

impl<T> Default for NotificationSlot<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            current: None,
        }
    }
}

impl<T> NotificationSlot<T> {
    /// Installs `toast` and hands back whatever it replaced.
    pub fn show(&mut self, toast: T) -> (ToastId, Option<T>) {
        let id = ToastId(self.next_id);
        self.next_id += 1;
        let evicted = self.current.replace((id, toast)).map(|(_, previous)| previous);
        (id, evicted)
    }

    /// Takes the toast out if `id` is still the live one; stale or repeated
    /// dismissals return `None`.
    pub fn dismiss(&mut self, id: ToastId) -> Option<T> {
        match &self.current {
            Some((current_id, _)) if *current_id == id => self.current.take().map(|(_, toast)| toast),
            _ => None,
        }
    }

    pub fn take(&mut self) -> Option<T> {
        self.current.take().map(|(_, toast)| toast)
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref().map(|(_, toast)| toast)
    }

    pub fn current_mut(&mut self, id: ToastId) -> Option<&mut T> {
        match &mut self.current {
            Some((current_id, toast)) if *current_id == id => Some(toast),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Toast {
        message: &'static str,
        kind: NotificationKind,
    }

    #[test]
    fn second_show_replaces_first() {
        let mut slot = NotificationSlot::default();

        let (_, evicted) = slot.show(Toast {
            message: "msg",
            kind: NotificationKind::Error,
        });
        assert!(evicted.is_none());

        let (_, evicted) = slot.show(Toast {
            message: "msg2",
            kind: NotificationKind::Success,
        });

        assert_eq!(evicted.map(|toast| toast.message), Some("msg"));
        assert!(slot.current().is_some());
        assert_eq!(
            slot.current(),
            Some(&Toast {
                message: "msg2",
                kind: NotificationKind::Success,
            })
        );
    }

    #[test]
    fn dismiss_is_idempotent() {
        let mut slot = NotificationSlot::default();
        let (id, _) = slot.show("saved");

        assert_eq!(slot.dismiss(id), Some("saved"));
        assert_eq!(slot.dismiss(id), None);
        assert!(slot.current().is_none());
    }

    #[test]
    fn stale_id_cannot_dismiss_newer_toast() {
        let mut slot = NotificationSlot::default();
        let (first, _) = slot.show("first");
        let (second, _) = slot.show("second");

        assert_eq!(slot.dismiss(first), None);
        assert!(slot.current_mut(first).is_none());
        assert_eq!(slot.current(), Some(&"second"));
        assert_eq!(slot.dismiss(second), Some("second"));
    }

    #[test]
    fn take_empties_the_slot_and_ids_keep_advancing() {
        let mut slot = NotificationSlot::default();
        let (first, _) = slot.show("first");

        assert_eq!(slot.take(), Some("first"));
        assert!(slot.current().is_none());

        let (second, evicted) = slot.show("second");
        assert!(evicted.is_none());
        assert_ne!(first, second);
    }

    #[test]
    fn kind_drives_class_and_colour() {
        assert_eq!(NotificationKind::Error.class_name(), "notification notification--error");
        assert_eq!(NotificationKind::Success.background(), "#10b981");
        assert_eq!(NotificationKind::default(), NotificationKind::Info);
    }
}
