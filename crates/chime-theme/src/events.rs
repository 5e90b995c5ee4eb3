//! The freedesktop sound event catalog.
//!
//! A theme binds at most one sound file to each of these ids. The order is
//! the order used in menus and in saved theme files.

/// Sound event ids a theme can define.
pub const SOUND_EVENTS: [&str; 80] = [
    "alarm-clock-elapsed",
    "audio-channel-front-center",
    "audio-channel-front-left",
    "audio-channel-front-right",
    "audio-channel-rear-center",
    "audio-channel-rear-left",
    "audio-channel-rear-right",
    "audio-channel-side-left",
    "audio-channel-side-right",
    "audio-test-signal",
    "audio-volume-change",
    "battery-caution",
    "battery-full",
    "battery-low",
    "bell",
    "bell-window-system",
    "camera-shutter",
    "complete",
    "complete-media-burn",
    "complete-media-error",
    "completion-fail",
    "completion-partial",
    "completion-rotation",
    "completion-success",
    "desktop-login",
    "desktop-logout",
    "device-added",
    "device-removed",
    "dialog-error",
    "dialog-error-critical",
    "dialog-error-serious",
    "dialog-error-veryserious",
    "dialog-information",
    "dialog-question",
    "dialog-special",
    "dialog-warning",
    "game-over-loser",
    "game-over-winner",
    "media-insert-request",
    "message",
    "message-attention",
    "message-connectivity-problem",
    "message-connectivity-error",
    "message-connectivity-error-serious",
    "message-connectivity-lost",
    "message-contact-in",
    "message-contact-out",
    "message-error",
    "message-highlight",
    "message-irc-event",
    "message-lowpriority",
    "message-new-email",
    "message-new-instant",
    "message-new-sms",
    "message-sent-instant",
    "network-connectivity-established",
    "network-connectivity-lost",
    "outcome-failure",
    "outcome-success",
    "phone-incoming-call",
    "phone-outgoing-busy",
    "phone-outgoing-calling",
    "power-plug",
    "power-unplug",
    "print-error",
    "service-login",
    "service-logout",
    "theme-demo",
    "trash-empty",
    "window-attention",
    "window-close",
    "window-maximized",
    "window-minimized",
    "window-move-end",
    "window-move-start",
    "window-pin",
    "window-question",
    "window-shaded",
    "window-unpin",
    "window-unshaded",
];

/// Whether `id` is in the catalog.
pub fn is_sound_event(id: &str) -> bool {
    event_index(id).is_some()
}

/// Catalog position of `id`.
pub fn event_index(id: &str) -> Option<usize> {
    SOUND_EVENTS.iter().position(|event| *event == id)
}
