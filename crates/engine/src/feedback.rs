use tui_jigsaw_types::{EngineEvent, Notification, Sound};

/// Host-side collaborators for engine events (audio and toasts).
pub trait Feedback {
    fn play_sound(&mut self, sound: Sound);
    fn notify(&mut self, notification: &Notification);
}

/// Forward drained events to `sink` in queue order.
pub fn dispatch<F: Feedback + ?Sized>(events: Vec<EngineEvent>, sink: &mut F) {
    for event in events {
        match event {
            EngineEvent::Sound(sound) => sink.play_sound(sound),
            EngineEvent::Notify(notification) => {
                tracing::info!(title = %notification.title, "notify");
                sink.notify(&notification);
            }
        }
    }
}

/// Collects everything it receives; handy for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub sounds: Vec<Sound>,
    pub notifications: Vec<Notification>,
}

impl Feedback for EventLog {
    fn play_sound(&mut self, sound: Sound) {
        self.sounds.push(sound);
    }

    fn notify(&mut self, notification: &Notification) {
        self.notifications.push(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_preserves_order() {
        let mut log = EventLog::default();
        dispatch(
            vec![
                EngineEvent::Sound(Sound::Pickup),
                EngineEvent::Notify(Notification::info("a", "b")),
                EngineEvent::Sound(Sound::Place),
            ],
            &mut log,
        );
        assert_eq!(log.sounds, vec![Sound::Pickup, Sound::Place]);
        assert_eq!(log.notifications.len(), 1);
    }
}
