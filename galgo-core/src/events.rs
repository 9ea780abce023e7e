use serde::Serialize;

// Notifications the host harness may forward to an engine. Most
// engines care about none of them, so `notify` defaults to a no-op and
// implementors override only what they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HostEvent {
    NewGame,
    Ready,
    PonderHit,
    DrawOffered,
    Quit,
}

pub trait HostNotify {
    fn notify(&mut self, _event: HostEvent) {}
}
