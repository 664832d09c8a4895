//! One-shot suppression of the controller's own text echo.

/// Armed when the controller has just published text to the text surface.
///
/// The next text-change notification always disarms the guard. It is
/// suppressed only when it carries exactly the published text, so a host
/// that never echoes cannot cause a later user edit to be dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EchoGuard {
    #[default]
    Disarmed,
    Armed {
        text: String,
    },
}

impl EchoGuard {
    pub fn arm(&mut self, text: String) {
        *self = EchoGuard::Armed { text };
    }

    /// Consume one notification. Returns `true` if it is the echo.
    pub fn consume(&mut self, incoming: &str) -> bool {
        match std::mem::take(self) {
            EchoGuard::Armed { text } => text == incoming,
            EchoGuard::Disarmed => false,
        }
    }

    pub fn disarm(&mut self) {
        *self = EchoGuard::Disarmed;
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, EchoGuard::Armed { .. })
    }
}
