/// Blocking, user-facing message box.
pub trait Alerter {
    fn alert(&mut self, message: &str);
}

/// Keeps alerts until the host shows and dismisses them.
#[derive(Debug, Default)]
pub struct QueuedAlerts {
    pending: std::collections::VecDeque<String>,
}

impl QueuedAlerts {
    pub fn current(&self) -> Option<&str> {
        self.pending.front().map(String::as_str)
    }

    pub fn dismiss(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    pub fn is_blocking(&self) -> bool {
        !self.pending.is_empty()
    }
}

impl Alerter for QueuedAlerts {
    fn alert(&mut self, message: &str) {
        self.pending.push_back(message.to_string());
    }
}
