use std::sync::Arc;
use tokio::sync::watch;

/// Exit code asking the process supervisor to start the service again.
pub const RESTART_EXIT_CODE: i32 = 75;

/// Cross-adapter restart request.
///
/// The reboot tool calls [`RestartSignal::request`]; the adapter that owns the
/// server loop waits on [`RestartSignal::requested`], stops accepting work,
/// and `main` exits with [`RESTART_EXIT_CODE`].
#[derive(Debug, Clone)]
pub struct RestartSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl RestartSignal {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn request(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_requested(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolves once a restart has been requested.
    pub async fn requested(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives as long as self, so this only fails if it is dropped.
        let _ = receiver.wait_for(|requested| *requested).await;
    }
}

impl Default for RestartSignal {
    fn default() -> Self {
        Self::new()
    }
}
