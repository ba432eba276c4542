use crate::content::{BannerContent, ContentId};
use crate::controller::PresentRequest;
use log::trace;
use tokio::sync::mpsc;

/// Callback run when a present or dismiss transition finishes.
pub type Completion = Box<dyn FnOnce() + Send>;

pub enum BannerCommand {
    Present {
        content: Box<dyn BannerContent>,
        request: PresentRequest,
        on_presented: Option<Completion>,
    },
    Dismiss {
        animated: bool,
        on_dismissed: Option<Completion>,
    },
    DismissContent {
        content: ContentId,
        animated: bool,
        on_dismissed: Option<Completion>,
    },
}

impl BannerCommand {
    fn name(&self) -> &'static str {
        match self {
            BannerCommand::Present { .. } => "Present",
            BannerCommand::Dismiss { .. } => "Dismiss",
            BannerCommand::DismissContent { .. } => "DismissContent",
        }
    }
}

/// Receiving side of the controller's command queue.
pub struct CommandBridge {
    sender: mpsc::UnboundedSender<BannerCommand>,
    receiver: mpsc::UnboundedReceiver<BannerCommand>,
}

impl CommandBridge {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    pub fn handle(&self) -> BannerHandle {
        BannerHandle::new(self.sender.clone())
    }

    pub fn try_next_command(&mut self) -> Option<BannerCommand> {
        self.receiver.try_recv().ok()
    }

    /// Waits for the next command. Cancel safe.
    pub async fn next_command(&mut self) -> Option<BannerCommand> {
        self.receiver.recv().await
    }
}

impl Default for CommandBridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-owning route to a [`crate::BannerController`].
///
/// Commands are queued and applied on the controller's thread the next time it
/// ticks. Every method returns `false` once the controller has been dropped.
#[derive(Clone)]
pub struct BannerHandle {
    sender: mpsc::UnboundedSender<BannerCommand>,
}

impl BannerHandle {
    fn new(sender: mpsc::UnboundedSender<BannerCommand>) -> Self {
        Self { sender }
    }

    pub fn present(
        &self,
        content: Box<dyn BannerContent>,
        request: PresentRequest,
        on_presented: Option<Completion>,
    ) -> bool {
        self.send(BannerCommand::Present {
            content,
            request,
            on_presented,
        })
    }

    pub fn dismiss(&self, animated: bool, on_dismissed: Option<Completion>) -> bool {
        self.send(BannerCommand::Dismiss {
            animated,
            on_dismissed,
        })
    }

    /// Dismisses the banner only if `content` is still the one on display.
    pub fn dismiss_content(
        &self,
        content: ContentId,
        animated: bool,
        on_dismissed: Option<Completion>,
    ) -> bool {
        self.send(BannerCommand::DismissContent {
            content,
            animated,
            on_dismissed,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn send(&self, command: BannerCommand) -> bool {
        let name = command.name();
        match self.sender.send(command) {
            Ok(()) => true,
            Err(_) => {
                trace!("Dropped {name} command, banner controller is gone");
                false
            }
        }
    }
}
