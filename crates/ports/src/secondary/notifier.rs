use std::future::Future;
use std::pin::Pin;

use domain::notify::entity::NotificationMessage;
use domain::notify::error::NotifyError;

/// Secondary port for dispatching a formatted alert to the chat webhook.
///
/// Fire-and-forget by design: one POST, no retry. The caller logs a
/// failure and moves on without touching dedup state.
pub trait Notifier: Send + Sync {
    fn notify<'a>(
        &'a self,
        message: &'a NotificationMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullNotifier;
    impl Notifier for NullNotifier {
        fn notify<'a>(
            &'a self,
            _message: &'a NotificationMessage,
        ) -> Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + 'a>> {
            Box::pin(async { Ok(()) })
        }
    }

    #[test]
    fn notifier_is_dyn_compatible() {
        let notifier: Box<dyn Notifier> = Box::new(NullNotifier);
        let _ = notifier;
    }
}
