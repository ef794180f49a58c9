//! Render requests issued by the simulation loop

/// Receiver of "the board changed, draw it again" notifications.
///
/// Requests are fire-and-forget: implementations must return promptly and
/// read the board through [`crate::board::BoardState::snapshot`] when they
/// actually draw.
pub trait RenderSink: Send + Sync {
    fn request_render(&self);
}

/// Sink that ignores every request
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRender;

impl RenderSink for NoRender {
    fn request_render(&self) {}
}

impl<F> RenderSink for F
where
    F: Fn() + Send + Sync,
{
    fn request_render(&self) {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_closure_sink() {
        let count = AtomicUsize::new(0);
        let sink = || {
            count.fetch_add(1, Ordering::SeqCst);
        };
        sink.request_render();
        sink.request_render();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
