use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::Stream;
use tokio::time::{sleep_until, Instant, Sleep};

/// Forwards an item only once `window` has passed without a newer one.
///
/// Superseded items are dropped. When the upstream ends, an item still
/// waiting out its window is emitted before the stream ends.
///
/// No timer exists until the first item arrives, so the adapter can be
/// built on a thread without a tokio runtime.
pub fn debounce<S>(upstream: S, window: Duration) -> Debounce<S>
where
    S: Stream + Unpin,
{
    Debounce {
        upstream,
        window,
        pending: None,
        timer: None,
        upstream_done: false,
    }
}

pub struct Debounce<S: Stream> {
    upstream: S,
    window: Duration,
    pending: Option<S::Item>,
    timer: Option<Pin<Box<Sleep>>>,
    upstream_done: bool,
}

// `pending` is never pinned; only `upstream` is polled through a pin.
impl<S: Stream + Unpin> Unpin for Debounce<S> {}

impl<S> Stream for Debounce<S>
where
    S: Stream + Unpin,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        while !this.upstream_done {
            match Pin::new(&mut this.upstream).poll_next(cx) {
                Poll::Ready(Some(item)) => {
                    this.pending = Some(item);
                    let deadline = Instant::now() + this.window;
                    match this.timer.as_mut() {
                        Some(timer) => timer.as_mut().reset(deadline),
                        None => this.timer = Some(Box::pin(sleep_until(deadline))),
                    }
                }
                Poll::Ready(None) => this.upstream_done = true,
                Poll::Pending => break,
            }
        }

        if this.upstream_done {
            return Poll::Ready(this.pending.take());
        }

        if this.pending.is_some() {
            if let Some(timer) = this.timer.as_mut() {
                if timer.as_mut().poll(cx).is_ready() {
                    return Poll::Ready(this.pending.take());
                }
            }
        }

        Poll::Pending
    }
}
