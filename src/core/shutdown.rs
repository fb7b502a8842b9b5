//! Shutdown signal helpers
//!
//! Long-running loops take a `watch::Receiver<bool>` created by the binary's
//! signal handler; `true` means stop. These helpers race each pull from a
//! stream against the signal so a loop blocked on registry I/O still stops
//! promptly.

use futures::{Stream, StreamExt};
use tokio::sync::watch;

/// Result of pulling the next item while watching for shutdown
#[derive(Debug)]
pub enum Next<T> {
    /// The stream produced an item
    Item(T),

    /// The stream is exhausted
    End,

    /// Shutdown was requested before an item arrived
    Shutdown,
}

/// Whether shutdown has been requested
pub fn is_shutdown(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow()
}

/// Pulls the next item from `stream` unless shutdown is requested first
///
/// A dropped sender is treated as "never shut down".
pub async fn next_or_shutdown<S>(stream: &mut S, shutdown: &mut watch::Receiver<bool>) -> Next<S::Item>
where
    S: Stream + Unpin,
{
    if is_shutdown(shutdown) {
        return Next::Shutdown;
    }

    let wrap = |item: Option<S::Item>| match item {
        Some(item) => Next::Item(item),
        None => Next::End,
    };

    tokio::select! {
        biased;
        changed = shutdown.changed() => {
            if changed.is_ok() && is_shutdown(shutdown) {
                Next::Shutdown
            } else {
                wrap(stream.next().await)
            }
        }
        item = stream.next() => wrap(item),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[tokio::test]
    async fn test_next_yields_items_then_end() {
        let (_tx, mut rx) = watch::channel(false);
        let mut s = stream::iter(vec![1, 2]);

        assert!(matches!(next_or_shutdown(&mut s, &mut rx).await, Next::Item(1)));
        assert!(matches!(next_or_shutdown(&mut s, &mut rx).await, Next::Item(2)));
        assert!(matches!(next_or_shutdown(&mut s, &mut rx).await, Next::End));
    }

    #[tokio::test]
    async fn test_shutdown_already_requested() {
        let (tx, mut rx) = watch::channel(false);
        tx.send(true).unwrap();
        let mut s = stream::iter(vec![1]);

        assert!(matches!(next_or_shutdown(&mut s, &mut rx).await, Next::Shutdown));
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_pending_stream() {
        let (tx, mut rx) = watch::channel(false);
        let mut s = stream::pending::<i32>();

        let sender = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            tx.send(true).unwrap();
            tx
        });

        assert!(matches!(next_or_shutdown(&mut s, &mut rx).await, Next::Shutdown));
        drop(sender.await.unwrap());
    }

    #[tokio::test]
    async fn test_dropped_sender_never_shuts_down() {
        let (tx, mut rx) = watch::channel(false);
        drop(tx);
        let mut s = stream::iter(vec![7]);

        assert!(matches!(next_or_shutdown(&mut s, &mut rx).await, Next::Item(7)));
        assert!(matches!(next_or_shutdown(&mut s, &mut rx).await, Next::End));
    }
}
