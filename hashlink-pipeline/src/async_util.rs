//! Consuming batch events while the batch future runs.

use std::future::Future;

use tokio::sync::mpsc::UnboundedReceiver;

/// Poll `task` to completion on the current task, passing every event it
/// sends on `events` to `on_event` as it arrives.
///
/// The task owns the sender, so once it has returned every event is already
/// queued and the rest are drained without waiting.
pub async fn drive_with_events<F, E>(
    task: F,
    mut events: UnboundedReceiver<E>,
    mut on_event: impl FnMut(E),
) -> F::Output
where
    F: Future,
{
    tokio::pin!(task);
    loop {
        tokio::select! {
            biased;
            Some(event) = events.recv() => on_event(event),
            output = &mut task => {
                while let Ok(event) = events.try_recv() {
                    on_event(event);
                }
                return output;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn events_arrive_in_order_before_the_result() {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = async move {
            for i in 0..5 {
                let _ = tx.send(i);
                tokio::task::yield_now().await;
            }
            "done"
        };

        let mut seen = Vec::new();
        let result = drive_with_events(task, rx, |e| seen.push(e)).await;

        assert_eq!(result, "done");
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn events_sent_without_yielding_are_drained() {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = async move {
            for i in 0..3 {
                let _ = tx.send(i);
            }
            3
        };

        let mut seen = Vec::new();
        let count = drive_with_events(task, rx, |e| seen.push(e)).await;
        assert_eq!(seen.len(), count);
    }

    #[tokio::test]
    async fn closed_channel_still_awaits_task() {
        let (tx, rx) = mpsc::unbounded_channel::<u32>();
        drop(tx);
        let result = drive_with_events(
            async {
                tokio::task::yield_now().await;
                7
            },
            rx,
            |_| {},
        )
        .await;
        assert_eq!(result, 7);
    }
}
