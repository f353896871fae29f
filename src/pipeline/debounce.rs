use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

/// Forward only the latest value once `quiet` has passed without a newer one.
///
/// A value still pending when the input closes is flushed immediately.
pub fn debounce<T: Send + 'static>(
    mut input: mpsc::Receiver<T>,
    quiet: Duration,
) -> mpsc::Receiver<T> {
    let (tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        let mut pending: Option<T> = None;
        loop {
            if pending.is_none() {
                match input.recv().await {
                    Some(value) => pending = Some(value),
                    None => break,
                }
                continue;
            }

            tokio::select! {
                next = input.recv() => match next {
                    Some(value) => pending = Some(value),
                    None => {
                        if let Some(value) = pending.take() {
                            let _ = tx.send(value).await;
                        }
                        break;
                    }
                },
                _ = sleep(quiet) => {
                    if let Some(value) = pending.take() {
                        if tx.send(value).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    });

    rx
}
