//! Timer- and bus-driven refresh triggers.
//!
//! Two background loops feed [`BoardContext::refresh`]: a fixed-interval poll
//! and a debounced bus subscription. Manual refreshes bypass both and call the
//! context directly.

use super::{BoardContext, RefreshOrigin};
use crate::board::{
    domain::BoardEvent,
    ports::{BoardEventReceiver, NotificationBus, TaskRepository},
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Handle to the running poll and bus loops.
///
/// Stopping (or dropping) the scheduler ends both loops; a refresh already in
/// progress finishes but is ignored if the board has shut down.
#[derive(Debug)]
pub struct RefreshScheduler {
    token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl RefreshScheduler {
    /// Starts polling and listening on `events`.
    ///
    /// Subscribe before the initial load so that no event published during
    /// it is missed.
    #[must_use]
    pub fn start<R, B, C>(
        context: &Arc<BoardContext<R, B, C>>,
        events: BoardEventReceiver,
    ) -> Self
    where
        R: TaskRepository + 'static,
        B: NotificationBus + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let token = context.shutdown_token().child_token();
        let handles = vec![
            tokio::spawn(poll_loop(Arc::clone(context), token.clone())),
            tokio::spawn(bus_loop(Arc::clone(context), events, token.clone())),
        ];
        tracing::debug!(
            poll_interval = ?context.config().poll_interval,
            debounce = ?context.config().bus_debounce,
            "refresh scheduler started"
        );
        Self { token, handles }
    }

    /// Returns `true` until the scheduler is stopped.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Stops both loops. Idempotent.
    pub fn stop(&mut self) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        self.handles.clear();
        tracing::debug!("refresh scheduler stopped");
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn poll_loop<R, B, C>(context: Arc<BoardContext<R, B, C>>, token: CancellationToken)
where
    R: TaskRepository,
    B: NotificationBus,
    C: Clock + Send + Sync,
{
    // interval_at panics on a zero period
    let period = context.config().poll_interval.max(Duration::from_millis(1));
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            () = token.cancelled() => break,
            _ = ticker.tick() => {
                context.refresh(RefreshOrigin::Poll).await;
            }
        }
    }
}

/// Classification of one bus receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Refresh,
    Ignore,
    Closed,
}

fn classify<R, B, C>(
    context: &BoardContext<R, B, C>,
    received: Result<BoardEvent, RecvError>,
) -> Signal
where
    R: TaskRepository,
    B: NotificationBus,
    C: Clock + Send + Sync,
{
    match received {
        Ok(event) if context.config().refreshes_on(event.kind) => Signal::Refresh,
        Ok(_) => Signal::Ignore,
        Err(RecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "bus subscription lagged, refreshing");
            Signal::Refresh
        }
        Err(RecvError::Closed) => Signal::Closed,
    }
}

/// Waits for a relevant event, then keeps extending the debounce window while
/// more arrive, and fetches once when it elapses quietly.
async fn bus_loop<R, B, C>(
    context: Arc<BoardContext<R, B, C>>,
    mut events: BoardEventReceiver,
    token: CancellationToken,
) where
    R: TaskRepository,
    B: NotificationBus,
    C: Clock + Send + Sync,
{
    let window = context.config().bus_debounce;
    loop {
        let received = tokio::select! {
            () = token.cancelled() => return,
            received = events.recv() => received,
        };
        match classify(&context, received) {
            Signal::Refresh => {}
            Signal::Ignore => continue,
            Signal::Closed => return,
        }

        let mut coalesced: usize = 1;
        let mut closed = false;
        let deadline = tokio::time::sleep(window);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                () = token.cancelled() => return,
                () = &mut deadline => break,
                received = events.recv(), if !closed => match classify(&context, received) {
                    Signal::Refresh => {
                        coalesced += 1;
                        deadline.as_mut().reset(Instant::now() + window);
                    }
                    Signal::Ignore => {}
                    Signal::Closed => closed = true,
                },
            }
        }

        tracing::debug!(coalesced, "debounce window elapsed");
        context.refresh(RefreshOrigin::Bus).await;
        if closed {
            return;
        }
    }
}
