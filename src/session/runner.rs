//! # Session Event Loop
//!
//! Pulls raw events one at a time, dispatches each completely and writes its
//! commands to the sink before asking for the next event.
//!
//! The loop ends when:
//! - the quit gesture commits,
//! - the event source reports a host quit or runs dry,
//! - the shutdown future (usually Ctrl+C) resolves.

use std::future::Future;
use tracing::{debug, info};

use super::dispatcher::Dispatcher;
use crate::controller::event::RawEvent;
use crate::error::Result;
use crate::output::CommandSink;

/// Source of raw input events.
#[allow(async_fn_in_trait)]
pub trait EventSource {
    /// Waits for the next event; `Ok(None)` once the source is exhausted.
    async fn next_event(&mut self) -> Result<Option<RawEvent>>;
}

/// Why the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Enough quit controls were held at once.
    QuitGesture,
    /// The event source delivered a quit event.
    HostQuit,
    /// The shutdown signal fired.
    Shutdown,
    /// The event source has no more events.
    SourceClosed,
}

/// Counters reported when the session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub events: u64,
    pub commands: u64,
    pub reason: StopReason,
}

/// Runs the session until it stops.
///
/// # Errors
///
/// Returns error if reading from the source or writing to the sink fails.
pub async fn run<S, F>(
    source: &mut S,
    dispatcher: &mut Dispatcher,
    sink: &mut dyn CommandSink,
    shutdown: F,
) -> Result<RunSummary>
where
    S: EventSource,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut events: u64 = 0;
    let mut commands: u64 = 0;

    let reason = loop {
        let event = tokio::select! {
            event = source.next_event() => event?,
            _ = &mut shutdown => {
                info!("Shutdown requested");
                break StopReason::Shutdown;
            }
        };

        let Some(event) = event else {
            debug!("Event source closed");
            break StopReason::SourceClosed;
        };
        events += 1;

        let outcome = dispatcher.dispatch(&event);
        for command in &outcome.commands {
            sink.emit(command)?;
            commands += 1;
        }

        if outcome.stop {
            break if event == RawEvent::Quit {
                StopReason::HostQuit
            } else {
                StopReason::QuitGesture
            };
        }
    };

    info!(
        "Session ended ({:?}): {} events, {} commands, state {:?}",
        reason,
        events,
        commands,
        dispatcher.state()
    );

    Ok(RunSummary { events, commands, reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PadError;
    use crate::mapping::table::ControlMapping;
    use crate::output::{MockCommandSink, TextSink};
    use crate::session::command::Command;
    use mockall::Sequence;
    use std::collections::VecDeque;
    use std::io;

    struct Scripted {
        events: VecDeque<RawEvent>,
    }

    impl Scripted {
        fn new(events: &[RawEvent]) -> Self {
            Self { events: events.iter().copied().collect() }
        }
    }

    impl EventSource for Scripted {
        async fn next_event(&mut self) -> Result<Option<RawEvent>> {
            Ok(self.events.pop_front())
        }
    }

    struct Failing;

    impl EventSource for Failing {
        async fn next_event(&mut self) -> Result<Option<RawEvent>> {
            Err(PadError::Joystick("device disconnected".to_string()))
        }
    }

    fn button(index: usize, pressed: bool) -> RawEvent {
        RawEvent::Button { index, pressed }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(ControlMapping::default(), 3)
    }

    #[tokio::test]
    async fn test_commands_written_in_order() {
        let mut source = Scripted::new(&[
            button(0, true),
            button(0, false),
            RawEvent::Axis { index: 3, value: 32767 },
            button(0, true),
        ]);
        let mut sink = MockCommandSink::new();
        let mut seq = Sequence::new();
        for expected in [Command::Play, Command::Speed(1.0), Command::Pause] {
            sink.expect_emit()
                .withf(move |c| *c == expected)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
        }

        let summary = run(&mut source, &mut dispatcher(), &mut sink, std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.events, 4);
        assert_eq!(summary.commands, 3);
        assert_eq!(summary.reason, StopReason::SourceClosed);
    }

    #[tokio::test]
    async fn test_quit_gesture_stops_before_remaining_events() {
        let mut source = Scripted::new(&[
            button(6, true),
            button(7, true),
            button(8, true),
            button(0, true),
        ]);
        let mut sink = TextSink::new(Vec::new());

        let summary = run(&mut source, &mut dispatcher(), &mut sink, std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.reason, StopReason::QuitGesture);
        assert_eq!(summary.events, 3);
        assert_eq!(source.events.len(), 1);
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "quit\n");
    }

    #[tokio::test]
    async fn test_host_quit() {
        let mut source = Scripted::new(&[button(1, true), RawEvent::Quit, button(1, false)]);
        let mut sink = TextSink::new(Vec::new());

        let summary = run(&mut source, &mut dispatcher(), &mut sink, std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.reason, StopReason::HostQuit);
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "record\n");
    }

    #[tokio::test]
    async fn test_shutdown_signal() {
        struct Never;
        impl EventSource for Never {
            async fn next_event(&mut self) -> Result<Option<RawEvent>> {
                std::future::pending().await
            }
        }

        let mut sink = MockCommandSink::new();
        sink.expect_emit().never();

        let summary = run(&mut Never, &mut dispatcher(), &mut sink, std::future::ready(()))
            .await
            .unwrap();

        assert_eq!(summary.reason, StopReason::Shutdown);
        assert_eq!(summary.events, 0);
    }

    #[tokio::test]
    async fn test_source_error_propagates() {
        let mut sink = MockCommandSink::new();
        let result = run(&mut Failing, &mut dispatcher(), &mut sink, std::future::pending()).await;
        assert!(matches!(result, Err(PadError::Joystick(_))));
    }

    #[tokio::test]
    async fn test_sink_error_propagates() {
        let mut source = Scripted::new(&[button(0, true)]);
        let mut sink = MockCommandSink::new();
        sink.expect_emit()
            .returning(|_| Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed")));

        let result = run(&mut source, &mut dispatcher(), &mut sink, std::future::pending()).await;
        assert!(matches!(result, Err(PadError::Io(_))));
    }
}
