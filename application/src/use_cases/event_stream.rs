//! Progress event streaming.
//!
//! A run is split into two independently scheduled halves joined by a
//! bounded channel:
//!
//! ```text
//! worker task                               consumer
//! ───────────                               ────────
//! RunOrchestrationUseCase ─► ChannelProgress ─► mpsc ─► EventStream::next()
//!        │                                                   ▲
//!        └─ content chunks, done | error, Completed ─────────┘
//! ```
//!
//! The worker never waits on the consumer beyond channel backpressure.
//! Dropping the [`EventStream`] stops delivery; the worker finishes its
//! in-flight calls and exits.

use crate::config::StreamParams;
use crate::ports::progress::RunProgressNotifier;
use crate::use_cases::orchestrate::OrchestrationReport;
use async_trait::async_trait;
use futures::Stream;
use orchestrator_domain::{NodeId, ProgressEvent, SubQuestionNode, cumulative_chunks};
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Item carried on the event channel
#[derive(Debug)]
pub enum StreamSignal {
    Event(ProgressEvent),
    /// Sentinel: nothing follows
    Completed,
}

/// [`RunProgressNotifier`] forwarding run callbacks onto the event channel.
#[derive(Clone)]
pub struct ChannelProgress {
    tx: mpsc::Sender<StreamSignal>,
}

impl ChannelProgress {
    pub fn new(tx: mpsc::Sender<StreamSignal>) -> Self {
        Self { tx }
    }

    pub async fn emit(&self, event: ProgressEvent) {
        // A closed channel means the consumer went away; keep working
        if self.tx.send(StreamSignal::Event(event)).await.is_err() {
            trace!("Event dropped, consumer disconnected");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn complete(&self) {
        let _ = self.tx.send(StreamSignal::Completed).await;
    }
}

#[async_trait]
impl RunProgressNotifier for ChannelProgress {
    async fn on_run_start(&self, _query: &str) {
        self.emit(ProgressEvent::Start {
            message: "Processing your request...".to_string(),
        })
        .await;
        self.emit(ProgressEvent::Reasoning {
            message: "Analyzing your question and breaking it down...".to_string(),
        })
        .await;
    }

    async fn on_plan_ready(&self, ordered: &[SubQuestionNode]) {
        let steps = ordered
            .iter()
            .map(|n| format!("Q{}: {}", n.id, n.text))
            .collect::<Vec<_>>()
            .join("; ");
        self.emit(ProgressEvent::Reasoning {
            message: format!("Planned {} sub-question(s): {}", ordered.len(), steps),
        })
        .await;
    }

    async fn on_tool_call(&self, node: NodeId, tool: &str, question: &str) {
        self.emit(ProgressEvent::ToolCall {
            tool: tool.to_string(),
            question: question.to_string(),
            node,
        })
        .await;
    }

    async fn on_tool_complete(&self, node: NodeId, tool: &str, success: bool) {
        self.emit(ProgressEvent::ToolComplete {
            tool: tool.to_string(),
            node,
            success,
        })
        .await;
    }
}

/// Consumer side of one streamed run
pub struct EventStream {
    rx: mpsc::Receiver<StreamSignal>,
    poll_interval: Duration,
    terminal_seen: bool,
    finished: bool,
}

impl EventStream {
    pub fn new(rx: mpsc::Receiver<StreamSignal>, poll_interval: Duration) -> Self {
        Self {
            rx,
            poll_interval,
            terminal_seen: false,
            finished: false,
        }
    }

    /// Next event, or `None` once the run has completed.
    ///
    /// Waits at most `poll_interval` per receive attempt and keeps waiting
    /// until an event or the completion sentinel arrives. If the worker
    /// vanished without a terminal event, a synthetic `error` is returned
    /// first.
    pub async fn next(&mut self) -> Option<ProgressEvent> {
        if self.finished {
            return None;
        }
        loop {
            match tokio::time::timeout(self.poll_interval, self.rx.recv()).await {
                Ok(Some(StreamSignal::Event(event))) => {
                    self.terminal_seen |= event.is_terminal();
                    return Some(event);
                }
                Ok(Some(StreamSignal::Completed)) | Ok(None) => {
                    self.finished = true;
                    if self.terminal_seen {
                        return None;
                    }
                    self.terminal_seen = true;
                    return Some(ProgressEvent::error("run ended without a result"));
                }
                Err(_) => trace!("No event yet"),
            }
        }
    }

    /// Adapt into a [`Stream`] of events
    pub fn into_stream(self) -> impl Stream<Item = ProgressEvent> + Send {
        futures::stream::unfold(self, |mut stream| async move {
            stream.next().await.map(|event| (event, stream))
        })
    }
}

/// Start a streamed run.
///
/// `work` receives the channel notifier and performs the run. Its result is
/// turned into `content` chunks and `done`, or a single `error`, followed by
/// the completion sentinel.
pub fn spawn_run<F, Fut>(params: &StreamParams, work: F) -> EventStream
where
    F: FnOnce(ChannelProgress) -> Fut + Send + 'static,
    Fut: Future<Output = Result<OrchestrationReport, String>> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(params.channel_capacity.max(1));
    let progress = ChannelProgress::new(tx);
    let chunk_max_len = params.chunk_max_len;
    let chunk_delay = params.chunk_delay;

    tokio::spawn(async move {
        match work(progress.clone()).await {
            Ok(output) => {
                stream_content(&progress, &output.report, chunk_max_len, chunk_delay).await;
                progress
                    .emit(ProgressEvent::Done {
                        final_report: output.report,
                        answered_subquestions: output.answered_subquestions,
                    })
                    .await;
            }
            Err(message) => progress.emit(ProgressEvent::error(message)).await,
        }
        progress.complete().await;
        debug!("Streamed run finished");
    });

    EventStream::new(rx, params.poll_interval)
}

async fn stream_content(progress: &ChannelProgress, report: &str, max_len: usize, delay: Duration) {
    for content in cumulative_chunks(report, max_len) {
        if progress.is_closed() {
            return;
        }
        progress.emit(ProgressEvent::Content { content }).await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use orchestrator_domain::AnswerRecord;
    use serde_json::Map;

    fn params() -> StreamParams {
        StreamParams::default()
            .with_chunk_delay(Duration::ZERO)
            .with_poll_interval(Duration::from_millis(5))
    }

    fn report(text: &str) -> OrchestrationReport {
        OrchestrationReport {
            report: text.to_string(),
            answered_subquestions: vec![AnswerRecord::answered(1, "q", "a", vec![], Map::new())],
            order: vec![1],
            fallback_plan: false,
        }
    }

    async fn collect(stream: EventStream) -> Vec<ProgressEvent> {
        stream.into_stream().collect().await
    }

    #[tokio::test]
    async fn test_event_order_and_cumulative_content() {
        let stream = spawn_run(&params(), |progress| async move {
            progress.on_run_start("q").await;
            progress.on_tool_call(1, "get_stock_symbol", "ticker?").await;
            progress.on_tool_complete(1, "get_stock_symbol", true).await;
            Ok(report("FPT is up. Good."))
        });
        let events = collect(stream).await;
        let kinds: Vec<_> = events.iter().map(|e| e.type_name()).collect();

        assert_eq!(&kinds[..4], ["start", "reasoning", "tool_call", "tool_complete"]);
        assert_eq!(*kinds.last().unwrap(), "done");
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);

        let contents: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Content { content } => Some(content.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(contents.last(), Some(&"FPT is up. Good."));
        assert!(contents.windows(2).all(|w| w[1].starts_with(w[0])));
    }

    #[tokio::test]
    async fn test_failed_run_yields_one_error() {
        let stream = spawn_run(&params(), |_progress| async move { Err("graph rejected".to_string()) });
        let events = collect(stream).await;
        assert_eq!(events, vec![ProgressEvent::Error { error: "graph rejected".into() }]);
    }

    #[tokio::test]
    async fn test_empty_error_message_replaced() {
        let stream = spawn_run(&params(), |_progress| async move { Err(String::new()) });
        match collect(stream).await.as_slice() {
            [ProgressEvent::Error { error }] => assert!(!error.is_empty()),
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_worker_gone_without_sentinel() {
        let (tx, rx) = mpsc::channel(4);
        drop(tx);
        let mut stream = EventStream::new(rx, Duration::from_millis(5));
        assert!(matches!(stream.next().await, Some(ProgressEvent::Error { .. })));
        assert!(stream.next().await.is_none());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_waits_across_poll_timeouts() {
        let stream = spawn_run(&params(), |_progress| async move {
            tokio::time::sleep(Duration::from_millis(40)).await;
            Ok(report("ok"))
        });
        let events = collect(stream).await;
        assert!(matches!(events.last(), Some(ProgressEvent::Done { .. })));
    }

    #[tokio::test]
    async fn test_dropped_consumer_lets_worker_finish() {
        let (done_tx, done_rx) = tokio::sync::oneshot::channel();
        let stream = spawn_run(&params().with_channel_capacity(1), |progress| async move {
            for i in 0..10 {
                progress.on_tool_call(i, "t", "q").await;
            }
            let _ = done_tx.send(());
            Ok(report("finished"))
        });
        drop(stream);
        tokio::time::timeout(Duration::from_secs(1), done_rx)
            .await
            .expect("worker should not block on a dropped consumer")
            .unwrap();
    }
}
