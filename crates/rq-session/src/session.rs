use std::fmt;

use rq_rag::RagError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::state::AppState;

/// Typed on its own line (any case) to end the session.
pub const EXIT_TOKEN: &str = "exit";

const GREETING: &str = "Welcome to the AI Query Agent!\nType your questions below. Type 'exit' to quit.\n";
const PROMPT: &str = "Enter your query: ";
const FAREWELL: &str = "Goodbye!\n";

/// Where the session is in its read/process/report cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    AwaitingInput,
    Processing,
    Reporting,
    Terminated,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::AwaitingInput => write!(f, "awaiting_input"),
            Self::Processing => write!(f, "processing"),
            Self::Reporting => write!(f, "reporting"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}

/// One line of user input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Exit,
    Empty,
    Query(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            Self::Empty
        } else if line.eq_ignore_ascii_case(EXIT_TOKEN) {
            Self::Exit
        } else {
            Self::Query(line.to_string())
        }
    }
}

/// What the session shows the user after processing a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Answer(String),
    Error(String),
}

impl Report {
    fn from_error(err: &RagError) -> Self {
        match err {
            RagError::EmptyIndex => Self::Error(err.to_string()),
            other => Self::Error(format!("An error occurred: {other}")),
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Answer(text) => format!("\nAI Response:\n{text}\n"),
            Self::Error(message) => format!("{message}\n"),
        }
    }
}

/// Read-eval-report loop. Processes exactly one query at a time; a failed
/// query is reported and the loop continues.
pub struct QuerySession<'a> {
    id: Uuid,
    state: &'a AppState,
    phase: SessionPhase,
    queries_answered: usize,
    queries_failed: usize,
}

impl<'a> QuerySession<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            id: Uuid::new_v4(),
            state,
            phase: SessionPhase::Idle,
            queries_answered: 0,
            queries_failed: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn queries_answered(&self) -> usize {
        self.queries_answered
    }

    pub fn queries_failed(&self) -> usize {
        self.queries_failed
    }

    /// Leave `Idle`. The retriever inside `AppState` is already built.
    pub fn start(&mut self) {
        if self.phase == SessionPhase::Idle {
            self.phase = SessionPhase::AwaitingInput;
        }
    }

    /// Handle one input line.
    ///
    /// Returns the report to show for a query, `None` for blank input or the
    /// exit token. Input after termination is ignored.
    pub async fn handle_line(&mut self, line: &str) -> Option<Report> {
        self.start();
        if self.phase == SessionPhase::Terminated {
            return None;
        }
        match Input::parse(line) {
            Input::Empty => None,
            Input::Exit => {
                self.phase = SessionPhase::Terminated;
                None
            }
            Input::Query(query) => Some(self.process(&query).await),
        }
    }

    async fn process(&mut self, query: &str) -> Report {
        self.phase = SessionPhase::Processing;
        let seq = self.queries_answered + self.queries_failed + 1;
        let span = info_span!("query", session = %self.id, seq);
        let outcome = self.state.answer_query(query).instrument(span).await;

        self.phase = SessionPhase::Reporting;
        let report = match outcome {
            Ok(answer) => {
                self.queries_answered += 1;
                Report::Answer(answer)
            }
            Err(err) => {
                self.queries_failed += 1;
                if err.is_recoverable() {
                    warn!(session = %self.id, seq, error = %err, "query failed");
                } else {
                    error!(session = %self.id, seq, error = %err, "query failed");
                }
                Report::from_error(&err)
            }
        };
        self.phase = SessionPhase::AwaitingInput;
        report
    }

    /// Drive the session over `input`/`output` until the exit token or EOF.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.start();
        info!(session = %self.id, documents = self.state.retriever.len(), "session started");
        output.write_all(GREETING.as_bytes()).await?;

        let mut lines = input.lines();
        while self.phase != SessionPhase::Terminated {
            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                output.write_all(b"\n").await?;
                self.phase = SessionPhase::Terminated;
                break;
            };
            if let Some(report) = self.handle_line(&line).await {
                output.write_all(report.render().as_bytes()).await?;
            }
        }

        output.write_all(FAREWELL.as_bytes()).await?;
        output.flush().await?;
        info!(
            session = %self.id,
            answered = self.queries_answered,
            failed = self.queries_failed,
            "session terminated"
        );
        Ok(())
    }
}
