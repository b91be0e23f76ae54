//! Interactive and one-shot assistant chat.

use std::error::Error;
use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use assetdesk_client::{ChatSession, ClientConfig, ClientError, SessionEvent};
use assetdesk_core::MessageId;

/// A line typed at the chat prompt.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Quit,
    Clear,
    Connect,
    Disconnect,
    Message(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    match line.trim() {
        "" => Input::Empty,
        "/quit" | "/exit" => Input::Quit,
        "/clear" => Input::Clear,
        "/connect" => Input::Connect,
        "/disconnect" => Input::Disconnect,
        text => Input::Message(text),
    }
}

/// Writes session events to stdout as a running transcript.
#[derive(Default)]
struct Transcript {
    /// An answer line is open and still receiving characters.
    mid_line: bool,
}

impl Transcript {
    fn render(&mut self, session: &ChatSession, event: &SessionEvent) -> io::Result<()> {
        let mut out = io::stdout().lock();
        match event {
            SessionEvent::Connected => {
                self.end_line(&mut out)?;
                writeln!(out, "[connected]")?;
            }
            SessionEvent::Disconnected { reason } => {
                self.end_line(&mut out)?;
                match reason {
                    Some(reason) => writeln!(out, "[disconnected: {}]", reason)?,
                    None => writeln!(out, "[disconnected]")?,
                }
            }
            SessionEvent::AnswerStarted(_) => {
                self.end_line(&mut out)?;
                write!(out, "assistant> ")?;
                self.mid_line = true;
            }
            SessionEvent::RevealAdvanced { ch, .. } => {
                write!(out, "{}", ch)?;
            }
            SessionEvent::RevealFinished(id) => {
                self.end_line(&mut out)?;
                write_sources(&mut out, session, id)?;
            }
        }
        out.flush()
    }

    fn end_line(&mut self, out: &mut impl Write) -> io::Result<()> {
        if std::mem::take(&mut self.mid_line) {
            writeln!(out)?;
        }
        Ok(())
    }
}

fn write_sources(out: &mut impl Write, session: &ChatSession, id: &MessageId) -> io::Result<()> {
    if let Some(message) = session.store().get(id) {
        for source in message.sources() {
            writeln!(out, "  Source: {}", source)?;
        }
    }
    Ok(())
}

/// Interactive chat until `/quit` or end of input.
pub async fn run_chat(config: &ClientConfig) -> Result<(), Box<dyn Error>> {
    let mut session = ChatSession::new(config)?;
    info!(url = %session.url(), "Starting chat");
    println!("AI Assistant - ask anything about your assets.");
    println!("Commands: /clear, /connect, /disconnect, /quit");
    session.connect();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut transcript = Transcript::default();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_input(&line) {
                    Input::Empty => {}
                    Input::Quit => break,
                    Input::Clear => {
                        session.clear();
                        transcript = Transcript::default();
                        println!("[chat cleared]");
                    }
                    Input::Connect => session.connect(),
                    Input::Disconnect => {
                        session.disconnect();
                        println!("[disconnected]");
                    }
                    Input::Message(_) if session.is_pending() => {
                        println!("[still waiting for the previous answer]");
                    }
                    Input::Message(text) => {
                        if let Err(e) = session.send_message(text) {
                            println!("[not sent: {}]", e);
                        }
                    }
                }
            }
            event = session.next_event() => {
                transcript.render(&session, &event)?;
            }
        }
    }

    session.disconnect();
    info!("Chat ended");
    Ok(())
}

/// Ask one question, print the revealed answer, and return.
pub async fn ask(config: &ClientConfig, question: &str) -> Result<(), Box<dyn Error>> {
    let mut session = ChatSession::new(config)?;
    session.connect();

    let mut out = io::stdout();
    loop {
        match session.next_event().await {
            SessionEvent::Connected => {
                session.send_message(question)?;
            }
            SessionEvent::Disconnected { reason } => {
                return Err(connection_lost(reason).into());
            }
            SessionEvent::AnswerStarted(_) => {}
            SessionEvent::RevealAdvanced { ch, .. } => {
                write!(out, "{}", ch)?;
                out.flush()?;
            }
            SessionEvent::RevealFinished(id) => {
                writeln!(out)?;
                write_sources(&mut out, &session, &id)?;
                return Ok(());
            }
        }
    }
}

fn connection_lost(reason: Option<String>) -> ClientError {
    ClientError::Connection(reason.unwrap_or_else(|| "closed by server".to_string()))
}
