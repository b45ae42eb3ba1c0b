//! Standard input for the line-based games, with Ctrl+C as end of input
//!
//! Lines are read on a helper thread, one per request, and handed over a
//! channel. Ctrl+C pushes an interrupt onto the same channel and the reader
//! reports it as end of input, so every game leaves through its farewell.
//! The thread only reads while a prompt is waiting, which keeps it from
//! taking lines meant for a child game started by the launcher.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::io::{self, BufRead, BufReader, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

#[derive(Debug)]
enum InputEvent {
    Line(Vec<u8>),
    Eof,
    Interrupt,
}

/// Handle that delivers interrupts to an [`InterruptibleInput`]
#[derive(Clone)]
pub struct InterruptSender {
    events: Sender<InputEvent>,
    suspended: Arc<AtomicBool>,
}

impl InterruptSender {
    /// Wake the pending prompt as if input had ended
    pub fn interrupt(&self) {
        if self.suspended.load(Ordering::SeqCst) {
            debug!("interrupt left to the running child");
            return;
        }
        // Receiver gone means the game has already finished
        let _ = self.events.send(InputEvent::Interrupt);
    }

    /// Hold interrupts back until the guard is dropped
    pub fn suspend(&self) -> SuspendGuard {
        self.suspended.store(true, Ordering::SeqCst);
        SuspendGuard(Arc::clone(&self.suspended))
    }
}

pub struct SuspendGuard(Arc<AtomicBool>);

impl Drop for SuspendGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// `BufRead` fed by the reader thread
pub struct InterruptibleInput {
    events: Receiver<InputEvent>,
    requests: Sender<()>,
    buf: Vec<u8>,
    pos: usize,
    /// A line has been requested and not yet delivered
    pending: bool,
    closed: bool,
}

/// Read lines from `source` on a helper thread
pub fn spawn<S>(source: S) -> Result<(InterruptSender, InterruptibleInput)>
where
    S: Read + Send + 'static,
{
    let (event_tx, event_rx) = mpsc::channel();
    let (request_tx, request_rx) = mpsc::channel::<()>();

    let lines = event_tx.clone();
    thread::Builder::new()
        .name("console-input".to_string())
        .spawn(move || {
            let mut reader = BufReader::new(source);
            for () in request_rx {
                let mut line = Vec::new();
                let event = match reader.read_until(b'\n', &mut line) {
                    Ok(0) => InputEvent::Eof,
                    Ok(_) => InputEvent::Line(line),
                    Err(e) => {
                        warn!("console input failed: {}", e);
                        InputEvent::Eof
                    }
                };
                let done = matches!(event, InputEvent::Eof);
                if lines.send(event).is_err() || done {
                    break;
                }
            }
        })
        .context("Failed to start console input thread")?;

    let interrupts = InterruptSender {
        events: event_tx,
        suspended: Arc::new(AtomicBool::new(false)),
    };
    let input = InterruptibleInput {
        events: event_rx,
        requests: request_tx,
        buf: Vec::new(),
        pos: 0,
        pending: false,
        closed: false,
    };
    Ok((interrupts, input))
}

pub fn stdin() -> Result<(InterruptSender, InterruptibleInput)> {
    spawn(io::stdin())
}

/// Turn every Ctrl+C into an interrupt for the console
pub async fn forward_ctrl_c(interrupts: InterruptSender) {
    while tokio::signal::ctrl_c().await.is_ok() {
        debug!("ctrl-c received");
        interrupts.interrupt();
    }
}

impl BufRead for InterruptibleInput {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.buf.len() && !self.closed {
            if !self.pending {
                if self.requests.send(()).is_err() {
                    self.closed = true;
                    return Ok(&[]);
                }
                self.pending = true;
            }

            match self.events.recv() {
                Ok(InputEvent::Line(line)) => {
                    self.pending = false;
                    self.buf = line;
                    self.pos = 0;
                }
                // The requested line stays pending for the next prompt
                Ok(InputEvent::Interrupt) => return Ok(&[]),
                Ok(InputEvent::Eof) | Err(_) => self.closed = true,
            }
        }

        if self.closed && self.pos >= self.buf.len() {
            return Ok(&[]);
        }
        Ok(&self.buf[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.buf.len());
    }
}

impl Read for InterruptibleInput {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{guess, rps, Console};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn console(input: &str) -> (InterruptSender, Console<InterruptibleInput, Vec<u8>>) {
        let (interrupts, input) = spawn(Cursor::new(input.to_string())).unwrap();
        (interrupts, Console::new(input, Vec::new()))
    }

    fn output(console: Console<InterruptibleInput, Vec<u8>>) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn test_lines_then_end_of_input() {
        let (_interrupts, mut console) = console("first\n second \n");

        assert_eq!(console.read_line("> ").unwrap(), Some("first".to_string()));
        assert_eq!(console.read_line("> ").unwrap(), Some("second".to_string()));
        assert_eq!(console.read_line("> ").unwrap(), None);
        assert_eq!(console.read_line("> ").unwrap(), None);
    }

    #[test]
    fn test_interrupt_reads_as_end_of_input() {
        let (interrupts, mut console) = console("1\n2\n");

        assert_eq!(console.read_line("> ").unwrap(), Some("1".to_string()));
        interrupts.interrupt();
        assert_eq!(console.read_line("> ").unwrap(), None);
        // The line requested before the interrupt answers the next prompt
        assert_eq!(console.read_line("> ").unwrap(), Some("2".to_string()));
    }

    #[test]
    fn test_suspended_interrupts_are_dropped() {
        let (interrupts, mut console) = console("menu\n");

        {
            let _held = interrupts.suspend();
            interrupts.interrupt();
        }
        assert_eq!(console.read_line("> ").unwrap(), Some("menu".to_string()));

        interrupts.interrupt();
        assert_eq!(console.read_line("> ").unwrap(), None);
    }

    #[test]
    fn test_interrupted_guess_says_goodbye() {
        let (interrupts, mut console) = console("50\n");
        interrupts.interrupt();

        let stats = guess::run(&mut console, &mut StdRng::seed_from_u64(3)).unwrap();

        assert_eq!(stats.played, 0);
        assert!(output(console).contains("Thanks for playing!"));
    }

    #[test]
    fn test_interrupted_rps_says_goodbye() {
        let (interrupts, mut console) = console("rock\n");
        interrupts.interrupt();

        let tally = rps::run(&mut console, &mut StdRng::seed_from_u64(3)).unwrap();

        assert_eq!(tally.total(), 0);
        assert!(output(console).contains("Thanks for playing!"));
    }
}
