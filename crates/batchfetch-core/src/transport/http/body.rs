//! Streamed GET body.
//!
//! libcurl pushes body data through a callback, so each GET runs on its own
//! thread and hands chunks to the reader over a bounded channel. Dropping the
//! receiving side makes the next write callback abort the transfer.

use super::parse::HeaderInfo;
use super::HttpOptions;
use crate::progress::ReadClose;
use crate::transport::{is_success, Response, TransportError};
use std::cell::{Cell, RefCell};
use std::io::{self, Read};
use std::str;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;
use url::Url;

/// Chunks buffered between the transfer thread and the reader.
const CHANNEL_DEPTH: usize = 16;

enum Message {
    /// Final response headers were accepted; body follows.
    Head { content_length: Option<u64> },
    Data(Vec<u8>),
    Done,
    Failed(TransportError),
}

/// Body of an HTTP GET, read as it arrives.
#[derive(Debug)]
pub struct HttpBody {
    rx: Option<Receiver<Message>>,
    chunk: Vec<u8>,
    pos: usize,
    done: bool,
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::Head { content_length } => {
                write!(f, "Head({:?})", content_length)
            }
            Message::Data(d) => write!(f, "Data({} bytes)", d.len()),
            Message::Done => f.write_str("Done"),
            Message::Failed(e) => write!(f, "Failed({})", e),
        }
    }
}

impl HttpBody {
    /// Starts the GET and waits until the final status is known.
    /// A non-2xx status fails here rather than on the first read.
    pub(super) fn open(url: Url, options: HttpOptions) -> Result<Response<HttpBody>, TransportError> {
        let (tx, rx) = mpsc::sync_channel(CHANNEL_DEPTH);
        thread::Builder::new()
            .name("batchfetch-get".to_string())
            .spawn(move || run_get(&url, &options, &tx))?;

        match rx.recv() {
            Ok(Message::Head { content_length }) => Ok(Response {
                body: HttpBody {
                    rx: Some(rx),
                    chunk: Vec::new(),
                    pos: 0,
                    done: false,
                },
                content_length,
            }),
            Ok(Message::Failed(e)) => Err(e),
            Ok(other) => {
                tracing::warn!(message = ?other, "GET produced data before headers");
                Err(TransportError::Disconnected)
            }
            Err(_) => Err(TransportError::Disconnected),
        }
    }
}

impl Read for HttpBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if self.pos < self.chunk.len() {
                let n = buf.len().min(self.chunk.len() - self.pos);
                buf[..n].copy_from_slice(&self.chunk[self.pos..self.pos + n]);
                self.pos += n;
                return Ok(n);
            }
            if self.done || buf.is_empty() {
                return Ok(0);
            }
            let rx = match &self.rx {
                Some(rx) => rx,
                None => return Ok(0),
            };
            match rx.recv() {
                Ok(Message::Data(data)) => {
                    self.chunk = data;
                    self.pos = 0;
                }
                Ok(Message::Done) => self.done = true,
                Ok(Message::Failed(e)) => {
                    self.done = true;
                    return Err(e.into());
                }
                Ok(Message::Head { .. }) => {}
                Err(_) => {
                    self.done = true;
                    return Err(TransportError::Disconnected.into());
                }
            }
        }
    }
}

impl ReadClose for HttpBody {
    /// Abandons the transfer without joining its thread. The worker stops
    /// at its next write callback, when the send fails, or when the
    /// low-speed timeout fires if the server has gone quiet.
    fn close(&mut self) -> io::Result<()> {
        // dropping the receiver aborts an unfinished transfer
        self.rx = None;
        self.done = true;
        self.chunk.clear();
        self.pos = 0;
        Ok(())
    }
}

/// Transfer thread entry point: reports the outcome on `tx`.
fn run_get(url: &Url, options: &HttpOptions, tx: &SyncSender<Message>) {
    match perform_get(url, options, tx) {
        Ok(()) => {
            let _ = tx.send(Message::Done);
        }
        Err(e) => {
            tracing::debug!(%url, "GET failed: {}", e);
            let _ = tx.send(Message::Failed(e));
        }
    }
}

fn perform_get(
    url: &Url,
    options: &HttpOptions,
    tx: &SyncSender<Message>,
) -> Result<(), TransportError> {
    let headers = RefCell::new(HeaderInfo::default());
    let started = Cell::new(false);
    let rejected = Cell::new(None::<u32>);
    let hung_up = Cell::new(false);

    // Sends the head message once; false if the status is not 2xx or the reader is gone.
    let start_body = || -> bool {
        if started.replace(true) {
            return true;
        }
        let info = headers.borrow().clone();
        let code = info.status.unwrap_or(200);
        if !is_success(code) {
            rejected.set(Some(code));
            return false;
        }
        let head = Message::Head {
            content_length: info.content_length,
        };
        if tx.send(head).is_err() {
            hung_up.set(true);
            return false;
        }
        true
    };

    let mut easy = curl::easy::Easy::new();
    options.configure(&mut easy, url)?;

    let performed;
    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.borrow_mut().push_line(s);
            }
            true
        })?;
        transfer.write_function(|data| {
            if !start_body() {
                return Ok(0); // abort transfer
            }
            if tx.send(Message::Data(data.to_vec())).is_err() {
                hung_up.set(true);
                return Ok(0);
            }
            Ok(data.len())
        })?;
        performed = transfer.perform();
    }

    if let Some(code) = rejected.get() {
        return Err(TransportError::Status { code });
    }
    if hung_up.get() {
        tracing::debug!(%url, "reader closed before transfer finished");
        return Ok(());
    }
    performed?;

    let code = easy.response_code()?;
    if !is_success(code) {
        return Err(TransportError::Status { code });
    }
    // empty bodies never reach the write callback
    if !start_body() {
        return Ok(());
    }
    tracing::debug!(%url, "GET complete");
    Ok(())
}
