//! Bidirectional byte streams a connection can be built on.
//!
//! A network peer and the local operator console are used interchangeably:
//! both are a readable byte source plus a writable byte sink.

use std::fmt;

use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpStream,
};

pub type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
pub type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Exclusively owned inbound and outbound halves of one connection.
pub struct Transport {
    reader: BoxedReader,
    writer: BoxedWriter,
    label: String,
}

impl Transport {
    pub fn new<R, W>(reader: R, writer: W, label: impl Into<String>) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            reader: Box::new(reader),
            writer: Box::new(writer),
            label: label.into(),
        }
    }

    /// Transport over an accepted TCP stream, labelled with the peer address.
    pub fn tcp(stream: TcpStream) -> Self {
        let label = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown peer".to_string());
        let (reader, writer) = stream.into_split();
        Self::new(reader, writer, label)
    }

    /// Transport over the process's own stdin/stdout (the operator console).
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout(), "console")
    }

    pub fn into_parts(self) -> (BoxedReader, BoxedWriter, String) {
        (self.reader, self.writer, self.label)
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
