//! Line codec over a client connection
//!
//! Reads one CRLF-terminated command line per call and writes responses,
//! flushing after each one.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter,
};
use tokio::net::TcpStream;

use crate::error::{Error, Result};
use crate::protocol::Response;

/// Longest command line accepted, terminator included
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

type Reader = BufReader<Box<dyn AsyncRead + Send + Unpin>>;
type Writer = BufWriter<Box<dyn AsyncWrite + Send + Unpin>>;

/// A client connection split into buffered read and write halves
pub struct Connection {
    reader: Reader,
    writer: Writer,
    peer_addr: Option<SocketAddr>,
    read_timeout: Duration,
    max_line_length: usize,
}

impl Connection {
    /// Wrap arbitrary read and write halves
    pub fn new<R, W>(reader: R, writer: W, read_timeout: Duration) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            reader: BufReader::new(Box::new(reader)),
            writer: BufWriter::new(Box::new(writer)),
            peer_addr: None,
            read_timeout,
            max_line_length: MAX_LINE_LENGTH,
        }
    }

    /// Replace the command line length limit
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Create a new plain TCP connection
    pub fn plain(stream: TcpStream, read_timeout: Duration) -> Result<Self> {
        let peer_addr = stream.peer_addr()?;
        let (read_half, write_half) = stream.into_split();
        let mut connection = Self::new(read_half, write_half, read_timeout);
        connection.peer_addr = Some(peer_addr);
        Ok(connection)
    }

    /// Get the peer address of the underlying TCP stream
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }

    /// Read one line, without its line terminator.
    ///
    /// Returns `None` once the client has closed its side. Fails with
    /// `Error::Timeout` if no complete line arrives within the read timeout,
    /// and with `Error::LineTooLong` once the line outgrows the limit.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        let mut limited = (&mut self.reader).take(self.max_line_length as u64);
        let read = tokio::time::timeout(self.read_timeout, limited.read_until(b'\n', &mut buf))
            .await
            .map_err(|_| Error::Timeout)??;

        if read == 0 {
            return Ok(None);
        }
        if read == self.max_line_length && !buf.ends_with(b"\n") {
            return Err(Error::LineTooLong(self.max_line_length));
        }
        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    /// Write a response to the connection
    pub async fn write_response(&mut self, response: &Response) -> Result<()> {
        self.write_all(response.to_string().as_bytes()).await
    }

    /// Write raw bytes to the connection
    pub async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.writer.write_all(buf).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Flush and shut down the write side
    pub async fn shutdown(&mut self) -> Result<()> {
        self.writer.flush().await?;
        self.writer.shutdown().await?;
        Ok(())
    }
}
