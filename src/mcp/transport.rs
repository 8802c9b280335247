use async_trait::async_trait;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};
use tracing::{debug, trace};

use crate::mcp::{
    errors::{MCPError, MCPResult, TransportError},
    protocol::{MCPMessage, MessageParser},
};

/// Byte-stream transports the MCP server can drive. HTTP requests go
/// through `mcp_handlers` one message at a time and never open a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportType {
    Stdio,
}

/// Abstract transport trait for MCP communication
#[async_trait]
pub trait MCPTransport: Send {
    /// Send a message through the transport
    async fn send(&mut self, message: MCPMessage) -> MCPResult<()>;

    /// Receive the next message.
    ///
    /// Returns `TransportError::Closed` once the peer has gone away. A frame
    /// that is not valid JSON-RPC yields a protocol error and the transport
    /// stays usable.
    async fn receive(&mut self) -> MCPResult<MCPMessage>;

    async fn close(&mut self) -> MCPResult<()>;

    fn is_connected(&self) -> bool;

    fn transport_type(&self) -> TransportType;
}

/// Newline-delimited JSON-RPC over any async byte stream pair.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
    connected: bool,
    kind: TransportType,
}

/// JSON-RPC over the process's stdin/stdout.
pub type StdioTransport = LineTransport<BufReader<Stdin>, Stdout>;

impl StdioTransport {
    pub fn stdio() -> Self {
        LineTransport::new(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            TransportType::Stdio,
        )
    }
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W, kind: TransportType) -> Self {
        Self {
            reader,
            writer,
            connected: true,
            kind,
        }
    }
}

#[async_trait]
impl<R, W> MCPTransport for LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, message: MCPMessage) -> MCPResult<()> {
        if !self.connected {
            return Err(TransportError::Closed.into());
        }

        let mut frame = MessageParser::serialize_message(&message)?;
        frame.push(b'\n');

        let written = async {
            self.writer.write_all(&frame).await?;
            self.writer.flush().await
        }
        .await;
        if let Err(e) = written {
            self.connected = false;
            return Err(TransportError::Io(e).into());
        }

        trace!("Sent {} bytes", frame.len());
        Ok(())
    }

    async fn receive(&mut self) -> MCPResult<MCPMessage> {
        let mut line = String::new();
        loop {
            if !self.connected {
                return Err(TransportError::Closed.into());
            }

            line.clear();
            let read = self
                .reader
                .read_line(&mut line)
                .await
                .map_err(|e| {
                    self.connected = false;
                    MCPError::Transport(TransportError::Io(e))
                })?;

            if read == 0 {
                debug!("{:?} transport reached end of input", self.kind);
                self.connected = false;
                return Err(TransportError::Closed.into());
            }

            let frame = line.trim();
            if frame.is_empty() {
                continue;
            }

            return MessageParser::parse_message(frame.as_bytes());
        }
    }

    async fn close(&mut self) -> MCPResult<()> {
        if self.connected {
            self.connected = false;
            self.writer
                .shutdown()
                .await
                .map_err(|e| MCPError::Transport(TransportError::Io(e)))?;
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn transport_type(&self) -> TransportType {
        self.kind
    }
}
