//! Scripted capability doubles shared by the unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::time::Duration;

use crate::core::address::{AddressParseError, BtAddress};
use crate::core::error::{ConnectionError, DiscoveryError};
use crate::core::traits::{Connector, Discoverer, Transport};

/// One scripted read outcome.
pub enum ReadStep {
    /// Deliver these bytes (possibly fewer than the caller asked for).
    Data(Vec<u8>),
    /// Report peer closure.
    Eof,
    /// Fail with this error kind.
    Err(io::ErrorKind),
}

/// A transport that replays a script of read outcomes and records writes.
///
/// Once the script is exhausted the transport behaves like a silent peer:
/// reads and readiness waits pend forever, so callers exercise their
/// deadlines.
#[derive(Default)]
pub struct ScriptedTransport {
    reads: VecDeque<ReadStep>,
    pub written: Vec<u8>,
    pub fail_write: Option<io::ErrorKind>,
    pub fail_shutdown: Option<io::ErrorKind>,
    pub fail_close: Option<io::ErrorKind>,
    pub shutdown_calls: usize,
    pub close_calls: usize,
}

impl ScriptedTransport {
    /// A connected transport that never produces data.
    pub fn silent() -> Self {
        Self::default()
    }

    /// A transport that replays the given read script.
    pub fn with_reads(reads: Vec<ReadStep>) -> Self {
        Self {
            reads: reads.into(),
            ..Self::default()
        }
    }

    /// Append one read outcome to the script.
    pub fn push_read(&mut self, step: ReadStep) {
        self.reads.push_back(step);
    }
}

impl Transport for ScriptedTransport {
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reads.pop_front() {
            None => std::future::pending().await,
            Some(ReadStep::Data(mut data)) => {
                let n = data.len().min(buf.len());
                let rest = data.split_off(n);
                buf[..n].copy_from_slice(&data);
                if !rest.is_empty() {
                    self.reads.push_front(ReadStep::Data(rest));
                }
                Ok(n)
            }
            Some(ReadStep::Eof) => Ok(0),
            Some(ReadStep::Err(kind)) => Err(kind.into()),
        }
    }

    async fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        if let Some(kind) = self.fail_write {
            return Err(kind.into());
        }
        self.written.extend_from_slice(buf);
        Ok(())
    }

    async fn readable(&mut self) -> io::Result<()> {
        if self.reads.is_empty() {
            std::future::pending().await
        } else {
            Ok(())
        }
    }

    async fn shutdown(&mut self) -> io::Result<()> {
        self.shutdown_calls += 1;
        match self.fail_shutdown {
            Some(kind) => Err(kind.into()),
            None => Ok(()),
        }
    }

    async fn close(&mut self) -> io::Result<()> {
        self.close_calls += 1;
        match self.fail_close {
            Some(kind) => Err(kind.into()),
            None => Ok(()),
        }
    }
}

/// A connector that hands out pre-scripted transports per address.
#[derive(Default)]
pub struct MockConnector {
    /// Addresses whose connection attempt is refused.
    pub refuse: HashSet<BtAddress>,
    /// Addresses whose connection attempt never completes.
    pub hang: HashSet<BtAddress>,
    /// Transports to hand out; addresses not present get a silent transport.
    pub transports: std::sync::Mutex<HashMap<BtAddress, ScriptedTransport>>,
}

impl MockConnector {
    /// Stage a scripted transport for an address.
    pub fn stage(&self, address: BtAddress, transport: ScriptedTransport) {
        self.transports.lock().unwrap().insert(address, transport);
    }
}

impl Connector for MockConnector {
    type Transport = ScriptedTransport;

    async fn connect(
        &self,
        address: BtAddress,
        _channel: u8,
    ) -> Result<Self::Transport, ConnectionError> {
        if self.hang.contains(&address) {
            std::future::pending::<()>().await;
        }
        if self.refuse.contains(&address) {
            return Err(ConnectionError::ConnectFailed(
                io::ErrorKind::ConnectionRefused.into(),
            ));
        }
        Ok(self
            .transports
            .lock()
            .unwrap()
            .remove(&address)
            .unwrap_or_default())
    }
}

/// A raw inquiry response carrying an unresolved address string.
#[derive(Debug, Clone)]
pub struct MockCandidate(pub &'static str);

/// A discoverer that replays a fixed candidate list.
#[derive(Default)]
pub struct MockDiscoverer {
    pub candidates: Vec<MockCandidate>,
    pub names: HashMap<BtAddress, String>,
    /// Addresses whose name query never completes.
    pub stall_names: HashSet<BtAddress>,
    pub fail_inquiry: bool,
    pub inquiries: usize,
}

impl Discoverer for MockDiscoverer {
    type Candidate = MockCandidate;

    async fn inquire(
        &mut self,
        _scan: Duration,
        max_responses: usize,
    ) -> Result<Vec<Self::Candidate>, DiscoveryError> {
        self.inquiries += 1;
        if self.fail_inquiry {
            return Err(DiscoveryError::InquiryFailed(
                io::ErrorKind::BrokenPipe.into(),
            ));
        }
        Ok(self
            .candidates
            .iter()
            .take(max_responses)
            .cloned()
            .collect())
    }

    fn resolve_address(
        &self,
        candidate: &Self::Candidate,
    ) -> Result<BtAddress, AddressParseError> {
        candidate.0.parse()
    }

    async fn remote_name(&mut self, address: BtAddress) -> io::Result<String> {
        if self.stall_names.contains(&address) {
            std::future::pending::<()>().await;
        }
        match self.names.get(&address) {
            Some(name) => Ok(name.clone()),
            None => Err(io::ErrorKind::TimedOut.into()),
        }
    }
}
