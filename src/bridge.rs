use core::cell::{Cell, RefCell};

use critical_section::{CriticalSection, Mutex};
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{self, TryReceiveError},
};

use crate::{handler::Handler, response::Response, Outcome, Packet, Transaction};

pub type TransactionChannel<const N: usize, const SZ: usize> =
    channel::Channel<CriticalSectionRawMutex, Transaction<N>, SZ>;

/// [`Handler`] that forwards finished transactions to async code.
///
/// Reads are answered from a staged [`Response`], set with
/// [`respond`](Self::respond). Pass `&Bridge` to the slave; the bridge
/// itself normally lives in a `static`.
pub struct Bridge<const N: usize, const CHSIZE: usize> {
    channel: TransactionChannel<N, CHSIZE>,
    response: Mutex<RefCell<Response<N>>>,
    dropped: Mutex<Cell<usize>>,
}

impl<const N: usize, const CHSIZE: usize> Bridge<N, CHSIZE> {
    pub const fn new() -> Self {
        Self {
            channel: TransactionChannel::new(),
            response: Mutex::new(RefCell::new(Response::new())),
            dropped: Mutex::new(Cell::new(0)),
        }
    }

    /// Waits for the next finished transaction.
    pub async fn receive(&self) -> Transaction<N> {
        self.channel.receive().await
    }

    pub fn try_receive(&self) -> Option<Transaction<N>> {
        match self.channel.try_receive() {
            Ok(transaction) => Some(transaction),
            Err(TryReceiveError::Empty) => None,
        }
    }

    /// Stages the bytes served to the next reads. Returns what did not fit.
    pub fn respond<'a>(&self, cs: CriticalSection, buf: &'a [u8]) -> &'a [u8] {
        self.response.borrow_ref_mut(cs).write(buf)
    }

    pub fn respond_now<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        critical_section::with(|cs| self.respond(cs, buf))
    }

    /// Transactions lost because the channel was full.
    pub fn dropped(&self) -> usize {
        critical_section::with(|cs| self.dropped.borrow(cs).get())
    }
}

impl<const N: usize, const CHSIZE: usize> Default for Bridge<N, CHSIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize, const CHSIZE: usize> Handler<N> for &Bridge<N, CHSIZE> {
    fn on_read(&mut self, _address: u8, payload: &mut [u8; N]) {
        critical_section::with(|cs| self.response.borrow_ref(cs).fill(payload));
    }

    fn on_stop(&mut self, packet: &Packet<N>, outcome: Outcome) {
        let transaction = Transaction {
            packet: *packet,
            outcome,
        };

        if self.channel.try_send(transaction).is_err() {
            warn!("i2c: channel full, transaction dropped");
            critical_section::with(|cs| {
                let dropped = self.dropped.borrow(cs);
                dropped.set(dropped.get() + 1);
            });
        }
    }
}
