use crate::{Outcome, Packet};

/// Consumer side of the slave. Both hooks run in interrupt context and must
/// return quickly without blocking.
pub trait Handler<const N: usize> {
    /// The master started reading from `address`.
    ///
    /// Called once per read transaction, before the first bit goes out. All
    /// bytes of the transfer are taken from `payload`, so it has to be
    /// filled completely here.
    fn on_read(&mut self, address: u8, payload: &mut [u8; N]);

    /// The transaction ended. `packet.len()` tells how many bytes were moved.
    fn on_stop(&mut self, packet: &Packet<N>, outcome: Outcome);
}

impl<H: Handler<N> + ?Sized, const N: usize> Handler<N> for &mut H {
    fn on_read(&mut self, address: u8, payload: &mut [u8; N]) {
        H::on_read(self, address, payload)
    }

    fn on_stop(&mut self, packet: &Packet<N>, outcome: Outcome) {
        H::on_stop(self, packet, outcome)
    }
}
