use crate::{bus::Bus, handler::Handler, slave::SoftSlave, Outcome, State};

impl<B: Bus, H: Handler<N>, const N: usize> SoftSlave<B, H, N> {
    /// Sampling edge. SDA is never touched here.
    pub(crate) fn clock_rise(&mut self) {
        if self.state.is_idle() {
            return;
        }

        if self.packet.is_full() {
            warn!("i2c: payload full after {=usize} bytes", self.packet.len());
            return self.finish(Outcome::BufferFull);
        }

        match self.state {
            State::Stop | State::Start | State::AddrAck | State::DataAck => {}
            State::Addr0
            | State::Addr1
            | State::Addr2
            | State::Addr3
            | State::Addr4
            | State::Addr5
            | State::Addr6 => {
                let bit = self.bus.sda();
                self.packet.shift_address(bit);
            }
            // 0 on the wire means the master writes.
            State::RwBit => {
                let bit = self.bus.sda();
                self.packet.set_write(!bit);
            }
            State::Data0
            | State::Data1
            | State::Data2
            | State::Data3
            | State::Data4
            | State::Data5
            | State::Data6
            | State::Data7 => {
                if self.packet.is_write() {
                    let bit = self.bus.sda();
                    self.packet.shift_data(bit);
                }
            }
        }
    }

    /// Driving edge. The only place SDA changes during a transaction.
    pub(crate) fn clock_fall(&mut self) {
        if self.state.is_idle() {
            // A transaction cut on a rising edge may still hold the line.
            self.bus.release();
            return;
        }

        match self.state {
            State::Stop
            | State::Start
            | State::Addr0
            | State::Addr1
            | State::Addr2
            | State::Addr3
            | State::Addr4
            | State::Addr5
            | State::Addr6 => {}

            State::RwBit => {
                if self.config.accepts(self.packet.address()) {
                    self.bus.drive(false);
                } else {
                    self.ignore();
                }
            }

            State::AddrAck => {
                if self.packet.is_write() {
                    self.bus.release();
                } else {
                    let address = self.packet.address();
                    self.handler.on_read(address, self.packet.buffer_mut());
                    self.bus.drive(self.packet.outgoing_bit(7));
                }
            }

            state @ (State::Data0
            | State::Data1
            | State::Data2
            | State::Data3
            | State::Data4
            | State::Data5
            | State::Data6) => {
                if !self.packet.is_write() {
                    let slot = state.data_slot().unwrap_or(0);
                    self.bus.drive(self.packet.outgoing_bit(6 - slot));
                }
            }

            State::Data7 => {
                if self.packet.is_write() {
                    self.bus.drive(false);
                } else {
                    self.bus.release();
                }
                self.packet.advance();
            }

            State::DataAck => {
                if self.packet.is_write() {
                    // Read back right after letting go of our own ACK.
                    self.bus.release();
                    if self.bus.sda() {
                        warn!("i2c: ack read back high");
                        self.finish(Outcome::AckAnomaly);
                    }
                } else if self.bus.sda() {
                    self.finish(Outcome::Nack);
                } else {
                    self.bus.drive(self.packet.outgoing_bit(7));
                }
            }
        }

        self.state = self.state.next();
    }
}
