#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use soft_i2c_slave::{
    handle_scl_interrupt, handle_sda_interrupt, Bus, Config, Handler, Outcome, Packet, SdaMode,
    SharedSlave, SoftSlave, DEFAULT_PAYLOAD_SIZE,
};

pub const N: usize = DEFAULT_PAYLOAD_SIZE;

/// Both lines with their pull-ups.
///
/// After the slave lets go of a line it was pulling low, the line keeps
/// reading low until the master does something, the way a loaded line
/// recovers through its pull-up. `strong_pullup` removes that delay.
pub struct Wire {
    pub scl: bool,
    pub master_sda_low: bool,
    pub slave_output: bool,
    pub slave_level: bool,
    pub settling: bool,
    pub strong_pullup: bool,
    pub slave_writes: usize,
}

impl Wire {
    pub fn new(strong_pullup: bool) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            scl: true,
            master_sda_low: false,
            slave_output: false,
            slave_level: true,
            settling: false,
            strong_pullup,
            slave_writes: 0,
        }))
    }

    pub fn sda(&self) -> bool {
        if self.master_sda_low {
            false
        } else if self.slave_output {
            self.slave_level
        } else {
            !self.settling
        }
    }
}

pub struct SimBus(pub Rc<RefCell<Wire>>);

impl Bus for SimBus {
    fn set_sda_mode(&mut self, mode: SdaMode) {
        let mut wire = self.0.borrow_mut();
        match mode {
            SdaMode::InputPullUp => {
                if wire.slave_output && !wire.slave_level && !wire.strong_pullup {
                    wire.settling = true;
                }
                wire.slave_output = false;
            }
            SdaMode::Output => {
                wire.slave_output = true;
                wire.settling = false;
            }
        }
    }

    fn write_sda(&mut self, high: bool) {
        let mut wire = self.0.borrow_mut();
        wire.slave_level = high;
        wire.slave_writes += 1;
    }

    fn sda(&mut self) -> bool {
        self.0.borrow().sda()
    }

    fn scl(&mut self) -> bool {
        self.0.borrow().scl
    }
}

/// Whatever receives the pin-change interrupts.
pub trait Target {
    fn sda_changed(&mut self);

    fn scl_changed(&mut self);
}

impl<H: Handler<M>, const M: usize> Target for SoftSlave<SimBus, H, M> {
    fn sda_changed(&mut self) {
        self.on_sda_change();
    }

    fn scl_changed(&mut self) {
        self.on_scl_change();
    }
}

impl<H: Handler<M>, const M: usize> Target for &SharedSlave<SimBus, H, M> {
    fn sda_changed(&mut self) {
        handle_sda_interrupt(*self);
    }

    fn scl_changed(&mut self) {
        handle_scl_interrupt(*self);
    }
}

/// Bit-level bus master. Every line change is followed by the interrupt
/// the slave would see.
pub struct Master<T: Target> {
    pub wire: Rc<RefCell<Wire>>,
    pub target: T,
    in_frame: bool,
}

impl<T: Target> Master<T> {
    pub fn new(wire: Rc<RefCell<Wire>>, target: T) -> Self {
        Self {
            wire,
            target,
            in_frame: false,
        }
    }

    pub fn sda(&self) -> bool {
        self.wire.borrow().sda()
    }

    pub fn scl(&self) -> bool {
        self.wire.borrow().scl
    }

    fn settle(&mut self) {
        let before = self.sda();
        self.wire.borrow_mut().settling = false;
        if self.sda() != before {
            self.target.sda_changed();
        }
    }

    pub fn set_sda(&mut self, high: bool) {
        self.settle();
        let before = self.sda();
        self.wire.borrow_mut().master_sda_low = !high;
        if self.sda() != before {
            self.target.sda_changed();
        }
    }

    pub fn set_scl(&mut self, high: bool) {
        self.settle();
        if self.scl() == high {
            return;
        }
        let before = self.sda();
        self.wire.borrow_mut().scl = high;
        self.target.scl_changed();
        if self.sda() != before {
            self.target.sda_changed();
        }
    }

    pub fn start(&mut self) {
        if self.in_frame || !self.sda() {
            self.set_scl(false);
            self.set_sda(true);
            self.set_scl(true);
        }
        self.set_sda(false);
        self.in_frame = true;
    }

    pub fn stop(&mut self) {
        self.set_scl(false);
        self.set_sda(false);
        self.set_scl(true);
        self.set_sda(true);
        self.in_frame = false;
    }

    pub fn clock_out(&mut self, bit: bool) {
        self.set_scl(false);
        self.set_sda(bit);
        self.set_scl(true);
    }

    pub fn clock_in(&mut self) -> bool {
        self.set_scl(false);
        self.set_sda(true);
        self.set_scl(true);
        self.sda()
    }

    /// Sends a byte and returns whether it was acknowledged.
    pub fn write_byte(&mut self, byte: u8) -> bool {
        for i in (0..8).rev() {
            self.clock_out(byte & (1 << i) != 0);
        }
        !self.clock_in()
    }

    pub fn read_byte(&mut self, ack: bool) -> u8 {
        let mut byte = 0;
        for _ in 0..8 {
            byte = (byte << 1) | self.clock_in() as u8;
        }
        self.clock_out(!ack);
        byte
    }

    /// START plus address byte. Returns whether the address was acknowledged.
    pub fn address(&mut self, address: u8, read: bool) -> bool {
        self.start();
        self.write_byte((address << 1) | read as u8)
    }

    /// Complete write transaction. Returns the ACK of every byte sent.
    pub fn write(&mut self, address: u8, bytes: &[u8]) -> Vec<bool> {
        let mut acks = vec![self.address(address, false)];
        acks.extend(bytes.iter().map(|&byte| self.write_byte(byte)));
        self.stop();
        acks
    }

    /// Complete read transaction, NACKing the last byte.
    pub fn read(&mut self, address: u8, len: usize) -> Vec<u8> {
        assert!(self.address(address, true), "address not acknowledged");
        let bytes = (0..len).map(|i| self.read_byte(i + 1 < len)).collect();
        self.stop();
        bytes
    }
}

/// Handler that remembers everything it was told.
#[derive(Default)]
pub struct Recorder {
    pub response: Vec<u8>,
    pub read_requests: Vec<(u8, [u8; N])>,
    pub completed: Vec<(Packet<N>, Outcome)>,
}

impl Recorder {
    pub fn responding(bytes: &[u8]) -> Self {
        Self {
            response: bytes.to_vec(),
            ..Self::default()
        }
    }
}

impl Handler<N> for Recorder {
    fn on_read(&mut self, address: u8, payload: &mut [u8; N]) {
        self.read_requests.push((address, *payload));
        let n = self.response.len().min(N);
        payload[..n].copy_from_slice(&self.response[..n]);
    }

    fn on_stop(&mut self, packet: &Packet<N>, outcome: Outcome) {
        self.completed.push((*packet, outcome));
    }
}

pub fn attach<H: Handler<N>>(handler: H) -> Master<SoftSlave<SimBus, H>> {
    attach_with(handler, Config::default(), false)
}

pub fn attach_with<H: Handler<N>>(
    handler: H,
    config: Config,
    strong_pullup: bool,
) -> Master<SoftSlave<SimBus, H>> {
    let wire = Wire::new(strong_pullup);
    let slave = SoftSlave::with_config(SimBus(wire.clone()), handler, config);
    Master::new(wire, slave)
}
