use crate::{
    bus::{Bus, Driver},
    handler::Handler,
    Outcome, Packet, State, DEFAULT_PAYLOAD_SIZE,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Only acknowledge this 7-bit address. `None` answers every address.
    pub address: Option<u8>,
}

impl Config {
    pub const fn new() -> Self {
        Self { address: None }
    }

    pub const fn address(mut self, address: u8) -> Self {
        self.address = Some(address);
        self
    }

    pub(crate) fn accepts(&self, address: u8) -> bool {
        self.address.map_or(true, |own| own == address)
    }
}

/// One software I2C slave on one pair of lines.
pub struct SoftSlave<B: Bus, H: Handler<N>, const N: usize = DEFAULT_PAYLOAD_SIZE> {
    pub(crate) bus: Driver<B>,
    pub(crate) handler: H,
    pub(crate) config: Config,
    pub(crate) state: State,
    pub(crate) packet: Packet<N>,
}

impl<B: Bus, H: Handler<N>, const N: usize> SoftSlave<B, H, N> {
    pub fn new(bus: B, handler: H) -> Self {
        Self::with_config(bus, handler, Config::default())
    }

    pub fn with_config(bus: B, handler: H, config: Config) -> Self {
        if let Some(address) = config.address {
            assert!(
                address <= 127,
                "Own address is out of range. 10-bit addresses are not supported."
            );
        }

        Self {
            bus: Driver::new(bus),
            handler,
            config,
            state: State::Stop,
            packet: Packet::new(),
        }
    }

    /// Pin-change handler for SDA.
    ///
    /// A transition while SCL is high is a bus condition: rising is STOP,
    /// falling is START. Anything else is an ordinary bit change.
    pub fn on_sda_change(&mut self) {
        if !self.bus.scl() {
            return;
        }

        if self.bus.sda() {
            trace!("i2c: stop condition");
            self.finish(Outcome::Stop);
        } else {
            trace!("i2c: start condition");
            self.finish(Outcome::Restart);
            self.state = State::Start;
        }
    }

    /// Pin-change handler for SCL.
    pub fn on_scl_change(&mut self) {
        if self.bus.scl() {
            self.clock_rise();
        } else {
            self.clock_fall();
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The transaction being assembled.
    pub fn packet(&self) -> &Packet<N> {
        &self.packet
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Whether the slave currently drives SDA.
    pub fn is_driving(&self) -> bool {
        self.bus.is_driving()
    }

    /// Drops the in-flight transaction without reporting it and releases SDA.
    pub fn reset(&mut self) {
        self.bus.force_release();
        self.state = State::Stop;
        self.packet.reset();
    }

    pub fn free(mut self) -> (B, H) {
        self.bus.force_release();
        (self.bus.into_inner(), self.handler)
    }

    /// Ends the current transaction, if any, and hands it to the handler.
    pub(crate) fn finish(&mut self, outcome: Outcome) {
        if self.state.is_idle() {
            return;
        }

        self.state = State::Stop;
        debug!("i2c: {} {}", outcome, self.packet);
        self.handler.on_stop(&self.packet, outcome);
        self.packet.reset();
    }

    /// Goes idle without a callback, for transactions addressed elsewhere.
    pub(crate) fn ignore(&mut self) {
        trace!("i2c: ignoring address {=u8:#x}", self.packet.address());
        self.state = State::Stop;
        self.packet.reset();
    }
}
