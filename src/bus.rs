use core::convert::Infallible;

use embedded_hal::digital::{InputPin, OutputPin, PinState};

/// Electrical mode of the data line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SdaMode {
    /// Listening. The line reads high unless someone pulls it low.
    InputPullUp,
    /// Driven by the slave.
    Output,
}

/// The two bus lines as seen by the slave.
///
/// SCL is only ever read. Attaching the pin-change interrupts is left to
/// the application.
pub trait Bus {
    fn set_sda_mode(&mut self, mode: SdaMode);

    fn write_sda(&mut self, high: bool);

    fn sda(&mut self) -> bool;

    fn scl(&mut self) -> bool;
}

impl<B: Bus + ?Sized> Bus for &mut B {
    fn set_sda_mode(&mut self, mode: SdaMode) {
        B::set_sda_mode(self, mode)
    }

    fn write_sda(&mut self, high: bool) {
        B::write_sda(self, high)
    }

    fn sda(&mut self) -> bool {
        B::sda(self)
    }

    fn scl(&mut self) -> bool {
        B::scl(self)
    }
}

/// Wraps a [`Bus`] and remembers whether SDA is currently driven.
pub(crate) struct Driver<B: Bus> {
    bus: B,
    driving: bool,
}

impl<B: Bus> Driver<B> {
    pub fn new(mut bus: B) -> Self {
        bus.set_sda_mode(SdaMode::InputPullUp);
        Self {
            bus,
            driving: false,
        }
    }

    #[inline]
    pub fn release(&mut self) {
        if self.driving {
            self.bus.set_sda_mode(SdaMode::InputPullUp);
            self.driving = false;
        }
    }

    #[inline]
    pub fn drive(&mut self, high: bool) {
        if !self.driving {
            self.bus.set_sda_mode(SdaMode::Output);
            self.driving = true;
        }
        self.bus.write_sda(high);
    }

    /// Puts SDA back into input mode regardless of the tracked mode.
    pub fn force_release(&mut self) {
        self.bus.set_sda_mode(SdaMode::InputPullUp);
        self.driving = false;
    }

    pub fn is_driving(&self) -> bool {
        self.driving
    }

    #[inline]
    pub fn sda(&mut self) -> bool {
        self.bus.sda()
    }

    #[inline]
    pub fn scl(&mut self) -> bool {
        self.bus.scl()
    }

    pub fn into_inner(self) -> B {
        self.bus
    }
}

/// [`Bus`] over two `embedded-hal` pins configured as open-drain.
///
/// Input mode is emulated by letting SDA float high, so the pin must be
/// readable while configured as an output.
pub struct OpenDrainBus<SDA, SCL> {
    sda: SDA,
    scl: SCL,
}

impl<SDA, SCL> OpenDrainBus<SDA, SCL>
where
    SDA: InputPin<Error = Infallible> + OutputPin<Error = Infallible>,
    SCL: InputPin<Error = Infallible>,
{
    pub fn new(sda: SDA, scl: SCL) -> Self {
        Self { sda, scl }
    }

    pub fn free(self) -> (SDA, SCL) {
        (self.sda, self.scl)
    }
}

impl<SDA, SCL> Bus for OpenDrainBus<SDA, SCL>
where
    SDA: InputPin<Error = Infallible> + OutputPin<Error = Infallible>,
    SCL: InputPin<Error = Infallible>,
{
    fn set_sda_mode(&mut self, mode: SdaMode) {
        if mode == SdaMode::InputPullUp {
            self.sda.set_high().unwrap_or_else(|e| match e {});
        }
    }

    fn write_sda(&mut self, high: bool) {
        self.sda
            .set_state(PinState::from(high))
            .unwrap_or_else(|e| match e {});
    }

    fn sda(&mut self) -> bool {
        self.sda.is_high().unwrap_or_else(|e| match e {})
    }

    fn scl(&mut self) -> bool {
        self.scl.is_high().unwrap_or_else(|e| match e {})
    }
}
