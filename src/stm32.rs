use embassy_stm32::gpio::{Flex, Input, Level, Pull, Speed};

use crate::bus::{Bus, SdaMode};

/// [`Bus`] over `embassy-stm32` GPIO drivers.
///
/// The EXTI lines of both pins have to be routed to
/// [`handle_sda_interrupt`](crate::handle_sda_interrupt) and
/// [`handle_scl_interrupt`](crate::handle_scl_interrupt) by the
/// application, on both edges and at the same priority.
pub struct Stm32Bus<'d> {
    sda: Flex<'d>,
    scl: Input<'d>,
}

impl<'d> Stm32Bus<'d> {
    pub fn new(sda: Flex<'d>, scl: Input<'d>) -> Self {
        Self { sda, scl }
    }
}

impl<'d> Bus for Stm32Bus<'d> {
    fn set_sda_mode(&mut self, mode: SdaMode) {
        match mode {
            SdaMode::InputPullUp => self.sda.set_as_input(Pull::Up),
            SdaMode::Output => self.sda.set_as_output(Speed::Low),
        }
    }

    fn write_sda(&mut self, high: bool) {
        self.sda.set_level(Level::from(high));
    }

    fn sda(&mut self) -> bool {
        self.sda.is_high()
    }

    fn scl(&mut self) -> bool {
        self.scl.is_high()
    }
}
