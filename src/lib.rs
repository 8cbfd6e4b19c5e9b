#![cfg_attr(not(test), no_std)]

//! Bit-banged I2C slave driven by SDA/SCL edge interrupts.
//!
//! The slave owns the data line through a [`Bus`] implementation and is
//! advanced by calling [`SoftSlave::on_sda_change`] and
//! [`SoftSlave::on_scl_change`] from the two pin-change interrupts (or the
//! [`handle_sda_interrupt`] / [`handle_scl_interrupt`] trampolines when the
//! slave lives in a `static`). Finished transactions are reported through a
//! [`Handler`].

#[macro_use]
mod fmt;

mod bridge;
mod bus;
mod handler;
mod interrupts;
mod machine;
mod packet;
mod response;
mod slave;
mod state_holder;
#[cfg(feature = "stm32")]
mod stm32;

pub use bridge::Bridge;
pub use bus::{Bus, OpenDrainBus, SdaMode};
pub use handler::Handler;
pub use interrupts::{handle_scl_interrupt, handle_sda_interrupt, SharedSlave};
pub use packet::Packet;
pub use response::Response;
pub use slave::{Config, SoftSlave};
#[cfg(feature = "stm32")]
pub use stm32::Stm32Bus;

#[cfg(feature = "dump")]
pub use interrupts::StateDump;

/// Payload size of the reference configuration.
pub const DEFAULT_PAYLOAD_SIZE: usize = 5;

/// Position of the slave within the I2C frame.
///
/// The address is clocked in during `Addr0..=Addr6`, followed by the R/W bit
/// and its ACK. Every data byte then cycles through `Data0..=Data7` and
/// `DataAck`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::NoUninit)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum State {
    Stop,
    Start,
    Addr0,
    Addr1,
    Addr2,
    Addr3,
    Addr4,
    Addr5,
    Addr6,
    RwBit,
    AddrAck,
    Data0,
    Data1,
    Data2,
    Data3,
    Data4,
    Data5,
    Data6,
    Data7,
    DataAck,
}

impl State {
    /// State entered on the clock fall that ends `self`.
    pub const fn next(self) -> State {
        match self {
            State::Stop => State::Stop,
            State::Start => State::Addr0,
            State::Addr0 => State::Addr1,
            State::Addr1 => State::Addr2,
            State::Addr2 => State::Addr3,
            State::Addr3 => State::Addr4,
            State::Addr4 => State::Addr5,
            State::Addr5 => State::Addr6,
            State::Addr6 => State::RwBit,
            State::RwBit => State::AddrAck,
            State::AddrAck => State::Data0,
            State::Data0 => State::Data1,
            State::Data1 => State::Data2,
            State::Data2 => State::Data3,
            State::Data3 => State::Data4,
            State::Data4 => State::Data5,
            State::Data5 => State::Data6,
            State::Data6 => State::Data7,
            State::Data7 => State::DataAck,
            State::DataAck => State::Data0,
        }
    }

    /// Index of the data bit slot, `Data0` being the most significant bit.
    pub const fn data_slot(self) -> Option<u8> {
        match self {
            State::Data0 => Some(0),
            State::Data1 => Some(1),
            State::Data2 => Some(2),
            State::Data3 => Some(3),
            State::Data4 => Some(4),
            State::Data5 => Some(5),
            State::Data6 => Some(6),
            State::Data7 => Some(7),
            _ => None,
        }
    }

    pub const fn is_idle(self) -> bool {
        matches!(self, State::Stop)
    }
}

/// Why a transaction ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// The master issued a STOP condition.
    Stop,
    /// A new START condition arrived before STOP.
    Restart,
    /// The master did not acknowledge a byte the slave sent.
    Nack,
    /// The payload buffer filled up and the transaction was cut.
    BufferFull,
    /// The slave's released ACK did not read back low.
    AckAnomaly,
}

impl Outcome {
    pub const fn is_fault(self) -> bool {
        matches!(self, Outcome::BufferFull | Outcome::AckAnomaly)
    }
}

/// A finished transaction together with the reason it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transaction<const N: usize> {
    pub packet: Packet<N>,
    pub outcome: Outcome,
}
