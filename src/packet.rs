use core::fmt;

/// The single in-flight transaction, assembled bit by bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet<const N: usize> {
    addr: u8,
    write: bool,
    dc: usize,
    data: [u8; N],
}

impl<const N: usize> Packet<N> {
    pub const fn new() -> Self {
        Self {
            addr: 0,
            write: false,
            dc: 0,
            data: [0; N],
        }
    }

    /// 7-bit address the master sent.
    pub fn address(&self) -> u8 {
        self.addr
    }

    /// `true` when the master writes to the slave.
    pub fn is_write(&self) -> bool {
        self.write
    }

    /// Number of bytes actually transferred.
    pub fn len(&self) -> usize {
        self.dc
    }

    pub fn is_empty(&self) -> bool {
        self.dc == 0
    }

    pub fn is_full(&self) -> bool {
        self.dc >= N
    }

    /// Bytes transferred so far.
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.dc]
    }

    /// The whole payload buffer, including bytes past [`len`](Self::len).
    pub fn buffer(&self) -> &[u8; N] {
        &self.data
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut [u8; N] {
        &mut self.data
    }

    pub(crate) fn shift_address(&mut self, bit: bool) {
        self.addr = (self.addr << 1) | bit as u8;
    }

    pub(crate) fn set_write(&mut self, write: bool) {
        self.write = write;
    }

    pub(crate) fn shift_data(&mut self, bit: bool) {
        if let Some(byte) = self.data.get_mut(self.dc) {
            *byte = (*byte << 1) | bit as u8;
        }
    }

    /// Level of bit `bit` of the byte under the cursor. Past the end the
    /// line is left high.
    pub(crate) fn outgoing_bit(&self, bit: u8) -> bool {
        self.data
            .get(self.dc)
            .map_or(true, |byte| byte & (1 << bit) != 0)
    }

    pub(crate) fn advance(&mut self) {
        if self.dc < N {
            self.dc += 1;
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}

impl<const N: usize> Default for Packet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Display for Packet<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} addr: {:#04x} data[{}]",
            if self.write { "WRITE" } else { "READ " },
            self.addr,
            self.dc
        )?;

        for (i, byte) in self.payload().iter().enumerate() {
            f.write_str(if i == 0 { ": " } else { " " })?;
            write!(f, "{:#04x}", byte)?;
        }

        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for Packet<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{=str} addr: {=u8:#x} data[{=usize}]: {=[u8]:#x}",
            if self.write { "WRITE" } else { "READ " },
            self.addr,
            self.dc,
            self.payload()
        )
    }
}
