use core::cell::{Ref, RefCell};

use critical_section::{CriticalSection, Mutex};
use heapless::Deque;

use crate::{
    bus::Bus, handler::Handler, slave::SoftSlave, state_holder::StateHolder, State,
    DEFAULT_PAYLOAD_SIZE,
};

pub const STATES_HISTORY_SIZE: usize = 8;

#[cfg(feature = "dump")]
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StateDump {
    pub state_history: [State; STATES_HISTORY_SIZE],
    pub current_state: State,
}

/// A [`SoftSlave`] that can live in a `static` and be shared by the two
/// pin-change interrupts.
///
/// Both trampolines run the slave inside a critical section, so the SDA and
/// SCL handlers never interleave.
pub struct SharedSlave<B: Bus, H: Handler<N>, const N: usize = DEFAULT_PAYLOAD_SIZE> {
    slave: Mutex<RefCell<Option<SoftSlave<B, H, N>>>>,
    state_holder: StateHolder<STATES_HISTORY_SIZE>,
}

#[cfg(feature = "dump")]
fn deque_into_array<T: Copy, const N: usize>(d: &Deque<T, N>, arr: &mut [T; N]) {
    let n = d.len();
    let (a, b) = d.as_slices();
    let s = N - n;

    arr[s..s + a.len()].copy_from_slice(a);
    arr[s + a.len()..].copy_from_slice(b);
}

impl<B: Bus, H: Handler<N>, const N: usize> SharedSlave<B, H, N> {
    pub const fn new() -> Self {
        Self {
            slave: Mutex::new(RefCell::new(None)),
            state_holder: StateHolder::new(),
        }
    }

    /// Puts `slave` in charge of the lines, returning the previous one.
    pub fn install(&self, slave: SoftSlave<B, H, N>) -> Option<SoftSlave<B, H, N>> {
        critical_section::with(|cs| {
            self.state_holder.clear(cs);
            self.state_holder.set_state(cs, slave.state());
            self.slave.borrow_ref_mut(cs).replace(slave)
        })
    }

    pub fn take(&self) -> Option<SoftSlave<B, H, N>> {
        critical_section::with(|cs| {
            self.state_holder.clear(cs);
            self.slave.borrow_ref_mut(cs).take()
        })
    }

    /// Runs `f` on the installed slave.
    pub fn with<R>(&self, f: impl FnOnce(&mut SoftSlave<B, H, N>) -> R) -> Option<R> {
        critical_section::with(|cs| self.with_cs(cs, f))
    }

    /// Last state published by an interrupt. Does not take the lock.
    pub fn state(&self) -> State {
        self.state_holder.get_state()
    }

    /// Most recent state transitions, oldest first.
    pub fn recent_states<'cs>(
        &'cs self,
        cs: CriticalSection<'cs>,
    ) -> Ref<'cs, Deque<State, STATES_HISTORY_SIZE>> {
        self.state_holder.get_history(cs)
    }

    #[cfg(feature = "dump")]
    pub fn dump_state(&self) -> StateDump {
        let mut states = [State::Stop; STATES_HISTORY_SIZE];

        critical_section::with(|cs| {
            let states_deque = self.state_holder.get_history(cs);
            deque_into_array(&states_deque, &mut states);
        });

        StateDump {
            state_history: states,
            current_state: self.state(),
        }
    }

    fn with_cs<R>(
        &self,
        cs: CriticalSection,
        f: impl FnOnce(&mut SoftSlave<B, H, N>) -> R,
    ) -> Option<R> {
        let mut slave = self.slave.borrow_ref_mut(cs);
        let slave = slave.as_mut()?;
        let r = f(slave);
        self.state_holder.set_state(cs, slave.state());
        Some(r)
    }
}

impl<B: Bus, H: Handler<N>, const N: usize> Default for SharedSlave<B, H, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Call from the SDA pin-change interrupt.
pub fn handle_sda_interrupt<B: Bus, H: Handler<N>, const N: usize>(shared: &SharedSlave<B, H, N>) {
    critical_section::with(|cs| shared.with_cs(cs, |slave| slave.on_sda_change()));
}

/// Call from the SCL pin-change interrupt.
pub fn handle_scl_interrupt<B: Bus, H: Handler<N>, const N: usize>(shared: &SharedSlave<B, H, N>) {
    critical_section::with(|cs| shared.with_cs(cs, |slave| slave.on_scl_change()));
}
