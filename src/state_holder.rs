use core::cell::{Ref, RefCell};

use atomic::{Atomic, Ordering};
use critical_section::{CriticalSection, Mutex};
use heapless::Deque;

use crate::State;

/// Lock-free mirror of a slave's state, plus the last few transitions.
pub struct StateHolder<const HISTORY_SIZE: usize> {
    history: Mutex<RefCell<Deque<State, HISTORY_SIZE>>>,
    state: Atomic<State>,
}

impl<const HISTORY_SIZE: usize> StateHolder<HISTORY_SIZE> {
    pub const fn new() -> Self {
        Self {
            history: Mutex::new(RefCell::new(Deque::new())),
            state: Atomic::new(State::Stop),
        }
    }

    pub fn set_state(&self, cs: CriticalSection, state: State) {
        if self.get_state() != state {
            self.add_state_in_history(cs, state);
            self.state.store(state, Ordering::SeqCst);
        }
    }

    pub fn get_state(&self) -> State {
        self.state.load(Ordering::SeqCst)
    }

    pub fn get_history<'cs>(
        &'cs self,
        cs: CriticalSection<'cs>,
    ) -> Ref<'cs, Deque<State, HISTORY_SIZE>> {
        self.history.borrow_ref(cs)
    }

    pub fn clear(&self, cs: CriticalSection) {
        self.history.borrow_ref_mut(cs).clear();
        self.state.store(State::Stop, Ordering::SeqCst);
    }

    fn add_state_in_history(&self, cs: CriticalSection, state: State) {
        let mut h = self.history.borrow_ref_mut(cs);
        if h.is_full() {
            h.pop_front();
        }
        // Room was made above.
        let _ = h.push_back(state);
    }
}
