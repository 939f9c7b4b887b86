/// Two-step guard for destructive actions: the first request arms, a second
/// request inside the window executes, and a timeout disarms.
///
/// Each arming gets a fresh generation number. The timer that eventually
/// fires carries it back, so a late timer from an earlier arming cannot
/// disarm a newer one.
#[derive(Debug, Default)]
pub struct ClearConfirm {
    state: ConfirmState,
    next_generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmState {
    #[default]
    Idle,
    Armed { generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Now armed; start a timer that reports this generation back.
    Armed(u64),
    /// Second request inside the window: perform the clear.
    Execute,
}

impl ClearConfirm {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> ConfirmState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, ConfirmState::Armed { .. })
    }

    pub fn request(&mut self) -> ConfirmAction {
        match self.state {
            ConfirmState::Idle => {
                let generation = self.next_generation;
                self.next_generation += 1;
                self.state = ConfirmState::Armed { generation };
                ConfirmAction::Armed(generation)
            }
            ConfirmState::Armed { .. } => {
                self.state = ConfirmState::Idle;
                ConfirmAction::Execute
            }
        }
    }

    /// Timer expiry. Returns true if this disarmed the guard.
    pub fn expire(&mut self, generation: u64) -> bool {
        match self.state {
            ConfirmState::Armed { generation: g } if g == generation => {
                self.state = ConfirmState::Idle;
                true
            }
            _ => false,
        }
    }
}
