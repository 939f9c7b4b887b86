use uuid::Uuid;

/// Holds at most one task id. Used to allow a single AI-assistance request
/// in flight across the whole process.
#[derive(Debug, Default)]
pub struct SingleSlot {
    holder: Option<Uuid>,
}

impl SingleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `id`. Fails if anything holds it, including `id`.
    pub fn try_acquire(&mut self, id: Uuid) -> bool {
        if self.holder.is_some() {
            return false;
        }
        self.holder = Some(id);
        true
    }

    /// Release the slot if `id` holds it.
    pub fn release(&mut self, id: Uuid) -> bool {
        if self.holder == Some(id) {
            self.holder = None;
            true
        } else {
            false
        }
    }

    pub fn holder(&self) -> Option<Uuid> {
        self.holder
    }

    pub fn is_held_by(&self, id: Uuid) -> bool {
        self.holder == Some(id)
    }
}
