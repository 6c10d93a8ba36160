//! Instance registry: an append-only arena of slots.
//!
//! Destroying an instance leaves a tombstone in its slot; nothing is ever
//! spliced out or reused, so every other handle keeps pointing at the same
//! instance.

use crate::ids::InstanceId;
use crate::instance::Instance;

enum Slot<E> {
    Live(Instance<E>),
    Tombstone,
}

impl<E> Slot<E> {
    fn live(&self) -> Option<&Instance<E>> {
        match self {
            Slot::Live(inst) => Some(inst),
            Slot::Tombstone => None,
        }
    }

    fn live_mut(&mut self) -> Option<&mut Instance<E>> {
        match self {
            Slot::Live(inst) => Some(inst),
            Slot::Tombstone => None,
        }
    }
}

pub struct Registry<E> {
    slots: Vec<Slot<E>>,
    /// Live instances with `active == true`; keeps the idle check O(1).
    active: usize,
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            active: 0,
        }
    }
}

impl<E> Registry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instance and return its handle.
    pub fn insert(&mut self, inst: Instance<E>) -> InstanceId {
        let id = InstanceId::from(self.slots.len());
        if inst.active {
            self.active += 1;
        }
        self.slots.push(Slot::Live(inst));
        id
    }

    pub fn get(&self, id: InstanceId) -> Option<&Instance<E>> {
        self.slots.get(id.index()).and_then(Slot::live)
    }

    /// Mutable access. Toggle `active` through [`Registry::set_active`] so the counter stays exact.
    pub(crate) fn get_mut(&mut self, id: InstanceId) -> Option<&mut Instance<E>> {
        self.slots.get_mut(id.index()).and_then(Slot::live_mut)
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.get(id).is_some()
    }

    /// Set the run flag. Returns `false` if `id` is not live.
    pub fn set_active(&mut self, id: InstanceId, active: bool) -> bool {
        let Some(inst) = self.slots.get_mut(id.index()).and_then(Slot::live_mut) else {
            return false;
        };
        match (inst.active, active) {
            (false, true) => self.active += 1,
            (true, false) => self.active -= 1,
            _ => {}
        }
        inst.active = active;
        true
    }

    /// Replace the slot with a tombstone. Returns the removed instance.
    pub fn remove(&mut self, id: InstanceId) -> Option<Instance<E>> {
        let slot = self.slots.get_mut(id.index())?;
        match std::mem::replace(slot, Slot::Tombstone) {
            Slot::Live(inst) => {
                if inst.active {
                    self.active -= 1;
                }
                Some(inst)
            }
            Slot::Tombstone => None,
        }
    }

    /// Number of slots, tombstones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.live().is_some()).count()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Live instances in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (InstanceId, &Instance<E>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.live().map(|inst| (InstanceId::from(i), inst)))
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (InstanceId, &Instance<E>)> {
        self.iter().filter(|(_, inst)| inst.active)
    }

    pub fn iter_tracked(&self) -> impl Iterator<Item = (InstanceId, &Instance<E>)> {
        self.iter().filter(|(_, inst)| inst.data.track)
    }

    pub fn active_ids(&self) -> Vec<InstanceId> {
        self.iter_active().map(|(id, _)| id).collect()
    }

    pub fn tracked_ids(&self) -> Vec<InstanceId> {
        self.iter_tracked().map(|(id, _)| id).collect()
    }
}
