//! Generational slot table.
//!
//! Backs opaque occupant handles. A [`SlotKey`] names a slot together with
//! the generation the slot had when its value was inserted. Removing the
//! value bumps the generation, so any older key to that slot resolves to
//! `None` instead of aliasing whatever lives there next. A second removal
//! through the same key is therefore detectable.

use std::fmt;

/// Slot index plus generation.
///
/// Packs into a `u64` (index in the high half) for callers that need a
/// plain integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    index: u32,
    generation: u32,
}

impl SlotKey {
    /// Slot position in the table.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Generation the slot had when the key was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }

    /// Packed form: `index << 32 | generation`.
    pub fn to_raw(self) -> u64 {
        (u64::from(self.index) << 32) | u64::from(self.generation)
    }

    /// Inverse of [`to_raw`](Self::to_raw).
    pub fn from_raw(raw: u64) -> Self {
        Self {
            index: (raw >> 32) as u32,
            generation: raw as u32,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Values addressed by [`SlotKey`]s, with vacated slots reused.
#[derive(Debug)]
pub struct SlotTable<T> {
    slots: Vec<Slot<T>>,
    vacant: Vec<u32>,
    live: usize,
}

impl<T> SlotTable<T> {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
            live: 0,
        }
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the table holds no live values.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Store `value`, reusing a vacated slot when one is available.
    pub fn insert(&mut self, value: T) -> SlotKey {
        self.live += 1;
        match self.vacant.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.value = Some(value);
                SlotKey {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                SlotKey {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Whether `key` resolves to a live value.
    pub fn contains(&self, key: SlotKey) -> bool {
        self.get(key).is_some()
    }

    /// The value behind `key`, or `None` if the key is stale or unknown.
    pub fn get(&self, key: SlotKey) -> Option<&T> {
        self.slots
            .get(key.index as usize)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    /// Mutable access to the value behind `key`.
    pub fn get_mut(&mut self, key: SlotKey) -> Option<&mut T> {
        self.slots
            .get_mut(key.index as usize)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Take the value behind `key` out of the table.
    ///
    /// Returns `None` if the key is stale, including a key whose value was
    /// already removed.
    pub fn remove(&mut self, key: SlotKey) -> Option<T> {
        let slot = self
            .slots
            .get_mut(key.index as usize)
            .filter(|slot| slot.generation == key.generation)?;
        let value = slot.value.take()?;
        Self::vacate(slot, key.index, &mut self.vacant);
        self.live -= 1;
        Some(value)
    }

    /// Live values with their keys, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotKey, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let key = SlotKey {
                index: index as u32,
                generation: slot.generation,
            };
            slot.value.as_ref().map(|value| (key, value))
        })
    }

    /// Remove every live value, in slot order.
    ///
    /// Every outstanding key becomes stale, as if each value had been
    /// passed to [`remove`](Self::remove).
    pub fn take_all(&mut self) -> Vec<T> {
        let mut values = Vec::with_capacity(self.live);
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let Some(value) = slot.value.take() {
                Self::vacate(slot, index as u32, &mut self.vacant);
                values.push(value);
            }
        }
        self.live = 0;
        values
    }

    /// Bump the slot's generation and queue it for reuse. A generation that
    /// wraps to 0 would revive first-epoch keys, so that slot is retired.
    fn vacate(slot: &mut Slot<T>, index: u32, vacant: &mut Vec<u32>) {
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation != 0 {
            vacant.push(index);
        }
    }
}

impl<T> Default for SlotTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
