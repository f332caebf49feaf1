//! Animation scheduler
//!
//! Owns every live motion value and advances them once per frame.
//!
//! The scheduler is **Idle** while no value is registered and **Running**
//! while at least one is. Hosts request a display-refresh callback only while
//! [`AnimationScheduler::needs_frame`] is true.
//!
//! Values are grouped by owner. Releasing an owner is O(1): the owner is
//! dropped and its values become unreachable immediately, then get swept on
//! the next tick without ever being advanced again.

use crate::motion::MotionValue;
use crate::spring::SpringConfig;
use flux_core::{MotionError, Result};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::time::Instant;

new_key_type! {
    /// Handle to a motion value registered with the scheduler
    pub struct MotionId;
    /// Handle to a group of motion values torn down together
    pub struct OwnerId;
}

/// Scheduling state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// No live values; no frame requested
    Idle,
    /// At least one live value; a frame is requested every refresh
    Running,
}

struct MotionEntry {
    value: MotionValue,
    owner: OwnerId,
}

#[derive(Default)]
struct OwnerEntry {
    live: usize,
}

/// The animation scheduler that ticks all live motion values
pub struct AnimationScheduler {
    values: SlotMap<MotionId, MotionEntry>,
    owners: SlotMap<OwnerId, OwnerEntry>,
    /// Owner for values created without an explicit owner
    root: OwnerId,
    live: usize,
    state: SchedulerState,
    last_frame: Instant,
    frames: u64,
}

/// Report a handle that was used after release.
///
/// Fatal in debug builds, ignored in release builds.
#[track_caller]
fn released(id: MotionId) -> MotionError {
    if cfg!(debug_assertions) {
        panic!("motion value {id:?} used after release");
    }
    tracing::trace!(?id, "ignoring use of released motion value");
    MotionError::Released
}

impl AnimationScheduler {
    pub fn new() -> Self {
        let mut owners = SlotMap::with_key();
        let root = owners.insert(OwnerEntry::default());
        Self {
            values: SlotMap::with_key(),
            owners,
            root,
            live: 0,
            state: SchedulerState::Idle,
            last_frame: Instant::now(),
            frames: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Whether the host should keep requesting display-refresh ticks
    pub fn needs_frame(&self) -> bool {
        self.state == SchedulerState::Running
    }

    /// Number of live (unreleased) motion values
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Number of ticks that advanced values since creation
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    // ------------------------------------------------------------------------
    // Owners
    // ------------------------------------------------------------------------

    /// Register a new owner (typically one per mounted container)
    pub fn register_owner(&mut self) -> OwnerId {
        self.owners.insert(OwnerEntry::default())
    }

    pub fn is_owner_alive(&self, owner: OwnerId) -> bool {
        self.owners.contains_key(owner)
    }

    /// Release every value belonging to `owner` in O(1).
    ///
    /// Returns how many live values were released.
    pub fn release_owner(&mut self, owner: OwnerId) -> usize {
        if owner == self.root {
            tracing::warn!("the root owner cannot be released");
            return 0;
        }
        let Some(entry) = self.owners.remove(owner) else {
            return 0;
        };
        self.live -= entry.live;
        tracing::debug!(?owner, released = entry.live, "released motion owner");
        self.update_state();
        entry.live
    }

    // ------------------------------------------------------------------------
    // Motion values
    // ------------------------------------------------------------------------

    /// Register a value owned by the scheduler itself
    pub fn create(&mut self, initial: f64, config: SpringConfig) -> MotionId {
        let root = self.root;
        self.insert(root, initial, config)
    }

    /// Register a value for `owner`.
    ///
    /// Fails with [`MotionError::Released`] when the owner has been released.
    pub fn create_owned(
        &mut self,
        owner: OwnerId,
        initial: f64,
        config: SpringConfig,
    ) -> Result<MotionId> {
        if !self.owners.contains_key(owner) {
            return Err(MotionError::Released);
        }
        Ok(self.insert(owner, initial, config))
    }

    fn insert(&mut self, owner: OwnerId, initial: f64, config: SpringConfig) -> MotionId {
        let id = self.values.insert(MotionEntry {
            value: MotionValue::new(initial, config),
            owner,
        });
        if let Some(entry) = self.owners.get_mut(owner) {
            entry.live += 1;
        }
        self.live += 1;
        self.update_state();
        id
    }

    /// Whether `id` refers to a value that has not been released
    pub fn is_alive(&self, id: MotionId) -> bool {
        self.entry(id).is_some()
    }

    fn entry(&self, id: MotionId) -> Option<&MotionEntry> {
        self.values
            .get(id)
            .filter(|entry| self.owners.contains_key(entry.owner))
    }

    fn entry_mut(&mut self, id: MotionId) -> Option<&mut MotionEntry> {
        let owners = &self.owners;
        self.values
            .get_mut(id)
            .filter(|entry| owners.contains_key(entry.owner))
    }

    /// Current value of `id`; side-effect free
    #[track_caller]
    pub fn read(&self, id: MotionId) -> Result<f64> {
        match self.entry(id) {
            Some(entry) => Ok(entry.value.value()),
            None => Err(released(id)),
        }
    }

    /// Borrow the full motion value
    #[track_caller]
    pub fn get(&self, id: MotionId) -> Result<&MotionValue> {
        match self.entry(id) {
            Some(entry) => Ok(&entry.value),
            None => Err(released(id)),
        }
    }

    /// Set the target of `id`; visible to the next tick
    #[track_caller]
    pub fn set_target(&mut self, id: MotionId, target: f64) -> Result<()> {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.value.set_target(target);
                Ok(())
            }
            None => Err(released(id)),
        }
    }

    /// Move `id` to `value` immediately and rest there
    #[track_caller]
    pub fn jump(&mut self, id: MotionId, value: f64) -> Result<()> {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.value.jump(value);
                Ok(())
            }
            None => Err(released(id)),
        }
    }

    #[track_caller]
    pub fn is_settled(&self, id: MotionId) -> Result<bool> {
        self.get(id).map(MotionValue::is_settled)
    }

    /// Release `id`; it will never be advanced again
    #[track_caller]
    pub fn release(&mut self, id: MotionId) -> Result<()> {
        let Some(owner) = self.entry(id).map(|entry| entry.owner) else {
            return Err(released(id));
        };
        self.values.remove(id);
        if let Some(entry) = self.owners.get_mut(owner) {
            entry.live -= 1;
        }
        self.live -= 1;
        self.update_state();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Ticking
    // ------------------------------------------------------------------------

    /// Advance every live value by `dt_ms` milliseconds.
    ///
    /// Each live value is stepped exactly once. Values of released owners are
    /// swept instead. Returns the number of values still in motion.
    pub fn tick(&mut self, dt_ms: f64) -> usize {
        self.last_frame = Instant::now();
        self.sweep();

        if self.state == SchedulerState::Idle {
            return 0;
        }

        let dt = dt_ms / 1000.0;
        let mut moving = 0;
        for (_, entry) in self.values.iter_mut() {
            if entry.value.step(dt) {
                moving += 1;
            }
        }
        self.frames += 1;

        tracing::trace!(frame = self.frames, dt_ms, moving, "animation tick");
        moving
    }

    /// Wall-clock milliseconds since the previous tick or idle wake-up
    pub fn since_last_frame_ms(&self) -> f64 {
        self.last_frame.elapsed().as_secs_f64() * 1000.0
    }

    /// Check if any live value is still moving toward its target
    pub fn has_active_animations(&self) -> bool {
        self.iter().any(|(_, value)| !value.is_settled())
    }

    /// Iterate over all live values
    pub fn iter(&self) -> impl Iterator<Item = (MotionId, &MotionValue)> {
        self.values
            .iter()
            .filter(|(_, entry)| self.owners.contains_key(entry.owner))
            .map(|(id, entry)| (id, &entry.value))
    }

    fn sweep(&mut self) {
        let dead: SmallVec<[MotionId; 16]> = self
            .values
            .iter()
            .filter(|(_, entry)| !self.owners.contains_key(entry.owner))
            .map(|(id, _)| id)
            .collect();

        if dead.is_empty() {
            return;
        }
        for id in &dead {
            self.values.remove(*id);
        }
        tracing::trace!(swept = dead.len(), "swept released motion values");
    }

    fn update_state(&mut self) {
        let next = if self.live > 0 {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        };
        if next == self.state {
            return;
        }

        if next == SchedulerState::Running {
            // Avoid charging the idle period to the first frame
            self.last_frame = Instant::now();
            tracing::debug!(live = self.live, "animation scheduler running");
        } else {
            tracing::debug!("animation scheduler idle, frame request cancelled");
        }
        self.state = next;
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}
