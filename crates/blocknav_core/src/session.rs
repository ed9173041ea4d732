//! The navigation session: one cursor, one mirror, one host.
//!
//! `NavSession` owns every piece of navigation state and is the only
//! writer of all of them. Commands arrive through [`NavSession::execute`],
//! host change notifications through [`NavSession::on_mutation`]; both
//! return the [`EffectSet`] describing what the host should re-announce.
//!
//! A rebuild never patches the mirror in-place. The canvas is
//! re-serialized, re-flattened, digest-compared, and on change the
//! snapshot is swapped wholesale with the cursor remapped by permanent
//! identity. Stale snapshots simply drop.

use crate::command::Command;
use crate::cursor::Cursor;
use crate::effect::EffectSet;
use crate::fault::Fault;
use crate::host::{EndpointRef, HostGraph, MutationEvent};
use crate::pairing::PendingConnection;
use crate::replay::NavLog;
use crate::slots::{Slot, SlotSession};
use blocknav_mirror::{
    flatten, BlockSerial, MirrorDigest, MirrorError, MirrorSnapshot, StableId,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Session tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavConfig {
    /// Wrap vertical moves past stack edges instead of faulting.
    pub cycle: bool,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self { cycle: true }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// All navigation state for one canvas.
#[derive(Debug)]
pub struct NavSession {
    config: NavConfig,
    mirror: MirrorSnapshot,
    digest: Option<MirrorDigest>,
    cursor: Cursor,
    slots: Option<SlotSession>,
    pending: PendingConnection,
    log: NavLog,
    tick: u64,
}

impl NavSession {
    pub fn new(config: NavConfig) -> Self {
        Self::with_session_id(config, "nav")
    }

    pub fn with_session_id(config: NavConfig, session_id: impl Into<String>) -> Self {
        Self {
            config,
            mirror: MirrorSnapshot::default(),
            digest: None,
            cursor: Cursor::new(),
            slots: None,
            pending: PendingConnection::new(),
            log: NavLog::new(session_id),
            tick: 0,
        }
    }

    // =========================================================================
    // COMMAND EXECUTION
    // =========================================================================

    /// Apply one command against the current mirror.
    ///
    /// Faults leave all session state exactly as it was, except where a
    /// fault's own contract says otherwise (`JoinRejected` reports a
    /// rollback that has already happened).
    #[instrument(skip_all, fields(tick = self.tick + 1, command = %command.as_dsl()))]
    pub fn execute<H: HostGraph>(
        &mut self,
        host: &mut H,
        command: Command,
    ) -> Result<EffectSet, Fault> {
        self.tick += 1;
        self.log.record_command(self.tick, command);

        let before = self.current_block();
        let result = self.dispatch(host, command);
        match &result {
            Ok(effects) => debug!(?effects, "command applied"),
            Err(fault) => debug!(%fault, "command faulted"),
        }

        let mut effects = result?;
        if self.current_block() != before {
            effects |= EffectSet::SELECTION_CHANGED;
        }
        // A slot session is pinned to its block; moving off drops it.
        if let Some(session) = &self.slots {
            if Some(session.block()) != self.current_block() {
                self.slots = None;
                effects |= EffectSet::SLOTS_CLEARED;
            }
        }
        Ok(effects)
    }

    fn dispatch<H: HostGraph>(
        &mut self,
        host: &mut H,
        command: Command,
    ) -> Result<EffectSet, Fault> {
        match command {
            Command::MoveUp => {
                let wrapped = self.cursor.move_up(&self.mirror, self.config.cycle)?;
                Ok(wrap_effects(wrapped))
            }
            Command::MoveDown => {
                let wrapped = self.cursor.move_down(&self.mirror, self.config.cycle)?;
                Ok(wrap_effects(wrapped))
            }
            Command::MoveIn => {
                self.cursor.move_in(&self.mirror)?;
                Ok(EffectSet::NONE)
            }
            Command::MoveOut => {
                self.cursor.move_out(&self.mirror)?;
                Ok(EffectSet::NONE)
            }
            Command::JumpToContainer(n) => {
                self.cursor.jump_container(&self.mirror, n)?;
                Ok(EffectSet::NONE)
            }
            Command::JumpToBlock(id) => {
                self.cursor.jump_identity(&self.mirror, id)?;
                Ok(EffectSet::NONE)
            }
            Command::JumpToTop => {
                self.cursor.jump_top(&self.mirror)?;
                Ok(EffectSet::NONE)
            }
            Command::JumpToBottom => {
                self.cursor.jump_bottom(&self.mirror)?;
                Ok(EffectSet::NONE)
            }
            Command::EnterBlock => self.enter_block(host),
            Command::SlotNext => self.slot_step(true),
            Command::SlotPrev => self.slot_step(false),
            Command::ActivateSlot => self.activate_slot(host),
            Command::PairConnection => self.pair_connection(host),
            Command::Noop => Ok(EffectSet::NONE),
        }
    }

    fn enter_block<H: HostGraph>(&mut self, host: &mut H) -> Result<EffectSet, Fault> {
        let id = self.current_block().ok_or(Fault::NoSelection)?;
        let facets = host.describe_block(id).ok_or(Fault::BlockNotFound(id))?;
        self.slots = Some(SlotSession::enter(id, &facets)?);
        Ok(EffectSet::SLOTS_ENTERED)
    }

    fn slot_step(&mut self, forward: bool) -> Result<EffectSet, Fault> {
        let session = self.slots.as_mut().ok_or(Fault::NoSlotSession)?;
        if forward {
            session.next();
        } else {
            session.prev();
        }
        Ok(EffectSet::SLOT_CHANGED)
    }

    fn activate_slot<H: HostGraph>(&mut self, host: &mut H) -> Result<EffectSet, Fault> {
        let slot = self
            .slots
            .as_ref()
            .ok_or(Fault::NoSlotSession)?
            .current()
            .clone();

        match slot {
            Slot::BottomConnection => {
                let wrapped = self.cursor.move_down(&self.mirror, self.config.cycle)?;
                Ok(wrap_effects(wrapped))
            }
            Slot::TopConnection => {
                let wrapped = self.cursor.move_up(&self.mirror, self.config.cycle)?;
                Ok(wrap_effects(wrapped))
            }
            Slot::InputConnection { attached: Some(id), .. } => {
                self.cursor.jump_identity(&self.mirror, id)?;
                Ok(EffectSet::NONE)
            }
            Slot::InputConnection { attached: None, .. } => Ok(EffectSet::NONE),
            Slot::Field { field, .. } => {
                host.open_editor(&field);
                Ok(EffectSet::EDITOR_OPENED)
            }
        }
    }

    /// Two-phase pairing: first activation stores the endpoint under
    /// the slot selector, the second takes it and asks the host to
    /// join. The stored endpoint is consumed before the attempt, so a
    /// rejected join leaves the pairing state empty, never half-set.
    fn pair_connection<H: HostGraph>(&mut self, host: &mut H) -> Result<EffectSet, Fault> {
        let endpoint = {
            let session = self.slots.as_ref().ok_or(Fault::NoSlotSession)?;
            slot_endpoint(session.block(), session.current()).ok_or(Fault::SlotNotConnectable)?
        };

        match self.pending.take() {
            None => {
                self.pending.store(endpoint);
                self.slots = None;
                Ok(EffectSet::CONNECTION_STORED | EffectSet::SLOTS_CLEARED)
            }
            Some(stored) => match host.attempt_join(&stored, &endpoint) {
                Ok(()) => {
                    // The join already rewired the canvas. Fold the
                    // rebuild into this command so the follow-up host
                    // notification digests as a no-op.
                    let resync = self
                        .resync(host, true)
                        .map_err(|err| Fault::ResyncFailed(err.to_string()))?;
                    self.slots = None;
                    Ok(EffectSet::CONNECTION_JOINED | EffectSet::SLOTS_CLEARED | resync)
                }
                Err(rejection) => {
                    warn!(reason = %rejection.reason, "join rejected");
                    self.slots = None;
                    Err(Fault::JoinRejected { reason: rejection.reason })
                }
            },
        }
    }

    // =========================================================================
    // MIRROR LIFECYCLE
    // =========================================================================

    /// Build (or re-align) the mirror from the host.
    ///
    /// The first successful sync also pins the log's baseline digest so
    /// a replay can verify it starts from the same canvas.
    pub fn sync<H: HostGraph>(&mut self, host: &mut H) -> Result<EffectSet, MirrorError> {
        let before = self.current_block();
        let mut effects = self.resync(host, true)?;
        if let Some(digest) = self.digest {
            self.log.set_baseline(digest);
        }
        if self.current_block() != before {
            effects |= EffectSet::SELECTION_CHANGED;
        }
        Ok(effects)
    }

    /// React to a canvas change notification from the host.
    #[instrument(skip_all, fields(tick = self.tick + 1, event = %event.as_dsl()))]
    pub fn on_mutation<H: HostGraph>(
        &mut self,
        host: &mut H,
        event: MutationEvent,
    ) -> Result<EffectSet, MirrorError> {
        self.tick += 1;
        self.log.record_mutation(self.tick, event);

        let before = self.current_block();
        let mut effects = self.resync(host, event.preserves_selection())?;
        if self.current_block() != before {
            effects |= EffectSet::SELECTION_CHANGED;
        }
        Ok(effects)
    }

    /// Re-serialize, re-flatten, and swap the mirror if it changed.
    ///
    /// With `preserve` the cursor is remapped by exact identity; a
    /// vanished block abandons the selection rather than guessing a
    /// neighbour. Without `preserve` the selection is dropped outright,
    /// even when the digest says the structure is unchanged.
    fn resync<H: HostGraph>(
        &mut self,
        host: &mut H,
        preserve: bool,
    ) -> Result<EffectSet, MirrorError> {
        let tree = host.serialize();
        let fresh = flatten(&tree)?;
        let digest = fresh.digest()?;

        if self.digest == Some(digest) {
            debug!("digest unchanged, skipping rebuild");
            if !preserve {
                self.cursor.clear();
            }
            return Ok(EffectSet::NONE);
        }

        let previous = self.current_block();
        self.mirror = fresh;
        self.digest = Some(digest);
        let mut effects = EffectSet::MIRROR_REBUILT;

        self.cursor.clear();
        let target = if preserve {
            match previous {
                Some(id) => self.mirror.find_identity(id),
                None => host
                    .selected_block()
                    .and_then(|id| self.mirror.find_identity(id))
                    .or_else(|| self.mirror.container(0)),
            }
        } else {
            None
        };
        if let Some(idx) = target {
            self.cursor.set(idx);
        }

        // Hygiene: in-node and pairing state pointing at blocks that
        // did not survive the rebuild.
        let slots_stale = self
            .slots
            .as_ref()
            .map(|session| self.mirror.find_identity(session.block()).is_none())
            .unwrap_or(false);
        if slots_stale {
            self.slots = None;
            effects |= EffectSet::SLOTS_CLEARED;
        }

        let pending_stale = self
            .pending
            .stored()
            .map(|endpoint| self.mirror.find_identity(endpoint.block).is_none())
            .unwrap_or(false);
        if pending_stale {
            self.pending.clear();
            effects |= EffectSet::PAIRING_CLEARED;
            warn!("stored endpoint lost its block across a rebuild");
        }

        Ok(effects)
    }

    // =========================================================================
    // INSPECTION
    // =========================================================================

    /// Identity of the selected block.
    pub fn current_block(&self) -> Option<StableId> {
        self.cursor
            .current()
            .and_then(|idx| self.mirror.identity(idx))
    }

    /// Document-order serial of the selected block in the current
    /// mirror. Unlike identity, this changes across rebuilds.
    pub fn current_serial(&self) -> Option<BlockSerial> {
        self.cursor
            .current()
            .and_then(|idx| self.mirror.serial(idx))
    }

    /// The slot under the in-node selector, if a slot session is open.
    pub fn current_slot(&self) -> Option<&Slot> {
        self.slots.as_ref().map(|session| session.current())
    }

    pub fn current_slot_index(&self) -> Option<usize> {
        self.slots.as_ref().map(|session| session.index())
    }

    /// The endpoint waiting for a pairing partner, if any.
    pub fn pending_endpoint(&self) -> Option<&EndpointRef> {
        self.pending.stored()
    }

    pub fn mirror(&self) -> &MirrorSnapshot {
        &self.mirror
    }

    /// Digest of the current mirror, `None` before the first sync.
    pub fn digest(&self) -> Option<MirrorDigest> {
        self.digest
    }

    pub fn config(&self) -> NavConfig {
        self.config
    }

    pub fn log(&self) -> &NavLog {
        &self.log
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub(crate) fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }
}

fn wrap_effects(wrapped: bool) -> EffectSet {
    if wrapped {
        EffectSet::WRAPPED
    } else {
        EffectSet::NONE
    }
}

/// The endpoint a slot names, if it names one at all.
fn slot_endpoint(block: StableId, slot: &Slot) -> Option<EndpointRef> {
    match slot {
        Slot::BottomConnection => Some(EndpointRef::next(block)),
        Slot::TopConnection => Some(EndpointRef::previous(block)),
        Slot::InputConnection { input, .. } => Some(EndpointRef::input(block, input.clone())),
        Slot::Field { .. } => None,
    }
}
