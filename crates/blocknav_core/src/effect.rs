//! Effect flags - the output protocol from command execution.
//!
//! When a command is executed, it returns an EffectSet indicating what
//! changed. The caller (renderer, speech layer) then handles each effect
//! appropriately: re-highlight on selection change, announce a wrap,
//! redraw pairing markers, and so on.

use bitflags::bitflags;

bitflags! {
    /// Set of effects produced by command execution.
    ///
    /// Effects are additive - a single command can produce multiple
    /// effects. The caller checks which effects are set and handles each
    /// one.
    ///
    /// # Example
    ///
    /// ```
    /// use blocknav_core::EffectSet;
    ///
    /// let effects = EffectSet::SELECTION_CHANGED | EffectSet::WRAPPED;
    ///
    /// if effects.contains(EffectSet::SELECTION_CHANGED) {
    ///     // Re-highlight the current block
    /// }
    /// if effects.contains(EffectSet::WRAPPED) {
    ///     // Announce the wrap-around
    /// }
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EffectSet: u16 {
        /// No effects.
        const NONE = 0;

        // =====================================================================
        // CURSOR EFFECTS
        // =====================================================================

        /// Cursor moved to a different block or was cleared.
        /// Caller reads `current_block()` for the new selection.
        const SELECTION_CHANGED = 1 << 0;

        /// A vertical move cycled past a stack edge.
        const WRAPPED = 1 << 1;

        // =====================================================================
        // SLOT EFFECTS
        // =====================================================================

        /// A slot session was opened on the current block.
        const SLOTS_ENTERED = 1 << 2;

        /// The slot cursor moved within the session.
        const SLOT_CHANGED = 1 << 3;

        /// The slot session was dropped.
        const SLOTS_CLEARED = 1 << 4;

        /// A field editor was opened host-side.
        const EDITOR_OPENED = 1 << 5;

        // =====================================================================
        // PAIRING EFFECTS
        // =====================================================================

        /// An endpoint was stored, awaiting its pair.
        /// Host glue should draw the stored-endpoint marker.
        const CONNECTION_STORED = 1 << 6;

        /// The stored and selected endpoints were joined.
        /// Markers should be removed.
        const CONNECTION_JOINED = 1 << 7;

        /// The stored endpoint was dropped without a join.
        const PAIRING_CLEARED = 1 << 8;

        // =====================================================================
        // MIRROR EFFECTS
        // =====================================================================

        /// The mirror was rebuilt; node indices from before are stale.
        const MIRROR_REBUILT = 1 << 9;
    }
}

impl Default for EffectSet {
    fn default() -> Self {
        EffectSet::NONE
    }
}

impl EffectSet {
    /// Check if the selection changed.
    pub fn selection_changed(&self) -> bool {
        self.contains(EffectSet::SELECTION_CHANGED)
    }

    /// Check if any slot-session effects are set.
    pub fn slots_changed(&self) -> bool {
        self.intersects(
            EffectSet::SLOTS_ENTERED | EffectSet::SLOT_CHANGED | EffectSet::SLOTS_CLEARED,
        )
    }

    /// Check if any pairing effects are set.
    pub fn pairing_changed(&self) -> bool {
        self.intersects(
            EffectSet::CONNECTION_STORED | EffectSet::CONNECTION_JOINED | EffectSet::PAIRING_CLEARED,
        )
    }

    /// Check if the mirror was rebuilt.
    pub fn mirror_rebuilt(&self) -> bool {
        self.contains(EffectSet::MIRROR_REBUILT)
    }
}
