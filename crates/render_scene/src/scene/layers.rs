//! Layer bits for filtering scene queries
//!
//! Every model carries a [`Layers`] value; queries take a mask and skip
//! models whose layer shares no bit with it.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Layer bitmask
    ///
    /// Bits 0..20 are free for game-defined layers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Layers: u32 {
        /// Never returned by raycasts using [`Layers::RAYCASTABLE`]
        const IGNORE_RAYCAST = 1 << 20;
        /// Editor gizmos
        const GIZMOS = 1 << 21;
        /// Editor-only helpers
        const EDITOR = 1 << 22;
        /// UI placed in 3D space
        const UI_3D = 1 << 23;
        /// Scene view gizmos
        const SCENE_GIZMO = 1 << 24;
        /// Screen-space UI
        const UI_2D = 1 << 25;
        /// Profiler overlay
        const PROFILER = 1 << 28;
        /// Layer assigned to new models
        const DEFAULT = 1 << 30;
        /// Every bit
        const ALL = u32::MAX;
        /// Every bit except [`Layers::IGNORE_RAYCAST`]
        const RAYCASTABLE = !(1 << 20);
    }
}

impl Layers {
    /// Whether any bit of `self` is set in `mask`
    pub fn matches(self, mask: Self) -> bool {
        self.intersects(mask)
    }

    /// Layer for a game-defined bit in `0..20`
    pub fn user(bit: u32) -> Option<Self> {
        if bit < 20 {
            Some(Self::from_bits_retain(1 << bit))
        } else {
            None
        }
    }
}

impl Default for Layers {
    fn default() -> Self {
        Self::DEFAULT
    }
}
