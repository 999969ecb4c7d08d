//! Lifecycle events emitted by a level update

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::orb::OrbKind;

/// Why an enemy died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KillCause {
    /// Hit by a blast
    Blast,
    /// Touched a powered-up player
    PoweredUpContact,
    /// Wiped by a special orb's area clear
    AreaClear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LevelEvent {
    OrbCollected { kind: OrbKind, points: u64 },
    EnemyKilled { id: u32, cause: KillCause, points: u64 },
    /// `killer` is `None` for falls
    PlayerKilled { killer: Option<u32> },
    BlastFired { position: Vec2 },
    ExitReached,
    TimeExpired,
}
