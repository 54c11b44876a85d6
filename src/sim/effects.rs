//! Timed power-up effects
//!
//! Three independent effects, each either inactive or active until an expiry
//! instant on the game clock (milliseconds). Re-applying an active effect
//! restarts its timer; durations never stack.
//!
//! The manager is the single owner of effect state. The paddle's rainbow flag
//! is a mirror that only the manager writes, so it can never outlive the
//! effect.

use serde::{Deserialize, Serialize};

use super::palette::Rgb;
use super::state::Paddle;
use crate::consts::EFFECT_DURATION_MS;

/// Power-up / effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Ball passes through blocks without reflecting
    Penetration,
    /// Ball slows down near the paddle
    SlowMotion,
    /// Any ball color bounces off the paddle
    Rainbow,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [
        EffectKind::Penetration,
        EffectKind::SlowMotion,
        EffectKind::Rainbow,
    ];

    fn slot(self) -> usize {
        match self {
            EffectKind::Penetration => 0,
            EffectKind::SlowMotion => 1,
            EffectKind::Rainbow => 2,
        }
    }

    /// Lookup key used by external callers
    pub fn key(self) -> &'static str {
        match self {
            EffectKind::Penetration => "penetration",
            EffectKind::SlowMotion => "slowMotion",
            EffectKind::Rainbow => "rainbow",
        }
    }

    /// Parse a lookup key; accepts camelCase, snake_case and upper-case forms
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "penetration" => Some(EffectKind::Penetration),
            "slowmotion" => Some(EffectKind::SlowMotion),
            "rainbow" => Some(EffectKind::Rainbow),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            EffectKind::Penetration => "Penetration",
            EffectKind::SlowMotion => "Slow Motion",
            EffectKind::Rainbow => "Rainbow",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            EffectKind::Penetration => "Ball passes through blocks",
            EffectKind::SlowMotion => "Ball moves at 0.7x speed near the paddle",
            EffectKind::Rainbow => "Any ball color bounces off the paddle",
        }
    }

    /// Color of the falling item
    pub fn color(self) -> Rgb {
        match self {
            EffectKind::Penetration => Rgb::new(0xff, 0x00, 0xff),
            EffectKind::SlowMotion => Rgb::new(0x00, 0xff, 0xff),
            EffectKind::Rainbow => Rgb::new(0xff, 0xff, 0xff),
        }
    }
}

/// State of one effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectSlot {
    pub active: bool,
    /// Game-clock instant (ms) at which the effect ends
    pub expires_at: f64,
}

/// Owner of all effect state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectManager {
    slots: [EffectSlot; 3],
    duration_ms: f64,
}

impl Default for EffectManager {
    fn default() -> Self {
        Self::new(EFFECT_DURATION_MS)
    }
}

impl EffectManager {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            slots: [EffectSlot::default(); 3],
            duration_ms,
        }
    }

    /// Activate `kind` until `now + duration`, replacing any earlier expiry
    pub fn apply(&mut self, kind: EffectKind, now: f64, paddle: &mut Paddle) {
        let slot = &mut self.slots[kind.slot()];
        slot.active = true;
        slot.expires_at = now + self.duration_ms;
        log::debug!("Effect {} active until {:.0}ms", kind.key(), slot.expires_at);
        self.sync_paddle(paddle);
    }

    /// Expire every effect whose deadline has passed. Must run once per frame
    /// before gameplay queries `is_active`. Returns the effects that ended.
    pub fn update(&mut self, now: f64, paddle: &mut Paddle) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        for kind in EffectKind::ALL {
            let slot = &mut self.slots[kind.slot()];
            if slot.active && now >= slot.expires_at {
                slot.active = false;
                log::debug!("Effect {} expired", kind.key());
                expired.push(kind);
            }
        }
        self.sync_paddle(paddle);
        expired
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.slots[kind.slot()].active
    }

    /// Name-based query; unknown names are inactive
    pub fn is_active_by_name(&self, name: &str) -> bool {
        EffectKind::from_name(name).is_some_and(|kind| self.is_active(kind))
    }

    pub fn slot(&self, kind: EffectKind) -> EffectSlot {
        self.slots[kind.slot()]
    }

    /// Active effects in declaration order
    pub fn active_kinds(&self) -> impl Iterator<Item = EffectKind> + '_ {
        EffectKind::ALL.into_iter().filter(|k| self.is_active(*k))
    }

    /// Display names of the active effects
    pub fn active_names(&self) -> Vec<&'static str> {
        self.active_kinds().map(EffectKind::display_name).collect()
    }

    /// Force every effect off and clear the paddle flags they drive
    pub fn reset(&mut self, paddle: &mut Paddle) {
        self.slots = [EffectSlot::default(); 3];
        self.sync_paddle(paddle);
    }

    fn sync_paddle(&self, paddle: &mut Paddle) {
        paddle.set_rainbow(self.is_active(EffectKind::Rainbow));
    }
}
