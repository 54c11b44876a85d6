//! Sound cues
//!
//! The simulation never plays audio itself. Each tick records `GameEvent`s;
//! the controller maps them to `SoundCue`s and hands them to a `SoundSink`.
//! In the browser the sink is `AudioManager`, which synthesizes short chords
//! with the Web Audio API.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Ball hits a wall, the ceiling or a block
    Hit,
    /// Ball bounces off the paddle
    PaddleBounce,
    /// Item collected
    ItemPickup,
    /// Ball lost
    GameOver,
    /// All blocks destroyed
    StageClear,
}

impl SoundCue {
    /// Cue for a simulation event, if it makes a sound
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::WallBounce | GameEvent::CeilingBounce | GameEvent::BlockDestroyed { .. } => {
                Some(SoundCue::Hit)
            }
            GameEvent::PaddleBounce => Some(SoundCue::PaddleBounce),
            GameEvent::ItemCollected { .. } => Some(SoundCue::ItemPickup),
            GameEvent::BallLost => Some(SoundCue::GameOver),
            GameEvent::StageCleared => Some(SoundCue::StageClear),
            GameEvent::BallLaunched
            | GameEvent::ItemSpawned { .. }
            | GameEvent::EffectExpired { .. } => None,
        }
    }

    /// Chord frequencies (Hz) and length (seconds)
    pub fn chord(self) -> (&'static [f32], f64) {
        match self {
            SoundCue::Hit => (&[261.63, 329.63], 0.1),
            SoundCue::PaddleBounce => (&[440.0, 493.88], 0.1),
            SoundCue::ItemPickup => (&[523.25, 659.25], 0.2),
            SoundCue::GameOver => (&[196.0, 147.0, 98.0], 0.3),
            SoundCue::StageClear => (&[523.25, 659.25, 783.99], 0.5),
        }
    }
}

/// Receiver for sound cues
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue);
}

/// Records cues in order (headless runs and tests)
impl SoundSink for Vec<SoundCue> {
    fn play(&mut self, cue: SoundCue) {
        self.push(cue);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundCue, SoundSink};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.3,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Create an oscillator routed through its own gain node
        fn create_osc(&self, ctx: &AudioContext, freq: f32) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(OscillatorType::Sine);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// One decaying sine per chord note
        fn play_chord(&self, ctx: &AudioContext, freqs: &[f32], duration: f64) {
            let t = ctx.current_time();
            for &freq in freqs {
                let Some((osc, gain)) = self.create_osc(ctx, freq) else {
                    continue;
                };
                gain.gain().set_value_at_time(self.volume, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + duration)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + duration).ok();
            }
        }
    }

    impl SoundSink for AudioManager {
        fn play(&mut self, cue: SoundCue) {
            let Some(ctx) = &self.ctx else { return };

            // Browsers start the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let (freqs, duration) = cue.chord();
            self.play_chord(ctx, freqs, duration);
        }
    }
}
