//! Frame controller
//!
//! Glue between the platform and the simulation: drains the input latch,
//! ticks with the current tunables, and turns the frame's events into sound
//! cues. Rendering reads `state()` afterwards.

use std::cell::RefCell;
use std::rc::Rc;

use crate::audio::{SoundCue, SoundSink};
use crate::platform::InputLatch;
use crate::settings::Settings;
use crate::sim::{GameState, tick};

pub struct Game<S: SoundSink> {
    state: GameState,
    settings: Rc<RefCell<Settings>>,
    input: InputLatch,
    sound: S,
}

impl<S: SoundSink> Game<S> {
    pub fn new(seed: u64, settings: Rc<RefCell<Settings>>, sound: S) -> Self {
        let state = GameState::new(seed, &settings.borrow().sanitized());
        log::info!("Game initialized with seed: {}", seed);
        Self {
            state,
            settings,
            input: InputLatch::new(),
            sound,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn input_mut(&mut self) -> &mut InputLatch {
        &mut self.input
    }

    /// Read the state while feeding the latch (autopilot)
    pub fn state_and_input(&mut self) -> (&GameState, &mut InputLatch) {
        (&self.state, &mut self.input)
    }

    /// Shared tunables handle (the browser sliders write through it)
    pub fn settings(&self) -> Rc<RefCell<Settings>> {
        Rc::clone(&self.settings)
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    /// Run one display frame at wall-clock time `now_ms`
    pub fn frame(&mut self, now_ms: f64) {
        let input = self.input.take_input();
        let was_terminal = self.state.phase.is_terminal();

        {
            let settings = self.settings.borrow();
            tick(&mut self.state, &input, &settings, now_ms);
        }

        if was_terminal && !self.state.phase.is_terminal() {
            self.input.suppress_launch();
        }

        for event in &self.state.events {
            if let Some(cue) = SoundCue::for_event(event) {
                self.sound.play(cue);
            }
        }
    }

    /// Rebuild the stage immediately with the current palette size. Used when
    /// the color count changes from outside the game loop.
    pub fn restart(&mut self) {
        let color_count = self.settings.borrow().sanitized().color_count;
        self.state.palette.resize(color_count);
        self.state.clamp_colors();
        self.state.restart();
        self.input.suppress_launch();
    }
}
