//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed.
//! The `AudioContext` is created on first use and resumed on every play,
//! since mobile browsers only allow audio after a user gesture.

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use crate::game::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Piece picked up, button pressed
    Click,
    /// Piece locked into its slot
    Snap,
    /// Puzzle solved
    Win,
    /// Level unlocked
    Unlock,
    /// Wrong challenge answer
    Error,
}

impl SoundEffect {
    /// Sound cue for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::LevelStarted { .. }
            | GameEvent::ChallengeIssued { .. }
            | GameEvent::DragStarted { .. } => Some(SoundEffect::Click),
            GameEvent::PieceSnapped { .. } => Some(SoundEffect::Snap),
            GameEvent::PuzzleSolved(_) => Some(SoundEffect::Win),
            GameEvent::ChallengePassed { .. } | GameEvent::LevelUnlocked { .. } => {
                Some(SoundEffect::Unlock)
            }
            GameEvent::ChallengeFailed => Some(SoundEffect::Error),
            GameEvent::PraiseReady { .. } => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    failed: bool,
    volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            ctx: None,
            failed: false,
            volume: 0.8,
        }
    }

    /// Effective volume (0.0 mutes)
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    /// Create the context on first use and wake it if suspended
    fn context(&mut self) -> Option<&AudioContext> {
        if self.ctx.is_none() && !self.failed {
            // May fail outside a secure context
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(_) => {
                    log::warn!("Failed to create AudioContext - audio disabled");
                    self.failed = true;
                }
            }
        }
        let ctx = self.ctx.as_ref()?;
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = self.context() else { return };

        match effect {
            SoundEffect::Click => play_click(ctx, vol),
            SoundEffect::Snap => play_snap(ctx, vol),
            SoundEffect::Win => play_win(ctx, vol),
            SoundEffect::Unlock => play_unlock(ctx, vol),
            SoundEffect::Error => play_error(ctx, vol),
        }
    }
}

// === Sound generators ===

/// Create an oscillator with gain envelope
fn create_osc(
    ctx: &AudioContext,
    freq: f32,
    osc_type: OscillatorType,
) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}

/// Click - short soft tick
fn play_click(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 300.0, OscillatorType::Triangle) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.1, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.05)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.05).ok();
}

/// Snap - rising chirp
fn play_snap(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 600.0, OscillatorType::Sine) else {
        return;
    };
    let t = ctx.current_time();

    osc.frequency().set_value_at_time(600.0, t).ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(1000.0, t + 0.1)
        .ok();
    gain.gain().set_value_at_time(vol * 0.3, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.1)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.1).ok();
}

/// Error - falling buzz
fn play_error(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 150.0, OscillatorType::Sawtooth) else {
        return;
    };
    let t = ctx.current_time();

    osc.frequency().set_value_at_time(150.0, t).ok();
    osc.frequency()
        .linear_ramp_to_value_at_time(100.0, t + 0.2)
        .ok();
    gain.gain().set_value_at_time(vol * 0.2, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.2)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.2).ok();
}

/// Unlock - mechanical click followed by sparkles
fn play_unlock(ctx: &AudioContext, vol: f32) {
    let t = ctx.current_time();

    if let Some((osc, gain)) = create_osc(ctx, 220.0, OscillatorType::Square) {
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(440.0, t + 0.1)
            .ok();
        gain.gain().set_value_at_time(vol * 0.1, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.1).ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    for (i, freq) in [1046.50, 1318.51, 1568.0, 2093.0].into_iter().enumerate() {
        let Some((osc, gain)) = create_osc(ctx, freq, OscillatorType::Sine) else {
            continue;
        };
        let start = t + 0.1 + i as f64 * 0.06;
        gain.gain().set_value_at_time(0.0, start).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(vol * 0.05, start + 0.05)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, start + 1.0)
            .ok();
        osc.start_with_when(start).ok();
        osc.stop_with_when(start + 1.0).ok();
    }
}

/// Win - rising arpeggio
fn play_win(ctx: &AudioContext, vol: f32) {
    let t = ctx.current_time();

    for (i, freq) in [523.25, 659.25, 783.99, 1046.50].into_iter().enumerate() {
        let Some((osc, gain)) = create_osc(ctx, freq, OscillatorType::Triangle) else {
            continue;
        };
        let start = t + i as f64 * 0.1;
        gain.gain().set_value_at_time(0.0, start).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(vol * 0.2, start + 0.05)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, start + 0.4)
            .ok();
        osc.start_with_when(start).ok();
        osc.stop_with_when(start + 0.5).ok();
    }
}
