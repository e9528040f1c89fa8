//! Sound effects
//!
//! The session only knows [`SoundNotifier`]. In the browser,
//! [`AudioManager`] synthesizes short tones with the Web Audio API - no
//! sound files needed.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Food eaten
    Eat,
    /// New level reached
    LevelUp,
    /// Run ended
    GameOver,
}

impl SoundEffect {
    /// Tone frequency (Hz) and duration (s)
    pub fn tone(&self) -> (f32, f64) {
        match self {
            SoundEffect::Eat => (400.0, 0.1),
            SoundEffect::LevelUp => (600.0, 0.3),
            SoundEffect::GameOver => (200.0, 0.5),
        }
    }
}

/// Receives sound triggers from the session
pub trait SoundNotifier {
    fn notify(&mut self, effect: SoundEffect);
}

/// Notifier that plays nothing (native builds, sound disabled)
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl SoundNotifier for Silent {
    fn notify(&mut self, effect: SoundEffect) {
        log::trace!("Sound (silent): {:?}", effect);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, OscillatorType};

    use super::{SoundEffect, SoundNotifier};

    /// Starting gain of every tone
    const START_GAIN: f32 = 0.1;
    /// Gain the envelope ramps down to
    const END_GAIN: f32 = 0.01;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        enabled: bool,
    }

    impl AudioManager {
        pub fn new(enabled: bool) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, enabled }
        }

        fn play(&self, effect: SoundEffect) -> Option<()> {
            let ctx = self.ctx.as_ref()?;
            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let (freq, duration) = effect.tone();
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            osc.set_type(OscillatorType::Sine);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            let t = ctx.current_time();
            gain.gain().set_value_at_time(START_GAIN, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(END_GAIN, t + duration)
                .ok()?;
            osc.start_with_when(t).ok()?;
            osc.stop_with_when(t + duration).ok()?;
            Some(())
        }
    }

    impl SoundNotifier for AudioManager {
        fn notify(&mut self, effect: SoundEffect) {
            if !self.enabled {
                return;
            }
            if self.play(effect).is_none() {
                log::debug!("Could not play {:?}", effect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_table() {
        let (eat, _) = SoundEffect::Eat.tone();
        let (level, _) = SoundEffect::LevelUp.tone();
        let (over, over_len) = SoundEffect::GameOver.tone();
        assert!(level > eat);
        assert!(over < eat);
        assert_eq!(over_len, 0.5);
    }
}
