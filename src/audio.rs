//! Audio system using the Web Audio API
//!
//! Every effect is a short recipe of synthesized tones, nothing is loaded from
//! files. Without an audio context all calls are silent no-ops.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

#[cfg(target_arch = "wasm32")]
impl Waveform {
    fn oscillator_type(self) -> OscillatorType {
        match self {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
            Waveform::Triangle => OscillatorType::Triangle,
        }
    }
}

/// One scheduled tone of an effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub waveform: Waveform,
    /// Seconds
    pub duration: f64,
    /// 0.0 - 1.0 before master/sfx scaling
    pub volume: f32,
    /// Seconds after the effect starts
    pub delay: f64,
}

impl Tone {
    const fn new(frequency: f32, waveform: Waveform, duration: f64, volume: f32) -> Self {
        Self {
            frequency,
            waveform,
            duration,
            volume,
            delay: 0.0,
        }
    }

    const fn after(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball launched
    Launch,
    /// Target destroyed
    TargetHit,
    /// All targets down
    LevelComplete,
    /// Tries used up
    OutOfTries,
    /// Final level cleared
    GameWon,
    /// New high score
    HighScore,
}

impl SoundEffect {
    /// Tone recipe for this effect
    pub fn tones(self) -> Vec<Tone> {
        use Waveform::*;
        match self {
            SoundEffect::Launch => vec![Tone::new(220.0, Triangle, 0.15, 0.3)],
            SoundEffect::TargetHit => vec![
                Tone::new(660.0, Square, 0.1, 0.25),
                Tone::new(990.0, Sine, 0.12, 0.2).after(0.04),
            ],
            SoundEffect::LevelComplete => [523.0, 659.0, 784.0]
                .iter()
                .enumerate()
                .map(|(i, f)| Tone::new(*f, Triangle, 0.2, 0.3).after(i as f64 * 0.12))
                .collect(),
            SoundEffect::OutOfTries => [330.0, 262.0]
                .iter()
                .enumerate()
                .map(|(i, f)| Tone::new(*f, Sawtooth, 0.3, 0.2).after(i as f64 * 0.25))
                .collect(),
            SoundEffect::GameWon => [523.0, 659.0, 784.0, 1047.0, 1319.0]
                .iter()
                .enumerate()
                .map(|(i, f)| Tone::new(*f, Triangle, 0.3, 0.3).after(i as f64 * 0.1))
                .collect(),
            SoundEffect::HighScore => [880.0, 1175.0]
                .iter()
                .enumerate()
                .map(|(i, f)| Tone::new(*f, Sine, 0.15, 0.2).after(i as f64 * 0.08))
                .collect(),
        }
    }

    /// Effect to play for a game event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Launched => Some(SoundEffect::Launch),
            GameEvent::TargetHit { .. } => Some(SoundEffect::TargetHit),
            GameEvent::LevelComplete { .. } => Some(SoundEffect::LevelComplete),
            GameEvent::OutOfTries { .. } => Some(SoundEffect::OutOfTries),
            GameEvent::GameWon { .. } => Some(SoundEffect::GameWon),
            GameEvent::NewHighScore(_) => Some(SoundEffect::HighScore),
            GameEvent::LevelStarted { .. } | GameEvent::LevelError(_) => None,
        }
    }
}

/// Whether the browser gave us an audio context
pub enum AudioBackend {
    #[cfg(target_arch = "wasm32")]
    Available(AudioContext),
    Unavailable,
}

impl AudioBackend {
    /// Probe for Web Audio support (may fail outside a secure context)
    #[cfg(target_arch = "wasm32")]
    pub fn detect() -> Self {
        match AudioContext::new() {
            Ok(ctx) => AudioBackend::Available(ctx),
            Err(e) => {
                let err = crate::Error::AudioUnavailable(format!("{e:?}"));
                log::warn!("{err}; audio disabled");
                AudioBackend::Unavailable
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn detect() -> Self {
        AudioBackend::Unavailable
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, AudioBackend::Unavailable)
    }
}

/// Audio service owned by the game
pub struct AudioService {
    backend: AudioBackend,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioService {
    pub fn new(backend: AudioBackend) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn detect() -> Self {
        Self::new(AudioBackend::detect())
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        #[cfg(target_arch = "wasm32")]
        if let AudioBackend::Available(ctx) = &self.backend {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Fire-and-forget single tone
    pub fn play_tone(&self, frequency: f32, waveform: Waveform, duration: f64, volume: f32) {
        self.schedule(&[Tone::new(frequency, waveform, duration, volume)]);
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        self.schedule(&effect.tones());
    }

    fn schedule(&self, tones: &[Tone]) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        #[cfg(target_arch = "wasm32")]
        if let AudioBackend::Available(ctx) = &self.backend {
            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            for tone in tones {
                play_scheduled(ctx, tone, vol);
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        let _ = tones;
    }
}

/// Create an oscillator with gain envelope
#[cfg(target_arch = "wasm32")]
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

#[cfg(target_arch = "wasm32")]
fn play_scheduled(ctx: &AudioContext, tone: &Tone, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, tone.frequency, tone.waveform.oscillator_type()) else {
        return;
    };
    let t = ctx.current_time() + tone.delay;
    let level = (tone.volume * vol).max(0.011);

    gain.gain().set_value_at_time(level, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + tone.duration)
        .ok();

    osc.start_with_when(t).ok();
    osc.stop_with_when(t + tone.duration + 0.05).ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const ALL: [SoundEffect; 6] = [
        SoundEffect::Launch,
        SoundEffect::TargetHit,
        SoundEffect::LevelComplete,
        SoundEffect::OutOfTries,
        SoundEffect::GameWon,
        SoundEffect::HighScore,
    ];

    #[test]
    fn test_recipes_are_audible() {
        for effect in ALL {
            let tones = effect.tones();
            assert!(!tones.is_empty(), "{effect:?}");
            for t in tones {
                assert!(t.frequency > 20.0 && t.frequency < 20_000.0);
                assert!(t.duration > 0.0 && t.delay >= 0.0);
                assert!(t.volume > 0.0 && t.volume <= 1.0);
            }
        }
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::TargetHit { pos: Vec2::ZERO }),
            Some(SoundEffect::TargetHit)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::NewHighScore(3)), Some(SoundEffect::HighScore));
        assert_eq!(SoundEffect::for_event(&GameEvent::LevelError("x".into())), None);
    }

    #[test]
    fn test_unavailable_backend_is_silent() {
        let mut audio = AudioService::new(AudioBackend::Unavailable);
        assert!(!audio.is_available());
        audio.play(SoundEffect::GameWon);
        audio.play_tone(440.0, Waveform::Sine, 0.1, 0.5);
        audio.set_muted(true);
        assert_eq!(audio.effective_volume(), 0.0);
    }

    #[test]
    fn test_volume_clamps() {
        let mut audio = AudioService::new(AudioBackend::Unavailable);
        audio.set_master_volume(2.0);
        audio.set_sfx_volume(0.5);
        assert_eq!(audio.effective_volume(), 0.5);
    }
}
