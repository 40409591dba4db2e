//! Music and sound-effect mixer controls
//!
//! Models the playback state an audio backend would be driven from: one
//! music track and a fixed pool of SFX voices sharing a single clip. No
//! audio is produced here.

use super::clock::Simulation;
use crate::settings::MixerSettings;

/// Volume change per tick while a volume key is held
pub const VOLUME_STEP: f32 = 2.5;
/// Pitch change per tick while a pitch key is held
pub const PITCH_STEP: f32 = 0.1;
pub const MIN_PITCH: f32 = 0.1;
pub const MAX_VOLUME: f32 = 100.0;

pub const HELP_TEXT: &str = "List of Commands:
H: Help -- displays this help screen
Q: Play/Pause Music
R: Reset Music -- stops music and plays from start
Y: Toggle Loop Music -- toggles music loop; initially not looping
W/S: Increase/Decrease Music Volume
A/D: Increase/Decrease Music Pitch
E: Play Sound
I/K: Increase/Decrease SFX Volume
J/L: Increase/Decrease SFX Pitch";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Held controls for one channel: up/down move volume, left/right move pitch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelKeys {
    pub volume_up: bool,
    pub volume_down: bool,
    pub pitch_down: bool,
    pub pitch_up: bool,
}

/// Volume and pitch of one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelLevels {
    /// 0-100
    pub volume: f32,
    /// Playback rate multiplier, at least `MIN_PITCH`
    pub pitch: f32,
}

impl ChannelLevels {
    /// Apply one tick of held keys, then clamp
    pub fn apply(&mut self, keys: &ChannelKeys) {
        if keys.volume_up {
            self.volume += VOLUME_STEP;
        }
        if keys.pitch_down {
            self.pitch -= PITCH_STEP;
        }
        if keys.volume_down {
            self.volume -= VOLUME_STEP;
        }
        if keys.pitch_up {
            self.pitch += PITCH_STEP;
        }
        self.volume = self.volume.clamp(0.0, MAX_VOLUME);
        self.pitch = self.pitch.max(MIN_PITCH);
    }
}

/// A playing clip with a cursor in seconds of source audio
#[derive(Debug, Clone, Copy, Default)]
pub struct Voice {
    pub status: PlaybackStatus,
    pub cursor: f32,
    pub volume: f32,
    pub pitch: f32,
}

impl Voice {
    /// Advance the cursor by `dt·pitch`. Returns true when the clip ended.
    fn advance(&mut self, dt: f32, length: f32) -> bool {
        if self.status != PlaybackStatus::Playing {
            return false;
        }
        self.cursor += dt * self.pitch;
        self.cursor >= length
    }

    fn stop(&mut self) {
        self.status = PlaybackStatus::Stopped;
        self.cursor = 0.0;
    }
}

/// Fixed pool of SFX voices
#[derive(Debug, Clone)]
pub struct VoicePool {
    voices: Box<[Voice]>,
    clip_length: f32,
}

impl VoicePool {
    pub fn new(capacity: usize, clip_length: f32) -> Self {
        Self {
            voices: vec![Voice::default(); capacity].into_boxed_slice(),
            clip_length,
        }
    }

    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    pub fn playing_count(&self) -> usize {
        self.voices
            .iter()
            .filter(|v| v.status == PlaybackStatus::Playing)
            .count()
    }

    /// Start the first stopped voice. Returns its index, or `None` when every
    /// voice is busy (nothing plays).
    pub fn play_one(&mut self, levels: ChannelLevels) -> Option<usize> {
        let (index, voice) = self
            .voices
            .iter_mut()
            .enumerate()
            .find(|(_, v)| v.status == PlaybackStatus::Stopped)?;
        voice.status = PlaybackStatus::Playing;
        voice.cursor = 0.0;
        voice.volume = levels.volume;
        voice.pitch = levels.pitch;
        Some(index)
    }

    pub fn stop_all(&mut self) {
        self.voices.iter_mut().for_each(Voice::stop);
    }

    fn advance(&mut self, dt: f32) {
        let length = self.clip_length;
        for voice in self.voices.iter_mut() {
            if voice.advance(dt, length) {
                voice.stop();
            }
        }
    }
}

/// The music track
#[derive(Debug, Clone)]
pub struct Music {
    pub voice: Voice,
    pub length: f32,
    pub looping: bool,
}

impl Music {
    /// Play if paused or stopped, pause if playing
    pub fn toggle(&mut self) {
        self.voice.status = match self.voice.status {
            PlaybackStatus::Playing => PlaybackStatus::Paused,
            PlaybackStatus::Paused | PlaybackStatus::Stopped => PlaybackStatus::Playing,
        };
    }

    /// Stop and play again from the start
    pub fn restart(&mut self) {
        self.voice.stop();
        self.voice.status = PlaybackStatus::Playing;
    }

    fn advance(&mut self, dt: f32) {
        if self.voice.advance(dt, self.length) {
            if self.looping {
                self.voice.cursor %= self.length;
            } else {
                self.voice.stop();
            }
        }
    }
}

/// Input for one mixer tick
#[derive(Debug, Clone, Default)]
pub struct MixerInput {
    pub music_keys: ChannelKeys,
    pub sfx_keys: ChannelKeys,
    /// One-shot commands
    pub toggle_help: bool,
    pub toggle_music: bool,
    pub restart_music: bool,
    pub toggle_loop: bool,
    pub play_sfx: bool,
}

/// Complete state of the mixer demo
#[derive(Debug, Clone)]
pub struct Mixer {
    pub music: Music,
    pub music_levels: ChannelLevels,
    pub sfx: VoicePool,
    pub sfx_levels: ChannelLevels,
    pub show_help: bool,
}

impl Mixer {
    pub fn new(settings: &MixerSettings) -> Self {
        Self {
            music: Music {
                voice: Voice {
                    status: PlaybackStatus::Playing,
                    cursor: 0.0,
                    volume: settings.music_volume,
                    pitch: settings.music_pitch,
                },
                length: settings.music_length,
                looping: false,
            },
            music_levels: ChannelLevels {
                volume: settings.music_volume,
                pitch: settings.music_pitch,
            },
            sfx: VoicePool::new(settings.voice_count, settings.sfx_length),
            sfx_levels: ChannelLevels {
                volume: settings.sfx_volume,
                pitch: settings.sfx_pitch,
            },
            show_help: true,
        }
    }

    /// Stop everything (on quit)
    pub fn shutdown(&mut self) {
        self.music.voice.stop();
        self.sfx.stop_all();
    }
}

impl Simulation for Mixer {
    type Input = MixerInput;

    fn tick(&mut self, input: &MixerInput, dt: f32) {
        if input.toggle_help {
            self.show_help = !self.show_help;
        }
        if input.restart_music {
            self.music.restart();
        }
        if input.toggle_music {
            self.music.toggle();
        }
        if input.toggle_loop {
            self.music.looping = !self.music.looping;
            log::debug!("Music looping: {}", self.music.looping);
        }
        if input.play_sfx && self.sfx.play_one(self.sfx_levels).is_none() {
            log::debug!("All {} SFX voices busy", self.sfx.capacity());
        }

        self.music_levels.apply(&input.music_keys);
        self.sfx_levels.apply(&input.sfx_keys);
        self.music.voice.volume = self.music_levels.volume;
        self.music.voice.pitch = self.music_levels.pitch;

        self.music.advance(dt);
        self.sfx.advance(dt);
    }

    fn clear_one_shots(input: &mut MixerInput) {
        input.toggle_help = false;
        input.toggle_music = false;
        input.restart_music = false;
        input.toggle_loop = false;
        input.play_sfx = false;
    }
}
