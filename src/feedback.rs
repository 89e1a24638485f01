//! Feedback sink: the boundary between gameplay logic and the UI / audio.
//!
//! Core types (`BoostAccumulator`, `BoostManeuver`) never reach for a global
//! UI or audio manager.  Instead every operation that has a visible or audible
//! side effect takes a `&mut impl FeedbackSink`.  In the running app the sink
//! is a `MessageWriter<Feedback>`; tests pass a [`FeedbackLog`].
//!
//! | Consumer                         | Reads                               |
//! |----------------------------------|-------------------------------------|
//! | `hud::boost_meter_feedback_system` | `BoostMagnitude`, `BoostReset`    |
//! | [`play_audio_cues_system`]       | `Cue(_)`                            |

use bevy::prelude::*;

/// Named audio cues the gameplay can trigger.  Fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Pickup,
    Damage,
    ImpulseStart,
    ImpulseStop,
}

impl AudioCue {
    /// Asset path of the sound played for this cue.
    pub fn asset_path(self) -> &'static str {
        match self {
            AudioCue::Pickup => "audio/pickup.ogg",
            AudioCue::Damage => "audio/damage.ogg",
            AudioCue::ImpulseStart => "audio/impulse_start.ogg",
            AudioCue::ImpulseStop => "audio/impulse_stop.ogg",
        }
    }
}

/// One feedback notification emitted by the gameplay core.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum Feedback {
    /// The boost the player would get right now changed to this distance.
    BoostMagnitude(f32),
    /// The boost display should animate back to empty.
    BoostReset,
    /// Play a sound.
    Cue(AudioCue),
}

/// Receives UI and audio side effects from the gameplay core.
pub trait FeedbackSink {
    fn report_boost_magnitude(&mut self, magnitude: f32);
    fn reset_boost_display(&mut self);
    fn play(&mut self, cue: AudioCue);
}

impl FeedbackSink for MessageWriter<'_, Feedback> {
    fn report_boost_magnitude(&mut self, magnitude: f32) {
        self.write(Feedback::BoostMagnitude(magnitude));
    }

    fn reset_boost_display(&mut self) {
        self.write(Feedback::BoostReset);
    }

    fn play(&mut self, cue: AudioCue) {
        self.write(Feedback::Cue(cue));
    }
}

/// In-memory sink that records everything it receives, in order.
#[derive(Debug, Default, Clone)]
pub struct FeedbackLog(pub Vec<Feedback>);

impl FeedbackLog {
    /// All cues played so far.
    pub fn cues(&self) -> Vec<AudioCue> {
        self.0
            .iter()
            .filter_map(|f| match f {
                Feedback::Cue(cue) => Some(*cue),
                _ => None,
            })
            .collect()
    }

    /// The most recent magnitude reported, treating a reset as zero.
    pub fn last_magnitude(&self) -> Option<f32> {
        self.0.iter().rev().find_map(|f| match f {
            Feedback::BoostMagnitude(m) => Some(*m),
            Feedback::BoostReset => Some(0.0),
            Feedback::Cue(_) => None,
        })
    }
}

impl FeedbackSink for FeedbackLog {
    fn report_boost_magnitude(&mut self, magnitude: f32) {
        self.0.push(Feedback::BoostMagnitude(magnitude));
    }

    fn reset_boost_display(&mut self) {
        self.0.push(Feedback::BoostReset);
    }

    fn play(&mut self, cue: AudioCue) {
        self.0.push(Feedback::Cue(cue));
    }
}

// ── Audio playback ────────────────────────────────────────────────────────────

/// Loaded sound handles, one per [`AudioCue`].
#[derive(Resource)]
pub struct AudioCueHandles {
    pickup: Handle<AudioSource>,
    damage: Handle<AudioSource>,
    impulse_start: Handle<AudioSource>,
    impulse_stop: Handle<AudioSource>,
}

impl AudioCueHandles {
    fn get(&self, cue: AudioCue) -> &Handle<AudioSource> {
        match cue {
            AudioCue::Pickup => &self.pickup,
            AudioCue::Damage => &self.damage,
            AudioCue::ImpulseStart => &self.impulse_start,
            AudioCue::ImpulseStop => &self.impulse_stop,
        }
    }
}

/// Registers the [`Feedback`] message and, with `audio: true`, the sound
/// loader and player.  Headless tests build it with `audio: false`.
pub struct FeedbackPlugin {
    pub audio: bool,
}

impl Plugin for FeedbackPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<Feedback>();
        if self.audio {
            app.add_systems(Startup, load_audio_cues)
                .add_systems(Update, play_audio_cues_system);
        }
    }
}

fn load_audio_cues(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(AudioCueHandles {
        pickup: asset_server.load(AudioCue::Pickup.asset_path()),
        damage: asset_server.load(AudioCue::Damage.asset_path()),
        impulse_start: asset_server.load(AudioCue::ImpulseStart.asset_path()),
        impulse_stop: asset_server.load(AudioCue::ImpulseStop.asset_path()),
    });
    info!("[audio] Cue handles loaded");
}

/// Spawn a one-shot audio player for every cue written this frame.
pub fn play_audio_cues_system(
    mut commands: Commands,
    mut feedback: MessageReader<Feedback>,
    handles: Option<Res<AudioCueHandles>>,
) {
    let Some(handles) = handles else {
        return;
    };
    for message in feedback.read() {
        if let Feedback::Cue(cue) = message {
            commands.spawn((
                AudioPlayer::new(handles.get(*cue).clone()),
                PlaybackSettings::DESPAWN,
            ));
        }
    }
}
