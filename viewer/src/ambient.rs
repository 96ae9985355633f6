//! Ambient soundscape playback.
//!
//! Validated by tests in `tests/ambient_controller_tests.rs`.

use engine::media::{AudioElement, MediaError};

/// Fixed ambient preview volume (0.0..=1.0).
///
/// Sits below full scale so the room tracks stay comfortable next to UI
/// sounds on the same output.
pub const AMBIENT_VOLUME: f32 = 0.7;

/// Points the ambient element at `path` and starts looping playback.
///
/// Assigning the source restarts the track from position zero, which is
/// what makes panel toggles audibly swap variants mid-listen.
pub fn start(audio: &mut impl AudioElement, path: &str, volume: f32) -> Result<(), MediaError> {
    audio.set_source(path);
    audio.set_looping(true);
    audio.set_volume(volume);
    audio.play()
}

/// Pauses playback and resets the position to the start.
pub fn stop(audio: &mut impl AudioElement) {
    audio.pause();
    audio.rewind();
}
