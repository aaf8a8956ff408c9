//! Audio buffer, file I/O, and level measurement

mod buffer;
mod io;

pub mod analysis;

pub use buffer::AudioBuffer;
pub use io::{load_wav, save_wav, save_wav_with_depth};
