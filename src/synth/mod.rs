//! Note generators.
//!
//! Two independent paths produce a note from nothing but a frequency and a
//! noise source:
//!
//! - the felt piano: [`excitation::NoiseExcitation`] strikes a
//!   [`string::KarplusStrong`] string, with a [`thump::Thump`] mixed under
//!   the onset
//! - the FM pluck: [`fm::FmPluck`], a stereo two-operator tone with a
//!   detuned shimmer layer and a noise grain

pub mod excitation;
pub mod fm;
pub mod string;
pub mod thump;

pub use excitation::NoiseExcitation;
pub use fm::FmPluck;
pub use string::{delay_length, KarplusStrong};
pub use thump::Thump;
