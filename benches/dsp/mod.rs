//! Benchmarks for the synthesis stages.

mod effects;
mod fm;
mod pcm;
mod string;

pub use effects::bench_effects;
pub use fm::bench_fm;
pub use pcm::bench_pcm;
pub use string::bench_string;
