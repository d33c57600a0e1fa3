// Purpose - external interfaces: PCM encoding and where encoded notes go

pub mod pcm;
pub mod sink;

pub use pcm::{PcmEncoder, PcmFormat, PcmStream};
pub use sink::{MemorySink, NoteSink, WavDirectorySink};
