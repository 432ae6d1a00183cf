//! IPC module - Frame encoding, consumer sinks, and stream stop signalling

pub mod channels;
pub mod frame;
pub mod stop;

pub use channels::{frame_stream, ChannelSink, ReadingSink};
pub use frame::{decode_event, encode_event};
pub use stop::StopSignal;
