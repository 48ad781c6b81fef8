//! Ports - 抽象化レイヤー
//!
//! Seams between the tracker core and its environment: where time comes
//! from, how ids are minted, and who hears about events.

pub mod clock;
pub mod event_sink;
pub mod id_generator;

pub use self::clock::{Clock, FixedClock, SystemClock, TokioClock};
pub use self::event_sink::{BroadcastEventSink, EventSink, LogEventSink, NoopEventSink};
pub use self::id_generator::{IdGenerator, MonotonicIdGenerator};
