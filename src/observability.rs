use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("geminius.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("geminius.client.request_errors");

pub(crate) static STREAM_CHUNKS: Counter = Counter::new("geminius.stream.chunks");
pub(crate) static STREAM_ERRORS: Counter = Counter::new("geminius.stream.errors");

pub(crate) static CHAT_TURNS: Counter = Counter::new("geminius.chat.turns");
pub(crate) static CHAT_TURN_ERRORS: Counter = Counter::new("geminius.chat.turn_errors");
pub(crate) static CHAT_REPLY_CHARS: Moments = Moments::new("geminius.chat.reply_chars");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);

    collector.register_counter(&STREAM_CHUNKS);
    collector.register_counter(&STREAM_ERRORS);

    collector.register_counter(&CHAT_TURNS);
    collector.register_counter(&CHAT_TURN_ERRORS);
    collector.register_moments(&CHAT_REPLY_CHARS);
}
