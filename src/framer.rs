//! Byte-level framing: turns the receiver's one-byte-at-a-time stream into
//! discrete sentences and drives the aggregation pass once the sentence
//! slots run out.

use std::str;

use arrayvec::ArrayVec;

use err::Error;
use fix::PositionState;

/// Capacity of one sentence slot in bytes, including the terminator the
/// wire format implies, so a sentence carries at most
/// `SENTENCE_CAPACITY - 1` payload bytes.
pub const SENTENCE_CAPACITY: usize = 90;

/// Number of sentences buffered between aggregation passes. Once all slots
/// are filled, no further bytes are accepted until the batch is flushed;
/// this is the only backpressure mechanism there is.
pub const SLOT_COUNT: usize = 7;

const CARRIAGE_RETURN: u8 = 13;
const LINE_FEED: u8 = 10;

/// Outcome of feeding one byte to the framer. None of these are errors;
/// `BufferFull` in particular is a flow-control signal that reports a
/// completed aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The byte was stored (or deliberately ignored).
    CharReceived,
    /// The byte terminated a sentence.
    MessageComplete,
    /// All slots were filled; the batch has been aggregated and the slots
    /// reset. The byte itself was dropped.
    BufferFull,
}

/// The serial driver the framer re-arms after every byte.
///
/// `request_byte` asks the driver for exactly one more byte, which the
/// driver later hands back through [`Receiver::receive_byte`]. The framer
/// calls it on every return path; a driver that is never re-armed would
/// stall reception permanently.
///
/// [`Receiver::receive_byte`]: struct.Receiver.html#method.receive_byte
pub trait ByteSource {
    fn request_byte(&mut self);
}

type RawSentence = ArrayVec<u8, SENTENCE_CAPACITY>;

/// The bounded set of sentence slots bytes are framed into.
///
/// `next_slot` is the write cursor: `Some(i)` is the slot currently being
/// filled, `None` means every slot holds a terminated sentence and the
/// batch must be flushed before any further write.
#[derive(Debug, Clone)]
pub struct SentenceBuffer {
    slots: [RawSentence; SLOT_COUNT],
    next_slot: Option<usize>,
}

impl Default for SentenceBuffer {
    fn default() -> SentenceBuffer {
        SentenceBuffer::new()
    }
}

impl SentenceBuffer {
    pub fn new() -> SentenceBuffer {
        SentenceBuffer {
            slots: Default::default(),
            next_slot: Some(0),
        }
    }

    /// Frame one byte.
    ///
    /// Carriage return terminates the current sentence, line feed and NUL
    /// are ignored, everything else is appended to the current slot. A
    /// byte that would overflow its slot is dropped and reported as
    /// [`Error::SentenceTooLong`](err/enum.Error.html), leaving the slot
    /// untouched.
    pub fn push_byte(&mut self, byte: u8) -> Result<Status, Error> {
        let current = match self.next_slot {
            Some(i) => i,
            None => return Ok(Status::BufferFull),
        };

        match byte {
            CARRIAGE_RETURN => {
                self.next_slot = if current + 1 < SLOT_COUNT {
                    Some(current + 1)
                } else {
                    None
                };
                Ok(Status::MessageComplete)
            }
            LINE_FEED | 0 => Ok(Status::CharReceived),
            _ => {
                let slot = &mut self.slots[current];
                // one byte of headroom stays reserved for the terminator
                if slot.len() + 1 >= SENTENCE_CAPACITY {
                    return Err(Error::SentenceTooLong(SENTENCE_CAPACITY));
                }
                slot.push(byte);
                Ok(Status::CharReceived)
            }
        }
    }

    /// The buffered sentences in slot order. Slots that were never written
    /// read as empty sentences; bytes that do not form valid UTF-8 do too,
    /// and downstream both normalize to the neutral no-fix record.
    pub fn sentences(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .map(|slot| str::from_utf8(slot).unwrap_or(""))
    }

    /// Whether every slot holds a terminated sentence.
    pub fn is_full(&self) -> bool {
        self.next_slot.is_none()
    }

    /// Empty every slot and move the write cursor back to the first one.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
        self.next_slot = Some(0);
    }
}

/// The receive core: sentence slots plus the aggregated position record,
/// driven by the serial driver's byte-arrival callback.
#[derive(Debug)]
pub struct Receiver<S> {
    source: S,
    buffer: SentenceBuffer,
    position: PositionState,
}

impl<S: ByteSource> Receiver<S> {
    /// Set up the receive core: a sentinel-valued position record, empty
    /// slots, and the first byte request already issued.
    pub fn new(mut source: S) -> Receiver<S> {
        source.request_byte();
        Receiver {
            source,
            buffer: SentenceBuffer::new(),
            position: PositionState::new(),
        }
    }

    /// Process exactly one received byte.
    ///
    /// When the slots are exhausted the pending batch is aggregated and the
    /// slots are reset before this returns `BufferFull`; the triggering
    /// byte is dropped. On every return path, including the error one, the
    /// byte source is re-armed for exactly one more byte.
    pub fn receive_byte(&mut self, byte: u8) -> Result<Status, Error> {
        let result = match self.buffer.push_byte(byte) {
            Ok(Status::BufferFull) => {
                self.aggregate();
                Ok(Status::BufferFull)
            }
            other => other,
        };

        self.source.request_byte();
        result
    }

    /// Whether a full batch is waiting to be aggregated.
    ///
    /// Aggregation happens inside [`receive_byte`](#method.receive_byte)
    /// when it has to, but parsing seven sentences in interrupt context is
    /// latency a caller may not want; a lower-priority task can poll this
    /// and call [`aggregate`](#method.aggregate) at a calmer moment
    /// instead.
    pub fn needs_aggregation(&self) -> bool {
        self.buffer.is_full()
    }

    /// Run the aggregation pass over the buffered sentences and reset the
    /// slots.
    pub fn aggregate(&mut self) {
        self.position.aggregate(self.buffer.sentences());
        self.buffer.reset();
    }

    /// The aggregated position record.
    pub fn position(&self) -> &PositionState {
        &self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GGA_FIX: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";

    /// Counts how often the framer asked for another byte.
    struct CountingSource {
        requests: usize,
    }

    impl CountingSource {
        fn new() -> CountingSource {
            CountingSource { requests: 0 }
        }
    }

    impl ByteSource for CountingSource {
        fn request_byte(&mut self) {
            self.requests += 1;
        }
    }

    fn feed(rx: &mut Receiver<CountingSource>, sentence: &str) {
        for &b in sentence.as_bytes() {
            rx.receive_byte(b).unwrap();
        }
        rx.receive_byte(b'\r').unwrap();
    }

    #[test]
    fn frames_a_sentence() {
        let mut buf = SentenceBuffer::new();
        for &b in b"$GPGGA,1" {
            assert_eq!(buf.push_byte(b), Ok(Status::CharReceived));
        }
        assert_eq!(buf.push_byte(b'\r'), Ok(Status::MessageComplete));
        assert_eq!(buf.sentences().next(), Some("$GPGGA,1"));
    }

    #[test]
    fn line_feed_and_nul_are_ignored() {
        let mut buf = SentenceBuffer::new();
        buf.push_byte(b'a').unwrap();
        assert_eq!(buf.push_byte(b'\n'), Ok(Status::CharReceived));
        assert_eq!(buf.push_byte(0), Ok(Status::CharReceived));
        buf.push_byte(b'b').unwrap();
        assert_eq!(buf.sentences().next(), Some("ab"));
    }

    #[test]
    fn overlong_sentence_is_cut_short() {
        let mut buf = SentenceBuffer::new();
        for _ in 0..SENTENCE_CAPACITY - 1 {
            buf.push_byte(b'x').unwrap();
        }
        // the slot is at capacity now, the next byte must be dropped
        assert_matches!(buf.push_byte(b'x'), Err(Error::SentenceTooLong(_)));
        let sentence = buf.sentences().next().unwrap().to_owned();
        assert_eq!(sentence.len(), SENTENCE_CAPACITY - 1);
        // the slot is still writable after the drop, a CR still terminates
        assert_eq!(buf.push_byte(b'\r'), Ok(Status::MessageComplete));
        assert_eq!(buf.sentences().next(), Some(sentence.as_str()));
    }

    #[test]
    fn seven_sentences_fill_the_buffer() {
        let mut buf = SentenceBuffer::new();
        for _ in 0..SLOT_COUNT {
            assert!(!buf.is_full());
            buf.push_byte(b'x').unwrap();
            assert_eq!(buf.push_byte(b'\r'), Ok(Status::MessageComplete));
        }
        assert!(buf.is_full());
        // nothing is written once full, the caller has to flush
        assert_eq!(buf.push_byte(b'y'), Ok(Status::BufferFull));
        assert_eq!(buf.sentences().next(), Some("x"));

        buf.reset();
        assert!(!buf.is_full());
        assert!(buf.sentences().all(|s| s.is_empty()));
    }

    #[test]
    fn full_buffer_triggers_aggregation() {
        let mut rx = Receiver::new(CountingSource::new());
        feed(&mut rx, GGA_FIX);
        for _ in 1..SLOT_COUNT {
            feed(&mut rx, "$GPXXX,1,2,3");
        }
        assert!(rx.needs_aggregation());
        assert_eq!(rx.position().quality(), 0);

        // the next data byte flushes the batch; the first sentence with a
        // non-zero quality wins
        assert_eq!(rx.receive_byte(b'$'), Ok(Status::BufferFull));
        assert!(!rx.needs_aggregation());
        assert_eq!(rx.position().quality(), 1);
        assert_eq!(rx.position().altitude(), 545.4);
    }

    #[test]
    fn deferred_aggregation() {
        let mut rx = Receiver::new(CountingSource::new());
        feed(&mut rx, GGA_FIX);
        assert!(!rx.needs_aggregation());

        // a lower-priority task may flush early, without a full buffer
        rx.aggregate();
        assert_eq!(rx.position().quality(), 1);
    }

    #[test]
    fn rearms_on_every_return_path() {
        let mut rx = Receiver::new(CountingSource::new());
        assert_eq!(rx.source.requests, 1); // the initial request

        rx.receive_byte(b'a').unwrap();
        rx.receive_byte(b'\n').unwrap();
        rx.receive_byte(b'\r').unwrap();
        assert_eq!(rx.source.requests, 4);

        // even a dropped byte re-arms the source
        for _ in 0..SENTENCE_CAPACITY {
            let _ = rx.receive_byte(b'x');
        }
        assert_eq!(rx.source.requests, 4 + SENTENCE_CAPACITY);
    }

    #[test]
    fn init_issues_first_request() {
        let rx = Receiver::new(CountingSource::new());
        assert_eq!(rx.source.requests, 1);
        assert_eq!(rx.position().quality(), 0);
        assert_eq!(rx.position().altitude(), -1.0);
    }
}
