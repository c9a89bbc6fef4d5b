use parking_lot::Mutex;
use rand::Rng;

/// Bits of wall-clock nanoseconds folded into the high half of an id.
const TIME_BITS_MASK: i64 = 0xFFFF_FFFF;
/// Width of the random tail.
const TAIL_BITS: u32 = 31;

/// Process-wide generator of 63-bit positive identifiers.
///
/// The high ~32 bits carry the low-order nanoseconds of the wall clock, the
/// low 31 bits a uniformly random positive integer. The sign bit is never set.
/// A mutex-protected register makes the sequence strictly increasing within
/// the process: a candidate at or below the last value is bumped to last + 1.
/// Across processes uniqueness is probabilistic (two ids minted in the same
/// nanosecond collide with probability at most 2^-31).
pub struct IdGenerator {
    last: Mutex<i64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { last: Mutex::new(0) }
    }

    pub fn next_id(&self) -> i64 {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as i64)
            .unwrap_or_default();
        let tail: i64 = rand::thread_rng().gen_range(1..=i64::from(i32::MAX));
        let candidate = ((nanos & TIME_BITS_MASK) << TAIL_BITS) | tail;

        let mut last = self.last.lock();
        let id = if candidate > *last { candidate } else { *last + 1 };
        *last = id;
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
