//! Diagnostic sink: a fixed-capacity ring of recent events.
//!
//! The sink is write-only and fire-and-forget: `report` drops the entry if
//! the buffer lock is contended, and the oldest entry is evicted when the
//! ring is full. Callers pass the timestamp explicitly so this module stays
//! free of any clock dependency.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use heapless::String;

/// Maximum number of diagnostic entries to keep.
pub const DIAG_ENTRIES: usize = 16;

/// Maximum characters per diagnostic message.
pub const DIAG_MSG_LEN: usize = 48;

/// Maximum characters for a source tag.
pub const DIAG_TAG_LEN: usize = 8;

/// Diagnostic severity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum Severity {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl Severity {
    /// Single-character prefix for compact output.
    pub const fn prefix(self) -> char {
        match self {
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
        }
    }
}

/// A single diagnostic entry.
#[derive(Clone, Default)]
pub struct DiagEntry {
    pub severity: Severity,
    /// Source subsystem tag (truncated to [`DIAG_TAG_LEN`]).
    pub tag: String<DIAG_TAG_LEN>,
    /// Message text (truncated to [`DIAG_MSG_LEN`]).
    pub message: String<DIAG_MSG_LEN>,
    /// Microseconds since boot, supplied by the caller.
    pub timestamp_us: u64,
}

impl DiagEntry {
    /// Create a new entry, truncating tag and message to their capacities.
    pub fn new(severity: Severity, tag: &str, message: &str, timestamp_us: u64) -> Self {
        Self {
            severity,
            tag: truncated(tag),
            message: truncated(message),
            timestamp_us,
        }
    }
}

fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out: String<N> = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Circular buffer of diagnostic entries.
pub struct DiagBuffer {
    entries: [DiagEntry; DIAG_ENTRIES],
    head: usize, // Next write position
    count: usize,
}

impl DiagBuffer {
    /// Create a new empty buffer.
    pub const fn new() -> Self {
        Self {
            entries: [const {
                DiagEntry {
                    severity: Severity::Info,
                    tag: String::new(),
                    message: String::new(),
                    timestamp_us: 0,
                }
            }; DIAG_ENTRIES],
            head: 0,
            count: 0,
        }
    }

    /// Append an entry. The oldest entry is evicted when the ring is full.
    pub fn record(&mut self, severity: Severity, tag: &str, message: &str, timestamp_us: u64) {
        self.entries[self.head] = DiagEntry::new(severity, tag, message, timestamp_us);
        self.head = (self.head + 1) % DIAG_ENTRIES;
        if self.count < DIAG_ENTRIES {
            self.count += 1;
        }
    }

    /// Number of entries currently held.
    #[inline]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Whether the buffer holds no entries.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterate over entries from oldest to newest.
    pub fn iter(&self) -> DiagBufferIter<'_> {
        let start = if self.count < DIAG_ENTRIES { 0 } else { self.head };
        DiagBufferIter {
            buffer: self,
            pos: start,
            remaining: self.count,
        }
    }
}

impl Default for DiagBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over diagnostic entries (oldest to newest).
pub struct DiagBufferIter<'a> {
    buffer: &'a DiagBuffer,
    pos: usize,
    remaining: usize,
}

impl<'a> Iterator for DiagBufferIter<'a> {
    type Item = &'a DiagEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = &self.buffer.entries[self.pos];
        self.pos = (self.pos + 1) % DIAG_ENTRIES;
        self.remaining -= 1;
        Some(entry)
    }
}

/// Global diagnostic buffer protected by a mutex.
pub static DIAG: Mutex<CriticalSectionRawMutex, DiagBuffer> = Mutex::new(DiagBuffer::new());

/// Record a diagnostic event into the global buffer.
///
/// Non-blocking: if the mutex is held the entry is silently dropped. The
/// sink has no backpressure contract.
pub fn report(severity: Severity, tag: &str, message: &str, timestamp_us: u64) {
    if let Ok(mut buffer) = DIAG.try_lock() {
        buffer.record(severity, tag, message, timestamp_us);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_empty() {
        let buffer = DiagBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert!(buffer.iter().next().is_none());
    }

    #[test]
    fn test_record_and_iterate_in_order() {
        let mut buffer = DiagBuffer::new();
        buffer.record(Severity::Info, "CAN", "reader started", 100);
        buffer.record(Severity::Warn, "CAN", "decode error", 200);

        let entries: Vec<_> = buffer.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message.as_str(), "reader started");
        assert_eq!(entries[0].timestamp_us, 100);
        assert_eq!(entries[1].severity, Severity::Warn);
        assert_eq!(entries[1].timestamp_us, 200);
    }

    #[test]
    fn test_full_ring_evicts_oldest() {
        let mut buffer = DiagBuffer::new();
        for index in 0..(DIAG_ENTRIES + 3) {
            buffer.record(Severity::Info, "T", "event", index as u64);
        }
        assert_eq!(buffer.len(), DIAG_ENTRIES);

        let first = buffer.iter().next().unwrap();
        assert_eq!(first.timestamp_us, 3);
        let last = buffer.iter().last().unwrap();
        assert_eq!(last.timestamp_us, (DIAG_ENTRIES + 2) as u64);
    }

    #[test]
    fn test_long_fields_are_truncated() {
        let long_msg = "x".repeat(DIAG_MSG_LEN * 2);
        let entry = DiagEntry::new(Severity::Error, "TOOLONGTAG", &long_msg, 0);
        assert_eq!(entry.tag.len(), DIAG_TAG_LEN);
        assert_eq!(entry.message.len(), DIAG_MSG_LEN);
    }

    #[test]
    fn test_global_report() {
        report(Severity::Info, "BOOT", "hello", 42);
        let buffer = DIAG.try_lock().unwrap();
        assert!(!buffer.is_empty());
    }

    #[test]
    fn test_severity_prefixes() {
        assert_eq!(Severity::Debug.prefix(), 'D');
        assert_eq!(Severity::Error.prefix(), 'E');
    }
}
