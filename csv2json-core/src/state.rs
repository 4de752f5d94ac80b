use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The parsing context of a transducer.
///
/// This is the only thing a transducer remembers about the input it has
/// already seen, aside from its counters.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum State {
    /// At the very beginning of a record, before any byte of it was seen.
    StartRecord,
    /// At the beginning of a field that is not the first one, or after blanks
    /// were skipped in front of the first one.
    StartField,
    /// Inside an unquoted field.
    Plain,
    /// Inside a quoted field.
    Quoted,
    /// Just after a quote that closed a quoted field.
    ///
    /// The text transducer also uses this state after blanks that end an
    /// unquoted field.
    Closing,
}

impl State {
    /// The name of this state, as it appears in error reports.
    pub fn name(&self) -> &'static str {
        match *self {
            State::StartRecord => "StartRecord",
            State::StartField => "StartField",
            State::Plain => "Plain",
            State::Quoted => "Quoted",
            State::Closing => "Closing",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a transducer is in its input.
///
/// Record, field and line numbers start at `1`. The character count starts
/// at `0` and counts every byte read, including control bytes that were
/// discarded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    record: u64,
    field: u64,
    line: u64,
    character: u64,
}

impl Default for Position {
    fn default() -> Position {
        Position::new()
    }
}

impl Position {
    /// A position at the start of input.
    pub fn new() -> Position {
        Position { record: 1, field: 1, line: 1, character: 0 }
    }

    /// The record number, starting at `1`.
    pub fn record(&self) -> u64 {
        self.record
    }

    /// The field number within the current record, starting at `1`.
    pub fn field(&self) -> u64 {
        self.field
    }

    /// The line number, as measured by occurrences of `\n` (including those
    /// inside quoted fields), starting at `1`.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// The number of bytes read so far.
    pub fn character(&self) -> u64 {
        self.character
    }

    pub(crate) fn consume(&mut self) {
        self.character += 1;
    }

    pub(crate) fn next_line(&mut self) {
        self.line += 1;
    }

    pub(crate) fn next_field(&mut self) {
        self.field += 1;
    }

    pub(crate) fn next_record(&mut self) {
        self.record += 1;
        self.field = 1;
    }
}

/// Counts reported after a stream was transduced successfully.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stats {
    position: Position,
    records: u64,
    fields: u64,
}

impl Stats {
    pub(crate) fn new(position: Position, records: u64, fields: u64) -> Stats {
        Stats { position, records, fields }
    }

    /// The position just past the end of input.
    pub fn position(&self) -> Position {
        self.position
    }

    /// The number of records written, empty records included.
    pub fn records(&self) -> u64 {
        self.records
    }

    /// The number of fields written across all records.
    pub fn fields(&self) -> u64 {
        self.fields
    }

    /// The number of lines seen.
    pub fn lines(&self) -> u64 {
        self.position.line()
    }

    /// The number of bytes read.
    pub fn characters(&self) -> u64 {
        self.position.character()
    }
}

/// Running tallies shared by both transducers.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Counts {
    pub pos: Position,
    pub records: u64,
    pub fields: u64,
}

impl Counts {
    pub fn end_field(&mut self) {
        self.fields += 1;
        self.pos.next_field();
    }

    pub fn end_record(&mut self) {
        self.fields += 1;
        self.records += 1;
        self.pos.next_record();
    }

    pub fn empty_record(&mut self) {
        self.records += 1;
        self.pos.next_record();
    }

    pub fn stats(&self) -> Stats {
        Stats::new(self.pos, self.records, self.fields)
    }
}
