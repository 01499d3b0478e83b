//! Memory and I/O bus interface.

use std::fmt;

/// Memory and I/O bus interface.
///
/// Components access memory and peripherals through this trait. The bus
/// handles address decoding and routing to the appropriate device. All
/// multi-byte values are big-endian.
///
/// Data accesses made by a CPU are bracketed by [`begin_io`](Bus::begin_io)
/// and [`end_io`](Bus::end_io). The order is always: address computed,
/// `begin_io`, access, `end_io`. Devices that model bus arbitration or
/// need to know how much of the current time slice is left hook these.
/// Instruction fetches go through [`fetch_word`](Bus::fetch_word) and are
/// not bracketed.
pub trait Bus {
    /// Read a byte from the given address.
    fn read_byte(&mut self, address: u32) -> u8;

    /// Read a big-endian word from the given address.
    fn read_word(&mut self, address: u32) -> u16;

    /// Read a big-endian long as two word accesses, high word first.
    fn read_long(&mut self, address: u32) -> u32 {
        let hi = self.read_word(address);
        let lo = self.read_word(address.wrapping_add(2));
        (u32::from(hi) << 16) | u32::from(lo)
    }

    /// Write a byte to the given address.
    fn write_byte(&mut self, address: u32, value: u8);

    /// Write a big-endian word to the given address.
    fn write_word(&mut self, address: u32, value: u16);

    /// Write a big-endian long as two word accesses, high word first.
    fn write_long(&mut self, address: u32, value: u32) {
        self.write_word(address, (value >> 16) as u16);
        self.write_word(address.wrapping_add(2), value as u16);
    }

    /// Fetch an instruction-stream word.
    ///
    /// Defaults to [`read_word`](Bus::read_word). Buses that map program
    /// memory directly can override this with a cheaper path.
    fn fetch_word(&mut self, address: u32) -> u16 {
        self.read_word(address)
    }

    /// Called after the address is computed and before the access.
    ///
    /// `cycles_left` is the CPU's remaining budget for the current slice.
    fn begin_io(&mut self, cycles_left: i32) {
        let _ = cycles_left;
    }

    /// Called after the access completes.
    ///
    /// Returns the remaining budget, which a device may shorten (to end
    /// the slice early) or lengthen.
    fn end_io(&mut self, cycles_left: i32) -> i32 {
        cycles_left
    }
}

/// Error returned when a memory image does not fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The image would run past the end of memory.
    OutOfRange {
        /// Start address of the image.
        address: u32,
        /// Length of the image in bytes.
        len: usize,
        /// Size of the memory.
        size: usize,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { address, len, size } => write!(
                f,
                "image of {len} bytes at ${address:06X} does not fit in {size} bytes of memory"
            ),
        }
    }
}

impl std::error::Error for LoadError {}

/// Flat RAM covering the whole address space, for tests and simple hosts.
///
/// Addresses wrap modulo the memory size.
#[derive(Debug, Clone)]
pub struct SimpleBus {
    memory: Vec<u8>,
}

impl SimpleBus {
    /// Default size: the 68000's 16 MB address space.
    pub const DEFAULT_SIZE: usize = 0x100_0000;

    /// Create a zero-filled bus of the given size in bytes.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            memory: vec![0; size.max(1)],
        }
    }

    /// Size of the memory in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.memory.len()
    }

    fn index(&self, address: u32) -> usize {
        address as usize % self.memory.len()
    }

    /// Copy an image into memory.
    pub fn load(&mut self, address: u32, data: &[u8]) -> Result<(), LoadError> {
        let start = address as usize;
        match start.checked_add(data.len()) {
            Some(end) if end <= self.memory.len() => {
                self.memory[start..end].copy_from_slice(data);
                Ok(())
            }
            _ => Err(LoadError::OutOfRange {
                address,
                len: data.len(),
                size: self.memory.len(),
            }),
        }
    }

    /// Copy a sequence of big-endian words into memory.
    pub fn load_words(&mut self, address: u32, words: &[u16]) -> Result<(), LoadError> {
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
        self.load(address, &bytes)
    }

    /// Read a byte without side effects.
    #[must_use]
    pub fn peek(&self, address: u32) -> u8 {
        self.memory[self.index(address)]
    }

    /// Read a word without side effects.
    #[must_use]
    pub fn peek_word(&self, address: u32) -> u16 {
        u16::from_be_bytes([self.peek(address), self.peek(address.wrapping_add(1))])
    }

    /// Read a long without side effects.
    #[must_use]
    pub fn peek_long(&self, address: u32) -> u32 {
        (u32::from(self.peek_word(address)) << 16) | u32::from(self.peek_word(address.wrapping_add(2)))
    }

    /// Write a byte without side effects.
    pub fn poke(&mut self, address: u32, value: u8) {
        let i = self.index(address);
        self.memory[i] = value;
    }

    /// Write a word without side effects.
    pub fn poke_word(&mut self, address: u32, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.poke(address, hi);
        self.poke(address.wrapping_add(1), lo);
    }

    /// Write a long without side effects.
    pub fn poke_long(&mut self, address: u32, value: u32) {
        self.poke_word(address, (value >> 16) as u16);
        self.poke_word(address.wrapping_add(2), value as u16);
    }
}

impl Default for SimpleBus {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}

impl Bus for SimpleBus {
    fn read_byte(&mut self, address: u32) -> u8 {
        self.peek(address)
    }

    fn read_word(&mut self, address: u32) -> u16 {
        self.peek_word(address)
    }

    fn write_byte(&mut self, address: u32, value: u8) {
        self.poke(address, value);
    }

    fn write_word(&mut self, address: u32, value: u16) {
        self.poke_word(address, value);
    }
}
