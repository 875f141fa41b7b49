use crate::lang::source_buffer::SourceLocation;
use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
};

/// The information stored in the dictionary for each word placed in the instruction array.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct WordInfo {
    /// The location in the source code where the word was defined.
    pub location: SourceLocation,

    /// The name of the word.
    pub name: String,

    /// Address of the word's first instruction.
    pub address: usize,

    /// How many instructions the word occupies, including its trailing return.
    pub size: usize,
}

impl WordInfo {
    pub fn new(location: SourceLocation, name: String, address: usize, size: usize) -> WordInfo {
        WordInfo {
            location,
            name,
            address,
            size,
        }
    }

    /// Does the given instruction address fall within this word?
    pub fn contains(&self, address: usize) -> bool {
        address >= self.address && address < self.address + self.size
    }
}

impl Display for WordInfo {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{} @ {} ({} instructions, defined at {})",
            self.name, self.address, self.size, self.location
        )
    }
}

/// Maps word names to their starting addresses in the flat instruction array.
///
/// Besides the name lookup the dictionary keeps every placed word in address order.  Together
/// those blocks cover the instruction array exactly once, which lets the runtime and the
/// disassembler map any address back to its enclosing word, even when a later definition has
/// rebound the name.
#[derive(Default)]
pub struct Dictionary {
    /// Name lookup, the most recent definition of a name wins.
    words: HashMap<String, WordInfo>,

    /// Every placed word, ordered by address.
    blocks: Vec<WordInfo>,
}

impl Dictionary {
    pub fn new() -> Dictionary {
        Dictionary {
            words: HashMap::new(),
            blocks: Vec::new(),
        }
    }

    /// Record a newly placed word.  Words must be inserted in address order with no gaps.
    pub fn insert(&mut self, info: WordInfo) {
        debug_assert_eq!(info.address, self.next_address());

        self.blocks.push(info.clone());
        self.words.insert(info.name.clone(), info);
    }

    /// Look up a word by name.
    pub fn try_get(&self, name: &str) -> Option<&WordInfo> {
        self.words.get(name)
    }

    /// Look up the starting address of a word by name.
    pub fn address_of(&self, name: &str) -> Option<usize> {
        self.try_get(name).map(|info| info.address)
    }

    /// Find the word whose block contains the given instruction address.
    pub fn word_at(&self, address: usize) -> Option<&WordInfo> {
        let index = self.blocks.partition_point(|info| info.address <= address);

        if index == 0 {
            return None;
        }

        let info = &self.blocks[index - 1];

        if info.contains(address) {
            Some(info)
        } else {
            None
        }
    }

    /// The first address after the last placed word.
    pub fn next_address(&self) -> usize {
        self.blocks.last().map_or(0, |info| info.address + info.size)
    }

    /// The number of names currently bound.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate over every placed word in address order.
    pub fn blocks(&self) -> impl Iterator<Item = &WordInfo> {
        self.blocks.iter()
    }
}
