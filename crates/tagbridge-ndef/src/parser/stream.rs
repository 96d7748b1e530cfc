//! Partial byte input, parsers running out of data report how much they need

use winnow::{Bytes, Partial};

pub type Stream<'i> = Partial<&'i Bytes>;

pub fn new(data: &[u8]) -> Stream<'_> {
    Partial::new(Bytes::new(data))
}

pub trait StreamExt {
    fn len(&self) -> usize;

    /// Copy of the bytes not consumed yet
    fn remaining(&self) -> Vec<u8>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StreamExt for Stream<'_> {
    fn len(&self) -> usize {
        self.as_ref().len()
    }

    fn remaining(&self) -> Vec<u8> {
        self.as_ref().to_vec()
    }
}
