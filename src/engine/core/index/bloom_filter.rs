use crate::engine::types::Datum;
use crate::shared::hash::split_hash64;

/// Read-only view over one block's bloom filter bits.
#[derive(Debug, Clone, Copy)]
pub struct BloomFilter<'a> {
    bits: &'a [u8],
    hash_function_num: u32,
}

impl<'a> BloomFilter<'a> {
    pub fn new(bits: &'a [u8], hash_function_num: u32) -> Self {
        Self {
            bits,
            hash_function_num,
        }
    }

    pub fn bit_num(&self) -> u64 {
        self.bits.len() as u64 * 8
    }

    /// May-contain test. Null never hashes into a filter, so it is reported as present.
    pub fn test(&self, value: &Datum) -> bool {
        match value.key_bytes() {
            Some(key) => self.test_bytes(&key),
            None => true,
        }
    }

    pub fn test_bytes(&self, key: &[u8]) -> bool {
        let bit_num = self.bit_num();
        if bit_num == 0 {
            return true;
        }
        probe_bits(key, self.hash_function_num, bit_num)
            .all(|bit| self.bits[(bit / 8) as usize] & (1 << (bit % 8)) != 0)
    }
}

/// Accumulates keys into a fresh filter of `bit_num` bits.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder {
    bits: Vec<u8>,
    hash_function_num: u32,
}

#[cfg(test)]
impl BloomFilterBuilder {
    pub fn new(bit_num: u32, hash_function_num: u32) -> Self {
        Self {
            bits: vec![0u8; (bit_num / 8) as usize],
            hash_function_num,
        }
    }

    pub fn add(&mut self, value: &Datum) {
        if let Some(key) = value.key_bytes() {
            self.add_bytes(&key);
        }
    }

    pub fn add_bytes(&mut self, key: &[u8]) {
        let bit_num = self.bits.len() as u64 * 8;
        if bit_num == 0 {
            return;
        }
        for bit in probe_bits(key, self.hash_function_num, bit_num) {
            self.bits[(bit / 8) as usize] |= 1 << (bit % 8);
        }
    }

    pub fn finish(self) -> Vec<u8> {
        self.bits
    }
}

fn probe_bits(key: &[u8], hash_function_num: u32, bit_num: u64) -> impl Iterator<Item = u64> {
    let (h1, h2) = split_hash64(key);
    (0..hash_function_num as u64).map(move |i| h1.wrapping_add(i.wrapping_mul(h2)) % bit_num)
}
