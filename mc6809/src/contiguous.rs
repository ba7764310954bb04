//! A read-only view over a set of non-overlapping address-anchored byte
//! blocks, addressed as a flat `[start, stop)` window with a default fill
//! value for any address no block covers.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Presents assembled fragments as one contiguous byte range, the way a
/// raw-binary exporter needs them.
#[derive(Debug, Clone)]
pub struct ContiguousBytes {
    addresses: Vec<u32>,
    blocks: Vec<Vec<u8>>,
    start: u32,
    stop: u32,
    default: u8,
}

impl ContiguousBytes {
    /// Builds the view from `blocks` (address -> bytes, must not overlap).
    /// `start`/`stop` default to the bounds of the blocks themselves; when
    /// given explicitly they may only widen that range, never narrow it.
    pub fn new(blocks: BTreeMap<u32, Vec<u8>>, start: Option<u32>, stop: Option<u32>, default: u8) -> Result<Self> {
        let mut addresses = Vec::with_capacity(blocks.len());
        let mut bytes = Vec::with_capacity(blocks.len());
        for (address, block) in blocks {
            if let Some(&previous_address) = addresses.last() {
                let previous_len = bytes.last().map(|b: &Vec<u8>| b.len()).unwrap_or(0);
                let previous_stop = previous_address + previous_len as u32;
                if address < previous_stop {
                    return Err(Error::FragmentOverlap { origin: address });
                }
            }
            addresses.push(address);
            bytes.push(block);
        }

        let (range_start, range_stop) = if let Some(&first_address) = addresses.first() {
            let last_address = *addresses.last().unwrap();
            let last_len = bytes.last().unwrap().len() as u32;
            let natural_start = first_address;
            let natural_stop = last_address + last_len;
            let range_start = start.unwrap_or(natural_start);
            let range_stop = stop.unwrap_or(natural_stop);
            if range_start > natural_start {
                return Err(Error::ValueRange {
                    value: range_start as i64,
                    message: format!("start address {range_start} is after the beginning of the first block"),
                });
            }
            if range_stop < natural_stop {
                return Err(Error::ValueRange {
                    value: range_stop as i64,
                    message: format!("stop address {range_stop} is before the end of the last block"),
                });
            }
            (range_start, range_stop)
        } else {
            let range_start = start.unwrap_or(0);
            (range_start, stop.unwrap_or(range_start))
        };

        if range_stop < range_start {
            return Err(Error::ValueRange {
                value: range_stop as i64,
                message: format!("stop address {range_stop} is before start address {range_start}"),
            });
        }

        Ok(ContiguousBytes {
            addresses,
            blocks: bytes,
            start: range_start,
            stop: range_stop,
            default,
        })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn stop(&self) -> u32 {
        self.stop
    }

    pub fn len(&self) -> usize {
        (self.stop - self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }

    /// The byte at `address`, or the default fill value if no block covers
    /// it. Returns `None` if `address` falls outside `[start, stop)`.
    pub fn get(&self, address: u32) -> Option<u8> {
        if !(self.start..self.stop).contains(&address) {
            return None;
        }
        let index = self.addresses.partition_point(|&a| a <= address);
        if index == 0 {
            return Some(self.default);
        }
        let block_address = self.addresses[index - 1];
        let block = &self.blocks[index - 1];
        if block_address <= address && address < block_address + block.len() as u32 {
            Some(block[(address - block_address) as usize])
        } else {
            Some(self.default)
        }
    }

    /// Flattens the whole `[start, stop)` window into one byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        (self.start..self.stop).map(|address| self.get(address).unwrap()).collect()
    }
}
