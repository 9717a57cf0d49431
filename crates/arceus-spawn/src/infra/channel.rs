//! Memory channel seam
//!
//! The live memory reader is an external collaborator. This module defines the
//! interface it must implement and the pointer chains to every block we read.

use crate::constants::{MMO_BLOCK_SIZE, OUTBREAK_BLOCK_SIZE};
use crate::domain::location::HisuiMap;
use crate::domain::walker::GroupSeed;
use crate::error::SpawnError;
use byteorder::{ByteOrder, LittleEndian};

/// Read access to the game's memory
pub trait MemoryChannel {
    /// Read `length` bytes at an absolute address
    fn read_bytes(&self, address: u64, length: u32) -> Result<Vec<u8>, SpawnError>;

    /// Follow a pointer chain from a main-relative base, returning the final address
    fn resolve_pointer_chain(&self, base: u64, offsets: &[i64]) -> Result<u64, SpawnError>;
}

impl<T: MemoryChannel + ?Sized> MemoryChannel for &T {
    fn read_bytes(&self, address: u64, length: u32) -> Result<Vec<u8>, SpawnError> {
        (**self).read_bytes(address, length)
    }

    fn resolve_pointer_chain(&self, base: u64, offsets: &[i64]) -> Result<u64, SpawnError> {
        (**self).resolve_pointer_chain(base, offsets)
    }
}

const STATIC_SEED_BASE: u64 = 0x42A6EE0;
const STATIC_SPAWNER_STRIDE: i64 = 0x440;
const DISTORTION_SEED_BASE: u64 = 0x42CC4D8;
const OUTBREAK_BASE: u64 = 0x42BA6B0;

/// A main-relative base address and the offsets to follow from it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointerChain {
    pub base: u64,
    pub offsets: Vec<i64>,
}

impl PointerChain {
    /// Group seed of a static alpha spawner
    pub fn static_seed(spawner_id: usize) -> Self {
        Self {
            base: STATIC_SEED_BASE,
            offsets: vec![0x330, 0x70 + spawner_id as i64 * STATIC_SPAWNER_STRIDE + 0x20],
        }
    }

    /// Group seed of a distortion spawner group
    pub fn distortion_seed(map: HisuiMap, group_id: u8) -> Self {
        let layout = map.distortion_layout();
        Self {
            base: DISTORTION_SEED_BASE,
            offsets: vec![
                0xC0,
                0x1C0,
                layout.pointer_base + group_id as i64 * 8,
                0x18,
                0x430,
                0xC0,
            ],
        }
    }

    /// Standalone outbreak block
    pub fn outbreak_block() -> Self {
        Self {
            base: OUTBREAK_BASE,
            offsets: vec![0x2B0, 0x58, 0x18, 0x20],
        }
    }

    /// Massive outbreak block
    pub fn massive_outbreak_block() -> Self {
        Self {
            base: OUTBREAK_BASE,
            offsets: vec![0x2B0, 0x58, 0x18, 0x1B0],
        }
    }

    pub fn resolve(&self, channel: &impl MemoryChannel) -> Result<u64, SpawnError> {
        channel.resolve_pointer_chain(self.base, &self.offsets)
    }
}

/// Read the group seed at the end of a pointer chain
pub fn read_group_seed(
    channel: &impl MemoryChannel,
    chain: &PointerChain,
) -> Result<GroupSeed, SpawnError> {
    let address = chain.resolve(channel)?;
    let bytes = read_exact(channel, address, 8)?;
    Ok(GroupSeed::from_raw(LittleEndian::read_u64(&bytes)))
}

/// Read the raw standalone outbreak block
pub fn read_outbreak_block(channel: &impl MemoryChannel) -> Result<Vec<u8>, SpawnError> {
    let address = PointerChain::outbreak_block().resolve(channel)?;
    read_exact(channel, address, OUTBREAK_BLOCK_SIZE)
}

/// Read the raw massive outbreak block
pub fn read_massive_outbreak_block(channel: &impl MemoryChannel) -> Result<Vec<u8>, SpawnError> {
    let address = PointerChain::massive_outbreak_block().resolve(channel)?;
    read_exact(channel, address, MMO_BLOCK_SIZE)
}

fn read_exact(
    channel: &impl MemoryChannel,
    address: u64,
    length: usize,
) -> Result<Vec<u8>, SpawnError> {
    let bytes = channel.read_bytes(address, length as u32)?;
    if bytes.len() < length {
        return Err(SpawnError::Channel(format!(
            "short read at 0x{:X}: wanted {} bytes, got {}",
            address,
            length,
            bytes.len()
        )));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_seed_chain() {
        let chain = PointerChain::static_seed(2);
        assert_eq!(chain.base, 0x42A6EE0);
        assert_eq!(chain.offsets, vec![0x330, 0x70 + 2 * 0x440 + 0x20]);
    }

    #[test]
    fn test_distortion_seed_chain() {
        let chain = PointerChain::distortion_seed(HisuiMap::Crimson, 3);
        assert_eq!(chain.offsets[2], 0xC70 + 3 * 8);
        assert_eq!(chain.offsets.len(), 6);
    }

    #[test]
    fn test_outbreak_chains_share_prefix() {
        let a = PointerChain::outbreak_block();
        let b = PointerChain::massive_outbreak_block();
        assert_eq!(a.base, b.base);
        assert_eq!(a.offsets[..3], b.offsets[..3]);
        assert_ne!(a.offsets[3], b.offsets[3]);
    }
}
