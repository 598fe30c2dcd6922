/// Reassembly buffer for one chunked payload: a fixed-arity slot array
/// indexed by chunk position, keyed in the cache by the payload's content
/// reference.
#[derive(Debug, Clone)]
pub struct ChunkSlab {
    max_chunks: u32,
    slots: Vec<Option<Vec<u8>>>,
    filled: u32,
}

impl ChunkSlab {
    pub fn new(max_chunks: u32) -> Self {
        Self {
            max_chunks,
            slots: vec![None; max_chunks as usize],
            filled: 0,
        }
    }

    /// Stores a chunk at the given index. Out-of-range indexes and re-puts
    /// into an occupied slot are no-ops.
    pub fn put(&mut self, chunk_index: u32, buffer: Vec<u8>) {
        let Some(slot) = self.slots.get_mut(chunk_index as usize) else {
            return;
        };
        if slot.is_some() {
            return;
        }

        *slot = Some(buffer);
        self.filled += 1;
    }

    /// Concatenation of all chunks in index order, once every slot is
    /// occupied. Does not mutate the slab.
    pub fn try_assemble(&self) -> Option<Vec<u8>> {
        if self.filled < self.max_chunks {
            return None;
        }

        let mut assembled = Vec::with_capacity(self.size());
        for slot in &self.slots {
            assembled.extend_from_slice(slot.as_deref().unwrap_or_default());
        }
        Some(assembled)
    }

    /// Ascending indexes of the slots still waiting for a chunk.
    pub fn missing_indices(&self) -> Vec<u32> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(index, _)| index as u32)
            .collect()
    }

    /// Total bytes stored so far, used as the cache weight of this slab.
    pub fn size(&self) -> usize {
        self.slots
            .iter()
            .map(|slot| slot.as_ref().map_or(0, Vec::len))
            .sum()
    }

    pub fn max_chunks(&self) -> u32 {
        self.max_chunks
    }
}
