use super::{TerrainGenerator, TerrainMap};
use std::collections::{HashSet, VecDeque};
use worldsim_data::{BiomeType, CellCoord, ChunkCoord, SimEvent};

/// Receives each chunk as soon as it is classified (tile painting, logging).
pub trait ChunkObserver {
    fn on_chunk_generated(&mut self, chunk: ChunkCoord, cells: &[(CellCoord, BiomeType)]);
}

impl ChunkObserver for () {
    fn on_chunk_generated(&mut self, _chunk: ChunkCoord, _cells: &[(CellCoord, BiomeType)]) {}
}

impl ChunkObserver for Vec<SimEvent> {
    fn on_chunk_generated(&mut self, chunk: ChunkCoord, cells: &[(CellCoord, BiomeType)]) {
        self.push(SimEvent::ChunkGenerated {
            chunk,
            cells: cells.len(),
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationProgress {
    MoreWork { remaining: usize },
    Complete,
}

impl GenerationProgress {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, GenerationProgress::Complete)
    }
}

/// Step-function generator: one chunk per `step`, row-major.
///
/// A chunk already recorded in `generated_chunks` is never classified again,
/// whether it was reached through `step` or requested through `generate_chunk`.
#[derive(Debug, Clone)]
pub struct ChunkedGenerator {
    generator: TerrainGenerator,
    chunk_size: u16,
    pending: VecDeque<ChunkCoord>,
    total_chunks: usize,
    generated_chunks: HashSet<ChunkCoord>,
    cell_buffer: Vec<(CellCoord, BiomeType)>,
}

impl ChunkedGenerator {
    pub fn new(generator: TerrainGenerator, chunk_size: u16) -> Self {
        let size = i32::from(chunk_size.max(1));
        let cols = (i32::from(generator.width) + size - 1) / size;
        let rows = (i32::from(generator.height) + size - 1) / size;
        let pending: VecDeque<ChunkCoord> = (0..rows)
            .flat_map(|y| (0..cols).map(move |x| ChunkCoord { x, y }))
            .collect();
        Self {
            generator,
            chunk_size: chunk_size.max(1),
            total_chunks: pending.len(),
            pending,
            generated_chunks: HashSet::new(),
            cell_buffer: Vec::with_capacity(chunk_size as usize * chunk_size as usize),
        }
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    #[must_use]
    pub fn total_chunks(&self) -> usize {
        self.total_chunks
    }

    #[must_use]
    pub fn is_generated(&self, chunk: ChunkCoord) -> bool {
        self.generated_chunks.contains(&chunk)
    }

    /// Chunk containing a cell.
    #[must_use]
    pub fn chunk_of(&self, cell: CellCoord) -> ChunkCoord {
        let size = i32::from(self.chunk_size);
        ChunkCoord {
            x: cell.x.div_euclid(size),
            y: cell.y.div_euclid(size),
        }
    }

    /// Generates the next pending chunk and yields.
    pub fn step<O: ChunkObserver + ?Sized>(
        &mut self,
        map: &mut TerrainMap,
        observer: &mut O,
    ) -> GenerationProgress {
        while let Some(chunk) = self.pending.pop_front() {
            if self.generate_chunk(chunk, map, observer) {
                break;
            }
        }
        self.progress()
    }

    /// Runs up to `max_chunks` steps.
    pub fn step_n<O: ChunkObserver + ?Sized>(
        &mut self,
        map: &mut TerrainMap,
        observer: &mut O,
        max_chunks: usize,
    ) -> GenerationProgress {
        for _ in 0..max_chunks {
            if self.step(map, observer).is_complete() {
                break;
            }
        }
        self.progress()
    }

    /// Classifies one chunk. Returns `false` if it was already generated or
    /// lies entirely outside the map.
    pub fn generate_chunk<O: ChunkObserver + ?Sized>(
        &mut self,
        chunk: ChunkCoord,
        map: &mut TerrainMap,
        observer: &mut O,
    ) -> bool {
        if self.generated_chunks.contains(&chunk) {
            return false;
        }
        let size = i32::from(self.chunk_size);
        let x0 = chunk.x * size;
        let y0 = chunk.y * size;
        if !map.in_bounds(CellCoord::new(x0, y0)) {
            return false;
        }

        self.cell_buffer.clear();
        let x1 = (x0 + size).min(i32::from(map.width));
        let y1 = (y0 + size).min(i32::from(map.height));
        for y in y0..y1 {
            for x in x0..x1 {
                let cell = CellCoord::new(x, y);
                let biome = self.generator.classify(cell);
                map.set_biome(cell, biome);
                self.cell_buffer.push((cell, biome));
            }
        }
        self.generated_chunks.insert(chunk);
        observer.on_chunk_generated(chunk, &self.cell_buffer);
        true
    }

    #[must_use]
    pub fn progress(&self) -> GenerationProgress {
        let remaining = self
            .pending
            .iter()
            .filter(|c| !self.generated_chunks.contains(c))
            .count();
        if remaining == 0 {
            GenerationProgress::Complete
        } else {
            GenerationProgress::MoreWork { remaining }
        }
    }
}
