use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

#[derive(Clone, Debug, Default)]
/// Uniform grid over world positions for radius and nearest-neighbour queries.
///
/// Uses the offset-array layout: `cell_offsets[i]..cell_offsets[i + 1]` is the
/// slice of `entity_indices` that falls into cell `i`. Indices refer to the
/// position slice passed to `build_parallel`.
///
/// # Examples
/// ```
/// use worldsim_core::spatial_hash::SpatialHash;
///
/// let mut spatial = SpatialHash::new(10.0, 100, 100);
/// let positions = vec![(15.0, 15.0), (25.0, 25.0), (85.0, 85.0)];
/// spatial.build_parallel(&positions, 100, 100);
///
/// let nearest = spatial.nearest(20.0, 20.0, 30.0, &positions, |_| true);
/// assert_eq!(nearest.map(|(idx, _)| idx), Some(0));
/// ```
pub struct SpatialHash {
    pub cell_size: f64,
    pub width: u16,
    pub height: u16,
    pub cols: usize,
    pub rows: usize,
    pub cell_offsets: Vec<usize>,
    pub entity_indices: Vec<usize>,
}

impl SpatialHash {
    pub fn new(cell_size: f64, width: u16, height: u16) -> Self {
        let cols = (width as f64 / cell_size).ceil() as usize;
        let rows = (height as f64 / cell_size).ceil() as usize;
        Self {
            cell_size,
            width,
            height,
            cols,
            rows,
            cell_offsets: vec![0; cols * rows + 1],
            entity_indices: Vec::new(),
        }
    }

    pub fn new_empty() -> Self {
        Self::new(5.0, 100, 100)
    }

    /// Flat cell index for a world coordinate; `None` when outside the grid.
    #[inline]
    pub fn get_cell_idx(&self, x: f64, y: f64) -> Option<usize> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }

        // Check for i32 overflow before casting
        if x.abs() > i32::MAX as f64 / self.cell_size {
            return None;
        }
        if y.abs() > i32::MAX as f64 / self.cell_size {
            return None;
        }

        let cx = (x / self.cell_size).floor() as i32;
        let cy = (y / self.cell_size).floor() as i32;
        if cx < 0 || cx >= self.cols as i32 || cy < 0 || cy >= self.rows as i32 {
            None
        } else {
            Some((cy as usize * self.cols) + cx as usize)
        }
    }

    pub fn build_parallel(&mut self, positions: &[(f64, f64)], width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cols = (f64::from(width) / self.cell_size).ceil() as usize;
        self.rows = (f64::from(height) / self.cell_size).ceil() as usize;

        let cell_count = self.cols * self.rows;

        let atomic_counts: Vec<AtomicUsize> =
            (0..cell_count).map(|_| AtomicUsize::new(0)).collect();
        positions.par_iter().for_each(|&(x, y)| {
            if let Some(idx) = self.get_cell_idx(x, y) {
                atomic_counts[idx].fetch_add(1, AtomicOrdering::Relaxed);
            }
        });
        let counts: Vec<usize> = atomic_counts.into_iter().map(|a| a.into_inner()).collect();

        self.cell_offsets.resize(cell_count + 1, 0);
        let mut total = 0;
        for (i, &count) in counts.iter().enumerate() {
            self.cell_offsets[i] = total;
            total += count;
        }
        self.cell_offsets[cell_count] = total;

        self.entity_indices.clear();
        self.entity_indices.resize(total, 0);

        // Sequential fill keeps indices ascending within each cell.
        let mut current_offsets = self.cell_offsets[..cell_count].to_vec();
        for (entity_idx, &(x, y)) in positions.iter().enumerate() {
            if let Some(cell_idx) = self.get_cell_idx(x, y) {
                let write_idx = current_offsets[cell_idx];
                self.entity_indices[write_idx] = entity_idx;
                current_offsets[cell_idx] += 1;
            }
        }
    }

    /// Visits every indexed entity in cells overlapping the query square.
    pub fn query_callback<F>(&self, x: f64, y: f64, radius: f64, mut callback: F)
    where
        F: FnMut(usize),
    {
        let radius = self.clamp_radius(radius);
        let min_cx = ((x - radius) / self.cell_size).floor() as i32;
        let max_cx = ((x + radius) / self.cell_size).floor() as i32;
        let min_cy = ((y - radius) / self.cell_size).floor() as i32;
        let max_cy = ((y + radius) / self.cell_size).floor() as i32;

        for cy in min_cy.max(0)..=max_cy.min(self.rows as i32 - 1) {
            for cx in min_cx.max(0)..=max_cx.min(self.cols as i32 - 1) {
                let cell_idx = (cy as usize * self.cols) + cx as usize;
                let start = self.cell_offsets[cell_idx];
                let end = self.cell_offsets[cell_idx + 1];

                for &entity_idx in &self.entity_indices[start..end] {
                    callback(entity_idx);
                }
            }
        }
    }

    #[inline]
    pub fn query_into(&self, x: f64, y: f64, radius: f64, result: &mut Vec<usize>) {
        result.clear();
        self.query_callback(x, y, radius, |idx| result.push(idx));
    }

    pub fn count_nearby(&self, x: f64, y: f64, radius: f64) -> usize {
        let mut count = 0;
        self.query_callback(x, y, radius, |_| count += 1);
        count
    }

    /// Closest accepted entity within `max_radius` (Euclidean), with its distance.
    ///
    /// Ties go to the lower index so results do not depend on cell order.
    /// A non-finite radius searches the whole grid.
    pub fn nearest<F>(
        &self,
        x: f64,
        y: f64,
        max_radius: f64,
        positions: &[(f64, f64)],
        mut accept: F,
    ) -> Option<(usize, f64)>
    where
        F: FnMut(usize) -> bool,
    {
        let radius = self.clamp_radius(max_radius);
        let mut best: Option<(usize, f64)> = None;
        self.query_callback(x, y, radius, |idx| {
            let (px, py) = positions[idx];
            let dist = ((px - x).powi(2) + (py - y).powi(2)).sqrt();
            if dist > radius {
                return;
            }
            let better = match best {
                None => true,
                Some((best_idx, best_dist)) => {
                    dist < best_dist || (dist == best_dist && idx < best_idx)
                }
            };
            if better && accept(idx) {
                best = Some((idx, dist));
            }
        });
        best
    }

    fn clamp_radius(&self, radius: f64) -> f64 {
        let diagonal = f64::from(self.width).hypot(f64::from(self.height));
        if radius.is_finite() {
            radius.clamp(0.0, diagonal)
        } else {
            diagonal
        }
    }
}
