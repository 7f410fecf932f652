//! Row/column assignment for the chronological scatter chart.
//!
//! The timeline places one mark per achievement: its column is the index
//! of its year among all years present (sorted ascending), and its row is
//! its occurrence index within that year. This module is the static data
//! transform behind the chart; drawing and axis scrubbing live with the
//! frontend.

/// `[vertical, horizontal]` padding around the chart, in pixels.
pub const PADDING: [f32; 2] = [80.0, 20.0];

/// A year present on the axis, with how many marks it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBucket {
    pub year: i32,
    pub count: u32,
}

/// A placed mark: its source year plus chart coordinates.
///
/// Rows are 1-based: the first mark in a year sits on row 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub year: i32,
    pub row: u32,
    pub column: usize,
}

/// The built chart model: sorted year buckets and placed marks.
#[derive(Debug, Default)]
pub struct Timeline {
    years: Vec<YearBucket>,
    slots: Vec<Slot>,
}

impl Timeline {
    /// Builds the chart model from one year per achievement, in input order.
    pub fn build(entries: &[i32]) -> Self {
        let mut years: Vec<YearBucket> = Vec::new();
        let mut rows = Vec::with_capacity(entries.len());

        // Rows are assigned in input order: each mark takes the next free
        // row in its year.
        for &year in entries {
            match years.iter_mut().find(|b| b.year == year) {
                Some(bucket) => {
                    bucket.count += 1;
                    rows.push(bucket.count);
                }
                None => {
                    years.push(YearBucket { year, count: 1 });
                    rows.push(1);
                }
            }
        }

        years.sort_by_key(|b| b.year);

        // Linear scan per mark; the year axis is tiny in practice.
        let slots = entries
            .iter()
            .zip(rows)
            .map(|(&year, row)| Slot {
                year,
                row,
                column: years.iter().position(|b| b.year == year).unwrap_or(0),
            })
            .collect();

        Self { years, slots }
    }

    pub fn years(&self) -> &[YearBucket] {
        &self.years
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn is_built(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Width of one year column for the given drawable width.
    pub fn column_size(&self, width: f32) -> f32 {
        if self.years.is_empty() {
            return 0.0;
        }
        (width - PADDING[1] * 2.0) / self.years.len() as f32
    }

    /// The year under the given x coordinate, used by the axis scrubber.
    ///
    /// Returns `None` when `x` falls outside the scale.
    pub fn year_at(&self, x: f32, width: f32) -> Option<i32> {
        let size = self.column_size(width);
        if size <= 0.0 {
            return None;
        }

        let column = ((x - PADDING[1]) / size).floor();
        if column < 0.0 || column >= self.years.len() as f32 {
            return None;
        }

        Some(self.years[column as usize].year)
    }
}
