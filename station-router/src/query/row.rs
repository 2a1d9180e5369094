//! Decoded duration rows.

/// Value emitted at the boundary for a destination the engine cannot reach.
pub const UNREACHABLE: f32 = -1.0;

/// Travel times from one origin to a list of destinations, in seconds.
///
/// Entries are `None` where the engine reported no route.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DurationRow(Vec<Option<f64>>);

impl DurationRow {
    pub fn new(durations: Vec<Option<f64>>) -> Self {
        Self(durations)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Duration to destination `i`, or `None` if unreachable or past the end.
    pub fn get(&self, i: usize) -> Option<f64> {
        self.0.get(i).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.0.iter().copied()
    }

    /// Number of unreachable destinations.
    pub fn unreachable_count(&self) -> usize {
        self.0.iter().filter(|d| d.is_none()).count()
    }

    /// Flatten to `f32` seconds with [`UNREACHABLE`] for missing routes.
    pub fn to_sentinel_vec(&self) -> Vec<f32> {
        self.0
            .iter()
            .map(|d| d.map_or(UNREACHABLE, |secs| secs as f32))
            .collect()
    }

    pub fn into_inner(self) -> Vec<Option<f64>> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_for_unreachable() {
        let row = DurationRow::new(vec![Some(12.5), None, Some(0.0)]);
        assert_eq!(row.to_sentinel_vec(), vec![12.5, -1.0, 0.0]);
        assert_eq!(row.unreachable_count(), 1);
    }

    #[test]
    fn get_flattens() {
        let row = DurationRow::new(vec![Some(3.0), None]);
        assert_eq!(row.get(0), Some(3.0));
        assert_eq!(row.get(1), None);
        assert_eq!(row.get(2), None);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn empty_row() {
        let row = DurationRow::default();
        assert!(row.is_empty());
        assert!(row.to_sentinel_vec().is_empty());
    }
}
