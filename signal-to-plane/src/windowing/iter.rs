//! Provides an iterator which extracts windows from a source slice as it is consumed.
use super::{Window, Windower};

/// Iterator over the windows of a source, one per sample, in sample order.
#[derive(Clone)]
pub struct SubframeIter<'a, T> {
    /// Determines the extent of each window.
    windower: Windower,
    /// The samples to window.
    source: &'a [T],
    /// Index of the sample the next window ends at.
    end: usize,
}

impl<'a, T> SubframeIter<'a, T> {
    pub fn new(source: &'a [T], windower: Windower) -> Self {
        Self {
            windower,
            source,
            end: 0,
        }
    }
}

impl<T: Clone> Iterator for SubframeIter<'_, T> {
    type Item = Window<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.end >= self.source.len() {
            return None;
        }
        let window = self.windower.window_at(self.source, self.end);
        self.end += 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.source.len().saturating_sub(self.end);
        (remaining, Some(remaining))
    }
}

impl<T: Clone> ExactSizeIterator for SubframeIter<'_, T> {}

/// Provides a method for creating a [SubframeIter] from a slice.
pub trait Subframes<T> {
    /// Creates an iterator which applies the windower to the slice.
    fn subframes(&self, windower: Windower) -> SubframeIter<'_, T>;
}

impl<T> Subframes<T> for [T] {
    fn subframes(&self, windower: Windower) -> SubframeIter<'_, T> {
        SubframeIter::new(self, windower)
    }
}
