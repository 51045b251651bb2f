//! Bounds-checked storage keyed by nucleus composition.

use uhecr_core::Isotope;

/// Largest proton count covered by isotope tables.
pub const MAX_Z: u32 = 26;
/// Largest neutron count covered by isotope tables.
pub const MAX_N: u32 = 30;

const ROWS: usize = MAX_Z as usize + 1;
const COLS: usize = MAX_N as usize + 1;

/// A dense `(Z, N)` table for `Z <= 26`, `N <= 30`.
///
/// Lookups outside the covered range and absent entries both resolve to
/// `None`, which every consumer treats as "no data for this isotope".
#[derive(Clone, Debug, PartialEq)]
pub struct IsotopeTable<T> {
    cells: Vec<Option<T>>,
}

impl<T> Default for IsotopeTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IsotopeTable<T> {
    /// An empty table.
    pub fn new() -> Self {
        let mut cells = Vec::with_capacity(ROWS * COLS);
        cells.resize_with(ROWS * COLS, || None);
        Self { cells }
    }

    /// Whether `isotope` lies within the table coverage.
    pub fn covers(isotope: Isotope) -> bool {
        isotope.z <= MAX_Z && isotope.n <= MAX_N
    }

    fn index(isotope: Isotope) -> Option<usize> {
        Self::covers(isotope).then(|| isotope.z as usize * COLS + isotope.n as usize)
    }

    /// Entry for `isotope`, if covered and present.
    pub fn get(&self, isotope: Isotope) -> Option<&T> {
        self.cells.get(Self::index(isotope)?)?.as_ref()
    }

    /// Mutable entry for `isotope`, if covered and present.
    pub fn get_mut(&mut self, isotope: Isotope) -> Option<&mut T> {
        let idx = Self::index(isotope)?;
        self.cells.get_mut(idx)?.as_mut()
    }

    /// Store `value` for `isotope`, returning the previous entry.
    ///
    /// Returns `Err(value)` if the isotope is outside the coverage.
    pub fn insert(&mut self, isotope: Isotope, value: T) -> Result<Option<T>, T> {
        match Self::index(isotope) {
            Some(idx) => Ok(self.cells[idx].replace(value)),
            None => Err(value),
        }
    }

    /// Entry for `isotope`, inserting `T::default()` if absent.
    ///
    /// Returns `None` if the isotope is outside the coverage.
    pub fn entry_or_default(&mut self, isotope: Isotope) -> Option<&mut T>
    where
        T: Default,
    {
        let idx = Self::index(isotope)?;
        Some(self.cells[idx].get_or_insert_with(T::default))
    }

    /// Number of isotopes with an entry.
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Whether no isotope has an entry.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    /// Iterate over `(isotope, entry)` pairs in (Z, N) order.
    pub fn iter(&self) -> impl Iterator<Item = (Isotope, &T)> {
        self.cells.iter().enumerate().filter_map(|(idx, cell)| {
            cell.as_ref().map(|v| {
                (
                    Isotope::new((idx / COLS) as u32, (idx % COLS) as u32),
                    v,
                )
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_resolves_to_none() {
        let mut t: IsotopeTable<u8> = IsotopeTable::new();
        assert!(t.insert(Isotope::new(27, 0), 1).is_err());
        assert!(t.insert(Isotope::new(0, 31), 1).is_err());
        assert_eq!(t.get(Isotope::new(27, 0)), None);
        assert_eq!(t.get(Isotope::new(100, 100)), None);
    }

    #[test]
    fn insert_and_get() {
        let mut t = IsotopeTable::new();
        assert_eq!(t.insert(Isotope::new(26, 30), 5), Ok(None));
        assert_eq!(t.insert(Isotope::new(26, 30), 6), Ok(Some(5)));
        assert_eq!(t.get(Isotope::new(26, 30)), Some(&6));
        assert_eq!(t.get(Isotope::new(26, 29)), None);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn iteration_order_is_z_then_n() {
        let mut t = IsotopeTable::new();
        t.insert(Isotope::new(2, 2), 'b').unwrap();
        t.insert(Isotope::new(1, 5), 'a').unwrap();
        t.insert(Isotope::new(2, 1), 'c').unwrap();
        let keys: Vec<Isotope> = t.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![Isotope::new(1, 5), Isotope::new(2, 1), Isotope::new(2, 2)]
        );
    }

    #[test]
    fn entry_or_default_accumulates() {
        let mut t: IsotopeTable<Vec<u8>> = IsotopeTable::new();
        t.entry_or_default(Isotope::new(3, 3)).unwrap().push(1);
        t.entry_or_default(Isotope::new(3, 3)).unwrap().push(2);
        assert_eq!(t.get(Isotope::new(3, 3)), Some(&vec![1, 2]));
        assert!(t.entry_or_default(Isotope::new(30, 3)).is_none());
    }
}
