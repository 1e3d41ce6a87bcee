/// A per-vertex attribute buffer with a change counter.
///
/// Writes through [`Attribute::set`] or [`Attribute::as_mut_slice`] do not
/// bump the version on their own; call [`Attribute::mark_changed`] once the
/// batch of edits is done so cached GPU copies get re-uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute<T> {
    values: Vec<T>,
    version: u64,
}

impl<T: Copy> Attribute<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self { values, version: 0 }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.values.get(index).copied()
    }

    /// Overwrite the value at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds, like slice indexing.
    pub fn set(&mut self, index: usize, value: T) {
        self.values[index] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.values.iter().copied()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Replace every value and bump the version.
    pub fn replace(&mut self, values: Vec<T>) {
        self.values = values;
        self.mark_changed();
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn mark_changed(&mut self) {
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn set_does_not_bump_version() {
        let mut attr = Attribute::new(vec![Vec3::ZERO; 3]);
        attr.set(1, Vec3::ONE);
        assert_eq!(attr.get(1), Some(Vec3::ONE));
        assert_eq!(attr.version(), 0);
        attr.mark_changed();
        assert_eq!(attr.version(), 1);
    }

    #[test]
    fn replace_bumps_version() {
        let mut attr = Attribute::new(vec![1.0_f32]);
        attr.replace(vec![2.0, 3.0]);
        assert_eq!(attr.len(), 2);
        assert_eq!(attr.version(), 1);
    }

    #[test]
    fn get_out_of_range_is_none() {
        let attr = Attribute::new(vec![0u32]);
        assert_eq!(attr.get(5), None);
    }
}
