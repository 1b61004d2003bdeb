/// Extends functionality for slices of float arrays
pub trait SliceExt<T> {
    /// Dot product of two equal-length float slices
    ///
    /// The accumulation order is a plain left-to-right sum. Mismatched
    /// lengths are a caller bug, so the shorter length wins rather than
    /// panicking mid-iteration.
    ///
    /// ```rust
    /// # use dgm_utils::SliceExt;
    /// let a = [1.0, 2.0, 3.0];
    /// let b = [4.0, 5.0, 6.0];
    /// assert_eq!(a.dot(&b), 32.0);
    /// ```
    fn dot(&self, other: &[T]) -> T;

    /// Euclidean (2-norm) length of a float slice
    ///
    /// ```rust
    /// # use dgm_utils::SliceExt;
    /// let v = [3.0, 4.0];
    /// assert_eq!(v.norm(), 5.0);
    /// ```
    fn norm(&self) -> T;

    /// Sum of all values in the slice
    ///
    /// ```rust
    /// # use dgm_utils::SliceExt;
    /// let v = [0.5, 0.5, 0.5, 0.5];
    /// assert_eq!(v.total(), 2.0);
    /// ```
    fn total(&self) -> T;
}

impl SliceExt<f64> for [f64] {
    fn dot(&self, other: &[f64]) -> f64 {
        self.iter().zip(other.iter()).map(|(a, b)| a * b).sum()
    }

    fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    fn total(&self) -> f64 {
        self.iter().sum()
    }
}
