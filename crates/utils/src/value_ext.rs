use crate::f;

/// Extends primitives with more specific formatting options
pub trait ValueExt {
    /// Consistent scientific number formatting
    ///
    /// The default `LowerExp` output varies the exponent width, which breaks
    /// column alignment in whitespace-delimited numeric files. This fixes the
    /// mantissa precision and zero-pads the signed exponent.
    ///
    /// ```rust
    /// # use dgm_utils::ValueExt;
    /// let number = -0.5773502691896258;
    /// assert_eq!(number.sci(5, 2), "-5.77350e-01".to_string());
    /// assert_eq!((1.0).sci(5, 2), "1.00000e+00".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;
}

impl<T: std::fmt::LowerExp> ValueExt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let formatted = f!("{:.precision$e}", &self, precision = precision);

        // LowerExp guarantees an 'e' separator
        let (mantissa, exponent) = formatted.split_once('e').expect("scientific notation");
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };

        f!("{mantissa}e{sign}{digits:0>exp_pad$}")
    }
}
