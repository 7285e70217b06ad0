/// What to do with trailing bytes too short to hold a whole record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TailPolicy {
    /// Silently drop the partial record.
    #[default]
    Drop,
    /// Fail the load with [`CdbError::ShortRecord`](crate::CdbError::ShortRecord).
    Reject,
}

/// How much of the stored header is trusted on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderPolicy {
    /// Read the key count, skip the rest. A count that differs from the
    /// live schema is not reported.
    #[default]
    Ignore,
    /// Decode the header and require the key count, every name and every
    /// size to match the live schema.
    Strict,
}

/// Loader configuration.
///
/// The default is the lenient behaviour: header ignored, partial tail
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOptions {
    pub tail: TailPolicy,
    pub header: HeaderPolicy,
}

impl LoadOptions {
    /// Reject partial tails and validate the header.
    pub fn strict() -> Self {
        Self {
            tail: TailPolicy::Reject,
            header: HeaderPolicy::Strict,
        }
    }
}
