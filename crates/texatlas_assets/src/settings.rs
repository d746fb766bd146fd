use smart_default::SmartDefault;

/// Byte order of numbers in a binary atlas stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

/// What to do when a descriptor contains the same region name twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail the whole load with `AtlasError::DuplicateRegionName`.
    #[default]
    Reject,
    /// The later region replaces the earlier one, keeping its index.
    Overwrite,
}

/// Settings shared by all atlas readers and writers.
#[derive(SmartDefault, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderSettings {
    pub byte_order: ByteOrder,
    pub duplicates: DuplicatePolicy,
    /// Verify that every region lies inside its backing image.
    #[default(true)]
    pub check_bounds: bool,
}
