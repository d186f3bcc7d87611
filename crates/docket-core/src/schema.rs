//! Fixed column schemas and value domains for consignment records.

/// Export-order schema: one row per product line / batch.
pub const EXPORT_COLUMNS: [&str; 17] = [
    "Name",
    "Date Requested",
    "OLAM Ref Number",
    "Delivery Number",
    "Sale Order Number",
    "Batch Number",
    "SSCC Qty",
    "Vessel ETD",
    "Destination",
    "3rd Party Storage",
    "Variety",
    "Grade",
    "Size",
    "Packaging",
    "Pallet",
    "Fumigation",
    "Container",
];

/// Domestic-mode batch table schema.
pub const DOMESTIC_BATCH_COLUMNS: [&str; 13] = [
    "Picking Request Number",
    "Delivery Number",
    "OLAM Ref Number",
    "Batch Number",
    "SSCC Qty",
    "Customer Delivery Date",
    "Customer",
    "Customer/Delivery Address",
    "Plant/Storage Location",
    "Variety",
    "Grade",
    "Size",
    "Packaging",
];

/// Domestic-mode SSCC detail table schema, one row per shipping unit.
pub const SSCC_COLUMNS: [&str; 7] = [
    "Delivery Number",
    "Batch Number",
    "SSCC",
    "Variety",
    "Grade",
    "Size",
    "Packaging",
];

/// Grades accepted by QC. Normalized spellings; everything else is flagged.
pub const VALID_GRADES: [&str; 4] = ["SSR", "Supr", "XNo1", "Rejects"];

/// Sentinel Size for bulk/reject product lines that carry no size grading.
pub const SIZE_SENTINEL: &str = "N/A";

/// Table-header words that a permissive label rule can accidentally capture
/// instead of a value. A captured value equal to one of these is discarded.
pub const NOISE_WORDS: [&str; 6] = [
    "sale",
    "date",
    "delivery",
    "booking",
    "quantity",
    "description",
];

/// Extra column appended to combined batch outputs.
pub const SOURCE_FILE_COLUMN: &str = "Source_File";
