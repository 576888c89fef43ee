/// Field delimiter of the publication listing
pub const FIELD_DELIMITER: char = '|';

/// Minimum number of fields a line needs to become a record
pub const MIN_FIELDS: usize = 4;

/// Year assigned when the year column is missing or not numeric
pub const UNKNOWN_YEAR: i32 = 0;

/// Years at or after this one are counted as recent in the statistics snapshot
pub const RECENT_YEAR_THRESHOLD: i32 = 2020;

/// Number of authors kept in the statistics top list
pub const TOP_AUTHORS_LIMIT: usize = 10;

pub const DEFAULT_COLOR: &str = "#999999";

pub const DEFAULT_NODE_SIZE: f64 = 8.0;
pub const DEFAULT_NODE_TYPE: &str = "image";
pub const DEFAULT_IMAGE_FOLDER: &str = "images/";
pub const DEFAULT_IMAGE_EXTENSION: &str = ".jpg";

pub const DEFAULT_EDGE_TYPE: &str = "line";
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;
pub const DEFAULT_EDGE_SIZE: f64 = 3.0;

/// Edges thinner than this are widened so they stay clickable
pub const MIN_EDGE_SIZE: f64 = 2.0;

/// Buffer size for CSV graph writers
pub const CSV_BUFFER_SIZE: usize = 128 * 1024;

/// HTTP request timeout for remote sources, in seconds
pub const HTTP_TIMEOUT_SECS: u64 = 30;

pub const USER_AGENT: &str = concat!("pubgraph/", env!("CARGO_PKG_VERSION"));
