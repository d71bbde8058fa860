pub mod source;
pub mod types;

pub use source::{group_path, list_groups, load_group, parse_dataset};
pub use types::{Activity, Dataset, StudentRecord};
