//! Log parsing for the calculating-server and central-server operation logs.

pub mod parse;
pub mod row;

pub use parse::{CalculatingParser, CentralParser, read_log_file};
pub use row::{CalculatingSample, CentralSample};
