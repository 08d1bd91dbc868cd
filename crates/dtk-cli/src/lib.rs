//! Library side of the `dtk` command line tool.

pub mod logging;
pub mod report;
pub mod value_arg;
