pub mod aggregate;
pub mod band;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod national;
pub mod output;
pub mod parser;
pub mod record;
pub mod region_names;
pub mod summary;
pub mod utility;
