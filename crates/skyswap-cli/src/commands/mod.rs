pub mod batch;
pub mod config;
pub mod matte;
pub mod options;
pub mod run;
