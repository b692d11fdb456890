pub mod config;
pub mod logging;

pub mod classify;
pub mod materialize;
pub mod model;
pub mod naming;
pub mod pipeline;
pub mod prepare;
pub mod scan;
pub mod walker;
