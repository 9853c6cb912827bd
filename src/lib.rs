pub mod chart;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod table;
pub mod wealth;
