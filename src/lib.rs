pub mod logging;
pub mod parser;
pub mod runner;
pub mod sweep;
pub mod table;
pub mod weights;
