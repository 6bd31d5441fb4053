pub mod analysis;
pub mod redaction;
pub mod rex;
pub mod runs;
