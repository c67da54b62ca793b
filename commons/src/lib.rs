pub use timestamp::Timestamp;

pub mod date;
mod timestamp;
