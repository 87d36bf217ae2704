mod service;

pub use service::{record_reading, ReadingSimulator};
