mod date;

pub use date::{Date, DateFormat};
