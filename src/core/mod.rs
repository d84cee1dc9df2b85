pub mod segment;
pub mod story;

pub use segment::Segment;
pub use story::{Author, Story};
