mod accumulator;
mod cursor;
mod driver;
mod engine;
mod feed;
mod group;
mod options;


pub use accumulator::*;
pub use cursor::*;
pub use driver::*;
pub use engine::*;
pub use feed::{Feed, FeedControl, FeedSource};
pub use group::*;
pub use options::*;
pub use sweep_primitives::*;
