mod payload;
mod utils;

pub use payload::*;
pub use utils::*;
