mod acc;
mod hash;
mod key;
mod prime;
mod registry;

pub use acc::*;
pub use hash::*;
pub use key::*;
pub use prime::*;
pub use registry::*;
