mod category;
mod products;
mod upload;
mod validation;

pub use category::*;
pub use products::*;
pub use upload::*;
