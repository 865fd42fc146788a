pub mod category;
pub mod common;
pub mod item;
pub mod item_instance;

pub use category::*;
pub use common::*;
pub use item::*;
pub use item_instance::*;
