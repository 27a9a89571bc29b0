//! Page Components

mod cancel;
mod cart;
mod shop;
mod success;

pub use cancel::CancelPage;
pub use cart::CartPage;
pub use shop::ShopPage;
pub use success::SuccessPage;
