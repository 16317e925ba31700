//! Domain models for the storefront.
//!
//! Each entity has a read model (what storage returns and handlers serialize)
//! and an insert/patch model (what storage accepts). All JSON uses camelCase
//! field names to match the browser client.

pub mod cart;
pub mod order;
pub mod print_request;
pub mod product;
pub mod user;

pub use cart::CartItem;
pub use order::{NewOrder, NewOrderItem, Order, OrderItem};
pub use print_request::{CustomPrintRequest, NewPrintRequest};
pub use product::{NewProduct, Product, ProductPatch};
pub use user::{NewUser, User};
