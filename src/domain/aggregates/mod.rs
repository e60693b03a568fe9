//! Aggregates module
pub mod account;
pub mod cart;
pub mod deal;
pub mod medicine;
pub mod order;
pub mod storefront;

pub use account::{Admin, User};
pub use cart::{Cart, CartItem, Wishlist, WishlistAction, WishlistItem};
pub use deal::{Deal, DealDraft, ALL_CATEGORIES};
pub use medicine::{Medicine, MedicineDraft, MedicineError, StockLevel};
pub use order::{Customer, Order, OrderError, PaymentInfo};
pub use storefront::{Banner, Brand};
