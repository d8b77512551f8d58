//! Domain models for the inventory API.
//!
//! Read models serialize straight to the JSON clients see. Each writable
//! entity also has a `*Payload` (raw request body) that validates into an
//! `*Input` the repositories accept.

pub mod account;
pub mod category;
pub mod item;
pub mod session;
pub mod summary;
pub mod supplier;
pub mod validation;

pub use account::{Account, NewAccount};
pub use category::{Category, CategoryInput, CategoryPayload};
pub use item::{Item, ItemInput, ItemPayload};
pub use session::{CurrentAccount, keys as session_keys};
pub use summary::{CategorySummary, StockSummary, SupplierSummary, SystemSummary};
pub use supplier::{Supplier, SupplierInput, SupplierPayload};
pub use validation::FieldErrors;
