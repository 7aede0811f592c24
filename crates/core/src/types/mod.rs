//! Shared domain types.

pub mod address;
pub mod contact;
pub mod id;
pub mod money;
pub mod status;

pub use address::Address;
pub use contact::{Email, EmailError, Username, UsernameError};
pub use id::{
    CartId, CategoryId, CommentId, OrderId, PostId, ProductId, ReviewId, UserId, VendorId,
};
pub use money::Money;
pub use status::{
    FailedCode, PaymentStatus, RefundStatus, ShippingStatus, UserRole, VendorStatus, VoteKind,
};
