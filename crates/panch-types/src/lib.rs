pub mod badge;
pub mod canonical;
pub mod contract;
pub mod id;
pub mod user;

pub use badge::{BadgeTier, Role};
pub use canonical::{canonical_hash, document_digest, to_canonical_json, CanonicalJsonError};
pub use contract::{ContractStatus, Engagement};
pub use id::{ContractId, DisputeId, UserId};
pub use user::UserSnapshot;
