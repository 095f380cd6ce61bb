//! Request contract layer: payload validation, bearer extraction, upload
//! handling and the response envelopes every route shares.

pub mod extractors;
pub mod response;
pub mod upload;
pub mod validation;

pub use extractors::{IdPath, ValidatedJson};
pub use response::{ApiError, ApiSuccess, MessageData};
