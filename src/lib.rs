pub mod converter;
pub mod error;
pub mod formats;
pub mod negotiate;
pub mod request;
pub mod response;
pub mod token;

pub use converter::OutputConverter;
pub use error::{Error, Result};
pub use formats::get_converter;
pub use negotiate::Format;
pub use request::RestRequestItem;
pub use response::{ErrorCode, Outcome, ResponseError, ResponseItem};
pub use token::SecurityToken;
