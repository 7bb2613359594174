pub mod request;

pub use request::{CreateRequestError, RequestRepository, RequestRepositoryTrait};
