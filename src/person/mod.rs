//! Person records and the request that creates them.

mod model;
mod request;

pub use model::Person;
pub use request::{NewPersonRequest, ValidationError, BIRTHDATE_FORMAT};
