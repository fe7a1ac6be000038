pub mod models;
pub mod transformer;
pub mod validator;

#[cfg(test)]
pub(crate) mod fixtures;
