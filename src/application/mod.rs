pub mod ports;
pub mod services;
pub(crate) mod shared;
