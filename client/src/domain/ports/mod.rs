//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_api;
mod key_value_store;
mod navigator;
mod task_api;

#[cfg(test)]
pub use auth_api::MockAuthApi;
pub use auth_api::{AuthApi, AuthApiError};
#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
pub use key_value_store::{KeyValueStore, KeyValueStoreError};
#[cfg(test)]
pub use navigator::MockNavigator;
pub use navigator::{Navigator, Route};
#[cfg(test)]
pub use task_api::MockTaskApi;
pub use task_api::{TaskApi, TaskApiError};
