// Service exports
pub mod memory;
pub mod notifier;
pub mod postgres;
pub mod store;

pub use memory::InMemoryStore;
pub use notifier::{LogDispatcher, MailRelayClient, NotificationDispatcher, NotificationError};
pub use postgres::PostgresClient;
pub use store::{DonorStore, StoreError};
