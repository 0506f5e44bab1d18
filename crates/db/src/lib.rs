pub mod connection;
pub mod migrations;
pub mod repositories;

pub use connection::{connect_with_settings, open_connection, DbPool};
pub use repositories::{
    InMemorySubmissionStore, RepositoryError, SqlSubmissionStore, SubmissionStore,
};
