// sellerdesk-server/src/db/mod.rs

//! PostgreSQL implementation of the sellerdesk store traits.

mod pg_store;
mod rows;

pub use pg_store::PgStore;

use sellerdesk::StoreError;

/// Data exceptions (class 22) and constraint violations (class 23) are
/// writes the database refused; everything else is a backend failure.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
  if let sqlx::Error::Database(db_err) = &err {
    if db_err
      .code()
      .is_some_and(|code| code.starts_with("22") || code.starts_with("23"))
    {
      return StoreError::Rejected(db_err.message().to_string());
    }
  }
  StoreError::Backend { source: err.into() }
}
