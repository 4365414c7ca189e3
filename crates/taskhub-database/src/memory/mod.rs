//! Process-local stores backed by `DashMap`.
//!
//! Used by tests and by `database.backend = "memory"`. Nothing survives a
//! restart.

mod task;
mod user;

pub use task::MemoryTaskStore;
pub use user::MemoryUserStore;

use taskhub_core::types::pagination::{PageRequest, PageResponse};
use serde::Serialize;

/// Slice an already-sorted list into the requested page.
fn paginate<T: Serialize>(items: Vec<T>, page: &PageRequest) -> PageResponse<T> {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(page.limit() as usize)
        .collect();
    PageResponse::new(items, page, total)
}
