pub mod error;
pub mod page;
pub mod supabase;

pub use error::StoreError;
pub use page::PageRequest;
pub use supabase::SupabaseClient;
