pub mod cancellation;
pub mod export_session;
