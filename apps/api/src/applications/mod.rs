// Application CRUD, filtered listing and dashboard statistics over HTTP.
// All storage goes through repository::Repository.

pub mod handlers;
pub mod pagination;
