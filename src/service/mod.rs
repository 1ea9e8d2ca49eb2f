//! Services over the shared pool: generic CRUD, joins and junction references.

mod crud;
mod reference;
pub use crud::CrudService;
pub use reference::ReferenceService;
