//! Dashboard UI components: the clients table and the two input
//! fields above it.

mod add_client;
mod ceiling_input;
mod clients_table;

pub use add_client::AddClientForm;
pub use ceiling_input::CeilingInput;
pub use clients_table::ClientsTable;
