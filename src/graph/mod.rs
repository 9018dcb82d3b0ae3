//! Backend subgraph to canvas element conversion.

mod normalize;
mod record;
mod sequence;

pub use normalize::{GraphError, UnidentifiedPolicy, normalize_edge, normalize_node, to_graph_data};
pub use record::{EntityRecord, RecordShape};
pub use sequence::{RequestSequence, Ticket, resolve};
