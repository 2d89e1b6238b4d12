mod eligible_nodes;
mod generate_topology;
mod nni_step;
mod permutable_nodes;

pub use eligible_nodes::*;
pub use generate_topology::*;
pub use nni_step::*;
pub use permutable_nodes::*;
