mod grounded;
mod kpkc;
mod lifted;
mod schema_generator;
mod successor_generator;

pub use grounded::GroundedSuccessorGenerator;
pub use kpkc::find_all_k_cliques_in_k_partite_graph;
pub use lifted::LiftedSuccessorGenerator;
pub use schema_generator::SchemaGenerator;
pub use successor_generator::{
    AnySuccessorGenerator, SuccessorGenerator, SuccessorGeneratorName,
};

pub(crate) use schema_generator::build_assignment_sets;
