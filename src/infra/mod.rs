// Infrastructure adapters implementing the application ports

pub mod assignment_output_adapter;
pub mod json_source_adapter;
