pub mod code_graph;
