//! Leptos components of the shell.

pub mod force_graph;
pub mod graph_view;
pub mod node_detail;
pub mod notices;
