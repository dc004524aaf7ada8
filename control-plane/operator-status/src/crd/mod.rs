pub mod cluster_operator;
