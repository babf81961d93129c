//! Unit tests for the tabular ingestion pipeline

pub mod delimited_tests;
