//! different utility modules used throughout the project
/// tiny module to set up logging and save solution into file
pub mod logger;
/// parse task documents with solver settings into a typed structure
pub mod task_parser;
