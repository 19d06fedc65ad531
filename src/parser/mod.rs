// Parser module for syntactic Go analysis

pub mod go;

pub use go::{GoImport, GoParser};
