#[macro_use]
extern crate failure;
#[macro_use]
extern crate tracing;

mod atomic_file;
pub mod cli;
mod codegen;
mod constant_table;
mod descriptor;
mod descriptor_iter;
mod descriptor_table;
pub mod descriptors;
mod encoding;
mod error;
pub mod hid;
mod language;
mod string_table;

pub use atomic_file::{write_files_atomically, AtomicFileWriter};
pub use codegen::{render_header, render_source};
pub use constant_table::ConstantTable;
pub use descriptor::*;
pub use descriptor_iter::{DescriptorIter, RawDescriptor};
pub use descriptor_table::*;
pub use encoding::Version;
pub use error::{Error, ErrorKind};
pub use language::*;
pub use string_table::StringTable;
