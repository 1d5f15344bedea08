pub mod container;
pub mod err;
pub mod header;
pub mod property;
pub mod reader;
pub mod save;
pub mod tables;

pub use err::{Error, Result};
pub use header::{SaveHeader, SAVE_VERSION};
pub use property::{read_properties, Property, PropertyValue, StructData};
pub use reader::SaveReader;
pub use save::{CheckpointChunk, SaveGame};
pub use tables::{ActorTable, ActorTableEntry, ActorTemplate, Checkpoint, NameEntry};
