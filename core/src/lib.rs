pub mod coerce;
pub mod de;
pub mod error;
pub mod literal;
pub mod ser;
pub mod storable;
pub mod store;
pub mod value;

#[cfg(test)]
mod tests;

pub use crate::{
    de::data::{from_data, from_data_as, DeserializeMode},
    error::{Error, Result},
    ser::{
        data::to_data,
        json::{JsonConfig, JsonStyle},
    },
    storable::{Binary, Retrievable, Storable},
    store::{ByteStore, FileStore, ListStore, MemoryStore, StoreConfig},
    value::{
        data::{Mapping, Value, NULL_LITERAL},
        scalar::Scalar,
    },
};
#[cfg(feature = "derive")]
pub use serializable_data_derive::{Retrievable, Storable};
