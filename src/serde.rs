//! `Serialize`/`Deserialize` for `CircularQueue`.
//!
//! A queue is written as a struct with two fields: `storage`, the elements
//! front to back, and `capacity`. The physical layout of the ring is not
//! persisted; a decoded queue starts at slot 0.

use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

use ::serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use ::serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::queue::CircularQueue;

const NAME: &str = "CircularQueue";
const FIELDS: &[&str] = &["storage", "capacity"];

struct Elements<'a, T>(&'a CircularQueue<T>);

impl<'a, T: Serialize> Serialize for Elements<'a, T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        serializer.collect_seq(self.0.iter())
    }
}

impl<T: Serialize> Serialize for CircularQueue<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        let mut state = serializer.serialize_struct(NAME, 2)?;
        state.serialize_field("storage", &Elements(self))?;
        state.serialize_field("capacity", &self.capacity())?;
        state.end()
    }
}

enum Field {
    Storage,
    Capacity,
}

struct FieldVisitor;

impl<'de> Visitor<'de> for FieldVisitor {
    type Value = Field;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("`storage` or `capacity`")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Field, E> {
        match value {
            0 => Ok(Field::Storage),
            1 => Ok(Field::Capacity),
            _ => Err(E::invalid_value(de::Unexpected::Unsigned(value), &self)),
        }
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Field, E> {
        match value {
            "storage" => Ok(Field::Storage),
            "capacity" => Ok(Field::Capacity),
            _ => Err(E::unknown_field(value, FIELDS)),
        }
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> Result<Field, D::Error>
        where D: Deserializer<'de>
    {
        deserializer.deserialize_identifier(FieldVisitor)
    }
}

struct QueueVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T: Deserialize<'de>> Visitor<'de> for QueueVisitor<T> {
    type Value = CircularQueue<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("struct CircularQueue")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<CircularQueue<T>, A::Error>
        where A: SeqAccess<'de>
    {
        let storage: Vec<T> = seq.next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let capacity: usize = seq.next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        CircularQueue::from_parts(storage, capacity).map_err(de::Error::custom)
    }

    fn visit_map<A>(self, mut map: A) -> Result<CircularQueue<T>, A::Error>
        where A: MapAccess<'de>
    {
        let mut storage: Option<Vec<T>> = None;
        let mut capacity: Option<usize> = None;
        while let Some(key) = map.next_key()? {
            match key {
                Field::Storage => {
                    if storage.is_some() {
                        return Err(de::Error::duplicate_field("storage"));
                    }
                    storage = Some(map.next_value()?);
                }
                Field::Capacity => {
                    if capacity.is_some() {
                        return Err(de::Error::duplicate_field("capacity"));
                    }
                    capacity = Some(map.next_value()?);
                }
            }
        }
        let storage = storage.ok_or_else(|| de::Error::missing_field("storage"))?;
        let capacity = capacity.ok_or_else(|| de::Error::missing_field("capacity"))?;
        CircularQueue::from_parts(storage, capacity).map_err(de::Error::custom)
    }
}

/// Fails with a `CapacityError` message when `capacity` is smaller than the
/// number of elements in `storage`, or too large to allocate.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for CircularQueue<T> {
    fn deserialize<D>(deserializer: D) -> Result<CircularQueue<T>, D::Error>
        where D: Deserializer<'de>
    {
        deserializer.deserialize_struct(NAME, FIELDS, QueueVisitor { marker: PhantomData })
    }
}
