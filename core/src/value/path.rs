use crate::{
    error::*,
    value::data::{Mapping, Value},
};
use std::ops::Index;

static ABSENT: Value = Value::Absent;

impl Value {
    /// Value stored under `key`. `None` both when the key is missing and when
    /// this is not a mapping.
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Mapping(v) => v.get(key),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Self> {
        match self {
            Self::Mapping(v) => v.get_mut(key),
            _ => None,
        }
    }

    /// Inserts or replaces `key`. `Absent` is promoted to a mapping first.
    pub fn set<K, T>(&mut self, key: K, value: T) -> Result<()>
    where
        K: Into<String>,
        T: Into<Self>,
    {
        self.mapping_mut()?.insert(key.into(), value.into());
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<Self> {
        match self {
            Self::Mapping(v) => v.shift_remove(key),
            _ => None,
        }
    }

    /// Bounds-checked element read. `None` when out of range or when this is
    /// not a sequence.
    pub fn get_index(&self, index: usize) -> Option<&Self> {
        match self {
            Self::Sequence(v) => v.get(index),
            _ => None,
        }
    }

    /// Like [`Value::get_index`] but tells the two misses apart.
    pub fn at(&self, index: usize) -> Result<&Self> {
        match self {
            Self::Sequence(v) => v.get(index).ok_or(Error::IndexOutOfRange {
                index,
                len: v.len(),
            }),
            _ => Err(Error::type_mismatch("sequence", self.kind())),
        }
    }

    /// Replaces the element at `index`, or appends when `index` equals the
    /// length. `Absent` counts as an empty sequence.
    pub fn set_index<T>(&mut self, index: usize, value: T) -> Result<()>
    where
        T: Into<Self>,
    {
        if self.is_absent() && index > 0 {
            return Err(Error::IndexOutOfRange { index, len: 0 });
        }
        let list = self.sequence_mut()?;
        let len = list.len();
        match index {
            index if index < len => list[index] = value.into(),
            index if index == len => list.push(value.into()),
            index => return Err(Error::IndexOutOfRange { index, len }),
        }
        Ok(())
    }

    /// Appends to an existing sequence. Unlike [`Value::set_index`] this never
    /// promotes `Absent`.
    pub fn append<T>(&mut self, value: T) -> Result<()>
    where
        T: Into<Self>,
    {
        let found = self.kind();
        match self {
            Self::Sequence(v) => {
                v.push(value.into());
                Ok(())
            }
            _ => Err(Error::type_mismatch("sequence", found)),
        }
    }

    /// Walks a `/`-separated path of mapping keys and sequence indices, with
    /// `~1` and `~0` escaping `/` and `~` inside keys.
    ///
    /// ```
    /// use serializable_data::data;
    ///
    /// let value = data!({"persons": [{"name": "Phil Myman"}]});
    /// assert_eq!(
    ///     value.pointer("/persons/0/name").and_then(|v| v.as_string()).as_deref(),
    ///     Some("Phil Myman"),
    /// );
    /// ```
    pub fn pointer(&self, path: &str) -> Option<&Self> {
        if path.is_empty() {
            return Some(self);
        }
        let path = path.strip_prefix('/')?;
        path.split('/')
            .map(|token| token.replace("~1", "/").replace("~0", "~"))
            .try_fold(self, |target, token| match target {
                Self::Mapping(v) => v.get(&token),
                Self::Sequence(v) => token.parse::<usize>().ok().and_then(|i| v.get(i)),
                _ => None,
            })
    }

    pub(crate) fn mapping_mut(&mut self) -> Result<&mut Mapping> {
        if self.is_absent() {
            *self = Self::mapping();
        }
        let found = self.kind();
        match self {
            Self::Mapping(v) => Ok(v),
            _ => Err(Error::type_mismatch("mapping", found)),
        }
    }

    pub(crate) fn sequence_mut(&mut self) -> Result<&mut Vec<Self>> {
        if self.is_absent() {
            *self = Self::sequence();
        }
        let found = self.kind();
        match self {
            Self::Sequence(v) => Ok(v),
            _ => Err(Error::type_mismatch("sequence", found)),
        }
    }
}

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Self::Output {
        self.get(key).unwrap_or(&ABSENT)
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Self::Output {
        self.get_index(index).unwrap_or(&ABSENT)
    }
}
