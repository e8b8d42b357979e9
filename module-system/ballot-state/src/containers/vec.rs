use std::iter::FusedIterator;
use std::marker::PhantomData;

use thiserror::Error;

use crate::codec::{BorshCodec, StateKeyCodec, StateValueCodec};
use crate::{Prefix, StateMap, StateValue, Storage, WorkingSet};

/// An append-friendly vector stored as a length plus one entry per index.
#[derive(
    Debug,
    Clone,
    PartialEq,
    borsh::BorshDeserialize,
    borsh::BorshSerialize,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct StateVec<V, Codec = BorshCodec> {
    _phantom: PhantomData<V>,
    prefix: Prefix,
    len_value: StateValue<usize, Codec>,
    elems: StateMap<usize, V, Codec>,
}

/// Error type for the [`StateVec`] accessors.
#[derive(Debug, Error)]
pub enum StateVecError {
    /// The index is past the end of the vector.
    #[error("Index out of bounds for index: {0}")]
    IndexOutOfBounds(usize),
    /// The index is in bounds but no element is stored for it.
    #[error("Value not found for prefix: {0} and index: {1}")]
    MissingValue(Prefix, usize),
}

impl<V> StateVec<V> {
    /// Crates a new [`StateVec`] with the given prefix and the default
    /// codec (i.e. [`BorshCodec`]).
    pub fn new(prefix: Prefix) -> Self {
        Self::with_codec(prefix, BorshCodec)
    }
}

impl<V, Codec: Clone> StateVec<V, Codec> {
    /// Creates a new [`StateVec`] with the given prefix and codec.
    pub fn with_codec(prefix: Prefix, codec: Codec) -> Self {
        let len_value = StateValue::with_codec(prefix.extended(b"l"), codec.clone());
        let elems = StateMap::with_codec(prefix.extended(b"e"), codec);
        Self {
            _phantom: PhantomData,
            prefix,
            len_value,
            elems,
        }
    }
}

impl<V, Codec> StateVec<V, Codec> {
    /// Returns the prefix used when this [`StateVec`] was created.
    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }
}

impl<V, Codec> StateVec<V, Codec>
where
    Codec: StateKeyCodec<usize> + StateValueCodec<usize> + StateValueCodec<V>,
{
    fn set_len<S: Storage>(&self, length: usize, working_set: &mut WorkingSet<S>) {
        self.len_value.set(&length, working_set);
    }

    /// Sets a value in the [`StateVec`].
    /// If the index is out of bounds, returns an error.
    /// To push a value to the end of the StateVec, use [`StateVec::push`].
    pub fn set<S: Storage>(
        &self,
        index: usize,
        value: &V,
        working_set: &mut WorkingSet<S>,
    ) -> Result<(), StateVecError> {
        let len = self.len(working_set);

        if index < len {
            self.elems.set(&index, value, working_set);
            Ok(())
        } else {
            Err(StateVecError::IndexOutOfBounds(index))
        }
    }

    /// Returns the value for the given index.
    pub fn get<S: Storage>(&self, index: usize, working_set: &WorkingSet<S>) -> Option<V> {
        self.elems.get(&index, working_set)
    }

    /// Returns the value for the given index.
    /// If the index is out of bounds, returns an error.
    /// If the value is absent, returns an error.
    pub fn get_or_err<S: Storage>(
        &self,
        index: usize,
        working_set: &WorkingSet<S>,
    ) -> Result<V, StateVecError> {
        let len = self.len(working_set);

        if index < len {
            self.elems
                .get(&index, working_set)
                .ok_or_else(|| StateVecError::MissingValue(self.prefix().clone(), index))
        } else {
            Err(StateVecError::IndexOutOfBounds(index))
        }
    }

    /// Returns the length of the [`StateVec`].
    pub fn len<S: Storage>(&self, working_set: &WorkingSet<S>) -> usize {
        self.len_value.get(working_set).unwrap_or_default()
    }

    /// Returns `true` if the [`StateVec`] holds no elements.
    pub fn is_empty<S: Storage>(&self, working_set: &WorkingSet<S>) -> bool {
        self.len(working_set) == 0
    }

    /// Pushes a value to the end of the [`StateVec`] and returns its index.
    pub fn push<S: Storage>(&self, value: &V, working_set: &mut WorkingSet<S>) -> usize {
        let len = self.len(working_set);

        self.elems.set(&len, value, working_set);
        self.set_len(len + 1, working_set);
        len
    }

    /// Returns an iterator over all the values in the [`StateVec`], in index order.
    ///
    /// # Panics
    /// The iterator panics if an index below the stored length holds no
    /// element, since that only happens when the state itself is corrupted.
    pub fn iter<'a, 'ws, S: Storage>(
        &'a self,
        working_set: &'ws WorkingSet<S>,
    ) -> StateVecIter<'a, 'ws, V, Codec, S> {
        let len = self.len(working_set);
        StateVecIter {
            state_vec: self,
            ws: working_set,
            len,
            next_i: 0,
        }
    }

    /// Returns the last element, if any.
    pub fn last<S: Storage>(&self, working_set: &WorkingSet<S>) -> Option<V> {
        let last_i = self.len(working_set).checked_sub(1)?;
        self.elems.get(&last_i, working_set)
    }
}

/// An [`Iterator`] over a [`StateVec`]
///
/// See [`StateVec::iter`] for more details.
pub struct StateVecIter<'a, 'ws, V, Codec, S>
where
    Codec: StateKeyCodec<usize> + StateValueCodec<usize> + StateValueCodec<V>,
    S: Storage,
{
    state_vec: &'a StateVec<V, Codec>,
    ws: &'ws WorkingSet<S>,
    len: usize,
    next_i: usize,
}

impl<'a, 'ws, V, Codec, S> Iterator for StateVecIter<'a, 'ws, V, Codec, S>
where
    Codec: StateKeyCodec<usize> + StateValueCodec<usize> + StateValueCodec<V>,
    S: Storage,
{
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_i >= self.len {
            return None;
        }
        let index = self.next_i;
        self.next_i += 1;

        let elem = self.state_vec.get(index, self.ws).unwrap_or_else(|| {
            panic!(
                "Missing element at index {} of {} with length {}",
                index,
                self.state_vec.prefix(),
                self.len
            )
        });
        Some(elem)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next_i;
        (remaining, Some(remaining))
    }
}

impl<'a, 'ws, V, Codec, S> ExactSizeIterator for StateVecIter<'a, 'ws, V, Codec, S>
where
    Codec: StateKeyCodec<usize> + StateValueCodec<usize> + StateValueCodec<V>,
    S: Storage,
{
}

impl<'a, 'ws, V, Codec, S> FusedIterator for StateVecIter<'a, 'ws, V, Codec, S>
where
    Codec: StateKeyCodec<usize> + StateValueCodec<usize> + StateValueCodec<V>,
    S: Storage,
{
}
