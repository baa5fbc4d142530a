// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2026 The Troupe Authors
//
// This file is part of Troupe.
//
// Troupe is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 2.1 of the License, or
// (at your option) any later version.
//
// Troupe is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with Troupe. If not, see <https://www.gnu.org/licenses/>.

//! Type-erased messages and message ids

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque 64-bit routing token attached to every envelope.
///
/// ## Bit layout
/// - bit 63: high-priority flag
/// - bit 62: response flag
/// - bits 0..61: request number (`0` = plain asynchronous message)
///
/// Priority lives here rather than on [`Message`] so that anonymous and
/// identified sends share a single delivery path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MessageId(u64);

const HIGH_PRIORITY_FLAG: u64 = 1 << 63;
const RESPONSE_FLAG: u64 = 1 << 62;
const REQUEST_NUMBER_MASK: u64 = (1 << 62) - 1;

impl MessageId {
    /// A plain asynchronous message id at normal priority.
    pub fn new() -> Self {
        MessageId(0)
    }

    /// An id correlating a request; `number` must be non-zero.
    pub fn make_request(number: u64) -> Self {
        debug_assert!(number != 0, "request number 0 is reserved");
        MessageId(number & REQUEST_NUMBER_MASK)
    }

    /// Returns a copy of this id with the high-priority flag set.
    pub fn with_high_priority(self) -> Self {
        MessageId(self.0 | HIGH_PRIORITY_FLAG)
    }

    /// Returns a copy of this id with the high-priority flag cleared.
    pub fn with_normal_priority(self) -> Self {
        MessageId(self.0 & !HIGH_PRIORITY_FLAG)
    }

    /// Whether envelopes tagged with this id go to the high-priority lane.
    pub fn is_high_priority(self) -> bool {
        self.0 & HIGH_PRIORITY_FLAG != 0
    }

    /// Whether this id correlates a request awaiting a response.
    pub fn is_request(self) -> bool {
        self.request_number() != 0 && !self.is_response()
    }

    /// Whether this id tags a response to an earlier request.
    pub fn is_response(self) -> bool {
        self.0 & RESPONSE_FLAG != 0
    }

    /// The id a responder attaches when answering this request.
    ///
    /// Priority does not carry over: responses choose their own lane.
    pub fn response_id(self) -> Self {
        MessageId((self.0 & REQUEST_NUMBER_MASK) | RESPONSE_FLAG)
    }

    /// The correlation number, `0` for plain asynchronous messages.
    pub fn request_number(self) -> u64 {
        self.0 & REQUEST_NUMBER_MASK
    }

    /// The raw token value.
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Rebuilds an id from a raw token value.
    pub fn from_u64(bits: u64) -> Self {
        MessageId(bits)
    }
}

/// An immutable, type-erased tuple of values.
///
/// Messages are cheap to clone: the element storage is reference-counted and
/// shared, and observable contents never change after construction. Elements
/// are accessed positionally via [`Message::get`], which downcasts to the
/// requested type.
///
/// Use [`make_message!`](crate::make_message) to build one:
///
/// ```
/// use troupe_mailbox::{make_message, Message};
///
/// let msg = make_message!("transfer", 42u64);
/// assert_eq!(msg.len(), 2);
/// assert_eq!(msg.get::<u64>(1), Some(&42));
/// assert!(msg.get::<i32>(1).is_none());
/// ```
#[derive(Clone)]
pub struct Message {
    elements: Arc<[Box<dyn Any + Send + Sync>]>,
}

impl Message {
    /// Builds a message from already-boxed elements.
    ///
    /// Call sites with literal values normally use
    /// [`make_message!`](crate::make_message) instead.
    pub fn from_values(values: Vec<Box<dyn Any + Send + Sync>>) -> Self {
        Message {
            elements: values.into(),
        }
    }

    /// The empty message.
    pub fn empty() -> Self {
        Message::from_values(Vec::new())
    }

    /// Number of elements in the tuple.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the tuple has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the element at `index` if it exists and has type `T`.
    pub fn get<T: 'static>(&self, index: usize) -> Option<&T> {
        self.elements.get(index)?.downcast_ref::<T>()
    }

    /// Whether the element at `index` exists and has type `T`.
    pub fn is<T: 'static>(&self, index: usize) -> bool {
        self.get::<T>(index).is_some()
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("len", &self.elements.len())
            .finish()
    }
}

/// Builds a [`Message`] from a list of values.
///
/// Each value must be `'static + Send + Sync`; it is boxed and type-erased.
///
/// ```
/// use troupe_mailbox::make_message;
///
/// let ping = make_message!("ping");
/// let pair = make_message!(1u32, "label".to_string());
/// assert_eq!(pair.get::<u32>(0), Some(&1));
/// ```
#[macro_export]
macro_rules! make_message {
    () => {
        $crate::Message::empty()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Message::from_values(vec![
            $(Box::new($value) as Box<dyn std::any::Any + Send + Sync>),+
        ])
    };
}
