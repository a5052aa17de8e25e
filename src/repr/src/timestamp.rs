// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, NaiveDateTime, TimeDelta};

/// A timestamp in the internal row format: milliseconds since the Unix epoch
/// plus the nanoseconds within that millisecond.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TimestampData {
    millisecond: i64,
    nano_of_millisecond: u32,
}

impl TimestampData {
    /// Constructs a timestamp from its parts. Returns `None` if
    /// `nano_of_millisecond` is not below one million.
    pub fn new(millisecond: i64, nano_of_millisecond: u32) -> Option<TimestampData> {
        (nano_of_millisecond < 1_000_000).then_some(TimestampData {
            millisecond,
            nano_of_millisecond,
        })
    }

    pub fn from_epoch_millis(millisecond: i64) -> TimestampData {
        TimestampData {
            millisecond,
            nano_of_millisecond: 0,
        }
    }

    /// Interprets `dt` as a UTC wall-clock time.
    pub fn from_naive_datetime(dt: NaiveDateTime) -> TimestampData {
        let utc = dt.and_utc();
        TimestampData {
            millisecond: utc.timestamp_millis(),
            nano_of_millisecond: utc.timestamp_subsec_nanos() % 1_000_000,
        }
    }

    pub fn millisecond(&self) -> i64 {
        self.millisecond
    }

    pub fn nano_of_millisecond(&self) -> u32 {
        self.nano_of_millisecond
    }

    /// Returns the UTC wall-clock time of this timestamp, or `None` if it is
    /// outside the range chrono can represent.
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        DateTime::from_timestamp_millis(self.millisecond)?
            .naive_utc()
            .checked_add_signed(TimeDelta::nanoseconds(i64::from(
                self.nano_of_millisecond,
            )))
    }
}
