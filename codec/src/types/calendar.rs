//! Codecs for calendar and clock values.
//!
//! Dates and times are [Pod] codecs over `chrono` types, so they compose like any other
//! scalar:
//!
//! | Codec | Value | Width | Layout |
//! |---|---|---|---|
//! | [DAY] | [Day] | 1 | day of the month |
//! | [MONTH] | [Month] | 1 | 1 (January) to 12 (December) |
//! | [WEEKDAY] | [Weekday] | 1 | 0 (Sunday) to 6 (Saturday) |
//! | [YEAR] | [Year] | 2 | signed year |
//! | [DATE] | [NaiveDate] | 4 | year (2 bytes), month, day |
//! | [TIME] | [NaiveTime] | 4 | milliseconds since midnight |
//! | [DATETIME] | `DateTime<Utc>` | 8 | signed nanoseconds since the Unix epoch |
//!
//! The big-endian forms of [DATE] reverse all four bytes, so the day comes first and the year
//! is written most significant byte first.

use crate::{
    primitives::{Pod, PodId, Scalar},
    util::at_least,
    ByteOrder, Error,
};
use bytes::{Buf, BufMut};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc};

/// A day of the month.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Day(pub u8);

/// A month of the year, numbered from 1 (January).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Month(pub u8);

/// A day of the week, numbered from 0 (Sunday).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Weekday(pub u8);

/// A year of the proleptic Gregorian calendar.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Year(pub i16);

impl From<chrono::Month> for Month {
    fn from(month: chrono::Month) -> Self {
        Self(month.number_from_month() as u8)
    }
}

impl TryFrom<Month> for chrono::Month {
    type Error = Error;

    fn try_from(month: Month) -> Result<Self, Error> {
        chrono::Month::try_from(month.0).map_err(|_| Error::OutOfRange("Month"))
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(weekday: chrono::Weekday) -> Self {
        Self(weekday.num_days_from_sunday() as u8)
    }
}

impl TryFrom<Weekday> for chrono::Weekday {
    type Error = Error;

    fn try_from(weekday: Weekday) -> Result<Self, Error> {
        use chrono::Weekday::*;
        match weekday.0 {
            0 => Ok(Sun),
            1 => Ok(Mon),
            2 => Ok(Tue),
            3 => Ok(Wed),
            4 => Ok(Thu),
            5 => Ok(Fri),
            6 => Ok(Sat),
            _ => Err(Error::OutOfRange("Weekday")),
        }
    }
}

// Newtypes over a single byte
macro_rules! impl_byte_newtype {
    ($type:ident, $id:ident) => {
        impl Scalar for $type {
            const WIDTH: u32 = 1;
            const ID: PodId = PodId::$id;

            #[inline]
            fn put(self, order: ByteOrder, buf: &mut impl BufMut) -> Result<(), Error> {
                self.0.put(order, buf)
            }

            #[inline]
            fn get(order: ByteOrder, buf: &mut impl Buf) -> Result<Self, Error> {
                u8::get(order, buf).map(Self)
            }
        }
    };
}

impl_byte_newtype!(Day, Day);
impl_byte_newtype!(Month, Month);
impl_byte_newtype!(Weekday, Weekday);

impl Scalar for Year {
    const WIDTH: u32 = 2;
    const ID: PodId = PodId::Year;

    #[inline]
    fn put(self, order: ByteOrder, buf: &mut impl BufMut) -> Result<(), Error> {
        self.0.put(order, buf)
    }

    #[inline]
    fn get(order: ByteOrder, buf: &mut impl Buf) -> Result<Self, Error> {
        i16::get(order, buf).map(Self)
    }
}

impl Scalar for NaiveDate {
    const WIDTH: u32 = 4;
    const ID: PodId = PodId::Date;

    fn put(self, order: ByteOrder, buf: &mut impl BufMut) -> Result<(), Error> {
        let year = i16::try_from(self.year()).map_err(|_| Error::OutOfRange("Date"))?;
        let (month, day) = (self.month() as u8, self.day() as u8);
        match order {
            ByteOrder::Little => {
                buf.put_i16_le(year);
                buf.put_u8(month);
                buf.put_u8(day);
            }
            ByteOrder::Big => {
                buf.put_u8(day);
                buf.put_u8(month);
                buf.put_i16(year);
            }
        }
        Ok(())
    }

    fn get(order: ByteOrder, buf: &mut impl Buf) -> Result<Self, Error> {
        at_least(buf, Self::WIDTH as usize)?;
        let (year, month, day) = match order {
            ByteOrder::Little => {
                let year = buf.get_i16_le();
                let month = buf.get_u8();
                (year, month, buf.get_u8())
            }
            ByteOrder::Big => {
                let day = buf.get_u8();
                let month = buf.get_u8();
                (buf.get_i16(), month, day)
            }
        };
        NaiveDate::from_ymd_opt(year.into(), month.into(), day.into()).ok_or_else(|| {
            Error::InvalidData(
                "Date".to_string(),
                format!("{year}-{month:02}-{day:02} is not a calendar date"),
            )
        })
    }
}

/// Milliseconds are kept; finer precision is truncated and a leap second is written as the
/// last millisecond of its second.
impl Scalar for NaiveTime {
    const WIDTH: u32 = 4;
    const ID: PodId = PodId::Time;

    fn put(self, order: ByteOrder, buf: &mut impl BufMut) -> Result<(), Error> {
        let millis = self.nanosecond().min(999_999_999) / 1_000_000;
        (self.num_seconds_from_midnight() * 1000 + millis).put(order, buf)
    }

    fn get(order: ByteOrder, buf: &mut impl Buf) -> Result<Self, Error> {
        let millis = u32::get(order, buf)?;
        NaiveTime::from_num_seconds_from_midnight_opt(millis / 1000, (millis % 1000) * 1_000_000)
            .ok_or_else(|| {
                Error::InvalidData(
                    "Time".to_string(),
                    format!("{millis} ms is past the end of the day"),
                )
            })
    }
}

/// Instants outside the range of `i64` nanoseconds (about 1677 to 2262) cannot be written.
impl Scalar for DateTime<Utc> {
    const WIDTH: u32 = 8;
    const ID: PodId = PodId::DateTime;

    fn put(self, order: ByteOrder, buf: &mut impl BufMut) -> Result<(), Error> {
        self.timestamp_nanos_opt()
            .ok_or(Error::OutOfRange("DateTime"))?
            .put(order, buf)
    }

    fn get(order: ByteOrder, buf: &mut impl Buf) -> Result<Self, Error> {
        i64::get(order, buf).map(DateTime::from_timestamp_nanos)
    }
}

// Named codecs
pub const DAY: Pod<Day> = Pod::le();
pub const MONTH: Pod<Month> = Pod::le();
pub const WEEKDAY: Pod<Weekday> = Pod::le();
pub const YEAR: Pod<Year> = Pod::le();
pub const YEAR_BE: Pod<Year> = Pod::be();
pub const DATE: Pod<NaiveDate> = Pod::le();
pub const DATE_BE: Pod<NaiveDate> = Pod::be();
pub const TIME: Pod<NaiveTime> = Pod::le();
pub const TIME_BE: Pod<NaiveTime> = Pod::be();
pub const DATETIME: Pod<DateTime<Utc>> = Pod::le();
pub const DATETIME_BE: Pod<DateTime<Utc>> = Pod::be();
