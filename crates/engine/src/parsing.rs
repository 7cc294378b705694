//! Argument parsers for the command surface.
//!
//! Each parser takes the raw argument text that follows the command word and
//! returns typed values or a [`FormatError`] ready to be shown to the user.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::{FormatError, MoneyCents};

/// Calendar date format accepted by `/statistics`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An amount with the free text that followed it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AmountNote {
    pub amount: MoneyCents,
    pub description: String,
}

/// Inclusive range of instants covering whole calendar days.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// 00:00:00.000 of `start_date` in the reference zone.
    pub start: DateTime<Utc>,
    /// 23:59:59.999 of `end_date` in the reference zone.
    pub end: DateTime<Utc>,
}

impl DateRange {
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Parses a strictly positive amount: no sign, rounded half-up to the cent.
///
/// An amount that rounds to zero (`0.001`) is rejected.
pub fn parse_positive_amount(token: &str) -> Result<MoneyCents, FormatError> {
    if token.starts_with(['+', '-']) {
        return Err(FormatError::InvalidAmount);
    }
    let amount: MoneyCents = token.parse()?;
    if !amount.is_positive() {
        return Err(FormatError::InvalidAmount);
    }
    Ok(amount)
}

/// Parses `<amount> <description...>`.
///
/// `usage` is reported when the layout is wrong (no amount or no
/// description); a bad amount is always [`FormatError::InvalidAmount`].
pub fn parse_amount_and_description(
    args: &str,
    usage: &'static str,
) -> Result<AmountNote, FormatError> {
    let mut tokens = args.split_whitespace();
    let amount = tokens.next().ok_or(FormatError::Usage(usage))?;
    let description = tokens.collect::<Vec<_>>().join(" ");
    if description.is_empty() {
        return Err(FormatError::Usage(usage));
    }

    Ok(AmountNote {
        amount: parse_positive_amount(amount)?,
        description,
    })
}

/// Parses `<amount>`; anything after the first token is ignored.
pub fn parse_amount(args: &str) -> Result<MoneyCents, FormatError> {
    let token = args
        .split_whitespace()
        .next()
        .ok_or(FormatError::InvalidAmount)?;
    parse_positive_amount(token)
}

/// Parses `<start-date> <end-date>` as whole days in `tz`.
pub fn parse_date_range(args: &str, tz: Tz) -> Result<DateRange, FormatError> {
    let mut tokens = args.split_whitespace();
    let start_date = tokens.next().ok_or(FormatError::InvalidDate).and_then(parse_date)?;
    let end_date = tokens.next().ok_or(FormatError::InvalidDate).and_then(parse_date)?;

    let first_instant = NaiveTime::MIN;
    let last_instant =
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999).ok_or(FormatError::InvalidDate)?;

    let start = tz
        .from_local_datetime(&start_date.and_time(first_instant))
        .earliest()
        .ok_or(FormatError::InvalidDate)?;
    let end = tz
        .from_local_datetime(&end_date.and_time(last_instant))
        .latest()
        .ok_or(FormatError::InvalidDate)?;

    Ok(DateRange {
        start_date,
        end_date,
        start: start.with_timezone(&Utc),
        end: end.with_timezone(&Utc),
    })
}

/// `YYYY-MM-DD`, zero padded.
fn parse_date(token: &str) -> Result<NaiveDate, FormatError> {
    let well_formed = token.len() == 10
        && token
            .char_indices()
            .all(|(idx, c)| if idx == 4 || idx == 7 { c == '-' } else { c.is_ascii_digit() });
    if !well_formed {
        return Err(FormatError::InvalidDate);
    }
    NaiveDate::parse_from_str(token, DATE_FORMAT).map_err(|_| FormatError::InvalidDate)
}
