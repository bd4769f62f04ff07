//! The built-in temporal constructor registry (spec.md §4.3 "Default
//! temporal registry"): `date`, `time`, `instant`, `duration`, `period`,
//! each tagged `temporal.<name>`.
//!
//! Every handler takes exactly one `String` argument; shape, range, and
//! precision are validated by hand (no regex dependency) before handing
//! calendar validation itself to `chrono`.

use crate::call::{single_string_arg, ConstructorCall, ConstructorContext};
use crate::registry::ConstructorRegistry;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use sd2_diagnostic::{ErrorCode, ErrorRecord};
use sd2_ir::{Payload, QualifiedName};
use std::any::Any;
use std::iter::Peekable;
use std::str::Chars;

/// The parsed content behind a `temporal.*` `Object` value.
#[derive(Clone, Debug, PartialEq)]
pub enum Temporal {
    Date(NaiveDate),
    Time(NaiveTime),
    Instant(DateTime<FixedOffset>),
    /// Total duration in nanoseconds; `P1D = 86_400_000_000_000`.
    Duration(i128),
    Period { years: i64, months: i64, days: i64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct TemporalPayload(pub Temporal);

impl Payload for TemporalPayload {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_payload(&self) -> Box<dyn Payload> {
        Box::new(self.clone())
    }

    fn payload_eq(&self, other: &dyn Payload) -> bool {
        other.as_any().downcast_ref::<TemporalPayload>() == Some(self)
    }
}

pub(crate) fn register_all(registry: &mut ConstructorRegistry) {
    registry.register(QualifiedName::single("date"), tag("date"), date_handler);
    registry.register(QualifiedName::single("time"), tag("time"), time_handler);
    registry.register(QualifiedName::single("instant"), tag("instant"), instant_handler);
    registry.register(QualifiedName::single("duration"), tag("duration"), duration_handler);
    registry.register(QualifiedName::single("period"), tag("period"), period_handler);
}

fn tag(name: &str) -> QualifiedName {
    QualifiedName::new(vec!["temporal".into(), name.into()])
}

fn take_digits(chars: &mut Peekable<Chars>, exactly: usize) -> Option<String> {
    let mut out = String::with_capacity(exactly);
    for _ in 0..exactly {
        match chars.peek() {
            Some(c) if c.is_ascii_digit() => {
                out.push(*c);
                chars.next();
            }
            _ => return None,
        }
    }
    Some(out)
}

fn take_digits_at_least_one(chars: &mut Peekable<Chars>) -> Option<String> {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            out.push(c);
            chars.next();
        } else {
            break;
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Pads a captured fractional-second digit string to nanosecond precision.
/// Callers check `frac.len() > 9` for E3003/E3001 before reaching here.
fn pad_nanos(frac: &str) -> u32 {
    let mut padded = frac.to_string();
    while padded.len() < 9 {
        padded.push('0');
    }
    padded.parse().unwrap_or(0)
}

fn parse_date_components(text: &str) -> Option<(i32, u32, u32)> {
    let mut chars = text.chars().peekable();
    let year = take_digits(&mut chars, 4)?;
    if chars.next() != Some('-') {
        return None;
    }
    let month = take_digits(&mut chars, 2)?;
    if chars.next() != Some('-') {
        return None;
    }
    let day = take_digits(&mut chars, 2)?;
    if chars.next().is_some() {
        return None;
    }
    Some((year.parse().ok()?, month.parse().ok()?, day.parse().ok()?))
}

fn date_handler(
    call: &ConstructorCall,
    ctx: &mut dyn ConstructorContext,
) -> Result<Box<dyn Payload>, ErrorRecord> {
    let text = single_string_arg(call, ctx)?;
    let (year, month, day) = parse_date_components(text)
        .ok_or_else(|| ctx.error(ErrorCode::E3001, &format!("`{text}` is not a valid date"), None))?;
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ctx.error(ErrorCode::E3001, &format!("`{text}` is not a valid calendar date"), None))?;
    Ok(Box::new(TemporalPayload(Temporal::Date(date))))
}

fn parse_time_components(text: &str) -> Option<(u32, u32, u32, Option<String>)> {
    let mut chars = text.chars().peekable();
    let hour = take_digits(&mut chars, 2)?;
    if chars.next() != Some(':') {
        return None;
    }
    let minute = take_digits(&mut chars, 2)?;
    if chars.next() != Some(':') {
        return None;
    }
    let second = take_digits(&mut chars, 2)?;
    let frac = if chars.peek() == Some(&'.') {
        chars.next();
        Some(take_digits_at_least_one(&mut chars)?)
    } else {
        None
    };
    if chars.next().is_some() {
        return None;
    }
    Some((hour.parse().ok()?, minute.parse().ok()?, second.parse().ok()?, frac))
}

fn time_handler(
    call: &ConstructorCall,
    ctx: &mut dyn ConstructorContext,
) -> Result<Box<dyn Payload>, ErrorRecord> {
    let text = single_string_arg(call, ctx)?;
    let (hour, minute, second, frac) = parse_time_components(text)
        .ok_or_else(|| ctx.error(ErrorCode::E3001, &format!("`{text}` is not a valid time"), None))?;
    if let Some(f) = &frac {
        if f.len() > 9 {
            return Err(ctx.error(ErrorCode::E3003, "fractional seconds exceed 9 digits", None));
        }
    }
    let nanos = frac.as_deref().map(pad_nanos).unwrap_or(0);
    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
        .ok_or_else(|| ctx.error(ErrorCode::E3001, &format!("`{text}` is not a valid clock time"), None))?;
    Ok(Box::new(TemporalPayload(Temporal::Time(time))))
}

fn fractional_seconds_len(text: &str) -> usize {
    match text.find('.') {
        Some(dot) => text[dot + 1..]
            .chars()
            .take_while(char::is_ascii_digit)
            .count(),
        None => 0,
    }
}

fn instant_handler(
    call: &ConstructorCall,
    ctx: &mut dyn ConstructorContext,
) -> Result<Box<dyn Payload>, ErrorRecord> {
    let text = single_string_arg(call, ctx)?;
    if fractional_seconds_len(text) > 9 {
        return Err(ctx.error(ErrorCode::E3003, "fractional seconds exceed 9 digits", None));
    }
    let instant = DateTime::parse_from_rfc3339(text)
        .map_err(|_| ctx.error(ErrorCode::E3001, &format!("`{text}` is not a valid instant"), None))?;
    Ok(Box::new(TemporalPayload(Temporal::Instant(instant))))
}

fn parse_duration_nanos(text: &str, ctx: &dyn ConstructorContext) -> Result<i128, ErrorRecord> {
    let mut chars = text.chars().peekable();
    if chars.next() != Some('P') {
        return Err(shape_error(text, ctx));
    }
    let mut nanos: i128 = 0;
    let mut any = false;
    let mut seen_d = false;

    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        let digits = take_digits_at_least_one(&mut chars).expect("peeked a digit");
        match chars.next() {
            Some('D') => {
                if seen_d {
                    return Err(shape_error(text, ctx));
                }
                seen_d = true;
                let days: i128 = digits.parse().map_err(|_| shape_error(text, ctx))?;
                nanos += days * 86_400_000_000_000;
                any = true;
            }
            Some('Y') | Some('M') | Some('W') => {
                return Err(ctx.error(
                    ErrorCode::E3004,
                    "duration allows only a `D` calendar component",
                    None,
                ));
            }
            _ => return Err(shape_error(text, ctx)),
        }
    }

    if chars.peek() == Some(&'T') {
        chars.next();
        let mut last_rank: Option<u8> = None;
        loop {
            match chars.peek() {
                Some(&c) if c.is_ascii_digit() => {
                    let digits = take_digits_at_least_one(&mut chars).expect("peeked a digit");
                    if chars.peek() == Some(&'.') {
                        chars.next();
                        let frac = take_digits_at_least_one(&mut chars).ok_or_else(|| shape_error(text, ctx))?;
                        if chars.next() != Some('S') {
                            return Err(shape_error(text, ctx));
                        }
                        if last_rank.is_some_and(|r| r >= 2) {
                            return Err(shape_error(text, ctx));
                        }
                        last_rank = Some(2);
                        if frac.len() > 9 {
                            return Err(ctx.error(ErrorCode::E3001, "fractional seconds exceed 9 digits", None));
                        }
                        let secs: i128 = digits.parse().unwrap_or(0);
                        nanos += secs * 1_000_000_000 + i128::from(pad_nanos(&frac));
                        any = true;
                    } else {
                        let value: i128 = digits.parse().unwrap_or(0);
                        let rank = match chars.next() {
                            Some('H') => 0,
                            Some('M') => 1,
                            Some('S') => 2,
                            _ => return Err(shape_error(text, ctx)),
                        };
                        if last_rank.is_some_and(|r| r >= rank) {
                            return Err(shape_error(text, ctx));
                        }
                        last_rank = Some(rank);
                        match rank {
                            0 => nanos += value * 3_600_000_000_000,
                            1 => nanos += value * 60_000_000_000,
                            _ => nanos += value * 1_000_000_000,
                        }
                        any = true;
                    }
                }
                _ => break,
            }
        }
    }

    if chars.next().is_some() {
        return Err(shape_error(text, ctx));
    }
    if !any {
        return Err(ctx.error(ErrorCode::E3002, "duration has no components", None));
    }
    Ok(nanos)
}

fn shape_error(text: &str, ctx: &dyn ConstructorContext) -> ErrorRecord {
    ctx.error(ErrorCode::E3001, &format!("`{text}` is not a valid duration"), None)
}

fn duration_handler(
    call: &ConstructorCall,
    ctx: &mut dyn ConstructorContext,
) -> Result<Box<dyn Payload>, ErrorRecord> {
    let text = single_string_arg(call, ctx)?.to_string();
    let nanos = parse_duration_nanos(&text, ctx)?;
    Ok(Box::new(TemporalPayload(Temporal::Duration(nanos))))
}

fn parse_period_components(text: &str, ctx: &dyn ConstructorContext) -> Result<(i64, i64, i64), ErrorRecord> {
    let mut chars = text.chars().peekable();
    if chars.next() != Some('P') {
        return Err(ctx.error(ErrorCode::E3001, &format!("`{text}` is not a valid period"), None));
    }
    let mut years = 0i64;
    let mut months = 0i64;
    let mut days = 0i64;
    let mut any = false;
    let mut last_rank: Option<u8> = None;

    loop {
        match chars.peek() {
            None => break,
            Some('T') => {
                return Err(ctx.error(
                    ErrorCode::E3005,
                    "period must not contain a time component",
                    None,
                ));
            }
            Some(c) if c.is_ascii_digit() => {
                let digits = take_digits_at_least_one(&mut chars).expect("peeked a digit");
                let value: i64 = digits
                    .parse()
                    .map_err(|_| ctx.error(ErrorCode::E3001, &format!("`{text}` is not a valid period"), None))?;
                let rank = match chars.next() {
                    Some('Y') => 0,
                    Some('M') => 1,
                    Some('W') => 2,
                    Some('D') => 3,
                    _ => return Err(ctx.error(ErrorCode::E3001, &format!("`{text}` is not a valid period"), None)),
                };
                if last_rank.is_some_and(|seen| seen >= rank) {
                    return Err(ctx.error(
                        ErrorCode::E3001,
                        "period components must appear at most once, in Y/M/W/D order",
                        None,
                    ));
                }
                last_rank = Some(rank);
                match rank {
                    0 => years += value,
                    1 => months += value,
                    2 => days += value * 7,
                    _ => days += value,
                }
                any = true;
            }
            _ => return Err(ctx.error(ErrorCode::E3001, &format!("`{text}` is not a valid period"), None)),
        }
    }

    if !any {
        return Err(ctx.error(ErrorCode::E3002, "period has no components", None));
    }
    Ok((years, months, days))
}

fn period_handler(
    call: &ConstructorCall,
    ctx: &mut dyn ConstructorContext,
) -> Result<Box<dyn Payload>, ErrorRecord> {
    let text = single_string_arg(call, ctx)?.to_string();
    let (years, months, days) = parse_period_components(&text, ctx)?;
    Ok(Box::new(TemporalPayload(Temporal::Period { years, months, days })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{resolve_constructor, UnknownConstructorPolicy};
    use sd2_ir::{Location, Value};

    const LOC: Location = Location::START;

    fn call_of(name: &str, arg: &str) -> Value {
        Value::ConstructorTuple(
            QualifiedName::single(name),
            vec![Value::String(arg.into(), LOC)],
            LOC,
        )
    }

    fn resolve(name: &str, arg: &str) -> Result<Value, ErrorRecord> {
        let registry = ConstructorRegistry::temporal();
        resolve_constructor(&registry, UnknownConstructorPolicy::KeepRaw, call_of(name, arg))
    }

    fn temporal_of(value: Value) -> Temporal {
        match value {
            Value::Object(_, payload, _) => payload
                .as_any()
                .downcast_ref::<TemporalPayload>()
                .expect("temporal payload")
                .0
                .clone(),
            other => panic!("expected Object, got {other:?}"),
        }
    }

    #[test]
    fn date_parses_valid_calendar_date() {
        let v = resolve("date", "2024-03-15").unwrap();
        assert_eq!(temporal_of(v), Temporal::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
    }

    #[test]
    fn date_rejects_impossible_calendar_date() {
        let err = resolve("date", "2024-02-30").unwrap_err();
        assert_eq!(err.code, ErrorCode::E3001);
    }

    #[test]
    fn time_rejects_invalid_clock_value() {
        let err = resolve("time", "24:00:00").unwrap_err();
        assert_eq!(err.code, ErrorCode::E3001);
    }

    #[test]
    fn time_with_too_many_fractional_digits_is_e3003() {
        let err = resolve("time", "10:00:00.1234567890").unwrap_err();
        assert_eq!(err.code, ErrorCode::E3003);
    }

    #[test]
    fn instant_requires_an_offset() {
        let err = resolve("instant", "2024-03-15T14:30:00").unwrap_err();
        assert_eq!(err.code, ErrorCode::E3001);
    }

    #[test]
    fn instant_accepts_zulu_offset() {
        let v = resolve("instant", "2024-03-15T14:30:00Z").unwrap();
        assert!(matches!(temporal_of(v), Temporal::Instant(_)));
    }

    #[test]
    fn duration_computes_nanoseconds() {
        let v = resolve("duration", "P1D").unwrap();
        assert_eq!(temporal_of(v), Temporal::Duration(86_400_000_000_000));
    }

    #[test]
    fn duration_combines_day_and_time_components() {
        let v = resolve("duration", "P1DT2H30M").unwrap();
        assert_eq!(
            temporal_of(v),
            Temporal::Duration(86_400_000_000_000 + 2 * 3_600_000_000_000 + 30 * 60_000_000_000)
        );
    }

    #[test]
    fn duration_rejects_non_day_calendar_component() {
        let err = resolve("duration", "P1Y").unwrap_err();
        assert_eq!(err.code, ErrorCode::E3004);
    }

    #[test]
    fn duration_rejects_empty_body() {
        let err = resolve("duration", "P").unwrap_err();
        assert_eq!(err.code, ErrorCode::E3002);
    }

    #[test]
    fn duration_accepts_pt0s() {
        let v = resolve("duration", "PT0S").unwrap();
        assert_eq!(temporal_of(v), Temporal::Duration(0));
    }

    #[test]
    fn duration_rejects_repeated_day_component() {
        let err = resolve("duration", "P1D2D").unwrap_err();
        assert_eq!(err.code, ErrorCode::E3001);
    }

    #[test]
    fn duration_rejects_out_of_order_time_components() {
        let err = resolve("duration", "PT1M2H").unwrap_err();
        assert_eq!(err.code, ErrorCode::E3001);
    }

    #[test]
    fn duration_rejects_repeated_time_component() {
        let err = resolve("duration", "PT1H2H").unwrap_err();
        assert_eq!(err.code, ErrorCode::E3001);
    }

    #[test]
    fn period_expands_weeks_to_days() {
        let v = resolve("period", "P2W").unwrap();
        assert_eq!(
            temporal_of(v),
            Temporal::Period {
                years: 0,
                months: 0,
                days: 14
            }
        );
    }

    #[test]
    fn period_rejects_time_component() {
        let err = resolve("period", "P1DT1H").unwrap_err();
        assert_eq!(err.code, ErrorCode::E3005);
    }

    #[test]
    fn period_rejects_empty_body() {
        let err = resolve("period", "P").unwrap_err();
        assert_eq!(err.code, ErrorCode::E3002);
    }

    #[test]
    fn period_rejects_repeated_component() {
        let err = resolve("period", "P1D2D").unwrap_err();
        assert_eq!(err.code, ErrorCode::E3001);
    }

    #[test]
    fn period_rejects_out_of_order_components() {
        let err = resolve("period", "P1D1Y").unwrap_err();
        assert_eq!(err.code, ErrorCode::E3001);
    }
}
