// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{NaiveDate, TimeDelta};
use proptest::prelude::*;
use sf_repr::adt::date::decode_date;
use sf_repr::adt::datetime::DateTimeFormat;
use sf_repr::adt::numeric::Scale;
use sf_repr::adt::time::decode_time;
use sf_repr::adt::timestamp::{TimestampKind, TzEncoding, decode_timestamp};

proptest! {
    #[test]
    fn formatted_tz_offset_matches_zone_index(
        secs in -1_000_000_000i64..4_000_000_000,
        millis in 0u32..1000,
        index in 1i64..=2879,
    ) {
        let token = format!("{secs}.{millis:03} {index}");
        let ts = decode_timestamp(
            &token,
            TimestampKind::Tz,
            Scale::MILLIS,
            chrono_tz::UTC,
            TzEncoding::Current,
        )
        .unwrap();
        let rendered = DateTimeFormat::compile("TZHTZM")
            .unwrap()
            .format_timestamp(&ts)
            .unwrap();
        let minutes = index - 1440;
        let sign = if minutes < 0 { '-' } else { '+' };
        let expected = format!("{sign}{:02}{:02}", minutes.abs() / 60, minutes.abs() % 60);
        prop_assert_eq!(rendered, expected);
    }

    #[test]
    fn dates_after_the_calendar_reform_are_not_shifted(day in -141_437i64..2_932_897) {
        let date = decode_date(&day.to_string()).unwrap();
        let expected = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap() + TimeDelta::days(day);
        prop_assert_eq!(date, expected);
        let rendered = DateTimeFormat::compile("YYYY-MM-DD").unwrap().format_date(date);
        prop_assert_eq!(rendered, expected.format("%Y-%m-%d").to_string());
    }

    #[test]
    fn times_render_at_their_scale(secs in 0u32..86_400, micros in 0u32..1_000_000) {
        let token = format!("{secs}.{micros:06}");
        let time = decode_time(&token, Scale::try_from(6).unwrap()).unwrap();
        let rendered = DateTimeFormat::compile("HH24:MI:SS.FF").unwrap().format_time(&time);
        let expected = format!(
            "{:02}:{:02}:{:02}.{micros:06}",
            secs / 3600,
            secs / 60 % 60,
            secs % 60
        );
        prop_assert_eq!(rendered, expected);
    }
}

#[test]
fn pre_reform_dates_are_shifted_for_display() {
    let format = DateTimeFormat::compile("YYYY-MM-DD").unwrap();
    let date = decode_date("-141441").unwrap();
    assert_eq!(date, NaiveDate::from_ymd_opt(1582, 10, 1).unwrap());
    assert_eq!(format.format_date(date), "1582-10-11");
    assert_eq!(format.format_date(decode_date("0").unwrap()), "1970-01-01");
}
