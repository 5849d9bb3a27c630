// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Session settings that govern decoding.

use std::str::FromStr;
use std::sync::Arc;

use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};
use sf_repr::adt::binary::{BinaryFormat, InvalidBinaryFormatError};
use sf_repr::adt::datetime::DateTimeFormat;
use sf_repr::adt::timestamp::{TimestampKind, TzEncoding};
use tracing::debug;

use crate::error::Error;

/// The session parameters relevant to decoding, as sent by the server
/// alongside a result.
///
/// Field names follow the server's parameter names. Parameters the server
/// sends as strings (`"true"`, `"1"`) are accepted in place of native JSON
/// booleans and integers, and empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct DecodingConfig {
    /// The IANA name of the client's time zone.
    pub timezone: Option<String>,
    /// The output pattern for all three timestamp kinds, unless overridden.
    pub timestamp_output_format: Option<String>,
    /// The output pattern for `TIMESTAMP_NTZ`.
    pub timestamp_ntz_output_format: Option<String>,
    /// The output pattern for `TIMESTAMP_LTZ`.
    pub timestamp_ltz_output_format: Option<String>,
    /// The output pattern for `TIMESTAMP_TZ`.
    pub timestamp_tz_output_format: Option<String>,
    /// The output pattern for `DATE`.
    pub date_output_format: Option<String>,
    /// The output pattern for `TIME`.
    pub time_output_format: Option<String>,
    /// `HEX` or `BASE64`.
    pub binary_output_format: Option<String>,
    /// Whether `TIMESTAMP_NTZ` values are surfaced in the client's zone.
    #[serde(
        rename = "CLIENT_HONOR_CLIENT_TZ_FOR_TIMESTAMP_NTZ",
        deserialize_with = "deserialize_lenient"
    )]
    pub honor_client_tz_for_ntz: Option<bool>,
    /// The version of the result format, which selects the `TIMESTAMP_TZ`
    /// wire encoding.
    #[serde(deserialize_with = "deserialize_lenient")]
    pub result_version: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Native(T),
    Text(String),
}

fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
{
    match Option::<Lenient<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Lenient::Native(v)) => Ok(Some(v)),
        Some(Lenient::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Lenient::Text(s)) => s
            .trim()
            .to_ascii_lowercase()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid parameter value: {s}"))),
    }
}

/// The settings every decode call reads.
///
/// A context is built once per result and never changes afterwards. Cloning
/// it is cheap: compiled patterns are shared.
#[derive(Debug, Clone)]
pub struct DecodingContext {
    client_zone: Tz,
    honor_client_tz_for_ntz: bool,
    tz_encoding: TzEncoding,
    binary_format: BinaryFormat,
    timestamp_ntz_format: Option<Arc<DateTimeFormat>>,
    timestamp_ltz_format: Option<Arc<DateTimeFormat>>,
    timestamp_tz_format: Option<Arc<DateTimeFormat>>,
    date_format: Option<Arc<DateTimeFormat>>,
    time_format: Option<Arc<DateTimeFormat>>,
}

impl Default for DecodingContext {
    fn default() -> DecodingContext {
        DecodingContext {
            client_zone: Tz::UTC,
            honor_client_tz_for_ntz: true,
            tz_encoding: TzEncoding::Legacy,
            binary_format: BinaryFormat::Hex,
            timestamp_ntz_format: None,
            timestamp_ltz_format: None,
            timestamp_tz_format: None,
            date_format: None,
            time_format: None,
        }
    }
}

impl DecodingContext {
    /// Builds a context from session parameters, compiling every pattern.
    pub fn from_config(config: &DecodingConfig) -> Result<DecodingContext, Error> {
        let mut cx = DecodingContext::default();
        if let Some(name) = present(&config.timezone) {
            cx.client_zone = name
                .parse::<Tz>()
                .map_err(|_| Error::Configuration(format!("unknown time zone: {name}")))?;
        }
        if let Some(honor) = config.honor_client_tz_for_ntz {
            cx.honor_client_tz_for_ntz = honor;
        }
        if let Some(version) = config.result_version {
            cx.tz_encoding = TzEncoding::from_result_version(version);
        }
        if let Some(format) = present(&config.binary_output_format) {
            cx.binary_format = format
                .parse()
                .map_err(|e: InvalidBinaryFormatError| Error::Configuration(e.to_string()))?;
        }
        let fallback = compile(&config.timestamp_output_format)?;
        cx.timestamp_ntz_format =
            compile(&config.timestamp_ntz_output_format)?.or_else(|| fallback.clone());
        cx.timestamp_ltz_format =
            compile(&config.timestamp_ltz_output_format)?.or_else(|| fallback.clone());
        cx.timestamp_tz_format = compile(&config.timestamp_tz_output_format)?.or(fallback);
        cx.date_format = compile(&config.date_output_format)?;
        cx.time_format = compile(&config.time_output_format)?;
        debug!(
            client_zone = %cx.client_zone,
            honor_client_tz_for_ntz = cx.honor_client_tz_for_ntz,
            tz_encoding = ?cx.tz_encoding,
            binary_format = %cx.binary_format,
            "built decoding context"
        );
        Ok(cx)
    }

    /// Builds a context from session parameters serialized as a JSON object.
    pub fn from_json(json: &str) -> Result<DecodingContext, Error> {
        let config: DecodingConfig = serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("invalid session parameters: {e}")))?;
        DecodingContext::from_config(&config)
    }

    /// Sets the client's time zone.
    pub fn with_client_zone(mut self, zone: Tz) -> DecodingContext {
        self.client_zone = zone;
        self
    }

    /// Sets whether `TIMESTAMP_NTZ` values are surfaced in the client's zone.
    pub fn with_honor_client_tz_for_ntz(mut self, honor: bool) -> DecodingContext {
        self.honor_client_tz_for_ntz = honor;
        self
    }

    /// Sets the `TIMESTAMP_TZ` wire encoding.
    pub fn with_tz_encoding(mut self, encoding: TzEncoding) -> DecodingContext {
        self.tz_encoding = encoding;
        self
    }

    /// Sets how binary values are rendered as text.
    pub fn with_binary_format(mut self, format: BinaryFormat) -> DecodingContext {
        self.binary_format = format;
        self
    }

    /// Sets the output pattern for one kind of timestamp.
    pub fn with_timestamp_format(
        mut self,
        kind: TimestampKind,
        format: DateTimeFormat,
    ) -> DecodingContext {
        let format = Some(Arc::new(format));
        match kind {
            TimestampKind::Ntz => self.timestamp_ntz_format = format,
            TimestampKind::Ltz => self.timestamp_ltz_format = format,
            TimestampKind::Tz => self.timestamp_tz_format = format,
        }
        self
    }

    /// Sets the output pattern for dates.
    pub fn with_date_format(mut self, format: DateTimeFormat) -> DecodingContext {
        self.date_format = Some(Arc::new(format));
        self
    }

    /// Sets the output pattern for times.
    pub fn with_time_format(mut self, format: DateTimeFormat) -> DecodingContext {
        self.time_format = Some(Arc::new(format));
        self
    }

    pub fn client_zone(&self) -> Tz {
        self.client_zone
    }

    pub fn honor_client_tz_for_ntz(&self) -> bool {
        self.honor_client_tz_for_ntz
    }

    pub fn tz_encoding(&self) -> TzEncoding {
        self.tz_encoding
    }

    pub fn binary_format(&self) -> BinaryFormat {
        self.binary_format
    }

    /// Returns the output pattern for `kind`, or a configuration error if
    /// none was set.
    pub fn timestamp_format(&self, kind: TimestampKind) -> Result<&DateTimeFormat, Error> {
        let format = match kind {
            TimestampKind::Ntz => &self.timestamp_ntz_format,
            TimestampKind::Ltz => &self.timestamp_ltz_format,
            TimestampKind::Tz => &self.timestamp_tz_format,
        };
        format
            .as_deref()
            .ok_or_else(|| Error::Configuration("missing timestamp formatter".into()))
    }

    /// Returns the output pattern for dates, or a configuration error if none
    /// was set.
    pub fn date_format(&self) -> Result<&DateTimeFormat, Error> {
        self.date_format
            .as_deref()
            .ok_or_else(|| Error::Configuration("missing date formatter".into()))
    }

    /// Returns the output pattern for times, or a configuration error if none
    /// was set.
    pub fn time_format(&self) -> Result<&DateTimeFormat, Error> {
        self.time_format
            .as_deref()
            .ok_or_else(|| Error::Configuration("missing time formatter".into()))
    }
}

fn present(param: &Option<String>) -> Option<&str> {
    param.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn compile(pattern: &Option<String>) -> Result<Option<Arc<DateTimeFormat>>, Error> {
    present(pattern)
        .map(|p| {
            DateTimeFormat::compile(p)
                .map(Arc::new)
                .map_err(|e| Error::Configuration(e.to_string()))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn defaults() {
        let cx = DecodingContext::from_config(&DecodingConfig::default()).unwrap();
        assert_eq!(cx.client_zone(), Tz::UTC);
        assert!(cx.honor_client_tz_for_ntz());
        assert_eq!(cx.tz_encoding(), TzEncoding::Legacy);
        assert_eq!(cx.binary_format(), BinaryFormat::Hex);
        assert_eq!(
            cx.date_format().unwrap_err().kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            cx.timestamp_format(TimestampKind::Tz).unwrap_err(),
            Error::Configuration("missing timestamp formatter".into())
        );
    }

    #[test]
    fn from_session_parameters() {
        let cx = DecodingContext::from_json(
            r#"{
                "TIMEZONE": "America/Los_Angeles",
                "TIMESTAMP_OUTPUT_FORMAT": "YYYY-MM-DD HH24:MI:SS TZHTZM",
                "TIMESTAMP_NTZ_OUTPUT_FORMAT": "YYYY-MM-DD HH24:MI:SS",
                "TIMESTAMP_LTZ_OUTPUT_FORMAT": "",
                "DATE_OUTPUT_FORMAT": "YYYY-MM-DD",
                "BINARY_OUTPUT_FORMAT": "BASE64",
                "CLIENT_HONOR_CLIENT_TZ_FOR_TIMESTAMP_NTZ": "FALSE",
                "RESULT_VERSION": "0",
                "UNRELATED_PARAMETER": 7
            }"#,
        )
        .unwrap();
        assert_eq!(cx.client_zone(), chrono_tz::America::Los_Angeles);
        assert!(!cx.honor_client_tz_for_ntz());
        assert_eq!(cx.tz_encoding(), TzEncoding::Legacy);
        assert_eq!(cx.binary_format(), BinaryFormat::Base64);
        assert_eq!(
            cx.timestamp_format(TimestampKind::Ntz).unwrap().pattern(),
            "YYYY-MM-DD HH24:MI:SS"
        );
        assert_eq!(
            cx.timestamp_format(TimestampKind::Ltz).unwrap().pattern(),
            "YYYY-MM-DD HH24:MI:SS TZHTZM"
        );
        assert_eq!(cx.date_format().unwrap().pattern(), "YYYY-MM-DD");
        assert!(cx.time_format().is_err());
    }

    #[test]
    fn native_json_values() {
        let cx = DecodingContext::from_json(
            r#"{"CLIENT_HONOR_CLIENT_TZ_FOR_TIMESTAMP_NTZ": false, "RESULT_VERSION": 1}"#,
        )
        .unwrap();
        assert!(!cx.honor_client_tz_for_ntz());
        assert_eq!(cx.tz_encoding(), TzEncoding::Current);
    }

    #[test]
    fn missing_result_version_is_legacy() {
        let cx = DecodingContext::from_json(r#"{"TIMEZONE": "UTC"}"#).unwrap();
        assert_eq!(cx.tz_encoding(), TzEncoding::Legacy);
        assert_eq!(cx.tz_encoding(), TzEncoding::from_result_version(0));
        assert_eq!(DecodingContext::default().tz_encoding(), TzEncoding::Legacy);
        assert_eq!(TzEncoding::default(), TzEncoding::Legacy);
    }

    #[test]
    fn rejects_bad_parameters() {
        for json in [
            r#"{"TIMEZONE": "Mars/Olympus_Mons"}"#,
            r#"{"BINARY_OUTPUT_FORMAT": "UTF8"}"#,
            r#"{"DATE_OUTPUT_FORMAT": "YYYY\"MM"}"#,
            r#"{"CLIENT_HONOR_CLIENT_TZ_FOR_TIMESTAMP_NTZ": "maybe"}"#,
            "not json",
        ] {
            let err = DecodingContext::from_json(json).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration, "{json}");
        }
    }
}
