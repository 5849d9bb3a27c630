// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Descriptions of the endpoints of bulk data transfers.
//!
//! A stage is cloud object storage or a local directory that files are
//! uploaded to before loading, or downloaded from after unloading. The
//! server describes the stage of each transfer command; a
//! [`StageDescriptor`] is that description, validated once for the fields
//! its provider needs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Provider credentials, e.g. `AWS_KEY_ID` or `AZURE_SAS_TOKEN`, keyed by
/// name.
pub type Credentials = BTreeMap<String, String>;

/// The provider of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageType {
    /// An Amazon S3 bucket.
    S3,
    /// An Azure Blob Storage container.
    Azure,
    /// A directory on the local filesystem.
    LocalFs,
}

impl StageType {
    /// The fields a stage of this type cannot do without.
    pub fn required_fields(&self) -> &'static [StageField] {
        match self {
            StageType::S3 => &[
                StageField::Location,
                StageField::Region,
                StageField::Credentials,
            ],
            StageType::Azure => &[
                StageField::Location,
                StageField::Endpoint,
                StageField::Account,
                StageField::Credentials,
            ],
            StageType::LocalFs => &[StageField::Location],
        }
    }
}

impl FromStr for StageType {
    type Err = StageValidationError;

    /// Parses the server's name for a stage type. Names are matched exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S3" => Ok(StageType::S3),
            "AZURE" => Ok(StageType::Azure),
            "LOCAL_FS" | "LOCAL_FILESYSTEM" => Ok(StageType::LocalFs),
            _ => Err(StageValidationError::InvalidStageType(s.into())),
        }
    }
}

impl fmt::Display for StageType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            StageType::S3 => "S3",
            StageType::Azure => "AZURE",
            StageType::LocalFs => "LOCAL_FS",
        })
    }
}

/// A field of a [`StageDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageField {
    Location,
    Credentials,
    Region,
    Endpoint,
    Account,
}

impl fmt::Display for StageField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            StageField::Location => "location",
            StageField::Credentials => "credentials",
            StageField::Region => "region",
            StageField::Endpoint => "endpoint",
            StageField::Account => "account",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageValidationError {
    #[error("invalid stage type: {0}")]
    InvalidStageType(String),
    #[error(
        "incomplete {stage_type} stage: missing {}",
        itertools::join(.missing.iter(), ", ")
    )]
    Incomplete {
        stage_type: StageType,
        missing: Vec<StageField>,
    },
}

impl StageValidationError {
    /// Reports additional details about the error, if any are available.
    pub fn detail(&self) -> Option<String> {
        match self {
            StageValidationError::InvalidStageType(_) => {
                Some("Supported stage types are S3, AZURE and LOCAL_FS.".into())
            }
            StageValidationError::Incomplete { stage_type, .. } => Some(format!(
                "{stage_type} stages require {}.",
                itertools::join(stage_type.required_fields(), ", ")
            )),
        }
    }
}

/// A validated description of a stage.
///
/// Every field but the credentials is fixed at construction. Credentials
/// can be replaced with [`StageDescriptor::rotate_credentials`] when the
/// provider issues new ones; callers sharing a descriptor between transfer
/// workers must synchronize rotation themselves.
#[derive(Clone, PartialEq, Eq)]
pub struct StageDescriptor {
    stage_type: StageType,
    location: String,
    credentials: Option<Credentials>,
    region: Option<String>,
    endpoint: Option<String>,
    account: Option<String>,
}

/// Returns `value` unless it is absent or blank.
fn specified(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl StageDescriptor {
    /// Validates and constructs a descriptor.
    ///
    /// `stage_type` is the server's name for the provider. The error for an
    /// incomplete description names every missing field, in the order
    /// location, credentials, region, endpoint, account.
    pub fn create(
        stage_type: &str,
        location: Option<&str>,
        credentials: Option<Credentials>,
        region: Option<&str>,
        endpoint: Option<&str>,
        account: Option<&str>,
    ) -> Result<StageDescriptor, StageValidationError> {
        let stage_type: StageType = stage_type.parse()?;
        let location = specified(location);
        let credentials = credentials.filter(|c| !c.is_empty());
        let region = specified(region);
        let endpoint = specified(endpoint);
        let account = specified(account);

        let mut missing: Vec<_> = stage_type
            .required_fields()
            .iter()
            .copied()
            .filter(|field| match field {
                StageField::Location => location.is_none(),
                StageField::Credentials => credentials.is_none(),
                StageField::Region => region.is_none(),
                StageField::Endpoint => endpoint.is_none(),
                StageField::Account => account.is_none(),
            })
            .collect();
        missing.sort();
        let Some(location) = location.filter(|_| missing.is_empty()) else {
            return Err(StageValidationError::Incomplete {
                stage_type,
                missing,
            });
        };

        debug!(%stage_type, location, "validated stage");
        Ok(StageDescriptor {
            stage_type,
            location: location.into(),
            credentials,
            region: region.map(Into::into),
            endpoint: endpoint.map(Into::into),
            account: account.map(Into::into),
        })
    }

    pub fn stage_type(&self) -> StageType {
        self.stage_type
    }

    /// Returns the bucket or container, with an optional path, or the local
    /// directory.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Returns the storage account name.
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// Replaces the credentials, e.g. after the provider's tokens expired.
    ///
    /// The new credentials are not validated.
    pub fn rotate_credentials(&mut self, credentials: Credentials) {
        debug!(
            stage_type = %self.stage_type,
            location = %self.location,
            keys = ?credentials.keys().collect::<Vec<_>>(),
            "rotating stage credentials"
        );
        self.credentials = Some(credentials);
    }
}

impl fmt::Debug for StageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Credential values are secrets; only their names are shown.
        f.debug_struct("StageDescriptor")
            .field("stage_type", &self.stage_type)
            .field("location", &self.location)
            .field(
                "credentials",
                &self.credentials.as_ref().map(|c| c.keys().collect::<Vec<_>>()),
            )
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("account", &self.account)
            .finish()
    }
}
