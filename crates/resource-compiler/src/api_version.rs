use std::{fmt, num::ParseIntError, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt, Snafu};

static API_VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v(?P<major>\d+)((?P<identifier>alpha|beta)(?P<level>\d+))?$")
        .expect("failed to compile API version regex")
});

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum ParseApiVersionError {
    #[snafu(display("invalid API version {input:?}, expected v<MAJOR>(alpha|beta<LEVEL>)"))]
    InvalidFormat { input: String },

    #[snafu(display("failed to parse major version"))]
    ParseMajor { source: ParseIntError },

    #[snafu(display("failed to parse version level"))]
    ParseLevel { source: ParseIntError },
}

/// The stability level of a pre-release API version.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// `alpha<LEVEL>`
    Alpha(u64),

    /// `beta<LEVEL>`
    Beta(u64),
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alpha(level) => write!(f, "alpha{level}"),
            Self::Beta(level) => write!(f, "beta{level}"),
        }
    }
}

/// The version generated resource kinds are served under, with the
/// `v<MAJOR>(alpha|beta<LEVEL>)` format, for example `v1`, `v1alpha1` or
/// `v2beta3`.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiVersion {
    pub major: u64,
    pub level: Option<Level>,
}

impl ApiVersion {
    pub fn new(major: u64, level: Option<Level>) -> Self {
        Self { major, level }
    }
}

impl FromStr for ApiVersion {
    type Err = ParseApiVersionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let captures = API_VERSION_REGEX
            .captures(input)
            .context(InvalidFormatSnafu { input })?;

        let major = captures
            .name("major")
            .expect("internal error: check that the correct match label is specified")
            .as_str()
            .parse()
            .context(ParseMajorSnafu)?;

        let level = match (captures.name("identifier"), captures.name("level")) {
            (Some(identifier), Some(level)) => {
                let level = level.as_str().parse().context(ParseLevelSnafu)?;

                match identifier.as_str() {
                    "alpha" => Some(Level::Alpha(level)),
                    _ => Some(Level::Beta(level)),
                }
            }
            _ => None,
        };

        Ok(Self { major, level })
    }
}

impl TryFrom<String> for ApiVersion {
    type Error = ParseApiVersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ApiVersion> for String {
    fn from(value: ApiVersion) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.level {
            Some(level) => write!(f, "v{}{level}", self.major),
            None => write!(f, "v{}", self.major),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("v1", ApiVersion::new(1, None))]
    #[case("v1alpha1", ApiVersion::new(1, Some(Level::Alpha(1))))]
    #[case("v2beta12", ApiVersion::new(2, Some(Level::Beta(12))))]
    fn valid_api_version(#[case] input: &str, #[case] expected: ApiVersion) {
        let version: ApiVersion = input.parse().expect("valid API version");

        assert_eq!(version, expected);
        assert_eq!(version.to_string(), input);
    }

    #[rstest]
    #[case("")]
    #[case("1")]
    #[case("v1gamma1")]
    #[case("v1alpha")]
    #[case("V1")]
    fn invalid_api_version(#[case] input: &str) {
        let err = ApiVersion::from_str(input).expect_err("invalid API version");

        assert_eq!(
            err,
            ParseApiVersionError::InvalidFormat {
                input: input.to_owned()
            }
        );
    }
}
