/// API versions mounted by the router. Every version serves the same
/// operations over the same stores until one of them needs to diverge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    V1,
    V2,
}

impl ApiVersion {
    pub const ALL: [ApiVersion; 2] = [ApiVersion::V1, ApiVersion::V2];

    pub fn as_str(self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            ApiVersion::V1 => "/v1",
            ApiVersion::V2 => "/v2",
        }
    }

    /// Splits `/v1/users/7` into `(V1, "/users/7")`.
    pub fn split_path(path: &str) -> Option<(ApiVersion, &str)> {
        Self::ALL.into_iter().find_map(|version| {
            let rest = path.strip_prefix(version.prefix())?;
            match rest {
                "" => Some((version, "/")),
                _ if rest.starts_with('/') => Some((version, rest)),
                _ => None,
            }
        })
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
