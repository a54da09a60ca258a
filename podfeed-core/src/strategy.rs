//! Feed build strategy for Podfeed.

/// When the RSS document is built.
///
/// `Rebuild` lists the files directory on every feed request so additions and
/// removals show up without a restart. `Startup` builds the document once and
/// serves the same string for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedStrategy {
    /// Rebuild the feed on every request
    #[default]
    Rebuild,
    /// Build the feed once at startup
    Startup,
}

impl FeedStrategy {
    /// Check if the feed is rebuilt per request.
    pub fn is_rebuild(self) -> bool {
        matches!(self, Self::Rebuild)
    }
}

impl std::fmt::Display for FeedStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rebuild => write!(f, "rebuild"),
            Self::Startup => write!(f, "startup"),
        }
    }
}

impl std::str::FromStr for FeedStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rebuild" | "per-request" => Ok(Self::Rebuild),
            "startup" | "once" => Ok(Self::Startup),
            _ => Err(format!(
                "Invalid feed strategy: '{s}'. Valid options are: rebuild, startup"
            )),
        }
    }
}
