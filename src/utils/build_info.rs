use std::fmt;

/// Version and provenance stamped in by `build.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: &'static str,
    pub tree: &'static str,
    pub profile: &'static str,
    pub target: &'static str,
    pub built_at: &'static str,
}

pub const UNKNOWN: &str = "unknown";

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("CHATLEDGER_BUILD_HASH").unwrap_or(UNKNOWN),
            tree: option_env!("CHATLEDGER_BUILD_STATUS").unwrap_or(UNKNOWN),
            profile: option_env!("CHATLEDGER_BUILD_PROFILE").unwrap_or(UNKNOWN),
            target: option_env!("CHATLEDGER_BUILD_TARGET").unwrap_or(UNKNOWN),
            built_at: option_env!("CHATLEDGER_BUILD_TIMESTAMP").unwrap_or(UNKNOWN),
        }
    }
}

/// `0.1.0 (3f2a9c1, dirty tree, release for x86_64-unknown-linux-gnu, built 2026-10-19T12:00:00Z)`
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.version, self.commit)?;
        if self.tree == "dirty" {
            f.write_str(", dirty tree")?;
        }
        write!(
            f,
            ", {} for {}, built {})",
            self.profile, self.target, self.built_at
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirty_trees_are_called_out() {
        let info = BuildInfo {
            version: "0.1.0",
            commit: "3f2a9c1",
            tree: "dirty",
            profile: "debug",
            target: "x86_64-unknown-linux-gnu",
            built_at: "2026-10-19T12:00:00Z",
        };
        assert_eq!(
            info.to_string(),
            "0.1.0 (3f2a9c1, dirty tree, debug for x86_64-unknown-linux-gnu, built 2026-10-19T12:00:00Z)"
        );
        let clean = BuildInfo { tree: "clean", ..info };
        assert!(!clean.to_string().contains("dirty"));
    }

    #[test]
    fn current_reports_the_package_version() {
        assert_eq!(BuildInfo::current().version, env!("CARGO_PKG_VERSION"));
    }
}
