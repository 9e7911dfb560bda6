//! Preference ordering over target-framework monikers (`net8.0`, `netstandard2.0`, `net48`, ...).

use regex::Regex;
use std::cmp::Ordering;

/// A total, deterministic preference order over framework monikers.
///
/// `compare(a, b)` returns [`Ordering::Greater`] when `a` is the better build.
pub trait FrameworkOrdering: Send + Sync {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

impl<F> FrameworkOrdering for F
where
    F: Fn(&str, &str) -> Ordering + Send + Sync,
{
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self(a, b)
    }
}

/// Framework family, least preferred first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FrameworkFamily {
    Unknown,
    NetFramework,
    NetStandard,
    NetCoreApp,
    Net,
}

/// A moniker broken into the parts that decide preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFramework {
    pub family: FrameworkFamily,
    pub version: (u32, u32, u32),
    /// OS-specific suffix such as `windows` in `net8.0-windows`.
    pub platform: Option<String>,
}

impl ParsedFramework {
    fn sort_key(&self) -> (FrameworkFamily, (u32, u32, u32), bool) {
        (self.family, self.version, self.platform.is_none())
    }
}

/// Default ordering: modern .NET over .NET Core over .NET Standard over .NET
/// Framework, newer versions first, and a plain moniker over its
/// platform-specific variant. Anything unrecognized ranks last.
#[derive(Debug, Clone)]
pub struct FrameworkPriority {
    dotted: Regex,
    legacy: Regex,
}

impl Default for FrameworkPriority {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameworkPriority {
    pub fn new() -> Self {
        Self {
            dotted: Regex::new(
                r"^(netcoreapp|netstandard|net)(\d+)\.(\d+)(?:\.(\d+))?(?:-([a-z]+)[\d.]*)?$",
            )
            .expect("framework moniker pattern is valid"),
            legacy: Regex::new(r"^net(\d)(\d)(\d)?$").expect("legacy moniker pattern is valid"),
        }
    }

    pub fn parse(&self, moniker: &str) -> ParsedFramework {
        let moniker = moniker.trim().to_ascii_lowercase();
        let number = |m: Option<regex::Match<'_>>| -> u32 {
            m.and_then(|m| m.as_str().parse::<u32>().ok()).unwrap_or(0)
        };

        if let Some(caps) = self.dotted.captures(&moniker) {
            let major = number(caps.get(2));
            let family = match &caps[1] {
                "netcoreapp" => FrameworkFamily::NetCoreApp,
                "netstandard" => FrameworkFamily::NetStandard,
                _ if major >= 5 => FrameworkFamily::Net,
                _ => FrameworkFamily::NetFramework,
            };
            return ParsedFramework {
                family,
                version: (major, number(caps.get(3)), number(caps.get(4))),
                platform: caps.get(5).map(|m| m.as_str().to_string()),
            };
        }

        if let Some(caps) = self.legacy.captures(&moniker) {
            return ParsedFramework {
                family: FrameworkFamily::NetFramework,
                version: (number(caps.get(1)), number(caps.get(2)), number(caps.get(3))),
                platform: None,
            };
        }

        ParsedFramework {
            family: FrameworkFamily::Unknown,
            version: (0, 0, 0),
            platform: None,
        }
    }
}

impl FrameworkOrdering for FrameworkPriority {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self.parse(a)
            .sort_key()
            .cmp(&self.parse(b).sort_key())
            // Equal keys (e.g. two unknown monikers): shorter, then alphabetically earlier wins.
            .then_with(|| b.len().cmp(&a.len()))
            .then_with(|| b.cmp(a))
    }
}

/// Sort monikers best first.
pub fn sort_best_first(ordering: &dyn FrameworkOrdering, monikers: &mut [&str]) {
    monikers.sort_by(|a, b| ordering.compare(b, a));
}
