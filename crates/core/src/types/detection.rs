use std::fmt;

/// Where the active context for an invocation came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionSource {
    /// Caller passed `--context`
    Forced,
    /// A registered plugin's detector matched
    Plugin { name: String },
    /// A built-in marker-file rule matched
    Builtin,
}

/// The single context chosen for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub context: String,
    pub source: DetectionSource,
}

impl Detection {
    pub fn forced(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source: DetectionSource::Forced,
        }
    }

    pub fn plugin(context: impl Into<String>, plugin: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source: DetectionSource::Plugin {
                name: plugin.into(),
            },
        }
    }

    pub fn builtin(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source: DetectionSource::Builtin,
        }
    }
}

impl fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionSource::Forced => write!(f, "forced"),
            DetectionSource::Plugin { name } => write!(f, "detected via plugin: {name}"),
            DetectionSource::Builtin => write!(f, "detected"),
        }
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.context, self.source)
    }
}
